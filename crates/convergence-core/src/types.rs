use chrono::Utc;
use serde::{Deserialize, Serialize};

/// One plotted sample: tick counter on x, truncated percentage on y.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: u64,
    pub y: f64,
}

impl Point {
    pub fn new(x: u64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A named dashboard update carrying the full window.
///
/// Wire payload: `{ "points": [{"x":1,"y":0.5}, ...], "updatedAt": 1700000000 }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardEvent {
    /// Widget / event id, e.g. `"convergence"`.
    #[serde(skip)]
    pub name: String,
    pub points: Vec<Point>,
    /// Unix seconds when the event was built.
    #[serde(rename = "updatedAt")]
    pub updated_at: i64,
}

impl DashboardEvent {
    pub fn new(name: impl Into<String>, points: Vec<Point>) -> Self {
        Self {
            name: name.into(),
            points,
            updated_at: Utc::now().timestamp(),
        }
    }

    /// Serialised payload without the event name.
    pub fn payload(&self) -> crate::error::Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}
