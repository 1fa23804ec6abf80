use async_trait::async_trait;
use convergence_core::DashboardEvent;
use tracing::info;

use crate::{error::SinkError, sink::DashboardSink};

/// Writes events to the log instead of a dashboard (`--dry-run`).
#[derive(Debug, Default)]
pub struct LogSink;

#[async_trait]
impl DashboardSink for LogSink {
    fn name(&self) -> &str {
        "log"
    }

    async fn send(&self, event: &DashboardEvent) -> Result<(), SinkError> {
        let payload = event.payload()?;
        info!(event = %event.name, points = event.points.len(), %payload, "dashboard event");
        Ok(())
    }
}
