use std::collections::VecDeque;

use crate::types::Point;

/// Fixed-capacity sliding window of plotted points, oldest first.
///
/// The window never grows past its capacity: a push into a full window
/// evicts the oldest point. The polling job shifts explicitly before every
/// push, so in steady state the eviction path is never taken.
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    points: VecDeque<Point>,
    capacity: usize,
}

impl Window {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Build a full window with x = 1..=capacity.
    ///
    /// `ys` is the most recent history, oldest first. When it is shorter than
    /// the capacity the front is padded with zeros; when longer, only the
    /// newest `capacity` values are used.
    pub fn seeded(capacity: usize, ys: &[f64]) -> Self {
        let mut window = Self::with_capacity(capacity);
        let used = &ys[ys.len().saturating_sub(capacity)..];
        let padding = capacity - used.len();

        let seed = std::iter::repeat(0.0).take(padding).chain(used.iter().copied());
        for (i, y) in seed.enumerate() {
            window.push(Point::new(i as u64 + 1, y));
        }
        window
    }

    /// Remove and return the oldest point.
    pub fn shift(&mut self) -> Option<Point> {
        self.points.pop_front()
    }

    /// Append the newest point.
    pub fn push(&mut self, point: Point) {
        if self.points.len() == self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(point);
    }

    pub fn last(&self) -> Option<&Point> {
        self.points.back()
    }

    pub fn points(&self) -> Vec<Point> {
        self.points.iter().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Point> {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
