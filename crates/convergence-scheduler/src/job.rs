use convergence_core::{DashboardEvent, Point, Window};
use convergence_sink::DashboardSink;
use convergence_source::PercentSource;
use tracing::{debug, error, info, warn};

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// A value was found, appended and delivered.
    Emitted { x: u64, y: f64 },
    /// A value was found and appended, but the sink failed.
    Undelivered { x: u64, y: f64 },
    /// No value this tick: nothing appended, nothing sent.
    Skipped { x: u64 },
}

impl TickOutcome {
    pub fn x(&self) -> u64 {
        match *self {
            TickOutcome::Emitted { x, .. }
            | TickOutcome::Undelivered { x, .. }
            | TickOutcome::Skipped { x } => x,
        }
    }
}

/// The sliding-window state of the convergence widget.
///
/// Owns the buffer and the x counter; nothing else mutates them.
#[derive(Debug, Clone)]
pub struct PollingJob {
    event: String,
    window: Window,
    last_x: u64,
}

impl PollingJob {
    /// Continue from an existing window; `last_x` picks up at its newest point.
    pub fn new(event: impl Into<String>, window: Window) -> Self {
        let last_x = window.last().map(|p| p.x).unwrap_or(0);
        Self {
            event: event.into(),
            window,
            last_x,
        }
    }

    /// Start with a full window of zero-valued points.
    pub fn zeroed(event: impl Into<String>, capacity: usize) -> Self {
        Self::new(event, Window::seeded(capacity, &[]))
    }

    /// Start with a window seeded from the source's recent history.
    ///
    /// A failing history query is logged and falls back to zeros.
    pub fn backfilled(
        event: impl Into<String>,
        capacity: usize,
        source: &dyn PercentSource,
    ) -> Self {
        let history = source.history(capacity).unwrap_or_else(|e| {
            warn!(source = source.name(), error = %e, "backfill failed, seeding with zeros");
            Vec::new()
        });
        info!(capacity, backfilled = history.len(), "window seeded");
        Self::new(event, Window::seeded(capacity, &history))
    }

    /// Run one tick: drop the oldest point, advance x, query, and on a value
    /// append and publish the whole window.
    pub async fn tick(
        &mut self,
        source: &dyn PercentSource,
        sink: &dyn DashboardSink,
    ) -> TickOutcome {
        self.window.shift();
        self.last_x += 1;
        let x = self.last_x;

        let value = match source.latest() {
            Ok(v) => v,
            Err(e) => {
                error!(x, source = source.name(), error = %e, "percentage query failed");
                None
            }
        };

        let Some(y) = value else {
            debug!(x, "no percentage available, skipping emission");
            return TickOutcome::Skipped { x };
        };

        self.window.push(Point::new(x, y));
        let event = DashboardEvent::new(self.event.clone(), self.window.points());

        match sink.send(&event).await {
            Ok(()) => {
                info!(x, y, points = event.points.len(), sink = sink.name(), "window published");
                TickOutcome::Emitted { x, y }
            }
            Err(e) => {
                warn!(x, y, sink = sink.name(), error = %e, "dashboard delivery failed");
                TickOutcome::Undelivered { x, y }
            }
        }
    }

    pub fn event(&self) -> &str {
        &self.event
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn last_x(&self) -> u64 {
        self.last_x
    }
}
