use async_trait::async_trait;
use convergence_core::DashboardEvent;

use crate::error::SinkError;

/// Downstream consumer of dashboard events (Dashing widget API, log, channel, …).
#[async_trait]
pub trait DashboardSink: Send + Sync {
    /// Stable lowercase identifier for this sink (e.g. `"http"`).
    fn name(&self) -> &str;

    /// Deliver one named event carrying the full window.
    async fn send(&self, event: &DashboardEvent) -> Result<(), SinkError>;
}
