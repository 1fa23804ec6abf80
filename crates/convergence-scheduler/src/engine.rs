use convergence_sink::DashboardSink;
use convergence_source::PercentSource;
use tokio::sync::watch;
use tracing::info;

use crate::{
    job::{PollingJob, TickOutcome},
    ticker::Ticker,
};

/// Drives a [`PollingJob`] from an injected [`Ticker`].
///
/// Source and sink are owned trait objects so the whole engine can be moved
/// into a spawned task.
pub struct JobEngine {
    job: PollingJob,
    source: Box<dyn PercentSource>,
    sink: Box<dyn DashboardSink>,
}

impl JobEngine {
    pub fn new(
        job: PollingJob,
        source: Box<dyn PercentSource>,
        sink: Box<dyn DashboardSink>,
    ) -> Self {
        Self { job, source, sink }
    }

    /// Perform exactly one tick, outside of any timer.
    pub async fn run_once(&mut self) -> TickOutcome {
        self.job.tick(self.source.as_ref(), self.sink.as_ref()).await
    }

    /// Main loop. Ticks until the ticker is exhausted or `shutdown` turns
    /// `true`, then hands back the final job state.
    ///
    /// A tick that has started always runs to completion; shutdown is only
    /// observed between ticks.
    pub async fn run<T: Ticker>(
        mut self,
        mut ticker: T,
        mut shutdown: watch::Receiver<bool>,
    ) -> PollingJob {
        info!(
            event = %self.job.event(),
            window = self.job.window().capacity(),
            source = self.source.name(),
            sink = self.sink.name(),
            "convergence job started"
        );

        if *shutdown.borrow() {
            info!("shutdown requested before first tick");
            return self.job;
        }

        loop {
            tokio::select! {
                more = ticker.tick() => {
                    if !more {
                        info!("ticker exhausted, stopping");
                        break;
                    }
                    self.run_once().await;
                }
                changed = shutdown.changed() => {
                    // A dropped sender can never signal again; treat it as shutdown.
                    if changed.is_err() || *shutdown.borrow() {
                        info!(last_x = self.job.last_x(), "convergence job shutting down");
                        break;
                    }
                }
            }
        }
        self.job
    }

    pub fn job(&self) -> &PollingJob {
        &self.job
    }
}
