use std::time::Duration;

use async_trait::async_trait;
use tokio::{
    sync::mpsc,
    time::{interval_at, Instant, Interval, MissedTickBehavior},
};

/// The timer that decides when the job runs.
///
/// Injected into [`JobEngine::run`](crate::engine::JobEngine::run) so the
/// loop can be driven by a real clock, an external scheduler or a test.
#[async_trait]
pub trait Ticker: Send {
    /// Wait for the next tick. `false` means the timer is exhausted.
    async fn tick(&mut self) -> bool;
}

/// Fixed-period wall-clock timer.
pub struct IntervalTicker {
    interval: Interval,
}

impl IntervalTicker {
    /// First tick fires one full `period` after creation, so a freshly seeded
    /// window is shown for a whole period before it starts sliding.
    /// A late tick delays the schedule instead of firing a burst.
    pub fn new(period: Duration) -> Self {
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval }
    }
}

#[async_trait]
impl Ticker for IntervalTicker {
    async fn tick(&mut self) -> bool {
        self.interval.tick().await;
        true
    }
}

/// Ticks whenever a message arrives; exhausted once every sender is dropped.
pub struct ChannelTicker {
    rx: mpsc::Receiver<()>,
}

impl ChannelTicker {
    pub fn new(rx: mpsc::Receiver<()>) -> Self {
        Self { rx }
    }

    /// A ticker plus the handle that triggers it.
    pub fn pair(capacity: usize) -> (mpsc::Sender<()>, Self) {
        let (tx, rx) = mpsc::channel(capacity);
        (tx, Self::new(rx))
    }
}

#[async_trait]
impl Ticker for ChannelTicker {
    async fn tick(&mut self) -> bool {
        self.rx.recv().await.is_some()
    }
}
