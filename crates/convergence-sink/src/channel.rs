use async_trait::async_trait;
use convergence_core::DashboardEvent;
use tokio::sync::mpsc::{self, error::TrySendError};

use crate::{error::SinkError, sink::DashboardSink};

/// Forwards events to an in-process consumer.
///
/// Uses `try_send` so a slow consumer can never stall the tick loop; a full
/// channel surfaces as [`SinkError::ChannelFull`] and the event is dropped.
pub struct ChannelSink {
    tx: mpsc::Sender<DashboardEvent>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<DashboardEvent>) -> Self {
        Self { tx }
    }

    /// Convenience: a sink plus the receiving end of a fresh channel.
    pub fn pair(capacity: usize) -> (Self, mpsc::Receiver<DashboardEvent>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self::new(tx), rx)
    }
}

#[async_trait]
impl DashboardSink for ChannelSink {
    fn name(&self) -> &str {
        "channel"
    }

    async fn send(&self, event: &DashboardEvent) -> Result<(), SinkError> {
        self.tx.try_send(event.clone()).map_err(|e| match e {
            TrySendError::Full(_) => SinkError::ChannelFull,
            TrySendError::Closed(_) => SinkError::ChannelClosed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use convergence_core::Point;

    #[tokio::test]
    async fn delivers_event_to_receiver() {
        let (sink, mut rx) = ChannelSink::pair(4);
        let ev = DashboardEvent::new("convergence", vec![Point::new(1, 2.0)]);
        sink.send(&ev).await.unwrap();

        let got = rx.recv().await.unwrap();
        assert_eq!(got.name, "convergence");
        assert_eq!(got.points, vec![Point::new(1, 2.0)]);
    }

    #[tokio::test]
    async fn full_channel_is_reported() {
        let (sink, _rx) = ChannelSink::pair(1);
        let ev = DashboardEvent::new("convergence", Vec::new());
        sink.send(&ev).await.unwrap();
        assert!(matches!(sink.send(&ev).await, Err(SinkError::ChannelFull)));
    }

    #[tokio::test]
    async fn closed_channel_is_reported() {
        let (sink, rx) = ChannelSink::pair(1);
        drop(rx);
        let ev = DashboardEvent::new("convergence", Vec::new());
        assert!(matches!(sink.send(&ev).await, Err(SinkError::ChannelClosed)));
    }
}
