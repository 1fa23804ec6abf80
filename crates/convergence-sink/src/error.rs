use thiserror::Error;

/// Errors that can occur while delivering a dashboard event.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Transport failure talking to the dashboard.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The dashboard answered with a non-success status.
    #[error("Dashboard rejected event ({status}): {message}")]
    Api { status: u16, message: String },

    /// The event could not be serialised.
    #[error("Payload error: {0}")]
    Payload(#[from] convergence_core::ConvergenceError),

    /// In-process consumer is not keeping up.
    #[error("Event channel full")]
    ChannelFull,

    /// In-process consumer went away.
    #[error("Event channel closed")]
    ChannelClosed,
}

pub type Result<T> = std::result::Result<T, SinkError>;
