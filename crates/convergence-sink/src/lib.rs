//! `convergence-sink`: delivery of dashboard events.
//!
//! | Sink          | Transport                                           |
//! |---------------|-----------------------------------------------------|
//! | `HttpSink`    | Dashing widget API: `POST {url}/widgets/{event}`    |
//! | `LogSink`     | `tracing` at info level (dry run)                   |
//! | `ChannelSink` | `tokio::sync::mpsc` to an in-process consumer       |

pub mod channel;
pub mod error;
pub mod http;
pub mod log;
pub mod sink;

pub use channel::ChannelSink;
pub use error::{Result, SinkError};
pub use http::HttpSink;
pub use log::LogSink;
pub use sink::DashboardSink;
