//! `convergence-scheduler`: the timer-driven polling job.
//!
//! # Tick
//!
//! Every tick, in order:
//!
//! 1. drop the oldest point of the window
//! 2. advance the x counter by one
//! 3. query the newest percentage
//! 4. if there is one, append `(x, y)` and publish the whole window
//!
//! An empty (or failed) query skips step 4 entirely.

pub mod engine;
pub mod job;
pub mod ticker;

pub use engine::JobEngine;
pub use job::{PollingJob, TickOutcome};
pub use ticker::{ChannelTicker, IntervalTicker, Ticker};
