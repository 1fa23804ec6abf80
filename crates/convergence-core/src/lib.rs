//! `convergence-core`: shared types, configuration and errors for the
//! convergence dashboard job.

pub mod config;
pub mod error;
pub mod types;
pub mod window;

pub use config::ConvergenceConfig;
pub use error::{ConvergenceError, Result};
pub use types::{DashboardEvent, Point};
pub use window::Window;
