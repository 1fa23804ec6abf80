//! `convergence-source`: where the plotted percentages come from.
//!
//! [`SqliteSource`] reads the `perc` column of the newest closed trade in the
//! `profit` table, truncated to two decimal places.

pub mod db;
pub mod error;
pub mod source;
pub mod sqlite;

pub use error::{Result, SourceError};
pub use source::PercentSource;
pub use sqlite::SqliteSource;
