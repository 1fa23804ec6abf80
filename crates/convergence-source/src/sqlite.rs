use std::path::Path;
use std::sync::Mutex;

use rusqlite::{Connection, OpenFlags};
use tracing::{debug, info};

use crate::{
    db::OPEN_TRADE_SENTINEL,
    error::{Result, SourceError},
    source::PercentSource,
};

/// Truncated `perc` of closed trades, newest first; `tail` finishes the query.
///
/// Truncates toward zero to two decimals. `ROUND(.., 9)` before the cast only
/// absorbs binary float noise (0.29 * 100 = 28.999999999999996); any real
/// digit, even 12.3499999996, is still cut.
fn closed_trades_sql(tail: &str) -> String {
    format!(
        "SELECT CAST(ROUND(perc * 100, 9) AS INTEGER) / 100.0 AS perc
         FROM profit
         WHERE sell_time IS NOT NULL AND sell_time != '{OPEN_TRADE_SENTINEL}'{tail}
         ORDER BY sell_time DESC"
    )
}

fn latest_sql() -> String {
    format!("{} LIMIT 1", closed_trades_sql(""))
}

fn history_sql() -> String {
    format!("{} LIMIT ?1", closed_trades_sql(" AND perc IS NOT NULL"))
}

/// Reads percentages from a SQLite `profit` table.
///
/// The connection sits behind a `Mutex` so the source can be shared with the
/// async engine; only the tick path ever takes the lock.
pub struct SqliteSource {
    db: Mutex<Connection>,
    latest_sql: String,
    /// Set when the operator replaced the built-in query.
    custom: bool,
}

impl SqliteSource {
    pub fn new(conn: Connection, custom_query: Option<String>) -> Self {
        let custom = custom_query.is_some();
        Self {
            db: Mutex::new(conn),
            latest_sql: custom_query.unwrap_or_else(latest_sql),
            custom,
        }
    }

    /// Open the database file read-only; the job never writes to it.
    pub fn open(path: impl AsRef<Path>, custom_query: Option<String>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY
                | OpenFlags::SQLITE_OPEN_NO_MUTEX
                | OpenFlags::SQLITE_OPEN_URI,
        )?;
        info!(path = %path.display(), custom_query = custom_query.is_some(), "opened percentage source");
        Ok(Self::new(conn, custom_query))
    }
}

impl PercentSource for SqliteSource {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn latest(&self) -> Result<Option<f64>> {
        let conn = self.db.lock().unwrap_or_else(|e| e.into_inner());
        let mut stmt = conn.prepare_cached(&self.latest_sql)?;
        if stmt.column_count() != 1 {
            return Err(SourceError::InvalidQuery(
                "query must return exactly one column".to_string(),
            ));
        }

        let mut rows = stmt.query([])?;
        let value = match rows.next()? {
            // A NULL perc is treated the same as no row at all.
            Some(row) => row.get::<_, Option<f64>>(0)?,
            None => None,
        };
        debug!(?value, "latest percentage");
        Ok(value)
    }

    fn history(&self, limit: usize) -> Result<Vec<f64>> {
        if self.custom {
            debug!("custom query configured; no history available for backfill");
            return Ok(Vec::new());
        }

        let conn = self.db.lock().unwrap_or_else(|e| e.into_inner());
        let mut stmt = conn.prepare_cached(&history_sql())?;
        let mut values = stmt
            .query_map([limit as i64], |row| row.get::<_, f64>(0))?
            .collect::<rusqlite::Result<Vec<f64>>>()?;
        // Query is newest first; the window wants oldest first.
        values.reverse();
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{init_db, OPEN_TRADE_SENTINEL};

    fn source_with(rows: &[(&str, Option<f64>)]) -> SqliteSource {
        let conn = Connection::open_in_memory().expect("in-memory db");
        init_db(&conn).expect("schema");
        for (sell_time, perc) in rows {
            conn.execute(
                "INSERT INTO profit (pair, sell_time, perc) VALUES ('BTCUSDT', ?1, ?2)",
                rusqlite::params![sell_time, perc],
            )
            .expect("insert");
        }
        SqliteSource::new(conn, None)
    }

    #[test]
    fn empty_table_returns_none() {
        let src = source_with(&[]);
        assert_eq!(src.latest().unwrap(), None);
    }

    #[test]
    fn latest_picks_newest_sell_time() {
        let src = source_with(&[
            ("2024-01-01 10:00:00", Some(1.5)),
            ("2024-01-03 10:00:00", Some(3.25)),
            ("2024-01-02 10:00:00", Some(2.0)),
        ]);
        assert_eq!(src.latest().unwrap(), Some(3.25));
    }

    #[test]
    fn open_trades_are_ignored() {
        let src = source_with(&[
            ("2024-01-01 10:00:00", Some(1.5)),
            (OPEN_TRADE_SENTINEL, Some(99.0)),
        ]);
        assert_eq!(src.latest().unwrap(), Some(1.5));
    }

    #[test]
    fn only_open_trades_returns_none() {
        let src = source_with(&[(OPEN_TRADE_SENTINEL, Some(4.0))]);
        assert_eq!(src.latest().unwrap(), None);
    }

    #[test]
    fn value_is_truncated_not_rounded() {
        let src = source_with(&[("2024-01-01 10:00:00", Some(12.349))]);
        assert_eq!(src.latest().unwrap(), Some(12.34));
    }

    #[test]
    fn negative_value_truncates_toward_zero() {
        let src = source_with(&[("2024-01-01 10:00:00", Some(-1.239))]);
        assert_eq!(src.latest().unwrap(), Some(-1.23));
    }

    #[test]
    fn float_noise_does_not_drop_a_digit() {
        let src = source_with(&[("2024-01-01 10:00:00", Some(0.29))]);
        assert_eq!(src.latest().unwrap(), Some(0.29));
    }

    #[test]
    fn value_just_below_next_cent_is_still_truncated() {
        let src = source_with(&[("2024-01-01 10:00:00", Some(12.3499999996))]);
        assert_eq!(src.latest().unwrap(), Some(12.34));
    }

    #[test]
    fn null_perc_counts_as_no_value() {
        let src = source_with(&[("2024-01-01 10:00:00", None)]);
        assert_eq!(src.latest().unwrap(), None);
    }

    #[test]
    fn history_is_oldest_first_and_limited() {
        let src = source_with(&[
            ("2024-01-01 10:00:00", Some(1.0)),
            ("2024-01-02 10:00:00", Some(2.0)),
            ("2024-01-03 10:00:00", None),
            ("2024-01-04 10:00:00", Some(4.0)),
            (OPEN_TRADE_SENTINEL, Some(5.0)),
        ]);
        assert_eq!(src.history(2).unwrap(), vec![2.0, 4.0]);
        assert_eq!(src.history(10).unwrap(), vec![1.0, 2.0, 4.0]);
    }

    #[test]
    fn custom_query_replaces_latest_and_disables_history() {
        let conn = Connection::open_in_memory().expect("in-memory db");
        let src = SqliteSource::new(conn, Some("SELECT 42".to_string()));
        assert_eq!(src.latest().unwrap(), Some(42.0));
        assert!(src.history(5).unwrap().is_empty());
    }

    #[test]
    fn multi_column_custom_query_is_rejected() {
        let conn = Connection::open_in_memory().expect("in-memory db");
        let src = SqliteSource::new(conn, Some("SELECT 1.5, 'extra'".to_string()));
        assert!(matches!(src.latest(), Err(SourceError::InvalidQuery(_))));
    }

    #[test]
    fn missing_table_is_an_error() {
        let conn = Connection::open_in_memory().expect("in-memory db");
        let src = SqliteSource::new(conn, None);
        assert!(matches!(src.latest(), Err(SourceError::Database(_))));
    }
}
