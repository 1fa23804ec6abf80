use rusqlite::Connection;

use crate::error::Result;

/// Value stored in `sell_time` for trades that are still open.
pub const OPEN_TRADE_SENTINEL: &str = "0000-00-00 00:00:00";

/// Initialise the `profit` table in `conn`.
///
/// The trading side owns this table in production; the job only reads it.
/// Creating it here lets local setups and tests run against a blank file.
pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(&format!(
        "
        CREATE TABLE IF NOT EXISTS profit (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            pair        TEXT    NOT NULL DEFAULT '',
            buy_time    TEXT,
            sell_time   TEXT    NOT NULL DEFAULT '{OPEN_TRADE_SENTINEL}',
            perc        REAL                -- NULL until the trade is priced
        );

        CREATE INDEX IF NOT EXISTS idx_profit_sell_time ON profit (sell_time);
        "
    ))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsold_trade_defaults_to_open_sentinel() {
        let conn = Connection::open_in_memory().expect("in-memory db");
        init_db(&conn).expect("schema");
        // idempotent
        init_db(&conn).expect("schema twice");

        conn.execute("INSERT INTO profit (pair, perc) VALUES ('BTCUSDT', 1.0)", [])
            .expect("insert");
        let sell_time: String = conn
            .query_row("SELECT sell_time FROM profit", [], |row| row.get(0))
            .expect("select");
        assert_eq!(sell_time, OPEN_TRADE_SENTINEL);
    }
}
