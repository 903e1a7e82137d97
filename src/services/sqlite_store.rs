//! SQLite persistence for recorded prices.
//!
//! One row per sample in `crypto_prices`. Timestamps are stored as RFC 3339
//! UTC text with millisecond precision, so ordering by the text column is
//! ordering by time.

use super::PriceHistory;
use crate::error::{AppError, Result};
use crate::types::{PriceSample, PriceSeries};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

/// SQLite store for price history.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database at `path`, creating its parent
    /// directory if needed.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        info!("SQLite store initialized at {}", path.display());
        Ok(store)
    }

    /// Create an in-memory SQLite store (for testing).
    pub fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        debug!("In-memory SQLite store initialized");
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.lock()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS crypto_prices (
                timestamp TEXT NOT NULL,
                symbol TEXT NOT NULL,
                price REAL NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_prices_symbol_timestamp
             ON crypto_prices(symbol, timestamp)",
            [],
        )?;

        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| AppError::Internal(format!("SQLite connection lock poisoned: {}", e)))
    }

    /// Number of stored samples for `symbol`.
    pub fn count(&self, symbol: &str) -> Result<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM crypto_prices WHERE symbol = ?1",
            params![symbol],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

impl PriceHistory for SqliteStore {
    fn save_price(&self, symbol: &str, sample: &PriceSample) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO crypto_prices (timestamp, symbol, price) VALUES (?1, ?2, ?3)",
            params![
                sample
                    .timestamp
                    .to_rfc3339_opts(SecondsFormat::Millis, true),
                symbol,
                sample.price,
            ],
        )?;
        debug!("Saved {} = {}", symbol, sample.price);
        Ok(())
    }

    fn fetch_history(&self, symbol: &str, limit: usize) -> Result<PriceSeries> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT timestamp, price FROM crypto_prices
             WHERE symbol = ?1
             ORDER BY timestamp DESC
             LIMIT ?2",
        )?;

        let rows = stmt.query_map(params![symbol, limit as i64], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
        })?;

        let mut samples = Vec::new();
        for row in rows {
            let (timestamp, price) = row?;
            let timestamp = DateTime::parse_from_rfc3339(&timestamp)
                .map_err(|e| {
                    AppError::MalformedInput(format!("stored timestamp {:?}: {}", timestamp, e))
                })?
                .with_timezone(&Utc);
            samples.push(PriceSample::new(timestamp, price));
        }

        // Newest-first from the query; the series is most-recent-last.
        samples.reverse();
        PriceSeries::from_ordered(samples)
    }
}
