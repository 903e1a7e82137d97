pub mod monitor;
pub mod signals;
pub mod sqlite_store;

pub use monitor::{Monitor, SymbolReport};
pub use signals::{SignalEngine, SignalParams};
pub use sqlite_store::SqliteStore;

use crate::error::Result;
use crate::types::{PriceSample, PriceSeries};

/// Price history persistence.
pub trait PriceHistory: Send + Sync {
    /// Record one sample for `symbol`.
    fn save_price(&self, symbol: &str, sample: &PriceSample) -> Result<()>;

    /// The `limit` most recent samples for `symbol`, most-recent-last.
    fn fetch_history(&self, symbol: &str, limit: usize) -> Result<PriceSeries>;
}
