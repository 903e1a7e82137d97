pub mod binance;

pub use binance::BinanceClient;

use crate::error::AppError;
use crate::types::OhlcPoint;
use std::future::Future;
use std::pin::Pin;

/// Live market data for a base asset (e.g. `BTC`) quoted in the configured
/// quote asset.
pub trait MarketData: Send + Sync {
    /// Latest traded price.
    fn current_price<'a>(
        &'a self,
        symbol: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<f64, AppError>> + Send + 'a>>;

    /// Recent OHLC candles, most-recent-last.
    fn candles<'a>(
        &'a self,
        symbol: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<OhlcPoint>, AppError>> + Send + 'a>>;
}
