use super::MarketData;
use crate::error::AppError;
use crate::types::OhlcPoint;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use tracing::{debug, warn};

/// Binance ticker price response.
#[derive(Debug, Deserialize)]
struct TickerPrice {
    #[allow(dead_code)]
    symbol: String,
    price: String,
}

/// Binance REST client.
#[derive(Clone)]
pub struct BinanceClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    quote_asset: String,
    kline_interval: String,
    kline_limit: usize,
}

impl BinanceClient {
    /// Create a new Binance client.
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        quote_asset: impl Into<String>,
        kline_interval: impl Into<String>,
        kline_limit: usize,
    ) -> Self {
        let client = Client::builder()
            .user_agent("crypto-monitor/0.1")
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            quote_asset: quote_asset.into(),
            kline_interval: kline_interval.into(),
            kline_limit,
        }
    }

    /// Trading pair for a base asset, e.g. `BTC` -> `BTCUSDT`.
    pub fn pair(&self, symbol: &str) -> String {
        format!("{}{}", symbol.to_uppercase(), self.quote_asset)
    }

    fn get(&self, url: &str) -> RequestBuilder {
        let request = self.client.get(url);
        match self.api_key {
            Some(ref key) => request.header("X-MBX-APIKEY", key),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, AppError> {
        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            warn!(
                "Binance API returned {}: {}",
                status,
                truncate_chars(&text, 200)
            );
            return Err(AppError::ExternalApi(format!("Binance API error: {}", status)));
        }

        Ok(response)
    }

    async fn fetch_price(&self, symbol: &str) -> Result<f64, AppError> {
        let pair = self.pair(symbol);
        let url = format!("{}/ticker/price?symbol={}", self.base_url, pair);

        let ticker: TickerPrice = self.send(self.get(&url)).await?.json().await?;
        let price = parse_price(&ticker.price)
            .ok_or_else(|| AppError::ExternalApi(format!("invalid price for {}: {}", pair, ticker.price)))?;

        debug!("Binance price: {} = {}", pair, price);
        Ok(price)
    }

    async fn fetch_candles(&self, symbol: &str) -> Result<Vec<OhlcPoint>, AppError> {
        let pair = self.pair(symbol);
        let url = format!(
            "{}/klines?symbol={}&interval={}&limit={}",
            self.base_url, pair, self.kline_interval, self.kline_limit
        );

        let rows: Vec<Value> = self.send(self.get(&url)).await?.json().await?;
        let candles = rows
            .iter()
            .map(parse_kline)
            .collect::<Result<Vec<_>, _>>()?;

        debug!("Binance klines: {} x{}", pair, candles.len());
        Ok(candles)
    }
}

impl MarketData for BinanceClient {
    fn current_price<'a>(
        &'a self,
        symbol: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<f64, AppError>> + Send + 'a>> {
        Box::pin(self.fetch_price(symbol))
    }

    fn candles<'a>(
        &'a self,
        symbol: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<OhlcPoint>, AppError>> + Send + 'a>> {
        Box::pin(self.fetch_candles(symbol))
    }
}

/// At most `max` characters of `text`, cut on a char boundary.
fn truncate_chars(text: &str, max: usize) -> &str {
    text.char_indices()
        .nth(max)
        .map_or(text, |(idx, _)| &text[..idx])
}

/// Positive finite price, or `None`.
fn parse_price(raw: &str) -> Option<f64> {
    raw.parse::<f64>()
        .ok()
        .filter(|p| p.is_finite() && *p > 0.0)
}

/// Parse one kline row:
/// `[open_time, "open", "high", "low", "close", "volume", close_time, ...]`.
pub fn parse_kline(row: &Value) -> Result<OhlcPoint, AppError> {
    let fields = row
        .as_array()
        .filter(|f| f.len() >= 6)
        .ok_or_else(|| AppError::ExternalApi(format!("malformed kline: {}", row)))?;

    let number = |idx: usize| -> Result<f64, AppError> {
        let value = &fields[idx];
        value
            .as_str()
            .and_then(|s| s.parse::<f64>().ok())
            .or_else(|| value.as_f64())
            .filter(|v| v.is_finite())
            .ok_or_else(|| AppError::ExternalApi(format!("malformed kline field {}: {}", idx, value)))
    };

    let time = fields[0]
        .as_i64()
        .ok_or_else(|| AppError::ExternalApi(format!("malformed kline time: {}", fields[0])))?;

    Ok(OhlcPoint {
        time,
        open: number(1)?,
        high: number(2)?,
        low: number(3)?,
        close: number(4)?,
        volume: number(5).ok(),
    })
}
