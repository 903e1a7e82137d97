//! Integration tests for the monitor loop

use chrono::{Duration, Utc};
use crypto_monitor::config::{Coin, Config};
use crypto_monitor::error::AppError;
use crypto_monitor::services::{Monitor, PriceHistory, SqliteStore};
use crypto_monitor::sources::MarketData;
use crypto_monitor::types::*;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Scripted market data: fixed prices per symbol, optional candles.
struct FakeMarket {
    prices: HashMap<String, f64>,
    candles: Option<Vec<OhlcPoint>>,
    price_calls: AtomicUsize,
}

impl FakeMarket {
    fn new(prices: &[(&str, f64)]) -> Self {
        Self {
            prices: prices
                .iter()
                .map(|(s, p)| (s.to_string(), *p))
                .collect(),
            candles: None,
            price_calls: AtomicUsize::new(0),
        }
    }

    fn with_candles(mut self, candles: Vec<OhlcPoint>) -> Self {
        self.candles = Some(candles);
        self
    }
}

impl MarketData for FakeMarket {
    fn current_price<'a>(
        &'a self,
        symbol: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<f64, AppError>> + Send + 'a>> {
        Box::pin(async move {
            self.price_calls.fetch_add(1, Ordering::SeqCst);
            self.prices
                .get(symbol)
                .copied()
                .ok_or_else(|| AppError::ExternalApi(format!("no ticker for {}", symbol)))
        })
    }

    fn candles<'a>(
        &'a self,
        _symbol: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<OhlcPoint>, AppError>> + Send + 'a>> {
        Box::pin(async move {
            self.candles
                .clone()
                .ok_or_else(|| AppError::ExternalApi("klines unavailable".to_string()))
        })
    }
}

fn config(coins: &[(&str, &str)]) -> Arc<Config> {
    Arc::new(Config {
        coins: coins.iter().map(|(s, n)| Coin::new(*s, *n)).collect(),
        update_interval_secs: 0,
        retry_delay_secs: 0,
        history_limit: 50,
        ..Config::from_env()
    })
}

fn seed(store: &SqliteStore, symbol: &str, prices: &[f64]) {
    let now = Utc::now();
    let count = prices.len() as i64;
    for (i, price) in prices.iter().enumerate() {
        let ts = now - Duration::minutes(count - i as i64);
        store
            .save_price(symbol, &PriceSample::new(ts, *price))
            .unwrap();
    }
}

#[tokio::test]
async fn test_first_sample_waits_for_history() {
    let store = Arc::new(SqliteStore::new_in_memory().unwrap());
    let market = Arc::new(FakeMarket::new(&[("BTC", 64_000.0)]));
    let monitor = Monitor::new(config(&[("BTC", "Bitcoin")]), market, store.clone());

    let report = monitor
        .analyze_symbol(&Coin::new("BTC", "Bitcoin"))
        .await
        .unwrap();

    assert_eq!(report.price, 64_000.0);
    assert_eq!(report.history_len, 1);
    assert_eq!(report.evaluation.recommendation.action, Action::Wait);
    assert_eq!(store.count("BTC").unwrap(), 1);
}

#[tokio::test]
async fn test_seeded_history_produces_indicators() {
    let store = Arc::new(SqliteStore::new_in_memory().unwrap());
    let prices: Vec<f64> = (0..40).map(|i| 100.0 + (i % 5) as f64).collect();
    seed(&store, "ETH", &prices);

    let market = Arc::new(FakeMarket::new(&[("ETH", 102.0)]));
    let monitor = Monitor::new(config(&[("ETH", "Ethereum")]), market, store.clone());

    let report = monitor
        .analyze_symbol(&Coin::new("ETH", "Ethereum"))
        .await
        .unwrap();

    assert_eq!(report.history_len, 41);
    assert!(report.evaluation.indicators.is_some());
    assert_ne!(report.evaluation.recommendation.action, Action::Wait);
    // Candles failed, so no trend but the evaluation still completes.
    assert!(report.evaluation.trend.is_none());
    assert!(report.evaluation.recent_range.is_none());
}

#[tokio::test]
async fn test_history_limit_bounds_series() {
    let store = Arc::new(SqliteStore::new_in_memory().unwrap());
    seed(&store, "SOL", &vec![150.0; 80]);

    let market = Arc::new(FakeMarket::new(&[("SOL", 150.0)]));
    let monitor = Monitor::new(config(&[("SOL", "Solana")]), market, store);

    let report = monitor
        .analyze_symbol(&Coin::new("SOL", "Solana"))
        .await
        .unwrap();
    assert_eq!(report.history_len, 50);
}

#[tokio::test]
async fn test_candles_feed_recent_range() {
    let store = Arc::new(SqliteStore::new_in_memory().unwrap());
    let candles: Vec<OhlcPoint> = (0..30)
        .map(|i| OhlcPoint {
            time: i * 3_600_000,
            open: 100.0,
            high: 110.0,
            low: 90.0,
            close: 100.0,
            volume: None,
        })
        .collect();
    let market = Arc::new(FakeMarket::new(&[("BTC", 100.0)]).with_candles(candles));
    let monitor = Monitor::new(config(&[("BTC", "Bitcoin")]), market, store);

    let report = monitor
        .analyze_symbol(&Coin::new("BTC", "Bitcoin"))
        .await
        .unwrap();
    let range = report.evaluation.recent_range.unwrap();
    assert_eq!(range.next_resistance, Some(110.0));
    assert_eq!(range.next_support, Some(90.0));
    assert!(!report.evaluation.trend.unwrap().has_trend);
}

#[tokio::test]
async fn test_cycle_isolates_failures() {
    let store = Arc::new(SqliteStore::new_in_memory().unwrap());
    let market = Arc::new(FakeMarket::new(&[("BTC", 64_000.0), ("SOL", 150.0)]));
    let monitor = Monitor::new(
        config(&[("BTC", "Bitcoin"), ("ETH", "Ethereum"), ("SOL", "Solana")]),
        market,
        store.clone(),
    );

    let results = monitor.run_cycle().await;

    let symbols: Vec<&str> = results.iter().map(|(c, _)| c.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["BTC", "ETH", "SOL"]);
    assert!(results[0].1.is_ok());
    assert!(matches!(results[1].1, Err(AppError::ExternalApi(_))));
    assert!(results[2].1.is_ok());
    assert_eq!(store.count("ETH").unwrap(), 0);
    assert_eq!(store.count("SOL").unwrap(), 1);
}

#[tokio::test]
async fn test_run_until_stops_on_shutdown() {
    let store = Arc::new(SqliteStore::new_in_memory().unwrap());
    let market = Arc::new(FakeMarket::new(&[("BTC", 64_000.0)]));
    let monitor = Monitor::new(config(&[("BTC", "Bitcoin")]), market.clone(), store.clone());

    let (tx, rx) = tokio::sync::oneshot::channel::<()>();
    let mut tx = Some(tx);
    let mut cycles = 0;

    monitor
        .run_until(
            async {
                let _ = rx.await;
            },
            |results| {
                cycles += 1;
                assert_eq!(results.len(), 1);
                if cycles == 3 {
                    if let Some(tx) = tx.take() {
                        let _ = tx.send(());
                    }
                }
            },
        )
        .await
        .unwrap();

    assert!(cycles >= 3);
    assert!(market.price_calls.load(Ordering::SeqCst) >= 3);
    assert_eq!(store.count("BTC").unwrap(), cycles as usize);
}

#[tokio::test]
async fn test_run_until_without_coins_fails() {
    let store = Arc::new(SqliteStore::new_in_memory().unwrap());
    let market = Arc::new(FakeMarket::new(&[]));
    let monitor = Monitor::new(config(&[]), market, store);

    let err = monitor
        .run_until(std::future::pending::<()>(), |_| {})
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}
