//! Periodic monitoring loop.
//!
//! Each cycle fetches the live price of every configured coin, records it,
//! reloads the recent history and evaluates it with the signal engine.
//! Coins are analysed concurrently and independently.

use super::{PriceHistory, SignalEngine};
use crate::config::{Coin, Config};
use crate::error::{AppError, Result};
use crate::sources::MarketData;
use crate::types::{Evaluation, PriceSample};
use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Analysis of one coin in one cycle.
#[derive(Debug, Clone)]
pub struct SymbolReport {
    pub coin: Coin,
    pub price: f64,
    pub timestamp: DateTime<Utc>,
    /// Samples the evaluation was based on.
    pub history_len: usize,
    pub evaluation: Evaluation,
}

/// Outcome of one cycle, in configuration order.
pub type CycleResults = Vec<(Coin, Result<SymbolReport>)>;

pub struct Monitor {
    config: Arc<Config>,
    engine: SignalEngine,
    market: Arc<dyn MarketData>,
    history: Arc<dyn PriceHistory>,
}

impl Monitor {
    pub fn new(
        config: Arc<Config>,
        market: Arc<dyn MarketData>,
        history: Arc<dyn PriceHistory>,
    ) -> Self {
        Self {
            engine: SignalEngine::new(config.signals.clone()),
            config,
            market,
            history,
        }
    }

    /// Fetch, record and evaluate one coin.
    ///
    /// Candle failures only cost the trend assessment; price and storage
    /// failures fail the coin.
    pub async fn analyze_symbol(&self, coin: &Coin) -> Result<SymbolReport> {
        let price = self.market.current_price(&coin.symbol).await?;
        let sample = PriceSample::new(Utc::now(), price);
        self.history.save_price(&coin.symbol, &sample)?;

        let series = self
            .history
            .fetch_history(&coin.symbol, self.config.history_limit)?;

        let candles = match self.market.candles(&coin.symbol).await {
            Ok(candles) => Some(candles),
            Err(e) => {
                warn!("{}: candles unavailable, skipping trend: {}", coin.symbol, e);
                None
            }
        };

        let evaluation = self.engine.evaluate(&series, price, candles.as_deref());
        debug!(
            "{}: {} (confidence {}) over {} samples",
            coin.symbol,
            evaluation.recommendation.action.label(),
            evaluation.recommendation.confidence,
            series.len()
        );

        Ok(SymbolReport {
            coin: coin.clone(),
            price,
            timestamp: sample.timestamp,
            history_len: series.len(),
            evaluation,
        })
    }

    /// Analyse every configured coin concurrently.
    pub async fn run_cycle(&self) -> CycleResults {
        let tasks = self.config.coins.iter().map(|coin| async move {
            let result = self.analyze_symbol(coin).await;
            if let Err(ref e) = result {
                error!("{}: analysis failed: {}", coin.symbol, e);
            }
            (coin.clone(), result)
        });
        join_all(tasks).await
    }

    /// Run cycles until Ctrl-C.
    pub async fn run<F>(&self, on_cycle: F) -> Result<()>
    where
        F: FnMut(&CycleResults),
    {
        let shutdown = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Unable to listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        };
        self.run_until(shutdown, on_cycle).await
    }

    /// Run cycles until `shutdown` resolves, handing each cycle's results
    /// to `on_cycle`. A cycle in which every coin failed is followed by the
    /// retry delay instead of the update interval.
    pub async fn run_until<S, F>(&self, shutdown: S, mut on_cycle: F) -> Result<()>
    where
        S: Future<Output = ()>,
        F: FnMut(&CycleResults),
    {
        if self.config.coins.is_empty() {
            return Err(AppError::NotFound("no coins configured".to_string()));
        }

        let interval = Duration::from_secs(self.config.update_interval_secs);
        let retry_delay = Duration::from_secs(self.config.retry_delay_secs);
        info!(
            "Monitoring {} coins every {}s",
            self.config.coins.len(),
            interval.as_secs()
        );

        tokio::pin!(shutdown);
        let mut cycles: u64 = 0;

        loop {
            let results = tokio::select! {
                _ = &mut shutdown => break,
                results = self.run_cycle() => results,
            };
            cycles += 1;
            on_cycle(&results);

            let failed = results.iter().filter(|(_, r)| r.is_err()).count();
            let wait = if failed == results.len() {
                warn!(
                    "Cycle {}: all {} coins failed, retrying in {}s",
                    cycles,
                    failed,
                    retry_delay.as_secs()
                );
                retry_delay
            } else {
                debug!("Cycle {} done, {} failures", cycles, failed);
                interval
            };

            tokio::select! {
                _ = &mut shutdown => break,
                _ = tokio::time::sleep(wait) => {}
            }
        }

        info!("Monitor stopped after {} cycles", cycles);
        Ok(())
    }
}
