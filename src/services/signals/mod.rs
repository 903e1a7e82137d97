//! Technical signal engine.
//!
//! Turns a price series (and optionally OHLC candles) into indicators,
//! support/resistance levels, a trend assessment, a recommendation and
//! alerts. Evaluation is a pure function of its inputs: no I/O, no shared
//! state, and it always returns a result for a validated series.

pub mod alerts;
pub mod indicators;
pub mod levels;
pub mod recommendation;
pub mod trend;
pub mod variation;

pub use alerts::generate_alerts;
pub use indicators::{Indicator, IndicatorCalculator};
pub use levels::{recent_range, LevelAnalyzer};
pub use recommendation::recommend;
pub use trend::TrendDetector;
pub use variation::price_variation;

use crate::types::{Evaluation, OhlcPoint, PriceSeries, Recommendation};

/// Tunable parameters of the signal engine.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalParams {
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    /// Fraction pulled in from the series extremes for support/resistance.
    pub level_margin: f64,
    pub trend_ema_period: usize,
    pub trend_atr_period: usize,
    pub trend_threshold: f64,
    /// Candles considered for the recent high/low range.
    pub recent_range_lookback: usize,
}

impl Default for SignalParams {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            level_margin: 0.05,
            trend_ema_period: 20,
            trend_atr_period: 14,
            trend_threshold: 0.02,
            recent_range_lookback: 20,
        }
    }
}

impl SignalParams {
    /// Shortest price series that yields indicators.
    pub fn min_samples(&self) -> usize {
        self.rsi_period.max(self.macd_slow) + 1
    }
}

/// Evaluates price series into recommendations and alerts.
#[derive(Debug, Clone)]
pub struct SignalEngine {
    params: SignalParams,
    indicators: IndicatorCalculator,
    levels: LevelAnalyzer,
    trend: TrendDetector,
}

impl Default for SignalEngine {
    fn default() -> Self {
        Self::new(SignalParams::default())
    }
}

impl SignalEngine {
    pub fn new(params: SignalParams) -> Self {
        Self {
            indicators: IndicatorCalculator::new(&params),
            levels: LevelAnalyzer::new(params.level_margin),
            trend: TrendDetector::new(
                params.trend_ema_period,
                params.trend_atr_period,
                params.trend_threshold,
            ),
            params,
        }
    }

    /// Evaluate `series` (most-recent-last) at `current_price`.
    ///
    /// `candles` feed the trend detector and the recent range; without
    /// them (or with too few) the trend is indeterminate and the
    /// recommendation relies on the additive score alone. Series shorter
    /// than two samples, or than the indicator minimum, produce a neutral
    /// WAIT.
    pub fn evaluate(
        &self,
        series: &PriceSeries,
        current_price: f64,
        candles: Option<&[OhlcPoint]>,
    ) -> Evaluation {
        let prices = series.prices();
        let levels = self.levels.analyze(&prices, current_price);
        let variation = price_variation(series, current_price);
        let trend = candles.and_then(|c| self.trend.detect(c));
        let recent_range = candles
            .and_then(|c| recent_range(c, current_price, self.params.recent_range_lookback));

        let indicators = if prices.len() < 2 {
            None
        } else {
            self.indicators.calculate(&prices)
        };

        let recommendation = match (&indicators, &levels) {
            (Some(ind), Some(lv)) => recommend(ind, lv, current_price, &prices, trend.as_ref()),
            _ => Recommendation::insufficient_data(),
        };

        let alerts = generate_alerts(
            current_price,
            levels.as_ref(),
            indicators.as_ref(),
            &recommendation,
        );

        Evaluation {
            recommendation,
            alerts,
            indicators,
            levels,
            trend,
            recent_range,
            variation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Action, OhlcPoint, PriceSample, RiskLevel};
    use chrono::{Duration, TimeZone, Utc};

    fn series(prices: &[f64]) -> PriceSeries {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        PriceSeries::from_ordered(
            prices
                .iter()
                .enumerate()
                .map(|(i, &p)| PriceSample::new(start + Duration::minutes(i as i64), p))
                .collect(),
        )
        .unwrap()
    }

    fn uptrend_candles(count: usize) -> Vec<OhlcPoint> {
        let mut close = 100.0;
        (0..count)
            .map(|i| {
                if i > 0 {
                    close *= 1.035;
                }
                OhlcPoint {
                    time: i as i64 * 3_600_000,
                    open: close,
                    high: close * 1.002,
                    low: close * 0.998,
                    close,
                    volume: None,
                }
            })
            .collect()
    }

    #[test]
    fn test_empty_series_waits() {
        let eval = SignalEngine::default().evaluate(&PriceSeries::default(), 100.0, None);
        assert_eq!(eval.recommendation.action, Action::Wait);
        assert_eq!(eval.recommendation.confidence, 0);
        assert_eq!(eval.recommendation.signals, vec!["insufficient data".to_string()]);
        assert!(eval.levels.is_none());
        assert!(eval.alerts.is_empty());
    }

    #[test]
    fn test_single_sample_waits() {
        let eval = SignalEngine::default().evaluate(&series(&[100.0]), 100.0, None);
        assert_eq!(eval.recommendation.action, Action::Wait);
        assert!(eval.indicators.is_none());
        assert!(eval.levels.is_some());
    }

    #[test]
    fn test_short_series_waits() {
        for len in [2, 14, 15, 26] {
            let prices: Vec<f64> = (0..len).map(|i| 100.0 + i as f64).collect();
            let eval = SignalEngine::default().evaluate(&series(&prices), 120.0, None);
            assert_eq!(eval.recommendation.action, Action::Wait, "len {}", len);
            assert_eq!(eval.recommendation.confidence, 0);
            assert!(eval.indicators.is_none());
        }
    }

    #[test]
    fn test_mixed_upward_series_is_not_sell() {
        let prices = [
            100.0, 101.0, 99.0, 102.0, 98.0, 103.0, 97.0, 104.0, 96.0, 105.0, 95.0, 106.0, 94.0,
            107.0,
        ];
        let eval = SignalEngine::default().evaluate(&series(&prices), 107.0, None);
        assert_ne!(eval.recommendation.action, Action::Sell);
        // 14 samples is below the RSI window.
        assert_eq!(eval.recommendation.action, Action::Wait);
    }

    #[test]
    fn test_flat_series_holds() {
        let eval = SignalEngine::default().evaluate(&series(&[100.0; 30]), 100.0, None);
        let levels = eval.levels.unwrap();
        assert_eq!(
            levels.distance_to_support_pct.abs(),
            levels.distance_to_resistance_pct.abs()
        );
        assert!(levels.inverted);
        assert_eq!(eval.recommendation.action, Action::Hold);
        assert_eq!(eval.recommendation.confidence, 0);
        assert!(!eval
            .recommendation
            .signals
            .iter()
            .any(|s| s.contains("volatility")));
        assert!(eval.alerts.is_empty());
    }

    #[test]
    fn test_monotonic_increase() {
        let prices: Vec<f64> = (0..27).map(|i| 100.0 + i as f64).collect();
        let eval = SignalEngine::default().evaluate(&series(&prices), 126.0, None);
        let ind = eval.indicators.unwrap();
        assert_eq!(ind.rsi, 100.0);
        assert!(ind.macd > 0.0);
    }

    #[test]
    fn test_monotonic_decrease() {
        let prices: Vec<f64> = (0..40).map(|i| 200.0 - i as f64).collect();
        let eval = SignalEngine::default().evaluate(&series(&prices), 161.0, None);
        let ind = eval.indicators.unwrap();
        assert_eq!(ind.rsi, 0.0);
        assert!(ind.macd < 0.0);
    }

    #[test]
    fn test_candles_feed_trend_gate() {
        // Wide price range so resistance sits well above the current price.
        let mut prices: Vec<f64> = (0..30).map(|i| 100.0 + (i % 2) as f64).collect();
        prices[0] = 150.0;
        let candles = uptrend_candles(60);
        let eval = SignalEngine::default().evaluate(&series(&prices), 100.0, Some(&candles));

        assert!(eval.trend.unwrap().is_confirmed_up());
        let levels = eval.levels.unwrap();
        assert_eq!(eval.recommendation.action, Action::Buy);
        assert_eq!(eval.recommendation.risk, RiskLevel::Medium);
        assert_eq!(eval.recommendation.target_price, Some(levels.resistance));
        assert_eq!(eval.recommendation.stop_loss, Some(100.0 * 0.95));
        assert!(eval.recent_range.is_some());
    }

    #[test]
    fn test_short_candles_leave_trend_indeterminate() {
        let prices: Vec<f64> = (0..30).map(|i| 100.0 + (i % 3) as f64).collect();
        let candles = uptrend_candles(10);
        let eval = SignalEngine::default().evaluate(&series(&prices), 101.0, Some(&candles));
        assert!(eval.trend.is_none());
        assert_eq!(eval.recommendation.risk, RiskLevel::Low);
    }

    #[test]
    fn test_variation_reported() {
        let eval = SignalEngine::default().evaluate(&series(&[100.0, 101.0]), 103.0, None);
        let variation = eval.variation.unwrap();
        assert!((variation.change_pct - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let prices: Vec<f64> = (0..50)
            .map(|i| 100.0 + (i as f64 * 0.3).sin() * 8.0)
            .collect();
        let engine = SignalEngine::default();
        let a = engine.evaluate(&series(&prices), 101.0, None);
        let b = engine.evaluate(&series(&prices), 101.0, None);
        assert_eq!(a, b);
    }

    #[test]
    fn test_min_samples() {
        assert_eq!(SignalParams::default().min_samples(), 27);
    }
}
