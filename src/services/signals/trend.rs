//! Trend detection from OHLC data.

use super::indicators::{Atr, Ema, Indicator};
use crate::types::{OhlcPoint, TrendAssessment, TrendDirection};

/// Bars between the two EMA points used for the slope.
const SLOPE_LOOKBACK: usize = 5;

/// Classifies whether a series trends, using an EMA slope filtered by ATR.
///
/// A slope only counts as a trend when it is large relative to price
/// (`|normalized_slope| > threshold`) while volatility stays below twice
/// the threshold.
#[derive(Debug, Clone, Copy)]
pub struct TrendDetector {
    ema_period: usize,
    atr_period: usize,
    threshold: f64,
}

impl Default for TrendDetector {
    fn default() -> Self {
        Self {
            ema_period: 20,
            atr_period: 14,
            threshold: 0.02,
        }
    }
}

impl TrendDetector {
    pub fn new(ema_period: usize, atr_period: usize, threshold: f64) -> Self {
        Self {
            ema_period,
            atr_period,
            threshold,
        }
    }

    /// Never below `SLOPE_LOOKBACK + 1`, even for zero periods.
    pub fn min_periods(&self) -> usize {
        (self.ema_period + SLOPE_LOOKBACK)
            .max(self.atr_period + 1)
            .max(SLOPE_LOOKBACK + 1)
    }

    /// Assess `candles` (most-recent-last). `None` means indeterminate:
    /// too few bars or a non-positive last close.
    pub fn detect(&self, candles: &[OhlcPoint]) -> Option<TrendAssessment> {
        if candles.len() < self.min_periods() {
            return None;
        }

        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        let ema = Ema::new(self.ema_period).series(&closes);

        let last = ema.len() - 1;
        let close = closes[last];
        if close <= 0.0 {
            return None;
        }

        let slope = (ema[last] - ema[last - SLOPE_LOOKBACK]) / SLOPE_LOOKBACK as f64;
        let atr = Atr::new(self.atr_period).calculate(candles)?;

        let normalized_slope = slope / close;
        let volatility_ratio = atr / close;

        let has_trend =
            normalized_slope.abs() > self.threshold && volatility_ratio < 2.0 * self.threshold;
        let direction = if normalized_slope > 0.0 {
            TrendDirection::Up
        } else {
            TrendDirection::Down
        };

        Some(TrendAssessment {
            has_trend,
            direction,
            normalized_slope,
            volatility_ratio,
        })
    }
}
