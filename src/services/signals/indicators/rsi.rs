//! Relative Strength Index (RSI) indicator.

use super::sma::sma_last;
use super::Indicator;

/// RSI over the last `period` price changes, bounded to 0-100.
///
/// Gains and losses are averaged with a plain rolling mean over `period`
/// deltas, not Wilder's smoothing, so values differ from most charting
/// packages on the same data.
#[derive(Debug, Clone, Copy)]
pub struct Rsi {
    period: usize,
}

impl Default for Rsi {
    fn default() -> Self {
        Self { period: 14 }
    }
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    /// Calculate RSI value from the last `period` price changes.
    fn calculate_rsi(closes: &[f64], period: usize) -> Option<f64> {
        if period == 0 || closes.len() < period + 1 {
            return None;
        }

        let window = &closes[closes.len() - period - 1..];
        let mut gains = Vec::with_capacity(period);
        let mut losses = Vec::with_capacity(period);

        for pair in window.windows(2) {
            let change = pair[1] - pair[0];
            if change > 0.0 {
                gains.push(change);
                losses.push(0.0);
            } else {
                gains.push(0.0);
                losses.push(-change);
            }
        }

        let avg_gain = sma_last(&gains, period)?;
        let avg_loss = sma_last(&losses, period)?;

        if avg_loss == 0.0 {
            // No movement at all is neutral; gains without losses are maximal strength.
            return Some(if avg_gain == 0.0 { 50.0 } else { 100.0 });
        }

        let rs = avg_gain / avg_loss;
        Some(100.0 - (100.0 / (1.0 + rs)))
    }
}

impl Indicator<f64> for Rsi {
    type Output = f64;

    fn id(&self) -> &str {
        "rsi"
    }

    fn min_periods(&self) -> usize {
        self.period + 1
    }

    fn calculate(&self, data: &[f64]) -> Option<f64> {
        Self::calculate_rsi(data, self.period)
    }
}
