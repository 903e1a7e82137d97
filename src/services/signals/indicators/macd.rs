//! MACD (Moving Average Convergence Divergence) indicator.

use super::{Ema, Indicator};

/// Latest MACD and signal line values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdValue {
    pub macd: f64,
    pub signal: f64,
}

/// MACD indicator.
///
/// Shows the relationship between two EMAs:
/// - MACD Line = EMA(12) - EMA(26)
/// - Signal Line = EMA(9) of MACD Line
///
/// Buy signal: MACD above signal line
/// Sell signal: MACD below signal line
#[derive(Debug, Clone, Copy)]
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
}

impl Default for Macd {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

impl Macd {
    pub fn new(fast_period: usize, slow_period: usize, signal_period: usize) -> Self {
        Self {
            fast_period,
            slow_period,
            signal_period,
        }
    }

    /// MACD line over the whole input.
    pub fn macd_line(&self, closes: &[f64]) -> Vec<f64> {
        let fast = Ema::new(self.fast_period).series(closes);
        let slow = Ema::new(self.slow_period).series(closes);
        fast.iter().zip(slow.iter()).map(|(f, s)| f - s).collect()
    }
}

impl Indicator<f64> for Macd {
    type Output = MacdValue;

    fn id(&self) -> &str {
        "macd"
    }

    fn min_periods(&self) -> usize {
        self.slow_period + 1
    }

    fn calculate(&self, data: &[f64]) -> Option<MacdValue> {
        if data.len() < self.min_periods() {
            return None;
        }

        let macd_line = self.macd_line(data);
        let signal_line = Ema::new(self.signal_period).series(&macd_line);

        Some(MacdValue {
            macd: *macd_line.last()?,
            signal: *signal_line.last()?,
        })
    }
}
