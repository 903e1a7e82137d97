//! Technical indicator implementations.

pub mod atr;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use atr::Atr;
pub use ema::Ema;
pub use macd::{Macd, MacdValue};
pub use rsi::Rsi;

use super::SignalParams;
use crate::types::IndicatorSet;

/// A technical indicator computed over a most-recent-last slice.
pub trait Indicator<T>: Send + Sync {
    /// Value produced from the latest point of the input.
    type Output;

    /// Unique identifier for this indicator.
    fn id(&self) -> &str;

    /// Minimum number of input points required for calculation.
    fn min_periods(&self) -> usize;

    /// Calculate the latest value.
    /// Returns None if there is not enough data.
    fn calculate(&self, data: &[T]) -> Option<Self::Output>;
}

/// Computes RSI and MACD for a closing-price series.
#[derive(Debug, Clone)]
pub struct IndicatorCalculator {
    rsi: Rsi,
    macd: Macd,
}

impl IndicatorCalculator {
    pub fn new(params: &SignalParams) -> Self {
        Self {
            rsi: Rsi::new(params.rsi_period),
            macd: Macd::new(params.macd_fast, params.macd_slow, params.macd_signal),
        }
    }

    /// Shortest series accepted: `max(rsi_period, macd_slow) + 1`.
    pub fn min_periods(&self) -> usize {
        self.rsi.min_periods().max(self.macd.min_periods())
    }

    /// Latest indicator values, or `None` for insufficient data.
    pub fn calculate(&self, closes: &[f64]) -> Option<IndicatorSet> {
        if closes.len() < self.min_periods() {
            return None;
        }
        let rsi = self.rsi.calculate(closes)?;
        let macd = self.macd.calculate(closes)?;
        Some(IndicatorSet {
            rsi,
            macd: macd.macd,
            signal: macd.signal,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_min_periods() {
        let calc = IndicatorCalculator::new(&SignalParams::default());
        assert_eq!(calc.min_periods(), 27);
    }

    #[test]
    fn test_insufficient_data() {
        let calc = IndicatorCalculator::new(&SignalParams::default());
        let closes: Vec<f64> = (0..26).map(|i| 100.0 + i as f64).collect();
        assert!(calc.calculate(&closes).is_none());
    }

    #[test]
    fn test_increasing_series() {
        let calc = IndicatorCalculator::new(&SignalParams::default());
        let closes: Vec<f64> = (0..27).map(|i| 100.0 + i as f64).collect();
        let set = calc.calculate(&closes).unwrap();
        assert_eq!(set.rsi, 100.0);
        assert!(set.macd > 0.0);
    }

    #[test]
    fn test_decreasing_series() {
        let calc = IndicatorCalculator::new(&SignalParams::default());
        let closes: Vec<f64> = (0..40).map(|i| 200.0 - i as f64).collect();
        let set = calc.calculate(&closes).unwrap();
        assert_eq!(set.rsi, 0.0);
        assert!(set.macd < 0.0);
    }

    #[test]
    fn test_custom_periods_change_minimum() {
        let params = SignalParams {
            rsi_period: 30,
            ..SignalParams::default()
        };
        let calc = IndicatorCalculator::new(&params);
        assert_eq!(calc.min_periods(), 31);
    }
}
