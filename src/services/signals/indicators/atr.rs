//! Average True Range (ATR) indicator.

use super::sma::sma_last;
use super::Indicator;
use crate::types::OhlcPoint;

/// ATR (Average True Range) indicator.
///
/// TR = max(High-Low, |High-PrevClose|, |Low-PrevClose|), averaged with a
/// simple moving average over `period` bars.
#[derive(Debug, Clone, Copy)]
pub struct Atr {
    period: usize,
}

impl Default for Atr {
    fn default() -> Self {
        Self { period: 14 }
    }
}

impl Atr {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    /// Calculate True Range.
    pub fn true_range(current: &OhlcPoint, previous: &OhlcPoint) -> f64 {
        let hl = current.high - current.low;
        let hc = (current.high - previous.close).abs();
        let lc = (current.low - previous.close).abs();
        hl.max(hc).max(lc)
    }
}

impl Indicator<OhlcPoint> for Atr {
    type Output = f64;

    fn id(&self) -> &str {
        "atr"
    }

    fn min_periods(&self) -> usize {
        self.period + 1
    }

    fn calculate(&self, data: &[OhlcPoint]) -> Option<f64> {
        if data.len() < self.min_periods() {
            return None;
        }

        let true_ranges: Vec<f64> = data
            .windows(2)
            .map(|pair| Self::true_range(&pair[1], &pair[0]))
            .collect();

        sma_last(&true_ranges, self.period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle(high: f64, low: f64, close: f64) -> OhlcPoint {
        OhlcPoint {
            time: 0,
            open: close,
            high,
            low,
            close,
            volume: None,
        }
    }

    #[test]
    fn test_true_range_uses_gap() {
        let prev = candle(101.0, 99.0, 100.0);
        let gap_up = candle(112.0, 110.0, 111.0);
        assert_eq!(Atr::true_range(&gap_up, &prev), 12.0);
        let inside = candle(102.0, 98.0, 100.0);
        assert_eq!(Atr::true_range(&inside, &prev), 4.0);
    }

    #[test]
    fn test_atr_min_periods() {
        let atr = Atr::default();
        assert_eq!(atr.id(), "atr");
        assert_eq!(atr.min_periods(), 15);
        let candles = vec![candle(101.0, 99.0, 100.0); 14];
        assert!(atr.calculate(&candles).is_none());
    }

    #[test]
    fn test_atr_constant_range() {
        let atr = Atr::new(3);
        let candles = vec![candle(101.0, 99.0, 100.0); 10];
        assert_eq!(atr.calculate(&candles), Some(2.0));
    }

    #[test]
    fn test_atr_simple_average_of_last_window() {
        let atr = Atr::new(2);
        let candles = vec![
            candle(101.0, 99.0, 100.0),
            candle(150.0, 90.0, 100.0), // TR 60, outside window
            candle(102.0, 98.0, 100.0), // TR 4
            candle(103.0, 97.0, 100.0), // TR 6
        ];
        assert_eq!(atr.calculate(&candles), Some(5.0));
    }
}
