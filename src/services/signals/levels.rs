//! Support and resistance levels.

use crate::types::{LevelSet, OhlcPoint, RecentRange};

/// Derives support/resistance from the extremes of a price series.
///
/// `resistance = max * (1 - margin)` and `support = min * (1 + margin)`.
/// When `max / min < (1 + margin) / (1 - margin)` the two cross and the
/// returned set is flagged `inverted`; the levels are reported as computed.
#[derive(Debug, Clone, Copy)]
pub struct LevelAnalyzer {
    margin: f64,
}

impl Default for LevelAnalyzer {
    fn default() -> Self {
        Self { margin: 0.05 }
    }
}

impl LevelAnalyzer {
    pub fn new(margin: f64) -> Self {
        Self { margin }
    }

    /// Levels for `prices` (any order) relative to `current`.
    /// Returns `None` for an empty slice.
    pub fn analyze(&self, prices: &[f64], current: f64) -> Option<LevelSet> {
        if prices.is_empty() {
            return None;
        }

        let max = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = prices.iter().copied().fold(f64::INFINITY, f64::min);

        let resistance = max * (1.0 - self.margin);
        let support = min * (1.0 + self.margin);

        // A zero current price leaves nothing to measure against.
        let (distance_to_support_pct, distance_to_resistance_pct) = if current > 0.0 {
            (
                (current - support) / current * 100.0,
                (resistance - current) / current * 100.0,
            )
        } else {
            (0.0, 0.0)
        };

        Some(LevelSet {
            support,
            resistance,
            distance_to_support_pct,
            distance_to_resistance_pct,
            inverted: support > resistance,
        })
    }
}

/// Highest high / lowest low of the last `lookback` candles, kept only
/// when they sit on the expected side of `current`.
pub fn recent_range(candles: &[OhlcPoint], current: f64, lookback: usize) -> Option<RecentRange> {
    if candles.is_empty() || lookback == 0 {
        return None;
    }

    let window = &candles[candles.len().saturating_sub(lookback)..];
    let high = window.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max);
    let low = window.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);

    Some(RecentRange {
        next_resistance: (high > current).then_some(high),
        next_support: (low < current).then_some(low),
    })
}
