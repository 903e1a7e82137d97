//! Exponential Moving Average (EMA) indicator.

use super::Indicator;

/// EMA (Exponential Moving Average).
///
/// Recursive average with smoothing factor `2 / (span + 1)`, seeded by
/// the first value of the input rather than by an SMA window.
#[derive(Debug, Clone, Copy)]
pub struct Ema {
    span: usize,
}

impl Ema {
    pub fn new(span: usize) -> Self {
        Self { span }
    }

    /// EMA value at every point of `values`. Same length as the input.
    pub fn series(&self, values: &[f64]) -> Vec<f64> {
        let multiplier = 2.0 / (self.span as f64 + 1.0);
        let mut ema = Vec::with_capacity(values.len());

        let mut iter = values.iter();
        if let Some(&first) = iter.next() {
            let mut prev = first;
            ema.push(prev);
            for &value in iter {
                prev = (value - prev) * multiplier + prev;
                ema.push(prev);
            }
        }

        ema
    }
}

impl Indicator<f64> for Ema {
    type Output = f64;

    fn id(&self) -> &str {
        "ema"
    }

    fn min_periods(&self) -> usize {
        1
    }

    fn calculate(&self, data: &[f64]) -> Option<f64> {
        self.series(data).last().copied()
    }
}
