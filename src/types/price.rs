use crate::error::{AppError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single recorded price for an instrument.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceSample {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}

impl PriceSample {
    pub fn new(timestamp: DateTime<Utc>, price: f64) -> Self {
        Self { timestamp, price }
    }
}

/// Time-ordered price history for one instrument.
///
/// Samples are always held oldest-first, most-recent-last. Storage and
/// market-data collaborators may hand samples over in either order; the
/// constructors normalize (or reject) them so nothing downstream has to
/// guess which end is the latest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPriceSeries")]
pub struct PriceSeries {
    samples: Vec<PriceSample>,
}

/// Unvalidated wire form; deserialization goes through `from_samples`.
#[derive(Deserialize)]
struct RawPriceSeries {
    samples: Vec<PriceSample>,
}

impl TryFrom<RawPriceSeries> for PriceSeries {
    type Error = AppError;

    fn try_from(raw: RawPriceSeries) -> Result<Self> {
        Self::from_samples(raw.samples)
    }
}

impl PriceSeries {
    /// Build a series from samples in any order.
    ///
    /// Every price must be finite and non-negative. Samples are sorted by
    /// timestamp ascending; samples sharing a timestamp keep their
    /// relative order.
    pub fn from_samples(mut samples: Vec<PriceSample>) -> Result<Self> {
        validate_prices(&samples)?;
        samples.sort_by_key(|s| s.timestamp);
        Ok(Self { samples })
    }

    /// Build a series from samples that must already be oldest-first.
    pub fn from_ordered(samples: Vec<PriceSample>) -> Result<Self> {
        validate_prices(&samples)?;
        if let Some(pos) = samples
            .windows(2)
            .position(|pair| pair[1].timestamp < pair[0].timestamp)
        {
            return Err(AppError::MalformedInput(format!(
                "timestamps out of order at index {}: {} after {}",
                pos + 1,
                samples[pos + 1].timestamp,
                samples[pos].timestamp
            )));
        }
        Ok(Self { samples })
    }

    pub fn samples(&self) -> &[PriceSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Prices, oldest first.
    pub fn prices(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.price).collect()
    }

    pub fn latest(&self) -> Option<&PriceSample> {
        self.samples.last()
    }

    pub fn oldest(&self) -> Option<&PriceSample> {
        self.samples.first()
    }
}

fn validate_prices(samples: &[PriceSample]) -> Result<()> {
    match samples
        .iter()
        .find(|s| !s.price.is_finite() || s.price < 0.0)
    {
        Some(bad) => Err(AppError::MalformedInput(format!(
            "invalid price {} at {}",
            bad.price, bad.timestamp
        ))),
        None => Ok(()),
    }
}

/// OHLC (Open, High, Low, Close) data point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OhlcPoint {
    /// Open time, unix milliseconds.
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}
