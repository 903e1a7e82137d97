//! Price change against the oldest sample of the window.

use crate::types::{PriceSeries, PriceVariation, VariationLabel};

/// Change beyond this percentage counts as significant.
const SIGNIFICANT_CHANGE_PCT: f64 = 1.0;

/// Percentage change of `current` versus the oldest sample in `series`.
pub fn price_variation(series: &PriceSeries, current: f64) -> Option<PriceVariation> {
    let reference_price = series.oldest()?.price;
    if reference_price <= 0.0 {
        return None;
    }

    let change_pct = (current - reference_price) / reference_price * 100.0;
    let label = if change_pct > SIGNIFICANT_CHANGE_PCT {
        VariationLabel::SignificantRise
    } else if change_pct > 0.0 {
        VariationLabel::SlightRise
    } else if change_pct < -SIGNIFICANT_CHANGE_PCT {
        VariationLabel::SignificantDrop
    } else if change_pct < 0.0 {
        VariationLabel::SlightDrop
    } else {
        VariationLabel::Stable
    };

    Some(PriceVariation {
        change_pct,
        reference_price,
        label,
    })
}
