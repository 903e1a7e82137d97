//! Alert rules over already computed signals.
//!
//! Every rule is checked independently; all that apply are emitted.

use super::recommendation::{OVERBOUGHT_RSI, OVERSOLD_RSI};
use crate::types::{Alert, AlertCategory, AlertSet, IndicatorSet, LevelSet, Recommendation};

/// Distance to a level, in percent of price, that counts as "near".
const PROXIMITY_PCT: f64 = 1.0;
const STRONG_MACD_FACTOR: f64 = 1.5;
const STRONG_CONFIDENCE: i8 = 4;

/// Alerts for one evaluation. Missing levels or indicators simply skip
/// the rules that need them.
pub fn generate_alerts(
    current_price: f64,
    levels: Option<&LevelSet>,
    indicators: Option<&IndicatorSet>,
    recommendation: &Recommendation,
) -> AlertSet {
    let mut alerts = Vec::new();
    if let Some(levels) = levels {
        price_alerts(current_price, levels, &mut alerts);
    }
    if let Some(indicators) = indicators {
        momentum_alerts(indicators, &mut alerts);
    }
    trend_alerts(recommendation, &mut alerts);
    alerts
}

fn price_alerts(current_price: f64, levels: &LevelSet, alerts: &mut AlertSet) {
    if current_price <= 0.0 {
        return;
    }

    let support_pct = (current_price - levels.support).abs() / current_price * 100.0;
    if support_pct < PROXIMITY_PCT {
        alerts.push(Alert::warning(
            AlertCategory::PriceProximity,
            format!("price near support {:.2}", levels.support),
        ));
    }

    let resistance_pct = (levels.resistance - current_price).abs() / current_price * 100.0;
    if resistance_pct < PROXIMITY_PCT {
        alerts.push(Alert::warning(
            AlertCategory::PriceProximity,
            format!("price near resistance {:.2}", levels.resistance),
        ));
    }
}

fn momentum_alerts(indicators: &IndicatorSet, alerts: &mut AlertSet) {
    if indicators.rsi < OVERSOLD_RSI {
        alerts.push(Alert::warning(
            AlertCategory::Momentum,
            format!("RSI oversold ({:.1}), possible bounce", indicators.rsi),
        ));
    } else if indicators.rsi > OVERBOUGHT_RSI {
        alerts.push(Alert::warning(
            AlertCategory::Momentum,
            format!("RSI overbought ({:.1}), possible correction", indicators.rsi),
        ));
    }

    if indicators.macd.abs() > indicators.signal * STRONG_MACD_FACTOR {
        let direction = if indicators.macd > 0.0 {
            "bullish"
        } else {
            "bearish"
        };
        alerts.push(Alert::info(
            AlertCategory::Momentum,
            format!("strong {} MACD signal", direction),
        ));
    }
}

fn trend_alerts(recommendation: &Recommendation, alerts: &mut AlertSet) {
    let confidence = recommendation.confidence;
    if confidence >= STRONG_CONFIDENCE {
        alerts.push(Alert::info(
            AlertCategory::TrendStrength,
            "strong bullish signal, consider buying",
        ));
    } else if confidence <= -STRONG_CONFIDENCE {
        alerts.push(Alert::info(
            AlertCategory::TrendStrength,
            "strong bearish signal, consider selling",
        ));
    }
}
