//! Recommendation engine: additive confidence scoring with a trend gate.

use super::indicators::sma::{mean, std_dev};
use crate::types::{
    Action, IndicatorSet, LevelSet, Recommendation, RiskLevel, TrendAssessment, TrendDirection,
};

pub const OVERSOLD_RSI: f64 = 30.0;
pub const OVERBOUGHT_RSI: f64 = 70.0;

/// Confidence at or above this is a buy.
pub const BUY_CONFIDENCE: i8 = 3;
/// Confidence at or below this is a sell.
pub const SELL_CONFIDENCE: i8 = -3;

/// Coefficient of variation (in percent) reported as high volatility.
const HIGH_VOLATILITY_PCT: f64 = 5.0;
/// Upside to resistance needed before a confirmed uptrend becomes a buy.
const MIN_TREND_UPSIDE_PCT: f64 = 5.0;
const STOP_LOSS_FACTOR: f64 = 0.95;

const RSI_WEIGHT: i8 = 2;
const MACD_WEIGHT: i8 = 1;
const LEVEL_WEIGHT: i8 = 2;

/// Independent bullish/bearish rules summed into a confidence score,
/// with the reason for each rule that fired.
pub fn score(
    indicators: &IndicatorSet,
    levels: &LevelSet,
    current_price: f64,
    prices: &[f64],
) -> (i8, Vec<String>) {
    let mut confidence = 0i8;
    let mut signals = Vec::new();

    if indicators.rsi < OVERSOLD_RSI {
        confidence += RSI_WEIGHT;
        signals.push(format!("RSI oversold ({:.1})", indicators.rsi));
    } else if indicators.rsi > OVERBOUGHT_RSI {
        confidence -= RSI_WEIGHT;
        signals.push(format!("RSI overbought ({:.1})", indicators.rsi));
    }

    // An exact tie is no crossover either way.
    if indicators.macd > indicators.signal {
        confidence += MACD_WEIGHT;
        signals.push("MACD positive crossover".to_string());
    } else if indicators.macd < indicators.signal {
        confidence -= MACD_WEIGHT;
        signals.push("MACD negative crossover".to_string());
    }

    if let Some(volatility) = volatility_pct(prices) {
        if volatility > HIGH_VOLATILITY_PCT {
            signals.push(format!("high volatility ({:.1}%)", volatility));
        }
    }

    if current_price < levels.support {
        confidence += LEVEL_WEIGHT;
        signals.push("price below support (reversal bias)".to_string());
    }
    if current_price > levels.resistance {
        confidence -= LEVEL_WEIGHT;
        signals.push("price above resistance (reversal bias)".to_string());
    }

    if levels.inverted {
        signals.push("narrow range: support above resistance".to_string());
    }

    (confidence, signals)
}

/// Discrete action for an additive confidence score.
pub fn action_for(confidence: i8) -> Action {
    if confidence >= BUY_CONFIDENCE {
        Action::Buy
    } else if confidence <= SELL_CONFIDENCE {
        Action::Sell
    } else {
        Action::Hold
    }
}

/// Build the recommendation.
///
/// A confirmed uptrend overrides the additive score: it buys when
/// resistance is more than 5% away and waits otherwise. Every other case
/// falls back to the score thresholds with low risk and no targets.
pub fn recommend(
    indicators: &IndicatorSet,
    levels: &LevelSet,
    current_price: f64,
    prices: &[f64],
    trend: Option<&TrendAssessment>,
) -> Recommendation {
    let (confidence, mut signals) = score(indicators, levels, current_price, prices);

    match trend.filter(|t| t.has_trend).map(|t| t.direction) {
        Some(TrendDirection::Up) => {
            let upside_pct = levels.distance_to_resistance_pct;
            if upside_pct > MIN_TREND_UPSIDE_PCT {
                signals.push(format!(
                    "confirmed uptrend, {:.2}% upside to resistance {:.2}",
                    upside_pct, levels.resistance
                ));
                return Recommendation {
                    action: Action::Buy,
                    confidence,
                    risk: RiskLevel::Medium,
                    target_price: Some(levels.resistance),
                    stop_loss: Some(current_price * STOP_LOSS_FACTOR),
                    signals,
                };
            }

            signals.push(format!(
                "confirmed uptrend but resistance within {:.2}%, wait for a pullback",
                upside_pct
            ));
            Recommendation {
                action: Action::Wait,
                confidence,
                risk: RiskLevel::High,
                target_price: None,
                stop_loss: None,
                signals,
            }
        }
        Some(TrendDirection::Down) => {
            signals.push("confirmed downtrend".to_string());
            additive(confidence, signals)
        }
        None => additive(confidence, signals),
    }
}

fn additive(confidence: i8, signals: Vec<String>) -> Recommendation {
    Recommendation {
        action: action_for(confidence),
        confidence,
        risk: RiskLevel::Low,
        target_price: None,
        stop_loss: None,
        signals,
    }
}

/// Standard deviation as a percentage of the mean.
fn volatility_pct(prices: &[f64]) -> Option<f64> {
    let mean = mean(prices)?;
    if mean <= 0.0 {
        return None;
    }
    Some(std_dev(prices)? / mean * 100.0)
}
