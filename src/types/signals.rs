use serde::{Deserialize, Serialize};

/// Latest values of the momentum indicators for a price series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    /// Relative Strength Index, 0-100.
    pub rsi: f64,
    /// MACD line (fast EMA - slow EMA).
    pub macd: f64,
    /// Signal line (EMA of the MACD line).
    pub signal: f64,
}

impl IndicatorSet {
    /// MACD minus signal line.
    pub fn histogram(&self) -> f64 {
        self.macd - self.signal
    }
}

/// Support and resistance derived from the extremes of a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelSet {
    pub support: f64,
    pub resistance: f64,
    /// `(current - support) / current * 100`. Negative once price is below support.
    pub distance_to_support_pct: f64,
    /// `(resistance - current) / current * 100`. Negative once price is above resistance.
    pub distance_to_resistance_pct: f64,
    /// Set when the range is too narrow for the margin and support ends
    /// up above resistance.
    pub inverted: bool,
}

/// Nearest levels from the recent high/low window of OHLC data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentRange {
    /// Highest recent high, only when above the current price.
    pub next_resistance: Option<f64>,
    /// Lowest recent low, only when below the current price.
    pub next_support: Option<f64>,
}

/// Direction of a detected trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Up,
    Down,
}

impl TrendDirection {
    pub fn label(&self) -> &'static str {
        match self {
            TrendDirection::Up => "up",
            TrendDirection::Down => "down",
        }
    }
}

/// Result of the trend detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendAssessment {
    /// Directional move that clears the volatility filter.
    pub has_trend: bool,
    pub direction: TrendDirection,
    /// EMA slope per bar relative to the last close.
    pub normalized_slope: f64,
    /// ATR relative to the last close.
    pub volatility_ratio: f64,
}

impl TrendAssessment {
    /// Confirmed trend pointing up.
    pub fn is_confirmed_up(&self) -> bool {
        self.has_trend && self.direction == TrendDirection::Up
    }
}

/// Recommended action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Buy,
    Sell,
    Hold,
    Wait,
}

impl Action {
    /// Get display label.
    pub fn label(&self) -> &'static str {
        match self {
            Action::Buy => "BUY",
            Action::Sell => "SELL",
            Action::Hold => "HOLD",
            Action::Wait => "WAIT",
        }
    }
}

/// Risk attached to a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }
}

/// Trading recommendation for one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub action: Action,
    /// Sum of independent bullish (+) and bearish (-) signals.
    pub confidence: i8,
    pub risk: RiskLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_loss: Option<f64>,
    /// Reasons, in the order they were evaluated.
    pub signals: Vec<String>,
}

impl Recommendation {
    /// Neutral recommendation used when there is not enough history.
    pub fn insufficient_data() -> Self {
        Self {
            action: Action::Wait,
            confidence: 0,
            risk: RiskLevel::Low,
            target_price: None,
            stop_loss: None,
            signals: vec!["insufficient data".to_string()],
        }
    }
}

/// Alert category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertCategory {
    PriceProximity,
    Momentum,
    TrendStrength,
}

impl AlertCategory {
    pub fn name(&self) -> &'static str {
        match self {
            AlertCategory::PriceProximity => "Price proximity",
            AlertCategory::Momentum => "Momentum",
            AlertCategory::TrendStrength => "Trend strength",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Info,
    Warning,
}

/// A human-facing alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub category: AlertCategory,
    pub severity: AlertSeverity,
    pub message: String,
}

impl Alert {
    pub fn warning(category: AlertCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            severity: AlertSeverity::Warning,
            message: message.into(),
        }
    }

    pub fn info(category: AlertCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            severity: AlertSeverity::Info,
            message: message.into(),
        }
    }
}

/// Alerts for one evaluation, in rule order.
pub type AlertSet = Vec<Alert>;

/// Coarse label for a price change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariationLabel {
    SignificantRise,
    SlightRise,
    Stable,
    SlightDrop,
    SignificantDrop,
}

impl VariationLabel {
    pub fn label(&self) -> &'static str {
        match self {
            VariationLabel::SignificantRise => "significant rise",
            VariationLabel::SlightRise => "slight rise",
            VariationLabel::Stable => "stable",
            VariationLabel::SlightDrop => "slight drop",
            VariationLabel::SignificantDrop => "significant drop",
        }
    }
}

/// Change of the current price against the oldest sample in the window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceVariation {
    pub change_pct: f64,
    pub reference_price: f64,
    pub label: VariationLabel,
}

/// Everything produced by one evaluation of a price series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub recommendation: Recommendation,
    pub alerts: AlertSet,
    /// `None` when the series is shorter than the indicator minimum.
    pub indicators: Option<IndicatorSet>,
    /// `None` only for an empty series.
    pub levels: Option<LevelSet>,
    /// `None` when no OHLC data was supplied or it was too short.
    pub trend: Option<TrendAssessment>,
    pub recent_range: Option<RecentRange>,
    pub variation: Option<PriceVariation>,
}
