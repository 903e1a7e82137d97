//! Console rendering of monitoring cycles.
//!
//! Everything renders to `String`; the binary decides where it goes.

use crate::config::Coin;
use crate::error::AppError;
use crate::services::monitor::{CycleResults, SymbolReport};
use crate::types::{
    Action, AlertSeverity, Evaluation, IndicatorSet, RiskLevel, TrendAssessment, VariationLabel,
};
use chrono::{DateTime, Local, Utc};
use crossterm::style::Stylize;
use std::fmt::Write;

const RULE: &str = "============================================================";

/// Header printed above each cycle.
pub fn render_banner(now: DateTime<Utc>, coins: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", RULE.cyan());
    let _ = writeln!(out, "{}", "  CRYPTO MONITOR  technical signals".cyan().bold());
    let _ = writeln!(
        out,
        "  {} | {} coins",
        now.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S"),
        coins
    );
    let _ = writeln!(out, "{}", RULE.cyan());
    out
}

/// Full report for one cycle.
pub fn render_cycle(now: DateTime<Utc>, results: &CycleResults) -> String {
    let mut out = render_banner(now, results.len());
    for (coin, result) in results {
        out.push('\n');
        match result {
            Ok(report) => out.push_str(&render_symbol(report)),
            Err(e) => out.push_str(&render_error(coin, e)),
        }
    }
    out
}

pub fn render_error(coin: &Coin, error: &AppError) -> String {
    format!(
        "{} {}\n  {}\n",
        format!("{} ({})", coin.name, coin.symbol).magenta().bold(),
        "unavailable".red(),
        error.to_string().dark_grey()
    )
}

/// Block for a single coin.
pub fn render_symbol(report: &SymbolReport) -> String {
    let eval = &report.evaluation;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{}",
        format!("{} ({})", report.coin.name, report.coin.symbol)
            .magenta()
            .bold()
    );
    let _ = writeln!(
        out,
        "  Price: {}{}  {}",
        format_price(report.price).bold(),
        variation_line(eval),
        format!("[{} samples]", report.history_len).dark_grey()
    );

    render_alerts(&mut out, eval);

    match eval.indicators {
        Some(ref ind) => render_indicators(&mut out, ind),
        None => {
            let _ = writeln!(out, "  {}", "Indicators: not enough history yet".dark_grey());
        }
    }

    if let Some(ref levels) = eval.levels {
        let _ = writeln!(
            out,
            "  Support: {} ({:+.2}%)  Resistance: {} ({:+.2}%)",
            format_price(levels.support).green(),
            levels.distance_to_support_pct,
            format_price(levels.resistance).red(),
            levels.distance_to_resistance_pct
        );
    }

    if let Some(ref range) = eval.recent_range {
        let next = |level: Option<f64>| level.map(format_price).unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "  Recent range: next resistance {}, next support {}",
            next(range.next_resistance),
            next(range.next_support)
        );
    }

    if let Some(ref trend) = eval.trend {
        let _ = writeln!(out, "  Trend: {}", trend_line(trend));
    }

    render_recommendation(&mut out, eval);
    out
}

fn variation_line(eval: &Evaluation) -> String {
    match eval.variation {
        Some(ref v) => {
            let text = format!("  {:+.2}% {}", v.change_pct, v.label.label());
            match v.label {
                VariationLabel::SignificantRise | VariationLabel::SlightRise => {
                    text.green().to_string()
                }
                VariationLabel::SignificantDrop | VariationLabel::SlightDrop => {
                    text.red().to_string()
                }
                VariationLabel::Stable => text.dark_grey().to_string(),
            }
        }
        None => String::new(),
    }
}

fn render_alerts(out: &mut String, eval: &Evaluation) {
    if eval.alerts.is_empty() {
        return;
    }
    let _ = writeln!(out, "  {}", "Alerts:".bold());
    for alert in &eval.alerts {
        let line = format!("{}: {}", alert.category.name(), alert.message);
        let _ = match alert.severity {
            AlertSeverity::Warning => writeln!(out, "    {} {}", "!".yellow().bold(), line.yellow()),
            AlertSeverity::Info => writeln!(out, "    {} {}", "i".blue(), line),
        };
    }
}

fn render_indicators(out: &mut String, ind: &IndicatorSet) {
    let zone = if ind.rsi > 70.0 {
        "overbought".red()
    } else if ind.rsi < 30.0 {
        "oversold".green()
    } else {
        "neutral".dark_grey()
    };
    let _ = writeln!(out, "  RSI: {:.2} ({})", ind.rsi, zone);

    let cross = if ind.macd > ind.signal {
        "bullish".green()
    } else if ind.macd < ind.signal {
        "bearish".red()
    } else {
        "flat".dark_grey()
    };
    let _ = writeln!(
        out,
        "  MACD: {:.4}  signal {:.4}  ({})",
        ind.macd, ind.signal, cross
    );
}

fn trend_line(trend: &TrendAssessment) -> String {
    let status = if trend.has_trend {
        "confirmed"
    } else {
        "not confirmed"
    };
    format!(
        "{} {} (slope {:+.2}%/bar, volatility {:.2}%)",
        trend.direction.label(),
        status,
        trend.normalized_slope * 100.0,
        trend.volatility_ratio * 100.0
    )
}

fn render_recommendation(out: &mut String, eval: &Evaluation) {
    let rec = &eval.recommendation;
    let action = match rec.action {
        Action::Buy => rec.action.label().green().bold(),
        Action::Sell => rec.action.label().red().bold(),
        Action::Hold => rec.action.label().yellow().bold(),
        Action::Wait => rec.action.label().dark_grey().bold(),
    };
    let risk = match rec.risk {
        RiskLevel::Low => rec.risk.label().green(),
        RiskLevel::Medium => rec.risk.label().yellow(),
        RiskLevel::High => rec.risk.label().red(),
    };

    let _ = writeln!(
        out,
        "  Recommendation: {}  confidence {}/5  risk {}",
        action,
        rec.confidence.unsigned_abs(),
        risk
    );
    for signal in &rec.signals {
        let _ = writeln!(out, "    - {}", signal);
    }
    if let Some(target) = rec.target_price {
        let _ = writeln!(out, "  Target: {}", format_price(target).green());
    }
    if let Some(stop) = rec.stop_loss {
        let _ = writeln!(out, "  Stop loss: {}", format_price(stop).red());
    }
    if rec.action == Action::Buy {
        let _ = writeln!(
            out,
            "  {}",
            "Signals are not advice. Size positions to what you can afford to lose."
                .dark_grey()
                .italic()
        );
    }
}

/// Two decimals for prices of at least 1, more for sub-unit prices.
pub fn format_price(price: f64) -> String {
    if price.abs() >= 1.0 {
        format!("${:.2}", price)
    } else {
        format!("${:.6}", price)
    }
}
