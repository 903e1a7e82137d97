use crate::services::SignalParams;
use std::env;
use std::str::FromStr;

/// Coins monitored when `SUPPORTED_COINS` is not set.
pub const DEFAULT_COINS: &[(&str, &str)] = &[
    ("BTC", "Bitcoin"),
    ("ETH", "Ethereum"),
    ("BNB", "Binance Coin"),
    ("SOL", "Solana"),
    ("XRP", "Ripple"),
    ("USDC", "USD Coin"),
    ("ADA", "Cardano"),
    ("AVAX", "Avalanche"),
    ("DOGE", "Dogecoin"),
    ("TRX", "TRON"),
    ("LTC", "Litecoin"),
];

/// A monitored coin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coin {
    /// Base asset symbol, e.g. `BTC`.
    pub symbol: String,
    /// Display name.
    pub name: String,
}

impl Coin {
    pub fn new(symbol: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Binance API key, sent as `X-MBX-APIKEY` when present.
    pub binance_api_key: Option<String>,
    /// Binance REST base URL.
    pub binance_api_url: String,
    /// Quote asset appended to every symbol.
    pub quote_asset: String,
    /// SQLite database path.
    pub db_path: String,
    /// Directory for the log file.
    pub log_dir: String,
    /// Seconds between monitoring cycles.
    pub update_interval_secs: u64,
    /// Seconds to wait after a failed cycle.
    pub retry_delay_secs: u64,
    /// Samples loaded from history per evaluation.
    pub history_limit: usize,
    /// Kline interval for the trend detector (e.g. `1h`).
    pub kline_interval: String,
    /// Klines requested per evaluation.
    pub kline_limit: usize,
    /// Coins to monitor, in display order.
    pub coins: Vec<Coin>,
    /// Signal engine parameters.
    pub signals: SignalParams,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        // Format: "BTC:Bitcoin,ETH:Ethereum"
        let coins = env::var("SUPPORTED_COINS")
            .ok()
            .map(|s| parse_coins(&s))
            .filter(|coins| !coins.is_empty())
            .unwrap_or_else(default_coins);

        let defaults = SignalParams::default();

        Self {
            binance_api_key: env::var("BINANCE_API_KEY").ok().filter(|k| !k.is_empty()),
            binance_api_url: env::var("BINANCE_API_URL")
                .unwrap_or_else(|_| "https://api.binance.com/api/v3".to_string()),
            quote_asset: env::var("QUOTE_ASSET").unwrap_or_else(|_| "USDT".to_string()),
            db_path: env::var("DB_PATH").unwrap_or_else(|_| "data/price_history.db".to_string()),
            log_dir: env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string()),
            update_interval_secs: env_or("UPDATE_INTERVAL_SECS", 60),
            retry_delay_secs: env_or("RETRY_DELAY_SECS", 10),
            history_limit: env_or("HISTORY_LIMIT", 50),
            kline_interval: env::var("KLINE_INTERVAL").unwrap_or_else(|_| "1h".to_string()),
            kline_limit: env_or("KLINE_LIMIT", 100),
            coins,
            signals: SignalParams {
                rsi_period: env_or("RSI_PERIOD", defaults.rsi_period),
                macd_fast: env_or("MACD_FAST", defaults.macd_fast),
                macd_slow: env_or("MACD_SLOW", defaults.macd_slow),
                macd_signal: env_or("MACD_SIGNAL", defaults.macd_signal),
                level_margin: env_or("LEVEL_MARGIN", defaults.level_margin),
                trend_ema_period: env_or("TREND_EMA_PERIOD", defaults.trend_ema_period),
                trend_atr_period: env_or("TREND_ATR_PERIOD", defaults.trend_atr_period),
                trend_threshold: env_or("TREND_THRESHOLD", defaults.trend_threshold),
                ..defaults
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

pub fn default_coins() -> Vec<Coin> {
    DEFAULT_COINS
        .iter()
        .map(|(symbol, name)| Coin::new(*symbol, *name))
        .collect()
}

/// Parse `SYM:Name,SYM:Name`. A bare symbol uses itself as the name;
/// empty entries are skipped.
pub fn parse_coins(raw: &str) -> Vec<Coin> {
    raw.split(',')
        .filter_map(|entry| {
            let mut parts = entry.splitn(2, ':');
            let symbol = parts.next()?.trim().to_uppercase();
            if symbol.is_empty() {
                return None;
            }
            let name = parts
                .next()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| symbol.clone());
            Some(Coin { symbol, name })
        })
        .collect()
}
