use chrono::Utc;
use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{Clear, ClearType},
};
use crypto_monitor::config::Config;
use crypto_monitor::report;
use crypto_monitor::services::{Monitor, SqliteStore};
use crypto_monitor::sources::BinanceClient;
use std::fs::OpenOptions;
use std::io::{stdout, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Arc::new(Config::from_env());

    // Initialize tracing: console plus an appended log file
    std::fs::create_dir_all(&config.log_dir)?;
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(Path::new(&config.log_dir).join("crypto_monitor.log"))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "crypto_monitor=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(log_file)),
        )
        .init();

    info!(
        "Starting crypto monitor: {} coins, quote {}, history {}",
        config.coins.len(),
        config.quote_asset,
        config.history_limit
    );

    let store = Arc::new(SqliteStore::new(&config.db_path)?);
    let client = Arc::new(BinanceClient::new(
        config.binance_api_url.clone(),
        config.binance_api_key.clone(),
        config.quote_asset.clone(),
        config.kline_interval.clone(),
        config.kline_limit,
    ));

    let monitor = Monitor::new(config.clone(), client, store);

    monitor
        .run(|results| {
            let mut out = stdout();
            if let Err(e) = execute!(out, Clear(ClearType::All), MoveTo(0, 0)) {
                warn!("Unable to clear terminal: {}", e);
            }
            let rendered = report::render_cycle(Utc::now(), results);
            if let Err(e) = write!(out, "{}", rendered).and_then(|_| out.flush()) {
                warn!("Unable to write report to stdout: {}", e);
            }
        })
        .await?;

    info!("Crypto monitor stopped");
    Ok(())
}
