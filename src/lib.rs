//! crypto-monitor - cryptocurrency price monitor with technical trading signals

pub mod config;
pub mod error;
pub mod report;
pub mod services;
pub mod sources;
pub mod types;

// Re-export commonly used types
pub use error::{AppError, Result};
pub use services::{SignalEngine, SignalParams};
pub use types::*;
