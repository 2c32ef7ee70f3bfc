use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;
use reqwest::Url;

use crate::error::{DashboardError, Result};

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_TITLE: &str = "Binance Bot Dashboard";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Terminal dashboard
    Tui,
    /// HTML dashboard served over HTTP
    Web,
    /// Load once and print
    Headless,
    /// Serve /api/trades and /api/status from fixtures or synthetic data
    Api,
}

/// Where the dashboard reads from and how long it waits.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub base_url: Url,
    pub request_timeout: Duration,
    pub title: String,
}

impl DashboardConfig {
    pub fn new(base_url: &str, timeout_ms: u64, title: impl Into<String>) -> Result<Self> {
        if timeout_ms == 0 {
            return Err(DashboardError::Config("request timeout must be greater than zero".into()));
        }
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            request_timeout: Duration::from_millis(timeout_ms),
            title: title.into(),
        })
    }
}

/// Settings for the mock status service (`--mode api`).
#[derive(Debug, Clone, Default)]
pub struct ApiConfig {
    pub port: u16,
    pub trades_file: Option<PathBuf>,
    pub status_file: Option<PathBuf>,
    pub demo_trades: usize,
    pub seed: u64,
}

/// Parses the base URL and guarantees a trailing slash so relative joins keep
/// any path prefix (`http://host/bot/` + `api/trades`).
pub fn normalize_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw.trim())
        .map_err(|e| DashboardError::Config(format!("invalid base url {raw:?}: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(DashboardError::Config(format!(
            "base url must be http or https, got {}",
            url.scheme()
        )));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
