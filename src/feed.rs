//! Readers for the two status-service endpoints.

use std::future::Future;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::DashboardConfig;
use crate::error::{DashboardError, Result};
use crate::types::{Status, Trade};

pub const TRADES_PATH: &str = "/api/trades";
pub const STATUS_PATH: &str = "/api/status";

/// Source of dashboard data. `HttpFeed` is the real one; tests plug in fakes.
pub trait TradeFeed: Send + Sync + 'static {
    fn fetch_trades(&self) -> impl Future<Output = Result<Vec<Trade>>> + Send;
    fn fetch_status(&self) -> impl Future<Output = Result<Status>> + Send;
}

pub struct HttpFeed {
    client: Client,
    trades_url: Url,
    status_url: Url,
}

impl HttpFeed {
    pub fn new(config: &DashboardConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| DashboardError::Config(format!("http client: {e}")))?;
        Ok(Self {
            client,
            trades_url: join(&config.base_url, TRADES_PATH)?,
            status_url: join(&config.base_url, STATUS_PATH)?,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &'static str, url: &Url) -> Result<T> {
        debug!(%url, "GET {endpoint}");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| DashboardError::Transport { endpoint, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DashboardError::Status { endpoint, status });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| DashboardError::Transport { endpoint, source })?;
        debug!(bytes = body.len(), "{endpoint} responded");
        serde_json::from_slice(&body).map_err(|source| DashboardError::Decode { endpoint, source })
    }
}

impl TradeFeed for HttpFeed {
    async fn fetch_trades(&self) -> Result<Vec<Trade>> {
        self.get_json(TRADES_PATH, &self.trades_url).await
    }

    async fn fetch_status(&self) -> Result<Status> {
        self.get_json(STATUS_PATH, &self.status_url).await
    }
}

fn join(base: &Url, path: &str) -> Result<Url> {
    base.join(path.trim_start_matches('/'))
        .map_err(|e| DashboardError::Config(format!("cannot join {path} onto {base}: {e}")))
}
