//! Stand-in status service exposing `/api/trades` and `/api/status`.
//!
//! Serves fixture files when given, otherwise seeded synthetic data. Used for
//! demos and by the HTTP integration tests.

use std::path::Path;
use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::ApiConfig;
use crate::error::Result;
use crate::feed::{STATUS_PATH, TRADES_PATH};
use crate::generator::TradeGenerator;
use crate::types::{Status, Trade};

#[derive(Debug, Clone, Default)]
pub struct FeedData {
    pub trades: Vec<Trade>,
    pub status: Status,
}

impl FeedData {
    pub fn synthetic(count: usize, seed: u64) -> Self {
        let mut gen = TradeGenerator::new(seed);
        let trades = gen.generate_trades(count, Utc::now());
        let status = gen.status_for(&trades);
        Self { trades, status }
    }

    /// Loads fixtures; a missing side falls back to synthetic data.
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        let synthetic = Self::synthetic(config.demo_trades, config.seed);
        let trades = match &config.trades_file {
            Some(path) => read_json(path)?,
            None => synthetic.trades,
        };
        let status = match &config.status_file {
            Some(path) => read_json(path)?,
            None => synthetic.status,
        };
        Ok(Self { trades, status })
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

pub fn router(data: FeedData) -> Router {
    Router::new()
        .route(TRADES_PATH, get(trades_handler))
        .route(STATUS_PATH, get(status_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(data))
}

async fn trades_handler(State(data): State<Arc<FeedData>>) -> Json<Vec<Trade>> {
    Json(data.trades.clone())
}

async fn status_handler(State(data): State<Arc<FeedData>>) -> Json<Status> {
    Json(data.status.clone())
}

pub async fn run(config: ApiConfig) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let data = FeedData::from_config(&config)?;
    info!(trades = data.trades.len(), "serving status api");

    let addr = format!("0.0.0.0:{}", config.port);
    println!("Status API at http://localhost:{}{TRADES_PATH}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router(data))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;
    Ok(())
}
