use serde::{Deserialize, Serialize};

// ── Records served by the status service ──

/// One executed trade as reported by the bot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub time: String,
    pub pair: String,
    pub price: f64,
    pub size: f64,
    pub volatility: f64,
    pub action: String,
    pub stop_price: f64,
}

impl Trade {
    /// Only the exact lowercase literal counts as a buy.
    pub fn is_buy(&self) -> bool {
        self.action == "buy"
    }
}

/// Point-in-time account and engine summary. Every field is optional;
/// missing and `null` both decode to `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Status {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<f64>,
    #[serde(default, rename = "openTrades", skip_serializing_if = "Option::is_none")]
    pub open_trades: Option<f64>,
    #[serde(default, rename = "dailyPnL", skip_serializing_if = "Option::is_none")]
    pub daily_pnl: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub running: Option<bool>,
}

// ── Loaded data ──

/// Both responses of one successful load, held together.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Snapshot {
    pub trades: Vec<Trade>,
    pub status: Status,
}
