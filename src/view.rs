//! The dashboard as a pure function of [`LoadState`].
//!
//! Front-ends (terminal, HTML, plain text) only ever draw a
//! [`DashboardView`]; none of them look at raw records.

use std::fmt::{Display, Write as _};

use chrono::{Local, TimeZone};
use serde::Serialize;

use crate::format::{
    format_currency_or_placeholder, format_number, format_number_or_placeholder,
    format_trade_time_in, format_volatility,
};
use crate::loader::{LoadFailure, LoadState};
use crate::types::{Status, Trade};

pub const EMPTY_TABLE_MESSAGE: &str = "No trades yet.";
pub const LOADING_MESSAGE: &str = "Loading…";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Positive,
    Negative,
    Neutral,
    Accent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Column {
    pub title: &'static str,
    pub align: Align,
}

pub const COLUMNS: [Column; 7] = [
    Column { title: "Time", align: Align::Left },
    Column { title: "Pair", align: Align::Left },
    Column { title: "Price", align: Align::Right },
    Column { title: "Size", align: Align::Right },
    Column { title: "Volatility", align: Align::Right },
    Column { title: "Action", align: Align::Left },
    Column { title: "Stop Price", align: Align::Right },
];

// ── View model ──

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Badge {
    pub label: String,
    pub tone: Tone,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricCard {
    pub label: &'static str,
    pub value: String,
    pub caption: &'static str,
    pub tone: Tone,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub balance: MetricCard,
    pub open_trades: MetricCard,
    pub daily_pnl: MetricCard,
    pub running: Badge,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeRow {
    pub time: String,
    pub pair: Badge,
    pub price: String,
    pub size: String,
    pub volatility: String,
    pub action: Badge,
    pub stop_price: String,
}

impl TradeRow {
    /// Cell texts in [`COLUMNS`] order.
    pub fn cells(&self) -> [&str; 7] {
        [
            self.time.as_str(),
            self.pair.label.as_str(),
            self.price.as_str(),
            self.size.as_str(),
            self.volatility.as_str(),
            self.action.label.as_str(),
            self.stop_price.as_str(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TradeTable {
    /// A single row spanning every column.
    Empty { message: &'static str, colspan: usize },
    Rows { rows: Vec<TradeRow> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum DashboardView {
    Loading,
    Failed { failure: LoadFailure },
    Loaded { summary: Summary, table: TradeTable },
}

impl DashboardView {
    pub fn is_loading(&self) -> bool {
        matches!(self, DashboardView::Loading)
    }

    /// Same string as the serialized `state` tag.
    pub fn state_name(&self) -> &'static str {
        match self {
            DashboardView::Loading => "loading",
            DashboardView::Failed { .. } => "failed",
            DashboardView::Loaded { .. } => "loaded",
        }
    }
}

// ── Builders ──

/// Builds the view with trade times shown in the host's local zone.
pub fn build_view(state: &LoadState) -> DashboardView {
    build_view_in(state, &Local)
}

/// Same as [`build_view`] with an explicit zone for trade times.
pub fn build_view_in<Tz>(state: &LoadState, tz: &Tz) -> DashboardView
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match state {
        LoadState::Idle | LoadState::Loading => DashboardView::Loading,
        LoadState::Failed(failure) => DashboardView::Failed { failure: failure.clone() },
        LoadState::Loaded(snapshot) => DashboardView::Loaded {
            summary: build_summary(&snapshot.status),
            table: build_table(&snapshot.trades, tz),
        },
    }
}

pub fn build_summary(status: &Status) -> Summary {
    let pnl_tone = match status.daily_pnl {
        Some(pnl) if pnl >= 0.0 => Tone::Positive,
        Some(_) => Tone::Negative,
        None => Tone::Neutral,
    };
    let running = status.running.unwrap_or(false);

    Summary {
        balance: MetricCard {
            label: "Balance",
            value: format_currency_or_placeholder(status.balance),
            caption: "Current USDT",
            tone: Tone::Neutral,
        },
        open_trades: MetricCard {
            label: "Open Trades",
            value: format_number_or_placeholder(status.open_trades),
            caption: "Active Positions",
            tone: Tone::Neutral,
        },
        daily_pnl: MetricCard {
            label: "Daily PnL",
            value: format_currency_or_placeholder(status.daily_pnl),
            caption: "Today",
            tone: pnl_tone,
        },
        running: Badge {
            label: if running { "Running" } else { "Stopped" }.to_string(),
            tone: if running { Tone::Positive } else { Tone::Negative },
        },
    }
}

/// Newest first by position: the last trade in the response is the first row.
pub fn build_table<Tz>(trades: &[Trade], tz: &Tz) -> TradeTable
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if trades.is_empty() {
        return TradeTable::Empty { message: EMPTY_TABLE_MESSAGE, colspan: COLUMNS.len() };
    }
    let rows = trades.iter().rev().map(|t| build_row(t, tz)).collect();
    TradeTable::Rows { rows }
}

fn build_row<Tz>(trade: &Trade, tz: &Tz) -> TradeRow
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    TradeRow {
        time: format_trade_time_in(&trade.time, tz),
        pair: Badge { label: trade.pair.clone(), tone: Tone::Accent },
        price: format_number(trade.price),
        size: format_number(trade.size),
        volatility: format_volatility(trade.volatility),
        action: Badge {
            label: trade.action.to_uppercase(),
            tone: if trade.is_buy() { Tone::Positive } else { Tone::Negative },
        },
        stop_price: format_number(trade.stop_price),
    }
}

// ── Plain text ──

/// Renders the view as aligned plain text (headless mode).
pub fn render_text(title: &str, view: &DashboardView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "{}", "=".repeat(title.chars().count()));
    let _ = writeln!(out);

    match view {
        DashboardView::Loading => {
            let _ = writeln!(out, "{LOADING_MESSAGE}");
        }
        DashboardView::Failed { failure } => {
            let _ = writeln!(out, "{}: {}", failure.kind.label(), failure.message);
        }
        DashboardView::Loaded { summary, table } => {
            let cards = [&summary.balance, &summary.open_trades, &summary.daily_pnl];
            let labels: Vec<&str> = cards.iter().map(|c| c.label).chain(["Status"]).collect();
            let values: Vec<&str> = cards
                .iter()
                .map(|c| c.value.as_str())
                .chain([summary.running.label.as_str()])
                .collect();
            let captions: Vec<&str> = cards.iter().map(|c| c.caption).chain([""]).collect();
            for line in [labels, values, captions] {
                let _ = writeln!(out, "{}", line.iter().map(|s| pad(s, 18, Align::Left)).collect::<String>().trim_end());
            }
            let _ = writeln!(out);
            let _ = writeln!(out, "Trade Log");
            render_table_text(&mut out, table);
        }
    }
    out
}

fn render_table_text(out: &mut String, table: &TradeTable) {
    let mut widths: Vec<usize> = COLUMNS.iter().map(|c| c.title.chars().count()).collect();
    if let TradeTable::Rows { rows } = table {
        for row in rows {
            for (w, cell) in widths.iter_mut().zip(row.cells()) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let header: Vec<String> = COLUMNS
        .iter()
        .zip(&widths)
        .map(|(c, w)| pad(c.title, *w, c.align))
        .collect();
    let _ = writeln!(out, "{}", header.join("  ").trim_end());
    let total: usize = widths.iter().sum::<usize>() + 2 * (widths.len() - 1);
    let _ = writeln!(out, "{}", "-".repeat(total));

    match table {
        TradeTable::Empty { message, .. } => {
            let _ = writeln!(out, "{}", center(message, total).trim_end());
        }
        TradeTable::Rows { rows } => {
            for row in rows {
                let cells: Vec<String> = COLUMNS
                    .iter()
                    .zip(&widths)
                    .zip(row.cells())
                    .map(|((c, w), cell)| pad(cell, *w, c.align))
                    .collect();
                let _ = writeln!(out, "{}", cells.join("  ").trim_end());
            }
        }
    }
}

fn pad(s: &str, width: usize, align: Align) -> String {
    match align {
        Align::Left => format!("{s:<width$}"),
        Align::Right => format!("{s:>width$}"),
    }
}

fn center(s: &str, width: usize) -> String {
    format!("{s:^width$}")
}
