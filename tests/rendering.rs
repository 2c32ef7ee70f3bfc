//! View-model tests: the dashboard as a pure function of load state.

use chrono::Utc;

use bot_dashboard::error::FailureKind;
use bot_dashboard::html::render_page;
use bot_dashboard::loader::{LoadFailure, LoadState};
use bot_dashboard::types::{Snapshot, Status, Trade};
use bot_dashboard::view::*;

fn trade(time: &str, pair: &str, action: &str, price: f64) -> Trade {
    Trade {
        time: time.into(),
        pair: pair.into(),
        price,
        size: 0.01,
        volatility: 0.0123,
        action: action.into(),
        stop_price: price - 1000.0,
    }
}

fn loaded(trades: Vec<Trade>, status: Status) -> LoadState {
    LoadState::Loaded(Snapshot { trades, status })
}

fn sample_status() -> Status {
    Status { balance: Some(1000.0), open_trades: Some(2.0), daily_pnl: Some(-50.0), running: Some(true) }
}

fn unwrap_loaded(view: DashboardView) -> (Summary, TradeTable) {
    match view {
        DashboardView::Loaded { summary, table } => (summary, table),
        other => panic!("expected loaded view, got {other:?}"),
    }
}

// ── Loading gate ──

#[test]
fn test_idle_and_loading_render_only_the_indicator() {
    for state in [LoadState::Idle, LoadState::Loading] {
        let view = build_view_in(&state, &Utc);
        assert_eq!(view, DashboardView::Loading, "state {} should show the loading indicator", state.name());

        let text = render_text("Dash", &view);
        assert!(text.contains(LOADING_MESSAGE));
        assert!(!text.contains("Balance"), "no summary card may render while loading");
        assert!(!text.contains("Trade Log"), "no table may render while loading");
    }
}

// ── Summary cards ──

#[test]
fn test_summary_cards_for_sample_status() {
    let (summary, _) = unwrap_loaded(build_view_in(&loaded(vec![], sample_status()), &Utc));

    assert_eq!(summary.balance.value, "$1,000.00");
    assert_eq!(summary.daily_pnl.value, "-$50.00");
    assert_eq!(summary.daily_pnl.tone, Tone::Negative);
    assert_eq!(summary.open_trades.value, "2");
    assert_eq!(summary.running.label, "Running");
    assert_eq!(summary.running.tone, Tone::Positive);
    assert_eq!(summary.balance.caption, "Current USDT");
    assert_eq!(summary.open_trades.caption, "Active Positions");
    assert_eq!(summary.daily_pnl.caption, "Today");
}

#[test]
fn test_zero_pnl_is_positive() {
    let status = Status { daily_pnl: Some(0.0), ..sample_status() };
    let summary = build_summary(&status);
    assert_eq!(summary.daily_pnl.tone, Tone::Positive);
    assert_eq!(summary.daily_pnl.value, "$0.00");
}

#[test]
fn test_missing_status_fields_use_placeholders() {
    let summary = build_summary(&Status::default());

    assert_eq!(summary.balance.value, "—");
    assert_eq!(summary.open_trades.value, "—");
    assert_eq!(summary.daily_pnl.value, "—");
    assert_eq!(summary.daily_pnl.tone, Tone::Neutral);
    assert_eq!(summary.running.label, "Stopped", "absent running flag reads as stopped");
    assert_eq!(summary.running.tone, Tone::Negative);
}

#[test]
fn test_running_false_is_stopped() {
    let status = Status { running: Some(false), ..sample_status() };
    assert_eq!(build_summary(&status).running.label, "Stopped");
}

// ── Trade table ──

#[test]
fn test_single_buy_trade_row() {
    let t = trade("2024-01-01T00:00:00Z", "BTCUSDT", "buy", 42000.0);
    let (_, table) = unwrap_loaded(build_view_in(&loaded(vec![t], sample_status()), &Utc));

    let TradeTable::Rows { rows } = table else {
        panic!("expected rows");
    };
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.action.label, "BUY");
    assert_eq!(row.action.tone, Tone::Positive);
    assert_eq!(row.volatility, "0.0123");
    assert_eq!(row.time, "1/1/2024, 12:00:00 AM");
    assert_eq!(row.pair.label, "BTCUSDT");
    assert_eq!(row.pair.tone, Tone::Accent);
    assert_eq!(row.price, "42000");
    assert_eq!(row.size, "0.01");
    assert_eq!(row.stop_price, "41000");
}

#[test]
fn test_only_exact_lowercase_buy_is_positive() {
    let trades = vec![
        trade("2024-01-01T00:00:00Z", "A", "BUY", 1.0),
        trade("2024-01-01T00:00:00Z", "B", "Buy", 1.0),
        trade("2024-01-01T00:00:00Z", "C", "sell", 1.0),
        trade("2024-01-01T00:00:00Z", "D", "buy", 1.0),
    ];
    let TradeTable::Rows { rows } = build_table(&trades, &Utc) else {
        panic!("expected rows");
    };
    let styled: Vec<(&str, Tone)> = rows.iter().map(|r| (r.action.label.as_str(), r.action.tone)).collect();
    assert_eq!(
        styled,
        vec![
            ("BUY", Tone::Positive),
            ("SELL", Tone::Negative),
            ("BUY", Tone::Negative),
            ("BUY", Tone::Negative),
        ]
    );
}

#[test]
fn test_empty_trade_list_spans_all_columns() {
    let table = build_table(&[], &Utc);
    assert_eq!(table, TradeTable::Empty { message: "No trades yet.", colspan: 7 });
    assert_eq!(COLUMNS.len(), 7);

    let view = build_view_in(&loaded(vec![], sample_status()), &Utc);
    let text = render_text("Dash", &view);
    assert!(text.contains("No trades yet."));
}

#[test]
fn test_rows_are_positionally_reversed() {
    // B is older than A by timestamp; order must still follow array position only.
    let a = trade("2024-05-01T00:00:00Z", "AAA", "buy", 1.0);
    let b = trade("2023-01-01T00:00:00Z", "BBB", "sell", 2.0);
    let TradeTable::Rows { rows } = build_table(&[a, b], &Utc) else {
        panic!("expected rows");
    };
    let pairs: Vec<&str> = rows.iter().map(|r| r.pair.label.as_str()).collect();
    assert_eq!(pairs, vec!["BBB", "AAA"]);
}

#[test]
fn test_unparseable_time_renders_invalid_date() {
    let TradeTable::Rows { rows } = build_table(&[trade("yesterday", "X", "buy", 1.0)], &Utc) else {
        panic!("expected rows");
    };
    assert_eq!(rows[0].time, "Invalid Date");
}

#[test]
fn test_rebuilding_is_idempotent() {
    let state = loaded(
        vec![
            trade("2024-01-01T00:00:00Z", "BTCUSDT", "buy", 42000.0),
            trade("2024-01-01T00:05:00Z", "ETHUSDT", "sell", 2300.0),
        ],
        sample_status(),
    );
    let first = build_view_in(&state, &Utc);
    let second = build_view_in(&state, &Utc);
    assert_eq!(first, second);
    assert_eq!(render_text("Dash", &first), render_text("Dash", &second));
    assert_eq!(render_page("Dash", &first), render_page("Dash", &second));
}

// ── Failure ──

#[test]
fn test_failed_state_shows_reason() {
    let state = LoadState::Failed(LoadFailure {
        kind: FailureKind::Network,
        message: "/api/status returned HTTP 500 Internal Server Error".into(),
    });
    let view = build_view_in(&state, &Utc);
    assert!(matches!(&view, DashboardView::Failed { failure } if failure.kind == FailureKind::Network));

    let text = render_text("Dash", &view);
    assert!(text.contains("Network error"));
    assert!(text.contains("HTTP 500"));
}

// ── Text and HTML output ──

#[test]
fn test_text_render_lists_newest_first() {
    let state = loaded(
        vec![
            trade("2024-01-01T00:00:00Z", "OLDPAIR", "buy", 1.0),
            trade("2024-01-01T00:01:00Z", "NEWPAIR", "sell", 2.0),
        ],
        sample_status(),
    );
    let text = render_text("Dash", &build_view_in(&state, &Utc));
    let newer = text.find("NEWPAIR").expect("newer trade rendered");
    let older = text.find("OLDPAIR").expect("older trade rendered");
    assert!(newer < older, "newest trade should be printed first:\n{text}");
    assert!(text.contains("$1,000.00"));
    assert!(text.contains("Running"));
}

#[test]
fn test_html_escapes_service_strings() {
    let state = loaded(vec![trade("2024-01-01T00:00:00Z", "<script>", "buy", 1.0)], sample_status());
    let page = render_page("Bot & Co", &build_view_in(&state, &Utc));
    assert!(page.contains("&lt;script&gt;"));
    assert!(!page.contains("<span class=\"badge tone-accent\"><script>"));
    assert!(page.contains("Bot &amp; Co"));
}

#[test]
fn test_html_empty_table_and_loading_page() {
    let page = render_page("Dash", &build_view_in(&loaded(vec![], sample_status()), &Utc));
    assert!(page.contains(r#"colspan="7""#));
    assert!(page.contains("No trades yet."));

    let loading = render_page("Dash", &DashboardView::Loading);
    assert!(loading.contains("spinner"));
    assert!(!loading.contains("Trade Log"));
}

#[test]
fn test_view_serializes_with_state_tag() {
    let json = serde_json::to_value(build_view_in(&LoadState::Loading, &Utc)).unwrap();
    assert_eq!(json["state"], "loading");

    let json = serde_json::to_value(build_view_in(&loaded(vec![], sample_status()), &Utc)).unwrap();
    assert_eq!(json["state"], "loaded");
    assert_eq!(json["table"]["kind"], "empty");
    assert_eq!(json["summary"]["running"]["tone"], "positive");
}

#[test]
fn test_page_carries_the_serialized_state_name() {
    let failed = LoadState::Failed(LoadFailure { kind: FailureKind::Malformed, message: "bad".into() });
    for state in [LoadState::Idle, failed, loaded(vec![], sample_status())] {
        let view = build_view_in(&state, &Utc);
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["state"], view.state_name());
        let page = render_page("Dash", &view);
        assert!(page.contains(&format!(r#"data-state="{}""#, view.state_name())));
    }
}

// ── Record decoding ──

#[test]
fn test_status_accepts_missing_and_null_fields() {
    let status: Status = serde_json::from_str(r#"{"balance": null, "openTrades": 3}"#).unwrap();
    assert_eq!(status, Status { balance: None, open_trades: Some(3.0), daily_pnl: None, running: None });

    let status: Status = serde_json::from_str(r#"{"dailyPnL": 12.5, "running": true}"#).unwrap();
    assert_eq!(status.daily_pnl, Some(12.5));
    assert_eq!(status.running, Some(true));
}

#[test]
fn test_trade_requires_every_field() {
    let ok = r#"{"time":"2024-01-01T00:00:00Z","pair":"BTCUSDT","price":42000,"size":0.01,"volatility":0.0123,"action":"buy","stopPrice":41000}"#;
    let t: Trade = serde_json::from_str(ok).unwrap();
    assert_eq!(t.stop_price, 41000.0);

    let missing = r#"{"time":"2024-01-01T00:00:00Z","pair":"BTCUSDT","price":42000,"size":0.01,"volatility":0.0123,"action":"buy"}"#;
    assert!(serde_json::from_str::<Trade>(missing).is_err(), "stopPrice is required");
}
