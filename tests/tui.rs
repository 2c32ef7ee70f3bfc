use chrono::Utc;
use ratatui::backend::TestBackend;
use ratatui::Terminal;

use bot_dashboard::error::FailureKind;
use bot_dashboard::loader::{LoadFailure, LoadState};
use bot_dashboard::tui::{draw, App};
use bot_dashboard::types::{Snapshot, Status, Trade};
use bot_dashboard::view::{build_view_in, DashboardView};

fn screen(app: &App) -> String {
    let backend = TestBackend::new(120, 30);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal.draw(|f| draw(f, app)).unwrap();

    let buffer = terminal.backend().buffer();
    let width = buffer.area.width as usize;
    buffer
        .content
        .chunks(width)
        .map(|line| line.iter().map(|c| c.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

fn trade(pair: &str, action: &str) -> Trade {
    Trade {
        time: "2024-01-01T00:00:00Z".into(),
        pair: pair.into(),
        price: 42000.0,
        size: 0.01,
        volatility: 0.0123,
        action: action.into(),
        stop_price: 41000.0,
    }
}

fn loaded_app(trades: Vec<Trade>) -> App {
    let status = Status { balance: Some(1000.0), open_trades: Some(2.0), daily_pnl: Some(-50.0), running: Some(true) };
    let mut app = App::new("Binance Bot Dashboard");
    app.set_view(build_view_in(&LoadState::Loaded(Snapshot { trades, status }), &Utc));
    app
}

#[test]
fn test_loading_screen() {
    let app = App::new("Binance Bot Dashboard");
    let text = screen(&app);
    assert!(text.contains("Binance Bot Dashboard"));
    assert!(text.contains("Loading…"));
    assert!(!text.contains("Balance"));
    assert!(!text.contains("Trade Log"));
}

#[test]
fn test_loaded_screen_shows_cards_and_rows() {
    let text = screen(&loaded_app(vec![trade("BTCUSDT", "buy")]));
    for expected in ["Balance", "$1,000.00", "-$50.00", "Open Trades", "Running", "Trade Log (1)", "BTCUSDT", "BUY", "0.0123", "1/1/2024, 12:00:00 AM"] {
        assert!(text.contains(expected), "missing {expected:?} in:\n{text}");
    }
}

#[test]
fn test_empty_trade_log_message() {
    let text = screen(&loaded_app(vec![]));
    assert!(text.contains("No trades yet."), "screen:\n{text}");
    assert!(text.contains("Stop Price"));
}

#[test]
fn test_failed_screen_offers_retry() {
    let mut app = App::new("Dash");
    app.set_view(DashboardView::Failed {
        failure: LoadFailure { kind: FailureKind::Malformed, message: "bad body".into() },
    });
    let text = screen(&app);
    assert!(text.contains("Malformed response"));
    assert!(text.contains("bad body"));
    assert!(text.contains("Press r to retry"));
}

#[test]
fn test_scroll_is_bounded_by_rows() {
    let mut app = loaded_app(vec![trade("AAA", "buy"), trade("BBB", "sell"), trade("CCC", "buy")]);
    app.scroll_up();
    assert_eq!(app.scroll_offset, 0);
    for _ in 0..10 {
        app.scroll_down();
    }
    assert_eq!(app.scroll_offset, 2, "last row stays visible");

    // Newest first, so scrolling two rows leaves only the oldest trade.
    let text = screen(&app);
    assert!(text.contains("AAA"));
    assert!(!text.contains("CCC"));
}
