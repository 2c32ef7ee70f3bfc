use std::path::PathBuf;

use clap::Parser;
use tracing::error;

use bot_dashboard::api;
use bot_dashboard::cancel::CancelToken;
use bot_dashboard::config::{ApiConfig, DashboardConfig, Mode, DEFAULT_BASE_URL, DEFAULT_TITLE};
use bot_dashboard::feed::HttpFeed;
use bot_dashboard::loader::{DashboardStore, LoadOutcome, Loader};
use bot_dashboard::logging;
use bot_dashboard::tui;
use bot_dashboard::view::{build_view, render_text};
use bot_dashboard::web;

#[derive(Parser)]
#[command(name = "bot-dashboard", about = "Trade log and status dashboard for a trading bot")]
struct Cli {
    /// Run mode
    #[arg(long, value_enum, default_value = "tui")]
    mode: Mode,

    /// Root URL of the status service
    #[arg(long, env = "DASHBOARD_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Per-request timeout in milliseconds
    #[arg(long, env = "DASHBOARD_TIMEOUT_MS", default_value = "10000")]
    timeout_ms: u64,

    /// Listen port (web and api modes)
    #[arg(long, default_value = "8080")]
    port: u16,

    /// Dashboard heading
    #[arg(long, default_value = DEFAULT_TITLE)]
    title: String,

    /// Headless: print the view model as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Api: serve trades from this JSON file
    #[arg(long)]
    trades_file: Option<PathBuf>,

    /// Api: serve status from this JSON file
    #[arg(long)]
    status_file: Option<PathBuf>,

    /// Api: number of synthetic trades when no trades file is given
    #[arg(long, default_value = "25")]
    demo_trades: usize,

    /// Api: seed for synthetic data
    #[arg(long, default_value = "7")]
    seed: u64,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Stderr output would tear the TUI, so keep it quiet unless logging to a file.
    let default_level = match (cli.mode, &cli.log_file) {
        (Mode::Tui, None) => "off",
        _ => "info",
    };
    let _guard = logging::init(default_level, cli.log_file.as_deref())?;

    match cli.mode {
        Mode::Api => {
            let config = ApiConfig {
                port: cli.port,
                trades_file: cli.trades_file,
                status_file: cli.status_file,
                demo_trades: cli.demo_trades,
                seed: cli.seed,
            };
            api::run(config).await?
        }
        mode => {
            let config = DashboardConfig::new(&cli.base_url, cli.timeout_ms, cli.title)?;
            match mode {
                Mode::Tui => tui::run(config).await?,
                Mode::Web => web::run(cli.port, config).await?,
                _ => run_headless(config, cli.json).await?,
            }
        }
    }

    Ok(())
}

async fn run_headless(config: DashboardConfig, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let loader = Loader::new(HttpFeed::new(&config)?, DashboardStore::new());
    let cancel = CancelToken::new();

    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    let outcome = loader.load(&cancel).await;
    let view = build_view(&loader.store().state());

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", render_text(&config.title, &view));
    }

    match outcome {
        LoadOutcome::Loaded => Ok(()),
        other => {
            error!(?other, "headless load did not complete");
            Err(format!("dashboard load {other:?}").into())
        }
    }
}
