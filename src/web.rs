use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tokio::sync::watch;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::cancel::CancelToken;
use crate::config::DashboardConfig;
use crate::feed::{HttpFeed, TradeFeed};
use crate::html;
use crate::loader::{DashboardStore, LoadState, Loader};
use crate::view::{build_view, DashboardView};

pub struct AppState<F> {
    pub title: String,
    pub loader: Loader<F>,
    pub cancel: CancelToken,
}

pub fn router<F: TradeFeed>(state: Arc<AppState<F>>) -> Router {
    Router::new()
        .route("/", get(page_handler::<F>))
        .route("/state", get(state_handler::<F>))
        .route("/retry", post(retry_handler::<F>))
        .route("/ws", get(ws_handler::<F>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Starts the one-shot load in the background.
pub fn spawn_initial_load<F: TradeFeed>(state: &Arc<AppState<F>>) {
    let loader = state.loader.clone();
    let cancel = state.cancel.clone();
    tokio::spawn(async move {
        let outcome = loader.load(&cancel).await;
        debug!(?outcome, "initial load finished");
    });
}

pub async fn run(port: u16, config: DashboardConfig) -> Result<(), Box<dyn std::error::Error>> {
    let feed = HttpFeed::new(&config)?;
    let state = Arc::new(AppState {
        title: config.title.clone(),
        loader: Loader::new(feed, DashboardStore::new()),
        cancel: CancelToken::new(),
    });
    spawn_initial_load(&state);

    let app = router(Arc::clone(&state));
    let addr = format!("0.0.0.0:{port}");
    println!("Dashboard at http://localhost:{port} (reading {})", config.base_url);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    let cancel = state.cancel.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down web dashboard");
            cancel.cancel();
        })
        .await?;
    Ok(())
}

fn current_view<F: TradeFeed>(state: &AppState<F>) -> DashboardView {
    build_view(&state.loader.store().state())
}

async fn page_handler<F: TradeFeed>(State(state): State<Arc<AppState<F>>>) -> Html<String> {
    Html(html::render_page(&state.title, &current_view(&state)))
}

async fn state_handler<F: TradeFeed>(State(state): State<Arc<AppState<F>>>) -> Json<DashboardView> {
    Json(current_view(&state))
}

/// Browsers posting the retry form are sent back to the page; other callers
/// get a bare status code.
async fn retry_handler<F: TradeFeed>(
    State(state): State<Arc<AppState<F>>>,
    headers: HeaderMap,
) -> Response {
    if !state.loader.store().state().is_failed() {
        return (StatusCode::CONFLICT, "nothing to retry").into_response();
    }
    let loader = state.loader.clone();
    let cancel = state.cancel.clone();
    tokio::spawn(async move {
        loader.retry(&cancel).await;
    });
    if wants_html(&headers) {
        Redirect::to("/").into_response()
    } else {
        (StatusCode::ACCEPTED, "retrying").into_response()
    }
}

fn wants_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

async fn ws_handler<F: TradeFeed>(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState<F>>>,
) -> impl IntoResponse {
    let rx = state.loader.store().subscribe();
    ws.on_upgrade(move |socket| handle_socket(socket, rx))
}

/// Sends the current view, then one message per state change.
async fn handle_socket(mut socket: WebSocket, mut rx: watch::Receiver<LoadState>) {
    loop {
        let view = build_view(&rx.borrow_and_update());
        let Ok(json) = serde_json::to_string(&view) else {
            break;
        };
        if socket.send(Message::Text(json.into())).await.is_err() {
            break;
        }
        if rx.changed().await.is_err() {
            break;
        }
    }
}
