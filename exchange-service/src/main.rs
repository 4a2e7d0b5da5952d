//! Exchange Service: REST API and WebSocket server fronting a single
//! in-process matching engine.
//!
//! Provides HTTP endpoints for order management and WebSocket streams for
//! real-time market data. Built with Axum for async request handling;
//! the engine itself stays synchronous behind one `std::sync::Mutex`, so
//! handlers call it directly without `.await`.

use axum::{
    extract::{Path, Query, State, WebSocketUpgrade},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use clap::Parser;
use clob_engine::{FileLogger, MatchingEngine};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tower_http::cors::CorsLayer;
use tracing::info;

/// How often the event log gets flushed to disk.
const LOG_FLUSH_INTERVAL: Duration = Duration::from_secs(5);

mod exchange;
mod types;
mod websocket;

use exchange::Exchange;
use types::*;

/// Startup configuration for the exchange service (C12).
#[derive(Parser, Debug)]
#[command(name = "exchange-service")]
struct Args {
    /// Address the HTTP/WS server binds to.
    #[arg(long, env = "EXCHANGE_BIND_ADDR", default_value = "0.0.0.0:8080")]
    bind_addr: String,

    /// File the event log is periodically dumped to.
    #[arg(long, env = "EXCHANGE_LOG_FILE", default_value = "exchange.log")]
    log_file: String,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let logger = Arc::new(FileLogger::new(&args.log_file));
    let engine = Arc::new(MatchingEngine::new(Box::new(Arc::clone(&logger))));
    let exchange = Arc::new(Exchange::new(Arc::clone(&engine)));
    let (trade_tx, _) = broadcast::channel(1000);

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(LOG_FLUSH_INTERVAL);
        loop {
            ticker.tick().await;
            if let Err(err) = logger.dump() {
                tracing::warn!(%err, "failed to flush event log");
            }
        }
    });

    let app = Router::new()
        .route("/health", get(health_check))
        .route("/symbols", get(list_symbols))
        .route("/symbols/:symbol/orderbook", get(get_depth))
        .route("/symbols/:symbol/depth", get(get_depth))
        .route("/symbols/:symbol/orders", post(submit_order))
        .route("/symbols/:symbol/orders/:order_id", delete(cancel_order))
        .route("/symbols/:symbol/trades/stream", get(trade_stream))
        .route("/stream/snapshot", get(snapshot_stream))
        .layer(CorsLayer::permissive())
        .with_state(AppState {
            exchange,
            engine,
            trade_broadcaster: trade_tx,
        });

    let listener = tokio::net::TcpListener::bind(&args.bind_addr).await.unwrap();

    info!(addr = %args.bind_addr, "exchange service starting");
    info!("  GET  /health");
    info!("  GET  /symbols");
    info!("  GET  /symbols/:symbol/orderbook");
    info!("  GET  /symbols/:symbol/depth?levels=N");
    info!("  POST /symbols/:symbol/orders");
    info!("  DEL  /symbols/:symbol/orders/:order_id");
    info!("  WS   /symbols/:symbol/trades/stream");
    info!("  WS   /stream/snapshot");

    axum::serve(listener, app).await.unwrap();
}

/// Application state shared across all handlers.
#[derive(Clone)]
struct AppState {
    exchange: Arc<Exchange>,
    engine: Arc<MatchingEngine>,
    trade_broadcaster: broadcast::Sender<TradeEvent>,
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "clob-exchange",
        "version": "0.1.0",
    }))
}

async fn list_symbols(State(state): State<AppState>) -> impl IntoResponse {
    Json(SymbolsResponse {
        symbols: state.exchange.list_symbols(),
    })
}

async fn get_depth(
    Path(symbol): Path<String>,
    Query(params): Query<DepthQuery>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let depth = state
        .exchange
        .get_market_depth(&symbol, params.levels.unwrap_or(10));
    Json(depth)
}

async fn submit_order(
    Path(symbol): Path<String>,
    State(state): State<AppState>,
    Json(request): Json<SubmitOrderRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (order_id, trades) = state
        .exchange
        .submit_order(&symbol, request.side, request.price, request.quantity)
        .map_err(AppError::Submit)?;

    for trade in &trades {
        let _ = state.trade_broadcaster.send(TradeEvent { trade: trade.clone() });
    }

    let response = SubmitOrderResponse {
        order_id,
        status: if trades.is_empty() { "rested".to_string() } else { "filled".to_string() },
        trades,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

async fn cancel_order(
    Path((_symbol, order_id)): Path<(String, String)>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let order_id = order_id.parse::<u64>().map_err(|_| AppError::InvalidOrderId)?;

    if state.exchange.cancel_order(order_id) {
        Ok(Json(serde_json::json!({"status": "cancelled", "order_id": order_id})))
    } else {
        Err(AppError::OrderNotFound)
    }
}

async fn trade_stream(
    Path(symbol): Path<String>,
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> Response {
    ws.on_upgrade(move |socket| websocket::handle_trade_stream(socket, symbol, state))
}

/// WebSocket handler broadcasting the full market snapshot once a second,
/// mirroring the baseline publisher's cadence.
async fn snapshot_stream(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| websocket::handle_snapshot_stream(socket, state))
}

#[derive(Debug)]
enum AppError {
    OrderNotFound,
    InvalidOrderId,
    Submit(clob_engine::SubmitError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::OrderNotFound => (StatusCode::NOT_FOUND, "Order not found".to_string()),
            AppError::InvalidOrderId => (StatusCode::BAD_REQUEST, "Invalid order ID".to_string()),
            AppError::Submit(e) => (StatusCode::BAD_REQUEST, e.to_string()),
        };

        let body = Json(serde_json::json!({
            "error": message,
            "code": status.as_u16()
        }));

        (status, body).into_response()
    }
}
