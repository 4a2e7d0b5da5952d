//! WebSocket handlers for real-time market data streaming.
//!
//! Provides live trade execution and periodic market snapshot broadcasts.
//! Uses `tokio::select!` for concurrent handling of inbound messages,
//! broadcasts, and heartbeats.

use axum::extract::ws::{Message, WebSocket};
use futures::{sink::SinkExt, stream::StreamExt};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::time::interval;
use tracing::{error, info, warn};

use crate::{types::*, AppState};

fn now_millis() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_millis() as u64
}

/// Handles real-time trade streaming for a symbol.
pub async fn handle_trade_stream(socket: WebSocket, symbol: String, state: AppState) {
    info!(symbol, "new trade stream connection");

    let (mut sender, mut receiver) = socket.split();
    let mut trade_rx = state.trade_broadcaster.subscribe();
    let mut ping_interval = interval(Duration::from_secs(30));

    loop {
        tokio::select! {
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        if let Ok(WebSocketMessage::Ping { timestamp }) = serde_json::from_str(&text) {
                            let pong = WebSocketMessage::Pong { timestamp };
                            if let Ok(json) = serde_json::to_string(&pong) {
                                let _ = sender.send(Message::Text(json)).await;
                            }
                        }
                    }
                    Some(Ok(Message::Ping(data))) => {
                        let _ = sender.send(Message::Pong(data)).await;
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        info!(symbol, "trade stream connection closed");
                        break;
                    }
                    Some(Err(e)) => {
                        error!(symbol, error = %e, "websocket error in trade stream");
                        break;
                    }
                    _ => {}
                }
            }

            trade_result = trade_rx.recv() => {
                match trade_result {
                    Ok(trade_event) => {
                        if trade_event.trade.symbol == symbol {
                            let ws_msg = WebSocketMessage::Trade(trade_event);
                            if let Ok(json) = serde_json::to_string(&ws_msg) {
                                if sender.send(Message::Text(json)).await.is_err() {
                                    warn!(symbol, "failed to send trade update");
                                    break;
                                }
                            }
                        }
                    }
                    Err(_) => break,
                }
            }

            _ = ping_interval.tick() => {
                let ping = WebSocketMessage::Ping { timestamp: now_millis() };
                if let Ok(json) = serde_json::to_string(&ping) {
                    if sender.send(Message::Text(json)).await.is_err() {
                        break;
                    }
                }
            }
        }
    }

    info!(symbol, "trade stream handler ended");
}

/// Broadcasts the full market snapshot once a second to a single
/// subscriber, matching the baseline publisher's cadence.
pub async fn handle_snapshot_stream(socket: WebSocket, state: AppState) {
    info!("new snapshot stream connection");

    let (mut sender, mut receiver) = socket.split();
    let mut tick = interval(Duration::from_secs(1));

    loop {
        tokio::select! {
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => {
                        info!("snapshot stream connection closed");
                        break;
                    }
                    Some(Err(e)) => {
                        error!(error = %e, "websocket error in snapshot stream");
                        break;
                    }
                    _ => {}
                }
            }

            _ = tick.tick() => {
                let snapshot = state.engine.market_snapshot(50);
                let ws_msg = WebSocketMessage::Snapshot(snapshot);
                if let Ok(json) = serde_json::to_string(&ws_msg) {
                    if sender.send(Message::Text(json)).await.is_err() {
                        warn!("failed to send snapshot update");
                        break;
                    }
                }
            }
        }
    }

    info!("snapshot stream handler ended");
}
