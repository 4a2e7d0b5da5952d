//! API types for REST and WebSocket interfaces.

use clob_engine::{MarketSnapshot, OrderId, Side, Trade};
use serde::{Deserialize, Serialize};

/// Request to submit a new limit order.
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitOrderRequest {
    pub side: Side,
    pub price: f64,
    pub quantity: u64,
}

/// Response after submitting an order.
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitOrderResponse {
    pub order_id: OrderId,
    pub status: String, // "rested" or "filled"
    pub trades: Vec<Trade>,
}

/// Query parameters for market depth requests.
#[derive(Debug, Serialize, Deserialize)]
pub struct DepthQuery {
    pub levels: Option<usize>,
}

/// List of available trading symbols.
#[derive(Debug, Serialize, Deserialize)]
pub struct SymbolsResponse {
    pub symbols: Vec<String>,
}

/// Aggregated orders at a specific price level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PriceLevel {
    pub price: f64,
    pub quantity: u64,
}

/// Market depth showing multiple price levels.
#[derive(Debug, Serialize, Deserialize)]
pub struct MarketDepth {
    pub symbol: String,
    pub bids: Vec<PriceLevel>, // highest to lowest
    pub asks: Vec<PriceLevel>, // lowest to highest
}

/// Trade execution event for WebSocket streaming.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeEvent {
    pub trade: Trade,
}

/// WebSocket message types for the trade stream.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WebSocketMessage {
    #[serde(rename = "trade")]
    Trade(TradeEvent),
    #[serde(rename = "snapshot")]
    Snapshot(MarketSnapshot),
    #[serde(rename = "error")]
    Error { message: String },
    #[serde(rename = "ping")]
    Ping { timestamp: u64 },
    #[serde(rename = "pong")]
    Pong { timestamp: u64 },
}
