//! Owned, serde-serialisable read views produced under the engine lock
//! (C6). Nothing here hands out a reference into live book state.

use serde::Serialize;

use crate::types::{format_wall_time, Trade};

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct PriceLevel {
    pub price: f64,
    pub quantity: u64,
}

#[derive(Clone, Debug, Serialize)]
pub struct OrderBookSnapshot {
    pub symbol: String,
    pub bids: Vec<PriceLevel>,
    pub asks: Vec<PriceLevel>,
}

#[derive(Clone, Debug, Serialize)]
pub struct TradeSnapshot {
    pub symbol: String,
    pub price: f64,
    pub quantity: u64,
    pub timestamp: String,
}

impl From<&Trade> for TradeSnapshot {
    fn from(trade: &Trade) -> Self {
        Self {
            symbol: trade.symbol.clone(),
            price: trade.price,
            quantity: trade.quantity,
            timestamp: format_wall_time(&trade.wall_time),
        }
    }
}

/// The publisher wire format from §6: every known symbol's aggregated
/// book, plus the recent-trades tape.
#[derive(Clone, Debug, Serialize)]
pub struct MarketSnapshot {
    pub order_books: Vec<OrderBookSnapshot>,
    pub recent_trades: Vec<TradeSnapshot>,
}
