//! Thin adapter between the REST/WS surface and the engine's public API.
//!
//! Unlike the per-symbol `DashMap<String, RwLock<OrderBook>>` sharding an
//! async service would reach for by default, `clob_engine::MatchingEngine`
//! already serialises every symbol behind one lock — because the
//! cross-index that makes cancel/amend sub-linear spans symbols, sharding
//! by symbol would mean taking two locks to move an order between books.
//! This module exists only to turn engine types into wire DTOs.

use std::sync::Arc;

use clob_engine::{MatchingEngine, OrderId, Side, SubmitError, Trade};

use crate::types::{MarketDepth, PriceLevel};

pub struct Exchange {
    engine: Arc<MatchingEngine>,
}

impl Exchange {
    pub fn new(engine: Arc<MatchingEngine>) -> Self {
        Self { engine }
    }

    pub fn list_symbols(&self) -> Vec<String> {
        self.engine.symbols()
    }

    pub fn get_market_depth(&self, symbol: &str, levels: usize) -> MarketDepth {
        MarketDepth {
            symbol: symbol.to_string(),
            bids: self
                .engine
                .top_bids(symbol, levels)
                .into_iter()
                .map(|(price, quantity)| PriceLevel { price, quantity })
                .collect(),
            asks: self
                .engine
                .top_asks(symbol, levels)
                .into_iter()
                .map(|(price, quantity)| PriceLevel { price, quantity })
                .collect(),
        }
    }

    pub fn submit_order(
        &self,
        symbol: &str,
        side: Side,
        price: f64,
        quantity: u64,
    ) -> Result<(OrderId, Vec<Trade>), SubmitError> {
        self.engine.submit_with_trades(symbol, side, price, quantity)
    }

    pub fn cancel_order(&self, order_id: OrderId) -> bool {
        self.engine.cancel(order_id)
    }

    pub fn market_snapshot(&self, recent_trade_count: usize) -> clob_engine::MarketSnapshot {
        self.engine.market_snapshot(recent_trade_count)
    }
}
