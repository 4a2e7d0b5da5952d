//! Central limit order book matching engine with price-time priority.
//!
//! Core features:
//! - Price-time priority matching (best price first, then FIFO)
//! - Partial fills and immediate execution against resting liquidity
//! - A stable per-order handle (the order_id) backing an O(1)-average
//!   cross-index, so cancel/amend never require a linear scan
//! - A single engine-wide lock: correctness over per-symbol sharding,
//!   since cross-index lookups span symbols

pub mod book;
pub mod clock;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod sink;
pub mod snapshot;
pub mod symbol_book;
pub mod types;

pub use engine::{EngineOptions, MatchingEngine};
pub use error::SubmitError;
pub use sink::{EventKind, EventSink, FileLogger, NullSink};
pub use snapshot::{MarketSnapshot, OrderBookSnapshot, PriceLevel, TradeSnapshot};
pub use types::{format_wall_time, Order, OrderId, Side, Timestamp, Trade};
