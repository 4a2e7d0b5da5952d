//! Core value types: orders, trades, sides, and the price/timestamp
//! wrappers used as priority keys.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Unique, process-wide, monotonically increasing order identifier.
pub type OrderId = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// Monotonic ingress tick, captured once under the engine lock. Used for
/// priority ordering only; never for display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub u64);

/// Price wrapper giving `f64` a total order via `total_cmp`, so distinct
/// bit patterns never collapse into a single price level and no rounding
/// is ever applied, per the matching contract.
#[derive(Clone, Copy, Debug)]
pub struct OrderedPrice(pub f64);

impl PartialEq for OrderedPrice {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}
impl Eq for OrderedPrice {}

impl PartialOrd for OrderedPrice {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for OrderedPrice {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// A resting or incoming order. `quantity` is the mutable residual.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    pub symbol: String,
    pub side: Side,
    pub price: f64,
    pub quantity: u64,
    pub timestamp: Timestamp,
    pub wall_time: DateTime<Local>,
}

impl std::fmt::Display for Order {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "#{} {} {} {}@{} ts={}",
            self.order_id, self.symbol, self.side, self.quantity, self.price, self.timestamp.0
        )
    }
}

/// An immutable, completed match between two orders.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Trade {
    pub buy_order_id: OrderId,
    pub sell_order_id: OrderId,
    pub symbol: String,
    pub price: f64,
    pub quantity: u64,
    pub timestamp: Timestamp,
    pub wall_time: DateTime<Local>,
}

impl std::fmt::Display for Trade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {}@{} buy=#{} sell=#{}",
            self.symbol, self.quantity, self.price, self.buy_order_id, self.sell_order_id
        )
    }
}

/// Formats a wall-clock timestamp the way the event sink / wire format
/// expect: `YYYY-MM-DD HH:MM:SS` local time.
pub fn format_wall_time(t: &DateTime<Local>) -> String {
    t.format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;

    #[test]
    fn ordered_price_totally_orders_distinct_bits() {
        let a = OrderedPrice(100.0);
        let b = OrderedPrice(100.5);
        assert!(a < b);
        assert_eq!(OrderedPrice(100.0), OrderedPrice(100.0));
    }

    #[test]
    fn order_display_does_not_panic() {
        let o = Order {
            order_id: 1,
            symbol: "NVDA".into(),
            side: Side::Buy,
            price: 100.0,
            quantity: 10,
            timestamp: Timestamp(0),
            wall_time: Local::now(),
        };
        assert!(!format!("{o}").is_empty());
    }
}
