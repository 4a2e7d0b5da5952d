//! One side (bids or asks) of a single symbol's book.
//!
//! Storage is split in two: a `BTreeMap<OrderedPrice, BTreeSet<LevelKey>>`
//! gives O(log n) best-price lookup and O(log n) removal of a specific
//! (timestamp, order_id) key, while a `HashMap<OrderId, Order>` arena
//! holds the actual resting records. The order_id is therefore a stable
//! "handle": it never moves, even as other orders are inserted or
//! erased, which is exactly what the cross-index (C3) needs to point at.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::types::{Order, OrderId, OrderedPrice, Side, Timestamp};

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct LevelKey(Timestamp, OrderId);

pub struct SideBook {
    side: Side,
    levels: BTreeMap<OrderedPrice, BTreeSet<LevelKey>>,
    orders: HashMap<OrderId, Order>,
}

impl SideBook {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            levels: BTreeMap::new(),
            orders: HashMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    fn best_price_key(&self) -> Option<OrderedPrice> {
        match self.side {
            // Bids: best is the highest price, i.e. the back of the map.
            Side::Buy => self.levels.keys().next_back().copied(),
            // Asks: best is the lowest price, i.e. the front of the map.
            Side::Sell => self.levels.keys().next().copied(),
        }
    }

    pub fn best_price(&self) -> Option<f64> {
        self.best_price_key().map(|p| p.0)
    }

    /// The order_id with earliest-timestamp priority at the best price
    /// level, without removing it.
    pub fn peek_best_order_id(&self) -> Option<OrderId> {
        let key = self.best_price_key()?;
        self.levels.get(&key)?.iter().next().map(|lk| lk.1)
    }

    pub fn get(&self, id: OrderId) -> Option<&Order> {
        self.orders.get(&id)
    }

    pub fn contains(&self, id: OrderId) -> bool {
        self.orders.contains_key(&id)
    }

    pub fn insert(&mut self, order: Order) {
        let key = OrderedPrice(order.price);
        let level_key = LevelKey(order.timestamp, order.order_id);
        self.levels.entry(key).or_default().insert(level_key);
        self.orders.insert(order.order_id, order);
    }

    /// Decrements the resting order's residual in place. Does not touch
    /// the priority index — quantity is not part of the priority key.
    pub fn decrement(&mut self, id: OrderId, qty: u64) {
        if let Some(order) = self.orders.get_mut(&id) {
            order.quantity = order.quantity.saturating_sub(qty);
        }
    }

    /// Removes and returns the order with the given id. Callers must
    /// capture `id` from a prior lookup before calling this — never try
    /// to recover "the id we just removed" from this method's return
    /// value after the fact from a different code path.
    pub fn remove(&mut self, id: OrderId) -> Option<Order> {
        let order = self.orders.remove(&id)?;
        let key = OrderedPrice(order.price);
        if let Some(set) = self.levels.get_mut(&key) {
            set.remove(&LevelKey(order.timestamp, id));
            if set.is_empty() {
                self.levels.remove(&key);
            }
        }
        Some(order)
    }

    /// Sets a resting order's price/timestamp/quantity in place without
    /// changing its priority-queue position. Used for quantity-only
    /// amends, which must preserve time priority.
    pub fn set_quantity(&mut self, id: OrderId, quantity: u64) -> bool {
        match self.orders.get_mut(&id) {
            Some(order) => {
                order.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Aggregated (price, total_quantity) levels from best to worst,
    /// capped at `depth` levels.
    pub fn top_levels(&self, depth: usize) -> Vec<(f64, u64)> {
        let levels_best_first: Box<dyn Iterator<Item = (&OrderedPrice, &BTreeSet<LevelKey>)>> =
            match self.side {
                Side::Buy => Box::new(self.levels.iter().rev()),
                Side::Sell => Box::new(self.levels.iter()),
            };

        levels_best_first
            .take(depth)
            .map(|(price, keys)| {
                let qty: u64 = keys
                    .iter()
                    .filter_map(|lk| self.orders.get(&lk.1))
                    .map(|o| o.quantity)
                    .sum();
                (price.0, qty)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;

    fn order(id: OrderId, side: Side, price: f64, qty: u64, ts: u64) -> Order {
        Order {
            order_id: id,
            symbol: "NVDA".into(),
            side,
            price,
            quantity: qty,
            timestamp: Timestamp(ts),
            wall_time: Local::now(),
        }
    }

    #[test]
    fn bids_best_price_is_highest() {
        let mut bids = SideBook::new(Side::Buy);
        bids.insert(order(1, Side::Buy, 100.0, 10, 1));
        bids.insert(order(2, Side::Buy, 101.0, 5, 2));
        assert_eq!(bids.best_price(), Some(101.0));
    }

    #[test]
    fn asks_best_price_is_lowest() {
        let mut asks = SideBook::new(Side::Sell);
        asks.insert(order(1, Side::Sell, 101.0, 10, 1));
        asks.insert(order(2, Side::Sell, 100.0, 5, 2));
        assert_eq!(asks.best_price(), Some(100.0));
    }

    #[test]
    fn fifo_within_price_level() {
        let mut bids = SideBook::new(Side::Buy);
        bids.insert(order(1, Side::Buy, 100.0, 4, 10));
        bids.insert(order(2, Side::Buy, 100.0, 5, 20));
        assert_eq!(bids.peek_best_order_id(), Some(1));
        bids.remove(1);
        assert_eq!(bids.peek_best_order_id(), Some(2));
    }

    #[test]
    fn remove_cleans_up_empty_level() {
        let mut bids = SideBook::new(Side::Buy);
        bids.insert(order(1, Side::Buy, 100.0, 4, 10));
        bids.remove(1);
        assert!(bids.best_price().is_none());
        assert!(bids.is_empty());
    }

    #[test]
    fn top_levels_aggregates_same_price() {
        let mut bids = SideBook::new(Side::Buy);
        bids.insert(order(1, Side::Buy, 100.0, 4, 1));
        bids.insert(order(2, Side::Buy, 100.0, 5, 2));
        bids.insert(order(3, Side::Buy, 101.0, 5, 3));
        let top = bids.top_levels(10);
        assert_eq!(top, vec![(101.0, 5), (100.0, 9)]);
    }
}
