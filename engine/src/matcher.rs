//! The matching algorithm (C4): consumes resting liquidity from the
//! opposite side of the book under a price-crossing predicate, splitting
//! residuals and emitting trades.
//!
//! Parameterised only over the incoming order's side (which selects the
//! crossing predicate and the buy/sell trade-id assignment) — the same
//! loop drives both directions, rather than duplicating it per side.

use chrono::{DateTime, Local};

use crate::book::SideBook;
use crate::types::{Order, Side, Timestamp, Trade};

fn crosses(incoming_side: Side, incoming_price: f64, resting_price: f64) -> bool {
    match incoming_side {
        Side::Buy => incoming_price >= resting_price,
        Side::Sell => incoming_price <= resting_price,
    }
}

/// Trades produced by a single `match_order` call, plus the ids of any
/// resting orders that were fully consumed. The caller owns the
/// cross-index (C3) and is responsible for erasing those ids from it —
/// the matcher only knows about the side container it was given.
pub struct MatchOutcome {
    pub trades: Vec<Trade>,
    pub filled_resting_ids: Vec<crate::types::OrderId>,
}

/// Matches `incoming` against `opposite`, mutating `incoming.quantity`
/// down to its post-match residual and removing/decrementing consumed
/// resting orders from `opposite`. Returns the trades produced, in the
/// order they occurred.
///
/// `now` is called once per match to stamp the trade; it must be the
/// engine's own clock so trade timestamps are consistent with order
/// timestamps under the same lock.
pub fn match_order(
    incoming: &mut Order,
    opposite: &mut SideBook,
    mut now: impl FnMut() -> (Timestamp, DateTime<Local>),
) -> MatchOutcome {
    let mut trades = Vec::new();
    let mut filled_resting_ids = Vec::new();

    while incoming.quantity > 0 {
        let Some(resting_id) = opposite.peek_best_order_id() else {
            break;
        };

        // Capture the resting price (and the id itself, above) before
        // doing anything that could invalidate a reference into the
        // container. The id must never be re-derived from a container
        // erase's return value later in this function.
        let resting_price = opposite
            .get(resting_id)
            .expect("id returned by peek_best_order_id must be resting")
            .price;

        if !crosses(incoming.side, incoming.price, resting_price) {
            break;
        }

        let resting_qty = opposite.get(resting_id).unwrap().quantity;
        let fill = incoming.quantity.min(resting_qty);

        let (ts, wall) = now();
        let (buy_order_id, sell_order_id) = match incoming.side {
            Side::Buy => (incoming.order_id, resting_id),
            Side::Sell => (resting_id, incoming.order_id),
        };

        trades.push(Trade {
            buy_order_id,
            sell_order_id,
            symbol: incoming.symbol.clone(),
            price: resting_price,
            quantity: fill,
            timestamp: ts,
            wall_time: wall,
        });

        incoming.quantity -= fill;
        opposite.decrement(resting_id, fill);

        let residual = opposite.get(resting_id).unwrap().quantity;
        if residual == 0 {
            opposite.remove(resting_id);
            filled_resting_ids.push(resting_id);
        } else {
            // incoming.quantity must now be 0, else the loop would
            // continue against this same still-resting order.
            break;
        }
    }

    MatchOutcome {
        trades,
        filled_resting_ids,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OrderId;
    use chrono::Local;
    use std::cell::Cell;

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

    fn clock() -> impl FnMut() -> (Timestamp, DateTime<Local>) {
        let tick = Cell::new(1000u64);
        move || {
            let t = tick.get();
            tick.set(t + 1);
            (Timestamp(t), Local::now())
        }
    }

    #[test]
    fn partial_fill_against_two_levels() {
        let mut asks = SideBook::new(Side::Sell);
        asks.insert(order(1, Side::Sell, 100.0, 10, 1));
        asks.insert(order(2, Side::Sell, 101.0, 5, 2));

        let mut incoming = order(3, Side::Buy, 101.0, 12, 3);
        let outcome = match_order(&mut incoming, &mut asks, clock());

        assert_eq!(outcome.trades.len(), 2);
        assert_eq!(outcome.trades[0].price, 100.0);
        assert_eq!(outcome.trades[0].quantity, 10);
        assert_eq!(outcome.trades[1].price, 101.0);
        assert_eq!(outcome.trades[1].quantity, 2);
        assert_eq!(outcome.filled_resting_ids, vec![1]);
        assert_eq!(incoming.quantity, 0);
        assert_eq!(asks.get(2).unwrap().quantity, 3);
    }

    #[test]
    fn no_cross_produces_no_trades() {
        let mut asks = SideBook::new(Side::Sell);
        asks.insert(order(1, Side::Sell, 105.0, 10, 1));

        let mut incoming = order(2, Side::Buy, 104.0, 10, 2);
        let outcome = match_order(&mut incoming, &mut asks, clock());

        assert!(outcome.trades.is_empty());
        assert!(outcome.filled_resting_ids.is_empty());
        assert_eq!(incoming.quantity, 10);
        assert_eq!(asks.len(), 1);
    }
}
