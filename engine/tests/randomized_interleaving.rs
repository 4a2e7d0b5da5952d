//! A seeded, reproducible randomized interleaving of submit/cancel/amend
//! across a handful of symbols, checking the invariants that must hold
//! after every single operation: no crossed book, every resting level
//! carries positive quantity, and order ids strictly increase.

use clob_engine::{MatchingEngine, NullSink, Side};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SYMBOLS: &[&str] = &["NVDA", "AAPL", "GOOG"];

fn assert_book_invariants(engine: &MatchingEngine, symbol: &str) {
    let bids = engine.top_bids(symbol, usize::MAX);
    let asks = engine.top_asks(symbol, usize::MAX);

    for &(_, qty) in bids.iter().chain(asks.iter()) {
        assert!(qty > 0, "resting level with non-positive quantity in {symbol}");
    }

    if let (Some(&(best_bid, _)), Some(&(best_ask, _))) = (bids.first(), asks.first()) {
        assert!(
            best_bid < best_ask,
            "crossed book for {symbol}: bid {best_bid} >= ask {best_ask}"
        );
    }
}

#[test]
fn randomized_operations_never_violate_invariants() {
    let engine = MatchingEngine::new(Box::new(NullSink));
    let mut rng = StdRng::seed_from_u64(0xC10B_5EED);
    let mut live_orders: Vec<u64> = Vec::new();
    let mut last_order_id = 0u64;

    for _ in 0..2000 {
        let symbol = SYMBOLS[rng.gen_range(0..SYMBOLS.len())];
        let action = rng.gen_range(0..10);

        if action < 2 && !live_orders.is_empty() {
            let idx = rng.gen_range(0..live_orders.len());
            let id = live_orders[idx];
            if engine.cancel(id) {
                live_orders.remove(idx);
            }
        } else if action < 4 && !live_orders.is_empty() {
            let idx = rng.gen_range(0..live_orders.len());
            let id = live_orders[idx];
            let price = 90.0 + rng.gen_range(0..20) as f64;
            let quantity = rng.gen_range(1..10);
            engine.amend(id, price, quantity);
        } else {
            let side = if rng.gen_bool(0.5) { Side::Buy } else { Side::Sell };
            let price = 90.0 + rng.gen_range(0..20) as f64;
            let quantity = rng.gen_range(1..10);
            let order_id = engine.submit(symbol, side, price, quantity).unwrap();
            assert!(order_id > last_order_id, "order_id must strictly increase");
            last_order_id = order_id;
            live_orders.push(order_id);
        }

        for symbol in SYMBOLS {
            assert_book_invariants(&engine, symbol);
        }
    }

    let trades = engine.recent_trades(usize::MAX);
    for window in trades.windows(2) {
        assert!(
            window[0].timestamp <= window[1].timestamp,
            "trade log must be monotonic by append order"
        );
    }
}
