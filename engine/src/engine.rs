//! The engine facade (C5): the only thing producers and readers ever
//! touch directly. A single `std::sync::Mutex` serialises every
//! mutating and reading operation against the books, the cross-index,
//! and the trade log — there is no per-symbol locking, because the
//! cross-index spans symbols (§5).

use std::collections::HashMap;
use std::sync::Mutex;

use tracing::error;

use crate::clock::EngineClock;
use crate::error::SubmitError;
use crate::matcher;
use crate::sink::{EventKind, EventSink};
use crate::snapshot::{MarketSnapshot, OrderBookSnapshot, PriceLevel, TradeSnapshot};
use crate::symbol_book::SymbolBook;
use crate::types::{format_wall_time, Order, OrderId, Side, Trade};

fn order_event_payload(order: &Order) -> String {
    format!(
        "{},{},{},{},{}",
        order.symbol,
        order.side,
        order.price,
        order.quantity,
        format_wall_time(&order.wall_time)
    )
}

fn trade_event_payload(trade: &Trade) -> String {
    format!(
        "{},{},{},{},{},{}",
        trade.buy_order_id,
        trade.sell_order_id,
        trade.symbol,
        trade.price,
        trade.quantity,
        format_wall_time(&trade.wall_time)
    )
}

struct EngineState {
    books: HashMap<String, SymbolBook>,
    /// order_id -> (symbol, side); the actual Order record lives in the
    /// relevant SideBook's arena, keyed by the same order_id.
    index: HashMap<OrderId, (String, Side)>,
    trades: Vec<Trade>,
    next_order_id: OrderId,
    clock: EngineClock,
}

/// Configuration for behaviour that isn't part of the core invariants:
/// an optional retention cap on the trade log. `None` (the default)
/// leaves it unbounded, matching the baseline spec.
#[derive(Clone, Copy, Debug, Default)]
pub struct EngineOptions {
    pub trade_log_capacity: Option<usize>,
}

pub struct MatchingEngine {
    state: Mutex<EngineState>,
    sink: Box<dyn EventSink>,
    options: EngineOptions,
}

impl MatchingEngine {
    pub fn new(sink: Box<dyn EventSink>) -> Self {
        Self::with_options(sink, EngineOptions::default())
    }

    pub fn with_options(sink: Box<dyn EventSink>, options: EngineOptions) -> Self {
        Self {
            state: Mutex::new(EngineState {
                books: HashMap::new(),
                index: HashMap::new(),
                trades: Vec::new(),
                next_order_id: 1,
                clock: EngineClock::new(),
            }),
            sink,
            options,
        }
    }

    /// Submits a new limit order. Runs the matcher immediately; any
    /// residual quantity rests in the book. Returns the assigned
    /// order_id, or a `SubmitError` if a precondition was violated (in
    /// which case no state changes and nothing is logged).
    pub fn submit(
        &self,
        symbol: &str,
        side: Side,
        price: f64,
        quantity: u64,
    ) -> Result<OrderId, SubmitError> {
        self.submit_with_trades(symbol, side, price, quantity).map(|(order_id, _)| order_id)
    }

    /// Same as `submit`, but also returns the trades this particular
    /// submission produced, computed inside the same lock acquisition as
    /// the match itself. Callers that need to report "what happened to
    /// my order" (e.g. a REST response) must use this rather than
    /// `submit` plus a separate `recent_trades_for_symbol` lookup: under
    /// concurrent submits to the same symbol, another caller's trades
    /// can land between the two lock acquisitions and corrupt that
    /// reconstruction (§5 permits concurrent producers).
    pub fn submit_with_trades(
        &self,
        symbol: &str,
        side: Side,
        price: f64,
        quantity: u64,
    ) -> Result<(OrderId, Vec<Trade>), SubmitError> {
        if quantity == 0 {
            return Err(SubmitError::NonPositiveQuantity);
        }
        if !(price.is_finite() && price > 0.0) {
            return Err(SubmitError::InvalidPrice);
        }
        if symbol.is_empty() {
            return Err(SubmitError::EmptySymbol);
        }

        let mut state = self.state.lock().unwrap();
        let EngineState {
            books,
            index,
            trades,
            next_order_id,
            clock,
        } = &mut *state;

        let order_id = *next_order_id;
        *next_order_id += 1;
        let (timestamp, wall_time) = clock.now();

        let mut incoming = Order {
            order_id,
            symbol: symbol.to_string(),
            side,
            price,
            quantity,
            timestamp,
            wall_time,
        };
        self.sink.record(EventKind::Add, order_event_payload(&incoming));

        let book = books.entry(symbol.to_string()).or_insert_with(SymbolBook::new);
        let opposite = book.opposite_mut(side);
        let outcome = matcher::match_order(&mut incoming, opposite, || clock.now());

        for id in &outcome.filled_resting_ids {
            index.remove(id);
        }
        for trade in &outcome.trades {
            self.sink.record(EventKind::Trade, trade_event_payload(trade));
        }
        let produced = outcome.trades.clone();
        trades.extend(outcome.trades);
        truncate_trade_log(trades, self.options.trade_log_capacity);

        if incoming.quantity > 0 {
            index.insert(order_id, (symbol.to_string(), side));
            book.side_mut(side).insert(incoming);
        }

        check_invariants(book, symbol);

        Ok((order_id, produced))
    }

    /// Cancels a resting order. Returns `false` (no state change, no
    /// event) if the id is unknown — this is not an error.
    pub fn cancel(&self, order_id: OrderId) -> bool {
        let mut state = self.state.lock().unwrap();
        let EngineState { books, index, .. } = &mut *state;

        let Some((symbol, side)) = index.get(&order_id).cloned() else {
            return false;
        };

        let book = books.get_mut(&symbol).expect("indexed symbol must have a book");
        let removed = book
            .side_mut(side)
            .remove(order_id)
            .expect("indexed order must be resting");
        index.remove(&order_id);

        self.sink.record(EventKind::Cancel, order_event_payload(&removed));
        true
    }

    /// Amends a resting order's price and/or quantity. Returns `false`
    /// if the id is unknown.
    ///
    /// A quantity-only amend (price unchanged) mutates the residual in
    /// place, preserving time priority. A price-changing amend is
    /// cancel-then-resubmit under the same order_id: it loses time
    /// priority, may immediately match, and `new_quantity == 0` is
    /// accepted as equivalent to a plain cancel (no resubmission).
    pub fn amend(&self, order_id: OrderId, new_price: f64, new_quantity: u64) -> bool {
        let mut state = self.state.lock().unwrap();
        let EngineState {
            books,
            index,
            trades,
            next_order_id: _,
            clock,
        } = &mut *state;

        let Some((symbol, side)) = index.get(&order_id).cloned() else {
            return false;
        };
        let book = books.get_mut(&symbol).expect("indexed symbol must have a book");

        let current = book
            .side_mut(side)
            .get(order_id)
            .expect("indexed order must be resting")
            .clone();
        self.sink.record(EventKind::Amend, order_event_payload(&current));

        if OrderedEq(new_price) == OrderedEq(current.price) {
            if new_quantity == 0 {
                book.side_mut(side).remove(order_id);
                index.remove(&order_id);
            } else {
                book.side_mut(side).set_quantity(order_id, new_quantity);
            }
            return true;
        }

        // Price-changing amend: erase first, so the cross-index never
        // references a vacant slot, then re-submit under the same id.
        book.side_mut(side).remove(order_id);
        index.remove(&order_id);

        if new_quantity == 0 {
            return true; // equivalent to cancel; nothing to resubmit
        }

        let (timestamp, wall_time) = clock.now();
        let mut resubmitted = Order {
            order_id,
            symbol: symbol.clone(),
            side,
            price: new_price,
            quantity: new_quantity,
            timestamp,
            wall_time,
        };

        let opposite = book.opposite_mut(side);
        let outcome = matcher::match_order(&mut resubmitted, opposite, || clock.now());

        for id in &outcome.filled_resting_ids {
            index.remove(id);
        }
        for trade in &outcome.trades {
            self.sink.record(EventKind::Trade, trade_event_payload(trade));
        }
        trades.extend(outcome.trades);
        truncate_trade_log(trades, self.options.trade_log_capacity);

        if resubmitted.quantity > 0 {
            index.insert(order_id, (symbol.clone(), side));
            book.side_mut(side).insert(resubmitted);
        }

        check_invariants(book, &symbol);
        true
    }

    pub fn top_bids(&self, symbol: &str, depth: usize) -> Vec<(f64, u64)> {
        let state = self.state.lock().unwrap();
        state
            .books
            .get(symbol)
            .map(|b| b.bids.top_levels(depth))
            .unwrap_or_default()
    }

    pub fn top_asks(&self, symbol: &str, depth: usize) -> Vec<(f64, u64)> {
        let state = self.state.lock().unwrap();
        state
            .books
            .get(symbol)
            .map(|b| b.asks.top_levels(depth))
            .unwrap_or_default()
    }

    pub fn recent_trades(&self, count: usize) -> Vec<Trade> {
        let state = self.state.lock().unwrap();
        let len = state.trades.len();
        state.trades[len.saturating_sub(count)..].to_vec()
    }

    pub fn recent_trades_for_symbol(&self, symbol: &str, count: usize) -> Vec<Trade> {
        let state = self.state.lock().unwrap();
        let mut collected: Vec<Trade> = state
            .trades
            .iter()
            .rev()
            .filter(|t| t.symbol == symbol)
            .take(count)
            .cloned()
            .collect();
        collected.reverse();
        collected
    }

    pub fn symbols(&self) -> Vec<String> {
        let state = self.state.lock().unwrap();
        state.books.keys().cloned().collect()
    }

    pub fn book_snapshot_all(&self) -> Vec<OrderBookSnapshot> {
        let state = self.state.lock().unwrap();
        state
            .books
            .iter()
            .map(|(symbol, book)| OrderBookSnapshot {
                symbol: symbol.clone(),
                bids: book
                    .bids
                    .top_levels(usize::MAX)
                    .into_iter()
                    .map(|(price, quantity)| PriceLevel { price, quantity })
                    .collect(),
                asks: book
                    .asks
                    .top_levels(usize::MAX)
                    .into_iter()
                    .map(|(price, quantity)| PriceLevel { price, quantity })
                    .collect(),
            })
            .collect()
    }

    /// The full §6 wire snapshot: every symbol's book plus the trade
    /// tape, ready to serialise as-is.
    pub fn market_snapshot(&self, recent_trade_count: usize) -> MarketSnapshot {
        MarketSnapshot {
            order_books: self.book_snapshot_all(),
            recent_trades: self
                .recent_trades(recent_trade_count)
                .iter()
                .map(TradeSnapshot::from)
                .collect(),
        }
    }
}

fn truncate_trade_log(trades: &mut Vec<Trade>, capacity: Option<usize>) {
    if let Some(cap) = capacity {
        if trades.len() > cap {
            let excess = trades.len() - cap;
            trades.drain(0..excess);
        }
    }
}

/// Debug-only invariant check: no crossed book. A violation here means a
/// bug in the matcher or book, not bad caller input — it is not
/// recoverable, so it aborts rather than continuing on corrupted state.
fn check_invariants(book: &SymbolBook, symbol: &str) {
    if cfg!(debug_assertions) && book.is_crossed() {
        error!(symbol, "crossed book detected after engine operation");
        panic!("invariant violation: crossed book for symbol {symbol}");
    }
}

/// Bitwise price equality, matching the matcher's own `f64::total_cmp`
/// based comparator: never rounds.
struct OrderedEq(f64);
impl PartialEq for OrderedEq {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}
