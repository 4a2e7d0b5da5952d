//! A single symbol's bid and ask sides (C2).

use crate::book::SideBook;
use crate::types::Side;

pub struct SymbolBook {
    pub bids: SideBook,
    pub asks: SideBook,
}

impl SymbolBook {
    pub fn new() -> Self {
        Self {
            bids: SideBook::new(Side::Buy),
            asks: SideBook::new(Side::Sell),
        }
    }

    pub fn side(&self, side: Side) -> &SideBook {
        match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        }
    }

    pub fn side_mut(&mut self, side: Side) -> &mut SideBook {
        match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        }
    }

    /// The opposite side to the one given — the side a matcher consumes
    /// liquidity from.
    pub fn opposite_mut(&mut self, side: Side) -> &mut SideBook {
        match side {
            Side::Buy => &mut self.asks,
            Side::Sell => &mut self.bids,
        }
    }

    /// True if bid/ask are non-crossed (best_bid < best_ask), which must
    /// hold for every symbol after any submit/amend completes unless one
    /// side is empty.
    pub fn is_crossed(&self) -> bool {
        match (self.bids.best_price(), self.asks.best_price()) {
            (Some(bid), Some(ask)) => bid >= ask,
            _ => false,
        }
    }
}

impl Default for SymbolBook {
    fn default() -> Self {
        Self::new()
    }
}
