use parking_lot::Mutex;

use crate::config::InstrumentConfig;
use crate::models::{Price, Quantity, Side};

pub mod side;

pub use side::{BookSide, FillOutcome, RestingOrder};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookSnapshot {
    pub best_bid: Option<(Price, Quantity)>,
    pub best_ask: Option<(Price, Quantity)>,
    pub bid_depth: usize,
    pub ask_depth: usize,
    pub bid_volume: Quantity,
    pub ask_volume: Quantity,
}

/// Both sides of one instrument's book. Each side has its own lock so
/// intake on one side never contends with intake on the other; the match
/// loop is the only path that holds both, and it always takes bids first.
#[derive(Debug)]
pub struct InstrumentBook {
    pub(crate) bids: Mutex<BookSide>,
    pub(crate) asks: Mutex<BookSide>,
    config: InstrumentConfig,
}

impl InstrumentBook {
    pub fn new(config: InstrumentConfig) -> Self {
        Self {
            bids: Mutex::new(BookSide::new(Side::Buy)),
            asks: Mutex::new(BookSide::new(Side::Sell)),
            config,
        }
    }

    pub fn config(&self) -> &InstrumentConfig {
        &self.config
    }

    pub fn snapshot(&self) -> BookSnapshot {
        let bids = self.bids.lock();
        let asks = self.asks.lock();
        BookSnapshot {
            best_bid: bids.best_level(),
            best_ask: asks.best_level(),
            bid_depth: bids.len(),
            ask_depth: asks.len(),
            bid_volume: bids.resting_volume(),
            ask_volume: asks.resting_volume(),
        }
    }
}
