use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tracing::info;

use crate::models::{Event, Quantity, TradeExecuted};

/// Where the engine's structured events go. Implementations must be cheap
/// and non-blocking; the engine publishes outside its book locks.
pub trait EventSink: Send + Sync {
    fn publish(&self, event: Event);
}

/// Renders events through `tracing`.
#[derive(Debug, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn publish(&self, event: Event) {
        match event {
            Event::OrderAccepted(order) => {
                info!(
                    target: "matchbook::orders",
                    order_id = order.order_id,
                    instrument_id = order.instrument_id,
                    side = %order.side,
                    quantity = order.quantity,
                    price = order.price,
                    "order accepted"
                );
            }
            Event::TradeExecuted(trade) => {
                info!(
                    target: "matchbook::trades",
                    instrument_id = trade.instrument_id,
                    quantity = trade.quantity,
                    price = trade.price,
                    bid_order_id = trade.bid_order_id,
                    ask_order_id = trade.ask_order_id,
                    "trade executed"
                );
            }
        }
    }
}

/// Buffers every event in arrival order.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<Event>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }

    pub fn trades(&self) -> Vec<TradeExecuted> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                Event::TradeExecuted(trade) => Some(trade.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn drain(&self) -> Vec<Event> {
        std::mem::take(&mut *self.events.lock())
    }
}

impl EventSink for MemorySink {
    fn publish(&self, event: Event) {
        self.events.lock().push(event);
    }
}

/// Counts orders, trades and traded quantity without buffering.
#[derive(Debug, Default)]
pub struct CountingSink {
    orders: AtomicU64,
    trades: AtomicU64,
    quantity: AtomicU64,
}

impl CountingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn orders(&self) -> u64 {
        self.orders.load(Ordering::Relaxed)
    }

    pub fn trades(&self) -> u64 {
        self.trades.load(Ordering::Relaxed)
    }

    /// Quantity crossed, counted once per trade. A trade removes this much
    /// from each side of the book.
    pub fn quantity_traded(&self) -> Quantity {
        self.quantity.load(Ordering::Relaxed)
    }
}

impl EventSink for CountingSink {
    fn publish(&self, event: Event) {
        match event {
            Event::OrderAccepted(_) => {
                self.orders.fetch_add(1, Ordering::Relaxed);
            }
            Event::TradeExecuted(trade) => {
                self.trades.fetch_add(1, Ordering::Relaxed);
                self.quantity.fetch_add(trade.quantity, Ordering::Relaxed);
            }
        }
    }
}
