use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use metrics::counter;
use tracing::debug;

use crate::book::{BookSnapshot, InstrumentBook};
use crate::config::InstrumentConfig;
use crate::models::{
    Event, InstrumentId, OrderAccepted, OrderId, Price, Quantity, Side, TradeExecuted,
};
use crate::registry::BookRegistry;
use crate::sink::EventSink;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("unknown instrument {0}")]
    UnknownInstrument(InstrumentId),
    #[error("quantity must be greater than zero")]
    ZeroQuantity,
    #[error("price {price} outside allowed band {min}..={max}")]
    PriceOutOfBand { price: Price, min: Price, max: Price },
}

pub struct MatchingEngine {
    registry: BookRegistry,
    sink: Arc<dyn EventSink>,
    next_order_id: AtomicU64,
}

impl MatchingEngine {
    pub fn new(
        instruments: impl IntoIterator<Item = InstrumentConfig>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        let registry = BookRegistry::new();
        for config in instruments {
            registry.register(config);
        }
        Self {
            registry,
            sink,
            next_order_id: AtomicU64::new(1),
        }
    }

    pub fn register_instrument(&self, config: InstrumentConfig) {
        self.registry.register(config);
    }

    pub fn instruments(&self) -> Vec<InstrumentId> {
        self.registry.instruments()
    }

    /// Validates and rests a limit order on the matching side's book.
    /// Touches only that side's lock, so intake interleaves freely with
    /// matching and with intake on the opposite side.
    pub fn add_order(
        &self,
        side: Side,
        instrument_id: InstrumentId,
        quantity: Quantity,
        price: Price,
    ) -> Result<OrderId, EngineError> {
        let book = self.resolve(instrument_id)?;
        if quantity == 0 {
            return Err(EngineError::ZeroQuantity);
        }
        let config = book.config();
        if price < config.min_price || price > config.max_price {
            return Err(EngineError::PriceOutOfBand {
                price,
                min: config.min_price,
                max: config.max_price,
            });
        }

        let order_id = self.next_order_id.fetch_add(1, Ordering::Relaxed);
        match side {
            Side::Buy => {
                book.bids.lock().insert(order_id, price, quantity);
            }
            Side::Sell => {
                book.asks.lock().insert(order_id, price, quantity);
            }
        }

        counter!("matchbook_orders_accepted").increment(1);
        debug!(order_id, instrument_id, %side, quantity, price, "order accepted");
        self.sink.publish(Event::OrderAccepted(OrderAccepted {
            order_id,
            instrument_id,
            side,
            quantity,
            price,
        }));
        Ok(order_id)
    }

    /// Runs the match loop to exhaustion for one instrument, emitting one
    /// `TradeExecuted` per crossing. Each iteration holds both side locks,
    /// bids first, so best-selection, fill and removal commit as a single
    /// transaction; a concurrent match on the same instrument serializes
    /// behind it rather than observing a half-applied trade.
    pub fn match_instrument(&self, instrument_id: InstrumentId) -> Result<(), EngineError> {
        let book = self.resolve(instrument_id)?;
        loop {
            let trade = {
                let mut bids = book.bids.lock();
                let mut asks = book.asks.lock();
                let Some(bid_key) = bids.best() else { break };
                let Some(ask_key) = asks.best() else { break };
                let bid = *bids.get(bid_key).expect("best returned a live key");
                let ask = *asks.get(ask_key).expect("best returned a live key");
                if bid.price < ask.price {
                    break;
                }

                let quantity = bid.remaining.min(ask.remaining);
                bids.fill(bid_key, quantity);
                asks.fill(ask_key, quantity);
                TradeExecuted {
                    instrument_id,
                    quantity,
                    // Trade prints at the resting buy order's price.
                    price: bid.price,
                    bid_order_id: bid.order_id,
                    ask_order_id: ask.order_id,
                }
            };

            counter!("matchbook_trades_executed").increment(1);
            counter!("matchbook_quantity_traded").increment(trade.quantity);
            debug!(
                instrument_id,
                quantity = trade.quantity,
                price = trade.price,
                "trade executed"
            );
            self.sink.publish(Event::TradeExecuted(trade));
        }
        Ok(())
    }

    pub fn snapshot(&self, instrument_id: InstrumentId) -> Result<BookSnapshot, EngineError> {
        Ok(self.resolve(instrument_id)?.snapshot())
    }

    fn resolve(&self, instrument_id: InstrumentId) -> Result<Arc<InstrumentBook>, EngineError> {
        self.registry
            .get(instrument_id)
            .ok_or(EngineError::UnknownInstrument(instrument_id))
    }
}
