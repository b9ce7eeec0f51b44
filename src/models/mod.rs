use std::fmt;

use serde::{Deserialize, Serialize};

pub type InstrumentId = u64;
pub type OrderId = u64;
pub type Price = u64;
pub type Quantity = u64;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "buy"),
            Side::Sell => write!(f, "sell"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderAccepted {
    pub order_id: OrderId,
    pub instrument_id: InstrumentId,
    pub side: Side,
    pub quantity: Quantity,
    pub price: Price,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TradeExecuted {
    pub instrument_id: InstrumentId,
    pub quantity: Quantity,
    pub price: Price,
    pub bid_order_id: OrderId,
    pub ask_order_id: OrderId,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Event {
    OrderAccepted(OrderAccepted),
    TradeExecuted(TradeExecuted),
}
