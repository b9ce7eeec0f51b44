pub mod book;
pub mod config;
pub mod engine;
pub mod metrics;
pub mod models;
pub mod registry;
pub mod sim;
pub mod sink;

pub use book::BookSnapshot;
pub use engine::{EngineError, MatchingEngine};
pub use models::{Event, InstrumentId, OrderId, Price, Quantity, Side, TradeExecuted};
pub use sink::EventSink;
