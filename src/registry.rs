use std::sync::Arc;

use dashmap::DashMap;

use crate::book::InstrumentBook;
use crate::config::InstrumentConfig;
use crate::models::InstrumentId;

/// Instrument id to book mapping. Dynamically sized; lookups on different
/// instruments never share a lock with book mutation.
#[derive(Debug, Default)]
pub struct BookRegistry {
    books: DashMap<InstrumentId, Arc<InstrumentBook>>,
}

impl BookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an instrument, keeping any book already live under the id.
    pub fn register(&self, config: InstrumentConfig) -> Arc<InstrumentBook> {
        let instrument_id = config.instrument_id;
        let entry = self
            .books
            .entry(instrument_id)
            .or_insert_with(|| Arc::new(InstrumentBook::new(config)));
        Arc::clone(entry.value())
    }

    pub fn get(&self, instrument_id: InstrumentId) -> Option<Arc<InstrumentBook>> {
        self.books
            .get(&instrument_id)
            .map(|entry| Arc::clone(entry.value()))
    }

    pub fn instruments(&self) -> Vec<InstrumentId> {
        self.books.iter().map(|entry| *entry.key()).collect()
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}
