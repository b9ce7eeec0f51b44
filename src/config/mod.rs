use serde::Deserialize;

use crate::models::{InstrumentId, Price, Quantity};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub instruments: Vec<InstrumentConfig>,
    #[serde(default)]
    pub sim: SimConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct InstrumentConfig {
    pub instrument_id: InstrumentId,
    pub min_price: Price,
    pub max_price: Price,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SimConfig {
    pub workers: usize,
    pub orders_per_worker: usize,
    pub max_quantity: Quantity,
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            workers: 2,
            orders_per_worker: 1000,
            max_quantity: 100,
            seed: 42,
        }
    }
}

impl Settings {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let builder = config::Config::builder().add_source(config::File::with_name(path));
        Ok(builder.build()?.try_deserialize()?)
    }

    /// A uniform universe of `count` instruments sharing one price band,
    /// the shape the random driver expects.
    pub fn synthetic(count: u64) -> Self {
        let instruments = (0..count)
            .map(|instrument_id| InstrumentConfig {
                instrument_id,
                min_price: 1,
                max_price: 500,
            })
            .collect();
        Self {
            instruments,
            sim: SimConfig::default(),
        }
    }
}
