use std::sync::Arc;
use std::thread;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::info;

use crate::config::{InstrumentConfig, SimConfig};
use crate::engine::MatchingEngine;
use crate::models::{Quantity, Side};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SimReport {
    pub orders_submitted: u64,
    pub quantity_submitted: Quantity,
    pub resting_orders: u64,
    pub resting_quantity: Quantity,
}

/// Random order-flow driver: each worker submits uniform limit orders and
/// runs the match loop after every submit. Workers derive their RNG from
/// `seed` plus their index, so a given configuration replays the same flow.
pub fn run(
    engine: &Arc<MatchingEngine>,
    instruments: &[InstrumentConfig],
    sim: &SimConfig,
) -> SimReport {
    assert!(!instruments.is_empty(), "driver needs at least one instrument");

    let totals: Vec<(u64, Quantity)> = thread::scope(|scope| {
        let mut handles = Vec::with_capacity(sim.workers);
        for worker in 0..sim.workers {
            let engine = Arc::clone(engine);
            handles.push(scope.spawn(move || {
                let mut rng = StdRng::seed_from_u64(sim.seed.wrapping_add(worker as u64));
                let mut submitted: Quantity = 0;
                for _ in 0..sim.orders_per_worker {
                    let config = &instruments[rng.gen_range(0..instruments.len())];
                    let side = if rng.gen_bool(0.5) { Side::Buy } else { Side::Sell };
                    let quantity = rng.gen_range(1..=sim.max_quantity);
                    let price = rng.gen_range(config.min_price..=config.max_price);
                    engine
                        .add_order(side, config.instrument_id, quantity, price)
                        .expect("driver submits only in-band orders for configured instruments");
                    engine
                        .match_instrument(config.instrument_id)
                        .expect("driver matches only configured instruments");
                    submitted += quantity;
                }
                (sim.orders_per_worker as u64, submitted)
            }));
        }
        handles
            .into_iter()
            .map(|handle| handle.join().expect("sim worker panicked"))
            .collect()
    });

    let mut resting_orders = 0u64;
    let mut resting_quantity: Quantity = 0;
    for instrument_id in engine.instruments() {
        let snapshot = engine
            .snapshot(instrument_id)
            .expect("registered instrument resolves");
        resting_orders += (snapshot.bid_depth + snapshot.ask_depth) as u64;
        resting_quantity += snapshot.bid_volume + snapshot.ask_volume;
    }

    let report = SimReport {
        orders_submitted: totals.iter().map(|&(orders, _)| orders).sum(),
        quantity_submitted: totals.iter().map(|&(_, quantity)| quantity).sum(),
        resting_orders,
        resting_quantity,
    };
    info!(?report, "simulation finished");
    report
}
