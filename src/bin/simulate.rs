use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use matchbook::MatchingEngine;
use matchbook::config::Settings;
use matchbook::metrics::install_recorder;
use matchbook::sim;
use matchbook::sink::CountingSink;

#[derive(Parser, Debug)]
#[command(name = "simulate")]
struct Args {
    /// Settings file; without one, a synthetic 1024-instrument universe is used.
    #[arg(long)]
    config: Option<String>,
    #[arg(long)]
    workers: Option<usize>,
    #[arg(long)]
    orders: Option<usize>,
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();
    let _prom = install_recorder()?;

    let args = Args::parse();
    let mut settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::synthetic(1024),
    };
    if let Some(workers) = args.workers {
        settings.sim.workers = workers;
    }
    if let Some(orders) = args.orders {
        settings.sim.orders_per_worker = orders;
    }
    if let Some(seed) = args.seed {
        settings.sim.seed = seed;
    }

    let sink = Arc::new(CountingSink::new());
    let engine = Arc::new(MatchingEngine::new(
        settings.instruments.clone(),
        Arc::clone(&sink) as Arc<dyn matchbook::EventSink>,
    ));
    info!(
        instruments = settings.instruments.len(),
        workers = settings.sim.workers,
        orders_per_worker = settings.sim.orders_per_worker,
        seed = settings.sim.seed,
        "starting simulation"
    );

    let report = sim::run(&engine, &settings.instruments, &settings.sim);

    info!(
        trades = sink.trades(),
        quantity_traded = sink.quantity_traded(),
        resting_orders = report.resting_orders,
        "simulation summary"
    );
    println!("{}", serde_json::to_string(&report)?);
    Ok(())
}
