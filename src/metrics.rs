use metrics::describe_counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub fn install_recorder() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    describe_counter!("matchbook_orders_accepted", "Orders accepted into a book side");
    describe_counter!("matchbook_trades_executed", "Trades produced by the match loop");
    describe_counter!("matchbook_quantity_traded", "Total quantity crossed");
    Ok(handle)
}
