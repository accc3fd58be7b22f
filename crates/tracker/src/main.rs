use anyhow::Context;

use tracechain_tracker::{SupplyChainTracker, TrackerConfig, short_tx_id};

fn main() -> anyhow::Result<()> {
    tracechain_observability::init();

    let config = TrackerConfig::from_env().context("loading configuration")?;
    let tracker = SupplyChainTracker::new(config)?;

    let registration = tracker.register_product("Heirloom Carrots", "Ana Ruiz", "2024-02-01")?;
    let product_id = registration.product.id_typed().to_string();

    for (status, owner) in [
        ("warehouse", "Fresh Farms Warehouse"),
        ("distributor", "QuickDistrib Co."),
        ("market", "City Market"),
    ] {
        let transfer = tracker.advance_status(&product_id, status, owner)?;
        tracing::info!(
            tx = %short_tx_id(transfer.transaction.id_typed().as_str()),
            location = %transfer.step.location,
            "step recorded"
        );
    }

    let snapshot = tracker.snapshot()?;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    Ok(())
}
