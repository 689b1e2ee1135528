use anyhow::Context;

use stockbook_infra::{open_store, InventoryConfig, InventoryService};
use stockbook_inventory::views::format_currency;

fn main() -> anyhow::Result<()> {
    stockbook_observability::init();

    let config = InventoryConfig::from_env();
    let store = open_store(&config).context("failed to open inventory store")?;
    let service = InventoryService::bootstrap(store, &config)
        .context("failed to bootstrap inventory session")?;

    let stats = service.statistics();
    tracing::info!(
        total_products = stats.total_products,
        total_quantity = stats.total_quantity,
        inventory_value = %format_currency(stats.inventory_value, &config.currency_symbol),
        low_stock_count = stats.low_stock_count,
        "inventory statistics"
    );

    for alert in service.low_stock_alerts() {
        tracing::warn!(
            product_id = %alert.product_id,
            product = %alert.label,
            status = alert.status.label(),
            quantity = alert.quantity,
            reorder_level = alert.reorder_level,
            "stock alert"
        );
    }

    for entry in service.recent_movements() {
        tracing::info!(
            at = %entry.movement.timestamp().to_rfc3339(),
            product = %entry.product.label(),
            movement = entry.movement.movement_type().label(),
            quantity = entry.movement.quantity(),
            note = entry.movement.note().unwrap_or("-"),
            "recent movement"
        );
    }

    Ok(())
}
