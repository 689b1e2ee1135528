//! Derived, read-only views over the catalog and ledger.
//!
//! Everything here is a pure function of current state; nothing mutates or persists.

use stockbook_core::ProductId;

use crate::catalog::Catalog;
use crate::ledger::Ledger;
use crate::movement::Movement;
use crate::product::Product;

/// Number of entries the recent-movements view shows by default.
pub const DEFAULT_RECENT_LIMIT: usize = 20;

/// Label for movements whose product no longer exists.
pub const DELETED_PRODUCT_LABEL: &str = "(deleted product)";

/// Stock classification against the reorder level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StockStatus {
    Ok,
    Low,
    Out,
}

impl StockStatus {
    pub fn label(&self) -> &'static str {
        match self {
            StockStatus::Ok => "OK",
            StockStatus::Low => "Low",
            StockStatus::Out => "Out of Stock",
        }
    }
}

/// OUT at or below zero; LOW up to and including the reorder level; OK above it.
pub fn classify_stock_status(product: &Product) -> StockStatus {
    if product.quantity() <= 0 {
        StockStatus::Out
    } else if product.quantity() <= product.reorder_level() {
        StockStatus::Low
    } else {
        StockStatus::Ok
    }
}

/// Products whose `name + sku + category` contains `query`, case-insensitively.
///
/// A blank query returns the whole catalog in insertion order.
pub fn filter_products<'a>(catalog: &'a Catalog, query: &str) -> Vec<&'a Product> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return catalog.iter().collect();
    }

    catalog
        .iter()
        .filter(|p| {
            let haystack = format!("{}{}{}", p.name(), p.sku(), p.category().unwrap_or(""));
            haystack.to_lowercase().contains(&query)
        })
        .collect()
}

/// Product side of a movement row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProductRef<'a> {
    Resolved(&'a Product),
    Deleted,
}

impl ProductRef<'_> {
    pub fn label(&self) -> String {
        match self {
            ProductRef::Resolved(product) => product.label(),
            ProductRef::Deleted => DELETED_PRODUCT_LABEL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecentMovement<'a> {
    pub movement: &'a Movement,
    pub product: ProductRef<'a>,
}

/// Newest `limit` movements, each resolved against the current catalog.
///
/// Equal timestamps keep no particular relative order.
pub fn recent_movements<'a>(
    catalog: &'a Catalog,
    ledger: &'a Ledger,
    limit: usize,
) -> Vec<RecentMovement<'a>> {
    let mut sorted: Vec<&Movement> = ledger.iter().collect();
    sorted.sort_unstable_by(|a, b| b.timestamp().cmp(&a.timestamp()));

    sorted
        .into_iter()
        .take(limit)
        .map(|movement| RecentMovement {
            movement,
            product: catalog
                .find(movement.product_id())
                .map_or(ProductRef::Deleted, ProductRef::Resolved),
        })
        .collect()
}

/// Headline figures for the whole catalog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InventoryStatistics {
    pub total_products: usize,
    /// Plain sum; negative balances subtract.
    pub total_quantity: i64,
    pub inventory_value: f64,
    /// Products classified LOW (OUT is not counted).
    pub low_stock_count: usize,
}

pub fn compute_statistics(catalog: &Catalog) -> InventoryStatistics {
    catalog.iter().fold(
        InventoryStatistics {
            total_products: catalog.len(),
            total_quantity: 0,
            inventory_value: 0.0,
            low_stock_count: 0,
        },
        |mut stats, product| {
            stats.total_quantity = stats.total_quantity.saturating_add(product.quantity());
            stats.inventory_value += product.stock_value();
            if classify_stock_status(product) == StockStatus::Low {
                stats.low_stock_count += 1;
            }
            stats
        },
    )
}

/// A product needing attention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockAlert {
    pub product_id: ProductId,
    pub label: String,
    pub status: StockStatus,
    pub quantity: i64,
    pub reorder_level: i64,
}

/// Every LOW or OUT product, in catalog order.
pub fn low_stock_alerts(catalog: &Catalog) -> Vec<StockAlert> {
    catalog
        .iter()
        .filter_map(|product| match classify_stock_status(product) {
            StockStatus::Ok => None,
            status => Some(StockAlert {
                product_id: product.id_typed().clone(),
                label: product.label(),
                status,
                quantity: product.quantity(),
                reorder_level: product.reorder_level(),
            }),
        })
        .collect()
}

/// `(id, "name (sku)")` pairs for a product picker, in catalog order.
pub fn product_options(catalog: &Catalog) -> Vec<(ProductId, String)> {
    catalog
        .iter()
        .map(|p| (p.id_typed().clone(), p.label()))
        .collect()
}

/// Two-decimal amount prefixed with `symbol`; non-finite amounts render as zero.
pub fn format_currency(amount: f64, symbol: &str) -> String {
    let amount = if amount.is_finite() { amount } else { 0.0 };
    format!("{symbol}{amount:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::{
        DeleteProduct, Inventory, InventoryCommand, RecordMovement, UpsertProduct,
    };
    use crate::movement::MovementType;
    use crate::product::ProductInput;
    use chrono::{TimeZone, Utc};
    use stockbook_core::{Aggregate, MovementId};

    fn execute(inventory: &mut Inventory, command: InventoryCommand) {
        for event in inventory.handle(&command).unwrap() {
            inventory.apply(&event);
        }
    }

    fn add(inventory: &mut Inventory, id: &str, input: ProductInput) -> ProductId {
        let id = ProductId::from(id);
        execute(
            inventory,
            InventoryCommand::UpsertProduct(UpsertProduct {
                new_id: id.clone(),
                input,
            }),
        );
        id
    }

    fn stocked(quantity: i64, reorder_level: i64) -> Product {
        let mut inventory = Inventory::new();
        add(
            &mut inventory,
            "p",
            ProductInput::new("Item", "SKU")
                .with_quantity(quantity)
                .with_reorder_level(reorder_level),
        );
        inventory.catalog().as_slice()[0].clone()
    }

    fn demo_inventory() -> Inventory {
        let mut inventory = Inventory::new();
        add(
            &mut inventory,
            "laptop",
            ProductInput::new("HP Laptop 15s", "LAP-HP-15S")
                .with_category("Laptop")
                .with_quantity(8)
                .with_reorder_level(3)
                .with_price(45000.0),
        );
        add(
            &mut inventory,
            "mouse",
            ProductInput::new("Logitech Wireless Mouse", "MOU-LOGI-M185")
                .with_category("Accessories")
                .with_quantity(25)
                .with_reorder_level(10)
                .with_price(699.0),
        );
        add(
            &mut inventory,
            "hdd",
            ProductInput::new("Seagate 1TB HDD", "HDD-SG-1TB")
                .with_category("Storage")
                .with_quantity(5)
                .with_reorder_level(5)
                .with_price(3500.0),
        );
        inventory
    }

    fn record(inventory: &mut Inventory, product: &str, millis: i64) {
        execute(
            inventory,
            InventoryCommand::RecordMovement(RecordMovement {
                movement_id: MovementId::generate(),
                product_id: ProductId::from(product),
                movement_type: MovementType::In,
                quantity: 1,
                note: None,
                occurred_at: Utc.timestamp_millis_opt(millis).unwrap(),
            }),
        );
    }

    #[test]
    fn classification_boundaries() {
        assert_eq!(classify_stock_status(&stocked(5, 5)), StockStatus::Low);
        assert_eq!(classify_stock_status(&stocked(6, 5)), StockStatus::Ok);
        assert_eq!(classify_stock_status(&stocked(0, 5)), StockStatus::Out);
        assert_eq!(classify_stock_status(&stocked(-2, 5)), StockStatus::Out);
        assert_eq!(classify_stock_status(&stocked(0, 0)), StockStatus::Out);
        assert_eq!(classify_stock_status(&stocked(1, 0)), StockStatus::Ok);
        assert_eq!(StockStatus::Out.label(), "Out of Stock");
    }

    #[test]
    fn statistics_over_demo_catalog() {
        let inventory = demo_inventory();
        let stats = compute_statistics(inventory.catalog());

        assert_eq!(stats.total_products, 3);
        assert_eq!(stats.total_quantity, 38);
        // 8 × 45000 + 25 × 699 + 5 × 3500
        assert_eq!(stats.inventory_value, 394_975.0);
        // Only the HDD (5 at reorder level 5) is LOW.
        assert_eq!(stats.low_stock_count, 1);
    }

    #[test]
    fn statistics_exclude_out_of_stock_from_low_count() {
        let mut inventory = Inventory::new();
        add(&mut inventory, "a", ProductInput::new("A", "A").with_quantity(0));
        add(&mut inventory, "b", ProductInput::new("B", "B").with_quantity(-4).with_price(2.0));
        add(&mut inventory, "c", ProductInput::new("C", "C").with_quantity(2));

        let stats = compute_statistics(inventory.catalog());
        assert_eq!(stats.total_quantity, -2);
        assert_eq!(stats.inventory_value, -8.0);
        assert_eq!(stats.low_stock_count, 1);
    }

    #[test]
    fn empty_catalog_statistics_are_zero() {
        let stats = compute_statistics(&Catalog::new());
        assert_eq!(stats.total_products, 0);
        assert_eq!(stats.total_quantity, 0);
        assert_eq!(stats.inventory_value, 0.0);
        assert_eq!(stats.low_stock_count, 0);
    }

    #[test]
    fn filter_is_case_insensitive() {
        let inventory = demo_inventory();
        for query in ["hp", "HP", " Hp "] {
            let hits = filter_products(inventory.catalog(), query);
            assert_eq!(hits.len(), 1);
            assert_eq!(hits[0].name(), "HP Laptop 15s");
        }
    }

    #[test]
    fn filter_matches_sku_and_category() {
        let inventory = demo_inventory();
        let hits = filter_products(inventory.catalog(), "mou-logi");
        assert_eq!(hits[0].sku(), "MOU-LOGI-M185");

        let hits = filter_products(inventory.catalog(), "storage");
        assert_eq!(hits[0].sku(), "HDD-SG-1TB");

        assert!(filter_products(inventory.catalog(), "tablet").is_empty());
    }

    #[test]
    fn blank_filter_returns_catalog_order() {
        let inventory = demo_inventory();
        let names: Vec<_> = filter_products(inventory.catalog(), "   ")
            .into_iter()
            .map(Product::name)
            .collect();
        assert_eq!(
            names,
            vec!["HP Laptop 15s", "Logitech Wireless Mouse", "Seagate 1TB HDD"]
        );
    }

    #[test]
    fn recent_movements_are_newest_first_and_truncated() {
        let mut inventory = demo_inventory();
        for (i, product) in ["laptop", "mouse", "hdd", "mouse", "laptop"].iter().enumerate() {
            record(&mut inventory, product, 1_000 + (i as i64 * 7) % 5 * 100);
        }

        let recent = recent_movements(inventory.catalog(), inventory.ledger(), 3);
        assert_eq!(recent.len(), 3);
        for pair in recent.windows(2) {
            assert!(pair[0].movement.timestamp() >= pair[1].movement.timestamp());
        }
        assert_eq!(recent[0].movement.timestamp().timestamp_millis(), 1_400);

        let all = recent_movements(inventory.catalog(), inventory.ledger(), DEFAULT_RECENT_LIMIT);
        assert_eq!(all.len(), 5);
    }

    #[test]
    fn recent_movements_tag_deleted_products() {
        let mut inventory = demo_inventory();
        record(&mut inventory, "mouse", 10);
        execute(
            &mut inventory,
            InventoryCommand::DeleteProduct(DeleteProduct {
                product_id: ProductId::from("mouse"),
            }),
        );

        let recent = recent_movements(inventory.catalog(), inventory.ledger(), 20);
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].product, ProductRef::Deleted);
        assert_eq!(recent[0].product.label(), "(deleted product)");
    }

    #[test]
    fn alerts_list_low_and_out_products() {
        let mut inventory = demo_inventory();
        add(&mut inventory, "empty", ProductInput::new("Cable", "CBL-1"));

        let alerts = low_stock_alerts(inventory.catalog());
        let summary: Vec<_> = alerts.iter().map(|a| (a.label.as_str(), a.status)).collect();
        assert_eq!(
            summary,
            vec![
                ("Seagate 1TB HDD (HDD-SG-1TB)", StockStatus::Low),
                ("Cable (CBL-1)", StockStatus::Out),
            ]
        );
    }

    #[test]
    fn product_options_follow_catalog_order() {
        let inventory = demo_inventory();
        let options = product_options(inventory.catalog());
        assert_eq!(options[0], (ProductId::from("laptop"), "HP Laptop 15s (LAP-HP-15S)".to_string()));
        assert_eq!(options.len(), 3);
    }

    #[test]
    fn currency_uses_two_decimals() {
        assert_eq!(format_currency(394_975.0, "₹"), "₹394975.00");
        assert_eq!(format_currency(12.5, "$"), "$12.50");
        assert_eq!(format_currency(f64::NAN, "₹"), "₹0.00");
    }
}
