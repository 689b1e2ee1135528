//! Inventory domain module.
//!
//! This crate contains the product catalog, the movement ledger and the views
//! derived from them, implemented purely as deterministic domain logic (no IO,
//! no storage).

pub mod catalog;
pub mod inventory;
pub mod ledger;
pub mod movement;
pub mod product;
pub mod seed;
pub mod views;

pub use catalog::Catalog;
pub use inventory::{
    DeleteProduct, Inventory, InventoryCommand, InventoryEvent, ProductDeleted, ProductUpserted,
    RecordMovement, StockMoved, UpsertProduct,
};
pub use ledger::Ledger;
pub use movement::{Movement, MovementType};
pub use product::{Product, ProductForm, ProductInput};
pub use views::{InventoryStatistics, ProductRef, RecentMovement, StockAlert, StockStatus};
