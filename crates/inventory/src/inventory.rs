use chrono::{DateTime, Utc};

use stockbook_core::{Aggregate, InventoryError, MovementId, ProductId};

use crate::catalog::Catalog;
use crate::ledger::Ledger;
use crate::movement::{Movement, MovementType};
use crate::product::{Product, ProductInput};

/// Aggregate root: the product catalog together with its movement ledger.
///
/// Stock movements cross-cut both collections, so they live behind one
/// aggregate and every change goes through `handle` + `apply`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inventory {
    catalog: Catalog,
    ledger: Ledger,
    version: u64,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rehydrate from persisted collections.
    pub fn from_parts(products: Vec<Product>, movements: Vec<Movement>) -> Self {
        Self {
            catalog: Catalog::from_products(products),
            ledger: Ledger::from_movements(movements),
            version: 0,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }
}

/// Command: UpsertProduct.
///
/// `new_id` is used only when `input.id` does not match an existing product.
#[derive(Debug, Clone, PartialEq)]
pub struct UpsertProduct {
    pub new_id: ProductId,
    pub input: ProductInput,
}

/// Command: DeleteProduct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteProduct {
    pub product_id: ProductId,
}

/// Command: RecordMovement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordMovement {
    pub movement_id: MovementId,
    pub product_id: ProductId,
    pub movement_type: MovementType,
    pub quantity: i64,
    pub note: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InventoryCommand {
    UpsertProduct(UpsertProduct),
    DeleteProduct(DeleteProduct),
    RecordMovement(RecordMovement),
}

/// Event: ProductUpserted.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductUpserted {
    pub product: Product,
    /// Quantity of the replaced record; `None` when the product is new.
    pub previous_quantity: Option<i64>,
}

/// Event: ProductDeleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDeleted {
    pub product_id: ProductId,
}

/// Event: StockMoved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockMoved {
    pub movement: Movement,
    pub new_quantity: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InventoryEvent {
    ProductUpserted(ProductUpserted),
    ProductDeleted(ProductDeleted),
    StockMoved(StockMoved),
}

impl InventoryEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            InventoryEvent::ProductUpserted(_) => "inventory.product.upserted",
            InventoryEvent::ProductDeleted(_) => "inventory.product.deleted",
            InventoryEvent::StockMoved(_) => "inventory.stock.moved",
        }
    }
}

impl Aggregate for Inventory {
    type Command = InventoryCommand;
    type Event = InventoryEvent;
    type Error = InventoryError;

    fn version(&self) -> u64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        match event {
            InventoryEvent::ProductUpserted(e) => {
                self.catalog.upsert(e.product.clone());
            }
            InventoryEvent::ProductDeleted(e) => {
                self.catalog.remove(&e.product_id);
            }
            InventoryEvent::StockMoved(e) => {
                if let Some(product) = self.catalog.find_mut(e.movement.product_id()) {
                    product.set_quantity(e.new_quantity);
                }
                self.ledger.append(e.movement.clone());
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            InventoryCommand::UpsertProduct(cmd) => self.handle_upsert(cmd),
            InventoryCommand::DeleteProduct(cmd) => self.handle_delete(cmd),
            InventoryCommand::RecordMovement(cmd) => self.handle_record(cmd),
        }
    }
}

impl Inventory {
    fn handle_upsert(&self, cmd: &UpsertProduct) -> Result<Vec<InventoryEvent>, InventoryError> {
        cmd.input.validate()?;

        let existing = cmd.input.id.as_ref().and_then(|id| self.catalog.find(id));
        let (id, previous_quantity) = match existing {
            Some(product) => (product.id_typed().clone(), Some(product.quantity())),
            None => (cmd.new_id.clone(), None),
        };

        Ok(vec![InventoryEvent::ProductUpserted(ProductUpserted {
            product: Product::from_input(id, &cmd.input),
            previous_quantity,
        })])
    }

    fn handle_delete(&self, cmd: &DeleteProduct) -> Result<Vec<InventoryEvent>, InventoryError> {
        if !self.catalog.contains(&cmd.product_id) {
            return Ok(vec![]);
        }
        Ok(vec![InventoryEvent::ProductDeleted(ProductDeleted {
            product_id: cmd.product_id.clone(),
        })])
    }

    fn handle_record(&self, cmd: &RecordMovement) -> Result<Vec<InventoryEvent>, InventoryError> {
        let product = self.catalog.find(&cmd.product_id).ok_or_else(|| {
            InventoryError::validation(format!("product not found: {}", cmd.product_id))
        })?;

        if cmd.quantity <= 0 {
            return Err(InventoryError::validation("quantity must be greater than zero"));
        }

        let available = product.quantity();
        let new_quantity = match cmd.movement_type {
            MovementType::In => available
                .checked_add(cmd.quantity)
                .ok_or_else(|| InventoryError::validation("stock quantity would overflow"))?,
            MovementType::Out => {
                if available < cmd.quantity {
                    return Err(InventoryError::insufficient_stock(
                        cmd.product_id.clone(),
                        cmd.quantity,
                        available,
                    ));
                }
                available - cmd.quantity
            }
        };

        let note = cmd
            .note
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);

        Ok(vec![InventoryEvent::StockMoved(StockMoved {
            movement: Movement::new(
                cmd.movement_id.clone(),
                cmd.product_id.clone(),
                cmd.movement_type,
                cmd.quantity,
                note,
                cmd.occurred_at,
            ),
            new_quantity,
        })])
    }
}
