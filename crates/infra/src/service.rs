//! Inventory session: owns the in-memory state and writes it through to storage.
//!
//! ```text
//! Command
//!   ↓
//! 1. Handle (pure validation, produces events; nothing changes on rejection)
//!   ↓
//! 2. Apply events to the in-memory inventory
//!   ↓
//! 3. Persist both snapshots together (failure is reported, state is kept)
//! ```
//!
//! Mutating entry points take `&mut self`, which gives the single-writer
//! guarantee the domain relies on. A host sharing one service between callers
//! must wrap it in a mutex.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use stockbook_core::{Aggregate, InventoryError, InventoryResult, MovementId, ProductId};
use stockbook_inventory::product::coerce_integer;
use stockbook_inventory::seed::demo_products;
use stockbook_inventory::views::{self, DEFAULT_RECENT_LIMIT};
use stockbook_inventory::{
    DeleteProduct, Inventory, InventoryCommand, InventoryEvent, InventoryStatistics, Movement,
    MovementType, Product, ProductForm, ProductInput, RecentMovement, RecordMovement, StockAlert,
    UpsertProduct,
};

use crate::config::InventoryConfig;
use crate::snapshot;
use crate::store::KeyValueStore;

/// Stock movement requested by a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovementRequest {
    pub product_id: ProductId,
    pub movement_type: MovementType,
    pub quantity: i64,
    pub note: Option<String>,
}

impl MovementRequest {
    pub fn new(product_id: ProductId, movement_type: MovementType, quantity: i64) -> Self {
        Self {
            product_id,
            movement_type,
            quantity,
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Convert raw form values; an unparsable quantity becomes 0 and is then rejected.
    pub fn from_form(form: &MovementForm) -> InventoryResult<Self> {
        let product_id = form.product_id.trim();
        if product_id.is_empty() {
            return Err(InventoryError::validation("please select a product"));
        }
        Ok(Self {
            product_id: ProductId::from(product_id),
            movement_type: form.movement_type.parse()?,
            quantity: coerce_integer(&form.quantity),
            note: Some(form.note.clone()),
        })
    }
}

/// Raw stock form values, exactly as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MovementForm {
    pub product_id: String,
    #[serde(rename = "type")]
    pub movement_type: String,
    pub quantity: String,
    pub note: String,
}

#[derive(Debug)]
pub struct InventoryService<S> {
    store: S,
    inventory: Inventory,
    recent_limit: usize,
}

impl<S> InventoryService<S>
where
    S: KeyValueStore,
{
    /// Load whatever the store holds; unreadable records start empty.
    pub fn open(store: S) -> Self {
        let inventory = snapshot::load(&store);
        Self {
            store,
            inventory,
            recent_limit: DEFAULT_RECENT_LIMIT,
        }
    }

    /// Open with configuration applied, seeding the demo catalog if enabled.
    pub fn bootstrap(store: S, config: &InventoryConfig) -> InventoryResult<Self> {
        let mut service = Self::open(store).with_recent_limit(config.recent_limit);
        if config.seed_demo {
            service.seed_demo_if_empty()?;
        }
        Ok(service)
    }

    pub fn with_recent_limit(mut self, limit: usize) -> Self {
        self.recent_limit = limit;
        self
    }

    /// Insert the demonstration products when the catalog is empty.
    ///
    /// Returns whether anything was seeded.
    pub fn seed_demo_if_empty(&mut self) -> InventoryResult<bool> {
        if !self.inventory.catalog().is_empty() {
            return Ok(false);
        }

        let commands: Vec<_> = demo_products()
            .into_iter()
            .map(|input| {
                InventoryCommand::UpsertProduct(UpsertProduct {
                    new_id: ProductId::generate(),
                    input,
                })
            })
            .collect();
        self.execute_all(&commands)?;

        tracing::info!(products = self.inventory.catalog().len(), "seeded demo catalog");
        Ok(true)
    }

    /// Create or replace a product.
    pub fn upsert_product(&mut self, input: ProductInput) -> InventoryResult<Product> {
        let command = InventoryCommand::UpsertProduct(UpsertProduct {
            new_id: ProductId::generate(),
            input,
        });

        let upserted = self
            .execute_all(&[command])?
            .into_iter()
            .find_map(|event| match event {
                InventoryEvent::ProductUpserted(e) => Some(e),
                _ => None,
            })
            .ok_or_else(|| InventoryError::validation("upsert produced no product record"))?;

        if let Some(previous) = upserted.previous_quantity {
            if previous != upserted.product.quantity() {
                tracing::info!(
                    product_id = %upserted.product.id_typed(),
                    from = previous,
                    to = upserted.product.quantity(),
                    "catalog edit overwrote quantity without a stock movement"
                );
            }
        }

        Ok(upserted.product)
    }

    pub fn upsert_product_form(&mut self, form: &ProductForm) -> InventoryResult<Product> {
        self.upsert_product(ProductInput::from_form(form))
    }

    /// Remove a product; unknown ids are a no-op. Movements are kept.
    pub fn delete_product(&mut self, product_id: &ProductId) -> InventoryResult<()> {
        self.execute_all(&[InventoryCommand::DeleteProduct(DeleteProduct {
            product_id: product_id.clone(),
        })])?;
        Ok(())
    }

    pub fn find_product(&self, product_id: &ProductId) -> Option<&Product> {
        self.inventory.catalog().find(product_id)
    }

    /// Validate and apply a stock movement, persisting catalog and ledger together.
    pub fn apply_movement(&mut self, request: MovementRequest) -> InventoryResult<Movement> {
        let command = InventoryCommand::RecordMovement(RecordMovement {
            movement_id: MovementId::generate(),
            product_id: request.product_id,
            movement_type: request.movement_type,
            quantity: request.quantity,
            note: request.note,
            occurred_at: Utc::now(),
        });

        self.execute_all(&[command])?
            .into_iter()
            .find_map(|event| match event {
                InventoryEvent::StockMoved(e) => Some(e.movement),
                _ => None,
            })
            .ok_or_else(|| InventoryError::validation("movement produced no ledger record"))
    }

    pub fn apply_movement_form(&mut self, form: &MovementForm) -> InventoryResult<Movement> {
        self.apply_movement(MovementRequest::from_form(form)?)
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn products(&self) -> &[Product] {
        self.inventory.catalog().as_slice()
    }

    pub fn movements(&self) -> &[Movement] {
        self.inventory.ledger().as_slice()
    }

    pub fn movements_for<'a>(&'a self, product_id: &'a ProductId) -> Vec<&'a Movement> {
        self.inventory.ledger().for_product(product_id).collect()
    }

    pub fn filter_products(&self, query: &str) -> Vec<&Product> {
        views::filter_products(self.inventory.catalog(), query)
    }

    /// Newest movements, up to the configured limit.
    pub fn recent_movements(&self) -> Vec<RecentMovement<'_>> {
        self.recent_movements_limited(self.recent_limit)
    }

    pub fn recent_movements_limited(&self, limit: usize) -> Vec<RecentMovement<'_>> {
        views::recent_movements(self.inventory.catalog(), self.inventory.ledger(), limit)
    }

    pub fn statistics(&self) -> InventoryStatistics {
        views::compute_statistics(self.inventory.catalog())
    }

    pub fn low_stock_alerts(&self) -> Vec<StockAlert> {
        views::low_stock_alerts(self.inventory.catalog())
    }

    pub fn product_options(&self) -> Vec<(ProductId, String)> {
        views::product_options(self.inventory.catalog())
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Apply the commands as one unit, then persist once.
    ///
    /// A batch is staged on a copy so a rejection part-way leaves state untouched.
    fn execute_all(&mut self, commands: &[InventoryCommand]) -> InventoryResult<Vec<InventoryEvent>> {
        let events = match commands {
            [command] => {
                let events = decide(&self.inventory, command)?;
                for event in &events {
                    self.inventory.apply(event);
                }
                events
            }
            _ => {
                let mut staged = self.inventory.clone();
                let mut events = Vec::new();
                for command in commands {
                    let produced = decide(&staged, command)?;
                    for event in &produced {
                        staged.apply(event);
                    }
                    events.extend(produced);
                }
                self.inventory = staged;
                events
            }
        };

        if events.is_empty() {
            return Ok(events);
        }

        for event in &events {
            tracing::debug!(
                event_type = event.event_type(),
                version = self.inventory.version(),
                "inventory event applied"
            );
        }

        if let Err(err) = snapshot::save(&self.store, &self.inventory) {
            tracing::error!(
                error = %err,
                version = self.inventory.version(),
                "failed to persist inventory snapshot; in-memory state kept"
            );
            return Err(err.into());
        }

        Ok(events)
    }
}

fn decide(inventory: &Inventory, command: &InventoryCommand) -> InventoryResult<Vec<InventoryEvent>> {
    inventory.handle(command).inspect_err(|err| {
        tracing::debug!(kind = err.kind().as_str(), error = %err, "inventory command rejected");
    })
}
