//! Whole-collection snapshots of the catalog and ledger.
//!
//! Each collection is one JSON array under a fixed key. Missing, unreadable or
//! corrupt records load as empty collections.

use serde::de::DeserializeOwned;
use serde::Serialize;

use stockbook_inventory::{Inventory, Movement, Product};

use crate::store::{KeyValueStore, StorageError};

pub const PRODUCTS_KEY: &str = "inventory_products_v1";
pub const MOVEMENTS_KEY: &str = "inventory_movements_v1";

pub fn load<S>(store: &S) -> Inventory
where
    S: KeyValueStore + ?Sized,
{
    let products: Vec<Product> = load_collection(store, PRODUCTS_KEY);
    let movements: Vec<Movement> = load_collection(store, MOVEMENTS_KEY);
    tracing::debug!(
        products = products.len(),
        movements = movements.len(),
        "loaded inventory snapshot"
    );
    Inventory::from_parts(products, movements)
}

/// Write both collections in one `put_all`.
///
/// Quantities and the ledger always travel together, so a stored quantity is
/// never newer than the movements that produced it.
pub fn save<S>(store: &S, inventory: &Inventory) -> Result<(), StorageError>
where
    S: KeyValueStore + ?Sized,
{
    let entries = [
        (PRODUCTS_KEY, encode(PRODUCTS_KEY, inventory.catalog().as_slice())?),
        (MOVEMENTS_KEY, encode(MOVEMENTS_KEY, inventory.ledger().as_slice())?),
    ];
    store.put_all(&entries)
}

fn encode<T: Serialize>(key: &str, records: &[T]) -> Result<String, StorageError> {
    serde_json::to_string(records).map_err(|source| StorageError::Encode {
        key: key.to_string(),
        source,
    })
}

fn load_collection<S, T>(store: &S, key: &str) -> Vec<T>
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned,
{
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(err) => {
            tracing::warn!(key, error = %err, "failed to read stored collection; starting empty");
            return Vec::new();
        }
    };

    match serde_json::from_str(&raw) {
        Ok(records) => records,
        Err(err) => {
            tracing::warn!(key, error = %err, "stored collection is corrupt; starting empty");
            Vec::new()
        }
    }
}
