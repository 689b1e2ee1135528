//! Infrastructure layer: local storage backends, snapshots, configuration and
//! the inventory session service.

pub mod config;
pub mod service;
pub mod snapshot;
pub mod store;


pub use config::{open_store, InventoryConfig, StorageBackend};
pub use service::{InventoryService, MovementForm, MovementRequest};
pub use store::{FileKeyValueStore, InMemoryKeyValueStore, KeyValueStore, StorageError};
