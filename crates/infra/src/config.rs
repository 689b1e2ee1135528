//! Environment-driven configuration for a local inventory session.

use std::path::PathBuf;

use anyhow::Context;

use stockbook_inventory::views::DEFAULT_RECENT_LIMIT;

use crate::store::{default_data_dir, FileKeyValueStore, InMemoryKeyValueStore, KeyValueStore};

pub const ENV_STORAGE: &str = "STOCKBOOK_STORAGE";
pub const ENV_DATA_DIR: &str = "STOCKBOOK_DATA_DIR";
pub const ENV_SEED_DEMO: &str = "STOCKBOOK_SEED_DEMO";
pub const ENV_RECENT_LIMIT: &str = "STOCKBOOK_RECENT_LIMIT";
pub const ENV_CURRENCY: &str = "STOCKBOOK_CURRENCY";

pub const DEFAULT_CURRENCY: &str = "₹";

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    File,
    Sqlite,
}

impl StorageBackend {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "memory" => Some(StorageBackend::Memory),
            "file" => Some(StorageBackend::File),
            "sqlite" => Some(StorageBackend::Sqlite),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryConfig {
    pub backend: StorageBackend,
    /// `None` resolves to the OS data directory.
    pub data_dir: Option<PathBuf>,
    pub seed_demo: bool,
    pub recent_limit: usize,
    pub currency_symbol: String,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            data_dir: None,
            seed_demo: true,
            recent_limit: DEFAULT_RECENT_LIMIT,
            currency_symbol: DEFAULT_CURRENCY.to_string(),
        }
    }
}

impl InventoryConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any variable source; invalid values fall back to defaults with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let backend = match lookup(ENV_STORAGE) {
            Some(raw) => StorageBackend::parse(&raw).unwrap_or_else(|| {
                tracing::warn!(value = %raw, "{ENV_STORAGE} not recognised; using file storage");
                defaults.backend
            }),
            None => defaults.backend,
        };

        let data_dir = lookup(ENV_DATA_DIR)
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .map(PathBuf::from);

        let seed_demo = match lookup(ENV_SEED_DEMO) {
            Some(raw) => parse_bool(&raw).unwrap_or_else(|| {
                tracing::warn!(value = %raw, "{ENV_SEED_DEMO} is not a boolean; seeding stays enabled");
                defaults.seed_demo
            }),
            None => defaults.seed_demo,
        };

        let recent_limit = match lookup(ENV_RECENT_LIMIT) {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(limit) if limit > 0 => limit,
                _ => {
                    tracing::warn!(value = %raw, "{ENV_RECENT_LIMIT} must be a positive integer; using {DEFAULT_RECENT_LIMIT}");
                    defaults.recent_limit
                }
            },
            None => defaults.recent_limit,
        };

        let currency_symbol = lookup(ENV_CURRENCY)
            .filter(|raw| !raw.trim().is_empty())
            .unwrap_or(defaults.currency_symbol);

        Self {
            backend,
            data_dir,
            seed_demo,
            recent_limit,
            currency_symbol,
        }
    }

    pub fn resolve_data_dir(&self) -> anyhow::Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => default_data_dir(),
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Open the configured storage backend.
pub fn open_store(config: &InventoryConfig) -> anyhow::Result<Box<dyn KeyValueStore>> {
    match config.backend {
        StorageBackend::Memory => Ok(Box::new(InMemoryKeyValueStore::new())),
        StorageBackend::File => {
            let dir = config.resolve_data_dir()?;
            let store = FileKeyValueStore::open(&dir)
                .with_context(|| format!("failed to open file store at {:?}", dir))?;
            Ok(Box::new(store))
        }
        StorageBackend::Sqlite => open_sqlite(config),
    }
}

#[cfg(feature = "sqlite")]
fn open_sqlite(config: &InventoryConfig) -> anyhow::Result<Box<dyn KeyValueStore>> {
    let path = config.resolve_data_dir()?.join("stockbook.db");
    Ok(Box::new(crate::store::SqliteKeyValueStore::open(&path)?))
}

#[cfg(not(feature = "sqlite"))]
fn open_sqlite(_config: &InventoryConfig) -> anyhow::Result<Box<dyn KeyValueStore>> {
    anyhow::bail!("sqlite storage requires building stockbook-infra with the `sqlite` feature")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> InventoryConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        InventoryConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_variables() {
        assert_eq!(config_from(&[]), InventoryConfig::default());
    }

    #[test]
    fn reads_every_variable() {
        let config = config_from(&[
            (ENV_STORAGE, "Memory"),
            (ENV_DATA_DIR, "/tmp/stockbook"),
            (ENV_SEED_DEMO, "off"),
            (ENV_RECENT_LIMIT, "5"),
            (ENV_CURRENCY, "$"),
        ]);
        assert_eq!(config.backend, StorageBackend::Memory);
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/stockbook")));
        assert!(!config.seed_demo);
        assert_eq!(config.recent_limit, 5);
        assert_eq!(config.currency_symbol, "$");
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = config_from(&[
            (ENV_STORAGE, "postgres"),
            (ENV_SEED_DEMO, "maybe"),
            (ENV_RECENT_LIMIT, "0"),
            (ENV_DATA_DIR, "  "),
        ]);
        assert_eq!(config, InventoryConfig::default());
    }

    #[test]
    fn memory_backend_opens() {
        let config = InventoryConfig {
            backend: StorageBackend::Memory,
            ..InventoryConfig::default()
        };
        let store = open_store(&config).unwrap();
        assert_eq!(store.get("anything").unwrap(), None);
    }

    #[cfg(not(feature = "sqlite"))]
    #[test]
    fn sqlite_backend_needs_feature() {
        let config = InventoryConfig {
            backend: StorageBackend::Sqlite,
            data_dir: Some(std::env::temp_dir()),
            ..InventoryConfig::default()
        };
        assert!(open_store(&config).is_err());
    }
}
