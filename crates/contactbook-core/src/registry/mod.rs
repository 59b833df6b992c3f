//! Plugin-based store registry
//!
//! The registry maps store type names to factories so the store backing a
//! [`ContactBook`](crate::ContactBook) is picked from configuration rather
//! than a hardcoded match.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use contactbook_core::registry::StoreRegistry;
//! use contactbook_core::config::StoreConfig;
//!
//! let mut registry = StoreRegistry::with_builtin();
//! registry.register_store("sqlite", Box::new(SqliteFactory));
//!
//! let store = registry.create_store(&StoreConfig::Memory).await?;
//! ```

use crate::config::StoreConfig;
use crate::error::{Error, Result};
use crate::store::{FileContactStoreFactory, MemoryContactStoreFactory};
use crate::traits::{ContactStore, ContactStoreFactory};
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of contact store factories
#[derive(Default)]
pub struct StoreRegistry {
    stores: HashMap<String, Arc<dyn ContactStoreFactory>>,
}

impl StoreRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the `file` and `memory` stores registered
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register_store("file", Box::new(FileContactStoreFactory));
        registry.register_store("memory", Box::new(MemoryContactStoreFactory));
        registry
    }

    /// Register a store factory
    ///
    /// # Parameters
    ///
    /// - `name`: Store type name (e.g., "file", "memory")
    /// - `factory`: Factory object for creating store instances
    pub fn register_store(&mut self, name: impl Into<String>, factory: Box<dyn ContactStoreFactory>) {
        self.stores.insert(name.into(), Arc::from(factory));
    }

    /// Create a store from configuration
    ///
    /// # Returns
    ///
    /// - `Ok(Box<dyn ContactStore>)`: Created store instance
    /// - `Err(Error)`: If the store type is not registered or creation fails
    pub async fn create_store(&self, config: &StoreConfig) -> Result<Box<dyn ContactStore>> {
        let store_type = config.type_name();

        let factory = self
            .stores
            .get(store_type)
            .ok_or_else(|| Error::config(format!("Unknown store type: {}", store_type)))?
            .clone();

        let config_json = match config {
            StoreConfig::Custom { config, .. } => config.clone(),
            other => serde_json::to_value(other)?,
        };

        factory.create(&config_json).await
    }

    /// List all registered store types
    pub fn list_stores(&self) -> Vec<String> {
        self.stores.keys().cloned().collect()
    }

    /// Check if a store type is registered
    pub fn has_store(&self, name: &str) -> bool {
        self.stores.contains_key(name)
    }
}
