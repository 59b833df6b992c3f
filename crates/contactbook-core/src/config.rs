//! Configuration types for the contact book
//!
//! This module defines all configuration structures used throughout the crate.

use serde::{Deserialize, Serialize};

/// Main contact book configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookConfig {
    /// Where the collections are persisted
    #[serde(default)]
    pub store: StoreConfig,

    /// Seed demonstration groups and contacts on first load
    #[serde(default = "default_seed_demo_data")]
    pub seed_demo_data: bool,

    /// Capacity of the book's event channel
    ///
    /// When full, new events are dropped with a warning log.
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,

    /// Notification timings
    #[serde(default)]
    pub notifications: NotificationConfig,
}

impl BookConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self {
            store: StoreConfig::default(),
            seed_demo_data: default_seed_demo_data(),
            event_channel_capacity: default_event_channel_capacity(),
            notifications: NotificationConfig::default(),
        }
    }

    /// Use a different store
    pub fn with_store(mut self, store: StoreConfig) -> Self {
        self.store = store;
        self
    }

    /// Enable or disable first-load seeding
    pub fn with_seed_demo_data(mut self, seed: bool) -> Self {
        self.seed_demo_data = seed;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.event_channel_capacity == 0 {
            return Err(crate::Error::config("Event channel capacity must be > 0"));
        }

        self.store.validate()?;
        self.notifications.validate()?;

        Ok(())
    }
}

impl Default for BookConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Store configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreConfig {
    /// File-based store
    File {
        /// Directory holding `contacts.json` and `groups.json`
        path: String,
    },

    /// In-memory store (not persistent)
    #[default]
    Memory,

    /// Custom store
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl StoreConfig {
    /// Validate the store configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            StoreConfig::File { path } => {
                if path.is_empty() {
                    return Err(crate::Error::config("File store path cannot be empty"));
                }
                Ok(())
            }
            StoreConfig::Custom { factory, config } => {
                if factory.is_empty() {
                    return Err(crate::Error::config("Custom store factory cannot be empty"));
                }
                if config.is_null() {
                    return Err(crate::Error::config("Custom store config cannot be null"));
                }
                Ok(())
            }
            StoreConfig::Memory => Ok(()),
        }
    }

    /// Get the store type name
    pub fn type_name(&self) -> &str {
        match self {
            StoreConfig::File { .. } => "file",
            StoreConfig::Memory => "memory",
            StoreConfig::Custom { factory, .. } => factory,
        }
    }
}

/// Notification timings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// How long a regular notification stays visible (milliseconds)
    #[serde(default = "default_notification_ms")]
    pub default_duration_ms: u64,

    /// How long a validation error notification stays visible (milliseconds)
    #[serde(default = "default_error_notification_ms")]
    pub error_duration_ms: u64,
}

impl NotificationConfig {
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.default_duration_ms == 0 || self.error_duration_ms == 0 {
            return Err(crate::Error::config("Notification durations must be > 0"));
        }
        Ok(())
    }

    pub fn default_duration(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.default_duration_ms)
    }

    pub fn error_duration(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.error_duration_ms)
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            default_duration_ms: default_notification_ms(),
            error_duration_ms: default_error_notification_ms(),
        }
    }
}

fn default_seed_demo_data() -> bool {
    true
}

fn default_event_channel_capacity() -> usize {
    256
}

fn default_notification_ms() -> u64 {
    3000
}

fn default_error_notification_ms() -> u64 {
    5000
}
