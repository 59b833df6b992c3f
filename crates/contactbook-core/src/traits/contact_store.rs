// # Contact Store Trait
//
// Defines the interface for persisting the two collections of the book.
//
// ## Layout
//
// A store holds two independently keyed records:
//
// - `contacts`: ordered list of `{ id, name, phone, groupId }`
// - `groups`: ordered list of `{ id, name }`
//
// Each save rewrites both records in full; nothing is patched in place.
//
// ## Implementations
//
// - File-based: one JSON file per key, atomic rename on write
// - Memory: key → JSON text map, for tests and embedding
//
// ## Usage
//
// ```rust
// use contactbook_core::ContactStore;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let store = /* ContactStore implementation */;
//
//     let records = store.load().await?;
//     if records.is_absent() {
//         // never saved before
//     }
//
//     store.save(&contacts, &groups).await?;
//     Ok(())
// }
// ```

use async_trait::async_trait;

use crate::model::{Contact, Group};

/// Storage key of the contact collection
pub const CONTACTS_KEY: &str = "contacts";

/// Storage key of the group collection
pub const GROUPS_KEY: &str = "groups";

/// What a store found on load
///
/// Each collection is `None` when its key has never been written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredRecords {
    pub contacts: Option<Vec<Contact>>,
    pub groups: Option<Vec<Group>>,
}

impl StoredRecords {
    /// Records for a store that holds both keys
    pub fn new(contacts: Vec<Contact>, groups: Vec<Group>) -> Self {
        Self {
            contacts: Some(contacts),
            groups: Some(groups),
        }
    }

    /// Nothing was ever saved
    pub fn is_absent(&self) -> bool {
        self.contacts.is_none() && self.groups.is_none()
    }

    /// At least one key is missing
    pub fn is_incomplete(&self) -> bool {
        self.contacts.is_none() || self.groups.is_none()
    }
}

/// Trait for contact store implementations
///
/// The store is a dumb persistence layer. It must not:
///
/// - validate names or phone numbers (owned by `Validator`)
/// - assign identifiers or cascade deletes (owned by `ContactBook`)
/// - seed demonstration data (owned by `ContactBook`)
///
/// Implementations must be safe to share across tasks.
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// Load both collections
    ///
    /// # Returns
    ///
    /// - `Ok(StoredRecords)`: whatever keys exist; missing keys are `None`
    /// - `Err(Error)`: Storage error
    async fn load(&self) -> Result<StoredRecords, crate::Error>;

    /// Persist both collections, replacing what was stored
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Both records written
    /// - `Err(Error)`: Storage error; the previous records may still be in place
    async fn save(&self, contacts: &[Contact], groups: &[Group]) -> Result<(), crate::Error>;

    /// Short name used in logs
    fn store_name(&self) -> &'static str;
}

/// Helper trait for constructing contact stores from configuration
#[async_trait]
pub trait ContactStoreFactory: Send + Sync {
    /// Create a ContactStore instance from configuration
    ///
    /// # Parameters
    ///
    /// - `config`: JSON form of the store configuration
    async fn create(&self, config: &serde_json::Value)
    -> Result<Box<dyn ContactStore>, crate::Error>;
}
