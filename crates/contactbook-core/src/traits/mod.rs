//! Core traits for the contact book
//!
//! - [`ContactStore`]: Persistent storage of contacts and groups

pub mod contact_store;

pub use contact_store::{
    CONTACTS_KEY, ContactStore, ContactStoreFactory, GROUPS_KEY, StoredRecords,
};
