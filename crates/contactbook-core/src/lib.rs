// # contactbook-core
//
// Core library for the contact book.
//
// ## Architecture Overview
//
// - **Validator**: Pure checks on names, phone numbers and group names
// - **ContactStore**: Trait for persisting the contact and group collections
// - **ContactBook**: Repository that owns the collections, assigns
//   identifiers, cascades group deletion and persists every change
// - **StoreRegistry**: Plugin-based registry for store backends
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Validator owns rules, ContactBook owns data,
//    stores own bytes
// 2. **Explicit Dependencies**: the book is constructed with its store; there
//    is no global instance
// 3. **Library-First**: rendering lives outside this crate and only reads the
//    book back after a change

pub mod book;
pub mod config;
pub mod error;
pub mod model;
pub mod registry;
pub mod store;
pub mod traits;
pub mod validation;

// Re-export core types for convenience
pub use book::{BookEvent, ContactBook};
pub use config::{BookConfig, NotificationConfig, StoreConfig};
pub use error::{Error, Result};
pub use model::{Contact, ContactPatch, Group, NewContact};
pub use registry::StoreRegistry;
pub use store::{FileContactStore, MemoryContactStore};
pub use traits::{ContactStore, StoredRecords};
pub use validation::{ValidationResult, Validator};
