//! Events emitted by the contact book

/// Something changed in the book
///
/// Renderers subscribe to these to know when to re-read the book. Events
/// carry identifiers only; the current data is always read back from the
/// book itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookEvent {
    /// Collections loaded from the store
    Loaded {
        contacts_count: usize,
        groups_count: usize,
        seeded: bool,
    },

    /// Contact created
    ContactAdded { id: String },

    /// Contact fields replaced
    ContactUpdated { id: String },

    /// Contact removed
    ContactDeleted { id: String },

    /// Group created
    GroupAdded { id: String },

    /// Group name replaced
    GroupRenamed { id: String },

    /// Group removed together with its contacts
    GroupDeleted { id: String, removed_contacts: usize },

    /// The latest change could not be persisted
    SaveFailed { error: String },
}
