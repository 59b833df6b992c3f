//! The contact book repository
//!
//! The ContactBook is responsible for:
//! - Owning the contact and group collections
//! - Assigning identifiers
//! - Cascading group deletion to contacts
//! - Persisting after every mutation
//! - Seeding demonstration data on first load
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐    validated input    ┌──────────────┐
//! │  Validator  │ ────────────────────▶ │ ContactBook  │
//! └─────────────┘                       └──────────────┘
//!                                              │
//!                         ┌────────────────────┼────────────────────┐
//!                         ▼                                         ▼
//!                 ┌──────────────┐                          ┌─────────────┐
//!                 │ ContactStore │                          │  BookEvent  │
//!                 │   (save)     │                          │  (notify)   │
//!                 └──────────────┘                          └─────────────┘
//! ```
//!
//! ## Mutation Flow
//!
//! 1. Caller validates input with [`Validator`](crate::Validator)
//! 2. Book updates its in-memory collections
//! 3. Book persists both collections through the store
//! 4. Book emits an event; renderers re-read the book
//!
//! The book does not re-validate names. It does enforce referential
//! integrity: a contact can only point at an existing group.

mod events;
mod ids;

pub use events::BookEvent;

use crate::config::BookConfig;
use crate::error::{Error, Result};
use crate::model::{Contact, ContactPatch, Group, NewContact, seed_contacts, seed_groups};
use crate::traits::ContactStore;
use ids::IdGenerator;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Repository of contacts and groups
///
/// ## Lifecycle
///
/// 1. Open with [`ContactBook::open()`], which loads (and seeds) the store
/// 2. Mutate through the `add_*`, `update_*`, `delete_*` operations
/// 3. Call [`ContactBook::flush()`] before dropping if a save failed
///
/// ## Missing identifiers
///
/// Updating or deleting an identifier that does not exist is not an error:
/// the operation returns `Ok(false)`, changes nothing and writes nothing.
///
/// ## Persistence failures
///
/// When the store rejects a save, the in-memory change is kept, the book
/// is marked dirty and the caller gets [`Error::Storage`]. A later
/// successful mutation or [`ContactBook::flush()`] writes everything.
pub struct ContactBook {
    /// Persistence backend
    store: Box<dyn ContactStore>,

    /// Contacts in insertion order
    contacts: Vec<Contact>,

    /// Groups in insertion order
    groups: Vec<Group>,

    ids: IdGenerator,

    /// In-memory state differs from the store
    dirty: bool,

    /// Event sender for renderers and monitoring
    event_tx: mpsc::Sender<BookEvent>,
}

impl ContactBook {
    /// Load the book from `store`
    ///
    /// A key that was never written is seeded with demonstration data when
    /// `config.seed_demo_data` is set (and left empty otherwise). If any
    /// key was seeded, both collections are written back immediately.
    ///
    /// # Returns
    ///
    /// A tuple of (book, event_receiver)
    pub async fn open(
        store: Box<dyn ContactStore>,
        config: &BookConfig,
    ) -> Result<(Self, mpsc::Receiver<BookEvent>)> {
        config.validate()?;

        let records = store.load().await?;
        let seed = config.seed_demo_data && records.is_incomplete();

        let contacts = match records.contacts {
            Some(contacts) => contacts,
            None if config.seed_demo_data => seed_contacts(),
            None => Vec::new(),
        };
        let groups = match records.groups {
            Some(groups) => groups,
            None if config.seed_demo_data => seed_groups(),
            None => Vec::new(),
        };

        let (tx, rx) = mpsc::channel(config.event_channel_capacity);

        let ids = IdGenerator::starting_after(
            contacts
                .iter()
                .map(|c| c.id.as_str())
                .chain(groups.iter().map(|g| g.id.as_str())),
        );

        let mut book = Self {
            store,
            contacts,
            groups,
            ids,
            dirty: false,
            event_tx: tx,
        };

        info!(
            "Opened {} store: {} contact(s), {} group(s)",
            book.store.store_name(),
            book.contacts.len(),
            book.groups.len()
        );

        book.emit_event(BookEvent::Loaded {
            contacts_count: book.contacts.len(),
            groups_count: book.groups.len(),
            seeded: seed,
        });

        if seed {
            info!("Seeded demonstration data");
            if let Err(e) = book.persist().await {
                // The seed stays in memory and is retried on the next write
                warn!("Seed data not persisted: {}", e);
            }
        }

        Ok((book, rx))
    }

    // ----- read API -----

    /// All contacts in insertion order
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    /// All groups in insertion order
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn contact_by_id(&self, id: &str) -> Option<&Contact> {
        self.contacts.iter().find(|c| c.id == id)
    }

    /// Contacts of one group, in insertion order
    pub fn contacts_by_group(&self, group_id: &str) -> Vec<&Contact> {
        self.contacts
            .iter()
            .filter(|c| c.group_id == group_id)
            .collect()
    }

    pub fn group_by_id(&self, id: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == id)
    }

    /// Whether the last change has not reached the store yet
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Name of the backing store
    pub fn store_name(&self) -> &'static str {
        self.store.store_name()
    }

    // ----- contacts -----

    /// Create a contact in an existing group
    ///
    /// The name and phone must already be validated.
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownGroup`] if `contact.group_id` does not exist (nothing changes)
    /// - [`Error::Storage`] if the contact was added but not persisted
    pub async fn add_contact(&mut self, contact: NewContact) -> Result<Contact> {
        self.ensure_group(&contact.group_id)?;

        let id = self.next_id();
        let contact = Contact {
            id,
            name: contact.name.trim().to_string(),
            phone: contact.phone.trim().to_string(),
            group_id: contact.group_id,
        };
        self.contacts.push(contact.clone());

        info!("Added contact {} to group {}", contact.id, contact.group_id);
        self.emit_event(BookEvent::ContactAdded {
            id: contact.id.clone(),
        });

        self.persist().await?;
        Ok(contact)
    }

    /// Merge `patch` into the contact `id`
    ///
    /// # Returns
    ///
    /// - `Ok(true)`: the contact was updated
    /// - `Ok(false)`: no contact with this id, whatever the patch holds
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownGroup`] if the patch moves the contact to a missing group
    /// - [`Error::Storage`] if the change was applied but not persisted
    pub async fn update_contact(&mut self, id: &str, patch: ContactPatch) -> Result<bool> {
        let Some(index) = self.contacts.iter().position(|c| c.id == id) else {
            debug!("Contact {} not found, update skipped", id);
            return Ok(false);
        };

        if let Some(group_id) = &patch.group_id {
            self.ensure_group(group_id)?;
        }

        patch.apply(&mut self.contacts[index]);

        info!("Updated contact {}", id);
        self.emit_event(BookEvent::ContactUpdated { id: id.to_string() });

        self.persist().await?;
        Ok(true)
    }

    /// Remove the contact `id`
    ///
    /// Returns `Ok(false)` if there was no such contact.
    pub async fn delete_contact(&mut self, id: &str) -> Result<bool> {
        let before = self.contacts.len();
        self.contacts.retain(|c| c.id != id);

        if self.contacts.len() == before {
            debug!("Contact {} not found, delete skipped", id);
            return Ok(false);
        }

        info!("Deleted contact {}", id);
        self.emit_event(BookEvent::ContactDeleted { id: id.to_string() });

        self.persist().await?;
        Ok(true)
    }

    // ----- groups -----

    /// Create a group and return its identifier
    ///
    /// The name is stored trimmed. Format and uniqueness must already be
    /// validated by the caller.
    pub async fn add_group(&mut self, name: &str) -> Result<String> {
        let id = self.next_id();
        self.groups.push(Group {
            id: id.clone(),
            name: name.trim().to_string(),
        });

        info!("Added group {}", id);
        self.emit_event(BookEvent::GroupAdded { id: id.clone() });

        self.persist().await?;
        Ok(id)
    }

    /// Replace the name of group `id`
    ///
    /// Returns `Ok(false)` if there was no such group.
    pub async fn update_group(&mut self, id: &str, name: &str) -> Result<bool> {
        let Some(group) = self.groups.iter_mut().find(|g| g.id == id) else {
            debug!("Group {} not found, rename skipped", id);
            return Ok(false);
        };

        group.name = name.trim().to_string();

        info!("Renamed group {}", id);
        self.emit_event(BookEvent::GroupRenamed { id: id.to_string() });

        self.persist().await?;
        Ok(true)
    }

    /// Remove group `id` and every contact that belongs to it
    ///
    /// Contacts pointing at `id` are removed even if the group itself is
    /// already gone, so no orphan survives. Both removals are persisted
    /// with a single save.
    ///
    /// Returns `Ok(false)` if neither a group nor a contact was removed.
    pub async fn delete_group(&mut self, id: &str) -> Result<bool> {
        let groups_before = self.groups.len();
        self.groups.retain(|g| g.id != id);
        let group_removed = self.groups.len() != groups_before;

        let contacts_before = self.contacts.len();
        self.contacts.retain(|c| c.group_id != id);
        let removed_contacts = contacts_before - self.contacts.len();

        if !group_removed && removed_contacts == 0 {
            debug!("Group {} not found, delete skipped", id);
            return Ok(false);
        }

        info!(
            "Deleted group {} with {} contact(s)",
            id, removed_contacts
        );
        self.emit_event(BookEvent::GroupDeleted {
            id: id.to_string(),
            removed_contacts,
        });

        self.persist().await?;
        Ok(true)
    }

    /// Persist again if the last save failed
    pub async fn flush(&mut self) -> Result<()> {
        if self.dirty {
            self.persist().await
        } else {
            Ok(())
        }
    }

    // ----- internals -----

    fn ensure_group(&self, group_id: &str) -> Result<()> {
        if self.group_by_id(group_id).is_some() {
            Ok(())
        } else {
            Err(Error::unknown_group(group_id))
        }
    }

    fn next_id(&mut self) -> String {
        let contacts = &self.contacts;
        let groups = &self.groups;
        self.ids.next(|candidate| {
            contacts.iter().any(|c| c.id == candidate) || groups.iter().any(|g| g.id == candidate)
        })
    }

    /// Write both collections
    async fn persist(&mut self) -> Result<()> {
        match self.store.save(&self.contacts, &self.groups).await {
            Ok(()) => {
                self.dirty = false;
                Ok(())
            }
            Err(e) => {
                self.dirty = true;
                error!("Failed to persist contact book: {}", e);
                self.emit_event(BookEvent::SaveFailed {
                    error: e.to_string(),
                });
                Err(match e {
                    Error::Storage(msg) => Error::Storage(msg),
                    other => Error::storage(other.to_string()),
                })
            }
        }
    }

    /// Emit a book event
    fn emit_event(&self, event: BookEvent) {
        // Send event, logging warning if channel is full (backpressure)
        match self.event_tx.try_send(event) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(event)) => {
                warn!(
                    "Event channel full, dropping {:?}. Consider increasing event_channel_capacity.",
                    event
                );
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                // Nobody is listening
            }
        }
    }
}
