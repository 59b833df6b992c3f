//! Minimal embedding example for contactbook-core
//!
//! This example plugs a custom store into the registry, opens a book on it
//! and drives the book directly, without the UI crate. The application owns
//! the book and decides when it is dropped.

use contactbook_core::traits::{ContactStore, ContactStoreFactory, StoredRecords};
use contactbook_core::{
    BookConfig, Contact, ContactBook, ContactPatch, Error, Group, NewContact, Result,
    StoreConfig, StoreRegistry, Validator,
};
use std::sync::{Arc, Mutex, PoisonError};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::ReceiverStream;
use tracing::info;

/// One saved version of the book
#[derive(Debug, Clone)]
struct Snapshot {
    contacts: Vec<Contact>,
    groups: Vec<Group>,
}

/// Store that keeps every saved version instead of only the last one
#[derive(Clone, Default)]
struct JournalStore {
    history: Arc<Mutex<Vec<Snapshot>>>,
    max_versions: usize,
}

impl JournalStore {
    fn new(max_versions: usize) -> Self {
        Self {
            history: Arc::default(),
            max_versions,
        }
    }

    fn versions(&self) -> Vec<Snapshot> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait::async_trait]
impl ContactStore for JournalStore {
    async fn load(&self) -> Result<StoredRecords> {
        let history = self.history.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(match history.last() {
            Some(latest) => StoredRecords::new(latest.contacts.clone(), latest.groups.clone()),
            None => StoredRecords::default(),
        })
    }

    async fn save(&self, contacts: &[Contact], groups: &[Group]) -> Result<()> {
        let mut history = self.history.lock().unwrap_or_else(PoisonError::into_inner);
        history.push(Snapshot {
            contacts: contacts.to_vec(),
            groups: groups.to_vec(),
        });
        if history.len() > self.max_versions {
            history.remove(0);
        }
        Ok(())
    }

    fn store_name(&self) -> &'static str {
        "journal"
    }
}

/// Factory reading `{"max_versions": N}`
struct JournalStoreFactory {
    store: JournalStore,
}

#[async_trait::async_trait]
impl ContactStoreFactory for JournalStoreFactory {
    async fn create(&self, config: &serde_json::Value) -> Result<Box<dyn ContactStore>> {
        let max_versions = config
            .get("max_versions")
            .and_then(|v| v.as_u64())
            .ok_or_else(|| Error::config("journal store needs 'max_versions'"))?;

        let mut store = self.store.clone();
        store.max_versions = max_versions as usize;
        Ok(Box::new(store))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    println!("=== Embedded contactbook-core Example ===\n");

    // The handle stays with the application so it can inspect the history
    let journal = JournalStore::new(0);
    let mut registry = StoreRegistry::with_builtin();
    registry.register_store(
        "journal",
        Box::new(JournalStoreFactory {
            store: journal.clone(),
        }),
    );

    let config = BookConfig::new().with_store(StoreConfig::Custom {
        factory: "journal".to_string(),
        config: serde_json::json!({ "max_versions": 10 }),
    });

    println!("1. Opening book on the journal store...");
    let store = registry.create_store(&config.store).await?;
    let (mut book, events) = ContactBook::open(store, &config).await?;

    let event_listener = tokio::spawn(async move {
        let mut events = ReceiverStream::new(events);
        while let Some(event) = events.next().await {
            println!("[Event] {:?}", event);
        }
    });

    println!("2. Validating before mutating...");
    let validator = Validator::new();
    let check = validator
        .validate_group_name("Family")
        .and(validator.validate_group_uniqueness("Family", book.groups(), None));
    assert!(check.is_valid());

    let family = book.add_group("Family").await?;
    let ann = book
        .add_contact(NewContact::new("Ann Lee", "+1 555 000 1111", &family))
        .await?;
    book.update_contact(&ann.id, ContactPatch::name("Ann Ray"))
        .await?;

    let rejected = validator.validate_phone("abc-123-4567");
    println!("   rejected phone: {}", rejected.joined(", "));

    println!("3. Deleting group 1 cascades to its contacts...");
    book.delete_group("1").await?;
    info!("{} contact(s) left", book.contacts().len());

    // Closing the book closes the event channel
    drop(book);
    let _ = event_listener.await;

    println!("\n4. Saved versions:");
    for (i, version) in journal.versions().iter().enumerate() {
        println!(
            "   v{}: {} contact(s), {} group(s)",
            i + 1,
            version.contacts.len(),
            version.groups.len()
        );
    }

    println!("\n=== Embedding Successful ===");
    println!("Key Points:");
    println!("- The store is chosen by name through the registry");
    println!("- No global state");
    println!("- Validation is explicit and separate from the book");

    Ok(())
}
