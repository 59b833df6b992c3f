//! Test doubles and common utilities for contact book contract tests
//!
//! These stores record how the book talks to persistence without touching
//! the filesystem.

#![allow(dead_code)]

use contactbook_core::error::{Error, Result};
use contactbook_core::model::{Contact, Group};
use contactbook_core::traits::{ContactStore, StoredRecords};
use contactbook_core::{BookConfig, BookEvent, ContactBook};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// A store that keeps the last saved pair and counts calls
#[derive(Clone, Default)]
pub struct CountingStore {
    load_call_count: Arc<AtomicUsize>,
    save_call_count: Arc<AtomicUsize>,
    /// When set, every save fails
    fail_saves: Arc<AtomicBool>,
    records: Arc<Mutex<StoredRecords>>,
}

impl CountingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds the given collections
    pub fn with_records(contacts: Vec<Contact>, groups: Vec<Group>) -> Self {
        let store = Self::new();
        *store.records.lock().unwrap() = StoredRecords::new(contacts, groups);
        store
    }

    /// Get the number of times load() was called
    pub fn load_call_count(&self) -> usize {
        self.load_call_count.load(Ordering::SeqCst)
    }

    /// Get the number of times save() was called (including failed saves)
    pub fn save_call_count(&self) -> usize {
        self.save_call_count.load(Ordering::SeqCst)
    }

    /// Make subsequent saves fail (or succeed again)
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// What was last persisted
    pub fn snapshot(&self) -> StoredRecords {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ContactStore for CountingStore {
    async fn load(&self) -> Result<StoredRecords> {
        self.load_call_count.fetch_add(1, Ordering::SeqCst);
        Ok(self.records.lock().unwrap().clone())
    }

    async fn save(&self, contacts: &[Contact], groups: &[Group]) -> Result<()> {
        self.save_call_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(Error::storage("quota exceeded"));
        }
        *self.records.lock().unwrap() = StoredRecords::new(contacts.to_vec(), groups.to_vec());
        Ok(())
    }

    fn store_name(&self) -> &'static str {
        "counting"
    }
}

/// Open a book over `store` with default configuration
pub async fn open_book(store: &CountingStore) -> (ContactBook, mpsc::Receiver<BookEvent>) {
    ContactBook::open(Box::new(store.clone()), &BookConfig::default())
        .await
        .expect("book opens")
}

/// Drain every event currently queued
pub fn drain(rx: &mut mpsc::Receiver<BookEvent>) -> Vec<BookEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

pub fn group(id: &str, name: &str) -> Group {
    Group {
        id: id.to_string(),
        name: name.to_string(),
    }
}

pub fn contact(id: &str, name: &str, phone: &str, group_id: &str) -> Contact {
    Contact {
        id: id.to_string(),
        name: name.to_string(),
        phone: phone.to_string(),
        group_id: group_id.to_string(),
    }
}
