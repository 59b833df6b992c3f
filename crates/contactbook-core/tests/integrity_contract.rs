//! Contract Test: Referential Integrity
//!
//! Constraints verified:
//! - Deleting a group leaves no contact pointing at it, for any prior state
//! - Cascade removal is persisted with a single save
//! - Contacts can only be saved against existing groups
//! - Operations on missing identifiers change nothing and write nothing

mod common;

use common::*;
use contactbook_core::{BookEvent, ContactPatch, Error, NewContact};

#[tokio::test]
async fn delete_group_leaves_no_orphans() {
    let store = CountingStore::new();
    let (mut book, _rx) = open_book(&store).await;

    for group_id in ["1", "2"] {
        book.delete_group(group_id).await.unwrap();
        assert!(book.contacts().iter().all(|c| c.group_id != group_id));
    }
    assert!(book.contacts().is_empty());
    assert!(book.groups().is_empty());
}

#[tokio::test]
async fn delete_group_removes_orphans_already_in_storage() {
    // Stored data from an older version may hold contacts of a vanished group
    let store = CountingStore::with_records(
        vec![
            contact("1", "Ann Lee", "5550001111", "1"),
            contact("2", "Bob Ray", "5550002222", "ghost"),
        ],
        vec![group("1", "Friends")],
    );
    let (mut book, _rx) = open_book(&store).await;

    assert!(book.delete_group("ghost").await.unwrap());
    assert!(book.contacts_by_group("ghost").is_empty());
    assert_eq!(book.contacts().len(), 1);
}

#[tokio::test]
async fn cascade_is_persisted_once() {
    let store = CountingStore::new();
    let (mut book, mut rx) = open_book(&store).await;
    let saves_before = store.save_call_count();
    drain(&mut rx);

    book.delete_group("1").await.unwrap();

    assert_eq!(store.save_call_count(), saves_before + 1);
    let persisted = store.snapshot();
    assert!(persisted.groups.unwrap().iter().all(|g| g.id != "1"));
    assert!(persisted.contacts.unwrap().iter().all(|c| c.group_id != "1"));
    assert_eq!(
        drain(&mut rx),
        vec![BookEvent::GroupDeleted {
            id: "1".to_string(),
            removed_contacts: 2
        }]
    );
}

#[tokio::test]
async fn added_contact_appears_in_its_group() {
    let store = CountingStore::new();
    let (mut book, _rx) = open_book(&store).await;

    let contact = book
        .add_contact(NewContact::new("Ann Lee", "+1 555 000 1111", "1"))
        .await
        .unwrap();

    let in_group = book.contacts_by_group("1");
    assert_eq!(in_group.last().map(|c| c.id.as_str()), Some(contact.id.as_str()));
    assert_eq!(contact.tel_link(), "15550001111");
}

#[tokio::test]
async fn contact_cannot_point_at_missing_group() {
    let store = CountingStore::new();
    let (mut book, _rx) = open_book(&store).await;
    let saves_before = store.save_call_count();

    let err = book
        .add_contact(NewContact::new("Ann Lee", "+1 555 000 1111", "404"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::UnknownGroup(id) if id == "404"));

    let err = book
        .update_contact("1", ContactPatch::default().with_group("404"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::UnknownGroup(_)));
    assert_eq!(book.contact_by_id("1").unwrap().group_id, "1");

    assert_eq!(store.save_call_count(), saves_before);
}

#[tokio::test]
async fn missing_identifiers_are_noops() {
    let store = CountingStore::new();
    let (mut book, mut rx) = open_book(&store).await;
    let contacts = book.contacts().to_vec();
    let groups = book.groups().to_vec();
    let saves_before = store.save_call_count();
    drain(&mut rx);

    assert!(!book.update_contact("missing-id", ContactPatch::name("X")).await.unwrap());
    assert!(
        !book
            .update_contact("missing-id", ContactPatch::name("X").with_group("404"))
            .await
            .unwrap(),
        "a missing contact wins over an unknown group"
    );
    assert!(!book.delete_contact("missing-id").await.unwrap());
    assert!(!book.update_group("missing-id", "X").await.unwrap());
    assert!(!book.delete_group("missing-id").await.unwrap());

    assert_eq!(book.contacts(), contacts.as_slice());
    assert_eq!(book.groups(), groups.as_slice());
    assert_eq!(store.save_call_count(), saves_before);
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test]
async fn add_group_then_lookup_returns_trimmed_name() {
    let store = CountingStore::new();
    let (mut book, _rx) = open_book(&store).await;

    let id = book.add_group("  Book Club ").await.unwrap();

    assert_eq!(book.group_by_id(&id).unwrap().name, "Book Club");
}

#[tokio::test]
async fn identifiers_are_never_reused() {
    let store = CountingStore::new();
    let (mut book, _rx) = open_book(&store).await;

    let first = book.add_group("Temp").await.unwrap();
    book.delete_group(&first).await.unwrap();
    let second = book.add_group("Temp").await.unwrap();

    assert_ne!(first, second);
}
