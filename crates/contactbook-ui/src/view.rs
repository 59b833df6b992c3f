//! Rendered form of the book

use contactbook_core::ContactBook;
use std::collections::HashSet;
use std::fmt;

pub const EMPTY_MESSAGE: &str = "Contact list is empty";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactView {
    pub id: String,
    pub name: String,
    pub phone: String,
    /// Target of the phone link, digits only
    pub tel_link: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupView {
    pub id: String,
    pub name: String,
    pub expanded: bool,
    pub contacts: Vec<ContactView>,
}

/// Snapshot of what the page shows
///
/// Groups keep the book's order and only groups with contacts are listed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookView {
    pub groups: Vec<GroupView>,
}

impl BookView {
    pub fn build(book: &ContactBook, expanded: &HashSet<String>) -> Self {
        let groups = book
            .groups()
            .iter()
            .filter_map(|group| {
                let contacts: Vec<ContactView> = book
                    .contacts_by_group(&group.id)
                    .into_iter()
                    .map(|c| ContactView {
                        id: c.id.clone(),
                        name: c.name.clone(),
                        phone: c.phone.clone(),
                        tel_link: c.tel_link(),
                    })
                    .collect();

                (!contacts.is_empty()).then(|| GroupView {
                    id: group.id.clone(),
                    name: group.name.clone(),
                    expanded: expanded.contains(&group.id),
                    contacts,
                })
            })
            .collect();

        Self { groups }
    }

    /// True when the empty-list message is shown instead of groups
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn contact_count(&self) -> usize {
        self.groups.iter().map(|g| g.contacts.len()).sum()
    }
}

impl fmt::Display for BookView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return writeln!(f, "{}", EMPTY_MESSAGE);
        }

        for group in &self.groups {
            writeln!(f, "{} [{}]", group.name, group.id)?;
            for contact in &group.contacts {
                writeln!(f, "  {:<30} {:<20} [{}]", contact.name, contact.phone, contact.id)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contactbook_core::store::MemoryContactStore;
    use contactbook_core::{BookConfig, NewContact};

    async fn seeded() -> ContactBook {
        let (book, _rx) = ContactBook::open(
            Box::new(MemoryContactStore::new()),
            &BookConfig::default(),
        )
        .await
        .unwrap();
        book
    }

    #[tokio::test]
    async fn groups_with_contacts_in_book_order() {
        let mut book = seeded().await;
        book.add_group("Empty").await.unwrap();

        let view = BookView::build(&book, &HashSet::from(["2".to_string()]));

        let ids: Vec<&str> = view.groups.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, ["1", "2"]);
        assert!(!view.groups[0].expanded);
        assert!(view.groups[1].expanded);
        assert_eq!(view.contact_count(), 3);
        assert_eq!(view.groups[0].contacts[0].tel_link, "79001234567");
    }

    #[tokio::test]
    async fn empty_message_without_contacts() {
        let mut book = seeded().await;
        book.delete_group("1").await.unwrap();
        book.delete_group("2").await.unwrap();
        book.add_group("Lonely").await.unwrap();

        let view = BookView::build(&book, &HashSet::new());

        assert!(view.is_empty());
        assert_eq!(view.to_string(), format!("{}\n", EMPTY_MESSAGE));
    }

    #[tokio::test]
    async fn new_contact_is_rendered_last_in_group() {
        let mut book = seeded().await;
        let added = book
            .add_contact(NewContact::new("Ann Lee", "+1 555 000 1111", "2"))
            .await
            .unwrap();

        let view = BookView::build(&book, &HashSet::new());

        assert_eq!(view.groups[1].contacts.last().unwrap().id, added.id);
        assert!(view.to_string().contains("Ann Lee"));
    }
}
