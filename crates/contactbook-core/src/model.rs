//! Data model for the contact book
//!
//! Both records serialize with the field names used in storage:
//!
//! ```json
//! { "id": "1", "name": "Ivan Ivanov", "phone": "+7 (900) 123-45-67", "groupId": "1" }
//! { "id": "1", "name": "Friends" }
//! ```

use serde::{Deserialize, Serialize};

/// A single contact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    /// Identifier assigned by the book at creation time
    pub id: String,
    /// Display name
    pub name: String,
    /// Phone number as typed by the user
    pub phone: String,
    /// Identifier of the owning group
    pub group_id: String,
}

impl Contact {
    /// Phone number reduced to its digits, suitable for a `tel:` link
    pub fn tel_link(&self) -> String {
        digits_only(&self.phone)
    }
}

/// A group of contacts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Identifier assigned by the book at creation time
    pub id: String,
    /// Display name, unique among groups ignoring case
    pub name: String,
}

/// Fields of a contact that is about to be created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContact {
    pub name: String,
    pub phone: String,
    pub group_id: String,
}

impl NewContact {
    /// Create a new contact draft
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        group_id: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            group_id: group_id.into(),
        }
    }
}

/// Partial update of a contact; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactPatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub group_id: Option<String>,
}

impl ContactPatch {
    /// Patch that only replaces the name
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Also replace the phone number
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Also move the contact to another group
    pub fn with_group(mut self, group_id: impl Into<String>) -> Self {
        self.group_id = Some(group_id.into());
        self
    }

    /// Whether the patch changes nothing
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.phone.is_none() && self.group_id.is_none()
    }

    /// Merge the patch into a contact, preserving unspecified fields
    pub(crate) fn apply(self, contact: &mut Contact) {
        if let Some(name) = self.name {
            contact.name = name;
        }
        if let Some(phone) = self.phone {
            contact.phone = phone;
        }
        if let Some(group_id) = self.group_id {
            contact.group_id = group_id;
        }
    }
}

/// Strip every non-digit character
pub fn digits_only(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Demonstration groups written on the very first load
pub fn seed_groups() -> Vec<Group> {
    vec![
        Group {
            id: "1".to_string(),
            name: "Friends".to_string(),
        },
        Group {
            id: "2".to_string(),
            name: "Colleagues".to_string(),
        },
    ]
}

/// Demonstration contacts written on the very first load
pub fn seed_contacts() -> Vec<Contact> {
    let contact = |id: &str, name: &str, phone: &str, group_id: &str| Contact {
        id: id.to_string(),
        name: name.to_string(),
        phone: phone.to_string(),
        group_id: group_id.to_string(),
    };

    vec![
        contact("1", "Ivan Ivanov", "+7 (900) 123-45-67", "1"),
        contact("2", "Peter Petrov", "+7 (900) 987-65-43", "1"),
        contact("3", "Sidor Sidorov", "+7 (900) 111-22-33", "2"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contact_uses_camel_case_group_field() {
        let contact = &seed_contacts()[0];
        let json = serde_json::to_value(contact).unwrap();
        assert_eq!(json["groupId"], "1");
        assert!(json.get("group_id").is_none());
    }

    #[test]
    fn tel_link_keeps_only_digits() {
        let contact = &seed_contacts()[0];
        assert_eq!(contact.tel_link(), "79001234567");
    }

    #[test]
    fn patch_preserves_unspecified_fields() {
        let mut contact = seed_contacts()[1].clone();
        ContactPatch::name("Pete").apply(&mut contact);
        assert_eq!(contact.name, "Pete");
        assert_eq!(contact.phone, "+7 (900) 987-65-43");
        assert_eq!(contact.group_id, "1");
    }

    #[test]
    fn seed_contacts_reference_seed_groups() {
        let groups = seed_groups();
        for contact in seed_contacts() {
            assert!(groups.iter().any(|g| g.id == contact.group_id));
        }
    }
}
