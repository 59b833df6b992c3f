//! Inline contact rename

use contactbook_core::{ContactBook, ContactPatch, Result, ValidationResult, Validator};
use tracing::debug;

/// How a rename session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameOutcome {
    /// No session was active, or its contact is gone
    Idle,
    /// The contact now has the new name
    Renamed,
    /// The original name stays (empty, unchanged or cancelled input)
    Restored,
    /// The new name failed validation; the original name stays
    Rejected(ValidationResult),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Editing {
    contact_id: String,
    original: String,
    input: String,
}

/// At most one contact name being edited in place
#[derive(Debug, Clone, Default)]
pub struct RenameSession {
    editing: Option<Editing>,
}

impl RenameSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start editing `contact_id`
    ///
    /// A session on another contact is finished first and its outcome is
    /// returned. Starting on the contact already being edited, or on one
    /// that does not exist, changes nothing.
    pub async fn start(
        &mut self,
        book: &mut ContactBook,
        validator: &Validator,
        contact_id: &str,
    ) -> Result<RenameOutcome> {
        if self.editing_id() == Some(contact_id) {
            return Ok(RenameOutcome::Idle);
        }
        let Some(contact) = book.contact_by_id(contact_id) else {
            debug!("Contact {} not found, rename not started", contact_id);
            return Ok(RenameOutcome::Idle);
        };
        let next = Editing {
            contact_id: contact.id.clone(),
            original: contact.name.clone(),
            input: contact.name.clone(),
        };

        let previous = self.finish(book, validator).await;
        self.editing = Some(next);
        previous
    }

    /// Replace the text of the name input
    pub fn set_input(&mut self, text: impl Into<String>) {
        if let Some(editing) = &mut self.editing {
            editing.input = text.into();
        }
    }

    /// Commit the edit (Enter or click outside)
    pub async fn finish(
        &mut self,
        book: &mut ContactBook,
        validator: &Validator,
    ) -> Result<RenameOutcome> {
        let Some(editing) = self.editing.take() else {
            return Ok(RenameOutcome::Idle);
        };

        let name = editing.input.trim();
        if name.is_empty() || name == editing.original {
            return Ok(RenameOutcome::Restored);
        }

        let validation = validator.validate_name(name);
        if !validation.is_valid() {
            return Ok(RenameOutcome::Rejected(validation));
        }

        let renamed = book
            .update_contact(&editing.contact_id, ContactPatch::name(name))
            .await?;
        Ok(if renamed {
            RenameOutcome::Renamed
        } else {
            RenameOutcome::Idle
        })
    }

    /// Drop the edit (Escape)
    pub fn cancel(&mut self) -> RenameOutcome {
        match self.editing.take() {
            Some(_) => RenameOutcome::Restored,
            None => RenameOutcome::Idle,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn editing_id(&self) -> Option<&str> {
        self.editing.as_ref().map(|e| e.contact_id.as_str())
    }

    pub fn input(&self) -> Option<&str> {
        self.editing.as_ref().map(|e| e.input.as_str())
    }

    /// End the session if its contact left the book
    pub fn retain_valid(&mut self, book: &ContactBook) {
        if let Some(id) = self.editing_id()
            && book.contact_by_id(id).is_none()
        {
            debug!("Contact {} removed while being renamed", id);
            self.editing = None;
        }
    }
}
