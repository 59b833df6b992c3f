//! "Add contact" form

use crate::dropdown::GroupDropdown;
use contactbook_core::{ContactBook, NewContact, Result, ValidationResult, Validator};

pub const GROUP_NOT_SELECTED: &str = "A group must be selected";

/// Inputs of the "Add contact" form
#[derive(Debug, Clone, Default)]
pub struct ContactForm {
    pub name: String,
    pub phone: String,
    pub dropdown: GroupDropdown,
    name_error: bool,
    phone_error: bool,
    group_error: bool,
}

impl ContactForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the name input and clear its error mark
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.name_error = false;
    }

    /// Update the phone input and clear its error mark
    pub fn set_phone(&mut self, phone: impl Into<String>) {
        self.phone = phone.into();
        self.phone_error = false;
    }

    pub fn select_group(&mut self, group_id: &str) -> bool {
        let selected = self.dropdown.select(group_id);
        if selected {
            self.group_error = false;
        }
        selected
    }

    pub fn name_error(&self) -> bool {
        self.name_error
    }

    pub fn phone_error(&self) -> bool {
        self.phone_error
    }

    pub fn group_error(&self) -> bool {
        self.group_error
    }

    /// Validate the inputs and add the contact
    ///
    /// An invalid form marks the failing fields and returns the messages
    /// without touching the book. The form is cleared once the contact is
    /// in the book, even if it could not be persisted.
    pub async fn submit(
        &mut self,
        book: &mut ContactBook,
        validator: &Validator,
    ) -> Result<ValidationResult> {
        let name = validator.validate_name(&self.name);
        let phone = validator.validate_phone(&self.phone);
        let group_id = self.dropdown.selected_value().map(str::to_string);

        self.name_error = !name.is_valid();
        self.phone_error = !phone.is_valid();
        self.group_error = group_id.is_none();

        let mut result = name.and(phone);
        let Some(group_id) = group_id else {
            result.push(GROUP_NOT_SELECTED);
            return Ok(result);
        };
        if !result.is_valid() {
            return Ok(result);
        }

        match book
            .add_contact(NewContact::new(&self.name, &self.phone, group_id))
            .await
        {
            Ok(_) => {
                self.clear();
                Ok(result)
            }
            Err(e) if e.is_not_saved() => {
                self.clear();
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    /// Empty every input and reset the group picker
    pub fn clear(&mut self) {
        self.name.clear();
        self.phone.clear();
        self.dropdown.reset();
        self.name_error = false;
        self.phone_error = false;
        self.group_error = false;
    }
}
