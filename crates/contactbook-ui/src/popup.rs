//! Group delete confirmation

use crate::menu::MenuState;
use contactbook_core::ContactBook;

pub const TITLE: &str = "Delete group?";

/// Confirmation shown before a group and its contacts are deleted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeletePopup {
    target: Option<String>,
    text: String,
}

impl DeletePopup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask to delete group `group_id`
    ///
    /// The open menu is hidden while the popup is shown. Returns false (and
    /// leaves everything untouched) if the group does not exist.
    pub fn open_for_group(
        &mut self,
        book: &ContactBook,
        group_id: &str,
        menu: &mut MenuState,
    ) -> bool {
        let Some(group) = book.group_by_id(group_id) else {
            return false;
        };

        let linked = book.contacts_by_group(group_id).len();
        self.text = if linked > 0 {
            format!(
                "Deleting group \"{}\" will also delete {} contact(s) linked to it",
                group.name, linked
            )
        } else {
            format!("Are you sure you want to delete group \"{}\"?", group.name)
        };
        self.target = Some(group.id.clone());

        menu.hide();
        true
    }

    /// Dismiss the popup and bring the menu back
    pub fn close(&mut self, menu: &mut MenuState) -> Option<String> {
        menu.show();
        self.text.clear();
        self.target.take()
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn is_open(&self) -> bool {
        self.target.is_some()
    }

    pub fn title(&self) -> &'static str {
        TITLE
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}
