//! Group picker of the contact form

use contactbook_core::Group;

/// Label shown while nothing is selected
pub const PLACEHOLDER: &str = "Select a group";

/// One option of the dropdown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropdownItem {
    pub value: String,
    pub label: String,
}

/// Keys the dropdown reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropdownKey {
    ArrowDown,
    ArrowUp,
    Enter,
    Space,
    Escape,
    Tab,
}

/// Dropdown listing the book's groups
///
/// The selection is held by value, so it survives a re-sync as long as the
/// group still exists and is dropped as soon as it does not.
#[derive(Debug, Clone, Default)]
pub struct GroupDropdown {
    items: Vec<DropdownItem>,
    open: bool,
    selected: Option<DropdownItem>,
    highlighted: Option<usize>,
}

impl GroupDropdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the options from `groups`
    pub fn sync_items(&mut self, groups: &[Group]) {
        self.items = groups
            .iter()
            .map(|g| DropdownItem {
                value: g.id.clone(),
                label: g.name.clone(),
            })
            .collect();

        // Keep the selection only if its group survived, with its new label
        self.selected = self
            .selected
            .take()
            .and_then(|sel| self.items.iter().find(|item| item.value == sel.value).cloned());

        if self.highlighted.is_some_and(|i| i >= self.items.len()) {
            self.highlighted = None;
        }
    }

    pub fn items(&self) -> &[DropdownItem] {
        &self.items
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Value for the toggle's `aria-expanded` attribute
    pub fn aria_expanded(&self) -> &'static str {
        if self.open { "true" } else { "false" }
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    /// Select the option with `value` and close; false if there is none
    pub fn select(&mut self, value: &str) -> bool {
        let Some(index) = self.items.iter().position(|item| item.value == value) else {
            return false;
        };
        self.selected = self.items.get(index).cloned();
        self.highlighted = Some(index);
        self.close();
        true
    }

    pub fn selected_value(&self) -> Option<&str> {
        self.selected.as_ref().map(|item| item.value.as_str())
    }

    /// Text shown in the toggle
    pub fn selected_label(&self) -> &str {
        self.selected
            .as_ref()
            .map_or(PLACEHOLDER, |item| item.label.as_str())
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    /// Clear the selection and close
    pub fn reset(&mut self) {
        self.selected = None;
        self.highlighted = None;
        self.close();
    }

    /// Keyboard navigation
    ///
    /// While closed, only the arrow keys, Enter and Space do anything (they
    /// open the list). While open, the arrows move the highlight with
    /// wrap-around, Enter/Space pick the highlighted option, and Escape/Tab
    /// close.
    pub fn handle_key(&mut self, key: DropdownKey) {
        if !self.open
            && !matches!(
                key,
                DropdownKey::ArrowDown | DropdownKey::ArrowUp | DropdownKey::Enter | DropdownKey::Space
            )
        {
            return;
        }

        match key {
            DropdownKey::Escape | DropdownKey::Tab => self.close(),
            DropdownKey::ArrowDown if self.open => self.navigate(1),
            DropdownKey::ArrowUp if self.open => self.navigate(-1),
            DropdownKey::ArrowDown | DropdownKey::ArrowUp => self.open(),
            DropdownKey::Enter | DropdownKey::Space => {
                if !self.open {
                    self.open();
                } else if let Some(item) = self.highlighted.and_then(|i| self.items.get(i)) {
                    let value = item.value.clone();
                    self.select(&value);
                }
            }
        }
    }

    fn navigate(&mut self, direction: isize) {
        let count = self.items.len() as isize;
        if count == 0 {
            return;
        }

        let current = self.highlighted.map_or(-1, |i| i as isize);
        let next = (current + direction).rem_euclid(count);
        self.highlighted = Some(next as usize);
    }
}
