//! Side menus

/// The side menus of the book
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuKind {
    /// "Add contact" form
    Contacts,
    /// Group editor
    Groups,
}

/// Which menu is open
///
/// At most one menu is open at a time. While the delete confirmation is
/// shown the open menu is hidden, not closed, so it comes back when the
/// confirmation goes away.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MenuState {
    open: Option<MenuKind>,
    hidden: bool,
}

impl MenuState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open `kind`, closing any other menu first
    pub fn open(&mut self, kind: MenuKind) {
        self.close_all();
        self.open = Some(kind);
    }

    /// Close `kind` if it is the open menu
    pub fn close(&mut self, kind: MenuKind) {
        if self.open == Some(kind) {
            self.close_all();
        }
    }

    pub fn close_all(&mut self) {
        self.open = None;
        self.hidden = false;
    }

    /// Keep the open menu but stop showing it
    pub fn hide(&mut self) {
        if self.open.is_some() {
            self.hidden = true;
        }
    }

    pub fn show(&mut self) {
        self.hidden = false;
    }

    pub fn is_open(&self, kind: MenuKind) -> bool {
        self.open == Some(kind)
    }

    pub fn open_menu(&self) -> Option<MenuKind> {
        self.open
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// The page behind is locked while any menu is open
    pub fn locks_page(&self) -> bool {
        self.open.is_some()
    }
}
