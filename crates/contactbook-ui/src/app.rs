//! The application loop
//!
//! Every user action goes through [`App::dispatch()`]:
//!
//! 1. Input is validated; failures become an error toast
//! 2. The book is mutated and persists itself
//! 3. [`App::refresh()`] rebuilds the view and reconciles the controllers
//!    (dropdown selection, popup target, rename session, group rows) with
//!    what is now in the book
//!
//! Errors never escape `dispatch`: a save failure is shown as a
//! "Changes not saved" toast and the view still reflects the in-memory
//! change.

use crate::dropdown::DropdownKey;
use crate::form::ContactForm;
use crate::groups::GroupEditor;
use crate::menu::{MenuKind, MenuState};
use crate::popup::DeletePopup;
use crate::rename::{RenameOutcome, RenameSession};
use crate::toaster::Toaster;
use crate::view::BookView;
use contactbook_core::{ContactBook, NotificationConfig, Result, ValidationResult, Validator};
use std::collections::HashSet;
use tracing::{debug, warn};

pub const CONTACT_ADDED: &str = "Contact added successfully";
pub const CONTACT_DELETED: &str = "Contact deleted successfully";
pub const CONTACT_RENAMED: &str = "Contact renamed successfully";
pub const GROUPS_SAVED: &str = "Groups saved successfully";
pub const GROUP_DELETED: &str = "Group deleted successfully";

/// Something the user did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    OpenContactsMenu,
    OpenGroupsMenu,
    CloseMenus,

    SetContactName(String),
    SetContactPhone(String),
    ToggleGroupDropdown,
    DropdownKey(DropdownKey),
    SelectGroup(String),
    SaveContact,
    ClearContactForm,

    StartRename(String),
    EditRename(String),
    FinishRename,
    CancelRename,
    DeleteContact(String),
    /// Expand or collapse a group in the list
    ToggleGroup(String),

    AddGroupRow,
    EditGroupRow { index: usize, name: String },
    /// A new row lost focus
    CommitGroupRow(usize),
    RemoveGroupRow(usize),
    SaveGroups,

    RequestDeleteGroup(String),
    ConfirmDeleteGroup,
    CancelDeleteGroup,
}

/// The contact book with everything needed to present it
pub struct App {
    book: ContactBook,
    validator: Validator,
    notifications: NotificationConfig,
    menu: MenuState,
    popup: DeletePopup,
    form: ContactForm,
    rename: RenameSession,
    groups: GroupEditor,
    toaster: Toaster,
    expanded: HashSet<String>,
    view: BookView,
}

impl App {
    /// Wrap an opened book; must be called inside a tokio runtime
    pub fn new(book: ContactBook, notifications: NotificationConfig) -> Self {
        let mut app = Self {
            book,
            validator: Validator::new(),
            toaster: Toaster::new(notifications.default_duration()),
            notifications,
            menu: MenuState::new(),
            popup: DeletePopup::new(),
            form: ContactForm::new(),
            rename: RenameSession::new(),
            groups: GroupEditor::new(),
            expanded: HashSet::new(),
            view: BookView::default(),
        };
        app.groups.load(&app.book);
        app.refresh();
        app
    }

    /// Apply `action` and bring every controller back in line with the book
    pub async fn dispatch(&mut self, action: Action) {
        debug!("Dispatching {:?}", action);

        if let Err(e) = self.apply(action).await {
            warn!("Action failed: {}", e);
            self.notify_error(e.to_string());
        }
        self.refresh();
    }

    async fn apply(&mut self, action: Action) -> Result<()> {
        match action {
            Action::OpenContactsMenu => {
                self.menu.open(MenuKind::Contacts);
                self.form.dropdown.sync_items(self.book.groups());
            }
            Action::OpenGroupsMenu => {
                self.menu.open(MenuKind::Groups);
                self.groups.load(&self.book);
            }
            Action::CloseMenus => {
                self.menu.close_all();
                self.form.dropdown.close();
                if self.popup.is_open() {
                    self.popup.close(&mut self.menu);
                }
            }

            Action::SetContactName(name) => self.form.set_name(name),
            Action::SetContactPhone(phone) => self.form.set_phone(phone),
            Action::ToggleGroupDropdown => self.form.dropdown.toggle(),
            Action::DropdownKey(key) => self.form.dropdown.handle_key(key),
            Action::SelectGroup(id) => {
                self.form.select_group(&id);
            }
            Action::SaveContact => {
                let result = self.form.submit(&mut self.book, &self.validator).await?;
                if result.is_valid() {
                    self.menu.close_all();
                    self.notify(CONTACT_ADDED);
                } else {
                    self.reject(&result);
                }
            }

            Action::ClearContactForm => self.form.clear(),

            Action::StartRename(id) => {
                let previous = self.rename.start(&mut self.book, &self.validator, &id).await?;
                self.report_rename(previous);
            }
            Action::EditRename(text) => self.rename.set_input(text),
            Action::FinishRename => {
                let outcome = self.rename.finish(&mut self.book, &self.validator).await?;
                self.report_rename(outcome);
            }
            Action::CancelRename => {
                self.rename.cancel();
            }
            Action::DeleteContact(id) => {
                if self.book.delete_contact(&id).await? {
                    self.notify(CONTACT_DELETED);
                }
            }
            Action::ToggleGroup(id) => {
                if !self.expanded.remove(&id) {
                    self.expanded.insert(id);
                }
            }

            Action::AddGroupRow => {
                self.groups.add_row();
            }
            Action::EditGroupRow { index, name } => {
                self.groups.set_name(index, name);
            }
            Action::CommitGroupRow(index) => {
                let result = self
                    .groups
                    .commit_row(index, &mut self.book, &self.validator)
                    .await?;
                if !result.is_valid() {
                    self.reject(&result);
                }
            }
            Action::RemoveGroupRow(index) => {
                self.groups.remove_row(index);
            }
            Action::SaveGroups => {
                let result = self.groups.save(&mut self.book, &self.validator).await?;
                if result.is_valid() {
                    self.menu.close_all();
                    self.notify(GROUPS_SAVED);
                } else {
                    self.reject(&result);
                }
            }

            Action::RequestDeleteGroup(id) => {
                if !self.popup.open_for_group(&self.book, &id, &mut self.menu) {
                    debug!("Group {} not found, nothing to confirm", id);
                }
            }
            Action::ConfirmDeleteGroup => {
                if let Some(id) = self.popup.close(&mut self.menu)
                    && self.book.delete_group(&id).await?
                {
                    self.notify(GROUP_DELETED);
                }
            }
            Action::CancelDeleteGroup => {
                self.popup.close(&mut self.menu);
            }
        }
        Ok(())
    }

    /// Rebuild the view and drop references to things that left the book
    pub fn refresh(&mut self) {
        self.form.dropdown.sync_items(self.book.groups());
        self.rename.retain_valid(&self.book);
        self.groups.retain_valid(&self.book);

        if let Some(target) = self.popup.target()
            && self.book.group_by_id(target).is_none()
        {
            self.popup.close(&mut self.menu);
        }

        let book = &self.book;
        self.expanded.retain(|id| book.group_by_id(id).is_some());

        self.view = BookView::build(&self.book, &self.expanded);
    }

    /// Retry persisting after a failed save
    pub async fn flush(&mut self) -> Result<()> {
        self.book.flush().await
    }

    pub fn book(&self) -> &ContactBook {
        &self.book
    }

    pub fn view(&self) -> &BookView {
        &self.view
    }

    pub fn menu(&self) -> &MenuState {
        &self.menu
    }

    pub fn popup(&self) -> &DeletePopup {
        &self.popup
    }

    pub fn form(&self) -> &ContactForm {
        &self.form
    }

    pub fn rename(&self) -> &RenameSession {
        &self.rename
    }

    pub fn groups(&self) -> &GroupEditor {
        &self.groups
    }

    /// Message currently shown by the toaster
    pub fn toast(&self) -> Option<String> {
        self.toaster.visible()
    }

    pub fn dismiss_toast(&mut self) {
        self.toaster.dismiss();
    }

    fn report_rename(&mut self, outcome: RenameOutcome) {
        match outcome {
            RenameOutcome::Renamed => self.notify(CONTACT_RENAMED),
            RenameOutcome::Rejected(result) => self.reject(&result),
            RenameOutcome::Idle | RenameOutcome::Restored => {}
        }
    }

    fn notify(&mut self, message: &str) {
        self.toaster.show(message, None);
    }

    fn notify_error(&mut self, message: String) {
        self.toaster
            .show(message, Some(self.notifications.error_duration()));
    }

    fn reject(&mut self, result: &ValidationResult) {
        self.notify_error(result.joined(", "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contactbook_core::store::MemoryContactStore;
    use contactbook_core::validation::{NAME_EMPTY, PHONE_EMPTY};
    use contactbook_core::BookConfig;
    use crate::form::GROUP_NOT_SELECTED;

    async fn app() -> App {
        let (book, _rx) = ContactBook::open(
            Box::new(MemoryContactStore::new()),
            &BookConfig::default(),
        )
        .await
        .unwrap();
        App::new(book, NotificationConfig::default())
    }

    #[tokio::test]
    async fn add_contact_flow() {
        let mut app = app().await;
        app.dispatch(Action::OpenContactsMenu).await;
        app.dispatch(Action::SetContactName("Ann Lee".into())).await;
        app.dispatch(Action::SetContactPhone("+1 555 000 1111".into())).await;
        app.dispatch(Action::SelectGroup("2".into())).await;
        app.dispatch(Action::SaveContact).await;

        assert_eq!(app.toast().as_deref(), Some(CONTACT_ADDED));
        assert_eq!(app.menu().open_menu(), None);
        assert_eq!(app.view().contact_count(), 4);
        assert_eq!(app.view().groups[1].contacts.last().unwrap().name, "Ann Lee");
    }

    #[tokio::test]
    async fn invalid_contact_shows_joined_errors() {
        let mut app = app().await;
        app.dispatch(Action::OpenContactsMenu).await;
        app.dispatch(Action::SaveContact).await;

        let expected = [NAME_EMPTY, PHONE_EMPTY, GROUP_NOT_SELECTED].join(", ");
        assert_eq!(app.toast(), Some(expected));
        assert!(app.menu().is_open(MenuKind::Contacts));
        assert_eq!(app.view().contact_count(), 3);
    }

    #[tokio::test]
    async fn delete_group_through_popup() {
        let mut app = app().await;
        app.dispatch(Action::OpenGroupsMenu).await;
        app.dispatch(Action::RequestDeleteGroup("1".into())).await;

        assert!(app.popup().is_open());
        assert!(app.menu().is_hidden());

        app.dispatch(Action::ConfirmDeleteGroup).await;

        assert!(!app.popup().is_open());
        assert!(app.menu().is_open(MenuKind::Groups));
        assert!(!app.menu().is_hidden());
        assert_eq!(app.toast().as_deref(), Some(GROUP_DELETED));
        assert_eq!(app.view().contact_count(), 1);
        assert_eq!(app.groups().rows().len(), 1);
    }

    #[tokio::test]
    async fn cancel_delete_keeps_group() {
        let mut app = app().await;
        app.dispatch(Action::RequestDeleteGroup("2".into())).await;
        app.dispatch(Action::CancelDeleteGroup).await;

        assert!(app.book().group_by_id("2").is_some());
        assert_eq!(app.toast(), None);
    }

    #[tokio::test]
    async fn deleted_group_clears_dropdown_selection() {
        let mut app = app().await;
        app.dispatch(Action::OpenContactsMenu).await;
        app.dispatch(Action::SelectGroup("2".into())).await;
        assert_eq!(app.form().dropdown.selected_value(), Some("2"));

        app.dispatch(Action::RequestDeleteGroup("2".into())).await;
        app.dispatch(Action::ConfirmDeleteGroup).await;

        assert_eq!(app.form().dropdown.selected_value(), None);
    }

    #[tokio::test]
    async fn rename_flow() {
        let mut app = app().await;
        app.dispatch(Action::StartRename("3".into())).await;
        app.dispatch(Action::EditRename("Sidor Petrov".into())).await;
        app.dispatch(Action::FinishRename).await;

        assert_eq!(app.toast().as_deref(), Some(CONTACT_RENAMED));
        assert_eq!(app.view().groups[1].contacts[0].name, "Sidor Petrov");
        assert!(!app.rename().is_editing());
    }

    #[tokio::test]
    async fn rename_target_deleted_ends_session() {
        let mut app = app().await;
        app.dispatch(Action::StartRename("3".into())).await;
        app.dispatch(Action::DeleteContact("3".into())).await;

        assert!(!app.rename().is_editing());
        assert_eq!(app.toast().as_deref(), Some(CONTACT_DELETED));
    }

    #[tokio::test]
    async fn save_groups_flow() {
        let mut app = app().await;
        app.dispatch(Action::OpenGroupsMenu).await;
        app.dispatch(Action::AddGroupRow).await;
        app.dispatch(Action::EditGroupRow {
            index: 2,
            name: "Family".into(),
        })
        .await;
        app.dispatch(Action::SaveGroups).await;

        assert_eq!(app.toast().as_deref(), Some(GROUPS_SAVED));
        assert_eq!(app.menu().open_menu(), None);
        assert_eq!(app.book().groups().len(), 3);
    }

    #[tokio::test]
    async fn toggled_group_is_expanded_until_deleted() {
        let mut app = app().await;
        app.dispatch(Action::ToggleGroup("2".into())).await;
        assert!(app.view().groups[1].expanded);

        app.dispatch(Action::RequestDeleteGroup("2".into())).await;
        app.dispatch(Action::ConfirmDeleteGroup).await;
        app.dispatch(Action::ToggleGroup("1".into())).await;
        app.dispatch(Action::ToggleGroup("1".into())).await;

        assert!(!app.view().groups[0].expanded);
    }
}
