// # contactbook-ui
//
// Presentation state for the contact book.
//
// Nothing in this crate draws pixels. Each controller holds the state a
// page would keep in its markup (which menu is open, what the dropdown
// shows, which contact is being renamed) and [`App`] keeps all of them
// consistent with the [`ContactBook`](contactbook_core::ContactBook) after
// every action. A front end renders [`BookView`] and forwards user input as
// [`Action`]s.

pub mod app;
pub mod dropdown;
pub mod form;
pub mod groups;
pub mod menu;
pub mod popup;
pub mod rename;
pub mod toaster;
pub mod view;

pub use app::{Action, App};
pub use dropdown::{DropdownKey, GroupDropdown};
pub use form::ContactForm;
pub use groups::{GroupEditor, GroupRow};
pub use menu::{MenuKind, MenuState};
pub use popup::DeletePopup;
pub use rename::{RenameOutcome, RenameSession};
pub use toaster::Toaster;
pub use view::{BookView, ContactView, GroupView};
