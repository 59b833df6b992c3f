//! Turns shell commands into UI actions
//!
//! Each command is replayed as the sequence of actions a user would perform
//! on the page, so the shell goes through exactly the same validation and
//! reconciliation as any other front end.

use crate::command::{Command, USAGE};
use contactbook_ui::{Action, App};
use tracing::debug;

/// Whether the shell keeps reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// What a command printed and whether to go on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub flow: Flow,
    pub output: String,
}

impl Outcome {
    fn new(output: impl Into<String>) -> Self {
        Self {
            flow: Flow::Continue,
            output: output.into(),
        }
    }
}

/// Run one command and collect what should be printed
///
/// The pending toast is printed after every command, followed by the
/// re-rendered list for commands that can change the book.
pub async fn execute(app: &mut App, command: Command) -> Outcome {
    debug!("Executing {:?}", command);
    let mutation = command.is_mutation();

    let mut outcome = match command {
        Command::List => Outcome::new(app.view().to_string()),
        Command::Groups => Outcome::new(render_groups(app)),
        Command::Help => Outcome::new(format!("{}\n", USAGE)),
        Command::Flush => Outcome::new(flush(app).await),
        Command::Quit => Outcome {
            flow: Flow::Quit,
            output: flush(app).await,
        },
        Command::Add {
            name,
            phone,
            group_id,
        } => {
            app.dispatch(Action::OpenContactsMenu).await;
            app.dispatch(Action::ClearContactForm).await;
            app.dispatch(Action::SetContactName(name)).await;
            app.dispatch(Action::SetContactPhone(phone)).await;
            app.dispatch(Action::SelectGroup(group_id)).await;
            app.dispatch(Action::SaveContact).await;
            app.dispatch(Action::CloseMenus).await;
            Outcome::new("")
        }
        Command::Rename { id, name } => {
            if app.book().contact_by_id(&id).is_none() {
                return Outcome::new(format!("No contact with id {}\n", id));
            }
            app.dispatch(Action::StartRename(id)).await;
            app.dispatch(Action::EditRename(name)).await;
            app.dispatch(Action::FinishRename).await;
            Outcome::new("")
        }
        Command::Delete(id) => {
            if app.book().contact_by_id(&id).is_none() {
                return Outcome::new(format!("No contact with id {}\n", id));
            }
            app.dispatch(Action::DeleteContact(id)).await;
            Outcome::new("")
        }
        Command::GroupAdd(name) => {
            app.dispatch(Action::OpenGroupsMenu).await;
            app.dispatch(Action::AddGroupRow).await;
            let index = app.groups().rows().len().saturating_sub(1);
            app.dispatch(Action::EditGroupRow { index, name }).await;
            app.dispatch(Action::CommitGroupRow(index)).await;
            app.dispatch(Action::CloseMenus).await;
            Outcome::new("")
        }
        Command::GroupRename { id, name } => {
            app.dispatch(Action::OpenGroupsMenu).await;
            let Some(index) = app.groups().row_index(&id) else {
                app.dispatch(Action::CloseMenus).await;
                return Outcome::new(format!("No group with id {}\n", id));
            };
            app.dispatch(Action::EditGroupRow { index, name }).await;
            app.dispatch(Action::SaveGroups).await;
            app.dispatch(Action::CloseMenus).await;
            Outcome::new("")
        }
        Command::GroupDelete(id) => {
            app.dispatch(Action::RequestDeleteGroup(id.clone())).await;
            if !app.popup().is_open() {
                return Outcome::new(format!("No group with id {}\n", id));
            }
            log_popup(app);
            app.dispatch(Action::ConfirmDeleteGroup).await;
            Outcome::new("")
        }
    };

    if let Some(toast) = app.toast() {
        outcome.output.push_str(&toast);
        outcome.output.push('\n');
        app.dismiss_toast();
    }
    if mutation {
        outcome.output.push_str(&app.view().to_string());
    }
    outcome
}

fn log_popup(app: &App) {
    debug!("{}: {}", app.popup().title(), app.popup().text());
}

fn render_groups(app: &App) -> String {
    let groups = app.book().groups();
    if groups.is_empty() {
        return "No groups\n".to_string();
    }

    groups
        .iter()
        .map(|g| {
            format!(
                "[{}] {} ({} contact(s))\n",
                g.id,
                g.name,
                app.book().contacts_by_group(&g.id).len()
            )
        })
        .collect()
}

async fn flush(app: &mut App) -> String {
    let pending = app.book().is_dirty();
    match app.flush().await {
        Ok(()) if pending => "Pending changes saved\n".to_string(),
        Ok(()) => String::new(),
        Err(e) => format!("{}\n", e),
    }
}
