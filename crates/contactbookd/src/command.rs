//! Shell command parsing

use anyhow::{Result, bail};

pub const USAGE: &str = "\
Commands:
  list                                  show the contact list
  groups                                show groups with their ids
  add <name> | <phone> | <group-id>     add a contact
  rename <contact-id> <name>            rename a contact
  delete <contact-id>                   delete a contact
  group add <name>                      add a group
  group rename <group-id> <name>        rename a group
  group delete <group-id>               delete a group and its contacts
  flush                                 retry saving pending changes
  help                                  show this help
  quit                                  save and exit";

/// One line of shell input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Groups,
    Add {
        name: String,
        phone: String,
        group_id: String,
    },
    Rename {
        id: String,
        name: String,
    },
    Delete(String),
    GroupAdd(String),
    GroupRename {
        id: String,
        name: String,
    },
    GroupDelete(String),
    Flush,
    Help,
    Quit,
}

impl Command {
    /// Whether the command may change the book
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Command::Add { .. }
                | Command::Rename { .. }
                | Command::Delete(_)
                | Command::GroupAdd(_)
                | Command::GroupRename { .. }
                | Command::GroupDelete(_)
        )
    }
}

/// Parse a line; blank lines yield `None`
///
/// Names keep their inner spaces. Values are passed on untrimmed where the
/// book trims them itself, so validation sees what the user typed.
pub fn parse(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (word, rest) = split_word(line);
    let command = match word {
        "list" | "ls" => no_args(Command::List, rest)?,
        "groups" => no_args(Command::Groups, rest)?,
        "flush" => no_args(Command::Flush, rest)?,
        "help" | "?" => no_args(Command::Help, rest)?,
        "quit" | "exit" => no_args(Command::Quit, rest)?,
        "add" => parse_add(rest)?,
        "rename" => {
            let (id, name) = id_and_text(rest, "rename <contact-id> <name>")?;
            Command::Rename { id, name }
        }
        "delete" | "rm" => Command::Delete(single_id(rest, "delete <contact-id>")?),
        "group" => parse_group(rest)?,
        other => bail!("Unknown command '{}'. Type 'help' for a list of commands.", other),
    };
    Ok(Some(command))
}

fn parse_add(rest: &str) -> Result<Command> {
    let parts: Vec<&str> = rest.split('|').map(str::trim).collect();
    match parts.as_slice() {
        [name, phone, group_id] if !group_id.is_empty() => Ok(Command::Add {
            name: name.to_string(),
            phone: phone.to_string(),
            group_id: group_id.to_string(),
        }),
        _ => bail!("Usage: add <name> | <phone> | <group-id>"),
    }
}

fn parse_group(rest: &str) -> Result<Command> {
    let (word, rest) = split_word(rest);
    match word {
        "add" if !rest.is_empty() => Ok(Command::GroupAdd(rest.to_string())),
        "add" => bail!("Usage: group add <name>"),
        "rename" => {
            let (id, name) = id_and_text(rest, "group rename <group-id> <name>")?;
            Ok(Command::GroupRename { id, name })
        }
        "delete" | "rm" => Ok(Command::GroupDelete(single_id(
            rest,
            "group delete <group-id>",
        )?)),
        _ => bail!("Usage: group add|rename|delete ..."),
    }
}

fn split_word(input: &str) -> (&str, &str) {
    let input = input.trim_start();
    match input.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (input, ""),
    }
}

fn no_args(command: Command, rest: &str) -> Result<Command> {
    if !rest.is_empty() {
        bail!("'{}' takes no arguments", rest);
    }
    Ok(command)
}

fn single_id(rest: &str, usage: &str) -> Result<String> {
    let (id, extra) = split_word(rest);
    if id.is_empty() || !extra.is_empty() {
        bail!("Usage: {}", usage);
    }
    Ok(id.to_string())
}

fn id_and_text(rest: &str, usage: &str) -> Result<(String, String)> {
    let (id, text) = split_word(rest);
    if id.is_empty() || text.is_empty() {
        bail!("Usage: {}", usage);
    }
    Ok((id.to_string(), text.to_string()))
}
