//! Group editor menu
//!
//! The editor works on a list of rows rather than on the book directly:
//! existing groups come in as rows carrying their id, new rows have none.
//! Nothing reaches the book until a new row is committed or the whole list
//! is saved.

use contactbook_core::{ContactBook, Group, Result, ValidationResult, Validator};
use std::collections::HashSet;
use tracing::debug;

pub const DUPLICATE_IN_LIST: &str = "Duplicate group name";

/// One editable line of the group menu
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupRow {
    /// Identifier of the group, `None` until the row is stored
    pub id: Option<String>,
    pub name: String,
    pub error: bool,
}

impl GroupRow {
    fn blank() -> Self {
        Self::default()
    }
}

/// Editable list of groups
#[derive(Debug, Clone, Default)]
pub struct GroupEditor {
    rows: Vec<GroupRow>,
    /// Groups this editor has seen stored; removing their row deletes them
    known_ids: HashSet<String>,
}

impl GroupEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset the rows to the book's groups
    ///
    /// A book without groups gets one empty row to type into.
    pub fn load(&mut self, book: &ContactBook) {
        self.rows = book
            .groups()
            .iter()
            .map(|g| GroupRow {
                id: Some(g.id.clone()),
                name: g.name.clone(),
                error: false,
            })
            .collect();
        self.known_ids = book.groups().iter().map(|g| g.id.clone()).collect();

        if self.rows.is_empty() {
            self.rows.push(GroupRow::blank());
        }
    }

    pub fn rows(&self) -> &[GroupRow] {
        &self.rows
    }

    /// Append an empty new row and return its index
    pub fn add_row(&mut self) -> usize {
        self.rows.push(GroupRow::blank());
        self.rows.len() - 1
    }

    pub fn set_name(&mut self, index: usize, name: impl Into<String>) -> bool {
        match self.rows.get_mut(index) {
            Some(row) => {
                row.name = name.into();
                row.error = false;
                true
            }
            None => false,
        }
    }

    /// Drop a row; a stored group is only deleted on [`GroupEditor::save`]
    pub fn remove_row(&mut self, index: usize) -> Option<GroupRow> {
        (index < self.rows.len()).then(|| self.rows.remove(index))
    }

    pub fn row_index(&self, group_id: &str) -> Option<usize> {
        self.rows
            .iter()
            .position(|row| row.id.as_deref() == Some(group_id))
    }

    /// Store a new row as soon as it loses focus
    ///
    /// Empty rows and rows that are already stored are left alone. The name
    /// must be valid and not used by any group in the book.
    pub async fn commit_row(
        &mut self,
        index: usize,
        book: &mut ContactBook,
        validator: &Validator,
    ) -> Result<ValidationResult> {
        let Some(row) = self.rows.get_mut(index) else {
            return Ok(ValidationResult::ok());
        };
        let name = row.name.trim().to_string();
        if row.id.is_some() || name.is_empty() {
            return Ok(ValidationResult::ok());
        }

        let result = validator
            .validate_group_name(&name)
            .and(validator.validate_group_uniqueness(&name, book.groups(), None));
        if !result.is_valid() {
            row.error = true;
            return Ok(result);
        }

        // The group exists in memory even when the save fails
        let id = book.add_group(&name).await;
        let id = match id {
            Ok(id) => id,
            Err(e) => {
                self.adopt_last_group(index, book, &name);
                return Err(e);
            }
        };
        debug!("Committed group row {} as {}", index, id);
        self.mark_stored(index, id);
        Ok(result)
    }

    /// Validate every row and apply the list to the book
    ///
    /// Rows are numbered from 1 in messages. On success existing groups are
    /// renamed, new rows are added and groups whose row was removed are
    /// deleted along with their contacts.
    pub async fn save(
        &mut self,
        book: &mut ContactBook,
        validator: &Validator,
    ) -> Result<ValidationResult> {
        let result = self.validate_rows(book, validator);
        if !result.is_valid() {
            return Ok(result);
        }

        for index in 0..self.rows.len() {
            let row = &self.rows[index];
            let name = row.name.trim().to_string();
            if name.is_empty() {
                continue;
            }

            match row.id.clone() {
                Some(id) => {
                    let changed = book.group_by_id(&id).is_some_and(|g| g.name != name);
                    if changed {
                        book.update_group(&id, &name).await?;
                    }
                }
                None => match book.add_group(&name).await {
                    Ok(id) => self.mark_stored(index, id),
                    Err(e) => {
                        self.adopt_last_group(index, book, &name);
                        return Err(e);
                    }
                },
            }
        }

        let kept: HashSet<&str> = self.rows.iter().filter_map(|r| r.id.as_deref()).collect();
        let removed: Vec<String> = self
            .known_ids
            .iter()
            .filter(|id| !kept.contains(id.as_str()))
            .cloned()
            .collect();
        for id in removed {
            book.delete_group(&id).await?;
            self.known_ids.remove(&id);
        }

        self.load(book);
        Ok(result)
    }

    /// Drop rows whose group left the book, keeping unsaved edits elsewhere
    pub fn retain_valid(&mut self, book: &ContactBook) {
        self.rows
            .retain(|row| row.id.as_deref().is_none_or(|id| book.group_by_id(id).is_some()));
        self.known_ids.retain(|id| book.group_by_id(id).is_some());
    }

    fn validate_rows(&mut self, book: &ContactBook, validator: &Validator) -> ValidationResult {
        let untouched = self.untouched_groups(book);
        let mut result = ValidationResult::ok();
        let mut seen = HashSet::new();

        for (index, row) in self.rows.iter_mut().enumerate() {
            let name = row.name.trim();
            row.error = false;
            if name.is_empty() {
                continue;
            }

            let number = index + 1;
            let validation = validator.validate_group_name(name).and(
                validator.validate_group_uniqueness(name, &untouched, row.id.as_deref()),
            );
            if !validation.is_valid() {
                result.push(format!("Group {}: {}", number, validation.joined(", ")));
                row.error = true;
                continue;
            }

            if !seen.insert(name.to_lowercase()) {
                result.push(format!("Group {}: {}", number, DUPLICATE_IN_LIST));
                row.error = true;
            }
        }

        result
    }

    /// Groups whose stored name survives a save unchanged
    ///
    /// That is groups behind a blank row and groups added to the book after
    /// [`GroupEditor::load`]. Groups renamed by a row or about to be deleted
    /// are left out.
    fn untouched_groups(&self, book: &ContactBook) -> Vec<Group> {
        book.groups()
            .iter()
            .filter(|group| match self.row_index(&group.id) {
                Some(index) => self.rows[index].name.trim().is_empty(),
                None => !self.known_ids.contains(&group.id),
            })
            .cloned()
            .collect()
    }

    fn mark_stored(&mut self, index: usize, id: String) {
        if let Some(row) = self.rows.get_mut(index) {
            row.id = Some(id.clone());
            row.error = false;
        }
        self.known_ids.insert(id);
    }

    /// After a failed save the new group is still the book's last one
    fn adopt_last_group(&mut self, index: usize, book: &ContactBook, name: &str) {
        if let Some(group) = book.groups().last()
            && group.name == name
            && !self.known_ids.contains(&group.id)
        {
            self.mark_stored(index, group.id.clone());
        }
    }
}
