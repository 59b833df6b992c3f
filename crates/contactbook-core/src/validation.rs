//! Input validation
//!
//! Pure, stateless checks on user input. Each field runs its structural
//! rules in order and stops at the first failure, so an empty name never
//! also reports a length problem. Independent rules (a name's format and
//! its uniqueness, a phone's length and its character set) each contribute
//! their own message.

use crate::model::Group;

const NAME_MIN_CHARS: usize = 2;
const NAME_MAX_CHARS: usize = 100;
const PHONE_MIN_DIGITS: usize = 10;
const PHONE_MAX_DIGITS: usize = 15;
const GROUP_NAME_MAX_CHARS: usize = 50;

pub const NAME_EMPTY: &str = "Name cannot be empty";
pub const NAME_TOO_SHORT: &str = "Name must be at least 2 characters long";
pub const NAME_TOO_LONG: &str = "Name cannot be longer than 100 characters";
pub const NAME_INVALID_CHARS: &str = "Name may only contain letters, spaces and hyphens";
pub const PHONE_EMPTY: &str = "Phone number cannot be empty";
pub const PHONE_TOO_SHORT: &str = "Phone number must contain at least 10 digits";
pub const PHONE_TOO_LONG: &str = "Phone number cannot contain more than 15 digits";
pub const PHONE_INVALID_CHARS: &str = "Phone number contains invalid characters";
pub const GROUP_NAME_EMPTY: &str = "Group name cannot be empty";
pub const GROUP_NAME_TOO_LONG: &str = "Group name cannot be longer than 50 characters";
pub const GROUP_NAME_TAKEN: &str = "A group with this name already exists";

/// Outcome of validating one or more fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    errors: Vec<String>,
}

impl ValidationResult {
    /// A result with no errors
    pub fn ok() -> Self {
        Self::default()
    }

    /// A result carrying a single error
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            errors: vec![message.into()],
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Error messages in check order
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    /// Append every error of `other`, keeping order
    pub fn merge(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
    }

    /// Combine two results into one
    pub fn and(mut self, other: ValidationResult) -> Self {
        self.merge(other);
        self
    }

    /// Errors joined for a one-line notification
    pub fn joined(&self, separator: &str) -> String {
        self.errors.join(separator)
    }
}

/// Stateless validator for contact and group input
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator;

impl Validator {
    pub fn new() -> Self {
        Self
    }

    /// Validate a contact name: 2..=100 characters of letters, spaces and hyphens
    pub fn validate_name(&self, input: &str) -> ValidationResult {
        let name = input.trim();
        let len = name.chars().count();

        if name.is_empty() {
            ValidationResult::error(NAME_EMPTY)
        } else if len < NAME_MIN_CHARS {
            ValidationResult::error(NAME_TOO_SHORT)
        } else if len > NAME_MAX_CHARS {
            ValidationResult::error(NAME_TOO_LONG)
        } else if !name
            .chars()
            .all(|c| c.is_alphabetic() || c.is_whitespace() || c == '-')
        {
            ValidationResult::error(NAME_INVALID_CHARS)
        } else {
            ValidationResult::ok()
        }
    }

    /// Validate a phone number: 10..=15 digits, digits/spaces/`-`/`+`/parentheses only
    ///
    /// The digit count and the character set are independent rules: a
    /// number that is both too short and contains letters reports both.
    pub fn validate_phone(&self, input: &str) -> ValidationResult {
        if input.trim().is_empty() {
            return ValidationResult::error(PHONE_EMPTY);
        }

        let mut result = ValidationResult::ok();
        let digits = input.chars().filter(|c| c.is_ascii_digit()).count();
        if digits < PHONE_MIN_DIGITS {
            result.push(PHONE_TOO_SHORT);
        } else if digits > PHONE_MAX_DIGITS {
            result.push(PHONE_TOO_LONG);
        }

        if !input.chars().all(is_phone_char) {
            result.push(PHONE_INVALID_CHARS);
        }

        result
    }

    /// Validate a group name: non-empty, at most 50 characters
    pub fn validate_group_name(&self, input: &str) -> ValidationResult {
        let name = input.trim();

        if name.is_empty() {
            ValidationResult::error(GROUP_NAME_EMPTY)
        } else if name.chars().count() > GROUP_NAME_MAX_CHARS {
            ValidationResult::error(GROUP_NAME_TOO_LONG)
        } else {
            ValidationResult::ok()
        }
    }

    /// Fail if another group already uses `candidate`, ignoring case
    ///
    /// `exclude_id` skips the group being renamed so it does not collide
    /// with itself.
    pub fn validate_group_uniqueness(
        &self,
        candidate: &str,
        groups: &[Group],
        exclude_id: Option<&str>,
    ) -> ValidationResult {
        let wanted = candidate.trim().to_lowercase();
        let taken = groups
            .iter()
            .filter(|group| Some(group.id.as_str()) != exclude_id)
            .any(|group| group.name.to_lowercase() == wanted);

        if taken {
            ValidationResult::error(GROUP_NAME_TAKEN)
        } else {
            ValidationResult::ok()
        }
    }
}

fn is_phone_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, ' ' | '-' | '+' | '(' | ')')
}
