//! Contact domain model.
//!
//! # Responsibility
//! - Define the `Contact` value record and its stored `ContactEntry` wrapper.
//! - Provide the input validation rules used by add/edit callers.
//!
//! # Invariants
//! - `Contact` never validates itself on construction; callers run
//!   `Contact::validate()` before handing input to the store.
//! - `ContactId` is assigned once and never reused for another entry.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

// Same shape as the platform's standard email-address pattern.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9+._%\-]{1,256}@[a-zA-Z0-9][a-zA-Z0-9\-]{0,64}(\.[a-zA-Z0-9][a-zA-Z0-9\-]{0,25})+$",
    )
    .expect("valid email regex")
});

/// Stable identifier for one stored contact.
pub type ContactId = Uuid;

/// Person record with first name, last name and email.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Contact {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl Contact {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
        }
    }

    /// Returns a copy of this contact with only the email replaced.
    ///
    /// Editing an existing contact keeps both name fields read-only.
    pub fn with_email(&self, email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            ..self.clone()
        }
    }

    /// List row label: `"{first} {last}"`.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Returns the value compared by `sort_by` for the given key.
    pub fn sort_value(&self, key: SortKey) -> &str {
        match key {
            SortKey::FirstName => self.first_name.as_str(),
            SortKey::LastName => self.last_name.as_str(),
        }
    }

    /// Validates user input the way the add/edit form does.
    ///
    /// # Errors
    /// - `EmptyFirstName` / `EmptyLastName` when a name field is empty.
    /// - `InvalidEmail` when `email` is not an address-shaped string.
    pub fn validate(&self) -> Result<(), ContactValidationError> {
        if self.first_name.is_empty() {
            return Err(ContactValidationError::EmptyFirstName);
        }
        if self.last_name.is_empty() {
            return Err(ContactValidationError::EmptyLastName);
        }
        if !is_valid_email(self.email.as_str()) {
            return Err(ContactValidationError::InvalidEmail(self.email.clone()));
        }
        Ok(())
    }
}

/// Returns whether `value` matches the accepted email-address pattern.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// Collection element: a contact plus its stable identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactEntry {
    pub id: ContactId,
    pub contact: Contact,
}

impl ContactEntry {
    /// Wraps a contact with a freshly generated id.
    pub fn new(contact: Contact) -> Self {
        Self::with_id(Uuid::new_v4(), contact)
    }

    /// Wraps a contact with a caller-provided id.
    ///
    /// Used by decode paths where identity was already persisted.
    pub fn with_id(id: ContactId, contact: Contact) -> Self {
        Self { id, contact }
    }
}

/// Field selector for the two sort actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    FirstName,
    LastName,
}

impl SortKey {
    /// Stable string id used across the FFI boundary.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
        }
    }

    /// Parses a sort key from its stable string id.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "first_name" => Some(Self::FirstName),
            "last_name" => Some(Self::LastName),
            _ => None,
        }
    }
}

/// Input validation failures reported to the add/edit form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactValidationError {
    EmptyFirstName,
    EmptyLastName,
    InvalidEmail(String),
}

impl Display for ContactValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyFirstName => write!(f, "first_name must not be empty"),
            Self::EmptyLastName => write!(f, "last_name must not be empty"),
            Self::InvalidEmail(value) => write!(f, "email is not a valid address: `{value}`"),
        }
    }
}

impl Error for ContactValidationError {}
