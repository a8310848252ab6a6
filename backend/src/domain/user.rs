//! User data model and its input validation.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::blank::{is_blank_trimmed, present};
use super::field_errors::FieldErrors;

/// Maximum number of characters any text column accepts.
pub const TEXT_COLUMN_MAX: usize = 255;

/// Default cap on the number of characters in an email address.
pub const DEFAULT_EMAIL_MAX_LENGTH: usize = 6;

/// Stable, store-assigned user identifier.
///
/// Identifiers are handed out by the record store, never reused, and never
/// change once assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Wrap a raw store identifier.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw numeric value.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// Rules applied to the email field when constructing a user.
///
/// # Examples
/// ```
/// use scorebook::domain::{EmailPolicy, UserDraft};
///
/// let policy = EmailPolicy::default();
/// let draft = UserDraft::new(Some("Amy".into()), Some("abcdefg".into()));
/// assert!(draft.validate(&policy).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmailPolicy {
    required: bool,
    max_length: usize,
}

impl EmailPolicy {
    /// Build a policy, clamping the maximum to the column width.
    pub fn new(required: bool, max_length: usize) -> Self {
        Self {
            required,
            max_length: max_length.min(TEXT_COLUMN_MAX),
        }
    }

    /// Whether a blank email is rejected.
    pub fn required(&self) -> bool {
        self.required
    }

    /// Maximum number of characters accepted.
    pub fn max_length(&self) -> usize {
        self.max_length
    }
}

impl Default for EmailPolicy {
    fn default() -> Self {
        Self::new(true, DEFAULT_EMAIL_MAX_LENGTH)
    }
}

/// Whitelisted, unvalidated user input.
///
/// Only `name` and `email` exist here; anything else a caller supplies is
/// dropped before this value is built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDraft {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl UserDraft {
    /// Build a draft from raw optional fields.
    pub fn new(name: Option<String>, email: Option<String>) -> Self {
        Self { name, email }
    }

    /// Validate the draft into a storable record.
    ///
    /// # Errors
    /// Returns every violated rule keyed by field name.
    pub fn validate(self, policy: &EmailPolicy) -> Result<UserRecord, FieldErrors> {
        let mut errors = FieldErrors::new();

        if let Some(name) = self.name.as_deref() {
            check_column_width(&mut errors, "name", name);
        }

        if is_blank_trimmed(self.email.as_deref()) {
            if policy.required() {
                errors.add("email", "email must not be blank");
            }
        } else if let Some(email) = self.email.as_deref() {
            let length = email.chars().count();
            if length > policy.max_length() {
                errors.add(
                    "email",
                    format!(
                        "email is too long (maximum is {} characters)",
                        policy.max_length()
                    ),
                );
            }
        }

        errors.into_result()?;
        Ok(UserRecord {
            name: present(self.name),
            email: self.email.filter(|email| !email.trim().is_empty()),
        })
    }
}

pub(crate) fn check_column_width(errors: &mut FieldErrors, field: &str, value: &str) {
    if value.chars().count() > TEXT_COLUMN_MAX {
        errors.add(
            field,
            format!("{field} is too long (maximum is {TEXT_COLUMN_MAX} characters)"),
        );
    }
}

/// Validated user fields ready to be written to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    name: Option<String>,
    email: Option<String>,
}

impl UserRecord {
    /// Stored name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Stored email, if any.
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }
}

/// Persisted application user.
///
/// ## Invariants
/// - `id` was assigned by the store and never changes.
/// - `created_at <= updated_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: UserId,
    name: Option<String>,
    email: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Rehydrate a user from stored values.
    pub fn from_parts(
        id: UserId,
        record: UserRecord,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: record.name,
            email: record.email,
            created_at,
            updated_at,
        }
    }

    /// Rehydrate a user from raw row columns.
    pub fn from_row(
        id: i64,
        name: Option<String>,
        email: Option<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self::from_parts(
            UserId::new(id),
            UserRecord { name, email },
            created_at,
            updated_at,
        )
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// The whitelisted fields of this user, as shown in an edit form.
    pub fn to_draft(&self) -> UserDraft {
        UserDraft::new(self.name.clone(), self.email.clone())
    }
}

#[cfg(test)]
mod tests;
