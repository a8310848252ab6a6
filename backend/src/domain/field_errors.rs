//! Per-field validation messages collected while constructing a record.

use std::collections::BTreeMap;

use serde::Serialize;

/// Validation messages keyed by input field name.
///
/// Serialises as `{"email": ["email must not be blank"]}`. Field order is
/// stable so rendered forms are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` against `field`.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_owned())
            .or_default()
            .push(message.into());
    }

    /// Build a collection holding a single message.
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// Return `true` when no messages were recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages recorded against `field`.
    pub fn messages(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    /// Names of the fields carrying at least one message.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// `Ok(())` when empty, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for messages in self.0.values() {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                f.write_str(message)?;
                first = false;
            }
        }
        Ok(())
    }
}
