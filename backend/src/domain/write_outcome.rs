//! Result of a create or update use case.

use super::field_errors::FieldErrors;

/// Outcome of a write that may be rejected by validation.
///
/// Validation failures are expected and recovered by re-rendering the form,
/// so they travel here rather than as an [`Error`](super::Error).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome<T, D> {
    /// The record was persisted.
    Saved(T),
    /// Nothing was persisted; `draft` is echoed back with its messages.
    Invalid { draft: D, errors: FieldErrors },
}

impl<T, D> WriteOutcome<T, D> {
    /// Return the saved value, if any.
    pub fn saved(self) -> Option<T> {
        match self {
            Self::Saved(value) => Some(value),
            Self::Invalid { .. } => None,
        }
    }

    /// Return the validation messages, if the write was rejected.
    pub fn errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Saved(_) => None,
            Self::Invalid { errors, .. } => Some(errors),
        }
    }
}
