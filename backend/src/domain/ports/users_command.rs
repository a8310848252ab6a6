//! Driving port for user mutations.
//!
//! HTTP handlers call this port with whitelisted input; the domain service
//! validates it, stamps timestamps and writes through the user repository.

use async_trait::async_trait;

use crate::domain::{Error, User, UserDraft, UserId, WriteOutcome};

/// Outcome of creating or updating a user.
pub type UserWriteOutcome = WriteOutcome<User, UserDraft>;

/// Summary of a completed user deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserDeletion {
    pub id: UserId,
    /// Scores removed with the user.
    pub removed_scores: usize,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersCommand: Send + Sync {
    /// Validate and persist a new user.
    async fn create(&self, draft: UserDraft) -> Result<UserWriteOutcome, Error>;

    /// Validate and replace every field of an existing user.
    ///
    /// # Errors
    /// Fails with `not_found` when `id` does not exist.
    async fn update(&self, id: UserId, draft: UserDraft) -> Result<UserWriteOutcome, Error>;

    /// Delete a user together with its scores.
    ///
    /// # Errors
    /// Fails with `not_found` when `id` does not exist.
    async fn delete(&self, id: UserId) -> Result<UserDeletion, Error>;
}
