//! Port abstraction for user persistence adapters and their errors.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::query::UserQuery;
use crate::domain::{User, UserId, UserRecord};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
    }
}

/// Driven port over the `users` table.
///
/// Identifiers are assigned by the adapter on insert and never reused.
/// Deleting a user removes the scores it owns in the same atomic step.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new user stamped with `now` for both timestamps.
    async fn insert(
        &self,
        record: &UserRecord,
        now: DateTime<Utc>,
    ) -> Result<User, UserRepositoryError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Replace every stored field of `id`, leaving `created_at` untouched.
    ///
    /// Returns `None` when the user no longer exists.
    async fn update(
        &self,
        id: UserId,
        record: &UserRecord,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<User>, UserRepositoryError>;

    /// Delete a user and the scores it owns.
    ///
    /// Returns the number of scores removed alongside the user, or `None`
    /// when the user does not exist.
    async fn delete(&self, id: UserId) -> Result<Option<usize>, UserRepositoryError>;

    /// Evaluate a search scope.
    async fn search(&self, query: &UserQuery) -> Result<Vec<User>, UserRepositoryError>;
}
