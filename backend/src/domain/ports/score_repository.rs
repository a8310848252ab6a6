//! Port abstraction for score persistence adapters and their errors.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::query::ScoreQuery;
use crate::domain::{Score, ScoreId, ScoreRecord};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by score repository adapters.
    pub enum ScoreRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "score repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "score repository query failed: {message}",
        /// The referenced owning user does not exist.
        MissingOwner { user_id: i64 } => "score owner {user_id} does not exist",
    }
}

/// Driven port over the `scores` table.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScoreRepository: Send + Sync {
    /// Persist a new score stamped with `now` for both timestamps.
    ///
    /// Fails with [`ScoreRepositoryError::MissingOwner`] when the record
    /// references a user that does not exist.
    async fn insert(
        &self,
        record: &ScoreRecord,
        now: DateTime<Utc>,
    ) -> Result<Score, ScoreRepositoryError>;

    async fn find_by_id(&self, id: ScoreId) -> Result<Option<Score>, ScoreRepositoryError>;

    /// Replace every stored field of `id`, leaving `created_at` untouched.
    async fn update(
        &self,
        id: ScoreId,
        record: &ScoreRecord,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Score>, ScoreRepositoryError>;

    /// Delete a score, returning `false` when it does not exist.
    async fn delete(&self, id: ScoreId) -> Result<bool, ScoreRepositoryError>;

    async fn search(&self, query: &ScoreQuery) -> Result<Vec<Score>, ScoreRepositoryError>;
}
