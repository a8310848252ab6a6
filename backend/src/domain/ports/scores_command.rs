//! Driving port for score mutations.

use async_trait::async_trait;

use crate::domain::{Error, Score, ScoreDraft, ScoreId, WriteOutcome};

/// Outcome of creating or updating a score.
pub type ScoreWriteOutcome = WriteOutcome<Score, ScoreDraft>;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScoresCommand: Send + Sync {
    /// Validate and persist a new score.
    ///
    /// A reference to a user that does not exist is reported as a field
    /// error on `userId`.
    async fn create(&self, draft: ScoreDraft) -> Result<ScoreWriteOutcome, Error>;

    /// Validate and replace every field of an existing score.
    async fn update(&self, id: ScoreId, draft: ScoreDraft) -> Result<ScoreWriteOutcome, Error>;

    /// Delete a score, failing with `not_found` when absent.
    async fn delete(&self, id: ScoreId) -> Result<(), Error>;
}
