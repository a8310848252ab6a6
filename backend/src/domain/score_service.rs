//! Score domain service.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::ports::{
    ScoreRepository, ScoreRepositoryError, ScoreWriteOutcome, ScoresCommand, ScoresQuery,
};
use crate::domain::query::ScoreQuery;
use crate::domain::{Error, FieldErrors, Score, ScoreDraft, ScoreId, WriteOutcome};

/// Message attached to `userId` when the referenced owner does not exist.
pub const MISSING_OWNER_MESSAGE: &str = "user must exist";

fn map_repository_error(error: ScoreRepositoryError) -> Error {
    match error {
        ScoreRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("score repository unavailable: {message}"))
        }
        ScoreRepositoryError::Query { message } => {
            Error::internal(format!("score repository error: {message}"))
        }
        ScoreRepositoryError::MissingOwner { user_id } => {
            Error::internal(format!("unexpected missing owner {user_id}"))
        }
    }
}

fn score_not_found(id: ScoreId) -> Error {
    Error::not_found(format!("score {id} not found"))
}

/// Turn a write failure into either a form error or a hard failure.
fn recover_write(
    draft: ScoreDraft,
    error: ScoreRepositoryError,
) -> Result<ScoreWriteOutcome, Error> {
    match error {
        ScoreRepositoryError::MissingOwner { .. } => Ok(WriteOutcome::Invalid {
            draft,
            errors: FieldErrors::single("userId", MISSING_OWNER_MESSAGE),
        }),
        other => Err(map_repository_error(other)),
    }
}

/// Score service implementing [`ScoresCommand`] and [`ScoresQuery`].
#[derive(Clone)]
pub struct ScoreService<R> {
    score_repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> ScoreService<R> {
    pub fn new(score_repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { score_repo, clock }
    }
}

impl<R> ScoreService<R>
where
    R: ScoreRepository,
{
    async fn existing(&self, id: ScoreId) -> Result<Score, Error> {
        self.score_repo
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| score_not_found(id))
    }
}

#[async_trait]
impl<R> ScoresCommand for ScoreService<R>
where
    R: ScoreRepository,
{
    async fn create(&self, draft: ScoreDraft) -> Result<ScoreWriteOutcome, Error> {
        let record = match draft.clone().validate() {
            Ok(record) => record,
            Err(errors) => return Ok(WriteOutcome::Invalid { draft, errors }),
        };

        match self.score_repo.insert(&record, self.clock.utc()).await {
            Ok(score) => Ok(WriteOutcome::Saved(score)),
            Err(error) => recover_write(draft, error),
        }
    }

    async fn update(&self, id: ScoreId, draft: ScoreDraft) -> Result<ScoreWriteOutcome, Error> {
        let current = self.existing(id).await?;
        let record = match draft.clone().validate() {
            Ok(record) => record,
            Err(errors) => return Ok(WriteOutcome::Invalid { draft, errors }),
        };

        let updated_at = self.clock.utc().max(current.updated_at());
        match self.score_repo.update(id, &record, updated_at).await {
            Ok(Some(score)) => Ok(WriteOutcome::Saved(score)),
            Ok(None) => Err(score_not_found(id)),
            Err(error) => recover_write(draft, error),
        }
    }

    async fn delete(&self, id: ScoreId) -> Result<(), Error> {
        let deleted = self
            .score_repo
            .delete(id)
            .await
            .map_err(map_repository_error)?;
        if deleted { Ok(()) } else { Err(score_not_found(id)) }
    }
}

#[async_trait]
impl<R> ScoresQuery for ScoreService<R>
where
    R: ScoreRepository,
{
    async fn list(&self, query: ScoreQuery) -> Result<Vec<Score>, Error> {
        self.score_repo
            .search(&query)
            .await
            .map_err(map_repository_error)
    }

    async fn find(&self, id: ScoreId) -> Result<Score, Error> {
        self.existing(id).await
    }
}

#[cfg(test)]
#[path = "score_service_tests.rs"]
mod tests;
