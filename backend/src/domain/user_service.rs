//! User domain service.
//!
//! Implements the user driving ports: validates whitelisted drafts, stamps
//! timestamps from the injected clock, and delegates to the repository.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::ports::{
    UserDeletion, UserRepository, UserRepositoryError, UserWriteOutcome, UsersCommand, UsersQuery,
};
use crate::domain::query::UserQuery;
use crate::domain::{EmailPolicy, Error, User, UserDraft, UserId, WriteOutcome};

fn map_repository_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
    }
}

fn user_not_found(id: UserId) -> Error {
    Error::not_found(format!("user {id} not found"))
}

/// User service implementing [`UsersCommand`] and [`UsersQuery`].
#[derive(Clone)]
pub struct UserService<R> {
    user_repo: Arc<R>,
    clock: Arc<dyn Clock>,
    email_policy: EmailPolicy,
}

impl<R> UserService<R> {
    /// Create a service over `user_repo` using the default email policy.
    pub fn new(user_repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            user_repo,
            clock,
            email_policy: EmailPolicy::default(),
        }
    }

    /// Replace the email policy applied on create and update.
    #[must_use]
    pub fn with_email_policy(mut self, email_policy: EmailPolicy) -> Self {
        self.email_policy = email_policy;
        self
    }
}

impl<R> UserService<R>
where
    R: UserRepository,
{
    async fn existing(&self, id: UserId) -> Result<User, Error> {
        self.user_repo
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| user_not_found(id))
    }
}

#[async_trait]
impl<R> UsersCommand for UserService<R>
where
    R: UserRepository,
{
    async fn create(&self, draft: UserDraft) -> Result<UserWriteOutcome, Error> {
        let record = match draft.clone().validate(&self.email_policy) {
            Ok(record) => record,
            Err(errors) => return Ok(WriteOutcome::Invalid { draft, errors }),
        };

        let user = self
            .user_repo
            .insert(&record, self.clock.utc())
            .await
            .map_err(map_repository_error)?;
        Ok(WriteOutcome::Saved(user))
    }

    async fn update(&self, id: UserId, draft: UserDraft) -> Result<UserWriteOutcome, Error> {
        let current = self.existing(id).await?;
        let record = match draft.clone().validate(&self.email_policy) {
            Ok(record) => record,
            Err(errors) => return Ok(WriteOutcome::Invalid { draft, errors }),
        };

        let updated_at = self.clock.utc().max(current.updated_at());
        self.user_repo
            .update(id, &record, updated_at)
            .await
            .map_err(map_repository_error)?
            .map(WriteOutcome::Saved)
            .ok_or_else(|| user_not_found(id))
    }

    async fn delete(&self, id: UserId) -> Result<UserDeletion, Error> {
        let removed_scores = self
            .user_repo
            .delete(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| user_not_found(id))?;
        Ok(UserDeletion { id, removed_scores })
    }
}

#[async_trait]
impl<R> UsersQuery for UserService<R>
where
    R: UserRepository,
{
    async fn list(&self, query: UserQuery) -> Result<Vec<User>, Error> {
        self.user_repo
            .search(&query)
            .await
            .map_err(map_repository_error)
    }

    async fn find(&self, id: UserId) -> Result<User, Error> {
        self.existing(id).await
    }
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;
