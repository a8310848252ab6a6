//! Driving port for user reads.

use async_trait::async_trait;

use crate::domain::query::UserQuery;
use crate::domain::{Error, User, UserId};

/// Domain use-case port for listing and fetching users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Evaluate a composed search scope.
    async fn list(&self, query: UserQuery) -> Result<Vec<User>, Error>;

    /// Fetch a single user, failing with `not_found` when absent.
    async fn find(&self, id: UserId) -> Result<User, Error>;
}
