//! Driving port for score reads.

use async_trait::async_trait;

use crate::domain::query::ScoreQuery;
use crate::domain::{Error, Score, ScoreId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScoresQuery: Send + Sync {
    async fn list(&self, query: ScoreQuery) -> Result<Vec<Score>, Error>;

    async fn find(&self, id: ScoreId) -> Result<Score, Error>;
}
