//! In-memory implementation of the user and score repositories.
//!
//! Every operation runs under one mutex guard, so each is atomic with
//! respect to the others. Identifier counters only move forward; a deleted
//! identifier is never handed out again.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    ScoreRepository, ScoreRepositoryError, UserRepository, UserRepositoryError,
};
use crate::domain::query::{ScoreQuery, UserQuery};
use crate::domain::{Score, ScoreId, ScoreRecord, User, UserId, UserRecord};

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<UserId, User>,
    scores: BTreeMap<ScoreId, Score>,
    last_user_id: i64,
    last_score_id: i64,
}

impl Tables {
    fn next_user_id(&mut self) -> UserId {
        self.last_user_id += 1;
        UserId::new(self.last_user_id)
    }

    fn next_score_id(&mut self) -> ScoreId {
        self.last_score_id += 1;
        ScoreId::new(self.last_score_id)
    }

    fn owner_exists(&self, record: &ScoreRecord) -> Result<(), ScoreRepositoryError> {
        match record.user_id() {
            Some(owner) if !self.users.contains_key(&owner) => {
                Err(ScoreRepositoryError::missing_owner(owner.get()))
            }
            _ => Ok(()),
        }
    }
}

/// Process-local record store shared by both repository ports.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, String> {
        self.tables
            .lock()
            .map_err(|_| "in-memory store lock poisoned".to_owned())
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert(
        &self,
        record: &UserRecord,
        now: DateTime<Utc>,
    ) -> Result<User, UserRepositoryError> {
        let mut tables = self.lock().map_err(UserRepositoryError::query)?;
        let id = tables.next_user_id();
        let user = User::from_parts(id, record.clone(), now, now);
        tables.users.insert(id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserRepositoryError> {
        let tables = self.lock().map_err(UserRepositoryError::query)?;
        Ok(tables.users.get(&id).cloned())
    }

    async fn update(
        &self,
        id: UserId,
        record: &UserRecord,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<User>, UserRepositoryError> {
        let mut tables = self.lock().map_err(UserRepositoryError::query)?;
        let Some(slot) = tables.users.get_mut(&id) else {
            return Ok(None);
        };
        *slot = User::from_parts(id, record.clone(), slot.created_at(), updated_at);
        Ok(Some(slot.clone()))
    }

    async fn delete(&self, id: UserId) -> Result<Option<usize>, UserRepositoryError> {
        let mut tables = self.lock().map_err(UserRepositoryError::query)?;
        if tables.users.remove(&id).is_none() {
            return Ok(None);
        }
        let before = tables.scores.len();
        tables.scores.retain(|_, score| score.user_id() != Some(id));
        Ok(Some(before - tables.scores.len()))
    }

    async fn search(&self, query: &UserQuery) -> Result<Vec<User>, UserRepositoryError> {
        let tables = self.lock().map_err(UserRepositoryError::query)?;
        Ok(query.apply(tables.users.values().cloned()))
    }
}

#[async_trait]
impl ScoreRepository for MemoryStore {
    async fn insert(
        &self,
        record: &ScoreRecord,
        now: DateTime<Utc>,
    ) -> Result<Score, ScoreRepositoryError> {
        let mut tables = self.lock().map_err(ScoreRepositoryError::query)?;
        tables.owner_exists(record)?;
        let id = tables.next_score_id();
        let score = Score::from_parts(id, record.clone(), now, now);
        tables.scores.insert(id, score.clone());
        Ok(score)
    }

    async fn find_by_id(&self, id: ScoreId) -> Result<Option<Score>, ScoreRepositoryError> {
        let tables = self.lock().map_err(ScoreRepositoryError::query)?;
        Ok(tables.scores.get(&id).cloned())
    }

    async fn update(
        &self,
        id: ScoreId,
        record: &ScoreRecord,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Score>, ScoreRepositoryError> {
        let mut tables = self.lock().map_err(ScoreRepositoryError::query)?;
        let Some(created_at) = tables.scores.get(&id).map(Score::created_at) else {
            return Ok(None);
        };
        tables.owner_exists(record)?;
        let score = Score::from_parts(id, record.clone(), created_at, updated_at);
        tables.scores.insert(id, score.clone());
        Ok(Some(score))
    }

    async fn delete(&self, id: ScoreId) -> Result<bool, ScoreRepositoryError> {
        let mut tables = self.lock().map_err(ScoreRepositoryError::query)?;
        Ok(tables.scores.remove(&id).is_some())
    }

    async fn search(&self, query: &ScoreQuery) -> Result<Vec<Score>, ScoreRepositoryError> {
        let tables = self.lock().map_err(ScoreRepositoryError::query)?;
        Ok(query.apply(tables.scores.values().cloned()))
    }
}
