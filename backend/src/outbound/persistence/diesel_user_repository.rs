//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::{AsSelect, sql};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_types::{Nullable, Text};
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::query::{LIKE_ESCAPE, SortOrder, UserFilter, UserQuery, contains_pattern};
use crate::domain::{User, UserId, UserRecord};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error, pool_error_message};
use super::models::{NewUserRow, UserRow, UserUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::{scores, users};

/// Diesel-backed implementation of the `UserRepository` port.
///
/// Cascading deletes rely on the `ON DELETE CASCADE` foreign key; the score
/// count is read in the same transaction as the delete.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

type UserSearchStatement =
    users::BoxedQuery<'static, Pg, <AsSelect<UserRow, Pg> as Expression>::SqlType>;

/// Translate `query` into a boxed `SELECT` over `users`.
///
/// Names are compared with `COLLATE "C"` so ordering matches the byte-wise
/// comparison of the in-memory store.
fn search_statement(query: &UserQuery) -> UserSearchStatement {
    let mut statement = users::table.select(UserRow::as_select()).into_boxed();
    for filter in query.filters() {
        statement = match filter {
            UserFilter::NameLike(token) => {
                statement.filter(users::name.like(contains_pattern(token)).escape(LIKE_ESCAPE))
            }
            UserFilter::EmailLike(token) => {
                statement.filter(users::email.like(contains_pattern(token)).escape(LIKE_ESCAPE))
            }
        };
    }
    // PostgreSQL sorts NULL after every value in ascending order.
    match query.order() {
        SortOrder::Id => statement.order(users::id.asc()),
        SortOrder::Name => statement.order((
            sql::<Nullable<Text>>(r#""users"."name" COLLATE "C""#).asc(),
            users::id.asc(),
        )),
        SortOrder::Created => statement.order((users::created_at.asc(), users::id.asc())),
    }
}

fn map_pool_error(error: PoolError) -> UserRepositoryError {
    UserRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> UserRepositoryError {
    match classify_diesel_error(error) {
        DieselFailure::Connection(message) => UserRepositoryError::connection(message),
        DieselFailure::Query(message) => UserRepositoryError::query(message),
        DieselFailure::ForeignKey => UserRepositoryError::query("foreign key violation"),
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(
        &self,
        record: &UserRecord,
        now: DateTime<Utc>,
    ) -> Result<User, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewUserRow {
            name: record.name(),
            email: record.email(),
            created_at: now,
            updated_at: now,
        };

        diesel::insert_into(users::table)
            .values(&new_row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map(User::from)
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .find(id.get())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(User::from))
    }

    async fn update(
        &self,
        id: UserId,
        record: &UserRecord,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = UserUpdate {
            name: record.name(),
            email: record.email(),
            updated_at,
        };

        let row: Option<UserRow> = diesel::update(users::table.find(id.get()))
            .set(&changes)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(User::from))
    }

    async fn delete(&self, id: UserId) -> Result<Option<usize>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let (deleted, removed_scores) = conn
            .transaction(|conn| {
                async move {
                    let removed_scores: i64 = scores::table
                        .filter(scores::user_id.eq(id.get()))
                        .count()
                        .get_result(conn)
                        .await?;
                    let deleted = diesel::delete(users::table.find(id.get()))
                        .execute(conn)
                        .await?;
                    Ok((deleted, removed_scores))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        if deleted == 0 {
            return Ok(None);
        }
        let removed_scores = usize::try_from(removed_scores)
            .map_err(|_| UserRepositoryError::query("negative score count"))?;
        Ok(Some(removed_scores))
    }

    async fn search(&self, query: &UserQuery) -> Result<Vec<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<UserRow> = search_statement(query)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(User::from).collect())
    }
}
