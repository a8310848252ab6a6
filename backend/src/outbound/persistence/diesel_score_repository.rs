//! PostgreSQL-backed `ScoreRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::{AsSelect, sql};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_types::{Nullable, Text};
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ScoreRepository, ScoreRepositoryError};
use crate::domain::query::{LIKE_ESCAPE, ScoreFilter, ScoreQuery, SortOrder, contains_pattern};
use crate::domain::{Score, ScoreId, ScoreRecord, UserId};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error, pool_error_message};
use super::models::{NewScoreRow, ScoreRow, ScoreUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::scores;

/// Diesel-backed implementation of the `ScoreRepository` port.
///
/// Owner existence is enforced by the `scores.user_id` foreign key.
#[derive(Clone)]
pub struct DieselScoreRepository {
    pool: DbPool,
}

impl DieselScoreRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

type ScoreSearchStatement =
    scores::BoxedQuery<'static, Pg, <AsSelect<ScoreRow, Pg> as Expression>::SqlType>;

/// Translate `query` into a boxed `SELECT` over `scores`.
fn search_statement(query: &ScoreQuery) -> ScoreSearchStatement {
    let mut statement = scores::table.select(ScoreRow::as_select()).into_boxed();
    for filter in query.filters() {
        statement = match filter {
            ScoreFilter::NameLike(token) => statement
                .filter(scores::name.like(contains_pattern(token)).escape(LIKE_ESCAPE)),
            ScoreFilter::ComposerLike(token) => statement
                .filter(scores::composer.like(contains_pattern(token)).escape(LIKE_ESCAPE)),
            ScoreFilter::ArrangerLike(token) => statement
                .filter(scores::arranger.like(contains_pattern(token)).escape(LIKE_ESCAPE)),
            ScoreFilter::GradeLike(token) => statement
                .filter(scores::grade.like(contains_pattern(token)).escape(LIKE_ESCAPE)),
        };
    }
    match query.order() {
        SortOrder::Id => statement.order(scores::id.asc()),
        SortOrder::Name => statement.order((
            sql::<Nullable<Text>>(r#""scores"."name" COLLATE "C""#).asc(),
            scores::id.asc(),
        )),
        SortOrder::Created => statement.order((scores::created_at.asc(), scores::id.asc())),
    }
}

fn map_pool_error(error: PoolError) -> ScoreRepositoryError {
    ScoreRepositoryError::connection(pool_error_message(error))
}

/// Map Diesel errors, attributing foreign key failures to `owner`.
fn map_diesel_error(error: diesel::result::Error, owner: Option<UserId>) -> ScoreRepositoryError {
    match classify_diesel_error(error) {
        DieselFailure::Connection(message) => ScoreRepositoryError::connection(message),
        DieselFailure::Query(message) => ScoreRepositoryError::query(message),
        DieselFailure::ForeignKey => match owner {
            Some(user_id) => ScoreRepositoryError::missing_owner(user_id.get()),
            None => ScoreRepositoryError::query("foreign key violation"),
        },
    }
}

fn read_error(error: diesel::result::Error) -> ScoreRepositoryError {
    map_diesel_error(error, None)
}

#[async_trait]
impl ScoreRepository for DieselScoreRepository {
    async fn insert(
        &self,
        record: &ScoreRecord,
        now: DateTime<Utc>,
    ) -> Result<Score, ScoreRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewScoreRow {
            user_id: record.user_id().map(UserId::get),
            name: record.name(),
            composer: record.composer(),
            arranger: record.arranger(),
            grade: record.grade(),
            created_at: now,
            updated_at: now,
        };

        diesel::insert_into(scores::table)
            .values(&new_row)
            .returning(ScoreRow::as_returning())
            .get_result(&mut conn)
            .await
            .map(Score::from)
            .map_err(|err| map_diesel_error(err, record.user_id()))
    }

    async fn find_by_id(&self, id: ScoreId) -> Result<Option<Score>, ScoreRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<ScoreRow> = scores::table
            .find(id.get())
            .select(ScoreRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(read_error)?;

        Ok(row.map(Score::from))
    }

    async fn update(
        &self,
        id: ScoreId,
        record: &ScoreRecord,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Score>, ScoreRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = ScoreUpdate {
            user_id: record.user_id().map(UserId::get),
            name: record.name(),
            composer: record.composer(),
            arranger: record.arranger(),
            grade: record.grade(),
            updated_at,
        };

        let row: Option<ScoreRow> = diesel::update(scores::table.find(id.get()))
            .set(&changes)
            .returning(ScoreRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, record.user_id()))?;

        Ok(row.map(Score::from))
    }

    async fn delete(&self, id: ScoreId) -> Result<bool, ScoreRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(scores::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(read_error)?;
        Ok(deleted > 0)
    }

    async fn search(&self, query: &ScoreQuery) -> Result<Vec<Score>, ScoreRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ScoreRow> = search_statement(query)
            .load(&mut conn)
            .await
            .map_err(read_error)?;
        Ok(rows.into_iter().map(Score::from).collect())
    }
}
