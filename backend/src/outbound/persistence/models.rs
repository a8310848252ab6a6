//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::{Score, User};

use super::schema::{scores, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
    pub name: Option<String>,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User::from_row(row.id, row.name, row.email, row.created_at, row.updated_at)
    }
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full-record changeset; `None` writes NULL rather than skipping the column.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct UserUpdate<'a> {
    pub name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}

/// Row struct for reading from the scores table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = scores)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ScoreRow {
    pub id: i64,
    pub user_id: Option<i64>,
    pub name: Option<String>,
    pub composer: Option<String>,
    pub arranger: Option<String>,
    pub grade: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ScoreRow> for Score {
    fn from(row: ScoreRow) -> Self {
        Score::from_row(
            row.id,
            row.user_id,
            row.name,
            row.composer,
            row.arranger,
            row.grade,
            row.created_at,
            row.updated_at,
        )
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = scores)]
pub(crate) struct NewScoreRow<'a> {
    pub user_id: Option<i64>,
    pub name: Option<&'a str>,
    pub composer: Option<&'a str>,
    pub arranger: Option<&'a str>,
    pub grade: Option<&'a str>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = scores)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct ScoreUpdate<'a> {
    pub user_id: Option<i64>,
    pub name: Option<&'a str>,
    pub composer: Option<&'a str>,
    pub arranger: Option<&'a str>,
    pub grade: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}
