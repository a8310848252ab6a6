//! Score (sheet music entry) data model.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::blank::present;
use super::field_errors::FieldErrors;
use super::user::{UserId, check_column_width};

/// Stable, store-assigned score identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreId(i64);

impl ScoreId {
    /// Wrap a stored identifier.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw identifier value.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ScoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ScoreId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// Whitelisted, unvalidated score input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreDraft {
    pub name: Option<String>,
    pub composer: Option<String>,
    pub arranger: Option<String>,
    pub grade: Option<String>,
    pub user_id: Option<UserId>,
}

impl ScoreDraft {
    /// Validate the draft into a storable record.
    ///
    /// Owner existence is a store-level concern and is checked by the
    /// service, not here.
    ///
    /// # Errors
    /// Returns every violated rule keyed by field name.
    pub fn validate(self) -> Result<ScoreRecord, FieldErrors> {
        let mut errors = FieldErrors::new();
        for (field, value) in [
            ("name", &self.name),
            ("composer", &self.composer),
            ("arranger", &self.arranger),
            ("grade", &self.grade),
        ] {
            if let Some(value) = value.as_deref() {
                check_column_width(&mut errors, field, value);
            }
        }
        errors.into_result()?;

        Ok(ScoreRecord {
            name: present(self.name),
            composer: present(self.composer),
            arranger: present(self.arranger),
            grade: present(self.grade),
            user_id: self.user_id,
        })
    }
}

/// Validated score fields ready to be written to the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreRecord {
    name: Option<String>,
    composer: Option<String>,
    arranger: Option<String>,
    grade: Option<String>,
    user_id: Option<UserId>,
}

impl ScoreRecord {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn composer(&self) -> Option<&str> {
        self.composer.as_deref()
    }

    pub fn arranger(&self) -> Option<&str> {
        self.arranger.as_deref()
    }

    pub fn grade(&self) -> Option<&str> {
        self.grade.as_deref()
    }

    /// Owning user, if the score is attached to one.
    pub fn user_id(&self) -> Option<UserId> {
        self.user_id
    }
}

/// Persisted score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    id: ScoreId,
    name: Option<String>,
    composer: Option<String>,
    arranger: Option<String>,
    grade: Option<String>,
    user_id: Option<UserId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Score {
    /// Rehydrate a score from stored values.
    pub fn from_parts(
        id: ScoreId,
        record: ScoreRecord,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: record.name,
            composer: record.composer,
            arranger: record.arranger,
            grade: record.grade,
            user_id: record.user_id,
            created_at,
            updated_at,
        }
    }

    /// Rehydrate a score from raw row columns.
    #[expect(clippy::too_many_arguments, reason = "mirrors the scores table columns")]
    pub fn from_row(
        id: i64,
        user_id: Option<i64>,
        name: Option<String>,
        composer: Option<String>,
        arranger: Option<String>,
        grade: Option<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ScoreId::new(id),
            name,
            composer,
            arranger,
            grade,
            user_id: user_id.map(UserId::new),
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> ScoreId {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn composer(&self) -> Option<&str> {
        self.composer.as_deref()
    }

    pub fn arranger(&self) -> Option<&str> {
        self.arranger.as_deref()
    }

    pub fn grade(&self) -> Option<&str> {
        self.grade.as_deref()
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.user_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// The whitelisted fields of this score, as shown in an edit form.
    pub fn to_draft(&self) -> ScoreDraft {
        ScoreDraft {
            name: self.name.clone(),
            composer: self.composer.clone(),
            arranger: self.arranger.clone(),
            grade: self.grade.clone(),
            user_id: self.user_id,
        }
    }

    /// The stored fields of this score as a record.
    pub fn to_record(&self) -> ScoreRecord {
        ScoreRecord {
            name: self.name.clone(),
            composer: self.composer.clone(),
            arranger: self.arranger.clone(),
            grade: self.grade.clone(),
            user_id: self.user_id,
        }
    }
}
