//! Search scopes over scores.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{SortOrder, Sortable, contains, sort_rows};
use crate::domain::Score;
use crate::domain::blank::is_blank;

/// Optional per-field search tokens submitted by the scores index form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSearch {
    /// Substring of the title.
    pub name: Option<String>,
    /// Substring of the composer.
    pub composer: Option<String>,
    /// Substring of the arranger.
    pub arranger: Option<String>,
    /// Substring of the grade.
    pub grade: Option<String>,
}

impl ScoreSearch {
    /// Return `true` when every token is blank.
    pub fn is_blank(&self) -> bool {
        [&self.name, &self.composer, &self.arranger, &self.grade]
            .into_iter()
            .all(|token| is_blank(token.as_deref()))
    }
}

/// A single non-blank substring constraint on a score column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoreFilter {
    /// `name LIKE %token%`.
    NameLike(String),
    /// `composer LIKE %token%`.
    ComposerLike(String),
    /// `arranger LIKE %token%`.
    ArrangerLike(String),
    /// `grade LIKE %token%`.
    GradeLike(String),
}

impl ScoreFilter {
    fn matches(&self, score: &Score) -> bool {
        match self {
            Self::NameLike(token) => contains(score.name(), token),
            Self::ComposerLike(token) => contains(score.composer(), token),
            Self::ArrangerLike(token) => contains(score.arranger(), token),
            Self::GradeLike(token) => contains(score.grade(), token),
        }
    }
}

/// Immutable query over the scores collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreQuery {
    filters: Vec<ScoreFilter>,
    order: SortOrder,
}

impl ScoreQuery {
    /// Every score, in identifier order.
    pub fn all() -> Self {
        Self::default()
    }

    /// Narrow by every non-blank token in `criteria`.
    #[must_use]
    pub fn search(self, criteria: &ScoreSearch) -> Self {
        if criteria.is_blank() {
            return self;
        }
        self.name_like(criteria.name.as_deref())
            .composer_like(criteria.composer.as_deref())
            .arranger_like(criteria.arranger.as_deref())
            .grade_like(criteria.grade.as_deref())
    }

    /// Keep scores whose title contains `token`.
    #[must_use]
    pub fn name_like(self, token: Option<&str>) -> Self {
        self.with_filter(token, ScoreFilter::NameLike)
    }

    /// Keep scores whose composer contains `token`.
    #[must_use]
    pub fn composer_like(self, token: Option<&str>) -> Self {
        self.with_filter(token, ScoreFilter::ComposerLike)
    }

    /// Keep scores whose arranger contains `token`.
    #[must_use]
    pub fn arranger_like(self, token: Option<&str>) -> Self {
        self.with_filter(token, ScoreFilter::ArrangerLike)
    }

    /// Keep scores whose grade contains `token`.
    #[must_use]
    pub fn grade_like(self, token: Option<&str>) -> Self {
        self.with_filter(token, ScoreFilter::GradeLike)
    }

    /// Order by ascending name.
    #[must_use]
    pub fn name_sort(self) -> Self {
        self.order_by(SortOrder::Name)
    }

    /// Order by ascending creation time.
    #[must_use]
    pub fn create_sort(self) -> Self {
        self.order_by(SortOrder::Created)
    }

    /// Replace the ordering.
    #[must_use]
    pub fn order_by(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    /// Filters in the order they were applied.
    pub fn filters(&self) -> &[ScoreFilter] {
        &self.filters
    }

    /// Requested ordering.
    pub fn order(&self) -> SortOrder {
        self.order
    }

    /// Evaluate the filters against a single score.
    pub fn matches(&self, score: &Score) -> bool {
        self.filters.iter().all(|filter| filter.matches(score))
    }

    /// Filter and order an in-memory collection.
    pub fn apply(&self, scores: impl IntoIterator<Item = Score>) -> Vec<Score> {
        let mut rows: Vec<Score> = scores.into_iter().filter(|s| self.matches(s)).collect();
        sort_rows(&mut rows, self.order);
        rows
    }

    fn with_filter(mut self, token: Option<&str>, build: fn(String) -> ScoreFilter) -> Self {
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            self.filters.push(build(token.to_owned()));
        }
        self
    }
}

impl Sortable for Score {
    fn sort_id(&self) -> i64 {
        self.id().get()
    }

    fn sort_name(&self) -> Option<&str> {
        self.name()
    }

    fn sort_created_at(&self) -> DateTime<Utc> {
        self.created_at()
    }
}
