//! Composable, immutable search scopes over users and scores.
//!
//! A query value records the filters and ordering a caller asked for. It
//! never touches the store itself: the Diesel adapter translates it into
//! `LIKE ... ESCAPE '\'` predicates, and the in-memory store evaluates it
//! with [`UserQuery::matches`] / [`ScoreQuery::matches`].
//!
//! Blank tokens (absent or empty) impose no constraint, so a form submitted
//! with every search box empty lists everything.

mod scores;
mod users;

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use scores::{ScoreFilter, ScoreQuery, ScoreSearch};
pub use users::{UserFilter, UserQuery, UserSearch};

/// Character used to escape `LIKE` wildcards.
pub const LIKE_ESCAPE: char = '\\';

/// Ordering applied to a query result.
///
/// Every ordering breaks ties by ascending identifier, and [`SortOrder::Id`]
/// is the store default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending identifier, i.e. insertion order.
    #[default]
    Id,
    /// Ascending name by byte value (`COLLATE "C"` in PostgreSQL); rows
    /// without a name come last.
    Name,
    /// Ascending creation timestamp.
    Created,
}

/// Error returned when a sort key is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort order: {0}")]
pub struct UnknownSortOrder(pub String);

impl FromStr for SortOrder {
    type Err = UnknownSortOrder;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "id" => Ok(Self::Id),
            "name" => Ok(Self::Name),
            "created" => Ok(Self::Created),
            other => Err(UnknownSortOrder(other.to_owned())),
        }
    }
}

/// Build a `LIKE` pattern matching `token` as a literal substring.
///
/// # Examples
/// ```
/// use scorebook::domain::query::contains_pattern;
///
/// assert_eq!(contains_pattern("Jo"), "%Jo%");
/// assert_eq!(contains_pattern("50%_off"), "%50\\%\\_off%");
/// ```
pub fn contains_pattern(token: &str) -> String {
    let mut pattern = String::with_capacity(token.len() + 2);
    pattern.push('%');
    for ch in token.chars() {
        if matches!(ch, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// In-process equivalent of `field LIKE contains_pattern(token)`.
///
/// NULL fields never match.
pub(crate) fn contains(field: Option<&str>, token: &str) -> bool {
    field.is_some_and(|value| value.contains(token))
}

/// Accessors the in-memory evaluator needs to order rows.
pub(crate) trait Sortable {
    fn sort_id(&self) -> i64;
    fn sort_name(&self) -> Option<&str>;
    fn sort_created_at(&self) -> DateTime<Utc>;
}

/// Order `rows` the way the Diesel adapter's `ORDER BY` does.
pub(crate) fn sort_rows<T: Sortable>(rows: &mut [T], order: SortOrder) {
    match order {
        SortOrder::Id => rows.sort_by_key(|row| row.sort_id()),
        SortOrder::Name => rows.sort_by(|a, b| {
            // `None` sorts after `Some` to mirror PostgreSQL's NULLS LAST.
            let by_name = match (a.sort_name(), b.sort_name()) {
                (Some(left), Some(right)) => left.cmp(right),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            };
            by_name.then_with(|| a.sort_id().cmp(&b.sort_id()))
        }),
        SortOrder::Created => rows.sort_by(|a, b| {
            a.sort_created_at()
                .cmp(&b.sort_created_at())
                .then_with(|| a.sort_id().cmp(&b.sort_id()))
        }),
    }
}
