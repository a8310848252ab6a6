//! Search scopes over users.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{SortOrder, Sortable, contains, sort_rows};
use crate::domain::User;
use crate::domain::blank::is_blank;

/// Optional per-field search tokens submitted by the index form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSearch {
    /// Substring of the user name.
    pub name: Option<String>,
    /// Substring of the email address.
    pub email: Option<String>,
}

impl UserSearch {
    /// Return `true` when every token is blank.
    pub fn is_blank(&self) -> bool {
        is_blank(self.name.as_deref()) && is_blank(self.email.as_deref())
    }
}

/// A single non-blank substring constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserFilter {
    /// `name LIKE %token%`.
    NameLike(String),
    /// `email LIKE %token%`.
    EmailLike(String),
}

impl UserFilter {
    fn matches(&self, user: &User) -> bool {
        match self {
            Self::NameLike(token) => contains(user.name(), token),
            Self::EmailLike(token) => contains(user.email(), token),
        }
    }
}

/// Immutable query over the users collection.
///
/// # Examples
/// ```
/// use scorebook::domain::query::{UserQuery, UserSearch};
///
/// let unfiltered = UserQuery::all().search(&UserSearch::default());
/// assert!(unfiltered.filters().is_empty());
///
/// let narrowed = UserQuery::all().name_like(Some("Jo")).email_like(Some(""));
/// assert_eq!(narrowed.filters().len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserQuery {
    filters: Vec<UserFilter>,
    order: SortOrder,
}

impl UserQuery {
    /// Every user, in identifier order.
    pub fn all() -> Self {
        Self::default()
    }

    /// Narrow by every non-blank token in `criteria`.
    ///
    /// All-blank criteria return the query unchanged.
    #[must_use]
    pub fn search(self, criteria: &UserSearch) -> Self {
        if criteria.is_blank() {
            return self;
        }
        self.name_like(criteria.name.as_deref())
            .email_like(criteria.email.as_deref())
    }

    /// Keep users whose name contains `token`.
    #[must_use]
    pub fn name_like(self, token: Option<&str>) -> Self {
        self.with_filter(token, UserFilter::NameLike)
    }

    /// Keep users whose email contains `token`.
    #[must_use]
    pub fn email_like(self, token: Option<&str>) -> Self {
        self.with_filter(token, UserFilter::EmailLike)
    }

    /// Order by ascending name.
    #[must_use]
    pub fn sorted(self) -> Self {
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
    pub fn filters(&self) -> &[UserFilter] {
        &self.filters
    }

    /// Requested ordering.
    pub fn order(&self) -> SortOrder {
        self.order
    }

    /// Evaluate the filters against a single user.
    pub fn matches(&self, user: &User) -> bool {
        self.filters.iter().all(|filter| filter.matches(user))
    }

    /// Filter and order an in-memory collection.
    pub fn apply(&self, users: impl IntoIterator<Item = User>) -> Vec<User> {
        let mut rows: Vec<User> = users.into_iter().filter(|u| self.matches(u)).collect();
        sort_rows(&mut rows, self.order);
        rows
    }

    fn with_filter(mut self, token: Option<&str>, build: fn(String) -> UserFilter) -> Self {
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            self.filters.push(build(token.to_owned()));
        }
        self
    }
}

impl Sortable for User {
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
