//! Domain primitives, search scopes, ports and services.
//!
//! Purpose: Define strongly typed entities used by the HTTP and persistence
//! layers, validate whitelisted input, and implement the use cases behind
//! the driving ports. Nothing here depends on actix or Diesel.
//!
//! Public surface:
//! - Error / ErrorCode: API error payload and stable identifier.
//! - User / Score with their drafts, validated records and identifiers.
//! - query: composable search scopes evaluated by every store adapter.
//! - ports: driven repositories and driving command/query use cases.
//! - UserService / ScoreService: implementations of the driving ports.

mod blank;
pub mod error;
mod field_errors;
pub mod ports;
pub mod query;
mod score;
mod score_service;
mod trace_id;
mod user;
mod user_service;
mod write_outcome;

pub use self::blank::{is_blank, is_blank_trimmed, present};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::field_errors::FieldErrors;
pub use self::score::{Score, ScoreDraft, ScoreId, ScoreRecord};
pub use self::score_service::{MISSING_OWNER_MESSAGE, ScoreService};
pub use self::trace_id::TraceId;
pub use self::user::{
    DEFAULT_EMAIL_MAX_LENGTH, EmailPolicy, TEXT_COLUMN_MAX, User, UserDraft, UserId, UserRecord,
};
pub use self::user_service::UserService;
pub use self::write_outcome::WriteOutcome;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use scorebook::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("no such user"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
