//! Shared request parsing helpers for inbound HTTP adapters.
//!
//! Failures here are malformed requests (400), unlike record validation
//! which re-renders the form (422).

use std::collections::HashMap;
use std::str::FromStr;

use serde_json::json;

use crate::domain::Error;
use crate::domain::query::SortOrder;

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingParameter,
    InvalidId,
    InvalidSort,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingParameter => "missing_parameter",
            ErrorCode::InvalidId => "invalid_id",
            ErrorCode::InvalidSort => "invalid_sort",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &'static str {
        self.0
    }
}

fn invalid(field: FieldName, code: ErrorCode, message: String, value: Option<&str>) -> Error {
    let details = match value {
        Some(value) => json!({ "field": field.as_str(), "value": value, "code": code.as_str() }),
        None => json!({ "field": field.as_str(), "code": code.as_str() }),
    };
    Error::invalid_request(message).with_details(details)
}

/// Reject a request whose required wrapping parameter is absent.
pub(crate) fn require_param<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| {
        invalid(
            field,
            ErrorCode::MissingParameter,
            format!("param is missing or the value is empty: {}", field.as_str()),
            None,
        )
    })
}

/// Parse a numeric path identifier.
pub(crate) fn parse_id<T: FromStr>(raw: &str, field: FieldName) -> Result<T, Error> {
    raw.parse().map_err(|_| {
        invalid(
            field,
            ErrorCode::InvalidId,
            format!("{} must be an integer", field.as_str()),
            Some(raw),
        )
    })
}

/// Read a search token from `search[field]`, falling back to a bare `field`.
pub(crate) fn search_token(params: &HashMap<String, String>, field: &str) -> Option<String> {
    params
        .get(&format!("search[{field}]"))
        .or_else(|| params.get(field))
        .cloned()
}

/// Parse the optional `sort` query parameter.
pub(crate) fn parse_sort(params: &HashMap<String, String>) -> Result<SortOrder, Error> {
    let Some(raw) = params.get("sort") else {
        return Ok(SortOrder::default());
    };
    raw.parse().map_err(|_| {
        invalid(
            FieldName::new("sort"),
            ErrorCode::InvalidSort,
            "sort must be one of: name, created".to_owned(),
            Some(raw),
        )
    })
}
