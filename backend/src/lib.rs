//! Scorebook backend: users and their scores behind a hexagonal core.
//!
//! - [`domain`]: entities, search scopes, ports and services.
//! - [`inbound`]: actix-web handlers.
//! - [`outbound`]: Diesel/PostgreSQL and in-memory record stores.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(test)]
pub(crate) mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
