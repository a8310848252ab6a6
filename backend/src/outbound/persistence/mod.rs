//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the user and score repository ports backed
//! by PostgreSQL via Diesel, with async support through `diesel-async` and
//! `bb8` connection pooling.
//!
//! - Repositories only translate between Diesel rows and domain types.
//! - Row structs (`models.rs`) and the schema (`schema.rs`) stay private.
//! - Search scopes become `LIKE ... ESCAPE '\'` predicates.
//!
//! # Example
//!
//! ```no_run
//! use scorebook::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! # async fn wire() -> Result<(), scorebook::outbound::persistence::PoolError> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/scorebook")).await?;
//! let repo = DieselUserRepository::new(pool);
//! # let _ = repo;
//! # Ok(())
//! # }
//! ```

mod diesel_error_mapping;
mod diesel_score_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_score_repository::DieselScoreRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
