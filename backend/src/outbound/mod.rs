//! Outbound adapters implementing domain ports for the record store.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM.
//! - **memory**: a process-local store honouring the same contract, used when
//!   no database is configured and as the store behind HTTP flow tests.
//!
//! Adapters are thin translators between domain types and storage
//! representations. They contain no business logic.

pub mod memory;
pub mod persistence;
