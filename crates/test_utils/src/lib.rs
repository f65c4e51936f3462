//! Shared test infrastructure
//!
//! - `fixtures`: canonical amounts, instants and strings
//! - `builders`: builder patterns for entities with sensible defaults
//! - `database`: testcontainer-backed Postgres for integration tests
//! - `assertions`: error-variant assertion helpers
//! - `generators`: proptest strategies and fake-data helpers

pub mod assertions;
pub mod builders;
pub mod database;
pub mod fixtures;
pub mod generators;

pub use assertions::*;
pub use builders::*;
pub use database::*;
pub use fixtures::*;
pub use generators::*;
