//! Database infrastructure layer
//!
//! PostgreSQL implementations of the domain store ports using SQLx. Each
//! adapter owns its table shape and error translation; domain crates see
//! only the `CoreError` taxonomy.
//!
//! Queries are built at runtime (`sqlx::query_as`) rather than with the
//! compile-time macros so the workspace builds without a live database.

pub mod error;
pub mod pool;
pub mod stores;

pub use error::map_db_error;
pub use pool::{create_pool, create_pool_from_url, DatabaseConfig, DatabasePool};
pub use stores::{PgClaimStore, PgPartyStore, PgPaymentStore, PgPolicyStore, PgUserStore};

/// Embedded migrations, applied by the server binary at startup
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
