//! PostgreSQL store adapters
//!
//! One adapter per domain port. Each owns its row types and the
//! row-to-domain conversion; nothing outside this module sees SQLx types.

mod claims;
mod party;
mod policies;
mod users;

pub use claims::PgClaimStore;
pub use party::PgPartyStore;
pub use policies::{PgPaymentStore, PgPolicyStore};
pub use users::PgUserStore;
