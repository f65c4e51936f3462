//! Party domain - the people in the scheme
//!
//! Members hold policies, dependants belong to members, agents sell cover.
//! These are attribute records: the interesting lifecycle logic lives in
//! the account, policy and claims domains. This crate owns field validation
//! and the storage ports; referential integrity (cascading a member's
//! dependants and policies on delete) is enforced by the store.

pub mod agent;
pub mod member;
pub mod ports;
pub mod validation;

pub use agent::Agent;
pub use member::{Dependant, Member};
pub use ports::{NewAgent, NewDependant, NewMember, PartyStore};
