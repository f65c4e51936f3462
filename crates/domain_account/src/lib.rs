//! Account domain - who may act on the system, and until when
//!
//! A user's ability to act is a pure function of three stored facts:
//! `subscription_expiry`, `has_paid` and the current instant. Registration
//! grants a 30-day trial; a subscription payment resets the window to
//! 30 days from the payment instant. This crate owns that state machine
//! and nothing else - credentials are hashed and verified by an external
//! collaborator behind the `CredentialVerifier` port.

pub mod access;
pub mod ports;
pub mod service;
pub mod user;

pub use access::{evaluate_access, AccessState};
pub use ports::{CredentialVerifier, NewUser, UserStore, UserUpdate};
pub use service::AccountService;
pub use user::User;
