//! Request and response DTOs

pub mod auth;
pub mod claims;
pub mod party;
pub mod policy;
