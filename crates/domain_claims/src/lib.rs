//! Claims domain
//!
//! A claim moves through a fixed lifecycle:
//!
//! ```text
//! Submitted -> UnderReview -> Approved -> Paid
//!                          -> Rejected
//! ```
//!
//! Rejected and Paid are terminal. Disbursement records that payout
//! occurred; the actual fund transfer happens outside this system.

pub mod claim;
pub mod ports;
pub mod workflow;

pub use claim::{Claim, ClaimStatus};
pub use ports::{ClaimStore, DocumentStore, NewClaim};
pub use workflow::ClaimsWorkflow;
