//! Core Kernel - Foundational types and utilities for the funeral cover system
//!
//! This crate provides the fundamental building blocks used across all domain modules:
//! - Money with precise decimal arithmetic (single currency, Rand)
//! - Clock abstraction and billing-period arithmetic
//! - Strongly-typed identifiers
//! - The shared error taxonomy

pub mod money;
pub mod temporal;
pub mod identifiers;
pub mod error;

pub use money::{Money, MoneyError};
pub use temporal::{
    billing_period, elapsed_billing_periods, Clock, FixedClock, SystemClock, BILLING_PERIOD_DAYS,
};
pub use identifiers::{
    UserId, MemberId, DependantId, PolicyId, PaymentId, ClaimId, AgentId,
};
pub use error::{AccessDeniedReason, CoreError, CoreResult};
