//! The shared error taxonomy
//!
//! Every fallible operation in the system surfaces one of these variants.
//! Domain crates and storage adapters construct them; the HTTP layer owns
//! the mapping to status codes. Nothing in the core retries - transient
//! failures are reported as `Unavailable` and left to the caller.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Why access was denied, so the caller can route to the right payment prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessDeniedReason {
    TrialExpired,
    SubscriptionExpired,
}

impl AccessDeniedReason {
    /// The user-facing message rendered by clients
    pub fn user_message(&self) -> &'static str {
        match self {
            AccessDeniedReason::TrialExpired => "Trial expired. Pay R300 to continue.",
            AccessDeniedReason::SubscriptionExpired => {
                "Subscription expired. Pay R300 to continue."
            }
        }
    }
}

impl fmt::Display for AccessDeniedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessDeniedReason::TrialExpired => write!(f, "trial expired"),
            AccessDeniedReason::SubscriptionExpired => write!(f, "subscription expired"),
        }
    }
}

/// Core error type shared across all domains
#[derive(Debug, Error)]
pub enum CoreError {
    /// The referenced entity does not exist
    #[error("Not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    /// A unique constraint was violated (email, government ID number)
    #[error("Duplicate key: {field} already in use")]
    DuplicateKey { field: String },

    /// A required field is missing or malformed
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        message: String,
        field: Option<String>,
    },

    /// Trial or subscription has expired
    #[error("Access denied: {reason}")]
    AccessDenied { reason: AccessDeniedReason },

    /// A state machine rejected the requested transition
    #[error("Invalid transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    /// A storage or external collaborator failed
    #[error("Unavailable: {message}")]
    Unavailable {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The operation is recognised but deliberately unimplemented
    #[error("Not implemented: {operation}")]
    NotImplemented { operation: String },
}

impl CoreError {
    pub fn not_found(entity: impl Into<String>, id: impl fmt::Display) -> Self {
        CoreError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    pub fn duplicate_key(field: impl Into<String>) -> Self {
        CoreError::DuplicateKey { field: field.into() }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        CoreError::InvalidArgument {
            message: message.into(),
            field: None,
        }
    }

    pub fn invalid_argument_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        CoreError::InvalidArgument {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    pub fn access_denied(reason: AccessDeniedReason) -> Self {
        CoreError::AccessDenied { reason }
    }

    pub fn invalid_transition(from: impl fmt::Display, to: impl fmt::Display) -> Self {
        CoreError::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        CoreError::Unavailable {
            message: message.into(),
            source: None,
        }
    }

    pub fn unavailable_from(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        CoreError::Unavailable {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn not_implemented(operation: impl Into<String>) -> Self {
        CoreError::NotImplemented {
            operation: operation.into(),
        }
    }

    /// Returns true if this error indicates the entity was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, CoreError::NotFound { .. })
    }

    /// Returns true if this error came from a failing collaborator
    pub fn is_unavailable(&self) -> bool {
        matches!(self, CoreError::Unavailable { .. })
    }
}

/// Result alias used across the workspace
pub type CoreResult<T> = Result<T, CoreError>;
