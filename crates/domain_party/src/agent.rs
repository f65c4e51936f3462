//! Agent records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::AgentId;

/// A sales agent for the scheme
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub name: String,
    /// Contact email, unique
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl Agent {
    pub fn new(
        id: AgentId,
        name: impl Into<String>,
        email: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            created_at: now,
        }
    }
}
