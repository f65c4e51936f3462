//! User aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::UserId;

/// A system user
///
/// The credential itself lives with the auth collaborator; the user record
/// only carries an opaque reference to it. `subscription_expiry` covers both
/// the free trial and paid access - `has_paid` distinguishes the two.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: UserId,
    /// Display name
    pub name: String,
    /// Login email, unique
    pub email: String,
    /// Opaque reference to the stored credential hash
    #[serde(skip_serializing)]
    pub credential_ref: String,
    /// End of the current access window (trial or paid), None until a trial starts
    pub subscription_expiry: Option<DateTime<Utc>>,
    /// Whether the user has ever paid for access
    pub has_paid: bool,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates a user record at registration, before the trial is started
    pub fn new(
        id: UserId,
        name: impl Into<String>,
        email: impl Into<String>,
        credential_ref: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            credential_ref: credential_ref.into(),
            subscription_expiry: None,
            has_paid: false,
            created_at: now,
        }
    }
}
