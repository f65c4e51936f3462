//! Outbound collaborator adapters
//!
//! Filesystem document storage plus the logging stand-ins for the reminder
//! and retail-sync channels. The real SMS gateway and retail platform
//! connectors slot in behind the same ports.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use core_kernel::{CoreError, CoreResult, MemberId};
use domain_claims::ports::DocumentStore;
use domain_policy::{NotificationSender, RetailSyncPort};

/// Stores claim documents as files under a base directory
///
/// References are relative paths of the form `{uuid}-{filename}` so a
/// reference never escapes the base directory.
pub struct FsDocumentStore {
    base_dir: PathBuf,
}

impl FsDocumentStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn resolve(&self, reference: &str) -> CoreResult<PathBuf> {
        let name = Path::new(reference);
        if name.components().count() != 1 || reference.contains("..") {
            return Err(CoreError::invalid_argument("malformed document reference"));
        }
        Ok(self.base_dir.join(name))
    }
}

#[async_trait]
impl DocumentStore for FsDocumentStore {
    async fn store(&self, filename: &str, bytes: Vec<u8>) -> CoreResult<String> {
        tokio::fs::create_dir_all(&self.base_dir)
            .await
            .map_err(|e| CoreError::unavailable_from("document storage failed", e))?;

        let safe_name: String = filename
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
            .collect();
        let reference = format!("{}-{}", Uuid::new_v4().simple(), safe_name);
        let path = self.base_dir.join(&reference);

        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| CoreError::unavailable_from("document storage failed", e))?;
        Ok(reference)
    }

    async fn fetch(&self, reference: &str) -> CoreResult<Vec<u8>> {
        let path = self.resolve(reference)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(CoreError::not_found("Document", reference))
            }
            Err(e) => Err(CoreError::unavailable_from("document storage failed", e)),
        }
    }
}

/// Logs reminders instead of sending them
///
/// TODO: replace with the SMS gateway adapter once the account is provisioned.
#[derive(Debug, Default, Clone)]
pub struct LoggingNotificationSender;

#[async_trait]
impl NotificationSender for LoggingNotificationSender {
    async fn send_reminder(&self, member_id: MemberId) -> CoreResult<()> {
        info!(member_id = %member_id, "payment reminder dispatched");
        Ok(())
    }
}

/// Records retail sync requests without reaching any platform
#[derive(Debug, Default, Clone)]
pub struct LoggingRetailSync;

#[async_trait]
impl RetailSyncPort for LoggingRetailSync {
    async fn sync_payments(&self) -> CoreResult<u32> {
        info!("retail payment sync requested, no platform configured");
        Ok(0)
    }
}
