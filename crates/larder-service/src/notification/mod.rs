//! Invitation notifiers.
//!
//! Mail delivery lives outside this service. [`LogNotifier`] records that
//! an invitation went out without logging the token itself.
//! [`RecordingNotifier`] keeps every invitation in memory for tests and
//! local development.

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::info;

use larder_core::result::AppResult;
use larder_core::traits::{Invitation, Notifier};

/// Notifier that only writes a log line.
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send_invitation(&self, invitation: &Invitation) -> AppResult<()> {
        info!(kind = ?invitation.kind, "Invitation issued");
        Ok(())
    }
}

/// Notifier that keeps every invitation it is asked to send.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Invitation>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every invitation sent so far, oldest first.
    pub async fn sent(&self) -> Vec<Invitation> {
        self.sent.lock().await.clone()
    }

    /// Token of the most recent invitation sent to `email`.
    pub async fn latest_token_for(&self, email: &str) -> Option<String> {
        self.sent
            .lock()
            .await
            .iter()
            .rev()
            .find(|i| i.email == email)
            .map(|i| i.token.clone())
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_invitation(&self, invitation: &Invitation) -> AppResult<()> {
        self.sent.lock().await.push(invitation.clone());
        Ok(())
    }
}
