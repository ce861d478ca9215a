//! Outbound notification seam for invitation delivery.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::result::AppResult;

/// Why an invitation is being sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvitationKind {
    /// First invitation after registration.
    Registration,
    /// A fresh token requested for an unverified account.
    Reinvite,
}

/// An invitation token addressed to one account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invitation {
    /// Plaintext destination address.
    pub email: String,
    /// Name to greet the recipient with.
    pub display_name: String,
    /// One-time verification token.
    pub token: String,
    /// Registration or re-invite.
    pub kind: InvitationKind,
}

/// Delivers invitation tokens out of band.
///
/// Delivery format and transport belong to the implementation. A failure
/// is reported to the caller but never rolls back the account change that
/// produced the invitation.
#[async_trait]
pub trait Notifier: Send + Sync + std::fmt::Debug + 'static {
    /// Send an invitation.
    async fn send_invitation(&self, invitation: &Invitation) -> AppResult<()>;
}
