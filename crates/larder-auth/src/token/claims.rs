//! Claims carried (encrypted) inside a session token.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use larder_entity::account::{GlobalRole, PrincipalKind};

/// Identity of the principal a token was issued to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Account ID.
    pub id: Uuid,
    /// Plaintext email at issuance.
    pub email: String,
    /// Plaintext username at issuance.
    pub name: String,
    /// Principal class, compared against the endpoint's requirement.
    #[serde(rename = "type")]
    pub kind: PrincipalKind,
    /// Global role at issuance.
    pub role: GlobalRole,
}
