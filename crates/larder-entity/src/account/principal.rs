//! Principal classes carried inside session tokens.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The class of principal a token was issued to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrincipalKind {
    Admin,
    Member,
}

impl PrincipalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Member => "member",
        }
    }
}

impl fmt::Display for PrincipalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which principal class an endpoint accepts.
///
/// Set by the routing layer, never by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RequiredPrincipal {
    Admin,
    Member,
    #[default]
    Any,
}

impl RequiredPrincipal {
    /// Whether a token of `kind` satisfies this requirement.
    pub fn admits(&self, kind: PrincipalKind) -> bool {
        match self {
            Self::Any => true,
            Self::Admin => kind == PrincipalKind::Admin,
            Self::Member => kind == PrincipalKind::Member,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admits() {
        assert!(RequiredPrincipal::Any.admits(PrincipalKind::Admin));
        assert!(RequiredPrincipal::Any.admits(PrincipalKind::Member));
        assert!(RequiredPrincipal::Admin.admits(PrincipalKind::Admin));
        assert!(!RequiredPrincipal::Admin.admits(PrincipalKind::Member));
        assert!(!RequiredPrincipal::Member.admits(PrincipalKind::Admin));
    }
}
