//! Ciphertext wrapper for encrypted-at-rest columns.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A column value that has already been through the field cipher.
///
/// Repositories only ever receive and compare `SealedField`s, so a
/// plaintext email can't be bound into a lookup by accident. Because the
/// cipher is deterministic, equality of two sealed values is equality of
/// their plaintexts.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct SealedField(String);

impl SealedField {
    /// Wrap ciphertext produced by the field cipher.
    pub fn from_ciphertext(ciphertext: impl Into<String>) -> Self {
        Self(ciphertext.into())
    }

    /// The ciphertext as stored.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SealedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SealedField({})", self.0)
    }
}
