//! One-time invitation tokens.

use argon2::password_hash::rand_core::{OsRng, RngCore};

/// Generate `bytes` random bytes from the OS RNG, hex encoded.
pub fn generate_token(bytes: usize) -> String {
    let mut buf = vec![0u8; bytes.max(16)];
    OsRng.fill_bytes(&mut buf);
    hex::encode(buf)
}
