//! Deterministic AES-256-CBC encryption for queryable columns.
//!
//! Every value is encrypted under one process-wide key and one fixed IV,
//! so identical plaintexts always produce identical ciphertexts. That
//! makes `WHERE email = $1` work against encrypted storage, at the price
//! of revealing which rows share a value. Switching to a random IV would
//! silently break every lookup against rows already written; a separate
//! keyed-hash index column is the way to remove the leak.

use aes::Aes256;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit, block_padding::Pkcs7};

use larder_core::config::auth::AuthConfig;
use larder_core::error::AppError;
use larder_entity::account::SealedField;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

const KEY_LEN: usize = 32;
const IV_LEN: usize = 16;

/// Encrypts and decrypts PII fields to lowercase hex ciphertext.
#[derive(Clone)]
pub struct FieldCipher {
    key: [u8; KEY_LEN],
    iv: [u8; IV_LEN],
}

impl std::fmt::Debug for FieldCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldCipher").finish_non_exhaustive()
    }
}

impl FieldCipher {
    /// Build a cipher from the hex key and IV in configuration.
    pub fn new(config: &AuthConfig) -> Result<Self, AppError> {
        Ok(Self {
            key: decode_fixed::<KEY_LEN>(&config.field_key_hex, "field_key_hex")?,
            iv: decode_fixed::<IV_LEN>(&config.field_iv_hex, "field_iv_hex")?,
        })
    }

    /// Encrypt a plaintext to hex ciphertext.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, AppError> {
        let cipher = Aes256CbcEnc::new_from_slices(&self.key, &self.iv)
            .map_err(|e| AppError::internal(format!("Field cipher init failed: {e}")))?;
        let ciphertext = cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());
        Ok(hex::encode(ciphertext))
    }

    /// Decrypt hex ciphertext produced by [`encrypt`](Self::encrypt).
    pub fn decrypt(&self, ciphertext: &str) -> Result<String, AppError> {
        let bytes = hex::decode(ciphertext)
            .map_err(|e| AppError::internal(format!("Stored ciphertext is not hex: {e}")))?;
        let cipher = Aes256CbcDec::new_from_slices(&self.key, &self.iv)
            .map_err(|e| AppError::internal(format!("Field cipher init failed: {e}")))?;
        let plaintext = cipher
            .decrypt_padded_vec_mut::<Pkcs7>(&bytes)
            .map_err(|_| AppError::internal("Stored ciphertext failed to decrypt"))?;
        String::from_utf8(plaintext)
            .map_err(|e| AppError::internal(format!("Decrypted field is not UTF-8: {e}")))
    }

    /// Encrypt into a [`SealedField`] ready for a repository call.
    pub fn seal(&self, plaintext: &str) -> Result<SealedField, AppError> {
        self.encrypt(plaintext).map(SealedField::from_ciphertext)
    }

    /// Decrypt a [`SealedField`] read from storage.
    pub fn open(&self, sealed: &SealedField) -> Result<String, AppError> {
        self.decrypt(sealed.as_str())
    }
}

fn decode_fixed<const N: usize>(value: &str, name: &str) -> Result<[u8; N], AppError> {
    let bytes = hex::decode(value.trim())
        .map_err(|e| AppError::configuration(format!("{name} is not valid hex: {e}")))?;
    bytes.try_into().map_err(|bytes: Vec<u8>| {
        AppError::configuration(format!(
            "{name} must decode to {N} bytes, got {}",
            bytes.len()
        ))
    })
}
