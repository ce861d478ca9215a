//! Token issuance and validation.
//!
//! A token is an HS256-signed JWT whose only payload claim besides the
//! timestamps is `sub`: the claims serialized to JSON, sealed with
//! AES-256-GCM under a key derived from the payload secret, and base64url
//! encoded as `nonce || ciphertext`. Anyone can parse the envelope, but
//! only the server can read who the token belongs to.

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use larder_core::config::auth::AuthConfig;
use larder_core::error::AppError;

use super::claims::Claims;

/// AES-GCM nonce length in bytes.
const NONCE_LEN: usize = 12;

/// Signed outer structure of a token.
#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    sub: String,
    iat: i64,
    exp: i64,
}

/// Issues and validates opaque session tokens.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    payload_cipher: Aes256Gcm,
    ttl_seconds: i64,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish_non_exhaustive()
    }
}

impl TokenCodec {
    /// Creates a codec from the signing secret, payload secret, and session TTL.
    pub fn new(config: &AuthConfig) -> Result<Self, AppError> {
        if config.signing_secret.is_empty() || config.payload_secret.is_empty() {
            return Err(AppError::configuration(
                "signing_secret and payload_secret must not be empty",
            ));
        }

        let payload_key = Sha256::digest(config.payload_secret.as_bytes());
        let payload_cipher = Aes256Gcm::new_from_slice(&payload_key)
            .map_err(|e| AppError::configuration(format!("Invalid payload key: {e}")))?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.signing_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.signing_secret.as_bytes()),
            validation,
            payload_cipher,
            ttl_seconds: config.session_ttl_ms.div_ceil(1000).max(1) as i64,
        })
    }

    /// Seal the claims and sign them into a token valid for the session TTL.
    pub fn issue(&self, claims: &Claims) -> Result<String, AppError> {
        let plaintext = serde_json::to_vec(claims)?;
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .payload_cipher
            .encrypt(&nonce, plaintext.as_ref())
            .map_err(|_| AppError::internal("Failed to encrypt token payload"))?;

        let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        sealed.extend_from_slice(&nonce);
        sealed.extend_from_slice(&ciphertext);

        let now = Utc::now().timestamp();
        let envelope = Envelope {
            sub: URL_SAFE_NO_PAD.encode(sealed),
            iat: now,
            exp: now + self.ttl_seconds,
        };

        encode(&Header::default(), &envelope, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to sign token: {e}")))
    }

    /// Expiry of a valid token, as a Unix timestamp in seconds.
    pub fn expires_at(&self, token: &str) -> Result<i64, AppError> {
        decode::<Envelope>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims.exp)
            .map_err(|_| invalid())
    }

    /// Verify the envelope and recover the claims.
    ///
    /// Bad signature, expiry, and an undecryptable or unparsable payload
    /// all produce the same `InvalidOrExpiredToken` error.
    pub fn validate(&self, token: &str) -> Result<Claims, AppError> {
        let envelope = decode::<Envelope>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                debug!(error = %e, "Token envelope rejected");
                invalid()
            })?
            .claims;

        let sealed = URL_SAFE_NO_PAD.decode(envelope.sub).map_err(|_| invalid())?;
        if sealed.len() <= NONCE_LEN {
            return Err(invalid());
        }
        let (nonce, ciphertext) = sealed.split_at(NONCE_LEN);

        let plaintext = self
            .payload_cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| invalid())?;

        serde_json::from_slice(&plaintext).map_err(|_| invalid())
    }
}

fn invalid() -> AppError {
    AppError::invalid_token("Invalid or expired token")
}

#[cfg(test)]
mod tests {
    use super::*;
    use larder_core::error::ErrorKind;
    use larder_entity::account::{GlobalRole, PrincipalKind};
    use uuid::Uuid;

    fn config() -> AuthConfig {
        AuthConfig {
            signing_secret: "signing-secret-for-tests".to_string(),
            payload_secret: "payload-secret-for-tests".to_string(),
            ..AuthConfig::default()
        }
    }

    fn claims() -> Claims {
        Claims {
            id: Uuid::now_v7(),
            email: "a@x.com".to_string(),
            name: "a@x.com".to_string(),
            kind: PrincipalKind::Member,
            role: GlobalRole::Member,
        }
    }

    #[test]
    fn test_issue_then_validate() {
        let codec = TokenCodec::new(&config()).unwrap();
        let claims = claims();
        let token = codec.issue(&claims).unwrap();
        assert_eq!(codec.validate(&token).unwrap(), claims);
    }

    #[test]
    fn test_payload_is_opaque() {
        let codec = TokenCodec::new(&config()).unwrap();
        let token = codec.issue(&claims()).unwrap();

        let payload = token.split('.').nth(1).unwrap();
        let decoded = String::from_utf8(URL_SAFE_NO_PAD.decode(payload).unwrap()).unwrap();
        assert!(decoded.contains("\"sub\""));
        assert!(!decoded.contains("a@x.com"));
        assert!(!decoded.contains("member"));
    }

    #[test]
    fn test_tokens_for_same_claims_differ() {
        let codec = TokenCodec::new(&config()).unwrap();
        let claims = claims();
        assert_ne!(codec.issue(&claims).unwrap(), codec.issue(&claims).unwrap());
    }

    #[test]
    fn test_wrong_signing_secret_rejected() {
        let codec = TokenCodec::new(&config()).unwrap();
        let token = codec.issue(&claims()).unwrap();

        let other = TokenCodec::new(&AuthConfig {
            signing_secret: "another-signing-secret".to_string(),
            ..config()
        })
        .unwrap();
        assert_eq!(
            other.validate(&token).unwrap_err().kind,
            ErrorKind::InvalidOrExpiredToken
        );
    }

    #[test]
    fn test_wrong_payload_secret_rejected() {
        let codec = TokenCodec::new(&config()).unwrap();
        let token = codec.issue(&claims()).unwrap();

        let other = TokenCodec::new(&AuthConfig {
            payload_secret: "another-payload-secret".to_string(),
            ..config()
        })
        .unwrap();
        assert_eq!(
            other.validate(&token).unwrap_err().kind,
            ErrorKind::InvalidOrExpiredToken
        );
    }

    #[test]
    fn test_expired_envelope_rejected() {
        let config = config();
        let codec = TokenCodec::new(&config).unwrap();
        let token = codec.issue(&claims()).unwrap();
        let sub = decode::<Envelope>(&token, &codec.decoding_key, &codec.validation)
            .unwrap()
            .claims
            .sub;

        let now = Utc::now().timestamp();
        let expired = encode(
            &Header::default(),
            &Envelope {
                sub,
                iat: now - 120,
                exp: now - 60,
            },
            &EncodingKey::from_secret(config.signing_secret.as_bytes()),
        )
        .unwrap();

        assert_eq!(
            codec.validate(&expired).unwrap_err().kind,
            ErrorKind::InvalidOrExpiredToken
        );
    }

    #[test]
    fn test_garbage_payload_rejected() {
        let config = config();
        let codec = TokenCodec::new(&config).unwrap();
        let now = Utc::now().timestamp();
        let forged = encode(
            &Header::default(),
            &Envelope {
                sub: URL_SAFE_NO_PAD.encode(b"definitely not sealed claims"),
                iat: now,
                exp: now + 60,
            },
            &EncodingKey::from_secret(config.signing_secret.as_bytes()),
        )
        .unwrap();

        assert_eq!(
            codec.validate(&forged).unwrap_err().kind,
            ErrorKind::InvalidOrExpiredToken
        );
        assert_eq!(
            codec.validate("not.a.token").unwrap_err().kind,
            ErrorKind::InvalidOrExpiredToken
        );
    }

    #[test]
    fn test_expires_at_follows_ttl() {
        let codec = TokenCodec::new(&AuthConfig {
            session_ttl_ms: 90_500,
            ..config()
        })
        .unwrap();
        let before = Utc::now().timestamp();
        let token = codec.issue(&claims()).unwrap();
        let exp = codec.expires_at(&token).unwrap();
        assert!(exp >= before + 91 && exp <= Utc::now().timestamp() + 91);

        assert_eq!(
            codec.expires_at("not.a.token").unwrap_err().kind,
            ErrorKind::InvalidOrExpiredToken
        );
    }

    #[test]
    fn test_empty_secret_rejected() {
        let err = TokenCodec::new(&AuthConfig {
            signing_secret: String::new(),
            ..config()
        })
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }
}
