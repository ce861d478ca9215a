//! # larder-auth
//!
//! Authentication, session management, and authorization core for Larder.
//!
//! ## Modules
//!
//! - `password`: Argon2id hashing and password policy
//! - `cipher`: deterministic AES-256-CBC encryption for queryable PII columns
//! - `token`: opaque session tokens, encrypted claims inside a signed envelope
//! - `session`: single-live-session store and the login/verify/logout flows
//! - `authz`: global and group-scoped authorization gates

pub mod authz;
pub mod cipher;
pub mod invitation;
pub mod password;
pub mod session;
pub mod token;

pub use authz::{AuthorizationResolver, GlobalAction, GroupAction, RolePolicy};
pub use cipher::FieldCipher;
pub use password::{PasswordHasher, PasswordValidator};
pub use session::{Principal, SessionGrant, SessionManager, SessionStore};
pub use token::{Claims, TokenCodec};
