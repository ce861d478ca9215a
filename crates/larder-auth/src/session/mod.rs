//! Session store and session lifecycle.

pub mod manager;
pub mod store;

pub use manager::{Principal, SessionGrant, SessionManager};
pub use store::SessionStore;
