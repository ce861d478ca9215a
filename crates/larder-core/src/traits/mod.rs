//! Core traits defined in `larder-core` and implemented by other crates.

pub mod cache;
pub mod notifier;

pub use cache::CacheProvider;
pub use notifier::{Invitation, InvitationKind, Notifier};
