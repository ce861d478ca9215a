//! Group membership entities.

pub mod model;
pub mod role;

pub use model::{CreateMembership, Membership};
pub use role::GroupRole;
