//! Two-tier authorization: an account-wide gate on the global role and a
//! group-scoped gate on the membership role.

pub mod action;
pub mod policy;
pub mod resolver;

pub use action::{ActionClass, GlobalAction, GroupAction};
pub use policy::RolePolicy;
pub use resolver::AuthorizationResolver;
