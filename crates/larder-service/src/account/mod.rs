//! Account self-service and administration.

pub mod admin;
pub mod profile;
pub mod service;

pub use admin::AdminAccountService;
pub use profile::AccountProfile;
pub use service::{AccountService, RegisterRequest};
