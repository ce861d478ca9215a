//! # larder-database
//!
//! PostgreSQL connection management and the repositories the auth core
//! consumes. Every repository is a trait with a Postgres implementation
//! and an in-memory implementation that enforces the same uniqueness
//! rules.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use repositories::{AccountRepository, GroupRepository, MembershipRepository};
