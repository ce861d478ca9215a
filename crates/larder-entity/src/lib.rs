//! # larder-entity
//!
//! Domain entity models for Larder. Every struct here is either a table
//! row (deriving `sqlx::FromRow`) or a value object carried between the
//! auth core and its repositories.
//!
//! The global account role and the per-group membership role are two
//! separate enums. An account can be globally unprivileged yet own a
//! group, and the authorization resolver composes the two.

pub mod account;
pub mod group;
pub mod membership;
