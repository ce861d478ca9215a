//! Group (household) domain entities.

pub mod model;

pub use model::{CreateGroup, Group, UpdateGroup};
