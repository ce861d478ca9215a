//! # larder-api
//!
//! HTTP API layer for Larder built on Axum.
//!
//! Routes are grouped by the principal class they accept. Each group
//! carries a [`RequiredPrincipal`](larder_entity::account::RequiredPrincipal)
//! request extension that the [`AuthUser`](extractors::AuthUser) extractor
//! compares against the token's embedded class.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{Repositories, build_app, build_state, build_state_with};
pub use error::ApiError;
pub use state::AppState;
