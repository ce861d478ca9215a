//! Route definitions for the Larder HTTP API.
//!
//! All routes are mounted under `/api`. Each route group is layered with
//! the principal class it accepts; the `AuthUser` extractor enforces it.

use std::time::Duration;

use axum::{
    Extension, Router, middleware as axum_middleware,
    routing::{delete, get, patch, post, put},
};
use tower_http::compression::CompressionLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use larder_entity::account::RequiredPrincipal;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(group_routes())
        .merge(admin_routes())
        .merge(health_routes());

    let cors = middleware::cors::build_cors_layer(&state.config.server);
    let timeout = Duration::from_secs(state.config.server.request_timeout_seconds);

    Router::new()
        .nest("/api", api_routes)
        .layer(TimeoutLayer::new(timeout))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Public account flows plus session endpoints open to any principal class.
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/verify-email", post(handlers::auth::verify_email))
        .route("/auth/reinvite", post(handlers::auth::reinvite))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/me", get(handlers::auth::me))
        .layer(Extension(RequiredPrincipal::Any))
}

/// Household endpoints, member principals only.
fn group_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/groups",
            get(handlers::groups::my_groups).post(handlers::groups::create_group),
        )
        .route(
            "/groups/{id}",
            get(handlers::groups::get_group)
                .put(handlers::groups::update_group)
                .delete(handlers::groups::delete_group),
        )
        .route("/groups/{id}/status", patch(handlers::groups::set_group_active))
        .route(
            "/groups/{id}/members",
            get(handlers::groups::list_members).post(handlers::groups::add_member),
        )
        .route(
            "/groups/{id}/members/{account_id}",
            delete(handlers::groups::remove_member),
        )
        .route(
            "/groups/{id}/members/{account_id}/role",
            put(handlers::groups::update_member_role),
        )
        .route(
            "/groups/{id}/members/{account_id}/status",
            patch(handlers::groups::set_member_active),
        )
        .layer(Extension(RequiredPrincipal::Member))
}

/// Account administration, admin principals only.
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/accounts", get(handlers::admin::list_accounts))
        .route(
            "/admin/accounts/{id}/status",
            patch(handlers::admin::set_account_active),
        )
        .layer(Extension(RequiredPrincipal::Admin))
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
