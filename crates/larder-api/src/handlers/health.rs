//! Health check handler.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use larder_core::traits::CacheProvider;

use crate::dto::response::{ApiResponse, HealthResponse};
use crate::state::AppState;

/// GET /api/health
///
/// 503 when the session store or the database is unreachable.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<ApiResponse<HealthResponse>>) {
    let cache_ok = state.cache.health_check().await.unwrap_or(false);
    let database = match &state.database {
        Some(pool) => {
            if pool.health_check().await.unwrap_or(false) {
                "connected"
            } else {
                "unavailable"
            }
        }
        None => "memory",
    };

    let healthy = cache_ok && database != "unavailable";
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(ApiResponse::ok(HealthResponse {
            status: if healthy { "ok" } else { "degraded" }.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            cache: if cache_ok { "connected" } else { "unavailable" }.to_string(),
            database: database.to_string(),
        })),
    )
}
