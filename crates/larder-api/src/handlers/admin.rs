//! Admin account management handlers.

use axum::Json;
use axum::extract::{Path, State};
use uuid::Uuid;

use larder_service::AccountProfile;

use crate::dto::request::SetActiveRequest;
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/admin/accounts
pub async fn list_accounts(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<AccountProfile>>>, ApiError> {
    let accounts = state.admin_account_service.list_accounts(&auth).await?;
    Ok(Json(ApiResponse::ok(accounts)))
}

/// PATCH /api/admin/accounts/{id}/status
pub async fn set_account_active(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(account_id): Path<Uuid>,
    Json(req): Json<SetActiveRequest>,
) -> Result<Json<ApiResponse<AccountProfile>>, ApiError> {
    let profile = state
        .admin_account_service
        .set_account_active(&auth, account_id, req.is_active)
        .await?;
    Ok(Json(ApiResponse::ok(profile)))
}
