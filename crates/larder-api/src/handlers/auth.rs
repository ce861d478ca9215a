//! Auth handlers: register, verify, reinvite, login, logout, me.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use validator::Validate;

use larder_core::error::AppError;
use larder_service::{AccountProfile, RegisterRequest};

use crate::dto::request::{LoginRequest, ReinviteRequest, VerifyEmailRequest};
use crate::dto::response::{ApiResponse, MessageResponse, SessionResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AccountProfile>>), ApiError> {
    let profile = state.account_service.register(req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(profile))))
}

/// POST /api/auth/verify-email
pub async fn verify_email(
    State(state): State<AppState>,
    Json(req): Json<VerifyEmailRequest>,
) -> Result<Json<ApiResponse<SessionResponse>>, ApiError> {
    req.validate().map_err(AppError::from)?;
    let grant = state.account_service.verify_email(&req.token).await?;
    Ok(Json(ApiResponse::ok(SessionResponse::new(grant))))
}

/// POST /api/auth/reinvite
pub async fn reinvite(
    State(state): State<AppState>,
    Json(req): Json<ReinviteRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    req.validate().map_err(AppError::from)?;
    state.account_service.reinvite(&req.email).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "A new invitation has been sent",
    ))))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<SessionResponse>>, ApiError> {
    req.validate().map_err(AppError::from)?;
    let grant = state.account_service.login(&req.email, &req.password).await?;
    Ok(Json(ApiResponse::ok(SessionResponse::new(grant))))
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.account_service.logout(&auth).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Logged out successfully",
    ))))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<AccountProfile>>, ApiError> {
    let profile = state.account_service.me(&auth).await?;
    Ok(Json(ApiResponse::ok(profile)))
}
