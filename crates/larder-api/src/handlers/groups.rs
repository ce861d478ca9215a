//! Household handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;

use larder_service::{
    AddMemberRequest, CreateGroupRequest, GroupView, MemberView, UpdateGroupRequest,
};

use crate::dto::request::{SetActiveRequest, UpdateRoleRequest};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/groups
pub async fn create_group(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateGroupRequest>,
) -> Result<(StatusCode, Json<ApiResponse<GroupView>>), ApiError> {
    let view = state.group_service.create_group(&auth, req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(view))))
}

/// GET /api/groups
pub async fn my_groups(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<GroupView>>>, ApiError> {
    let groups = state.group_service.my_groups(&auth).await?;
    Ok(Json(ApiResponse::ok(groups)))
}

/// GET /api/groups/{id}
pub async fn get_group(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(group_id): Path<Uuid>,
) -> Result<Json<ApiResponse<GroupView>>, ApiError> {
    let view = state.group_service.get_group(&auth, group_id).await?;
    Ok(Json(ApiResponse::ok(view)))
}

/// PUT /api/groups/{id}
pub async fn update_group(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(group_id): Path<Uuid>,
    Json(req): Json<UpdateGroupRequest>,
) -> Result<Json<ApiResponse<GroupView>>, ApiError> {
    let view = state.group_service.update_group(&auth, group_id, req).await?;
    Ok(Json(ApiResponse::ok(view)))
}

/// PATCH /api/groups/{id}/status
pub async fn set_group_active(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(group_id): Path<Uuid>,
    Json(req): Json<SetActiveRequest>,
) -> Result<Json<ApiResponse<GroupView>>, ApiError> {
    let view = state
        .group_service
        .set_group_active(&auth, group_id, req.is_active)
        .await?;
    Ok(Json(ApiResponse::ok(view)))
}

/// DELETE /api/groups/{id}
pub async fn delete_group(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(group_id): Path<Uuid>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.group_service.delete_group(&auth, group_id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Group deleted"))))
}

/// GET /api/groups/{id}/members
pub async fn list_members(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(group_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<MemberView>>>, ApiError> {
    let members = state.group_service.list_members(&auth, group_id).await?;
    Ok(Json(ApiResponse::ok(members)))
}

/// POST /api/groups/{id}/members
pub async fn add_member(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(group_id): Path<Uuid>,
    Json(req): Json<AddMemberRequest>,
) -> Result<(StatusCode, Json<ApiResponse<MemberView>>), ApiError> {
    let member = state.group_service.add_member(&auth, group_id, req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(member))))
}

/// DELETE /api/groups/{id}/members/{account_id}
pub async fn remove_member(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((group_id, account_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state
        .group_service
        .remove_member(&auth, group_id, account_id)
        .await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Member removed"))))
}

/// PUT /api/groups/{id}/members/{account_id}/role
pub async fn update_member_role(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((group_id, account_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<UpdateRoleRequest>,
) -> Result<Json<ApiResponse<MemberView>>, ApiError> {
    let member = state
        .group_service
        .update_member_role(&auth, group_id, account_id, req.role)
        .await?;
    Ok(Json(ApiResponse::ok(member)))
}

/// PATCH /api/groups/{id}/members/{account_id}/status
pub async fn set_member_active(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((group_id, account_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<SetActiveRequest>,
) -> Result<Json<ApiResponse<MemberView>>, ApiError> {
    let member = state
        .group_service
        .set_member_active(&auth, group_id, account_id, req.is_active)
        .await?;
    Ok(Json(ApiResponse::ok(member)))
}
