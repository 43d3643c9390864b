/// Team roster endpoints
///
/// # Endpoints
///
/// - `GET /v1/projects/:id/team` - Roster in join order
/// - `POST /v1/projects/:id/team` - Add a member by email (owner only)
/// - `DELETE /v1/projects/:id/team/:user_id` - Remove a member (owner only)

use crate::{
    app::{AppState, CurrentUser},
    error::ApiResult,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use taskforge_core::models::{Membership, MembershipRole};
use uuid::Uuid;
use validator::Validate;

/// Add member request
#[derive(Debug, Deserialize, Validate)]
pub struct AddMemberRequest {
    /// Email of the user to add
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Role to grant; defaults to member. Owner role is never grantable.
    pub role: Option<MembershipRole>,
}

/// Lists the roster in join order. Any member may look.
pub async fn list_members(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Membership>>> {
    let roster = state.roster.list(project_id, user.id).await?;
    Ok(Json(roster))
}

/// Adds a user to the roster by email. Owner only.
///
/// # Errors
///
/// - `403 Forbidden`: caller is not the owner
/// - `404 Not Found`: project or user absent
/// - `409 Conflict`: already a member, or target is the owner
pub async fn add_member(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(project_id): Path<Uuid>,
    Json(req): Json<AddMemberRequest>,
) -> ApiResult<(StatusCode, Json<Membership>)> {
    req.validate()?;

    let role = req.role.unwrap_or(MembershipRole::Member);
    let membership = state
        .roster
        .add_member(project_id, user.id, &req.email, role)
        .await?;

    Ok((StatusCode::CREATED, Json(membership)))
}

/// Removes a member and returns the updated roster. Owner only; the owner
/// themselves can never be removed.
pub async fn remove_member(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path((project_id, target_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<Vec<Membership>>> {
    let roster = state
        .roster
        .remove_member(project_id, user.id, target_id)
        .await?;

    Ok(Json(roster))
}
