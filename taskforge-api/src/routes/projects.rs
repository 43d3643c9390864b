/// Project endpoints
///
/// # Endpoints
///
/// - `GET /v1/projects` - Projects the caller belongs to
/// - `POST /v1/projects` - Create a project (caller becomes owner)
/// - `GET /v1/projects/:id` - Fetch one project
/// - `PUT /v1/projects/:id` - Partial update (owner only)
/// - `DELETE /v1/projects/:id` - Delete with cascade (owner only)

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
use taskforge_core::models::{Project, UpdateProject};
use uuid::Uuid;
use validator::Validate;

/// Create project request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    /// Project name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    /// Optional description
    pub description: Option<String>,
}

/// Update project request
///
/// Absent fields are left unchanged; an explicit empty description clears
/// the field.
#[derive(Debug, Deserialize)]
pub struct UpdateProjectRequest {
    /// New name
    pub name: Option<String>,

    /// New description
    pub description: Option<String>,
}

/// Lists projects the caller holds a roster entry in, newest first.
pub async fn list_projects(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Json<Vec<Project>>> {
    let projects = state.projects.list_for(user.id).await?;
    Ok(Json(projects))
}

/// Creates a project; the caller becomes its owner.
pub async fn create_project(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<CreateProjectRequest>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    req.validate()?;

    let project = state
        .projects
        .create(user.id, req.name, req.description)
        .await?;

    Ok((StatusCode::CREATED, Json(project)))
}

/// Fetches a single project the caller may view.
pub async fn get_project(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Project>> {
    let project = state.projects.get(user.id, id).await?;
    Ok(Json(project))
}

/// Applies a partial update to a project. Owner only.
pub async fn update_project(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateProjectRequest>,
) -> ApiResult<Json<Project>> {
    let project = state
        .projects
        .update(
            user.id,
            id,
            UpdateProject {
                name: req.name,
                description: req.description,
            },
        )
        .await?;

    Ok(Json(project))
}

/// Deletes a project along with its roster and tasks. Owner only.
pub async fn delete_project(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.projects.delete(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
