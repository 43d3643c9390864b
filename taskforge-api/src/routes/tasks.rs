/// Task endpoints
///
/// # Endpoints
///
/// - `GET /v1/projects/:id/tasks` - Tasks of a project, oldest first
/// - `POST /v1/projects/:id/tasks` - Create a task
/// - `PUT /v1/projects/:id/tasks/:task_id` - Partial update
/// - `DELETE /v1/projects/:id/tasks/:task_id` - Delete one task
///
/// All operations require roster membership in the project.

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
use taskforge_core::models::{CreateTask, Task, UpdateTask};
use uuid::Uuid;
use validator::Validate;

/// Create task request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Task title
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,
}

/// Update task request; absent fields are left unchanged
#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    /// New title
    pub title: Option<String>,

    /// New completion flag
    pub completed: Option<bool>,
}

/// Lists a project's tasks, oldest first.
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Task>>> {
    let tasks = state.tasks.list(project_id, user.id).await?;
    Ok(Json(tasks))
}

/// Creates a task attached to the project.
pub async fn create_task(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(project_id): Path<Uuid>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    req.validate()?;

    let task = state
        .tasks
        .create(project_id, user.id, CreateTask { title: req.title })
        .await?;

    Ok((StatusCode::CREATED, Json(task)))
}

/// Applies a partial update to a task.
pub async fn update_task(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path((project_id, task_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    let task = state
        .tasks
        .update(
            project_id,
            task_id,
            user.id,
            UpdateTask {
                title: req.title,
                completed: req.completed,
            },
        )
        .await?;

    Ok(Json(task))
}

/// Deletes a single task; the project's other tasks are untouched.
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path((project_id, task_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    state.tasks.delete(project_id, task_id, user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
