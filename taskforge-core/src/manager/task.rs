/// Task operations within a project
///
/// Any roster member may list, create, update, and delete a project's tasks;
/// editing rights on the project itself remain owner-only and live in
/// `ProjectManager`.

use std::sync::Arc;

use uuid::Uuid;

use crate::authz;
use crate::error::{CoreError, CoreResult};
use crate::models::{CreateTask, Task, UpdateTask};
use crate::store::MembershipStore;

/// Orchestrates per-project task CRUD
#[derive(Clone)]
pub struct TaskManager {
    store: Arc<dyn MembershipStore>,
}

impl TaskManager {
    pub fn new(store: Arc<dyn MembershipStore>) -> Self {
        Self { store }
    }

    /// Verifies the actor may act on the project's tasks.
    async fn ensure_member(&self, actor: Uuid, project_id: Uuid) -> CoreResult<()> {
        let project = self.store.get_project(project_id).await?;
        let roster = self.store.list_members(project_id).await?;

        if !authz::can_view(actor, &project, &roster) {
            return Err(CoreError::Forbidden(
                "you are not a member of this project".to_string(),
            ));
        }
        Ok(())
    }

    /// Lists the project's tasks, oldest first.
    pub async fn list(&self, project_id: Uuid, actor: Uuid) -> CoreResult<Vec<Task>> {
        self.ensure_member(actor, project_id).await?;
        self.store.list_tasks(project_id).await
    }

    /// Creates a task attached to the project.
    ///
    /// # Errors
    ///
    /// - `Validation` if the title is empty
    /// - `NotFound` / `Forbidden` per the membership check
    pub async fn create(
        &self,
        project_id: Uuid,
        actor: Uuid,
        data: CreateTask,
    ) -> CoreResult<Task> {
        self.ensure_member(actor, project_id).await?;
        self.store.create_task(project_id, data).await
    }

    /// Applies a partial update to a task; absent fields stay unchanged.
    pub async fn update(
        &self,
        project_id: Uuid,
        task_id: Uuid,
        actor: Uuid,
        data: UpdateTask,
    ) -> CoreResult<Task> {
        self.ensure_member(actor, project_id).await?;
        self.store.update_task(project_id, task_id, data).await
    }

    /// Deletes a task; the project's other tasks are untouched.
    pub async fn delete(&self, project_id: Uuid, task_id: Uuid, actor: Uuid) -> CoreResult<()> {
        self.ensure_member(actor, project_id).await?;
        self.store.delete_task(project_id, task_id).await
    }
}
