/// Project lifecycle manager
///
/// State machine per project: Active → Deleted (terminal). Creation seeds
/// the roster with the owner entry (inside the store, atomically); deletion
/// cascades the roster and tasks.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::authz;
use crate::error::{CoreError, CoreResult};
use crate::models::{CreateProject, Project, UpdateProject};
use crate::store::MembershipStore;

/// Orchestrates create/read/update/delete of projects
#[derive(Clone)]
pub struct ProjectManager {
    store: Arc<dyn MembershipStore>,
}

impl ProjectManager {
    pub fn new(store: Arc<dyn MembershipStore>) -> Self {
        Self { store }
    }

    /// Creates a project owned by the actor.
    ///
    /// # Errors
    ///
    /// - `Validation` if the name is empty
    /// - `NotFound` if the actor does not exist
    pub async fn create(
        &self,
        actor: Uuid,
        name: String,
        description: Option<String>,
    ) -> CoreResult<Project> {
        let project = self
            .store
            .create_project(CreateProject {
                name,
                description,
                owner_id: actor,
            })
            .await?;

        info!(project_id = %project.id, owner_id = %actor, "project created");
        Ok(project)
    }

    /// Loads a project the actor is allowed to view.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the project does not exist
    /// - `Forbidden` if the actor is neither owner nor member
    pub async fn get(&self, actor: Uuid, project_id: Uuid) -> CoreResult<Project> {
        let project = self.store.get_project(project_id).await?;
        let roster = self.store.list_members(project_id).await?;

        if !authz::can_view(actor, &project, &roster) {
            return Err(CoreError::Forbidden(
                "you are not a member of this project".to_string(),
            ));
        }

        Ok(project)
    }

    /// Lists all projects the actor belongs to, newest first.
    pub async fn list_for(&self, actor: Uuid) -> CoreResult<Vec<Project>> {
        self.store.list_projects_for_user(actor).await
    }

    /// Applies a partial update. Fields absent from `data` stay unchanged;
    /// an explicit empty description clears the field.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the project does not exist
    /// - `Forbidden` if the actor is not the owner
    /// - `Validation` if a provided name is empty
    pub async fn update(
        &self,
        actor: Uuid,
        project_id: Uuid,
        data: UpdateProject,
    ) -> CoreResult<Project> {
        let project = self.store.get_project(project_id).await?;

        if !authz::can_edit_project(actor, &project) {
            return Err(CoreError::Forbidden(
                "only the project owner may edit the project".to_string(),
            ));
        }

        self.store.update_project(project_id, data).await
    }

    /// Deletes the project, cascading its roster and tasks.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the project does not exist
    /// - `Forbidden` if the actor is not the owner
    pub async fn delete(&self, actor: Uuid, project_id: Uuid) -> CoreResult<()> {
        let project = self.store.get_project(project_id).await?;

        if !authz::can_delete_project(actor, &project) {
            return Err(CoreError::Forbidden(
                "only the project owner may delete the project".to_string(),
            ));
        }

        self.store.delete_project(project_id).await?;
        info!(project_id = %project_id, actor_id = %actor, "project deleted");
        Ok(())
    }
}
