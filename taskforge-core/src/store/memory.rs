/// In-memory membership store
///
/// All state sits behind a single async mutex, so every operation is
/// trivially atomic with respect to concurrent requests — the same
/// observable guarantee the PostgreSQL backend gets from transactions and
/// its primary keys. Used by the test suites and for local development
/// without a database.

use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use async_trait::async_trait;

use crate::error::{CoreError, CoreResult};
use crate::models::{
    CreateProject, CreateTask, CreateUser, Membership, MembershipRole, Project, Task,
    UpdateProject, UpdateTask, User,
};
use crate::store::MembershipStore;

#[derive(Default)]
struct MemoryState {
    users: HashMap<Uuid, User>,
    projects: HashMap<Uuid, Project>,
    /// Roster per project, in join order
    rosters: HashMap<Uuid, Vec<Membership>>,
    /// Tasks per project, in creation order
    tasks: HashMap<Uuid, Vec<Task>>,
}

/// In-process implementation of [`MembershipStore`]
#[derive(Default)]
pub struct MemoryMembershipStore {
    state: Mutex<MemoryState>,
}

impl MemoryMembershipStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Normalizes an update's description: an explicit empty string clears the
/// field.
fn normalize_description(description: Option<String>) -> Option<Option<String>> {
    description.map(|d| if d.is_empty() { None } else { Some(d) })
}

#[async_trait]
impl MembershipStore for MemoryMembershipStore {
    async fn ping(&self) -> CoreResult<()> {
        Ok(())
    }

    async fn create_user(&self, data: CreateUser) -> CoreResult<User> {
        let mut state = self.state.lock().await;

        if state
            .users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(&data.email))
        {
            return Err(CoreError::Conflict(format!(
                "a user with email {} already exists",
                data.email
            )));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: data.email,
            name: data.name,
            password_hash: data.password_hash,
            created_at: now,
            updated_at: now,
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_id(&self, id: Uuid) -> CoreResult<Option<User>> {
        let state = self.state.lock().await;
        Ok(state.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> CoreResult<Option<User>> {
        let state = self.state.lock().await;
        Ok(state
            .users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn create_project(&self, data: CreateProject) -> CoreResult<Project> {
        if data.name.trim().is_empty() {
            return Err(CoreError::Validation(
                "project name must not be empty".to_string(),
            ));
        }

        let mut state = self.state.lock().await;

        if !state.users.contains_key(&data.owner_id) {
            return Err(CoreError::not_found("user"));
        }

        let now = Utc::now();
        let project = Project {
            id: Uuid::new_v4(),
            name: data.name,
            description: data.description,
            owner_id: data.owner_id,
            created_at: now,
            updated_at: now,
        };

        let owner_entry = Membership {
            project_id: project.id,
            user_id: project.owner_id,
            role: MembershipRole::Owner,
            created_at: now,
        };

        state.rosters.insert(project.id, vec![owner_entry]);
        state.tasks.insert(project.id, Vec::new());
        state.projects.insert(project.id, project.clone());
        Ok(project)
    }

    async fn get_project(&self, id: Uuid) -> CoreResult<Project> {
        let state = self.state.lock().await;
        state
            .projects
            .get(&id)
            .cloned()
            .ok_or_else(|| CoreError::not_found("project"))
    }

    async fn list_projects_for_user(&self, user_id: Uuid) -> CoreResult<Vec<Project>> {
        let state = self.state.lock().await;
        let mut projects: Vec<Project> = state
            .projects
            .values()
            .filter(|p| {
                state
                    .rosters
                    .get(&p.id)
                    .is_some_and(|roster| roster.iter().any(|m| m.user_id == user_id))
            })
            .cloned()
            .collect();
        projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(projects)
    }

    async fn update_project(&self, id: Uuid, data: UpdateProject) -> CoreResult<Project> {
        if let Some(ref name) = data.name {
            if name.trim().is_empty() {
                return Err(CoreError::Validation(
                    "project name must not be empty".to_string(),
                ));
            }
        }

        let mut state = self.state.lock().await;
        let project = state
            .projects
            .get_mut(&id)
            .ok_or_else(|| CoreError::not_found("project"))?;

        if let Some(name) = data.name {
            project.name = name;
        }
        if let Some(description) = normalize_description(data.description) {
            project.description = description;
        }
        project.updated_at = Utc::now();

        Ok(project.clone())
    }

    async fn delete_project(&self, id: Uuid) -> CoreResult<()> {
        let mut state = self.state.lock().await;
        if state.projects.remove(&id).is_none() {
            return Err(CoreError::not_found("project"));
        }
        state.rosters.remove(&id);
        state.tasks.remove(&id);
        Ok(())
    }

    async fn add_member(
        &self,
        project_id: Uuid,
        user_id: Uuid,
        role: MembershipRole,
    ) -> CoreResult<Membership> {
        let mut state = self.state.lock().await;

        if !state.projects.contains_key(&project_id) {
            return Err(CoreError::not_found("project"));
        }
        if !state.users.contains_key(&user_id) {
            return Err(CoreError::not_found("user"));
        }

        let roster = state.rosters.entry(project_id).or_default();
        if roster.iter().any(|m| m.user_id == user_id) {
            return Err(CoreError::Conflict(
                "user is already a member of the project".to_string(),
            ));
        }

        let membership = Membership {
            project_id,
            user_id,
            role,
            created_at: Utc::now(),
        };
        roster.push(membership.clone());
        Ok(membership)
    }

    async fn remove_member(&self, project_id: Uuid, user_id: Uuid) -> CoreResult<()> {
        let mut state = self.state.lock().await;

        let owner_id = state
            .projects
            .get(&project_id)
            .map(|p| p.owner_id)
            .ok_or_else(|| CoreError::not_found("project"))?;

        if user_id == owner_id {
            return Err(CoreError::Forbidden(
                "the project owner cannot be removed from the roster".to_string(),
            ));
        }

        let roster = state.rosters.entry(project_id).or_default();
        let before = roster.len();
        roster.retain(|m| m.user_id != user_id);
        if roster.len() == before {
            return Err(CoreError::not_found("membership"));
        }
        Ok(())
    }

    async fn list_members(&self, project_id: Uuid) -> CoreResult<Vec<Membership>> {
        let state = self.state.lock().await;
        if !state.projects.contains_key(&project_id) {
            return Err(CoreError::not_found("project"));
        }
        Ok(state.rosters.get(&project_id).cloned().unwrap_or_default())
    }

    async fn create_task(&self, project_id: Uuid, data: CreateTask) -> CoreResult<Task> {
        if data.title.trim().is_empty() {
            return Err(CoreError::Validation(
                "task title must not be empty".to_string(),
            ));
        }

        let mut state = self.state.lock().await;
        if !state.projects.contains_key(&project_id) {
            return Err(CoreError::not_found("project"));
        }

        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4(),
            project_id,
            title: data.title,
            completed: false,
            created_at: now,
            updated_at: now,
        };
        state.tasks.entry(project_id).or_default().push(task.clone());
        Ok(task)
    }

    async fn get_task(&self, project_id: Uuid, task_id: Uuid) -> CoreResult<Task> {
        let state = self.state.lock().await;
        state
            .tasks
            .get(&project_id)
            .and_then(|tasks| tasks.iter().find(|t| t.id == task_id))
            .cloned()
            .ok_or_else(|| CoreError::not_found("task"))
    }

    async fn update_task(
        &self,
        project_id: Uuid,
        task_id: Uuid,
        data: UpdateTask,
    ) -> CoreResult<Task> {
        if let Some(ref title) = data.title {
            if title.trim().is_empty() {
                return Err(CoreError::Validation(
                    "task title must not be empty".to_string(),
                ));
            }
        }

        let mut state = self.state.lock().await;
        let task = state
            .tasks
            .get_mut(&project_id)
            .and_then(|tasks| tasks.iter_mut().find(|t| t.id == task_id))
            .ok_or_else(|| CoreError::not_found("task"))?;

        if let Some(title) = data.title {
            task.title = title;
        }
        if let Some(completed) = data.completed {
            task.completed = completed;
        }
        task.updated_at = Utc::now();

        Ok(task.clone())
    }

    async fn delete_task(&self, project_id: Uuid, task_id: Uuid) -> CoreResult<()> {
        let mut state = self.state.lock().await;
        let tasks = state
            .tasks
            .get_mut(&project_id)
            .ok_or_else(|| CoreError::not_found("task"))?;

        let before = tasks.len();
        tasks.retain(|t| t.id != task_id);
        if tasks.len() == before {
            return Err(CoreError::not_found("task"));
        }
        Ok(())
    }

    async fn list_tasks(&self, project_id: Uuid) -> CoreResult<Vec<Task>> {
        let state = self.state.lock().await;
        if !state.projects.contains_key(&project_id) {
            return Err(CoreError::not_found("project"));
        }
        Ok(state.tasks.get(&project_id).cloned().unwrap_or_default())
    }
}
