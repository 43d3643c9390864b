/// PostgreSQL membership store
///
/// Backs the [`MembershipStore`] contract with sqlx. Multi-row writes
/// (project creation, which also seeds the owner roster entry) run inside a
/// transaction; duplicate-membership races resolve through the
/// `(project_id, user_id)` primary key, so of two concurrent identical adds
/// exactly one commits and the other surfaces as `Conflict` via the error
/// classification in `crate::error`.

use sqlx::PgPool;
use uuid::Uuid;

use async_trait::async_trait;

use crate::error::{CoreError, CoreResult};
use crate::models::{
    CreateProject, CreateTask, CreateUser, Membership, MembershipRole, Project, Task,
    UpdateProject, UpdateTask, User,
};
use crate::store::MembershipStore;

/// sqlx-backed implementation of [`MembershipStore`]
#[derive(Clone)]
pub struct PgMembershipStore {
    pool: PgPool,
}

impl PgMembershipStore {
    /// Wraps an already-connected pool (see `crate::db::pool::create_pool`)
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn project_exists(&self, id: Uuid) -> CoreResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM projects WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }
}

#[async_trait]
impl MembershipStore for PgMembershipStore {
    async fn ping(&self) -> CoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn create_user(&self, data: CreateUser) -> CoreResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, name, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, email, name, password_hash, created_at, updated_at
            "#,
        )
        .bind(data.email)
        .bind(data.name)
        .bind(data.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| match CoreError::from(err) {
            CoreError::Conflict(_) => {
                CoreError::Conflict("a user with this email already exists".to_string())
            }
            other => other,
        })?;

        Ok(user)
    }

    async fn find_user_by_id(&self, id: Uuid) -> CoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, password_hash, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> CoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, password_hash, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create_project(&self, data: CreateProject) -> CoreResult<Project> {
        if data.name.trim().is_empty() {
            return Err(CoreError::Validation(
                "project name must not be empty".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;

        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (name, description, owner_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, owner_id, created_at, updated_at
            "#,
        )
        .bind(data.name)
        .bind(data.description)
        .bind(data.owner_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO memberships (project_id, user_id, role, created_at)
            VALUES ($1, $2, 'owner', $3)
            "#,
        )
        .bind(project.id)
        .bind(project.owner_id)
        .bind(project.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(project)
    }

    async fn get_project(&self, id: Uuid) -> CoreResult<Project> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, name, description, owner_id, created_at, updated_at
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        project.ok_or_else(|| CoreError::not_found("project"))
    }

    async fn list_projects_for_user(&self, user_id: Uuid) -> CoreResult<Vec<Project>> {
        let projects = sqlx::query_as::<_, Project>(
            r#"
            SELECT p.id, p.name, p.description, p.owner_id, p.created_at, p.updated_at
            FROM projects p
            JOIN memberships m ON m.project_id = p.id
            WHERE m.user_id = $1
            ORDER BY p.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

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

        // Build the partial UPDATE from the fields that are present
        let mut query = String::from("UPDATE projects SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", name = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, name, description, owner_id, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Project>(&query).bind(id);

        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(description) = data.description {
            // an explicit empty string clears the field
            let value = if description.is_empty() {
                None
            } else {
                Some(description)
            };
            q = q.bind(value);
        }

        let project = q.fetch_optional(&self.pool).await?;
        project.ok_or_else(|| CoreError::not_found("project"))
    }

    async fn delete_project(&self, id: Uuid) -> CoreResult<()> {
        // roster and tasks go with it via ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::not_found("project"));
        }
        Ok(())
    }

    async fn add_member(
        &self,
        project_id: Uuid,
        user_id: Uuid,
        role: MembershipRole,
    ) -> CoreResult<Membership> {
        if !self.project_exists(project_id).await? {
            return Err(CoreError::not_found("project"));
        }

        let membership = sqlx::query_as::<_, Membership>(
            r#"
            INSERT INTO memberships (project_id, user_id, role)
            VALUES ($1, $2, $3)
            RETURNING project_id, user_id, role, created_at
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .bind(role)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| match CoreError::from(err) {
            CoreError::Conflict(_) => {
                CoreError::Conflict("user is already a member of the project".to_string())
            }
            CoreError::NotFound(_) => CoreError::not_found("user"),
            other => other,
        })?;

        Ok(membership)
    }

    async fn remove_member(&self, project_id: Uuid, user_id: Uuid) -> CoreResult<()> {
        let owner_id: Option<Uuid> =
            sqlx::query_scalar("SELECT owner_id FROM projects WHERE id = $1")
                .bind(project_id)
                .fetch_optional(&self.pool)
                .await?;

        let owner_id = owner_id.ok_or_else(|| CoreError::not_found("project"))?;

        if user_id == owner_id {
            return Err(CoreError::Forbidden(
                "the project owner cannot be removed from the roster".to_string(),
            ));
        }

        let result = sqlx::query("DELETE FROM memberships WHERE project_id = $1 AND user_id = $2")
            .bind(project_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::not_found("membership"));
        }
        Ok(())
    }

    async fn list_members(&self, project_id: Uuid) -> CoreResult<Vec<Membership>> {
        if !self.project_exists(project_id).await? {
            return Err(CoreError::not_found("project"));
        }

        let memberships = sqlx::query_as::<_, Membership>(
            r#"
            SELECT project_id, user_id, role, created_at
            FROM memberships
            WHERE project_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(memberships)
    }

    async fn create_task(&self, project_id: Uuid, data: CreateTask) -> CoreResult<Task> {
        if data.title.trim().is_empty() {
            return Err(CoreError::Validation(
                "task title must not be empty".to_string(),
            ));
        }

        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (project_id, title)
            VALUES ($1, $2)
            RETURNING id, project_id, title, completed, created_at, updated_at
            "#,
        )
        .bind(project_id)
        .bind(data.title)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| match CoreError::from(err) {
            CoreError::NotFound(_) => CoreError::not_found("project"),
            other => other,
        })?;

        Ok(task)
    }

    async fn get_task(&self, project_id: Uuid, task_id: Uuid) -> CoreResult<Task> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, project_id, title, completed, created_at, updated_at
            FROM tasks
            WHERE id = $1 AND project_id = $2
            "#,
        )
        .bind(task_id)
        .bind(project_id)
        .fetch_optional(&self.pool)
        .await?;

        task.ok_or_else(|| CoreError::not_found("task"))
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

        let mut query = String::from("UPDATE tasks SET updated_at = NOW()");
        let mut bind_count = 2;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.completed.is_some() {
            bind_count += 1;
            query.push_str(&format!(", completed = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 AND project_id = $2 \
             RETURNING id, project_id, title, completed, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Task>(&query).bind(task_id).bind(project_id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(completed) = data.completed {
            q = q.bind(completed);
        }

        let task = q.fetch_optional(&self.pool).await?;
        task.ok_or_else(|| CoreError::not_found("task"))
    }

    async fn delete_task(&self, project_id: Uuid, task_id: Uuid) -> CoreResult<()> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND project_id = $2")
            .bind(task_id)
            .bind(project_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::not_found("task"));
        }
        Ok(())
    }

    async fn list_tasks(&self, project_id: Uuid) -> CoreResult<Vec<Task>> {
        if !self.project_exists(project_id).await? {
            return Err(CoreError::not_found("project"));
        }

        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, project_id, title, completed, created_at, updated_at
            FROM tasks
            WHERE project_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }
}

// The store contract is exercised end-to-end against MemoryMembershipStore
// in taskforge-core/tests/; running this backend needs a live database.
