/// Membership store: the single durable collaborator of the core
///
/// The store is handed to the managers at construction time; nothing in the
/// core probes connectivity ad hoc. All mutation funnels through one of the
/// implementations here, and every mutating call either fully applies or
/// fully fails — no partial roster or project writes are ever observable.
///
/// # Implementations
///
/// - [`PgMembershipStore`]: PostgreSQL via sqlx. Multi-row writes run in
///   transactions; uniqueness races resolve through the
///   `(project_id, user_id)` primary key.
/// - [`MemoryMembershipStore`]: in-process, one async mutex around all
///   state. Used by the test suites and available for development.
///
/// # Error contract
///
/// - `create_user`: `Conflict` on duplicate email.
/// - `create_project`: `Validation` on empty name; atomically seeds the
///   roster with the owner entry.
/// - `get_project` / `update_project` / `delete_project`: `NotFound` when
///   the project is absent.
/// - `add_member`: `Conflict` when the (project, user) pair already exists
///   — under concurrency, exactly one of two duplicate adds succeeds;
///   `NotFound` when project or user is absent.
/// - `remove_member`: `Forbidden` when the target is the project owner
///   (safety net below the authorization engine); `NotFound` when the
///   membership is absent.
/// - `list_members`: join-order (ascending join time) sequence.
/// - task operations: `Validation` on empty title, `NotFound` when the task
///   does not exist under the given project.
/// - `ping`: completes or fails within the store's bounded timeout;
///   failures surface as `Unavailable`.

mod memory;
mod postgres;

pub use memory::MemoryMembershipStore;
pub use postgres::PgMembershipStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::CoreResult;
use crate::models::{
    CreateProject, CreateTask, CreateUser, Membership, MembershipRole, Project, Task, UpdateProject,
    UpdateTask, User,
};

/// Durable record of users, projects, rosters, and tasks.
///
/// Object-safe so the API layer can hold `Arc<dyn MembershipStore>` and swap
/// backends without recompiling the managers.
#[async_trait]
pub trait MembershipStore: Send + Sync {
    /// Bounded-time health probe
    async fn ping(&self) -> CoreResult<()>;

    // --- users ---

    /// Creates a user; fails with `Conflict` if the email is taken
    async fn create_user(&self, data: CreateUser) -> CoreResult<User>;

    async fn find_user_by_id(&self, id: Uuid) -> CoreResult<Option<User>>;

    /// Email lookup, case-insensitive
    async fn find_user_by_email(&self, email: &str) -> CoreResult<Option<User>>;

    // --- projects ---

    /// Creates a project and seeds its roster with the owner entry, as one
    /// atomic write
    async fn create_project(&self, data: CreateProject) -> CoreResult<Project>;

    async fn get_project(&self, id: Uuid) -> CoreResult<Project>;

    /// Projects where the user holds a roster entry, newest first
    async fn list_projects_for_user(&self, user_id: Uuid) -> CoreResult<Vec<Project>>;

    /// Partial update; `None` fields stay unchanged, an empty description
    /// clears the field
    async fn update_project(&self, id: Uuid, data: UpdateProject) -> CoreResult<Project>;

    /// Deletes the project, cascading its roster and tasks
    async fn delete_project(&self, id: Uuid) -> CoreResult<()>;

    // --- roster ---

    async fn add_member(
        &self,
        project_id: Uuid,
        user_id: Uuid,
        role: MembershipRole,
    ) -> CoreResult<Membership>;

    async fn remove_member(&self, project_id: Uuid, user_id: Uuid) -> CoreResult<()>;

    /// Roster in join order
    async fn list_members(&self, project_id: Uuid) -> CoreResult<Vec<Membership>>;

    // --- tasks ---

    async fn create_task(&self, project_id: Uuid, data: CreateTask) -> CoreResult<Task>;

    async fn get_task(&self, project_id: Uuid, task_id: Uuid) -> CoreResult<Task>;

    async fn update_task(
        &self,
        project_id: Uuid,
        task_id: Uuid,
        data: UpdateTask,
    ) -> CoreResult<Task>;

    async fn delete_task(&self, project_id: Uuid, task_id: Uuid) -> CoreResult<()>;

    /// Tasks of a project, oldest first
    async fn list_tasks(&self, project_id: Uuid) -> CoreResult<Vec<Task>>;
}
