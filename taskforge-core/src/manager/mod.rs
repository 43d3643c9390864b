/// Managers: orchestration over the store and the authorization engine
///
/// Each manager holds the store as a construction-time collaborator and
/// follows the same discipline for every mutating operation:
///
/// 1. re-fetch current persisted state (no stale-state authorization),
/// 2. ask `crate::authz` for a permit,
/// 3. apply the change through a single atomic store call.
///
/// - `ProjectManager`: project lifecycle (create → active → deleted)
/// - `RosterManager`: team membership (add / remove / list)
/// - `TaskManager`: per-project task operations

mod project;
mod roster;
mod task;

pub use project::ProjectManager;
pub use roster::RosterManager;
pub use task::TaskManager;
