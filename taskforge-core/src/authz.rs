/// Authorization engine: pure decision functions over project state
///
/// Every decision is a deterministic function of `(actor, project, roster)`
/// with no hidden state and no I/O, which keeps the whole permission model
/// table-testable. Callers (the managers) are responsible for loading fresh
/// state before asking for a permit.
///
/// # Permission model
///
/// - **Owner**: the single identity with full authority over a project.
///   May view, edit, delete, and manage the team.
/// - **Member**: any identity with a roster entry. May view the project and
///   its tasks; may never edit or delete the project, or touch the roster.
///
/// Adding a member can only grant viewing rights; it never removes them from
/// anyone already on the roster.

use uuid::Uuid;

use crate::models::{Membership, Project};

/// Whether the actor may view the project and its tasks.
///
/// True iff the actor is the owner or present in the roster. The owner also
/// holds an explicit roster entry, so the owner check is redundant for
/// well-formed state; it is kept because the decision is defined over both
/// inputs, not over the seeding discipline of any particular store.
pub fn can_view(actor: Uuid, project: &Project, roster: &[Membership]) -> bool {
    project.owner_id == actor || roster.iter().any(|m| m.user_id == actor)
}

/// Whether the actor may change the project's name or description.
///
/// Owner only; editing by non-owner members is never permitted.
pub fn can_edit_project(actor: Uuid, project: &Project) -> bool {
    project.owner_id == actor
}

/// Whether the actor may delete the project (and thereby its roster and
/// tasks).
pub fn can_delete_project(actor: Uuid, project: &Project) -> bool {
    project.owner_id == actor
}

/// Whether the actor may add or remove roster entries.
pub fn can_manage_roster(actor: Uuid, project: &Project) -> bool {
    project.owner_id == actor
}

/// Whether the actor may remove `target` from the roster.
///
/// True iff the actor is the owner AND the target is not the owner: removing
/// the owner is forbidden regardless of who attempts it, including the owner
/// themselves.
pub fn can_remove_member(actor: Uuid, target: Uuid, project: &Project) -> bool {
    project.owner_id == actor && target != project.owner_id
}
