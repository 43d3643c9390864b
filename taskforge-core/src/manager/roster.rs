/// Team roster manager
///
/// Adds and removes members on behalf of an actor. The engine decides
/// permits over freshly loaded state; the store enforces the duplicate and
/// owner-removal rules a second time at the write, so a racing request can
/// never slip past a stale check.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::authz;
use crate::error::{CoreError, CoreResult};
use crate::models::{Membership, MembershipRole};
use crate::store::MembershipStore;

/// Orchestrates add/remove/list of team members
#[derive(Clone)]
pub struct RosterManager {
    store: Arc<dyn MembershipStore>,
}

impl RosterManager {
    pub fn new(store: Arc<dyn MembershipStore>) -> Self {
        Self { store }
    }

    /// Adds the user with the given email to the project roster.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the project or the target user does not exist
    /// - `Forbidden` if the actor may not manage the roster
    /// - `Conflict` if the target is already a member, or is the owner
    ///   (the owner is already implicitly a member)
    /// - `Validation` if the requested role is `Owner` (a project has
    ///   exactly one owner, fixed at creation)
    pub async fn add_member(
        &self,
        project_id: Uuid,
        actor: Uuid,
        email: &str,
        role: MembershipRole,
    ) -> CoreResult<Membership> {
        let project = self.store.get_project(project_id).await?;

        if !authz::can_manage_roster(actor, &project) {
            return Err(CoreError::Forbidden(
                "only the project owner may manage the team".to_string(),
            ));
        }

        if role.is_owner() {
            return Err(CoreError::Validation(
                "a project has exactly one owner; additional members must have the member role"
                    .to_string(),
            ));
        }

        let target = self
            .store
            .find_user_by_email(email)
            .await?
            .ok_or_else(|| CoreError::not_found("user"))?;

        if target.id == project.owner_id {
            return Err(CoreError::Conflict(
                "the owner is already a member of the project".to_string(),
            ));
        }

        let membership = self.store.add_member(project_id, target.id, role).await?;
        info!(project_id = %project_id, user_id = %target.id, "team member added");
        Ok(membership)
    }

    /// Removes the target user from the roster and returns the updated
    /// roster.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the project or the membership does not exist
    /// - `Forbidden` if the actor may not manage the roster, or the target
    ///   is the owner (owner removal is forbidden regardless of actor)
    pub async fn remove_member(
        &self,
        project_id: Uuid,
        actor: Uuid,
        target: Uuid,
    ) -> CoreResult<Vec<Membership>> {
        let project = self.store.get_project(project_id).await?;

        if !authz::can_manage_roster(actor, &project) {
            return Err(CoreError::Forbidden(
                "only the project owner may manage the team".to_string(),
            ));
        }

        if !authz::can_remove_member(actor, target, &project) {
            warn!(project_id = %project_id, actor_id = %actor, "owner removal attempt rejected");
            return Err(CoreError::Forbidden(
                "the project owner cannot be removed from the roster".to_string(),
            ));
        }

        self.store.remove_member(project_id, target).await?;
        info!(project_id = %project_id, user_id = %target, "team member removed");

        self.store.list_members(project_id).await
    }

    /// Lists the roster in join order; any member may look.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the project does not exist
    /// - `Forbidden` if the actor is neither owner nor member
    pub async fn list(&self, project_id: Uuid, actor: Uuid) -> CoreResult<Vec<Membership>> {
        let project = self.store.get_project(project_id).await?;
        let roster = self.store.list_members(project_id).await?;

        if !authz::can_view(actor, &project, &roster) {
            return Err(CoreError::Forbidden(
                "you are not a member of this project".to_string(),
            ));
        }

        Ok(roster)
    }
}
