/// Membership model: the role-tagged roster entry linking a user to a project
///
/// # Schema
///
/// ```sql
/// CREATE TYPE membership_role AS ENUM ('owner', 'member');
///
/// CREATE TABLE memberships (
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     role membership_role NOT NULL DEFAULT 'member',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     PRIMARY KEY (project_id, user_id)
/// );
/// ```
///
/// # Invariants
///
/// - At most one membership per (project, user) pair; the primary key
///   rejects duplicates, including concurrent ones.
/// - Exactly one membership per project has role `owner`, and it matches
///   `Project::owner_id`. `MembershipStore::create_project` seeds it; no
///   other path may create or remove an owner entry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role of a user within a project roster
///
/// Historical drafts of this system used "leader" as a synonym for owner;
/// only the two canonical roles are modeled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "membership_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MembershipRole {
    /// Full authority: edit, delete, and manage the team. One per project.
    Owner,

    /// View access to the project and its tasks
    Member,
}

impl MembershipRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipRole::Owner => "owner",
            MembershipRole::Member => "member",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "owner" => Some(MembershipRole::Owner),
            "member" => Some(MembershipRole::Member),
            _ => None,
        }
    }

    pub fn is_owner(&self) -> bool {
        matches!(self, MembershipRole::Owner)
    }
}

/// A single roster entry
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Membership {
    /// Project this entry belongs to
    pub project_id: Uuid,

    /// User holding the membership (non-owning reference, lookup only)
    pub user_id: Uuid,

    /// Role within the project
    pub role: MembershipRole,

    /// Join time; roster listings are ordered by this ascending
    pub created_at: DateTime<Utc>,
}
