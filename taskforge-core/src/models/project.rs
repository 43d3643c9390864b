/// Project model
///
/// # Schema
///
/// ```sql
/// CREATE TABLE projects (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     description TEXT,
///     owner_id UUID NOT NULL REFERENCES users(id),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// A project has exactly one owner, fixed at creation. The owner also holds
/// an explicit `owner` entry in the roster, seeded atomically by
/// `MembershipStore::create_project`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A project with its single owner
///
/// The roster lives in the memberships table and is loaded separately via
/// `MembershipStore::list_members`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    /// Unique project ID (UUID v4)
    pub id: Uuid,

    /// Project name, never empty
    pub name: String,

    /// Optional free-form description
    pub description: Option<String>,

    /// The identity with full authority over the project; immutable
    pub owner_id: Uuid,

    /// When the project was created
    pub created_at: DateTime<Utc>,

    /// When the project was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new project
#[derive(Debug, Clone)]
pub struct CreateProject {
    /// Project name; must be non-empty after trimming
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// The creator, who becomes owner
    pub owner_id: Uuid,
}

/// Partial update for a project
///
/// `None` means "leave unchanged". `Some("")` for the description clears it;
/// a provided name must be non-empty.
#[derive(Debug, Clone, Default)]
pub struct UpdateProject {
    /// New name
    pub name: Option<String>,

    /// New description; an empty string clears the field
    pub description: Option<String>,
}

impl UpdateProject {
    /// True when the update would change nothing
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_project_default_is_empty() {
        assert!(UpdateProject::default().is_empty());
        assert!(!UpdateProject {
            name: Some("Renamed".to_string()),
            description: None,
        }
        .is_empty());
        // an explicit empty description is an update (it clears the field)
        assert!(!UpdateProject {
            name: None,
            description: Some(String::new()),
        }
        .is_empty());
    }
}
