/// Shared helpers for the scenario tests
///
/// All scenarios run against the in-memory store; it provides the same
/// observable atomicity as the PostgreSQL backend.

use std::sync::Arc;

use taskforge_core::manager::{ProjectManager, RosterManager, TaskManager};
use taskforge_core::models::{CreateUser, User};
use taskforge_core::store::{MembershipStore, MemoryMembershipStore};

pub struct TestContext {
    pub store: Arc<dyn MembershipStore>,
    pub projects: ProjectManager,
    pub roster: RosterManager,
    pub tasks: TaskManager,
}

impl TestContext {
    pub fn new() -> Self {
        let store: Arc<dyn MembershipStore> = Arc::new(MemoryMembershipStore::new());
        Self {
            projects: ProjectManager::new(store.clone()),
            roster: RosterManager::new(store.clone()),
            tasks: TaskManager::new(store.clone()),
            store,
        }
    }

    pub async fn register(&self, name: &str, email: &str) -> User {
        self.store
            .create_user(CreateUser {
                email: email.to_string(),
                name: name.to_string(),
                password_hash: "$argon2id$test-hash".to_string(),
            })
            .await
            .expect("user creation should succeed")
    }
}
