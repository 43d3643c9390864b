/// Project lifecycle tests
///
/// Covers the create → update → delete flow end to end, including partial
/// update semantics, cascade deletion of roster and tasks, and the classic
/// two-user collaboration scenario.

mod common;

use common::TestContext;
use taskforge_core::error::CoreError;
use taskforge_core::models::{CreateTask, MembershipRole, UpdateProject, UpdateTask};
use taskforge_core::store::MembershipStore;

#[tokio::test]
async fn test_two_user_collaboration_flow() {
    let ctx = TestContext::new();
    let u1 = ctx.register("U1", "u1@example.com").await;
    let u2 = ctx.register("U2", "u2@example.com").await;

    // U1 creates "Alpha"; the roster starts as the owner entry alone
    let project = ctx
        .projects
        .create(u1.id, "Alpha".to_string(), None)
        .await
        .unwrap();
    let roster = ctx.roster.list(project.id, u1.id).await.unwrap();
    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0].user_id, u1.id);
    assert!(roster[0].role.is_owner());

    // U1 adds U2 as member
    ctx.roster
        .add_member(project.id, u1.id, "u2@example.com", MembershipRole::Member)
        .await
        .unwrap();
    let roster = ctx.roster.list(project.id, u2.id).await.unwrap();
    assert_eq!(roster.len(), 2);
    assert_eq!(roster[1].user_id, u2.id);
    assert_eq!(roster[1].role, MembershipRole::Member);

    // U2 leaves a task behind
    ctx.tasks
        .create(
            project.id,
            u2.id,
            CreateTask {
                title: "Write the launch notes".to_string(),
            },
        )
        .await
        .unwrap();

    // U2 tries to remove U1 and is refused
    let err = ctx
        .roster
        .remove_member(project.id, u2.id, u1.id)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Forbidden(_)));

    // U1 removes U2; roster shrinks back to the owner entry
    let roster = ctx
        .roster
        .remove_member(project.id, u1.id, u2.id)
        .await
        .unwrap();
    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0].user_id, u1.id);

    // U1 deletes the project; everything tied to it is gone
    ctx.projects.delete(u1.id, project.id).await.unwrap();

    let err = ctx.store.get_project(project.id).await.unwrap_err();
    assert!(matches!(err, CoreError::NotFound(_)));

    let err = ctx.store.list_tasks(project.id).await.unwrap_err();
    assert!(matches!(err, CoreError::NotFound(_)));
}

#[tokio::test]
async fn test_partial_update_semantics() {
    let ctx = TestContext::new();
    let owner = ctx.register("Owner", "owner@example.com").await;

    let project = ctx
        .projects
        .create(owner.id, "Alpha".to_string(), Some("first draft".to_string()))
        .await
        .unwrap();

    // an empty update leaves everything unchanged
    let unchanged = ctx
        .projects
        .update(owner.id, project.id, UpdateProject::default())
        .await
        .unwrap();
    assert_eq!(unchanged.name, "Alpha");
    assert_eq!(unchanged.description.as_deref(), Some("first draft"));

    // an explicit empty description clears the field, name untouched
    let cleared = ctx
        .projects
        .update(
            owner.id,
            project.id,
            UpdateProject {
                name: None,
                description: Some(String::new()),
            },
        )
        .await
        .unwrap();
    assert_eq!(cleared.name, "Alpha");
    assert_eq!(cleared.description, None);

    // renaming leaves the (cleared) description alone
    let renamed = ctx
        .projects
        .update(
            owner.id,
            project.id,
            UpdateProject {
                name: Some("Alpha v2".to_string()),
                description: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.name, "Alpha v2");
    assert_eq!(renamed.description, None);
}

#[tokio::test]
async fn test_update_rejects_empty_name() {
    let ctx = TestContext::new();
    let owner = ctx.register("Owner", "owner@example.com").await;
    let project = ctx
        .projects
        .create(owner.id, "Alpha".to_string(), None)
        .await
        .unwrap();

    let err = ctx
        .projects
        .update(
            owner.id,
            project.id,
            UpdateProject {
                name: Some("  ".to_string()),
                description: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));
}

#[tokio::test]
async fn test_members_cannot_edit_or_delete_project() {
    let ctx = TestContext::new();
    let owner = ctx.register("Owner", "owner@example.com").await;
    let member = ctx.register("Member", "member@example.com").await;

    let project = ctx
        .projects
        .create(owner.id, "Alpha".to_string(), None)
        .await
        .unwrap();
    ctx.roster
        .add_member(project.id, owner.id, "member@example.com", MembershipRole::Member)
        .await
        .unwrap();

    let err = ctx
        .projects
        .update(
            member.id,
            project.id,
            UpdateProject {
                name: Some("Hijacked".to_string()),
                description: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Forbidden(_)));

    let err = ctx.projects.delete(member.id, project.id).await.unwrap_err();
    assert!(matches!(err, CoreError::Forbidden(_)));

    // but the member can still view it
    let seen = ctx.projects.get(member.id, project.id).await.unwrap();
    assert_eq!(seen.name, "Alpha");
}

#[tokio::test]
async fn test_outsider_cannot_view_project() {
    let ctx = TestContext::new();
    let owner = ctx.register("Owner", "owner@example.com").await;
    let outsider = ctx.register("Outsider", "outsider@example.com").await;

    let project = ctx
        .projects
        .create(owner.id, "Alpha".to_string(), None)
        .await
        .unwrap();

    let err = ctx.projects.get(outsider.id, project.id).await.unwrap_err();
    assert!(matches!(err, CoreError::Forbidden(_)));
}

#[tokio::test]
async fn test_list_for_returns_only_joined_projects() {
    let ctx = TestContext::new();
    let u1 = ctx.register("U1", "u1@example.com").await;
    let u2 = ctx.register("U2", "u2@example.com").await;

    let alpha = ctx
        .projects
        .create(u1.id, "Alpha".to_string(), None)
        .await
        .unwrap();
    let _beta = ctx
        .projects
        .create(u1.id, "Beta".to_string(), None)
        .await
        .unwrap();

    ctx.roster
        .add_member(alpha.id, u1.id, "u2@example.com", MembershipRole::Member)
        .await
        .unwrap();

    assert_eq!(ctx.projects.list_for(u1.id).await.unwrap().len(), 2);

    let visible_to_u2 = ctx.projects.list_for(u2.id).await.unwrap();
    assert_eq!(visible_to_u2.len(), 1);
    assert_eq!(visible_to_u2[0].id, alpha.id);
}

#[tokio::test]
async fn test_task_flow_within_project() {
    let ctx = TestContext::new();
    let owner = ctx.register("Owner", "owner@example.com").await;
    let member = ctx.register("Member", "member@example.com").await;
    let outsider = ctx.register("Outsider", "outsider@example.com").await;

    let project = ctx
        .projects
        .create(owner.id, "Alpha".to_string(), None)
        .await
        .unwrap();
    ctx.roster
        .add_member(project.id, owner.id, "member@example.com", MembershipRole::Member)
        .await
        .unwrap();

    // members manage tasks freely
    let task = ctx
        .tasks
        .create(
            project.id,
            member.id,
            CreateTask {
                title: "Sketch the data model".to_string(),
            },
        )
        .await
        .unwrap();
    assert!(!task.completed);

    let done = ctx
        .tasks
        .update(
            project.id,
            task.id,
            owner.id,
            UpdateTask {
                title: None,
                completed: Some(true),
            },
        )
        .await
        .unwrap();
    assert!(done.completed);
    assert_eq!(done.title, "Sketch the data model");

    // outsiders see and touch nothing
    let err = ctx.tasks.list(project.id, outsider.id).await.unwrap_err();
    assert!(matches!(err, CoreError::Forbidden(_)));

    // empty titles are rejected
    let err = ctx
        .tasks
        .create(
            project.id,
            member.id,
            CreateTask {
                title: "  ".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));

    // deleting one task leaves the rest alone
    let second = ctx
        .tasks
        .create(
            project.id,
            member.id,
            CreateTask {
                title: "Another".to_string(),
            },
        )
        .await
        .unwrap();
    ctx.tasks.delete(project.id, task.id, member.id).await.unwrap();

    let remaining = ctx.tasks.list(project.id, member.id).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, second.id);
}

#[tokio::test]
async fn test_create_project_rejects_empty_name() {
    let ctx = TestContext::new();
    let owner = ctx.register("Owner", "owner@example.com").await;

    let err = ctx
        .projects
        .create(owner.id, "".to_string(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));
}
