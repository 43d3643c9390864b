/// Roster invariant tests
///
/// Verifies the membership model holds its invariants through the managers:
/// a single owner entry per project, duplicate rejection (sequential and
/// concurrent), owner-removal protection, and stable join-order listings.

mod common;

use common::TestContext;
use taskforge_core::error::CoreError;
use taskforge_core::models::MembershipRole;
use taskforge_core::store::MembershipStore;

#[tokio::test]
async fn test_exactly_one_owner_entry_survives_roster_churn() {
    let ctx = TestContext::new();
    let owner = ctx.register("Owner", "owner@example.com").await;
    let u2 = ctx.register("U2", "u2@example.com").await;
    let u3 = ctx.register("U3", "u3@example.com").await;

    let project = ctx
        .projects
        .create(owner.id, "Alpha".to_string(), None)
        .await
        .unwrap();

    ctx.roster
        .add_member(project.id, owner.id, "u2@example.com", MembershipRole::Member)
        .await
        .unwrap();
    ctx.roster
        .add_member(project.id, owner.id, "u3@example.com", MembershipRole::Member)
        .await
        .unwrap();
    ctx.roster
        .remove_member(project.id, owner.id, u2.id)
        .await
        .unwrap();

    let roster = ctx.roster.list(project.id, owner.id).await.unwrap();
    let owners: Vec<_> = roster.iter().filter(|m| m.role.is_owner()).collect();
    assert_eq!(owners.len(), 1);
    assert_eq!(owners[0].user_id, project.owner_id);
    assert!(roster.iter().any(|m| m.user_id == u3.id));
    assert!(!roster.iter().any(|m| m.user_id == u2.id));
}

#[tokio::test]
async fn test_duplicate_add_is_conflict() {
    let ctx = TestContext::new();
    let owner = ctx.register("Owner", "owner@example.com").await;
    ctx.register("U2", "u2@example.com").await;

    let project = ctx
        .projects
        .create(owner.id, "Alpha".to_string(), None)
        .await
        .unwrap();

    ctx.roster
        .add_member(project.id, owner.id, "u2@example.com", MembershipRole::Member)
        .await
        .unwrap();

    let err = ctx
        .roster
        .add_member(project.id, owner.id, "u2@example.com", MembershipRole::Member)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Conflict(_)));
}

#[tokio::test]
async fn test_concurrent_duplicate_add_exactly_one_succeeds() {
    let ctx = TestContext::new();
    let owner = ctx.register("Owner", "owner@example.com").await;
    let u2 = ctx.register("U2", "u2@example.com").await;

    let project = ctx
        .projects
        .create(owner.id, "Alpha".to_string(), None)
        .await
        .unwrap();

    let first = ctx
        .roster
        .add_member(project.id, owner.id, "u2@example.com", MembershipRole::Member);
    let second = ctx
        .roster
        .add_member(project.id, owner.id, "u2@example.com", MembershipRole::Member);

    let (a, b) = tokio::join!(first, second);
    let successes = [&a, &b].iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one concurrent add may succeed");

    let conflict = if a.is_err() { a.unwrap_err() } else { b.unwrap_err() };
    assert!(matches!(conflict, CoreError::Conflict(_)));

    let roster = ctx.roster.list(project.id, owner.id).await.unwrap();
    let occurrences = roster.iter().filter(|m| m.user_id == u2.id).count();
    assert_eq!(occurrences, 1);
}

#[tokio::test]
async fn test_owner_removal_forbidden_for_every_actor() {
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

    // the member may not touch the roster at all
    let err = ctx
        .roster
        .remove_member(project.id, member.id, owner.id)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Forbidden(_)));

    // the owner may not remove themselves either
    let err = ctx
        .roster
        .remove_member(project.id, owner.id, owner.id)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Forbidden(_)));

    // and the store refuses even a direct owner removal
    let err = ctx
        .store
        .remove_member(project.id, owner.id)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Forbidden(_)));
}

#[tokio::test]
async fn test_adding_the_owner_is_conflict() {
    let ctx = TestContext::new();
    let owner = ctx.register("Owner", "owner@example.com").await;

    let project = ctx
        .projects
        .create(owner.id, "Alpha".to_string(), None)
        .await
        .unwrap();

    let err = ctx
        .roster
        .add_member(project.id, owner.id, "owner@example.com", MembershipRole::Member)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Conflict(_)));
}

#[tokio::test]
async fn test_second_owner_role_rejected() {
    let ctx = TestContext::new();
    let owner = ctx.register("Owner", "owner@example.com").await;
    ctx.register("U2", "u2@example.com").await;

    let project = ctx
        .projects
        .create(owner.id, "Alpha".to_string(), None)
        .await
        .unwrap();

    let err = ctx
        .roster
        .add_member(project.id, owner.id, "u2@example.com", MembershipRole::Owner)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));
}

#[tokio::test]
async fn test_non_owner_cannot_manage_roster() {
    let ctx = TestContext::new();
    let owner = ctx.register("Owner", "owner@example.com").await;
    let member = ctx.register("Member", "member@example.com").await;
    ctx.register("U3", "u3@example.com").await;

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
        .roster
        .add_member(project.id, member.id, "u3@example.com", MembershipRole::Member)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Forbidden(_)));
}

#[tokio::test]
async fn test_add_unknown_email_is_not_found() {
    let ctx = TestContext::new();
    let owner = ctx.register("Owner", "owner@example.com").await;

    let project = ctx
        .projects
        .create(owner.id, "Alpha".to_string(), None)
        .await
        .unwrap();

    let err = ctx
        .roster
        .add_member(project.id, owner.id, "nobody@example.com", MembershipRole::Member)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::NotFound(_)));
}

#[tokio::test]
async fn test_remove_absent_member_is_not_found() {
    let ctx = TestContext::new();
    let owner = ctx.register("Owner", "owner@example.com").await;
    let stranger = ctx.register("Stranger", "stranger@example.com").await;

    let project = ctx
        .projects
        .create(owner.id, "Alpha".to_string(), None)
        .await
        .unwrap();

    let err = ctx
        .roster
        .remove_member(project.id, owner.id, stranger.id)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::NotFound(_)));
}

#[tokio::test]
async fn test_roster_listed_in_join_order() {
    let ctx = TestContext::new();
    let owner = ctx.register("Owner", "owner@example.com").await;
    let u2 = ctx.register("U2", "u2@example.com").await;
    let u3 = ctx.register("U3", "u3@example.com").await;
    let u4 = ctx.register("U4", "u4@example.com").await;

    let project = ctx
        .projects
        .create(owner.id, "Alpha".to_string(), None)
        .await
        .unwrap();

    for email in ["u2@example.com", "u3@example.com", "u4@example.com"] {
        ctx.roster
            .add_member(project.id, owner.id, email, MembershipRole::Member)
            .await
            .unwrap();
    }

    let roster = ctx.roster.list(project.id, owner.id).await.unwrap();
    let order: Vec<_> = roster.iter().map(|m| m.user_id).collect();
    assert_eq!(order, vec![owner.id, u2.id, u3.id, u4.id]);

    // members can read the roster too
    let seen_by_member = ctx.roster.list(project.id, u3.id).await.unwrap();
    assert_eq!(seen_by_member.len(), 4);
}

#[tokio::test]
async fn test_outsider_cannot_list_roster() {
    let ctx = TestContext::new();
    let owner = ctx.register("Owner", "owner@example.com").await;
    let outsider = ctx.register("Outsider", "outsider@example.com").await;

    let project = ctx
        .projects
        .create(owner.id, "Alpha".to_string(), None)
        .await
        .unwrap();

    let err = ctx.roster.list(project.id, outsider.id).await.unwrap_err();
    assert!(matches!(err, CoreError::Forbidden(_)));
}
