// ABOUTME: Integration tests for the repository existence policy.
// ABOUTME: Reuse by default, delete-then-create with force, conflict when delete is refused.

mod support;

use hoist::credentials::Credential;
use hoist::error::{Error, ErrorKind};
use hoist::github::{EnsureAction, NewRepository, ensure_repository};
use hoist::types::RepoName;
use support::host::{FakeHost, HostCall};

fn new_repo(name: &str) -> NewRepository {
    NewRepository {
        name: RepoName::new(name).unwrap(),
        description: None,
        private: true,
    }
}

fn token() -> Credential {
    Credential::new("ghp_test_token")
}

#[tokio::test]
async fn absent_repository_is_created() {
    let host = FakeHost::new();

    let ensured = ensure_repository(&host, &token(), &new_repo("demo-app"), false)
        .await
        .unwrap();

    assert_eq!(ensured.action, EnsureAction::Created);
    assert!(ensured.created());
    assert!(host.exists("demo-app"));
    assert_eq!(
        host.calls(),
        vec![
            HostCall::Lookup("demo-app".into()),
            HostCall::Create("demo-app".into())
        ]
    );
}

#[tokio::test]
async fn existing_repository_is_reused_without_create() {
    let host = FakeHost::new().with_existing("demo-app");

    let ensured = ensure_repository(&host, &token(), &new_repo("demo-app"), false)
        .await
        .unwrap();

    assert_eq!(ensured.action, EnsureAction::Reused);
    assert!(!ensured.created());
    assert_eq!(
        ensured.repository.clone_url,
        "https://github.com/octo/demo-app.git"
    );
    assert!(
        !host
            .calls()
            .iter()
            .any(|c| matches!(c, HostCall::Create(_) | HostCall::Delete(_)))
    );
}

#[tokio::test]
async fn force_deletes_before_creating() {
    let host = FakeHost::new().with_existing("demo-app");

    let ensured = ensure_repository(&host, &token(), &new_repo("demo-app"), true)
        .await
        .unwrap();

    assert_eq!(ensured.action, EnsureAction::Recreated);
    assert!(ensured.created());
    assert_eq!(
        host.calls(),
        vec![
            HostCall::Lookup("demo-app".into()),
            HostCall::Delete("demo-app".into()),
            HostCall::Create("demo-app".into()),
        ]
    );
}

#[tokio::test]
async fn refused_delete_is_a_conflict_and_skips_create() {
    let host = FakeHost::new().with_existing("demo-app").refusing_delete();

    let err = ensure_repository(&host, &token(), &new_repo("demo-app"), true)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert!(matches!(err, Error::Conflict { ref name } if name.contains("demo-app")));
    assert!(
        !host
            .calls()
            .iter()
            .any(|c| matches!(c, HostCall::Create(_)))
    );
}

#[tokio::test]
async fn force_on_absent_repository_just_creates() {
    let host = FakeHost::new();

    let ensured = ensure_repository(&host, &token(), &new_repo("demo-app"), true)
        .await
        .unwrap();

    assert_eq!(ensured.action, EnsureAction::Created);
    assert!(
        !host
            .calls()
            .iter()
            .any(|c| matches!(c, HostCall::Delete(_)))
    );
}
