//! Integration tests for session persistence across client instances.

mod helpers;

use std::sync::Arc;

use staffhub_session::SessionStore;
use staffhub_session::backend::FileBackend;

#[tokio::test]
async fn test_session_survives_a_new_client_instance() {
    let portal = helpers::TestPortal::spawn().await;
    portal.seed_user("Ayaka", "Mori", "amori", "ROLE_USER");

    let dir = tempfile::tempdir().unwrap();
    let state_path = dir.path().join("session.json");

    let first = helpers::client_with_store(
        &portal,
        SessionStore::new(Arc::new(FileBackend::new(state_path.clone()))),
    );
    helpers::login_as(&first, "amori").await;
    drop(first);

    // A fresh client over the same state file picks the session up.
    let second = helpers::client_with_store(
        &portal,
        SessionStore::new(Arc::new(FileBackend::new(state_path))),
    );
    assert!(second.guard.check().await.unwrap().is_allowed());
    let cached = second.manager.user().await.unwrap().unwrap();
    assert_eq!(cached.username, "amori");
}

#[tokio::test]
async fn test_logout_removes_the_state_file() {
    let portal = helpers::TestPortal::spawn().await;
    portal.seed_user("Ayaka", "Mori", "amori", "ROLE_USER");

    let dir = tempfile::tempdir().unwrap();
    let state_path = dir.path().join("session.json");

    let client = helpers::client_with_store(
        &portal,
        SessionStore::new(Arc::new(FileBackend::new(state_path.clone()))),
    );
    helpers::login_as(&client, "amori").await;
    assert!(state_path.exists());

    client.manager.log_out().await.unwrap();
    assert!(!state_path.exists());
}

#[tokio::test]
async fn test_cached_directory_is_shared_across_instances() {
    let portal = helpers::TestPortal::spawn().await;
    portal.seed_user("Ayaka", "Mori", "amori", "ROLE_ADMIN");
    portal.seed_user("Kenji", "Sato", "ksato", "ROLE_USER");

    let dir = tempfile::tempdir().unwrap();
    let state_path = dir.path().join("session.json");

    let first = helpers::client_with_store(
        &portal,
        SessionStore::new(Arc::new(FileBackend::new(state_path.clone()))),
    );
    helpers::login_as(&first, "amori").await;
    first.directory.load_users().await.unwrap();
    drop(first);

    let second = helpers::client_with_store(
        &portal,
        SessionStore::new(Arc::new(FileBackend::new(state_path))),
    );
    let cached = second.directory.cached_users().await.unwrap();
    assert_eq!(cached.len(), 2);
    assert_eq!(portal.list_fetch_count(), 1);
}

#[tokio::test]
async fn test_corrupt_state_file_reads_as_logged_out() {
    let portal = helpers::TestPortal::spawn().await;
    portal.seed_user("Ayaka", "Mori", "amori", "ROLE_USER");

    let dir = tempfile::tempdir().unwrap();
    let state_path = dir.path().join("session.json");
    std::fs::write(&state_path, "{ not json").unwrap();

    let client = helpers::client_with_store(
        &portal,
        SessionStore::new(Arc::new(FileBackend::new(state_path))),
    );
    assert!(!client.guard.check().await.unwrap().is_allowed());

    // A fresh login writes a clean document over the corrupt one.
    helpers::login_as(&client, "amori").await;
    assert!(client.guard.check().await.unwrap().is_allowed());
}

#[tokio::test]
async fn test_claims_expose_subject_and_expiry() {
    let portal = helpers::TestPortal::spawn().await;
    portal.seed_user("Ayaka", "Mori", "amori", "ROLE_USER");
    let client = helpers::client_for(&portal);
    helpers::login_as(&client, "amori").await;

    let claims = client.manager.claims().await.unwrap().unwrap();
    assert_eq!(claims.sub, "amori");
    assert!(claims.has_subject());
    assert!(!claims.is_expired());
    assert!(claims.expires_at().is_some());
}

#[tokio::test]
async fn test_memory_sessions_are_isolated() {
    let portal = helpers::TestPortal::spawn().await;
    portal.seed_user("Ayaka", "Mori", "amori", "ROLE_USER");

    let signed_in = helpers::client_for(&portal);
    let other = helpers::client_for(&portal);
    helpers::login_as(&signed_in, "amori").await;

    assert!(signed_in.guard.check().await.unwrap().is_allowed());
    assert!(!other.guard.check().await.unwrap().is_allowed());
}
