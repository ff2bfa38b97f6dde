use market_client::session::{
    FilesystemSessionStore, MemorySessionStore, NoSession, SessionAccessor, SESSION_FILE_NAME,
};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_update_and_snapshot() {
    let temp_dir = TempDir::new().unwrap();
    let store = FilesystemSessionStore::new(temp_dir.path().join("market-client"));

    store.update(Some("abc"), Some("bs")).unwrap();

    let snapshot = store.snapshot();
    assert_eq!(snapshot.token(), Some("abc"));
    assert_eq!(snapshot.locale_code(), Some("bs"));
}

#[test]
fn test_missing_file_is_empty_session() {
    let temp_dir = TempDir::new().unwrap();
    let store = FilesystemSessionStore::new(temp_dir.path());

    let snapshot = store.snapshot();
    assert!(snapshot.token().is_none());
    assert!(snapshot.locale_code().is_none());
    assert!(!store.is_unauthorized());
}

#[test]
fn test_corrupt_file_is_empty_session() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join(SESSION_FILE_NAME), "{not json").unwrap();
    let store = FilesystemSessionStore::new(temp_dir.path());

    assert!(!store.snapshot().has_token());
}

#[test]
fn test_logout_keeps_locale() {
    let temp_dir = TempDir::new().unwrap();
    let store = FilesystemSessionStore::new(temp_dir.path());
    store.update(Some("abc"), Some("en")).unwrap();

    store.logout();

    let reloaded = FilesystemSessionStore::new(temp_dir.path()).snapshot();
    assert!(reloaded.token().is_none());
    assert_eq!(reloaded.locale_code(), Some("en"));
}

#[test]
fn test_unauthorized_flag_persists_and_login_clears_it() {
    let temp_dir = TempDir::new().unwrap();
    let store = FilesystemSessionStore::new(temp_dir.path());
    store.update(Some("abc"), None).unwrap();

    store.set_unauthorized(true);
    assert!(FilesystemSessionStore::new(temp_dir.path()).is_unauthorized());

    store.update(Some("fresh"), None).unwrap();
    assert!(!store.is_unauthorized());
}

#[test]
fn test_update_keeps_unset_fields() {
    let temp_dir = TempDir::new().unwrap();
    let store = FilesystemSessionStore::new(temp_dir.path());
    store.update(Some("abc"), Some("bs")).unwrap();

    store.update(None, Some("en")).unwrap();

    let snapshot = store.snapshot();
    assert_eq!(snapshot.token(), Some("abc"));
    assert_eq!(snapshot.locale_code(), Some("en"));
}

#[test]
fn test_clear_removes_file() {
    let temp_dir = TempDir::new().unwrap();
    let store = FilesystemSessionStore::new(temp_dir.path());
    store.update(Some("abc"), None).unwrap();

    store.clear().unwrap();

    assert!(!temp_dir.path().join(SESSION_FILE_NAME).exists());
    assert!(!store.snapshot().has_token());
    // clearing twice is fine
    store.clear().unwrap();
}

#[test]
fn test_snapshot_is_served_from_memory() {
    let temp_dir = TempDir::new().unwrap();
    let store = FilesystemSessionStore::new(temp_dir.path());
    store.update(Some("abc"), Some("bs")).unwrap();
    assert!(store.snapshot().has_token());

    // later reads do not go back to disk
    fs::remove_file(temp_dir.path().join(SESSION_FILE_NAME)).unwrap();
    assert_eq!(store.snapshot().token(), Some("abc"));
    assert!(!store.is_unauthorized());

    // an explicit reload picks up the change
    store.load();
    assert!(!store.snapshot().has_token());
}

#[test]
fn test_cached_logout_is_written_through() {
    let temp_dir = TempDir::new().unwrap();
    let writer = FilesystemSessionStore::new(temp_dir.path());
    writer.update(Some("abc"), Some("bs")).unwrap();

    let store = FilesystemSessionStore::new(temp_dir.path());
    assert!(store.snapshot().has_token());
    store.logout();
    store.set_unauthorized(true);

    let fresh = FilesystemSessionStore::new(temp_dir.path());
    assert!(!fresh.snapshot().has_token());
    assert_eq!(fresh.snapshot().locale_code(), Some("bs"));
    assert!(fresh.is_unauthorized());
}

#[test]
fn test_memory_store_login_and_logout() {
    let store = MemorySessionStore::new();
    assert!(!store.snapshot().has_token());

    store.login("abc");
    store.set_locale("bs");
    assert_eq!(store.snapshot().token(), Some("abc"));

    store.logout();
    assert!(!store.snapshot().has_token());
    assert_eq!(store.snapshot().locale_code(), Some("bs"));
    assert_eq!(store.logout_count(), 1);
}

#[test]
fn test_no_session_is_always_empty() {
    let session = NoSession;
    session.set_unauthorized(true);
    session.logout();
    assert_eq!(session.snapshot(), Default::default());
    assert!(!session.is_unauthorized());
}
