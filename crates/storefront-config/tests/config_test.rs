#![allow(clippy::unwrap_used)]
// Config file loading and session storage wiring.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use storefront_config::{
    ConfigError, FileStorage, SessionBackend, init_config, load_config_from, open_session_storage,
    profile_to_storefront_config,
};
use secrecy::SecretString;
use storefront_core::{Session, SessionStorage, SessionStore, User};

#[test]
fn loads_profiles_from_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
default_profile = "staging"

[defaults]
output = "json"
timeout_secs = 20

[profiles.staging]
backend_url = "https://staging.shop.example"
session_backend = "memory"
logout_on_unauthorized = false
"#,
    )
    .unwrap();

    let cfg = load_config_from(&path).unwrap();
    assert_eq!(cfg.defaults.output, "json");
    assert_eq!(cfg.defaults.color, "auto");

    let (name, profile) = cfg.resolve_profile(None).unwrap();
    assert_eq!(name, "staging");
    assert_eq!(profile.session_backend, SessionBackend::Memory);

    let runtime = profile_to_storefront_config(&profile, &cfg.defaults).unwrap();
    assert_eq!(runtime.base_url.host_str(), Some("staging.shop.example"));
    assert_eq!(runtime.timeout, Some(std::time::Duration::from_secs(20)));
    assert!(!runtime.logout_on_unauthorized);
}

#[test]
fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(cfg.default_profile.as_deref(), Some("default"));
    assert!(cfg.profiles.is_empty());
}

#[test]
fn malformed_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "profiles = 3").unwrap();
    assert!(matches!(
        load_config_from(&path).unwrap_err(),
        ConfigError::Figment(_)
    ));
}

#[test]
fn init_writes_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    init_config(&path).unwrap();
    let cfg = load_config_from(&path).unwrap();
    assert!(cfg.profiles.contains_key("default"));

    assert!(matches!(
        init_config(&path).unwrap_err(),
        ConfigError::AlreadyExists(_)
    ));
}

#[test]
fn memory_backend_starts_empty() {
    let storage = open_session_storage(SessionBackend::Memory, "default");
    let store = SessionStore::new(storage);
    assert!(store.hydrate().is_none());
}

#[test]
fn file_storage_backs_the_session_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let storage: Arc<dyn SessionStorage> = Arc::new(FileStorage::new(&path));

    let store = SessionStore::new(storage);
    store
        .install(Session::new(
            SecretString::from("tok".to_string()),
            User {
                id: "u1".into(),
                name: "Ada".into(),
                email: "ada@example.com".into(),
            },
        ))
        .unwrap();

    let reopened = SessionStore::new(Arc::new(FileStorage::new(&path)));
    assert_eq!(reopened.hydrate().unwrap().user().name, "Ada");

    reopened.clear();
    assert!(!path.exists());
}

#[test]
fn corrupt_session_file_is_repaired_and_login_still_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, "{oops").unwrap();

    let store = SessionStore::new(Arc::new(FileStorage::new(&path)));
    assert!(store.hydrate().is_none());
    assert!(!path.exists());

    store
        .install(Session::new(
            SecretString::from("tok".to_string()),
            User {
                id: "u1".into(),
                name: "Ada".into(),
                email: "ada@example.com".into(),
            },
        ))
        .unwrap();

    let reopened = SessionStore::new(Arc::new(FileStorage::new(&path)));
    assert_eq!(reopened.hydrate().unwrap().user().email, "ada@example.com");
}
