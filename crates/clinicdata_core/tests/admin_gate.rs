use clinicdata_core::storage::ADMIN_FLAG_KEY;
use clinicdata_core::{
    AdminConfig, AdminGate, AdminMode, AuthError, KeyValueStore, MemoryKeyValueStore,
};
use std::sync::Arc;

fn gate(mode: AdminMode, secret: Option<&str>) -> (Arc<MemoryKeyValueStore>, AdminGate) {
    let store = Arc::new(MemoryKeyValueStore::new());
    let config = AdminConfig {
        mode,
        secret: secret.map(str::to_string),
    };
    (store.clone(), AdminGate::new(config, store))
}

#[test]
fn local_sign_in_with_matching_secret_sets_flag() {
    let (store, gate) = gate(AdminMode::Local, Some("front-desk"));
    assert!(!gate.is_admin().unwrap());

    gate.sign_in("front-desk").unwrap();

    assert!(gate.is_admin().unwrap());
    assert_eq!(store.get(ADMIN_FLAG_KEY).unwrap().as_deref(), Some("true"));
}

#[test]
fn wrong_or_unconfigured_secret_is_refused() {
    let (_store, configured) = gate(AdminMode::Local, Some("front-desk"));
    assert!(matches!(
        configured.sign_in("guess"),
        Err(AuthError::InvalidSecret)
    ));
    assert!(!configured.is_admin().unwrap());

    let (_store, unconfigured) = gate(AdminMode::Local, None);
    assert!(matches!(unconfigured.sign_in(""), Err(AuthError::InvalidSecret)));
}

#[test]
fn sign_out_clears_flag_and_repeats_harmlessly() {
    let (store, gate) = gate(AdminMode::Local, Some("front-desk"));
    gate.sign_in("front-desk").unwrap();

    gate.sign_out().unwrap();
    gate.sign_out().unwrap();

    assert!(!gate.is_admin().unwrap());
    assert_eq!(store.get(ADMIN_FLAG_KEY).unwrap(), None);
}

#[test]
fn sign_up_is_never_offered() {
    let (_store, local) = gate(AdminMode::Local, Some("front-desk"));
    assert!(matches!(local.sign_up(), Err(AuthError::SignUpDisabled)));

    let (_store, remote) = gate(AdminMode::Remote, None);
    assert!(matches!(remote.sign_up(), Err(AuthError::RemoteManaged)));
}

#[test]
fn remote_admin_mode_ignores_local_flag() {
    let (store, gate) = gate(AdminMode::Remote, Some("front-desk"));
    store.set(ADMIN_FLAG_KEY, "true").unwrap();

    assert!(matches!(
        gate.sign_in("front-desk"),
        Err(AuthError::RemoteManaged)
    ));
    assert!(!gate.is_admin().unwrap());
}
