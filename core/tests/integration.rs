//! End-to-end resolution against stand-in executables.
//!
//! # Design
//! Writes shell scripts that mimic `defaults` and `managedsoftwareupdate`
//! into a temporary directory, points `FactsConfig` at them, then resolves
//! facts through `SystemExecutor` so real processes are spawned and their
//! stdout flows through the parsers.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use munki_facts_core::{
    Fact, FactRegistry, FactValue, FactsConfig, HostInfo, SystemExecutor, VersionInfo,
};
use tempfile::TempDir;

/// Held for the whole test: a script still open for writing in one thread
/// can leak into a child forked by another and fail exec with ETXTBSY.
static SCRIPTS: Mutex<()> = Mutex::new(());

fn serial() -> MutexGuard<'static, ()> {
    SCRIPTS.lock().unwrap_or_else(|e| e.into_inner())
}

fn write_script(dir: &Path, name: &str, body: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path.to_str().unwrap().to_string()
}

/// A `defaults` stand-in that only answers for the expected domain and key.
fn fake_defaults(dir: &Path) -> String {
    write_script(
        dir,
        "defaults",
        r#"if [ "$1" = "read" ] && [ "$2" = "/Library/Preferences/ManagedInstalls" ] && [ "$3" = "AdditionalHttpHeaders" ]; then
cat <<'PLIST'
(
    "Authorization: Bearer xyz",
    "X-Custom: 1"
)
PLIST
else
echo "The domain/default pair does not exist" >&2
exit 1
fi"#,
    )
}

fn darwin() -> HostInfo {
    HostInfo::new("Darwin")
}

#[test]
fn resolve_all_from_real_processes() {
    let _guard = serial();
    let dir = TempDir::new().unwrap();
    let config = FactsConfig::default()
        .with_defaults_bin(fake_defaults(dir.path()))
        .with_msu_bin(write_script(dir.path(), "managedsoftwareupdate", "echo 6.3.1.4580"));

    let set = FactRegistry::new(config).resolve_all(&darwin(), &SystemExecutor::new());

    assert_eq!(
        set.get("munki_http_headers"),
        Some(&FactValue::Headers(vec![
            "Authorization: Bearer xyz".to_string(),
            "X-Custom: 1".to_string(),
        ]))
    );
    assert_eq!(
        set.get("munki_client_version"),
        Some(&FactValue::Version(VersionInfo {
            full: "6.3.1.4580".to_string(),
            major: Some("6".to_string()),
            minor: Some("3".to_string()),
            patch: Some("1".to_string()),
        }))
    );
}

#[test]
fn missing_preference_key_yields_single_empty_header() {
    let _guard = serial();
    let dir = TempDir::new().unwrap();
    let config = FactsConfig::default()
        .with_defaults_bin(fake_defaults(dir.path()))
        .with_preferences("/Library/Preferences/Elsewhere");

    let value = FactRegistry::new(config).resolve(Fact::MunkiHttpHeaders, &darwin(), &SystemExecutor::new());
    assert_eq!(value, Some(FactValue::Headers(vec![String::new()])));
}

#[test]
fn missing_client_binary_yields_empty_version() {
    let _guard = serial();
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("managedsoftwareupdate");
    let config = FactsConfig::default().with_msu_bin(missing.to_str().unwrap());

    let value = FactRegistry::new(config).resolve(Fact::MunkiClientVersion, &darwin(), &SystemExecutor::new());
    assert_eq!(value, Some(FactValue::Version(VersionInfo::default())));
}

#[test]
fn confined_host_spawns_nothing() {
    let _guard = serial();
    let dir = TempDir::new().unwrap();
    let marker = dir.path().join("ran");
    let script = write_script(
        dir.path(),
        "managedsoftwareupdate",
        &format!("touch '{}'\necho 5.5.1", marker.display()),
    );
    let config = FactsConfig::default().with_msu_bin(script);

    let set = FactRegistry::new(config).resolve_all(&HostInfo::new("Linux"), &SystemExecutor::new());
    assert!(set.is_empty());
    assert!(!marker.exists());
}

#[test]
fn fact_set_json_matches_facter_external_fact_shape() {
    let _guard = serial();
    let dir = TempDir::new().unwrap();
    let config = FactsConfig::default()
        .with_defaults_bin(fake_defaults(dir.path()))
        .with_msu_bin(write_script(dir.path(), "managedsoftwareupdate", "echo 5.5"));

    let set = FactRegistry::new(config).resolve_all(&darwin(), &SystemExecutor::new());
    let json: serde_json::Value = serde_json::from_str(&set.to_json().unwrap()).unwrap();
    assert_eq!(json["munki_http_headers"][1], "X-Custom: 1");
    assert_eq!(json["munki_client_version"]["full"], "5.5");
    assert!(json["munki_client_version"]["patch"].is_null());
}
