//! Run the built `munki-facts` binary the way Facter runs an external fact.

use std::process::Command;
use std::sync::{Mutex, MutexGuard};

/// Tests that write a script and tests that spawn must not overlap, or the
/// script's write handle can leak into a forked child and fail exec with
/// ETXTBSY.
static SPAWN: Mutex<()> = Mutex::new(());

fn serial() -> MutexGuard<'static, ()> {
    SPAWN.lock().unwrap_or_else(|e| e.into_inner())
}

fn munki_facts() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_munki-facts"));
    cmd.env_remove("RUST_LOG")
        .env_remove("MUNKI_FACTS_KERNEL")
        .env_remove("MUNKI_FACTS_DEFAULTS_BIN")
        .env_remove("MUNKI_FACTS_PREFERENCES")
        .env_remove("MUNKI_FACTS_MSU_BIN");
    cmd
}

#[test]
fn non_darwin_host_prints_empty_document() {
    let _guard = serial();
    let output = munki_facts().args(["--kernel", "Linux"]).output().unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap().trim(), "{}");
}

#[test]
fn unknown_fact_fails() {
    let _guard = serial();
    let output = munki_facts()
        .args(["--kernel", "Darwin", "--fact", "munki_nope"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown fact: munki_nope"));
}

#[test]
fn missing_tools_still_print_both_facts() {
    let _guard = serial();
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing");
    let missing = missing.to_str().unwrap();

    let output = munki_facts()
        .args(["--kernel", "Darwin", "--defaults-bin", missing, "--msu-bin", missing])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["munki_http_headers"], serde_json::json!([""]));
    assert_eq!(json["munki_client_version"]["full"], "");
    assert!(json["munki_client_version"]["major"].is_null());
}

#[cfg(unix)]
#[test]
fn env_configured_client_binary() {
    let _guard = serial();
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let msu = dir.path().join("managedsoftwareupdate");
    std::fs::write(&msu, "#!/bin/sh\necho 6.3.1.4580\n").unwrap();
    std::fs::set_permissions(&msu, std::fs::Permissions::from_mode(0o755)).unwrap();

    let output = munki_facts()
        .env("MUNKI_FACTS_KERNEL", "Darwin")
        .env("MUNKI_FACTS_MSU_BIN", &msu)
        .args(["--fact", "munki_client_version", "--pretty"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["munki_client_version"]["major"], "6");
    assert_eq!(json["munki_client_version"]["minor"], "3");
    assert_eq!(json["munki_client_version"]["patch"], "1");
}
