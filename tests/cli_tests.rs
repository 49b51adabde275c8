//! CLI integration tests

use assert_cmd::Command;
use predicates::prelude::*;

fn voice_relay() -> Command {
    Command::cargo_bin("voice-relay").expect("binary should build")
}

#[test]
fn help_output() {
    voice_relay()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("speech-processing backend"))
        .stdout(predicate::str::contains("--language"))
        .stdout(predicate::str::contains("--encoding"))
        .stdout(predicate::str::contains("--max-speech"))
        .stdout(predicate::str::contains("--share-location"));
}

#[test]
fn version_output() {
    voice_relay()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("voice-relay"))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn config_help() {
    voice_relay()
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("set"))
        .stdout(predicate::str::contains("get"));
}

#[test]
fn config_path_command() {
    voice_relay()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("voice-relay"))
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn config_get_unknown_key_fails() {
    voice_relay()
        .args(["config", "get", "unknown_key"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown key"));
}

#[test]
fn config_set_unknown_key_fails() {
    voice_relay()
        .args(["config", "set", "unknown_key", "value"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown key"));
}

#[test]
fn config_set_invalid_encoding_fails() {
    let dir = tempfile::tempdir().unwrap();
    voice_relay()
        .env("XDG_CONFIG_HOME", dir.path())
        .args(["config", "set", "encoding", "ogg"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid encoding"));
}

#[test]
fn config_set_invalid_latitude_fails() {
    let dir = tempfile::tempdir().unwrap();
    voice_relay()
        .env("XDG_CONFIG_HOME", dir.path())
        .args(["config", "set", "location.latitude", "91"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("between"));
}

#[test]
#[cfg(target_os = "linux")]
fn config_set_and_get_round_trip() {
    let dir = tempfile::tempdir().unwrap();

    voice_relay()
        .env("XDG_CONFIG_HOME", dir.path())
        .args(["config", "set", "language", "km-KH"])
        .assert()
        .success();

    voice_relay()
        .env("XDG_CONFIG_HOME", dir.path())
        .args(["config", "get", "language"])
        .assert()
        .success()
        .stdout(predicate::str::contains("km-KH"));
}

#[test]
#[cfg(target_os = "linux")]
fn config_get_masks_api_key() {
    let dir = tempfile::tempdir().unwrap();

    voice_relay()
        .env("XDG_CONFIG_HOME", dir.path())
        .args(["config", "set", "api_key", "abcdefghijklmnop"])
        .assert()
        .success();

    voice_relay()
        .env("XDG_CONFIG_HOME", dir.path())
        .args(["config", "get", "api_key"])
        .assert()
        .success()
        .stdout(predicate::str::contains("abcd...mnop"))
        .stdout(predicate::str::contains("abcdefghijklmnop").not());
}

#[test]
fn invalid_language_is_usage_error() {
    voice_relay()
        .args(["--language", "not a tag"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Invalid language tag"));
}

#[test]
fn invalid_max_speech_is_usage_error() {
    voice_relay()
        .args(["--max-speech", "forever"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Invalid speech length"));
}

#[test]
fn missing_api_key_fails_fast() {
    voice_relay()
        .env_remove("VOICE_RELAY_API_KEY")
        .env("HOME", "/nonexistent")
        .env("XDG_CONFIG_HOME", "/nonexistent")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("API key"));
}
