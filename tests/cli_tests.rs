//! CLI integration tests

use std::path::PathBuf;
use std::process::Command;

use tempfile::TempDir;

fn camcorder_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_camcorder"))
}

/// Run with an isolated config directory
fn isolated() -> (Command, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let mut cmd = camcorder_bin();
    cmd.env("XDG_CONFIG_HOME", dir.path().join("config"))
        .env_remove("RUST_LOG");
    (cmd, dir)
}

#[test]
fn help_output() {
    let output = camcorder_bin()
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for flag in [
        "--resolution",
        "--fps",
        "--hdr",
        "--no-hdr",
        "--codec",
        "--duration",
        "--zoom",
        "--output",
        "--notify",
        "--no-stabilization",
        "profiles",
        "config",
    ] {
        assert!(stdout.contains(flag), "missing {flag} in help: {stdout}");
    }
}

#[test]
fn version_output() {
    let output = camcorder_bin()
        .arg("--version")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("camcorder"));
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn config_path_command() {
    let (mut cmd, dir) = isolated();
    let output = cmd
        .args(["config", "path"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("camcorder"));
    assert!(stdout.contains("config.toml"));
    assert!(stdout.contains(&*dir.path().to_string_lossy()));
}

#[test]
fn config_set_then_get() {
    let (mut set, dir) = isolated();
    let output = set
        .args(["config", "set", "resolution", "UHD"])
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success());

    let output = camcorder_bin()
        .env("XDG_CONFIG_HOME", dir.path().join("config"))
        .args(["config", "get", "resolution"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "4k");
}

#[test]
fn invalid_duration_is_a_usage_error() {
    let (mut cmd, _dir) = isolated();
    let output = cmd
        .args(["--duration", "soon"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Invalid duration"),
        "Expected error about invalid duration, got: {}",
        stderr
    );
}

#[test]
fn invalid_resolution_is_rejected_by_parser() {
    let output = camcorder_bin()
        .args(["--resolution", "8k"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("invalid value"),
        "Expected error about invalid resolution, got: {}",
        stderr
    );
}

#[test]
fn profiles_json_reports_negotiation() {
    let (mut cmd, _dir) = isolated();
    let output = cmd
        .args(["profiles", "--json", "--hdr", "--codec", "hevc", "-r", "4k"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("profiles --json prints JSON");
    assert_eq!(report["negotiated"]["video"]["size"]["width"], 3840);
    assert!(report["mismatch"].is_null());
    assert!(report["capability"]["video_profiles"].as_array().unwrap().len() > 1);
}

#[test]
fn no_hdr_overrides_config_file() {
    let (mut set, dir) = isolated();
    let output = set
        .args(["config", "set", "hdr", "true"])
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success());

    let profiles = |extra: &[&str]| {
        let output = camcorder_bin()
            .env("XDG_CONFIG_HOME", dir.path().join("config"))
            .env_remove("RUST_LOG")
            .args(["profiles", "--json", "--codec", "hevc"])
            .args(extra)
            .output()
            .expect("Failed to execute command");
        assert!(output.status.success());
        let report: serde_json::Value =
            serde_json::from_slice(&output.stdout).expect("profiles --json prints JSON");
        report["request"].as_str().unwrap_or_default().to_string()
    };

    assert!(profiles(&[]).contains("HDR"));
    assert!(profiles(&["--no-hdr"]).contains("SDR"));
}

#[test]
fn short_recording_writes_the_output_file() {
    let (mut cmd, dir) = isolated();
    let videos = dir.path().join("videos");
    let output = cmd
        .args(["--duration", "1s", "--zoom", "2", "--output"])
        .arg(&videos)
        .output()
        .expect("Failed to execute command");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    let path = PathBuf::from(stdout.trim());
    assert!(path.starts_with(&videos));
    assert!(path.exists(), "missing {}", path.display());
    assert_eq!(path.extension().and_then(|e| e.to_str()), Some("mp4"));
}
