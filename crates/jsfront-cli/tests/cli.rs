//! Integration tests for the `jsfront` binary.

use std::io::Write;
use std::process::{Command, Output, Stdio};

fn jsfront() -> Command {
    Command::new(env!("CARGO_BIN_EXE_jsfront"))
}

fn write_source(dir: &tempfile::TempDir, name: &str, source: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, source).expect("Failed to write source file");
    path
}

fn stdout_json(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&stdout).expect("stdout should be valid JSON")
}

#[test]
fn test_parse_file_prints_program() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_source(&dir, "input.js", "const answer = 6 * 7;\n");

    let output = jsfront().arg(&path).output().expect("Failed to run jsfront");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let json = stdout_json(&output);
    assert_eq!(json["type"], "Program");
    assert_eq!(json["sourceType"], "script");
    assert_eq!(json["body"][0]["declarations"][0]["init"]["operator"], "*");
}

#[test]
fn test_parse_stdin() {
    let mut child = jsfront()
        .arg("-")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn jsfront");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"f(a, b)")
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json["body"][0]["expression"]["type"], "CallExpression");
}

#[test]
fn test_module_flag() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_source(&dir, "mod.js", "import x from 'y';\nexport default x;");

    let script = jsfront().arg(&path).output().unwrap();
    assert!(!script.status.success());

    let module = jsfront().arg("--module").arg(&path).output().unwrap();
    assert!(module.status.success());
    let json = stdout_json(&module);
    assert_eq!(json["sourceType"], "module");
    assert_eq!(json["body"][1]["type"], "ExportDefaultDeclaration");
}

#[test]
fn test_parse_error_exits_non_zero() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_source(&dir, "bad.js", "let x = 1;\nx = );");

    let output = jsfront().arg(&path).output().unwrap();
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unexpected ')'"), "stderr: {stderr}");
    assert!(stderr.contains("bad.js:2:5"), "stderr: {stderr}");
}

#[test]
fn test_compact_output_is_one_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_source(&dir, "input.js", "a; b; c;");

    let output = jsfront().arg("--compact").arg(&path).output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim_end().lines().count(), 1);
    assert_eq!(stdout_json(&output)["body"].as_array().unwrap().len(), 3);
}

#[test]
fn test_config_file_and_flag_override() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_source(&dir, "options.json", r#"{"allowWith": false}"#);
    let path = write_source(&dir, "with.js", "with (o) x;");

    let rejected = jsfront().arg("--config").arg(&config).arg(&path).output().unwrap();
    assert!(!rejected.status.success());

    let plain = jsfront().arg(&path).output().unwrap();
    assert!(plain.status.success());

    let strict = jsfront().arg("--strict").arg(&path).output().unwrap();
    assert!(!strict.status.success());
}

#[test]
fn test_invalid_config_reports_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_source(&dir, "options.json", "{ not json");
    let path = write_source(&dir, "input.js", "x");

    let output = jsfront().arg("--config").arg(&config).arg(&path).output().unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid options"), "stderr: {stderr}");
}

#[test]
fn test_max_depth_limit() {
    let dir = tempfile::tempdir().unwrap();
    let source = format!("x = {}1{};", "[".repeat(40), "]".repeat(40));
    let path = write_source(&dir, "deep.js", &source);

    let ok = jsfront().arg(&path).output().unwrap();
    assert!(ok.status.success());

    let limited = jsfront().args(["--max-depth", "10"]).arg(&path).output().unwrap();
    assert!(!limited.status.success());
    let stderr = String::from_utf8_lossy(&limited.stderr);
    assert!(stderr.contains("--max-depth"), "stderr: {stderr}");
}

#[test]
fn test_logs_stay_off_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_source(&dir, "input.js", "x");

    let output = jsfront().args(["-vv", "--log-json"]).arg(&path).output().unwrap();
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["type"], "Program");
}
