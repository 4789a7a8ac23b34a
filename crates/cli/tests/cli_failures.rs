//! End-to-end coverage for failures that must never reach a browser:
//! bad inputs and missing configuration should fail fast with a stable
//! error code and exit code 1.

use std::path::PathBuf;
use std::process::Command;

use serde_json::Value;

fn hubpush_binary() -> PathBuf {
	let mut path = std::env::current_exe().expect("failed to get current exe path");
	path.pop(); // deps/
	path.pop(); // debug/
	path.push("hubpush");
	path
}

/// Runs the binary with `-f json` and a scrubbed environment, returning
/// the parsed stdout envelope, raw stderr, and the process status.
fn run_json(args: &[&str]) -> (Value, String, bool) {
	let output = Command::new(hubpush_binary())
		.args(["-f", "json"])
		.args(args)
		.env_remove("HUBPUSH_HUB_IP")
		.output()
		.expect("failed to execute hubpush");

	let stdout = String::from_utf8_lossy(&output.stdout).to_string();
	let stderr = String::from_utf8_lossy(&output.stderr).to_string();
	let parsed = serde_json::from_str::<Value>(&stdout)
		.unwrap_or_else(|_| serde_json::json!({ "raw": stdout }));
	(parsed, stderr, output.status.success())
}

#[test]
fn missing_source_file_fails_before_any_browser_work() {
	let (json, _stderr, ok) =
		run_json(&["deploy", "/nonexistent/app.groovy", "http://10.0.0.2/app/editor/5"]);

	assert!(!ok);
	assert_eq!(json["ok"], false);
	assert_eq!(json["error"]["code"], "SOURCE_NOT_FOUND");
	let message = json["error"]["message"].as_str().unwrap_or_default();
	assert!(message.contains("app.groovy"), "message should name the file: {message}");
}

#[test]
fn deploy_without_url_or_auto_is_an_input_error() {
	let dir = tempfile::tempdir().unwrap();
	let file = dir.path().join("app.groovy");
	std::fs::write(&file, "definition(name: \"Demo\")").unwrap();

	let (json, _stderr, ok) = run_json(&["deploy", file.to_str().unwrap()]);

	assert!(!ok);
	assert_eq!(json["error"]["code"], "MISSING_TARGET");
}

#[test]
fn auto_deploy_without_hub_address_demands_configuration() {
	let dir = tempfile::tempdir().unwrap();
	let file = dir.path().join("relay.groovy");
	std::fs::write(&file, "metadata { }").unwrap();

	let (json, stderr, ok) = run_json(&["deploy", file.to_str().unwrap(), "--auto"]);

	assert!(!ok);
	assert_eq!(json["error"]["code"], "HUB_ADDRESS_REQUIRED");
	assert!(
		stderr.contains("--hub-ip") && stderr.contains("HUBPUSH_HUB_IP"),
		"stderr should point at both configuration paths: {stderr}"
	);
}

#[test]
fn discover_without_hub_address_demands_configuration() {
	let (json, _stderr, ok) = run_json(&["discover", "Porch Lights"]);

	assert!(!ok);
	assert_eq!(json["error"]["code"], "HUB_ADDRESS_REQUIRED");
}

#[test]
fn bogus_hub_address_is_rejected_without_a_browser() {
	let (json, _stderr, ok) =
		run_json(&["discover", "Porch Lights", "--hub-ip", "http://10.0.0.2"]);

	assert!(!ok);
	assert_eq!(json["error"]["code"], "INVALID_HUB_ADDRESS");
	assert_eq!(json["error"]["details"]["addr"], "http://10.0.0.2");
}

#[test]
fn text_mode_keeps_stdout_clean_on_failure() {
	let output = Command::new(hubpush_binary())
		.args(["deploy", "/nonexistent/app.groovy", "http://10.0.0.2/app/editor/5"])
		.env_remove("HUBPUSH_HUB_IP")
		.output()
		.expect("failed to execute hubpush");

	assert!(!output.status.success());
	assert!(
		String::from_utf8_lossy(&output.stdout).trim().is_empty(),
		"text mode must not write failures to stdout"
	);
	assert!(String::from_utf8_lossy(&output.stderr).contains("not found"));
}

#[test]
fn help_names_both_commands() {
	let output = Command::new(hubpush_binary())
		.arg("--help")
		.output()
		.expect("failed to execute hubpush");

	assert!(output.status.success());
	let stdout = String::from_utf8_lossy(&output.stdout);
	assert!(stdout.contains("deploy"));
	assert!(stdout.contains("discover"));
}
