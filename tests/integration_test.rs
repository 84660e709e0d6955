#![allow(deprecated)] // assert_cmd::Command::cargo_bin is deprecated but replacement requires nightly

use predicates::prelude::*;
use serde_json::{Value, json};
use std::fs;
use std::path::Path;

fn rewire_cmd() -> assert_cmd::Command {
	let mut cmd = assert_cmd::Command::cargo_bin("rewire").unwrap();
	// Keep the developer's ~/.rewire.toml out of the cascade
	cmd.env("REWIRE_TEST_ISOLATE", "1");
	cmd
}

const ISOLATED_ROOT: &str = "root = true\nroot-config-lookup-disable-env-var = \"REWIRE_TEST_ISOLATE\"\n";

fn base_document() -> Value {
	json!({
		"mode": "production",
		"module": {"rules": [
			{"parser": {"requireEnsure": false}},
			{"oneOf": [
				{"loader": "url-loader", "options": {"limit": 10000}},
				{"loader": "babel-loader", "options": {"plugins": ["macros"], "presets": []}},
				{"loader": "file-loader", "options": {}}
			]}
		]},
		"plugins": [{"name": "HtmlWebpackPlugin", "options": {}}]
	})
}

fn write_json(path: &Path, value: &Value) {
	fs::write(path, serde_json::to_string_pretty(value).unwrap()).unwrap();
}

fn parse_stdout(output: &[u8]) -> Value {
	serde_json::from_slice(output).unwrap()
}

// ============================================================================
// CLI flag tests
// ============================================================================

#[test]
fn test_help_flag() {
	rewire_cmd()
		.arg("--help")
		.assert()
		.success()
		.stdout(predicate::str::contains("Composable overrides"));
}

#[test]
fn test_version_flag() {
	rewire_cmd()
		.arg("--version")
		.assert()
		.success()
		.stdout(predicate::str::contains("rewire"));
}

#[test]
fn test_no_args_shows_help() {
	// With arg_required_else_help, no args should show help
	rewire_cmd()
		.assert()
		.failure()
		.stderr(predicate::str::contains("Usage"));
}

// ============================================================================
// --init tests
// ============================================================================

#[test]
fn test_init_creates_config() {
	let temp_dir = tempfile::tempdir().unwrap();
	let config_path = temp_dir.path().join(".rewire.toml");

	rewire_cmd()
		.arg("--init")
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("Created .rewire.toml"));

	let content = fs::read_to_string(&config_path).unwrap();
	assert!(content.contains("root = true"));
	assert!(content.contains("[[stages]]"));
}

#[test]
fn test_init_fails_if_exists() {
	let temp_dir = tempfile::tempdir().unwrap();
	fs::write(temp_dir.path().join(".rewire.toml"), "# existing").unwrap();

	rewire_cmd()
		.arg("--init")
		.current_dir(temp_dir.path())
		.assert()
		.failure()
		.stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_init_force_overwrites() {
	let temp_dir = tempfile::tempdir().unwrap();
	let config_path = temp_dir.path().join(".rewire.toml");
	fs::write(&config_path, "# existing").unwrap();

	rewire_cmd()
		.args(["--init", "--force"])
		.current_dir(temp_dir.path())
		.assert()
		.success();

	let content = fs::read_to_string(&config_path).unwrap();
	assert!(content.contains("root = true"));
}

// ============================================================================
// config subcommand tests
// ============================================================================

#[test]
fn test_config_validate_valid_config() {
	let temp_dir = tempfile::tempdir().unwrap();
	fs::write(
		temp_dir.path().join(".rewire.toml"),
		format!("{ISOLATED_ROOT}\n[[stages]]\ntransform = \"disable-chunk\"\n"),
	)
	.unwrap();

	rewire_cmd()
		.args(["config", "validate"])
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("valid"))
		.stdout(predicate::str::contains("1 stages"));
}

#[test]
fn test_config_validate_invalid_config() {
	let temp_dir = tempfile::tempdir().unwrap();
	fs::write(temp_dir.path().join(".rewire.toml"), "invalid toml [[[").unwrap();

	rewire_cmd()
		.args(["config", "validate"])
		.current_dir(temp_dir.path())
		.assert()
		.failure()
		.stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_config_validate_rejects_unknown_stage_key() {
	let temp_dir = tempfile::tempdir().unwrap();
	fs::write(
		temp_dir.path().join(".rewire.toml"),
		format!(
			"{ISOLATED_ROOT}\n[[stages]]\ntransform = \"add-bundle-visualizer\"\nbehind_flag = true\n"
		),
	)
	.unwrap();

	rewire_cmd()
		.args(["config", "validate"])
		.current_dir(temp_dir.path())
		.assert()
		.failure()
		.stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_config_show_displays_stages() {
	let temp_dir = tempfile::tempdir().unwrap();
	fs::write(
		temp_dir.path().join(".rewire.toml"),
		format!(
			r#"{ISOLATED_ROOT}
[[stages]]
transform = "add-bundle-visualizer"
when = {{ flag = "--analyze" }}

[[stages]]
transform = "disable-eslint"
enabled = false

[[dev-server]]
transform = "watch-all"
"#
		),
	)
	.unwrap();

	rewire_cmd()
		.args(["config", "show"])
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("add-bundle-visualizer"))
		.stdout(predicate::str::contains("when: flag --analyze"))
		.stdout(predicate::str::contains("enabled: false"))
		.stdout(predicate::str::contains("[dev-server]"));
}

// ============================================================================
// apply tests
// ============================================================================

#[test]
fn test_apply_babel_plugin() {
	let temp_dir = tempfile::tempdir().unwrap();
	let doc_path = temp_dir.path().join("webpack.json");
	write_json(&doc_path, &base_document());
	fs::write(
		temp_dir.path().join(".rewire.toml"),
		format!(
			r#"{ISOLATED_ROOT}
[[stages]]
transform = "add-babel-plugin"
plugin = "styled-components"
"#
		),
	)
	.unwrap();

	let output = rewire_cmd()
		.args(["apply", "webpack.json"])
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.get_output()
		.stdout
		.clone();

	let doc = parse_stdout(&output);
	assert_eq!(
		doc["module"]["rules"][1]["oneOf"][1]["options"]["plugins"],
		json!(["macros", "styled-components"])
	);
}

#[test]
fn test_apply_gate_reads_run_args() {
	let temp_dir = tempfile::tempdir().unwrap();
	let doc_path = temp_dir.path().join("webpack.json");
	write_json(&doc_path, &base_document());
	fs::write(
		temp_dir.path().join(".rewire.toml"),
		format!(
			r#"{ISOLATED_ROOT}
[[stages]]
transform = "add-bundle-visualizer"
behind-flag = true
"#
		),
	)
	.unwrap();

	let plain = rewire_cmd()
		.args(["apply", "webpack.json"])
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.get_output()
		.stdout
		.clone();
	assert_eq!(parse_stdout(&plain)["plugins"].as_array().unwrap().len(), 1);

	let analyzed = rewire_cmd()
		.args(["apply", "webpack.json", "--", "--analyze"])
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.get_output()
		.stdout
		.clone();
	let doc = parse_stdout(&analyzed);
	assert_eq!(doc["plugins"].as_array().unwrap().len(), 2);
	assert_eq!(doc["plugins"][1]["name"], "BundleAnalyzerPlugin");
}

#[test]
fn test_apply_with_explicit_config_and_output() {
	let temp_dir = tempfile::tempdir().unwrap();
	let doc_path = temp_dir.path().join("webpack.json");
	let config_path = temp_dir.path().join("pipeline.toml");
	let out_path = temp_dir.path().join("out.json");
	write_json(&doc_path, &base_document());
	fs::write(
		&config_path,
		r#"
[[stages]]
transform = "add-less-loader"
"#,
	)
	.unwrap();

	rewire_cmd()
		.arg("apply")
		.arg(&doc_path)
		.arg("--config")
		.arg(&config_path)
		.arg("--output")
		.arg(&out_path)
		.env("NODE_ENV", "development")
		.assert()
		.success()
		.stdout(predicate::str::is_empty());

	let doc: Value = serde_json::from_str(&fs::read_to_string(&out_path).unwrap()).unwrap();
	let loaders = doc["module"]["rules"][1]["oneOf"].as_array().unwrap();
	assert_eq!(loaders.len(), 4);
	assert_eq!(loaders[2]["test"], "\\.less$");
	assert_eq!(loaders[2]["use"][0], "style-loader");
	assert_eq!(loaders[3]["loader"], "file-loader");
}

#[test]
fn test_apply_missing_loader_fails() {
	let temp_dir = tempfile::tempdir().unwrap();
	write_json(
		&temp_dir.path().join("webpack.json"),
		&json!({"module": {"rules": [{"oneOf": []}]}}),
	);
	fs::write(
		temp_dir.path().join(".rewire.toml"),
		format!("{ISOLATED_ROOT}\n[[stages]]\ntransform = \"use-babel-rc\"\n"),
	)
	.unwrap();

	rewire_cmd()
		.args(["apply", "webpack.json"])
		.current_dir(temp_dir.path())
		.assert()
		.failure()
		.stderr(predicate::str::contains("use-babel-rc"))
		.stderr(predicate::str::contains("No match for loader /babel/"));
}

#[test]
fn test_apply_missing_document_fails() {
	let temp_dir = tempfile::tempdir().unwrap();
	fs::write(temp_dir.path().join(".rewire.toml"), ISOLATED_ROOT).unwrap();

	rewire_cmd()
		.args(["apply", "missing.json"])
		.current_dir(temp_dir.path())
		.assert()
		.failure()
		.stderr(predicate::str::contains("Failed to load document"));
}

#[test]
fn test_apply_missing_explicit_config_fails() {
	let temp_dir = tempfile::tempdir().unwrap();
	write_json(&temp_dir.path().join("webpack.json"), &base_document());

	rewire_cmd()
		.args(["apply", "webpack.json", "--config", "nope.toml"])
		.current_dir(temp_dir.path())
		.assert()
		.failure()
		.stderr(predicate::str::contains("Config file not found"));
}

// ============================================================================
// dev-server tests
// ============================================================================

#[test]
fn test_dev_server_watch_all() {
	let temp_dir = tempfile::tempdir().unwrap();
	write_json(
		&temp_dir.path().join("dev-server.json"),
		&json!({"compress": true, "watchOptions": {"ignored": "node_modules"}}),
	);
	fs::write(
		temp_dir.path().join(".rewire.toml"),
		format!("{ISOLATED_ROOT}\n[[dev-server]]\ntransform = \"watch-all\"\n"),
	)
	.unwrap();

	let plain = rewire_cmd()
		.args(["dev-server", "dev-server.json", "--allowed-host", "example.test"])
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.get_output()
		.stdout
		.clone();
	let doc = parse_stdout(&plain);
	assert_eq!(doc["allowedHost"], "example.test");
	assert!(doc.get("watchOptions").is_some());

	let watching = rewire_cmd()
		.args([
			"dev-server",
			"dev-server.json",
			"--proxy",
			"http://localhost:4000",
			"--",
			"--watch-all",
		])
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.get_output()
		.stdout
		.clone();
	let doc = parse_stdout(&watching);
	assert_eq!(doc["proxy"], "http://localhost:4000");
	assert_eq!(doc["allowedHost"], "localhost");
	assert!(doc.get("watchOptions").is_none());
}
