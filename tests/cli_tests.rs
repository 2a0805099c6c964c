//! Integration tests for the tfcomment CLI
//!
//! These tests run the built binary end-to-end against temporary files.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

const CI_VARIABLES: &[&str] = &[
    "GITHUB_TOKEN",
    "GITHUB_REPOSITORY",
    "GITHUB_EVENT_PATH",
    "GITHUB_API_URL",
    "GITHUB_WORKFLOW",
    "TF_WORKSPACE",
    "TF_COMMENT_VAR_FILE",
    "TF_COMMENT_TITLE",
    "TF_COMMENT_MARKER",
    "TF_PLAN_OUTCOME",
    "TF_PLAN_EXITCODE",
    "TF_PLAN_STDOUT",
    "TF_PLAN_STDERR",
    "TF_VALIDATE_OUTCOME",
    "TF_APPLY_OUTCOME",
    "RUST_LOG",
];

/// Get the path to the tfcomment binary
fn tfcomment_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // Remove test executable name
    path.pop(); // Remove deps directory

    path.push("tfcomment");

    if cfg!(windows) {
        path.set_extension("exe");
    }

    path
}

/// Run tfcomment in `dir` with CI variables cleared
fn run_tfcomment(dir: &Path, args: &[&str]) -> std::process::Output {
    run_tfcomment_with_env(dir, args, &[])
}

/// Run tfcomment in `dir` with CI variables cleared, then `envs` set
fn run_tfcomment_with_env(
    dir: &Path,
    args: &[&str],
    envs: &[(&str, &str)],
) -> std::process::Output {
    let mut command = Command::new(tfcomment_binary());
    command.current_dir(dir).args(args);
    for variable in CI_VARIABLES {
        command.env_remove(variable);
    }
    command.env_remove("TF_VAR_FILE");
    command.envs(envs.iter().copied());
    command.output().expect("Failed to execute tfcomment")
}

const PLAN: &str = "\
Terraform will perform the following actions:

  # aws_instance.web must be replaced
  # aws_s3_bucket.assets will be created

Plan: 2 to add, 0 to change, 1 to destroy.
";

#[test]
fn test_tfcomment_version() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_tfcomment(dir.path(), &["--version"]);

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("tfcomment"));
}

#[test]
fn test_tfcomment_help() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_tfcomment(dir.path(), &["--help"]);

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"));
    assert!(stdout.contains("render"));
    assert!(stdout.contains("post"));
    assert!(stdout.contains("parse"));
}

#[test]
fn test_render_help_lists_step_flags() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_tfcomment(dir.path(), &["render", "--help"]);

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--plan-outcome"));
    assert!(stdout.contains("--apply-stdout"));
}

#[test]
fn test_render_plan_to_stdout() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("plan.txt"), PLAN).unwrap();

    let output = run_tfcomment(
        dir.path(),
        &[
            "render",
            "--marker",
            "<!-- cli-test -->",
            "--workspace",
            "prod",
            "--plan-outcome",
            "success",
            "--plan-exitcode",
            "0",
            "--plan-stdout",
            "plan.txt",
        ],
    );

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("<!-- cli-test -->\n### Terraform Plan (prod)\n\n"));
    assert!(stdout.contains("1 resource will be destroyed"));
    assert!(stdout.contains("| ♻️ Replace | `aws_instance.web` |"));
    assert!(stdout.contains("| ➕ Add | 2 |"));
}

#[test]
fn test_render_default_marker() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_tfcomment(
        dir.path(),
        &["render", "--workflow", "ci", "--title", "Network Plan"],
    );

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("<!-- tf-pr-comment:ci:network-plan -->\n"));
}

#[test]
fn test_render_to_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("plan.txt"), PLAN).unwrap();

    let output = run_tfcomment(
        dir.path(),
        &[
            "render",
            "--plan-outcome",
            "success",
            "--plan-exitcode",
            "0",
            "--plan-stdout",
            "plan.txt",
            "--output",
            "out/comment.md",
        ],
    );

    assert!(output.status.success());
    assert!(output.stdout.is_empty());

    let written = fs::read_to_string(dir.path().join("out/comment.md")).unwrap();
    assert!(written.contains("### Terraform Plan"));
    assert!(written.contains("Full Plan Output"));
}

#[test]
fn test_render_environment_from_env_var() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_tfcomment_with_env(
        dir.path(),
        &["render", "--marker", "<!-- env -->"],
        &[("TF_COMMENT_VAR_FILE", "tfvars/prd.tfvars")],
    );

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("> 🌍 **Environment:** `prd`"));
}

#[test]
fn test_render_ignores_terraform_variable_namespace() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_tfcomment_with_env(
        dir.path(),
        &["render", "--marker", "<!-- env -->"],
        &[("TF_VAR_FILE", "tfvars/prd.tfvars")],
    );

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("Environment"));
}

#[test]
fn test_render_reads_config_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join(".tfcomment.yaml"),
        "title: Staging Plan\nmarker: \"<!-- from-config -->\"\n",
    )
    .unwrap();

    let output = run_tfcomment(dir.path(), &["render"]);

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("<!-- from-config -->\n### Staging Plan\n\n"));
}

#[test]
fn test_render_missing_plan_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_tfcomment(
        dir.path(),
        &[
            "render",
            "--plan-outcome",
            "success",
            "--plan-stdout",
            "missing.txt",
        ],
    );

    assert!(!output.status.success());
}

#[test]
fn test_parse_json() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("plan.txt"), PLAN).unwrap();

    let output = run_tfcomment(dir.path(), &["parse", "plan.txt", "--format", "json"]);

    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["summary"]["add"], 2);
    assert_eq!(value["summary"]["destroy"], 1);
    assert_eq!(value["resources"][0]["resource"], "aws_instance.web");
    assert_eq!(value["resources"][0]["action"], "Replace");
}

#[test]
fn test_parse_markdown() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("plan.txt"), PLAN).unwrap();

    let output = run_tfcomment(dir.path(), &["parse", "plan.txt", "--format", "markdown"]);

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("| ➕ Create | `aws_s3_bucket.assets` |"));
}

#[test]
fn test_post_without_token_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_tfcomment(dir.path(), &["post", "--repo", "acme/infra", "--pr", "7"]);

    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("token"));
}

#[test]
fn test_post_without_pull_request_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_tfcomment(
        dir.path(),
        &["post", "--repo", "acme/infra", "--token", "secret"],
    );

    assert!(!output.status.success());
}
