//! Binary tests for the offline commands.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn theoryx() -> Command {
    let mut cmd = Command::cargo_bin("theoryx").expect("binary built");
    for var in [
        "OPENAI_API_BASE_URL",
        "OPENAI_API_KEY",
        "SIMPLE_IMAGE_MODEL",
        "SIMPLE_SOLVER_MODEL",
        "COMPLEX_IMAGE_MODEL",
        "COMPLEX_SOLVER_MODEL",
        "THEORYX_LOG_DIR",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn test_convert_stdin() {
    theoryx()
        .arg("convert")
        .write_stdin(r"Speed \( v = \omega r \) and \[ a_n = \frac{v^2}{r} \]")
        .assert()
        .success()
        .stdout(r"Speed $v = \omega r$ and $$ a_n = \frac{v^2}{r} $$");
}

#[test]
fn test_convert_file_json() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("solution.md");
    std::fs::write(&path, r"\(x\)").expect("write input");

    theoryx()
        .args(["--format", "json", "convert"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"converted\": \"$x$\""));
}

#[test]
fn test_models_requires_settings() {
    let dir = TempDir::new().expect("temp dir");

    theoryx()
        .current_dir(dir.path())
        .arg("models")
        .assert()
        .failure()
        .stderr(predicate::str::contains("OPENAI_API_KEY"));
}

#[test]
fn test_models_from_flags() {
    let dir = TempDir::new().expect("temp dir");

    theoryx()
        .current_dir(dir.path())
        .args([
            "models",
            "--complex",
            "--api-base-url",
            "http://localhost:9",
            "--api-key",
            "sk-test",
            "--simple-image-model",
            "vision-mini",
            "--simple-solver-model",
            "solver-mini",
            "--complex-image-model",
            "vision-large",
            "--complex-solver-model",
            "o3-mini",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("o3-mini"))
        .stdout(predicate::str::contains("vision-large"));
}

#[test]
fn test_dotenv_overrides_environment() {
    let dir = TempDir::new().expect("temp dir");
    std::fs::write(
        dir.path().join(".env"),
        "OPENAI_API_BASE_URL=http://localhost:9\n\
         OPENAI_API_KEY=sk-test\n\
         SIMPLE_IMAGE_MODEL=vision-mini\n\
         SIMPLE_SOLVER_MODEL=solver-from-dotenv\n\
         COMPLEX_IMAGE_MODEL=vision-large\n\
         COMPLEX_SOLVER_MODEL=o3-mini\n",
    )
    .expect("write .env");

    theoryx()
        .current_dir(dir.path())
        .env("SIMPLE_SOLVER_MODEL", "solver-from-shell")
        .arg("models")
        .assert()
        .success()
        .stdout(predicate::str::contains("solver-from-dotenv"))
        .stdout(predicate::str::contains("solver-from-shell").not());
}
