//! Integration tests for the `storefront` CLI binary.
//!
//! Argument parsing, help output, completions, and exit codes run without a
//! backend; a few end-to-end flows run against a wiremock server.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Backend address nothing listens on.
const DEAD_BACKEND: &str = "http://127.0.0.1:9";

/// Build a [`Command`] for the `storefront` binary with env isolation.
///
/// Clears all `STOREFRONT_*` env vars and points config and data
/// directories at `home` so tests never touch the user's real files.
fn storefront_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("storefront");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_DATA_HOME", home.join("data"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("STOREFRONT_PROFILE")
        .env_remove("STOREFRONT_BACKEND_URL")
        .env_remove("STOREFRONT_SESSION")
        .env_remove("STOREFRONT_OUTPUT")
        .env_remove("STOREFRONT_TIMEOUT")
        .env_remove("STOREFRONT_PASSWORD");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn product_json(id: &str, name: &str, category: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "description": format!("{name} description"),
        "price": 89.99,
        "image": "https://images.example/p.jpg",
        "category": category,
        "stock": 60
    })
}

async fn mount_catalog(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            product_json("p1", "Wireless Headphones", "Electronics"),
            product_json("p2", "Smartphone", "Electronics"),
            product_json("p3", "Running Shoes", "Sports"),
        ])))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "categories": ["Electronics", "Sports"] })),
        )
        .mount(server)
        .await;
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = tempfile::tempdir().unwrap();
    let output = storefront_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    let home = tempfile::tempdir().unwrap();
    storefront_cmd(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("products")
                .and(predicate::str::contains("cart"))
                .and(predicate::str::contains("login"))
                .and(predicate::str::contains("register")),
        );
}

#[test]
fn test_version_flag() {
    let home = tempfile::tempdir().unwrap();
    storefront_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("storefront"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    let home = tempfile::tempdir().unwrap();
    storefront_cmd(home.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    let home = tempfile::tempdir().unwrap();
    storefront_cmd(home.path())
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Usage errors ────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let home = tempfile::tempdir().unwrap();
    let output = storefront_cmd(home.path()).arg("checkout").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized") || text.contains("checkout"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_invalid_output_format() {
    let home = tempfile::tempdir().unwrap();
    let output = storefront_cmd(home.path())
        .args(["--output", "xml", "products", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("possible values"),
        "Expected error about valid output formats:\n{text}"
    );
}

#[test]
fn test_cart_update_requires_quantity() {
    let home = tempfile::tempdir().unwrap();
    storefront_cmd(home.path())
        .args(["cart", "update", "p1"])
        .assert()
        .code(2);
}

#[test]
fn test_cart_subcommands_exist() {
    let home = tempfile::tempdir().unwrap();
    storefront_cmd(home.path())
        .args(["cart", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("show")
                .and(predicate::str::contains("add"))
                .and(predicate::str::contains("update"))
                .and(predicate::str::contains("remove")),
        );
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_show_without_file() {
    let home = tempfile::tempdir().unwrap();
    storefront_cmd(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("default_profile"));
}

#[test]
fn test_config_init_refuses_overwrite() {
    let home = tempfile::tempdir().unwrap();
    storefront_cmd(home.path())
        .args(["config", "init"])
        .assert()
        .success();
    storefront_cmd(home.path())
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_unknown_profile() {
    let home = tempfile::tempdir().unwrap();
    storefront_cmd(home.path())
        .args(["--profile", "staging", "health"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("staging"));
}

// ── Logged-out behavior ─────────────────────────────────────────────

#[test]
fn test_cart_add_logged_out_prompts_login() {
    let home = tempfile::tempdir().unwrap();
    storefront_cmd(home.path())
        .args(["--backend-url", DEAD_BACKEND, "--session", "memory", "cart", "add", "p1"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("storefront login"));
}

#[test]
fn test_cart_update_accepts_negative_quantity() {
    // Parses fine; fails on the missing session, not on the argument.
    let home = tempfile::tempdir().unwrap();
    storefront_cmd(home.path())
        .args([
            "--backend-url",
            DEAD_BACKEND,
            "--session",
            "memory",
            "cart",
            "update",
            "p1",
            "-1",
        ])
        .assert()
        .code(3);
}

#[test]
fn test_health_unreachable_backend() {
    let home = tempfile::tempdir().unwrap();
    storefront_cmd(home.path())
        .args(["--backend-url", DEAD_BACKEND, "--session", "memory", "health"])
        .assert()
        .code(7);
}

// ── Against a mocked backend ────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_products_list_filters_locally() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    let home = tempfile::tempdir().unwrap();

    let output = storefront_cmd(home.path())
        .args([
            "--backend-url",
            &server.uri(),
            "--session",
            "memory",
            "-o",
            "plain",
            "products",
            "list",
            "--category",
            "Electronics",
            "--search",
            "PHONE",
        ])
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "p1\np2");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_persists_session_for_next_run() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "jwt-cli",
            "user": { "id": "u1", "email": "ada@example.com", "name": "Ada" }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/cart"))
        .and(header("authorization", "Bearer jwt-cli"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{ "product": product_json("p1", "Wireless Headphones", "Electronics"), "quantity": 2 }],
            "total": 179.98
        })))
        .mount(&server)
        .await;
    let home = tempfile::tempdir().unwrap();
    let backend = server.uri();

    storefront_cmd(home.path())
        .args(["--backend-url", &backend, "login", "--email", "ada@example.com"])
        .env("STOREFRONT_PASSWORD", "secret")
        .assert()
        .success()
        .stderr(predicate::str::contains("Logged in as Ada"));

    storefront_cmd(home.path())
        .args(["--backend-url", &backend, "-o", "plain", "whoami"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ada@example.com"));

    storefront_cmd(home.path())
        .args(["--backend-url", &backend, "-o", "json", "cart", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("179.98"));

    storefront_cmd(home.path())
        .args(["--backend-url", &backend, "logout"])
        .assert()
        .success();

    storefront_cmd(home.path())
        .args(["--backend-url", &backend, "whoami"])
        .assert()
        .code(3);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_failure_shows_backend_detail() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "detail": "Invalid credentials" })),
        )
        .mount(&server)
        .await;
    let home = tempfile::tempdir().unwrap();

    storefront_cmd(home.path())
        .args([
            "--backend-url",
            &server.uri(),
            "--session",
            "memory",
            "login",
            "--email",
            "ada@example.com",
            "--password",
            "wrong",
        ])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Invalid credentials"));
}
