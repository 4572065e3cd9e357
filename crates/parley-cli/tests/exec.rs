//! Integration tests for `parley exec` against a mock backend.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

#[tokio::test]
async fn test_exec_sends_prompt_and_prints_reply() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = TempDir::new().unwrap();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_json(json!({
            "message": "Hello",
            "session_id": null,
            "attachments": [],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "session_id": "abc123",
            "response": "Hi there",
        })))
        .expect(1)
        .mount(&server)
        .await;

    cargo_bin_cmd!("parley")
        .env("PARLEY_HOME", home.path())
        .env("PARLEY_BACKEND_URL", server.uri())
        .args(["exec", "--prompt", "Hello"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Hi there"))
        .stderr(predicate::str::contains("Session: abc123"));
}

#[tokio::test]
async fn test_exec_continues_existing_session() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = TempDir::new().unwrap();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_json(json!({
            "message": "more",
            "session_id": "abc123",
            "attachments": [],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "session_id": "abc123",
            "response": "continuing",
        })))
        .expect(1)
        .mount(&server)
        .await;

    cargo_bin_cmd!("parley")
        .env("PARLEY_HOME", home.path())
        .env("PARLEY_BACKEND_URL", server.uri())
        .args(["exec", "--prompt", "more", "--session", "abc123"])
        .assert()
        .success()
        .stdout(predicate::str::contains("continuing"));
}

#[tokio::test]
async fn test_exec_surfaces_backend_failure_inline() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = TempDir::new().unwrap();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(
            ResponseTemplate::new(429).set_body_json(json!({"detail": "rate limited"})),
        )
        .mount(&server)
        .await;

    // The failure arrives as a synthesized assistant message, not an error.
    cargo_bin_cmd!("parley")
        .env("PARLEY_HOME", home.path())
        .env("PARLEY_BACKEND_URL", server.uri())
        .args(["exec", "--prompt", "Hello"])
        .assert()
        .success()
        .stdout(predicate::str::contains("rate limited"));
}

#[tokio::test]
async fn test_exec_attaches_files() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = TempDir::new().unwrap();
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("notes.txt");
    std::fs::write(&file, b"hello").unwrap();

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_json(json!({
            "message": "see attached",
            "session_id": null,
            "attachments": [{
                "filename": "notes.txt",
                "content_type": "text/plain",
                "data": "aGVsbG8=",
            }],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "session_id": "abc123",
            "response": "got it",
        })))
        .expect(1)
        .mount(&server)
        .await;

    cargo_bin_cmd!("parley")
        .env("PARLEY_HOME", home.path())
        .env("PARLEY_BACKEND_URL", server.uri())
        .args([
            "exec",
            "--prompt",
            "see attached",
            "--attach",
            file.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("got it"));
}
