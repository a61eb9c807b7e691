//! Tests for POST /api/signup

mod common;

use common::create_test_server;
use serde_json::{json, Value};

#[tokio::test]
async fn test_signup_new_email_pending_verification() {
    let (server, backend) = create_test_server();

    let response = server
        .post("/api/signup")
        .json(&json!({ "name": "New Rider", "email": "new@example.com", "password": "secret-pass" }))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["status"], 200);
    assert_eq!(body["message"], "Signup successful. Please verify your email.");
    assert_eq!(body["user"]["email"], "new@example.com");
    assert_eq!(body["user"]["user_metadata"]["name"], "New Rider");
    assert_eq!(body["session"], Value::Null);
    assert!(response.maybe_cookie("sb-access-token").is_none());

    assert_eq!(
        backend.calls(),
        vec![
            "select:profile:anon".to_string(),
            "sign_up:new@example.com".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_signup_existing_email_conflicts_before_sign_up() {
    let (server, backend) = create_test_server();
    backend.add_account("rider@example.com", "secret-pass", true);

    let response = server
        .post("/api/signup")
        .json(&json!({ "email": "Rider@example.com", "password": "another-pass" }))
        .await;

    assert_eq!(response.status_code(), 409);
    let body: Value = response.json();
    assert_eq!(body["status"], 409);
    assert_eq!(body["message"], "Email already exists. Please log in instead.");
    assert_eq!(backend.count("sign_up:rider@example.com"), 0);
}

#[tokio::test]
async fn test_signup_conflicts_when_email_has_several_profiles() {
    let (server, backend) = create_test_server();
    backend.add_row("profile", json!({ "email": "twice@example.com", "onboard": false }));
    backend.add_row("profile", json!({ "email": "twice@example.com", "onboard": true }));

    let response = server
        .post("/api/signup")
        .json(&json!({ "email": "twice@example.com", "password": "secret-pass" }))
        .await;

    assert_eq!(response.status_code(), 409);
    let body: Value = response.json();
    assert_eq!(body["message"], "Email already exists. Please log in instead.");
    assert_eq!(backend.count("sign_up:twice@example.com"), 0);
}

#[tokio::test]
async fn test_signup_missing_fields() {
    let (server, backend) = create_test_server();

    let response = server
        .post("/api/signup")
        .json(&json!({ "name": "No Email", "password": "secret-pass" }))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["message"], "Email and password are required");
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn test_signup_rejected_by_backend() {
    let (server, _backend) = create_test_server();

    let response = server
        .post("/api/signup")
        .json(&json!({ "email": "new@example.com", "password": "abc" }))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["message"], "Signup failed. Invalid credentials or other error.");
    assert_eq!(body["error"], "Password should be at least 6 characters.");
}

#[tokio::test]
async fn test_signup_email_check_failure() {
    let (server, backend) = create_test_server();
    backend.fail_profile_lookups();

    let response = server
        .post("/api/signup")
        .json(&json!({ "email": "new@example.com", "password": "secret-pass" }))
        .await;

    assert_eq!(response.status_code(), 500);
    let body: Value = response.json();
    assert_eq!(body["message"], "Error checking user email.");
    assert_eq!(backend.count("sign_up:new@example.com"), 0);
}
