use foundation_backend::auth::decode_token;
use foundation_backend::ApiError;
use serde_json::json;

use crate::support::api;

fn register(api: &foundation_backend::Api<foundation_backend::InMemoryStore>) {
    api.post(
        "auth/register",
        json!({ "name": "Tara", "email": "tara@example.org", "password": "seedling42" }),
    )
    .unwrap();
}

#[test]
fn register_signs_in_without_secrets() {
    let api = api();
    register(&api);

    let me = api.get("auth/me").unwrap();
    let user = me.data.unwrap();
    assert_eq!(user["email"], "tara@example.org");
    assert!(user.get("password_hash").is_none());
    assert!(user.get("password").is_none());

    let token = api.auth().session().token().unwrap().to_string();
    let claims = decode_token(&token).unwrap();
    assert_eq!(claims["email"], "tara@example.org");
}

#[test]
fn logout_then_login() {
    let api = api();
    register(&api);
    api.post("auth/logout", json!({})).unwrap();
    assert_eq!(api.get("auth/me").unwrap_err().status_code(), 401);

    let err = api
        .post("auth/login", json!({ "email": "tara@example.org", "password": "wrong-one" }))
        .unwrap_err();
    assert_eq!(err.to_string(), "Invalid password");

    let ok = api
        .post("auth/login", json!({ "email": "tara@example.org", "password": "seedling42" }))
        .unwrap();
    assert_eq!(ok.message.as_deref(), Some("Login successful"));
    assert!(ok.data.unwrap()["token"].is_string());
}

#[test]
fn duplicate_registration() {
    let api = api();
    register(&api);
    let err = api
        .post(
            "auth/register",
            json!({ "name": "T2", "email": "tara@example.org", "password": "another99" }),
        )
        .unwrap_err();
    assert!(matches!(err, ApiError::Auth(_)));
    assert_eq!(err.status_code(), 409);
}

#[test]
fn password_reset_flow() {
    let api = api();
    register(&api);

    let sent = api
        .post("auth/forgot-password", json!({ "email": "tara@example.org" }))
        .unwrap();
    assert_eq!(
        sent.message.as_deref(),
        Some("Password reset link sent to your email")
    );
    assert!(sent.data.is_none());

    let token = api
        .auth()
        .request_password_reset("tara@example.org")
        .unwrap()
        .data;
    api.post(
        "auth/reset-password",
        json!({ "token": token, "password": "fresh-sprout" }),
    )
    .unwrap();

    let err = api
        .post(
            "auth/reset-password",
            json!({ "token": token, "password": "fresh-sprout" }),
        )
        .unwrap_err();
    assert_eq!(err.to_string(), "Invalid or expired reset token");

    api.post(
        "auth/login",
        json!({ "email": "tara@example.org", "password": "fresh-sprout" }),
    )
    .unwrap();
}

#[test]
fn unknown_account() {
    let api = api();
    let err = api
        .post("auth/forgot-password", json!({ "email": "ghost@example.org" }))
        .unwrap_err();
    assert_eq!(err.status_code(), 404);
}
