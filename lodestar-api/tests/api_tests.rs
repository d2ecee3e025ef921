/// Router tests for the Lodestar API
///
/// The first group runs without a database. The second group needs
/// PostgreSQL via DATABASE_URL and is skipped when it is unset.

mod common;

use axum::http::StatusCode;
use chrono::Utc;
use lodestar_shared::auth::jwt::{encode_payload, Claims};
use serde_json::json;
use uuid::Uuid;

use common::{send, unique_email};

#[tokio::test]
async fn test_register_without_email_is_422() {
    let (app, _) = common::offline_app();

    for body in [
        json!({ "password": "long-enough-password" }),
        json!({ "email": null, "password": "long-enough-password" }),
        json!({ "email": "", "password": "long-enough-password" }),
        json!({ "email": "   ", "password": "long-enough-password" }),
    ] {
        let (status, json) = send(&app, "POST", "/v1/auth/register", None, Some(body)).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["error"], "validation_error");
        assert_eq!(json["message"], "Users must have an email address");
    }
}

#[tokio::test]
async fn test_register_with_bad_email_is_422() {
    let (app, _) = common::offline_app();

    let body = json!({ "email": "not-an-email", "password": "long-enough-password" });
    let (status, json) = send(&app, "POST", "/v1/auth/register", None, Some(body)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["details"][0]["field"], "email");
}

#[tokio::test]
async fn test_me_requires_token() {
    let (app, _) = common::offline_app();

    let (status, json) = send(&app, "GET", "/v1/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"], "unauthorized");

    let (status, _) = send(&app, "GET", "/v1/me/profile", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_me_path_is_404_without_token() {
    let (app, _) = common::offline_app();

    let (status, _) = send(&app, "GET", "/v1/me/nonexistent", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_garbage_token_is_401() {
    let (app, _) = common::offline_app();

    let (status, _) = send(&app, "GET", "/v1/me", Some("not.a.jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_token_is_401() {
    let (app, state) = common::offline_app();
    let now = Utc::now().timestamp();

    let claims = Claims {
        sub: Uuid::new_v4(),
        username: "old@example.com".to_string(),
        email: "old@example.com".to_string(),
        iss: state.jwt.issuer.clone(),
        iat: now - 3600,
        exp: now - 1800,
    };
    let token = encode_payload(&claims, &state.jwt).unwrap();

    let (status, json) = send(&app, "GET", "/v1/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["message"], "Token expired");
}

#[tokio::test]
async fn test_health_reports_database_down() {
    let (app, _) = common::offline_app();

    let (status, json) = send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["database"], "disconnected");
}

#[tokio::test]
async fn test_register_login_and_profile_flow() {
    let Some(app) = common::database_app().await else { return };
    let email = unique_email("flow");
    let credentials = json!({ "email": email, "password": "correct-horse-battery" });

    let (status, registered) =
        send(&app, "POST", "/v1/auth/register", None, Some(credentials.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(registered["account"]["email"], email.as_str());
    assert_eq!(registered["account"]["is_staff"], false);
    assert!(registered["account"].get("id").is_none());
    assert!(registered["account"].get("password_hash").is_none());
    assert!(!registered["token"].as_str().unwrap().is_empty());

    let (status, _) = send(&app, "POST", "/v1/auth/register", None, Some(credentials.clone())).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let wrong = json!({ "email": email, "password": "wrong-password" });
    let (status, _) = send(&app, "POST", "/v1/auth/login", None, Some(wrong)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, logged_in) = send(&app, "POST", "/v1/auth/login", None, Some(credentials)).await;
    assert_eq!(status, StatusCode::OK);
    let token = logged_in["token"].as_str().unwrap().to_string();

    let (status, me) = send(&app, "GET", "/v1/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["public_id"], registered["account"]["public_id"]);

    let (status, _) = send(&app, "GET", "/v1/me/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let update = json!({ "first_name": "Ada" });
    let (status, profile) = send(&app, "PUT", "/v1/me/profile", Some(&token), Some(update)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["first_name"], "Ada");

    let (status, profile) = send(&app, "GET", "/v1/me/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["first_name"], "Ada");
}
