/// Integration tests for the authentication endpoints and the
/// authentication gate
///
/// Requires `DATABASE_URL` and `JWT_SECRET` in the environment; see
/// `common/mod.rs`.

mod common;

use axum::http::StatusCode;
use common::{json_request, send, TestContext};
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn test_register_creates_user() {
    let ctx = TestContext::new().await.unwrap();
    let email = format!("register-{}@example.com", Uuid::new_v4());

    let (status, body) = send(
        &ctx.app,
        json_request(
            "POST",
            "/v1/auth/register",
            None,
            Some(json!({ "email": email, "password": "hunter22" })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["email"], email.as_str());
    assert!(body["user"]["id"].is_string());
    assert!(body["user"]["created_at"].is_string());

    // The password hash must never appear in a response
    assert!(body["user"].get("encrypted_password").is_none());
    assert!(!body.to_string().contains("argon2"));
}

#[tokio::test]
async fn test_register_rejects_duplicate_email() {
    let ctx = TestContext::new().await.unwrap();
    let email = format!("dup-{}@example.com", Uuid::new_v4());
    let payload = json!({ "email": email, "password": "hunter22" });

    let (status, _) = send(
        &ctx.app,
        json_request("POST", "/v1/auth/register", None, Some(payload.clone())),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &ctx.app,
        json_request("POST", "/v1/auth/register", None, Some(payload)),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["name"], "EmailAlreadyTaken");
    assert_eq!(body["error"]["message"], "Email has already been taken!");
}

#[tokio::test]
async fn test_register_rejects_invalid_payload() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = send(
        &ctx.app,
        json_request(
            "POST",
            "/v1/auth/register",
            None,
            Some(json!({ "email": "not-an-email", "password": "hunter22" })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["name"], "ValidationError");
    assert_eq!(body["error"]["details"][0]["field"], "email");
}

#[tokio::test]
async fn test_login_returns_token_and_user() {
    let ctx = TestContext::new().await.unwrap();
    let user = ctx.create_user("hunter22").await.unwrap();

    let (status, body) = send(
        &ctx.app,
        json_request(
            "POST",
            "/v1/auth/login",
            None,
            Some(json!({ "email": user.email, "password": "hunter22" })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(!body["access_token"].as_str().unwrap().is_empty());
    assert_eq!(body["user"]["id"], json!(user.id));
    assert_eq!(body["user"]["email"], user.email.as_str());
}

#[tokio::test]
async fn test_login_unknown_email() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = send(
        &ctx.app,
        json_request(
            "POST",
            "/v1/auth/login",
            None,
            Some(json!({
                "email": format!("nobody-{}@example.com", Uuid::new_v4()),
                "password": "hunter22"
            })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["name"], "EmailNotExists");
    assert_eq!(body["error"]["message"], "Email doesn't exist!");
}

#[tokio::test]
async fn test_login_wrong_password() {
    let ctx = TestContext::new().await.unwrap();
    let user = ctx.create_user("hunter22").await.unwrap();

    let (status, body) = send(
        &ctx.app,
        json_request(
            "POST",
            "/v1/auth/login",
            None,
            Some(json!({ "email": user.email, "password": "wrong-password" })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["name"], "IncorrectPassword");
    assert_eq!(body["error"]["message"], "Password is not correct!");
}

#[tokio::test]
async fn test_whoami_without_token() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = send(&ctx.app, json_request("GET", "/v1/auth/whoami", None, None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["name"], "Unauthorized");
    assert_eq!(body["error"]["message"], "Request is unauthorized!");
}

#[tokio::test]
async fn test_whoami_returns_current_user() {
    let ctx = TestContext::new().await.unwrap();
    let user = ctx.create_user("hunter22").await.unwrap();
    let token = ctx.token_for(&user);

    let (status, body) = send(
        &ctx.app,
        json_request("GET", "/v1/auth/whoami", Some(&token), None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["id"], json!(user.id));
    assert_eq!(body["user"]["email"], user.email.as_str());
    assert!(body["user"].get("encrypted_password").is_none());
}

#[tokio::test]
async fn test_token_signed_with_wrong_secret_is_rejected() {
    let ctx = TestContext::new().await.unwrap();
    let user = ctx.create_user("hunter22").await.unwrap();

    use taskbox_shared::auth::jwt;
    let claims = jwt::Claims::new(&user, chrono::Duration::hours(1));
    let forged = jwt::create_token(&claims, "some-other-secret-also-32-bytes-!!").unwrap();

    let (status, body) = send(
        &ctx.app,
        json_request("GET", "/v1/auth/whoami", Some(&forged), None),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["name"], "Unauthorized");
}

#[tokio::test]
async fn test_token_for_missing_user_is_rejected() {
    let ctx = TestContext::new().await.unwrap();

    // Valid signature, but the subject doesn't exist in the store
    let ghost = taskbox_shared::models::user::User {
        id: Uuid::new_v4(),
        email: "ghost@example.com".to_string(),
        encrypted_password: "$argon2id$ghost".to_string(),
        created_at: chrono::Utc::now(),
        updated_at: chrono::Utc::now(),
    };

    use taskbox_shared::auth::jwt;
    let claims = jwt::Claims::new(&ghost, chrono::Duration::hours(1));
    let token = jwt::create_token(&claims, &ctx.config.jwt.secret).unwrap();

    let (status, body) = send(
        &ctx.app,
        json_request("GET", "/v1/auth/whoami", Some(&token), None),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["message"], "Request is unauthorized!");
}

#[tokio::test]
async fn test_malformed_bearer_header_is_rejected() {
    let ctx = TestContext::new().await.unwrap();

    let request = axum::http::Request::builder()
        .method("GET")
        .uri("/v1/auth/whoami")
        .header("authorization", "Token abcdef")
        .body(axum::body::Body::empty())
        .unwrap();

    let (status, body) = send(&ctx.app, request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["name"], "Unauthorized");
}
