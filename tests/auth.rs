mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use common::{get, register, Call, PASSWORD};
use serde_json::json;

#[tokio::test]
async fn health_and_unknown_routes() -> Result<()> {
    let app = common::app();

    let res = Call::new(Method::GET, "/health").send(&app).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["success"], true);

    let res = Call::new(Method::GET, "/api/nowhere").send(&app).await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.body["success"], false);
    assert_eq!(res.body["message"], "/api/nowhere is not found");
    Ok(())
}

#[tokio::test]
async fn register_returns_tokens_without_secrets() -> Result<()> {
    let app = common::app();
    let res = Call::new(Method::POST, "/api/users/register")
        .json(json!({
            "username": "alice",
            "fullname": "Alice Example",
            "email": "alice@example.com",
            "password": PASSWORD,
        }))
        .send(&app)
        .await?;

    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.body["statusCode"], 201);
    assert_eq!(res.body["message"], "User registered successfully");
    assert_eq!(res.body["data"]["user"]["role"], "client");
    assert!(res.body["data"]["user"].get("password").is_none());
    assert!(res.body["data"]["accessToken"].is_string());
    assert!(res.body["data"]["refreshToken"].is_string());
    Ok(())
}

#[tokio::test]
async fn duplicate_email_conflicts() -> Result<()> {
    let app = common::app();
    register(&app, "alice", "client").await?;

    let res = Call::new(Method::POST, "/api/users/register")
        .json(json!({
            "username": "alice2",
            "fullname": "Alice Again",
            "email": "alice@example.com",
            "password": PASSWORD,
        }))
        .send(&app)
        .await?;
    assert_eq!(res.status, StatusCode::CONFLICT);
    assert_eq!(res.body["message"], "Email already registered");
    Ok(())
}

#[tokio::test]
async fn invalid_input_is_rejected_with_details() -> Result<()> {
    let app = common::app();

    let res = Call::new(Method::POST, "/api/users/register")
        .json(json!({
            "username": "al",
            "fullname": "Al",
            "email": "not-an-email",
            "password": "123",
        }))
        .send(&app)
        .await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["success"], false);
    assert_eq!(res.body["errors"].as_array().map(Vec::len), Some(3));

    let res = Call::new(Method::POST, "/api/users/register")
        .json(json!({
            "username": "alice",
            "fullname": "Alice",
            "email": "alice@example.com",
            "password": PASSWORD,
            "role": "superuser",
        }))
        .send(&app)
        .await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let res = Call::new(Method::POST, "/api/users/login")
        .raw("{ not json")
        .send(&app)
        .await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["success"], false);
    Ok(())
}

#[tokio::test]
async fn oversized_body_is_refused() -> Result<()> {
    let app = common::app();
    let res = Call::new(Method::POST, "/api/users/register")
        .json(json!({
            "username": "alice",
            "fullname": "x".repeat(20 * 1024),
            "email": "alice@example.com",
            "password": PASSWORD,
        }))
        .send(&app)
        .await?;
    assert_eq!(res.status, StatusCode::PAYLOAD_TOO_LARGE);
    Ok(())
}

#[tokio::test]
async fn wrong_password_and_unknown_email_look_the_same() -> Result<()> {
    let app = common::app();
    register(&app, "alice", "client").await?;

    let wrong_password = Call::new(Method::POST, "/api/users/login")
        .json(json!({ "email": "alice@example.com", "password": "wrong-password" }))
        .send(&app)
        .await?;
    let unknown_email = Call::new(Method::POST, "/api/users/login")
        .json(json!({ "email": "nobody@example.com", "password": PASSWORD }))
        .send(&app)
        .await?;

    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.body, unknown_email.body);
    assert_eq!(wrong_password.body["message"], "Invalid email or password");
    Ok(())
}

#[tokio::test]
async fn login_sets_cookies_usable_for_auth() -> Result<()> {
    let app = common::app();
    register(&app, "alice", "client").await?;

    let res = Call::new(Method::POST, "/api/users/login")
        .json(json!({ "email": "alice@example.com", "password": PASSWORD }))
        .send(&app)
        .await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["message"], "Login successful");

    let access_cookie = res
        .set_cookies
        .iter()
        .find(|c| c.starts_with("accessToken="))
        .and_then(|c| c.split(';').next())
        .map(str::to_string);
    assert!(res.set_cookies.iter().any(|c| c.starts_with("refreshToken=")));

    let res = Call::new(Method::GET, "/api/users/me")
        .cookie(access_cookie.unwrap_or_default())
        .send(&app)
        .await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["user"]["username"], "alice");
    Ok(())
}

#[tokio::test]
async fn me_requires_a_valid_token() -> Result<()> {
    let app = common::app();
    let alice = register(&app, "alice", "client").await?;

    let res = Call::new(Method::GET, "/api/users/me").send(&app).await?;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    let res = get(&app, "/api/users/me", "garbage.token.value").await?;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    // A refresh token is signed with a different secret.
    let res = get(&app, "/api/users/me", &alice.refresh_token).await?;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    let res = get(&app, "/api/users/me", &alice.access_token).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["message"], "User info retrieved");
    assert_eq!(res.body["data"]["user"]["id"], alice.id.as_str());
    Ok(())
}

#[tokio::test]
async fn refresh_then_logout_revokes() -> Result<()> {
    let app = common::app();
    let alice = register(&app, "alice", "client").await?;

    let res = Call::new(Method::POST, "/api/users/refresh-token")
        .json(json!({ "refreshToken": alice.refresh_token }))
        .send(&app)
        .await?;
    assert_eq!(res.status, StatusCode::OK);
    let fresh = res.body["data"]["accessToken"].as_str().unwrap_or_default().to_string();
    assert!(!fresh.is_empty());

    let res = get(&app, "/api/users/me", &fresh).await?;
    assert_eq!(res.status, StatusCode::OK);

    let res = Call::new(Method::POST, "/api/users/logout")
        .bearer(&fresh)
        .send(&app)
        .await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["message"], "Logout successful");

    let res = Call::new(Method::POST, "/api/users/refresh-token")
        .json(json!({ "refreshToken": alice.refresh_token }))
        .send(&app)
        .await?;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    Ok(())
}
