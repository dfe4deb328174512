#![allow(dead_code)]

use std::sync::Arc;

use anyhow::Result;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use freelancer_marketplace::{
    config::{Config, StorageBackend},
    db::memory::MemoryStore,
    routes::create_router,
    AppState,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use tracing_subscriber::filter::LevelFilter;

pub const PASSWORD: &str = "secret123";

pub fn test_config() -> Config {
    Config {
        database_url: None,
        storage: StorageBackend::Memory,
        jwt_secret: "integration-access-secret".to_string(),
        jwt_refresh_secret: "integration-refresh-secret".to_string(),
        jwt_maxage: 15,
        jwt_refresh_maxage: 60,
        port: 0,
        frontend_url: "http://localhost:5173".to_string(),
        log_level: LevelFilter::OFF,
    }
}

/// The full router over a fresh in-memory store.
pub fn app() -> Router {
    let state = AppState::new(Arc::new(MemoryStore::new()), test_config());
    create_router(Arc::new(state))
}

pub struct TestResponse {
    pub status: StatusCode,
    pub set_cookies: Vec<String>,
    pub body: Value,
}

pub struct Call<'a> {
    method: Method,
    uri: &'a str,
    token: Option<&'a str>,
    cookie: Option<String>,
    body: Option<Body>,
}

impl<'a> Call<'a> {
    pub fn new(method: Method, uri: &'a str) -> Self {
        Self {
            method,
            uri,
            token: None,
            cookie: None,
            body: None,
        }
    }

    pub fn bearer(mut self, token: &'a str) -> Self {
        self.token = Some(token);
        self
    }

    pub fn cookie(mut self, cookie: impl Into<String>) -> Self {
        self.cookie = Some(cookie.into());
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(Body::from(body.to_string()));
        self
    }

    pub fn raw(mut self, body: impl Into<String>) -> Self {
        self.body = Some(Body::from(body.into()));
        self
    }

    pub async fn send(self, app: &Router) -> Result<TestResponse> {
        let mut builder = Request::builder().method(self.method).uri(self.uri);
        if let Some(token) = self.token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        if let Some(cookie) = self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }

        let request = match self.body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(body)?,
            None => builder.body(Body::empty())?,
        };

        let response = app.clone().oneshot(request).await?;
        let status = response.status();
        let set_cookies = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .map(str::to_string)
            .collect();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };

        Ok(TestResponse {
            status,
            set_cookies,
            body,
        })
    }
}

pub async fn get(app: &Router, uri: &str, token: &str) -> Result<TestResponse> {
    Call::new(Method::GET, uri).bearer(token).send(app).await
}

pub async fn post(app: &Router, uri: &str, token: &str, body: Value) -> Result<TestResponse> {
    Call::new(Method::POST, uri).bearer(token).json(body).send(app).await
}

pub async fn patch(app: &Router, uri: &str, token: &str, body: Value) -> Result<TestResponse> {
    Call::new(Method::PATCH, uri).bearer(token).json(body).send(app).await
}

pub async fn put(app: &Router, uri: &str, token: &str, body: Value) -> Result<TestResponse> {
    Call::new(Method::PUT, uri).bearer(token).json(body).send(app).await
}

pub struct Registered {
    pub id: String,
    pub access_token: String,
    pub refresh_token: String,
}

/// Registers `username` as `role` with `{username}@example.com`.
pub async fn register(app: &Router, username: &str, role: &str) -> Result<Registered> {
    let res = Call::new(Method::POST, "/api/users/register")
        .json(json!({
            "username": username,
            "fullname": format!("{} Example", username),
            "email": format!("{}@example.com", username),
            "password": PASSWORD,
            "role": role,
        }))
        .send(app)
        .await?;
    anyhow::ensure!(
        res.status == StatusCode::CREATED,
        "register {} failed: {} {}",
        username,
        res.status,
        res.body
    );

    let data = &res.body["data"];
    Ok(Registered {
        id: data["user"]["id"].as_str().unwrap_or_default().to_string(),
        access_token: data["accessToken"].as_str().unwrap_or_default().to_string(),
        refresh_token: data["refreshToken"].as_str().unwrap_or_default().to_string(),
    })
}

pub fn job_body(budget: f64) -> Value {
    json!({
        "title": "Build a marketplace API",
        "description": "REST endpoints for jobs, proposals and contracts",
        "difficulty": "intermediate",
        "budget": budget,
        "budgetType": "fixed",
        "skillsRequired": ["rust", "postgres"],
    })
}

pub fn proposal_body(job_id: &str, bid_amount: f64) -> Value {
    json!({
        "jobId": job_id,
        "coverLetter": "I have built several REST APIs with axum and sqlx.",
        "bidAmount": bid_amount,
        "estimatedTime": "2 days",
    })
}

pub fn id_of(res: &TestResponse, key: &str) -> String {
    res.body["data"][key]["id"].as_str().unwrap_or_default().to_string()
}
