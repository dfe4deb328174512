use std::{any::Any, sync::Arc};

use axum::{
    extract::DefaultBodyLimit,
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Extension, Router,
};
use serde_json::json;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::{
    dtos::ApiResponse,
    error::{ErrorMessage, HttpError},
    handler::{
        auth::auth_handler, contracts::contracts_handler, freelancers::freelancers_handler,
        jobs::jobs_handler, proposals::proposals_handler, users::users_handler,
    },
    AppState,
};

pub const MAX_BODY_BYTES: usize = 10 * 1024;

async fn health_check() -> impl IntoResponse {
    ApiResponse::success("Server is running", json!({ "status": "ok" }))
}

async fn index() -> impl IntoResponse {
    ApiResponse::success("Freelancer marketplace API", json!({ "version": env!("CARGO_PKG_VERSION") }))
}

async fn not_found(uri: Uri) -> HttpError {
    HttpError::not_found(format!("{} is not found", uri.path()))
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = detail, "handler panicked");

    HttpError::new(
        ErrorMessage::ServerError.to_string(),
        StatusCode::INTERNAL_SERVER_ERROR,
    )
    .into_response()
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let api_route = Router::new()
        .nest("/users", auth_handler().merge(users_handler()))
        .nest("/freelancers", freelancers_handler())
        .nest("/jobs", jobs_handler())
        .nest("/proposals", proposals_handler())
        .nest("/contracts", contracts_handler());

    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .nest("/api", api_route)
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(Extension(app_state))
}
