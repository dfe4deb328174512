use std::sync::Arc;

use axum::{
    middleware,
    response::IntoResponse,
    routing::{get, patch, post, put},
    Extension, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dtos::{
        jobdtos::{
            CreateJobDto, JobData, ListJobsQueryDto, SearchJobsQueryDto, UpdateJobDto,
            UpdateJobStatusDto,
        },
        ApiResponse, RequestQueryDto,
    },
    error::HttpError,
    extract::{AppJson, AppPath, AppQuery},
    middleware::{auth, role_check, JWTAuthMiddeware},
    models::usermodel::UserRole,
    AppState,
};

pub fn jobs_handler() -> Router {
    let public = Router::new()
        .route("/", get(get_jobs))
        .route("/search", get(search_jobs))
        .route("/:id", get(get_job));

    let protected = Router::new()
        .route(
            "/",
            post(create_job).layer(middleware::from_fn(|state, req, next| {
                role_check(state, req, next, vec![UserRole::Client])
            })),
        )
        .route(
            "/my-jobs",
            get(get_my_jobs).layer(middleware::from_fn(|state, req, next| {
                role_check(state, req, next, vec![UserRole::Client])
            })),
        )
        .route("/:id", put(update_job).delete(delete_job))
        .route("/:id/status", patch(update_job_status))
        .layer(middleware::from_fn(auth));

    public.merge(protected)
}

pub async fn create_job(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    AppJson(body): AppJson<CreateJobDto>,
) -> Result<impl IntoResponse, HttpError> {
    let body = body.trimmed();
    body.validate().map_err(HttpError::validation)?;

    let job = app_state.job_service.create_job(&user.user, body).await?;

    Ok(ApiResponse::created("Job created successfully", JobData { job }))
}

pub async fn get_jobs(
    Extension(app_state): Extension<Arc<AppState>>,
    AppQuery(query_params): AppQuery<ListJobsQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query_params.validate().map_err(HttpError::validation)?;

    let page = app_state
        .job_service
        .list_jobs(query_params.status, &query_params.pagination())
        .await?;

    Ok(ApiResponse::success("Jobs retrieved", page))
}

pub async fn search_jobs(
    Extension(app_state): Extension<Arc<AppState>>,
    AppQuery(query_params): AppQuery<SearchJobsQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query_params.validate().map_err(HttpError::validation)?;

    let page = app_state
        .job_service
        .search_jobs(&query_params.filter(), &query_params.pagination())
        .await?;

    Ok(ApiResponse::success("Search results", page))
}

pub async fn get_my_jobs(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    AppQuery(query_params): AppQuery<RequestQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query_params.validate().map_err(HttpError::validation)?;

    let page = app_state
        .job_service
        .list_my_jobs(&user.user, &query_params)
        .await?;

    Ok(ApiResponse::success("Your jobs retrieved", page))
}

pub async fn get_job(
    Extension(app_state): Extension<Arc<AppState>>,
    AppPath(job_id): AppPath<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let job = app_state.job_service.get_job(job_id).await?;

    Ok(ApiResponse::success("Job retrieved", JobData { job }))
}

pub async fn update_job(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    AppPath(job_id): AppPath<Uuid>,
    AppJson(body): AppJson<UpdateJobDto>,
) -> Result<impl IntoResponse, HttpError> {
    let body = body.trimmed();
    body.validate().map_err(HttpError::validation)?;

    let job = app_state
        .job_service
        .update_job(&user.user, job_id, body)
        .await?;

    Ok(ApiResponse::success("Job updated successfully", JobData { job }))
}

pub async fn update_job_status(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    AppPath(job_id): AppPath<Uuid>,
    AppJson(body): AppJson<UpdateJobStatusDto>,
) -> Result<impl IntoResponse, HttpError> {
    let job = app_state
        .job_service
        .set_status(&user.user, job_id, body.status)
        .await?;

    Ok(ApiResponse::success("Job status updated successfully", JobData { job }))
}

pub async fn delete_job(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    AppPath(job_id): AppPath<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    app_state.job_service.delete_job(&user.user, job_id).await?;

    Ok(ApiResponse::success("Job deleted successfully", ()))
}
