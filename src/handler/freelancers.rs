use std::sync::Arc;

use axum::{
    middleware,
    response::IntoResponse,
    routing::{delete, get, post},
    Extension, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dtos::{
        freelancerdtos::{
            CreateFreelancerProfileDto, FreelancerData, SearchFreelancersQueryDto,
            UpdateFreelancerProfileDto,
        },
        ApiResponse, RequestQueryDto,
    },
    error::HttpError,
    extract::{AppJson, AppPath, AppQuery},
    middleware::{auth, JWTAuthMiddeware},
    models::freelancermodel::PortfolioItem,
    AppState,
};

pub fn freelancers_handler() -> Router {
    let public = Router::new()
        .route("/", get(get_freelancers))
        .route("/search", get(search_freelancers))
        .route("/:id", get(get_freelancer));

    let protected = Router::new()
        .route(
            "/",
            post(create_profile).put(update_profile).delete(delete_profile),
        )
        .route("/me", get(get_my_profile))
        .route("/portfolio", post(add_portfolio_item))
        .route("/portfolio/:index", delete(remove_portfolio_item))
        .layer(middleware::from_fn(auth));

    public.merge(protected)
}

pub async fn create_profile(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    AppJson(body): AppJson<CreateFreelancerProfileDto>,
) -> Result<impl IntoResponse, HttpError> {
    let body = body.trimmed();
    body.validate().map_err(HttpError::validation)?;

    let freelancer = app_state
        .freelancer_service
        .create_profile(&user.user, body)
        .await?;

    Ok(ApiResponse::created(
        "Freelancer profile created successfully",
        FreelancerData { freelancer },
    ))
}

pub async fn get_my_profile(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let freelancer = app_state.freelancer_service.get_my_profile(&user.user).await?;

    Ok(ApiResponse::success(
        "Freelancer profile retrieved",
        FreelancerData { freelancer },
    ))
}

pub async fn get_freelancer(
    Extension(app_state): Extension<Arc<AppState>>,
    AppPath(profile_id): AppPath<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let freelancer = app_state.freelancer_service.get_profile(profile_id).await?;

    Ok(ApiResponse::success(
        "Freelancer retrieved",
        FreelancerData { freelancer },
    ))
}

pub async fn get_freelancers(
    Extension(app_state): Extension<Arc<AppState>>,
    AppQuery(query_params): AppQuery<RequestQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query_params.validate().map_err(HttpError::validation)?;

    let page = app_state.freelancer_service.list_profiles(&query_params).await?;

    Ok(ApiResponse::success("Freelancers retrieved", page))
}

pub async fn search_freelancers(
    Extension(app_state): Extension<Arc<AppState>>,
    AppQuery(query_params): AppQuery<SearchFreelancersQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query_params.validate().map_err(HttpError::validation)?;

    let page = app_state
        .freelancer_service
        .search_by_skills(&query_params.skills(), &query_params.pagination())
        .await?;

    Ok(ApiResponse::success("Search results", page))
}

pub async fn update_profile(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    AppJson(body): AppJson<UpdateFreelancerProfileDto>,
) -> Result<impl IntoResponse, HttpError> {
    let body = body.trimmed();
    body.validate().map_err(HttpError::validation)?;

    let freelancer = app_state
        .freelancer_service
        .update_profile(&user.user, body)
        .await?;

    Ok(ApiResponse::success(
        "Freelancer profile updated",
        FreelancerData { freelancer },
    ))
}

pub async fn delete_profile(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    app_state.freelancer_service.delete_profile(&user.user).await?;

    Ok(ApiResponse::success("Freelancer profile deleted", ()))
}

pub async fn add_portfolio_item(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    AppJson(body): AppJson<PortfolioItem>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate().map_err(HttpError::validation)?;

    let freelancer = app_state
        .freelancer_service
        .add_portfolio_item(&user.user, body)
        .await?;

    Ok(ApiResponse::created(
        "Portfolio item added",
        FreelancerData { freelancer },
    ))
}

pub async fn remove_portfolio_item(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    AppPath(index): AppPath<String>,
) -> Result<impl IntoResponse, HttpError> {
    let index = index
        .parse::<usize>()
        .map_err(|_| HttpError::bad_request("Valid portfolio index is required"))?;

    let freelancer = app_state
        .freelancer_service
        .remove_portfolio_item(&user.user, index)
        .await?;

    Ok(ApiResponse::success(
        "Portfolio item removed",
        FreelancerData { freelancer },
    ))
}
