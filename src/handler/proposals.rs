use std::sync::Arc;

use axum::{
    middleware,
    response::IntoResponse,
    routing::{get, patch, post},
    Extension, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dtos::{
        proposaldtos::{CreateProposalDto, ProposalData, UpdateProposalDto, UpdateProposalStatusDto},
        ApiResponse, RequestQueryDto,
    },
    error::HttpError,
    extract::{AppJson, AppPath, AppQuery},
    middleware::{auth, role_check, JWTAuthMiddeware},
    models::usermodel::UserRole,
    AppState,
};

/// Every proposal route needs a signed-in caller.
pub fn proposals_handler() -> Router {
    Router::new()
        .route(
            "/",
            post(submit_proposal).layer(middleware::from_fn(|state, req, next| {
                role_check(state, req, next, vec![UserRole::Freelancer])
            })),
        )
        .route(
            "/my-proposals",
            get(get_my_proposals).layer(middleware::from_fn(|state, req, next| {
                role_check(state, req, next, vec![UserRole::Freelancer])
            })),
        )
        .route("/job/:job_id", get(get_job_proposals))
        .route(
            "/:id",
            get(get_proposal).put(update_proposal).delete(withdraw_proposal),
        )
        .route("/:id/status", patch(update_proposal_status))
        .layer(middleware::from_fn(auth))
}

pub async fn submit_proposal(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    AppJson(body): AppJson<CreateProposalDto>,
) -> Result<impl IntoResponse, HttpError> {
    let body = body.trimmed();
    body.validate().map_err(HttpError::validation)?;

    let proposal = app_state.proposal_service.submit(&user.user, body).await?;

    Ok(ApiResponse::created(
        "Proposal submitted successfully",
        ProposalData { proposal },
    ))
}

pub async fn get_my_proposals(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    AppQuery(query_params): AppQuery<RequestQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query_params.validate().map_err(HttpError::validation)?;

    let page = app_state
        .proposal_service
        .list_mine(&user.user, &query_params)
        .await?;

    Ok(ApiResponse::success("Your proposals retrieved", page))
}

pub async fn get_job_proposals(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    AppPath(job_id): AppPath<Uuid>,
    AppQuery(query_params): AppQuery<RequestQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query_params.validate().map_err(HttpError::validation)?;

    let page = app_state
        .proposal_service
        .list_for_job(&user.user, job_id, &query_params)
        .await?;

    Ok(ApiResponse::success("Proposals retrieved", page))
}

pub async fn get_proposal(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    AppPath(proposal_id): AppPath<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let proposal = app_state.proposal_service.get(&user.user, proposal_id).await?;

    Ok(ApiResponse::success("Proposal retrieved", ProposalData { proposal }))
}

pub async fn update_proposal(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    AppPath(proposal_id): AppPath<Uuid>,
    AppJson(body): AppJson<UpdateProposalDto>,
) -> Result<impl IntoResponse, HttpError> {
    let body = body.trimmed();
    body.validate().map_err(HttpError::validation)?;

    let proposal = app_state
        .proposal_service
        .update(&user.user, proposal_id, body)
        .await?;

    Ok(ApiResponse::success(
        "Proposal updated successfully",
        ProposalData { proposal },
    ))
}

pub async fn update_proposal_status(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    AppPath(proposal_id): AppPath<Uuid>,
    AppJson(body): AppJson<UpdateProposalStatusDto>,
) -> Result<impl IntoResponse, HttpError> {
    let proposal = app_state
        .proposal_service
        .set_status(&user.user, proposal_id, body.status)
        .await?;

    Ok(ApiResponse::success("Proposal status updated", ProposalData { proposal }))
}

pub async fn withdraw_proposal(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    AppPath(proposal_id): AppPath<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    app_state
        .proposal_service
        .withdraw(&user.user, proposal_id)
        .await?;

    Ok(ApiResponse::success("Proposal withdrawn successfully", ()))
}
