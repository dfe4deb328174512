use std::sync::Arc;

use axum::{
    middleware,
    response::IntoResponse,
    routing::{get, patch},
    Extension, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dtos::{
        contractdtos::{ContractData, CreateContractDto, UpdateContractStatusDto},
        ApiResponse, RequestQueryDto,
    },
    error::HttpError,
    extract::{AppJson, AppPath, AppQuery},
    middleware::{auth, role_check, JWTAuthMiddeware},
    models::usermodel::UserRole,
    AppState,
};

pub fn contracts_handler() -> Router {
    Router::new()
        .route("/", get(get_contracts).post(create_contract))
        .route("/:id", get(get_contract))
        .route("/:id/submit", patch(submit_work))
        .route("/:id/complete", patch(complete_contract))
        .route("/:id/dispute", patch(dispute_contract))
        .route(
            "/:id/status",
            patch(update_contract_status).layer(middleware::from_fn(|state, req, next| {
                role_check(state, req, next, vec![UserRole::Admin])
            })),
        )
        .layer(middleware::from_fn(auth))
}

pub async fn get_contracts(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    AppQuery(query_params): AppQuery<RequestQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query_params.validate().map_err(HttpError::validation)?;

    let page = app_state
        .contract_service
        .list(&user.user, &query_params)
        .await?;

    Ok(ApiResponse::success("Contracts retrieved", page))
}

pub async fn get_contract(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    AppPath(contract_id): AppPath<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let contract = app_state.contract_service.get(&user.user, contract_id).await?;

    Ok(ApiResponse::success("Contract retrieved", ContractData { contract }))
}

pub async fn create_contract(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    AppJson(body): AppJson<CreateContractDto>,
) -> Result<impl IntoResponse, HttpError> {
    let contract = app_state.contract_service.create(&user.user, body).await?;

    Ok(ApiResponse::created(
        "Contract created successfully",
        ContractData { contract },
    ))
}

pub async fn submit_work(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    AppPath(contract_id): AppPath<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let contract = app_state
        .contract_service
        .submit_work(&user.user, contract_id)
        .await?;

    Ok(ApiResponse::success("Work submitted successfully", ContractData { contract }))
}

pub async fn complete_contract(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    AppPath(contract_id): AppPath<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let contract = app_state
        .contract_service
        .complete(&user.user, contract_id)
        .await?;

    Ok(ApiResponse::success(
        "Contract completed successfully",
        ContractData { contract },
    ))
}

pub async fn dispute_contract(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    AppPath(contract_id): AppPath<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let contract = app_state
        .contract_service
        .dispute(&user.user, contract_id)
        .await?;

    Ok(ApiResponse::success("Dispute raised successfully", ContractData { contract }))
}

pub async fn update_contract_status(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    AppPath(contract_id): AppPath<Uuid>,
    AppJson(body): AppJson<UpdateContractStatusDto>,
) -> Result<impl IntoResponse, HttpError> {
    let contract = app_state
        .contract_service
        .set_status_as_admin(&user.user, contract_id, body.status)
        .await?;

    Ok(ApiResponse::success("Contract status updated", ContractData { contract }))
}
