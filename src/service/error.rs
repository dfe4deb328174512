use thiserror::Error;
use uuid::Uuid;

use crate::{
    db::{
        DbError, CONTRACTS_PROPOSAL_ID_KEY, FREELANCER_PROFILES_USER_ID_KEY,
        PROPOSALS_JOB_FREELANCER_KEY, USERS_EMAIL_KEY, USERS_USERNAME_KEY,
    },
    error::{ErrorMessage, HttpError},
    models::contractmodel::ContractStatus,
};
use axum::http::StatusCode;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Job not found")]
    JobNotFound(Uuid),

    #[error("Proposal not found")]
    ProposalNotFound(Uuid),

    #[error("Contract not found")]
    ContractNotFound(Uuid),

    #[error("Freelancer profile not found")]
    FreelancerProfileNotFound,

    #[error("Portfolio item {0} not found")]
    PortfolioItemNotFound(usize),

    #[error("Contract cannot move from {} to {}", .from.to_str(), .to.to_str())]
    InvalidContractTransition {
        contract_id: Uuid,
        from: ContractStatus,
        to: ContractStatus,
    },

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(DbError),

    #[error("Other error: {0}")]
    Other(String),
}

impl From<DbError> for ServiceError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::UniqueViolation(constraint) => {
                let message = match constraint.as_str() {
                    USERS_EMAIL_KEY => ErrorMessage::EmailExist.to_string(),
                    USERS_USERNAME_KEY => ErrorMessage::UsernameExist.to_string(),
                    FREELANCER_PROFILES_USER_ID_KEY => "Freelancer profile already exists".to_string(),
                    PROPOSALS_JOB_FREELANCER_KEY => "You have already submitted a proposal for this job".to_string(),
                    CONTRACTS_PROPOSAL_ID_KEY => "A contract already exists for this proposal".to_string(),
                    _ => "Resource already exists".to_string(),
                };
                ServiceError::Conflict(message)
            }
            DbError::ForeignKeyViolation(_) => {
                ServiceError::Conflict("Resource is still referenced by other records".to_string())
            }
            other => ServiceError::Database(other),
        }
    }
}

impl From<ErrorMessage> for ServiceError {
    fn from(err: ErrorMessage) -> Self {
        ServiceError::Other(err.to_string())
    }
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::JobNotFound(_)
            | ServiceError::ProposalNotFound(_)
            | ServiceError::ContractNotFound(_)
            | ServiceError::FreelancerProfileNotFound
            | ServiceError::PortfolioItemNotFound(_) => StatusCode::NOT_FOUND,

            ServiceError::InvalidContractTransition { .. }
            | ServiceError::Validation(_) => StatusCode::BAD_REQUEST,

            ServiceError::Unauthorized(_) => StatusCode::UNAUTHORIZED,

            ServiceError::Forbidden(_) => StatusCode::FORBIDDEN,

            ServiceError::Conflict(_) => StatusCode::CONFLICT,

            ServiceError::Database(_) | ServiceError::Other(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<ServiceError> for HttpError {
    fn from(error: ServiceError) -> Self {
        let status = error.status_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %error, "request failed");
            return HttpError::server_error(ErrorMessage::ServerError.to_string());
        }
        HttpError::new(error.to_string(), status)
    }
}
