use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::proposalmodel::{Proposal, ProposalStatus};

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProposalDto {
    pub job_id: Uuid,

    #[validate(length(min = 20, message = "Cover letter must be at least 20 characters"))]
    pub cover_letter: String,

    #[validate(range(min = 0.0, message = "Bid amount cannot be negative"))]
    pub bid_amount: f64,

    #[validate(length(min = 1, message = "Estimated time is required"))]
    pub estimated_time: String,
}

impl CreateProposalDto {
    pub fn trimmed(mut self) -> Self {
        self.cover_letter = self.cover_letter.trim().to_string();
        self.estimated_time = self.estimated_time.trim().to_string();
        self
    }
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProposalDto {
    #[validate(length(min = 20, message = "Cover letter must be at least 20 characters"))]
    pub cover_letter: Option<String>,

    #[validate(range(min = 0.0, message = "Bid amount cannot be negative"))]
    pub bid_amount: Option<f64>,

    #[validate(length(min = 1, message = "Estimated time cannot be empty"))]
    pub estimated_time: Option<String>,
}

impl UpdateProposalDto {
    pub fn trimmed(mut self) -> Self {
        self.cover_letter = self.cover_letter.map(|c| c.trim().to_string());
        self.estimated_time = self.estimated_time.map(|e| e.trim().to_string());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProposalStatusDto {
    pub status: ProposalStatus,
}

#[derive(Debug, Serialize)]
pub struct ProposalData {
    pub proposal: Proposal,
}
