use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "contract_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    Active,
    Submitted,
    Completed,
    Disputed,
}

impl ContractStatus {
    pub fn to_str(&self) -> &str {
        match self {
            ContractStatus::Active => "active",
            ContractStatus::Submitted => "submitted",
            ContractStatus::Completed => "completed",
            ContractStatus::Disputed => "disputed",
        }
    }

    /// Completed and disputed contracts never move again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ContractStatus::Completed | ContractStatus::Disputed)
    }

    /// States a contract must be in to move into `self`.
    pub fn allowed_sources(&self) -> &'static [ContractStatus] {
        match self {
            ContractStatus::Active => &[],
            ContractStatus::Submitted => &[ContractStatus::Active],
            ContractStatus::Completed => &[ContractStatus::Submitted],
            ContractStatus::Disputed => &[ContractStatus::Active, ContractStatus::Submitted],
        }
    }

    pub fn can_transition_to(&self, next: ContractStatus) -> bool {
        next.allowed_sources().contains(self)
    }
}

#[derive(Debug, Serialize, Clone, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    pub id: Uuid,
    pub job_id: Uuid,
    pub client_id: Uuid,
    pub freelancer_id: Uuid,
    pub proposal_id: Uuid,
    pub amount: f64,
    pub status: ContractStatus,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Contract {
    pub fn is_party(&self, user_id: Uuid) -> bool {
        self.client_id == user_id || self.freelancer_id == user_id
    }
}
