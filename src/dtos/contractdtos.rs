use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::contractmodel::{Contract, ContractStatus};

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateContractDto {
    pub proposal_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateContractStatusDto {
    pub status: ContractStatus,
}

#[derive(Debug, Serialize)]
pub struct ContractData {
    pub contract: Contract,
}
