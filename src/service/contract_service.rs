use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::Store,
    dtos::{contractdtos::CreateContractDto, PageDto, RequestQueryDto},
    models::{
        contractmodel::{Contract, ContractStatus},
        proposalmodel::ProposalStatus,
        usermodel::{User, UserRole},
    },
    service::{error::ServiceError, gate},
};

/// Drives contracts through active -> submitted -> completed, with disputed
/// reachable from either non-terminal state.
#[derive(Debug, Clone)]
pub struct ContractService {
    db_client: Arc<dyn Store>,
}

impl ContractService {
    pub fn new(db_client: Arc<dyn Store>) -> Self {
        Self { db_client }
    }

    async fn contract(&self, contract_id: Uuid) -> Result<Contract, ServiceError> {
        self.db_client
            .get_contract(contract_id)
            .await?
            .ok_or(ServiceError::ContractNotFound(contract_id))
    }

    pub async fn create(&self, user: &User, body: CreateContractDto) -> Result<Contract, ServiceError> {
        gate::require_role(user, UserRole::Client, "Only clients can create contracts")?;

        let proposal_id = body
            .proposal_id
            .ok_or_else(|| ServiceError::Validation("Proposal ID is required".to_string()))?;

        let proposal = self
            .db_client
            .get_proposal(proposal_id)
            .await?
            .ok_or(ServiceError::ProposalNotFound(proposal_id))?;

        if proposal.status != ProposalStatus::Accepted {
            return Err(ServiceError::Validation(
                "Only accepted proposals can become contracts".to_string(),
            ));
        }

        let job = self
            .db_client
            .get_job(proposal.job_id)
            .await?
            .ok_or(ServiceError::JobNotFound(proposal.job_id))?;
        gate::require_owner(user, job.client_id, "You are not authorized to create a contract for this job")?;

        let contract = self
            .db_client
            .save_contract(
                job.id,
                user.id,
                proposal.freelancer_id,
                proposal.id,
                proposal.bid_amount,
            )
            .await?;

        tracing::info!(contract_id = %contract.id, proposal_id = %proposal.id, "contract created");
        Ok(contract)
    }

    pub async fn get(&self, user: &User, contract_id: Uuid) -> Result<Contract, ServiceError> {
        let contract = self.contract(contract_id).await?;
        gate::require_party(user, &contract, "You are not authorized to view this contract")?;
        Ok(contract)
    }

    pub async fn list(
        &self,
        user: &User,
        query: &RequestQueryDto,
    ) -> Result<PageDto<Contract>, ServiceError> {
        let (page, limit) = (query.page(), query.limit());
        let (contracts, total) = self
            .db_client
            .get_user_contracts(user.id, page, limit)
            .await?;
        Ok(PageDto::new("contracts", contracts, total, page, limit))
    }

    /// Guarded move of `contract` to `to`. The storage update only applies
    /// while the contract still sits in an allowed source state.
    async fn transition(&self, contract: Contract, to: ContractStatus) -> Result<Contract, ServiceError> {
        let invalid = ServiceError::InvalidContractTransition {
            contract_id: contract.id,
            from: contract.status,
            to,
        };

        if !contract.status.can_transition_to(to) {
            return Err(invalid);
        }

        let updated = if to == ContractStatus::Completed {
            self.db_client.complete_contract(contract.id).await?
        } else {
            self.db_client.transition_contract(contract.id, to).await?
        };

        let updated = updated.ok_or(invalid)?;
        tracing::info!(
            contract_id = %updated.id,
            from = contract.status.to_str(),
            to = to.to_str(),
            "contract status changed"
        );
        Ok(updated)
    }

    pub async fn submit_work(&self, user: &User, contract_id: Uuid) -> Result<Contract, ServiceError> {
        let contract = self.contract(contract_id).await?;
        gate::require_owner(user, contract.freelancer_id, "Only the contract freelancer can submit work")?;
        self.transition(contract, ContractStatus::Submitted).await
    }

    /// Completes the contract, the job and credits the freelancer's profile
    /// in one storage transaction.
    pub async fn complete(&self, user: &User, contract_id: Uuid) -> Result<Contract, ServiceError> {
        let contract = self.contract(contract_id).await?;
        gate::require_owner(user, contract.client_id, "Only the contract client can complete it")?;
        self.transition(contract, ContractStatus::Completed).await
    }

    pub async fn dispute(&self, user: &User, contract_id: Uuid) -> Result<Contract, ServiceError> {
        let contract = self.contract(contract_id).await?;
        gate::require_party(user, &contract, "Only a party to the contract can raise a dispute")?;
        self.transition(contract, ContractStatus::Disputed).await
    }

    /// Administrative override. Still bound to the transition graph, so it can
    /// never reopen a terminal contract or skip completion side effects.
    pub async fn set_status_as_admin(
        &self,
        user: &User,
        contract_id: Uuid,
        status: ContractStatus,
    ) -> Result<Contract, ServiceError> {
        gate::require_role(user, UserRole::Admin, "Only administrators can set contract status")?;
        let contract = self.contract(contract_id).await?;
        self.transition(contract, status).await
    }
}
