use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::Store,
    dtos::{
        proposaldtos::{CreateProposalDto, UpdateProposalDto},
        PageDto, RequestQueryDto,
    },
    models::{
        jobmodel::{Job, JobStatus},
        proposalmodel::{Proposal, ProposalStatus},
        usermodel::{User, UserRole},
    },
    service::{error::ServiceError, gate},
};

const NOT_PENDING: &str = "Only pending proposals can be changed";

#[derive(Debug, Clone)]
pub struct ProposalService {
    db_client: Arc<dyn Store>,
}

impl ProposalService {
    pub fn new(db_client: Arc<dyn Store>) -> Self {
        Self { db_client }
    }

    async fn job(&self, job_id: Uuid) -> Result<Job, ServiceError> {
        self.db_client
            .get_job(job_id)
            .await?
            .ok_or(ServiceError::JobNotFound(job_id))
    }

    async fn proposal(&self, proposal_id: Uuid) -> Result<Proposal, ServiceError> {
        self.db_client
            .get_proposal(proposal_id)
            .await?
            .ok_or(ServiceError::ProposalNotFound(proposal_id))
    }

    /// A second proposal from the same freelancer for the same job is
    /// rejected by the storage unique key.
    pub async fn submit(&self, user: &User, body: CreateProposalDto) -> Result<Proposal, ServiceError> {
        gate::require_role(user, UserRole::Freelancer, "Only freelancers can submit proposals")?;

        let job = self.job(body.job_id).await?;
        if job.status != JobStatus::Open {
            return Err(ServiceError::Validation(
                "This job is no longer accepting proposals".to_string(),
            ));
        }

        let proposal = self
            .db_client
            .save_proposal(
                job.id,
                user.id,
                &body.cover_letter,
                body.bid_amount,
                &body.estimated_time,
            )
            .await?;

        tracing::info!(proposal_id = %proposal.id, job_id = %job.id, freelancer_id = %user.id, "proposal submitted");
        Ok(proposal)
    }

    /// Visible to the freelancer who wrote it and the client who owns the job.
    pub async fn get(&self, user: &User, proposal_id: Uuid) -> Result<Proposal, ServiceError> {
        let proposal = self.proposal(proposal_id).await?;
        if proposal.freelancer_id == user.id {
            return Ok(proposal);
        }

        let job = self.job(proposal.job_id).await?;
        gate::require_owner(user, job.client_id, "You are not authorized to view this proposal")?;
        Ok(proposal)
    }

    pub async fn update(
        &self,
        user: &User,
        proposal_id: Uuid,
        body: UpdateProposalDto,
    ) -> Result<Proposal, ServiceError> {
        let mut proposal = self.proposal(proposal_id).await?;
        gate::require_owner(user, proposal.freelancer_id, "You are not authorized to update this proposal")?;

        if proposal.status != ProposalStatus::Pending {
            return Err(ServiceError::Validation(NOT_PENDING.to_string()));
        }

        if let Some(cover_letter) = body.cover_letter {
            proposal.cover_letter = cover_letter;
        }
        if let Some(bid_amount) = body.bid_amount {
            proposal.bid_amount = bid_amount;
        }
        if let Some(estimated_time) = body.estimated_time {
            proposal.estimated_time = estimated_time;
        }

        // The status may have moved since the read above.
        self.db_client
            .update_pending_proposal(
                proposal.id,
                &proposal.cover_letter,
                proposal.bid_amount,
                &proposal.estimated_time,
            )
            .await?
            .ok_or_else(|| ServiceError::Validation(NOT_PENDING.to_string()))
    }

    pub async fn withdraw(&self, user: &User, proposal_id: Uuid) -> Result<(), ServiceError> {
        let proposal = self.proposal(proposal_id).await?;
        gate::require_owner(user, proposal.freelancer_id, "You are not authorized to withdraw this proposal")?;

        if proposal.status != ProposalStatus::Pending
            || !self.db_client.delete_pending_proposal(proposal_id).await?
        {
            return Err(ServiceError::Validation(NOT_PENDING.to_string()));
        }

        tracing::info!(proposal_id = %proposal_id, "proposal withdrawn");
        Ok(())
    }

    /// Client decision on a proposal. Accepting puts the job in progress.
    pub async fn set_status(
        &self,
        user: &User,
        proposal_id: Uuid,
        status: ProposalStatus,
    ) -> Result<Proposal, ServiceError> {
        let proposal = self.proposal(proposal_id).await?;
        let job = self.job(proposal.job_id).await?;
        gate::require_owner(user, job.client_id, "You are not authorized to update this proposal")?;

        if self.db_client.get_contract_by_proposal(proposal_id).await?.is_some() {
            return Err(ServiceError::Validation(
                "A contract already exists for this proposal".to_string(),
            ));
        }

        if status == ProposalStatus::Accepted
            && matches!(job.status, JobStatus::Completed | JobStatus::Cancelled)
        {
            return Err(ServiceError::Validation(format!(
                "Cannot accept a proposal for a {} job",
                job.status.to_str()
            )));
        }

        let proposal = self
            .db_client
            .update_proposal_status(proposal_id, status)
            .await?
            .ok_or_else(|| {
                ServiceError::Validation("A contract already exists for this proposal".to_string())
            })?;

        tracing::info!(proposal_id = %proposal_id, status = status.to_str(), "proposal status changed");
        Ok(proposal)
    }

    pub async fn list_for_job(
        &self,
        user: &User,
        job_id: Uuid,
        query: &RequestQueryDto,
    ) -> Result<PageDto<Proposal>, ServiceError> {
        let job = self.job(job_id).await?;
        gate::require_owner(user, job.client_id, "You are not authorized to view these proposals")?;

        let (page, limit) = (query.page(), query.limit());
        let (proposals, total) = self.db_client.get_job_proposals(job_id, page, limit).await?;
        Ok(PageDto::new("proposals", proposals, total, page, limit))
    }

    pub async fn list_mine(
        &self,
        user: &User,
        query: &RequestQueryDto,
    ) -> Result<PageDto<Proposal>, ServiceError> {
        gate::require_role(user, UserRole::Freelancer, "Only freelancers have proposals")?;

        let (page, limit) = (query.page(), query.limit());
        let (proposals, total) = self
            .db_client
            .get_freelancer_proposals(user.id, page, limit)
            .await?;
        Ok(PageDto::new("proposals", proposals, total, page, limit))
    }
}
