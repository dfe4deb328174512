//! In-process store backing `STORAGE_BACKEND=memory` and the test suite.
//!
//! Every operation takes the single table lock once, so uniqueness checks,
//! conditional transitions and multi-row effects are atomic with respect to
//! each other, matching the guarantees the Postgres constraints and
//! transactions give `DBClient`.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::types::Json;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::contractdb::ContractExt;
use super::freelancerdb::FreelancerExt;
use super::jobdb::JobExt;
use super::proposaldb::ProposalExt;
use super::userdb::UserExt;
use super::{
    DbError, CONTRACTS_PROPOSAL_ID_KEY, FREELANCER_PROFILES_USER_ID_KEY,
    PROPOSALS_JOB_FREELANCER_KEY, USERS_EMAIL_KEY, USERS_USERNAME_KEY,
};
use crate::models::{
    contractmodel::{Contract, ContractStatus},
    freelancermodel::{FreelancerProfile, PortfolioItem},
    jobmodel::*,
    proposalmodel::{Proposal, ProposalStatus},
    usermodel::{User, UserRole},
};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    profiles: Vec<FreelancerProfile>,
    jobs: Vec<Job>,
    proposals: Vec<Proposal>,
    contracts: Vec<Contract>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Rows are appended in insertion order, so walking backwards is newest first.
fn paginate<'a, T, I>(rows: I, page: usize, limit: usize) -> (Vec<T>, i64)
where
    T: Clone + 'a,
    I: Iterator<Item = &'a T>,
{
    let matched: Vec<&T> = rows.collect();
    let total = matched.len() as i64;
    let skip = page.saturating_sub(1).saturating_mul(limit);
    let page_rows = matched.into_iter().skip(skip).take(limit).cloned().collect();
    (page_rows, total)
}

#[async_trait]
impl UserExt for MemoryStore {
    async fn get_user(
        &self,
        user_id: Option<Uuid>,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<User>, DbError> {
        let tables = self.tables.read().await;

        let user = if let Some(user_id) = user_id {
            tables.users.iter().find(|u| u.id == user_id)
        } else if let Some(username) = username {
            tables.users.iter().find(|u| u.username == username)
        } else if let Some(email) = email {
            tables.users.iter().find(|u| u.email == email)
        } else {
            None
        };

        Ok(user.cloned())
    }

    async fn get_user_by_refresh_token(&self, token: &str) -> Result<Option<User>, DbError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|u| u.refresh_token.as_deref() == Some(token))
            .cloned())
    }

    async fn save_user(
        &self,
        username: &str,
        fullname: &str,
        email: &str,
        password: &str,
        role: UserRole,
    ) -> Result<User, DbError> {
        let mut tables = self.tables.write().await;

        if tables.users.iter().any(|u| u.email == email) {
            return Err(DbError::UniqueViolation(USERS_EMAIL_KEY.to_string()));
        }
        if tables.users.iter().any(|u| u.username == username) {
            return Err(DbError::UniqueViolation(USERS_USERNAME_KEY.to_string()));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            fullname: fullname.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role,
            profile_picture: None,
            refresh_token: None,
            client_rating: 0.0,
            client_review_count: 0,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(user.clone());

        Ok(user)
    }

    async fn update_refresh_token(
        &self,
        user_id: Uuid,
        token: Option<&str>,
    ) -> Result<(), DbError> {
        let mut tables = self.tables.write().await;
        if let Some(user) = tables.users.iter_mut().find(|u| u.id == user_id) {
            user.refresh_token = token.map(str::to_string);
            user.updated_at = Utc::now();
        }
        Ok(())
    }
}

#[async_trait]
impl FreelancerExt for MemoryStore {
    async fn save_freelancer_profile(
        &self,
        user_id: Uuid,
        title: &str,
        bio: Option<&str>,
        skills: &[String],
        hourly_rate: f64,
        portfolio: &[PortfolioItem],
    ) -> Result<FreelancerProfile, DbError> {
        let mut tables = self.tables.write().await;

        if tables.profiles.iter().any(|p| p.user_id == user_id) {
            return Err(DbError::UniqueViolation(
                FREELANCER_PROFILES_USER_ID_KEY.to_string(),
            ));
        }
        if !tables.users.iter().any(|u| u.id == user_id) {
            return Err(DbError::ForeignKeyViolation(
                "freelancer_profiles_user_id_fkey".to_string(),
            ));
        }

        let now = Utc::now();
        let profile = FreelancerProfile {
            id: Uuid::new_v4(),
            user_id,
            title: title.to_string(),
            bio: bio.map(str::to_string),
            skills: skills.to_vec(),
            hourly_rate,
            portfolio: Json(portfolio.to_vec()),
            rating: 0.0,
            review_count: 0,
            total_jobs: 0,
            created_at: now,
            updated_at: now,
        };
        tables.profiles.push(profile.clone());

        Ok(profile)
    }

    async fn get_freelancer_profile(&self, profile_id: Uuid) -> Result<Option<FreelancerProfile>, DbError> {
        let tables = self.tables.read().await;
        Ok(tables.profiles.iter().find(|p| p.id == profile_id).cloned())
    }

    async fn get_freelancer_profile_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<FreelancerProfile>, DbError> {
        let tables = self.tables.read().await;
        Ok(tables.profiles.iter().find(|p| p.user_id == user_id).cloned())
    }

    async fn get_freelancer_profiles(
        &self,
        page: usize,
        limit: usize,
    ) -> Result<(Vec<FreelancerProfile>, i64), DbError> {
        let tables = self.tables.read().await;
        Ok(paginate(tables.profiles.iter().rev(), page, limit))
    }

    async fn search_freelancer_profiles(
        &self,
        skills: &[String],
        page: usize,
        limit: usize,
    ) -> Result<(Vec<FreelancerProfile>, i64), DbError> {
        let tables = self.tables.read().await;

        let mut matched: Vec<&FreelancerProfile> = tables
            .profiles
            .iter()
            .rev()
            .filter(|p| p.has_any_skill(skills))
            .collect();
        matched.sort_by(|a, b| b.rating.total_cmp(&a.rating));

        Ok(paginate(matched.into_iter(), page, limit))
    }

    async fn update_freelancer_profile(
        &self,
        profile: &FreelancerProfile,
    ) -> Result<Option<FreelancerProfile>, DbError> {
        let mut tables = self.tables.write().await;

        let Some(stored) = tables.profiles.iter_mut().find(|p| p.user_id == profile.user_id) else {
            return Ok(None);
        };
        stored.title = profile.title.clone();
        stored.bio = profile.bio.clone();
        stored.skills = profile.skills.clone();
        stored.hourly_rate = profile.hourly_rate;
        stored.updated_at = Utc::now();

        Ok(Some(stored.clone()))
    }

    async fn delete_freelancer_profile(&self, user_id: Uuid) -> Result<bool, DbError> {
        let mut tables = self.tables.write().await;
        let before = tables.profiles.len();
        tables.profiles.retain(|p| p.user_id != user_id);
        Ok(tables.profiles.len() < before)
    }

    async fn add_portfolio_item(
        &self,
        user_id: Uuid,
        item: &PortfolioItem,
    ) -> Result<Option<FreelancerProfile>, DbError> {
        let mut tables = self.tables.write().await;

        let Some(stored) = tables.profiles.iter_mut().find(|p| p.user_id == user_id) else {
            return Ok(None);
        };
        stored.portfolio.0.push(item.clone());
        stored.updated_at = Utc::now();

        Ok(Some(stored.clone()))
    }

    async fn remove_portfolio_item(
        &self,
        user_id: Uuid,
        index: usize,
    ) -> Result<Option<FreelancerProfile>, DbError> {
        let mut tables = self.tables.write().await;

        let Some(stored) = tables.profiles.iter_mut().find(|p| p.user_id == user_id) else {
            return Ok(None);
        };
        if index >= stored.portfolio.0.len() {
            return Ok(None);
        }
        stored.portfolio.0.remove(index);
        stored.updated_at = Utc::now();

        Ok(Some(stored.clone()))
    }
}

#[async_trait]
impl JobExt for MemoryStore {
    async fn save_job(
        &self,
        client_id: Uuid,
        title: &str,
        description: &str,
        difficulty: Difficulty,
        budget: f64,
        budget_type: BudgetType,
        skills_required: &[String],
    ) -> Result<Job, DbError> {
        let mut tables = self.tables.write().await;

        if !tables.users.iter().any(|u| u.id == client_id) {
            return Err(DbError::ForeignKeyViolation("jobs_client_id_fkey".to_string()));
        }

        let now = Utc::now();
        let job = Job {
            id: Uuid::new_v4(),
            client_id,
            title: title.to_string(),
            description: description.to_string(),
            difficulty,
            budget,
            budget_type,
            skills_required: skills_required.to_vec(),
            status: JobStatus::Open,
            created_at: now,
            updated_at: now,
        };
        tables.jobs.push(job.clone());

        Ok(job)
    }

    async fn get_job(&self, job_id: Uuid) -> Result<Option<Job>, DbError> {
        let tables = self.tables.read().await;
        Ok(tables.jobs.iter().find(|j| j.id == job_id).cloned())
    }

    async fn search_jobs(
        &self,
        filter: &JobFilter,
        page: usize,
        limit: usize,
    ) -> Result<(Vec<Job>, i64), DbError> {
        let tables = self.tables.read().await;
        Ok(paginate(
            tables.jobs.iter().rev().filter(|job| filter.matches(job)),
            page,
            limit,
        ))
    }

    async fn update_job(&self, job: &Job) -> Result<Option<Job>, DbError> {
        let mut tables = self.tables.write().await;

        let Some(stored) = tables.jobs.iter_mut().find(|j| j.id == job.id) else {
            return Ok(None);
        };
        stored.title = job.title.clone();
        stored.description = job.description.clone();
        stored.difficulty = job.difficulty;
        stored.budget = job.budget;
        stored.budget_type = job.budget_type;
        stored.skills_required = job.skills_required.clone();
        stored.updated_at = Utc::now();

        Ok(Some(stored.clone()))
    }

    async fn update_job_status(&self, job_id: Uuid, status: JobStatus) -> Result<Option<Job>, DbError> {
        let mut tables = self.tables.write().await;

        let Some(stored) = tables.jobs.iter_mut().find(|j| j.id == job_id) else {
            return Ok(None);
        };
        stored.status = status;
        stored.updated_at = Utc::now();

        Ok(Some(stored.clone()))
    }

    async fn delete_job(&self, job_id: Uuid) -> Result<bool, DbError> {
        let mut tables = self.tables.write().await;

        if tables.contracts.iter().any(|c| c.job_id == job_id) {
            return Err(DbError::ForeignKeyViolation("contracts_job_id_fkey".to_string()));
        }

        let before = tables.jobs.len();
        tables.jobs.retain(|j| j.id != job_id);
        let deleted = tables.jobs.len() < before;
        if deleted {
            tables.proposals.retain(|p| p.job_id != job_id);
        }

        Ok(deleted)
    }
}

#[async_trait]
impl ProposalExt for MemoryStore {
    async fn save_proposal(
        &self,
        job_id: Uuid,
        freelancer_id: Uuid,
        cover_letter: &str,
        bid_amount: f64,
        estimated_time: &str,
    ) -> Result<Proposal, DbError> {
        let mut tables = self.tables.write().await;

        if tables
            .proposals
            .iter()
            .any(|p| p.job_id == job_id && p.freelancer_id == freelancer_id)
        {
            return Err(DbError::UniqueViolation(PROPOSALS_JOB_FREELANCER_KEY.to_string()));
        }
        if !tables.jobs.iter().any(|j| j.id == job_id) {
            return Err(DbError::ForeignKeyViolation("proposals_job_id_fkey".to_string()));
        }

        let now = Utc::now();
        let proposal = Proposal {
            id: Uuid::new_v4(),
            job_id,
            freelancer_id,
            cover_letter: cover_letter.to_string(),
            bid_amount,
            estimated_time: estimated_time.to_string(),
            status: ProposalStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        tables.proposals.push(proposal.clone());

        Ok(proposal)
    }

    async fn get_proposal(&self, proposal_id: Uuid) -> Result<Option<Proposal>, DbError> {
        let tables = self.tables.read().await;
        Ok(tables.proposals.iter().find(|p| p.id == proposal_id).cloned())
    }

    async fn get_job_proposals(
        &self,
        job_id: Uuid,
        page: usize,
        limit: usize,
    ) -> Result<(Vec<Proposal>, i64), DbError> {
        let tables = self.tables.read().await;
        Ok(paginate(
            tables.proposals.iter().rev().filter(|p| p.job_id == job_id),
            page,
            limit,
        ))
    }

    async fn get_freelancer_proposals(
        &self,
        freelancer_id: Uuid,
        page: usize,
        limit: usize,
    ) -> Result<(Vec<Proposal>, i64), DbError> {
        let tables = self.tables.read().await;
        Ok(paginate(
            tables
                .proposals
                .iter()
                .rev()
                .filter(|p| p.freelancer_id == freelancer_id),
            page,
            limit,
        ))
    }

    async fn update_pending_proposal(
        &self,
        proposal_id: Uuid,
        cover_letter: &str,
        bid_amount: f64,
        estimated_time: &str,
    ) -> Result<Option<Proposal>, DbError> {
        let mut tables = self.tables.write().await;

        let Some(stored) = tables
            .proposals
            .iter_mut()
            .find(|p| p.id == proposal_id && p.status == ProposalStatus::Pending)
        else {
            return Ok(None);
        };
        stored.cover_letter = cover_letter.to_string();
        stored.bid_amount = bid_amount;
        stored.estimated_time = estimated_time.to_string();
        stored.updated_at = Utc::now();

        Ok(Some(stored.clone()))
    }

    async fn delete_pending_proposal(&self, proposal_id: Uuid) -> Result<bool, DbError> {
        let mut tables = self.tables.write().await;
        let before = tables.proposals.len();
        tables
            .proposals
            .retain(|p| !(p.id == proposal_id && p.status == ProposalStatus::Pending));
        Ok(tables.proposals.len() < before)
    }

    async fn update_proposal_status(
        &self,
        proposal_id: Uuid,
        status: ProposalStatus,
    ) -> Result<Option<Proposal>, DbError> {
        let mut tables = self.tables.write().await;

        if tables.contracts.iter().any(|c| c.proposal_id == proposal_id) {
            return Ok(None);
        }

        let Some(stored) = tables.proposals.iter_mut().find(|p| p.id == proposal_id) else {
            return Ok(None);
        };
        stored.status = status;
        stored.updated_at = Utc::now();
        let proposal = stored.clone();

        let still_accepted = tables
            .proposals
            .iter()
            .any(|p| p.job_id == proposal.job_id && p.status == ProposalStatus::Accepted);

        if let Some(job) = tables.jobs.iter_mut().find(|j| j.id == proposal.job_id) {
            if status == ProposalStatus::Accepted {
                job.status = JobStatus::InProgress;
                job.updated_at = Utc::now();
            } else if job.status == JobStatus::InProgress && !still_accepted {
                job.status = JobStatus::Open;
                job.updated_at = Utc::now();
            }
        }

        Ok(Some(proposal))
    }

    async fn has_accepted_proposal(&self, job_id: Uuid) -> Result<bool, DbError> {
        let tables = self.tables.read().await;
        Ok(tables
            .proposals
            .iter()
            .any(|p| p.job_id == job_id && p.status == ProposalStatus::Accepted))
    }
}

#[async_trait]
impl ContractExt for MemoryStore {
    async fn save_contract(
        &self,
        job_id: Uuid,
        client_id: Uuid,
        freelancer_id: Uuid,
        proposal_id: Uuid,
        amount: f64,
    ) -> Result<Contract, DbError> {
        let mut tables = self.tables.write().await;

        if tables.contracts.iter().any(|c| c.proposal_id == proposal_id) {
            return Err(DbError::UniqueViolation(CONTRACTS_PROPOSAL_ID_KEY.to_string()));
        }
        if !tables.proposals.iter().any(|p| p.id == proposal_id) {
            return Err(DbError::ForeignKeyViolation(
                "contracts_proposal_id_fkey".to_string(),
            ));
        }

        let now = Utc::now();
        let contract = Contract {
            id: Uuid::new_v4(),
            job_id,
            client_id,
            freelancer_id,
            proposal_id,
            amount,
            status: ContractStatus::Active,
            start_date: now,
            end_date: None,
            created_at: now,
            updated_at: now,
        };
        tables.contracts.push(contract.clone());

        Ok(contract)
    }

    async fn get_contract(&self, contract_id: Uuid) -> Result<Option<Contract>, DbError> {
        let tables = self.tables.read().await;
        Ok(tables.contracts.iter().find(|c| c.id == contract_id).cloned())
    }

    async fn get_contract_by_proposal(&self, proposal_id: Uuid) -> Result<Option<Contract>, DbError> {
        let tables = self.tables.read().await;
        Ok(tables
            .contracts
            .iter()
            .find(|c| c.proposal_id == proposal_id)
            .cloned())
    }

    async fn get_user_contracts(
        &self,
        user_id: Uuid,
        page: usize,
        limit: usize,
    ) -> Result<(Vec<Contract>, i64), DbError> {
        let tables = self.tables.read().await;
        Ok(paginate(
            tables.contracts.iter().rev().filter(|c| c.is_party(user_id)),
            page,
            limit,
        ))
    }

    async fn transition_contract(
        &self,
        contract_id: Uuid,
        to: ContractStatus,
    ) -> Result<Option<Contract>, DbError> {
        let mut tables = self.tables.write().await;

        let Some(stored) = tables
            .contracts
            .iter_mut()
            .find(|c| c.id == contract_id && c.status.can_transition_to(to))
        else {
            return Ok(None);
        };
        stored.status = to;
        stored.updated_at = Utc::now();

        Ok(Some(stored.clone()))
    }

    async fn complete_contract(&self, contract_id: Uuid) -> Result<Option<Contract>, DbError> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();

        let Some(stored) = tables.contracts.iter_mut().find(|c| {
            c.id == contract_id && c.status.can_transition_to(ContractStatus::Completed)
        }) else {
            return Ok(None);
        };
        stored.status = ContractStatus::Completed;
        stored.end_date = Some(now);
        stored.updated_at = now;
        let contract = stored.clone();

        if let Some(job) = tables.jobs.iter_mut().find(|j| j.id == contract.job_id) {
            job.status = JobStatus::Completed;
            job.updated_at = now;
        }
        if let Some(profile) = tables
            .profiles
            .iter_mut()
            .find(|p| p.user_id == contract.freelancer_id)
        {
            profile.total_jobs += 1;
            profile.updated_at = now;
        }

        Ok(Some(contract))
    }
}

#[cfg(test)]
mod tests {
    use super::paginate;

    #[test]
    fn pages_walk_the_rows() {
        let rows = [1, 2, 3, 4, 5];
        assert_eq!(paginate(rows.iter(), 2, 2), (vec![3, 4], 5));
        assert_eq!(paginate(rows.iter(), 4, 2), (vec![], 5));
    }

    #[test]
    fn huge_page_is_empty() {
        let rows = [1, 2, 3];
        assert_eq!(paginate(rows.iter(), usize::MAX, 50), (vec![], 3));
    }
}
