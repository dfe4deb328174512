use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::Store,
    dtos::{
        jobdtos::{CreateJobDto, UpdateJobDto},
        PageDto, RequestQueryDto,
    },
    models::{
        jobmodel::*,
        usermodel::{User, UserRole},
    },
    service::{error::ServiceError, gate},
};

#[derive(Debug, Clone)]
pub struct JobService {
    db_client: Arc<dyn Store>,
}

impl JobService {
    pub fn new(db_client: Arc<dyn Store>) -> Self {
        Self { db_client }
    }

    pub async fn create_job(&self, user: &User, body: CreateJobDto) -> Result<Job, ServiceError> {
        gate::require_role(user, UserRole::Client, "Only clients can create jobs")?;

        let job = self
            .db_client
            .save_job(
                user.id,
                &body.title,
                &body.description,
                body.difficulty,
                body.budget,
                body.budget_type,
                &body.skills_required,
            )
            .await?;

        tracing::info!(job_id = %job.id, client_id = %user.id, "job created");
        Ok(job)
    }

    pub async fn get_job(&self, job_id: Uuid) -> Result<Job, ServiceError> {
        self.db_client
            .get_job(job_id)
            .await?
            .ok_or(ServiceError::JobNotFound(job_id))
    }

    /// Jobs in `status`, open when not given. An empty page is not an error.
    pub async fn list_jobs(
        &self,
        status: Option<JobStatus>,
        query: &RequestQueryDto,
    ) -> Result<PageDto<Job>, ServiceError> {
        let filter = JobFilter {
            status: Some(status.unwrap_or(JobStatus::Open)),
            ..Default::default()
        };
        self.search_jobs(&filter, query).await
    }

    pub async fn search_jobs(
        &self,
        filter: &JobFilter,
        query: &RequestQueryDto,
    ) -> Result<PageDto<Job>, ServiceError> {
        let (page, limit) = (query.page(), query.limit());
        let (jobs, total) = self.db_client.search_jobs(filter, page, limit).await?;
        Ok(PageDto::new("jobs", jobs, total, page, limit))
    }

    /// Every job the client owns, whatever its status.
    pub async fn list_my_jobs(
        &self,
        user: &User,
        query: &RequestQueryDto,
    ) -> Result<PageDto<Job>, ServiceError> {
        gate::require_role(user, UserRole::Client, "Only clients can view their jobs")?;

        let filter = JobFilter {
            client_id: Some(user.id),
            ..Default::default()
        };
        self.search_jobs(&filter, query).await
    }

    async fn owned_job(&self, user: &User, job_id: Uuid, message: &str) -> Result<Job, ServiceError> {
        let job = self.get_job(job_id).await?;
        gate::require_owner(user, job.client_id, message)?;
        Ok(job)
    }

    pub async fn update_job(
        &self,
        user: &User,
        job_id: Uuid,
        body: UpdateJobDto,
    ) -> Result<Job, ServiceError> {
        let mut job = self
            .owned_job(user, job_id, "You are not authorized to update this job")
            .await?;

        if let Some(title) = body.title {
            job.title = title;
        }
        if let Some(description) = body.description {
            job.description = description;
        }
        if let Some(difficulty) = body.difficulty {
            job.difficulty = difficulty;
        }
        if let Some(budget) = body.budget {
            job.budget = budget;
        }
        if let Some(budget_type) = body.budget_type {
            job.budget_type = budget_type;
        }
        if let Some(skills_required) = body.skills_required {
            job.skills_required = skills_required;
        }

        self.db_client
            .update_job(&job)
            .await?
            .ok_or(ServiceError::JobNotFound(job_id))
    }

    pub async fn set_status(
        &self,
        user: &User,
        job_id: Uuid,
        status: JobStatus,
    ) -> Result<Job, ServiceError> {
        self.owned_job(user, job_id, "You are not authorized to update this job status")
            .await?;

        if status == JobStatus::InProgress && !self.db_client.has_accepted_proposal(job_id).await? {
            return Err(ServiceError::Validation(
                "A job can only be in progress once a proposal has been accepted".to_string(),
            ));
        }

        let job = self
            .db_client
            .update_job_status(job_id, status)
            .await?
            .ok_or(ServiceError::JobNotFound(job_id))?;

        tracing::info!(job_id = %job_id, status = status.to_str(), "job status changed");
        Ok(job)
    }

    /// Removes the job and its proposals. Jobs that already have contracts stay.
    pub async fn delete_job(&self, user: &User, job_id: Uuid) -> Result<(), ServiceError> {
        self.owned_job(user, job_id, "You are not authorized to delete this job")
            .await?;

        if !self.db_client.delete_job(job_id).await? {
            return Err(ServiceError::JobNotFound(job_id));
        }

        tracing::info!(job_id = %job_id, "job deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{job_dto, TestContext};

    #[tokio::test]
    async fn freelancer_cannot_create_job() {
        let ctx = TestContext::new();
        let bob = ctx.user("bob", UserRole::Freelancer).await;
        let err = ctx.jobs.create_job(&bob, job_dto(500.0)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
    }

    #[tokio::test]
    async fn only_owner_updates() {
        let ctx = TestContext::new();
        let alice = ctx.user("alice", UserRole::Client).await;
        let carol = ctx.user("carol", UserRole::Client).await;
        let job = ctx.jobs.create_job(&alice, job_dto(500.0)).await.unwrap();

        let change = UpdateJobDto {
            budget: Some(750.0),
            ..Default::default()
        };
        let err = ctx.jobs.update_job(&carol, job.id, change.clone()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));

        let updated = ctx.jobs.update_job(&alice, job.id, change).await.unwrap();
        assert_eq!(updated.budget, 750.0);
        assert_eq!(updated.title, job.title);
    }

    #[tokio::test]
    async fn missing_job_is_not_found_before_ownership() {
        let ctx = TestContext::new();
        let alice = ctx.user("alice", UserRole::Client).await;
        let err = ctx.jobs.delete_job(&alice, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, ServiceError::JobNotFound(_)));
    }

    #[tokio::test]
    async fn in_progress_needs_an_accepted_proposal() {
        let ctx = TestContext::new();
        let alice = ctx.user("alice", UserRole::Client).await;
        let job = ctx.jobs.create_job(&alice, job_dto(500.0)).await.unwrap();

        let err = ctx.jobs.set_status(&alice, job.id, JobStatus::InProgress).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        let cancelled = ctx.jobs.set_status(&alice, job.id, JobStatus::Cancelled).await.unwrap();
        assert_eq!(cancelled.status, JobStatus::Cancelled);
    }

    #[tokio::test]
    async fn listing_and_search() {
        let ctx = TestContext::new();
        let alice = ctx.user("alice", UserRole::Client).await;
        let cheap = ctx.jobs.create_job(&alice, job_dto(100.0)).await.unwrap();
        let pricey = ctx.jobs.create_job(&alice, job_dto(900.0)).await.unwrap();
        ctx.jobs.set_status(&alice, cheap.id, JobStatus::Cancelled).await.unwrap();

        let query = RequestQueryDto::default();
        let open = ctx.jobs.list_jobs(None, &query).await.unwrap();
        assert_eq!(open.total, 1);
        assert_eq!(open.items[0].id, pricey.id);

        let mine = ctx.jobs.list_my_jobs(&alice, &query).await.unwrap();
        assert_eq!(mine.total, 2);

        let in_range = JobFilter {
            min_budget: Some(500.0),
            max_budget: Some(1000.0),
            status: Some(JobStatus::Open),
            ..Default::default()
        };
        assert_eq!(ctx.jobs.search_jobs(&in_range, &query).await.unwrap().total, 1);

        let completed = ctx.jobs.list_jobs(Some(JobStatus::Completed), &query).await.unwrap();
        assert_eq!(completed.total, 0);
        assert_eq!(completed.total_pages, 0);
    }
}
