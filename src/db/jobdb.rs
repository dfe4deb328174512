use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use super::{offset, DBClient, DbError};
use crate::models::jobmodel::*;

#[async_trait]
pub trait JobExt: Send + Sync {
    async fn save_job(
        &self,
        client_id: Uuid,
        title: &str,
        description: &str,
        difficulty: Difficulty,
        budget: f64,
        budget_type: BudgetType,
        skills_required: &[String],
    ) -> Result<Job, DbError>;

    async fn get_job(&self, job_id: Uuid) -> Result<Option<Job>, DbError>;

    /// Newest first.
    async fn search_jobs(
        &self,
        filter: &JobFilter,
        page: usize,
        limit: usize,
    ) -> Result<(Vec<Job>, i64), DbError>;

    /// Writes the descriptive fields of `job`; status is left alone.
    async fn update_job(&self, job: &Job) -> Result<Option<Job>, DbError>;

    async fn update_job_status(&self, job_id: Uuid, status: JobStatus) -> Result<Option<Job>, DbError>;

    async fn delete_job(&self, job_id: Uuid) -> Result<bool, DbError>;
}

fn push_job_filters<'a>(builder: &mut QueryBuilder<'a, Postgres>, filter: &'a JobFilter) {
    builder.push(" WHERE TRUE");

    if let Some(client_id) = filter.client_id {
        builder.push(" AND client_id = ").push_bind(client_id);
    }
    if let Some(skills) = &filter.skills {
        builder.push(" AND skills_required && ").push_bind(skills);
    }
    if let Some(difficulty) = filter.difficulty {
        builder.push(" AND difficulty = ").push_bind(difficulty);
    }
    if let Some(budget_type) = filter.budget_type {
        builder.push(" AND budget_type = ").push_bind(budget_type);
    }
    if let Some(min_budget) = filter.min_budget {
        builder.push(" AND budget >= ").push_bind(min_budget);
    }
    if let Some(max_budget) = filter.max_budget {
        builder.push(" AND budget <= ").push_bind(max_budget);
    }
    if let Some(status) = filter.status {
        builder.push(" AND status = ").push_bind(status);
    }
}

#[async_trait]
impl JobExt for DBClient {
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
        let job = sqlx::query_as::<_, Job>(
            r#"
            INSERT INTO jobs (client_id, title, description, difficulty, budget, budget_type, skills_required)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(client_id)
        .bind(title)
        .bind(description)
        .bind(difficulty)
        .bind(budget)
        .bind(budget_type)
        .bind(skills_required)
        .fetch_one(&self.pool)
        .await?;

        Ok(job)
    }

    async fn get_job(&self, job_id: Uuid) -> Result<Option<Job>, DbError> {
        let job = sqlx::query_as::<_, Job>(r#"SELECT * FROM jobs WHERE id = $1"#)
            .bind(job_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(job)
    }

    async fn search_jobs(
        &self,
        filter: &JobFilter,
        page: usize,
        limit: usize,
    ) -> Result<(Vec<Job>, i64), DbError> {
        let mut query = QueryBuilder::<Postgres>::new("SELECT * FROM jobs");
        push_job_filters(&mut query, filter);
        query
            .push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(limit as i64)
            .push(" OFFSET ")
            .push_bind(offset(page, limit));

        let jobs = query
            .build_query_as::<Job>()
            .fetch_all(&self.pool)
            .await?;

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM jobs");
        push_job_filters(&mut count, filter);

        let total: i64 = count
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        Ok((jobs, total))
    }

    async fn update_job(&self, job: &Job) -> Result<Option<Job>, DbError> {
        let updated = sqlx::query_as::<_, Job>(
            r#"
            UPDATE jobs
            SET title = $1, description = $2, difficulty = $3, budget = $4,
                budget_type = $5, skills_required = $6, updated_at = NOW()
            WHERE id = $7
            RETURNING *
            "#,
        )
        .bind(&job.title)
        .bind(&job.description)
        .bind(job.difficulty)
        .bind(job.budget)
        .bind(job.budget_type)
        .bind(&job.skills_required)
        .bind(job.id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    async fn update_job_status(&self, job_id: Uuid, status: JobStatus) -> Result<Option<Job>, DbError> {
        let job = sqlx::query_as::<_, Job>(
            r#"
            UPDATE jobs
            SET status = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING *
            "#,
        )
        .bind(status)
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(job)
    }

    async fn delete_job(&self, job_id: Uuid) -> Result<bool, DbError> {
        let result = sqlx::query(r#"DELETE FROM jobs WHERE id = $1"#)
            .bind(job_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
