use async_trait::async_trait;
use uuid::Uuid;

use super::{offset, DBClient, DbError};
use crate::models::proposalmodel::*;

#[async_trait]
pub trait ProposalExt: Send + Sync {
    async fn save_proposal(
        &self,
        job_id: Uuid,
        freelancer_id: Uuid,
        cover_letter: &str,
        bid_amount: f64,
        estimated_time: &str,
    ) -> Result<Proposal, DbError>;

    async fn get_proposal(&self, proposal_id: Uuid) -> Result<Option<Proposal>, DbError>;

    async fn get_job_proposals(
        &self,
        job_id: Uuid,
        page: usize,
        limit: usize,
    ) -> Result<(Vec<Proposal>, i64), DbError>;

    async fn get_freelancer_proposals(
        &self,
        freelancer_id: Uuid,
        page: usize,
        limit: usize,
    ) -> Result<(Vec<Proposal>, i64), DbError>;

    /// Applies the edit only while the proposal is still pending.
    async fn update_pending_proposal(
        &self,
        proposal_id: Uuid,
        cover_letter: &str,
        bid_amount: f64,
        estimated_time: &str,
    ) -> Result<Option<Proposal>, DbError>;

    /// Deletes only while the proposal is still pending.
    async fn delete_pending_proposal(&self, proposal_id: Uuid) -> Result<bool, DbError>;

    /// Sets the status and keeps the job in step, in one transaction:
    /// accepting moves the job to in_progress, and an in-progress job left
    /// without any accepted proposal goes back to open.
    /// `None` when the proposal is gone or already has a contract.
    async fn update_proposal_status(
        &self,
        proposal_id: Uuid,
        status: ProposalStatus,
    ) -> Result<Option<Proposal>, DbError>;

    async fn has_accepted_proposal(&self, job_id: Uuid) -> Result<bool, DbError>;
}

#[async_trait]
impl ProposalExt for DBClient {
    async fn save_proposal(
        &self,
        job_id: Uuid,
        freelancer_id: Uuid,
        cover_letter: &str,
        bid_amount: f64,
        estimated_time: &str,
    ) -> Result<Proposal, DbError> {
        let proposal = sqlx::query_as::<_, Proposal>(
            r#"
            INSERT INTO proposals (job_id, freelancer_id, cover_letter, bid_amount, estimated_time)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(job_id)
        .bind(freelancer_id)
        .bind(cover_letter)
        .bind(bid_amount)
        .bind(estimated_time)
        .fetch_one(&self.pool)
        .await?;

        Ok(proposal)
    }

    async fn get_proposal(&self, proposal_id: Uuid) -> Result<Option<Proposal>, DbError> {
        let proposal = sqlx::query_as::<_, Proposal>(r#"SELECT * FROM proposals WHERE id = $1"#)
            .bind(proposal_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(proposal)
    }

    async fn get_job_proposals(
        &self,
        job_id: Uuid,
        page: usize,
        limit: usize,
    ) -> Result<(Vec<Proposal>, i64), DbError> {
        let proposals = sqlx::query_as::<_, Proposal>(
            r#"
            SELECT * FROM proposals
            WHERE job_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(job_id)
        .bind(limit as i64)
        .bind(offset(page, limit))
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM proposals WHERE job_id = $1"#)
            .bind(job_id)
            .fetch_one(&self.pool)
            .await?;

        Ok((proposals, total))
    }

    async fn get_freelancer_proposals(
        &self,
        freelancer_id: Uuid,
        page: usize,
        limit: usize,
    ) -> Result<(Vec<Proposal>, i64), DbError> {
        let proposals = sqlx::query_as::<_, Proposal>(
            r#"
            SELECT * FROM proposals
            WHERE freelancer_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(freelancer_id)
        .bind(limit as i64)
        .bind(offset(page, limit))
        .fetch_all(&self.pool)
        .await?;

        let total: i64 =
            sqlx::query_scalar(r#"SELECT COUNT(*) FROM proposals WHERE freelancer_id = $1"#)
                .bind(freelancer_id)
                .fetch_one(&self.pool)
                .await?;

        Ok((proposals, total))
    }

    async fn update_pending_proposal(
        &self,
        proposal_id: Uuid,
        cover_letter: &str,
        bid_amount: f64,
        estimated_time: &str,
    ) -> Result<Option<Proposal>, DbError> {
        let proposal = sqlx::query_as::<_, Proposal>(
            r#"
            UPDATE proposals
            SET cover_letter = $1, bid_amount = $2, estimated_time = $3, updated_at = NOW()
            WHERE id = $4 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(cover_letter)
        .bind(bid_amount)
        .bind(estimated_time)
        .bind(proposal_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(proposal)
    }

    async fn delete_pending_proposal(&self, proposal_id: Uuid) -> Result<bool, DbError> {
        let result = sqlx::query(r#"DELETE FROM proposals WHERE id = $1 AND status = 'pending'"#)
            .bind(proposal_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn update_proposal_status(
        &self,
        proposal_id: Uuid,
        status: ProposalStatus,
    ) -> Result<Option<Proposal>, DbError> {
        let mut tx = self.pool.begin().await?;

        let proposal = sqlx::query_as::<_, Proposal>(
            r#"
            UPDATE proposals
            SET status = $1, updated_at = NOW()
            WHERE id = $2
              AND NOT EXISTS (SELECT 1 FROM contracts WHERE proposal_id = $2)
            RETURNING *
            "#,
        )
        .bind(status)
        .bind(proposal_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(proposal) = proposal else {
            return Ok(None);
        };

        if status == ProposalStatus::Accepted {
            sqlx::query(
                r#"
                UPDATE jobs
                SET status = 'in_progress', updated_at = NOW()
                WHERE id = $1
                "#,
            )
            .bind(proposal.job_id)
            .execute(&mut *tx)
            .await?;
        } else {
            sqlx::query(
                r#"
                UPDATE jobs
                SET status = 'open', updated_at = NOW()
                WHERE id = $1
                  AND status = 'in_progress'
                  AND NOT EXISTS (
                      SELECT 1 FROM proposals WHERE job_id = $1 AND status = 'accepted'
                  )
                "#,
            )
            .bind(proposal.job_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(Some(proposal))
    }

    async fn has_accepted_proposal(&self, job_id: Uuid) -> Result<bool, DbError> {
        let exists: bool = sqlx::query_scalar(
            r#"SELECT EXISTS (SELECT 1 FROM proposals WHERE job_id = $1 AND status = 'accepted')"#,
        )
        .bind(job_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}
