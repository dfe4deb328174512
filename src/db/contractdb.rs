use async_trait::async_trait;
use uuid::Uuid;

use super::{offset, DBClient, DbError};
use crate::models::contractmodel::*;

#[async_trait]
pub trait ContractExt: Send + Sync {
    async fn save_contract(
        &self,
        job_id: Uuid,
        client_id: Uuid,
        freelancer_id: Uuid,
        proposal_id: Uuid,
        amount: f64,
    ) -> Result<Contract, DbError>;

    async fn get_contract(&self, contract_id: Uuid) -> Result<Option<Contract>, DbError>;

    async fn get_contract_by_proposal(&self, proposal_id: Uuid) -> Result<Option<Contract>, DbError>;

    /// Contracts where `user_id` is the client or the freelancer, newest first.
    async fn get_user_contracts(
        &self,
        user_id: Uuid,
        page: usize,
        limit: usize,
    ) -> Result<(Vec<Contract>, i64), DbError>;

    /// Moves the contract to `to` only if it currently sits in one of
    /// `to.allowed_sources()`. `None` when no row matched.
    async fn transition_contract(
        &self,
        contract_id: Uuid,
        to: ContractStatus,
    ) -> Result<Option<Contract>, DbError>;

    /// submitted -> completed, stamping the end date, completing the job and
    /// crediting the freelancer's profile, all in one transaction.
    async fn complete_contract(&self, contract_id: Uuid) -> Result<Option<Contract>, DbError>;
}

fn source_states(to: ContractStatus) -> Vec<String> {
    to.allowed_sources()
        .iter()
        .map(|status| status.to_str().to_string())
        .collect()
}

#[async_trait]
impl ContractExt for DBClient {
    async fn save_contract(
        &self,
        job_id: Uuid,
        client_id: Uuid,
        freelancer_id: Uuid,
        proposal_id: Uuid,
        amount: f64,
    ) -> Result<Contract, DbError> {
        let contract = sqlx::query_as::<_, Contract>(
            r#"
            INSERT INTO contracts (job_id, client_id, freelancer_id, proposal_id, amount, start_date)
            VALUES ($1, $2, $3, $4, $5, NOW())
            RETURNING *
            "#,
        )
        .bind(job_id)
        .bind(client_id)
        .bind(freelancer_id)
        .bind(proposal_id)
        .bind(amount)
        .fetch_one(&self.pool)
        .await?;

        Ok(contract)
    }

    async fn get_contract(&self, contract_id: Uuid) -> Result<Option<Contract>, DbError> {
        let contract = sqlx::query_as::<_, Contract>(r#"SELECT * FROM contracts WHERE id = $1"#)
            .bind(contract_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(contract)
    }

    async fn get_contract_by_proposal(&self, proposal_id: Uuid) -> Result<Option<Contract>, DbError> {
        let contract =
            sqlx::query_as::<_, Contract>(r#"SELECT * FROM contracts WHERE proposal_id = $1"#)
                .bind(proposal_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(contract)
    }

    async fn get_user_contracts(
        &self,
        user_id: Uuid,
        page: usize,
        limit: usize,
    ) -> Result<(Vec<Contract>, i64), DbError> {
        let contracts = sqlx::query_as::<_, Contract>(
            r#"
            SELECT * FROM contracts
            WHERE client_id = $1 OR freelancer_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit as i64)
        .bind(offset(page, limit))
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"SELECT COUNT(*) FROM contracts WHERE client_id = $1 OR freelancer_id = $1"#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok((contracts, total))
    }

    async fn transition_contract(
        &self,
        contract_id: Uuid,
        to: ContractStatus,
    ) -> Result<Option<Contract>, DbError> {
        let contract = sqlx::query_as::<_, Contract>(
            r#"
            UPDATE contracts
            SET status = $1, updated_at = NOW()
            WHERE id = $2 AND status::text = ANY($3)
            RETURNING *
            "#,
        )
        .bind(to)
        .bind(contract_id)
        .bind(source_states(to))
        .fetch_optional(&self.pool)
        .await?;

        Ok(contract)
    }

    async fn complete_contract(&self, contract_id: Uuid) -> Result<Option<Contract>, DbError> {
        let mut tx = self.pool.begin().await?;

        let contract = sqlx::query_as::<_, Contract>(
            r#"
            UPDATE contracts
            SET status = 'completed', end_date = NOW(), updated_at = NOW()
            WHERE id = $1 AND status::text = ANY($2)
            RETURNING *
            "#,
        )
        .bind(contract_id)
        .bind(source_states(ContractStatus::Completed))
        .fetch_optional(&mut *tx)
        .await?;

        let Some(contract) = contract else {
            return Ok(None);
        };

        sqlx::query(
            r#"
            UPDATE jobs
            SET status = 'completed', updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(contract.job_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE freelancer_profiles
            SET total_jobs = total_jobs + 1, updated_at = NOW()
            WHERE user_id = $1
            "#,
        )
        .bind(contract.freelancer_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(contract))
    }
}
