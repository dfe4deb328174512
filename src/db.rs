use std::fmt::Debug;

use sqlx::{Pool, Postgres};
use thiserror::Error;

pub mod contractdb;
pub mod freelancerdb;
pub mod jobdb;
pub mod memory;
pub mod proposaldb;
pub mod userdb;

use contractdb::ContractExt;
use freelancerdb::FreelancerExt;
use jobdb::JobExt;
use proposaldb::ProposalExt;
use userdb::UserExt;

pub const USERS_EMAIL_KEY: &str = "users_email_key";
pub const USERS_USERNAME_KEY: &str = "users_username_key";
pub const FREELANCER_PROFILES_USER_ID_KEY: &str = "freelancer_profiles_user_id_key";
pub const PROPOSALS_JOB_FREELANCER_KEY: &str = "proposals_job_id_freelancer_id_key";
pub const CONTRACTS_PROPOSAL_ID_KEY: &str = "contracts_proposal_id_key";

#[derive(Debug, Error)]
pub enum DbError {
    #[error("unique constraint {0} violated")]
    UniqueViolation(String),

    #[error("foreign key constraint {0} violated")]
    ForeignKeyViolation(String),

    #[error(transparent)]
    Sqlx(sqlx::Error),
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err.constraint().unwrap_or_default().to_string();
            if db_err.is_unique_violation() {
                return DbError::UniqueViolation(constraint);
            }
            if db_err.is_foreign_key_violation() {
                return DbError::ForeignKeyViolation(constraint);
            }
        }
        DbError::Sqlx(err)
    }
}

/// Everything the services need from persistence.
pub trait Store: UserExt + FreelancerExt + JobExt + ProposalExt + ContractExt + Debug {}

impl<T> Store for T where T: UserExt + FreelancerExt + JobExt + ProposalExt + ContractExt + Debug {}

#[derive(Debug, Clone)]
pub struct DBClient {
    pool: Pool<Postgres>,
}

impl DBClient {
    pub fn new(pool: Pool<Postgres>) -> Self {
        DBClient { pool }
    }

    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

/// Rows to skip for a 1-based page. Pages past the end of `i64` clamp to
/// `i64::MAX` and come back empty.
pub(crate) fn offset(page: usize, limit: usize) -> i64 {
    i64::try_from(page.saturating_sub(1).saturating_mul(limit)).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::offset;

    #[test]
    fn offset_is_zero_based() {
        assert_eq!(offset(1, 10), 0);
        assert_eq!(offset(3, 10), 20);
    }

    #[test]
    fn huge_pages_clamp_instead_of_overflowing() {
        assert_eq!(offset(usize::MAX, 50), i64::MAX);
        assert_eq!(offset(usize::MAX, 1), i64::MAX);
    }
}
