use async_trait::async_trait;
use sqlx::types::Json;
use uuid::Uuid;

use super::{offset, DBClient, DbError};
use crate::models::freelancermodel::{FreelancerProfile, PortfolioItem};

#[async_trait]
pub trait FreelancerExt: Send + Sync {
    async fn save_freelancer_profile(
        &self,
        user_id: Uuid,
        title: &str,
        bio: Option<&str>,
        skills: &[String],
        hourly_rate: f64,
        portfolio: &[PortfolioItem],
    ) -> Result<FreelancerProfile, DbError>;

    async fn get_freelancer_profile(&self, profile_id: Uuid) -> Result<Option<FreelancerProfile>, DbError>;

    async fn get_freelancer_profile_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<FreelancerProfile>, DbError>;

    /// Newest first.
    async fn get_freelancer_profiles(
        &self,
        page: usize,
        limit: usize,
    ) -> Result<(Vec<FreelancerProfile>, i64), DbError>;

    /// Profiles sharing at least one skill, best rated first.
    async fn search_freelancer_profiles(
        &self,
        skills: &[String],
        page: usize,
        limit: usize,
    ) -> Result<(Vec<FreelancerProfile>, i64), DbError>;

    /// Writes title, bio, skills and rate back to the row owned by `profile.user_id`.
    /// The portfolio is only touched by the portfolio operations.
    async fn update_freelancer_profile(
        &self,
        profile: &FreelancerProfile,
    ) -> Result<Option<FreelancerProfile>, DbError>;

    async fn delete_freelancer_profile(&self, user_id: Uuid) -> Result<bool, DbError>;

    async fn add_portfolio_item(
        &self,
        user_id: Uuid,
        item: &PortfolioItem,
    ) -> Result<Option<FreelancerProfile>, DbError>;

    /// `None` when there is no profile or `index` is past the end.
    async fn remove_portfolio_item(
        &self,
        user_id: Uuid,
        index: usize,
    ) -> Result<Option<FreelancerProfile>, DbError>;
}

#[async_trait]
impl FreelancerExt for DBClient {
    async fn save_freelancer_profile(
        &self,
        user_id: Uuid,
        title: &str,
        bio: Option<&str>,
        skills: &[String],
        hourly_rate: f64,
        portfolio: &[PortfolioItem],
    ) -> Result<FreelancerProfile, DbError> {
        let profile = sqlx::query_as::<_, FreelancerProfile>(
            r#"
            INSERT INTO freelancer_profiles (user_id, title, bio, skills, hourly_rate, portfolio)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(title)
        .bind(bio)
        .bind(skills)
        .bind(hourly_rate)
        .bind(Json(portfolio))
        .fetch_one(&self.pool)
        .await?;

        Ok(profile)
    }

    async fn get_freelancer_profile(&self, profile_id: Uuid) -> Result<Option<FreelancerProfile>, DbError> {
        let profile = sqlx::query_as::<_, FreelancerProfile>(
            r#"SELECT * FROM freelancer_profiles WHERE id = $1"#,
        )
        .bind(profile_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    async fn get_freelancer_profile_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<FreelancerProfile>, DbError> {
        let profile = sqlx::query_as::<_, FreelancerProfile>(
            r#"SELECT * FROM freelancer_profiles WHERE user_id = $1"#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    async fn get_freelancer_profiles(
        &self,
        page: usize,
        limit: usize,
    ) -> Result<(Vec<FreelancerProfile>, i64), DbError> {
        let profiles = sqlx::query_as::<_, FreelancerProfile>(
            r#"
            SELECT * FROM freelancer_profiles
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit as i64)
        .bind(offset(page, limit))
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM freelancer_profiles"#)
            .fetch_one(&self.pool)
            .await?;

        Ok((profiles, total))
    }

    async fn search_freelancer_profiles(
        &self,
        skills: &[String],
        page: usize,
        limit: usize,
    ) -> Result<(Vec<FreelancerProfile>, i64), DbError> {
        let profiles = sqlx::query_as::<_, FreelancerProfile>(
            r#"
            SELECT * FROM freelancer_profiles
            WHERE skills && $1
            ORDER BY rating DESC, created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(skills)
        .bind(limit as i64)
        .bind(offset(page, limit))
        .fetch_all(&self.pool)
        .await?;

        let total: i64 =
            sqlx::query_scalar(r#"SELECT COUNT(*) FROM freelancer_profiles WHERE skills && $1"#)
                .bind(skills)
                .fetch_one(&self.pool)
                .await?;

        Ok((profiles, total))
    }

    async fn update_freelancer_profile(
        &self,
        profile: &FreelancerProfile,
    ) -> Result<Option<FreelancerProfile>, DbError> {
        let updated = sqlx::query_as::<_, FreelancerProfile>(
            r#"
            UPDATE freelancer_profiles
            SET title = $1, bio = $2, skills = $3, hourly_rate = $4, updated_at = NOW()
            WHERE user_id = $5
            RETURNING *
            "#,
        )
        .bind(&profile.title)
        .bind(&profile.bio)
        .bind(&profile.skills)
        .bind(profile.hourly_rate)
        .bind(profile.user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    async fn delete_freelancer_profile(&self, user_id: Uuid) -> Result<bool, DbError> {
        let result = sqlx::query(r#"DELETE FROM freelancer_profiles WHERE user_id = $1"#)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn add_portfolio_item(
        &self,
        user_id: Uuid,
        item: &PortfolioItem,
    ) -> Result<Option<FreelancerProfile>, DbError> {
        let profile = sqlx::query_as::<_, FreelancerProfile>(
            r#"
            UPDATE freelancer_profiles
            SET portfolio = portfolio || jsonb_build_array($1::jsonb), updated_at = NOW()
            WHERE user_id = $2
            RETURNING *
            "#,
        )
        .bind(Json(item))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    async fn remove_portfolio_item(
        &self,
        user_id: Uuid,
        index: usize,
    ) -> Result<Option<FreelancerProfile>, DbError> {
        let profile = sqlx::query_as::<_, FreelancerProfile>(
            r#"
            UPDATE freelancer_profiles
            SET portfolio = portfolio - $1::int, updated_at = NOW()
            WHERE user_id = $2 AND jsonb_array_length(portfolio) > $1::int
            RETURNING *
            "#,
        )
        .bind(index as i32)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }
}
