use async_trait::async_trait;
use uuid::Uuid;

use super::{DBClient, DbError};
use crate::models::usermodel::{User, UserRole};

#[async_trait]
pub trait UserExt: Send + Sync {
    async fn get_user(
        &self,
        user_id: Option<Uuid>,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<User>, DbError>;

    async fn get_user_by_refresh_token(&self, token: &str) -> Result<Option<User>, DbError>;

    async fn save_user(
        &self,
        username: &str,
        fullname: &str,
        email: &str,
        password: &str,
        role: UserRole,
    ) -> Result<User, DbError>;

    /// Overwrites the single stored refresh token; `None` clears it.
    async fn update_refresh_token(
        &self,
        user_id: Uuid,
        token: Option<&str>,
    ) -> Result<(), DbError>;
}

#[async_trait]
impl UserExt for DBClient {
    async fn get_user(
        &self,
        user_id: Option<Uuid>,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<User>, DbError> {
        let mut user: Option<User> = None;

        if let Some(user_id) = user_id {
            user = sqlx::query_as::<_, User>(r#"SELECT * FROM users WHERE id = $1"#)
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
        } else if let Some(username) = username {
            user = sqlx::query_as::<_, User>(r#"SELECT * FROM users WHERE username = $1"#)
                .bind(username)
                .fetch_optional(&self.pool)
                .await?;
        } else if let Some(email) = email {
            user = sqlx::query_as::<_, User>(r#"SELECT * FROM users WHERE email = $1"#)
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;
        }

        Ok(user)
    }

    async fn get_user_by_refresh_token(&self, token: &str) -> Result<Option<User>, DbError> {
        let user = sqlx::query_as::<_, User>(r#"SELECT * FROM users WHERE refresh_token = $1"#)
            .bind(token)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn save_user(
        &self,
        username: &str,
        fullname: &str,
        email: &str,
        password: &str,
        role: UserRole,
    ) -> Result<User, DbError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, fullname, email, password, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(username)
        .bind(fullname)
        .bind(email)
        .bind(password)
        .bind(role)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn update_refresh_token(
        &self,
        user_id: Uuid,
        token: Option<&str>,
    ) -> Result<(), DbError> {
        sqlx::query(
            r#"
            UPDATE users
            SET refresh_token = $1, updated_at = NOW()
            WHERE id = $2
            "#,
        )
        .bind(token)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
