use std::sync::Arc;

use crate::{
    config::Config,
    db::Store,
    dtos::userdtos::RegisterUserDto,
    error::ErrorMessage,
    models::usermodel::User,
    service::error::ServiceError,
    utils::{password, token},
};

#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone)]
pub struct IdentityService {
    db_client: Arc<dyn Store>,
    env: Config,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn password_error(err: ErrorMessage) -> ServiceError {
    match err {
        ErrorMessage::EmptyPassword | ErrorMessage::ExceededMaxPasswordLength(_) => {
            ServiceError::Validation(err.to_string())
        }
        other => ServiceError::Other(other.to_string()),
    }
}

impl IdentityService {
    pub fn new(db_client: Arc<dyn Store>, env: Config) -> Self {
        Self { db_client, env }
    }

    /// Creates the identity and signs it in. Duplicate email or username
    /// surfaces as a conflict from the storage unique keys.
    pub async fn register(&self, body: RegisterUserDto) -> Result<(User, TokenPair), ServiceError> {
        let email = normalize_email(&body.email);
        let username = body.username.trim().to_string();
        let fullname = body.fullname.trim().to_string();
        let role = body.role.unwrap_or_default();

        let hashed_password = password::hash(&body.password).map_err(password_error)?;

        let user = self
            .db_client
            .save_user(&username, &fullname, &email, &hashed_password, role)
            .await?;

        tracing::info!(user_id = %user.id, role = user.role.to_str(), "user registered");

        let tokens = self.issue_token_pair(&user).await?;
        Ok((user, tokens))
    }

    /// Unknown email and wrong password are indistinguishable to the caller.
    pub async fn authenticate(&self, email: &str, password_attempt: &str) -> Result<User, ServiceError> {
        let email = normalize_email(email);

        let Some(user) = self.db_client.get_user(None, None, Some(&email)).await? else {
            password::compare(password_attempt, password::DUMMY_HASH).map_err(password_error)?;
            return Err(ServiceError::Unauthorized(
                ErrorMessage::WrongCredentials.to_string(),
            ));
        };

        let password_matches =
            password::compare(password_attempt, &user.password).map_err(password_error)?;

        if !password_matches {
            tracing::debug!(user_id = %user.id, "password mismatch");
            return Err(ServiceError::Unauthorized(
                ErrorMessage::WrongCredentials.to_string(),
            ));
        }

        Ok(user)
    }

    /// Signs a fresh access/refresh pair and stores the refresh token,
    /// replacing whatever was stored before.
    pub async fn issue_token_pair(&self, user: &User) -> Result<TokenPair, ServiceError> {
        let user_id = user.id.to_string();

        let access_token =
            token::create_token(&user_id, self.env.jwt_secret.as_bytes(), self.env.jwt_maxage)
                .map_err(|e| ServiceError::Other(e.to_string()))?;

        let refresh_token = token::create_token(
            &user_id,
            self.env.jwt_refresh_secret.as_bytes(),
            self.env.jwt_refresh_maxage,
        )
        .map_err(|e| ServiceError::Other(e.to_string()))?;

        self.db_client
            .update_refresh_token(user.id, Some(&refresh_token))
            .await?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// A refresh token is honoured only while it is the one currently stored
    /// for its user, so a newer sign-in retires older refresh tokens.
    pub async fn rotate_access_token(&self, refresh_token: &str) -> Result<String, ServiceError> {
        let subject = token::decode_token(refresh_token, self.env.jwt_refresh_secret.as_bytes())
            .map_err(|_| {
                ServiceError::Unauthorized("Invalid or expired refresh token".to_string())
            })?;

        let user = self
            .db_client
            .get_user_by_refresh_token(refresh_token)
            .await?
            .filter(|user| user.id.to_string() == subject)
            .ok_or_else(|| ServiceError::Unauthorized("Invalid refresh token".to_string()))?;

        token::create_token(
            &user.id.to_string(),
            self.env.jwt_secret.as_bytes(),
            self.env.jwt_maxage,
        )
        .map_err(|e| ServiceError::Other(e.to_string()))
    }

    pub async fn revoke(&self, user: &User) -> Result<(), ServiceError> {
        self.db_client.update_refresh_token(user.id, None).await?;
        tracing::info!(user_id = %user.id, "refresh token revoked");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::userdb::UserExt;
    use crate::models::usermodel::UserRole;
    use crate::testing::{register_dto, TestContext};

    #[tokio::test]
    async fn register_hashes_and_issues_tokens() {
        let ctx = TestContext::new();
        let (user, tokens) = ctx
            .identity
            .register(register_dto("alice", "Alice@Example.com ", None))
            .await
            .unwrap();

        assert_eq!(user.email, "alice@example.com");
        assert_eq!(user.role, UserRole::Client);
        assert_ne!(user.password, "secret123");

        let stored = ctx.store.get_user(Some(user.id), None, None).await.unwrap().unwrap();
        assert_eq!(stored.refresh_token.as_deref(), Some(tokens.refresh_token.as_str()));
    }

    #[tokio::test]
    async fn duplicate_email_or_username_conflicts() {
        let ctx = TestContext::new();
        ctx.identity.register(register_dto("alice", "alice@example.com", None)).await.unwrap();

        let same_email = ctx
            .identity
            .register(register_dto("alice2", "ALICE@example.com", None))
            .await
            .unwrap_err();
        assert!(matches!(same_email, ServiceError::Conflict(ref m) if m == "Email already registered"));

        let same_username = ctx
            .identity
            .register(register_dto("alice", "other@example.com", None))
            .await
            .unwrap_err();
        assert!(matches!(same_username, ServiceError::Conflict(ref m) if m == "Username already taken"));
    }

    #[tokio::test]
    async fn bad_credentials_share_one_message() {
        let ctx = TestContext::new();
        ctx.identity.register(register_dto("alice", "alice@example.com", None)).await.unwrap();

        let wrong_password = ctx.identity.authenticate("alice@example.com", "nope-nope").await.unwrap_err();
        let unknown_email = ctx.identity.authenticate("ghost@example.com", "secret123").await.unwrap_err();

        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
        assert_eq!(wrong_password.status_code(), unknown_email.status_code());
        assert!(ctx.identity.authenticate(" ALICE@example.com", "secret123").await.is_ok());
    }

    #[tokio::test]
    async fn unknown_email_still_checks_the_password() {
        let ctx = TestContext::new();
        ctx.identity.register(register_dto("alice", "alice@example.com", None)).await.unwrap();

        let oversized = "x".repeat(65);
        let known = ctx.identity.authenticate("alice@example.com", &oversized).await.unwrap_err();
        let unknown = ctx.identity.authenticate("ghost@example.com", &oversized).await.unwrap_err();

        assert!(matches!(unknown, ServiceError::Validation(_)));
        assert_eq!(known.to_string(), unknown.to_string());
    }

    #[tokio::test]
    async fn newer_sign_in_retires_old_refresh_token() {
        let ctx = TestContext::new();
        let (user, first) = ctx
            .identity
            .register(register_dto("alice", "alice@example.com", None))
            .await
            .unwrap();

        assert!(ctx.identity.rotate_access_token(&first.refresh_token).await.is_ok());

        let second = ctx.identity.issue_token_pair(&user).await.unwrap();
        assert!(matches!(
            ctx.identity.rotate_access_token(&first.refresh_token).await,
            Err(ServiceError::Unauthorized(_))
        ));
        assert!(ctx.identity.rotate_access_token(&second.refresh_token).await.is_ok());
    }

    #[tokio::test]
    async fn revoke_and_wrong_secret() {
        let ctx = TestContext::new();
        let (user, tokens) = ctx
            .identity
            .register(register_dto("alice", "alice@example.com", None))
            .await
            .unwrap();

        // An access token is signed with the other secret.
        assert!(ctx.identity.rotate_access_token(&tokens.access_token).await.is_err());

        ctx.identity.revoke(&user).await.unwrap();
        assert!(ctx.identity.rotate_access_token(&tokens.refresh_token).await.is_err());
    }
}
