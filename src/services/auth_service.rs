//! Authentication service - registration, login and identity resolution.

use async_trait::async_trait;
use std::sync::Arc;

use super::token_service::{Claims, TokenResponse, TokenService};
use crate::domain::{Password, User, UserProfile};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new user. No token is issued; the user logs in separately.
    async fn register(&self, username: String, password: String) -> AppResult<()>;

    /// Check credentials and issue an access token
    async fn login(&self, username: String, password: String) -> AppResult<TokenResponse>;

    /// Verify a bearer token and extract its claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;

    /// Look up the profile of an authenticated username
    async fn profile(&self, username: &str) -> AppResult<UserProfile>;

    /// Verify a bearer token and load the profile it names
    async fn resolve_identity(&self, token: &str) -> AppResult<UserProfile> {
        let claims = self.verify_token(token)?;
        self.profile(&claims.sub).await
    }
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    tokens: Arc<dyn TokenService>,
}

impl<U: UnitOfWork> Authenticator<U> {
    /// Create new auth service instance with Unit of Work
    pub fn new(uow: Arc<U>, tokens: Arc<dyn TokenService>) -> Self {
        Self { uow, tokens }
    }
}

// Argon2 is deliberately slow; keep it off the async workers.
async fn hash_password(plain_text: String) -> AppResult<Password> {
    tokio::task::spawn_blocking(move || Password::new(&plain_text))
        .await
        .map_err(|e| AppError::internal(format!("Password hashing task failed: {}", e)))?
}

async fn verify_password(stored: Password, plain_text: String) -> AppResult<bool> {
    tokio::task::spawn_blocking(move || stored.verify(&plain_text))
        .await
        .map_err(|e| AppError::internal(format!("Password verification task failed: {}", e)))
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(&self, username: String, password: String) -> AppResult<()> {
        if username.is_empty() || password.is_empty() {
            return Err(AppError::bad_request(
                "Username and password are required",
            ));
        }

        if self.uow.users().find_by_username(&username).await?.is_some() {
            return Err(AppError::conflict("User"));
        }

        let password_hash = hash_password(password).await?.into_string();
        let user = self.uow.users().insert(User::new(username, password_hash)).await?;

        tracing::info!(username = %user.username, "user registered");
        Ok(())
    }

    async fn login(&self, username: String, password: String) -> AppResult<TokenResponse> {
        let user = self.uow.users().find_by_username(&username).await?;

        // Unknown users are checked against a dummy hash so both failure
        // paths cost the same and return the same error.
        let stored = match &user {
            Some(user) => Password::from_hash(user.password_hash.clone()),
            None => Password::dummy(),
        };
        let password_valid = verify_password(stored, password).await?;

        match user {
            Some(user) if password_valid => self.tokens.issue(&user.username),
            _ => {
                tracing::debug!("login rejected");
                Err(AppError::InvalidCredentials)
            }
        }
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        Ok(self.tokens.verify(token)?)
    }

    async fn profile(&self, username: &str) -> AppResult<UserProfile> {
        // The token may outlive the account it was issued for
        self.uow
            .users()
            .find_by_username(username)
            .await?
            .map(UserProfile::from)
            .ok_or(AppError::Unauthorized)
    }
}
