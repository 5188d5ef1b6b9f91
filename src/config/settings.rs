//! Application settings loaded from environment variables.

use std::env;

use thiserror::Error;

use super::constants::{
    DEFAULT_JWT_EXPIRATION_MINUTES, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, ENV_DATABASE_URL,
    ENV_JWT_EXPIRATION_MINUTES, ENV_JWT_SECRET, ENV_SERVER_HOST, ENV_SERVER_PORT,
    MAX_JWT_EXPIRATION_MINUTES, MIN_JWT_SECRET_LENGTH,
};

/// Startup configuration failures
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} environment variable must be set")]
    Missing(&'static str),

    #[error("JWT_SECRET must be at least {0} characters long")]
    SecretTooShort(usize),

    #[error("JWT_EXPIRATION_MINUTES must be between 1 and {max}, got {value}")]
    ExpirationOutOfRange { value: i64, max: i64 },
}

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    jwt_secret: String,
    pub jwt_expiration_minutes: i64,
    pub server_host: String,
    pub server_port: u16,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiration_minutes", &self.jwt_expiration_minutes)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .finish()
    }
}

impl Config {
    /// Load configuration from the process environment (and `.env`, if present).
    ///
    /// # Errors
    /// Fails if `DATABASE_URL` or `JWT_SECRET` is absent, or the secret is too short.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup(ENV_DATABASE_URL)
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing(ENV_DATABASE_URL))?;

        let jwt_secret = lookup(ENV_JWT_SECRET)
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing(ENV_JWT_SECRET))?;

        let jwt_expiration_minutes = lookup(ENV_JWT_EXPIRATION_MINUTES)
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_JWT_EXPIRATION_MINUTES);
        if !(1..=MAX_JWT_EXPIRATION_MINUTES).contains(&jwt_expiration_minutes) {
            return Err(ConfigError::ExpirationOutOfRange {
                value: jwt_expiration_minutes,
                max: MAX_JWT_EXPIRATION_MINUTES,
            });
        }

        Self::new(database_url, jwt_secret).map(|config| Self {
            jwt_expiration_minutes,
            server_host: lookup(ENV_SERVER_HOST).unwrap_or_else(|| DEFAULT_SERVER_HOST.to_string()),
            server_port: lookup(ENV_SERVER_PORT)
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SERVER_PORT),
            ..config
        })
    }

    /// Create a configuration with defaults for everything but the required values.
    pub fn new(
        database_url: impl Into<String>,
        jwt_secret: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let jwt_secret = jwt_secret.into();
        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(ConfigError::SecretTooShort(MIN_JWT_SECRET_LENGTH));
        }

        Ok(Self {
            database_url: database_url.into(),
            jwt_secret,
            jwt_expiration_minutes: DEFAULT_JWT_EXPIRATION_MINUTES,
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
        })
    }

    /// Get JWT secret bytes for token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
