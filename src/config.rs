//! Service configuration loaded from environment variables.
//!
//! `.env` is read first (see `main`), then:
//!
//! - `JWT_SECRET` (required) - HS256 signing secret for session tokens
//! - `DATABASE_URL` - MongoDB connection string, required for the `mongo` backend
//! - `DATABASE_NAME` - database name (default: `fresh_fruits`)
//! - `STORE_BACKEND` - `mongo` or `memory` (default: `mongo`)
//! - `BIND_ADDR` - listen address (default: `127.0.0.1:8080`)
//! - `TOKEN_TTL_MINUTES` - session token lifetime, at most one year (default: 60)
//! - `ADMIN_EMAILS` - comma-separated emails that sign up with the admin role
//! - `PAYMENT_BANK` / `PAYMENT_HOLDER` - transfer details quoted in payment messages

use std::env;

use thiserror::Error;

/// One year.
pub const MAX_TOKEN_TTL_MINUTES: i64 = 525_600;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    Missing(&'static str),
    #[error("invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Mongo,
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub backend: Backend,
    pub database_url: Option<String>,
    pub database_name: String,
    pub jwt_secret: String,
    pub token_ttl_minutes: i64,
    pub bind_addr: String,
    pub admin_emails: Vec<String>,
    pub payment: PaymentDetails,
}

/// Bank transfer details included in the payment request sent to buyers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentDetails {
    pub bank: String,
    pub holder: String,
}

impl Default for PaymentDetails {
    fn default() -> Self {
        Self {
            bank: "BCA: 1234567890".to_string(),
            holder: "Fresh Fruits".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests need not touch
    /// the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let backend = match get("STORE_BACKEND").as_deref().map(str::trim) {
            None | Some("mongo") => Backend::Mongo,
            Some("memory") => Backend::Memory,
            Some(other) => return Err(ConfigError::Invalid("STORE_BACKEND", other.to_string())),
        };

        let database_url = get("DATABASE_URL");
        if backend == Backend::Mongo && database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        let jwt_secret = get("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let token_ttl_minutes = match get("TOKEN_TTL_MINUTES") {
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(minutes) if (1..=MAX_TOKEN_TTL_MINUTES).contains(&minutes) => minutes,
                _ => return Err(ConfigError::Invalid("TOKEN_TTL_MINUTES", raw)),
            },
            None => 60,
        };

        let admin_emails = get("ADMIN_EMAILS")
            .map(|raw| {
                raw.split(',')
                    .map(|email| email.trim().to_lowercase())
                    .filter(|email| !email.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let defaults = PaymentDetails::default();
        let payment = PaymentDetails {
            bank: get("PAYMENT_BANK").unwrap_or(defaults.bank),
            holder: get("PAYMENT_HOLDER").unwrap_or(defaults.holder),
        };

        Ok(Config {
            backend,
            database_url,
            database_name: get("DATABASE_NAME").unwrap_or_else(|| "fresh_fruits".to_string()),
            jwt_secret,
            token_ttl_minutes,
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| "127.0.0.1:8080".to_string()),
            admin_emails,
            payment,
        })
    }

    pub fn is_admin_email(&self, email: &str) -> bool {
        let email = email.trim().to_lowercase();
        self.admin_emails.iter().any(|admin| *admin == email)
    }
}
