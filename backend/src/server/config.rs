//! Environment-driven application configuration.
//!
//! Values are read once at startup. `.env` files are honoured in
//! development via `dotenvy`; real deployments set the variables directly.
//! Placeholder provider keys are treated as absent so fresh checkouts run
//! without external accounts.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use jsonwebtoken::Algorithm;
use thiserror::Error;
use tracing::warn;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_TOKEN_TTL_MINUTES: i64 = 30;
const DEFAULT_PROVIDER_TIMEOUT_SECONDS: u64 = 10;
const DEFAULT_EMAIL_FROM: &str = "notifications@deliveroo.com";
const DEFAULT_FRONTEND_URL: &str = "http://localhost:3000";

const MAPS_KEY_PLACEHOLDER: &str = "YOUR_GOOGLE_MAPS_API_KEY_HERE";
const SENDGRID_KEY_PLACEHOLDER: &str = "your-sendgrid-api-key";

/// Errors raised while assembling the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A required variable is unset or empty.
    #[error("environment variable {name} must be set")]
    Missing { name: &'static str },
    /// A variable is set but cannot be parsed.
    #[error("environment variable {name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

impl ConfigError {
    fn missing(name: &'static str) -> Self {
        Self::Missing { name }
    }

    fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            name,
            reason: reason.into(),
        }
    }
}

/// Application configuration assembled from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_algorithm: Algorithm,
    pub token_ttl_minutes: i64,
    /// Absent when unset or left at the placeholder value.
    pub google_maps_api_key: Option<String>,
    /// Absent when unset or left at the placeholder value.
    pub sendgrid_api_key: Option<String>,
    pub email_from: String,
    pub frontend_url: String,
    pub provider_timeout: Duration,
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::missing(name)),
    }
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn provider_key(name: &'static str, placeholder: &str) -> Option<String> {
    match optional(name) {
        Some(value) if value == placeholder => {
            warn!(
                variable = name,
                "provider key left at placeholder; provider disabled"
            );
            None
        }
        other => other,
    }
}

impl AppConfig {
    /// Read configuration from the process environment.
    ///
    /// Call [`dotenvy::dotenv`] first if `.env` support is wanted.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required variable is missing or a
    /// value fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_addr = optional("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned())
            .parse()
            .map_err(|err| ConfigError::invalid("BIND_ADDR", format!("{err}")))?;

        let database_url = required("DATABASE_URL")?;
        let jwt_secret = required("JWT_SECRET")?;

        let jwt_algorithm = match optional("JWT_ALGORITHM") {
            Some(raw) => raw.parse().map_err(|_| {
                ConfigError::invalid("JWT_ALGORITHM", format!("unknown algorithm {raw}"))
            })?,
            None => Algorithm::HS256,
        };

        let token_ttl_minutes = match optional("ACCESS_TOKEN_EXPIRE_MINUTES") {
            Some(raw) => raw.parse().map_err(|err| {
                ConfigError::invalid("ACCESS_TOKEN_EXPIRE_MINUTES", format!("{err}"))
            })?,
            None => DEFAULT_TOKEN_TTL_MINUTES,
        };

        let provider_timeout = match optional("PROVIDER_TIMEOUT_SECONDS") {
            Some(raw) => {
                let seconds: u64 = raw.parse().map_err(|err| {
                    ConfigError::invalid("PROVIDER_TIMEOUT_SECONDS", format!("{err}"))
                })?;
                Duration::from_secs(seconds)
            }
            None => Duration::from_secs(DEFAULT_PROVIDER_TIMEOUT_SECONDS),
        };

        Ok(Self {
            bind_addr,
            database_url,
            jwt_secret,
            jwt_algorithm,
            token_ttl_minutes,
            google_maps_api_key: provider_key("GOOGLE_MAPS_API_KEY", MAPS_KEY_PLACEHOLDER),
            sendgrid_api_key: provider_key("SENDGRID_API_KEY", SENDGRID_KEY_PLACEHOLDER),
            email_from: optional("EMAIL_FROM").unwrap_or_else(|| DEFAULT_EMAIL_FROM.to_owned()),
            frontend_url: optional("FRONTEND_URL")
                .unwrap_or_else(|| DEFAULT_FRONTEND_URL.to_owned()),
            provider_timeout,
        })
    }
}
