use std::fmt::Display;
use std::str::FromStr;

use axum::http::HeaderValue;

use crate::auth::jwt::JwtConfig;

/// Default token lifetime when `JWT_EXPIRES_IN` is unset.
const DEFAULT_JWT_EXPIRES_IN: &str = "7d";

/// Startup configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} has invalid value '{value}': {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Log output format, selected by `APP_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines (development).
    Pretty,
    /// One JSON object per line (production).
    Json,
}

/// Connection pool settings.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    /// Seconds a request may wait for a free pooled connection.
    pub acquire_timeout_secs: u64,
}

/// Server configuration loaded from environment variables.
///
/// Everything except `DATABASE_URL` and `JWT_SECRET` has a default suitable
/// for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Seconds to wait for in-flight requests after a shutdown signal
    /// before forcing exit (default: `10`).
    pub shutdown_timeout_secs: u64,
    pub log_format: LogFormat,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                   | Default                 |
    /// |---------------------------|-------------------------|
    /// | `HOST`                    | `0.0.0.0`               |
    /// | `PORT`                    | `3000`                  |
    /// | `CORS_ORIGINS`            | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`                    |
    /// | `SHUTDOWN_TIMEOUT_SECS`   | `10`                    |
    /// | `APP_ENV`                 | `development`           |
    /// | `DATABASE_URL`            | **required**            |
    /// | `DB_MAX_CONNECTIONS`      | `5`                     |
    /// | `DB_ACQUIRE_TIMEOUT_SECS` | `30`                    |
    /// | `JWT_SECRET`              | **required**            |
    /// | `JWT_EXPIRES_IN`          | `7d`                    |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = get("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = parse_or(&get, "PORT", 3000u16)?;

        let cors_origins: Vec<String> = get("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if let Some(bad) = cors_origins
            .iter()
            .find(|o| HeaderValue::from_str(o).is_err())
        {
            return Err(ConfigError::Invalid {
                var: "CORS_ORIGINS",
                value: bad.clone(),
                reason: "not a valid header value".into(),
            });
        }

        let request_timeout_secs = parse_or(&get, "REQUEST_TIMEOUT_SECS", 30u64)?;
        let shutdown_timeout_secs = parse_or(&get, "SHUTDOWN_TIMEOUT_SECS", 10u64)?;

        let log_format = match get("APP_ENV").as_deref() {
            Some("production") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        let database = DatabaseConfig {
            url: require(&get, "DATABASE_URL")?,
            max_connections: parse_or(&get, "DB_MAX_CONNECTIONS", 5u32)?,
            acquire_timeout_secs: parse_or(&get, "DB_ACQUIRE_TIMEOUT_SECS", 30u64)?,
        };

        let expires_raw =
            get("JWT_EXPIRES_IN").unwrap_or_else(|| DEFAULT_JWT_EXPIRES_IN.to_string());
        let expires_in_secs =
            parse_duration_secs(&expires_raw).map_err(|reason| ConfigError::Invalid {
                var: "JWT_EXPIRES_IN",
                value: expires_raw.clone(),
                reason,
            })?;

        let jwt = JwtConfig {
            secret: require(&get, "JWT_SECRET")?,
            expires_in_secs,
        };

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            log_format,
            database,
            jwt,
        })
    }
}

/// Read a required, non-empty variable.
fn require<F>(get: &F, var: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    get(var)
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(var))
}

/// Parse an optional variable, falling back to `default` when unset.
fn parse_or<F, T>(get: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match get(var) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}

/// Upper bound for parsed lifetimes (100 years).
const MAX_DURATION_SECS: i64 = 100 * 365 * 86_400;

/// Parse a lifetime such as `3600`, `90s`, `15m`, `12h`, or `7d` into seconds.
pub fn parse_duration_secs(raw: &str) -> Result<i64, String> {
    let raw = raw.trim();
    let (digits, multiplier) = match raw.chars().last() {
        Some('s') => (&raw[..raw.len() - 1], 1),
        Some('m') => (&raw[..raw.len() - 1], 60),
        Some('h') => (&raw[..raw.len() - 1], 3600),
        Some('d') => (&raw[..raw.len() - 1], 86_400),
        Some(c) if c.is_ascii_digit() => (raw, 1),
        _ => return Err("expected a number with an optional s/m/h/d suffix".into()),
    };

    let value: i64 = digits
        .trim()
        .parse()
        .map_err(|_| format!("'{digits}' is not a whole number"))?;
    if value <= 0 {
        return Err("duration must be positive".into());
    }
    value
        .checked_mul(multiplier)
        .filter(|secs| *secs <= MAX_DURATION_SECS)
        .ok_or_else(|| "duration is too large".to_string())
}
