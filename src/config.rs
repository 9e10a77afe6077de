//! Environment-provided configuration.
//!
//! One explicit struct built at startup and passed by reference; there
//! is no module-level state.

use std::time::Duration;

use thiserror::Error;

pub const ENV_BOT_TOKEN: &str = "TALLY_BOT_TOKEN";
pub const ENV_GITHUB_TOKEN: &str = "TALLY_GITHUB_TOKEN";
pub const ENV_REPO: &str = "TALLY_REPO";
pub const ENV_ADMIN_IDS: &str = "TALLY_ADMIN_IDS";
pub const ENV_DATA_PATH: &str = "TALLY_DATA_PATH";
pub const ENV_MAX_RETRIES: &str = "TALLY_MAX_RETRIES";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "TALLY_HTTP_TIMEOUT_SECS";
pub const ENV_POLL_TIMEOUT_SECS: &str = "TALLY_POLL_TIMEOUT_SECS";
pub const ENV_ACCEPT_INVALID_CERTS: &str = "TALLY_ACCEPT_INVALID_CERTS";

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Clone, Debug)]
pub struct Config {
    pub bot_token: String,
    pub github_token: String,
    /// Target repository, `owner/name`.
    pub repo: String,
    /// Blob path inside the repository.
    pub data_path: String,
    /// Operators allowed to record updates. Everyone else is ignored.
    pub admin_ids: Vec<i64>,
    /// Reconcile retries after a version-token conflict.
    pub max_retries: usize,
    /// Store client request timeout.
    pub http_timeout: Duration,
    /// Chat long-poll timeout.
    pub poll_timeout: Duration,
    /// Per-deployment TLS trust override for the store client. Loud at
    /// startup, never on by default.
    pub accept_invalid_certs: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let repo = require(ENV_REPO)?;
        if !repo.contains('/') {
            return Err(ConfigError::Invalid {
                name: ENV_REPO,
                reason: "expected owner/name".into(),
            });
        }

        Ok(Self {
            bot_token: require(ENV_BOT_TOKEN)?,
            github_token: require(ENV_GITHUB_TOKEN)?,
            repo,
            data_path: optional(ENV_DATA_PATH).unwrap_or_else(|| "data.json".into()),
            admin_ids: parse_admin_ids(
                ENV_ADMIN_IDS,
                &optional(ENV_ADMIN_IDS).unwrap_or_default(),
            )?,
            max_retries: parse_or(ENV_MAX_RETRIES, 3)?,
            http_timeout: Duration::from_secs(parse_or(ENV_HTTP_TIMEOUT_SECS, 30)?),
            poll_timeout: Duration::from_secs(parse_or(ENV_POLL_TIMEOUT_SECS, 50)?),
            accept_invalid_certs: match optional(ENV_ACCEPT_INVALID_CERTS) {
                Some(raw) => parse_bool(ENV_ACCEPT_INVALID_CERTS, &raw)?,
                None => false,
            },
        })
    }
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(name)),
    }
}

fn optional(name: &'static str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_or<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    let Some(raw) = optional(name) else {
        return Ok(default);
    };
    raw.trim().parse().map_err(|_| ConfigError::Invalid {
        name,
        reason: format!("could not parse {raw:?} as a number"),
    })
}

/// Comma-separated ids; blanks between commas are skipped. An empty list
/// is legal - the bot then ignores everybody.
fn parse_admin_ids(name: &'static str, raw: &str) -> Result<Vec<i64>, ConfigError> {
    let mut ids = Vec::new();
    for part in raw.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let id = part.parse().map_err(|_| ConfigError::Invalid {
            name,
            reason: format!("{part:?} is not a numeric id"),
        })?;
        ids.push(id);
    }
    Ok(ids)
}

fn parse_bool(name: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        other => Err(ConfigError::Invalid {
            name,
            reason: format!("expected a boolean, got {other:?}"),
        }),
    }
}
