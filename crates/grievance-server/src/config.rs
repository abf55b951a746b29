use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use anyhow::{Context, Result, bail};
use tracing::info;

/// Secrets that ship in sample `.env` files and must never sign real sessions.
const PLACEHOLDER_SECRETS: &[&str] = &["change-me", "change-me-to-a-random-string", "shhhhh"];

/// Longest accepted session lifetime (one year).
const MAX_SESSION_TTL_HOURS: i64 = 24 * 365;

pub struct Config {
    pub jwt_secret: String,
    pub db_path: PathBuf,
    pub upload_dir: PathBuf,
    pub host: String,
    pub port: u16,
    pub session_ttl_hours: i64,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            jwt_secret: jwt_secret()?,
            db_path: try_load("GRIEVANCE_DB_PATH", "grievance.db")?,
            upload_dir: try_load("GRIEVANCE_UPLOAD_DIR", "./uploads")?,
            host: try_load("GRIEVANCE_HOST", "0.0.0.0")?,
            port: try_load("GRIEVANCE_PORT", "3000")?,
            session_ttl_hours: validate_ttl_hours(try_load("GRIEVANCE_SESSION_TTL_HOURS", "24")?)?,
            max_upload_bytes: try_load("GRIEVANCE_MAX_UPLOAD_BYTES", "52428800")?,
        })
    }
}

fn jwt_secret() -> Result<String> {
    let secret = env::var("GRIEVANCE_JWT_SECRET").unwrap_or_default();
    validate_secret(&secret)?;
    Ok(secret)
}

fn validate_secret(secret: &str) -> Result<()> {
    if secret.trim().is_empty() || PLACEHOLDER_SECRETS.contains(&secret) {
        bail!("GRIEVANCE_JWT_SECRET is unset or still a placeholder; set it in the environment or .env");
    }
    Ok(())
}

fn validate_ttl_hours(hours: i64) -> Result<i64> {
    if !(1..=MAX_SESSION_TTL_HOURS).contains(&hours) {
        bail!("GRIEVANCE_SESSION_TTL_HOURS must be between 1 and {MAX_SESSION_TTL_HOURS}, got {hours}");
    }
    Ok(hours)
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T>
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.parse()
        .map_err(|e: T::Err| anyhow::anyhow!("{e}"))
        .with_context(|| format!("invalid {key} value {raw:?}"))
}
