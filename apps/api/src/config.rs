use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;
const DEFAULT_SESSION_IDLE_TTL_SECS: u64 = 2 * 60 * 60;
const DEFAULT_EXPORT_QUEUE: &str = "resume:export:jobs";

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    /// Base URL used to build public photo links. Defaults to `s3_endpoint`.
    pub s3_public_url: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    pub max_photo_bytes: usize,
    pub export_queue: String,
    /// Editing sessions untouched for this long are discarded.
    pub session_idle_ttl: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let s3_endpoint = require_env("S3_ENDPOINT")?;
        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            redis_url: require_env("REDIS_URL")?,
            s3_bucket: require_env("S3_BUCKET")?,
            s3_public_url: std::env::var("S3_PUBLIC_URL").unwrap_or_else(|_| s3_endpoint.clone()),
            s3_endpoint,
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            max_photo_bytes: match std::env::var("MAX_PHOTO_BYTES") {
                Ok(raw) => raw
                    .parse::<usize>()
                    .context("MAX_PHOTO_BYTES must be a byte count")?,
                Err(_) => DEFAULT_MAX_PHOTO_BYTES,
            },
            export_queue: std::env::var("EXPORT_QUEUE")
                .unwrap_or_else(|_| DEFAULT_EXPORT_QUEUE.to_string()),
            session_idle_ttl: Duration::from_secs(match std::env::var("SESSION_IDLE_TTL_SECS") {
                Ok(raw) => raw
                    .parse::<u64>()
                    .context("SESSION_IDLE_TTL_SECS must be a number of seconds")?,
                Err(_) => DEFAULT_SESSION_IDLE_TTL_SECS,
            }),
        })
    }

    /// Settings for in-process router tests; no external services are contacted.
    #[cfg(test)]
    pub fn for_tests() -> Self {
        Config {
            database_url: "postgres://localhost/resume_test".to_string(),
            redis_url: "redis://localhost".to_string(),
            s3_bucket: "resumes".to_string(),
            s3_endpoint: "http://localhost:9000".to_string(),
            s3_public_url: "http://localhost:9000".to_string(),
            aws_access_key_id: "test".to_string(),
            aws_secret_access_key: "test".to_string(),
            anthropic_api_key: "test".to_string(),
            port: 8080,
            rust_log: "debug".to_string(),
            max_photo_bytes: 1024,
            export_queue: DEFAULT_EXPORT_QUEUE.to_string(),
            session_idle_ttl: Duration::from_secs(DEFAULT_SESSION_IDLE_TTL_SECS),
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
