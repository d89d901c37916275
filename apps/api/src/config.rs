use anyhow::{Context, Result};

use crate::session::store::DEFAULT_SESSION_IDLE_MINUTES;

pub const DEFAULT_AWS_REGION: &str = "eu-west-1";
pub const DEFAULT_AWS_PROFILE: &str = "default";
/// Amazon Nova Micro, used for every analysis call.
pub const DEFAULT_MODEL_ID: &str = "us.amazon.nova-micro-v1:0";

/// Application configuration loaded from environment variables.
/// Every setting has a default, so an empty environment still starts.
#[derive(Debug, Clone)]
pub struct Config {
    pub aws_region: String,
    pub aws_profile: String,
    pub model_id: String,
    pub port: u16,
    pub rust_log: String,
    pub session_idle_minutes: i64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            aws_region: env_or("AWS_REGION", DEFAULT_AWS_REGION),
            aws_profile: env_or("AWS_PROFILE", DEFAULT_AWS_PROFILE),
            model_id: env_or("BEDROCK_MODEL_ID", DEFAULT_MODEL_ID),
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            session_idle_minutes: env_or("SESSION_IDLE_MINUTES", "120")
                .parse::<i64>()
                .ok()
                .filter(|m| *m > 0)
                .context("SESSION_IDLE_MINUTES must be a positive number of minutes")?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            aws_region: DEFAULT_AWS_REGION.to_string(),
            aws_profile: DEFAULT_AWS_PROFILE.to_string(),
            model_id: DEFAULT_MODEL_ID.to_string(),
            port: 8080,
            rust_log: "info".to_string(),
            session_idle_minutes: DEFAULT_SESSION_IDLE_MINUTES,
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
