use std::env;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_CLOUDINARY_API_BASE: &str = "https://api.cloudinary.com/v1_1";
const DEFAULT_CLOUDINARY_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} must be a valid number, got '{value}'")]
    InvalidNumber { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub api_base: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// When unset the service keeps orders in memory.
    pub database_url: Option<String>,
    pub host: String,
    pub port: u16,
    pub cloudinary: CloudinaryConfig,
}

impl Config {
    /// Reads the process environment. Call `dotenvy::dotenv()` first to pick
    /// up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let require = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));

        let port = match get("PORT") {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidNumber { name: "PORT", value })?,
            None => DEFAULT_PORT,
        };

        let timeout_secs = match get("CLOUDINARY_TIMEOUT_SECS") {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidNumber {
                    name: "CLOUDINARY_TIMEOUT_SECS",
                    value,
                })?,
            None => DEFAULT_CLOUDINARY_TIMEOUT_SECS,
        };

        Ok(Config {
            database_url: get("DATABASE_URL"),
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            cloudinary: CloudinaryConfig {
                cloud_name: require("CLOUDINARY_CLOUD_NAME")?,
                api_key: require("CLOUDINARY_API_KEY")?,
                api_secret: require("CLOUDINARY_API_SECRET")?,
                api_base: get("CLOUDINARY_API_BASE")
                    .map(|base| base.trim_end_matches('/').to_string())
                    .unwrap_or_else(|| DEFAULT_CLOUDINARY_API_BASE.to_string()),
                timeout: Duration::from_secs(timeout_secs),
            },
        })
    }
}
