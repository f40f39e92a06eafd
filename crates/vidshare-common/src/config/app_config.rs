//! Application configuration structs
//!
//! Loads configuration from a `.env` file and environment variables.

use serde::Deserialize;
use std::env;
use std::str::FromStr;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub database: DatabaseConfig,
    pub listing: ListingConfig,
    pub snowflake: SnowflakeConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default)]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" => Ok(Self::Production),
            "staging" => Ok(Self::Staging),
            "development" => Ok(Self::Development),
            other => Err(ConfigError::InvalidValue("APP_ENV", other.to_string())),
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Apply pending migrations when the store connects
    #[serde(default = "default_run_migrations")]
    pub run_migrations: bool,
}

/// Default and maximum page sizes for listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ListingConfig {
    #[serde(default = "default_video_page_size")]
    pub video_page_size: u32,
    #[serde(default = "default_channel_video_page_size")]
    pub channel_video_page_size: u32,
    #[serde(default = "default_comment_page_size")]
    pub comment_page_size: u32,
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            video_page_size: default_video_page_size(),
            channel_video_page_size: default_channel_video_page_size(),
            comment_page_size: default_comment_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

/// Snowflake ID generator configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SnowflakeConfig {
    #[serde(default)]
    pub worker_id: u16,
}

// Default value functions
fn default_app_name() -> String {
    "vidshare".to_string()
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_run_migrations() -> bool {
    true
}

fn default_video_page_size() -> u32 {
    12
}

fn default_channel_video_page_size() -> u32 {
    12
}

fn default_comment_page_size() -> u32 {
    10
}

fn default_max_page_size() -> u32 {
    100
}

const MAX_WORKER_ID: u16 = 1023;

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a required variable is missing or a value does not parse
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let worker_id = parse_or(&lookup, "WORKER_ID", 0u16)?;
        if worker_id > MAX_WORKER_ID {
            return Err(ConfigError::InvalidValue("WORKER_ID", worker_id.to_string()));
        }

        let listing = ListingConfig {
            video_page_size: parse_or(&lookup, "VIDEO_PAGE_SIZE", default_video_page_size())?,
            channel_video_page_size: parse_or(
                &lookup,
                "CHANNEL_VIDEO_PAGE_SIZE",
                default_channel_video_page_size(),
            )?,
            comment_page_size: parse_or(&lookup, "COMMENT_PAGE_SIZE", default_comment_page_size())?,
            max_page_size: parse_or(&lookup, "MAX_PAGE_SIZE", default_max_page_size())?,
        };
        for (key, value) in [
            ("VIDEO_PAGE_SIZE", listing.video_page_size),
            ("CHANNEL_VIDEO_PAGE_SIZE", listing.channel_video_page_size),
            ("COMMENT_PAGE_SIZE", listing.comment_page_size),
            ("MAX_PAGE_SIZE", listing.max_page_size),
        ] {
            if value == 0 {
                return Err(ConfigError::InvalidValue(key, value.to_string()));
            }
        }

        Ok(Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env: lookup("APP_ENV")
                    .map(|s| s.parse())
                    .transpose()?
                    .unwrap_or_default(),
            },
            database: DatabaseConfig {
                url: lookup("DATABASE_URL").ok_or(ConfigError::MissingVar("DATABASE_URL"))?,
                max_connections: parse_or(
                    &lookup,
                    "DATABASE_MAX_CONNECTIONS",
                    default_max_connections(),
                )?,
                min_connections: parse_or(
                    &lookup,
                    "DATABASE_MIN_CONNECTIONS",
                    default_min_connections(),
                )?,
                run_migrations: parse_or(
                    &lookup,
                    "DATABASE_RUN_MIGRATIONS",
                    default_run_migrations(),
                )?,
            },
            listing,
            snowflake: SnowflakeConfig { worker_id },
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key, raw)),
        None => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
