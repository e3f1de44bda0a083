//! Configuration management for newsroom
//!
//! This module handles loading and validating configuration from environment
//! variables and TOML files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Section fetched when nothing is configured
pub const DEFAULT_SECTION: &str = "general";

pub const NEWSAPI_BASE_URL: &str = "https://newsapi.org/v2";
pub const GUARDIAN_BASE_URL: &str = "https://content.guardianapis.com";
pub const NYT_BASE_URL: &str = "https://api.nytimes.com/svc/topstories/v2";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Upstream provider configuration
    pub sources: SourcesConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Read API server configuration
    pub server: ServerConfig,

    /// Periodic ingestion configuration
    pub schedule: ScheduleConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Settings shared by every provider plus per-provider credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// Topical sections requested from every provider
    pub sections: Vec<String>,

    /// Per-call timeout in seconds
    pub request_timeout_secs: u64,

    /// Client-side rate limit shared by all provider calls (requests per second)
    pub requests_per_second: u32,

    /// User agent string
    pub user_agent: String,

    pub newsapi: ProviderConfig,
    pub guardian: ProviderConfig,
    pub nyt: ProviderConfig,
}

/// Credentials and endpoint for one provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API key sent with every request
    #[serde(default)]
    pub api_key: Option<String>,

    /// Endpoint root; fixed in production, overridden in tests
    pub base_url: String,

    /// Set to false to leave the provider out of ingestion runs
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite database path
    pub sqlite_path: PathBuf,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server bind address
    pub bind_address: SocketAddr,

    /// Enable permissive CORS
    pub enable_cors: bool,

    /// Enable request tracing
    pub enable_request_logging: bool,
}

/// Periodic ingestion schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Hours of the day (UTC) at which ingestion runs
    pub hours_utc: Vec<u32>,

    /// Run once immediately when the server starts
    pub run_on_startup: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

fn default_true() -> bool {
    true
}

impl ProviderConfig {
    fn new(base_url: &str, api_key: Option<String>) -> Self {
        Self {
            api_key,
            base_url: base_url.to_string(),
            enabled: true,
        }
    }

    /// API key if one is configured and non-blank
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }
}

/// Split a comma-separated section list, trimming entries and dropping blanks
///
/// An input with no usable entries yields `["general"]`.
pub fn parse_sections(raw: &str) -> Vec<String> {
    let sections: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    if sections.is_empty() {
        vec![DEFAULT_SECTION.to_string()]
    } else {
        sections
    }
}

/// Parse a comma-separated list of hours, e.g. `0,6,12,18`
pub fn parse_hours(raw: &str) -> Result<Vec<u32>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u32>()
                .with_context(|| format!("Invalid schedule hour: {s}"))
        })
        .collect()
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse::<T>().ok())
}

fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let sections = std::env::var("NEWS_SECTIONS")
            .map(|v| parse_sections(&v))
            .unwrap_or(defaults.sources.sections);

        let request_timeout_secs = env_parse::<u64>("NEWSROOM_REQUEST_TIMEOUT")
            .unwrap_or(defaults.sources.request_timeout_secs);

        let requests_per_second = env_parse::<u32>("NEWSROOM_RATE_LIMIT")
            .unwrap_or(defaults.sources.requests_per_second);

        let user_agent =
            std::env::var("NEWSROOM_USER_AGENT").unwrap_or(defaults.sources.user_agent);

        let sqlite_path = std::env::var("NEWSROOM_SQLITE_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.database.sqlite_path);

        let bind_address = match std::env::var("NEWSROOM_BIND_ADDRESS") {
            Ok(addr) => addr
                .parse()
                .with_context(|| format!("Invalid NEWSROOM_BIND_ADDRESS: {addr}"))?,
            Err(_) => defaults.server.bind_address,
        };

        let hours_utc = match std::env::var("NEWSROOM_SCHEDULE_HOURS") {
            Ok(raw) => parse_hours(&raw)?,
            Err(_) => defaults.schedule.hours_utc,
        };

        let run_on_startup =
            env_bool("NEWSROOM_FETCH_ON_STARTUP").unwrap_or(defaults.schedule.run_on_startup);

        let log_level =
            std::env::var("NEWSROOM_LOG_LEVEL").unwrap_or_else(|_| String::from("info"));

        let log_format =
            std::env::var("NEWSROOM_LOG_FORMAT").unwrap_or_else(|_| String::from("text"));

        Ok(Self {
            sources: SourcesConfig {
                sections,
                request_timeout_secs,
                requests_per_second,
                user_agent,
                newsapi: ProviderConfig::new(
                    NEWSAPI_BASE_URL,
                    std::env::var("NEWS_API_KEY").ok(),
                ),
                guardian: ProviderConfig::new(
                    GUARDIAN_BASE_URL,
                    std::env::var("GUARDIAN_API_KEY").ok(),
                ),
                nyt: ProviderConfig::new(NYT_BASE_URL, std::env::var("NYT_API_KEY").ok()),
            },
            database: DatabaseConfig { sqlite_path },
            server: ServerConfig {
                bind_address,
                ..defaults.server
            },
            schedule: ScheduleConfig {
                hours_utc,
                run_on_startup,
            },
            logging: LoggingConfig {
                level: log_level,
                format: log_format,
            },
        })
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        // Same normalization as NEWS_SECTIONS
        config.sources.sections = parse_sections(&config.sources.sections.join(","));

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.sources.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be greater than 0");
        }

        if self.sources.requests_per_second == 0 {
            anyhow::bail!("requests_per_second must be greater than 0");
        }

        if self.sources.sections.iter().all(|s| s.trim().is_empty()) {
            anyhow::bail!("at least one section must be configured");
        }

        for (name, provider) in self.providers() {
            url::Url::parse(&provider.base_url)
                .with_context(|| format!("Invalid base_url for {name}: {}", provider.base_url))?;
        }

        if self.schedule.hours_utc.is_empty() {
            anyhow::bail!("schedule.hours_utc must list at least one hour");
        }

        if let Some(hour) = self.schedule.hours_utc.iter().find(|h| **h > 23) {
            anyhow::bail!("schedule hour {hour} is out of range (0-23)");
        }

        Ok(())
    }

    /// Get request timeout as Duration
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.sources.request_timeout_secs)
    }

    /// Provider configs keyed by their short identifier
    pub fn providers(&self) -> [(&'static str, &ProviderConfig); 3] {
        [
            ("newsapi", &self.sources.newsapi),
            ("guardian", &self.sources.guardian),
            ("nyt", &self.sources.nyt),
        ]
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sources: SourcesConfig {
                sections: vec![DEFAULT_SECTION.to_string()],
                request_timeout_secs: 10,
                requests_per_second: 5,
                user_agent: format!("newsroom/{}", env!("CARGO_PKG_VERSION")),
                newsapi: ProviderConfig::new(NEWSAPI_BASE_URL, None),
                guardian: ProviderConfig::new(GUARDIAN_BASE_URL, None),
                nyt: ProviderConfig::new(NYT_BASE_URL, None),
            },
            database: DatabaseConfig {
                sqlite_path: PathBuf::from("data/newsroom.db"),
            },
            server: ServerConfig {
                bind_address: SocketAddr::from(([0, 0, 0, 0], 8080)),
                enable_cors: true,
                enable_request_logging: true,
            },
            schedule: ScheduleConfig {
                hours_utc: vec![0, 6, 12, 18],
                run_on_startup: false,
            },
            logging: LoggingConfig {
                level: String::from("info"),
                format: String::from("text"),
            },
        }
    }
}
