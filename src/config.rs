//! Configuration management for Griffin
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::GriffinError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure for Griffin
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GriffinConfig {
    /// Inbound web server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Outbound lookup settings shared by all three services
    #[serde(default)]
    pub lookup: LookupConfig,
    /// Upstream service locations
    #[serde(default)]
    pub endpoints: EndpointsConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Web server configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
    /// Upper bound for handling a single inbound request
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

/// Lookup configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupConfig {
    /// Timeout applied to every outbound call, in seconds
    #[serde(default = "default_lookup_timeout")]
    pub timeout_seconds: u64,
    /// Time one service gets to produce its panel, across all of its calls
    #[serde(default = "default_lookup_deadline")]
    pub deadline_seconds: u64,
    /// User-Agent header sent to DuckDuckGo
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Sentences in a direct encyclopedia summary
    #[serde(default = "default_summary_sentences")]
    pub summary_sentences: u8,
    /// Sentences in a summary picked from a disambiguation page
    #[serde(default = "default_fallback_sentences")]
    pub fallback_sentences: u8,
    /// Candidate titles requested from the encyclopedia search
    #[serde(default = "default_search_results")]
    pub search_results: u8,
}

/// Base URLs of the upstream services
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointsConfig {
    #[serde(default = "default_wikipedia_base_url")]
    pub wikipedia_base_url: String,
    #[serde(default = "default_duckduckgo_base_url")]
    pub duckduckgo_base_url: String,
    #[serde(default = "default_open_meteo_base_url")]
    pub open_meteo_base_url: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8501
}

fn default_request_timeout() -> u64 {
    20
}

fn default_lookup_timeout() -> u64 {
    6
}

fn default_lookup_deadline() -> u64 {
    15
}

fn default_user_agent() -> String {
    "Mozilla/5.0".to_string()
}

fn default_summary_sentences() -> u8 {
    3
}

fn default_fallback_sentences() -> u8 {
    2
}

fn default_search_results() -> u8 {
    10
}

fn default_wikipedia_base_url() -> String {
    "https://en.wikipedia.org".to_string()
}

fn default_duckduckgo_base_url() -> String {
    "https://api.duckduckgo.com".to_string()
}

fn default_open_meteo_base_url() -> String {
    "https://api.open-meteo.com".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_lookup_timeout(),
            deadline_seconds: default_lookup_deadline(),
            user_agent: default_user_agent(),
            summary_sentences: default_summary_sentences(),
            fallback_sentences: default_fallback_sentences(),
            search_results: default_search_results(),
        }
    }
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            wikipedia_base_url: default_wikipedia_base_url(),
            duckduckgo_base_url: default_duckduckgo_base_url(),
            open_meteo_base_url: default_open_meteo_base_url(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LookupConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    #[must_use]
    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.deadline_seconds)
    }
}

impl ServerConfig {
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl GriffinConfig {
    /// Load configuration from the given path, or the default file, plus
    /// environment variables
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // GRIFFIN_SERVER__PORT=9000 overrides server.port
        builder = builder.add_source(
            Environment::with_prefix("GRIFFIN")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: GriffinConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("griffin").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.server.host.is_empty() {
            self.server.host = default_host();
        }
        if self.server.request_timeout_seconds == 0 {
            self.server.request_timeout_seconds = default_request_timeout();
        }
        if self.lookup.timeout_seconds == 0 {
            self.lookup.timeout_seconds = default_lookup_timeout();
        }
        if self.lookup.deadline_seconds == 0 {
            self.lookup.deadline_seconds = default_lookup_deadline();
        }
        if self.lookup.user_agent.is_empty() {
            self.lookup.user_agent = default_user_agent();
        }
        if self.lookup.summary_sentences == 0 {
            self.lookup.summary_sentences = default_summary_sentences();
        }
        if self.lookup.fallback_sentences == 0 {
            self.lookup.fallback_sentences = default_fallback_sentences();
        }
        if self.lookup.search_results == 0 {
            self.lookup.search_results = default_search_results();
        }
        if self.endpoints.wikipedia_base_url.is_empty() {
            self.endpoints.wikipedia_base_url = default_wikipedia_base_url();
        }
        if self.endpoints.duckduckgo_base_url.is_empty() {
            self.endpoints.duckduckgo_base_url = default_duckduckgo_base_url();
        }
        if self.endpoints.open_meteo_base_url.is_empty() {
            self.endpoints.open_meteo_base_url = default_open_meteo_base_url();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.lookup.timeout_seconds > 60 {
            return Err(GriffinError::config("Lookup timeout cannot exceed 60 seconds").into());
        }

        if self.lookup.deadline_seconds > 120 {
            return Err(GriffinError::config("Lookup deadline cannot exceed 120 seconds").into());
        }

        if self.server.request_timeout_seconds > 300 {
            return Err(
                GriffinError::config("Request timeout cannot exceed 300 seconds").into(),
            );
        }

        // Panels must be assembled before the whole request is cut off
        if self.server.request_timeout_seconds <= self.lookup.deadline_seconds {
            return Err(GriffinError::config(format!(
                "Request timeout ({}s) must be longer than the lookup deadline ({}s)",
                self.server.request_timeout_seconds, self.lookup.deadline_seconds
            ))
            .into());
        }

        for (name, value) in [
            ("summary_sentences", self.lookup.summary_sentences),
            ("fallback_sentences", self.lookup.fallback_sentences),
        ] {
            if !(1..=10).contains(&value) {
                return Err(GriffinError::config(format!(
                    "Lookup {name} must be between 1 and 10"
                ))
                .into());
            }
        }

        if !(1..=50).contains(&self.lookup.search_results) {
            return Err(
                GriffinError::config("Lookup search_results must be between 1 and 50").into(),
            );
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(GriffinError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(GriffinError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        for (name, url) in [
            ("wikipedia", &self.endpoints.wikipedia_base_url),
            ("duckduckgo", &self.endpoints.duckduckgo_base_url),
            ("open_meteo", &self.endpoints.open_meteo_base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(GriffinError::config(format!(
                    "Endpoint {name} must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }
}
