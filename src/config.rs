//! Application configuration loaded from environment variables.

use std::path::PathBuf;

use serde::Deserialize;

use crate::error::ApiError;

/// Filter directives used when verbose logging is on.
pub const VERBOSE_LOG_DIRECTIVES: &str = "api_projects=debug,tower_http=debug,info";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Server Configuration ===
    /// Interface the HTTP server binds to.
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Enable verbose logging.
    #[serde(default)]
    pub verbose: bool,

    // === API Description ===
    /// Title published in the OpenAPI document.
    #[serde(default = "default_title")]
    pub app_title: String,

    /// Description published in the OpenAPI document.
    #[serde(default = "default_description")]
    pub app_description: String,

    /// Version published in the OpenAPI document.
    #[serde(default = "default_version")]
    pub app_version: String,

    // === Startup Context ===
    /// File holding the run identifier read at startup.
    #[serde(default)]
    pub run_id_path: Option<PathBuf>,

    // === Metrics ===
    /// Port for the Prometheus exporter listener (disabled when unset).
    #[serde(default)]
    pub metrics_port: Option<u16>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_title() -> String {
    "api-projects-01".to_string()
}

fn default_description() -> String {
    "HTTP API returning uniform JSON response envelopes".to_string()
}

fn default_version() -> String {
    "0.1".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            rust_log: default_log_level(),
            verbose: false,
            app_title: default_title(),
            app_description: default_description(),
            app_version: default_version(),
            run_id_path: None,
            metrics_port: None,
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Load configuration from environment and validate it.
    pub fn from_env() -> crate::Result<Self> {
        let config = Self::load()?;
        config.validate().map_err(ApiError::InvalidConfig)?;
        Ok(config)
    }

    /// Tracing filter directives: verbose (from config or `cli_verbose`) or `RUST_LOG`.
    pub fn log_directives(&self, cli_verbose: bool) -> &str {
        if self.verbose || cli_verbose {
            VERBOSE_LOG_DIRECTIVES
        } else {
            &self.rust_log
        }
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("HOST must not be empty".to_string());
        }

        if self.port == 0 {
            return Err("PORT must be non-zero".to_string());
        }

        if self.app_title.trim().is_empty() {
            return Err("APP_TITLE must not be empty".to_string());
        }

        if self.metrics_port == Some(self.port) {
            return Err("METRICS_PORT must differ from PORT".to_string());
        }

        Ok(())
    }

    /// Address string the HTTP server binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
