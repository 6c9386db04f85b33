//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development. Every variable except the provider API
//! key has a default.

use legal_shield_core::{AnalyzerSettings, ValidationRules};
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    pub openrouter_api_key: Option<String>,
    pub llm_base_url: String,
    pub llm_timeout: Duration,
    pub llm_max_retries: u32,
    pub allowed_origins: Vec<String>,
    pub analyzer: AnalyzerSettings,
    pub validation: ValidationRules,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([0, 0, 0, 0], 8000)),
            log_level: Level::INFO,
            openrouter_api_key: None,
            llm_base_url: "https://openrouter.ai/api/v1".to_string(),
            llm_timeout: Duration::from_secs(60),
            llm_max_retries: 1,
            allowed_origins: vec!["http://localhost:3000".to_string()],
            analyzer: AnalyzerSettings::default(),
            validation: ValidationRules::default(),
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let defaults = Config::default();

        // --- Server Settings ---
        let bind_address = parse_var("BIND_ADDRESS", defaults.bind_address)?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let allowed_origins = list_var("ALLOWED_ORIGINS").unwrap_or(defaults.allowed_origins);

        // --- LLM Provider Settings ---
        let openrouter_api_key = std::env::var("OPENROUTER_API_KEY").ok();
        let llm_base_url = std::env::var("LLM_BASE_URL").unwrap_or(defaults.llm_base_url);
        let llm_timeout = Duration::from_secs(parse_var(
            "LLM_TIMEOUT_SECS",
            defaults.llm_timeout.as_secs(),
        )?);
        let llm_max_retries = parse_var("LLM_MAX_RETRIES", defaults.llm_max_retries)?;

        let analyzer = AnalyzerSettings {
            analysis_model: std::env::var("ANALYSIS_MODEL")
                .unwrap_or(defaults.analyzer.analysis_model),
            analysis_temperature: parse_var(
                "ANALYSIS_TEMPERATURE",
                defaults.analyzer.analysis_temperature,
            )?,
            analysis_max_tokens: parse_var(
                "ANALYSIS_MAX_TOKENS",
                defaults.analyzer.analysis_max_tokens,
            )?,
            chat_model: std::env::var("CHAT_MODEL").unwrap_or(defaults.analyzer.chat_model),
            chat_temperature: parse_var("CHAT_TEMPERATURE", defaults.analyzer.chat_temperature)?,
            chat_max_tokens: parse_var("CHAT_MAX_TOKENS", defaults.analyzer.chat_max_tokens)?,
        };

        // --- Upload Validation Settings ---
        let validation = ValidationRules {
            allowed_extensions: list_var("ALLOWED_EXTENSIONS")
                .map(|exts| exts.iter().map(|e| normalize_extension(e)).collect())
                .unwrap_or(defaults.validation.allowed_extensions),
            allowed_content_types: list_var("ALLOWED_CONTENT_TYPES")
                .unwrap_or(defaults.validation.allowed_content_types),
            check_content_type: parse_var(
                "VALIDATE_CONTENT_TYPE",
                defaults.validation.check_content_type,
            )?,
            max_file_size: parse_var("MAX_FILE_SIZE", defaults.validation.max_file_size)?,
            min_contract_length: parse_var(
                "MIN_CONTRACT_LENGTH",
                defaults.validation.min_contract_length,
            )?,
        };

        Ok(Self {
            bind_address,
            log_level,
            openrouter_api_key,
            llm_base_url,
            llm_timeout,
            llm_max_retries,
            allowed_origins,
            analyzer,
            validation,
        })
    }

    /// Returns the provider API key, which only the server binary requires.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.openrouter_api_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingVar("OPENROUTER_API_KEY".to_string()))
    }
}

/// Parses an optional variable, falling back to `default` when it is unset.
fn parse_var<T>(name: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidValue(name.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}

/// Reads a comma-separated variable. Returns `None` when unset.
fn list_var(name: &str) -> Option<Vec<String>> {
    std::env::var(name).ok().map(|raw| split_list(&raw))
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

/// Lowercases an extension and makes sure it starts with a dot.
fn normalize_extension(ext: &str) -> String {
    let ext = ext.to_lowercase();
    if ext.starts_with('.') {
        ext
    } else {
        format!(".{}", ext)
    }
}
