//! TOML Configuration File Support
//!
//! Aura reads an optional configuration file at
//! `$XDG_CONFIG_HOME/aura/config.toml` (typically `~/.config/aura/config.toml`).
//!
//! # Configuration Priority
//!
//! Values are resolved with the following priority (highest first):
//! 1. CLI arguments (see [`ConfigOverrides`])
//! 2. Environment variables
//! 3. TOML configuration file
//! 4. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [backend]
//! provider = "gemini"
//! model = "gemini-2.5-flash"
//! temperature = 0.7
//! request_timeout_secs = 60
//!
//! [backend.ollama]
//! host = "localhost"
//! port = 11434
//!
//! [backend.gemini]
//! api_key = "..."
//!
//! [timings]
//! breathing_phase_ms = 5000
//! result_banner_ms = 3000
//!
//! [ui]
//! frame_ms = 50
//! ```

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::backend::BackendConfig;

/// Default Ollama model
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.2";

/// Default Gemini model
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Default Gemini API root
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where the configuration came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from command-line argument
    Cli,
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

/// Which LLM service answers as the companion
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Local Ollama server
    #[default]
    Ollama,
    /// Google Gemini API
    Gemini,
}

impl Provider {
    /// Model used when none is configured
    #[must_use]
    pub fn default_model(self) -> &'static str {
        match self {
            Provider::Ollama => DEFAULT_OLLAMA_MODEL,
            Provider::Gemini => DEFAULT_GEMINI_MODEL,
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::Ollama => write!(f, "ollama"),
            Provider::Gemini => write!(f, "gemini"),
        }
    }
}

impl FromStr for Provider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ollama" => Ok(Provider::Ollama),
            "gemini" => Ok(Provider::Gemini),
            other => Err(ConfigError::ValidationError(format!(
                "unknown provider '{other}' (expected 'ollama' or 'gemini')"
            ))),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// `[backend.ollama]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaToml {
    /// Server host
    pub host: Option<String>,
    /// Server port
    pub port: Option<u16>,
}

/// `[backend.gemini]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiToml {
    /// API key
    pub api_key: Option<String>,
    /// API root, for proxies
    pub base_url: Option<String>,
}

/// `[backend]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendToml {
    /// `ollama` or `gemini`
    pub provider: Option<Provider>,
    /// Model identifier
    pub model: Option<String>,
    /// Sampling temperature
    pub temperature: Option<f32>,
    /// Request timeout in seconds
    pub request_timeout_secs: Option<u64>,
    /// Ollama connection
    pub ollama: OllamaToml,
    /// Gemini connection
    pub gemini: GeminiToml,
}

/// `[timings]` section, all in milliseconds
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingsToml {
    /// Delay before a squeezed lemon is replaced
    pub smash_replenish_ms: Option<u64>,
    /// Delay between the last lemon and the result
    pub smash_complete_ms: Option<u64>,
    /// Length of one inhale or exhale
    pub breathing_phase_ms: Option<u64>,
    /// Delay between the last tap and the result
    pub breathing_complete_ms: Option<u64>,
    /// Delay before a cleared cell is refilled
    pub match_refill_ms: Option<u64>,
    /// Delay between reaching the target score and the result
    pub match_complete_ms: Option<u64>,
    /// How long the result banner stays up
    pub result_banner_ms: Option<u64>,
    /// Sign-in spinner length
    pub login_connect_ms: Option<u64>,
    /// Welcome overlay length
    pub login_welcome_ms: Option<u64>,
    /// Page slide-in length
    pub page_transition_ms: Option<u64>,
    /// Heart-rate update interval
    pub heart_rate_ms: Option<u64>,
}

/// `[ui]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UiToml {
    /// Frame interval in milliseconds
    pub frame_ms: Option<u64>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuraToml {
    /// Backend section
    pub backend: BackendToml,
    /// Timings section
    pub timings: TimingsToml,
    /// UI section
    pub ui: UiToml,
}

// =============================================================================
// Main Configuration Structs
// =============================================================================

/// Every delay that drives a timed state machine
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timings {
    /// Delay before a squeezed lemon is replaced
    pub smash_replenish: Duration,
    /// Delay between the last lemon and the result
    pub smash_complete: Duration,
    /// Length of one inhale or exhale
    pub breathing_phase: Duration,
    /// Delay between the last tap and the result
    pub breathing_complete: Duration,
    /// Delay before a cleared cell is refilled
    pub match_refill: Duration,
    /// Delay between reaching the target score and the result
    pub match_complete: Duration,
    /// How long the result banner stays up
    pub result_banner: Duration,
    /// Sign-in spinner length
    pub login_connect: Duration,
    /// Welcome overlay length
    pub login_welcome: Duration,
    /// Page slide-in length
    pub page_transition: Duration,
    /// Heart-rate update interval
    pub heart_rate: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            smash_replenish: Duration::from_millis(200),
            smash_complete: Duration::from_millis(1000),
            breathing_phase: Duration::from_millis(4000),
            breathing_complete: Duration::from_millis(2000),
            match_refill: Duration::from_millis(200),
            match_complete: Duration::from_millis(1000),
            result_banner: Duration::from_millis(2000),
            login_connect: Duration::from_millis(1200),
            login_welcome: Duration::from_millis(2000),
            page_transition: Duration::from_millis(500),
            heart_rate: Duration::from_millis(1500),
        }
    }
}

/// Resolved application configuration
///
/// Consolidates defaults, the config file, environment and CLI overrides.
/// Use [`load_config`] and then [`ConfigOverrides::apply`].
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Which service answers chat messages
    pub provider: Provider,
    /// Explicit model; `None` means the provider's default
    pub model: Option<String>,
    /// Sampling temperature for companion replies
    pub temperature: f32,
    /// Upper bound on one backend request
    pub request_timeout: Duration,
    /// Ollama host
    pub ollama_host: String,
    /// Ollama port
    pub ollama_port: u16,
    /// Gemini API key
    pub gemini_api_key: Option<String>,
    /// Gemini API root
    pub gemini_base_url: String,
    /// State machine delays
    pub timings: Timings,
    /// UI frame interval
    pub frame_interval: Duration,
    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,
    /// Source of configuration values
    source: ConfigSource,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            provider: Provider::default(),
            model: None,
            temperature: 0.7,
            request_timeout: Duration::from_secs(120),
            ollama_host: "localhost".to_string(),
            ollama_port: 11434,
            gemini_api_key: None,
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            timings: Timings::default(),
            frame_interval: Duration::from_millis(100),
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl AppConfig {
    /// Create a new configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the primary source of this configuration
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Model to request, falling back to the provider default
    #[must_use]
    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }

    /// Connection settings for the selected provider
    #[must_use]
    pub fn backend_config(&self) -> BackendConfig {
        match self.provider {
            Provider::Ollama => BackendConfig::ollama(self.ollama_host.clone(), self.ollama_port),
            Provider::Gemini => BackendConfig::Gemini {
                api_key: self.gemini_api_key.clone().unwrap_or_default(),
                base_url: self.gemini_base_url.clone(),
            },
        }
    }

    /// Reject values no state machine can run with
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::ValidationError(format!(
                "temperature {} is outside 0.0..=2.0",
                self.temperature
            )));
        }
        if self.frame_interval.is_zero() {
            return Err(ConfigError::ValidationError(
                "ui.frame_ms must be greater than zero".to_string(),
            ));
        }
        if self.timings.breathing_phase.is_zero() {
            return Err(ConfigError::ValidationError(
                "timings.breathing_phase_ms must be greater than zero".to_string(),
            ));
        }
        if self.timings.heart_rate.is_zero() {
            return Err(ConfigError::ValidationError(
                "timings.heart_rate_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/aura/config.toml` or
/// `~/.config/aura/config.toml` if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("aura").join("config.toml"))
}

/// Load configuration from the default path, then the environment
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed.
/// A missing config file is not an error (defaults are used).
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path, then the environment
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read, cannot be
/// parsed, or holds invalid values.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<AppConfig, ConfigError> {
    let mut config = AppConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;
            let toml_config: AuraToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config);
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;
            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    apply_env_config(&mut config, |key| std::env::var(key).ok());
    config.validate()?;
    Ok(config)
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(config: &mut AppConfig, toml: &AuraToml) {
    let backend = &toml.backend;
    if let Some(provider) = backend.provider {
        config.provider = provider;
    }
    if backend.model.is_some() {
        config.model.clone_from(&backend.model);
    }
    if let Some(temperature) = backend.temperature {
        config.temperature = temperature;
    }
    if let Some(secs) = backend.request_timeout_secs {
        config.request_timeout = Duration::from_secs(secs);
    }
    if let Some(ref host) = backend.ollama.host {
        config.ollama_host.clone_from(host);
    }
    if let Some(port) = backend.ollama.port {
        config.ollama_port = port;
    }
    if backend.gemini.api_key.is_some() {
        config.gemini_api_key.clone_from(&backend.gemini.api_key);
    }
    if let Some(ref url) = backend.gemini.base_url {
        config.gemini_base_url.clone_from(url);
    }

    let t = &toml.timings;
    let timings = &mut config.timings;
    let pairs: [(Option<u64>, &mut Duration); 11] = [
        (t.smash_replenish_ms, &mut timings.smash_replenish),
        (t.smash_complete_ms, &mut timings.smash_complete),
        (t.breathing_phase_ms, &mut timings.breathing_phase),
        (t.breathing_complete_ms, &mut timings.breathing_complete),
        (t.match_refill_ms, &mut timings.match_refill),
        (t.match_complete_ms, &mut timings.match_complete),
        (t.result_banner_ms, &mut timings.result_banner),
        (t.login_connect_ms, &mut timings.login_connect),
        (t.login_welcome_ms, &mut timings.login_welcome),
        (t.page_transition_ms, &mut timings.page_transition),
        (t.heart_rate_ms, &mut timings.heart_rate),
    ];
    for (ms, slot) in pairs {
        if let Some(ms) = ms {
            *slot = Duration::from_millis(ms);
        }
    }

    if let Some(ms) = toml.ui.frame_ms {
        config.frame_interval = Duration::from_millis(ms);
    }
}

/// Apply environment overrides, reading variables through `lookup`
fn apply_env_config(config: &mut AppConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(provider) = lookup("AURA_PROVIDER") {
        match provider.parse::<Provider>() {
            Ok(p) => {
                config.provider = p;
                config.source = ConfigSource::Env;
            }
            Err(e) => tracing::warn!(error = %e, "Ignoring AURA_PROVIDER"),
        }
    }

    if let Some(model) = lookup("AURA_MODEL") {
        config.model = Some(model);
        config.source = ConfigSource::Env;
    }

    if let Some(host) = lookup("OLLAMA_HOST") {
        config.ollama_host = host;
        config.source = ConfigSource::Env;
    }

    if let Some(port) = lookup("OLLAMA_PORT") {
        if let Ok(p) = port.parse::<u16>() {
            config.ollama_port = p;
            config.source = ConfigSource::Env;
        }
    }

    if let Some(key) = lookup("GEMINI_API_KEY").or_else(|| lookup("API_KEY")) {
        config.gemini_api_key = Some(key);
        config.source = ConfigSource::Env;
    }

    if let Some(frame) = lookup("AURA_FRAME_MS") {
        if let Ok(ms) = frame.parse::<u64>() {
            config.frame_interval = Duration::from_millis(ms);
            config.source = ConfigSource::Env;
        }
    }
}

// =============================================================================
// CLI Override Support
// =============================================================================

/// Builder for applying CLI overrides to configuration
///
/// Use this after [`load_config`] to apply command-line argument overrides.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Provider override
    pub provider: Option<Provider>,
    /// Model override
    pub model: Option<String>,
}

impl ConfigOverrides {
    /// Create a new empty set of overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set provider override
    #[must_use]
    pub fn with_provider(mut self, provider: Provider) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set model override
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Apply overrides to a configuration
    pub fn apply(&self, config: &mut AppConfig) {
        if self.provider.is_some() || self.model.is_some() {
            config.source = ConfigSource::Cli;
        }
        if let Some(provider) = self.provider {
            config.provider = provider;
        }
        if let Some(ref model) = self.model {
            config.model = Some(model.clone());
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
