//! LLM Backend Traits
//!
//! Trait definitions for LLM backends. The responder talks to whichever
//! provider is configured through [`LlmBackend`] without knowing its wire
//! format.
//!
//! # Design Philosophy
//!
//! The `LlmBackend` trait covers what a single-turn companion needs:
//! - Sending a prompt with a system instruction and receiving the reply
//! - Health checking the backend
//!
//! Implementations handle provider-specific details (API formats, auth, etc.)
//! and report every fault as an error; deciding what the user sees instead
//! is the caller's job.

use async_trait::async_trait;

/// One generation request
#[derive(Clone, Debug)]
pub struct LlmRequest {
    /// The user's message
    pub prompt: String,
    /// Model to use (backend-specific identifier)
    pub model: String,
    /// Temperature (0.0-2.0, higher = more creative)
    pub temperature: f32,
    /// System instruction
    pub system: Option<String>,
}

impl Default for LlmRequest {
    fn default() -> Self {
        Self {
            prompt: String::new(),
            model: String::new(),
            temperature: 0.7,
            system: None,
        }
    }
}

impl LlmRequest {
    /// Create a new request with prompt and model
    pub fn new(prompt: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: model.into(),
            ..Default::default()
        }
    }

    /// Set temperature
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature.clamp(0.0, 2.0);
        self
    }

    /// Set system instruction
    #[must_use]
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }
}

/// A complete reply
#[derive(Clone, Debug)]
pub struct LlmResponse {
    /// The response text
    pub content: String,
    /// Model that generated the response
    pub model: String,
    /// Tokens used (if available)
    pub tokens_used: Option<u32>,
    /// Response generation time in milliseconds
    pub duration_ms: Option<u64>,
}

/// LLM Backend trait
///
/// Implement this trait to add support for different LLM providers.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Get the backend name (e.g., "Ollama", "Gemini")
    fn name(&self) -> &str;

    /// Check if the backend is healthy and reachable
    async fn health_check(&self) -> bool;

    /// Send a request and wait for the complete response
    async fn send(&self, request: &LlmRequest) -> anyhow::Result<LlmResponse>;
}

/// Backend connection configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BackendConfig {
    /// Direct Ollama connection
    Ollama {
        /// Ollama host address
        host: String,
        /// Ollama port number
        port: u16,
    },
    /// Gemini API
    Gemini {
        /// API key for authentication
        api_key: String,
        /// API root
        base_url: String,
    },
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self::Ollama {
            host: "localhost".to_string(),
            port: 11434,
        }
    }
}

impl BackendConfig {
    /// Create Ollama configuration
    pub fn ollama(host: impl Into<String>, port: u16) -> Self {
        Self::Ollama {
            host: host.into(),
            port,
        }
    }
}
