//! Ollama Backend Implementation
//!
//! LLM backend for Ollama (local LLM server).
//!
//! # Ollama API
//!
//! - `/api/generate` - Generate a completion
//! - `/api/tags` - List available models (used as a health probe)
//!
//! Replies are requested with `stream: false`; the companion shows a whole
//! reply at once.

use std::time::{Duration, Instant};

use anyhow::Context;
use async_trait::async_trait;

use super::http_client;
use super::traits::{LlmBackend, LlmRequest, LlmResponse};

/// Ollama backend client
#[derive(Clone)]
pub struct OllamaBackend {
    /// Host address
    host: String,
    /// Port number
    port: u16,
    /// HTTP client
    http_client: reqwest::Client,
}

impl OllamaBackend {
    /// Create a new Ollama backend with a 120 second request timeout
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            http_client: http_client(Duration::from_secs(120)),
        }
    }

    /// Replace the request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http_client = http_client(timeout);
        self
    }

    fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    fn generate_url(&self) -> String {
        format!("{}/api/generate", self.base_url())
    }

    fn tags_url(&self) -> String {
        format!("{}/api/tags", self.base_url())
    }

    /// JSON body for `/api/generate`
    fn request_body(request: &LlmRequest) -> serde_json::Value {
        let mut body = serde_json::json!({
            "model": request.model,
            "prompt": request.prompt,
            "stream": false,
            "options": {
                "temperature": request.temperature,
            },
        });

        if let Some(ref system) = request.system {
            body["system"] = serde_json::json!(system);
        }
        body
    }
}

impl Default for OllamaBackend {
    fn default() -> Self {
        Self::new("localhost", 11434)
    }
}

#[async_trait]
impl LlmBackend for OllamaBackend {
    fn name(&self) -> &'static str {
        "Ollama"
    }

    async fn health_check(&self) -> bool {
        self.http_client
            .get(self.tags_url())
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .is_ok_and(|r| r.status().is_success())
    }

    async fn send(&self, request: &LlmRequest) -> anyhow::Result<LlmResponse> {
        let start = Instant::now();
        let url = self.generate_url();

        tracing::debug!(url = %url, model = %request.model, "Sending Ollama request");

        let response = self
            .http_client
            .post(&url)
            .json(&Self::request_body(request))
            .send()
            .await
            .with_context(|| format!("Failed to reach Ollama at {}", self.base_url()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Ollama returned {status}: {body}");
        }

        let data: serde_json::Value = response
            .json()
            .await
            .context("Ollama returned malformed JSON")?;

        let content = data
            .get("response")
            .and_then(|r| r.as_str())
            .unwrap_or("")
            .trim()
            .to_string();
        if content.is_empty() {
            anyhow::bail!("Ollama returned an empty response");
        }

        let tokens_used = data
            .get("eval_count")
            .and_then(serde_json::Value::as_u64)
            .and_then(|c| u32::try_from(c).ok());

        Ok(LlmResponse {
            content,
            model: request.model.clone(),
            tokens_used,
            duration_ms: u64::try_from(start.elapsed().as_millis()).ok(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_ollama_backend_creation() {
        let backend = OllamaBackend::new("localhost", 11434);
        assert_eq!(backend.host, "localhost");
        assert_eq!(backend.port, 11434);
        assert_eq!(backend.base_url(), "http://localhost:11434");
        assert_eq!(backend.generate_url(), "http://localhost:11434/api/generate");
    }

    #[test]
    fn test_request_body() {
        let request = LlmRequest::new("Hello", "llama3.2")
            .with_system("Be gentle")
            .with_temperature(0.7);

        let body = OllamaBackend::request_body(&request);
        assert_eq!(body["model"], "llama3.2");
        assert_eq!(body["prompt"], "Hello");
        assert_eq!(body["system"], "Be gentle");
        assert_eq!(body["stream"], false);
        assert!((body["options"]["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_request_body_without_system() {
        let body = OllamaBackend::request_body(&LlmRequest::new("Hi", "m"));
        assert!(body.get("system").is_none());
    }

    #[tokio::test]
    async fn test_unreachable_server_is_error() {
        let backend = OllamaBackend::new("127.0.0.1", 1).with_timeout(Duration::from_secs(2));
        let result = backend.send(&LlmRequest::new("Hi", "m")).await;
        assert!(result.is_err());
        assert!(!backend.health_check().await);
    }
}
