//! Gemini Backend Implementation
//!
//! LLM backend for Google's generative language API.
//!
//! # Gemini API
//!
//! - `POST {base}/v1beta/models/{model}:generateContent` - Generate a reply
//! - `GET {base}/v1beta/models` - List models (used as a health probe)
//!
//! The API key travels in the `x-goog-api-key` header.

use std::time::{Duration, Instant};

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::http_client;
use super::traits::{LlmBackend, LlmRequest, LlmResponse};
use crate::config::DEFAULT_GEMINI_BASE_URL;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini backend client
#[derive(Clone)]
pub struct GeminiBackend {
    api_key: String,
    base_url: String,
    http_client: reqwest::Client,
}

impl GeminiBackend {
    /// Create a new Gemini backend against the public endpoint
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            http_client: http_client(Duration::from_secs(120)),
        }
    }

    /// Use a different API root (proxies, tests)
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Replace the request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http_client = http_client(timeout);
        self
    }

    fn generate_url(&self, model: &str) -> String {
        format!("{}/v1beta/models/{model}:generateContent", self.base_url)
    }

    fn models_url(&self) -> String {
        format!("{}/v1beta/models", self.base_url)
    }

    fn request_body(request: &LlmRequest) -> GenerateRequest<'_> {
        GenerateRequest {
            system_instruction: request.system.as_deref().map(|text| Content {
                role: None,
                parts: vec![Part { text }],
            }),
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part {
                    text: &request.prompt,
                }],
            }],
            generation_config: GenerationConfig {
                temperature: request.temperature,
            },
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct GenerateResponse {
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CandidateContent {
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct UsageMetadata {
    total_token_count: Option<u32>,
}

impl GenerateResponse {
    /// Text of the first candidate, parts concatenated
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl LlmBackend for GeminiBackend {
    fn name(&self) -> &'static str {
        "Gemini"
    }

    async fn health_check(&self) -> bool {
        if self.api_key.is_empty() {
            return false;
        }
        self.http_client
            .get(self.models_url())
            .header(API_KEY_HEADER, &self.api_key)
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .is_ok_and(|r| r.status().is_success())
    }

    async fn send(&self, request: &LlmRequest) -> anyhow::Result<LlmResponse> {
        if self.api_key.is_empty() {
            anyhow::bail!("Gemini API key is not configured (set GEMINI_API_KEY)");
        }

        let start = Instant::now();
        let url = self.generate_url(&request.model);
        tracing::debug!(url = %url, "Sending Gemini request");

        let response = self
            .http_client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&Self::request_body(request))
            .send()
            .await
            .context("Failed to reach Gemini")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Gemini returned {status}: {body}");
        }

        let data: GenerateResponse = response
            .json()
            .await
            .context("Gemini returned malformed JSON")?;

        let content = data.text().trim().to_string();
        if content.is_empty() {
            anyhow::bail!("Gemini returned no text");
        }

        Ok(LlmResponse {
            content,
            model: request.model.clone(),
            tokens_used: data.usage_metadata.and_then(|u| u.total_token_count),
            duration_ms: u64::try_from(start.elapsed().as_millis()).ok(),
        })
    }
}
