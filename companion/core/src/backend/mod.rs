//! LLM Backend Integration
//!
//! Abstracted access to the services that write the companion's replies,
//! through a common trait interface.
//!
//! # Available Backends
//!
//! - **Ollama**: Local LLM server (default)
//! - **Gemini**: Google's hosted generative language API
//!
//! # Usage
//!
//! ```ignore
//! use companion_core::backend::{build_backend, BackendConfig, LlmRequest};
//!
//! let backend = build_backend(&BackendConfig::default(), Duration::from_secs(120));
//! let request = LlmRequest::new("Hello!", "llama3.2").with_system("Be kind");
//! let response = backend.send(&request).await?;
//! ```

mod gemini;
mod ollama;
mod traits;

use std::sync::Arc;
use std::time::Duration;

pub use gemini::GeminiBackend;
pub use ollama::OllamaBackend;
pub use traits::{BackendConfig, LlmBackend, LlmRequest, LlmResponse};

/// Construct the backend described by `config`
#[must_use]
pub fn build_backend(config: &BackendConfig, timeout: Duration) -> Arc<dyn LlmBackend> {
    match config {
        BackendConfig::Ollama { host, port } => {
            Arc::new(OllamaBackend::new(host.clone(), *port).with_timeout(timeout))
        }
        BackendConfig::Gemini { api_key, base_url } => Arc::new(
            GeminiBackend::new(api_key.clone())
                .with_base_url(base_url.clone())
                .with_timeout(timeout),
        ),
    }
}

/// HTTP client with a request timeout; falls back to the stock client
fn http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Falling back to default HTTP client");
            reqwest::Client::new()
        })
}
