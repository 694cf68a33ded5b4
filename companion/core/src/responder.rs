//! Companion Responder
//!
//! Turns a user message into Aura's reply, in the voice of the avatar the
//! user built. The reply is always a string: when the backend fails for any
//! reason the user sees [`FALLBACK_REPLY`] instead.

use std::sync::Arc;

use async_trait::async_trait;

use crate::avatar::AvatarConfig;
use crate::backend::{LlmBackend, LlmRequest};

/// Shown whenever a reply cannot be produced
pub const FALLBACK_REPLY: &str =
    "I'm having a little trouble connecting right now. Let's try again in a moment.";

/// Sampling temperature for companion replies
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Produces the companion's reply to one message
#[async_trait]
pub trait Responder: Send + Sync {
    /// Reply to `prompt` as the companion described by `avatar`. Never fails.
    async fn respond(&self, prompt: &str, avatar: &AvatarConfig) -> String;
}

/// System instruction describing the companion's persona
#[must_use]
pub fn persona_instruction(avatar: &AvatarConfig) -> String {
    format!(
        "You are a personalized AI mental health companion. Your name is Aura. \
         Your personality is {}. You communicate with a {} tone. Your purpose is to \
         provide comfort, support, and practical advice to help the user manage their \
         stress and emotions. Keep your responses concise, empathetic, and encouraging. \
         Never claim to be a medical professional.",
        avatar.personality().joined(),
        avatar.expression(),
    )
}

/// [`Responder`] backed by an [`LlmBackend`]
#[derive(Clone)]
pub struct LlmResponder {
    backend: Arc<dyn LlmBackend>,
    model: String,
    temperature: f32,
}

impl LlmResponder {
    /// Wrap `backend`, requesting `model`
    pub fn new(backend: Arc<dyn LlmBackend>, model: impl Into<String>) -> Self {
        Self {
            backend,
            model: model.into(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Override the sampling temperature
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Name of the wrapped backend
    #[must_use]
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Probe the backend once, warning when it cannot be reached
    pub async fn check_backend(&self) -> bool {
        let healthy = self.backend.health_check().await;
        if healthy {
            tracing::info!(backend = self.backend.name(), "Backend reachable");
        } else {
            tracing::warn!(
                backend = self.backend.name(),
                "Backend not available - replies will use the fallback until it is"
            );
        }
        healthy
    }

    fn request(&self, prompt: &str, avatar: &AvatarConfig) -> LlmRequest {
        LlmRequest::new(prompt, self.model.as_str())
            .with_system(persona_instruction(avatar))
            .with_temperature(self.temperature)
    }
}

impl std::fmt::Debug for LlmResponder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmResponder")
            .field("backend", &self.backend.name())
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .finish()
    }
}

#[async_trait]
impl Responder for LlmResponder {
    async fn respond(&self, prompt: &str, avatar: &AvatarConfig) -> String {
        let request = self.request(prompt, avatar);
        match self.backend.send(&request).await {
            Ok(response) if !response.content.trim().is_empty() => {
                tracing::debug!(
                    backend = self.backend.name(),
                    tokens = ?response.tokens_used,
                    duration_ms = ?response.duration_ms,
                    "Companion replied"
                );
                response.content
            }
            Ok(_) => {
                tracing::warn!(backend = self.backend.name(), "Empty reply, using fallback");
                FALLBACK_REPLY.to_string()
            }
            Err(e) => {
                tracing::warn!(backend = self.backend.name(), error = %e, "Reply failed, using fallback");
                FALLBACK_REPLY.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::avatar::{AvatarStyle, Expression, Personality};
    use crate::backend::LlmResponse;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    struct ScriptedBackend {
        reply: anyhow::Result<String>,
        seen: Mutex<Vec<LlmRequest>>,
    }

    impl ScriptedBackend {
        fn new(reply: anyhow::Result<String>) -> Arc<Self> {
            Arc::new(Self {
                reply,
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl LlmBackend for ScriptedBackend {
        fn name(&self) -> &str {
            "Scripted"
        }

        async fn health_check(&self) -> bool {
            self.reply.is_ok()
        }

        async fn send(&self, request: &LlmRequest) -> anyhow::Result<LlmResponse> {
            self.seen.lock().unwrap().push(request.clone());
            match &self.reply {
                Ok(text) => Ok(LlmResponse {
                    content: text.clone(),
                    model: request.model.clone(),
                    tokens_used: None,
                    duration_ms: None,
                }),
                Err(e) => Err(anyhow::anyhow!("{e}")),
            }
        }
    }

    fn avatar() -> AvatarConfig {
        AvatarConfig::new(
            Expression::Playful,
            [Personality::Witty, Personality::Creative],
            AvatarStyle::Blob,
        )
        .unwrap()
    }

    #[test]
    fn test_persona_instruction_text() {
        let text = persona_instruction(&avatar());
        assert!(text.starts_with("You are a personalized AI mental health companion. Your name is Aura."));
        assert!(text.contains("Your personality is Witty, Creative."));
        assert!(text.contains("You communicate with a Playful tone."));
        assert!(text.ends_with("Never claim to be a medical professional."));
    }

    #[tokio::test]
    async fn test_success_passes_through() {
        let backend = ScriptedBackend::new(Ok("Let's breathe together.".to_string()));
        let responder = LlmResponder::new(backend.clone(), "llama3.2");

        let reply = responder.respond("I'm anxious", &avatar()).await;
        assert_eq!(reply, "Let's breathe together.");

        let seen = backend.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].prompt, "I'm anxious");
        assert_eq!(seen[0].model, "llama3.2");
        assert_eq!(seen[0].system.as_deref(), Some(persona_instruction(&avatar()).as_str()));
        assert!((seen[0].temperature - 0.7).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn test_error_becomes_fallback() {
        let backend = ScriptedBackend::new(Err(anyhow::anyhow!("connection refused")));
        let responder = LlmResponder::new(backend, "m");
        assert_eq!(responder.respond("hi", &avatar()).await, FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn test_blank_reply_becomes_fallback() {
        let backend = ScriptedBackend::new(Ok("  \n".to_string()));
        let responder = LlmResponder::new(backend, "m");
        assert_eq!(responder.respond("hi", &avatar()).await, FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn test_check_backend_reports_health() {
        let up = LlmResponder::new(ScriptedBackend::new(Ok("hi".to_string())), "m");
        assert!(up.check_backend().await);

        let down = LlmResponder::new(ScriptedBackend::new(Err(anyhow::anyhow!("refused"))), "m");
        assert!(!down.check_backend().await);
    }
}
