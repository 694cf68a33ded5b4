//! Companion Core - Headless State for Aura
//!
//! This crate holds every piece of Aura's behavior that is not drawing:
//! page navigation, the avatar editor, the three decompression mini-games,
//! the chat session, and the LLM backends that answer as the companion.
//! It can drive a TUI, a GUI, or a test harness without change.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      UI Surface (TUI)                         │
//! │   key/mouse events ──►  Shell / GamesHost / ChatSession       │
//! │   render           ◄──  read-only state + outcome values       │
//! └──────────────────────────────┬───────────────────────────────┘
//!                                │
//! ┌──────────────────────────────┴───────────────────────────────┐
//! │                       COMPANION CORE                          │
//! │  ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────────────┐  │
//! │  │  Shell   │ │  Avatar  │ │  Games   │ │ Chat + Responder │  │
//! │  │ (pages)  │ │ (editor) │ │  (host)  │ │   (LLM backend)  │  │
//! │  └──────────┘ └──────────┘ └──────────┘ └──────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Time never comes from a wall clock inside this crate. Every timed state
//! machine advances through an explicit `tick(delta)`, so the surface owns
//! the clock and tests can simulate minutes in microseconds.
//!
//! # Module Overview
//!
//! - [`avatar`]: Avatar configuration value object and its editor
//! - [`backend`]: LLM backend abstraction (Ollama, Gemini)
//! - [`chat`]: Chat session with in-flight request tokens
//! - [`config`]: TOML + environment configuration
//! - [`games`]: Games host and the three mini-game state machines
//! - [`login`]: Sign-in flow with the timed welcome overlay
//! - [`navigation`]: Page shell and transition state
//! - [`responder`]: The companion persona wrapped around a backend
//! - [`wellness`]: Mock biometric data for the home dashboard
//!
//! # No TUI Dependencies
//!
//! This crate has **zero** dependencies on ratatui, crossterm, or any other
//! UI framework.

#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod avatar;
pub mod backend;
pub mod chat;
pub mod config;
pub mod games;
pub mod login;
pub mod navigation;
pub mod responder;
pub mod wellness;

// Re-exports for convenience
pub use avatar::{
    AvatarConfig, AvatarEditor, AvatarError, AvatarStyle, Expression, Personality, PersonalitySet,
};
pub use backend::{
    BackendConfig, GeminiBackend, LlmBackend, LlmRequest, LlmResponse, OllamaBackend,
};
pub use chat::{ChatMessage, ChatSession, PendingRequest, RequestToken, Sender};
pub use config::{
    default_config_path, load_config, load_config_from_path, AppConfig, ConfigError,
    ConfigOverrides, ConfigSource, Provider, Timings,
};
pub use games::{GameInput, GameKind, GameOutcome, GamesHost};
pub use login::{LoginEvent, LoginFlow, LoginMethod, LoginPhase};
pub use navigation::{Page, PageTransition, Shell};
pub use responder::{LlmResponder, Responder, FALLBACK_REPLY};
pub use wellness::Dashboard;
