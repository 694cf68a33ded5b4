//! Integration tests for the companion core
//!
//! These tests drive several components together the way the TUI does:
//! - Sign-in, companion creation and navigation in one session
//! - Chat requests running on a spawned task and reporting back by token
//! - Responder fallback when the backend misbehaves
//! - Configuration file timings reaching the games host

use std::io::Write;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::NamedTempFile;
use tokio::sync::mpsc;

use companion_core::avatar::{AvatarConfig, AvatarEditor, AvatarStyle, Expression, Personality};
use companion_core::backend::{LlmBackend, LlmRequest, LlmResponse};
use companion_core::chat::{ChatSession, RequestToken, Sender, GREETING};
use companion_core::config::load_config_from_path;
use companion_core::games::{GameInput, GameKind, GamesHost, BREATHING_RESULT};
use companion_core::login::{LoginEvent, LoginFlow, LoginMethod};
use companion_core::navigation::{Page, Shell};
use companion_core::responder::{LlmResponder, Responder, FALLBACK_REPLY};

// =============================================================================
// Mock Backend
// =============================================================================

/// Backend that echoes the prompt, with switchable failure and latency
struct IntegrationMockBackend {
    request_count: AtomicUsize,
    should_fail: AtomicBool,
    delay: Duration,
}

impl IntegrationMockBackend {
    fn new() -> Self {
        Self {
            request_count: AtomicUsize::new(0),
            should_fail: AtomicBool::new(false),
            delay: Duration::ZERO,
        }
    }

    fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::new()
        }
    }

    fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }

    fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmBackend for IntegrationMockBackend {
    fn name(&self) -> &str {
        "IntegrationMock"
    }

    async fn health_check(&self) -> bool {
        !self.should_fail.load(Ordering::SeqCst)
    }

    async fn send(&self, request: &LlmRequest) -> anyhow::Result<LlmResponse> {
        self.request_count.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.should_fail.load(Ordering::SeqCst) {
            anyhow::bail!("Simulated backend failure");
        }
        Ok(LlmResponse {
            content: format!("I hear you: {}", request.prompt.trim()),
            model: request.model.clone(),
            tokens_used: Some(10),
            duration_ms: Some(1),
        })
    }
}

fn happy_gentle_circle() -> AvatarConfig {
    AvatarConfig::new(Expression::Happy, [Personality::Gentle], AvatarStyle::Circle).unwrap()
}

/// Run one chat request the way the TUI does: on a task, reply over a channel
fn spawn_reply(
    responder: Arc<dyn Responder>,
    avatar: AvatarConfig,
    token: RequestToken,
    prompt: String,
    tx: mpsc::UnboundedSender<(RequestToken, String)>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let reply = responder.respond(&prompt, &avatar).await;
        let _ = tx.send((token, reply));
    })
}

// =============================================================================
// Session Scenario
// =============================================================================

#[test]
fn test_login_create_home_scenario() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut shell = Shell::new();
    let mut login = LoginFlow::default();

    assert!(login.begin(LoginMethod::WeChat));
    let mut completed = 0;
    for _ in 0..40 {
        if login.tick(Duration::from_millis(100), &mut rng) == Some(LoginEvent::Completed) {
            completed += 1;
            shell.complete_login();
        }
    }
    assert_eq!(completed, 1);
    assert_eq!(shell.page(), Page::AvatarCustomization);

    let mut editor = AvatarEditor::new(shell.avatar());
    editor.select_expression(Expression::Happy);
    editor.select_style(AvatarStyle::Circle);
    let saved = editor.save().expect("default personality is non-empty");
    shell.complete_avatar_creation(saved);

    assert_eq!(shell.page(), Page::Home);
    assert!(shell.nav_visible());
    assert_eq!(shell.avatar(), Some(&happy_gentle_circle()));
}

#[test]
fn test_editor_cannot_save_empty_personality() {
    let mut editor = AvatarEditor::new(None);
    editor.toggle_personality(Personality::Gentle);
    assert!(!editor.can_save());
    assert!(editor.save().is_none());
}

// =============================================================================
// Chat Flow
// =============================================================================

#[tokio::test]
async fn test_chat_round_trip() {
    let backend = Arc::new(IntegrationMockBackend::new());
    let responder: Arc<dyn Responder> = Arc::new(LlmResponder::new(backend.clone(), "mock"));
    let (tx, mut rx) = mpsc::unbounded_channel();

    let mut session = ChatSession::new();
    let request = session.send("I had a long day").unwrap();
    spawn_reply(
        responder,
        happy_gentle_circle(),
        request.token,
        request.prompt,
        tx,
    );

    let (token, reply) = rx.recv().await.unwrap();
    assert!(session.complete(token, reply));

    let texts: Vec<_> = session.messages().iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, vec![GREETING, "I had a long day", "I hear you: I had a long day"]);
    assert_eq!(session.messages()[2].sender, Sender::Companion);
    assert_eq!(backend.request_count(), 1);
}

#[tokio::test]
async fn test_chat_failure_shows_fallback() {
    let backend = Arc::new(IntegrationMockBackend::new());
    backend.set_should_fail(true);
    let responder = LlmResponder::new(backend.clone(), "mock");

    let mut session = ChatSession::new();
    let request = session.send("hello").unwrap();
    let reply = responder.respond(&request.prompt, &happy_gentle_circle()).await;
    session.complete(request.token, reply);

    assert_eq!(session.messages().last().unwrap().text, FALLBACK_REPLY);
    assert!(!session.is_pending());
    assert!(!responder.check_backend().await);

    backend.set_should_fail(false);
    assert!(responder.check_backend().await);
    let request = session.send("again").unwrap();
    let reply = responder.respond(&request.prompt, &happy_gentle_circle()).await;
    session.complete(request.token, reply);
    assert_eq!(session.messages().last().unwrap().text, "I hear you: again");
}

#[tokio::test]
async fn test_leaving_chat_aborts_and_discards_late_reply() {
    let backend = Arc::new(IntegrationMockBackend::with_delay(Duration::from_millis(50)));
    let responder: Arc<dyn Responder> = Arc::new(LlmResponder::new(backend.clone(), "mock"));
    let (tx, mut rx) = mpsc::unbounded_channel();

    // First visit: request in flight, then the user navigates away
    let mut first = ChatSession::new();
    let stale = first.send("are you there?").unwrap();
    let handle = spawn_reply(
        responder.clone(),
        happy_gentle_circle(),
        stale.token,
        stale.prompt,
        tx.clone(),
    );
    handle.abort();
    drop(first);

    // Second visit gets a fresh session and its own request
    let mut second = ChatSession::new();
    assert_eq!(second.messages().len(), 1);
    let current = second.send("hi again").unwrap();
    spawn_reply(
        responder,
        happy_gentle_circle(),
        current.token,
        current.prompt,
        tx,
    );

    // A late reply for the old token would be rejected
    assert!(!second.complete(stale.token, "late"));

    let (token, reply) = rx.recv().await.unwrap();
    assert_eq!(token, current.token);
    assert!(second.complete(token, reply));
    assert_eq!(second.messages().len(), 3);
}

// =============================================================================
// Configuration Affecting Components
// =============================================================================

#[test]
fn test_config_timings_reach_games() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(
        b"[timings]\nbreathing_complete_ms = 500\nresult_banner_ms = 300\n",
    )
    .unwrap();
    let config = load_config_from_path(Some(file.path().to_path_buf())).unwrap();

    let mut host = GamesHost::new(config.timings, StdRng::seed_from_u64(3));
    assert!(host.start_game(GameKind::Breathing));
    for _ in 0..5 {
        host.handle(GameInput::Breathe);
    }

    assert!(host.tick(Duration::from_millis(499)).is_none());
    let outcome = host.tick(Duration::from_millis(1)).unwrap();
    assert_eq!(outcome.message, BREATHING_RESULT);

    host.tick(Duration::from_millis(300));
    assert!(host.banner().is_none());
}
