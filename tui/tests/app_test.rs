//! App-level tests
//!
//! Drive the whole terminal app without a terminal: keys and clicks go in
//! through the public handlers, time through `update`, and frames are
//! drawn into a ratatui `TestBackend` so click areas exist.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::backend::TestBackend;
use ratatui::Terminal;

use aura_tui::hits::Target;
use aura_tui::pages::Screen;
use aura_tui::App;
use companion_core::avatar::{AvatarConfig, Personality};
use companion_core::chat::Sender;
use companion_core::config::AppConfig;
use companion_core::games::SMASH_RESULT;
use companion_core::login::LoginMethod;
use companion_core::navigation::Page;
use companion_core::Responder;

// ============================================================================
// Helpers
// ============================================================================

/// Answers instantly, or never when `hang` is set
struct MockResponder {
    calls: AtomicUsize,
    hang: bool,
}

impl MockResponder {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            hang: false,
        }
    }

    fn hanging() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            hang: true,
        }
    }
}

#[async_trait]
impl Responder for MockResponder {
    async fn respond(&self, prompt: &str, avatar: &AvatarConfig) -> String {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.hang {
            futures::future::pending::<()>().await;
        }
        format!("[{}] {prompt}", avatar.expression())
    }
}

fn app_with(responder: Arc<MockResponder>) -> App {
    App::new(&AppConfig::default(), responder, StdRng::seed_from_u64(42))
}

fn press(app: &mut App, code: KeyCode) {
    app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
}

fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        press(app, KeyCode::Char(c));
    }
}

fn click(app: &mut App, target: Target) {
    let area = app
        .hits()
        .area_of(target)
        .unwrap_or_else(|| panic!("{target:?} not drawn"));
    app.handle_mouse(MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column: area.x,
        row: area.y,
        modifiers: KeyModifiers::NONE,
    });
}

fn draw(app: &mut App) {
    let mut terminal = Terminal::new(TestBackend::new(80, 48)).unwrap();
    terminal.draw(|frame| app.draw(frame)).unwrap();
}

/// Run simulated time until the page changes or the budget runs out
fn run_until_page(app: &mut App, page: Page) {
    for _ in 0..100 {
        if app.shell().page() == page {
            return;
        }
        app.update(Duration::from_millis(100));
    }
    assert_eq!(app.shell().page(), page);
}

/// Sign in and save the default companion
fn logged_in(responder: Arc<MockResponder>) -> App {
    let mut app = app_with(responder);
    press(&mut app, KeyCode::Enter);
    run_until_page(&mut app, Page::AvatarCustomization);
    for _ in 0..3 {
        press(&mut app, KeyCode::Down);
    }
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.shell().page(), Page::Home);
    // let the slide-in finish
    app.update(Duration::from_secs(1));
    app
}

// ============================================================================
// Login and companion creation
// ============================================================================

#[test]
fn test_login_then_create_companion() {
    let mut app = app_with(Arc::new(MockResponder::new()));
    assert_eq!(app.shell().page(), Page::Login);
    assert!(!app.shell().nav_visible());

    // Tabs do nothing before sign-in
    press(&mut app, KeyCode::F(2));
    press(&mut app, KeyCode::Tab);
    assert_eq!(app.shell().page(), Page::Login);

    press(&mut app, KeyCode::Enter);
    let Screen::Login(page) = app.screen() else {
        panic!("expected login page");
    };
    assert!(page.flow().is_loading());

    run_until_page(&mut app, Page::AvatarCustomization);
    assert!(!app.shell().nav_visible());

    // Gentle is preselected; add Witty and save
    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Right);
    press(&mut app, KeyCode::Enter);
    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Enter);

    assert_eq!(app.shell().page(), Page::Home);
    assert!(app.shell().nav_visible());
    let avatar = app.shell().avatar().unwrap();
    assert!(avatar.personality().contains(Personality::Gentle));
    assert!(avatar.personality().contains(Personality::Witty));
}

#[test]
fn test_click_sign_in_button() {
    let mut app = app_with(Arc::new(MockResponder::new()));
    draw(&mut app);
    click(&mut app, Target::Login(LoginMethod::Phone));

    let Screen::Login(page) = app.screen() else {
        panic!("expected login page");
    };
    assert!(page.flow().is_loading());
}

// ============================================================================
// Navigation
// ============================================================================

#[test]
fn test_tabs_and_profile_menu() {
    let mut app = logged_in(Arc::new(MockResponder::new()));

    press(&mut app, KeyCode::F(2));
    assert_eq!(app.shell().page(), Page::Games);
    press(&mut app, KeyCode::Tab);
    assert_eq!(app.shell().page(), Page::Chat);
    press(&mut app, KeyCode::BackTab);
    assert_eq!(app.shell().page(), Page::Games);
    press(&mut app, KeyCode::F(4));
    assert_eq!(app.shell().page(), Page::Profile);

    for _ in 0..3 {
        press(&mut app, KeyCode::Down);
    }
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.shell().page(), Page::AvatarCustomization);
    let Screen::Avatar(page) = app.screen() else {
        panic!("expected avatar page");
    };
    assert!(page.editor().is_edit_mode());
}

#[test]
fn test_click_nav_and_suggestion() {
    let mut app = logged_in(Arc::new(MockResponder::new()));
    draw(&mut app);
    click(&mut app, Target::Suggestion);
    assert_eq!(app.shell().page(), Page::Games);

    app.update(Duration::from_secs(1));
    draw(&mut app);
    click(&mut app, Target::Nav(Page::Chat));
    assert_eq!(app.shell().page(), Page::Chat);
}

// ============================================================================
// Chat
// ============================================================================

#[tokio::test]
async fn test_chat_round_trip() {
    let responder = Arc::new(MockResponder::new());
    let mut app = logged_in(Arc::clone(&responder));
    press(&mut app, KeyCode::F(3));

    type_text(&mut app, "hello");
    press(&mut app, KeyCode::Enter);

    let mut delivered = false;
    for _ in 0..50 {
        tokio::task::yield_now().await;
        app.update(Duration::ZERO);
        let Screen::Chat(page) = app.screen() else {
            panic!("expected chat page");
        };
        if !page.session().is_pending() {
            delivered = true;
            break;
        }
    }
    assert!(delivered);

    let Screen::Chat(page) = app.screen() else {
        panic!("expected chat page");
    };
    let last = page.session().messages().last().unwrap();
    assert_eq!(last.sender, Sender::Companion);
    assert_eq!(last.text, "[Calm] hello");
    assert_eq!(responder.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_leaving_chat_drops_pending_reply() {
    let responder = Arc::new(MockResponder::hanging());
    let mut app = logged_in(Arc::clone(&responder));
    press(&mut app, KeyCode::F(3));
    type_text(&mut app, "are you there?");
    press(&mut app, KeyCode::Enter);
    tokio::task::yield_now().await;

    press(&mut app, KeyCode::F(1));
    press(&mut app, KeyCode::F(3));
    app.update(Duration::ZERO);

    let Screen::Chat(page) = app.screen() else {
        panic!("expected chat page");
    };
    assert_eq!(page.session().messages().len(), 1);
    assert!(!page.session().is_pending());
}

// ============================================================================
// Games
// ============================================================================

#[test]
fn test_smash_round_shows_banner() {
    let mut app = logged_in(Arc::new(MockResponder::new()));
    press(&mut app, KeyCode::F(2));
    press(&mut app, KeyCode::Enter);

    let mut banner = None;
    for _ in 0..200 {
        press(&mut app, KeyCode::Char('1'));
        app.update(Duration::from_millis(250));
        let Screen::Games(page) = app.screen() else {
            panic!("expected games page");
        };
        if let Some(text) = page.host().banner() {
            banner = Some(text.to_string());
            assert!(!page.in_game());
            break;
        }
    }
    assert_eq!(banner.as_deref(), Some(SMASH_RESULT));
}

#[test]
fn test_escape_leaves_game_before_quitting() {
    let mut app = logged_in(Arc::new(MockResponder::new()));
    press(&mut app, KeyCode::F(2));
    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Enter);

    press(&mut app, KeyCode::Esc);
    let Screen::Games(page) = app.screen() else {
        panic!("expected games page");
    };
    assert!(!page.in_game());
    assert!(app.is_running());

    press(&mut app, KeyCode::Esc);
    assert!(!app.is_running());
    assert!(app.goodbye().is_some());
}
