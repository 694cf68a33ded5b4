//! Main Application
//!
//! The App struct owns the terminal side of the session:
//! - Event loop (keyboard, mouse, frame ticks)
//! - The navigation [`Shell`] and the state of the page on screen
//! - Chat reply tasks and the channel they report back on
//!
//! # Input Flow
//!
//! Keys and clicks both end up as a [`Target`]. Page key handlers translate
//! keys into targets; clicks are looked up in the [`HitMap`] recorded during
//! the previous draw. [`App::activate`] is the only place targets act.
//!
//! # Time
//!
//! Nothing in the core reads a clock. The loop measures the time since the
//! last frame and pushes it down with `update(delta)`, so tests can drive
//! the whole app with synthetic time.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{
    Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use futures::StreamExt;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use ratatui::backend::Backend;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, BorderType, Borders};
use ratatui::{Frame, Terminal};
use tokio::sync::mpsc;

use companion_core::chat::RequestToken;
use companion_core::config::{AppConfig, Timings};
use companion_core::login::LoginEvent;
use companion_core::navigation::{Page, Shell};
use companion_core::responder::Responder;

use crate::hits::{HitMap, Target};
use crate::pages::{centered, Mount, ProfilePage, Screen};
use crate::theme;
use crate::widgets::nav_bar::NAV_HEIGHT;
use crate::widgets::NavBar;

/// Widest the phone frame gets
const FRAME_WIDTH: u16 = 64;

/// Lines per mouse-wheel notch in the chat
const WHEEL_LINES: usize = 3;

/// Quick goodbye messages
const QUICK_GOODBYES: &[&str] = &[
    "Take a deep breath. See you soon!",
    "Be gentle with yourself today.",
    "Stay calm, stay positive.",
    "Rest well!",
    "You did great today.",
    "See you next time!",
];

/// Reply from a chat task, tagged with the request it answers
type Reply = (RequestToken, String);

/// Main application state
pub struct App {
    // === Core State ===
    /// Is the app still running?
    running: bool,
    /// Goodbye message to show on exit
    goodbye_message: Option<String>,

    // === Session ===
    /// Current page, companion and login flag
    shell: Shell,
    /// State of the page on screen
    screen: Screen,
    /// Configured delays
    timings: Timings,
    /// Randomness for dashboards, games and affirmations
    rng: StdRng,

    // === Chat ===
    /// Generates companion replies
    responder: Arc<dyn Responder>,
    /// Handed to each reply task
    replies_tx: mpsc::UnboundedSender<Reply>,
    /// Drained every frame
    replies_rx: mpsc::UnboundedReceiver<Reply>,

    // === Rendering ===
    /// Click areas from the last frame
    hits: HitMap,
    /// Target frame period
    frame_interval: Duration,
}

impl App {
    /// Create a new App instance
    pub fn new(config: &AppConfig, responder: Arc<dyn Responder>, mut rng: StdRng) -> Self {
        let timings = config.timings;
        let shell = Shell::with_transition(timings.page_transition);
        let screen = Screen::mount(
            shell.page(),
            Mount {
                timings: &timings,
                rng: &mut rng,
                avatar: shell.avatar(),
            },
        );
        let (replies_tx, replies_rx) = mpsc::unbounded_channel();

        Self {
            running: true,
            goodbye_message: None,
            shell,
            screen,
            timings,
            rng,
            responder,
            replies_tx,
            replies_rx,
            hits: HitMap::default(),
            frame_interval: config.frame_interval,
        }
    }

    /// Main event loop
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()> {
        let mut event_stream = EventStream::new();
        let mut last_frame = Instant::now();

        terminal.draw(|frame| self.draw(frame))?;

        while self.running {
            let frame_start = Instant::now();

            tokio::select! {
                biased;

                // Terminal events first
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                            self.handle_key(key);
                        }
                        Some(Ok(Event::Mouse(mouse))) => self.handle_mouse(mouse),
                        Some(Ok(_)) => {}
                        Some(Err(e)) => tracing::warn!(error = %e, "Terminal event error"),
                        None => self.running = false,
                    }
                }

                // Frame tick
                _ = tokio::time::sleep(self.frame_interval) => {}
            }

            let now = Instant::now();
            self.update(now - last_frame);
            last_frame = now;

            terminal.draw(|frame| self.draw(frame))?;

            // Frame rate limiting
            let elapsed = frame_start.elapsed();
            if elapsed < self.frame_interval {
                tokio::time::sleep(self.frame_interval - elapsed).await;
            }
        }

        Ok(())
    }

    /// Advance timers by `delta` and collect chat replies
    pub fn update(&mut self, delta: Duration) {
        while let Ok((token, reply)) = self.replies_rx.try_recv() {
            match &mut self.screen {
                Screen::Chat(page) => {
                    page.deliver(token, reply);
                }
                _ => tracing::debug!(%token, "Discarding reply for a closed chat"),
            }
        }

        self.shell.tick(delta);

        let mut logged_in = false;
        match &mut self.screen {
            Screen::Login(page) => {
                logged_in = page.tick(delta, &mut self.rng) == Some(LoginEvent::Completed);
            }
            Screen::Home(page) => page.tick(delta, &mut self.rng),
            Screen::Games(page) => {
                page.tick(delta);
            }
            Screen::Avatar(_) | Screen::Chat(_) | Screen::Profile(_) => {}
        }
        if logged_in {
            self.shell.complete_login();
            self.sync_screen();
        }
    }

    /// Handle keyboard input
    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => self.quit(),
            KeyCode::Esc => {
                if matches!(&self.screen, Screen::Games(page) if page.in_game()) {
                    self.activate(Target::ExitGame);
                } else {
                    self.quit();
                }
            }
            KeyCode::F(n @ 1..=4) if self.shell.nav_visible() => {
                self.navigate(Page::NAV_ITEMS[usize::from(n) - 1]);
            }
            KeyCode::Tab if self.shell.nav_visible() => self.navigate(self.shell.page().next_tab()),
            KeyCode::BackTab if self.shell.nav_visible() => {
                self.navigate(self.shell.page().prev_tab());
            }
            _ => {
                let target = match &mut self.screen {
                    Screen::Login(page) => page.key(key),
                    Screen::Avatar(page) => page.key(key),
                    Screen::Home(page) => page.key(key),
                    Screen::Games(page) => page.key(key),
                    Screen::Chat(page) => page.key(key),
                    Screen::Profile(page) => page.key(key),
                };
                if let Some(target) = target {
                    self.activate(target);
                }
            }
        }
    }

    /// Handle mouse input
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(target) = self.hits.at(mouse.column, mouse.row) {
                    self.activate(target);
                }
            }
            MouseEventKind::ScrollUp | MouseEventKind::ScrollDown => {
                if let Screen::Chat(page) = &mut self.screen {
                    page.scroll(mouse.kind == MouseEventKind::ScrollUp, WHEEL_LINES);
                }
            }
            _ => {}
        }
    }

    /// Act on a button, chip, tab or game element
    pub fn activate(&mut self, target: Target) {
        tracing::trace!(?target, "Activate");
        match target {
            Target::Nav(page) => self.navigate(page),
            Target::Suggestion => self.navigate(Page::Games),
            Target::ProfileItem(index) => {
                if let Some(page) = ProfilePage::destination(index) {
                    self.navigate(page);
                }
            }
            Target::SendChat => self.send_chat(),
            Target::Login(method) => {
                if let Screen::Login(page) = &mut self.screen {
                    page.choose(method);
                }
            }
            Target::Style(_)
            | Target::Expression(_)
            | Target::Personality(_)
            | Target::SaveAvatar => {
                let Screen::Avatar(page) = &mut self.screen else {
                    return;
                };
                if let Some(config) = page.activate(target) {
                    self.shell.complete_avatar_creation(config);
                    self.sync_screen();
                }
            }
            Target::GameCard(_)
            | Target::ExitGame
            | Target::Banner
            | Target::Lemon(_)
            | Target::Dough
            | Target::MatchCell(_) => {
                if let Screen::Games(page) = &mut self.screen {
                    page.activate(target);
                }
            }
        }
    }

    fn navigate(&mut self, page: Page) {
        self.shell.navigate_to(page);
        self.sync_screen();
    }

    /// Rebuild page state after the shell changed pages
    fn sync_screen(&mut self) {
        if self.screen.page() == self.shell.page() {
            return;
        }
        self.screen = Screen::mount(
            self.shell.page(),
            Mount {
                timings: &self.timings,
                rng: &mut self.rng,
                avatar: self.shell.avatar(),
            },
        );
    }

    /// Run the typed chat message through the responder
    fn send_chat(&mut self) {
        let Some(avatar) = self.shell.avatar().cloned() else {
            return;
        };
        let Screen::Chat(page) = &mut self.screen else {
            return;
        };
        let Some(request) = page.submit() else {
            return;
        };

        tracing::debug!(token = %request.token, "Spawning chat reply");
        let responder = Arc::clone(&self.responder);
        let replies = self.replies_tx.clone();
        let task = tokio::spawn(async move {
            let reply = responder.respond(&request.prompt, &avatar).await;
            // Receiver gone means the app is shutting down
            let _ = replies.send((request.token, reply));
        });
        page.attach(task.abort_handle());
    }

    /// Draw one frame and record its click areas
    pub fn draw(&mut self, frame: &mut Frame) {
        self.hits.clear();

        let area = frame.area();
        let phone = centered(area, FRAME_WIDTH, area.height);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme::AURA_VIOLET))
            .style(Style::default().bg(theme::PANEL_BG));
        let inner = block.inner(phone);
        frame.render_widget(block, phone);

        let nav_height = if self.shell.nav_visible() {
            NAV_HEIGHT.min(inner.height)
        } else {
            0
        };
        let content = Rect {
            height: inner.height - nav_height,
            ..inner
        };

        // Slide in from the right while the transition runs
        let offset = self.shell.transition().offset(content.width);
        let content = Rect {
            x: content.x + offset,
            width: content.width - offset,
            ..content
        };

        let hits = &mut self.hits;
        match &mut self.screen {
            Screen::Login(page) => page.render(frame, content, hits),
            Screen::Avatar(page) => page.render(frame, content, hits),
            Screen::Home(page) => page.render(frame, content, hits),
            Screen::Games(page) => page.render(frame, content, hits),
            Screen::Chat(page) => page.render(frame, content, hits, self.shell.avatar()),
            Screen::Profile(page) => page.render(frame, content, hits),
        }

        if nav_height > 0 {
            let bar = Rect {
                y: inner.y + inner.height - nav_height,
                height: nav_height,
                ..inner
            };
            frame.render_widget(NavBar::new(self.shell.page()), bar);
            for (slot, page) in NavBar::slots(bar) {
                self.hits.push(slot, Target::Nav(page));
            }
        }
    }

    fn quit(&mut self) {
        self.generate_goodbye();
        self.running = false;
    }

    /// Generate a quick goodbye message
    fn generate_goodbye(&mut self) {
        self.goodbye_message = QUICK_GOODBYES
            .choose(&mut self.rng)
            .map(|goodbye| (*goodbye).to_string());
    }

    /// Get the goodbye message for display after TUI closes
    pub fn goodbye(&self) -> Option<&str> {
        self.goodbye_message.as_deref()
    }

    /// Whether the loop should keep going
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Navigation state
    pub fn shell(&self) -> &Shell {
        &self.shell
    }

    /// Page state on screen
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Click areas from the last draw
    pub fn hits(&self) -> &HitMap {
        &self.hits
    }
}
