//! Chat Page
//!
//! Conversation with the companion. One session per visit: leaving the page
//! drops it, which aborts any reply still being generated. A reply that
//! arrives anyway carries a stale token and is discarded by the session.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use ratatui::Frame;
use tokio::task::AbortHandle;
use unicode_width::UnicodeWidthStr;

use companion_core::avatar::AvatarConfig;
use companion_core::chat::{ChatSession, PendingRequest, RequestToken};
use companion_core::navigation::MISSING_AVATAR_NOTICE;

use crate::hits::{HitMap, Target};
use crate::theme;
use crate::widgets::{AvatarFace, Transcript, TranscriptState};

const PLACEHOLDER: &str = "Type a message...";

/// Conversation screen state
#[derive(Default)]
pub struct ChatPage {
    session: ChatSession,
    input: String,
    transcript: TranscriptState,
    task: Option<AbortHandle>,
}

impl ChatPage {
    /// New conversation seeded with the greeting
    pub fn new() -> Self {
        Self::default()
    }

    /// The conversation
    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    /// Text typed but not yet sent
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Keyboard: type, Enter sends, PageUp/PageDown scroll
    pub fn key(&mut self, key: KeyEvent) -> Option<Target> {
        match key.code {
            KeyCode::Enter => return Some(Target::SendChat),
            KeyCode::Char(c) => self.input.push(c),
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::PageUp => self.transcript.scroll_up(5),
            KeyCode::PageDown => self.transcript.scroll_down(5),
            KeyCode::End => self.transcript.scroll_to_bottom(),
            _ => {}
        }
        None
    }

    /// Mouse wheel over the transcript
    pub fn scroll(&mut self, up: bool, lines: usize) {
        if up {
            self.transcript.scroll_up(lines);
        } else {
            self.transcript.scroll_down(lines);
        }
    }

    /// Send the typed text
    ///
    /// Returns the request to run, or `None` when the input is blank or a
    /// reply is still pending. The input is kept in that case.
    pub fn submit(&mut self) -> Option<PendingRequest> {
        let request = self.session.send(&self.input)?;
        self.input.clear();
        self.transcript.scroll_to_bottom();
        Some(request)
    }

    /// Track the task generating the pending reply
    pub fn attach(&mut self, task: AbortHandle) {
        if let Some(previous) = self.task.replace(task) {
            previous.abort();
        }
    }

    /// A reply came back; `false` if it was for another request
    pub fn deliver(&mut self, token: RequestToken, reply: String) -> bool {
        if !self.session.complete(token, reply) {
            return false;
        }
        self.task = None;
        self.transcript.scroll_to_bottom();
        true
    }

    /// Draw the page
    pub fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        hits: &mut HitMap,
        avatar: Option<&AvatarConfig>,
    ) {
        let Some(avatar) = avatar else {
            frame.render_widget(
                Paragraph::new(MISSING_AVATAR_NOTICE)
                    .alignment(Alignment::Center)
                    .style(theme::dim()),
                super::centered(area, area.width, 1),
            );
            return;
        };

        let [header, log, input] = Layout::vertical([
            Constraint::Length(5),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .areas(area);

        let [face, name] =
            Layout::horizontal([Constraint::Length(11), Constraint::Min(0)]).areas(header);
        frame.render_widget(
            AvatarFace::new(avatar.expression(), avatar.style()).thinking(self.session.is_pending()),
            face,
        );
        let status = if self.session.is_pending() {
            Span::styled("typing...", theme::dim())
        } else {
            Span::styled("● Online", Style::default().fg(theme::SUCCESS_GREEN))
        };
        frame.render_widget(
            Paragraph::new(vec![
                Line::default(),
                Line::from(" Aura").style(theme::title()),
                Line::from(vec![Span::raw(" "), status]),
            ]),
            name,
        );

        frame.render_stateful_widget(
            Transcript::new(self.session.messages()).typing(self.session.is_pending()),
            log,
            &mut self.transcript,
        );

        let [field, send] =
            Layout::horizontal([Constraint::Min(0), Constraint::Length(8)]).areas(input);
        let text = if self.input.is_empty() {
            Span::styled(PLACEHOLDER, theme::dim())
        } else {
            Span::raw(self.input.as_str())
        };
        frame.render_widget(
            Paragraph::new(Line::from(text)).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(theme::AURA_VIOLET)),
            ),
            field,
        );
        let cursor_x = u16::try_from(self.input.width()).unwrap_or(u16::MAX);
        frame.set_cursor_position((
            (field.x + 1).saturating_add(cursor_x).min(field.right().saturating_sub(2)),
            field.y + 1,
        ));

        let send_style = if self.session.is_pending() || self.input.trim().is_empty() {
            theme::dim()
        } else {
            theme::selected()
        };
        frame.render_widget(
            Paragraph::new("Send")
                .alignment(Alignment::Center)
                .style(send_style.add_modifier(Modifier::BOLD))
                .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded)),
            send,
        );
        hits.push(send, Target::SendChat);
    }
}

impl Drop for ChatPage {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            tracing::debug!(token = ?self.session.in_flight(), "Aborting pending chat reply");
            task.abort();
        }
    }
}
