//! Login Page
//!
//! Title, a bobbing band face and three sign-in buttons. Choosing any of
//! them shows a spinner, then a welcome card with an affirmation.

use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;
use rand::Rng;

use companion_core::config::Timings;
use companion_core::login::{LoginEvent, LoginFlow, LoginMethod, LoginPhase};

use super::centered;
use crate::hits::{HitMap, Target};
use crate::theme;

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

/// Sign-in screen state
pub struct LoginPage {
    flow: LoginFlow,
    cursor: usize,
    clock: Duration,
}

impl LoginPage {
    /// Idle sign-in screen
    pub fn new(timings: &Timings) -> Self {
        Self {
            flow: LoginFlow::new(timings.login_connect, timings.login_welcome),
            cursor: 0,
            clock: Duration::ZERO,
        }
    }

    /// The sign-in state machine
    pub fn flow(&self) -> &LoginFlow {
        &self.flow
    }

    /// A sign-in button was activated
    pub fn choose(&mut self, method: LoginMethod) -> bool {
        if !self.flow.begin(method) {
            return false;
        }
        if let Some(index) = LoginMethod::ALL.iter().position(|m| *m == method) {
            self.cursor = index;
        }
        true
    }

    /// Keyboard: arrows move, Enter or 1-3 choose
    pub fn key(&mut self, key: KeyEvent) -> Option<Target> {
        let count = LoginMethod::ALL.len();
        match key.code {
            KeyCode::Up => {
                self.cursor = (self.cursor + count - 1) % count;
                None
            }
            KeyCode::Down => {
                self.cursor = (self.cursor + 1) % count;
                None
            }
            KeyCode::Enter | KeyCode::Char(' ') => Some(Target::Login(LoginMethod::ALL[self.cursor])),
            KeyCode::Char(c @ '1'..='3') => {
                let index = c as usize - '1' as usize;
                self.cursor = index;
                Some(Target::Login(LoginMethod::ALL[index]))
            }
            _ => None,
        }
    }

    /// Advance the flow; `Some` once the welcome card is done
    pub fn tick<R: Rng + ?Sized>(&mut self, delta: Duration, rng: &mut R) -> Option<LoginEvent> {
        self.clock += delta;
        self.flow.tick(delta, rng)
    }

    /// Draw the page
    pub fn render(&self, frame: &mut Frame, area: Rect, hits: &mut HitMap) {
        let [header, face, buttons] = Layout::vertical([
            Constraint::Length(4),
            Constraint::Min(5),
            Constraint::Length(10),
        ])
        .areas(area);

        frame.render_widget(
            Paragraph::new(vec![
                Line::from("Your Band").style(theme::title()),
                Line::from("Your Personal Wellness Companion").style(theme::dim()),
            ])
            .alignment(Alignment::Center),
            Rect {
                y: header.y + 1,
                height: header.height.saturating_sub(1),
                ..header
            },
        );

        // Gentle bob, one row every second
        let bob = u16::from(self.clock.as_secs() % 2 == 1);
        let band = centered(face, 11, 3);
        let band = Rect {
            y: band.y.saturating_sub(bob),
            ..band
        };
        frame.render_widget(
            Paragraph::new("(^_^)")
                .alignment(Alignment::Center)
                .style(Style::default().fg(theme::LEMON_YELLOW).add_modifier(Modifier::BOLD))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_type(BorderType::Rounded)
                        .border_style(Style::default().fg(theme::LEMON_YELLOW)),
                ),
            band,
        );

        let rows = Layout::vertical([Constraint::Length(3); 3]).split(centered(buttons, 32, 9));
        for (i, (row, method)) in rows.iter().zip(LoginMethod::ALL).enumerate() {
            let label = if self.flow.is_loading() && i == self.cursor {
                let frame_idx = (self.clock.as_millis() / 100) as usize % SPINNER.len();
                format!("{} Connecting...", SPINNER[frame_idx])
            } else {
                method.label().to_string()
            };
            let style = if i == self.cursor {
                theme::selected()
            } else {
                Style::default().fg(theme::AURA_LAVENDER)
            };
            frame.render_widget(
                Paragraph::new(label)
                    .alignment(Alignment::Center)
                    .style(style)
                    .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded)),
                *row,
            );
            hits.push(*row, Target::Login(method));
        }

        if let LoginPhase::Welcome { affirmation, .. } = self.flow.phase() {
            let card = centered(area, 44, 7);
            frame.render_widget(Clear, card);
            frame.render_widget(
                Paragraph::new(format!("\"{affirmation}\""))
                    .alignment(Alignment::Center)
                    .wrap(Wrap { trim: true })
                    .style(Style::default().add_modifier(Modifier::ITALIC))
                    .block(
                        Block::default()
                            .borders(Borders::ALL)
                            .border_type(BorderType::Rounded)
                            .border_style(Style::default().fg(theme::AURA_VIOLET))
                            .title(" Welcome ")
                            .title_alignment(Alignment::Center),
                    ),
                card,
            );
        }
    }
}
