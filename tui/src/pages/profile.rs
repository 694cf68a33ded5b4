//! Profile Page

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use ratatui::Frame;

use companion_core::navigation::Page;

use crate::hits::{HitMap, Target};
use crate::theme;

/// Menu rows, top to bottom
pub const MENU: [&str; 5] = [
    "Personal Account",
    "Settings",
    "Background",
    "Modify AI Avatar",
    "Help & Feedback",
];

const MODIFY_AVATAR: usize = 3;

/// Account screen state
#[derive(Debug, Default)]
pub struct ProfilePage {
    cursor: usize,
}

impl ProfilePage {
    /// Menu with the first row focused
    pub fn new() -> Self {
        Self::default()
    }

    /// Where activating a menu row leads, if anywhere
    pub fn destination(index: usize) -> Option<Page> {
        (index == MODIFY_AVATAR).then_some(Page::AvatarCustomization)
    }

    /// Keyboard: arrows move, Enter opens
    pub fn key(&mut self, key: KeyEvent) -> Option<Target> {
        match key.code {
            KeyCode::Up => {
                self.cursor = self.cursor.saturating_sub(1);
                None
            }
            KeyCode::Down => {
                self.cursor = (self.cursor + 1).min(MENU.len() - 1);
                None
            }
            KeyCode::Enter | KeyCode::Char(' ') => Some(Target::ProfileItem(self.cursor)),
            _ => None,
        }
    }

    /// Draw the page
    pub fn render(&self, frame: &mut Frame, area: Rect, hits: &mut HitMap) {
        let [card, menu, logout] = Layout::vertical([
            Constraint::Length(5),
            Constraint::Length(u16::try_from(MENU.len()).unwrap_or(5) + 2),
            Constraint::Length(3),
        ])
        .areas(area);

        frame.render_widget(
            Paragraph::new(vec![
                Line::from("User Name").style(theme::title()),
                Line::from("Stay calm, stay positive.").style(theme::dim()),
            ])
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(theme::AURA_VIOLET)),
            ),
            card,
        );

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::dim());
        let inner = block.inner(menu);
        frame.render_widget(block, menu);
        let rows = Layout::vertical([Constraint::Length(1); MENU.len()]).split(inner);
        for (i, (row, label)) in rows.iter().zip(MENU).enumerate() {
            let style = if i == self.cursor {
                theme::selected()
            } else {
                Style::default()
            };
            frame.render_widget(
                Paragraph::new(Line::from(vec![
                    Span::raw(label),
                    Span::styled("  ›", theme::dim()),
                ]))
                .style(style),
                *row,
            );
            hits.push(*row, Target::ProfileItem(i));
        }

        frame.render_widget(
            Paragraph::new("Log Out")
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::Rgb(239, 68, 68)))
                .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded)),
            logout,
        );
    }
}
