//! Transcript Widget
//!
//! A borderless, scrollable chat log. Messages are wrapped to the width of
//! the area; the view sticks to the newest line unless scrolled up.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::StatefulWidget;
use textwrap::wrap;
use unicode_width::UnicodeWidthStr;

use companion_core::chat::{ChatMessage, Sender};

use crate::theme;

/// Scroll state for a transcript
#[derive(Debug, Default)]
pub struct TranscriptState {
    /// Lines scrolled up from the bottom (0 = latest)
    pub scroll_offset: usize,
    /// Total wrapped lines at last render
    pub total_lines: usize,
}

impl TranscriptState {
    /// Scroll towards older messages
    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll_offset = (self.scroll_offset + lines).min(self.total_lines.saturating_sub(1));
    }

    /// Scroll towards newer messages
    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    /// Jump to the newest message
    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = 0;
    }
}

/// The conversation, user lines right-aligned
pub struct Transcript<'a> {
    messages: &'a [ChatMessage],
    typing: bool,
}

impl<'a> Transcript<'a> {
    /// Log of `messages`
    pub fn new(messages: &'a [ChatMessage]) -> Self {
        Self {
            messages,
            typing: false,
        }
    }

    /// Append a typing indicator after the last message
    #[must_use]
    pub fn typing(mut self, typing: bool) -> Self {
        self.typing = typing;
        self
    }

    fn lines(&self, width: usize) -> Vec<(String, Style, bool)> {
        // Bubbles take at most three quarters of the row
        let bubble_width = (width * 3 / 4).max(8);
        let mut lines = Vec::new();

        for msg in self.messages {
            let (style, right) = match msg.sender {
                Sender::User => (Style::default().fg(Color::White).bg(theme::USER_BUBBLE), true),
                Sender::Companion => (
                    Style::default().fg(Color::White).bg(theme::COMPANION_BUBBLE),
                    false,
                ),
            };
            for line in msg.text.lines() {
                if line.is_empty() {
                    lines.push((String::new(), style, right));
                    continue;
                }
                for wrapped in wrap(line, bubble_width.saturating_sub(2)) {
                    lines.push((format!(" {wrapped} "), style, right));
                }
            }
            lines.push((String::new(), Style::default(), false));
        }

        if self.typing {
            lines.push((" ... ".to_string(), theme::dim().bg(theme::COMPANION_BUBBLE), false));
        }
        lines
    }
}

impl StatefulWidget for Transcript<'_> {
    type State = TranscriptState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        if area.width < 4 || area.height == 0 {
            return;
        }
        let lines = self.lines(area.width as usize);
        state.total_lines = lines.len();

        let height = area.height as usize;
        let max_scroll = state.total_lines.saturating_sub(height);
        state.scroll_offset = state.scroll_offset.min(max_scroll);

        let end = state.total_lines.saturating_sub(state.scroll_offset);
        let start = end.saturating_sub(height);

        for (row, (text, style, right)) in lines[start..end].iter().enumerate() {
            let y = area.y + u16::try_from(row).unwrap_or(u16::MAX);
            let width = u16::try_from(text.width()).unwrap_or(area.width).min(area.width);
            let x = if *right {
                area.x + area.width - width
            } else {
                area.x
            };
            buf.set_stringn(x, y, text, area.width as usize, *style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use companion_core::chat::ChatSession;

    fn render(session: &ChatSession, typing: bool, state: &mut TranscriptState) -> Vec<String> {
        let area = Rect::new(0, 0, 40, 6);
        let mut buf = Buffer::empty(area);
        Transcript::new(session.messages())
            .typing(typing)
            .render(area, &mut buf, state);
        (0..area.height)
            .map(|y| (0..area.width).map(|x| buf[(x, y)].symbol().to_string()).collect())
            .collect()
    }

    #[test]
    fn test_user_lines_right_aligned() {
        let mut session = ChatSession::new();
        session.send("hi");
        let mut state = TranscriptState::default();
        let rows = render(&session, false, &mut state);
        let user_row = rows.iter().find(|r| r.contains("hi ")).unwrap();
        assert!(user_row.ends_with(" hi "));
    }

    #[test]
    fn test_sticks_to_bottom() {
        let mut session = ChatSession::new();
        let request = session.send("one").unwrap();
        session.complete(request.token, "two two two two two two two two two two");
        let mut state = TranscriptState::default();
        let rows = render(&session, true, &mut state);
        assert!(rows.last().unwrap().contains("..."));
        assert!(state.total_lines > 6);
    }

    #[test]
    fn test_scroll_clamped() {
        let session = ChatSession::new();
        let mut state = TranscriptState::default();
        render(&session, false, &mut state);
        state.scroll_up(100);
        assert!(state.scroll_offset < state.total_lines);
        state.scroll_down(100);
        assert_eq!(state.scroll_offset, 0);
    }
}
