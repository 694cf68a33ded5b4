//! Bottom Navigation Bar
//!
//! Four equal tabs: Home, Games, Companion, Me. The tab for the current page
//! is highlighted; pages without a tab highlight nothing.

use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::text::Line;
use ratatui::widgets::{Paragraph, Widget};

use companion_core::navigation::Page;

use crate::theme;

/// Height of the bar in rows
pub const NAV_HEIGHT: u16 = 1;

/// The bottom tab bar
pub struct NavBar {
    current: Page,
}

impl NavBar {
    /// Bar with `current` highlighted
    pub fn new(current: Page) -> Self {
        Self { current }
    }

    /// Screen area of each tab, left to right
    pub fn slots(area: Rect) -> Vec<(Rect, Page)> {
        let cells = Layout::horizontal([Constraint::Ratio(1, 4); 4]).split(area);
        cells.iter().copied().zip(Page::NAV_ITEMS).collect()
    }
}

impl Widget for NavBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, theme::dim().bg(theme::PANEL_BG));
        for (i, (cell, page)) in Self::slots(area).into_iter().enumerate() {
            let label = page.nav_label().unwrap_or_default();
            let text = format!("F{} {label}", i + 1);
            let style = if page == self.current {
                theme::selected()
            } else {
                theme::dim().bg(theme::PANEL_BG)
            };
            Paragraph::new(Line::from(text))
                .alignment(Alignment::Center)
                .style(style)
                .render(cell, buf);
        }
    }
}
