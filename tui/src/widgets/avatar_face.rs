//! Avatar Face Widget
//!
//! The companion drawn as a small framed face. The frame follows the avatar
//! style, the eyes, mouth and color follow the expression.

use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph, Widget};

use companion_core::avatar::{AvatarStyle, Expression};

use crate::theme;

/// A companion face
pub struct AvatarFace {
    expression: Expression,
    style: AvatarStyle,
    thinking: bool,
}

impl AvatarFace {
    /// Face for the given look
    pub fn new(expression: Expression, style: AvatarStyle) -> Self {
        Self {
            expression,
            style,
            thinking: false,
        }
    }

    /// Show a thinking indicator above the mouth
    #[must_use]
    pub fn thinking(mut self, thinking: bool) -> Self {
        self.thinking = thinking;
        self
    }
}

impl Widget for AvatarFace {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let color = theme::expression_color(self.expression);
        let (eyes, mouth) = theme::expression_face(self.expression);

        let mut lines = Vec::with_capacity(4);
        if self.style == AvatarStyle::Robot {
            lines.push(Line::from("[=====]"));
        }
        lines.push(Line::from(eyes));
        lines.push(Line::from(if self.thinking { "..." } else { mouth }));

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(theme::style_border(self.style))
            .border_style(Style::default().fg(color));

        let inner = block.inner(area);
        block.render(area, buf);

        // Vertically center the face inside the frame
        let used = u16::try_from(lines.len()).unwrap_or(u16::MAX);
        let top = inner.height.saturating_sub(used) / 2;
        let face_area = Rect {
            y: inner.y + top,
            height: inner.height.saturating_sub(top),
            ..inner
        };

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
            .render(face_area, buf);
    }
}
