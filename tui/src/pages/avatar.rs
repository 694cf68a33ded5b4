//! Avatar Customization Page
//!
//! Live preview on top, then rows of choices: style, expression and
//! personality traits, with the create/save button last. Arrow keys move a
//! cursor over the rows; Enter or Space picks.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use companion_core::avatar::{AvatarConfig, AvatarEditor, AvatarStyle, Expression, Personality};

use super::centered;
use crate::hits::{HitMap, Target};
use crate::theme;
use crate::widgets::AvatarFace;

const ROW_STYLE: usize = 0;
const ROW_EXPRESSION: usize = 1;
const ROW_PERSONALITY: usize = 2;
const ROW_SAVE: usize = 3;

/// Editor screen state
pub struct AvatarPage {
    editor: AvatarEditor,
    row: usize,
    col: usize,
}

impl AvatarPage {
    /// Editor seeded from the current companion, if any
    pub fn new(existing: Option<&AvatarConfig>) -> Self {
        Self {
            editor: AvatarEditor::new(existing),
            row: ROW_STYLE,
            col: 0,
        }
    }

    /// The underlying editor
    pub fn editor(&self) -> &AvatarEditor {
        &self.editor
    }

    fn row_len(row: usize) -> usize {
        match row {
            ROW_STYLE => AvatarStyle::ALL.len(),
            ROW_EXPRESSION => Expression::ALL.len(),
            ROW_PERSONALITY => Personality::ALL.len(),
            _ => 1,
        }
    }

    /// Keyboard: arrows move the cursor, Enter/Space picks
    pub fn key(&mut self, key: KeyEvent) -> Option<Target> {
        match key.code {
            KeyCode::Up => {
                self.row = self.row.saturating_sub(1);
                self.col = self.col.min(Self::row_len(self.row) - 1);
                None
            }
            KeyCode::Down => {
                self.row = (self.row + 1).min(ROW_SAVE);
                self.col = self.col.min(Self::row_len(self.row) - 1);
                None
            }
            KeyCode::Left => {
                self.col = self.col.saturating_sub(1);
                None
            }
            KeyCode::Right => {
                self.col = (self.col + 1).min(Self::row_len(self.row) - 1);
                None
            }
            KeyCode::Enter | KeyCode::Char(' ') => Some(match self.row {
                ROW_STYLE => Target::Style(AvatarStyle::ALL[self.col]),
                ROW_EXPRESSION => Target::Expression(Expression::ALL[self.col]),
                ROW_PERSONALITY => Target::Personality(Personality::ALL[self.col]),
                _ => Target::SaveAvatar,
            }),
            _ => None,
        }
    }

    /// Apply a choice; returns the config when the save button succeeds
    pub fn activate(&mut self, target: Target) -> Option<AvatarConfig> {
        match target {
            Target::Style(style) => self.editor.select_style(style),
            Target::Expression(expression) => self.editor.select_expression(expression),
            Target::Personality(personality) => {
                self.editor.toggle_personality(personality);
            }
            Target::SaveAvatar => return self.editor.save(),
            _ => {}
        }
        None
    }

    /// Draw the page
    pub fn render(&self, frame: &mut Frame, area: Rect, hits: &mut HitMap) {
        let [header, preview, styles, expressions, traits, save] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(7),
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Length(3),
        ])
        .areas(area);

        frame.render_widget(
            Paragraph::new(vec![
                Line::from(self.editor.title()).style(theme::title()),
                Line::from("Personalize your AI for your wellness journey.").style(theme::dim()),
            ])
            .alignment(Alignment::Center),
            header,
        );

        frame.render_widget(
            AvatarFace::new(self.editor.expression(), self.editor.style()),
            centered(preview, 13, 6),
        );

        self.render_row(
            frame,
            styles,
            "Style",
            ROW_STYLE,
            AvatarStyle::ALL
                .iter()
                .map(|s| (s.label(), *s == self.editor.style(), Target::Style(*s))),
            hits,
        );
        self.render_row(
            frame,
            expressions,
            "Expression",
            ROW_EXPRESSION,
            Expression::ALL.iter().map(|e| {
                (e.label(), *e == self.editor.expression(), Target::Expression(*e))
            }),
            hits,
        );
        self.render_row(
            frame,
            traits,
            "Personality Traits",
            ROW_PERSONALITY,
            Personality::ALL.iter().map(|p| {
                (
                    p.label(),
                    self.editor.personality().contains(*p),
                    Target::Personality(*p),
                )
            }),
            hits,
        );

        let button = centered(save, 28, 3);
        let mut style = if self.editor.can_save() {
            Style::default().fg(theme::AURA_LAVENDER)
        } else {
            theme::dim().add_modifier(Modifier::CROSSED_OUT)
        };
        if self.row == ROW_SAVE {
            style = style.bg(theme::AURA_VIOLET).add_modifier(Modifier::BOLD);
        }
        frame.render_widget(
            Paragraph::new(self.editor.action_label())
                .alignment(Alignment::Center)
                .style(style)
                .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded)),
            button,
        );
        if self.editor.can_save() {
            hits.push(button, Target::SaveAvatar);
        }
    }

    fn render_row<'a>(
        &self,
        frame: &mut Frame,
        area: Rect,
        heading: &str,
        row: usize,
        chips: impl Iterator<Item = (&'a str, bool, Target)>,
        hits: &mut HitMap,
    ) {
        let heading_style = if self.row == row {
            theme::title().fg(theme::AURA_LAVENDER)
        } else {
            theme::dim()
        };
        frame.render_widget(
            Paragraph::new(heading).style(heading_style),
            Rect { height: 1, ..area },
        );

        let mut x = area.x;
        let y = area.y + 1;
        for (col, (label, chosen, target)) in chips.enumerate() {
            let width = u16::try_from(label.width()).unwrap_or(u16::MAX).saturating_add(4);
            if x + width > area.x + area.width {
                break;
            }
            let chip = Rect::new(x, y, width, 3.min(area.height.saturating_sub(1)));

            let mut style = if chosen {
                Style::default().fg(theme::AURA_LAVENDER).add_modifier(Modifier::BOLD)
            } else {
                theme::dim()
            };
            if self.row == row && self.col == col {
                style = style.bg(theme::AURA_VIOLET);
            }
            frame.render_widget(
                Paragraph::new(label).alignment(Alignment::Center).style(style).block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_type(if chosen {
                            BorderType::Thick
                        } else {
                            BorderType::Rounded
                        }),
                ),
                chip,
            );
            hits.push(chip, target);
            x += width + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(page: &mut AvatarPage, code: KeyCode) -> Option<Target> {
        page.key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_cursor_picks_choices() {
        let mut page = AvatarPage::new(None);
        press(&mut page, KeyCode::Right);
        assert_eq!(press(&mut page, KeyCode::Enter), Some(Target::Style(AvatarStyle::Square)));

        press(&mut page, KeyCode::Down);
        press(&mut page, KeyCode::Right);
        assert_eq!(
            press(&mut page, KeyCode::Char(' ')),
            Some(Target::Expression(Expression::Thoughtful))
        );

        press(&mut page, KeyCode::Down);
        press(&mut page, KeyCode::Down);
        assert_eq!(press(&mut page, KeyCode::Enter), Some(Target::SaveAvatar));
    }

    #[test]
    fn test_save_requires_personality() {
        let mut page = AvatarPage::new(None);
        assert!(page.activate(Target::Personality(Personality::Gentle)).is_none());
        assert!(page.activate(Target::SaveAvatar).is_none());

        page.activate(Target::Personality(Personality::Witty));
        let saved = page.activate(Target::SaveAvatar).unwrap();
        assert!(saved.personality().contains(Personality::Witty));
    }
}
