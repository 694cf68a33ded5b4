//! Games Page
//!
//! A list of game cards with the play clock, or the running game full
//! screen. Finished games leave a result banner for a moment.
//!
//! Keys while a game runs:
//! - Lemon Squeeze: `1`-`7` squeeze the numbered lemon
//! - Breathing Dough: Space taps along
//! - Emotion Match: arrows move, Space clears the cell
//! - Esc goes back to the list

use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;
use rand::rngs::StdRng;

use companion_core::config::Timings;
use companion_core::games::{
    ActiveGame, BreathingGame, GameInput, GameKind, GameOutcome, GamesHost, MatchGame, SmashGame,
    GRID_COLUMNS, GRID_SIZE, TOTAL_TARGETS,
};

use super::centered;
use crate::hits::{HitMap, Target};
use crate::theme;

/// Games screen state
pub struct GamesPage {
    host: GamesHost,
    card: usize,
    cell: usize,
}

impl GamesPage {
    /// Game list with a fresh play clock
    pub fn new(timings: Timings, rng: StdRng) -> Self {
        Self {
            host: GamesHost::new(timings, rng),
            card: 0,
            cell: 0,
        }
    }

    /// The games host
    pub fn host(&self) -> &GamesHost {
        &self.host
    }

    /// Whether a game occupies the screen
    pub fn in_game(&self) -> bool {
        self.host.active().is_some()
    }

    /// Apply a card, back arrow or in-game target
    pub fn activate(&mut self, target: Target) -> bool {
        match target {
            Target::GameCard(kind) => {
                self.cell = 0;
                self.host.start_game(kind)
            }
            Target::ExitGame => self.host.exit_game(),
            Target::Lemon(id) => self.host.handle(GameInput::Smash(id)),
            Target::Dough => self.host.handle(GameInput::Breathe),
            Target::MatchCell(index) => {
                self.cell = index;
                self.host.handle(GameInput::Select(index))
            }
            _ => false,
        }
    }

    /// Advance the play clock and the running game
    pub fn tick(&mut self, delta: Duration) -> Option<GameOutcome> {
        self.host.tick(delta)
    }

    /// Keyboard input for the list or the running game
    pub fn key(&mut self, key: KeyEvent) -> Option<Target> {
        if !self.in_game() {
            return self.list_key(key);
        }
        let game = self.host.active()?;
        if key.code == KeyCode::Esc || key.code == KeyCode::Backspace {
            return Some(Target::ExitGame);
        }
        match game {
            ActiveGame::Smash(smash) => match key.code {
                KeyCode::Char(c @ '1'..='9') => {
                    let index = c as usize - '1' as usize;
                    smash.targets().get(index).map(|t| Target::Lemon(t.id))
                }
                _ => None,
            },
            ActiveGame::Breathing(_) => match key.code {
                KeyCode::Char(' ') | KeyCode::Enter => Some(Target::Dough),
                _ => None,
            },
            ActiveGame::Match(_) => {
                match key.code {
                    KeyCode::Left if self.cell % GRID_COLUMNS > 0 => self.cell -= 1,
                    KeyCode::Right if self.cell % GRID_COLUMNS < GRID_COLUMNS - 1 => {
                        self.cell += 1;
                    }
                    KeyCode::Up if self.cell >= GRID_COLUMNS => self.cell -= GRID_COLUMNS,
                    KeyCode::Down if self.cell + GRID_COLUMNS < GRID_SIZE => {
                        self.cell += GRID_COLUMNS;
                    }
                    KeyCode::Char(' ') | KeyCode::Enter => {
                        return Some(Target::MatchCell(self.cell));
                    }
                    _ => {}
                }
                None
            }
        }
    }

    fn list_key(&mut self, key: KeyEvent) -> Option<Target> {
        let count = GameKind::ALL.len();
        match key.code {
            KeyCode::Up => {
                self.card = (self.card + count - 1) % count;
                None
            }
            KeyCode::Down => {
                self.card = (self.card + 1) % count;
                None
            }
            KeyCode::Enter | KeyCode::Char(' ') => Some(Target::GameCard(GameKind::ALL[self.card])),
            _ => None,
        }
    }

    /// Draw the page
    pub fn render(&self, frame: &mut Frame, area: Rect, hits: &mut HitMap) {
        match self.host.active() {
            None => self.render_list(frame, area, hits),
            Some(game) => {
                let [bar, body] =
                    Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area);
                let back = Rect { width: 8.min(bar.width), ..bar };
                frame.render_widget(Paragraph::new("← Back").style(theme::dim()), back);
                hits.push(back, Target::ExitGame);
                frame.render_widget(
                    Paragraph::new(game.kind().title())
                        .alignment(Alignment::Center)
                        .style(theme::title()),
                    bar,
                );

                match game {
                    ActiveGame::Smash(smash) => render_smash(smash, frame, body, hits),
                    ActiveGame::Breathing(breathing) => {
                        render_breathing(breathing, frame, body, hits);
                    }
                    ActiveGame::Match(matching) => {
                        render_match(matching, self.cell, frame, body, hits);
                    }
                }
            }
        }

        if let Some(message) = self.host.banner() {
            let card = centered(area, 34, 3);
            frame.render_widget(Clear, card);
            frame.render_widget(
                Paragraph::new(message)
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(theme::SUCCESS_GREEN).add_modifier(Modifier::BOLD))
                    .block(
                        Block::default()
                            .borders(Borders::ALL)
                            .border_type(BorderType::Rounded)
                            .border_style(Style::default().fg(theme::SUCCESS_GREEN)),
                    ),
                card,
            );
            hits.push(card, Target::Banner);
        }
    }

    fn render_list(&self, frame: &mut Frame, area: Rect, hits: &mut HitMap) {
        let [header, cards, footer] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(area);

        frame.render_widget(
            Paragraph::new("Decompression Games").style(theme::title()),
            header,
        );

        let rows = Layout::vertical([Constraint::Length(4); 3]).split(cards);
        for (i, (row, kind)) in rows.iter().zip(GameKind::ALL).enumerate() {
            let border = if i == self.card {
                Style::default().fg(theme::AURA_VIOLET)
            } else {
                theme::dim()
            };
            frame.render_widget(
                Paragraph::new(vec![
                    Line::from(kind.title()).style(theme::title()),
                    Line::from(kind.description()).style(theme::dim()),
                ])
                .wrap(Wrap { trim: true })
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_type(BorderType::Rounded)
                        .border_style(border),
                ),
                *row,
            );
            hits.push(*row, Target::GameCard(kind));
        }

        frame.render_widget(
            Paragraph::new(format!("Total time played: {}", self.host.elapsed_label()))
                .alignment(Alignment::Center)
                .style(theme::dim()),
            footer,
        );
    }
}

fn render_smash(game: &SmashGame, frame: &mut Frame, area: Rect, hits: &mut HitMap) {
    let [caption, board] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area);
    frame.render_widget(
        Paragraph::new(format!(
            "Smash the lemons!  {}/{TOTAL_TARGETS}",
            game.cleared()
        ))
        .alignment(Alignment::Center)
        .style(Style::default().fg(theme::LEMON_YELLOW)),
        caption,
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::dim());
    let inner = block.inner(board);
    frame.render_widget(block, board);

    for (i, lemon) in game.targets().iter().enumerate() {
        let x = inner.x + percent_of(inner.width, lemon.left);
        let y = inner.y + percent_of(inner.height, lemon.top);
        let spot = Rect::new(x, y, 4, 1).intersection(inner);
        frame.render_widget(
            Paragraph::new(format!("{}🍋", i + 1))
                .style(Style::default().fg(theme::LEMON_YELLOW).add_modifier(Modifier::BOLD)),
            spot,
        );
        hits.push(spot, Target::Lemon(lemon.id));
    }
}

fn render_breathing(game: &BreathingGame, frame: &mut Frame, area: Rect, hits: &mut HitMap) {
    let [caption, stage, score] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    frame.render_widget(
        Paragraph::new(game.phase().label())
            .alignment(Alignment::Center)
            .style(Style::default().fg(theme::DOUGH_CREAM)),
        caption,
    );

    let scale = game.scale();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let (width, height) = ((12.0 * scale) as u16, (5.0 * scale) as u16);
    let dough = centered(stage, width, height);
    frame.render_widget(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme::DOUGH_CREAM))
            .style(Style::default().bg(Color::Rgb(120, 100, 70))),
        dough,
    );
    hits.push(dough, Target::Dough);

    frame.render_widget(
        Paragraph::new(format!("Tap in rhythm. Perfect: {}", game.synced()))
            .alignment(Alignment::Center)
            .style(theme::dim()),
        score,
    );
}

fn render_match(game: &MatchGame, cursor: usize, frame: &mut Frame, area: Rect, hits: &mut HitMap) {
    let [caption, board] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area);
    frame.render_widget(
        Paragraph::new(format!("Score: {}", game.score()))
            .alignment(Alignment::Center)
            .style(theme::title()),
        caption,
    );

    let columns = u16::try_from(GRID_COLUMNS).unwrap_or(4);
    let grid = centered(board, columns * 6, columns * 3);
    let rows = Layout::vertical(vec![Constraint::Ratio(1, u32::from(columns)); GRID_COLUMNS])
        .split(grid);
    for (r, row) in rows.iter().enumerate() {
        let cells = Layout::horizontal(vec![Constraint::Ratio(1, u32::from(columns)); GRID_COLUMNS])
            .split(*row);
        for (c, cell_area) in cells.iter().enumerate() {
            let index = r * GRID_COLUMNS + c;
            let cell = game.grid()[index];
            let border = if index == cursor {
                Style::default().fg(theme::AURA_VIOLET).add_modifier(Modifier::BOLD)
            } else {
                theme::dim()
            };
            frame.render_widget(
                Paragraph::new(cell.glyph()).alignment(Alignment::Center).block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_type(BorderType::Rounded)
                        .border_style(border),
                ),
                *cell_area,
            );
            hits.push(*cell_area, Target::MatchCell(index));
        }
    }
}

/// Offset of `pct` percent along `span` cells
fn percent_of(span: u16, pct: f32) -> u16 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let offset = (f32::from(span) * pct / 100.0) as u16;
    offset.min(span.saturating_sub(1))
}
