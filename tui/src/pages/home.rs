//! Home Page
//!
//! The emotional summary: today's emotion wave, basic vitals, sleep
//! breakdown and a short analysis, ending in a suggestion that opens the
//! games.

use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Sparkline, Wrap};
use ratatui::Frame;
use rand::Rng;

use companion_core::config::Timings;
use companion_core::wellness::{Dashboard, ANALYSIS, SLEEP_BREAKDOWN, SLEEP_LABEL, SUGGESTION};

use crate::hits::{HitMap, Target};
use crate::theme;

/// Dashboard screen state
pub struct HomePage {
    dashboard: Dashboard,
}

impl HomePage {
    /// Fresh mock data for this visit
    pub fn new<R: Rng + ?Sized>(rng: &mut R, timings: &Timings) -> Self {
        Self {
            dashboard: Dashboard::new(rng, timings.heart_rate),
        }
    }

    /// The data behind the page
    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    /// Enter follows the suggestion
    pub fn key(&mut self, key: KeyEvent) -> Option<Target> {
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => Some(Target::Suggestion),
            _ => None,
        }
    }

    /// Advance the heart-rate walk
    pub fn tick<R: Rng + ?Sized>(&mut self, delta: Duration, rng: &mut R) {
        self.dashboard.tick(delta, rng);
    }

    /// Draw the page
    pub fn render(&self, frame: &mut Frame, area: Rect, hits: &mut HitMap) {
        let [header, wave, basic, analysis, suggestion] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(7),
            Constraint::Length(6),
            Constraint::Min(4),
            Constraint::Length(3),
        ])
        .areas(area);

        frame.render_widget(
            Paragraph::new(vec![
                Line::from("Hello, there").style(theme::title()),
                Line::from("Here's your emotional summary today.").style(theme::dim()),
            ]),
            header,
        );

        self.render_wave(frame, wave);
        self.render_basic(frame, basic);

        frame.render_widget(
            Paragraph::new(ANALYSIS).wrap(Wrap { trim: true }).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(theme::dim())
                    .title(" Deep Analysis "),
            ),
            analysis,
        );

        frame.render_widget(
            Paragraph::new(SUGGESTION)
                .alignment(Alignment::Center)
                .style(theme::selected())
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_type(BorderType::Rounded)
                        .border_style(Style::default().fg(theme::AURA_VIOLET)),
                ),
            suggestion,
        );
        hits.push(suggestion, Target::Suggestion);
    }

    fn render_wave(&self, frame: &mut Frame, area: Rect) {
        let wave = self.dashboard.wave();
        let color = if wave.volatile {
            theme::WAVE_VOLATILE
        } else {
            theme::WAVE_CALM
        };
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let data: Vec<u64> = wave.points.iter().map(|p| p.clamp(0.0, 100.0) as u64).collect();

        frame.render_widget(
            Sparkline::default()
                .data(&data)
                .max(100)
                .style(Style::default().fg(color))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_type(BorderType::Rounded)
                        .border_style(theme::dim())
                        .title(format!(" Emotion Wave: {} ", wave.label())),
                ),
            area,
        );
    }

    fn render_basic(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::dim())
            .title(" Basic Data ");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [vitals, sleep] =
            Layout::vertical([Constraint::Length(2), Constraint::Length(2)]).areas(inner);

        let bold = Modifier::BOLD;
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("♥ ", Style::default().fg(theme::HEART_RED)),
                Span::styled(
                    format!("{} BPM", self.dashboard.heart_rate()),
                    Style::default().add_modifier(bold),
                ),
                Span::raw("    "),
                Span::styled("🌡 ", Style::default().fg(theme::TEMP_ORANGE)),
                Span::styled(
                    format!("{:.1}°C", self.dashboard.temperature()),
                    Style::default().add_modifier(bold),
                ),
                Span::raw("    "),
                Span::styled("☾ ", Style::default().fg(theme::SLEEP_INDIGO)),
                Span::styled(SLEEP_LABEL, Style::default().add_modifier(bold)),
            ])),
            vitals,
        );

        frame.render_widget(Paragraph::new(sleep_bar(sleep.width)), sleep);
    }
}

/// Sleep stages as one proportional bar plus a legend
fn sleep_bar(width: u16) -> Vec<Line<'static>> {
    let total: u32 = SLEEP_BREAKDOWN.iter().map(|(_, w)| u32::from(*w)).sum();
    let width = u32::from(width);

    let mut bar = Vec::with_capacity(SLEEP_BREAKDOWN.len());
    let mut legend = Vec::with_capacity(SLEEP_BREAKDOWN.len() * 2);
    let mut used = 0;
    for (i, ((stage, weight), color)) in SLEEP_BREAKDOWN.iter().zip(theme::SLEEP_STAGES).enumerate()
    {
        let cells = if i + 1 == SLEEP_BREAKDOWN.len() {
            width.saturating_sub(used)
        } else {
            width * u32::from(*weight) / total.max(1)
        };
        used += cells;
        bar.push(Span::styled(
            "█".repeat(cells as usize),
            Style::default().fg(color),
        ));
        legend.push(Span::styled("■ ", Style::default().fg(color)));
        legend.push(Span::styled(format!("{stage}  "), theme::dim()));
    }
    vec![Line::from(bar), Line::from(legend)]
}
