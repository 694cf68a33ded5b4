//! Emotion Match
//!
//! A 4x4 board of emotions. Picking any cell clears it for ten points; a
//! cleared cell is refilled with a random emotion shortly after.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use super::{Completion, GameKind, GameOutcome};

/// Cells on the board
pub const GRID_SIZE: usize = 16;

/// Cells per row
pub const GRID_COLUMNS: usize = 4;

/// Points for one cleared cell
pub const POINTS_PER_CLEAR: u32 = 10;

/// Score that finishes the game
pub const TARGET_SCORE: u32 = 100;

/// Banner text when done
pub const MATCH_RESULT: &str = "You've cleared the board!";

/// An emotion tile
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Emotion {
    /// 😊
    Joy,
    /// 😢
    Sorrow,
    /// 😠
    Anger,
    /// 😮
    Surprise,
}

impl Emotion {
    /// Every tile kind
    pub const ALL: [Emotion; 4] = [Emotion::Joy, Emotion::Sorrow, Emotion::Anger, Emotion::Surprise];

    /// Glyph drawn in the cell
    #[must_use]
    pub fn glyph(self) -> &'static str {
        match self {
            Emotion::Joy => "😊",
            Emotion::Sorrow => "😢",
            Emotion::Anger => "😠",
            Emotion::Surprise => "😮",
        }
    }

    fn random(rng: &mut StdRng) -> Self {
        *Self::ALL.choose(rng).unwrap_or(&Emotion::Joy)
    }
}

/// One board cell
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cell {
    /// Showing an emotion
    Emotion(Emotion),
    /// Just picked; refills when the countdown runs out
    Cleared {
        /// Time until refill
        remaining: Duration,
    },
}

impl Cell {
    /// Glyph drawn in the cell
    #[must_use]
    pub fn glyph(self) -> &'static str {
        match self {
            Cell::Emotion(emotion) => emotion.glyph(),
            Cell::Cleared { .. } => "💥",
        }
    }

    /// Whether the cell is waiting to refill
    #[must_use]
    pub fn is_cleared(self) -> bool {
        matches!(self, Cell::Cleared { .. })
    }
}

/// Emotion Match state
#[derive(Clone, Debug)]
pub struct MatchGame {
    grid: [Cell; GRID_SIZE],
    score: u32,
    refill_delay: Duration,
    complete_delay: Duration,
    completion: Completion,
    rng: StdRng,
}

impl MatchGame {
    /// A new random board
    #[must_use]
    pub fn new(mut rng: StdRng, refill_delay: Duration, complete_delay: Duration) -> Self {
        let grid = std::array::from_fn(|_| Cell::Emotion(Emotion::random(&mut rng)));
        Self {
            grid,
            score: 0,
            refill_delay,
            complete_delay,
            completion: Completion::default(),
            rng,
        }
    }

    /// Board cells, row-major
    #[must_use]
    pub fn grid(&self) -> &[Cell; GRID_SIZE] {
        &self.grid
    }

    /// Points so far
    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Pick a cell. Out-of-range indices are ignored.
    pub fn select(&mut self, index: usize) -> bool {
        let Some(cell) = self.grid.get_mut(index) else {
            return false;
        };
        *cell = Cell::Cleared {
            remaining: self.refill_delay,
        };
        self.score += POINTS_PER_CLEAR;
        if self.score >= TARGET_SCORE {
            self.completion.arm(self.complete_delay);
        }
        true
    }

    /// Refill cleared cells and advance the completion countdown
    pub fn tick(&mut self, delta: Duration) -> Option<GameOutcome> {
        for cell in &mut self.grid {
            if let Cell::Cleared { remaining } = cell {
                *remaining = remaining.saturating_sub(delta);
                if remaining.is_zero() {
                    *cell = Cell::Emotion(Emotion::random(&mut self.rng));
                }
            }
        }

        self.completion.tick(delta).then_some(GameOutcome {
            kind: GameKind::Match,
            message: MATCH_RESULT,
        })
    }
}
