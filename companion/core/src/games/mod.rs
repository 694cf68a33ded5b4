//! Decompression Games
//!
//! Three self-contained mini-games and the host that runs them:
//!
//! - [`SmashGame`]: tap lemons until twenty are squeezed
//! - [`BreathingGame`]: tap along with an inhale/exhale cycle
//! - [`MatchGame`]: clear emotions off a 4x4 board
//!
//! # Design Philosophy
//!
//! A game never calls back into its host. Each one is advanced with
//! `tick(delta)` and fed [`GameInput`]s; when it reaches its goal, a later
//! `tick` returns a [`GameOutcome`] exactly once. The [`GamesHost`] reacts
//! to that value by dropping the game and showing a result banner.
//!
//! ```text
//!   none ──start_game──► active ──tick → Some(outcome)──► none + banner (2s)
//!                          │
//!                          └──exit_game──► none (no outcome)
//! ```

mod breathing;
mod matching;
mod smash;

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::Timings;

pub use breathing::{BreathPhase, BreathingGame, BREATHING_RESULT, SYNC_TARGET};
pub use matching::{
    Cell, Emotion, MatchGame, GRID_COLUMNS, GRID_SIZE, MATCH_RESULT, POINTS_PER_CLEAR,
    TARGET_SCORE,
};
pub use smash::{SmashGame, Target, TargetId, MAX_VISIBLE, SMASH_RESULT, TOTAL_TARGETS};

/// Which mini-game
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameKind {
    /// Lemon Squeeze
    Smash,
    /// Breathing Dough
    Breathing,
    /// Emotion Match
    Match,
}

impl GameKind {
    /// Cards on the games page, top to bottom
    pub const ALL: [GameKind; 3] = [GameKind::Smash, GameKind::Breathing, GameKind::Match];

    /// Card title
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            GameKind::Smash => "Lemon Squeeze",
            GameKind::Breathing => "Breathing Dough",
            GameKind::Match => "Emotion Match",
        }
    }

    /// Card blurb
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            GameKind::Smash => {
                "Smash lemons to release tension. The more you smash, the better you feel!"
            }
            GameKind::Breathing => {
                "Sync your breath with the expanding dough. Find your calm center."
            }
            GameKind::Match => "Clear away negative emotions and listen to soothing sounds.",
        }
    }
}

/// Terminal event of a game instance
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameOutcome {
    /// Game that finished
    pub kind: GameKind,
    /// Result line for the banner
    pub message: &'static str,
}

/// Player interaction routed to the active game
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameInput {
    /// Squeeze a lemon
    Smash(TargetId),
    /// Tap the dough
    Breathe,
    /// Pick a board cell
    Select(usize),
}

/// One-shot delayed completion shared by all games
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
enum Completion {
    #[default]
    Pending,
    Armed(Duration),
    Fired,
}

impl Completion {
    /// Start the countdown. Later calls are ignored.
    fn arm(&mut self, delay: Duration) {
        if *self == Completion::Pending {
            *self = Completion::Armed(delay);
        }
    }

    /// Returns true on the tick the countdown runs out, and never again
    fn tick(&mut self, delta: Duration) -> bool {
        if let Completion::Armed(remaining) = *self {
            let remaining = remaining.saturating_sub(delta);
            if remaining.is_zero() {
                *self = Completion::Fired;
                return true;
            }
            *self = Completion::Armed(remaining);
        }
        false
    }
}

/// The game currently occupying the screen
#[derive(Clone, Debug)]
pub enum ActiveGame {
    /// Lemon Squeeze
    Smash(SmashGame),
    /// Breathing Dough
    Breathing(BreathingGame),
    /// Emotion Match
    Match(MatchGame),
}

impl ActiveGame {
    fn start(kind: GameKind, timings: &Timings, rng: StdRng) -> Self {
        match kind {
            GameKind::Smash => ActiveGame::Smash(SmashGame::new(
                rng,
                timings.smash_replenish,
                timings.smash_complete,
            )),
            GameKind::Breathing => ActiveGame::Breathing(BreathingGame::new(
                timings.breathing_phase,
                timings.breathing_complete,
            )),
            GameKind::Match => ActiveGame::Match(MatchGame::new(
                rng,
                timings.match_refill,
                timings.match_complete,
            )),
        }
    }

    /// Which game this is
    #[must_use]
    pub fn kind(&self) -> GameKind {
        match self {
            ActiveGame::Smash(_) => GameKind::Smash,
            ActiveGame::Breathing(_) => GameKind::Breathing,
            ActiveGame::Match(_) => GameKind::Match,
        }
    }

    /// Feed an input. Inputs meant for another game are ignored.
    pub fn handle(&mut self, input: GameInput) -> bool {
        match (self, input) {
            (ActiveGame::Smash(game), GameInput::Smash(id)) => game.smash(id),
            (ActiveGame::Breathing(game), GameInput::Breathe) => {
                game.sync();
                true
            }
            (ActiveGame::Match(game), GameInput::Select(index)) => game.select(index),
            _ => false,
        }
    }

    /// Advance the game clock
    pub fn tick(&mut self, delta: Duration) -> Option<GameOutcome> {
        match self {
            ActiveGame::Smash(game) => game.tick(delta),
            ActiveGame::Breathing(game) => game.tick(delta),
            ActiveGame::Match(game) => game.tick(delta),
        }
    }
}

/// Result line shown after a game finishes
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultBanner {
    /// Text to show
    pub message: &'static str,
    remaining: Duration,
}

/// Owns the games page: the active game, the banner and the play clock
#[derive(Clone, Debug)]
pub struct GamesHost {
    active: Option<ActiveGame>,
    banner: Option<ResultBanner>,
    elapsed_secs: u64,
    second_acc: Duration,
    timings: Timings,
    rng: StdRng,
}

impl GamesHost {
    /// A fresh games page. `rng` seeds every game started from it.
    #[must_use]
    pub fn new(timings: Timings, rng: StdRng) -> Self {
        Self {
            active: None,
            banner: None,
            elapsed_secs: 0,
            second_acc: Duration::ZERO,
            timings,
            rng,
        }
    }

    /// Start a game. Only possible while none is running.
    pub fn start_game(&mut self, kind: GameKind) -> bool {
        if self.active.is_some() {
            return false;
        }
        tracing::info!(game = kind.title(), "Game started");
        let rng = StdRng::seed_from_u64(self.rng.gen());
        self.active = Some(ActiveGame::start(kind, &self.timings, rng));
        true
    }

    /// Drop the active game without a result
    pub fn exit_game(&mut self) -> bool {
        match self.active.take() {
            Some(game) => {
                tracing::info!(game = game.kind().title(), "Game exited");
                true
            }
            None => false,
        }
    }

    /// Route player input to the active game
    pub fn handle(&mut self, input: GameInput) -> bool {
        self.active.as_mut().is_some_and(|game| game.handle(input))
    }

    /// Advance everything on the page by `delta`
    ///
    /// Returns the outcome of a game that finished during this tick.
    pub fn tick(&mut self, delta: Duration) -> Option<GameOutcome> {
        self.second_acc += delta;
        while self.second_acc >= Duration::from_secs(1) {
            self.second_acc -= Duration::from_secs(1);
            self.elapsed_secs += 1;
        }

        if let Some(banner) = &mut self.banner {
            banner.remaining = banner.remaining.saturating_sub(delta);
            if banner.remaining.is_zero() {
                self.banner = None;
            }
        }

        let outcome = self.active.as_mut()?.tick(delta)?;
        tracing::info!(game = outcome.kind.title(), result = outcome.message, "Game finished");
        self.active = None;
        self.banner = Some(ResultBanner {
            message: outcome.message,
            remaining: self.timings.result_banner,
        });
        Some(outcome)
    }

    /// The running game, if any
    #[must_use]
    pub fn active(&self) -> Option<&ActiveGame> {
        self.active.as_ref()
    }

    /// Result banner text while it is showing
    #[must_use]
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_ref().map(|b| b.message)
    }

    /// Whole seconds spent on the games page
    #[must_use]
    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    /// Play clock as `"{m}m {s}s"`
    #[must_use]
    pub fn elapsed_label(&self) -> String {
        format!("{}m {}s", self.elapsed_secs / 60, self.elapsed_secs % 60)
    }
}
