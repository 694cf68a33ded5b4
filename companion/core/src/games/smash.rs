//! Lemon Squeeze
//!
//! Up to seven lemons sit on the board at once. Squeezing one removes it and
//! schedules a replacement, as long as the round's twenty lemons are not all
//! on the board or squeezed already.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::Rng;

use super::{Completion, GameKind, GameOutcome};

/// Lemons in one round
pub const TOTAL_TARGETS: usize = 20;

/// Lemons on the board at once
pub const MAX_VISIBLE: usize = 7;

/// Banner text when the round is done
pub const SMASH_RESULT: &str = "Stress Released: 100%";

/// Identity of a lemon, unique within a round
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(u32);

/// A lemon on the board
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Target {
    /// Identity used when squeezing
    pub id: TargetId,
    /// Distance from the top edge, percent of board height (10..90)
    pub top: f32,
    /// Distance from the left edge, percent of board width (10..90)
    pub left: f32,
}

/// Lemon Squeeze state
#[derive(Clone, Debug)]
pub struct SmashGame {
    targets: Vec<Target>,
    cleared: usize,
    next_id: u32,
    pending_spawns: Vec<Duration>,
    replenish_delay: Duration,
    complete_delay: Duration,
    completion: Completion,
    rng: StdRng,
}

impl SmashGame {
    /// A new round with the initial lemons placed
    #[must_use]
    pub fn new(rng: StdRng, replenish_delay: Duration, complete_delay: Duration) -> Self {
        let mut game = Self {
            targets: Vec::with_capacity(MAX_VISIBLE),
            cleared: 0,
            next_id: 0,
            pending_spawns: Vec::new(),
            replenish_delay,
            complete_delay,
            completion: Completion::default(),
            rng,
        };
        while game.spawn() {}
        game
    }

    /// Lemons currently on the board
    #[must_use]
    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// Lemons squeezed so far
    #[must_use]
    pub fn cleared(&self) -> usize {
        self.cleared
    }

    /// Squeeze the lemon with `id`. Unknown ids are ignored.
    pub fn smash(&mut self, id: TargetId) -> bool {
        let Some(index) = self.targets.iter().position(|t| t.id == id) else {
            return false;
        };
        self.targets.remove(index);
        self.cleared += 1;
        self.pending_spawns.push(self.replenish_delay);
        tracing::trace!(cleared = self.cleared, "Lemon squeezed");

        if self.cleared >= TOTAL_TARGETS {
            self.completion.arm(self.complete_delay);
        }
        true
    }

    /// Advance replacement timers and the completion countdown
    pub fn tick(&mut self, delta: Duration) -> Option<GameOutcome> {
        let mut due = 0;
        self.pending_spawns.retain_mut(|remaining| {
            *remaining = remaining.saturating_sub(delta);
            if remaining.is_zero() {
                due += 1;
                false
            } else {
                true
            }
        });
        for _ in 0..due {
            self.spawn();
        }

        self.completion.tick(delta).then_some(GameOutcome {
            kind: GameKind::Smash,
            message: SMASH_RESULT,
        })
    }

    /// Place one lemon if the round and the board have room
    fn spawn(&mut self) -> bool {
        if self.cleared + self.targets.len() >= TOTAL_TARGETS || self.targets.len() >= MAX_VISIBLE {
            return false;
        }
        let id = TargetId(self.next_id);
        self.next_id += 1;
        self.targets.push(Target {
            id,
            top: self.rng.gen_range(10.0..90.0),
            left: self.rng.gen_range(10.0..90.0),
        });
        true
    }
}
