//! Breathing Dough
//!
//! The dough swells for one phase and settles for the next, forever. Every
//! tap counts toward the goal, whichever way the dough is moving.

use std::time::Duration;

use super::{Completion, GameKind, GameOutcome};

/// Taps needed to finish
pub const SYNC_TARGET: u32 = 5;

/// Banner text when done
pub const BREATHING_RESULT: &str = "Great job! You're in sync.";

/// Direction of the breathing cycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BreathPhase {
    /// Dough growing
    Inhale,
    /// Dough shrinking
    Exhale,
}

impl BreathPhase {
    /// Prompt shown on the dough
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            BreathPhase::Inhale => "Inhale...",
            BreathPhase::Exhale => "Exhale...",
        }
    }

    fn flipped(self) -> Self {
        match self {
            BreathPhase::Inhale => BreathPhase::Exhale,
            BreathPhase::Exhale => BreathPhase::Inhale,
        }
    }
}

/// Breathing Dough state
#[derive(Clone, Debug)]
pub struct BreathingGame {
    phase: BreathPhase,
    phase_elapsed: Duration,
    phase_length: Duration,
    synced: u32,
    complete_delay: Duration,
    completion: Completion,
}

impl BreathingGame {
    /// Start at the beginning of an inhale
    #[must_use]
    pub fn new(phase_length: Duration, complete_delay: Duration) -> Self {
        Self {
            phase: BreathPhase::Inhale,
            phase_elapsed: Duration::ZERO,
            phase_length,
            synced: 0,
            complete_delay,
            completion: Completion::default(),
        }
    }

    /// Current direction
    #[must_use]
    pub fn phase(&self) -> BreathPhase {
        self.phase
    }

    /// Taps so far
    #[must_use]
    pub fn synced(&self) -> u32 {
        self.synced
    }

    /// Register a tap
    pub fn sync(&mut self) -> u32 {
        self.synced = self.synced.saturating_add(1);
        if self.synced >= SYNC_TARGET {
            self.completion.arm(self.complete_delay);
        }
        self.synced
    }

    /// Dough size relative to rest, `1.0..=1.5`
    #[must_use]
    pub fn scale(&self) -> f32 {
        let t = if self.phase_length.is_zero() {
            1.0
        } else {
            (self.phase_elapsed.as_secs_f32() / self.phase_length.as_secs_f32()).clamp(0.0, 1.0)
        };
        let eased = t * t * (3.0 - 2.0 * t);
        match self.phase {
            BreathPhase::Inhale => 1.0 + 0.5 * eased,
            BreathPhase::Exhale => 1.5 - 0.5 * eased,
        }
    }

    /// Advance the cycle and the completion countdown
    pub fn tick(&mut self, delta: Duration) -> Option<GameOutcome> {
        if !self.phase_length.is_zero() {
            self.phase_elapsed += delta;
            while self.phase_elapsed >= self.phase_length {
                self.phase_elapsed -= self.phase_length;
                self.phase = self.phase.flipped();
            }
        }

        self.completion.tick(delta).then_some(GameOutcome {
            kind: GameKind::Breathing,
            message: BREATHING_RESULT,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn game() -> BreathingGame {
        BreathingGame::new(Duration::from_secs(4), Duration::from_secs(2))
    }

    #[test]
    fn test_phase_flips_every_four_seconds() {
        let mut game = game();
        assert_eq!(game.phase(), BreathPhase::Inhale);

        let mut flips = 0;
        let mut last = game.phase();
        for _ in 0..120 {
            game.tick(Duration::from_millis(100));
            if game.phase() != last {
                flips += 1;
                last = game.phase();
            }
        }
        // 12 seconds
        assert_eq!(flips, 3);
        assert_eq!(game.phase(), BreathPhase::Exhale);
    }

    #[test]
    fn test_scale_tracks_phase() {
        let mut game = game();
        assert!((game.scale() - 1.0).abs() < f32::EPSILON);
        game.tick(Duration::from_secs(2));
        assert!(game.scale() > 1.2 && game.scale() < 1.3);
        game.tick(Duration::from_secs(2));
        assert_eq!(game.phase(), BreathPhase::Exhale);
        assert!((game.scale() - 1.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_five_taps_complete_after_delay() {
        let mut game = game();
        for _ in 0..4 {
            game.sync();
        }
        assert_eq!(game.tick(Duration::from_secs(10)), None);

        assert_eq!(game.sync(), 5);
        assert_eq!(game.tick(Duration::from_millis(1999)), None);
        let outcome = game.tick(Duration::from_millis(1)).unwrap();
        assert_eq!(outcome.message, BREATHING_RESULT);
    }

    #[test]
    fn test_extra_taps_do_not_complete_twice() {
        let mut game = game();
        for _ in 0..5 {
            game.sync();
        }
        assert!(game.tick(Duration::from_secs(2)).is_some());
        game.sync();
        assert_eq!(game.tick(Duration::from_secs(5)), None);
    }

    #[test]
    fn test_taps_count_in_either_phase() {
        let mut game = game();
        game.sync();
        game.tick(Duration::from_secs(4));
        assert_eq!(game.phase(), BreathPhase::Exhale);
        game.sync();
        assert_eq!(game.synced(), 2);
    }
}
