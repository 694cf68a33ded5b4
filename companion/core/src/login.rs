//! Sign-in Flow
//!
//! All three sign-in buttons behave the same: a short "connecting" spinner,
//! then a welcome overlay with a random affirmation, then the flow reports
//! completion exactly once. This is the only timer-driven page change in
//! the app.

use std::time::Duration;

use rand::seq::SliceRandom;
use rand::Rng;

/// Affirmations shown on the welcome overlay
pub const AFFIRMATIONS: [&str; 4] = [
    "A small step today is a giant leap for your well-being.",
    "Remember to be kind to yourself. You're doing great.",
    "Your feelings are valid. Take a deep breath.",
    "Even on cloudy days, the sun is still shining.",
];

/// Sign-in method offered on the login page
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoginMethod {
    /// Pair with the wellness band
    Band,
    /// WeChat account
    WeChat,
    /// SMS verification
    Phone,
}

impl LoginMethod {
    /// Buttons in display order
    pub const ALL: [LoginMethod; 3] = [LoginMethod::Band, LoginMethod::WeChat, LoginMethod::Phone];

    /// Button label
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            LoginMethod::Band => "Connect with Band",
            LoginMethod::WeChat => "Sign in with WeChat",
            LoginMethod::Phone => "Use Phone Number",
        }
    }
}

/// Where the flow currently is
#[derive(Clone, Debug, PartialEq)]
pub enum LoginPhase {
    /// Waiting for a button press
    Idle,
    /// Spinner showing
    Connecting {
        /// Time left before the welcome overlay
        remaining: Duration,
    },
    /// Welcome overlay showing
    Welcome {
        /// The affirmation picked for this session
        affirmation: &'static str,
        /// Time left before completion fires
        remaining: Duration,
    },
    /// Completion has been reported
    Done,
}

/// Emitted by [`LoginFlow::tick`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoginEvent {
    /// The welcome overlay finished; the shell should continue
    Completed,
}

/// Sign-in state machine
#[derive(Clone, Debug)]
pub struct LoginFlow {
    phase: LoginPhase,
    connect_delay: Duration,
    welcome_delay: Duration,
}

impl LoginFlow {
    /// New idle flow with the given phase lengths
    #[must_use]
    pub fn new(connect_delay: Duration, welcome_delay: Duration) -> Self {
        Self {
            phase: LoginPhase::Idle,
            connect_delay,
            welcome_delay,
        }
    }

    /// Current phase
    #[must_use]
    pub fn phase(&self) -> &LoginPhase {
        &self.phase
    }

    /// Spinner visible
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self.phase, LoginPhase::Connecting { .. })
    }

    /// Affirmation being shown, if the overlay is up
    #[must_use]
    pub fn affirmation(&self) -> Option<&'static str> {
        match self.phase {
            LoginPhase::Welcome { affirmation, .. } => Some(affirmation),
            _ => None,
        }
    }

    /// A sign-in button was pressed. Ignored unless idle.
    pub fn begin(&mut self, method: LoginMethod) -> bool {
        if self.phase != LoginPhase::Idle {
            return false;
        }
        tracing::debug!(method = method.label(), "Sign-in started");
        self.phase = LoginPhase::Connecting {
            remaining: self.connect_delay,
        };
        true
    }

    /// Advance the flow; returns [`LoginEvent::Completed`] exactly once
    pub fn tick<R: Rng + ?Sized>(&mut self, delta: Duration, rng: &mut R) -> Option<LoginEvent> {
        match &mut self.phase {
            LoginPhase::Connecting { remaining } => {
                *remaining = remaining.saturating_sub(delta);
                if remaining.is_zero() {
                    let affirmation = AFFIRMATIONS.choose(rng).copied().unwrap_or(AFFIRMATIONS[0]);
                    self.phase = LoginPhase::Welcome {
                        affirmation,
                        remaining: self.welcome_delay,
                    };
                }
                None
            }
            LoginPhase::Welcome { remaining, .. } => {
                *remaining = remaining.saturating_sub(delta);
                if remaining.is_zero() {
                    self.phase = LoginPhase::Done;
                    Some(LoginEvent::Completed)
                } else {
                    None
                }
            }
            LoginPhase::Idle | LoginPhase::Done => None,
        }
    }
}

impl Default for LoginFlow {
    fn default() -> Self {
        Self::new(Duration::from_millis(1200), Duration::from_millis(2000))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_full_flow_completes_once() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut flow = LoginFlow::default();

        assert!(flow.begin(LoginMethod::Band));
        assert!(flow.is_loading());

        assert_eq!(flow.tick(ms(1000), &mut rng), None);
        assert_eq!(flow.tick(ms(200), &mut rng), None);
        let affirmation = flow.affirmation().unwrap();
        assert!(AFFIRMATIONS.contains(&affirmation));

        assert_eq!(flow.tick(ms(1999), &mut rng), None);
        assert_eq!(flow.tick(ms(1), &mut rng), Some(LoginEvent::Completed));
        assert_eq!(flow.tick(ms(5000), &mut rng), None);
        assert_eq!(flow.phase(), &LoginPhase::Done);
    }

    #[test]
    fn test_presses_ignored_while_busy() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut flow = LoginFlow::default();

        assert!(flow.begin(LoginMethod::Phone));
        assert!(!flow.begin(LoginMethod::WeChat));

        flow.tick(ms(1200), &mut rng);
        assert!(flow.affirmation().is_some());
        assert!(!flow.begin(LoginMethod::Band));
    }

    #[test]
    fn test_idle_never_completes() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut flow = LoginFlow::default();
        assert_eq!(flow.tick(ms(60_000), &mut rng), None);
        assert_eq!(flow.phase(), &LoginPhase::Idle);
    }
}
