//! Page Shell
//!
//! The top-level controller of a session: which page is showing, whether
//! sign-in has completed, and the companion the user created. Every other
//! screen receives what it needs from here by reference.
//!
//! # State Machine
//!
//! ```text
//!   Login ──complete_login──► AvatarCustomization ──complete_avatar_creation──► Home
//!                                      ▲                                          │
//!                                      └──────────── Profile ◄── Home/Games/Chat ◄┘
//! ```
//!
//! `navigate_to` itself is unguarded: it always switches to the requested
//! page. Screens with prerequisites (Chat needs an avatar) check them when
//! they render.

use std::time::Duration;

use crate::avatar::AvatarConfig;

/// Default page transition length
pub const DEFAULT_TRANSITION: Duration = Duration::from_millis(500);

/// Shown in place of the chat screen when no avatar exists yet
pub const MISSING_AVATAR_NOTICE: &str = "Please create an avatar first.";

/// A screen of the application
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Page {
    /// Sign-in screen (initial)
    Login,
    /// Create or modify the companion
    AvatarCustomization,
    /// Dashboard with mock biometrics
    Home,
    /// Decompression mini-games
    Games,
    /// Conversation with the companion
    Chat,
    /// Account menu
    Profile,
}

impl Page {
    /// Pages reachable from the bottom navigation bar, left to right
    pub const NAV_ITEMS: [Page; 4] = [Page::Home, Page::Games, Page::Chat, Page::Profile];

    /// Label shown in the bottom navigation bar, if the page has a tab
    #[must_use]
    pub fn nav_label(self) -> Option<&'static str> {
        match self {
            Page::Home => Some("Home"),
            Page::Games => Some("Games"),
            Page::Chat => Some("Companion"),
            Page::Profile => Some("Me"),
            Page::Login | Page::AvatarCustomization => None,
        }
    }

    /// Position in the navigation bar
    #[must_use]
    pub fn nav_index(self) -> Option<usize> {
        Self::NAV_ITEMS.iter().position(|p| *p == self)
    }

    /// The tab to the right (wrapping), starting from Home for untabbed pages
    #[must_use]
    pub fn next_tab(self) -> Page {
        match self.nav_index() {
            Some(i) => Self::NAV_ITEMS[(i + 1) % Self::NAV_ITEMS.len()],
            None => Page::Home,
        }
    }

    /// The tab to the left (wrapping), starting from Home for untabbed pages
    #[must_use]
    pub fn prev_tab(self) -> Page {
        match self.nav_index() {
            Some(i) => Self::NAV_ITEMS[(i + Self::NAV_ITEMS.len() - 1) % Self::NAV_ITEMS.len()],
            None => Page::Home,
        }
    }
}

/// Cosmetic slide-in state for the current page
///
/// Never gates logic: a new navigation simply restarts it.
#[derive(Clone, Debug)]
pub struct PageTransition {
    duration: Duration,
    elapsed: Duration,
    from: Option<Page>,
}

impl PageTransition {
    /// A finished transition with the given length for future runs
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            elapsed: duration,
            from: None,
        }
    }

    /// Start over, remembering the page being left
    pub fn restart(&mut self, from: Page) {
        self.elapsed = Duration::ZERO;
        self.from = Some(from);
    }

    /// Advance the animation clock
    pub fn tick(&mut self, delta: Duration) {
        self.elapsed = (self.elapsed + delta).min(self.duration);
    }

    /// Linear progress in `0.0..=1.0`
    #[must_use]
    pub fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }

    /// Eased progress; dips slightly below zero before shooting forward
    #[must_use]
    pub fn eased(&self) -> f32 {
        anticipate(self.progress())
    }

    /// Whether the animation has finished
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Page that was showing before the transition started
    #[must_use]
    pub fn from(&self) -> Option<Page> {
        self.from
    }

    /// Columns the incoming page is still shifted to the right
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn offset(&self, width: u16) -> u16 {
        let remaining = (1.0 - self.eased()).clamp(0.0, 1.0);
        (remaining * f32::from(width)).round() as u16
    }
}

impl Default for PageTransition {
    fn default() -> Self {
        Self::new(DEFAULT_TRANSITION)
    }
}

/// Back-in for the first half, exponential ease-out for the second
fn anticipate(t: f32) -> f32 {
    const OVERSHOOT: f32 = 1.525;
    let t = t * 2.0;
    if t < 1.0 {
        0.5 * t * t * ((OVERSHOOT + 1.0) * t - OVERSHOOT)
    } else {
        0.5 * (2.0 - 2f32.powf(-10.0 * (t - 1.0)))
    }
}

/// Session-level application state
#[derive(Clone, Debug)]
pub struct Shell {
    page: Page,
    logged_in: bool,
    avatar: Option<AvatarConfig>,
    transition: PageTransition,
}

impl Shell {
    /// A fresh session on the login page
    #[must_use]
    pub fn new() -> Self {
        Self::with_transition(DEFAULT_TRANSITION)
    }

    /// A fresh session with a custom page transition length
    #[must_use]
    pub fn with_transition(duration: Duration) -> Self {
        Self {
            page: Page::Login,
            logged_in: false,
            avatar: None,
            transition: PageTransition::new(duration),
        }
    }

    /// Switch to `page`, unconditionally
    pub fn navigate_to(&mut self, page: Page) {
        tracing::debug!(from = ?self.page, to = ?page, "Navigating");
        self.transition.restart(self.page);
        self.page = page;
    }

    /// Sign-in finished; continue to companion creation
    pub fn complete_login(&mut self) {
        tracing::info!("Login complete");
        self.navigate_to(Page::AvatarCustomization);
    }

    /// Store the companion, mark the session signed in and go home
    pub fn complete_avatar_creation(&mut self, config: AvatarConfig) {
        tracing::info!(
            expression = %config.expression(),
            style = %config.style(),
            personality = %config.personality().joined(),
            "Companion saved"
        );
        self.avatar = Some(config);
        self.logged_in = true;
        self.navigate_to(Page::Home);
    }

    /// Current page
    #[must_use]
    pub fn page(&self) -> Page {
        self.page
    }

    /// Whether sign-in has completed at least once
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.logged_in
    }

    /// The bottom navigation bar follows the login flag, not the page
    #[must_use]
    pub fn nav_visible(&self) -> bool {
        self.logged_in
    }

    /// The companion, once created
    #[must_use]
    pub fn avatar(&self) -> Option<&AvatarConfig> {
        self.avatar.as_ref()
    }

    /// Page transition state
    #[must_use]
    pub fn transition(&self) -> &PageTransition {
        &self.transition
    }

    /// Advance cosmetic animation
    pub fn tick(&mut self, delta: Duration) {
        self.transition.tick(delta);
    }
}

impl Default for Shell {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::avatar::{AvatarStyle, Expression, Personality};
    use pretty_assertions::assert_eq;

    fn sample_avatar() -> AvatarConfig {
        AvatarConfig::new(Expression::Happy, [Personality::Gentle], AvatarStyle::Circle).unwrap()
    }

    #[test]
    fn test_starts_on_login() {
        let shell = Shell::new();
        assert_eq!(shell.page(), Page::Login);
        assert!(!shell.nav_visible());
        assert!(shell.avatar().is_none());
    }

    #[test]
    fn test_navigate_is_last_write_wins() {
        let sequences: &[&[Page]] = &[
            &[Page::Games],
            &[Page::Chat, Page::Profile, Page::Home],
            &[Page::Profile, Page::AvatarCustomization, Page::Login, Page::Games],
            &[Page::Chat, Page::Chat],
        ];

        for seq in sequences {
            let mut shell = Shell::new();
            for &p in *seq {
                shell.navigate_to(p);
            }
            assert_eq!(shell.page(), *seq.last().unwrap());
        }
    }

    #[test]
    fn test_login_then_create_scenario() {
        let mut shell = Shell::new();
        shell.complete_login();
        assert_eq!(shell.page(), Page::AvatarCustomization);
        assert!(!shell.nav_visible());

        shell.complete_avatar_creation(sample_avatar());
        assert_eq!(shell.page(), Page::Home);
        assert!(shell.nav_visible());
        assert_eq!(shell.avatar(), Some(&sample_avatar()));
    }

    #[test]
    fn test_nav_stays_visible_on_every_page() {
        let mut shell = Shell::new();
        shell.complete_login();
        shell.complete_avatar_creation(sample_avatar());

        for p in [
            Page::Login,
            Page::AvatarCustomization,
            Page::Home,
            Page::Games,
            Page::Chat,
            Page::Profile,
        ] {
            shell.navigate_to(p);
            assert!(shell.nav_visible(), "nav hidden on {p:?}");
        }
    }

    #[test]
    fn test_unguarded_chat_without_avatar() {
        let mut shell = Shell::new();
        shell.navigate_to(Page::Chat);
        assert_eq!(shell.page(), Page::Chat);
        assert!(shell.avatar().is_none());
    }

    #[test]
    fn test_reedit_replaces_avatar_wholesale() {
        let mut shell = Shell::new();
        shell.complete_login();
        shell.complete_avatar_creation(sample_avatar());

        shell.navigate_to(Page::Profile);
        shell.navigate_to(Page::AvatarCustomization);
        let replacement =
            AvatarConfig::new(Expression::Wise, [Personality::Rational], AvatarStyle::Robot)
                .unwrap();
        shell.complete_avatar_creation(replacement.clone());

        assert_eq!(shell.avatar(), Some(&replacement));
        assert_eq!(shell.page(), Page::Home);
    }

    #[test]
    fn test_transition_restarts_mid_flight() {
        let mut shell = Shell::new();
        shell.navigate_to(Page::Home);
        shell.tick(Duration::from_millis(250));
        assert!(!shell.transition().is_done());

        shell.navigate_to(Page::Games);
        assert_eq!(shell.page(), Page::Games);
        assert_eq!(shell.transition().progress(), 0.0);
        assert_eq!(shell.transition().from(), Some(Page::Home));

        shell.tick(Duration::from_millis(600));
        assert!(shell.transition().is_done());
        assert_eq!(shell.transition().offset(40), 0);
    }

    #[test]
    fn test_transition_offset_starts_at_width() {
        let mut transition = PageTransition::default();
        transition.restart(Page::Login);
        assert_eq!(transition.offset(40), 40);
    }

    #[test]
    fn test_tab_cycling() {
        assert_eq!(Page::Home.next_tab(), Page::Games);
        assert_eq!(Page::Profile.next_tab(), Page::Home);
        assert_eq!(Page::Home.prev_tab(), Page::Profile);
        assert_eq!(Page::AvatarCustomization.next_tab(), Page::Home);
        assert_eq!(Page::Chat.nav_label(), Some("Companion"));
        assert_eq!(Page::Login.nav_label(), None);
    }
}
