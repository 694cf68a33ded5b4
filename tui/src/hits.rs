//! Click Targets
//!
//! Every interactive element registers its screen area while it is drawn.
//! Mouse clicks are resolved against the areas from the last frame, and
//! keyboard shortcuts produce the same [`Target`] values, so both input
//! paths share one dispatcher.

use ratatui::layout::{Position, Rect};

use companion_core::avatar::{AvatarStyle, Expression, Personality};
use companion_core::games::{GameKind, TargetId};
use companion_core::login::LoginMethod;
use companion_core::navigation::Page;

/// Something the user can activate
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    /// Bottom navigation tab
    Nav(Page),
    /// Sign-in button
    Login(LoginMethod),
    /// Avatar style choice
    Style(AvatarStyle),
    /// Avatar expression choice
    Expression(Expression),
    /// Personality chip
    Personality(Personality),
    /// Create / save button in the editor
    SaveAvatar,
    /// "Try a Game" on the dashboard
    Suggestion,
    /// Game card
    GameCard(GameKind),
    /// Back arrow inside a game
    ExitGame,
    /// Result banner over the games page; swallows clicks
    Banner,
    /// A lemon
    Lemon(TargetId),
    /// The breathing dough
    Dough,
    /// An emotion cell
    MatchCell(usize),
    /// Chat send button
    SendChat,
    /// Profile menu row
    ProfileItem(usize),
}

/// Click areas recorded during one frame
#[derive(Debug, Default)]
pub struct HitMap {
    entries: Vec<(Rect, Target)>,
}

impl HitMap {
    /// Forget the previous frame
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Register `target` at `area`
    pub fn push(&mut self, area: Rect, target: Target) {
        if area.width > 0 && area.height > 0 {
            self.entries.push((area, target));
        }
    }

    /// Topmost target under the cursor
    pub fn at(&self, column: u16, row: u16) -> Option<Target> {
        let pos = Position::new(column, row);
        self.entries
            .iter()
            .rev()
            .find(|(area, _)| area.contains(pos))
            .map(|(_, target)| *target)
    }

    /// Area registered for `target`, if drawn
    pub fn area_of(&self, target: Target) -> Option<Rect> {
        self.entries
            .iter()
            .find(|(_, t)| *t == target)
            .map(|(area, _)| *area)
    }
}
