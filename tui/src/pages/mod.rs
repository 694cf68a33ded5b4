//! Pages
//!
//! One module per screen. Each page owns the state that lives exactly as
//! long as the user stays on it; the app rebuilds it on every visit, so
//! leaving a page discards its timers, games and chat.

pub mod avatar;
pub mod chat;
pub mod games;
pub mod home;
pub mod login;
pub mod profile;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use companion_core::avatar::AvatarConfig;
use companion_core::config::Timings;
use companion_core::navigation::Page;

pub use avatar::AvatarPage;
pub use chat::ChatPage;
pub use games::GamesPage;
pub use home::HomePage;
pub use login::LoginPage;
pub use profile::ProfilePage;

/// What a page needs when it is built
pub struct Mount<'a> {
    /// Configured delays
    pub timings: &'a Timings,
    /// Source for per-visit randomness
    pub rng: &'a mut StdRng,
    /// The companion, if created
    pub avatar: Option<&'a AvatarConfig>,
}

/// State of the page on screen
pub enum Screen {
    /// Sign-in
    Login(LoginPage),
    /// Companion editor
    Avatar(AvatarPage),
    /// Dashboard
    Home(HomePage),
    /// Decompression games
    Games(GamesPage),
    /// Conversation
    Chat(ChatPage),
    /// Account menu
    Profile(ProfilePage),
}

impl Screen {
    /// Fresh state for a visit to `page`
    pub fn mount(page: Page, ctx: Mount<'_>) -> Self {
        match page {
            Page::Login => Screen::Login(LoginPage::new(ctx.timings)),
            Page::AvatarCustomization => Screen::Avatar(AvatarPage::new(ctx.avatar)),
            Page::Home => Screen::Home(HomePage::new(ctx.rng, ctx.timings)),
            Page::Games => Screen::Games(GamesPage::new(
                *ctx.timings,
                StdRng::seed_from_u64(ctx.rng.gen()),
            )),
            Page::Chat => Screen::Chat(ChatPage::new()),
            Page::Profile => Screen::Profile(ProfilePage::new()),
        }
    }

    /// Which page this state belongs to
    pub fn page(&self) -> Page {
        match self {
            Screen::Login(_) => Page::Login,
            Screen::Avatar(_) => Page::AvatarCustomization,
            Screen::Home(_) => Page::Home,
            Screen::Games(_) => Page::Games,
            Screen::Chat(_) => Page::Chat,
            Screen::Profile(_) => Page::Profile,
        }
    }
}

/// Centered sub-rectangle of at most `width` x `height`
pub fn centered(area: ratatui::layout::Rect, width: u16, height: u16) -> ratatui::layout::Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    ratatui::layout::Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
