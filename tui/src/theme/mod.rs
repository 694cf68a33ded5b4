//! Theme and Colors
//!
//! Aura's palette: deep slate backgrounds with violet accents, warm tones
//! for vitals, and one signature color per companion expression.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::BorderType;

use companion_core::avatar::{AvatarStyle, Expression};

// ============================================================================
// Aura Palette
// ============================================================================

/// Signature violet (buttons, selection)
pub const AURA_VIOLET: Color = Color::Rgb(139, 92, 246);

/// Lighter violet for highlights
pub const AURA_LAVENDER: Color = Color::Rgb(196, 181, 253);

/// Panel background
pub const PANEL_BG: Color = Color::Rgb(31, 41, 55);

/// Secondary text
pub const DIM_GRAY: Color = Color::Rgb(156, 163, 175);

/// User chat bubble
pub const USER_BUBBLE: Color = Color::Rgb(99, 102, 241);

/// Companion chat bubble
pub const COMPANION_BUBBLE: Color = Color::Rgb(55, 65, 81);

// ============================================================================
// Dashboard Colors
// ============================================================================

/// Heart rate
pub const HEART_RED: Color = Color::Rgb(248, 113, 113);

/// Temperature
pub const TEMP_ORANGE: Color = Color::Rgb(251, 146, 60);

/// Sleep
pub const SLEEP_INDIGO: Color = Color::Rgb(129, 140, 248);

/// Emotion wave on a turbulent day
pub const WAVE_VOLATILE: Color = Color::Rgb(251, 146, 60);

/// Emotion wave on a calm day
pub const WAVE_CALM: Color = Color::Rgb(129, 140, 248);

/// Sleep stage colors, matching the stage order of the breakdown
pub const SLEEP_STAGES: [Color; 4] = [
    Color::Rgb(99, 102, 241),
    Color::Rgb(129, 140, 248),
    Color::Rgb(167, 139, 250),
    Color::Rgb(196, 181, 253),
];

// ============================================================================
// Games
// ============================================================================

/// Lemons
pub const LEMON_YELLOW: Color = Color::Rgb(250, 204, 21);

/// Dough
pub const DOUGH_CREAM: Color = Color::Rgb(254, 243, 199);

/// Result banner
pub const SUCCESS_GREEN: Color = Color::Rgb(74, 222, 128);

// ============================================================================
// Styles
// ============================================================================

/// Selected or focused item
#[must_use]
pub fn selected() -> Style {
    Style::default()
        .fg(Color::White)
        .bg(AURA_VIOLET)
        .add_modifier(Modifier::BOLD)
}

/// Page title
#[must_use]
pub fn title() -> Style {
    Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
}

/// Secondary text
#[must_use]
pub fn dim() -> Style {
    Style::default().fg(DIM_GRAY)
}

// ============================================================================
// Companion Appearance
// ============================================================================

/// Face color for an expression
#[must_use]
pub fn expression_color(expression: Expression) -> Color {
    match expression {
        Expression::Calm => Color::Rgb(96, 165, 250),
        Expression::Happy => Color::Rgb(250, 204, 21),
        Expression::Thoughtful => Color::Rgb(167, 139, 250),
        Expression::Curious => Color::Rgb(52, 211, 153),
        Expression::Playful => Color::Rgb(244, 114, 182),
        Expression::Wise => Color::Rgb(129, 140, 248),
    }
}

/// Eyes and mouth for an expression
#[must_use]
pub fn expression_face(expression: Expression) -> (&'static str, &'static str) {
    match expression {
        Expression::Calm => ("-   -", "\u{203f}"),
        Expression::Happy => ("^   ^", "\u{25e1}"),
        Expression::Thoughtful => ("o   -", "~"),
        Expression::Curious => ("O   o", "o"),
        Expression::Playful => ("^   >", "P"),
        Expression::Wise => ("=   =", "_"),
    }
}

/// Frame shape for an avatar style
#[must_use]
pub fn style_border(style: AvatarStyle) -> BorderType {
    match style {
        AvatarStyle::Circle => BorderType::Rounded,
        AvatarStyle::Square => BorderType::Plain,
        AvatarStyle::Blob => BorderType::Double,
        AvatarStyle::Robot => BorderType::Thick,
    }
}
