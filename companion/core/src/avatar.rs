//! Avatar Configuration
//!
//! The companion's look and tone: one expression, a non-empty set of
//! personality traits, and one avatar style. A finished [`AvatarConfig`] is
//! immutable; changing it means running the [`AvatarEditor`] again and
//! replacing the whole value.
//!
//! # Design Philosophy
//!
//! The editor is the only place where partial, possibly-invalid selections
//! exist. Consumers (chat, profile, the renderer) only ever see a complete
//! configuration, so "no personality" is unrepresentable outside the editor.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Errors raised while building an avatar configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AvatarError {
    /// A label did not match any known value
    #[error("unknown {kind}: {value:?}")]
    UnknownValue {
        /// Which enumeration was being parsed
        kind: &'static str,
        /// The rejected input
        value: String,
    },

    /// The personality set was empty
    #[error("a companion needs at least one personality trait")]
    NoPersonality,
}

/// Declares a fixed, labelled avatar enumeration.
macro_rules! avatar_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($variant:ident => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $(
                #[doc = $label]
                $variant
            ),+
        }

        impl $name {
            /// Every value, in presentation order
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Human-readable label
            #[must_use]
            pub fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = AvatarError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.label().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| AvatarError::UnknownValue {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }
    };
}

avatar_enum! {
    /// Facial expression, which also sets the tone of the companion's replies
    Expression, "expression" {
        Calm => "Calm",
        Happy => "Happy",
        Thoughtful => "Thoughtful",
        Curious => "Curious",
        Playful => "Playful",
        Wise => "Wise",
    }
}

avatar_enum! {
    /// A personality trait the companion should embody
    Personality, "personality" {
        Gentle => "Gentle",
        Witty => "Witty",
        Encouraging => "Encouraging",
        Rational => "Rational",
        Empathetic => "Empathetic",
        Creative => "Creative",
    }
}

avatar_enum! {
    /// Outline the avatar is drawn with
    AvatarStyle, "avatar style" {
        Circle => "Circle",
        Square => "Square",
        Blob => "Blob",
        Robot => "Robot",
    }
}

/// Insertion-ordered set of personality traits
///
/// Order is kept for display only; two sets with the same members compare
/// equal regardless of the order they were selected in.
#[derive(Clone, Debug, Default)]
pub struct PersonalitySet(Vec<Personality>);

impl PersonalitySet {
    /// Create an empty set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a trait. Returns false if it was already present.
    pub fn insert(&mut self, personality: Personality) -> bool {
        if self.contains(personality) {
            return false;
        }
        self.0.push(personality);
        true
    }

    /// Remove the trait if present, add it otherwise.
    ///
    /// Returns whether the trait is selected afterwards.
    pub fn toggle(&mut self, personality: Personality) -> bool {
        if let Some(pos) = self.0.iter().position(|p| *p == personality) {
            self.0.remove(pos);
            false
        } else {
            self.0.push(personality);
            true
        }
    }

    /// Whether the trait is selected
    #[must_use]
    pub fn contains(&self, personality: Personality) -> bool {
        self.0.contains(&personality)
    }

    /// Number of selected traits
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when nothing is selected
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate in selection order
    pub fn iter(&self) -> impl Iterator<Item = Personality> + '_ {
        self.0.iter().copied()
    }

    /// Labels joined with `", "` in selection order
    #[must_use]
    pub fn joined(&self) -> String {
        self.0
            .iter()
            .map(|p| p.label())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl PartialEq for PersonalitySet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|p| other.contains(p))
    }
}

impl Eq for PersonalitySet {}

impl FromIterator<Personality> for PersonalitySet {
    fn from_iter<I: IntoIterator<Item = Personality>>(iter: I) -> Self {
        let mut set = Self::new();
        for p in iter {
            set.insert(p);
        }
        set
    }
}

/// The finished, immutable companion configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AvatarConfig {
    expression: Expression,
    personality: PersonalitySet,
    style: AvatarStyle,
}

impl AvatarConfig {
    /// Build a configuration. Fails if no personality trait is given.
    pub fn new(
        expression: Expression,
        personality: impl IntoIterator<Item = Personality>,
        style: AvatarStyle,
    ) -> Result<Self, AvatarError> {
        let personality: PersonalitySet = personality.into_iter().collect();
        if personality.is_empty() {
            return Err(AvatarError::NoPersonality);
        }
        Ok(Self {
            expression,
            personality,
            style,
        })
    }

    /// Expression (and reply tone)
    #[must_use]
    pub fn expression(&self) -> Expression {
        self.expression
    }

    /// Selected personality traits
    #[must_use]
    pub fn personality(&self) -> &PersonalitySet {
        &self.personality
    }

    /// Avatar outline style
    #[must_use]
    pub fn style(&self) -> AvatarStyle {
        self.style
    }
}

/// Working copy used by the customization screen
#[derive(Clone, Debug)]
pub struct AvatarEditor {
    expression: Expression,
    personality: PersonalitySet,
    style: AvatarStyle,
    /// Whether an existing configuration is being modified
    editing: bool,
}

impl AvatarEditor {
    /// Start editing.
    ///
    /// With an existing configuration every field is seeded from it;
    /// otherwise each field starts at the first value of its enumeration.
    #[must_use]
    pub fn new(existing: Option<&AvatarConfig>) -> Self {
        match existing {
            Some(config) => Self {
                expression: config.expression,
                personality: config.personality.clone(),
                style: config.style,
                editing: true,
            },
            None => Self {
                expression: Expression::ALL[0],
                personality: std::iter::once(Personality::ALL[0]).collect(),
                style: AvatarStyle::ALL[0],
                editing: false,
            },
        }
    }

    /// Replace the selected style
    pub fn select_style(&mut self, style: AvatarStyle) {
        self.style = style;
    }

    /// Replace the selected expression
    pub fn select_expression(&mut self, expression: Expression) {
        self.expression = expression;
    }

    /// Toggle a personality trait; returns whether it is now selected
    pub fn toggle_personality(&mut self, personality: Personality) -> bool {
        self.personality.toggle(personality)
    }

    /// Currently selected style
    #[must_use]
    pub fn style(&self) -> AvatarStyle {
        self.style
    }

    /// Currently selected expression
    #[must_use]
    pub fn expression(&self) -> Expression {
        self.expression
    }

    /// Currently selected traits
    #[must_use]
    pub fn personality(&self) -> &PersonalitySet {
        &self.personality
    }

    /// Whether an existing configuration is being modified
    #[must_use]
    pub fn is_edit_mode(&self) -> bool {
        self.editing
    }

    /// Save is only possible with at least one trait
    #[must_use]
    pub fn can_save(&self) -> bool {
        !self.personality.is_empty()
    }

    /// Finalize the selection, or `None` while no trait is selected
    #[must_use]
    pub fn save(&self) -> Option<AvatarConfig> {
        if !self.can_save() {
            return None;
        }
        Some(AvatarConfig {
            expression: self.expression,
            personality: self.personality.clone(),
            style: self.style,
        })
    }

    /// Screen heading
    #[must_use]
    pub fn title(&self) -> &'static str {
        if self.editing {
            "Modify Your Companion"
        } else {
            "Create Your Companion"
        }
    }

    /// Label of the save action
    #[must_use]
    pub fn action_label(&self) -> &'static str {
        if self.editing {
            "Save Changes"
        } else {
            "Create Companion"
        }
    }
}
