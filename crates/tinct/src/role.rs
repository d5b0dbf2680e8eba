//! Color roles and theme identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A themeable color slot.
///
/// The first five roles can be set by the user; the rest are always computed
/// from them by [`derive`](crate::palette::derive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorRole {
    /// Page background.
    Primary,
    /// Main foreground / text base color.
    Secondary,
    /// Links, buttons and highlights.
    Accent,
    /// Accent while hovered.
    AccentHover,
    /// Focus ring around accent elements.
    AccentRing,
    /// Body text, legible on every surface.
    TextPrimary,
    /// Text drawn on a secondary-colored block.
    TextOnSecondary,
    /// Text drawn on an accent-colored block.
    TextOnAccent,
    /// Accent used as text on the page background.
    AccentOnPrimary,
    /// Secondary blended toward primary, for gradients.
    SecondarySoft,
    /// De-emphasized text.
    TextMuted,
}

impl ColorRole {
    /// Every role, user-settable ones first.
    pub const ALL: [ColorRole; 11] = [
        ColorRole::Primary,
        ColorRole::Secondary,
        ColorRole::Accent,
        ColorRole::AccentHover,
        ColorRole::AccentRing,
        ColorRole::TextPrimary,
        ColorRole::TextOnSecondary,
        ColorRole::TextOnAccent,
        ColorRole::AccentOnPrimary,
        ColorRole::SecondarySoft,
        ColorRole::TextMuted,
    ];

    /// Roles that may appear in an override set.
    pub const USER_SETTABLE: [ColorRole; 5] = [
        ColorRole::Primary,
        ColorRole::Secondary,
        ColorRole::Accent,
        ColorRole::AccentHover,
        ColorRole::AccentRing,
    ];

    /// Kebab-case name used in persisted override sets.
    pub const fn as_str(self) -> &'static str {
        match self {
            ColorRole::Primary => "primary",
            ColorRole::Secondary => "secondary",
            ColorRole::Accent => "accent",
            ColorRole::AccentHover => "accent-hover",
            ColorRole::AccentRing => "accent-ring",
            ColorRole::TextPrimary => "text-primary",
            ColorRole::TextOnSecondary => "text-on-secondary",
            ColorRole::TextOnAccent => "text-on-accent",
            ColorRole::AccentOnPrimary => "accent-on-primary",
            ColorRole::SecondarySoft => "secondary-soft",
            ColorRole::TextMuted => "text-muted",
        }
    }

    /// CSS custom property a renderer writes this role to.
    pub const fn css_var(self) -> &'static str {
        match self {
            ColorRole::Primary => "--color-primary",
            ColorRole::Secondary => "--color-secondary",
            ColorRole::Accent => "--color-accent",
            ColorRole::AccentHover => "--color-accent-hover",
            ColorRole::AccentRing => "--color-accent-ring",
            ColorRole::TextPrimary => "--text-primary",
            ColorRole::TextOnSecondary => "--text-on-secondary",
            ColorRole::TextOnAccent => "--text-on-accent",
            ColorRole::AccentOnPrimary => "--accent-on-primary",
            ColorRole::SecondarySoft => "--color-secondary-soft",
            ColorRole::TextMuted => "--text-muted",
        }
    }

    pub const fn is_user_settable(self) -> bool {
        matches!(
            self,
            ColorRole::Primary
                | ColorRole::Secondary
                | ColorRole::Accent
                | ColorRole::AccentHover
                | ColorRole::AccentRing
        )
    }
}

impl fmt::Display for ColorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing a [`ColorRole`] name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown color role '{0}'")]
pub struct ParseRoleError(pub String);

impl FromStr for ColorRole {
    type Err = ParseRoleError;

    /// Accepts the kebab-case name (`accent-hover`) or the CSS variable
    /// (`--color-accent-hover`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        ColorRole::ALL
            .into_iter()
            .find(|role| role.as_str() == needle || role.css_var() == needle)
            .ok_or_else(|| ParseRoleError(s.to_string()))
    }
}

/// Which of the two themes is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeId {
    #[default]
    Light,
    Dark,
}

impl ThemeId {
    pub const ALL: [ThemeId; 2] = [ThemeId::Light, ThemeId::Dark];

    pub const fn as_str(self) -> &'static str {
        match self {
            ThemeId::Light => "light",
            ThemeId::Dark => "dark",
        }
    }

    /// The other theme.
    pub const fn toggled(self) -> Self {
        match self {
            ThemeId::Light => ThemeId::Dark,
            ThemeId::Dark => ThemeId::Light,
        }
    }

    pub const fn is_dark(self) -> bool {
        matches!(self, ThemeId::Dark)
    }

    /// Theme to start with: the saved preference if any, otherwise the
    /// system's color-scheme preference.
    pub const fn initial(saved: Option<ThemeId>, system_prefers_dark: bool) -> Self {
        match saved {
            Some(theme) => theme,
            None if system_prefers_dark => ThemeId::Dark,
            None => ThemeId::Light,
        }
    }
}

impl fmt::Display for ThemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing a [`ThemeId`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown theme '{0}' (expected 'light' or 'dark')")]
pub struct ParseThemeError(pub String);

impl FromStr for ThemeId {
    type Err = ParseThemeError;

    /// Accepts `light`/`dark` and the `theme-` prefixed class names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.strip_prefix("theme-").unwrap_or(&lower) {
            "light" => Ok(ThemeId::Light),
            "dark" => Ok(ThemeId::Dark),
            _ => Err(ParseThemeError(s.to_string())),
        }
    }
}
