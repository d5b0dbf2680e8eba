//! Palette derivation.
//!
//! [`derive`] turns three base colors (primary, secondary, accent) into the
//! full set of eleven [`ColorRole`]s, repairing contrast where needed. The
//! steps run in a fixed order because later roles build on earlier, possibly
//! adjusted ones:
//!
//! 1. primary and secondary from overrides, else computed defaults
//! 2. `text-primary`: secondary made legible (4.5:1) on every surface
//! 3. `text-on-secondary`: white or black on secondary
//! 4. `secondary-soft`: secondary 35% toward primary
//! 5. accent and `text-on-accent`; the accent itself is repaired if the
//!    better of white/black still misses 4.5:1
//! 6. `accent-on-primary`: accent made legible (3:1) on primary
//! 7. `accent-hover` / `accent-ring` from the final accent
//! 8. `text-muted`: text-primary 35% toward primary, then 3:1 on primary

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tracing::{debug, info_span};

use crate::color::{Rgb, adjust_lightness, contrast_ratio, mix, mix_with_white};
use crate::contrast::{
    TEXT_CONTRAST, UI_CONTRAST, pick_readable_text, resolve_against_all, resolve_against_one,
};
use crate::overrides::OverrideSet;
use crate::role::{ColorRole, ThemeId};

/// Lightness drop, in percentage points, for the accent hover state.
pub const HOVER_LIGHTNESS_DELTA: f64 = -12.0;

/// How far the focus ring is mixed toward white.
pub const RING_WHITE_RATIO: f64 = 0.6;

/// How far softened tones are mixed toward primary.
pub const SOFTEN_RATIO: f64 = 0.35;

/// Background colors that body text must stay legible on.
///
/// The order is the renderer's (page, header, card, footer, ...); it does not
/// affect the result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurfaceSet(Vec<Rgb>);

impl SurfaceSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, color: Rgb) {
        self.0.push(color);
    }

    pub fn as_slice(&self) -> &[Rgb] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Surfaces from rendered background values (hex or `rgb(...)`).
    ///
    /// Values that are not an opaque color, such as a transparent
    /// background, are skipped; primary is always checked anyway.
    pub fn from_rendered<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        values
            .into_iter()
            .filter_map(|value| {
                let value = value.as_ref();
                let color = Rgb::from_css(value);
                if color.is_none() {
                    debug!(palette.value = value, "Skipping unreadable surface color");
                }
                color
            })
            .collect()
    }

    /// `primary` followed by every surface.
    pub fn with_primary(&self, primary: Rgb) -> Vec<Rgb> {
        let mut all = Vec::with_capacity(self.0.len() + 1);
        all.push(primary);
        all.extend_from_slice(&self.0);
        all
    }
}

impl From<Vec<Rgb>> for SurfaceSet {
    fn from(colors: Vec<Rgb>) -> Self {
        Self(colors)
    }
}

impl FromIterator<Rgb> for SurfaceSet {
    fn from_iter<I: IntoIterator<Item = Rgb>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Base colors currently rendered when no override exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComputedDefaults {
    pub primary: Rgb,
    pub secondary: Rgb,
    pub accent: Rgb,
}

impl ComputedDefaults {
    /// Used when the renderer cannot report a value.
    pub const FALLBACK: Self = Self {
        primary: Rgb::WHITE,
        secondary: Rgb::new(0x11, 0x18, 0x27),
        accent: Rgb::new(0xef, 0x44, 0x44),
    };

    pub const fn new(primary: Rgb, secondary: Rgb, accent: Rgb) -> Self {
        Self {
            primary,
            secondary,
            accent,
        }
    }

    /// Builds defaults from the renderer's current values.
    ///
    /// `lookup` returns the rendered string for a role (for example a
    /// computed CSS property), as hex or `rgb(r, g, b)`. Missing or
    /// unparseable values fall back to [`FALLBACK`](Self::FALLBACK) per role.
    pub fn from_rendered<F>(lookup: F) -> Self
    where
        F: Fn(ColorRole) -> Option<String>,
    {
        let pick = |role: ColorRole, fallback: Rgb| match lookup(role) {
            Some(value) => Rgb::from_css(&value).unwrap_or_else(|| {
                debug!(
                    palette.role = %role,
                    palette.value = %value,
                    palette.fallback = %fallback,
                    "Unreadable rendered color, using fallback"
                );
                fallback
            }),
            None => fallback,
        };
        Self {
            primary: pick(ColorRole::Primary, Self::FALLBACK.primary),
            secondary: pick(ColorRole::Secondary, Self::FALLBACK.secondary),
            accent: pick(ColorRole::Accent, Self::FALLBACK.accent),
        }
    }

    /// The default for a base role; `None` for every other role.
    pub fn get(&self, role: ColorRole) -> Option<Rgb> {
        match role {
            ColorRole::Primary => Some(self.primary),
            ColorRole::Secondary => Some(self.secondary),
            ColorRole::Accent => Some(self.accent),
            _ => None,
        }
    }
}

impl Default for ComputedDefaults {
    fn default() -> Self {
        Self::FALLBACK
    }
}

/// Hover and focus-ring tones derived from an accent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccentVariants {
    pub hover: Rgb,
    pub ring: Rgb,
}

/// Slightly darker hover state and a light ring tint.
pub fn accent_variants(accent: Rgb) -> AccentVariants {
    AccentVariants {
        hover: adjust_lightness(accent, HOVER_LIGHTNESS_DELTA),
        ring: mix_with_white(accent, RING_WHITE_RATIO),
    }
}

/// Every role resolved to a color for one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub primary: Rgb,
    pub secondary: Rgb,
    pub accent: Rgb,
    pub accent_hover: Rgb,
    pub accent_ring: Rgb,
    pub text_primary: Rgb,
    pub text_on_secondary: Rgb,
    pub text_on_accent: Rgb,
    pub accent_on_primary: Rgb,
    pub secondary_soft: Rgb,
    pub text_muted: Rgb,
}

impl Palette {
    pub fn get(&self, role: ColorRole) -> Rgb {
        match role {
            ColorRole::Primary => self.primary,
            ColorRole::Secondary => self.secondary,
            ColorRole::Accent => self.accent,
            ColorRole::AccentHover => self.accent_hover,
            ColorRole::AccentRing => self.accent_ring,
            ColorRole::TextPrimary => self.text_primary,
            ColorRole::TextOnSecondary => self.text_on_secondary,
            ColorRole::TextOnAccent => self.text_on_accent,
            ColorRole::AccentOnPrimary => self.accent_on_primary,
            ColorRole::SecondarySoft => self.secondary_soft,
            ColorRole::TextMuted => self.text_muted,
        }
    }

    /// Iterates all roles in [`ColorRole::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (ColorRole, Rgb)> + '_ {
        ColorRole::ALL.into_iter().map(|role| (role, self.get(role)))
    }

    /// Role name to hex string, as handed to a renderer.
    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.iter()
            .map(|(role, color)| (role.as_str().to_string(), color.to_hex()))
            .collect()
    }

    /// CSS custom property declarations, one per line.
    pub fn to_css(&self) -> String {
        let mut out = String::new();
        for (role, color) in self.iter() {
            let _ = writeln!(out, "{}: {};", role.css_var(), color);
        }
        out
    }
}

impl Serialize for Palette {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(ColorRole::ALL.len()))?;
        for (role, color) in self.iter() {
            map.serialize_entry(role.as_str(), &color.to_hex())?;
        }
        map.end()
    }
}

/// Derives the full palette for `theme`.
///
/// `overrides` is the effective (merged) override set. If the accent has to
/// be repaired for legibility, the repaired value is written back into it so
/// callers show the same accent that was used.
pub fn derive(
    theme: ThemeId,
    overrides: &mut OverrideSet,
    surfaces: &SurfaceSet,
    defaults: &ComputedDefaults,
) -> Palette {
    let _span = info_span!("derive", palette.theme = %theme).entered();

    let primary = overrides.get(ColorRole::Primary).unwrap_or(defaults.primary);
    let secondary = overrides.get(ColorRole::Secondary).unwrap_or(defaults.secondary);

    let text_primary = resolve_against_all(secondary, &surfaces.with_primary(primary), TEXT_CONTRAST);
    let text_on_secondary = pick_readable_text(secondary, TEXT_CONTRAST);
    let secondary_soft = mix(secondary, primary, SOFTEN_RATIO);

    let mut accent = overrides.get(ColorRole::Accent).unwrap_or(defaults.accent);
    let text_on_accent = pick_readable_text(accent, TEXT_CONTRAST);
    if contrast_ratio(text_on_accent, accent) < TEXT_CONTRAST {
        let repaired = resolve_against_one(accent, text_on_accent, TEXT_CONTRAST);
        debug!(palette.accent = %accent, palette.repaired = %repaired, "Repaired accent for text legibility");
        accent = repaired;
        overrides.insert(ColorRole::Accent, accent);
    }

    let accent_on_primary = resolve_against_one(accent, primary, UI_CONTRAST);
    let AccentVariants { hover, ring } = accent_variants(accent);
    let text_muted = resolve_against_one(mix(text_primary, primary, SOFTEN_RATIO), primary, UI_CONTRAST);

    let palette = Palette {
        primary,
        secondary,
        accent,
        accent_hover: hover,
        accent_ring: ring,
        text_primary,
        text_on_secondary,
        text_on_accent,
        accent_on_primary,
        secondary_soft,
        text_muted,
    };
    debug!(palette.theme = %theme, palette.surfaces = surfaces.len(), "Derived palette");
    palette
}
