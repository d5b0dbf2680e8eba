//! Per-theme base colors and surfaces, loadable from JSON or TOML.
//!
//! A config stands in for what a renderer would otherwise read back from its
//! own styles: the default primary/secondary/accent of each theme and the
//! extra surfaces body text is drawn on. Every field is optional; anything
//! left out keeps the built-in value for that theme.
//!
//! ```toml
//! [light]
//! secondary = "#1f2937"
//! surfaces = ["#f3f4f6"]
//!
//! [dark]
//! accent = "#f87171"
//! ```

#[cfg(feature = "native")]
use std::fs;
#[cfg(feature = "native")]
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::Rgb;
use crate::palette::{ComputedDefaults, SurfaceSet};
use crate::role::ThemeId;

/// Base colors and surfaces for one theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThemeDefaults {
    pub primary: Rgb,
    pub secondary: Rgb,
    pub accent: Rgb,
    pub surfaces: Vec<Rgb>,
}

impl ThemeDefaults {
    /// Built-in light theme.
    pub fn light() -> Self {
        Self {
            primary: Rgb::WHITE,
            secondary: Rgb::new(0x11, 0x18, 0x27),
            accent: Rgb::new(0xef, 0x44, 0x44),
            surfaces: Vec::new(),
        }
    }

    /// Built-in dark theme.
    pub fn dark() -> Self {
        Self {
            primary: Rgb::new(0x11, 0x18, 0x27),
            secondary: Rgb::new(0xf9, 0xfa, 0xfb),
            accent: Rgb::new(0xef, 0x44, 0x44),
            surfaces: Vec::new(),
        }
    }

    /// Built-in values for `theme`.
    pub fn builtin(theme: ThemeId) -> Self {
        match theme {
            ThemeId::Light => Self::light(),
            ThemeId::Dark => Self::dark(),
        }
    }

    /// Set the primary color.
    pub fn primary(mut self, color: Rgb) -> Self {
        self.primary = color;
        self
    }

    /// Set the secondary color.
    pub fn secondary(mut self, color: Rgb) -> Self {
        self.secondary = color;
        self
    }

    /// Set the accent color.
    pub fn accent(mut self, color: Rgb) -> Self {
        self.accent = color;
        self
    }

    /// Add a surface.
    pub fn surface(mut self, color: Rgb) -> Self {
        self.surfaces.push(color);
        self
    }

    fn apply(mut self, partial: PartialDefaults) -> Self {
        if let Some(primary) = partial.primary {
            self.primary = primary;
        }
        if let Some(secondary) = partial.secondary {
            self.secondary = secondary;
        }
        if let Some(accent) = partial.accent {
            self.accent = accent;
        }
        if let Some(surfaces) = partial.surfaces {
            self.surfaces = surfaces;
        }
        self
    }
}

/// Defaults for both themes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawThemeConfig")]
pub struct ThemeConfig {
    pub light: ThemeDefaults,
    pub dark: ThemeDefaults,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            light: ThemeDefaults::light(),
            dark: ThemeDefaults::dark(),
        }
    }
}

impl ThemeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the defaults for `theme`.
    pub fn with_theme(mut self, theme: ThemeId, defaults: ThemeDefaults) -> Self {
        match theme {
            ThemeId::Light => self.light = defaults,
            ThemeId::Dark => self.dark = defaults,
        }
        self
    }

    pub fn theme(&self, theme: ThemeId) -> &ThemeDefaults {
        match theme {
            ThemeId::Light => &self.light,
            ThemeId::Dark => &self.dark,
        }
    }

    /// Base colors of `theme` as palette defaults.
    pub fn defaults_for(&self, theme: ThemeId) -> ComputedDefaults {
        let t = self.theme(theme);
        ComputedDefaults::new(t.primary, t.secondary, t.accent)
    }

    /// Surfaces of `theme`, excluding primary.
    pub fn surfaces_for(&self, theme: ThemeId) -> SurfaceSet {
        SurfaceSet::from(self.theme(theme).surfaces.clone())
    }

    /// Load a config from JSON text.
    ///
    /// # Errors
    /// Returns `ConfigLoadError` if JSON parsing fails.
    pub fn from_json(json: &str) -> Result<Self, ConfigLoadError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a config from TOML text.
    ///
    /// # Errors
    /// Returns `ConfigLoadError` if TOML parsing fails.
    pub fn from_toml(toml: &str) -> Result<Self, ConfigLoadError> {
        Ok(toml::from_str(toml)?)
    }

    /// Load a config from a file (format inferred by extension).
    ///
    /// # Errors
    /// Returns `ConfigLoadError` if reading or parsing fails, or the
    /// extension is not `json` or `toml`.
    ///
    /// # Availability
    /// This method is only available with the `native` feature.
    #[cfg(feature = "native")]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigLoadError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&content),
            Some("toml") => Self::from_toml(&content),
            Some(ext) => Err(ConfigLoadError::UnsupportedFormat(ext.into())),
            None => Err(ConfigLoadError::UnsupportedFormat("unknown".into())),
        }
    }

    /// Serialize this config to JSON.
    ///
    /// # Errors
    /// Returns `ConfigSaveError` if serialization fails.
    pub fn to_json(&self) -> Result<String, ConfigSaveError> {
        serde_json::to_string_pretty(self).map_err(ConfigSaveError::Json)
    }

    /// Serialize this config to TOML.
    ///
    /// # Errors
    /// Returns `ConfigSaveError` if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigSaveError> {
        toml::to_string_pretty(self).map_err(ConfigSaveError::Toml)
    }
}

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct PartialDefaults {
    primary: Option<Rgb>,
    secondary: Option<Rgb>,
    accent: Option<Rgb>,
    surfaces: Option<Vec<Rgb>>,
}

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct RawThemeConfig {
    #[serde(default)]
    light: PartialDefaults,
    #[serde(default)]
    dark: PartialDefaults,
}

impl From<RawThemeConfig> for ThemeConfig {
    fn from(raw: RawThemeConfig) -> Self {
        Self {
            light: ThemeDefaults::light().apply(raw.light),
            dark: ThemeDefaults::dark().apply(raw.dark),
        }
    }
}

/// Error loading a config.
#[derive(Error, Debug)]
pub enum ConfigLoadError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Error saving a config.
#[derive(Error, Debug)]
pub enum ConfigSaveError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("TOML error: {0}")]
    Toml(#[from] toml::ser::Error),
}
