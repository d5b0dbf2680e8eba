//! Command-line interface for `tinct`.
//!
//! # Examples
//!
//! ```bash
//! # Show the derived palette for the current theme
//! tinct palette
//!
//! # Pick a new accent (shared by both themes)
//! tinct set accent '#22c55e'
//!
//! # Emit CSS custom properties for the dark theme
//! tinct palette --theme dark --format css
//!
//! # Check a pair of colors
//! tinct contrast '#777777' '#ffffff'
//! ```

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use tinct::{ColorRole, Rgb, ThemeId};

/// Light/dark theme palettes with WCAG contrast repair.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "tinct",
    author,
    version,
    about = "Light/dark theme palettes with WCAG contrast repair",
    long_about = "Derives a full, legible color palette for a light or dark theme \
                  from three base colors, and stores per-theme and shared overrides."
)]
pub struct Cli {
    /// Directory holding saved overrides and the theme preference
    ///
    /// Defaults to the platform data directory
    #[arg(long, global = true, env = "TINCT_STORE")]
    pub store: Option<PathBuf>,

    /// Theme defaults file (.toml or .json)
    #[arg(long, global = true, env = "TINCT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Treat the system as preferring a dark color scheme
    ///
    /// Only used when no theme preference has been saved
    #[arg(long, global = true, env = "TINCT_SYSTEM_DARK")]
    pub system_dark: bool,

    /// Enable verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Derive and print the palette
    Palette(PaletteArgs),

    /// Override a base color (primary, secondary or accent)
    Set(SetArgs),

    /// Switch between light and dark and remember the choice
    Toggle,

    /// Print the current theme
    Theme,

    /// Drop the theme's overrides and the shared overrides
    Reset(ThemeArg),

    /// Print the effective overrides as JSON
    Overrides(ThemeArg),

    /// Print the contrast ratio between two colors
    Contrast(ContrastArgs),
}

/// Optional theme selection; the current theme when omitted.
#[derive(Args, Debug, Clone, Default)]
pub struct ThemeArg {
    /// Theme to act on (light or dark)
    #[arg(long, short = 't')]
    pub theme: Option<ThemeId>,
}

#[derive(Args, Debug, Clone)]
pub struct PaletteArgs {
    #[command(flatten)]
    pub theme: ThemeArg,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Args, Debug, Clone)]
pub struct SetArgs {
    /// Role to override
    pub role: ColorRole,

    /// New color as #rrggbb or #rgb
    pub color: Rgb,

    #[command(flatten)]
    pub theme: ThemeArg,
}

#[derive(Args, Debug, Clone)]
pub struct ContrastArgs {
    /// Foreground color
    pub fg: Rgb,

    /// Background color
    pub bg: Rgb,
}

/// Palette output formats.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Aligned `role  #hex` lines
    #[default]
    Text,
    /// JSON object with the theme and every role
    Json,
    /// CSS custom property declarations
    Css,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Create CLI from iterator (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if argument parsing fails.
    pub fn try_parse_from<I, T>(iter: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Default tracing filter for the verbosity level.
    pub const fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
