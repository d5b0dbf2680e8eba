//! sRGB colors, HSL conversion and WCAG luminance math.
//!
//! Everything here is a pure function over [`Rgb`] values:
//! - [`Rgb`] - 8-bit sRGB triple with a canonical `#rrggbb` form
//! - [`Hsl`] - hue in degrees, saturation and lightness in percent
//! - [`adjust_lightness`], [`mix_with_white`], [`mix`] - derived tones
//! - [`relative_luminance`], [`contrast_ratio`] - WCAG 2.x measures
//!
//! # Example
//!
//! ```rust
//! use tinct::color::{Rgb, contrast_ratio};
//!
//! let fg = Rgb::parse_hex("#777").unwrap_or(Rgb::BLACK);
//! let ratio = contrast_ratio(fg, Rgb::WHITE);
//! assert!(ratio > 4.4 && ratio < 4.5);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use tracing::debug;

/// An sRGB color with 8-bit channels.
///
/// Parsing accepts `#rgb` and `#rrggbb` (the `#` is optional, digits are
/// case-insensitive). Output is always lowercase `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Pure white, `#ffffff`.
    pub const WHITE: Self = Self::new(255, 255, 255);
    /// Pure black, `#000000`.
    pub const BLACK: Self = Self::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Builds a color from floating channel values, rounding and clamping
    /// each one to `0..=255`.
    pub fn from_f64_channels(r: f64, g: f64, b: f64) -> Self {
        Self::new(to_channel(r), to_channel(g), to_channel(b))
    }

    /// Parses a hex color, returning `None` for anything that is not
    /// `#rgb` or `#rrggbb`.
    pub fn parse_hex(s: &str) -> Option<Self> {
        s.parse().ok()
    }

    /// Parses a hex color, substituting `default` when the input is invalid.
    ///
    /// Surrounding whitespace is ignored here, unlike [`parse_hex`](Self::parse_hex).
    pub fn from_hex_or(s: &str, default: Self) -> Self {
        match s.trim().parse() {
            Ok(color) => color,
            Err(err) => {
                debug!(color.input = s, color.fallback = %default, error = %err, "Falling back to default color");
                default
            }
        }
    }

    /// Parses a color as a renderer reports it: hex, or the computed
    /// `rgb(r, g, b)` form. An opaque `rgba(r, g, b, 1)` is accepted too;
    /// anything translucent, named or out of range is `None`.
    pub fn from_css(s: &str) -> Option<Self> {
        let raw = s.trim();
        if let Ok(color) = raw.parse() {
            return Some(color);
        }

        let lower = raw.to_ascii_lowercase();
        let (args, has_alpha) = if let Some(rest) = lower.strip_prefix("rgba(") {
            (rest.strip_suffix(')')?, true)
        } else {
            (lower.strip_prefix("rgb(")?.strip_suffix(')')?, false)
        };

        let parts: Vec<&str> = args.split(',').map(str::trim).collect();
        match (parts.as_slice(), has_alpha) {
            (&[r, g, b], false) => Some(Self::new(r.parse().ok()?, g.parse().ok()?, b.parse().ok()?)),
            (&[r, g, b, a], true) => {
                let alpha: f64 = a.parse().ok()?;
                if alpha < 1.0 {
                    return None;
                }
                Some(Self::new(r.parse().ok()?, g.parse().ok()?, b.parse().ok()?))
            }
            _ => None,
        }
    }

    /// Canonical lowercase `#rrggbb` form.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Converts to HSL.
    pub fn to_hsl(self) -> Hsl {
        rgb_to_hsl(self)
    }

    /// WCAG relative luminance in `[0, 1]`.
    pub fn relative_luminance(self) -> f64 {
        relative_luminance(self)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self { r, g, b }
    }
}

impl From<Rgb> for (u8, u8, u8) {
    fn from(c: Rgb) -> Self {
        (c.r, c.g, c.b)
    }
}

/// Error parsing a hex color string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseColorError {
    #[error("color string is empty")]
    Empty,
    #[error("invalid hex color '{0}'")]
    InvalidFormat(String),
}

impl FromStr for Rgb {
    type Err = ParseColorError;

    /// Accepts exactly `#rgb`, `#rrggbb` or the same without `#`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ParseColorError::Empty);
        }

        let hex = s.strip_prefix('#').unwrap_or(s);
        let digits: Vec<u8> = hex
            .chars()
            .map(|c| c.to_digit(16).map(|d| d as u8))
            .collect::<Option<_>>()
            .ok_or_else(|| ParseColorError::InvalidFormat(s.to_string()))?;

        match digits.as_slice() {
            &[r, g, b] => Ok(Self::new(r * 17, g * 17, b * 17)),
            &[r1, r2, g1, g2, b1, b2] => {
                Ok(Self::new((r1 << 4) | r2, (g1 << 4) | g2, (b1 << 4) | b2))
            }
            _ => Err(ParseColorError::InvalidFormat(s.to_string())),
        }
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(RgbVisitor)
    }
}

struct RgbVisitor;

impl Visitor<'_> for RgbVisitor {
    type Value = Rgb;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a hex color string like \"#rrggbb\" or \"#rgb\"")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        v.parse().map_err(E::custom)
    }
}

/// A color in HSL space.
///
/// `h` is in degrees `[0, 360)`, `s` and `l` are percentages `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Hsl {
    pub const fn new(h: f64, s: f64, l: f64) -> Self {
        Self { h, s, l }
    }

    /// Returns this color with lightness replaced, clamped to `[0, 100]`.
    pub fn with_lightness(self, l: f64) -> Self {
        Self {
            l: l.clamp(0.0, 100.0),
            ..self
        }
    }

    /// Converts back to RGB, rounding each channel.
    pub fn to_rgb(self) -> Rgb {
        hsl_to_rgb(self)
    }
}

#[allow(clippy::many_single_char_names)]
fn rgb_to_hsl(color: Rgb) -> Hsl {
    let r = f64::from(color.r) / 255.0;
    let g = f64::from(color.g) / 255.0;
    let b = f64::from(color.b) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = f64::midpoint(max, min);

    if (max - min).abs() < f64::EPSILON {
        return Hsl::new(0.0, 0.0, l * 100.0);
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };

    let mut h = if (max - r).abs() < f64::EPSILON {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if (max - g).abs() < f64::EPSILON {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    h /= 6.0;
    Hsl::new(h * 360.0, s * 100.0, l * 100.0)
}

#[allow(clippy::many_single_char_names, clippy::suboptimal_flops)]
fn hsl_to_rgb(hsl: Hsl) -> Rgb {
    let h = hsl.h / 360.0;
    let s = hsl.s / 100.0;
    let l = hsl.l / 100.0;

    if s == 0.0 {
        let v = l * 255.0;
        return Rgb::from_f64_channels(v, v, v);
    }

    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    let p = 2.0 * l - q;

    fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        if t < 1.0 / 6.0 {
            return p + (q - p) * 6.0 * t;
        }
        if t < 1.0 / 2.0 {
            return q;
        }
        if t < 2.0 / 3.0 {
            return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
        }
        p
    }

    Rgb::from_f64_channels(
        hue_to_rgb(p, q, h + 1.0 / 3.0) * 255.0,
        hue_to_rgb(p, q, h) * 255.0,
        hue_to_rgb(p, q, h - 1.0 / 3.0) * 255.0,
    )
}

fn to_channel(v: f64) -> u8 {
    // `as` maps NaN to 0
    v.round().clamp(0.0, 255.0) as u8
}

/// Shifts lightness by `delta` percentage points, keeping hue and saturation.
pub fn adjust_lightness(color: Rgb, delta: f64) -> Rgb {
    let hsl = color.to_hsl();
    hsl.with_lightness(hsl.l + delta).to_rgb()
}

/// Moves each channel toward 255 by `ratio` (0 = unchanged, 1 = white).
pub fn mix_with_white(color: Rgb, ratio: f64) -> Rgb {
    mix(color, Rgb::WHITE, ratio)
}

/// Linear per-channel interpolation from `a` toward `b` by `ratio`.
#[allow(clippy::suboptimal_flops)]
pub fn mix(a: Rgb, b: Rgb, ratio: f64) -> Rgb {
    let lerp = |x: u8, y: u8| f64::from(x) * (1.0 - ratio) + f64::from(y) * ratio;
    Rgb::from_f64_channels(lerp(a.r, b.r), lerp(a.g, b.g), lerp(a.b, b.b))
}

/// WCAG relative luminance of an sRGB color, in `[0, 1]`.
pub fn relative_luminance(color: Rgb) -> f64 {
    fn linearize(c: u8) -> f64 {
        let c = f64::from(c) / 255.0;
        if c <= 0.039_28 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    }

    0.2126 * linearize(color.r) + 0.7152 * linearize(color.g) + 0.0722 * linearize(color.b)
}

/// WCAG contrast ratio in `[1, 21]`. Symmetric in its arguments.
pub fn contrast_ratio(fg: Rgb, bg: Rgb) -> f64 {
    let fg_lum = relative_luminance(fg);
    let bg_lum = relative_luminance(bg);
    let lighter = fg_lum.max(bg_lum);
    let darker = fg_lum.min(bg_lum);
    (lighter + 0.05) / (darker + 0.05)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(s: &str) -> Rgb {
        s.parse().expect("valid hex")
    }

    #[test]
    fn test_parse_long_and_short_hex() {
        assert_eq!(Rgb::parse_hex("#ff0000"), Some(Rgb::new(255, 0, 0)));
        assert_eq!(Rgb::parse_hex("#0f0"), Some(Rgb::new(0, 255, 0)));
        assert_eq!(Rgb::parse_hex("00F"), Some(Rgb::new(0, 0, 255)));
        assert_eq!(Rgb::parse_hex("#AbCdEf"), Some(Rgb::new(0xab, 0xcd, 0xef)));
    }

    #[test]
    fn test_parse_hex_is_strict_about_whitespace() {
        assert_eq!(Rgb::parse_hex("  #fff "), None);
        assert_eq!(Rgb::parse_hex("#fff\n"), None);
        assert_eq!(Rgb::from_hex_or("  #fff ", Rgb::BLACK), Rgb::WHITE);
    }

    #[test]
    fn test_from_css_computed_forms() {
        assert_eq!(Rgb::from_css("rgb(17, 24, 39)"), Some(hex("#111827")));
        assert_eq!(Rgb::from_css(" RGB(255,0,128) "), Some(hex("#ff0080")));
        assert_eq!(Rgb::from_css("rgba(1, 2, 3, 1)"), Some(Rgb::new(1, 2, 3)));
        assert_eq!(Rgb::from_css("#ABC"), Some(hex("#aabbcc")));
        assert_eq!(Rgb::from_css(" #111827 "), Some(hex("#111827")));
    }

    #[test]
    fn test_from_css_rejects_other_forms() {
        for bad in [
            "rgba(0, 0, 0, 0)",
            "rgba(10, 20, 30, 0.5)",
            "rgb(256, 0, 0)",
            "rgb(-1, 0, 0)",
            "rgb(1, 2)",
            "rgb(1, 2, 3, 4)",
            "rgb(1.5, 2, 3)",
            "rgb(1, 2, 3",
            "transparent",
            "red",
            "",
        ] {
            assert_eq!(Rgb::from_css(bad), None, "{bad:?}");
        }
    }

    #[test]
    fn test_parse_rejects_other_formats() {
        for bad in ["", "#", "#ff", "#ffff", "#fffffff", "#gggggg", "rgb(1,2,3)", "##ffffff"] {
            assert!(Rgb::parse_hex(bad).is_none(), "{bad:?} should not parse");
        }
        assert_eq!("".parse::<Rgb>(), Err(ParseColorError::Empty));
        assert_eq!(
            "#12".parse::<Rgb>(),
            Err(ParseColorError::InvalidFormat("#12".to_string()))
        );
    }

    #[test]
    fn test_from_hex_or_falls_back() {
        assert_eq!(Rgb::from_hex_or("nope", Rgb::WHITE), Rgb::WHITE);
        assert_eq!(Rgb::from_hex_or("#000", Rgb::WHITE), Rgb::BLACK);
    }

    #[test]
    fn test_hex_output_is_lowercase() {
        assert_eq!(hex("#ABCDEF").to_hex(), "#abcdef");
        assert_eq!(hex("#abc").to_string(), "#aabbcc");
        assert_eq!(Rgb::new(1, 2, 3).to_hex(), "#010203");
    }

    #[test]
    fn test_from_f64_channels_clamps() {
        assert_eq!(Rgb::from_f64_channels(-10.0, 300.0, 127.5), Rgb::new(0, 255, 128));
        assert_eq!(Rgb::from_f64_channels(f64::NAN, 0.4, 254.6), Rgb::new(0, 0, 255));
    }

    #[test]
    fn test_rgb_to_hsl_primaries() {
        let red = Rgb::new(255, 0, 0).to_hsl();
        assert!((red.h - 0.0).abs() < 1e-9);
        assert!((red.s - 100.0).abs() < 1e-9);
        assert!((red.l - 50.0).abs() < 1e-9);

        let green = Rgb::new(0, 255, 0).to_hsl();
        assert!((green.h - 120.0).abs() < 1e-9);

        let blue = Rgb::new(0, 0, 255).to_hsl();
        assert!((blue.h - 240.0).abs() < 1e-9);
    }

    #[test]
    fn test_gray_has_zero_hue_and_saturation() {
        let gray = Rgb::new(128, 128, 128).to_hsl();
        assert_eq!(gray.h, 0.0);
        assert_eq!(gray.s, 0.0);
        assert!((gray.l - 50.196).abs() < 1e-3);
        assert_eq!(gray.to_rgb(), Rgb::new(128, 128, 128));
    }

    #[test]
    fn test_hsl_round_trip_of_known_colors() {
        for s in ["#3b82f6", "#ef4444", "#111827", "#f9fafb", "#ff0080", "#777777"] {
            assert_eq!(hex(s).to_hsl().to_rgb(), hex(s), "{s}");
        }
    }

    #[test]
    fn test_adjust_lightness() {
        assert_eq!(adjust_lightness(hex("#ef4444"), -12.0), hex("#e21313"));
        assert_eq!(adjust_lightness(hex("#777777"), -1.0), hex("#747474"));
        assert_eq!(adjust_lightness(hex("#808080"), 100.0), Rgb::WHITE);
        assert_eq!(adjust_lightness(hex("#808080"), -100.0), Rgb::BLACK);
    }

    #[test]
    fn test_mixing() {
        assert_eq!(mix_with_white(hex("#ef4444"), 0.6), hex("#f9b4b4"));
        assert_eq!(mix_with_white(Rgb::BLACK, 0.6), hex("#999999"));
        assert_eq!(mix(Rgb::BLACK, Rgb::WHITE, 0.5), hex("#808080"));
        assert_eq!(mix(hex("#111827"), Rgb::WHITE, 0.35), hex("#646973"));
        assert_eq!(mix(hex("#123456"), hex("#abcdef"), 0.0), hex("#123456"));
        assert_eq!(mix(hex("#123456"), hex("#abcdef"), 1.0), hex("#abcdef"));
    }

    #[test]
    fn test_relative_luminance_extremes() {
        assert!((relative_luminance(Rgb::WHITE) - 1.0).abs() < 1e-9);
        assert!(relative_luminance(Rgb::BLACK).abs() < 1e-12);
    }

    #[test]
    fn test_contrast_ratio() {
        assert!((contrast_ratio(Rgb::WHITE, Rgb::BLACK) - 21.0).abs() < 1e-9);
        assert!((contrast_ratio(Rgb::BLACK, Rgb::BLACK) - 1.0).abs() < 1e-12);

        let ratio = contrast_ratio(hex("#777777"), Rgb::WHITE);
        assert!((ratio - 4.478).abs() < 1e-3, "got {ratio}");
        assert!((ratio - contrast_ratio(Rgb::WHITE, hex("#777777"))).abs() < 1e-12);
    }

    #[test]
    fn test_serde_as_hex_string() {
        let json = serde_json::to_string(&hex("#ABC")).expect("serialize");
        assert_eq!(json, "\"#aabbcc\"");

        let c: Rgb = serde_json::from_str("\"ff00ff\"").expect("deserialize");
        assert_eq!(c, Rgb::new(255, 0, 255));

        assert!(serde_json::from_str::<Rgb>("\"#zzz\"").is_err());
        assert!(serde_json::from_str::<Rgb>("42").is_err());
    }
}
