//! Terminal output for derived palettes.

use std::fmt::Write as _;

use tinct::{
    ColorRole, ComputedDefaults, FormValues, Palette, Renderer, Rgb, SurfaceSet, TEXT_CONTRAST,
    ThemeConfig, ThemeId, UI_CONTRAST, contrast_ratio, resolve_against_one,
};

use crate::cli::OutputFormat;

/// Renderer backed by a [`ThemeConfig`]; keeps the last frame for printing.
#[derive(Debug)]
pub struct ConsoleRenderer {
    config: ThemeConfig,
    frame: Option<Frame>,
}

/// One rendered palette.
#[derive(Debug, Clone, Copy)]
pub struct Frame {
    pub theme: ThemeId,
    pub palette: Palette,
    pub form: FormValues,
}

impl ConsoleRenderer {
    pub fn new(config: ThemeConfig) -> Self {
        Self { config, frame: None }
    }

    /// The most recent frame, if anything was rendered.
    pub fn frame(&self) -> Option<&Frame> {
        self.frame.as_ref()
    }
}

impl Renderer for ConsoleRenderer {
    fn surfaces(&self, theme: ThemeId) -> SurfaceSet {
        self.config.surfaces_for(theme)
    }

    fn computed_defaults(&self, theme: ThemeId) -> ComputedDefaults {
        self.config.defaults_for(theme)
    }

    fn render(&mut self, theme: ThemeId, palette: &Palette, form: &FormValues) {
        self.frame = Some(Frame {
            theme,
            palette: *palette,
            form: *form,
        });
    }
}

impl Frame {
    /// Formats the palette for `format`.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn format(&self, format: OutputFormat) -> Result<String, serde_json::Error> {
        match format {
            OutputFormat::Text => Ok(self.to_text()),
            OutputFormat::Json => serde_json::to_string_pretty(&serde_json::json!({
                "theme": self.theme,
                "palette": self.palette,
            })),
            OutputFormat::Css => Ok(format!(
                ".theme-{} {{\n{}}}\n",
                self.theme,
                indent(&self.palette.to_css())
            )),
        }
    }

    fn to_text(&self) -> String {
        let width = ColorRole::ALL
            .iter()
            .map(|role| role.as_str().len())
            .max()
            .unwrap_or(0);
        let mut out = format!("theme: {}\n", self.theme);
        for (role, color) in self.palette.iter() {
            let marker = if self.form.get(role).is_some() { "" } else { "  (derived)" };
            let _ = writeln!(out, "{:width$}  {}{}", role.as_str(), color, marker);
        }
        out
    }
}

fn indent(block: &str) -> String {
    block.lines().fold(String::new(), |mut out, line| {
        let _ = writeln!(out, "  {line}");
        out
    })
}

/// Human-readable contrast report for a color pair.
pub fn contrast_report(fg: Rgb, bg: Rgb) -> String {
    let ratio = contrast_ratio(fg, bg);
    let verdict = |target: f64| if ratio >= target { "pass" } else { "fail" };

    let mut out = format!("{fg} on {bg}: {ratio:.2}:1\n");
    let _ = writeln!(out, "AA text ({TEXT_CONTRAST}:1): {}", verdict(TEXT_CONTRAST));
    let _ = writeln!(out, "AA UI   ({UI_CONTRAST}:1): {}", verdict(UI_CONTRAST));
    if ratio < TEXT_CONTRAST {
        let suggestion = resolve_against_one(fg, bg, TEXT_CONTRAST);
        if suggestion == fg {
            let _ = writeln!(out, "no text color within reach of {fg}");
        } else {
            let _ = writeln!(
                out,
                "suggested text color: {suggestion} ({:.2}:1)",
                contrast_ratio(suggestion, bg)
            );
        }
    }
    out
}
