//! Contrast repair: nudging a foreground's lightness until it is legible.
//!
//! The search holds hue and saturation fixed and tries every integer
//! lightness offset in `-40..=40` (skipping zero). Among the offsets that meet
//! the target, the one with the smallest magnitude wins; on equal magnitude the
//! darker candidate wins because the scan runs upward from -40. When nothing in
//! range qualifies, the original color is returned untouched.

use tracing::{debug, trace, warn};

use crate::color::{Rgb, contrast_ratio};

/// WCAG AA minimum for normal-size text.
pub const TEXT_CONTRAST: f64 = 4.5;

/// WCAG AA minimum for large text and UI components.
pub const UI_CONTRAST: f64 = 3.0;

/// Largest lightness offset, in percentage points, the search will try.
pub const LIGHTNESS_SEARCH_RANGE: i32 = 40;

/// Returns `fg` unchanged if it already meets `target` against `bg`,
/// otherwise the minimally re-lightened variant that does.
pub fn resolve_against_one(fg: Rgb, bg: Rgb, target: f64) -> Rgb {
    let current = contrast_ratio(fg, bg);
    if current >= target {
        return fg;
    }

    match search_lightness(fg, target, |candidate| contrast_ratio(candidate, bg)) {
        Some((delta, repaired)) => {
            debug!(
                contrast.fg = %fg,
                contrast.bg = %bg,
                contrast.target = target,
                contrast.before = current,
                contrast.delta = delta,
                contrast.result = %repaired,
                "Adjusted lightness to meet contrast target"
            );
            repaired
        }
        None => {
            debug!(
                contrast.fg = %fg,
                contrast.bg = %bg,
                contrast.target = target,
                contrast.before = current,
                "Contrast target unreachable, keeping original color"
            );
            fg
        }
    }
}

/// Like [`resolve_against_one`], but the candidate must meet `target` against
/// every color in `backgrounds`. An empty slice returns `fg`.
pub fn resolve_against_all(fg: Rgb, backgrounds: &[Rgb], target: f64) -> Rgb {
    if backgrounds.is_empty() {
        return fg;
    }

    let current = min_contrast(fg, backgrounds);
    if current >= target {
        return fg;
    }

    match search_lightness(fg, target, |candidate| min_contrast(candidate, backgrounds)) {
        Some((delta, repaired)) => {
            debug!(
                contrast.fg = %fg,
                contrast.backgrounds = backgrounds.len(),
                contrast.target = target,
                contrast.before = current,
                contrast.delta = delta,
                contrast.result = %repaired,
                "Adjusted lightness to meet contrast target on all surfaces"
            );
            repaired
        }
        None => {
            debug!(
                contrast.fg = %fg,
                contrast.backgrounds = backgrounds.len(),
                contrast.target = target,
                contrast.before = current,
                "Contrast target unreachable on all surfaces, keeping original color"
            );
            fg
        }
    }
}

/// Lowest contrast of `fg` against any of `backgrounds`.
///
/// Returns `f64::INFINITY` for an empty slice.
pub fn min_contrast(fg: Rgb, backgrounds: &[Rgb]) -> f64 {
    backgrounds
        .iter()
        .map(|&bg| contrast_ratio(fg, bg))
        .fold(f64::INFINITY, f64::min)
}

/// Picks pure white or pure black, whichever contrasts more with `bg`.
///
/// Ties go to white. `target` only affects logging: when neither extreme
/// reaches it, the better one is still returned.
pub fn pick_readable_text(bg: Rgb, target: f64) -> Rgb {
    let on_white = contrast_ratio(Rgb::WHITE, bg);
    let on_black = contrast_ratio(Rgb::BLACK, bg);
    let (pick, ratio) = if on_white >= on_black {
        (Rgb::WHITE, on_white)
    } else {
        (Rgb::BLACK, on_black)
    };

    if ratio < target {
        debug!(contrast.bg = %bg, contrast.ratio = ratio, contrast.target = target, "No readable text color reaches target");
    }
    pick
}

/// Checks `fg` on `bg` against `target`, logging a warning when it falls short.
pub fn meets(fg: Rgb, bg: Rgb, target: f64) -> bool {
    let ratio = contrast_ratio(fg, bg);
    let ok = ratio >= target;
    if !ok {
        warn!(
            contrast.ratio = ratio,
            contrast.fg = %fg,
            contrast.bg = %bg,
            contrast.target = target,
            "Contrast below target"
        );
    }
    ok
}

fn search_lightness<F>(fg: Rgb, target: f64, score: F) -> Option<(i32, Rgb)>
where
    F: Fn(Rgb) -> f64,
{
    let hsl = fg.to_hsl();
    let mut best: Option<(i32, Rgb)> = None;

    for delta in -LIGHTNESS_SEARCH_RANGE..=LIGHTNESS_SEARCH_RANGE {
        if delta == 0 {
            continue;
        }
        let candidate = hsl.with_lightness(hsl.l + f64::from(delta)).to_rgb();
        let ratio = score(candidate);
        trace!(contrast.delta = delta, contrast.candidate = %candidate, contrast.ratio = ratio);
        if ratio < target {
            continue;
        }
        // Strictly smaller only: the first candidate seen keeps a tie.
        if best.is_none_or(|(d, _)| delta.abs() < d.abs()) {
            best = Some((delta, candidate));
        }
    }

    best
}
