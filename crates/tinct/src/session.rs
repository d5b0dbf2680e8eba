//! The active theme and the edit/apply cycle around it.
//!
//! A [`ThemeSession`] owns the [`OverrideStore`] and which theme is showing.
//! Every state change ends in [`ThemeSession::apply`]: merge the overrides,
//! derive the palette, and hand it to a [`Renderer`] together with the values
//! a color editor should display.

use tracing::{debug, info};

use crate::color::Rgb;
use crate::overrides::{ColorEdit, OverrideSet, OverrideStore};
use crate::palette::{ComputedDefaults, Palette, SurfaceSet, accent_variants, derive};
use crate::role::{ColorRole, ThemeId};
use crate::storage::Storage;

/// Whatever displays the palette.
///
/// The renderer reports the surfaces text is drawn on and the colors it shows
/// when nothing is overridden; it receives the derived palette back. Any
/// deferral until styles settle is the renderer's business.
pub trait Renderer {
    fn surfaces(&self, theme: ThemeId) -> SurfaceSet;

    fn computed_defaults(&self, theme: ThemeId) -> ComputedDefaults;

    fn render(&mut self, theme: ThemeId, palette: &Palette, form: &FormValues);
}

/// The five editable roles as a color editor should show them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormValues {
    pub primary: Rgb,
    pub secondary: Rgb,
    pub accent: Rgb,
    pub accent_hover: Rgb,
    pub accent_ring: Rgb,
}

impl FormValues {
    /// Effective overrides, falling back to `defaults`. Hover and ring always
    /// follow the accent shown.
    pub fn new(overrides: &OverrideSet, defaults: &ComputedDefaults) -> Self {
        let pick = |role, fallback| overrides.get(role).unwrap_or(fallback);
        let accent = pick(ColorRole::Accent, defaults.accent);
        let variants = accent_variants(accent);
        Self {
            primary: pick(ColorRole::Primary, defaults.primary),
            secondary: pick(ColorRole::Secondary, defaults.secondary),
            accent,
            accent_hover: variants.hover,
            accent_ring: variants.ring,
        }
    }

    pub fn get(&self, role: ColorRole) -> Option<Rgb> {
        match role {
            ColorRole::Primary => Some(self.primary),
            ColorRole::Secondary => Some(self.secondary),
            ColorRole::Accent => Some(self.accent),
            ColorRole::AccentHover => Some(self.accent_hover),
            ColorRole::AccentRing => Some(self.accent_ring),
            _ => None,
        }
    }
}

/// The theme currently shown plus its persisted overrides.
#[derive(Debug)]
pub struct ThemeSession<S> {
    store: OverrideStore<S>,
    theme: ThemeId,
}

impl<S: Storage> ThemeSession<S> {
    /// Starts on `theme` without touching storage.
    pub fn new(store: OverrideStore<S>, theme: ThemeId) -> Self {
        Self { store, theme }
    }

    /// Starts on the saved preference, else the system color scheme.
    pub fn restore(store: OverrideStore<S>, system_prefers_dark: bool) -> Self {
        let saved = store.load_preference();
        let theme = ThemeId::initial(saved, system_prefers_dark);
        debug!(session.theme = %theme, session.saved = ?saved, system_prefers_dark, "Restored theme");
        Self { store, theme }
    }

    pub fn theme(&self) -> ThemeId {
        self.theme
    }

    pub fn store(&self) -> &OverrideStore<S> {
        &self.store
    }

    pub fn into_store(self) -> OverrideStore<S> {
        self.store
    }

    /// Switches to the other theme and remembers it.
    pub fn toggle(&mut self) -> ThemeId {
        self.theme = self.theme.toggled();
        self.store.save_preference(self.theme);
        info!(session.theme = %self.theme, "Toggled theme");
        self.theme
    }

    /// Reacts to a theme change made elsewhere. Nothing is persisted.
    pub fn theme_changed(&mut self, theme: ThemeId) {
        if theme != self.theme {
            debug!(session.from = %self.theme, session.to = %theme, "Theme changed");
        }
        self.theme = theme;
    }

    /// Merges overrides, derives the palette and renders it.
    pub fn apply<R: Renderer + ?Sized>(&mut self, renderer: &mut R) -> Palette {
        let theme = self.theme;
        let defaults = renderer.computed_defaults(theme);
        let surfaces = renderer.surfaces(theme);
        let mut effective = self.store.merge(theme);
        let palette = derive(theme, &mut effective, &surfaces, &defaults);
        let form = FormValues::new(&effective, &defaults);
        renderer.render(theme, &palette, &form);
        palette
    }

    /// Persists an edit from the color editor, then re-applies.
    pub fn edit<R: Renderer + ?Sized>(&mut self, edit: &ColorEdit, renderer: &mut R) -> Palette {
        self.store.record_edit(self.theme, edit);
        self.apply(renderer)
    }

    /// Drops the current theme's and the shared overrides, then re-applies.
    pub fn reset<R: Renderer + ?Sized>(&mut self, renderer: &mut R) -> Palette {
        self.store.reset(self.theme);
        self.apply(renderer)
    }
}
