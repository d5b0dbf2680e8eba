#![forbid(unsafe_code)]
// Allow these clippy lints for API ergonomics and color math
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::use_self)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::float_cmp)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::new_without_default)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::map_unwrap_or)]

//! # Tinct
//!
//! Light/dark theme palettes derived from three base colors, with WCAG
//! contrast repair.
//!
//! A user picks a primary (page background), a secondary (text base) and an
//! accent. Tinct stores those choices, merges them with what is shared across
//! themes, and derives the remaining roles so body text, muted text and
//! accent text stay legible on their backgrounds:
//!
//! - **Color math**: hex/RGB/HSL, lightness shifts, mixing, luminance and
//!   contrast ratios ([`color`])
//! - **Contrast repair**: the smallest lightness nudge that meets a target
//!   ([`contrast`])
//! - **Overrides**: per-theme and shared user choices on a pluggable
//!   [`Storage`] ([`overrides`])
//! - **Derivation**: eleven roles from three base colors ([`palette`])
//!
//! ## Quick Start
//!
//! ```rust
//! use tinct::{ColorRole, ComputedDefaults, OverrideSet, SurfaceSet, ThemeId, derive};
//!
//! let mut overrides = OverrideSet::new()
//!     .with(ColorRole::Secondary, "#777777".parse().unwrap());
//! let surfaces = SurfaceSet::from(vec!["#ffffff".parse().unwrap()]);
//!
//! let palette = derive(ThemeId::Light, &mut overrides, &surfaces, &ComputedDefaults::FALLBACK);
//!
//! // #777777 is just short of 4.5:1 on white, so body text is darkened a step.
//! assert_eq!(palette.text_primary.to_hex(), "#747474");
//! ```
//!
//! ## Sessions
//!
//! [`ThemeSession`] ties it together: it remembers the active theme, records
//! edits, and pushes each derived palette to a [`Renderer`].
//!
//! ```rust
//! use tinct::{MemoryStorage, OverrideStore, ThemeSession, ThemeId};
//!
//! let store = OverrideStore::new(MemoryStorage::new());
//! let mut session = ThemeSession::restore(store, true);
//! assert_eq!(session.theme(), ThemeId::Dark);
//!
//! session.toggle();
//! assert_eq!(session.store().load_preference(), Some(ThemeId::Light));
//! ```

pub mod color;
pub mod config;
pub mod contrast;
pub mod overrides;
pub mod palette;
pub mod role;
pub mod session;
pub mod storage;

// Re-exports
pub use color::{
    Hsl, ParseColorError, Rgb, adjust_lightness, contrast_ratio, mix, mix_with_white,
    relative_luminance,
};
pub use config::{ConfigLoadError, ConfigSaveError, ThemeConfig, ThemeDefaults};
pub use contrast::{
    TEXT_CONTRAST, UI_CONTRAST, meets, min_contrast, pick_readable_text, resolve_against_all,
    resolve_against_one,
};
pub use overrides::{ColorEdit, OverrideSet, OverrideStore};
pub use palette::{
    AccentVariants, ComputedDefaults, Palette, SurfaceSet, accent_variants, derive,
};
pub use role::{ColorRole, ParseRoleError, ParseThemeError, ThemeId};
pub use session::{FormValues, Renderer, ThemeSession};
#[cfg(feature = "native")]
pub use storage::FileStorage;
pub use storage::{MemoryStorage, Storage, StorageError};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::color::{Rgb, contrast_ratio};
    pub use crate::config::ThemeConfig;
    pub use crate::overrides::{ColorEdit, OverrideSet, OverrideStore};
    pub use crate::palette::{ComputedDefaults, Palette, SurfaceSet, derive};
    pub use crate::role::{ColorRole, ThemeId};
    pub use crate::session::{FormValues, Renderer, ThemeSession};
    #[cfg(feature = "native")]
    pub use crate::storage::FileStorage;
    pub use crate::storage::{MemoryStorage, Storage};
}
