//! User color overrides and their persistence.
//!
//! Overrides come in two flavors:
//! - **theme-specific**: one [`OverrideSet`] per [`ThemeId`]
//! - **shared**: one set applied to both themes
//!
//! [`OverrideStore::merge`] layers them (shared first, theme-specific wins).
//!
//! Theme sets used to be stored under the class name
//! (`theme-overrides:theme-light`). Those keys are still read when the
//! current key is absent, and cleared along with it; new writes only use
//! [`overrides_key`].
//!
//! Persistence is best effort: any storage or decode failure degrades to
//! "nothing persisted" and is logged, never returned.

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::color::Rgb;
use crate::palette::accent_variants;
use crate::role::{ColorRole, ThemeId};
use crate::storage::Storage;

/// Storage key for the light/dark preference.
pub const PREFERENCE_KEY: &str = "preferred-theme";

/// Prefix shared by every override key.
pub const OVERRIDES_PREFIX: &str = "theme-overrides:";

/// Storage key for the shared override set.
pub const SHARED_KEY: &str = "theme-overrides:shared";

/// Storage key for a theme's override set.
pub fn overrides_key(theme: ThemeId) -> String {
    format!("{OVERRIDES_PREFIX}{theme}")
}

/// Older storage key for a theme's override set, keyed by class name.
pub fn legacy_overrides_key(theme: ThemeId) -> String {
    format!("{OVERRIDES_PREFIX}theme-{theme}")
}

/// A mapping from user-settable roles to colors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideSet {
    entries: BTreeMap<ColorRole, Rgb>,
}

impl OverrideSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the override for `role`, if any.
    pub fn get(&self, role: ColorRole) -> Option<Rgb> {
        self.entries.get(&role).copied()
    }

    /// Sets an override. Computed roles are refused and `false` is returned.
    pub fn insert(&mut self, role: ColorRole, color: Rgb) -> bool {
        if !role.is_user_settable() {
            warn!(overrides.role = %role, "Ignoring override for computed role");
            return false;
        }
        self.entries.insert(role, color);
        true
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, role: ColorRole, color: Rgb) -> Self {
        self.insert(role, color);
        self
    }

    pub fn remove(&mut self, role: ColorRole) -> Option<Rgb> {
        self.entries.remove(&role)
    }

    pub fn contains(&self, role: ColorRole) -> bool {
        self.entries.contains_key(&role)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in role order.
    pub fn iter(&self) -> impl Iterator<Item = (ColorRole, Rgb)> + '_ {
        self.entries.iter().map(|(&role, &color)| (role, color))
    }

    /// Copies every entry of `other` into `self`, replacing on collision.
    pub fn extend_from(&mut self, other: &OverrideSet) {
        self.entries.extend(other.entries.iter().map(|(&r, &c)| (r, c)));
    }

    /// Layers `themed` over `shared`.
    pub fn merged(shared: &OverrideSet, themed: &OverrideSet) -> OverrideSet {
        let mut merged = shared.clone();
        merged.extend_from(themed);
        merged
    }

    /// Serializes as a JSON object of role name to hex color.
    pub fn to_json(&self) -> String {
        // A map of plain strings cannot fail to serialize.
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Parses the JSON form.
    ///
    /// Empty and `null` values are skipped. Entries with an unknown role, a
    /// computed role, a non-string value or an unparseable color are dropped
    /// with a warning; the rest are kept.
    ///
    /// # Errors
    /// Returns `serde_json::Error` if the text is not a JSON object.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let raw: BTreeMap<String, Value> = serde_json::from_str(json)?;
        let mut set = OverrideSet::new();
        for (name, value) in raw {
            let role = match name.parse::<ColorRole>() {
                Ok(role) => role,
                Err(err) => {
                    warn!(error = %err, "Dropping stored override");
                    continue;
                }
            };
            let value = match value {
                Value::String(value) if !value.is_empty() => value,
                Value::Null | Value::String(_) => {
                    debug!(overrides.role = %role, "Skipping empty stored override");
                    continue;
                }
                other => {
                    warn!(overrides.role = %role, value = %other, "Dropping non-string stored override");
                    continue;
                }
            };
            match value.parse::<Rgb>() {
                Ok(color) => {
                    set.insert(role, color);
                }
                Err(err) => {
                    warn!(overrides.role = %role, error = %err, "Dropping stored override");
                }
            }
        }
        Ok(set)
    }
}

impl Serialize for OverrideSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (role, color) in &self.entries {
            map.serialize_entry(role.as_str(), &color.to_hex())?;
        }
        map.end()
    }
}

impl FromIterator<(ColorRole, Rgb)> for OverrideSet {
    fn from_iter<I: IntoIterator<Item = (ColorRole, Rgb)>>(iter: I) -> Self {
        let mut set = OverrideSet::new();
        for (role, color) in iter {
            set.insert(role, color);
        }
        set
    }
}

/// Base colors entered in the designer form.
///
/// `None` leaves the stored value untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColorEdit {
    pub primary: Option<Rgb>,
    pub secondary: Option<Rgb>,
    pub accent: Option<Rgb>,
}

impl ColorEdit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn primary(mut self, color: Rgb) -> Self {
        self.primary = Some(color);
        self
    }

    pub fn secondary(mut self, color: Rgb) -> Self {
        self.secondary = Some(color);
        self
    }

    pub fn accent(mut self, color: Rgb) -> Self {
        self.accent = Some(color);
        self
    }

    /// Edit for a single role. Only primary, secondary and accent are
    /// editable; other roles yield `None`.
    pub fn for_role(role: ColorRole, color: Rgb) -> Option<Self> {
        match role {
            ColorRole::Primary => Some(Self::new().primary(color)),
            ColorRole::Secondary => Some(Self::new().secondary(color)),
            ColorRole::Accent => Some(Self::new().accent(color)),
            _ => None,
        }
    }
}

/// Override persistence on top of a [`Storage`] backend.
#[derive(Debug, Clone, Default)]
pub struct OverrideStore<S> {
    storage: S,
}

impl<S: Storage> OverrideStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_inner(self) -> S {
        self.storage
    }

    /// Theme-specific overrides; empty if missing or unreadable.
    ///
    /// Falls back to [`legacy_overrides_key`] when nothing is stored under
    /// [`overrides_key`].
    pub fn load(&self, theme: ThemeId) -> OverrideSet {
        let key = overrides_key(theme);
        if let Some(raw) = self.read(&key) {
            return decode_set(&key, &raw);
        }
        let legacy = legacy_overrides_key(theme);
        match self.read(&legacy) {
            Some(raw) => {
                debug!(storage.key = %legacy, "Loading overrides from legacy key");
                decode_set(&legacy, &raw)
            }
            None => OverrideSet::new(),
        }
    }

    /// Persists theme-specific overrides.
    pub fn save(&mut self, theme: ThemeId, set: &OverrideSet) {
        self.write(&overrides_key(theme), &set.to_json());
    }

    /// Shared overrides; empty if missing or unreadable.
    pub fn load_shared(&self) -> OverrideSet {
        self.read_set(SHARED_KEY)
    }

    /// Persists shared overrides.
    pub fn save_shared(&mut self, set: &OverrideSet) {
        self.write(SHARED_KEY, &set.to_json());
    }

    /// Removes theme-specific overrides, under both current and legacy keys.
    pub fn clear(&mut self, theme: ThemeId) {
        self.delete(&overrides_key(theme));
        self.delete(&legacy_overrides_key(theme));
    }

    /// Removes shared overrides.
    pub fn clear_shared(&mut self) {
        self.delete(SHARED_KEY);
    }

    /// Effective overrides for `theme`: shared entries, then theme-specific
    /// entries replacing them on collision.
    pub fn merge(&self, theme: ThemeId) -> OverrideSet {
        let merged = OverrideSet::merged(&self.load_shared(), &self.load(theme));
        debug!(overrides.theme = %theme, overrides.count = merged.len(), "Merged overrides");
        merged
    }

    /// The saved light/dark preference, if any.
    pub fn load_preference(&self) -> Option<ThemeId> {
        let raw = self.read(PREFERENCE_KEY)?;
        match raw.parse() {
            Ok(theme) => Some(theme),
            Err(err) => {
                warn!(error = %err, "Ignoring stored theme preference");
                None
            }
        }
    }

    /// Persists the light/dark preference.
    pub fn save_preference(&mut self, theme: ThemeId) {
        self.write(PREFERENCE_KEY, theme.as_str());
    }

    /// Records a designer edit.
    ///
    /// Primary and secondary are stored per theme. The accent is stored in
    /// the shared set together with its hover and ring variants.
    pub fn record_edit(&mut self, theme: ThemeId, edit: &ColorEdit) {
        let mut themed = self.load(theme);
        let mut shared = self.load_shared();

        if let Some(primary) = edit.primary {
            themed.insert(ColorRole::Primary, primary);
        }
        if let Some(secondary) = edit.secondary {
            themed.insert(ColorRole::Secondary, secondary);
        }
        if let Some(accent) = edit.accent {
            let variants = accent_variants(accent);
            shared.insert(ColorRole::Accent, accent);
            shared.insert(ColorRole::AccentHover, variants.hover);
            shared.insert(ColorRole::AccentRing, variants.ring);
        }

        self.save(theme, &themed);
        self.save_shared(&shared);
        info!(overrides.theme = %theme, ?edit, "Recorded color edit");
    }

    /// Drops the theme's overrides and the shared overrides, so both themes
    /// return to their defaults for shared roles.
    pub fn reset(&mut self, theme: ThemeId) {
        self.clear(theme);
        self.clear_shared();
        info!(overrides.theme = %theme, "Reset overrides");
    }

    fn read_set(&self, key: &str) -> OverrideSet {
        self.read(key)
            .map_or_else(OverrideSet::new, |raw| decode_set(key, &raw))
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value,
            Err(err) => {
                warn!(storage.key = key, error = %err, "Storage read failed");
                None
            }
        }
    }

    fn write(&mut self, key: &str, value: &str) {
        if let Err(err) = self.storage.set(key, value) {
            warn!(storage.key = key, error = %err, "Storage write failed");
        }
    }

    fn delete(&mut self, key: &str) {
        if let Err(err) = self.storage.remove(key) {
            warn!(storage.key = key, error = %err, "Storage remove failed");
        }
    }
}

fn decode_set(key: &str, raw: &str) -> OverrideSet {
    OverrideSet::from_json(raw).unwrap_or_else(|err| {
        warn!(storage.key = key, error = %err, "Stored overrides are corrupt, ignoring");
        OverrideSet::new()
    })
}
