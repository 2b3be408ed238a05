//! Settings management
//!
//! A [`SettingsReconciler`] sits between an options UI and the config store.
//! It keeps a live value per setting (what the UI shows, in display units)
//! next to the saved value (what the store holds, in storage units) and
//! answers whether anything is unsaved.
//!
//! Not reentrant: `apply` and `reset` take `&mut self`, and the store is
//! assumed to be touched only from the UI thread.

use crate::error::SettingsError;
use keel_audio::units::{db_to_lv100, linear_to_percent, lv100_to_db, percent_to_linear};
use keel_config::{CVarKind, CVarValue, ConfigError, ConfigStore};
use std::ops::RangeInclusive;

/// Continuous values closer than this count as unchanged.
pub const CONTINUOUS_TOLERANCE: f32 = 0.01;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SettingKind {
    Continuous,
    Integer,
    Boolean,
}

impl SettingKind {
    pub fn value_kind(self) -> CVarKind {
        match self {
            SettingKind::Continuous => CVarKind::Float,
            SettingKind::Integer => CVarKind::Int,
            SettingKind::Boolean => CVarKind::Bool,
        }
    }
}

/// How a continuous setting is shown versus stored.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Conversion {
    /// Stored as a linear gain, shown as a percentage.
    Percent,
    /// Stored in decibels, shown as a linear percentage.
    Decibel,
}

impl Conversion {
    pub fn to_display(self, stored: f32) -> f32 {
        match self {
            Conversion::Percent => linear_to_percent(stored),
            Conversion::Decibel => db_to_lv100(stored),
        }
    }

    pub fn to_storage(self, display: f32) -> f32 {
        match self {
            Conversion::Percent => percent_to_linear(display),
            Conversion::Decibel => lv100_to_db(display),
        }
    }
}

/// Static description of a tracked setting.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingSpec {
    pub name: &'static str,
    pub kind: SettingKind,
    pub conversion: Option<Conversion>,
    /// Inclusive bounds for integer settings; live values are clamped into it.
    pub range: Option<RangeInclusive<i32>>,
}

impl SettingSpec {
    pub fn continuous(name: &'static str) -> Self {
        Self {
            name,
            kind: SettingKind::Continuous,
            conversion: None,
            range: None,
        }
    }

    pub fn integer(name: &'static str) -> Self {
        Self {
            kind: SettingKind::Integer,
            ..Self::continuous(name)
        }
    }

    pub fn boolean(name: &'static str) -> Self {
        Self {
            kind: SettingKind::Boolean,
            ..Self::continuous(name)
        }
    }

    pub fn with_conversion(mut self, conversion: Conversion) -> Self {
        self.conversion = Some(conversion);
        self
    }

    pub fn with_range(mut self, range: RangeInclusive<i32>) -> Self {
        self.range = Some(range);
        self
    }

    /// Check that `value` has this setting's storage type, widening ints to floats.
    fn coerce(&self, value: CVarValue) -> Option<CVarValue> {
        value.coerce(self.kind.value_kind())
    }

    fn clamp(&self, value: CVarValue) -> CVarValue {
        match (value, &self.range) {
            (CVarValue::Int(v), Some(range)) => {
                CVarValue::Int(v.clamp(*range.start(), (*range.end()).max(*range.start())))
            }
            _ => value,
        }
    }

    /// Storage units to display units.
    fn to_display(&self, stored: CVarValue) -> CVarValue {
        match (stored, self.conversion) {
            (CVarValue::Float(v), Some(conversion)) => CVarValue::Float(conversion.to_display(v)),
            _ => stored,
        }
    }

    /// Display units to storage units.
    fn to_storage(&self, live: CVarValue) -> CVarValue {
        match (live, self.conversion) {
            (CVarValue::Float(v), Some(conversion)) => CVarValue::Float(conversion.to_storage(v)),
            _ => live,
        }
    }
}

/// A tracked setting: its live (display) and saved (storage) values.
#[derive(Debug, Clone)]
pub struct Setting {
    spec: SettingSpec,
    live: CVarValue,
    saved: CVarValue,
}

impl Setting {
    fn from_saved(spec: SettingSpec, saved: CVarValue) -> Self {
        let live = spec.clamp(spec.to_display(saved));
        Self { spec, live, saved }
    }

    pub fn spec(&self) -> &SettingSpec {
        &self.spec
    }

    pub fn name(&self) -> &'static str {
        self.spec.name
    }

    pub fn live(&self) -> CVarValue {
        self.live
    }

    pub fn saved(&self) -> CVarValue {
        self.saved
    }

    pub fn is_dirty(&self) -> bool {
        match (self.live, self.spec.to_display(self.saved)) {
            (CVarValue::Float(live), CVarValue::Float(saved)) => {
                !((live - saved).abs() < CONTINUOUS_TOLERANCE)
            }
            (live, saved) => live != saved,
        }
    }
}

/// Tracks unsaved edits against the config store.
pub struct SettingsReconciler<S: ConfigStore> {
    store: S,
    settings: Vec<Setting>,
}

impl<S: ConfigStore> SettingsReconciler<S> {
    /// Load every setting's saved value from `store`.
    pub fn new(store: S, specs: impl IntoIterator<Item = SettingSpec>) -> Result<Self, SettingsError> {
        let specs: Vec<SettingSpec> = specs.into_iter().collect();
        let saved = read_all(&store, &specs).map_err(SettingsError::StoreRead)?;

        let settings = specs
            .into_iter()
            .zip(saved)
            .map(|(spec, saved)| Setting::from_saved(spec, saved))
            .collect::<Vec<_>>();

        tracing::debug!("Tracking {} settings", settings.len());
        Ok(Self { store, settings })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn settings(&self) -> impl Iterator<Item = &Setting> {
        self.settings.iter()
    }

    pub fn get(&self, name: &str) -> Option<&Setting> {
        self.settings.iter().find(|s| s.name() == name)
    }

    /// Live value in display units.
    pub fn live(&self, name: &str) -> Option<CVarValue> {
        self.get(name).map(Setting::live)
    }

    /// Saved value in storage units.
    pub fn saved(&self, name: &str) -> Option<CVarValue> {
        self.get(name).map(Setting::saved)
    }

    /// Record a UI edit. `value` is in display units; integer settings are
    /// clamped into their range.
    pub fn set_live(&mut self, name: &str, value: CVarValue) -> Result<(), SettingsError> {
        let setting = self
            .settings
            .iter_mut()
            .find(|s| s.name() == name)
            .ok_or_else(|| SettingsError::UnknownSetting {
                name: name.to_string(),
            })?;

        let value = setting
            .spec
            .coerce(value)
            .ok_or_else(|| SettingsError::KindMismatch {
                name: name.to_string(),
                expected: setting.spec.kind.value_kind(),
                found: value.kind(),
            })?;

        if let CVarValue::Float(v) = value {
            if !v.is_finite() {
                return Err(SettingsError::NonFinite {
                    name: name.to_string(),
                    value: v,
                });
            }
        }

        setting.live = setting.spec.clamp(value);
        tracing::debug!("Setting '{}' live -> {}", name, setting.live);
        Ok(())
    }

    pub fn is_dirty(&self) -> bool {
        self.settings.iter().any(Setting::is_dirty)
    }

    pub fn dirty_settings(&self) -> Vec<&'static str> {
        self.settings
            .iter()
            .filter(|s| s.is_dirty())
            .map(Setting::name)
            .collect()
    }

    /// Write every live value to the store and save it to disk.
    ///
    /// All or nothing: if any write or the save fails, the store gets its
    /// previous values back and the saved values here are untouched.
    pub fn apply(&mut self) -> Result<(), SettingsError> {
        let previous = read_all(&self.store, self.settings.iter().map(Setting::spec))
            .map_err(SettingsError::Persistence)?;
        let staged: Vec<CVarValue> = self
            .settings
            .iter()
            .map(|s| s.spec.to_storage(s.live))
            .collect();

        if let Err(err) = self.write_and_save(&staged) {
            tracing::warn!("Applying settings failed, rolling back: {err}");
            self.restore(&previous);
            return Err(SettingsError::Persistence(err));
        }

        for (setting, value) in self.settings.iter_mut().zip(staged) {
            setting.saved = value;
        }
        tracing::info!("Applied {} settings", self.settings.len());
        Ok(())
    }

    /// Discard edits: re-read every value from the store.
    ///
    /// Refreshes the store from its backing storage first, then reads it
    /// rather than the in-memory saved copy, so changes made behind our back
    /// are picked up. On a failed refresh or read nothing here changes.
    pub fn reset(&mut self) -> Result<(), SettingsError> {
        self.store.refresh().map_err(SettingsError::StoreRead)?;
        let values = read_all(&self.store, self.settings.iter().map(Setting::spec))
            .map_err(SettingsError::StoreRead)?;

        for (setting, value) in self.settings.iter_mut().zip(values) {
            setting.saved = value;
            setting.live = setting.spec.clamp(setting.spec.to_display(value));
        }
        tracing::info!("Reset {} settings from the config store", self.settings.len());
        Ok(())
    }

    fn write_and_save(&mut self, values: &[CVarValue]) -> Result<(), ConfigError> {
        for (setting, value) in self.settings.iter().zip(values) {
            self.store.set(setting.name(), *value)?;
        }
        self.store.save_to_file()
    }

    fn restore(&mut self, values: &[CVarValue]) {
        for (setting, value) in self.settings.iter().zip(values) {
            if let Err(err) = self.store.set(setting.name(), *value) {
                tracing::warn!("Could not restore '{}': {err}", setting.name());
            }
        }
    }
}

fn read_all<'a, S, I>(store: &S, specs: I) -> Result<Vec<CVarValue>, ConfigError>
where
    S: ConfigStore + ?Sized,
    I: IntoIterator<Item = &'a SettingSpec>,
{
    specs
        .into_iter()
        .map(|spec| {
            let value = store.get(spec.name)?;
            spec.coerce(value).ok_or_else(|| ConfigError::TypeMismatch {
                name: spec.name.to_string(),
                expected: spec.kind.value_kind(),
                found: value.kind(),
            })
        })
        .collect()
}
