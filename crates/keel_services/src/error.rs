use keel_config::{CVarKind, ConfigError};
use thiserror::Error;

/// Errors surfaced by the settings reconciler.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Writing to or saving the config store failed. Nothing was committed.
    #[error("failed to save settings")]
    Persistence(#[source] ConfigError),

    /// Reading the config store failed. Live values were left as they were.
    #[error("failed to read settings from the config store")]
    StoreRead(#[source] ConfigError),

    #[error("setting '{name}' is not tracked")]
    UnknownSetting { name: String },

    #[error("setting '{name}' cannot be set to {value}")]
    NonFinite { name: String, value: f32 },

    #[error("setting '{name}' takes a {expected} value, got {found}")]
    KindMismatch {
        name: String,
        expected: CVarKind,
        found: CVarKind,
    },
}
