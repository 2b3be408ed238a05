use crate::cvar::CVarKind;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by configuration stores.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cvar '{name}' is not registered")]
    UnknownCVar { name: String },

    #[error("cvar '{name}' holds a {expected} value, got {found}")]
    TypeMismatch {
        name: String,
        expected: CVarKind,
        found: CVarKind,
    },

    #[error("cvar '{name}' cannot hold non-finite value {value}")]
    NonFinite { name: String, value: f32 },

    #[error("failed to access config file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
