//! Keel Configuration Layer
//!
//! Configuration variables (cvars) and the stores that hold them:
//! - Typed cvar definitions with defaults
//! - The `ConfigStore` seam used by settings UIs
//! - A JSON-file-backed `ConfigManager`

pub mod cvar;
pub mod cvars;
pub mod error;
pub mod manager;
pub mod store;

pub use cvar::{CVarDef, CVarKind, CVarType, CVarValue};
pub use error::ConfigError;
pub use manager::ConfigManager;
pub use store::{ConfigStore, ConfigStoreExt};
