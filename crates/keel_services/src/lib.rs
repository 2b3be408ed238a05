//! Keel Services Layer
//!
//! Client-side services sitting between the UI and the config store:
//! settings reconciliation, the audio options tab, and UI event plumbing.

pub mod audio_tab;
pub mod error;
pub mod events;
pub mod settings;

pub use audio_tab::{AudioControl, AudioTab, AudioTabEvent, AudioTabView};
pub use error::SettingsError;
pub use events::{EventHub, Subscription};
pub use settings::{Conversion, Setting, SettingKind, SettingSpec, SettingsReconciler};
