//! Client cvar definitions
//!
//! Volume cvars come in two storage units: `audio.mastervolume` is a linear
//! gain (0.0..=1.0) while the MIDI and ambience volumes are stored in decibels.

use crate::cvar::{CVarDef, CVarValue};

/// Master output gain, linear.
pub const AUDIO_MASTER_VOLUME: CVarDef<f32> = CVarDef::new("audio.mastervolume", 1.0);

/// MIDI instrument volume in dB.
pub const MIDI_VOLUME: CVarDef<f32> = CVarDef::new("midi.volume", 0.0);

/// Ambient sound volume in dB.
pub const AMBIENCE_VOLUME: CVarDef<f32> = CVarDef::new("ambience.volume", 0.0);

/// Maximum number of ambient sources played at once.
pub const MAX_AMBIENT_SOURCES: CVarDef<i32> = CVarDef::new("ambience.max_sounds", 64);

/// Lower bound offered for `ambience.max_sounds` in the options UI.
pub const MIN_MAX_AMBIENT_SOURCES_CONFIGURED: CVarDef<i32> =
    CVarDef::new("ambience.min_max_sounds_configured", 16);

/// Upper bound offered for `ambience.max_sounds` in the options UI.
pub const MAX_MAX_AMBIENT_SOURCES_CONFIGURED: CVarDef<i32> =
    CVarDef::new("ambience.max_max_sounds_configured", 64);

pub const LOBBY_MUSIC_ENABLED: CVarDef<bool> = CVarDef::new("ambience.lobby_music_enabled", true);

pub const STATION_AMBIENCE_ENABLED: CVarDef<bool> = CVarDef::new("ambience.station_ambience", true);

pub const SPACE_AMBIENCE_ENABLED: CVarDef<bool> = CVarDef::new("ambience.space_ambience", true);

/// Every client cvar as `(name, default)`, for registering with a store.
pub fn client_defaults() -> Vec<(&'static str, CVarValue)> {
    vec![
        (AUDIO_MASTER_VOLUME.name, AUDIO_MASTER_VOLUME.default_value()),
        (MIDI_VOLUME.name, MIDI_VOLUME.default_value()),
        (AMBIENCE_VOLUME.name, AMBIENCE_VOLUME.default_value()),
        (MAX_AMBIENT_SOURCES.name, MAX_AMBIENT_SOURCES.default_value()),
        (
            MIN_MAX_AMBIENT_SOURCES_CONFIGURED.name,
            MIN_MAX_AMBIENT_SOURCES_CONFIGURED.default_value(),
        ),
        (
            MAX_MAX_AMBIENT_SOURCES_CONFIGURED.name,
            MAX_MAX_AMBIENT_SOURCES_CONFIGURED.default_value(),
        ),
        (LOBBY_MUSIC_ENABLED.name, LOBBY_MUSIC_ENABLED.default_value()),
        (STATION_AMBIENCE_ENABLED.name, STATION_AMBIENCE_ENABLED.default_value()),
        (SPACE_AMBIENCE_ENABLED.name, SPACE_AMBIENCE_ENABLED.default_value()),
    ]
}
