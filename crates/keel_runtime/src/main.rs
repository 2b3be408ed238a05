//! Keel Client Runtime
//!
//! Opens the client config, mounts the audio options tab and drives it with
//! the widget events given on the command line, e.g.
//!
//! ```text
//! KEEL_CONFIG=client_config.json keel master=75 lobby=off apply
//! ```

use anyhow::{bail, Context, Result};
use keel_audio::SharedVolume;
use keel_config::{ConfigError, ConfigManager};
use keel_services::{AudioControl, AudioTab, AudioTabEvent, EventHub};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

const DEFAULT_CONFIG_PATH: &str = "client_config.json";

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    tracing::info!("Keel client v{}", env!("CARGO_PKG_VERSION"));

    let path = std::env::var_os("KEEL_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let events = std::env::args()
        .skip(1)
        .map(|arg| parse_event(&arg))
        .collect::<Result<Vec<_>>>()?;

    let mut store = open_store(path)?;
    store.register_client_cvars();

    let hub = EventHub::new();
    let tab = Rc::new(RefCell::new(
        AudioTab::open(store, SharedVolume::default()).context("failed to open audio tab")?,
    ));
    let subscription = AudioTab::attach(&tab, &hub);

    for event in &events {
        hub.emit(event);
        let view = tab.borrow().view();
        tracing::info!(
            "master {} | midi {} | ambience {} | sounds {} | unsaved: {}",
            view.master_volume_label,
            view.midi_volume_label,
            view.ambience_volume_label,
            view.ambience_sounds_label,
            view.apply_enabled
        );
        if let Some(notice) = view.notice {
            tracing::warn!("{notice}");
        }
    }

    // closing the tab
    drop(subscription);
    let tab = tab.borrow();
    if tab.settings().is_dirty() {
        tracing::warn!(
            "Discarding unapplied changes: {}",
            tab.settings().dirty_settings().join(", ")
        );
    }

    Ok(())
}

/// Open the config file, falling back to defaults if it cannot be parsed.
fn open_store(path: PathBuf) -> Result<ConfigManager> {
    match ConfigManager::open(&path) {
        Ok(store) => Ok(store),
        Err(err @ ConfigError::Parse { .. }) => {
            let err = anyhow::Error::from(err);
            tracing::error!("{err:#}; using default settings without saving");
            Ok(ConfigManager::new())
        }
        Err(err) => Err(err).with_context(|| format!("failed to open {}", path.display())),
    }
}

/// Parse `apply`, `reset`, `<slider>=<value>` or `<toggle>=on|off`.
fn parse_event(arg: &str) -> Result<AudioTabEvent> {
    match arg {
        "apply" => return Ok(AudioTabEvent::ApplyPressed),
        "reset" => return Ok(AudioTabEvent::ResetPressed),
        _ => {}
    }

    let Some((key, value)) = arg.split_once('=') else {
        bail!("unrecognised event '{arg}'");
    };

    let slider = match key {
        "master" => Some(AudioControl::MasterVolume),
        "midi" => Some(AudioControl::MidiVolume),
        "ambience" => Some(AudioControl::AmbienceVolume),
        "sounds" => Some(AudioControl::AmbienceSounds),
        _ => None,
    };
    if let Some(control) = slider {
        let value = value
            .parse::<f32>()
            .with_context(|| format!("'{value}' is not a number"))?;
        return Ok(AudioTabEvent::SliderChanged { control, value });
    }

    let control = match key {
        "lobby" => AudioControl::LobbyMusic,
        "station" => AudioControl::StationAmbience,
        "space" => AudioControl::SpaceAmbience,
        _ => bail!("unknown control '{key}'"),
    };
    let pressed = match value {
        "on" | "true" => true,
        "off" | "false" => false,
        _ => bail!("'{value}' is not on/off"),
    };
    Ok(AudioTabEvent::Toggled { control, pressed })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_events() {
        assert_eq!(parse_event("apply").unwrap(), AudioTabEvent::ApplyPressed);
        assert_eq!(
            parse_event("master=75").unwrap(),
            AudioTabEvent::SliderChanged {
                control: AudioControl::MasterVolume,
                value: 75.0
            }
        );
        assert_eq!(
            parse_event("space=off").unwrap(),
            AudioTabEvent::Toggled {
                control: AudioControl::SpaceAmbience,
                pressed: false
            }
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_event("volume").is_err());
        assert!(parse_event("master=loud").is_err());
        assert!(parse_event("lobby=maybe").is_err());
        assert!(parse_event("bass=10").is_err());
    }
}
