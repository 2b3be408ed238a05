//! Audio options tab
//!
//! Binds the audio cvars to a [`SettingsReconciler`] and turns widget events
//! into reconciler calls. The widget toolkit itself stays outside: callers
//! feed [`AudioTabEvent`]s in and render the [`AudioTabView`] they get back.

use crate::error::SettingsError;
use crate::events::{EventHub, Subscription};
use crate::settings::{Conversion, SettingSpec, SettingsReconciler};
use keel_audio::units::{format_volume_percent, percent_to_linear};
use keel_audio::AudioBackend;
use keel_config::cvars::{
    AMBIENCE_VOLUME, AUDIO_MASTER_VOLUME, LOBBY_MUSIC_ENABLED, MAX_AMBIENT_SOURCES,
    MAX_MAX_AMBIENT_SOURCES_CONFIGURED, MIDI_VOLUME, MIN_MAX_AMBIENT_SOURCES_CONFIGURED,
    SPACE_AMBIENCE_ENABLED, STATION_AMBIENCE_ENABLED,
};
use keel_config::{CVarValue, ConfigStore, ConfigStoreExt};
use std::cell::RefCell;
use std::rc::Rc;

/// Widgets on the audio tab.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum AudioControl {
    MasterVolume,
    MidiVolume,
    AmbienceVolume,
    AmbienceSounds,
    LobbyMusic,
    StationAmbience,
    SpaceAmbience,
}

impl AudioControl {
    /// The cvar this widget edits.
    pub fn cvar(self) -> &'static str {
        match self {
            AudioControl::MasterVolume => AUDIO_MASTER_VOLUME.name,
            AudioControl::MidiVolume => MIDI_VOLUME.name,
            AudioControl::AmbienceVolume => AMBIENCE_VOLUME.name,
            AudioControl::AmbienceSounds => MAX_AMBIENT_SOURCES.name,
            AudioControl::LobbyMusic => LOBBY_MUSIC_ENABLED.name,
            AudioControl::StationAmbience => STATION_AMBIENCE_ENABLED.name,
            AudioControl::SpaceAmbience => SPACE_AMBIENCE_ENABLED.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AudioTabEvent {
    SliderChanged { control: AudioControl, value: f32 },
    Toggled { control: AudioControl, pressed: bool },
    ApplyPressed,
    ResetPressed,
}

/// What the tab should currently display.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioTabView {
    pub apply_enabled: bool,
    pub reset_enabled: bool,
    pub master_volume_label: String,
    pub midi_volume_label: String,
    pub ambience_volume_label: String,
    pub ambience_sounds_label: String,
    /// Set after a failed apply or reset, cleared by the next success.
    pub notice: Option<String>,
}

pub struct AudioTab<S: ConfigStore, A: AudioBackend> {
    settings: SettingsReconciler<S>,
    audio: A,
    notice: Option<String>,
}

impl<S: ConfigStore, A: AudioBackend> AudioTab<S, A> {
    /// Open the tab: load every audio setting from `store`.
    pub fn open(store: S, audio: A) -> Result<Self, SettingsError> {
        let min_sounds = store
            .get_cvar(&MIN_MAX_AMBIENT_SOURCES_CONFIGURED)
            .map_err(SettingsError::StoreRead)?;
        let max_sounds = store
            .get_cvar(&MAX_MAX_AMBIENT_SOURCES_CONFIGURED)
            .map_err(SettingsError::StoreRead)?;

        let specs = [
            SettingSpec::continuous(AUDIO_MASTER_VOLUME.name).with_conversion(Conversion::Percent),
            SettingSpec::continuous(MIDI_VOLUME.name).with_conversion(Conversion::Decibel),
            SettingSpec::continuous(AMBIENCE_VOLUME.name).with_conversion(Conversion::Decibel),
            SettingSpec::integer(MAX_AMBIENT_SOURCES.name).with_range(min_sounds..=max_sounds),
            SettingSpec::boolean(LOBBY_MUSIC_ENABLED.name),
            SettingSpec::boolean(STATION_AMBIENCE_ENABLED.name),
            SettingSpec::boolean(SPACE_AMBIENCE_ENABLED.name),
        ];

        let mut tab = Self {
            settings: SettingsReconciler::new(store, specs)?,
            audio,
            notice: None,
        };
        tab.preview_master_volume();
        Ok(tab)
    }

    /// Register `tab` on `hub`. The tab stops receiving events once the
    /// returned subscription is dropped or the tab itself is dropped.
    pub fn attach(tab: &Rc<RefCell<Self>>, hub: &EventHub<AudioTabEvent>) -> Subscription
    where
        S: 'static,
        A: 'static,
    {
        let weak = Rc::downgrade(tab);
        hub.subscribe(move |event| {
            let Some(tab) = weak.upgrade() else {
                return;
            };
            let mut tab = tab.borrow_mut();
            if let Err(err) = tab.handle(event) {
                tracing::warn!("Audio tab could not handle {event:?}: {err}");
            }
        })
    }

    pub fn handle(&mut self, event: &AudioTabEvent) -> Result<(), SettingsError> {
        match *event {
            AudioTabEvent::SliderChanged { control, value } => {
                let value = match control {
                    // the slider reports a float; the cvar is a count
                    AudioControl::AmbienceSounds => CVarValue::Int(value as i32),
                    _ => CVarValue::Float(value),
                };
                self.settings.set_live(control.cvar(), value)?;
                if control == AudioControl::MasterVolume {
                    self.preview_master_volume();
                }
                Ok(())
            }
            AudioTabEvent::Toggled { control, pressed } => {
                self.settings.set_live(control.cvar(), CVarValue::Bool(pressed))
            }
            AudioTabEvent::ApplyPressed => self.apply(),
            AudioTabEvent::ResetPressed => self.reset(),
        }
    }

    pub fn apply(&mut self) -> Result<(), SettingsError> {
        let result = self.settings.apply();
        self.record(&result, "Failed to save audio settings");
        result
    }

    pub fn reset(&mut self) -> Result<(), SettingsError> {
        let result = self.settings.reset();
        if result.is_ok() {
            self.preview_master_volume();
        }
        self.record(&result, "Failed to reload audio settings");
        result
    }

    pub fn settings(&self) -> &SettingsReconciler<S> {
        &self.settings
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn view(&self) -> AudioTabView {
        let dirty = self.settings.is_dirty();
        AudioTabView {
            apply_enabled: dirty,
            reset_enabled: dirty,
            master_volume_label: self.volume_label(AudioControl::MasterVolume),
            midi_volume_label: self.volume_label(AudioControl::MidiVolume),
            ambience_volume_label: self.volume_label(AudioControl::AmbienceVolume),
            ambience_sounds_label: self
                .settings
                .live(AudioControl::AmbienceSounds.cvar())
                .map(|v| v.to_string())
                .unwrap_or_default(),
            notice: self.notice.clone(),
        }
    }

    fn volume_label(&self, control: AudioControl) -> String {
        match self.settings.live(control.cvar()) {
            Some(CVarValue::Float(lv100)) => format_volume_percent(lv100),
            _ => String::new(),
        }
    }

    fn preview_master_volume(&mut self) {
        if let Some(CVarValue::Float(percent)) = self.settings.live(AudioControl::MasterVolume.cvar()) {
            self.audio.set_master_volume(percent_to_linear(percent));
        }
    }

    fn record(&mut self, result: &Result<(), SettingsError>, notice: &str) {
        self.notice = match result {
            Ok(()) => None,
            Err(err) => {
                tracing::error!("{notice}: {err}");
                Some(notice.to_string())
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keel_audio::SharedVolume;
    use keel_config::{ConfigError, ConfigManager};

    struct ReadOnlyStore(ConfigManager);

    impl ConfigStore for ReadOnlyStore {
        fn get(&self, name: &str) -> Result<CVarValue, ConfigError> {
            self.0.get(name)
        }

        fn set(&mut self, name: &str, value: CVarValue) -> Result<(), ConfigError> {
            self.0.set(name, value)
        }

        fn save_to_file(&mut self) -> Result<(), ConfigError> {
            Err(ConfigError::Io {
                path: "readonly.json".into(),
                source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            })
        }
    }

    fn open_tab() -> AudioTab<ConfigManager, SharedVolume> {
        let mut store = ConfigManager::with_client_cvars();
        store.set_cvar(&AUDIO_MASTER_VOLUME, 0.5).unwrap();
        AudioTab::open(store, SharedVolume::default()).unwrap()
    }

    fn slider(control: AudioControl, value: f32) -> AudioTabEvent {
        AudioTabEvent::SliderChanged { control, value }
    }

    #[test]
    fn test_open_shows_saved_values() {
        let tab = open_tab();
        let view = tab.view();
        assert!(!view.apply_enabled && !view.reset_enabled);
        assert_eq!(view.master_volume_label, "50%");
        assert_eq!(view.midi_volume_label, "100%");
        assert_eq!(view.ambience_sounds_label, "64");
        assert_eq!(tab.audio().gain(), 0.5);
    }

    #[test]
    fn test_master_slider_previews_and_applies() {
        let mut tab = open_tab();
        tab.handle(&slider(AudioControl::MasterVolume, 75.0)).unwrap();
        assert_eq!(tab.audio().gain(), 0.75);

        let view = tab.view();
        assert!(view.apply_enabled);
        assert_eq!(view.master_volume_label, "75%");

        tab.handle(&AudioTabEvent::ApplyPressed).unwrap();
        assert!(!tab.view().apply_enabled);
        assert_eq!(tab.settings().store().get_cvar(&AUDIO_MASTER_VOLUME).unwrap(), 0.75);
    }

    #[test]
    fn test_reset_restores_preview() {
        let mut tab = open_tab();
        tab.handle(&slider(AudioControl::MasterVolume, 10.0)).unwrap();
        tab.handle(&AudioTabEvent::Toggled {
            control: AudioControl::SpaceAmbience,
            pressed: false,
        })
        .unwrap();
        assert!(tab.view().reset_enabled);

        tab.handle(&AudioTabEvent::ResetPressed).unwrap();
        assert!(!tab.view().reset_enabled);
        assert_eq!(tab.audio().gain(), 0.5);
    }

    #[test]
    fn test_ambience_sounds_truncates_and_clamps() {
        let mut tab = open_tab();
        tab.handle(&slider(AudioControl::AmbienceSounds, 31.9)).unwrap();
        assert_eq!(tab.view().ambience_sounds_label, "31");

        tab.handle(&slider(AudioControl::AmbienceSounds, 2.0)).unwrap();
        assert_eq!(tab.view().ambience_sounds_label, "16");
    }

    #[test]
    fn test_decibel_slider_stores_db() {
        let mut tab = open_tab();
        tab.handle(&slider(AudioControl::AmbienceVolume, 0.0)).unwrap();
        tab.apply().unwrap();
        assert_eq!(
            tab.settings().store().get_cvar(&AMBIENCE_VOLUME).unwrap(),
            keel_audio::DB_FLOOR
        );
        assert_eq!(tab.view().ambience_volume_label, "0%");
    }

    #[test]
    fn test_failed_apply_sets_notice() {
        let store = ReadOnlyStore(ConfigManager::with_client_cvars());
        let mut tab = AudioTab::open(store, SharedVolume::default()).unwrap();
        tab.handle(&AudioTabEvent::Toggled {
            control: AudioControl::LobbyMusic,
            pressed: false,
        })
        .unwrap();

        assert!(tab.handle(&AudioTabEvent::ApplyPressed).is_err());
        let view = tab.view();
        assert!(view.apply_enabled);
        assert_eq!(view.notice.as_deref(), Some("Failed to save audio settings"));

        tab.reset().unwrap();
        assert_eq!(tab.view().notice, None);
    }

    #[test]
    fn test_attached_tab_receives_events_until_dropped() {
        let hub = EventHub::new();
        let tab = Rc::new(RefCell::new(open_tab()));
        let sub = AudioTab::attach(&tab, &hub);

        hub.emit(&slider(AudioControl::MasterVolume, 20.0));
        assert!(tab.borrow().view().apply_enabled);

        drop(sub);
        hub.emit(&AudioTabEvent::ResetPressed);
        assert!(tab.borrow().view().apply_enabled);
        assert_eq!(hub.subscriber_count(), 0);
    }

    #[test]
    fn test_reset_picks_up_edits_on_disk() {
        let path = std::env::temp_dir().join(format!(
            "keel_audio_tab_reset_{}.json",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);

        let mut store = ConfigManager::open(&path).unwrap();
        store.register_client_cvars();
        store.save_to_file().unwrap();
        let mut tab = AudioTab::open(store, SharedVolume::default()).unwrap();
        assert_eq!(tab.view().master_volume_label, "100%");

        std::fs::write(&path, r#"{"audio.mastervolume": 0.25, "ambience.max_sounds": 20}"#).unwrap();
        tab.handle(&AudioTabEvent::ResetPressed).unwrap();

        let view = tab.view();
        assert_eq!(view.master_volume_label, "25%");
        assert_eq!(view.ambience_sounds_label, "20");
        assert!(!view.apply_enabled);
        assert_eq!(tab.audio().gain(), 0.25);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_toggle_on_slider_is_rejected() {
        let mut tab = open_tab();
        let result = tab.handle(&AudioTabEvent::Toggled {
            control: AudioControl::MidiVolume,
            pressed: true,
        });
        assert!(matches!(result, Err(SettingsError::KindMismatch { .. })));
    }
}
