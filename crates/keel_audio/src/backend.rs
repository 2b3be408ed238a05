//! Playback backend handle

use std::sync::{Arc, PoisonError, RwLock};

/// The part of the playback backend the options UI talks to.
pub trait AudioBackend {
    /// Set the master output gain (linear, 0.0..=1.0).
    fn set_master_volume(&mut self, gain: f32);
}

impl<A: AudioBackend + ?Sized> AudioBackend for &mut A {
    fn set_master_volume(&mut self, gain: f32) {
        (**self).set_master_volume(gain)
    }
}

/// Master gain shared with the audio callback thread.
///
/// The UI thread writes the gain; clones handed to playback read it with `gain`.
#[derive(Debug, Clone)]
pub struct SharedVolume {
    gain: Arc<RwLock<f32>>,
}

impl SharedVolume {
    pub fn new(gain: f32) -> Self {
        Self {
            gain: Arc::new(RwLock::new(gain)),
        }
    }

    pub fn gain(&self) -> f32 {
        *self.gain.read().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SharedVolume {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl AudioBackend for SharedVolume {
    fn set_master_volume(&mut self, gain: f32) {
        tracing::trace!("Master gain -> {gain}");
        *self.gain.write().unwrap_or_else(PoisonError::into_inner) = gain;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_gain() {
        let mut ui_side = SharedVolume::default();
        let callback_side = ui_side.clone();

        ui_side.set_master_volume(0.5);
        assert_eq!(callback_side.gain(), 0.5);
    }
}
