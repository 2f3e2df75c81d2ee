//! Sakura Audio - background music (Kira backend)
//!
//! `MusicPlayer` owns one looping track. Playback waits for the first click
//! or touch, mute is a volume change so the track keeps its position, and a
//! machine without an audio device simply runs silent.

use kira::sound::static_sound::{StaticSoundData, StaticSoundHandle};
use kira::{AudioManager, AudioManagerSettings, Decibels, DefaultBackend, Tween};
use sakura_core::{Result, SakuraError};
use std::path::Path;
use std::time::Duration;

/// Playback volume as a linear amplitude
pub const MUSIC_VOLUME: f64 = 0.4;

pub struct MusicPlayer {
    manager: Option<AudioManager<DefaultBackend>>,
    track: Option<StaticSoundData>,
    handle: Option<StaticSoundHandle>,
    volume: f64,
    muted: bool,
    started: bool,
}

impl MusicPlayer {
    /// Open the default audio device; falls back to silent playback
    pub fn new(muted: bool) -> Self {
        let manager = AudioManager::<DefaultBackend>::new(AudioManagerSettings::default())
            .map_err(|e| log::warn!("[audio] no device available ({e}), running silent"))
            .ok();
        Self {
            manager,
            ..Self::silent(muted)
        }
    }

    /// A player that never touches an audio device
    pub fn silent(muted: bool) -> Self {
        Self {
            manager: None,
            track: None,
            handle: None,
            volume: MUSIC_VOLUME,
            muted,
            started: false,
        }
    }

    /// Whether audio is actually available
    pub fn is_available(&self) -> bool {
        self.manager.is_some()
    }

    /// Decode the background track. Without a device this is a no-op.
    pub fn load(&mut self, path: &Path) -> Result<()> {
        if self.manager.is_none() {
            return Ok(());
        }
        let data = StaticSoundData::from_file(path).map_err(|e| {
            SakuraError::AudioError(format!("Failed to load '{}': {e}", path.display()))
        })?;
        log::info!(
            "[audio] loaded {} ({:.1}s)",
            path.display(),
            data.duration().as_secs_f64()
        );
        self.track = Some(data.loop_region(..));
        Ok(())
    }

    /// Start playback on the first user interaction. Later calls do nothing.
    pub fn start(&mut self) -> Result<()> {
        if self.started {
            return Ok(());
        }
        self.started = true;

        let volume = self.decibels();
        let (Some(manager), Some(track)) = (&mut self.manager, &self.track) else {
            log::debug!("[audio] nothing to play");
            return Ok(());
        };
        let handle = manager
            .play(track.clone().volume(volume))
            .map_err(|e| SakuraError::AudioError(format!("Failed to play music: {e}")))?;
        self.handle = Some(handle);
        Ok(())
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        let volume = self.decibels();
        if let Some(handle) = &mut self.handle {
            handle.set_volume(
                volume,
                Tween {
                    duration: Duration::from_millis(120),
                    ..Default::default()
                },
            );
        }
    }

    /// Flip the mute flag and return the new value
    pub fn toggle_mute(&mut self) -> bool {
        self.set_muted(!self.muted);
        self.muted
    }

    /// Linear amplitude actually applied to the track
    pub fn effective_volume(&self) -> f64 {
        if self.muted {
            0.0
        } else {
            self.volume
        }
    }

    fn decibels(&self) -> Decibels {
        amplitude_to_db(self.effective_volume())
    }
}

/// Convert linear amplitude (0.0–2.0) to decibels
fn amplitude_to_db(amplitude: f64) -> Decibels {
    if amplitude <= 0.0 {
        Decibels(-60.0) // silence
    } else {
        Decibels((20.0 * (amplitude as f32).log10()).max(-60.0))
    }
}
