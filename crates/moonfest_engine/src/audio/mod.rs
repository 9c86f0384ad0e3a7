//! Audio system
//!
//! Two sounds matter to a session: the short click played when a lantern is
//! picked, and looping background music. Both are optional. Loading them is
//! the host's job; until a buffer is handed over the corresponding feature
//! is silently skipped.

pub mod backend;

use backend::{AudioBackend, PlaybackOptions, SoundHandle};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Audio errors
#[derive(Error, Debug)]
pub enum AudioError {
    /// Output device could not be opened
    #[error("Audio backend initialization failed: {0}")]
    BackendInitFailed(String),

    /// Backend used before initialization
    #[error("Audio backend not initialized")]
    BackendNotInitialized,

    /// Sound could not be decoded or queued
    #[error("Playback failed: {0}")]
    PlaybackFailed(String),

    /// Handle does not name an active sound
    #[error("Invalid sound handle")]
    InvalidHandle,

    /// Sound file could not be read
    #[error("Failed to read sound file: {0}")]
    Io(#[from] std::io::Error),
}

/// Encoded sound bytes (WAV, OGG, MP3 or FLAC), cheap to clone
#[derive(Debug, Clone)]
pub struct SoundBuffer {
    name: Arc<str>,
    bytes: Arc<[u8]>,
}

impl SoundBuffer {
    /// Wrap bytes already in memory
    pub fn from_bytes(name: impl Into<Arc<str>>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a whole file into a buffer
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, AudioError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        Ok(Self::from_bytes(path.display().to_string(), bytes))
    }

    /// Name used in log messages
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Encoded size in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the buffer holds no bytes
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl AsRef<[u8]> for SoundBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

/// Session audio: optional backend, click sound and background music
pub struct AudioSystem {
    backend: Option<Box<dyn AudioBackend>>,
    click: Option<SoundBuffer>,
    music: Option<SoundBuffer>,
    music_handle: Option<SoundHandle>,
    music_volume: f32,
    music_enabled: bool,
    hidden: bool,
}

impl AudioSystem {
    /// Audio system with no output; every playback request is skipped
    pub fn silent() -> Self {
        Self {
            backend: None,
            click: None,
            music: None,
            music_handle: None,
            music_volume: 0.4,
            music_enabled: false,
            hidden: false,
        }
    }

    /// Audio system playing through `backend`
    pub fn with_backend(backend: Box<dyn AudioBackend>) -> Self {
        Self {
            backend: Some(backend),
            ..Self::silent()
        }
    }

    /// Builder-style music volume
    pub fn with_music_volume(mut self, volume: f32) -> Self {
        self.music_volume = volume;
        self
    }

    /// Whether an output backend is attached
    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    /// Hand over the click sound once it has loaded
    pub fn set_click_sound(&mut self, sound: SoundBuffer) {
        log::debug!("Click sound '{}' ready ({} bytes)", sound.name(), sound.len());
        self.click = Some(sound);
    }

    /// Whether a click sound is loaded
    pub fn has_click_sound(&self) -> bool {
        self.click.is_some()
    }

    /// Play the click sound once at `volume`
    ///
    /// Returns `true` if playback started. A missing buffer or backend is not
    /// an error; a backend failure is logged and swallowed because feedback
    /// sounds are best effort.
    pub fn play_click(&mut self, volume: f32) -> bool {
        let (Some(backend), Some(click)) = (self.backend.as_mut(), self.click.as_ref()) else {
            return false;
        };
        match backend.play(click, PlaybackOptions::once(volume)) {
            Ok(_) => true,
            Err(e) => {
                log::warn!("Click sound failed: {}", e);
                false
            }
        }
    }

    /// Hand over the background music once it has loaded
    ///
    /// Starts playing immediately if music is enabled and the view is visible.
    pub fn set_music(&mut self, music: SoundBuffer) -> Result<(), AudioError> {
        if let (Some(handle), Some(backend)) = (self.music_handle.take(), self.backend.as_mut()) {
            backend.stop(handle)?;
        }
        self.music = Some(music);
        self.sync_music()
    }

    /// Turn background music on or off
    pub fn set_music_enabled(&mut self, enabled: bool) -> Result<(), AudioError> {
        self.music_enabled = enabled;
        self.sync_music()
    }

    /// Whether music is switched on (it may still be paused while hidden)
    pub fn music_enabled(&self) -> bool {
        self.music_enabled
    }

    /// Pause music while the view is hidden and resume it afterwards
    pub fn on_visibility_changed(&mut self, hidden: bool) -> Result<(), AudioError> {
        self.hidden = hidden;
        self.sync_music()
    }

    /// Whether background music is audible right now
    pub fn is_music_playing(&self) -> bool {
        match (self.backend.as_ref(), self.music_handle) {
            (Some(backend), Some(handle)) => backend.is_playing(handle),
            _ => false,
        }
    }

    /// Per-frame housekeeping
    pub fn update(&mut self) {
        if let Some(backend) = self.backend.as_mut() {
            backend.update();
        }
    }

    /// Stop everything
    pub fn stop_all(&mut self) {
        if let Some(backend) = self.backend.as_mut() {
            backend.stop_all();
        }
        self.music_handle = None;
    }

    fn sync_music(&mut self) -> Result<(), AudioError> {
        let should_play = self.music_enabled && !self.hidden;
        let (Some(backend), Some(music)) = (self.backend.as_mut(), self.music.as_ref()) else {
            return Ok(());
        };

        match (self.music_handle, should_play) {
            (Some(handle), true) => backend.resume(handle),
            (Some(handle), false) => backend.pause(handle),
            (None, true) => {
                let handle = backend.play(music, PlaybackOptions::looped(self.music_volume))?;
                log::info!("Background music '{}' started", music.name());
                self.music_handle = Some(handle);
                Ok(())
            }
            (None, false) => Ok(()),
        }
    }
}

impl Default for AudioSystem {
    fn default() -> Self {
        Self::silent()
    }
}

impl std::fmt::Debug for AudioSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioSystem")
            .field("backend", &self.backend.is_some())
            .field("click", &self.click.as_ref().map(SoundBuffer::name))
            .field("music", &self.music.as_ref().map(SoundBuffer::name))
            .field("music_enabled", &self.music_enabled)
            .field("hidden", &self.hidden)
            .finish()
    }
}
