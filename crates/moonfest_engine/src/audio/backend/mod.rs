//! Audio backend implementations
//!
//! Platform-independent abstraction over audio playback libraries.
//!
//! # Threading
//! Backends are not `Send + Sync`; they live on the frame thread next to the
//! rest of the session state.

#[cfg(feature = "audio")]
pub mod rodio_backend;

use crate::audio::{AudioError, SoundBuffer};

/// Sound handle for tracking active sounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SoundHandle {
    /// Unique identifier for the sound
    pub id: u32,
}

impl SoundHandle {
    /// Create a new sound handle
    pub fn new(id: u32) -> Self {
        Self { id }
    }
}

/// How a sound should be played
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackOptions {
    /// 0.0 = silent, 1.0 = full volume
    pub volume: f32,
    /// Restart from the beginning when the end is reached
    pub looping: bool,
}

impl PlaybackOptions {
    /// Play once at the given volume
    pub fn once(volume: f32) -> Self {
        Self { volume, looping: false }
    }

    /// Loop forever at the given volume
    pub fn looped(volume: f32) -> Self {
        Self { volume, looping: true }
    }
}

/// Audio backend trait for platform abstraction
pub trait AudioBackend {
    /// Start playing a decoded-on-demand buffer
    fn play(&mut self, sound: &SoundBuffer, options: PlaybackOptions) -> Result<SoundHandle, AudioError>;

    /// Pause a playing sound
    fn pause(&mut self, handle: SoundHandle) -> Result<(), AudioError>;

    /// Resume a paused sound
    fn resume(&mut self, handle: SoundHandle) -> Result<(), AudioError>;

    /// Stop a sound; unknown handles are ignored
    fn stop(&mut self, handle: SoundHandle) -> Result<(), AudioError>;

    /// Set volume of a sound
    fn set_volume(&mut self, handle: SoundHandle, volume: f32) -> Result<(), AudioError>;

    /// Check if a sound is playing
    fn is_playing(&self, handle: SoundHandle) -> bool;

    /// Drop bookkeeping for sounds that finished
    fn update(&mut self);

    /// Stop all playing sounds
    fn stop_all(&mut self);
}

/// Create the default audio backend for the platform
#[cfg(feature = "audio")]
pub fn create_backend() -> Result<Box<dyn AudioBackend>, AudioError> {
    let mut backend = rodio_backend::RodioBackend::new();
    backend.initialize()?;
    Ok(Box::new(backend))
}
