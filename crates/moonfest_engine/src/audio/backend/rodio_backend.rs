//! Rodio audio backend implementation
//!
//! Uses the Rodio library for cross-platform audio playback.
//! Rodio is pure Rust and supports WAV, OGG Vorbis, MP3, and FLAC formats.
//!
//! # Example
//!
//! ```no_run
//! use moonfest_engine::audio::SoundBuffer;
//! use moonfest_engine::audio::backend::{AudioBackend, PlaybackOptions};
//! use moonfest_engine::audio::backend::rodio_backend::RodioBackend;
//!
//! let mut backend = RodioBackend::new();
//! backend.initialize().unwrap();
//!
//! let ding = SoundBuffer::from_file("sounds/ding.ogg").unwrap();
//! let handle = backend.play(&ding, PlaybackOptions::once(0.3)).unwrap();
//!
//! if backend.is_playing(handle) {
//!     println!("Sound is playing!");
//! }
//!
//! backend.update(); // Removes finished sounds
//! backend.shutdown();
//! ```

use super::{AudioBackend, PlaybackOptions, SoundHandle};
use crate::audio::{AudioError, SoundBuffer};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::collections::HashMap;
use std::io::Cursor;

/// Rodio-based audio backend
pub struct RodioBackend {
    /// Audio output stream (must be kept alive)
    _output_stream: Option<OutputStream>,
    /// Output stream handle for creating sinks
    stream_handle: Option<OutputStreamHandle>,
    /// Active sound sinks
    active_sounds: HashMap<SoundHandle, Sink>,
    /// Next sound ID for handle generation
    next_id: u32,
}

impl RodioBackend {
    /// Create an uninitialized backend
    pub fn new() -> Self {
        Self {
            _output_stream: None,
            stream_handle: None,
            active_sounds: HashMap::new(),
            next_id: 0,
        }
    }

    /// Open the default output device
    ///
    /// # Errors
    /// - `BackendInitFailed` if no output device is available
    pub fn initialize(&mut self) -> Result<(), AudioError> {
        if self.is_initialized() {
            return Ok(());
        }

        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| AudioError::BackendInitFailed(format!("Failed to create audio output: {}", e)))?;

        self._output_stream = Some(stream);
        self.stream_handle = Some(stream_handle);

        log::info!("Rodio audio backend initialized");
        Ok(())
    }

    /// Stop everything and release the output device
    pub fn shutdown(&mut self) {
        if !self.is_initialized() {
            return;
        }
        self.stop_all();
        self.stream_handle = None;
        self._output_stream = None;
        log::info!("Rodio audio backend shutdown");
    }

    /// Check if backend is initialized
    pub fn is_initialized(&self) -> bool {
        self.stream_handle.is_some()
    }

    /// Generate a new sound handle
    fn next_handle(&mut self) -> SoundHandle {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        SoundHandle::new(id)
    }

    fn sink(&self, handle: SoundHandle) -> Result<&Sink, AudioError> {
        self.active_sounds.get(&handle).ok_or(AudioError::InvalidHandle)
    }
}

impl AudioBackend for RodioBackend {
    fn play(&mut self, sound: &SoundBuffer, options: PlaybackOptions) -> Result<SoundHandle, AudioError> {
        let stream_handle = self.stream_handle.as_ref()
            .ok_or(AudioError::BackendNotInitialized)?;

        let sink = Sink::try_new(stream_handle)
            .map_err(|e| AudioError::PlaybackFailed(format!("Failed to create sink: {}", e)))?;

        // Buffers share their bytes, so decoding from a cursor does not copy
        let source = Decoder::new(Cursor::new(sound.clone()))
            .map_err(|e| AudioError::PlaybackFailed(format!("Failed to decode '{}': {}", sound.name(), e)))?;

        sink.set_volume(options.volume);
        if options.looping {
            sink.append(source.repeat_infinite());
        } else {
            sink.append(source);
        }

        let handle = self.next_handle();
        self.active_sounds.insert(handle, sink);
        Ok(handle)
    }

    fn pause(&mut self, handle: SoundHandle) -> Result<(), AudioError> {
        self.sink(handle)?.pause();
        Ok(())
    }

    fn resume(&mut self, handle: SoundHandle) -> Result<(), AudioError> {
        self.sink(handle)?.play();
        Ok(())
    }

    fn stop(&mut self, handle: SoundHandle) -> Result<(), AudioError> {
        if let Some(sink) = self.active_sounds.remove(&handle) {
            sink.stop();
        }
        Ok(())
    }

    fn set_volume(&mut self, handle: SoundHandle, volume: f32) -> Result<(), AudioError> {
        self.sink(handle)?.set_volume(volume);
        Ok(())
    }

    fn is_playing(&self, handle: SoundHandle) -> bool {
        self.active_sounds.get(&handle)
            .is_some_and(|sink| !sink.is_paused() && !sink.empty())
    }

    fn update(&mut self) {
        // Paused sinks still hold queued audio, so only empty ones go
        self.active_sounds.retain(|_handle, sink| !sink.empty());
    }

    fn stop_all(&mut self) {
        for (_handle, sink) in self.active_sounds.drain() {
            sink.stop();
        }
    }
}

impl Default for RodioBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for RodioBackend {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_generation() {
        let mut backend = RodioBackend::new();
        let handle1 = backend.next_handle();
        let handle2 = backend.next_handle();

        assert_ne!(handle1.id, handle2.id);
    }

    #[test]
    fn test_playback_without_initialization() {
        let mut backend = RodioBackend::new();
        let dummy = SoundBuffer::from_bytes("dummy", vec![0u8; 100]);

        let result = backend.play(&dummy, PlaybackOptions::once(1.0));
        assert!(matches!(result, Err(AudioError::BackendNotInitialized)));
    }

    #[test]
    fn test_invalid_handle_operations() {
        let mut backend = RodioBackend::new();

        // May fail in CI/test environments without audio device
        if backend.initialize().is_ok() {
            let invalid_handle = SoundHandle::new(999);

            assert!(matches!(backend.pause(invalid_handle), Err(AudioError::InvalidHandle)));
            assert!(matches!(backend.resume(invalid_handle), Err(AudioError::InvalidHandle)));
            assert!(matches!(backend.set_volume(invalid_handle, 0.5), Err(AudioError::InvalidHandle)));
            assert!(backend.stop(invalid_handle).is_ok());
            assert!(!backend.is_playing(invalid_handle));

            backend.shutdown();
            assert!(!backend.is_initialized());
        }
    }

    #[test]
    fn test_undecodable_buffer_is_playback_error() {
        let mut backend = RodioBackend::new();

        if backend.initialize().is_ok() {
            let garbage = SoundBuffer::from_bytes("garbage", vec![7u8; 64]);
            let result = backend.play(&garbage, PlaybackOptions::once(0.3));
            assert!(matches!(result, Err(AudioError::PlaybackFailed(_))));
        }
    }
}
