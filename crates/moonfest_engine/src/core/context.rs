//! Session state shared by the frame scheduler and the picking system
//!
//! Everything a running scene needs lives in one [`SceneContext`], owned by
//! the engine and lent out to each system for the duration of a call.

use crate::animation::{BounceTracker, IdleAnimator, ParticleSystem, SpinKind, SpinSet, UpdateError, UpdateRegistry};
use crate::audio::{AudioError, AudioSystem};
use crate::core::config::{ConfigError, SceneConfig};
use crate::foundation::math::Transform;
use crate::render::Camera;
use crate::scene::{NodeId, SceneError, SceneGraph};

/// Scene, camera, animation state and audio of one session
#[derive(Debug)]
pub struct SceneContext {
    /// Session settings
    pub config: SceneConfig,
    /// Node tree
    pub scene: SceneGraph,
    /// Active camera
    pub camera: Camera,
    /// Lantern bob/sway
    pub idle: IdleAnimator,
    /// Sky, stars and moon rotation
    pub spins: SpinSet,
    /// Running click bounces
    pub bounces: BounceTracker,
    /// Firework particles
    pub particles: ParticleSystem,
    /// Custom per-entity routines
    pub routines: UpdateRegistry,
    /// Click sound and background music
    pub audio: AudioSystem,
}

impl SceneContext {
    /// Empty scene set up from `config`, with silent audio
    ///
    /// The configuration is validated first; particles are spawned from it
    /// straight away.
    pub fn new(config: SceneConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            scene: SceneGraph::new(),
            camera: Camera::from_config(&config.camera),
            idle: IdleAnimator::new(config.idle.clone()),
            spins: SpinSet::new(),
            bounces: BounceTracker::new(),
            particles: ParticleSystem::new(config.particles.clone()),
            routines: UpdateRegistry::new(),
            audio: AudioSystem::silent().with_music_volume(config.audio.music_volume),
            config,
        })
    }

    /// Swap in a different audio system, applying the configured music settings
    pub fn set_audio(&mut self, audio: AudioSystem) -> Result<(), AudioError> {
        self.audio = audio.with_music_volume(self.config.audio.music_volume);
        self.audio.set_music_enabled(self.config.audio.music_enabled)
    }

    /// Bob and sway `node`, phased by registration order
    pub fn animate_idle(&mut self, node: NodeId) -> Result<usize, SceneError> {
        self.idle.register(&mut self.scene, node)
    }

    /// Spin `node` as the sky, starfield or moon
    pub fn attach_spin(&mut self, kind: SpinKind, node: NodeId) -> Result<(), SceneError> {
        self.spins.attach(&mut self.scene, kind, node, &self.config.spin)
    }

    /// Run `routine` for `node` every tick
    pub fn add_routine<F>(&mut self, node: NodeId, routine: F) -> Result<(), SceneError>
    where
        F: FnMut(&mut Transform, f32) -> Result<(), UpdateError> + 'static,
    {
        self.routines.register(&mut self.scene, node, routine)
    }
}
