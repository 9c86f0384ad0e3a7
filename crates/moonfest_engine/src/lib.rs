//! # Moonfest Engine
//!
//! The frame core of an interactive night-festival scene: lanterns that bob
//! and sway, a slowly turning sky, drifting firework particles, and lanterns
//! that hop and flash when clicked.
//!
//! ## Features
//!
//! - **Frame scheduler**: one tick per refresh, every pose derived from session time
//! - **Pointer picking**: click → camera ray → nearest interactive owner → feedback
//! - **Scene graph**: slotmap-keyed node tree with typed interactive tags
//! - **Audio**: click sound and looping music, rodio backend behind the `audio` feature
//! - **Config**: one TOML or RON file, every field optional
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use moonfest_engine::prelude::*;
//!
//! struct Host;
//!
//! impl FrameHost for Host {
//!     fn next_frame(&mut self) -> Option<Vec<HostEvent>> {
//!         // Wait for vsync, gather input
//!         Some(Vec::new())
//!     }
//! }
//!
//! struct NullRenderer;
//!
//! impl Renderer for NullRenderer {
//!     fn render(&mut self, _view: &FrameView<'_>) -> Result<(), RenderError> {
//!         Ok(())
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut engine = Engine::new(SceneConfig::default(), Box::new(MonotonicClock::start()))?;
//!     let lantern = engine.context_mut().scene.add_root(Node::new("lantern").at(Vec3::new(2.0, 4.0, 0.0)));
//!     engine.context_mut().animate_idle(lantern)?;
//!     engine.run(&mut Host, &mut NullRenderer)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod core;

pub mod animation;
pub mod audio;
pub mod config;
pub mod foundation;
pub mod input;
pub mod physics;
pub mod render;
pub mod scene;
pub mod systems;

mod application;
mod engine;

#[cfg(test)]
mod engine_tests;

pub use application::{FrameHost, HostEvent};
pub use engine::{Engine, EngineError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        Engine, EngineError, FrameHost, HostEvent,
        animation::{SpinKind, UpdateError},
        audio::{AudioSystem, SoundBuffer},
        config::Config,
        core::{config::SceneConfig, SceneContext},
        foundation::{
            math::{Vec3, Mat4, Transform},
            time::{ManualClock, MonotonicClock, SessionClock},
        },
        input::PointerEvent,
        render::{Camera, Color, FrameView, Material, RenderError, Renderer},
        scene::{Node, NodeId, SceneGraph, AABB},
        systems::{FrameReport, PickOutcome},
    };
}
