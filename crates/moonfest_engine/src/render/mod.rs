//! Render boundary
//!
//! The engine never draws. Once per frame it hands a [`FrameView`] to a
//! [`Renderer`] supplied by the host (a GPU backend, a recorder in tests, a
//! logger in the headless demo).

pub mod camera;
pub mod material;

pub use camera::Camera;
pub use material::{Color, Material};

use crate::animation::particles::Particle;
use crate::scene::SceneGraph;
use thiserror::Error;

/// Everything a renderer needs to draw one frame
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    /// Sequential frame index, starting at 0
    pub frame: u64,
    /// Session time the frame was computed for
    pub elapsed: f32,
    /// Active camera
    pub camera: &'a Camera,
    /// Scene with this frame's transforms and materials
    pub scene: &'a SceneGraph,
    /// Firework particles
    pub particles: &'a [Particle],
}

/// Draws frames
pub trait Renderer {
    /// Submit one frame
    fn render(&mut self, view: &FrameView<'_>) -> Result<(), RenderError>;
}

/// Rendering errors
#[derive(Error, Debug)]
pub enum RenderError {
    /// Output surface went away (window closed, device lost)
    #[error("Render surface lost: {0}")]
    SurfaceLost(String),

    /// Backend specific failure
    #[error("Render backend error: {0}")]
    Backend(String),
}
