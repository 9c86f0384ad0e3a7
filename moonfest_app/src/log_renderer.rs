//! Renderer that describes frames in the log instead of drawing them

use moonfest_engine::render::{FrameView, RenderError, Renderer};

/// Logs a one-line frame summary every `interval` frames
#[derive(Debug)]
pub struct LogRenderer {
    interval: u64,
    frames: u64,
}

impl LogRenderer {
    /// Summarize every `interval`th frame (0 is treated as 1)
    pub fn new(interval: u64) -> Self {
        Self {
            interval: interval.max(1),
            frames: 0,
        }
    }

    /// Frames submitted so far
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Renderer for LogRenderer {
    fn render(&mut self, view: &FrameView<'_>) -> Result<(), RenderError> {
        self.frames += 1;
        if view.frame % self.interval != 0 {
            return Ok(());
        }

        let visible = view
            .scene
            .iter()
            .filter(|(id, _)| view.scene.is_effectively_visible(*id))
            .count();
        let glowing = view
            .particles
            .iter()
            .filter(|particle| particle.opacity > 0.0)
            .count();
        log::info!(
            "frame {:>5} t={:>7.3}s  nodes {}/{}  particles {}/{}  camera ({:.1}, {:.1}, {:.1})",
            view.frame,
            view.elapsed,
            visible,
            view.scene.len(),
            glowing,
            view.particles.len(),
            view.camera.position.x,
            view.camera.position.y,
            view.camera.position.z,
        );
        Ok(())
    }
}
