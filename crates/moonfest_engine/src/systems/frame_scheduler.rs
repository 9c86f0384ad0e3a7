//! Frame scheduler
//!
//! One [`FrameScheduler::tick`] per display refresh. A tick reads the session
//! clock once and derives everything from that single value:
//!
//! 1. idle bob/sway of every registered entity
//! 2. running click bounces (after idle, so a bounce owns its entity's Y)
//! 3. sky, stars and moon spins
//! 4. firework particles
//! 5. custom routines; a failing one is logged and skipped
//! 6. render submit
//!
//! Ticks never suspend. The caller waits for the next refresh.

use crate::animation::particles::Particle;
use crate::core::SceneContext;
use crate::foundation::time::{SessionClock, Stopwatch};
use crate::render::{FrameView, RenderError, Renderer};
use crate::scene::SceneError;
use thiserror::Error;

/// Errors that abort a tick
#[derive(Error, Debug)]
pub enum FrameError {
    /// An animated node vanished from the scene
    #[error("Scene update failed: {0}")]
    Scene(#[from] SceneError),

    /// The renderer rejected the frame
    #[error("Render submit failed: {0}")]
    Render(#[from] RenderError),
}

/// What happened during one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// Sequential frame index, starting at 0
    pub frame: u64,
    /// Session time the frame was computed for
    pub elapsed: f32,
    /// Seconds since the previous tick (0 on the first)
    pub frame_delta: f32,
    /// Bounces still running after this tick
    pub active_bounces: usize,
    /// Particles respawned this tick
    pub recycled_particles: usize,
    /// Custom routines that failed this tick
    pub failed_routines: usize,
    /// Wall time spent in the tick, in milliseconds
    pub cpu_millis: f32,
}

/// Drives all time-dependent state once per refresh
pub struct FrameScheduler {
    clock: Box<dyn SessionClock>,
    frame: u64,
    last_elapsed: Option<f32>,
}

impl FrameScheduler {
    /// Scheduler reading time from `clock`
    pub fn new(clock: Box<dyn SessionClock>) -> Self {
        Self {
            clock,
            frame: 0,
            last_elapsed: None,
        }
    }

    /// Current session time
    pub fn elapsed(&self) -> f32 {
        self.clock.elapsed()
    }

    /// Number of ticks completed
    pub fn frames(&self) -> u64 {
        self.frame
    }

    /// Advance every animated entity to the current session time and render
    pub fn tick(&mut self, ctx: &mut SceneContext, renderer: &mut dyn Renderer) -> Result<FrameReport, FrameError> {
        let stopwatch = Stopwatch::start_new();
        let elapsed = self.clock.elapsed();
        let frame_delta = self.last_elapsed.map_or(0.0, |last| (elapsed - last).max(0.0));

        ctx.idle.update(&mut ctx.scene, elapsed)?;
        let active_bounces = ctx.bounces.update(&mut ctx.scene, elapsed)?;
        ctx.spins.update(&mut ctx.scene, elapsed)?;
        let recycled_particles = ctx.particles.update(frame_delta);
        let failed_routines = ctx.routines.run(&mut ctx.scene, elapsed);
        ctx.audio.update();

        let particles: &[Particle] = ctx.particles.particles();
        renderer.render(&FrameView {
            frame: self.frame,
            elapsed,
            camera: &ctx.camera,
            scene: &ctx.scene,
            particles,
        })?;

        let report = FrameReport {
            frame: self.frame,
            elapsed,
            frame_delta,
            active_bounces,
            recycled_particles,
            failed_routines,
            cpu_millis: stopwatch.elapsed_millis(),
        };
        log::trace!(
            "Frame {} at {:.3}s: {} bounces, {} recycled, {} failed routines",
            report.frame,
            report.elapsed,
            report.active_bounces,
            report.recycled_particles,
            report.failed_routines
        );

        self.frame += 1;
        self.last_elapsed = Some(elapsed);
        Ok(report)
    }
}

impl std::fmt::Debug for FrameScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameScheduler")
            .field("frame", &self.frame)
            .field("last_elapsed", &self.last_elapsed)
            .finish_non_exhaustive()
    }
}
