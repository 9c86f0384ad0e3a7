//! Core engine implementation

use crate::{
    application::{FrameHost, HostEvent},
    config::ConfigError,
    core::{config::SceneConfig, SceneContext},
    foundation::time::SessionClock,
    input::PointerEvent,
    render::{RenderError, Renderer},
    scene::SceneError,
    systems::{FrameError, FrameReport, FrameScheduler, PickOutcome, PickingSystem},
};
use thiserror::Error;

/// Main engine struct
///
/// Owns the session context and the two systems that act on it, and runs the
/// per-refresh loop against a [`FrameHost`].
#[derive(Debug)]
pub struct Engine {
    context: SceneContext,
    scheduler: FrameScheduler,
    picking: PickingSystem,
    running: bool,
}

impl Engine {
    /// Create an engine with an empty scene
    ///
    /// The configuration is validated first; time is read from `clock`.
    pub fn new(config: SceneConfig, clock: Box<dyn SessionClock>) -> Result<Self, EngineError> {
        let picking = PickingSystem::new(config.interaction.clone());
        let context = SceneContext::new(config)?;
        log::info!("Initializing engine...");

        Ok(Self {
            context,
            scheduler: FrameScheduler::new(clock),
            picking,
            running: true,
        })
    }

    /// Run until the host shuts down or a close is requested
    ///
    /// Returns the number of frames rendered.
    pub fn run<H: FrameHost + ?Sized>(&mut self, host: &mut H, renderer: &mut dyn Renderer) -> Result<u64, EngineError> {
        log::info!("Starting main loop...");
        let start_frame = self.scheduler.frames();

        while self.running {
            let Some(events) = host.next_frame() else {
                log::info!("Host closed");
                break;
            };
            for event in events {
                self.handle_event(event)?;
            }
            if !self.running {
                break;
            }
            self.tick(renderer)?;
        }

        self.running = false;
        self.context.audio.stop_all();
        let frames = self.scheduler.frames() - start_frame;
        log::info!("Engine shutdown complete after {} frames", frames);
        Ok(frames)
    }

    /// Advance one frame and render it
    pub fn tick(&mut self, renderer: &mut dyn Renderer) -> Result<FrameReport, EngineError> {
        Ok(self.scheduler.tick(&mut self.context, renderer)?)
    }

    /// Handle a host event
    pub fn handle_event(&mut self, event: HostEvent) -> Result<(), EngineError> {
        match event {
            HostEvent::Click(pointer) => {
                self.click(&pointer)?;
            }
            HostEvent::VisibilityChanged { hidden } => {
                log::debug!("View {}", if hidden { "hidden" } else { "visible" });
                if let Err(e) = self.context.audio.on_visibility_changed(hidden) {
                    log::warn!("Background music did not follow visibility change: {}", e);
                }
            }
            HostEvent::CloseRequested => self.quit(),
        }
        Ok(())
    }

    /// React to a click at the current session time
    pub fn click(&mut self, pointer: &PointerEvent) -> Result<PickOutcome, EngineError> {
        let now = self.scheduler.elapsed();
        Ok(self.picking.handle_click(&mut self.context, pointer, now)?)
    }

    /// Request engine shutdown
    pub fn quit(&mut self) {
        log::info!("Engine shutdown requested");
        self.running = false;
    }

    /// Whether the main loop should keep going
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Session state
    pub fn context(&self) -> &SceneContext {
        &self.context
    }

    /// Mutable session state, for building the scene
    pub fn context_mut(&mut self) -> &mut SceneContext {
        &mut self.context
    }

    /// Current session time
    pub fn elapsed(&self) -> f32 {
        self.scheduler.elapsed()
    }

    /// Frames rendered so far
    pub fn frames(&self) -> u64 {
        self.scheduler.frames()
    }
}

/// Engine-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Configuration rejected
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Scene lookup failed
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// Rendering failed
    #[error("Rendering error: {0}")]
    Render(#[from] RenderError),
}

impl From<FrameError> for EngineError {
    fn from(error: FrameError) -> Self {
        match error {
            FrameError::Scene(e) => Self::Scene(e),
            FrameError::Render(e) => Self::Render(e),
        }
    }
}
