//! Click feedback: one sine hop plus a colour flash
//!
//! A bounce lifts an interactive entity through one full sine period above
//! its baseline while the entity's highlight part glows in the flash colour.
//! When progress reaches 1 the entity is snapped back to the baseline and the
//! highlight gets back the exact colour and emissive it had before the first
//! click.

use crate::core::config::InteractionConfig;
use crate::foundation::math::constants::TAU;
use crate::render::material::Color;
use crate::scene::{NodeId, SceneError, SceneGraph};

/// One running bounce
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BounceAnimation {
    /// Interactive entity being moved
    pub node: NodeId,
    /// Part whose material flashes
    pub highlight: NodeId,
    /// Session time the bounce (re)started
    pub start: f32,
    /// Length in seconds
    pub duration: f32,
    /// Peak displacement
    pub height: f32,
    /// Vertical rest position
    pub baseline_y: f32,
    /// Highlight colour before the flash
    pub original_color: Color,
    /// Highlight emissive before the flash
    pub original_emissive: Color,
}

impl BounceAnimation {
    /// Fraction of the bounce completed at `now`, clamped to [0, 1]
    pub fn progress(&self, now: f32) -> f32 {
        ((now - self.start) / self.duration).clamp(0.0, 1.0)
    }

    /// Offset above the baseline at `progress`; exactly 0 once finished
    pub fn displacement(&self, progress: f32) -> f32 {
        if progress >= 1.0 {
            0.0
        } else {
            (progress * TAU).sin() * self.height
        }
    }

    /// Whether the bounce has run its course at `now`
    pub fn is_finished(&self, now: f32) -> bool {
        self.progress(now) >= 1.0
    }
}

/// Active bounces, at most one per entity
#[derive(Debug, Clone, Default)]
pub struct BounceTracker {
    active: Vec<BounceAnimation>,
}

impl BounceTracker {
    /// No bounces
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of running bounces
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// Whether nothing is bouncing
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Running bounce of `node`
    pub fn get(&self, node: NodeId) -> Option<&BounceAnimation> {
        self.active.iter().find(|bounce| bounce.node == node)
    }

    /// Whether `node` is bouncing
    pub fn is_active(&self, node: NodeId) -> bool {
        self.get(node).is_some()
    }

    /// Start (or restart) the bounce of an interactive entity at `now`
    ///
    /// A restart keeps the colours recorded by the first click, because by
    /// then the highlight already shows the flash colour. The first frame is
    /// applied before returning.
    pub fn start(
        &mut self,
        scene: &mut SceneGraph,
        node: NodeId,
        now: f32,
        config: &InteractionConfig,
    ) -> Result<BounceAnimation, SceneError> {
        let tag = match scene.interactive(node) {
            Some(tag) => *tag,
            None => return Err(SceneError::NotInteractive(scene.node(node)?.name.clone())),
        };

        let flash = Color::from_hex(config.flash_color);
        let material = scene.material_mut(tag.highlight)?;

        let bounce = match self.active.iter_mut().find(|bounce| bounce.node == node) {
            Some(running) => {
                log::debug!("Restarting bounce of {:?}", node);
                running.start = now;
                *running
            }
            None => {
                let bounce = BounceAnimation {
                    node,
                    highlight: tag.highlight,
                    start: now,
                    duration: config.bounce_duration_secs(),
                    height: config.bounce_height,
                    baseline_y: tag.baseline_y,
                    original_color: material.color,
                    original_emissive: material.emissive,
                };
                self.active.push(bounce);
                bounce
            }
        };

        material.color = flash;
        material.emissive = flash;
        Self::apply(scene, &bounce, now)?;
        Ok(bounce)
    }

    /// Advance every bounce to `now`, finishing the ones that are done
    ///
    /// Returns how many are still running.
    pub fn update(&mut self, scene: &mut SceneGraph, now: f32) -> Result<usize, SceneError> {
        for bounce in &self.active {
            Self::apply(scene, bounce, now)?;
        }
        self.active.retain(|bounce| !bounce.is_finished(now));
        Ok(self.active.len())
    }

    fn apply(scene: &mut SceneGraph, bounce: &BounceAnimation, now: f32) -> Result<(), SceneError> {
        let progress = bounce.progress(now);
        scene.transform_mut(bounce.node)?.position.y = bounce.baseline_y + bounce.displacement(progress);

        if progress >= 1.0 {
            let material = scene.material_mut(bounce.highlight)?;
            material.color = bounce.original_color;
            material.emissive = bounce.original_emissive;
            log::trace!("Bounce of {:?} finished", bounce.node);
        }
        Ok(())
    }
}
