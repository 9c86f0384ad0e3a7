//! Pointer picking
//!
//! Turns a click into feedback on the lantern under the pointer:
//! pixels → NDC → camera ray → nearest hits → owning interactive node → click
//! sound, highlight flash and bounce.
//!
//! Hits are visited nearest first and the first one with an interactive owner
//! wins. A click that resolves to nothing changes nothing and makes no sound.

use crate::animation::BounceAnimation;
use crate::core::config::InteractionConfig;
use crate::core::SceneContext;
use crate::input::PointerEvent;
use crate::physics::collision::Ray;
use crate::render::Camera;
use crate::scene::{NodeId, SceneError, SceneGraph};

/// Result of handling one click
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PickOutcome {
    /// The pointer could not be turned into a ray (zero viewport, degenerate camera)
    Ignored,
    /// No interactive entity under the pointer
    Missed,
    /// An interactive entity was clicked
    Picked {
        /// Interactive entity that reacted
        node: NodeId,
        /// The bounce now running on it
        bounce: BounceAnimation,
        /// Whether the click sound started
        sound_played: bool,
    },
}

impl PickOutcome {
    /// Clicked entity, if any
    pub fn node(&self) -> Option<NodeId> {
        match self {
            Self::Picked { node, .. } => Some(*node),
            _ => None,
        }
    }
}

/// Click handling
#[derive(Debug, Clone, Default)]
pub struct PickingSystem {
    config: InteractionConfig,
}

impl PickingSystem {
    /// Picking with the given feedback settings
    pub fn new(config: InteractionConfig) -> Self {
        Self { config }
    }

    /// Feedback settings in use
    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    /// World ray under the pointer
    pub fn ray_for(camera: &Camera, event: &PointerEvent) -> Option<Ray> {
        let (ndc_x, ndc_y) = event.to_ndc()?;
        camera.screen_to_world_ray(ndc_x, ndc_y)
    }

    /// First interactive owner along `ray`, nearest hit first
    pub fn resolve(scene: &SceneGraph, ray: &Ray) -> Option<NodeId> {
        scene
            .ray_cast(ray)
            .iter()
            .find_map(|hit| scene.resolve_interactive(hit.node))
    }

    /// React to a click at session time `now`
    pub fn handle_click(
        &self,
        ctx: &mut SceneContext,
        event: &PointerEvent,
        now: f32,
    ) -> Result<PickOutcome, SceneError> {
        let Some(ray) = Self::ray_for(&ctx.camera, event) else {
            log::debug!("Click at ({}, {}) ignored: no ray", event.screen_x, event.screen_y);
            return Ok(PickOutcome::Ignored);
        };

        let Some(node) = Self::resolve(&ctx.scene, &ray) else {
            log::debug!("Click at ({}, {}) hit nothing interactive", event.screen_x, event.screen_y);
            return Ok(PickOutcome::Missed);
        };

        let sound_played = ctx.audio.play_click(self.config.click_volume);
        let bounce = ctx.bounces.start(&mut ctx.scene, node, now, &self.config)?;
        log::debug!(
            "Picked '{}' at {:.3}s (sound: {})",
            ctx.scene.node(node)?.name,
            now,
            sound_played
        );

        Ok(PickOutcome::Picked {
            node,
            bounce,
            sound_played,
        })
    }
}
