//! Idle bob and sway
//!
//! Lanterns drift up and down and yaw gently around their rest pose. The
//! motion is a pure function of session time plus a per-entity phase, so
//! neighbouring lanterns never move in lockstep.

use crate::core::config::IdleAnimationConfig;
use crate::foundation::math::Transform;
use crate::scene::{NodeFlags, NodeId, SceneError, SceneGraph};

/// Idle motion parameters of one entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdleAnimation {
    /// Animated node
    pub node: NodeId,
    /// Rest height the bob oscillates around
    pub base_y: f32,
    /// Added to session time before evaluating the waves
    pub phase: f32,
    /// Peak vertical offset
    pub bob_amplitude: f32,
    /// Angular frequency of the bob
    pub bob_frequency: f32,
    /// Peak yaw in radians
    pub sway_amplitude: f32,
    /// Angular frequency of the sway
    pub sway_frequency: f32,
}

impl IdleAnimation {
    /// Parameters from config for a node resting at `base_y`
    pub fn new(node: NodeId, base_y: f32, phase: f32, config: &IdleAnimationConfig) -> Self {
        Self {
            node,
            base_y,
            phase,
            bob_amplitude: config.bob_amplitude,
            bob_frequency: config.bob_frequency,
            sway_amplitude: config.sway_amplitude,
            sway_frequency: config.sway_frequency,
        }
    }

    /// Vertical offset from the rest height at time `t`
    pub fn bob_offset(&self, t: f32) -> f32 {
        self.bob_amplitude * ((t + self.phase) * self.bob_frequency).sin()
    }

    /// Yaw in radians at time `t`
    pub fn sway(&self, t: f32) -> f32 {
        self.sway_amplitude * ((t + self.phase) * self.sway_frequency).sin()
    }

    /// Write this entity's pose at `t` into its transform
    pub fn apply(&self, transform: &mut Transform, t: f32) {
        transform.position.y = self.base_y + self.bob_offset(t);
        transform.rotation.y = self.sway(t);
    }
}

/// Ordered set of idly animated entities
#[derive(Debug, Clone, Default)]
pub struct IdleAnimator {
    config: IdleAnimationConfig,
    entities: Vec<IdleAnimation>,
}

impl IdleAnimator {
    /// Empty animator using `config` for every entity registered later
    pub fn new(config: IdleAnimationConfig) -> Self {
        Self {
            config,
            entities: Vec::new(),
        }
    }

    /// Animate `node`, phased by its registration index
    ///
    /// The node's current local Y becomes its rest height.
    pub fn register(&mut self, scene: &mut SceneGraph, node: NodeId) -> Result<usize, SceneError> {
        let phase = self.entities.len() as f32 * self.config.phase_step;
        self.register_with_phase(scene, node, phase)
    }

    /// Animate `node` with an explicit phase
    pub fn register_with_phase(
        &mut self,
        scene: &mut SceneGraph,
        node: NodeId,
        phase: f32,
    ) -> Result<usize, SceneError> {
        let base_y = scene.node(node)?.transform.position.y;
        scene.insert_flags(node, NodeFlags::ANIMATED)?;
        self.entities.push(IdleAnimation::new(node, base_y, phase, &self.config));
        Ok(self.entities.len() - 1)
    }

    /// Number of animated entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether nothing is animated
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Entities in update order
    pub fn iter(&self) -> impl Iterator<Item = &IdleAnimation> {
        self.entities.iter()
    }

    /// Animation of a specific node
    pub fn get(&self, node: NodeId) -> Option<&IdleAnimation> {
        self.entities.iter().find(|entity| entity.node == node)
    }

    /// Pose every entity for time `t`
    pub fn update(&self, scene: &mut SceneGraph, t: f32) -> Result<(), SceneError> {
        for entity in &self.entities {
            entity.apply(scene.transform_mut(entity.node)?, t);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::scene::Node;
    use approx::assert_relative_eq;

    #[test]
    fn test_unit_frequency_is_plain_sine() {
        let mut scene = SceneGraph::new();
        let node = scene.add_root(Node::new("lantern"));
        let config = IdleAnimationConfig {
            bob_frequency: 1.0,
            ..Default::default()
        };
        let idle = IdleAnimation::new(node, 0.0, 2.0, &config);

        for t in [0.0_f32, 0.25, 1.0, 7.5] {
            assert_relative_eq!(idle.bob_offset(t), 0.1 * (t + 2.0).sin());
        }
    }

    #[test]
    fn test_phase_follows_registration_order() {
        let mut scene = SceneGraph::new();
        let a = scene.add_root(Node::new("a").at(Vec3::new(0.0, 4.0, 0.0)));
        let b = scene.add_root(Node::new("b").at(Vec3::new(3.0, 3.5, 0.0)));
        let mut animator = IdleAnimator::new(IdleAnimationConfig::default());

        assert_eq!(animator.register(&mut scene, a).unwrap(), 0);
        assert_eq!(animator.register(&mut scene, b).unwrap(), 1);

        let phases: Vec<f32> = animator.iter().map(|e| e.phase).collect();
        assert_eq!(phases, vec![0.0, 1.0]);
        assert_eq!(animator.get(b).unwrap().base_y, 3.5);
        assert!(scene.node(a).unwrap().flags().contains(NodeFlags::ANIMATED));
    }

    #[test]
    fn test_update_is_pure_function_of_time() {
        let mut scene = SceneGraph::new();
        let node = scene.add_root(Node::new("lantern").at(Vec3::new(1.0, 4.0, -2.0)));
        let mut animator = IdleAnimator::new(IdleAnimationConfig::default());
        animator.register_with_phase(&mut scene, node, 3.0).unwrap();

        animator.update(&mut scene, 10.0).unwrap();
        let first = scene.node(node).unwrap().transform;
        animator.update(&mut scene, 42.0).unwrap();
        animator.update(&mut scene, 10.0).unwrap();
        let again = scene.node(node).unwrap().transform;

        assert_eq!(first, again);
        assert_relative_eq!(first.position.y, 4.0 + 0.1 * (13.0_f32 * 0.8).sin());
        assert_relative_eq!(first.rotation.y, 0.1 * (13.0_f32 * 0.5).sin());
        assert_eq!(first.position.x, 1.0);
    }
}
