//! Continuous rotation of the sky backdrop, starfield and moon

use crate::core::config::SpinConfig;
use crate::scene::{NodeFlags, NodeId, SceneError, SceneGraph};

/// Which singleton a spin drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpinKind {
    /// Sky dome
    Sky,
    /// Starfield
    Stars,
    /// Moon group
    Moon,
}

impl SpinKind {
    /// Configured rate for this singleton
    pub fn rate(self, config: &SpinConfig) -> f32 {
        match self {
            Self::Sky => config.sky_rate,
            Self::Stars => config.stars_rate,
            Self::Moon => config.moon_rate,
        }
    }
}

/// A node rotating about Y at a constant rate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinEntity {
    /// Rotated node
    pub node: NodeId,
    /// Radians per second
    pub rate: f32,
}

impl SpinEntity {
    /// Yaw at time `t`
    pub fn angle(&self, t: f32) -> f32 {
        self.rate * t
    }
}

/// The three spinning singletons; each slot is optional
#[derive(Debug, Clone, Default)]
pub struct SpinSet {
    sky: Option<SpinEntity>,
    stars: Option<SpinEntity>,
    moon: Option<SpinEntity>,
}

impl SpinSet {
    /// Nothing spinning
    pub fn new() -> Self {
        Self::default()
    }

    /// Drive `node` as the given singleton, replacing any previous one
    pub fn attach(
        &mut self,
        scene: &mut SceneGraph,
        kind: SpinKind,
        node: NodeId,
        config: &SpinConfig,
    ) -> Result<(), SceneError> {
        scene.insert_flags(node, NodeFlags::ANIMATED)?;
        let entity = SpinEntity { node, rate: kind.rate(config) };
        if let Some(previous) = self.slot_mut(kind).replace(entity) {
            log::warn!("{:?} spin moved from {:?} to {:?}", kind, previous.node, node);
        }
        Ok(())
    }

    /// Spin of one singleton
    pub fn get(&self, kind: SpinKind) -> Option<&SpinEntity> {
        match kind {
            SpinKind::Sky => self.sky.as_ref(),
            SpinKind::Stars => self.stars.as_ref(),
            SpinKind::Moon => self.moon.as_ref(),
        }
    }

    /// Attached spins, sky first
    pub fn iter(&self) -> impl Iterator<Item = &SpinEntity> {
        [&self.sky, &self.stars, &self.moon].into_iter().flatten()
    }

    /// Set every attached node's yaw for time `t`
    pub fn update(&self, scene: &mut SceneGraph, t: f32) -> Result<(), SceneError> {
        for spin in self.iter() {
            scene.transform_mut(spin.node)?.rotation.y = spin.angle(t);
        }
        Ok(())
    }

    fn slot_mut(&mut self, kind: SpinKind) -> &mut Option<SpinEntity> {
        match kind {
            SpinKind::Sky => &mut self.sky,
            SpinKind::Stars => &mut self.stars,
            SpinKind::Moon => &mut self.moon,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Node;
    use approx::assert_relative_eq;

    #[test]
    fn test_rates_are_distinct_per_singleton() {
        let mut scene = SceneGraph::new();
        let sky = scene.add_root(Node::new("sky"));
        let stars = scene.add_root(Node::new("stars"));
        let moon = scene.add_root(Node::new("moon"));
        let config = SpinConfig::default();

        let mut spins = SpinSet::new();
        spins.attach(&mut scene, SpinKind::Sky, sky, &config).unwrap();
        spins.attach(&mut scene, SpinKind::Stars, stars, &config).unwrap();
        spins.attach(&mut scene, SpinKind::Moon, moon, &config).unwrap();
        spins.update(&mut scene, 100.0).unwrap();

        assert_relative_eq!(scene.node(sky).unwrap().transform.rotation.y, 0.2, epsilon = 1e-6);
        assert_relative_eq!(scene.node(stars).unwrap().transform.rotation.y, 1.0, epsilon = 1e-6);
        assert_relative_eq!(scene.node(moon).unwrap().transform.rotation.y, 5.0, epsilon = 1e-6);
    }

    #[test]
    fn test_missing_singletons_are_skipped() {
        let mut scene = SceneGraph::new();
        let moon = scene.add_root(Node::new("moon"));
        let mut spins = SpinSet::new();
        spins.attach(&mut scene, SpinKind::Moon, moon, &SpinConfig::default()).unwrap();

        assert_eq!(spins.iter().count(), 1);
        assert!(spins.get(SpinKind::Sky).is_none());
        spins.update(&mut scene, 2.0).unwrap();
    }

    #[test]
    fn test_reattach_replaces_slot() {
        let mut scene = SceneGraph::new();
        let first = scene.add_root(Node::new("moon-a"));
        let second = scene.add_root(Node::new("moon-b"));
        let config = SpinConfig::default();
        let mut spins = SpinSet::new();

        spins.attach(&mut scene, SpinKind::Moon, first, &config).unwrap();
        spins.attach(&mut scene, SpinKind::Moon, second, &config).unwrap();

        assert_eq!(spins.get(SpinKind::Moon).unwrap().node, second);
        assert_eq!(spins.iter().count(), 1);
    }
}
