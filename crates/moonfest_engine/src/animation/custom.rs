//! Per-entity custom update routines
//!
//! Some entities move in ways the idle animator does not cover (the dancer
//! figure hopping in place, for example). They register a routine here,
//! keyed by their node. A routine only ever sees its own node's transform
//! and the elapsed session time.
//!
//! A routine that fails is logged and skipped for that tick; the others still
//! run. The first failure of a node is a warning, repeats drop to debug level
//! so a broken routine cannot flood the log at refresh rate.

use crate::foundation::math::Transform;
use crate::scene::{NodeFlags, NodeId, SceneError, SceneGraph};
use thiserror::Error;

/// Errors a custom routine can report
#[derive(Error, Debug)]
pub enum UpdateError {
    /// Routine specific failure
    #[error("{0}")]
    Failed(String),

    /// Scene lookup failed
    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// Routine driving one node: gets the node's transform and elapsed seconds
pub type UpdateRoutine = Box<dyn FnMut(&mut Transform, f32) -> Result<(), UpdateError>>;

struct Registration {
    node: NodeId,
    routine: UpdateRoutine,
    failures: u32,
}

/// Routines run every tick, in registration order
#[derive(Default)]
pub struct UpdateRegistry {
    routines: Vec<Registration>,
}

impl UpdateRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `routine` for `node` every tick
    pub fn register<F>(&mut self, scene: &mut SceneGraph, node: NodeId, routine: F) -> Result<(), SceneError>
    where
        F: FnMut(&mut Transform, f32) -> Result<(), UpdateError> + 'static,
    {
        scene.insert_flags(node, NodeFlags::ANIMATED)?;
        self.routines.push(Registration {
            node,
            routine: Box::new(routine),
            failures: 0,
        });
        Ok(())
    }

    /// Number of registered routines
    pub fn len(&self) -> usize {
        self.routines.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.routines.is_empty()
    }

    /// Total failures recorded for `node`
    pub fn failures(&self, node: NodeId) -> u32 {
        self.routines
            .iter()
            .filter(|registration| registration.node == node)
            .map(|registration| registration.failures)
            .sum()
    }

    /// Run every routine for time `t`; returns how many failed
    pub fn run(&mut self, scene: &mut SceneGraph, t: f32) -> usize {
        let mut failed = 0;
        for registration in &mut self.routines {
            let result = scene
                .transform_mut(registration.node)
                .map_err(UpdateError::from)
                .and_then(|transform| (registration.routine)(transform, t));

            if let Err(e) = result {
                failed += 1;
                registration.failures = registration.failures.saturating_add(1);
                let name = scene
                    .node(registration.node)
                    .map_or_else(|_| format!("{:?}", registration.node), |node| node.name.clone());
                if registration.failures == 1 {
                    log::warn!("Update routine for '{}' failed: {}", name, e);
                } else {
                    log::debug!("Update routine for '{}' failed again ({}x): {}", name, registration.failures, e);
                }
            }
        }
        failed
    }
}

impl std::fmt::Debug for UpdateRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateRegistry")
            .field("routines", &self.routines.len())
            .finish()
    }
}

/// Dancer figure: a quick hop with a slow twist
pub fn dancer_sway(transform: &mut Transform, t: f32) -> Result<(), UpdateError> {
    transform.position.y = (t * 2.0).sin() * 0.1;
    transform.rotation.y = (t * 0.5).sin() * 0.2;
    Ok(())
}
