//! Scene management
//!
//! The scene graph is built once at startup by the application and then only
//! mutated through transforms and materials by the frame scheduler and the
//! picking system.

mod scene_graph;

pub use scene_graph::{InteractiveTag, Node, NodeFlags, NodeId, SceneError, SceneGraph, AABB};
