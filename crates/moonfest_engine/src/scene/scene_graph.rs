//! Scene graph
//!
//! A tree of positioned nodes keyed by [`NodeId`]. Nodes own their local
//! transform and optional material; parent links give the ownership walk
//! picking uses to go from a struck mesh up to the lantern it belongs to.

use crate::foundation::math::{Mat4, Point3, Transform, Vec3};
use crate::physics::collision::{Ray, RayHit};
use crate::render::material::Material;
use bitflags::bitflags;
use slotmap::{new_key_type, SlotMap};
use thiserror::Error;

new_key_type! {
    /// Stable handle to a node in a [`SceneGraph`]
    pub struct NodeId;
}

bitflags! {
    /// Capability flags on a scene node
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u32 {
        /// Drawn and considered by ray casts
        const VISIBLE = 0b0001;
        /// Carries an [`InteractiveTag`] and reacts to clicks
        const INTERACTIVE = 0b0010;
        /// Driven by the frame scheduler every tick
        const ANIMATED = 0b0100;
    }
}

/// Axis-Aligned Bounding Box for spatial queries
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl AABB {
    /// Create a new AABB from min and max points
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB centered at a point with given extents
    pub fn from_center_extents(center: Vec3, extents: Vec3) -> Self {
        Self {
            min: center - extents,
            max: center + extents,
        }
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Bounds of this box after applying `matrix`, recomputed from all 8 corners
    pub fn transformed(&self, matrix: &Mat4) -> Self {
        let mut min = Vec3::repeat(f32::INFINITY);
        let mut max = Vec3::repeat(f32::NEG_INFINITY);
        for i in 0..8 {
            let corner = Point3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            );
            let moved = matrix.transform_point(&corner).coords;
            min = min.inf(&moved);
            max = max.sup(&moved);
        }
        Self { min, max }
    }

    /// Test ray intersection with this AABB using slab method
    /// Returns the distance to the entry point if the ray intersects, None otherwise
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let inv = |d: f32| if d != 0.0 { 1.0 / d } else { f32::INFINITY };
        let inv_dir = Vec3::new(inv(ray.direction.x), inv(ray.direction.y), inv(ray.direction.z));

        let mut tmin = f32::NEG_INFINITY;
        let mut tmax = f32::INFINITY;
        for axis in 0..3 {
            let origin = ray.origin[axis];
            if ray.direction[axis] == 0.0 {
                // Parallel to this slab: either always inside it or never
                if origin < self.min[axis] || origin > self.max[axis] {
                    return None;
                }
                continue;
            }
            let t1 = (self.min[axis] - origin) * inv_dir[axis];
            let t2 = (self.max[axis] - origin) * inv_dir[axis];
            tmin = tmin.max(t1.min(t2));
            tmax = tmax.min(t1.max(t2));
        }

        // Ray intersects if tmax >= tmin and tmax >= 0
        if tmax >= tmin && tmax >= 0.0 {
            // Entry point distance, or 0 if we're inside the box
            Some(tmin.max(0.0))
        } else {
            None
        }
    }
}

/// Marks a node as clickable and records what the click animation needs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractiveTag {
    /// Sub-part whose material flashes on click (a lantern's star)
    pub highlight: NodeId,
    /// Vertical rest position the bounce returns to
    pub baseline_y: f32,
}

/// A node in the scene graph
#[derive(Debug, Clone)]
pub struct Node {
    /// Human readable name, used in logs
    pub name: String,
    /// Transform relative to the parent
    pub transform: Transform,
    /// Surface material; group nodes have none
    pub material: Option<Material>,
    /// Local-space bounds used for ray casts; `None` means not pickable geometry
    pub bounds: Option<AABB>,
    flags: NodeFlags,
    interactive: Option<InteractiveTag>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    /// Visible node with identity transform
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::identity(),
            material: None,
            bounds: None,
            flags: NodeFlags::VISIBLE,
            interactive: None,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Builder-style transform
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Builder-style position
    pub fn at(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self
    }

    /// Builder-style material
    pub fn with_material(mut self, material: Material) -> Self {
        self.material = Some(material);
        self
    }

    /// Builder-style local bounds
    pub fn with_bounds(mut self, bounds: AABB) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Capability flags
    pub fn flags(&self) -> NodeFlags {
        self.flags
    }

    /// Whether the node is drawn and hit-testable
    pub fn is_visible(&self) -> bool {
        self.flags.contains(NodeFlags::VISIBLE)
    }

    /// Interactive capability, if any
    pub fn interactive(&self) -> Option<&InteractiveTag> {
        self.interactive.as_ref()
    }

    /// Owning node
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Owned nodes
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Scene graph errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// Handle does not name a live node
    #[error("Unknown scene node {0:?}")]
    UnknownNode(NodeId),

    /// Operation needs a material the node does not have
    #[error("Scene node '{0}' has no material")]
    MissingMaterial(String),

    /// Node carries no [`InteractiveTag`]
    #[error("Scene node '{0}' is not interactive")]
    NotInteractive(String),

    /// Highlight part must live inside the interactive node's subtree
    #[error("Highlight '{highlight}' is not part of '{owner}'")]
    HighlightOutsideOwner {
        /// Interactive node name
        owner: String,
        /// Offending highlight node name
        highlight: String,
    },
}

/// Tree of scene nodes
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: SlotMap<NodeId, Node>,
    roots: Vec<NodeId>,
}

impl SceneGraph {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a top-level node
    pub fn add_root(&mut self, node: Node) -> NodeId {
        let id = self.nodes.insert(Node { parent: None, children: Vec::new(), ..node });
        self.roots.push(id);
        id
    }

    /// Add a node owned by `parent`
    pub fn add_child(&mut self, parent: NodeId, node: Node) -> Result<NodeId, SceneError> {
        if !self.nodes.contains_key(parent) {
            return Err(SceneError::UnknownNode(parent));
        }
        let id = self.nodes.insert(Node { parent: Some(parent), children: Vec::new(), ..node });
        self.nodes[parent].children.push(id);
        Ok(id)
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the scene has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Top-level nodes in insertion order
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Iterate over all nodes
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter()
    }

    /// Look up a node
    pub fn node(&self, id: NodeId) -> Result<&Node, SceneError> {
        self.nodes.get(id).ok_or(SceneError::UnknownNode(id))
    }

    /// Look up a node mutably
    pub fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, SceneError> {
        self.nodes.get_mut(id).ok_or(SceneError::UnknownNode(id))
    }

    /// Mutable local transform of a node
    pub fn transform_mut(&mut self, id: NodeId) -> Result<&mut Transform, SceneError> {
        Ok(&mut self.node_mut(id)?.transform)
    }

    /// Material of a node
    pub fn material(&self, id: NodeId) -> Result<&Material, SceneError> {
        let node = self.node(id)?;
        node.material
            .as_ref()
            .ok_or_else(|| SceneError::MissingMaterial(node.name.clone()))
    }

    /// Mutable material of a node
    pub fn material_mut(&mut self, id: NodeId) -> Result<&mut Material, SceneError> {
        let node = self.node_mut(id)?;
        let name = &node.name;
        match node.material.as_mut() {
            Some(material) => Ok(material),
            None => Err(SceneError::MissingMaterial(name.clone())),
        }
    }

    /// Add capability flags to a node
    pub fn insert_flags(&mut self, id: NodeId, flags: NodeFlags) -> Result<(), SceneError> {
        self.node_mut(id)?.flags.insert(flags);
        Ok(())
    }

    /// Show or hide a node
    pub fn set_visible(&mut self, id: NodeId, visible: bool) -> Result<(), SceneError> {
        self.node_mut(id)?.flags.set(NodeFlags::VISIBLE, visible);
        Ok(())
    }

    /// Whether `node` is `ancestor` or lives somewhere below it
    pub fn is_within(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes.get(id).and_then(|n| n.parent);
        }
        false
    }

    /// Make a node clickable
    ///
    /// `highlight` is the sub-part that flashes; it must have a material and
    /// belong to `id`'s subtree. The node's current local Y becomes the bounce
    /// baseline.
    pub fn mark_interactive(&mut self, id: NodeId, highlight: NodeId) -> Result<(), SceneError> {
        let owner = self.node(id)?;
        let highlight_node = self.node(highlight)?;
        if !self.is_within(highlight, id) {
            return Err(SceneError::HighlightOutsideOwner {
                owner: owner.name.clone(),
                highlight: highlight_node.name.clone(),
            });
        }
        if highlight_node.material.is_none() {
            return Err(SceneError::MissingMaterial(highlight_node.name.clone()));
        }

        let node = self.node_mut(id)?;
        node.interactive = Some(InteractiveTag {
            highlight,
            baseline_y: node.transform.position.y,
        });
        node.flags.insert(NodeFlags::INTERACTIVE);
        Ok(())
    }

    /// Interactive capability of a node
    pub fn interactive(&self, id: NodeId) -> Option<&InteractiveTag> {
        self.nodes.get(id).and_then(Node::interactive)
    }

    /// Ownership walk: the node itself or its nearest interactive ancestor
    pub fn resolve_interactive(&self, id: NodeId) -> Option<NodeId> {
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.nodes.get(node_id)?;
            if node.interactive.is_some() {
                return Some(node_id);
            }
            current = node.parent;
        }
        None
    }

    /// Local-to-world matrix of a node
    pub fn world_matrix(&self, id: NodeId) -> Result<Mat4, SceneError> {
        let mut matrix = Mat4::identity();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.node(node_id)?;
            matrix = node.transform.to_matrix() * matrix;
            current = node.parent;
        }
        Ok(matrix)
    }

    /// World-space position of a node's origin
    pub fn world_position(&self, id: NodeId) -> Result<Vec3, SceneError> {
        Ok(self.world_matrix(id)?.transform_point(&Point3::origin()).coords)
    }

    /// Whether the node and every ancestor are visible
    pub fn is_effectively_visible(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node_id) = current {
            match self.nodes.get(node_id) {
                Some(node) if node.is_visible() => current = node.parent,
                _ => return false,
            }
        }
        true
    }

    /// Every visible node with bounds that the ray passes through, nearest first
    pub fn ray_cast(&self, ray: &Ray) -> Vec<RayHit> {
        let mut hits: Vec<RayHit> = self
            .nodes
            .iter()
            .filter(|(id, node)| node.bounds.is_some() && self.is_effectively_visible(*id))
            .filter_map(|(id, node)| {
                let local = node.bounds?;
                let world = local.transformed(&self.world_matrix(id).ok()?);
                let distance = world.intersect_ray(ray)?;
                Some(RayHit {
                    node: id,
                    distance,
                    point: ray.point_at(distance),
                })
            })
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::material::Color;

    fn unit_box() -> AABB {
        AABB::from_center_extents(Vec3::zeros(), Vec3::new(0.5, 0.5, 0.5))
    }

    fn lantern(scene: &mut SceneGraph, name: &str, position: Vec3) -> (NodeId, NodeId) {
        let group = scene.add_root(Node::new(name).at(position));
        let star = scene
            .add_child(
                group,
                Node::new(format!("{name}/star"))
                    .with_material(Material::glowing(Color::from_hex(0xFF0000), 1.5))
                    .with_bounds(unit_box()),
            )
            .unwrap();
        scene.mark_interactive(group, star).unwrap();
        (group, star)
    }

    #[test]
    fn test_ray_aabb_intersection() {
        let aabb = AABB::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));

        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(aabb.intersect_ray(&ray), Some(4.0));

        let ray_miss = Ray::new(Vec3::new(5.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(aabb.intersect_ray(&ray_miss).is_none());

        let behind = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(aabb.intersect_ray(&behind).is_none());
    }

    #[test]
    fn test_transformed_bounds_follow_parent() {
        let mut scene = SceneGraph::new();
        let parent = scene.add_root(Node::new("parent").at(Vec3::new(0.0, 4.0, 0.0)));
        let child = scene
            .add_child(parent, Node::new("child").at(Vec3::new(1.0, 0.0, 0.0)).with_bounds(unit_box()))
            .unwrap();

        let world = unit_box().transformed(&scene.world_matrix(child).unwrap());
        assert_eq!(world.center(), Vec3::new(1.0, 4.0, 0.0));
        assert_eq!(scene.world_position(child).unwrap(), Vec3::new(1.0, 4.0, 0.0));
    }

    #[test]
    fn test_ray_cast_orders_nearest_first() {
        let mut scene = SceneGraph::new();
        let far = scene.add_root(Node::new("far").at(Vec3::new(0.0, 0.0, -10.0)).with_bounds(unit_box()));
        let near = scene.add_root(Node::new("near").at(Vec3::new(0.0, 0.0, -3.0)).with_bounds(unit_box()));
        scene.add_root(Node::new("aside").at(Vec3::new(5.0, 0.0, -3.0)).with_bounds(unit_box()));

        let hits = scene.ray_cast(&Ray::new(Vec3::zeros(), Vec3::new(0.0, 0.0, -1.0)));
        let order: Vec<NodeId> = hits.iter().map(|hit| hit.node).collect();
        assert_eq!(order, vec![near, far]);
        assert_eq!(hits[0].distance, 2.5);
    }

    #[test]
    fn test_hidden_subtree_is_not_hit() {
        let mut scene = SceneGraph::new();
        let (group, _) = lantern(&mut scene, "lantern", Vec3::new(0.0, 0.0, -3.0));
        scene.set_visible(group, false).unwrap();

        let hits = scene.ray_cast(&Ray::new(Vec3::zeros(), Vec3::new(0.0, 0.0, -1.0)));
        assert!(hits.is_empty());
    }

    #[test]
    fn test_resolve_interactive_walks_to_owner() {
        let mut scene = SceneGraph::new();
        let (group, star) = lantern(&mut scene, "lantern", Vec3::new(2.0, 4.0, 0.0));
        let tassel = scene.add_child(star, Node::new("tassel")).unwrap();
        let table = scene.add_root(Node::new("table"));

        assert_eq!(scene.resolve_interactive(tassel), Some(group));
        assert_eq!(scene.resolve_interactive(star), Some(group));
        assert_eq!(scene.resolve_interactive(group), Some(group));
        assert_eq!(scene.resolve_interactive(table), None);

        let tag = scene.interactive(group).unwrap();
        assert_eq!(tag.highlight, star);
        assert_eq!(tag.baseline_y, 4.0);
        assert!(scene.node(group).unwrap().flags().contains(NodeFlags::INTERACTIVE));
    }

    #[test]
    fn test_highlight_must_belong_to_owner() {
        let mut scene = SceneGraph::new();
        let group = scene.add_root(Node::new("lantern"));
        let stray = scene.add_root(Node::new("stray").with_material(Material::default()));
        let bare = scene.add_child(group, Node::new("bare")).unwrap();

        assert!(matches!(
            scene.mark_interactive(group, stray),
            Err(SceneError::HighlightOutsideOwner { .. })
        ));
        assert_eq!(
            scene.mark_interactive(group, bare),
            Err(SceneError::MissingMaterial("bare".to_string()))
        );
        assert!(scene.interactive(group).is_none());
    }

    #[test]
    fn test_unknown_parent_rejected() {
        let mut scene = SceneGraph::new();
        let id = scene.add_root(Node::new("elsewhere"));

        let mut empty = SceneGraph::new();
        assert_eq!(empty.add_child(id, Node::new("child")), Err(SceneError::UnknownNode(id)));
    }
}
