//! The Mid-Autumn festival scene, built as plain data
//!
//! Geometry is out of the engine's hands; each prop is just a named node with
//! a material and, where a ray cast should register it, local bounds roughly
//! matching the mesh a renderer would draw for it. Hits on props that are not
//! interactive are skipped by picking, which moves on to the next hit.

use moonfest_engine::animation::{custom::dancer_sway, SpinKind};
use moonfest_engine::core::SceneContext;
use moonfest_engine::foundation::math::Vec3;
use moonfest_engine::render::{Color, Material};
use moonfest_engine::scene::{Node, NodeId, SceneError, AABB};
use rand::Rng;

/// Star lantern colours, cycled over the hanging lanterns
pub const LANTERN_COLORS: [u32; 6] = [0xFF0000, 0xFF1493, 0xFFD700, 0x00FF00, 0x00CED1, 0xFF6347];

/// Hanging lantern positions
pub const LANTERN_POSITIONS: [[f32; 3]; 9] = [
    [2.0, 4.0, 0.0],
    [-3.0, 4.0, 1.0],
    [1.0, 3.5, -2.0],
    [-2.0, 3.5, -1.0],
    [4.0, 3.8, 2.0],
    [-4.0, 3.8, 2.0],
    [0.0, 4.2, 3.0],
    [3.0, 3.5, -3.0],
    [-3.0, 3.5, -3.0],
];

/// Lanterns hanging from the house eaves
pub const HOUSE_LANTERN_POSITIONS: [[f32; 3]; 2] = [[-2.5, 3.0, -2.0], [2.5, 3.0, -2.0]];

const STAR_COUNT: usize = 1500;

/// Handles to the nodes the demo cares about
#[derive(Debug, Clone)]
pub struct FestivalScene {
    /// Every clickable lantern, in idle-phase order
    pub lanterns: Vec<NodeId>,
    /// Moon group
    pub moon: NodeId,
    /// Starfield
    pub stars: NodeId,
    /// Sky dome
    pub sky: NodeId,
    /// Dancer figure
    pub dancer: NodeId,
}

/// Populate `ctx` with the festival scene
pub fn build(ctx: &mut SceneContext, rng: &mut impl Rng) -> Result<FestivalScene, SceneError> {
    let sky = ctx.scene.add_root(
        Node::new("sky").with_material(Material::solid(Color::from_hex(0x1A0033))),
    );
    ctx.attach_spin(SpinKind::Sky, sky)?;

    let stars = build_starfield(ctx, rng)?;
    ctx.attach_spin(SpinKind::Stars, stars)?;

    let moon = build_moon(ctx)?;
    ctx.attach_spin(SpinKind::Moon, moon)?;

    build_ground(ctx);

    let mut lanterns = Vec::with_capacity(LANTERN_POSITIONS.len() + HOUSE_LANTERN_POSITIONS.len());
    for (i, position) in LANTERN_POSITIONS.iter().enumerate() {
        let color = LANTERN_COLORS[i % LANTERN_COLORS.len()];
        lanterns.push(build_lantern(ctx, &format!("lantern-{i}"), Vec3::from(*position), color)?);
    }
    for (i, position) in HOUSE_LANTERN_POSITIONS.iter().enumerate() {
        lanterns.push(build_lantern(ctx, &format!("house-lantern-{i}"), Vec3::from(*position), 0xFF0000)?);
    }
    for &lantern in &lanterns {
        ctx.animate_idle(lantern)?;
    }

    let dancer = ctx.scene.add_root(
        Node::new("dancer")
            .at(Vec3::new(-3.0, 0.0, 3.0))
            .with_material(Material {
                emissive: Color::from_hex(0xFF4500),
                emissive_intensity: 0.3,
                ..Material::solid(Color::from_hex(0xFF0000))
            })
            .with_bounds(AABB::new(Vec3::new(-0.4, 0.0, -0.4), Vec3::new(0.4, 1.6, 0.4))),
    );
    ctx.add_routine(dancer, dancer_sway)?;

    log::info!(
        "Festival scene ready: {} nodes, {} lanterns",
        ctx.scene.len(),
        lanterns.len()
    );
    Ok(FestivalScene {
        lanterns,
        moon,
        stars,
        sky,
        dancer,
    })
}

/// Star lantern: glowing star, hanging string and tassel
///
/// Only the star has pickable bounds; clicks on it resolve to the group.
fn build_lantern(ctx: &mut SceneContext, name: &str, position: Vec3, color: u32) -> Result<NodeId, SceneError> {
    let group = ctx.scene.add_root(Node::new(name).at(position));
    let star = ctx.scene.add_child(
        group,
        Node::new(format!("{name}/star"))
            .with_material(Material::glowing(Color::from_hex(color), 1.5).with_opacity(0.9))
            .with_bounds(AABB::new(Vec3::new(-0.4, -0.4, -0.02), Vec3::new(0.4, 0.4, 0.22))),
    )?;
    ctx.scene.add_child(
        group,
        Node::new(format!("{name}/string"))
            .at(Vec3::new(0.0, 1.0, 0.0))
            .with_material(Material::solid(Color::from_hex(0x654321))),
    )?;
    ctx.scene.add_child(
        group,
        Node::new(format!("{name}/tassel"))
            .at(Vec3::new(0.0, -0.5, 0.0))
            .with_material(Material::solid(Color::from_hex(0xFFD700)))
            .with_bounds(AABB::from_center_extents(Vec3::zeros(), Vec3::new(0.08, 0.15, 0.08))),
    )?;
    ctx.scene.mark_interactive(group, star)?;
    Ok(group)
}

fn build_moon(ctx: &mut SceneContext) -> Result<NodeId, SceneError> {
    let group = ctx.scene.add_root(Node::new("moon").at(Vec3::new(-12.0, 12.0, -18.0)));
    ctx.scene.add_child(
        group,
        Node::new("moon/disc")
            .with_material(Material {
                emissive: Color::from_hex(0xFFE4B5),
                emissive_intensity: 0.6,
                ..Material::solid(Color::from_hex(0xFFF8DC))
            })
            .with_bounds(AABB::from_center_extents(Vec3::zeros(), Vec3::repeat(2.5))),
    )?;
    ctx.scene.add_child(
        group,
        Node::new("moon/glow").with_material(Material::solid(Color::from_hex(0xFFE4B5)).with_opacity(0.15)),
    )?;
    Ok(group)
}

fn build_starfield(ctx: &mut SceneContext, rng: &mut impl Rng) -> Result<NodeId, SceneError> {
    let field = ctx.scene.add_root(
        Node::new("stars").with_material(Material::solid(Color::WHITE).with_opacity(0.8)),
    );
    for i in 0..STAR_COUNT {
        let position = Vec3::new(
            rng.gen_range(-75.0..75.0),
            rng.gen_range(10.0..60.0),
            rng.gen_range(-75.0..75.0),
        );
        ctx.scene.add_child(field, Node::new(format!("stars/{i}")).at(position))?;
    }
    Ok(field)
}

fn build_ground(ctx: &mut SceneContext) {
    // Hit by ray casts, but never interactive: picking looks past it
    ctx.scene.add_root(
        Node::new("ground")
            .with_material(Material::solid(Color::from_hex(0x2D5016)))
            .with_bounds(AABB::new(Vec3::new(-25.0, -0.01, -25.0), Vec3::new(25.0, 0.0, 25.0))),
    );
}
