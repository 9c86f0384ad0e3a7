//! End-to-end scenarios driving the engine through its host and renderer seams

use crate::application::{FrameHost, HostEvent};
use crate::audio::testing::{Call, RecordingBackend};
use crate::audio::{AudioSystem, SoundBuffer};
use crate::core::config::SceneConfig;
use crate::engine::{Engine, EngineError};
use crate::foundation::math::Vec3;
use crate::foundation::time::ManualClock;
use crate::input::PointerEvent;
use crate::render::material::{Color, Material};
use crate::render::{FrameView, RenderError, Renderer};
use crate::scene::{Node, NodeId, AABB};
use crate::systems::PickOutcome;
use approx::assert_relative_eq;
use std::collections::VecDeque;

const LANTERN_RED: u32 = 0xFF_00_00;

/// Host replaying a fixed list of frames at a fixed rate
struct ScriptedHost {
    clock: ManualClock,
    step: f32,
    frames: VecDeque<Vec<HostEvent>>,
    started: bool,
}

impl ScriptedHost {
    fn new(clock: ManualClock, frames: Vec<Vec<HostEvent>>) -> Self {
        Self {
            clock,
            step: 1.0 / 60.0,
            frames: frames.into(),
            started: false,
        }
    }
}

impl FrameHost for ScriptedHost {
    fn next_frame(&mut self) -> Option<Vec<HostEvent>> {
        let events = self.frames.pop_front()?;
        if self.started {
            self.clock.advance(self.step);
        }
        self.started = true;
        Some(events)
    }
}

/// Renderer remembering the watched node's height and highlight colour
struct WatchingRenderer {
    lantern: NodeId,
    star: NodeId,
    seen: Vec<(f32, f32, Color)>,
}

impl Renderer for WatchingRenderer {
    fn render(&mut self, view: &FrameView<'_>) -> Result<(), RenderError> {
        let y = view
            .scene
            .node(self.lantern)
            .map_err(|e| RenderError::Backend(e.to_string()))?
            .transform
            .position
            .y;
        let color = view
            .scene
            .material(self.star)
            .map_err(|e| RenderError::Backend(e.to_string()))?
            .color;
        self.seen.push((view.elapsed, y, color));
        Ok(())
    }
}

/// Engine with one lantern sitting exactly at the camera target
fn festival(clock: &ManualClock) -> (Engine, NodeId, NodeId) {
    let mut config = SceneConfig::default();
    config.camera.target = [2.0, 4.0, 0.0];
    config.camera.viewport = [800, 600];
    config.particles.count = 10;
    config.particles.seed = Some(11);

    let mut engine = Engine::new(config, Box::new(clock.clone())).unwrap();
    let ctx = engine.context_mut();
    let lantern = ctx.scene.add_root(Node::new("lantern").at(Vec3::new(2.0, 4.0, 0.0)));
    let star = ctx
        .scene
        .add_child(
            lantern,
            Node::new("lantern/star")
                .with_material(Material::glowing(Color::from_hex(LANTERN_RED), 1.5).with_opacity(0.9))
                .with_bounds(AABB::from_center_extents(Vec3::zeros(), Vec3::new(0.4, 0.4, 0.1))),
        )
        .unwrap();
    ctx.scene
        .add_child(lantern, Node::new("lantern/tassel").at(Vec3::new(0.0, -0.5, 0.0)))
        .unwrap();
    ctx.scene.mark_interactive(lantern, star).unwrap();
    ctx.animate_idle(lantern).unwrap();
    (engine, lantern, star)
}

fn centre_click() -> PointerEvent {
    PointerEvent::new(400.0, 300.0, 800, 600)
}

#[test]
fn test_centre_click_starts_bounce_at_baseline() {
    let clock = ManualClock::new();
    let (mut engine, lantern, star) = festival(&clock);
    assert_eq!(centre_click().to_ndc(), Some((0.0, 0.0)));

    let outcome = engine.click(&centre_click()).unwrap();

    let PickOutcome::Picked { node, bounce, .. } = outcome else {
        panic!("centre click missed: {outcome:?}");
    };
    assert_eq!(node, lantern);
    assert_eq!(bounce.start, 0.0);
    assert_eq!(bounce.baseline_y, 4.0);
    assert_eq!(engine.context().scene.node(lantern).unwrap().transform.position.y, 4.0);
    assert_eq!(engine.context().scene.material(star).unwrap().color, Color::WHITE);
}

#[test]
fn test_bounce_runs_to_exact_restore_inside_loop() {
    let clock = ManualClock::new();
    let (mut engine, lantern, star) = festival(&clock);
    let original = *engine.context().scene.material(star).unwrap();

    // Click on frame 0, then one second of empty frames, then close
    let mut script = vec![vec![HostEvent::Click(centre_click())]];
    script.extend(std::iter::repeat_with(Vec::new).take(60));
    script.push(vec![HostEvent::CloseRequested]);
    let mut host = ScriptedHost::new(clock.clone(), script);
    let mut renderer = WatchingRenderer { lantern, star, seen: Vec::new() };

    let frames = engine.run(&mut host, &mut renderer).unwrap();

    assert_eq!(frames, 61);
    assert!(!engine.is_running());

    let peak = renderer
        .seen
        .iter()
        .map(|(_, y, _)| *y)
        .fold(f32::NEG_INFINITY, f32::max);
    assert_relative_eq!(peak, 4.5, epsilon = 0.01);
    assert!(renderer.seen[..30].iter().all(|(_, _, color)| *color == Color::WHITE));

    let (elapsed, _, color) = *renderer.seen.last().unwrap();
    assert!(elapsed > 0.6);
    assert_eq!(color, original.color);
    assert_eq!(*engine.context().scene.material(star).unwrap(), original);
    assert!(engine.context().bounces.is_empty());
}

#[test]
fn test_click_on_empty_sky_is_silent() {
    let clock = ManualClock::new();
    let (mut engine, lantern, star) = festival(&clock);
    let backend = RecordingBackend::default();
    let mut audio = AudioSystem::with_backend(Box::new(backend.clone()));
    audio.set_click_sound(SoundBuffer::from_bytes("ding", vec![0u8; 8]));
    engine.context_mut().set_audio(audio).unwrap();

    let outcome = engine.click(&PointerEvent::new(10.0, 10.0, 800, 600)).unwrap();

    assert_eq!(outcome, PickOutcome::Missed);
    assert!(backend.calls().is_empty());
    assert!(engine.context().bounces.is_empty());
    assert_eq!(engine.context().scene.node(lantern).unwrap().transform.position.y, 4.0);
    assert_eq!(
        engine.context().scene.material(star).unwrap().color,
        Color::from_hex(LANTERN_RED)
    );
}

#[test]
fn test_visibility_pauses_music() {
    let clock = ManualClock::new();
    let (mut engine, lantern, star) = festival(&clock);
    let backend = RecordingBackend::default();
    let mut audio = AudioSystem::with_backend(Box::new(backend.clone()));
    audio.set_music(SoundBuffer::from_bytes("theme", vec![0u8; 8])).unwrap();
    engine.context_mut().set_audio(audio).unwrap();
    engine.context_mut().audio.set_music_enabled(true).unwrap();

    let script = vec![
        vec![HostEvent::VisibilityChanged { hidden: true }],
        vec![HostEvent::VisibilityChanged { hidden: false }],
    ];
    let mut host = ScriptedHost::new(clock.clone(), script);
    let mut renderer = WatchingRenderer { lantern, star, seen: Vec::new() };

    assert_eq!(engine.run(&mut host, &mut renderer).unwrap(), 2);
    assert_eq!(
        backend.calls(),
        vec![
            Call::Play { name: "theme".to_string(), volume: 0.4, looping: true },
            Call::Pause(1),
            Call::Resume(1),
        ]
    );
}

#[test]
fn test_music_control_failure_keeps_session_running() {
    let clock = ManualClock::new();
    let (mut engine, lantern, star) = festival(&clock);
    let backend = RecordingBackend::failing_controls();
    let mut audio = AudioSystem::with_backend(Box::new(backend.clone()));
    audio.set_music(SoundBuffer::from_bytes("theme", vec![0u8; 8])).unwrap();
    engine.context_mut().set_audio(audio).unwrap();
    engine.context_mut().audio.set_music_enabled(true).unwrap();

    let script = vec![
        vec![],
        vec![HostEvent::VisibilityChanged { hidden: true }],
        vec![],
        vec![HostEvent::VisibilityChanged { hidden: false }],
    ];
    let mut host = ScriptedHost::new(clock.clone(), script);
    let mut renderer = WatchingRenderer { lantern, star, seen: Vec::new() };

    assert_eq!(engine.run(&mut host, &mut renderer).unwrap(), 4);
    assert_eq!(renderer.seen.len(), 4);
    assert_eq!(
        backend.calls(),
        vec![
            Call::Play { name: "theme".to_string(), volume: 0.4, looping: true },
            Call::Pause(1),
            Call::Resume(1),
        ]
    );
}

#[test]
fn test_close_request_skips_pending_frame() {
    let clock = ManualClock::new();
    let (mut engine, lantern, star) = festival(&clock);
    let mut host = ScriptedHost::new(clock.clone(), vec![vec![], vec![HostEvent::CloseRequested], vec![]]);
    let mut renderer = WatchingRenderer { lantern, star, seen: Vec::new() };

    assert_eq!(engine.run(&mut host, &mut renderer).unwrap(), 1);
    assert_eq!(renderer.seen.len(), 1);
}

#[test]
fn test_invalid_config_rejected() {
    let mut config = SceneConfig::default();
    config.particles.lifetime_min = 0;

    let result = Engine::new(config, Box::new(ManualClock::new()));
    assert!(matches!(result, Err(EngineError::Config(_))));
}

#[test]
fn test_nan_spawn_volume_rejected_before_particles_spawn() {
    let mut config = SceneConfig::default();
    config.particles.bounds_max[1] = f32::NAN;

    let result = Engine::new(config, Box::new(ManualClock::new()));
    assert!(matches!(result, Err(EngineError::Config(_))));
}
