//! Moonfest demo application
//!
//! Builds the festival scene, then runs it headless at 60 Hz for a few
//! seconds, clicking each lantern in turn and logging frame summaries.
//!
//! ```text
//! moonfest [config.toml|config.ron] [seconds]
//! ```
//!
//! Set `MOONFEST_REALTIME=1` to play the session back at wall-clock speed.

mod festival_scene;
mod headless_host;
mod log_renderer;

use festival_scene::FestivalScene;
use headless_host::HeadlessHost;
use log_renderer::LogRenderer;
use moonfest_engine::audio::{AudioSystem, SoundBuffer};
use moonfest_engine::config::{Config, ConfigError};
use moonfest_engine::core::config::SceneConfig;
use moonfest_engine::core::SceneContext;
use moonfest_engine::foundation::logging;
use moonfest_engine::foundation::math::Vec4;
use moonfest_engine::foundation::time::ManualClock;
use moonfest_engine::render::Camera;
use moonfest_engine::scene::SceneError;
use moonfest_engine::{Engine, EngineError, HostEvent};
use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

const DEFAULT_CONFIG: &str = "moonfest.toml";
const DEFAULT_SECONDS: f32 = 8.0;
const REFRESH_HZ: f32 = 60.0;

/// Application-level errors
#[derive(Error, Debug)]
enum AppError {
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid argument '{0}': expected a duration in seconds")]
    Argument(String),
}

fn main() {
    logging::init();

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    let mut args = std::env::args().skip(1);
    let config_path = args.next().unwrap_or_else(|| DEFAULT_CONFIG.to_string());
    let seconds = match args.next() {
        Some(arg) => arg.parse::<f32>().map_err(|_| AppError::Argument(arg))?,
        None => DEFAULT_SECONDS,
    };

    let config = SceneConfig::load_or_default(&config_path)?;
    log::info!("Session config: {}", config_path);

    let clock = ManualClock::new();
    let mut engine = Engine::new(config, Box::new(clock.clone()))?;

    let seed = engine.context().config.particles.seed.unwrap_or(0x4D00_4E46);
    let scene = festival_scene::build(engine.context_mut(), &mut StdRng::seed_from_u64(seed))?;
    log::debug!(
        "Spinning sky {:?}, stars {:?}, moon {:?}; dancer {:?}",
        scene.sky,
        scene.stars,
        scene.moon,
        scene.dancer
    );
    attach_audio(engine.context_mut());

    let total_frames = (seconds * REFRESH_HZ).round() as u64;
    let mut host = HeadlessHost::new(clock, REFRESH_HZ, total_frames)
        .paced(std::env::var_os("MOONFEST_REALTIME").is_some());
    script_clicks(&mut host, engine.context(), &scene)?;

    let mut renderer = LogRenderer::new(REFRESH_HZ as u64);
    let frames = engine.run(&mut host, &mut renderer)?;
    log::info!(
        "Rendered {} of {} host frames ({} submitted)",
        frames,
        host.frame(),
        renderer.frames()
    );
    Ok(())
}

/// Open an output device if the build has one, then hand over whatever sounds load
fn attach_audio(ctx: &mut SceneContext) {
    let mut audio = open_audio();

    if let Some(path) = ctx.config.audio.click_sound.clone() {
        match SoundBuffer::from_file(&path) {
            Ok(sound) => audio.set_click_sound(sound),
            Err(e) => log::warn!("Click sound '{}' unavailable: {}", path, e),
        }
    }
    if let Some(path) = ctx.config.audio.music.clone() {
        match SoundBuffer::from_file(&path).and_then(|music| audio.set_music(music)) {
            Ok(()) => log::info!("Background music '{}' loaded", path),
            Err(e) => log::warn!("Background music '{}' unavailable: {}", path, e),
        }
    }

    if let Err(e) = ctx.set_audio(audio) {
        log::warn!("Could not start background music: {}", e);
    }
}

#[cfg(feature = "audio")]
fn open_audio() -> AudioSystem {
    match moonfest_engine::audio::backend::create_backend() {
        Ok(backend) => AudioSystem::with_backend(backend),
        Err(e) => {
            log::warn!("Audio disabled: {}", e);
            AudioSystem::silent()
        }
    }
}

#[cfg(not(feature = "audio"))]
fn open_audio() -> AudioSystem {
    log::info!("Built without the audio feature; running silent");
    AudioSystem::silent()
}

/// Click every lantern once a second, and hide the view for a moment halfway through
fn script_clicks(host: &mut HeadlessHost, ctx: &SceneContext, scene: &FestivalScene) -> Result<(), AppError> {
    let [width, height] = ctx.config.camera.viewport;
    let second = REFRESH_HZ as u64;

    for (i, &lantern) in scene.lanterns.iter().enumerate() {
        let position = ctx.scene.world_position(lantern)?;
        if let Some((x, y)) = project_to_pixels(&ctx.camera, Vec4::new(position.x, position.y, position.z, 1.0), width, height) {
            host.schedule_click(second / 2 + i as u64 * second, x, y, width, height);
        }
    }

    // Empty sky in the top-left corner: nothing should react
    host.schedule_click(second / 4, 5.0, 5.0, width, height);

    host.schedule(3 * second, HostEvent::VisibilityChanged { hidden: true });
    host.schedule(3 * second + second / 2, HostEvent::VisibilityChanged { hidden: false });
    Ok(())
}

/// Pixel position of a world point, or `None` if it is behind the camera
fn project_to_pixels(camera: &Camera, point: Vec4, width: u32, height: u32) -> Option<(f64, f64)> {
    let clip = camera.view_projection_matrix() * point;
    if clip.w <= 0.0 {
        return None;
    }
    let ndc_x = f64::from(clip.x / clip.w);
    let ndc_y = f64::from(clip.y / clip.w);
    Some((
        (ndc_x + 1.0) * 0.5 * f64::from(width),
        (1.0 - ndc_y) * 0.5 * f64::from(height),
    ))
}
