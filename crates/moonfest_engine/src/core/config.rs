//! # Scene Configuration
//!
//! All tunables of a festival session in one serializable tree. Every section
//! defaults to the values of the reference scene, and files only need to name
//! the fields they change (`#[serde(default)]` throughout).
//!
//! ```toml
//! [interaction]
//! bounce_height = 0.75
//!
//! [particles]
//! count = 250
//! ```

use serde::{Deserialize, Serialize};

pub use crate::config::{Config, ConfigError};
use crate::foundation::math::Vec3;

/// Root configuration for a session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Camera placement and projection
    pub camera: CameraConfig,
    /// Idle bob/sway of lanterns
    pub idle: IdleAnimationConfig,
    /// Continuous rotation of sky, stars and moon
    pub spin: SpinConfig,
    /// Firework particles
    pub particles: ParticleConfig,
    /// Click feedback
    pub interaction: InteractionConfig,
    /// Music and click sound
    pub audio: AudioConfig,
}

impl Config for SceneConfig {}

impl SceneConfig {
    /// Check every section, reporting the first bad field
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.camera.validate()?;
        self.idle.validate()?;
        self.spin.validate()?;
        self.particles.validate()?;
        self.interaction.validate()?;
        self.audio.validate()
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn finite(field: &'static str, values: &[f32]) -> Result<(), ConfigError> {
    if values.iter().all(|value| value.is_finite()) {
        Ok(())
    } else {
        Err(invalid(field, "must be a finite number"))
    }
}

/// Camera placement and projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Eye position in world space
    pub position: [f32; 3],
    /// Look-at point
    pub target: [f32; 3],
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
    /// Initial viewport size in pixels, used for the aspect ratio
    pub viewport: [u32; 2],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [-14.0, 8.0, 20.0],
            target: [0.0, 0.0, 0.0],
            fov_degrees: 35.0,
            near: 0.1,
            far: 100.0,
            viewport: [1280, 720],
        }
    }
}

impl CameraConfig {
    /// Width over height of the configured viewport
    pub fn aspect(&self) -> f32 {
        self.viewport[0] as f32 / self.viewport[1].max(1) as f32
    }

    fn validate(&self) -> Result<(), ConfigError> {
        finite("camera.position", &self.position)?;
        finite("camera.target", &self.target)?;
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(invalid("camera.fov_degrees", "must be in (0, 180)"));
        }
        finite("camera.near", &[self.near, self.far])?;
        if self.near <= 0.0 || self.far <= self.near {
            return Err(invalid("camera.near", "need 0 < near < far"));
        }
        if self.viewport[0] == 0 || self.viewport[1] == 0 {
            return Err(invalid("camera.viewport", "width and height must be non-zero"));
        }
        if self.position == self.target {
            return Err(invalid("camera.target", "must differ from camera.position"));
        }
        Ok(())
    }
}

/// Idle bob and sway applied to every animated entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdleAnimationConfig {
    /// Peak vertical offset
    pub bob_amplitude: f32,
    /// Angular frequency of the bob (radians per second)
    pub bob_frequency: f32,
    /// Peak yaw in radians
    pub sway_amplitude: f32,
    /// Angular frequency of the sway
    pub sway_frequency: f32,
    /// Phase added per entity index, so entity `i` uses `i * phase_step`
    pub phase_step: f32,
}

impl Default for IdleAnimationConfig {
    fn default() -> Self {
        Self {
            bob_amplitude: 0.1,
            bob_frequency: 0.8,
            sway_amplitude: 0.1,
            sway_frequency: 0.5,
            phase_step: 1.0,
        }
    }
}

impl IdleAnimationConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        finite(
            "idle",
            &[
                self.bob_amplitude,
                self.bob_frequency,
                self.sway_amplitude,
                self.sway_frequency,
                self.phase_step,
            ],
        )
    }
}

/// Rotation rates in radians per second of session time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinConfig {
    /// Sky backdrop
    pub sky_rate: f32,
    /// Starfield
    pub stars_rate: f32,
    /// Moon group
    pub moon_rate: f32,
}

impl Default for SpinConfig {
    fn default() -> Self {
        Self {
            sky_rate: 0.002,
            stars_rate: 0.01,
            moon_rate: 0.05,
        }
    }
}

impl SpinConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        finite("spin", &[self.sky_rate, self.stars_rate, self.moon_rate])
    }
}

/// Firework particle settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    /// Number of particles kept alive
    pub count: usize,
    /// Minimum corner of the respawn volume
    pub bounds_min: [f32; 3],
    /// Maximum corner of the respawn volume (exclusive)
    pub bounds_max: [f32; 3],
    /// Smallest lifetime in ticks (inclusive)
    pub lifetime_min: i32,
    /// Largest lifetime in ticks (exclusive)
    pub lifetime_max: i32,
    /// Lifetime at which a particle starts to fade
    pub fade_ticks: f32,
    /// Opacity ceiling
    pub max_opacity: f32,
    /// Half-range of each velocity component, in units per tick
    pub max_speed: f32,
    /// Scale per-tick motion by measured frame delta instead of one step per tick
    pub scale_by_frame_delta: bool,
    /// Refresh rate that one unscaled step corresponds to
    pub reference_rate_hz: f32,
    /// Fixed RNG seed for reproducible runs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: 100,
            bounds_min: [-15.0, 5.0, -15.0],
            bounds_max: [15.0, 20.0, 15.0],
            lifetime_min: 50,
            lifetime_max: 150,
            fade_ticks: 50.0,
            max_opacity: 0.8,
            max_speed: 0.01,
            scale_by_frame_delta: false,
            reference_rate_hz: 60.0,
            seed: None,
        }
    }
}

impl ParticleConfig {
    /// Respawn volume as vectors
    pub fn bounds(&self) -> (Vec3, Vec3) {
        (Vec3::from(self.bounds_min), Vec3::from(self.bounds_max))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.lifetime_min < 1 || self.lifetime_max <= self.lifetime_min {
            return Err(invalid("particles.lifetime_min", "need 1 <= lifetime_min < lifetime_max"));
        }
        finite("particles.bounds_min", &self.bounds_min)?;
        finite("particles.bounds_max", &self.bounds_max)?;
        if (0..3).any(|axis| self.bounds_max[axis] <= self.bounds_min[axis]) {
            return Err(invalid("particles.bounds_max", "every axis must exceed bounds_min"));
        }
        finite("particles.fade_ticks", &[self.fade_ticks])?;
        if self.fade_ticks <= 0.0 {
            return Err(invalid("particles.fade_ticks", "must be positive"));
        }
        if !(0.0..=1.0).contains(&self.max_opacity) {
            return Err(invalid("particles.max_opacity", "must be in [0, 1]"));
        }
        finite("particles.max_speed", &[self.max_speed])?;
        if self.max_speed < 0.0 {
            return Err(invalid("particles.max_speed", "must not be negative"));
        }
        finite("particles.reference_rate_hz", &[self.reference_rate_hz])?;
        if self.reference_rate_hz <= 0.0 {
            return Err(invalid("particles.reference_rate_hz", "must be positive"));
        }
        Ok(())
    }
}

/// Click feedback settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Length of the bounce in milliseconds
    pub bounce_duration_ms: u32,
    /// Peak displacement of the bounce
    pub bounce_height: f32,
    /// Volume of the click sound
    pub click_volume: f32,
    /// Flash colour as 0xRRGGBB
    pub flash_color: u32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            bounce_duration_ms: 600,
            bounce_height: 0.5,
            click_volume: 0.3,
            flash_color: 0xFF_FF_FF,
        }
    }
}

impl InteractionConfig {
    /// Bounce length in seconds of session time
    pub fn bounce_duration_secs(&self) -> f32 {
        self.bounce_duration_ms as f32 / 1000.0
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.bounce_duration_ms == 0 {
            return Err(invalid("interaction.bounce_duration_ms", "must be non-zero"));
        }
        finite("interaction.bounce_height", &[self.bounce_height])?;
        if !(0.0..=1.0).contains(&self.click_volume) {
            return Err(invalid("interaction.click_volume", "must be in [0, 1]"));
        }
        if self.flash_color > 0xFF_FF_FF {
            return Err(invalid("interaction.flash_color", "must fit in 0xRRGGBB"));
        }
        Ok(())
    }
}

/// Music and click sound settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Background music volume
    pub music_volume: f32,
    /// Whether the music starts enabled
    pub music_enabled: bool,
    /// Optional path to the click sound file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub click_sound: Option<String>,
    /// Optional path to the background music file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub music: Option<String>,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            music_volume: 0.4,
            music_enabled: false,
            click_sound: None,
            music: None,
        }
    }
}

impl AudioConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.music_volume) {
            return Err(invalid("audio.music_volume", "must be in [0, 1]"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigFormat;

    #[test]
    fn test_defaults_are_valid() {
        SceneConfig::default().validate().unwrap();
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let text = "[interaction]\nbounce_height = 0.75\n\n[particles]\ncount = 250\n";
        let config = SceneConfig::from_str_as(text, ConfigFormat::Toml).unwrap();

        assert_eq!(config.interaction.bounce_height, 0.75);
        assert_eq!(config.interaction.bounce_duration_ms, 600);
        assert_eq!(config.particles.count, 250);
        assert_eq!(config.particles.lifetime_max, 150);
        assert_eq!(config.camera, CameraConfig::default());
    }

    #[test]
    fn test_toml_and_ron_round_trip() {
        let mut config = SceneConfig::default();
        config.particles.seed = Some(7);
        config.audio.click_sound = Some("sounds/ding.ogg".to_string());

        for format in [ConfigFormat::Toml, ConfigFormat::Ron] {
            let text = config.to_string_as(format).unwrap();
            let parsed = SceneConfig::from_str_as(&text, format).unwrap();
            assert_eq!(parsed, config, "round trip through {format:?}");
        }
    }

    #[test]
    fn test_invalid_lifetime_range() {
        let mut config = SceneConfig::default();
        config.particles.lifetime_max = config.particles.lifetime_min;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "particles.lifetime_min", .. })
        ));
    }

    #[test]
    fn test_nan_in_toml_is_rejected() {
        let text = "[particles]\nbounds_min = [nan, 5.0, -15.0]\n";
        let config = SceneConfig::from_str_as(text, ConfigFormat::Toml).unwrap();
        assert!(config.particles.bounds_min[0].is_nan());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "particles.bounds_min", .. })
        ));

        let text = "[camera]\nnear = nan\n";
        let config = SceneConfig::from_str_as(text, ConfigFormat::Toml).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_infinite_speed_is_rejected() {
        let mut config = SceneConfig::default();
        config.particles.max_speed = f32::INFINITY;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "particles.max_speed", .. })
        ));
    }

    #[test]
    fn test_invalid_click_volume() {
        let mut config = SceneConfig::default();
        config.interaction.click_volume = 1.5;
        assert!(config.validate().is_err());
    }
}
