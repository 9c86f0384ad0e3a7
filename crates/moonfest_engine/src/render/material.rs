//! Colours and surface materials
//!
//! Materials here are plain data. A renderer maps them onto whatever shading
//! model it implements; the engine only mutates colour, emissive and opacity.

use serde::{Deserialize, Serialize};

/// Linear RGB colour, components in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red
    pub r: f32,
    /// Green
    pub g: f32,
    /// Blue
    pub b: f32,
}

impl Color {
    /// Pure white
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    /// Pure black
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);

    /// Build from components
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build from a 0xRRGGBB value
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| ((hex >> shift) & 0xFF) as f32 / 255.0;
        Self::rgb(channel(16), channel(8), channel(0))
    }

    /// Pack into 0xRRGGBB, rounding each channel
    pub fn to_hex(self) -> u32 {
        let channel = |value: f32| (value.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }

    /// Build from hue, saturation and lightness, all in [0, 1]
    pub fn from_hsl(hue: f32, saturation: f32, lightness: f32) -> Self {
        if saturation <= 0.0 {
            return Self::rgb(lightness, lightness, lightness);
        }
        let q = if lightness <= 0.5 {
            lightness * (1.0 + saturation)
        } else {
            lightness + saturation - lightness * saturation
        };
        let p = 2.0 * lightness - q;
        let hue = hue.rem_euclid(1.0);
        Self::rgb(
            hue_to_channel(p, q, hue + 1.0 / 3.0),
            hue_to_channel(p, q, hue),
            hue_to_channel(p, q, hue - 1.0 / 3.0),
        )
    }
}

fn hue_to_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * 6.0 * (2.0 / 3.0 - t)
    } else {
        p
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Surface material of a renderable node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Base colour
    pub color: Color,
    /// Emitted colour
    pub emissive: Color,
    /// Emission strength multiplier
    pub emissive_intensity: f32,
    /// 0 = invisible, 1 = opaque
    pub opacity: f32,
}

impl Material {
    /// Opaque, non-emissive material of the given colour
    pub fn solid(color: Color) -> Self {
        Self {
            color,
            emissive: Color::BLACK,
            emissive_intensity: 0.0,
            opacity: 1.0,
        }
    }

    /// Material that glows in its own colour
    pub fn glowing(color: Color, intensity: f32) -> Self {
        Self {
            color,
            emissive: color,
            emissive_intensity: intensity,
            opacity: 1.0,
        }
    }

    /// Builder-style opacity
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::solid(Color::WHITE)
    }
}
