//! Pointer events for picking operations
//!
//! Provides utilities for converting screen-space click positions to
//! Normalized Device Coordinates (NDC) for ray casting.

/// A single click, in viewport pixels
///
/// Produced by the host input system and consumed exactly once by the
/// picking system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Screen-space X position (pixels from the left edge)
    pub screen_x: f64,
    /// Screen-space Y position (pixels from the top edge)
    pub screen_y: f64,
    /// Viewport width in pixels
    pub viewport_width: u32,
    /// Viewport height in pixels
    pub viewport_height: u32,
}

impl PointerEvent {
    /// Create a click event
    pub fn new(screen_x: f64, screen_y: f64, viewport_width: u32, viewport_height: u32) -> Self {
        Self {
            screen_x,
            screen_y,
            viewport_width,
            viewport_height,
        }
    }

    /// Convert screen coordinates to Normalized Device Coordinates (NDC)
    ///
    /// NDC range: [-1, 1] where:
    /// - X: -1 = left, +1 = right
    /// - Y: -1 = bottom, +1 = top (screen Y grows downward, so it is flipped)
    ///
    /// Returns `None` for a zero-sized viewport.
    ///
    /// # Examples
    /// ```
    /// # use moonfest_engine::input::picking::PointerEvent;
    /// let click = PointerEvent::new(400.0, 300.0, 800, 600);
    /// assert_eq!(click.to_ndc(), Some((0.0, 0.0)));
    ///
    /// let top_left = PointerEvent::new(0.0, 0.0, 800, 600);
    /// assert_eq!(top_left.to_ndc(), Some((-1.0, 1.0)));
    /// ```
    pub fn to_ndc(&self) -> Option<(f32, f32)> {
        if self.viewport_width == 0 || self.viewport_height == 0 {
            return None;
        }
        let ndc_x = (self.screen_x / f64::from(self.viewport_width)) * 2.0 - 1.0;
        let ndc_y = 1.0 - (self.screen_y / f64::from(self.viewport_height)) * 2.0;
        Some((ndc_x as f32, ndc_y as f32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_to_ndc_center() {
        let click = PointerEvent::new(960.0, 540.0, 1920, 1080);

        let (ndc_x, ndc_y) = click.to_ndc().unwrap();
        assert!((ndc_x - 0.0).abs() < 0.001);
        assert!((ndc_y - 0.0).abs() < 0.001);
    }

    #[test]
    fn test_screen_to_ndc_corners() {
        let top_left = PointerEvent::new(0.0, 0.0, 1920, 1080);
        assert_eq!(top_left.to_ndc(), Some((-1.0, 1.0)));

        let bottom_right = PointerEvent::new(1920.0, 1080.0, 1920, 1080);
        assert_eq!(bottom_right.to_ndc(), Some((1.0, -1.0)));
    }

    #[test]
    fn test_zero_viewport() {
        assert_eq!(PointerEvent::new(1.0, 1.0, 0, 600).to_ndc(), None);
    }
}
