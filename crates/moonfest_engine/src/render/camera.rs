//! # Perspective Camera
//!
//! The camera the scene is viewed through, and the inverse mapping picking
//! needs: from a normalized device coordinate back to a world-space ray.
//!
//! ## Conventions
//! - Right-handed, Y-up world space
//! - NDC X and Y in [-1, 1] with +Y pointing up the screen
//! - NDC Z in [-1, 1] from near to far plane
//!
//! Orbit controls live in the host; they move `position` and `target` and the
//! engine reads whatever they left behind at the start of each frame.

use crate::core::config::CameraConfig;
use crate::foundation::math::{utils, Mat4, Point3, Vec3, Vec4};
use crate::physics::collision::Ray;
use nalgebra::Perspective3;

/// Perspective camera
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vec3,

    /// Point the camera is looking at in world space
    pub target: Vec3,

    /// Up vector for camera orientation (typically [0, 1, 0])
    pub up: Vec3,

    /// Vertical field of view in radians
    pub fov: f32,

    /// Aspect ratio (width / height)
    pub aspect: f32,

    /// Distance to near clipping plane
    pub near: f32,

    /// Distance to far clipping plane
    pub far: f32,
}

impl Camera {
    /// Create a perspective camera looking at the origin
    ///
    /// # Arguments
    /// * `position` - Camera position in world space
    /// * `fov_degrees` - Vertical field of view in degrees
    /// * `aspect` - Width over height of the viewport
    /// * `near` - Distance to near clipping plane (must be > 0)
    /// * `far` - Distance to far clipping plane (must be > near)
    pub fn perspective(position: Vec3, fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position,
            target: Vec3::zeros(),
            up: Vec3::new(0.0, 1.0, 0.0),
            fov: utils::deg_to_rad(fov_degrees),
            aspect,
            near,
            far,
        }
    }

    /// Build from the session configuration
    pub fn from_config(config: &CameraConfig) -> Self {
        let mut camera = Self::perspective(
            Vec3::from(config.position),
            config.fov_degrees,
            config.aspect(),
            config.near,
            config.far,
        );
        camera.target = Vec3::from(config.target);
        camera
    }

    /// World-to-view matrix
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(
            &Point3::from(self.position),
            &Point3::from(self.target),
            &self.up,
        )
    }

    /// View-to-clip matrix
    pub fn projection_matrix(&self) -> Mat4 {
        Perspective3::new(self.aspect, self.fov, self.near, self.far).to_homogeneous()
    }

    /// Combined world-to-clip matrix
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Convert a normalized device coordinate into a world-space ray
    ///
    /// Unprojects the NDC point on the near and far planes; the ray starts at
    /// the camera position and passes through both.
    ///
    /// Returns `None` when the view-projection matrix is singular, which only
    /// happens for a degenerate camera (eye on target, zero aspect).
    pub fn screen_to_world_ray(&self, ndc_x: f32, ndc_y: f32) -> Option<Ray> {
        if (self.target - self.position).norm_squared() <= f32::EPSILON {
            return None;
        }
        let inv_view_proj = self.view_projection_matrix().try_inverse()?;

        let unproject = |z: f32| {
            let h = inv_view_proj * Vec4::new(ndc_x, ndc_y, z, 1.0);
            Vec3::new(h.x / h.w, h.y / h.w, h.z / h.w)
        };
        let world_near = unproject(-1.0);
        let world_far = unproject(1.0);

        let direction = world_far - world_near;
        if direction.norm_squared() <= f32::EPSILON {
            return None;
        }
        Some(Ray::new(self.position, direction))
    }
}

impl Default for Camera {
    /// The festival scene's camera: slightly above and left of the house
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_center_ray_follows_view_direction() {
        let camera = Camera::default();
        let ray = camera.screen_to_world_ray(0.0, 0.0).unwrap();

        let expected = (camera.target - camera.position).normalize();
        assert_relative_eq!(ray.direction, expected, epsilon = 1e-4);
        assert_eq!(ray.origin, camera.position);
    }

    #[test]
    fn test_top_of_screen_points_up() {
        let camera = Camera::perspective(Vec3::new(0.0, 0.0, 10.0), 60.0, 1.0, 0.1, 100.0);
        let ray = camera.screen_to_world_ray(0.0, 1.0).unwrap();

        assert!(ray.direction.y > 0.0);
        // Half the vertical field of view above the axis
        let angle = ray.direction.y.atan2(-ray.direction.z);
        assert_relative_eq!(angle, utils::deg_to_rad(30.0), epsilon = 1e-4);
    }

    #[test]
    fn test_degenerate_camera_has_no_ray() {
        let camera = Camera::perspective(Vec3::zeros(), 60.0, 1.0, 0.1, 100.0);
        assert!(camera.screen_to_world_ray(0.0, 0.0).is_none());
    }
}
