//! # Preview Camera
//!
//! Perspective camera the back end uses to frame the text mesh. Interactive
//! orbit controls belong to the back end; this type only describes the
//! starting placement.
//!
//! Uses a right-handed Y-up coordinate system with OpenGL clip-space
//! conventions, matching the layout's +Y-up baseline.

use crate::core::config::CameraConfig;
use crate::foundation::math::{deg_to_rad, Mat4, Point3, Vec3};

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
    /// Create a perspective camera looking at the origin with +Y up
    ///
    /// `fov_degrees` is converted to radians internally.
    pub fn perspective(position: Vec3, fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position,
            target: Vec3::zeros(),
            up: Vec3::new(0.0, 1.0, 0.0),
            fov: deg_to_rad(fov_degrees),
            aspect,
            near,
            far,
        }
    }

    /// Build the camera described by a configuration section
    pub fn from_config(config: &CameraConfig, aspect: f32) -> Self {
        let mut camera = Self::perspective(
            Vec3::from(config.position),
            config.fov_degrees,
            aspect,
            config.near,
            config.far,
        );
        camera.look_at(Vec3::from(config.target), Vec3::from(config.up));
        camera
    }

    /// Point the camera at `target` with the given up vector
    pub fn look_at(&mut self, target: Vec3, up: Vec3) {
        self.target = target;
        self.up = up;
        log::trace!("Camera look_at updated - target: {:?}, up: {:?}", target, up);
    }

    /// Update aspect ratio for viewport changes
    pub fn set_aspect_ratio(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    /// World-to-camera transform
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(&Point3::from(self.position), &Point3::from(self.target), &self.up)
    }

    /// Camera-to-clip transform
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::new_perspective(self.aspect, self.fov, self.near, self.far)
    }

    /// Combined projection * view
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}
