//! Math utilities and types
//!
//! Thin aliases over `nalgebra` so layout, camera and uniform code agree on
//! one set of vector types.

pub use nalgebra::{Matrix4, Point3, Vector2, Vector3};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 2D integer vector, used for atlas pixel coordinates
pub type UVec2 = Vector2<u32>;

/// Convert degrees to radians
pub fn deg_to_rad(degrees: f32) -> f32 {
    degrees.to_radians()
}
