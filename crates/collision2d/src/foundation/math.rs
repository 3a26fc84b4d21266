//! Math utilities and types
//!
//! Provides the 2D vector type used by every shape and the handful of
//! geometric helpers shared by the narrow phase.

pub use nalgebra::{Rotation2, Vector2, Vector4};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// RGBA color, used by the debug drawing surface
pub type Vec4 = Vector4<f32>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// 2 * Pi
    pub const TAU: f32 = 2.0 * PI;
}

/// Math utility functions
pub mod utils {
    use super::{Rotation2, Vec2};

    /// 2D cross product (z component of the 3D cross product)
    pub fn cross(a: Vec2, b: Vec2) -> f32 {
        a.x * b.y - a.y * b.x
    }

    /// Left-hand perpendicular of a vector
    pub fn perp(v: Vec2) -> Vec2 {
        Vec2::new(-v.y, v.x)
    }

    /// Rotate a vector counter-clockwise by `angle` radians
    pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
        Rotation2::new(angle) * v
    }

    /// Arithmetic mean of a set of points, or the zero vector for an empty set
    pub fn centroid(points: &[Vec2]) -> Vec2 {
        if points.is_empty() {
            return Vec2::zeros();
        }
        let sum = points.iter().fold(Vec2::zeros(), |acc, p| acc + p);
        sum / points.len() as f32
    }

    /// Project points onto an axis and return the `(min, max)` interval
    pub fn project(points: &[Vec2], offset: Vec2, axis: Vec2) -> (f32, f32) {
        points.iter().fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), p| {
            let d = (p + offset).dot(&axis);
            (lo.min(d), hi.max(d))
        })
    }

    /// True when two vectors are parallel relative to their lengths
    pub fn is_parallel(a: Vec2, b: Vec2) -> bool {
        cross(a, b).abs() <= f32::EPSILON * a.norm() * b.norm()
    }
}
