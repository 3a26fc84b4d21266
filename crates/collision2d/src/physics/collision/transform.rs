//! Local transform pipeline
//!
//! Turns raw local vertices into transformed vertices and derives the
//! bounding box from them. World position is deliberately not part of this
//! stage: it is added at query time so the same cached geometry can be tested
//! at any hypothetical placement.

use crate::foundation::math::{utils, Vec2};

use super::primitives::Aabb;
use super::shape::ShapeType;

/// The part of a shape's transform that is baked into cached vertices
#[derive(Debug, Clone, PartialEq)]
pub struct LocalTransform {
    /// Pivot subtracted before rotation and scale
    pub origin: Vec2,
    /// Rotation in radians, counter-clockwise
    pub rotation: f32,
    /// Per-axis scale
    pub scale: Vec2,
    /// Offset added after rotation and scale
    pub translate: Vec2,
    /// Rectangles only rotate when this is set
    pub rectangular_rotation: bool,
}

impl Default for LocalTransform {
    fn default() -> Self {
        Self {
            origin: Vec2::zeros(),
            rotation: 0.0,
            scale: Vec2::new(1.0, 1.0),
            translate: Vec2::zeros(),
            rectangular_rotation: false,
        }
    }
}

impl LocalTransform {
    /// Whether rotation applies to a shape of this type
    pub fn rotates(&self, shape_type: ShapeType) -> bool {
        if self.rotation == 0.0 {
            return false;
        }
        match shape_type {
            ShapeType::Rectangle => self.rectangular_rotation,
            // The radius-point encoding is rotation invariant
            ShapeType::Circle | ShapeType::Donut => false,
            _ => true,
        }
    }

    /// Run the full pipeline: origin, rotation, scale, translate
    pub fn apply(&self, shape_type: ShapeType, vertices: &[Vec2]) -> Vec<Vec2> {
        let rotate = self.rotates(shape_type);
        let mut out: Vec<Vec2> = vertices
            .iter()
            .map(|v| {
                let mut p = v - self.origin;
                if rotate {
                    p = utils::rotate(p, self.rotation);
                }
                p.component_mul(&self.scale) + self.translate
            })
            .collect();

        // Rotated rectangles stay axis aligned: collapse to their own box
        if rotate && shape_type == ShapeType::Rectangle {
            if let Some(aabb) = Aabb::from_points(&out) {
                out = aabb.corners().to_vec();
            }
        }
        out
    }
}

/// Derive the local bounding box from transformed vertices
pub fn bounding_box(shape_type: ShapeType, transformed: &[Vec2]) -> Aabb {
    match shape_type {
        ShapeType::Circle | ShapeType::Donut => match transformed {
            [center, outer, ..] => Aabb::around(*center, (outer - center).norm()),
            [center] => Aabb::from_point(*center),
            [] => Aabb::from_point(Vec2::zeros()),
        },
        _ => Aabb::from_points(transformed).unwrap_or_else(|| Aabb::from_point(Vec2::zeros())),
    }
}
