//! Primitive collision types
//!
//! Axis-aligned boxes, the per-hit result record, and the endpoint
//! classification shared by the line-family algorithms.

use crate::foundation::math::Vec2;

/// An axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner
    pub min: Vec2,
    /// Maximum corner
    pub max: Vec2,
}

impl Aabb {
    /// Creates a box from two corners in any order
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self {
            min: Vec2::new(a.x.min(b.x), a.y.min(b.y)),
            max: Vec2::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Degenerate box at a single point
    pub fn from_point(point: Vec2) -> Self {
        Self { min: point, max: point }
    }

    /// Smallest box containing every point, or `None` for an empty slice
    pub fn from_points(points: &[Vec2]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        Some(rest.iter().fold(Self::from_point(*first), |aabb, p| Self {
            min: aabb.min.inf(p),
            max: aabb.max.sup(p),
        }))
    }

    /// Square of half-size `radius` around `center`
    pub fn around(center: Vec2, radius: f32) -> Self {
        let extent = Vec2::new(radius, radius);
        Self {
            min: center - extent,
            max: center + extent,
        }
    }

    /// The same box moved by `offset`
    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// The same box grown by `margin` on every side
    pub fn expanded(&self, margin: f32) -> Self {
        let extent = Vec2::new(margin, margin);
        Self {
            min: self.min - extent,
            max: self.max + extent,
        }
    }

    /// Corners in counter-clockwise order starting at `min`
    pub fn corners(&self) -> [Vec2; 4] {
        [
            self.min,
            Vec2::new(self.max.x, self.min.y),
            self.max,
            Vec2::new(self.min.x, self.max.y),
        ]
    }

    /// Center point
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Width and height
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Inclusive point containment
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }

    /// Inclusive overlap test; touching boxes overlap
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }
}

/// Result of a successful narrow-phase test
///
/// Reported from the point of view of the first shape (A) in the query.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CollisionInfo {
    /// Translation that moves A clear of B.
    ///
    /// Present only when push vectors are enabled and the pair has an
    /// area-vs-area resolution.
    pub push_vector: Option<Vec2>,

    /// `(t, u)` intersection parameters along A and B for line-family pairs
    pub line_params: Option<(f32, f32)>,
}

impl CollisionInfo {
    /// A hit that carries no extra data
    pub fn hit() -> Self {
        Self::default()
    }

    /// A hit with a push vector
    pub fn with_push(push_vector: Vec2) -> Self {
        Self {
            push_vector: Some(push_vector),
            line_params: None,
        }
    }

    /// A line-family hit at parameters `t` (on A) and `u` (on B)
    pub fn at_params(t: f32, u: f32) -> Self {
        Self {
            push_vector: None,
            line_params: Some((t, u)),
        }
    }

    /// The same hit seen from B: push negated, parameters swapped
    pub fn reversed(self) -> Self {
        Self {
            push_vector: self.push_vector.map(|v| -v),
            line_params: self.line_params.map(|(t, u)| (u, t)),
        }
    }
}

/// How many endpoints bound a line-family shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Infinite line, no endpoints
    Line,
    /// Ray, bounded at its origin
    Ray,
    /// Segment, bounded at both ends
    Segment,
}

impl LineKind {
    /// Number of bounding endpoints (0, 1 or 2)
    pub fn endpoint_count(self) -> u8 {
        match self {
            Self::Line => 0,
            Self::Ray => 1,
            Self::Segment => 2,
        }
    }

    /// Parameter interval `[lo, hi]` covered by this kind along its own direction
    ///
    /// The first endpoint bounds the start at 0, the second bounds the end at 1.
    pub fn param_range(self) -> (f32, f32) {
        let ends = self.endpoint_count();
        let lo = if ends >= 1 { 0.0 } else { f32::NEG_INFINITY };
        let hi = if ends >= 2 { 1.0 } else { f32::INFINITY };
        (lo, hi)
    }

    /// Clamp a parameter into the valid range
    pub fn clamp(self, t: f32) -> f32 {
        let (lo, hi) = self.param_range();
        t.clamp(lo, hi)
    }

    /// Whether a parameter lies in the valid range
    pub fn contains(self, t: f32) -> bool {
        let (lo, hi) = self.param_range();
        t >= lo && t <= hi
    }
}
