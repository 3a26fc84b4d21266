//! Narrow-phase collision algorithms
//!
//! One handler per unordered pair of shape kinds. Every handler receives both
//! shapes plus an explicit world offset for each, so cached transformed
//! vertices can be tested at any placement without re-transforming.
//!
//! Handlers report from the point of view of their first operand; the
//! dispatch table takes care of swapping operands for reversed pairs.
//!
//! - [`point`] - point against everything
//! - [`line`] - segments, rays and infinite lines
//! - [`polygon`] - rectangles and convex polygons (SAT)
//! - [`round`] - circles and donuts

pub mod line;
pub mod point;
pub mod polygon;
pub mod round;

use crate::config::CollisionConfig;
use crate::foundation::math::{utils, Vec2};

use super::primitives::{CollisionInfo, LineKind};
use super::shape::{Shape, ShapeType};

/// Signature shared by every narrow-phase handler
pub type Handler = fn(&Shape, Vec2, &Shape, Vec2, &CollisionConfig) -> Option<CollisionInfo>;

/// A convex vertex set placed at a world offset
#[derive(Debug, Clone, Copy)]
pub struct Convex<'a> {
    points: &'a [Vec2],
    offset: Vec2,
}

impl<'a> Convex<'a> {
    /// Transformed vertices of `shape` placed at `offset`
    pub fn of(shape: &'a Shape, offset: Vec2) -> Self {
        Self {
            points: shape.transformed_vertices(),
            offset,
        }
    }

    /// Local points (without offset)
    pub fn points(&self) -> &'a [Vec2] {
        self.points
    }

    /// World offset
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Number of vertices
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether there are no vertices
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Fewer than three vertices enclose no area and never collide
    pub fn is_area(&self) -> bool {
        self.points.len() >= 3
    }

    /// World-space vertex `i`
    pub fn vertex(&self, i: usize) -> Vec2 {
        self.points[i] + self.offset
    }

    /// World-space edges, closing back to the first vertex
    pub fn edges(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.vertex(i), self.vertex((i + 1) % n)))
    }

    /// Unnormalized edge normals; zero-length edges yield zero vectors
    pub fn edge_normals(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.edges().map(|(a, b)| utils::perp(b - a))
    }

    /// Projection interval on `axis`
    pub fn project(&self, axis: Vec2) -> (f32, f32) {
        utils::project(self.points, self.offset, axis)
    }

    /// World-space vertex mean
    pub fn centroid(&self) -> Vec2 {
        utils::centroid(self.points) + self.offset
    }
}

/// A world-space line-family shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineGeom {
    /// First point (the origin for rays)
    pub start: Vec2,
    /// Second point
    pub end: Vec2,
    /// Endpoint classification
    pub kind: LineKind,
}

impl LineGeom {
    /// World-space line for a line-family shape
    pub fn of(shape: &Shape, offset: Vec2) -> Option<Self> {
        let kind = shape.shape_type().line_kind()?;
        match shape.transformed_vertices() {
            [start, end, ..] => Some(Self {
                start: start + offset,
                end: end + offset,
                kind,
            }),
            _ => None,
        }
    }

    /// A bounded segment
    pub fn segment(start: Vec2, end: Vec2) -> Self {
        Self {
            start,
            end,
            kind: LineKind::Segment,
        }
    }

    /// Direction from start to end (not normalized)
    pub fn direction(&self) -> Vec2 {
        self.end - self.start
    }

    /// Zero-length lines collide with nothing
    pub fn is_degenerate(&self) -> bool {
        self.direction().norm_squared() == 0.0
    }

    /// Point at parameter `t`
    pub fn at(&self, t: f32) -> Vec2 {
        self.start + self.direction() * t
    }

    /// Parameter of the point on this line closest to `point`, clamped to its range
    pub fn closest_param(&self, point: Vec2) -> f32 {
        let direction = self.direction();
        let t = (point - self.start).dot(&direction) / direction.norm_squared();
        self.kind.clamp(t)
    }

    /// Squared distance from `point` to this line
    pub fn distance_squared(&self, point: Vec2) -> f32 {
        (self.at(self.closest_param(point)) - point).norm_squared()
    }
}

/// A world-space circle or donut; circles have a zero inner radius
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Round {
    /// Center
    pub center: Vec2,
    /// Outer radius
    pub outer: f32,
    /// Inner (hole) radius
    pub inner: f32,
}

impl Round {
    /// World-space circle or donut for a round shape
    pub fn of(shape: &Shape, offset: Vec2) -> Option<Self> {
        let center = *shape.transformed_vertices().first()?;
        Some(Self {
            center: center + offset,
            outer: shape.radius()?,
            inner: shape.inner_radius().unwrap_or(0.0),
        })
    }

    /// Whether `point` is strictly inside the hole
    pub fn hole_contains(&self, point: Vec2) -> bool {
        (point - self.center).norm_squared() < self.inner * self.inner
    }
}

/// World position of a point shape
pub fn point_of(shape: &Shape, offset: Vec2) -> Option<Vec2> {
    debug_assert_eq!(shape.shape_type(), ShapeType::Point);
    shape.transformed_vertices().first().map(|p| p + offset)
}
