//! The shape facade
//!
//! A [`Shape`] stores its geometry in local space together with a transform.
//! Transformed vertices and the bounding box are computed lazily on first
//! read and cached until the next mutation, so chained setters cost nothing
//! and repeated queries reuse the same arrays.

use std::cell::OnceCell;

use crate::config::CollisionConfig;
use crate::foundation::collections::OwnerId;
use crate::foundation::math::{constants, utils, Vec2};

use super::dispatch;
use super::primitives::{Aabb, CollisionInfo, LineKind};
use super::transform::{self, LocalTransform};

/// The closed set of shape kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(usize)]
pub enum ShapeType {
    /// Blank shape; never collides
    #[default]
    None = 0,
    /// Single point
    Point,
    /// Line segment between two endpoints
    Edge,
    /// Half-infinite line from its first point through its second
    Ray,
    /// Infinite line through two points
    Line,
    /// Axis-aligned rectangle
    Rectangle,
    /// Convex polygon, any winding
    Polygon,
    /// Circle encoded as center and a point on the radius
    Circle,
    /// Annulus encoded as center, outer radius point and inner radius point
    Donut,
}

impl ShapeType {
    /// Number of shape kinds
    pub const COUNT: usize = 9;

    /// Every shape kind, in table order
    pub const ALL: [ShapeType; Self::COUNT] = [
        Self::None,
        Self::Point,
        Self::Edge,
        Self::Ray,
        Self::Line,
        Self::Rectangle,
        Self::Polygon,
        Self::Circle,
        Self::Donut,
    ];

    /// Row/column of this kind in the dispatch table
    pub fn index(self) -> usize {
        self as usize
    }

    /// Rays and lines extend forever and have no finite bounds
    pub fn is_bounded(self) -> bool {
        !matches!(self, Self::Ray | Self::Line)
    }

    /// Endpoint classification for line-family kinds
    pub fn line_kind(self) -> Option<LineKind> {
        match self {
            Self::Edge => Some(LineKind::Segment),
            Self::Ray => Some(LineKind::Ray),
            Self::Line => Some(LineKind::Line),
            _ => None,
        }
    }
}

/// Shape construction and editing errors
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ShapeError {
    /// Donut whose hole is bigger than the ring
    #[error("Donut inner radius {inner} exceeds outer radius {outer}")]
    InnerRadiusExceedsOuter {
        /// Requested inner radius
        inner: f32,
        /// Requested outer radius
        outer: f32,
    },

    /// Negative or non-finite radius
    #[error("Invalid radius: {0}")]
    InvalidRadius(f32),

    /// Vertex edit past the end of the vertex list
    #[error("Vertex index {index} out of range for shape with {len} vertices")]
    VertexOutOfRange {
        /// Requested index
        index: usize,
        /// Number of vertices
        len: usize,
    },
}

/// A 2D collision shape with a lazily cached local transform
#[derive(Debug, Clone, Default)]
pub struct Shape {
    shape_type: ShapeType,
    position: Vec2,
    transform: LocalTransform,
    vertices: Vec<Vec2>,
    transformed: OnceCell<Vec<Vec2>>,
    bounds: OnceCell<Aabb>,
    owner: Option<OwnerId>,
}

impl Shape {
    /// Creates a blank shape
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a point shape
    pub fn point(point: Vec2) -> Self {
        let mut shape = Self::new();
        shape.set_shape_to_point(point);
        shape
    }

    /// Creates a segment between `start` and `end`
    pub fn edge(start: Vec2, end: Vec2) -> Self {
        let mut shape = Self::new();
        shape.set_shape_to_edge(start, end);
        shape
    }

    /// Creates a ray starting at `origin` and passing through `through`
    pub fn ray(origin: Vec2, through: Vec2) -> Self {
        let mut shape = Self::new();
        shape.set_shape_to_ray(origin, through);
        shape
    }

    /// Creates an infinite line through two points
    pub fn line(a: Vec2, b: Vec2) -> Self {
        let mut shape = Self::new();
        shape.set_shape_to_line(a, b);
        shape
    }

    /// Creates a rectangle from its minimum corner and size
    pub fn rectangle(x: f32, y: f32, width: f32, height: f32) -> Self {
        let mut shape = Self::new();
        shape.set_shape_to_rectangle(x, y, width, height);
        shape
    }

    /// Creates a convex polygon
    pub fn polygon(points: &[Vec2]) -> Self {
        let mut shape = Self::new();
        shape.set_shape_to_polygon(points);
        shape
    }

    /// Creates a regular polygon centered on the local origin
    pub fn regular_polygon(sides: usize, radius: f32) -> Self {
        let mut shape = Self::new();
        shape.set_shape_to_regular_polygon(sides, radius);
        shape
    }

    /// Creates a circle
    pub fn circle(center: Vec2, radius: f32) -> Self {
        let mut shape = Self::new();
        shape.set_shape_to_circle(center, radius);
        shape
    }

    /// Creates a donut (annulus)
    pub fn donut(center: Vec2, outer_radius: f32, inner_radius: f32) -> Result<Self, ShapeError> {
        let mut shape = Self::new();
        shape.set_shape_to_donut(center, outer_radius, inner_radius)?;
        Ok(shape)
    }

    fn reshape(&mut self, shape_type: ShapeType, vertices: Vec<Vec2>) {
        self.shape_type = shape_type;
        self.vertices = vertices;
        self.invalidate();
    }

    /// Clear both caches; the next read recomputes them
    fn invalidate(&mut self) {
        self.transformed.take();
        self.bounds.take();
    }

    /// Turn this into a blank shape
    pub fn set_shape_to_none(&mut self) {
        self.reshape(ShapeType::None, Vec::new());
    }

    /// Turn this into a point
    pub fn set_shape_to_point(&mut self, point: Vec2) {
        self.reshape(ShapeType::Point, vec![point]);
    }

    /// Turn this into a segment
    pub fn set_shape_to_edge(&mut self, start: Vec2, end: Vec2) {
        self.reshape(ShapeType::Edge, vec![start, end]);
    }

    /// Turn this into a ray from `origin` through `through`
    pub fn set_shape_to_ray(&mut self, origin: Vec2, through: Vec2) {
        self.reshape(ShapeType::Ray, vec![origin, through]);
    }

    /// Turn this into an infinite line
    pub fn set_shape_to_line(&mut self, a: Vec2, b: Vec2) {
        self.reshape(ShapeType::Line, vec![a, b]);
    }

    /// Turn this into a rectangle; negative sizes extend toward negative axes
    pub fn set_shape_to_rectangle(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let aabb = Aabb::new(Vec2::new(x, y), Vec2::new(x + width, y + height));
        self.reshape(ShapeType::Rectangle, aabb.corners().to_vec());
    }

    /// Turn this into a convex polygon
    pub fn set_shape_to_polygon(&mut self, points: &[Vec2]) {
        self.reshape(ShapeType::Polygon, points.to_vec());
    }

    /// Turn this into a regular polygon with `sides` corners on a circle of `radius`
    pub fn set_shape_to_regular_polygon(&mut self, sides: usize, radius: f32) {
        let step = constants::TAU / sides.max(1) as f32;
        let points = (0..sides)
            .map(|i| utils::rotate(Vec2::new(radius, 0.0), step * i as f32))
            .collect();
        self.reshape(ShapeType::Polygon, points);
    }

    /// Turn this into a circle
    pub fn set_shape_to_circle(&mut self, center: Vec2, radius: f32) {
        let radius = radius.abs();
        self.reshape(ShapeType::Circle, vec![center, center + Vec2::new(radius, 0.0)]);
    }

    /// Turn this into a donut; the shape is left untouched on error
    pub fn set_shape_to_donut(
        &mut self,
        center: Vec2,
        outer_radius: f32,
        inner_radius: f32,
    ) -> Result<(), ShapeError> {
        for radius in [outer_radius, inner_radius] {
            if !radius.is_finite() || radius < 0.0 {
                return Err(ShapeError::InvalidRadius(radius));
            }
        }
        if inner_radius > outer_radius {
            return Err(ShapeError::InnerRadiusExceedsOuter {
                inner: inner_radius,
                outer: outer_radius,
            });
        }
        self.reshape(
            ShapeType::Donut,
            vec![
                center,
                center + Vec2::new(outer_radius, 0.0),
                center + Vec2::new(inner_radius, 0.0),
            ],
        );
        Ok(())
    }

    /// Move the shape to a world position
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
        self.invalidate();
    }

    /// Move the shape by a world-space offset
    pub fn move_by(&mut self, offset: Vec2) {
        self.set_position(self.position + offset);
    }

    /// Set the local pivot for rotation and scale
    pub fn set_origin(&mut self, origin: Vec2) {
        self.transform.origin = origin;
        self.invalidate();
    }

    /// Set the rotation in radians
    pub fn set_rotation(&mut self, rotation: f32) {
        self.transform.rotation = rotation;
        self.invalidate();
    }

    /// Set the per-axis scale
    pub fn set_scale(&mut self, scale: Vec2) {
        self.transform.scale = scale;
        self.invalidate();
    }

    /// Set the local offset applied after rotation and scale
    pub fn set_translate(&mut self, translate: Vec2) {
        self.transform.translate = translate;
        self.invalidate();
    }

    /// Allow rectangles to rotate (they still collapse to an axis-aligned box)
    pub fn set_rectangular_rotation(&mut self, enabled: bool) {
        self.transform.rectangular_rotation = enabled;
        self.invalidate();
    }

    /// Edit a single local vertex
    pub fn set_vertex(&mut self, index: usize, vertex: Vec2) -> Result<(), ShapeError> {
        let len = self.vertices.len();
        let slot = self
            .vertices
            .get_mut(index)
            .ok_or(ShapeError::VertexOutOfRange { index, len })?;
        *slot = vertex;
        self.invalidate();
        Ok(())
    }

    /// Replace all local vertices, keeping the shape type
    ///
    /// The caller is responsible for supplying the layout the type expects.
    pub fn set_vertices(&mut self, vertices: Vec<Vec2>) {
        self.vertices = vertices;
        self.invalidate();
    }

    /// Attach an owner back-reference
    pub fn set_owner(&mut self, owner: Option<OwnerId>) {
        self.owner = owner;
    }

    /// Shape kind
    pub fn shape_type(&self) -> ShapeType {
        self.shape_type
    }

    /// World position
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Local pivot
    pub fn origin(&self) -> Vec2 {
        self.transform.origin
    }

    /// Rotation in radians
    pub fn rotation(&self) -> f32 {
        self.transform.rotation
    }

    /// Per-axis scale
    pub fn scale(&self) -> Vec2 {
        self.transform.scale
    }

    /// Local post-transform offset
    pub fn translate(&self) -> Vec2 {
        self.transform.translate
    }

    /// Whether rectangles honor rotation
    pub fn rectangular_rotation(&self) -> bool {
        self.transform.rectangular_rotation
    }

    /// The full local transform
    pub fn local_transform(&self) -> &LocalTransform {
        &self.transform
    }

    /// Raw local vertices
    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    /// Number of raw vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Owner back-reference
    pub fn owner(&self) -> Option<OwnerId> {
        self.owner
    }

    /// Whether the shape has finite bounds
    pub fn is_bounded(&self) -> bool {
        self.shape_type.is_bounded()
    }

    /// Whether both caches are currently populated
    pub fn is_cached(&self) -> bool {
        self.transformed.get().is_some() && self.bounds.get().is_some()
    }

    /// Vertices after origin, rotation, scale and translate, without position
    pub fn transformed_vertices(&self) -> &[Vec2] {
        self.transformed
            .get_or_init(|| self.transform.apply(self.shape_type, &self.vertices))
    }

    /// Local bounding box of the transformed vertices, without position
    pub fn bounding_box(&self) -> Aabb {
        *self
            .bounds
            .get_or_init(|| transform::bounding_box(self.shape_type, self.transformed_vertices()))
    }

    /// Bounding box at the current world position
    pub fn world_bounding_box(&self) -> Aabb {
        self.bounding_box().translated(self.position)
    }

    /// Transformed vertices at the current world position
    pub fn world_vertices(&self) -> Vec<Vec2> {
        self.transformed_vertices().iter().map(|v| v + self.position).collect()
    }

    /// World-space center: the circle center for round shapes, otherwise the vertex mean
    pub fn center(&self) -> Vec2 {
        let local = match self.shape_type {
            ShapeType::Circle | ShapeType::Donut => {
                self.transformed_vertices().first().copied().unwrap_or_else(Vec2::zeros)
            }
            _ => utils::centroid(self.transformed_vertices()),
        };
        local + self.position
    }

    /// Outer radius of a circle or donut
    pub fn radius(&self) -> Option<f32> {
        match (self.shape_type, self.transformed_vertices()) {
            (ShapeType::Circle | ShapeType::Donut, [center, outer, ..]) => Some((outer - center).norm()),
            _ => None,
        }
    }

    /// Inner radius of a donut
    pub fn inner_radius(&self) -> Option<f32> {
        match (self.shape_type, self.transformed_vertices()) {
            (ShapeType::Donut, [center, _, inner, ..]) => Some((inner - center).norm()),
            _ => None,
        }
    }

    /// Test this shape against another at their current positions
    pub fn intersects(&self, other: &Shape, config: &CollisionConfig) -> Option<CollisionInfo> {
        dispatch::collide(self, self.position, other, other.position, config)
    }

    /// Test this shape placed at `position` against another placed at `other_position`
    ///
    /// Neither shape is modified; cached geometry is reused as-is.
    pub fn intersects_at(
        &self,
        position: Vec2,
        other: &Shape,
        other_position: Vec2,
        config: &CollisionConfig,
    ) -> Option<CollisionInfo> {
        dispatch::collide(self, position, other, other_position, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_new_shape_is_blank() {
        let shape = Shape::new();
        assert_eq!(shape.shape_type(), ShapeType::None);
        assert!(shape.transformed_vertices().is_empty());
        assert_eq!(shape.scale(), Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_table_order_matches_discriminants() {
        for (i, shape_type) in ShapeType::ALL.iter().enumerate() {
            assert_eq!(shape_type.index(), i);
        }
        assert!(!ShapeType::Ray.is_bounded());
        assert!(ShapeType::None.is_bounded());
    }

    #[test]
    fn test_transformed_vertices_are_cached() {
        let shape = Shape::regular_polygon(6, 2.0);
        let first = shape.transformed_vertices();
        let second = shape.transformed_vertices();
        assert!(std::ptr::eq(first, second));

        shape.bounding_box();
        assert!(shape.is_cached());
    }

    #[test]
    fn test_setters_clear_caches() {
        let mut shape = Shape::rectangle(0.0, 0.0, 2.0, 2.0);
        shape.bounding_box();
        assert!(shape.is_cached());

        shape.set_scale(Vec2::new(2.0, 1.0));
        assert!(!shape.is_cached());
        assert_relative_eq!(shape.bounding_box().max, Vec2::new(4.0, 2.0));

        shape.set_translate(Vec2::new(1.0, 1.0));
        assert!(!shape.is_cached());
        assert_relative_eq!(shape.bounding_box().min, Vec2::new(1.0, 1.0));

        shape.set_vertex(2, Vec2::new(3.0, 3.0)).unwrap();
        assert!(!shape.is_cached());
    }

    #[test]
    fn test_position_not_baked_into_vertices() {
        let mut shape = Shape::edge(Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0));
        shape.set_position(Vec2::new(5.0, 5.0));
        assert_eq!(shape.transformed_vertices()[0], Vec2::new(0.0, 0.0));
        assert_eq!(shape.world_vertices()[0], Vec2::new(5.0, 5.0));
        assert_eq!(shape.world_bounding_box().min, Vec2::new(5.0, 5.0));
    }

    #[test]
    fn test_donut_validation() {
        assert!(matches!(
            Shape::donut(Vec2::zeros(), 1.0, 2.0),
            Err(ShapeError::InnerRadiusExceedsOuter { .. })
        ));
        assert!(matches!(Shape::donut(Vec2::zeros(), -1.0, 0.0), Err(ShapeError::InvalidRadius(_))));

        let mut shape = Shape::point(Vec2::zeros());
        assert!(shape.set_shape_to_donut(Vec2::zeros(), 1.0, 3.0).is_err());
        assert_eq!(shape.shape_type(), ShapeType::Point);

        let donut = Shape::donut(Vec2::new(1.0, 1.0), 4.0, 2.0).unwrap();
        assert_relative_eq!(donut.radius().unwrap(), 4.0);
        assert_relative_eq!(donut.inner_radius().unwrap(), 2.0);
        assert_relative_eq!(donut.center(), Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_circle_scale_changes_radius() {
        let mut circle = Shape::circle(Vec2::zeros(), 2.0);
        circle.set_scale(Vec2::new(3.0, 3.0));
        assert_relative_eq!(circle.radius().unwrap(), 6.0);
        assert_relative_eq!(circle.bounding_box().min, Vec2::new(-6.0, -6.0));
    }

    #[test]
    fn test_vertex_edit_out_of_range() {
        let mut shape = Shape::point(Vec2::zeros());
        assert_eq!(
            shape.set_vertex(3, Vec2::zeros()),
            Err(ShapeError::VertexOutOfRange { index: 3, len: 1 })
        );
    }

    #[test]
    fn test_rectangle_negative_size_normalized() {
        let rect = Shape::rectangle(2.0, 2.0, -2.0, -2.0);
        let aabb = rect.bounding_box();
        assert_eq!(aabb.min, Vec2::zeros());
        assert_eq!(aabb.max, Vec2::new(2.0, 2.0));
    }

    #[test]
    fn test_owner_is_identity_only() {
        let mut shape = Shape::point(Vec2::zeros());
        shape.set_owner(Some(OwnerId::new(42)));
        assert_eq!(shape.owner().map(|o| o.id()), Some(42));
    }
}
