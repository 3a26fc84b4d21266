//! Collision-specific debug visualization
//!
//! Draws shapes, bounding boxes, push vectors and occupied partition cells
//! through an optional [`DebugDraw`] surface. Without a surface every call
//! does nothing.

use std::collections::HashSet;

use crate::config::{CollisionConfig, DebugDrawConfig};
use crate::foundation::collections::{ShapeKey, ShapeStore};
use crate::foundation::math::{constants, utils, Vec2, Vec4};
use crate::physics::collision::narrow_phase::LineGeom;
use crate::physics::collision::{CollisionInfo, Shape, ShapeType};
use crate::spatial::{CollisionPair, SpatialPartition};

use super::draw::DebugDraw;

/// Collision-specific debug visualizer
pub struct CollisionDebugVisualizer {
    surface: Option<Box<dyn DebugDraw>>,
    config: DebugDrawConfig,
    circle_segments: u32,

    /// Show collision shapes
    pub show_shapes: bool,

    /// Show world bounding boxes
    pub show_bounds: bool,

    /// Show push vectors
    pub show_push_vectors: bool,

    /// Show occupied partition cells
    pub show_partition: bool,
}

impl CollisionDebugVisualizer {
    /// Create a visualizer with no surface attached
    pub fn new(config: DebugDrawConfig) -> Self {
        Self {
            surface: None,
            config,
            circle_segments: CollisionConfig::default().circle_segments,
            show_shapes: true,
            show_bounds: false,
            show_push_vectors: true,
            show_partition: false,
        }
    }

    /// Attach a drawing surface
    pub fn with_surface(mut self, surface: Box<dyn DebugDraw>) -> Self {
        self.surface = Some(surface);
        self
    }

    /// Take tessellation settings from a collision config
    pub fn with_collision_config(mut self, config: &CollisionConfig) -> Self {
        self.circle_segments = config.circle_segments.max(3);
        self
    }

    /// Replace (or remove) the drawing surface, returning the old one
    pub fn set_surface(&mut self, surface: Option<Box<dyn DebugDraw>>) -> Option<Box<dyn DebugDraw>> {
        std::mem::replace(&mut self.surface, surface)
    }

    /// Whether a surface is attached
    pub fn has_surface(&self) -> bool {
        self.surface.is_some()
    }

    /// Current colors and extents
    pub fn config(&self) -> &DebugDrawConfig {
        &self.config
    }

    /// Draw a shape at its world position
    pub fn draw_shape(&mut self, shape: &Shape, is_colliding: bool) {
        if !self.show_shapes {
            return;
        }
        let color = if is_colliding {
            self.config.colliding_color
        } else {
            self.config.shape_color
        };
        let extent = self.config.line_extent;
        let segments = self.circle_segments;
        let Some(surface) = self.surface.as_deref_mut() else {
            return;
        };

        let position = shape.position();
        match shape.shape_type() {
            ShapeType::None => {}
            ShapeType::Point => {
                if let Some(point) = shape.transformed_vertices().first() {
                    surface.draw_point(point + position, color);
                }
            }
            ShapeType::Edge | ShapeType::Ray | ShapeType::Line => {
                if let Some(line) = LineGeom::of(shape, position) {
                    let (start, end) = visible_span(&line, extent);
                    surface.stroke_line(start, end, color);
                }
            }
            ShapeType::Rectangle | ShapeType::Polygon => {
                surface.fill_polygon(&shape.world_vertices(), color);
            }
            ShapeType::Circle => {
                if let Some(radius) = shape.radius() {
                    surface.draw_circle(shape.center(), radius, color);
                }
            }
            ShapeType::Donut => {
                if let (Some(outer), Some(inner)) = (shape.radius(), shape.inner_radius()) {
                    for quad in ring_quads(shape.center(), outer, inner, segments) {
                        surface.fill_polygon(&quad, color);
                    }
                }
            }
        }
    }

    /// Outline a shape's world bounding box
    pub fn draw_bounds(&mut self, shape: &Shape) {
        if !self.show_bounds || !shape.is_bounded() || shape.shape_type() == ShapeType::None {
            return;
        }
        let color = self.config.bounds_color;
        if let Some(surface) = self.surface.as_deref_mut() {
            stroke_outline(surface, &shape.world_bounding_box().corners(), color);
        }
    }

    /// Draw the push vector of a hit, starting at the shape's center
    pub fn draw_push_vector(&mut self, shape: &Shape, info: &CollisionInfo) {
        if !self.show_push_vectors {
            return;
        }
        let color = self.config.push_color;
        if let (Some(push), Some(surface)) = (info.push_vector, self.surface.as_deref_mut()) {
            let start = shape.center();
            surface.stroke_line(start, start + push, color);
        }
    }

    /// Shade every occupied partition cell
    pub fn draw_partition(&mut self, partition: &SpatialPartition) {
        if !self.show_partition {
            return;
        }
        let color = self.config.cell_color;
        let Some(surface) = self.surface.as_deref_mut() else {
            return;
        };
        let mut count = 0;
        for (cell, _) in partition.occupied_cells() {
            surface.fill_polygon(&partition.cell_bounds(cell).corners(), color);
            count += 1;
        }
        log::trace!("Drew {count} partition cells");
    }

    /// Draw every stored shape, highlighting those in `pairs`, plus push vectors
    pub fn draw_collisions(&mut self, store: &ShapeStore, pairs: &[(CollisionPair, CollisionInfo)]) {
        let colliding: HashSet<ShapeKey> = pairs
            .iter()
            .flat_map(|(pair, _)| [pair.key_a, pair.key_b])
            .collect();

        for (key, shape) in store {
            self.draw_shape(shape, colliding.contains(&key));
            self.draw_bounds(shape);
        }
        for (pair, info) in pairs {
            if let Some(shape) = store.get(pair.key_a) {
                self.draw_push_vector(shape, info);
            }
        }
    }
}

impl Default for CollisionDebugVisualizer {
    fn default() -> Self {
        Self::new(DebugDrawConfig::default())
    }
}

/// Endpoints to draw for a line-family shape; unbounded ends run out to `extent`
fn visible_span(line: &LineGeom, extent: f32) -> (Vec2, Vec2) {
    let direction = line.direction();
    let len = direction.norm();
    if len == 0.0 {
        return (line.start, line.end);
    }
    let (lo, hi) = line.kind.param_range();
    let reach = extent / len;
    (line.at(lo.max(-reach)), line.at(hi.min(reach)))
}

/// Tessellate an annulus into quads
fn ring_quads(center: Vec2, outer: f32, inner: f32, segments: u32) -> Vec<[Vec2; 4]> {
    let step = constants::TAU / segments as f32;
    (0..segments)
        .map(|i| {
            let a = utils::rotate(Vec2::x(), step * i as f32);
            let b = utils::rotate(Vec2::x(), step * (i + 1) as f32);
            [center + a * outer, center + b * outer, center + b * inner, center + a * inner]
        })
        .collect()
}

fn stroke_outline(surface: &mut dyn DebugDraw, points: &[Vec2], color: Vec4) {
    for (i, &start) in points.iter().enumerate() {
        surface.stroke_line(start, points[(i + 1) % points.len()], color);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::debug::draw::{DebugDrawSystem, DebugShape};

    fn visualizer() -> (CollisionDebugVisualizer, Rc<RefCell<DebugDrawSystem>>) {
        let recorder = Rc::new(RefCell::new(DebugDrawSystem::new()));
        let viz = CollisionDebugVisualizer::default().with_surface(Box::new(Rc::clone(&recorder)));
        (viz, recorder)
    }

    #[test]
    fn test_no_surface_is_a_no_op() {
        let mut viz = CollisionDebugVisualizer::default();
        viz.show_bounds = true;
        viz.draw_shape(&Shape::circle(Vec2::zeros(), 1.0), false);
        viz.draw_bounds(&Shape::circle(Vec2::zeros(), 1.0));
        assert!(!viz.has_surface());
    }

    #[test]
    fn test_colors_follow_collision_state() {
        let (mut viz, recorder) = visualizer();
        let mut square = Shape::rectangle(0.0, 0.0, 1.0, 1.0);
        square.set_position(Vec2::new(5.0, 5.0));
        viz.draw_shape(&square, true);

        let recorded = recorder.borrow();
        let shapes = recorded.get_shapes();
        assert_eq!(shapes.len(), 1);
        match shapes[0] {
            DebugShape::Polygon { points, color, .. } => {
                assert_eq!(points[0], Vec2::new(5.0, 5.0));
                assert_eq!(*color, DebugDrawConfig::default().colliding_color);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_donut_is_tessellated() {
        let (viz, recorder) = visualizer();
        let mut viz = viz.with_collision_config(&CollisionConfig {
            circle_segments: 12,
            ..CollisionConfig::default()
        });
        viz.draw_shape(&Shape::donut(Vec2::zeros(), 4.0, 2.0).unwrap(), false);
        assert_eq!(recorder.borrow().shape_count(), 12);
    }

    #[test]
    fn test_rays_are_clipped_to_extent() {
        let (mut viz, recorder) = visualizer();
        viz.draw_shape(&Shape::ray(Vec2::zeros(), Vec2::new(2.0, 0.0)), false);

        let recorded = recorder.borrow();
        match recorded.get_shapes()[0] {
            DebugShape::Line { start, end, .. } => {
                assert_eq!(*start, Vec2::zeros());
                assert_eq!(*end, Vec2::new(DebugDrawConfig::default().line_extent, 0.0));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_draw_collisions_marks_pairs() {
        let config = CollisionConfig::default();
        let mut store = ShapeStore::with_key();
        let a = store.insert(Shape::circle(Vec2::zeros(), 2.0));
        let b = store.insert(Shape::circle(Vec2::new(3.0, 0.0), 2.0));
        store.insert(Shape::circle(Vec2::new(30.0, 0.0), 2.0));

        let mut partition = SpatialPartition::new(10.0).unwrap();
        for (key, shape) in &store {
            partition.add_shape(key, shape).unwrap();
        }
        let pairs = partition.find_all_pairs(&store, &config);
        assert_eq!(pairs[0].0, CollisionPair::new(a, b));

        let (mut viz, recorder) = visualizer();
        viz.show_partition = true;
        viz.draw_partition(&partition);
        viz.draw_collisions(&store, &pairs);

        let colliding = DebugDrawConfig::default().colliding_color;
        let recorded = recorder.borrow();
        let shapes = recorded.get_shapes();
        let red = shapes
            .iter()
            .filter(|s| matches!(s, DebugShape::Circle { color, .. } if *color == colliding))
            .count();
        let pushes = shapes.iter().filter(|s| matches!(s, DebugShape::Line { .. })).count();
        let cells = shapes.iter().filter(|s| matches!(s, DebugShape::Polygon { .. })).count();
        assert_eq!(red, 2);
        assert_eq!(pushes, 1);
        assert_eq!(cells, partition.occupied_cells().count());
    }
}
