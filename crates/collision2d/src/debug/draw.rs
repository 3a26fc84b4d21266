//! Debug drawing surface and a recording implementation
//!
//! [`DebugDraw`] is the only way the collision core reaches a renderer. Hosts
//! implement it over whatever backend they have; [`DebugDrawSystem`] is a
//! backend-free implementation that records shapes with lifetimes so they
//! can be replayed onto a real surface each frame.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::foundation::math::{Vec2, Vec4};

/// Drawing surface injected by the host
pub trait DebugDraw {
    /// Fill a convex polygon given in world space
    fn fill_polygon(&mut self, points: &[Vec2], color: Vec4);

    /// Stroke a line segment
    fn stroke_line(&mut self, start: Vec2, end: Vec2, color: Vec4);

    /// Draw a single point
    fn draw_point(&mut self, position: Vec2, color: Vec4);

    /// Draw a filled circle
    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Vec4);
}

/// Lets a host keep a handle on a surface it also hands to a visualizer
impl<T: DebugDraw + ?Sized> DebugDraw for Rc<RefCell<T>> {
    fn fill_polygon(&mut self, points: &[Vec2], color: Vec4) {
        self.borrow_mut().fill_polygon(points, color);
    }

    fn stroke_line(&mut self, start: Vec2, end: Vec2, color: Vec4) {
        self.borrow_mut().stroke_line(start, end, color);
    }

    fn draw_point(&mut self, position: Vec2, color: Vec4) {
        self.borrow_mut().draw_point(position, color);
    }

    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Vec4) {
        self.borrow_mut().draw_circle(center, radius, color);
    }
}

/// Unique identifier for persistent debug shapes
pub type DebugShapeId = String;

/// A recorded draw call
#[derive(Clone, Debug, PartialEq)]
pub enum DebugShape {
    /// Filled convex polygon
    Polygon {
        /// World-space vertices
        points: Vec<Vec2>,
        /// Fill color
        color: Vec4,
        /// Seconds left to live
        duration: f32,
    },

    /// Line segment from start to end
    Line {
        /// First endpoint
        start: Vec2,
        /// Second endpoint
        end: Vec2,
        /// Stroke color
        color: Vec4,
        /// Seconds left to live
        duration: f32,
    },

    /// Point at position
    Point {
        /// World position
        position: Vec2,
        /// Point color
        color: Vec4,
        /// Seconds left to live
        duration: f32,
    },

    /// Filled circle
    Circle {
        /// World-space center
        center: Vec2,
        /// Radius
        radius: f32,
        /// Fill color
        color: Vec4,
        /// Seconds left to live
        duration: f32,
    },
}

impl DebugShape {
    fn duration_mut(&mut self) -> &mut f32 {
        match self {
            DebugShape::Polygon { duration, .. }
            | DebugShape::Line { duration, .. }
            | DebugShape::Point { duration, .. }
            | DebugShape::Circle { duration, .. } => duration,
        }
    }

    /// Get remaining duration
    pub fn duration(&self) -> f32 {
        match self {
            DebugShape::Polygon { duration, .. }
            | DebugShape::Line { duration, .. }
            | DebugShape::Point { duration, .. }
            | DebugShape::Circle { duration, .. } => *duration,
        }
    }

    /// Set duration (returns modified shape)
    pub fn with_duration(mut self, new_duration: f32) -> Self {
        *self.duration_mut() = new_duration;
        self
    }

    /// Decrease duration by delta_time, returns true if expired
    pub fn tick(&mut self, delta_time: f32) -> bool {
        let duration = self.duration_mut();
        *duration -= delta_time;
        *duration <= 0.0
    }

    /// Issue this shape on a surface
    pub fn replay(&self, target: &mut dyn DebugDraw) {
        match self {
            DebugShape::Polygon { points, color, .. } => target.fill_polygon(points, *color),
            DebugShape::Line { start, end, color, .. } => target.stroke_line(*start, *end, *color),
            DebugShape::Point { position, color, .. } => target.draw_point(*position, *color),
            DebugShape::Circle {
                center, radius, color, ..
            } => target.draw_circle(*center, *radius, *color),
        }
    }
}

/// Recording debug draw surface
///
/// Calls made through [`DebugDraw`] become temporary shapes that live for a
/// single frame: they are visible until the next [`DebugDrawSystem::update`].
/// Persistent shapes remain until explicitly removed.
#[derive(Debug, Clone)]
pub struct DebugDrawSystem {
    /// Temporary shapes that expire after their duration
    temporary_shapes: Vec<DebugShape>,

    /// Persistent shapes that remain until manually removed
    persistent_shapes: HashMap<DebugShapeId, DebugShape>,

    /// Master enable/disable flag
    pub enabled: bool,
}

impl DebugDrawSystem {
    /// Create a new debug draw system
    pub fn new() -> Self {
        Self {
            temporary_shapes: Vec::new(),
            persistent_shapes: HashMap::new(),
            enabled: true,
        }
    }

    /// Record a temporary shape
    pub fn draw(&mut self, shape: DebugShape) {
        if !self.enabled {
            return;
        }
        self.temporary_shapes.push(shape);
    }

    /// Draw a persistent shape that remains until explicitly removed
    pub fn draw_persistent(&mut self, id: impl Into<String>, shape: DebugShape) {
        if !self.enabled {
            return;
        }
        self.persistent_shapes.insert(id.into(), shape);
    }

    /// Remove a persistent shape
    pub fn clear_persistent(&mut self, id: &str) {
        self.persistent_shapes.remove(id);
    }

    /// Clear all persistent shapes
    pub fn clear_all_persistent(&mut self) {
        self.persistent_shapes.clear();
    }

    /// Update shape lifetimes and remove expired temporary shapes
    pub fn update(&mut self, delta_time: f32) {
        if !self.enabled {
            return;
        }
        self.temporary_shapes.retain_mut(|shape| !shape.tick(delta_time));
    }

    /// Get all shapes for rendering (both temporary and persistent)
    pub fn get_shapes(&self) -> Vec<&DebugShape> {
        if !self.enabled {
            return Vec::new();
        }
        self.temporary_shapes
            .iter()
            .chain(self.persistent_shapes.values())
            .collect()
    }

    /// Issue every live shape on another surface
    pub fn replay(&self, target: &mut dyn DebugDraw) {
        for shape in self.get_shapes() {
            shape.replay(target);
        }
    }

    /// Get the number of active shapes
    pub fn shape_count(&self) -> usize {
        self.temporary_shapes.len() + self.persistent_shapes.len()
    }

    /// Clear all shapes (temporary and persistent)
    pub fn clear(&mut self) {
        self.temporary_shapes.clear();
        self.persistent_shapes.clear();
    }
}

impl Default for DebugDrawSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl DebugDraw for DebugDrawSystem {
    fn fill_polygon(&mut self, points: &[Vec2], color: Vec4) {
        self.draw(DebugShape::Polygon {
            points: points.to_vec(),
            color,
            duration: 0.0,
        });
    }

    fn stroke_line(&mut self, start: Vec2, end: Vec2, color: Vec4) {
        self.draw(DebugShape::Line {
            start,
            end,
            color,
            duration: 0.0,
        });
    }

    fn draw_point(&mut self, position: Vec2, color: Vec4) {
        self.draw(DebugShape::Point {
            position,
            color,
            duration: 0.0,
        });
    }

    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Vec4) {
        self.draw(DebugShape::Circle {
            center,
            radius,
            color,
            duration: 0.0,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red() -> Vec4 {
        Vec4::new(1.0, 0.0, 0.0, 1.0)
    }

    #[test]
    fn test_temporary_shape_expiration() {
        let mut system = DebugDrawSystem::new();

        // Add a shape with 1 second duration
        system.draw(
            DebugShape::Circle {
                center: Vec2::zeros(),
                radius: 1.0,
                color: red(),
                duration: 0.0,
            }
            .with_duration(1.0),
        );
        assert_eq!(system.shape_count(), 1);

        system.update(0.5);
        assert_eq!(system.shape_count(), 1);

        // Total 1.1 seconds
        system.update(0.6);
        assert_eq!(system.shape_count(), 0);
    }

    #[test]
    fn test_surface_calls_last_one_frame() {
        let mut system = DebugDrawSystem::new();
        system.stroke_line(Vec2::zeros(), Vec2::new(1.0, 0.0), red());
        system.draw_point(Vec2::zeros(), red());
        assert_eq!(system.get_shapes().len(), 2);

        system.update(1.0 / 60.0);
        assert!(system.get_shapes().is_empty());
    }

    #[test]
    fn test_persistent_shapes() {
        let mut system = DebugDrawSystem::new();
        system.draw_persistent(
            "origin",
            DebugShape::Point {
                position: Vec2::zeros(),
                color: red(),
                duration: f32::INFINITY,
            },
        );

        for _ in 0..100 {
            system.update(1.0);
        }
        assert_eq!(system.shape_count(), 1);

        system.clear_persistent("origin");
        assert_eq!(system.shape_count(), 0);
    }

    #[test]
    fn test_disabled_system_records_nothing() {
        let mut system = DebugDrawSystem::new();
        system.enabled = false;
        system.fill_polygon(&[Vec2::zeros(), Vec2::x(), Vec2::y()], red());
        assert_eq!(system.shape_count(), 0);
    }

    #[test]
    fn test_replay_onto_shared_surface() {
        let mut source = DebugDrawSystem::new();
        source.draw_circle(Vec2::new(2.0, 3.0), 1.5, red());

        let shared = Rc::new(RefCell::new(DebugDrawSystem::new()));
        let mut handle = Rc::clone(&shared);
        source.replay(&mut handle);

        let target = shared.borrow();
        assert_eq!(target.get_shapes(), source.get_shapes());
    }
}
