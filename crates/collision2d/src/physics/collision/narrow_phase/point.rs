//! Point tests
//!
//! Points have no area, so these handlers answer containment only and never
//! produce push vectors.

use crate::config::CollisionConfig;
use crate::foundation::math::Vec2;
use crate::physics::collision::primitives::CollisionInfo;
use crate::physics::collision::shape::Shape;

use super::{point_of, Convex, LineGeom, Round};

/// Squared distance from `point` to the segment `a`-`b`
fn segment_distance_squared(point: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq == 0.0 {
        return (point - a).norm_squared();
    }
    let t = ((point - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    (a + ab * t - point).norm_squared()
}

/// Even/odd ray casting; points within `tolerance` of an edge count as inside
pub fn point_in_polygon(point: Vec2, polygon: &Convex<'_>, tolerance: f32) -> bool {
    if !polygon.is_area() {
        return false;
    }
    let tolerance_sq = tolerance * tolerance;
    if polygon
        .edges()
        .any(|(a, b)| segment_distance_squared(point, a, b) <= tolerance_sq)
    {
        return true;
    }

    let mut inside = false;
    for (a, b) in polygon.edges() {
        if (a.y > point.y) != (b.y > point.y) {
            let crossing_x = (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x;
            if point.x < crossing_x {
                inside = !inside;
            }
        }
    }
    inside
}

/// Point against point: coincident within epsilon
pub fn point_point(a: &Shape, pa: Vec2, b: &Shape, pb: Vec2, config: &CollisionConfig) -> Option<CollisionInfo> {
    let p = point_of(a, pa)?;
    let q = point_of(b, pb)?;
    ((p - q).norm_squared() <= config.epsilon * config.epsilon).then(CollisionInfo::hit)
}

/// Point against segment, ray or line: a zero-radius circle touching the line
pub fn point_line(a: &Shape, pa: Vec2, b: &Shape, pb: Vec2, config: &CollisionConfig) -> Option<CollisionInfo> {
    let p = point_of(a, pa)?;
    let line = LineGeom::of(b, pb)?;
    if line.is_degenerate() {
        return None;
    }
    let hit = line.distance_squared(p) <= config.epsilon * config.epsilon;
    hit.then(|| CollisionInfo::at_params(0.0, line.closest_param(p)))
}

/// Point against rectangle: inclusive interval test on both axes, within epsilon
pub fn point_rectangle(a: &Shape, pa: Vec2, b: &Shape, pb: Vec2, config: &CollisionConfig) -> Option<CollisionInfo> {
    let p = point_of(a, pa)?;
    b.bounding_box()
        .translated(pb)
        .expanded(config.epsilon)
        .contains_point(p)
        .then(CollisionInfo::hit)
}

/// Point against convex polygon
pub fn point_polygon(a: &Shape, pa: Vec2, b: &Shape, pb: Vec2, config: &CollisionConfig) -> Option<CollisionInfo> {
    let p = point_of(a, pa)?;
    point_in_polygon(p, &Convex::of(b, pb), config.epsilon).then(CollisionInfo::hit)
}

/// Point against circle, within epsilon of the rim
pub fn point_circle(a: &Shape, pa: Vec2, b: &Shape, pb: Vec2, config: &CollisionConfig) -> Option<CollisionInfo> {
    let p = point_of(a, pa)?;
    let circle = Round::of(b, pb)?;
    let reach = circle.outer + config.epsilon;
    ((p - circle.center).norm_squared() <= reach * reach).then(CollisionInfo::hit)
}

/// Point against donut: between the inner and outer radius, both inclusive
/// and widened by epsilon
pub fn point_donut(a: &Shape, pa: Vec2, b: &Shape, pb: Vec2, config: &CollisionConfig) -> Option<CollisionInfo> {
    let p = point_of(a, pa)?;
    let donut = Round::of(b, pb)?;
    let d_sq = (p - donut.center).norm_squared();
    let outer = donut.outer + config.epsilon;
    let inner = (donut.inner - config.epsilon).max(0.0);
    (d_sq <= outer * outer && d_sq >= inner * inner).then(CollisionInfo::hit)
}
