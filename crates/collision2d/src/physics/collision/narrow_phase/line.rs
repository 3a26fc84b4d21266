//! Segment, ray and line tests
//!
//! Line-family shapes are parameterised as `start + t * (end - start)`. The
//! valid range of `t` depends on how many endpoints bound the shape: an
//! infinite line accepts any `t`, a ray `t >= 0`, a segment `0 <= t <= 1`.

use crate::config::CollisionConfig;
use crate::foundation::math::{utils, Vec2};
use crate::physics::collision::primitives::{CollisionInfo, LineKind};
use crate::physics::collision::shape::Shape;

use super::point::point_in_polygon;
use super::{Convex, LineGeom, Round};

/// Intersection parameters `(t, u)` of two line-family shapes, if they meet
pub fn intersect(a: &LineGeom, b: &LineGeom) -> Option<(f32, f32)> {
    if a.is_degenerate() || b.is_degenerate() {
        return None;
    }
    let r = a.direction();
    let s = b.direction();
    if utils::is_parallel(r, s) {
        return collinear_overlap(a, b);
    }

    let qp = b.start - a.start;
    let denom = utils::cross(r, s);
    let t = utils::cross(qp, s) / denom;
    let u = utils::cross(qp, r) / denom;
    (a.kind.contains(t) && b.kind.contains(u)).then_some((t, u))
}

/// Parallel case: overlap of the two parameter intervals projected onto A's direction
fn collinear_overlap(a: &LineGeom, b: &LineGeom) -> Option<(f32, f32)> {
    let r = a.direction();
    let s = b.direction();
    let qp = b.start - a.start;
    if !utils::is_parallel(qp, r) {
        return None;
    }

    let r_len_sq = r.norm_squared();
    let b_start = qp.dot(&r) / r_len_sq;
    let b_end = (b.end - a.start).dot(&r) / r_len_sq;
    let (b_lo, b_hi) = match b.kind {
        LineKind::Line => (f32::NEG_INFINITY, f32::INFINITY),
        // A ray pointing against A's direction covers everything below its origin
        LineKind::Ray if b_end >= b_start => (b_start, f32::INFINITY),
        LineKind::Ray => (f32::NEG_INFINITY, b_start),
        LineKind::Segment => (b_start.min(b_end), b_start.max(b_end)),
    };
    let (a_lo, a_hi) = a.kind.param_range();

    let lo = a_lo.max(b_lo);
    let hi = a_hi.min(b_hi);
    if lo > hi {
        return None;
    }

    let t = if lo.is_finite() {
        lo
    } else if hi.is_finite() {
        hi
    } else {
        0.0
    };
    let u = (a.at(t) - b.start).dot(&s) / s.norm_squared();
    Some((t, u))
}

/// Segment, ray or line against another segment, ray or line
pub fn line_line(a: &Shape, pa: Vec2, b: &Shape, pb: Vec2, _config: &CollisionConfig) -> Option<CollisionInfo> {
    let la = LineGeom::of(a, pa)?;
    let lb = LineGeom::of(b, pb)?;
    intersect(&la, &lb).map(|(t, u)| CollisionInfo::at_params(t, u))
}

/// Segment, ray or line against a rectangle or convex polygon
pub fn line_polygon(a: &Shape, pa: Vec2, b: &Shape, pb: Vec2, config: &CollisionConfig) -> Option<CollisionInfo> {
    let line = LineGeom::of(a, pa)?;
    let polygon = Convex::of(b, pb);
    if line.is_degenerate() || !polygon.is_area() {
        return None;
    }

    // A bounded line may start (or lie entirely) inside without crossing an edge
    match line.kind {
        LineKind::Segment
            if point_in_polygon(line.start, &polygon, config.epsilon)
                || point_in_polygon(line.end, &polygon, config.epsilon) =>
        {
            return Some(CollisionInfo::hit());
        }
        LineKind::Ray if point_in_polygon(line.start, &polygon, config.epsilon) => {
            return Some(CollisionInfo::hit());
        }
        _ => {}
    }

    let crossing = polygon
        .edges()
        .find_map(|(start, end)| intersect(&line, &LineGeom::segment(start, end)));
    crossing.map(|(t, u)| CollisionInfo::at_params(t, u))
}

/// Segment, ray or line against a circle: closest point within the radius
pub fn line_circle(a: &Shape, pa: Vec2, b: &Shape, pb: Vec2, _config: &CollisionConfig) -> Option<CollisionInfo> {
    let line = LineGeom::of(a, pa)?;
    let circle = Round::of(b, pb)?;
    if line.is_degenerate() {
        return None;
    }
    (line.distance_squared(circle.center) <= circle.outer * circle.outer).then(CollisionInfo::hit)
}

/// Segment, ray or line against a donut
///
/// Hits when it reaches the outer circle, unless it is a segment lying
/// entirely in the hole. Rays and lines always leave the hole.
pub fn line_donut(a: &Shape, pa: Vec2, b: &Shape, pb: Vec2, config: &CollisionConfig) -> Option<CollisionInfo> {
    let line = LineGeom::of(a, pa)?;
    let donut = Round::of(b, pb)?;
    if line.kind == LineKind::Segment && donut.hole_contains(line.start) && donut.hole_contains(line.end) {
        return None;
    }
    line_circle(a, pa, b, pb, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn config() -> CollisionConfig {
        CollisionConfig::default()
    }

    fn origin() -> Vec2 {
        Vec2::zeros()
    }

    #[test]
    fn test_crossing_segments() {
        let a = Shape::edge(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        let b = Shape::edge(Vec2::new(0.0, 10.0), Vec2::new(10.0, 0.0));
        let info = line_line(&a, origin(), &b, origin(), &config()).unwrap();
        let (t, u) = info.line_params.unwrap();
        assert_relative_eq!(t, 0.5);
        assert_relative_eq!(u, 0.5);
        assert!(info.push_vector.is_none());
    }

    #[test]
    fn test_segment_range_respected() {
        let a = Shape::edge(Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0));
        let b = Shape::edge(Vec2::new(0.0, 10.0), Vec2::new(10.0, 0.0));
        assert!(line_line(&a, origin(), &b, origin(), &config()).is_none());

        // The same geometry as a ray or line reaches the crossing point
        let ray = Shape::ray(Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0));
        let info = line_line(&ray, origin(), &b, origin(), &config()).unwrap();
        assert_relative_eq!(info.line_params.unwrap().0, 5.0);

        let backwards = Shape::ray(Vec2::new(0.0, 0.0), Vec2::new(-1.0, -1.0));
        assert!(line_line(&backwards, origin(), &b, origin(), &config()).is_none());
        let line = Shape::line(Vec2::new(0.0, 0.0), Vec2::new(-1.0, -1.0));
        assert!(line_line(&line, origin(), &b, origin(), &config()).is_some());
    }

    #[test]
    fn test_parallel_lines_never_meet() {
        let a = Shape::line(Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0));
        let b = Shape::line(Vec2::new(0.0, 1.0), Vec2::new(1.0, 1.0));
        assert!(line_line(&a, origin(), &b, origin(), &config()).is_none());
    }

    #[test]
    fn test_collinear_segments() {
        let a = Shape::edge(Vec2::new(0.0, 0.0), Vec2::new(2.0, 0.0));
        let overlapping = Shape::edge(Vec2::new(3.0, 0.0), Vec2::new(1.0, 0.0));
        let disjoint = Shape::edge(Vec2::new(3.0, 0.0), Vec2::new(5.0, 0.0));

        let info = line_line(&a, origin(), &overlapping, origin(), &config()).unwrap();
        let (t, u) = info.line_params.unwrap();
        assert_relative_eq!(t, 0.5);
        assert_relative_eq!(u, 1.0);
        assert!(line_line(&a, origin(), &disjoint, origin(), &config()).is_none());
    }

    #[test]
    fn test_opposite_collinear_rays() {
        let right = Shape::ray(Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0));
        let facing = Shape::ray(Vec2::new(5.0, 0.0), Vec2::new(4.0, 0.0));
        let away = Shape::ray(Vec2::new(-5.0, 0.0), Vec2::new(-6.0, 0.0));
        assert!(line_line(&right, origin(), &facing, origin(), &config()).is_some());
        assert!(line_line(&right, origin(), &away, origin(), &config()).is_none());
        assert!(line_line(&away, origin(), &right, origin(), &config()).is_none());
    }

    #[test]
    fn test_segment_inside_polygon() {
        let square = Shape::rectangle(0.0, 0.0, 10.0, 10.0);
        let inner = Shape::edge(Vec2::new(2.0, 2.0), Vec2::new(3.0, 3.0));
        let crossing = Shape::edge(Vec2::new(-5.0, 5.0), Vec2::new(15.0, 5.0));
        let outside = Shape::edge(Vec2::new(-5.0, -5.0), Vec2::new(-1.0, 20.0));
        assert!(line_polygon(&inner, origin(), &square, origin(), &config()).is_some());
        assert!(line_polygon(&crossing, origin(), &square, origin(), &config()).is_some());
        assert!(line_polygon(&outside, origin(), &square, origin(), &config()).is_none());
    }

    #[test]
    fn test_ray_starting_inside_polygon() {
        let hexagon = Shape::regular_polygon(6, 5.0);
        let ray = Shape::ray(Vec2::new(0.0, 0.0), Vec2::new(0.0, 1.0));
        let info = line_polygon(&ray, origin(), &hexagon, origin(), &config()).unwrap();
        assert!(info.line_params.is_none());

        let pointing_away = Shape::ray(Vec2::new(10.0, 0.0), Vec2::new(11.0, 0.0));
        assert!(line_polygon(&pointing_away, origin(), &hexagon, origin(), &config()).is_none());
    }

    #[test]
    fn test_line_against_circle() {
        let circle = Shape::circle(Vec2::new(0.0, 0.0), 1.0);
        let tangent = Shape::line(Vec2::new(-5.0, 1.0), Vec2::new(5.0, 1.0));
        let miss = Shape::line(Vec2::new(-5.0, 1.5), Vec2::new(5.0, 1.5));
        let short = Shape::edge(Vec2::new(3.0, 0.0), Vec2::new(5.0, 0.0));
        assert!(line_circle(&tangent, origin(), &circle, origin(), &config()).is_some());
        assert!(line_circle(&miss, origin(), &circle, origin(), &config()).is_none());
        assert!(line_circle(&short, origin(), &circle, origin(), &config()).is_none());
    }

    #[test]
    fn test_segment_in_donut_hole() {
        let donut = Shape::donut(Vec2::zeros(), 5.0, 3.0).unwrap();
        let in_hole = Shape::edge(Vec2::new(-1.0, 0.0), Vec2::new(1.0, 0.0));
        let through_ring = Shape::edge(Vec2::new(-1.0, 0.0), Vec2::new(4.0, 0.0));
        let ray_in_hole = Shape::ray(Vec2::new(-1.0, 0.0), Vec2::new(1.0, 0.0));
        assert!(line_donut(&in_hole, origin(), &donut, origin(), &config()).is_none());
        assert!(line_donut(&through_ring, origin(), &donut, origin(), &config()).is_some());
        assert!(line_donut(&ray_in_hole, origin(), &donut, origin(), &config()).is_some());
    }
}
