//! Circle and donut tests
//!
//! A donut is a circle with a hole. It collides with anything that reaches
//! its outer circle, except shapes that sit entirely inside the hole. Push
//! vectors for donut pairs are the shorter of two moves: out past the outer
//! circle, or into the hole when the other shape fits there.

use crate::config::CollisionConfig;
use crate::foundation::math::Vec2;
use crate::physics::collision::primitives::CollisionInfo;
use crate::physics::collision::shape::Shape;

use super::polygon::MinAxis;
use super::{Convex, Round};

/// SAT between a convex polygon and a circle
///
/// Axes are the polygon edge normals plus the direction from the circle
/// center to the nearest polygon vertex.
pub fn sat_circle(polygon: &Convex<'_>, center: Vec2, radius: f32, config: &CollisionConfig) -> Option<CollisionInfo> {
    if !polygon.is_area() {
        return None;
    }

    let nearest = (0..polygon.len())
        .map(|i| polygon.vertex(i))
        .min_by(|p, q| {
            (p - center)
                .norm_squared()
                .total_cmp(&(q - center).norm_squared())
        })?;

    let away = polygon.centroid() - center;
    let mut best: Option<MinAxis> = None;

    for axis in polygon.edge_normals().chain(std::iter::once(nearest - center)) {
        let len = axis.norm();
        if len == 0.0 {
            continue;
        }
        let unit = axis / len;
        let (p_min, p_max) = polygon.project(unit);
        let projected_center = center.dot(&unit);
        let (c_min, c_max) = (projected_center - radius, projected_center + radius);
        if p_max < c_min || c_max < p_min {
            return None;
        }
        if !config.compute_push_vectors {
            continue;
        }

        let (sign, overlap) = if unit.dot(&away) >= 0.0 {
            (1.0, c_max - p_min)
        } else {
            (-1.0, p_max - c_min)
        };
        best = MinAxis::track(best, unit, sign, overlap, config.epsilon);
    }

    Some(match best {
        Some(best) => CollisionInfo::with_push(best.push()),
        None => CollisionInfo::hit(),
    })
}

/// Push that moves a circle at `a` fully outside a circle at `b`
fn separate_circles(a: Vec2, ra: f32, b: Vec2, rb: f32, config: &CollisionConfig) -> CollisionInfo {
    if !config.compute_push_vectors {
        return CollisionInfo::hit();
    }
    let delta = a - b;
    let distance = delta.norm();
    let direction = if distance > 0.0 { delta / distance } else { Vec2::x() };
    CollisionInfo::with_push(direction * (ra + rb - distance + config.epsilon))
}

fn circles_touch(a: &Round, b: &Round) -> bool {
    let reach = a.outer + b.outer;
    (a.center - b.center).norm_squared() <= reach * reach
}

/// `inner` lies wholly inside the hole of `outer`
fn swallowed_by_hole(inner: &Round, outer: &Round) -> bool {
    (inner.center - outer.center).norm() + inner.outer < outer.inner
}

/// Rectangle or polygon against circle
pub fn polygon_circle(a: &Shape, pa: Vec2, b: &Shape, pb: Vec2, config: &CollisionConfig) -> Option<CollisionInfo> {
    let circle = Round::of(b, pb)?;
    sat_circle(&Convex::of(a, pa), circle.center, circle.outer, config)
}

/// Circle against circle
pub fn circle_circle(a: &Shape, pa: Vec2, b: &Shape, pb: Vec2, config: &CollisionConfig) -> Option<CollisionInfo> {
    let ca = Round::of(a, pa)?;
    let cb = Round::of(b, pb)?;
    circles_touch(&ca, &cb).then(|| separate_circles(ca.center, ca.outer, cb.center, cb.outer, config))
}

/// Push that moves something centered at `at`, reaching `extent` from that
/// center, wholly inside a hole of radius `hole` centered at `hole_center`
///
/// `None` when it cannot fit through the hole.
fn into_hole(at: Vec2, extent: f32, hole_center: Vec2, hole: f32, config: &CollisionConfig) -> Option<Vec2> {
    if extent + config.epsilon >= hole {
        return None;
    }
    let delta = hole_center - at;
    let distance = delta.norm();
    if distance == 0.0 {
        return None;
    }
    Some(delta / distance * (distance - (hole - extent) + config.epsilon))
}

/// Replace the outward push with `inward` when that is shorter
fn shortest(outward: CollisionInfo, inward: Option<Vec2>) -> CollisionInfo {
    match (outward.push_vector, inward) {
        (Some(out), Some(inward)) if inward.norm_squared() < out.norm_squared() => CollisionInfo::with_push(inward),
        _ => outward,
    }
}

/// Rectangle or polygon against donut
///
/// The move into the hole treats the polygon as the circle around its
/// centroid through its farthest vertex.
pub fn polygon_donut(a: &Shape, pa: Vec2, b: &Shape, pb: Vec2, config: &CollisionConfig) -> Option<CollisionInfo> {
    let polygon = Convex::of(a, pa);
    let donut = Round::of(b, pb)?;
    if polygon.is_area() && (0..polygon.len()).all(|i| donut.hole_contains(polygon.vertex(i))) {
        return None;
    }
    let outward = sat_circle(&polygon, donut.center, donut.outer, config)?;
    if outward.push_vector.is_none() {
        return Some(outward);
    }

    let centroid = polygon.centroid();
    let extent = (0..polygon.len())
        .map(|i| (polygon.vertex(i) - centroid).norm())
        .fold(0.0, f32::max);
    Some(shortest(outward, into_hole(centroid, extent, donut.center, donut.inner, config)))
}

/// Circle against donut
pub fn circle_donut(a: &Shape, pa: Vec2, b: &Shape, pb: Vec2, config: &CollisionConfig) -> Option<CollisionInfo> {
    let circle = Round::of(a, pa)?;
    let donut = Round::of(b, pb)?;
    if !circles_touch(&circle, &donut) || swallowed_by_hole(&circle, &donut) {
        return None;
    }
    let outward = separate_circles(circle.center, circle.outer, donut.center, donut.outer, config);
    if outward.push_vector.is_none() {
        return Some(outward);
    }
    let inward = into_hole(circle.center, circle.outer, donut.center, donut.inner, config);
    Some(shortest(outward, inward))
}

/// Donut against donut
///
/// Besides leaving `b`'s outer circle, `a` may drop into `b`'s hole or
/// swallow `b` with its own hole, whichever is shorter.
pub fn donut_donut(a: &Shape, pa: Vec2, b: &Shape, pb: Vec2, config: &CollisionConfig) -> Option<CollisionInfo> {
    let da = Round::of(a, pa)?;
    let db = Round::of(b, pb)?;
    if !circles_touch(&da, &db) || swallowed_by_hole(&da, &db) || swallowed_by_hole(&db, &da) {
        return None;
    }
    let outward = separate_circles(da.center, da.outer, db.center, db.outer, config);
    if outward.push_vector.is_none() {
        return Some(outward);
    }
    let inward = into_hole(da.center, da.outer, db.center, db.inner, config)
        .or_else(|| into_hole(db.center, db.outer, da.center, da.inner, config).map(|push| -push));
    Some(shortest(outward, inward))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn config() -> CollisionConfig {
        CollisionConfig::default()
    }

    #[test]
    fn test_overlapping_circles_push_along_center_axis() {
        let circle = Shape::circle(Vec2::zeros(), 5.0);
        let info = circle_circle(&circle, Vec2::zeros(), &circle, Vec2::new(8.0, 0.0), &config()).unwrap();
        let push = info.push_vector.unwrap();
        assert_relative_eq!(push.norm(), 2.0, epsilon = 2e-3);
        assert_relative_eq!(push.y, 0.0);
        assert!(push.x < 0.0);
    }

    #[test]
    fn test_concentric_circles_push_along_x() {
        let circle = Shape::circle(Vec2::zeros(), 1.0);
        let info = circle_circle(&circle, Vec2::zeros(), &circle, Vec2::zeros(), &config()).unwrap();
        assert_relative_eq!(info.push_vector.unwrap(), Vec2::new(2.001, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_polygon_against_circle_corner_region() {
        let square = Shape::rectangle(0.0, 0.0, 2.0, 2.0);
        let circle = Shape::circle(Vec2::zeros(), 1.0);
        // Box test passes but the corner is farther than the radius
        let corner_miss = Vec2::new(2.8, 2.8);
        let corner_hit = Vec2::new(2.6, 2.6);
        assert!(polygon_circle(&square, Vec2::zeros(), &circle, corner_miss, &config()).is_none());
        let info = polygon_circle(&square, Vec2::zeros(), &circle, corner_hit, &config()).unwrap();
        let push = info.push_vector.unwrap();
        assert!(polygon_circle(&square, push, &circle, corner_hit, &config()).is_none());
    }

    #[test]
    fn test_polygon_in_donut_hole() {
        let donut = Shape::donut(Vec2::zeros(), 10.0, 5.0).unwrap();
        let small = Shape::rectangle(-1.0, -1.0, 2.0, 2.0);
        assert!(polygon_donut(&small, Vec2::zeros(), &donut, Vec2::zeros(), &config()).is_none());
        assert!(polygon_donut(&small, Vec2::new(6.0, 0.0), &donut, Vec2::zeros(), &config()).is_some());
        assert!(polygon_donut(&small, Vec2::new(12.0, 0.0), &donut, Vec2::zeros(), &config()).is_none());

        // Straddling the inner edge still counts
        assert!(polygon_donut(&small, Vec2::new(4.5, 0.0), &donut, Vec2::zeros(), &config()).is_some());
    }

    #[test]
    fn test_circle_in_donut_hole() {
        let donut = Shape::donut(Vec2::zeros(), 10.0, 5.0).unwrap();
        let circle = Shape::circle(Vec2::zeros(), 2.0);
        assert!(circle_donut(&circle, Vec2::zeros(), &donut, Vec2::zeros(), &config()).is_none());
        assert!(circle_donut(&circle, Vec2::new(4.0, 0.0), &donut, Vec2::zeros(), &config()).is_some());
        assert!(circle_donut(&circle, Vec2::new(12.5, 0.0), &donut, Vec2::zeros(), &config()).is_none());

        // A circle larger than the donut covers it entirely
        let big = Shape::circle(Vec2::zeros(), 20.0);
        assert!(circle_donut(&big, Vec2::zeros(), &donut, Vec2::zeros(), &config()).is_some());
    }

    #[test]
    fn test_nested_donuts() {
        let outer = Shape::donut(Vec2::zeros(), 10.0, 8.0).unwrap();
        let inner = Shape::donut(Vec2::zeros(), 4.0, 2.0).unwrap();
        let ring = Shape::donut(Vec2::zeros(), 9.0, 1.0).unwrap();
        assert!(donut_donut(&outer, Vec2::zeros(), &inner, Vec2::zeros(), &config()).is_none());
        assert!(donut_donut(&inner, Vec2::zeros(), &outer, Vec2::zeros(), &config()).is_none());
        assert!(donut_donut(&outer, Vec2::zeros(), &ring, Vec2::zeros(), &config()).is_some());
        assert!(donut_donut(&inner, Vec2::new(5.0, 0.0), &outer, Vec2::zeros(), &config()).is_some());
    }

    #[test]
    fn test_donut_push_clears_outer_circle() {
        let donut = Shape::donut(Vec2::zeros(), 3.0, 1.0).unwrap();
        let circle = Shape::circle(Vec2::zeros(), 1.0);
        let at = Vec2::new(3.5, 0.0);
        let info = circle_donut(&circle, at, &donut, Vec2::zeros(), &config()).unwrap();
        let moved = at + info.push_vector.unwrap();
        assert!(circle_donut(&circle, moved, &donut, Vec2::zeros(), &config()).is_none());
    }

    #[test]
    fn test_circle_straddling_hole_drops_inward() {
        let donut = Shape::donut(Vec2::zeros(), 10.0, 5.0).unwrap();
        let circle = Shape::circle(Vec2::zeros(), 2.0);
        let at = Vec2::new(4.0, 0.0);
        let push = circle_donut(&circle, at, &donut, Vec2::zeros(), &config())
            .unwrap()
            .push_vector
            .unwrap();
        assert_relative_eq!(push, Vec2::new(-1.001, 0.0), epsilon = 1e-4);
        assert!(circle_donut(&circle, at + push, &donut, Vec2::zeros(), &config()).is_none());
    }

    #[test]
    fn test_polygon_straddling_hole_drops_inward() {
        let donut = Shape::donut(Vec2::zeros(), 10.0, 5.0).unwrap();
        let small = Shape::rectangle(-1.0, -1.0, 2.0, 2.0);
        let at = Vec2::new(4.5, 0.0);
        let push = polygon_donut(&small, at, &donut, Vec2::zeros(), &config())
            .unwrap()
            .push_vector
            .unwrap();
        assert!(push.x < 0.0);
        assert!(push.norm() < 1.0);
        assert!(polygon_donut(&small, at + push, &donut, Vec2::zeros(), &config()).is_none());
    }

    #[test]
    fn test_donut_push_takes_shorter_way() {
        let big = Shape::donut(Vec2::zeros(), 10.0, 6.0).unwrap();
        let small = Shape::donut(Vec2::zeros(), 2.0, 1.0).unwrap();

        // Small donut straddling the big one's hole drops in
        let at = Vec2::new(5.0, 0.0);
        let push = donut_donut(&small, at, &big, Vec2::zeros(), &config())
            .unwrap()
            .push_vector
            .unwrap();
        assert_relative_eq!(push, Vec2::new(-1.001, 0.0), epsilon = 1e-4);
        assert!(donut_donut(&small, at + push, &big, Vec2::zeros(), &config()).is_none());

        // Seen from the big donut, it swallows the small one instead
        let push = donut_donut(&big, Vec2::zeros(), &small, at, &config())
            .unwrap()
            .push_vector
            .unwrap();
        assert_relative_eq!(push, Vec2::new(1.001, 0.0), epsilon = 1e-4);
        assert!(donut_donut(&big, push, &small, at, &config()).is_none());

        // Near the outer rim leaving outward is shorter
        let rim = Vec2::new(11.0, 0.0);
        let push = donut_donut(&small, rim, &big, Vec2::zeros(), &config())
            .unwrap()
            .push_vector
            .unwrap();
        assert!(push.x > 0.0);
    }
}
