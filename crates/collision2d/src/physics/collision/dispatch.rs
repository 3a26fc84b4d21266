//! Pairwise dispatch between shape kinds
//!
//! A dense `ShapeType::COUNT x ShapeType::COUNT` table maps every ordered
//! pair to a route. Each unordered pair has one handler; the mirrored cell
//! reaches the same handler with its operands swapped and the result
//! reversed. Adding a shape kind changes the table dimensions, so the table
//! stops compiling until every new cell is filled in.

use crate::config::CollisionConfig;
use crate::foundation::math::Vec2;

use super::narrow_phase::{line, point, polygon, round, Handler};
use super::primitives::CollisionInfo;
use super::shape::{Shape, ShapeType};

/// How one ordered pair of shape kinds is resolved
#[derive(Clone, Copy)]
pub enum Route {
    /// The pair can never collide
    Never,
    /// Call the handler as `(a, b)`
    Direct(Handler),
    /// Call the handler as `(b, a)` and reverse the result
    Swapped(Handler),
}

use Route::{Direct as D, Never as N, Swapped as S};

const PT_PT: Handler = point::point_point;
const PT_LN: Handler = point::point_line;
const PT_RC: Handler = point::point_rectangle;
const PT_PG: Handler = point::point_polygon;
const PT_CI: Handler = point::point_circle;
const PT_DO: Handler = point::point_donut;
const LN_LN: Handler = line::line_line;
const LN_PG: Handler = line::line_polygon;
const LN_CI: Handler = line::line_circle;
const LN_DO: Handler = line::line_donut;
const RC_RC: Handler = polygon::rectangle_rectangle;
const PG_PG: Handler = polygon::polygon_polygon;
const PG_CI: Handler = round::polygon_circle;
const PG_DO: Handler = round::polygon_donut;
const CI_CI: Handler = round::circle_circle;
const CI_DO: Handler = round::circle_donut;
const DO_DO: Handler = round::donut_donut;

/// Rows are the first operand, columns the second, both in `ShapeType::ALL` order:
/// none, point, edge, ray, line, rectangle, polygon, circle, donut
#[rustfmt::skip]
pub const ROUTES: [[Route; ShapeType::COUNT]; ShapeType::COUNT] = [
    // none
    [N, N, N, N, N, N, N, N, N],
    // point
    [N, D(PT_PT), D(PT_LN), D(PT_LN), D(PT_LN), D(PT_RC), D(PT_PG), D(PT_CI), D(PT_DO)],
    // edge
    [N, S(PT_LN), D(LN_LN), D(LN_LN), D(LN_LN), D(LN_PG), D(LN_PG), D(LN_CI), D(LN_DO)],
    // ray
    [N, S(PT_LN), S(LN_LN), D(LN_LN), D(LN_LN), D(LN_PG), D(LN_PG), D(LN_CI), D(LN_DO)],
    // line
    [N, S(PT_LN), S(LN_LN), S(LN_LN), D(LN_LN), D(LN_PG), D(LN_PG), D(LN_CI), D(LN_DO)],
    // rectangle
    [N, S(PT_RC), S(LN_PG), S(LN_PG), S(LN_PG), D(RC_RC), D(PG_PG), D(PG_CI), D(PG_DO)],
    // polygon
    [N, S(PT_PG), S(LN_PG), S(LN_PG), S(LN_PG), S(PG_PG), D(PG_PG), D(PG_CI), D(PG_DO)],
    // circle
    [N, S(PT_CI), S(LN_CI), S(LN_CI), S(LN_CI), S(PG_CI), S(PG_CI), D(CI_CI), D(CI_DO)],
    // donut
    [N, S(PT_DO), S(LN_DO), S(LN_DO), S(LN_DO), S(PG_DO), S(PG_DO), S(CI_DO), D(DO_DO)],
];

/// The route for an ordered pair of shape kinds
pub fn route(a: ShapeType, b: ShapeType) -> Route {
    ROUTES[a.index()][b.index()]
}

/// Narrow-phase test of `a` placed at `pa` against `b` placed at `pb`
///
/// Bounded pairs are rejected early when their world bounding boxes, grown
/// by `config.epsilon`, are disjoint; rays and lines skip that check because
/// they have no finite box.
pub fn collide(a: &Shape, pa: Vec2, b: &Shape, pb: Vec2, config: &CollisionConfig) -> Option<CollisionInfo> {
    let handler = route(a.shape_type(), b.shape_type());
    if matches!(handler, Route::Never) {
        return None;
    }

    if a.is_bounded() && b.is_bounded() {
        let box_a = a.bounding_box().translated(pa).expanded(config.epsilon);
        let box_b = b.bounding_box().translated(pb);
        if !box_a.overlaps(&box_b) {
            return None;
        }
    }

    match handler {
        Route::Never => None,
        Route::Direct(f) => f(a, pa, b, pb, config),
        Route::Swapped(f) => f(b, pb, a, pa, config).map(CollisionInfo::reversed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_mirrored() {
        for a in ShapeType::ALL {
            for b in ShapeType::ALL {
                match (route(a, b), route(b, a)) {
                    (Route::Never, Route::Never) => {}
                    (Route::Direct(f), Route::Swapped(g)) | (Route::Swapped(g), Route::Direct(f)) => {
                        assert_eq!(f as usize, g as usize, "{a:?}/{b:?} use different handlers");
                    }
                    (Route::Direct(f), Route::Direct(g)) => {
                        assert_eq!(a, b, "{a:?}/{b:?} are both direct");
                        assert_eq!(f as usize, g as usize);
                    }
                    _ => panic!("{a:?}/{b:?} routes are not mirrored"),
                }
            }
        }
    }

    #[test]
    fn test_only_none_never_collides() {
        for a in ShapeType::ALL {
            for b in ShapeType::ALL {
                let never = matches!(route(a, b), Route::Never);
                assert_eq!(never, a == ShapeType::None || b == ShapeType::None, "{a:?}/{b:?}");
            }
        }
    }

    #[test]
    fn test_box_rejection_skipped_for_lines() {
        let config = CollisionConfig::default();
        let circle = Shape::circle(Vec2::new(100.0, 0.0), 1.0);
        let line = Shape::line(Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0));
        assert!(collide(&line, Vec2::zeros(), &circle, Vec2::zeros(), &config).is_some());
        assert!(collide(&circle, Vec2::zeros(), &line, Vec2::zeros(), &config).is_some());
    }

    #[test]
    fn test_nearby_points_pass_box_rejection() {
        let config = CollisionConfig::default();
        let a = Shape::point(Vec2::new(1.0, 1.0));
        let b = Shape::point(Vec2::new(1.0, 1.0005));
        assert!(collide(&a, Vec2::zeros(), &b, Vec2::zeros(), &config).is_some());
        assert!(collide(&a, Vec2::zeros(), &b, Vec2::new(0.0, 1.0), &config).is_none());
    }

    #[test]
    fn test_swapped_route_reverses_result() {
        let config = CollisionConfig::default();
        let square = Shape::rectangle(0.0, 0.0, 1.0, 1.0);
        let circle = Shape::circle(Vec2::zeros(), 0.5);
        let forward = collide(&square, Vec2::zeros(), &circle, Vec2::new(1.2, 0.5), &config).unwrap();
        let backward = collide(&circle, Vec2::new(1.2, 0.5), &square, Vec2::zeros(), &config).unwrap();
        assert_eq!(forward.push_vector.map(|v| -v), backward.push_vector);
    }
}
