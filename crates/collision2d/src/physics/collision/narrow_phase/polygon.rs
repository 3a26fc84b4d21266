//! Rectangle and convex polygon tests (Separating Axis Theorem)
//!
//! Two convex shapes are disjoint iff some edge normal of either one
//! separates their projections. When every axis overlaps, the axis with the
//! smallest penetration gives the push vector.
//!
//! Push vectors move A away from B's centroid along the chosen axis and
//! carry `config.epsilon` of extra distance so that applying them leaves the
//! shapes strictly apart. The rectangle fast path uses the same convention
//! with box centers.

use crate::config::CollisionConfig;
use crate::foundation::math::Vec2;
use crate::physics::collision::primitives::CollisionInfo;
use crate::physics::collision::shape::Shape;

use super::Convex;

/// Smallest-penetration candidate seen so far
#[derive(Debug, Clone, Copy)]
pub(crate) struct MinAxis {
    depth: f32,
    push: Vec2,
}

impl MinAxis {
    /// Keep whichever of `current` and the new candidate penetrates less.
    ///
    /// `unit_axis` must be normalized; `sign` is +1 to push along it, -1 against it.
    pub(crate) fn track(current: Option<Self>, unit_axis: Vec2, sign: f32, depth: f32, epsilon: f32) -> Option<Self> {
        match current {
            Some(best) if best.depth <= depth => Some(best),
            _ => Some(Self {
                depth,
                push: unit_axis * (sign * (depth + epsilon)),
            }),
        }
    }

    pub(crate) fn push(self) -> Vec2 {
        self.push
    }
}

/// Rectangle against rectangle: four half-plane comparisons
pub fn rectangle_rectangle(a: &Shape, pa: Vec2, b: &Shape, pb: Vec2, config: &CollisionConfig) -> Option<CollisionInfo> {
    let ra = a.bounding_box().translated(pa);
    let rb = b.bounding_box().translated(pb);
    if !ra.overlaps(&rb) {
        return None;
    }
    if !config.compute_push_vectors {
        return Some(CollisionInfo::hit());
    }

    let (ca, cb) = (ra.center(), rb.center());
    let (sx, depth_x) = if ca.x >= cb.x {
        (1.0, rb.max.x - ra.min.x)
    } else {
        (-1.0, ra.max.x - rb.min.x)
    };
    let (sy, depth_y) = if ca.y >= cb.y {
        (1.0, rb.max.y - ra.min.y)
    } else {
        (-1.0, ra.max.y - rb.min.y)
    };

    let push = if depth_x <= depth_y {
        Vec2::new(sx * (depth_x + config.epsilon), 0.0)
    } else {
        Vec2::new(0.0, sy * (depth_y + config.epsilon))
    };
    Some(CollisionInfo::with_push(push))
}

/// SAT between two convex vertex sets
pub fn sat(a: &Convex<'_>, b: &Convex<'_>, config: &CollisionConfig) -> Option<CollisionInfo> {
    if !a.is_area() || !b.is_area() {
        return None;
    }

    let away = a.centroid() - b.centroid();
    let mut best: Option<MinAxis> = None;

    for axis in a.edge_normals().chain(b.edge_normals()) {
        let len_sq = axis.norm_squared();
        if len_sq == 0.0 {
            continue;
        }
        let (a_min, a_max) = a.project(axis);
        let (b_min, b_max) = b.project(axis);
        if a_max < b_min || b_max < a_min {
            return None;
        }
        if !config.compute_push_vectors {
            continue;
        }

        let (sign, overlap) = if axis.dot(&away) >= 0.0 {
            (1.0, b_max - a_min)
        } else {
            (-1.0, a_max - b_min)
        };
        // overlap is in units of |axis|; the push is axis * overlap / |axis|^2
        let len = len_sq.sqrt();
        best = MinAxis::track(best, axis / len, sign, overlap / len, config.epsilon);
    }

    Some(match best {
        Some(best) => CollisionInfo::with_push(best.push()),
        None => CollisionInfo::hit(),
    })
}

/// Convex polygon (or rectangle) against convex polygon (or rectangle)
pub fn polygon_polygon(a: &Shape, pa: Vec2, b: &Shape, pb: Vec2, config: &CollisionConfig) -> Option<CollisionInfo> {
    sat(&Convex::of(a, pa), &Convex::of(b, pb), config)
}
