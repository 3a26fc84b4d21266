//! Physics module for 2D collision detection and response
//!
//! Narrow-phase shape tests with optional push vectors. Broad-phase
//! partitioning lives in [`crate::spatial`].

pub mod collision;

pub use collision::{
    Aabb,
    CollisionInfo,
    LineKind,
    LocalTransform,
    Shape,
    ShapeError,
    ShapeType,
};
