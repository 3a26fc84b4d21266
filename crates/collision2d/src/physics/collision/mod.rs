//! 2D shape collision
//!
//! [`Shape`] is the public facade: it owns local geometry, a transform and
//! lazily cached derived data. Pairwise tests go through [`dispatch`], which
//! routes each pair of shape kinds to a handler in [`narrow_phase`].

pub mod dispatch;
pub mod narrow_phase;
pub mod primitives;
pub mod shape;
pub mod transform;

pub use dispatch::collide;
pub use primitives::{Aabb, CollisionInfo, LineKind};
pub use shape::{Shape, ShapeError, ShapeType};
pub use transform::LocalTransform;
