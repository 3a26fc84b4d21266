//! # collision2d
//!
//! 2D shape collision with push-vector resolution and a uniform-grid broad
//! phase.
//!
//! ## Features
//!
//! - **Shapes**: points, segments, rays, lines, rectangles, convex polygons,
//!   circles and donuts behind one [`Shape`](physics::Shape) type
//! - **Lazy transforms**: origin, rotation, scale and translate are baked into
//!   cached vertices on first read
//! - **Narrow phase**: every pair of shape kinds, with push vectors for
//!   area-vs-area hits
//! - **Broad phase**: [`SpatialPartition`](spatial::SpatialPartition) over a
//!   slotmap-backed shape store
//! - **Debug drawing**: an injectable [`DebugDraw`](debug::DebugDraw) surface
//!
//! ## Quick Start
//!
//! ```rust
//! use collision2d::prelude::*;
//!
//! let config = CollisionConfig::default();
//! let mut store = ShapeStore::with_key();
//! let a = store.insert(Shape::circle(Vec2::zeros(), 5.0));
//! let b = store.insert(Shape::circle(Vec2::new(8.0, 0.0), 5.0));
//!
//! let hit = store[a].intersects(&store[b], &config).expect("circles overlap");
//! let push = hit.push_vector.expect("push vectors are on by default");
//! assert!((push.norm() - 2.0).abs() < 0.01);
//!
//! let mut grid = SpatialPartition::new(10.0)?;
//! grid.add_shape(a, &store[a])?;
//! grid.add_shape(b, &store[b])?;
//! assert_eq!(grid.find_all_pairs(&store, &config).len(), 1);
//! # Ok::<(), PartitionError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::must_use_candidate
)]

pub mod config;
pub mod debug;
pub mod foundation;
pub mod physics;
pub mod spatial;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{CollisionConfig, Config, ConfigError, DebugDrawConfig, PartitionConfig},
        debug::{CollisionDebugVisualizer, DebugDraw, DebugDrawSystem},
        foundation::{
            collections::{OwnerId, ShapeKey, ShapeStore},
            math::{Vec2, Vec4},
        },
        physics::{Aabb, CollisionInfo, Shape, ShapeError, ShapeType},
        spatial::{CollisionPair, PartitionError, PartitionIntersections, SpatialPartition},
    };
}
