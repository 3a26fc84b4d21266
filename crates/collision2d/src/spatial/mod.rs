//! Spatial partitioning data structures
//!
//! Broad-phase indexing that narrows collision queries down to shapes
//! sharing grid cells.

mod partition;

pub use partition::{
    Cell,
    CellRange,
    CollisionPair,
    PartitionError,
    PartitionIntersections,
    ShapeFilter,
    SpatialPartition,
};
