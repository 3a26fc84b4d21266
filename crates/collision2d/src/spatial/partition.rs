//! Uniform-grid spatial partition
//!
//! Space is cut into square cells of `cell_size`. A shape is registered in
//! every cell its world bounding box touches, so two shapes can only collide
//! if they share at least one cell.
//!
//! Queries grow the query shape's box by the collision epsilon, so shapes
//! that only touch within tolerance across a cell boundary are still found.
//!
//! The partition stores [`ShapeKey`]s, not shapes. Whenever a registered
//! shape moves or changes, the host must call
//! [`SpatialPartition::refresh_shape`], otherwise the shape stays filed under
//! its old cells.

use std::collections::HashMap;

use crate::config::{CollisionConfig, PartitionConfig};
use crate::foundation::collections::{ShapeKey, ShapeStore};
use crate::foundation::math::Vec2;
use crate::physics::collision::{Aabb, CollisionInfo, Shape, ShapeType};

/// Grid cell coordinate
pub type Cell = (i32, i32);

/// Optional predicate that decides whether a candidate shape is tested
pub type ShapeFilter<'a> = &'a dyn Fn(ShapeKey, &Shape) -> bool;

/// Inclusive rectangle of grid cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRange {
    /// Leftmost column
    pub x1: i32,
    /// Bottom row
    pub y1: i32,
    /// Rightmost column
    pub x2: i32,
    /// Top row
    pub y2: i32,
}

impl CellRange {
    /// Range covering a single cell
    pub fn single(cell: Cell) -> Self {
        Self {
            x1: cell.0,
            y1: cell.1,
            x2: cell.0,
            y2: cell.1,
        }
    }

    /// Whether `cell` lies inside the range
    pub fn contains(&self, cell: Cell) -> bool {
        (self.x1..=self.x2).contains(&cell.0) && (self.y1..=self.y2).contains(&cell.1)
    }

    /// Number of cells covered
    pub fn cell_count(&self) -> u64 {
        let width = (i64::from(self.x2) - i64::from(self.x1) + 1).max(0);
        let height = (i64::from(self.y2) - i64::from(self.y1) + 1).max(0);
        (width * height).unsigned_abs()
    }

    /// Every cell in row-major order
    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        let (x1, x2) = (self.x1, self.x2);
        (self.y1..=self.y2).flat_map(move |y| (x1..=x2).map(move |x| (x, y)))
    }
}

/// Partition usage errors
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PartitionError {
    /// Rays and lines have no finite bounds to file under
    #[error("Cannot partition a boundless {0:?} shape")]
    Boundless(ShapeType),

    /// The key was added twice
    #[error("Shape {0:?} is already in the partition")]
    AlreadyPresent(ShapeKey),

    /// The key was never added, or already removed
    #[error("Shape {0:?} is not in the partition")]
    NotPresent(ShapeKey),

    /// Cell size must be finite and positive
    #[error("Invalid cell size: {0}")]
    InvalidCellSize(f32),
}

/// A colliding pair of registered shapes, smaller key first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollisionPair {
    /// The smaller key
    pub key_a: ShapeKey,
    /// The larger key
    pub key_b: ShapeKey,
}

impl CollisionPair {
    /// Create a new collision pair (always stores the smaller key first)
    pub fn new(a: ShapeKey, b: ShapeKey) -> Self {
        if a <= b {
            Self { key_a: a, key_b: b }
        } else {
            Self { key_a: b, key_b: a }
        }
    }
}

/// Every hit of one query shape against the partition
///
/// `collisions[i]` is the result against `shapes[i]`, reported from the
/// query shape's point of view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartitionIntersections {
    /// Narrow-phase results
    pub collisions: Vec<CollisionInfo>,
    /// Keys of the shapes that were hit
    pub shapes: Vec<ShapeKey>,
}

impl PartitionIntersections {
    /// Number of hits
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Whether nothing was hit
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Iterate hits as `(key, info)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (ShapeKey, &CollisionInfo)> {
        self.shapes.iter().copied().zip(self.collisions.iter())
    }
}

/// Uniform grid over shape keys
#[derive(Debug, Clone)]
pub struct SpatialPartition {
    cell_size: f32,
    /// Last registered range of every shape
    shapes: HashMap<ShapeKey, CellRange>,
    /// Occupants of every non-empty cell
    cells: HashMap<Cell, Vec<ShapeKey>>,
}

impl SpatialPartition {
    /// Create an empty partition with square cells of `cell_size`
    pub fn new(cell_size: f32) -> Result<Self, PartitionError> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(PartitionError::InvalidCellSize(cell_size));
        }
        Ok(Self {
            cell_size,
            shapes: HashMap::new(),
            cells: HashMap::new(),
        })
    }

    /// Create an empty partition from configuration
    pub fn from_config(config: &PartitionConfig) -> Result<Self, PartitionError> {
        Self::new(config.cell_size)
    }

    /// Side length of one cell
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Cell containing a world position
    pub fn cell_at(&self, position: Vec2) -> Cell {
        (
            (position.x / self.cell_size).floor() as i32,
            (position.y / self.cell_size).floor() as i32,
        )
    }

    /// World-space bounds of a cell
    pub fn cell_bounds(&self, cell: Cell) -> Aabb {
        let min = Vec2::new(cell.0 as f32, cell.1 as f32) * self.cell_size;
        Aabb::new(min, min + Vec2::new(self.cell_size, self.cell_size))
    }

    /// Inclusive cell range touched by a world-space box
    pub fn cell_range_for_bounds(&self, bounds: &Aabb) -> CellRange {
        let (x1, y1) = self.cell_at(bounds.min);
        let (x2, y2) = self.cell_at(bounds.max);
        CellRange { x1, y1, x2, y2 }
    }

    /// Cell range a shape occupies at its current position, its box grown by `margin`
    fn range_of(&self, shape: &Shape, margin: f32) -> Result<CellRange, PartitionError> {
        match shape.shape_type() {
            ShapeType::None => Ok(CellRange::single((0, 0))),
            kind if !kind.is_bounded() => Err(PartitionError::Boundless(kind)),
            _ => Ok(self.cell_range_for_bounds(&shape.world_bounding_box().expanded(margin))),
        }
    }

    /// Register a shape in every cell its world bounds touch
    pub fn add_shape(&mut self, key: ShapeKey, shape: &Shape) -> Result<(), PartitionError> {
        if self.shapes.contains_key(&key) {
            return Err(PartitionError::AlreadyPresent(key));
        }
        let range = self.range_of(shape, 0.0)?;
        self.file(key, range);
        self.shapes.insert(key, range);
        log::trace!("Added shape {key:?} to cells {range:?}");
        Ok(())
    }

    /// Unregister a shape, returning the range it occupied
    pub fn remove_shape(&mut self, key: ShapeKey) -> Result<CellRange, PartitionError> {
        let range = self.shapes.remove(&key).ok_or(PartitionError::NotPresent(key))?;
        self.unfile(key, range);
        log::trace!("Removed shape {key:?} from cells {range:?}");
        Ok(range)
    }

    /// Re-file a shape after it moved or changed
    ///
    /// Returns whether the occupied range changed. A changed shape is removed
    /// from all old cells and added to all new ones.
    pub fn refresh_shape(&mut self, key: ShapeKey, shape: &Shape) -> Result<bool, PartitionError> {
        let old = *self.shapes.get(&key).ok_or(PartitionError::NotPresent(key))?;
        let new = self.range_of(shape, 0.0)?;
        if old == new {
            return Ok(false);
        }
        self.unfile(key, old);
        self.file(key, new);
        self.shapes.insert(key, new);
        log::trace!("Moved shape {key:?} from cells {old:?} to {new:?}");
        Ok(true)
    }

    fn file(&mut self, key: ShapeKey, range: CellRange) {
        for cell in range.cells() {
            self.cells.entry(cell).or_default().push(key);
        }
    }

    fn unfile(&mut self, key: ShapeKey, range: CellRange) {
        for cell in range.cells() {
            if let Some(occupants) = self.cells.get_mut(&cell) {
                occupants.retain(|&k| k != key);
                if occupants.is_empty() {
                    self.cells.remove(&cell);
                }
            }
        }
    }

    /// Whether a key is registered
    pub fn contains(&self, key: ShapeKey) -> bool {
        self.shapes.contains_key(&key)
    }

    /// Range a key was last registered under
    pub fn shape_range(&self, key: ShapeKey) -> Option<CellRange> {
        self.shapes.get(&key).copied()
    }

    /// Number of registered shapes
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Whether no shapes are registered
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Remove every shape
    pub fn clear(&mut self) {
        self.shapes.clear();
        self.cells.clear();
    }

    /// Non-empty cells with their occupants
    pub fn occupied_cells(&self) -> impl Iterator<Item = (Cell, &[ShapeKey])> {
        self.cells.iter().map(|(&cell, keys)| (cell, keys.as_slice()))
    }

    /// Distinct shapes in any cell of `range`, sorted by key
    pub fn get_cell_range(&self, range: CellRange) -> Vec<ShapeKey> {
        let mut keys: Vec<ShapeKey> = if range.cell_count() > self.cells.len() as u64 {
            // Cheaper to walk the occupied cells than the requested span
            self.cells
                .iter()
                .filter(|(cell, _)| range.contains(**cell))
                .flat_map(|(_, keys)| keys.iter().copied())
                .collect()
        } else {
            range
                .cells()
                .filter_map(|cell| self.cells.get(&cell))
                .flat_map(|keys| keys.iter().copied())
                .collect()
        };
        keys.sort_unstable();
        keys.dedup();
        keys
    }

    /// Distinct shapes filed under the cells a world-space box touches
    pub fn get_shapes_in_bounds(&self, bounds: &Aabb) -> Vec<ShapeKey> {
        self.get_cell_range(self.cell_range_for_bounds(bounds))
    }

    /// Distinct shapes sharing a cell with `shape` at its current position
    ///
    /// Rays and lines cannot be bounded to a cell span, so every registered
    /// shape is a candidate for them.
    pub fn get_shape_cell_range(&self, shape: &Shape) -> Vec<ShapeKey> {
        self.keys_near(shape, 0.0)
    }

    fn keys_near(&self, shape: &Shape, margin: f32) -> Vec<ShapeKey> {
        match self.range_of(shape, margin) {
            Ok(range) => self.get_cell_range(range),
            Err(_) => {
                let mut keys: Vec<ShapeKey> = self.shapes.keys().copied().collect();
                keys.sort_unstable();
                keys
            }
        }
    }

    /// Candidates for `shape` within `margin`, resolved through the store,
    /// minus `exclude` and anything the filter rejects
    fn candidates<'s>(
        &self,
        store: &'s ShapeStore,
        shape: &Shape,
        exclude: Option<ShapeKey>,
        filter: Option<ShapeFilter<'_>>,
        margin: f32,
    ) -> Vec<(ShapeKey, &'s Shape)> {
        self.keys_near(shape, margin)
            .into_iter()
            .filter(|&key| Some(key) != exclude)
            .filter_map(|key| match store.get(key) {
                Some(other) => Some((key, other)),
                None => {
                    log::warn!("Partition holds shape {key:?} that is missing from the store");
                    None
                }
            })
            .filter(|&(key, other)| filter.map_or(true, |accept| accept(key, other)))
            .collect()
    }

    /// First registered shape that `shape` collides with
    ///
    /// `exclude` skips one key, typically the query shape's own. The filter,
    /// when given, must accept a candidate before it is tested.
    pub fn intersects_any_in_partition(
        &self,
        store: &ShapeStore,
        shape: &Shape,
        exclude: Option<ShapeKey>,
        filter: Option<ShapeFilter<'_>>,
        config: &CollisionConfig,
    ) -> Option<(ShapeKey, CollisionInfo)> {
        self.candidates(store, shape, exclude, filter, config.epsilon)
            .into_iter()
            .find_map(|(key, other)| shape.intersects(other, config).map(|info| (key, info)))
    }

    /// Every registered shape that `shape` collides with
    pub fn find_all_partition_intersections(
        &self,
        store: &ShapeStore,
        shape: &Shape,
        exclude: Option<ShapeKey>,
        filter: Option<ShapeFilter<'_>>,
        config: &CollisionConfig,
    ) -> PartitionIntersections {
        let mut result = PartitionIntersections::default();
        for (key, other) in self.candidates(store, shape, exclude, filter, config.epsilon) {
            if let Some(info) = shape.intersects(other, config) {
                result.collisions.push(info);
                result.shapes.push(key);
            }
        }
        log::trace!("Partition query found {} intersections", result.len());
        result
    }

    /// Every colliding pair of registered shapes, each reported once
    ///
    /// Every shape is matched against the cells its epsilon-grown box
    /// touches. Results are sorted by pair and reported from `key_a`'s point
    /// of view.
    pub fn find_all_pairs(&self, store: &ShapeStore, config: &CollisionConfig) -> Vec<(CollisionPair, CollisionInfo)> {
        let mut candidates: Vec<CollisionPair> = Vec::new();
        for &key in self.shapes.keys() {
            let Some(shape) = store.get(key) else {
                log::warn!("Partition holds shape {key:?} that is missing from the store");
                continue;
            };
            candidates.extend(
                self.keys_near(shape, config.epsilon)
                    .into_iter()
                    .filter(|&other| other != key)
                    .map(|other| CollisionPair::new(key, other)),
            );
        }
        candidates.sort_unstable();
        candidates.dedup();

        let pairs: Vec<_> = candidates
            .into_iter()
            .filter_map(|pair| {
                let a = store.get(pair.key_a)?;
                let b = store.get(pair.key_b)?;
                a.intersects(b, config).map(|info| (pair, info))
            })
            .collect();
        log::debug!("Broad phase over {} shapes produced {} colliding pairs", self.len(), pairs.len());
        pairs
    }
}
