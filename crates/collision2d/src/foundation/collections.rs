//! Shape storage and identity

use slotmap::{new_key_type, SlotMap};

use crate::physics::collision::Shape;

new_key_type! {
    /// Stable identity of a shape held in a [`ShapeStore`]
    pub struct ShapeKey;
}

/// Host-owned shape storage; the spatial partition records [`ShapeKey`]s
/// and resolves them through this map when running the narrow phase.
pub type ShapeStore = SlotMap<ShapeKey, Shape>;

/// Opaque back-reference from a shape to whatever game object owns it.
///
/// Carries identity only; the engine never dereferences it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OwnerId(u64);

impl OwnerId {
    /// Wrap a host-side identifier
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the wrapped identifier
    pub fn id(&self) -> u64 {
        self.0
    }
}
