//! Tile addressing.

use serde::{Deserialize, Serialize};

/// A tile address in the canonical `z/x/y` pyramid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CanonicalTileId {
    pub z: u8,
    pub x: u32,
    pub y: u32,
}

impl CanonicalTileId {
    /// Create a canonical tile id.
    ///
    /// # Panics
    ///
    /// Panics if `z` exceeds 32 or if `x`/`y` fall outside the `2^z` grid.
    pub fn new(z: u8, x: u32, y: u32) -> Self {
        assert!(z <= 32, "Zoom level must be at most 32");
        let dim = 1u64 << z;
        assert!(
            u64::from(x) < dim && u64::from(y) < dim,
            "Tile coordinates out of range for zoom {}",
            z
        );
        Self { z, x, y }
    }
}

/// A canonical tile plus the world copy it is rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnwrappedTileId {
    pub wrap: i16,
    pub canonical: CanonicalTileId,
}

impl UnwrappedTileId {
    pub fn new(wrap: i16, canonical: CanonicalTileId) -> Self {
        Self { wrap, canonical }
    }
}

impl From<CanonicalTileId> for UnwrappedTileId {
    fn from(canonical: CanonicalTileId) -> Self {
        Self { wrap: 0, canonical }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_tile_id() {
        let id = CanonicalTileId::new(3, 7, 0);
        assert_eq!((id.z, id.x, id.y), (3, 7, 0));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_canonical_tile_id_out_of_range() {
        CanonicalTileId::new(1, 2, 0);
    }

    #[test]
    fn test_unwrapped_from_canonical() {
        let unwrapped: UnwrappedTileId = CanonicalTileId::new(0, 0, 0).into();
        assert_eq!(unwrapped.wrap, 0);
    }
}
