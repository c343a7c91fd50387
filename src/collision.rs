//! Label collision index contract.
//!
//! Symbol hits come from the collision system rather than the grid: only
//! labels that survived placement are reported, already filtered for
//! visibility. [`PlacedSymbolIndex`] keeps the envelopes of placed symbols in
//! one R-tree per tile and source.

use feature_index_types::geometry::{GeometryCoordinates, envelope};
use feature_index_types::subfeature::IndexedSubfeature;
use feature_index_types::tile_id::UnwrappedTileId;
use geo::Rect;
use rstar::{AABB, RTree, RTreeObject};
use rustc_hash::FxHashMap;

/// Source of rendered symbol hits.
pub trait CollisionIndex {
    /// Subfeatures of placed symbols that intersect `query_geometry`.
    fn query_rendered_symbols(
        &self,
        query_geometry: &GeometryCoordinates,
        tile_id: &UnwrappedTileId,
        source_id: &str,
    ) -> Vec<IndexedSubfeature>;
}

/// No symbols placed anywhere.
impl CollisionIndex for () {
    fn query_rendered_symbols(
        &self,
        _query_geometry: &GeometryCoordinates,
        _tile_id: &UnwrappedTileId,
        _source_id: &str,
    ) -> Vec<IndexedSubfeature> {
        Vec::new()
    }
}

#[derive(Debug, Clone, PartialEq)]
struct PlacedSymbol {
    envelope: AABB<[f32; 2]>,
    feature: IndexedSubfeature,
}

impl RTreeObject for PlacedSymbol {
    type Envelope = AABB<[f32; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Placed symbol envelopes, in tile coordinates, grouped by source and tile.
#[derive(Debug, Default)]
pub struct PlacedSymbolIndex {
    sources: FxHashMap<String, FxHashMap<UnwrappedTileId, RTree<PlacedSymbol>>>,
}

impl PlacedSymbolIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a symbol that survived placement.
    pub fn place(
        &mut self,
        source_id: &str,
        tile_id: UnwrappedTileId,
        bounds: Rect<f32>,
        feature: IndexedSubfeature,
    ) {
        let envelope = AABB::from_corners(
            [bounds.min().x, bounds.min().y],
            [bounds.max().x, bounds.max().y],
        );

        self.sources
            .entry(source_id.to_string())
            .or_default()
            .entry(tile_id)
            .or_default()
            .insert(PlacedSymbol { envelope, feature });
    }

    /// Drop every placed symbol of a tile, e.g. before a new placement pass.
    pub fn clear_tile(&mut self, source_id: &str, tile_id: &UnwrappedTileId) {
        if let Some(tiles) = self.sources.get_mut(source_id) {
            tiles.remove(tile_id);
        }
    }

    pub fn len(&self) -> usize {
        self.sources
            .values()
            .flat_map(|tiles| tiles.values())
            .map(RTree::size)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CollisionIndex for PlacedSymbolIndex {
    fn query_rendered_symbols(
        &self,
        query_geometry: &GeometryCoordinates,
        tile_id: &UnwrappedTileId,
        source_id: &str,
    ) -> Vec<IndexedSubfeature> {
        let Some(tree) = self
            .sources
            .get(source_id)
            .and_then(|tiles| tiles.get(tile_id))
        else {
            return Vec::new();
        };

        let Some(bounds) = envelope(query_geometry) else {
            return Vec::new();
        };

        let query = AABB::from_corners(
            [f32::from(bounds.min().x), f32::from(bounds.min().y)],
            [f32::from(bounds.max().x), f32::from(bounds.max().y)],
        );

        tree.locate_in_envelope_intersecting(&query)
            .map(|symbol| symbol.feature.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feature_index_types::geometry::GeometryCoordinate;
    use feature_index_types::tile_id::CanonicalTileId;
    use geo::coord;

    fn tile() -> UnwrappedTileId {
        CanonicalTileId::new(2, 1, 1).into()
    }

    fn rect(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Rect<f32> {
        Rect::new(coord! { x: min_x, y: min_y }, coord! { x: max_x, y: max_y })
    }

    fn query(min: i16, max: i16) -> GeometryCoordinates {
        vec![
            GeometryCoordinate { x: min, y: min },
            GeometryCoordinate { x: max, y: max },
        ]
    }

    #[test]
    fn test_unit_collision_index_is_empty() {
        assert!(().query_rendered_symbols(&query(0, 10), &tile(), "src").is_empty());
    }

    #[test]
    fn test_query_placed_symbols() {
        let mut index = PlacedSymbolIndex::new();
        index.place(
            "streets",
            tile(),
            rect(90.0, 90.0, 130.0, 110.0),
            IndexedSubfeature::new(0, "poi", "poi-labels", 3),
        );
        index.place(
            "streets",
            tile(),
            rect(1000.0, 1000.0, 1100.0, 1040.0),
            IndexedSubfeature::new(1, "poi", "poi-labels", 4),
        );
        assert_eq!(index.len(), 2);

        let hits = index.query_rendered_symbols(&query(100, 105), &tile(), "streets");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].sort_index, 3);

        assert!(
            index
                .query_rendered_symbols(&query(100, 105), &tile(), "satellite")
                .is_empty()
        );
        let other_tile: UnwrappedTileId = CanonicalTileId::new(2, 0, 0).into();
        assert!(
            index
                .query_rendered_symbols(&query(100, 105), &other_tile, "streets")
                .is_empty()
        );
    }

    #[test]
    fn test_clear_tile() {
        let mut index = PlacedSymbolIndex::new();
        index.place(
            "streets",
            tile(),
            rect(0.0, 0.0, 10.0, 10.0),
            IndexedSubfeature::new(0, "poi", "poi-labels", 0),
        );
        index.clear_tile("streets", &tile());
        assert!(index.is_empty());
    }
}
