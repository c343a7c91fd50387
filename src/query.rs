//! Query parameters for rendered-feature lookups.

use crate::filter::FeatureFilter;
use feature_index_types::feature::Feature;
use feature_index_types::geometry::GeometryCoordinates;
use feature_index_types::tile_id::UnwrappedTileId;
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;

/// Matched features grouped by style layer id, in arrival order.
pub type QueryResult = FxHashMap<String, Vec<Feature>>;

/// Caller options for a rendered-feature query.
#[derive(Clone, Default)]
pub struct RenderedQueryOptions {
    /// Only features accepted by this predicate are returned.
    pub filter: Option<Arc<dyn FeatureFilter>>,
}

impl RenderedQueryOptions {
    pub fn with_filter(filter: impl FeatureFilter + 'static) -> Self {
        Self {
            filter: Some(Arc::new(filter)),
        }
    }
}

impl fmt::Debug for RenderedQueryOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderedQueryOptions")
            .field("filter", &self.filter.is_some())
            .finish()
    }
}

/// A hit-test request against one tile.
#[derive(Debug, Clone)]
pub struct TileQuery {
    /// Query polygon in tile coordinates.
    pub geometry: GeometryCoordinates,
    /// Map rotation in radians.
    pub bearing: f32,
    /// Rendered tile size in pixels.
    pub tile_size: f64,
    /// Over-zoom scale of the tile.
    pub scale: f64,
    pub tile_id: UnwrappedTileId,
    pub source_id: String,
    /// Extra search tolerance in pixels.
    pub additional_radius: f32,
    pub options: RenderedQueryOptions,
}

impl TileQuery {
    pub fn new(
        geometry: GeometryCoordinates,
        tile_id: UnwrappedTileId,
        source_id: impl Into<String>,
    ) -> Self {
        Self {
            geometry,
            bearing: 0.0,
            tile_size: 512.0,
            scale: 1.0,
            tile_id,
            source_id: source_id.into(),
            additional_radius: 0.0,
            options: RenderedQueryOptions::default(),
        }
    }

    pub fn with_bearing(mut self, bearing: f32) -> Self {
        self.bearing = bearing;
        self
    }

    pub fn with_tile_size(mut self, tile_size: f64) -> Self {
        assert!(tile_size > 0.0, "Tile size must be greater than zero");
        self.tile_size = tile_size;
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        assert!(scale > 0.0, "Scale must be greater than zero");
        self.scale = scale;
        self
    }

    pub fn with_additional_radius(mut self, radius: f32) -> Self {
        self.additional_radius = radius;
        self
    }

    pub fn with_options(mut self, options: RenderedQueryOptions) -> Self {
        self.options = options;
        self
    }

    /// Tile units covered by one screen pixel for a tile of `extent` units.
    pub fn pixels_to_tile_units(&self, extent: u16) -> f32 {
        (f64::from(extent) / self.tile_size / self.scale) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feature_index_types::tile_id::CanonicalTileId;

    #[test]
    fn test_pixels_to_tile_units() {
        let query = TileQuery::new(Vec::new(), CanonicalTileId::new(0, 0, 0).into(), "src");
        assert_eq!(query.pixels_to_tile_units(8192), 16.0);

        let overzoomed = query.with_scale(2.0).with_tile_size(256.0);
        assert_eq!(overzoomed.pixels_to_tile_units(8192), 16.0);
    }

    #[test]
    fn test_options_debug_hides_filter() {
        let options = RenderedQueryOptions::with_filter(
            |_: f32, _: &dyn crate::tile::GeometryTileFeature| true,
        );
        assert_eq!(
            format!("{:?}", options),
            "RenderedQueryOptions { filter: true }"
        );
    }
}
