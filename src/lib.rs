//! Per-tile spatial feature index for "what is under this screen region" queries
//! against rendered vector-tile content.
//!
//! ```rust
//! use feature_index::prelude::*;
//! use feature_index::tile::{MemoryFeature, MemoryTileData};
//!
//! let mut tile = MemoryTileData::new();
//! let ordinal = tile.add_feature("poi", MemoryFeature::point(100, 100));
//!
//! let mut index = FeatureIndex::new(Some(Box::new(tile)));
//! index.insert(&vec![vec![GeometryCoordinate { x: 100, y: 100 }]], ordinal, "poi", "poi-bucket");
//! index.set_bucket_layer_ids("poi-bucket", ["poi-layer"]);
//!
//! let layer = StyleLayer::circle("poi-layer", 2.0);
//! let query = TileQuery::new(
//!     vec![GeometryCoordinate { x: 100, y: 100 }],
//!     CanonicalTileId::new(14, 8000, 5000).into(),
//!     "composite",
//! );
//! let result = index.query(&query, &[&layer], &());
//! assert_eq!(result["poi-layer"].len(), 1);
//! ```

pub mod collision;
pub mod config;
pub mod convert;
pub mod error;
pub mod feature_index;
pub mod filter;
pub mod grid;
pub mod intersection;
pub mod layer;
pub mod query;
pub mod tile;

pub use collision::{CollisionIndex, PlacedSymbolIndex};
pub use config::{EXTENT, GRID_CELLS, IndexConfig};
pub use convert::convert_feature;
#[cfg(feature = "geojson")]
pub use convert::to_geojson;
pub use error::{FeatureIndexError, Result};
pub use feature_index::FeatureIndex;
pub use filter::FeatureFilter;
pub use grid::GridIndex;
pub use layer::{LayerKind, RenderLayer, StyleLayer, TranslateAnchor};
pub use query::{QueryResult, RenderedQueryOptions, TileQuery};
pub use tile::{GeometryTileData, GeometryTileFeature, GeometryTileLayer};

pub use feature_index_types::feature::Feature;
pub use feature_index_types::geometry::{
    FeatureType, GeometryCollection, GeometryCoordinate, GeometryCoordinates,
};
pub use feature_index_types::subfeature::IndexedSubfeature;
pub use feature_index_types::tile_id::{CanonicalTileId, UnwrappedTileId};
pub use feature_index_types::value::{FeatureIdentifier, PropertyMap, Value};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{FeatureIndex, FeatureIndexError, IndexConfig, Result};

    pub use crate::{CollisionIndex, PlacedSymbolIndex};

    pub use crate::{RenderLayer, StyleLayer, TranslateAnchor};

    pub use crate::{QueryResult, RenderedQueryOptions, TileQuery};

    pub use crate::{GeometryTileData, GeometryTileFeature, GeometryTileLayer};

    pub use crate::{
        CanonicalTileId, Feature, GeometryCollection, GeometryCoordinate, GeometryCoordinates,
        IndexedSubfeature, UnwrappedTileId,
    };
}
