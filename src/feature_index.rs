//! Per-tile feature index.
//!
//! Buckets insert the envelope of every ring they draw while a tile is being
//! built, each tagged with a fresh sort index. At hit-test time the grid is
//! queried with the query envelope grown by a tolerance, hits are resolved to
//! concrete features per style layer, and symbol hits from the collision index
//! are merged into the same result.
//!
//! Sort indices encode two orders. Painted geometry is reported top-down,
//! latest drawn first. Placed symbols are reported in placement order,
//! earliest first, because later labels lose collisions instead of covering
//! earlier ones.
//!
//! ```rust
//! use feature_index::prelude::*;
//! use feature_index::tile::{MemoryFeature, MemoryTileData};
//!
//! let mut tile = MemoryTileData::new();
//! let ordinal = tile.add_feature("poi", MemoryFeature::point(100, 100));
//! let geometry = vec![vec![GeometryCoordinate { x: 100, y: 100 }]];
//!
//! let mut index = FeatureIndex::new(Some(Box::new(tile)));
//! index.insert(&geometry, ordinal, "poi", "poi-bucket");
//! index.set_bucket_layer_ids("poi-bucket", ["poi-layer"]);
//!
//! let layer = StyleLayer::circle("poi-layer", 4.0);
//! let query = TileQuery::new(
//!     vec![GeometryCoordinate { x: 98, y: 98 }, GeometryCoordinate { x: 102, y: 102 }],
//!     CanonicalTileId::new(0, 0, 0).into(),
//!     "composite",
//! );
//!
//! let result = index.query(&query, &[&layer], &());
//! assert_eq!(result["poi-layer"].len(), 1);
//! ```

use crate::collision::CollisionIndex;
use crate::config::IndexConfig;
use crate::convert::convert_feature;
use crate::error::Result;
use crate::grid::GridIndex;
use crate::layer::{RenderLayer, TranslateAnchor};
use crate::query::{QueryResult, TileQuery};
use crate::tile::{GeometryTileData, GeometryTileFeature};
use feature_index_types::geometry::{
    GeometryCollection, GeometryCoordinate, GeometryCoordinates, envelope,
};
use feature_index_types::subfeature::IndexedSubfeature;
use geo::{AffineTransform, Coord, Rect};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::fmt;

type LayerIds = SmallVec<[String; 2]>;

/// Spatial index over the rendered features of one tile.
pub struct FeatureIndex {
    config: IndexConfig,
    grid: GridIndex<IndexedSubfeature>,
    sort_index: usize,
    bucket_layer_ids: FxHashMap<String, LayerIds>,
    tile_data: Option<Box<dyn GeometryTileData>>,
}

/// Per-query state shared by every resolved hit.
struct QueryContext<'a> {
    tile_data: &'a dyn GeometryTileData,
    query: &'a TileQuery,
    layers: FxHashMap<&'a str, &'a dyn RenderLayer>,
    pixels_to_tile_units: f32,
}

/// Painted geometry: latest drawn is on top and comes first.
fn top_down(a: &IndexedSubfeature, b: &IndexedSubfeature) -> Ordering {
    b.sort_index.cmp(&a.sort_index)
}

/// Placed symbols: earliest placed wins and comes first.
fn top_down_symbols(a: &IndexedSubfeature, b: &IndexedSubfeature) -> Ordering {
    a.sort_index.cmp(&b.sort_index)
}

impl FeatureIndex {
    /// Create an index for a tile with the default 8192-unit extent and 16x16 grid.
    ///
    /// `tile_data` may be `None` for tiles without decoded data; such an
    /// index answers every query with an empty result.
    pub fn new(tile_data: Option<Box<dyn GeometryTileData>>) -> Self {
        Self::build(tile_data, IndexConfig::default())
    }

    /// Create an index with a custom grid configuration.
    pub fn with_config(
        tile_data: Option<Box<dyn GeometryTileData>>,
        config: IndexConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(tile_data, config))
    }

    fn build(tile_data: Option<Box<dyn GeometryTileData>>, config: IndexConfig) -> Self {
        let extent = f32::from(config.extent);

        Self {
            config,
            grid: GridIndex::new(extent, extent, config.cell_size()),
            sort_index: 0,
            bucket_layer_ids: FxHashMap::default(),
            tile_data,
        }
    }

    /// Index every ring of a feature's geometry.
    ///
    /// Each non-empty ring gets its own sort index, so rings of one feature
    /// are distinct entries. Empty rings are skipped.
    ///
    /// # Arguments
    ///
    /// * `geometries` - Rings or lines in tile coordinates
    /// * `index` - Ordinal of the feature within its source layer
    /// * `source_layer_name` - Source layer holding the feature
    /// * `bucket_name` - Bucket the feature is drawn into
    pub fn insert(
        &mut self,
        geometries: &GeometryCollection,
        index: usize,
        source_layer_name: &str,
        bucket_name: &str,
    ) {
        for ring in geometries {
            let Some(bounds) = ring_bounds(ring) else {
                log::trace!(
                    "Skipping empty ring of feature {} in {}",
                    index,
                    source_layer_name
                );
                continue;
            };

            let sort_index = self.sort_index;
            self.sort_index += 1;

            log::trace!(
                "Indexing feature {} of {} into {} with sort index {}",
                index,
                source_layer_name,
                bucket_name,
                sort_index
            );
            self.grid.insert(
                IndexedSubfeature::new(index, source_layer_name, bucket_name, sort_index),
                bounds,
            );
        }
    }

    /// Index every ring of a feature under one shared sort index.
    ///
    /// The feature is then reported at most once per query no matter how many
    /// of its rings match. Later automatic sort indices stay above
    /// `sort_index`. Callers must not reuse a sort index across logically
    /// distinct features.
    pub fn insert_with_sort_index(
        &mut self,
        geometries: &GeometryCollection,
        index: usize,
        source_layer_name: &str,
        bucket_name: &str,
        sort_index: usize,
    ) {
        for ring in geometries {
            let Some(bounds) = ring_bounds(ring) else {
                continue;
            };

            self.grid.insert(
                IndexedSubfeature::new(index, source_layer_name, bucket_name, sort_index),
                bounds,
            );
        }

        self.sort_index = self.sort_index.max(sort_index + 1);
    }

    /// Assign the ordered style layers that render `bucket_name`.
    ///
    /// Replaces any earlier assignment for the bucket.
    pub fn set_bucket_layer_ids<I, S>(&mut self, bucket_name: impl Into<String>, layer_ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bucket_layer_ids.insert(
            bucket_name.into(),
            layer_ids.into_iter().map(Into::into).collect(),
        );
    }

    /// Layers registered for a bucket, if any.
    pub fn bucket_layer_ids(&self, bucket_name: &str) -> Option<&[String]> {
        self.bucket_layer_ids
            .get(bucket_name)
            .map(|ids| ids.as_slice())
    }

    /// Features under the query geometry, grouped by style layer.
    ///
    /// # Arguments
    ///
    /// * `query` - Query geometry, tile, source and tolerance
    /// * `layers` - Currently rendered style layers
    /// * `collision_index` - Source of placed symbol hits
    pub fn query(
        &self,
        query: &TileQuery,
        layers: &[&dyn RenderLayer],
        collision_index: &dyn CollisionIndex,
    ) -> QueryResult {
        let mut result = QueryResult::default();
        self.query_into(&mut result, query, layers, collision_index);
        result
    }

    /// Like [`FeatureIndex::query`], appending to an existing result so
    /// several tiles can contribute to one lookup.
    pub fn query_into(
        &self,
        result: &mut QueryResult,
        query: &TileQuery,
        layers: &[&dyn RenderLayer],
        collision_index: &dyn CollisionIndex,
    ) {
        let Some(tile_data) = self.tile_data.as_deref() else {
            return;
        };

        let Some(bounds) = envelope(&query.geometry) else {
            log::warn!("Rejecting feature query with empty geometry");
            return;
        };

        let extent = f32::from(self.config.extent);
        let pixels_to_tile_units = query.pixels_to_tile_units(self.config.extent);
        let mut additional_radius = query.additional_radius * pixels_to_tile_units;
        if additional_radius.is_nan() {
            log::warn!("Ignoring NaN query radius");
            additional_radius = 0.0;
        }
        let additional_radius = additional_radius.clamp(0.0, extent);

        let search = Rect::new(
            Coord {
                x: f32::from(bounds.min().x) - additional_radius,
                y: f32::from(bounds.min().y) - additional_radius,
            },
            Coord {
                x: f32::from(bounds.max().x) + additional_radius,
                y: f32::from(bounds.max().y) + additional_radius,
            },
        );

        // First layer wins when an id is listed twice.
        let mut active_layers = FxHashMap::default();
        for layer in layers {
            active_layers.entry(layer.id()).or_insert(*layer);
        }

        let ctx = QueryContext {
            tile_data,
            query,
            layers: active_layers,
            pixels_to_tile_units,
        };

        let mut features = self.grid.query(search);
        let grid_hits = features.len();
        features.sort_by(|a, b| top_down(a, b));
        features.dedup_by_key(|feature| feature.sort_index);

        for feature in &features {
            self.add_feature(&ctx, result, feature);
        }

        let mut symbols =
            collision_index.query_rendered_symbols(&query.geometry, &query.tile_id, &query.source_id);
        symbols.sort_by(|a, b| top_down_symbols(a, b));
        symbols.dedup_by_key(|symbol| symbol.sort_index);

        for symbol in &symbols {
            self.add_feature(&ctx, result, symbol);
        }

        log::debug!(
            "Feature query on {:?}/{}: {} grid hits, {} unique, {} symbols",
            query.tile_id.canonical,
            query.source_id,
            grid_hits,
            features.len(),
            symbols.len()
        );
    }

    /// Resolve one indexed hit into every active layer rendering its bucket.
    fn add_feature(
        &self,
        ctx: &QueryContext<'_>,
        result: &mut QueryResult,
        indexed: &IndexedSubfeature,
    ) {
        let layer_ids = self.bucket_layer_ids.get(&indexed.bucket_name);
        debug_assert!(
            layer_ids.is_some(),
            "bucket `{}` has no registered layers",
            indexed.bucket_name
        );
        let Some(layer_ids) = layer_ids else {
            log::error!("Bucket `{}` has no registered layers", indexed.bucket_name);
            return;
        };

        let tile_id = &ctx.query.tile_id.canonical;
        let zoom = f32::from(tile_id.z);

        // Resolved on first use, shared by all layers of the bucket.
        let mut geometry_feature: Option<Box<dyn GeometryTileFeature + '_>> = None;

        for layer_id in layer_ids {
            let Some(render_layer) = ctx.layers.get(layer_id.as_str()) else {
                continue;
            };

            if geometry_feature.is_none() {
                geometry_feature = resolve_feature(ctx.tile_data, indexed);
            }
            let Some(feature) = geometry_feature.as_deref() else {
                return;
            };

            if !render_layer.is_symbol()
                && !render_layer.query_intersects_feature(
                    &ctx.query.geometry,
                    feature,
                    zoom,
                    ctx.query.bearing,
                    ctx.pixels_to_tile_units,
                )
            {
                continue;
            }

            if let Some(filter) = &ctx.query.options.filter
                && !filter.evaluate(zoom, feature)
            {
                continue;
            }

            result
                .entry(layer_id.clone())
                .or_default()
                .push(convert_feature(feature, tile_id, self.config.extent));
        }
    }

    /// Shift a query geometry to where a translated layer is drawn.
    ///
    /// Returns `None` when `translate` is zero on both axes. The offset is in
    /// pixels and is truncated to whole tile units. Viewport-anchored offsets
    /// are then rotated by `-bearing` (radians) to undo the map rotation, and
    /// the rotated offset is rounded.
    pub fn translate_query_geometry(
        query_geometry: &GeometryCoordinates,
        translate: [f32; 2],
        anchor_type: TranslateAnchor,
        bearing: f32,
        pixels_to_tile_units: f32,
    ) -> Option<GeometryCoordinates> {
        if translate[0] == 0.0 && translate[1] == 0.0 {
            return None;
        }

        // The offset is snapped to whole tile units, truncating toward zero.
        let mut offset = Coord {
            x: f64::from((translate[0] * pixels_to_tile_units) as i16),
            y: f64::from((translate[1] * pixels_to_tile_units) as i16),
        };
        if anchor_type == TranslateAnchor::Viewport {
            let origin = Coord { x: 0.0, y: 0.0 };
            offset = AffineTransform::rotate(-f64::from(bearing).to_degrees(), origin).apply(offset);
        }
        let (dx, dy) = (offset.x.round(), offset.y.round());

        // Float to int casts saturate at the i16 bounds.
        Some(
            query_geometry
                .iter()
                .map(|p| GeometryCoordinate {
                    x: (f64::from(p.x) - dx) as i16,
                    y: (f64::from(p.y) - dy) as i16,
                })
                .collect(),
        )
    }

    pub fn tile_data(&self) -> Option<&dyn GeometryTileData> {
        self.tile_data.as_deref()
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Number of indexed rings.
    pub fn len(&self) -> usize {
        self.grid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grid.is_empty()
    }
}

impl fmt::Debug for FeatureIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeatureIndex")
            .field("config", &self.config)
            .field("entries", &self.grid.len())
            .field("sort_index", &self.sort_index)
            .field("buckets", &self.bucket_layer_ids.len())
            .field("has_tile_data", &self.tile_data.is_some())
            .finish()
    }
}

fn ring_bounds(ring: &GeometryCoordinates) -> Option<Rect<f32>> {
    let bounds = envelope(ring)?;
    Some(Rect::new(
        Coord {
            x: f32::from(bounds.min().x),
            y: f32::from(bounds.min().y),
        },
        Coord {
            x: f32::from(bounds.max().x),
            y: f32::from(bounds.max().y),
        },
    ))
}

/// Look up the feature a subfeature points at.
///
/// A miss means bucket construction and tile decoding disagree.
fn resolve_feature<'a>(
    tile_data: &'a dyn GeometryTileData,
    indexed: &IndexedSubfeature,
) -> Option<Box<dyn GeometryTileFeature + 'a>> {
    let source_layer = tile_data.layer(&indexed.source_layer_name);
    debug_assert!(
        source_layer.is_some(),
        "source layer `{}` missing from tile data",
        indexed.source_layer_name
    );
    let Some(source_layer) = source_layer else {
        log::error!(
            "Source layer `{}` missing from tile data",
            indexed.source_layer_name
        );
        return None;
    };

    let feature = source_layer.feature(indexed.index);
    debug_assert!(
        feature.is_some(),
        "feature {} missing from source layer `{}`",
        indexed.index,
        indexed.source_layer_name
    );
    if feature.is_none() {
        log::error!(
            "Feature {} missing from source layer `{}`",
            indexed.index,
            indexed.source_layer_name
        );
    }
    feature
}
