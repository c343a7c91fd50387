//! Decoded tile data contract.
//!
//! A feature index only reads tile data through these traits: look a source
//! layer up by name, then a feature by its ordinal. Implementations must be
//! stable, the same ordinal always yielding the same feature for the tile's
//! lifetime.
//!
//! [`MemoryTileData`] is a plain in-memory implementation.

use crate::error::{FeatureIndexError, Result};
use feature_index_types::geometry::{FeatureType, GeometryCollection, GeometryCoordinate};
use feature_index_types::value::{FeatureIdentifier, PropertyMap, Value};
use rustc_hash::FxHashMap;

/// One decoded feature: geometry in tile coordinates plus attributes.
pub trait GeometryTileFeature {
    fn feature_type(&self) -> FeatureType;

    /// Attribute lookup by key.
    fn value(&self, key: &str) -> Option<Value>;

    fn properties(&self) -> PropertyMap;

    fn id(&self) -> Option<FeatureIdentifier>;

    fn geometries(&self) -> GeometryCollection;
}

/// A named group of features within a tile.
pub trait GeometryTileLayer {
    fn name(&self) -> &str;

    fn feature_count(&self) -> usize;

    fn feature(&self, index: usize) -> Option<Box<dyn GeometryTileFeature + '_>>;
}

/// Access to all source layers of one decoded tile.
pub trait GeometryTileData: Send + Sync {
    fn layer(&self, name: &str) -> Option<&dyn GeometryTileLayer>;
}

impl<T: GeometryTileFeature + ?Sized> GeometryTileFeature for &T {
    fn feature_type(&self) -> FeatureType {
        (**self).feature_type()
    }

    fn value(&self, key: &str) -> Option<Value> {
        (**self).value(key)
    }

    fn properties(&self) -> PropertyMap {
        (**self).properties()
    }

    fn id(&self) -> Option<FeatureIdentifier> {
        (**self).id()
    }

    fn geometries(&self) -> GeometryCollection {
        (**self).geometries()
    }
}

/// An owned feature held by [`MemoryTileData`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryFeature {
    feature_type: FeatureType,
    id: Option<FeatureIdentifier>,
    properties: PropertyMap,
    geometries: GeometryCollection,
}

impl MemoryFeature {
    pub fn new(feature_type: FeatureType, geometries: GeometryCollection) -> Self {
        Self {
            feature_type,
            geometries,
            ..Default::default()
        }
    }

    /// Build a feature from wide integer rings, rejecting coordinates that do
    /// not fit the tile's i16 coordinate domain.
    pub fn try_new(feature_type: FeatureType, rings: &[Vec<[i32; 2]>]) -> Result<Self> {
        let geometries = rings
            .iter()
            .map(|ring| {
                ring.iter()
                    .map(|&[x, y]| match (i16::try_from(x), i16::try_from(y)) {
                        (Ok(x), Ok(y)) => Ok(GeometryCoordinate { x, y }),
                        _ => Err(FeatureIndexError::CoordinateOutOfRange {
                            x: i64::from(x),
                            y: i64::from(y),
                        }),
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<GeometryCollection>>()?;

        Ok(Self::new(feature_type, geometries))
    }

    /// Single point feature.
    pub fn point(x: i16, y: i16) -> Self {
        Self::new(FeatureType::Point, vec![vec![GeometryCoordinate { x, y }]])
    }

    pub fn with_id(mut self, id: impl Into<FeatureIdentifier>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

impl GeometryTileFeature for MemoryFeature {
    fn feature_type(&self) -> FeatureType {
        self.feature_type
    }

    fn value(&self, key: &str) -> Option<Value> {
        self.properties.get(key).cloned()
    }

    fn properties(&self) -> PropertyMap {
        self.properties.clone()
    }

    fn id(&self) -> Option<FeatureIdentifier> {
        self.id.clone()
    }

    fn geometries(&self) -> GeometryCollection {
        self.geometries.clone()
    }
}

/// A source layer held by [`MemoryTileData`].
#[derive(Debug, Clone, Default)]
pub struct MemoryLayer {
    name: String,
    features: Vec<MemoryFeature>,
}

impl GeometryTileLayer for MemoryLayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn feature_count(&self) -> usize {
        self.features.len()
    }

    fn feature(&self, index: usize) -> Option<Box<dyn GeometryTileFeature + '_>> {
        let feature = self.features.get(index)?;
        Some(Box::new(feature))
    }
}

/// In-memory tile data keyed by source layer name.
///
/// ```rust
/// use feature_index::tile::{GeometryTileData, MemoryFeature, MemoryTileData};
///
/// let mut tile = MemoryTileData::new();
/// let ordinal = tile.add_feature("poi", MemoryFeature::point(100, 100));
///
/// let layer = tile.layer("poi").unwrap();
/// assert!(layer.feature(ordinal).is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryTileData {
    layers: FxHashMap<String, MemoryLayer>,
}

impl MemoryTileData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a feature to `layer`, creating the layer if needed.
    ///
    /// Returns the feature's ordinal within the layer.
    pub fn add_feature(&mut self, layer: &str, feature: MemoryFeature) -> usize {
        let layer = self
            .layers
            .entry(layer.to_string())
            .or_insert_with(|| MemoryLayer {
                name: layer.to_string(),
                features: Vec::new(),
            });

        layer.features.push(feature);
        layer.features.len() - 1
    }

    pub fn layer_names(&self) -> impl Iterator<Item = &str> {
        self.layers.keys().map(String::as_str)
    }
}

impl GeometryTileData for MemoryTileData {
    fn layer(&self, name: &str) -> Option<&dyn GeometryTileLayer> {
        self.layers
            .get(name)
            .map(|layer| layer as &dyn GeometryTileLayer)
    }
}
