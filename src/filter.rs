//! Per-query feature filter predicate.

use crate::tile::GeometryTileFeature;

/// A style filter evaluated against a resolved feature at the tile's zoom.
pub trait FeatureFilter: Send + Sync {
    fn evaluate(&self, zoom: f32, feature: &dyn GeometryTileFeature) -> bool;
}

impl<F> FeatureFilter for F
where
    F: Fn(f32, &dyn GeometryTileFeature) -> bool + Send + Sync,
{
    fn evaluate(&self, zoom: f32, feature: &dyn GeometryTileFeature) -> bool {
        self(zoom, feature)
    }
}
