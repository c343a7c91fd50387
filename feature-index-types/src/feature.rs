//! Public query result feature.

use crate::value::{FeatureIdentifier, PropertyMap};
use geo::Geometry;
use serde::{Deserialize, Serialize};

/// A feature returned from a rendered-feature query.
///
/// Geometry is expressed in longitude/latitude degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub id: Option<FeatureIdentifier>,
    pub geometry: Geometry<f64>,
    pub properties: PropertyMap,
}

impl Feature {
    pub fn new(geometry: Geometry<f64>, properties: PropertyMap) -> Self {
        Self {
            id: None,
            geometry,
            properties,
        }
    }

    pub fn with_id(mut self, id: FeatureIdentifier) -> Self {
        self.id = Some(id);
        self
    }

    pub fn geometry(&self) -> &Geometry<f64> {
        &self.geometry
    }

    pub fn properties(&self) -> &PropertyMap {
        &self.properties
    }
}
