//! Render layer contract and a stock style layer.

use crate::convert::tile_geometry;
use crate::feature_index::FeatureIndex;
use crate::intersection::{intersects, intersects_buffered};
use crate::tile::GeometryTileFeature;
use feature_index_types::geometry::GeometryCoordinates;
use serde::{Deserialize, Serialize};

/// A style layer that is currently rendered.
pub trait RenderLayer {
    fn id(&self) -> &str;

    /// Symbol layers are hit-tested by the collision index instead of geometry.
    fn is_symbol(&self) -> bool;

    /// Exact hit test of `query_geometry` against the rendered feature.
    ///
    /// `bearing` is in radians; `pixels_to_tile_units` scales screen-space
    /// sizes such as stroke widths into tile units.
    fn query_intersects_feature(
        &self,
        query_geometry: &GeometryCoordinates,
        feature: &dyn GeometryTileFeature,
        zoom: f32,
        bearing: f32,
        pixels_to_tile_units: f32,
    ) -> bool;
}

/// Reference frame of a paint translate offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TranslateAnchor {
    /// Offset is fixed to the map and rotates with it.
    #[default]
    Map,
    /// Offset is fixed to the screen.
    Viewport,
}

/// How a layer draws its features; sizes are in pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayerKind {
    Fill,
    Line { width: f32 },
    Circle { radius: f32, stroke_width: f32 },
    Symbol,
}

/// A style layer with constant paint properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleLayer {
    pub id: String,
    pub kind: LayerKind,
    #[serde(default)]
    pub translate: [f32; 2],
    #[serde(default)]
    pub translate_anchor: TranslateAnchor,
}

impl StyleLayer {
    pub fn new(id: impl Into<String>, kind: LayerKind) -> Self {
        Self {
            id: id.into(),
            kind,
            translate: [0.0, 0.0],
            translate_anchor: TranslateAnchor::Map,
        }
    }

    pub fn fill(id: impl Into<String>) -> Self {
        Self::new(id, LayerKind::Fill)
    }

    pub fn line(id: impl Into<String>, width: f32) -> Self {
        Self::new(id, LayerKind::Line { width })
    }

    pub fn circle(id: impl Into<String>, radius: f32) -> Self {
        Self::new(
            id,
            LayerKind::Circle {
                radius,
                stroke_width: 0.0,
            },
        )
    }

    pub fn symbol(id: impl Into<String>) -> Self {
        Self::new(id, LayerKind::Symbol)
    }

    pub fn with_translate(mut self, translate: [f32; 2], anchor: TranslateAnchor) -> Self {
        self.translate = translate;
        self.translate_anchor = anchor;
        self
    }
}

impl RenderLayer for StyleLayer {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_symbol(&self) -> bool {
        matches!(self.kind, LayerKind::Symbol)
    }

    fn query_intersects_feature(
        &self,
        query_geometry: &GeometryCoordinates,
        feature: &dyn GeometryTileFeature,
        _zoom: f32,
        bearing: f32,
        pixels_to_tile_units: f32,
    ) -> bool {
        let translated = FeatureIndex::translate_query_geometry(
            query_geometry,
            self.translate,
            self.translate_anchor,
            bearing,
            pixels_to_tile_units,
        );
        let query = translated.as_ref().unwrap_or(query_geometry);
        let geometry = tile_geometry(feature);
        let scale = f64::from(pixels_to_tile_units);

        match self.kind {
            LayerKind::Fill => intersects(query, &geometry),
            LayerKind::Line { width } => {
                intersects_buffered(query, &geometry, f64::from(width) / 2.0 * scale)
            }
            LayerKind::Circle {
                radius,
                stroke_width,
            } => intersects_buffered(query, &geometry, f64::from(radius + stroke_width) * scale),
            LayerKind::Symbol => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::MemoryFeature;
    use feature_index_types::geometry::{FeatureType, GeometryCoordinate};

    fn c(x: i16, y: i16) -> GeometryCoordinate {
        GeometryCoordinate { x, y }
    }

    fn query_box(min: i16, max: i16) -> GeometryCoordinates {
        vec![c(min, min), c(max, min), c(max, max), c(min, max), c(min, min)]
    }

    #[test]
    fn test_fill_layer_hit() {
        let layer = StyleLayer::fill("water");
        let lake = MemoryFeature::new(FeatureType::Polygon, vec![query_box(0, 1000)]);

        assert!(layer.query_intersects_feature(&query_box(500, 510), &lake, 10.0, 0.0, 16.0));
        assert!(!layer.query_intersects_feature(&query_box(2000, 2010), &lake, 10.0, 0.0, 16.0));
    }

    #[test]
    fn test_line_width_scales_with_pixels() {
        let layer = StyleLayer::line("roads", 4.0);
        let road = MemoryFeature::new(FeatureType::LineString, vec![vec![c(0, 200), c(1000, 200)]]);
        let query = query_box(100, 150);

        // 50 units away: half width of 2px needs 25 units per pixel.
        assert!(!layer.query_intersects_feature(&query, &road, 10.0, 0.0, 16.0));
        assert!(layer.query_intersects_feature(&query, &road, 10.0, 0.0, 25.0));
    }

    #[test]
    fn test_circle_radius_and_stroke() {
        let layer = StyleLayer::new(
            "dots",
            LayerKind::Circle {
                radius: 3.0,
                stroke_width: 1.0,
            },
        );
        let dot = MemoryFeature::point(100, 100);

        assert!(layer.query_intersects_feature(&vec![c(100, 160)], &dot, 10.0, 0.0, 16.0));
        assert!(!layer.query_intersects_feature(&vec![c(100, 170)], &dot, 10.0, 0.0, 16.0));
    }

    #[test]
    fn test_translated_layer_is_hit_at_rendered_position() {
        let layer = StyleLayer::fill("shadow").with_translate([10.0, 0.0], TranslateAnchor::Map);
        let square = MemoryFeature::new(FeatureType::Polygon, vec![query_box(0, 100)]);

        // Rendered 160 units to the right of its source geometry.
        let at_render = vec![c(200, 40), c(250, 40), c(250, 90), c(200, 90), c(200, 40)];
        assert!(layer.query_intersects_feature(&at_render, &square, 10.0, 0.0, 16.0));
        assert!(!StyleLayer::fill("plain").query_intersects_feature(
            &at_render, &square, 10.0, 0.0, 16.0
        ));
    }

    #[test]
    fn test_symbol_layer_kind() {
        assert!(StyleLayer::symbol("labels").is_symbol());
        assert!(!StyleLayer::circle("dots", 2.0).is_symbol());
    }

    #[test]
    fn test_style_layer_from_json() {
        let layer: StyleLayer = serde_json::from_str(
            r#"{ "id": "roads", "kind": { "type": "line", "width": 2.0 } }"#,
        )
        .unwrap();
        assert_eq!(layer, StyleLayer::line("roads", 2.0));
    }
}
