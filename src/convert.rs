//! Conversion of decoded tile features into query results.
//!
//! Tile-local coordinates are projected to longitude/latitude using the
//! canonical tile id (spherical web mercator). Geometry is shaped by feature
//! type, polygon rings being grouped into polygons by winding order.

use crate::tile::GeometryTileFeature;
use feature_index_types::feature::Feature;
use feature_index_types::geometry::{
    FeatureType, GeometryCollection, GeometryCoordinate, GeometryCoordinates, signed_area,
};
use feature_index_types::tile_id::CanonicalTileId;
use geo::{Coord, Geometry, LineString, MultiLineString, MultiPoint, MultiPolygon, Point, Polygon};
use std::f64::consts::PI;

/// Convert a tile feature into a result [`Feature`] with lon/lat geometry.
pub fn convert_feature(
    feature: &dyn GeometryTileFeature,
    tile_id: &CanonicalTileId,
    extent: u16,
) -> Feature {
    let size = f64::from(extent) * 2f64.powi(i32::from(tile_id.z));
    let x0 = f64::from(extent) * f64::from(tile_id.x);
    let y0 = f64::from(extent) * f64::from(tile_id.y);

    let project = |p: GeometryCoordinate| {
        let lon = (f64::from(p.x) + x0) * 360.0 / size - 180.0;
        let y2 = 180.0 - (f64::from(p.y) + y0) * 360.0 / size;
        let lat = 360.0 / PI * (y2 * PI / 180.0).exp().atan() - 90.0;
        Coord { x: lon, y: lat }
    };

    let geometry = to_geometry(feature.feature_type(), &feature.geometries(), project);

    Feature {
        id: feature.id(),
        geometry,
        properties: feature.properties(),
    }
}

/// Feature geometry in tile units, for hit testing.
pub(crate) fn tile_geometry(feature: &dyn GeometryTileFeature) -> Geometry<f64> {
    to_geometry(feature.feature_type(), &feature.geometries(), |p| Coord {
        x: f64::from(p.x),
        y: f64::from(p.y),
    })
}

fn to_geometry(
    feature_type: FeatureType,
    geometries: &GeometryCollection,
    project: impl Fn(GeometryCoordinate) -> Coord<f64>,
) -> Geometry<f64> {
    let line = |coords: &GeometryCoordinates| -> LineString<f64> {
        coords.iter().map(|&p| project(p)).collect()
    };

    match feature_type {
        FeatureType::Point => {
            let mut points: Vec<Point<f64>> = geometries
                .iter()
                .flatten()
                .map(|&p| Point::from(project(p)))
                .collect();
            if points.len() == 1 {
                Geometry::Point(points.remove(0))
            } else {
                Geometry::MultiPoint(MultiPoint::new(points))
            }
        }
        FeatureType::LineString => {
            let mut lines: Vec<LineString<f64>> = geometries.iter().map(line).collect();
            if lines.len() == 1 {
                Geometry::LineString(lines.remove(0))
            } else {
                Geometry::MultiLineString(MultiLineString::new(lines))
            }
        }
        FeatureType::Polygon => {
            let mut polygons: Vec<Polygon<f64>> = classify_rings(geometries)
                .into_iter()
                .map(|rings| {
                    let mut rings = rings.into_iter().map(line);
                    let exterior = rings.next().unwrap_or_else(|| LineString::new(Vec::new()));
                    Polygon::new(exterior, rings.collect())
                })
                .collect();
            if polygons.len() == 1 {
                Geometry::Polygon(polygons.remove(0))
            } else {
                Geometry::MultiPolygon(MultiPolygon::new(polygons))
            }
        }
        FeatureType::Unknown => Geometry::GeometryCollection(geo::GeometryCollection::default()),
    }
}

/// Group rings into polygons: each ring wound like the first one starts a new
/// polygon, the others are holes of the current polygon. Degenerate rings are
/// dropped.
pub(crate) fn classify_rings(rings: &GeometryCollection) -> Vec<Vec<&GeometryCoordinates>> {
    let mut polygons: Vec<Vec<&GeometryCoordinates>> = Vec::new();
    let mut exterior_is_negative = None;

    for ring in rings {
        let area = signed_area(ring);
        if area == 0 {
            continue;
        }

        let negative = area < 0;
        let exterior = *exterior_is_negative.get_or_insert(negative);

        if negative != exterior
            && let Some(polygon) = polygons.last_mut()
        {
            polygon.push(ring);
        } else {
            polygons.push(vec![ring]);
        }
    }

    polygons
}

/// GeoJSON rendering of a result feature.
#[cfg(feature = "geojson")]
pub fn to_geojson(feature: &Feature) -> geojson::Feature {
    use feature_index_types::value::FeatureIdentifier;
    use geojson::feature::Id;

    let properties: geojson::JsonObject = feature
        .properties
        .iter()
        .map(|(key, value)| {
            let value = serde_json::to_value(value).unwrap_or(serde_json::Value::Null);
            (key.clone(), value)
        })
        .collect();

    let id = feature.id.as_ref().and_then(|id| match id {
        FeatureIdentifier::UInt(v) => Some(Id::Number((*v).into())),
        FeatureIdentifier::Int(v) => Some(Id::Number((*v).into())),
        FeatureIdentifier::Double(v) => serde_json::Number::from_f64(*v).map(Id::Number),
        FeatureIdentifier::String(v) => Some(Id::String(v.clone())),
    });

    geojson::Feature {
        bbox: None,
        geometry: Some(geojson::Geometry::new(geojson::Value::from(
            &feature.geometry,
        ))),
        id,
        properties: Some(properties),
        foreign_members: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::MemoryFeature;

    fn c(x: i16, y: i16) -> GeometryCoordinate {
        Coord { x, y }
    }

    fn square(min: i16, max: i16) -> GeometryCoordinates {
        vec![c(min, min), c(max, min), c(max, max), c(min, max), c(min, min)]
    }

    #[test]
    fn test_tile_center_projects_to_origin() {
        let feature = MemoryFeature::point(4096, 4096);
        let converted = convert_feature(&feature, &CanonicalTileId::new(0, 0, 0), 8192);

        let Geometry::Point(p) = converted.geometry else {
            panic!("expected a point");
        };
        assert!(p.x().abs() < 1e-9);
        assert!(p.y().abs() < 1e-9);
    }

    #[test]
    fn test_tile_corner_projects_to_mercator_bounds() {
        let feature = MemoryFeature::point(0, 0);
        let converted = convert_feature(&feature, &CanonicalTileId::new(1, 1, 1), 8192);

        let Geometry::Point(p) = converted.geometry else {
            panic!("expected a point");
        };
        assert!(p.x().abs() < 1e-9);
        assert!(p.y().abs() < 1e-9);
    }

    #[test]
    fn test_converted_feature_keeps_id_and_properties() {
        let feature = MemoryFeature::point(10, 10)
            .with_id(7u64)
            .with_property("kind", "cafe");
        let converted = convert_feature(&feature, &CanonicalTileId::new(4, 3, 5), 8192);

        assert_eq!(
            converted.id,
            Some(feature_index_types::value::FeatureIdentifier::UInt(7))
        );
        assert_eq!(converted.properties.len(), 1);
    }

    #[test]
    fn test_multi_point_and_multi_line_shapes() {
        let points = MemoryFeature::new(FeatureType::Point, vec![vec![c(1, 1), c(2, 2)]]);
        assert!(matches!(tile_geometry(&points), Geometry::MultiPoint(_)));

        let lines = MemoryFeature::new(
            FeatureType::LineString,
            vec![vec![c(0, 0), c(5, 5)], vec![c(10, 0), c(10, 10)]],
        );
        assert!(matches!(tile_geometry(&lines), Geometry::MultiLineString(_)));
    }

    #[test]
    fn test_classify_rings_groups_holes() {
        let outer = square(0, 100);
        let hole: GeometryCoordinates = square(40, 60).into_iter().rev().collect();
        let second = square(200, 300);
        let degenerate = vec![c(5, 5), c(5, 5)];

        let rings = vec![outer, hole, degenerate, second];
        let polygons = classify_rings(&rings);

        assert_eq!(polygons.len(), 2);
        assert_eq!(polygons[0].len(), 2);
        assert_eq!(polygons[1].len(), 1);
    }

    #[test]
    fn test_polygon_with_hole_geometry() {
        let outer = square(0, 100);
        let hole: GeometryCoordinates = square(40, 60).into_iter().rev().collect();
        let feature = MemoryFeature::new(FeatureType::Polygon, vec![outer, hole]);

        let Geometry::Polygon(polygon) = tile_geometry(&feature) else {
            panic!("expected a single polygon");
        };
        assert_eq!(polygon.interiors().len(), 1);
    }

    #[cfg(feature = "geojson")]
    #[test]
    fn test_to_geojson() {
        let feature = MemoryFeature::point(4096, 4096)
            .with_id("poi-1")
            .with_property("rank", 2u64);
        let converted = convert_feature(&feature, &CanonicalTileId::new(0, 0, 0), 8192);

        let geojson = to_geojson(&converted);
        assert_eq!(geojson.id, Some(geojson::feature::Id::String("poi-1".into())));
        assert_eq!(
            geojson.properties.unwrap().get("rank"),
            Some(&serde_json::json!(2))
        );
        assert!(geojson.geometry.is_some());
    }
}
