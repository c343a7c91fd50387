//! Exact hit tests between a query geometry and feature geometry, in tile units.

use feature_index_types::geometry::GeometryCoordinate;
use geo::{Coord, Distance, Euclidean, Geometry, Intersects, LineString, Point, Polygon};

/// Query geometry as a `geo` shape: a point, a segment or a closed polygon,
/// depending on how many coordinates were supplied.
pub fn query_shape(coords: &[GeometryCoordinate]) -> Option<Geometry<f64>> {
    let points: Vec<Coord<f64>> = coords
        .iter()
        .map(|p| Coord {
            x: f64::from(p.x),
            y: f64::from(p.y),
        })
        .collect();

    match points.len() {
        0 => None,
        1 => Some(Geometry::Point(Point::from(points[0]))),
        2 => Some(Geometry::LineString(LineString::new(points))),
        _ => Some(Geometry::Polygon(Polygon::new(
            LineString::new(points),
            Vec::new(),
        ))),
    }
}

/// Whether the query touches the feature at all.
pub fn intersects(query: &[GeometryCoordinate], feature: &Geometry<f64>) -> bool {
    query_shape(query).is_some_and(|shape| shape.intersects(feature))
}

/// Whether the query comes within `radius` tile units of the feature.
///
/// A radius of zero degrades to a plain intersection test.
pub fn intersects_buffered(
    query: &[GeometryCoordinate],
    feature: &Geometry<f64>,
    radius: f64,
) -> bool {
    let Some(shape) = query_shape(query) else {
        return false;
    };

    if radius <= 0.0 || !radius.is_finite() {
        return shape.intersects(feature);
    }

    shape.intersects(feature) || Euclidean.distance(&shape, feature) <= radius
}
