//! Tile-local geometry types.
//!
//! Coordinates are integers in the tile's fixed extent (usually `0..8192`),
//! possibly slightly negative or above the extent for buffered geometry.

use geo::{Coord, Rect};
use serde::{Deserialize, Serialize};

/// A single coordinate in tile-local space.
pub type GeometryCoordinate = Coord<i16>;

/// An ordered ring or line.
pub type GeometryCoordinates = Vec<GeometryCoordinate>;

/// All rings/lines of one feature, in decoder order.
pub type GeometryCollection = Vec<GeometryCoordinates>;

/// Geometry kind of a decoded vector-tile feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FeatureType {
    #[default]
    Unknown,
    Point,
    LineString,
    Polygon,
}

/// Axis-aligned bounding envelope of a set of coordinates.
///
/// Returns `None` for an empty slice.
pub fn envelope(coords: &[GeometryCoordinate]) -> Option<Rect<i16>> {
    let (first, rest) = coords.split_first()?;

    let (min, max) = rest.iter().fold((*first, *first), |(min, max), c| {
        (
            Coord {
                x: min.x.min(c.x),
                y: min.y.min(c.y),
            },
            Coord {
                x: max.x.max(c.x),
                y: max.y.max(c.y),
            },
        )
    });

    Some(Rect::new(min, max))
}

/// Signed area of a ring using the shoelace sum in tile space (y down).
///
/// Rings wound clockwise on screen yield a positive value.
pub fn signed_area(ring: &[GeometryCoordinate]) -> i64 {
    let mut sum = 0i64;
    let len = ring.len();
    if len < 2 {
        return 0;
    }

    let mut j = len - 1;
    for i in 0..len {
        let p1 = ring[i];
        let p2 = ring[j];
        sum += (i64::from(p2.x) - i64::from(p1.x)) * (i64::from(p1.y) + i64::from(p2.y));
        j = i;
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: i16, y: i16) -> GeometryCoordinate {
        Coord { x, y }
    }

    #[test]
    fn test_envelope_of_empty_ring() {
        assert!(envelope(&[]).is_none());
    }

    #[test]
    fn test_envelope_of_single_point() {
        let bounds = envelope(&[c(100, 100)]).unwrap();
        assert_eq!(bounds.min(), c(100, 100));
        assert_eq!(bounds.max(), c(100, 100));
    }

    #[test]
    fn test_envelope_handles_negative_coordinates() {
        let bounds = envelope(&[c(-64, 10), c(8200, -3), c(5, 9000)]).unwrap();
        assert_eq!(bounds.min(), c(-64, -3));
        assert_eq!(bounds.max(), c(8200, 9000));
    }

    #[test]
    fn test_signed_area_orientation() {
        let clockwise = [c(0, 0), c(10, 0), c(10, 10), c(0, 10), c(0, 0)];
        let counter_clockwise: Vec<_> = clockwise.iter().rev().copied().collect();

        assert!(signed_area(&clockwise) > 0);
        assert!(signed_area(&counter_clockwise) < 0);
        assert_eq!(signed_area(&clockwise), -signed_area(&counter_clockwise));
    }
}
