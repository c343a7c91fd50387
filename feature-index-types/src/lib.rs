//! # feature-index-types
//!
//! Core tile, geometry and feature types shared by the `feature-index` crate
//! and the collaborators that feed it.
//!
//! - **Geometry types**: `GeometryCoordinate`, `GeometryCoordinates`, `GeometryCollection`
//! - **Tile addressing**: `CanonicalTileId`, `UnwrappedTileId`
//! - **Feature data**: `Value`, `PropertyMap`, `FeatureIdentifier`, `Feature`
//! - **Index records**: `IndexedSubfeature`
//!
//! All types are serializable with Serde and built on top of the `geo` crate's
//! geometric primitives.
//!
//! ## Examples
//!
//! ```rust
//! use feature_index_types::geometry::{GeometryCoordinate, envelope};
//!
//! let ring = vec![
//!     GeometryCoordinate { x: 10, y: 20 },
//!     GeometryCoordinate { x: 40, y: 5 },
//! ];
//! let bounds = envelope(&ring).unwrap();
//! assert_eq!(bounds.min().x, 10);
//! assert_eq!(bounds.max().y, 20);
//! ```

pub mod feature;
pub mod geometry;
pub mod subfeature;
pub mod tile_id;
pub mod value;
