//! solid-gltf Core - Geometry model and color handling
//!
//! This crate provides the input side of the glTF encoder:
//! - A closed geometry tree (solids, 2D shapes and groups of either)
//! - A 4x4 column-major transform with a single `apply` operation
//! - Color resolution from arrays, hex strings and `rgb()`/`rgba()` strings
//! - Ingestion of loosely-typed geometry objects from JSON

pub mod color;
mod error;
pub mod geometry;
mod ingest;
pub mod transform;

pub use color::{ColorValue, Rgb};
pub use error::GeometryError;
pub use geometry::{GeometryNode, Polygon, Shape, Solid, Vertex};
pub use glam::DVec3;
pub use transform::Transform;
