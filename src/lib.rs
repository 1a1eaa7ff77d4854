//! solid-gltf - glTF 2.0 export for boundary-representation geometry
//!
//! Converts solids (polygon soups) and 2D shapes (side lists) into a GLB
//! container or a self-contained `.gltf` document.
//!
//! ```no_run
//! use solid_gltf::{convert_json, ExportOptions};
//!
//! let geometry = serde_json::json!({
//!     "polygons": [[[0, 0, 0], [1, 0, 0], [0, 1, 0]]],
//!     "color": "#ff8800"
//! });
//! let output = convert_json(&geometry, &ExportOptions::default()).unwrap();
//! assert_eq!(output.mime_type, "model/gltf-binary");
//! ```

use std::error::Error;

use tracing::debug;

pub use solid_gltf_core::{
    color, ColorValue, DVec3, GeometryError, GeometryNode, Polygon, Rgb, Shape, Solid, Transform,
    Vertex,
};
pub use solid_gltf_export::{
    container, export, pack, read_glb, serialize, triangulate, ExportError, ExportFormat,
    ExportOptions, ExportOutput, GlbChunks, MeshUnit, PackedGltf, Payload, Topology,
    Triangulator, DEFAULT_MESH_NAME,
};

/// Upstream producer of geometry, typically a solid-modeling engine
/// evaluating an operation plan. `Ok(None)` means it produced nothing.
pub trait GeometrySource {
    fn produce(&self) -> Result<Option<GeometryNode>, Box<dyn Error + Send + Sync>>;
}

impl GeometrySource for GeometryNode {
    fn produce(&self) -> Result<Option<GeometryNode>, Box<dyn Error + Send + Sync>> {
        Ok(Some(self.clone()))
    }
}

impl GeometrySource for serde_json::Value {
    fn produce(&self) -> Result<Option<GeometryNode>, Box<dyn Error + Send + Sync>> {
        if self.is_null() {
            return Ok(None);
        }
        Ok(Some(GeometryNode::from_json(self)?))
    }
}

/// Convert an already-built geometry tree.
pub fn convert(node: &GeometryNode, options: &ExportOptions) -> Result<ExportOutput, ExportError> {
    export(node, options)
}

/// Ingest a JSON geometry object (or array of them) and convert it.
pub fn convert_json(
    value: &serde_json::Value,
    options: &ExportOptions,
) -> Result<ExportOutput, ExportError> {
    let node = GeometryNode::from_json(value)?;
    export(&node, options)
}

/// Ask `source` for geometry and convert whatever it returns.
pub fn convert_source<S>(source: &S, options: &ExportOptions) -> Result<ExportOutput, ExportError>
where
    S: GeometrySource + ?Sized,
{
    let node = source
        .produce()
        .map_err(|e| match e.downcast::<GeometryError>() {
            Ok(geometry) => ExportError::from(*geometry),
            Err(other) => ExportError::Source(other.to_string()),
        })?
        .ok_or(ExportError::NoGeometry)?;

    debug!("Source produced {} geometries", node.leaf_count());
    export(&node, options)
}
