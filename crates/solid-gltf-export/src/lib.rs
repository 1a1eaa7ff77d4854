//! solid-gltf Export - glTF 2.0 encoding of geometry trees
//!
//! Pipeline: [`Triangulator`] turns a geometry tree into mesh units,
//! [`pack`] lays them out in one buffer with a scene graph, and
//! [`serialize`] emits either a GLB container or an embedded `.gltf`.

pub mod container;
mod error;
#[cfg(test)]
mod fixtures;
mod mesh;
mod options;
pub mod packer;
pub mod triangulate;

pub use container::{read_glb, serialize, ExportOutput, GlbChunks, Payload};
pub use error::ExportError;
pub use mesh::{MeshUnit, Topology};
pub use options::{ExportFormat, ExportOptions, DEFAULT_MESH_NAME};
pub use packer::{pack, GltfBuilder, PackedGltf};
pub use triangulate::{triangulate, Triangulator};

use solid_gltf_core::GeometryNode;
use tracing::info;

/// Convert a geometry tree into an encoded glTF asset.
pub fn export(node: &GeometryNode, options: &ExportOptions) -> Result<ExportOutput, ExportError> {
    let units = Triangulator::new()
        .with_color_hint(options.default_color.clone())
        .triangulate(node, &options.mesh_name)?;
    let packed = pack(&units)?;
    let output = serialize(&packed, options.format, options.pretty_json)?;

    info!(
        "Exported {} mesh(es) as {} ({} bytes)",
        units.len(),
        output.format,
        output.byte_length
    );
    Ok(output)
}
