//! Packing of mesh units into a single glTF buffer and scene graph

use std::collections::BTreeMap;

use gltf::json;
use json::validation::Checked::Valid;
use tracing::debug;

use crate::error::ExportError;
use crate::mesh::{MeshUnit, Topology};

/// Value written to `asset.generator`.
pub const GENERATOR: &str = "solid-gltf";

/// Scene description plus the bytes backing every buffer view.
#[derive(Debug, Clone)]
pub struct PackedGltf {
    pub root: json::Root,
    pub buffer: Vec<u8>,
}

/// Accumulates buffer bytes, views, accessors, meshes and nodes for one
/// packing call.
#[derive(Debug, Default)]
pub struct GltfBuilder {
    buffer: Vec<u8>,
    views: Vec<json::buffer::View>,
    accessors: Vec<json::Accessor>,
    meshes: Vec<json::Mesh>,
    nodes: Vec<json::Node>,
}

impl GltfBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one unit as a mesh with a single primitive and a node for it.
    pub fn push_unit(&mut self, unit: &MeshUnit) {
        let count = unit.vertex_count();
        let mut attributes = BTreeMap::new();

        let view = self.push_stream(&unit.positions);
        let bounds = position_bounds(&unit.positions);
        let positions = self.push_vec3_accessor(view, count, Some(bounds));
        attributes.insert(Valid(json::mesh::Semantic::Positions), positions);

        if let Some(normals) = &unit.normals {
            let view = self.push_stream(normals);
            let accessor = self.push_vec3_accessor(view, count, None);
            attributes.insert(Valid(json::mesh::Semantic::Normals), accessor);
        }

        if let Some(colors) = &unit.colors {
            let view = self.push_stream(colors);
            let accessor = self.push_vec3_accessor(view, count, None);
            attributes.insert(Valid(json::mesh::Semantic::Colors(0)), accessor);
        }

        let mode = match unit.topology {
            Topology::Triangles => json::mesh::Mode::Triangles,
            Topology::Lines => json::mesh::Mode::Lines,
        };

        let mesh = json::Index::new(self.meshes.len() as u32);
        self.meshes.push(json::Mesh {
            extensions: Default::default(),
            extras: Default::default(),
            name: Some(unit.name.clone()),
            primitives: vec![json::mesh::Primitive {
                attributes,
                extensions: Default::default(),
                extras: Default::default(),
                indices: None,
                material: None,
                mode: Valid(mode),
                targets: None,
            }],
            weights: None,
        });

        self.nodes.push(json::Node {
            camera: None,
            children: None,
            extensions: Default::default(),
            extras: Default::default(),
            matrix: None,
            mesh: Some(mesh),
            name: Some(unit.name.clone()),
            rotation: None,
            scale: None,
            translation: None,
            skin: None,
            weights: None,
        });

        debug!(
            "Packed '{}': {} vertices, buffer now {} bytes",
            unit.name,
            count,
            self.buffer.len()
        );
    }

    /// Write a float stream as a new 4-byte aligned segment.
    fn push_stream(&mut self, data: &[f32]) -> json::Index<json::buffer::View> {
        align_to_four(&mut self.buffer);
        let offset = self.buffer.len();
        for value in data {
            self.buffer.extend_from_slice(&value.to_le_bytes());
        }
        let length = self.buffer.len() - offset;

        self.views.push(json::buffer::View {
            buffer: json::Index::new(0),
            byte_length: length.into(),
            byte_offset: Some(offset.into()),
            byte_stride: None,
            extensions: Default::default(),
            extras: Default::default(),
            name: None,
            target: Some(Valid(json::buffer::Target::ArrayBuffer)),
        });
        json::Index::new(self.views.len() as u32 - 1)
    }

    fn push_vec3_accessor(
        &mut self,
        view: json::Index<json::buffer::View>,
        count: usize,
        bounds: Option<([f32; 3], [f32; 3])>,
    ) -> json::Index<json::Accessor> {
        let (min, max) = match bounds {
            Some((min, max)) => (Some(vec3_value(min)), Some(vec3_value(max))),
            None => (None, None),
        };

        self.accessors.push(json::Accessor {
            buffer_view: Some(view),
            byte_offset: None,
            count: count.into(),
            component_type: Valid(json::accessor::GenericComponentType(
                json::accessor::ComponentType::F32,
            )),
            extensions: Default::default(),
            extras: Default::default(),
            type_: Valid(json::accessor::Type::Vec3),
            min,
            max,
            name: None,
            normalized: false,
            sparse: None,
        });
        json::Index::new(self.accessors.len() as u32 - 1)
    }

    /// Pad the buffer and assemble the final scene description.
    pub fn finish(mut self) -> PackedGltf {
        align_to_four(&mut self.buffer);

        let scene = json::Scene {
            extensions: Default::default(),
            extras: Default::default(),
            name: None,
            nodes: (0..self.nodes.len() as u32).map(json::Index::new).collect(),
        };

        let root = json::Root {
            asset: json::Asset {
                copyright: None,
                extensions: Default::default(),
                extras: Default::default(),
                generator: Some(GENERATOR.to_string()),
                min_version: None,
                version: "2.0".to_string(),
            },
            buffers: vec![json::Buffer {
                byte_length: self.buffer.len().into(),
                extensions: Default::default(),
                extras: Default::default(),
                name: None,
                uri: None,
            }],
            buffer_views: self.views,
            accessors: self.accessors,
            meshes: self.meshes,
            nodes: self.nodes,
            scenes: vec![scene],
            scene: Some(json::Index::new(0)),
            ..Default::default()
        };

        PackedGltf {
            root,
            buffer: self.buffer,
        }
    }
}

/// Pack mesh units, in order, into one buffer and one scene.
pub fn pack(units: &[MeshUnit]) -> Result<PackedGltf, ExportError> {
    if units.is_empty() {
        return Err(ExportError::NoGeometry);
    }

    let mut builder = GltfBuilder::new();
    for unit in units {
        builder.push_unit(unit);
    }
    Ok(builder.finish())
}

/// Per-axis min/max, seeded from infinities. Callers guarantee at least one
/// vertex.
fn position_bounds(positions: &[f32]) -> ([f32; 3], [f32; 3]) {
    let mut min = [f32::INFINITY; 3];
    let mut max = [f32::NEG_INFINITY; 3];
    for vertex in positions.chunks_exact(3) {
        for axis in 0..3 {
            min[axis] = min[axis].min(vertex[axis]);
            max[axis] = max[axis].max(vertex[axis]);
        }
    }
    (min, max)
}

fn vec3_value(v: [f32; 3]) -> json::Value {
    json::Value::Array(v.into_iter().map(json::Value::from).collect())
}

fn align_to_four(buffer: &mut Vec<u8>) {
    buffer.resize(buffer.len().next_multiple_of(4), 0);
}
