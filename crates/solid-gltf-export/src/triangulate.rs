//! Triangulation of geometry trees into mesh units

use glam::DVec3;
use solid_gltf_core::color::{self, ColorValue};
use solid_gltf_core::{GeometryNode, Rgb, Shape, Solid};
use tracing::debug;

use crate::error::ExportError;
use crate::mesh::{MeshUnit, Topology};

/// Walks a geometry tree and emits one [`MeshUnit`] per leaf.
#[derive(Debug, Clone, Default)]
pub struct Triangulator {
    color_hint: Option<ColorValue>,
}

impl Triangulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Color that overrides each geometry's own color as the shape default.
    /// Per-vertex colors still win over it.
    pub fn with_color_hint(mut self, hint: Option<ColorValue>) -> Self {
        self.color_hint = hint;
        self
    }

    /// Triangulate `node`. Groups recurse with `base_name` suffixed by the
    /// child index, so names are unique and deterministic.
    pub fn triangulate(
        &self,
        node: &GeometryNode,
        base_name: &str,
    ) -> Result<Vec<MeshUnit>, ExportError> {
        let mut units = Vec::new();
        self.collect(node, base_name, &mut units)?;
        Ok(units)
    }

    fn collect(
        &self,
        node: &GeometryNode,
        name: &str,
        units: &mut Vec<MeshUnit>,
    ) -> Result<(), ExportError> {
        match node {
            GeometryNode::Group(children) => {
                for (i, child) in children.iter().enumerate() {
                    self.collect(child, &format!("{}_{}", name, i), units)?;
                }
            }
            GeometryNode::Solid(solid) => units.push(self.solid(solid, name)?),
            GeometryNode::Shape(shape) => units.push(self.shape(shape, name)?),
        }
        Ok(())
    }

    fn default_color(&self, own: Option<&ColorValue>) -> Rgb {
        color::fallback(self.color_hint.as_ref(), own)
    }

    fn solid(&self, solid: &Solid, name: &str) -> Result<MeshUnit, ExportError> {
        let default_color = self.default_color(solid.color.as_ref());

        let mut positions = Vec::new();
        let mut normals = Vec::new();
        let mut colors = Vec::new();
        let mut skipped = 0;

        for polygon in &solid.polygons {
            let vertices = &polygon.vertices;
            if vertices.len() < 3 {
                skipped += 1;
                continue;
            }

            // Fan from vertex 0
            for i in 1..vertices.len() - 1 {
                let corners = [&vertices[0], &vertices[i], &vertices[i + 1]];
                let points = corners.map(|v| solid.transform.apply(v.position));
                let normal = face_normal(points[0], points[1], points[2]);

                for (vertex, point) in corners.iter().zip(points) {
                    push_vec3(&mut positions, point);
                    push_vec3(&mut normals, normal);
                    let rgb = vertex
                        .color
                        .as_ref()
                        .and_then(color::resolve)
                        .unwrap_or(default_color);
                    colors.extend_from_slice(&rgb.to_array());
                }
            }
        }

        if positions.is_empty() {
            return Err(ExportError::EmptyTriangulation {
                name: name.to_string(),
            });
        }

        let unit = MeshUnit {
            name: name.to_string(),
            positions,
            normals: Some(normals),
            colors: Some(colors),
            topology: Topology::Triangles,
        };
        debug!(
            "Triangulated '{}': {} triangles, {} polygons skipped",
            name,
            unit.primitive_count(),
            skipped
        );
        Ok(unit)
    }

    fn shape(&self, shape: &Shape, name: &str) -> Result<MeshUnit, ExportError> {
        let rgb = self.default_color(shape.color.as_ref()).to_array();

        let mut positions = Vec::new();
        let mut colors = Vec::new();

        for side in &shape.sides {
            // Only the endpoints of a side path become a segment.
            let (Some(&first), Some(&last)) = (side.first(), side.last()) else {
                continue;
            };
            if side.len() < 2 {
                continue;
            }

            for point in [first, last] {
                push_vec3(&mut positions, shape.transform.apply(point));
                colors.extend_from_slice(&rgb);
            }
        }

        if positions.is_empty() {
            return Err(ExportError::EmptyTriangulation {
                name: name.to_string(),
            });
        }

        let unit = MeshUnit {
            name: name.to_string(),
            positions,
            normals: None,
            colors: Some(colors),
            topology: Topology::Lines,
        };
        debug!("Segmented '{}': {} lines", name, unit.primitive_count());
        Ok(unit)
    }
}

/// Triangulate with no color hint.
pub fn triangulate(node: &GeometryNode, base_name: &str) -> Result<Vec<MeshUnit>, ExportError> {
    Triangulator::new().triangulate(node, base_name)
}

/// Unit normal of triangle ABC, or +Z when the triangle is degenerate.
fn face_normal(a: DVec3, b: DVec3, c: DVec3) -> DVec3 {
    let cross = (b - a).cross(c - a);
    let length = cross.length();
    if length > 0.0 && length.is_finite() {
        cross / length
    } else {
        DVec3::Z
    }
}

fn push_vec3(stream: &mut Vec<f32>, v: DVec3) {
    stream.extend_from_slice(&v.as_vec3().to_array());
}
