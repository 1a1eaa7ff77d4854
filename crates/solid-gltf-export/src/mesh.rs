/// How consecutive vertices of a mesh unit form primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    /// Every 3 vertices form a triangle
    Triangles,
    /// Every 2 vertices form a line segment
    Lines,
}

impl Topology {
    pub fn vertices_per_primitive(&self) -> usize {
        match self {
            Topology::Triangles => 3,
            Topology::Lines => 2,
        }
    }
}

/// One drawable piece produced from a single geometry object. Streams are
/// flat (`x, y, z, x, y, z, ...`) and vertices are never shared.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshUnit {
    pub name: String,
    pub positions: Vec<f32>,
    pub normals: Option<Vec<f32>>,
    pub colors: Option<Vec<f32>>,
    pub topology: Topology,
}

impl MeshUnit {
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Number of triangles or line segments
    pub fn primitive_count(&self) -> usize {
        self.vertex_count() / self.topology.vertices_per_primitive()
    }
}
