//! Geometry tree handed to the encoder

use glam::DVec3;

use crate::color::ColorValue;
use crate::transform::Transform;

/// A point plus an optional per-vertex color override.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    pub position: DVec3,
    pub color: Option<ColorValue>,
}

impl Vertex {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            position: DVec3::new(x, y, z),
            color: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<ColorValue>) -> Self {
        self.color = Some(color.into());
        self
    }
}

impl From<[f64; 3]> for Vertex {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::new(x, y, z)
    }
}

/// A planar-ish face. Not required to be convex or even planar.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polygon {
    pub vertices: Vec<Vertex>,
}

impl Polygon {
    pub fn new(vertices: Vec<Vertex>) -> Self {
        Self { vertices }
    }

    pub fn from_points(points: &[[f64; 3]]) -> Self {
        Self::new(points.iter().copied().map(Vertex::from).collect())
    }
}

/// 3D solid: a polygon soup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Solid {
    pub polygons: Vec<Polygon>,
    pub color: Option<ColorValue>,
    pub transform: Transform,
}

impl Solid {
    pub fn new(polygons: Vec<Polygon>) -> Self {
        Self {
            polygons,
            ..Default::default()
        }
    }

    pub fn with_color(mut self, color: impl Into<ColorValue>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }
}

/// 2D shape described by its sides. Each side is an ordered point path;
/// only its endpoints matter to the encoder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Shape {
    pub sides: Vec<Vec<DVec3>>,
    pub color: Option<ColorValue>,
    pub transform: Transform,
}

impl Shape {
    pub fn new(sides: Vec<Vec<DVec3>>) -> Self {
        Self {
            sides,
            ..Default::default()
        }
    }

    pub fn with_color(mut self, color: impl Into<ColorValue>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }
}

/// Input to the encoder: a solid, a shape, or an ordered group of either.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryNode {
    Solid(Solid),
    Shape(Shape),
    Group(Vec<GeometryNode>),
}

impl GeometryNode {
    /// Number of leaf geometries in this tree
    pub fn leaf_count(&self) -> usize {
        match self {
            GeometryNode::Solid(_) | GeometryNode::Shape(_) => 1,
            GeometryNode::Group(children) => children.iter().map(Self::leaf_count).sum(),
        }
    }
}

impl From<Solid> for GeometryNode {
    fn from(solid: Solid) -> Self {
        GeometryNode::Solid(solid)
    }
}

impl From<Shape> for GeometryNode {
    fn from(shape: Shape) -> Self {
        GeometryNode::Shape(shape)
    }
}

impl From<Vec<GeometryNode>> for GeometryNode {
    fn from(children: Vec<GeometryNode>) -> Self {
        GeometryNode::Group(children)
    }
}
