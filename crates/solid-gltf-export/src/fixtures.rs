//! Shared test geometry

use solid_gltf_core::{Polygon, Solid, Vertex};

/// Unit cube made of 6 outward-facing quads, shifted along X by `offset`.
/// The first face points towards -X.
pub(crate) fn cube(offset: f64) -> Solid {
    let faces: [[[f64; 3]; 4]; 6] = [
        [[0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 1.0], [0.0, 1.0, 0.0]],
        [[1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [1.0, 1.0, 1.0], [1.0, 0.0, 1.0]],
        [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.0, 1.0], [0.0, 0.0, 1.0]],
        [[0.0, 1.0, 0.0], [0.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, 0.0]],
        [[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0], [1.0, 0.0, 0.0]],
        [[0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [1.0, 1.0, 1.0], [0.0, 1.0, 1.0]],
    ];

    let polygons = faces
        .into_iter()
        .map(|face| {
            let shifted = face.map(|[x, y, z]| [x + offset, y, z]);
            Polygon::from_points(&shifted)
        })
        .collect();
    Solid::new(polygons)
}

/// Quad whose first vertex is red, third green, the rest uncolored.
pub(crate) fn quad_with_colors() -> Polygon {
    Polygon::new(vec![
        Vertex::new(0.0, 0.0, 0.0).with_color("#ff0000"),
        Vertex::new(1.0, 0.0, 0.0),
        Vertex::new(1.0, 1.0, 0.0).with_color("rgb(0, 255, 0)"),
        Vertex::new(0.0, 1.0, 0.0),
    ])
}
