//! Ingestion of loosely-typed geometry objects
//!
//! The modeling layer hands over plain JSON-like objects: `{ polygons, color,
//! transforms }` for solids, `{ sides, color, transforms }` for 2D shapes, or
//! arrays of those. They are resolved into [`GeometryNode`] once, here.

use glam::DVec3;
use serde_json::{Map, Value};
use tracing::warn;

use crate::color::ColorValue;
use crate::error::GeometryError;
use crate::geometry::{GeometryNode, Polygon, Shape, Solid, Vertex};
use crate::transform::Transform;

impl GeometryNode {
    /// Resolve a JSON geometry object (or array of them) into a geometry tree.
    pub fn from_json(value: &Value) -> Result<Self, GeometryError> {
        match value {
            Value::Array(items) => items
                .iter()
                .map(Self::from_json)
                .collect::<Result<Vec<_>, _>>()
                .map(GeometryNode::Group),
            Value::Object(object) => {
                let polygons = array_field(object, "polygons");
                let sides = array_field(object, "sides");

                // The tag is the non-empty list; an empty one only counts
                // when there is nothing else.
                match (polygons, sides) {
                    (Some(polygons), Some(sides)) if polygons.is_empty() && !sides.is_empty() => {
                        Ok(shape_from_json(object, sides))
                    }
                    (Some(polygons), _) => Ok(solid_from_json(object, polygons)),
                    (None, Some(sides)) => Ok(shape_from_json(object, sides)),
                    (None, None) => Err(GeometryError::Unsupported(
                        "object has neither polygons nor sides".into(),
                    )),
                }
            }
            other => Err(GeometryError::Unsupported(format!(
                "expected a geometry object, got {}",
                kind(other)
            ))),
        }
    }
}

fn array_field<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a [Value]> {
    match object.get(key) {
        Some(Value::Array(items)) => Some(items.as_slice()),
        _ => None,
    }
}

fn solid_from_json(object: &Map<String, Value>, polygons: &[Value]) -> GeometryNode {
    GeometryNode::Solid(Solid {
        polygons: polygons.iter().map(polygon_from_json).collect(),
        color: color_field(object),
        transform: transform_field(object),
    })
}

fn shape_from_json(object: &Map<String, Value>, sides: &[Value]) -> GeometryNode {
    GeometryNode::Shape(Shape {
        sides: sides.iter().map(side_from_json).collect(),
        color: color_field(object),
        transform: transform_field(object),
    })
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Coerce a JSON value to a number the way a dynamic modeling layer would.
fn coerce_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) if s.trim().is_empty() => 0.0,
        Value::String(s) => s.trim().parse().unwrap_or(f64::NAN),
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Null => 0.0,
        _ => f64::NAN,
    }
}

fn color_from_json(value: &Value) -> Option<ColorValue> {
    match value {
        Value::Array(channels) => Some(ColorValue::Channels(
            channels.iter().map(coerce_number).collect(),
        )),
        Value::String(text) => Some(ColorValue::Text(text.clone())),
        _ => None,
    }
}

fn color_field(object: &Map<String, Value>) -> Option<ColorValue> {
    object.get("color").and_then(color_from_json)
}

fn transform_field(object: &Map<String, Value>) -> Transform {
    let Some(Value::Array(values)) = object.get("transforms").or_else(|| object.get("transform"))
    else {
        return Transform::IDENTITY;
    };

    let values: Vec<f64> = values.iter().map(coerce_number).collect();
    Transform::from_cols_slice(&values).unwrap_or_else(|e| {
        warn!("Ignoring transform: {}", e);
        Transform::IDENTITY
    })
}

/// `[x, y]` or `[x, y, z]`; anything shorter is the origin.
fn point_from_json(value: &Value) -> DVec3 {
    match value {
        Value::Array(coords) if coords.len() >= 2 => DVec3::new(
            coerce_number(&coords[0]),
            coerce_number(&coords[1]),
            coords.get(2).map(coerce_number).unwrap_or(0.0),
        ),
        _ => DVec3::ZERO,
    }
}

fn vertex_from_json(value: &Value) -> Vertex {
    match value {
        Value::Object(object) => {
            let position = object
                .get("position")
                .or_else(|| object.get("pos"))
                .map(point_from_json)
                .unwrap_or(DVec3::ZERO);
            Vertex {
                position,
                color: color_field(object),
            }
        }
        other => Vertex {
            position: point_from_json(other),
            color: None,
        },
    }
}

fn polygon_from_json(value: &Value) -> Polygon {
    let vertices = match value {
        Value::Array(vertices) => vertices,
        Value::Object(object) => match object.get("vertices") {
            Some(Value::Array(vertices)) => vertices,
            _ => return Polygon::default(),
        },
        _ => return Polygon::default(),
    };
    Polygon::new(vertices.iter().map(vertex_from_json).collect())
}

fn side_from_json(value: &Value) -> Vec<DVec3> {
    match value {
        Value::Array(points) => points.iter().map(point_from_json).collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn solid_with_nested_vertices() {
        let value = json!({
            "polygons": [
                { "vertices": [[0, 0, 0], [1, 0, 0], [1, 1, 0]] },
                [{ "position": [0, 0, 1], "color": "#ff0000" }, [1, 0, 1], [1, 1]]
            ],
            "color": [0, 255, 0]
        });

        let GeometryNode::Solid(solid) = GeometryNode::from_json(&value).unwrap() else {
            panic!("expected a solid");
        };
        assert_eq!(solid.polygons.len(), 2);
        assert_eq!(solid.color, Some(ColorValue::Channels(vec![0.0, 255.0, 0.0])));
        assert!(solid.transform.is_identity());

        let second = &solid.polygons[1].vertices;
        assert_eq!(second[0].position, DVec3::new(0.0, 0.0, 1.0));
        assert_eq!(second[0].color, Some(ColorValue::Text("#ff0000".into())));
        // 2D coordinate gets z = 0
        assert_eq!(second[2].position, DVec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn unrecognized_vertex_is_origin() {
        let value = json!({ "polygons": [[{ "foo": 1 }, "bar", [7]]] });
        let GeometryNode::Solid(solid) = GeometryNode::from_json(&value).unwrap() else {
            panic!("expected a solid");
        };
        for vertex in &solid.polygons[0].vertices {
            assert_eq!(vertex.position, DVec3::ZERO);
        }
    }

    #[test]
    fn shape_with_transform() {
        let value = json!({
            "sides": [[[0, 0], [1, 0]]],
            "transforms": [1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1, 0, 10, 0, 0, 1]
        });
        let GeometryNode::Shape(shape) = GeometryNode::from_json(&value).unwrap() else {
            panic!("expected a shape");
        };
        assert_eq!(shape.sides.len(), 1);
        assert_eq!(
            shape.transform.apply(DVec3::ZERO),
            DVec3::new(10.0, 0.0, 0.0)
        );
    }

    #[test]
    fn short_transform_is_identity() {
        let value = json!({ "sides": [], "transforms": [1, 2, 3] });
        let GeometryNode::Shape(shape) = GeometryNode::from_json(&value).unwrap() else {
            panic!("expected a shape");
        };
        assert!(shape.transform.is_identity());
    }

    #[test]
    fn non_finite_transform_is_identity() {
        let value = json!({
            "polygons": [[[0, 0, 0], [1, 0, 0], [0, 1, 0]]],
            "transforms": [1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1, 0, "abc", 0, 0, 1]
        });
        let GeometryNode::Solid(solid) = GeometryNode::from_json(&value).unwrap() else {
            panic!("expected a solid");
        };
        assert!(solid.transform.is_identity());
        assert_eq!(
            solid.transform.apply(DVec3::new(1.0, 0.0, 0.0)),
            DVec3::new(1.0, 0.0, 0.0)
        );
    }

    #[test]
    fn non_empty_list_picks_the_kind() {
        let value = json!({ "polygons": [], "sides": [[[0, 0], [1, 0]]] });
        let GeometryNode::Shape(shape) = GeometryNode::from_json(&value).unwrap() else {
            panic!("expected a shape");
        };
        assert_eq!(shape.sides.len(), 1);

        let value = json!({ "polygons": [[[0, 0, 0], [1, 0, 0], [0, 1, 0]]], "sides": [] });
        assert!(matches!(
            GeometryNode::from_json(&value).unwrap(),
            GeometryNode::Solid(_)
        ));

        let value = json!({ "polygons": [], "sides": [] });
        assert!(matches!(
            GeometryNode::from_json(&value).unwrap(),
            GeometryNode::Solid(_)
        ));
    }

    #[test]
    fn arrays_become_groups() {
        let value = json!([
            { "polygons": [] },
            [{ "sides": [] }, { "sides": [] }]
        ]);
        let node = GeometryNode::from_json(&value).unwrap();
        assert_eq!(node.leaf_count(), 3);
        match node {
            GeometryNode::Group(children) => {
                assert!(matches!(children[0], GeometryNode::Solid(_)));
                assert!(matches!(children[1], GeometryNode::Group(_)));
            }
            other => panic!("expected a group, got {:?}", other),
        }
    }

    #[test]
    fn measurement_results_are_unsupported() {
        for value in [json!(42.5), json!({ "volume": 3.0 }), json!(null)] {
            match GeometryNode::from_json(&value) {
                Err(GeometryError::Unsupported(_)) => {}
                other => panic!("expected Unsupported, got: {:?}", other),
            }
        }
    }

    #[test]
    fn string_channels_are_coerced() {
        let value = json!({ "sides": [], "color": ["255", true, null] });
        let GeometryNode::Shape(shape) = GeometryNode::from_json(&value).unwrap() else {
            panic!("expected a shape");
        };
        assert_eq!(shape.color, Some(ColorValue::Channels(vec![255.0, 1.0, 0.0])));
    }
}
