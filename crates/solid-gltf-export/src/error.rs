use solid_gltf_core::GeometryError;
use thiserror::Error;

/// Errors that terminate a conversion. No partial output is ever produced.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("unsupported geometry: {0}")]
    UnsupportedGeometry(String),

    #[error("geometry '{name}' produced no triangles or line segments")]
    EmptyTriangulation { name: String },

    #[error("no geometry was produced")]
    NoGeometry,

    #[error("geometry source failed: {0}")]
    Source(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("invalid glTF binary container: {0}")]
    InvalidContainer(String),

    #[error("invalid export options: {0}")]
    Config(String),
}

impl From<GeometryError> for ExportError {
    fn from(err: GeometryError) -> Self {
        match err {
            GeometryError::Unsupported(reason) => ExportError::UnsupportedGeometry(reason),
            other => ExportError::UnsupportedGeometry(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(err: serde_json::Error) -> Self {
        ExportError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for ExportError {
    fn from(err: toml::de::Error) -> Self {
        ExportError::Config(err.to_string())
    }
}
