/// Errors raised while building or ingesting geometry.
#[derive(Debug, thiserror::Error)]
pub enum GeometryError {
    #[error("unsupported geometry: {0}")]
    Unsupported(String),

    #[error("transform must have exactly 16 entries, got {0}")]
    InvalidTransform(usize),

    #[error("transform entry {0} is not a finite number")]
    NonFiniteTransform(usize),
}
