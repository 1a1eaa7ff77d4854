//! Affine (and projective) transforms attached to geometry objects

use glam::{DMat4, DVec3};

use crate::error::GeometryError;

/// A 4x4 transform stored column-major, as the modeling layer emits it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform(DMat4);

impl Transform {
    pub const IDENTITY: Transform = Transform(DMat4::IDENTITY);

    /// Build a transform from 16 finite column-major entries.
    pub fn from_cols_slice(values: &[f64]) -> Result<Self, GeometryError> {
        if values.len() != 16 {
            return Err(GeometryError::InvalidTransform(values.len()));
        }
        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            return Err(GeometryError::NonFiniteTransform(index));
        }
        Ok(Self(DMat4::from_cols_slice(values)))
    }

    /// Wrap an existing matrix
    pub fn from_matrix(matrix: DMat4) -> Self {
        Self(matrix)
    }

    /// Translation-only transform
    pub fn from_translation(offset: DVec3) -> Self {
        Self(DMat4::from_translation(offset))
    }

    pub fn is_identity(&self) -> bool {
        self.0 == DMat4::IDENTITY
    }

    /// Transform a point. A homogeneous `w` other than 0 or 1 triggers
    /// perspective division.
    pub fn apply(&self, point: DVec3) -> DVec3 {
        let v = self.0 * point.extend(1.0);
        if v.w != 0.0 && v.w != 1.0 {
            v.truncate() / v.w
        } else {
            v.truncate()
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
