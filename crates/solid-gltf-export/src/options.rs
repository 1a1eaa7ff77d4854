use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use solid_gltf_core::ColorValue;

use crate::error::ExportError;

/// Default base name for generated meshes and nodes.
pub const DEFAULT_MESH_NAME: &str = "JSCADMesh";

/// Output container format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Single binary container (.glb)
    #[default]
    Glb,
    /// JSON document with an embedded base64 buffer (.gltf)
    Gltf,
}

impl ExportFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Glb => "model/gltf-binary",
            ExportFormat::Gltf => "model/gltf+json",
        }
    }

    /// File extension without the leading dot
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Glb => "glb",
            ExportFormat::Gltf => "gltf",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "glb" => Ok(ExportFormat::Glb),
            "gltf" => Ok(ExportFormat::Gltf),
            other => Err(ExportError::Config(format!("unknown format '{}'", other))),
        }
    }
}

/// Options recognized by a conversion call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    pub format: ExportFormat,
    /// Base name for meshes and nodes; groups append `_<index>`.
    #[serde(alias = "meshName")]
    pub mesh_name: String,
    /// Indent the `.gltf` document. Binary output is unaffected.
    #[serde(alias = "prettyJson")]
    pub pretty_json: bool,
    /// Color that takes precedence over each geometry's own color.
    #[serde(alias = "defaultColor", skip_serializing_if = "Option::is_none")]
    pub default_color: Option<ColorValue>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Glb,
            mesh_name: DEFAULT_MESH_NAME.to_string(),
            pretty_json: false,
            default_color: None,
        }
    }
}

impl ExportOptions {
    /// Parse options from a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ExportError> {
        Ok(toml::from_str(content)?)
    }

    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_mesh_name(mut self, name: impl Into<String>) -> Self {
        self.mesh_name = name.into();
        self
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty_json = pretty;
        self
    }
}
