//! GLB and embedded glTF serialization

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use gltf::json;
use tracing::debug;

use crate::error::ExportError;
use crate::options::ExportFormat;
use crate::packer::PackedGltf;

// GLB constants
pub const GLB_MAGIC: u32 = 0x46546C67; // "glTF"
pub const GLB_VERSION: u32 = 2;
pub const GLB_CHUNK_JSON: u32 = 0x4E4F534A; // "JSON"
pub const GLB_CHUNK_BIN: u32 = 0x004E4942; // "BIN\0"

const HEADER_LEN: usize = 12;
const CHUNK_HEADER_LEN: usize = 8;
const DATA_URI_PREFIX: &str = "data:application/octet-stream;base64,";

/// Encoded asset.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Binary(Vec<u8>),
    Text(String),
}

impl Payload {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Payload::Binary(bytes) => bytes,
            Payload::Text(text) => text.as_bytes(),
        }
    }
}

/// Result of a conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOutput {
    pub payload: Payload,
    pub format: ExportFormat,
    pub mime_type: &'static str,
    /// Length of the encoded payload in bytes
    pub byte_length: usize,
}

/// Encode a packed scene in the requested format. `pretty` only affects
/// the `.gltf` document.
pub fn serialize(
    packed: &PackedGltf,
    format: ExportFormat,
    pretty: bool,
) -> Result<ExportOutput, ExportError> {
    let payload = match format {
        ExportFormat::Glb => Payload::Binary(write_glb(&packed.root, &packed.buffer)?),
        ExportFormat::Gltf => {
            Payload::Text(write_embedded_gltf(&packed.root, &packed.buffer, pretty)?)
        }
    };

    let byte_length = payload.as_bytes().len();
    debug!("Serialized {} payload: {} bytes", format, byte_length);

    Ok(ExportOutput {
        payload,
        format,
        mime_type: format.mime_type(),
        byte_length,
    })
}

/// Assemble a GLB container: header, space-padded JSON chunk, zero-padded
/// BIN chunk.
pub fn write_glb(root: &json::Root, buffer: &[u8]) -> Result<Vec<u8>, ExportError> {
    let json_string = serde_json::to_string(root)?;
    let json_bytes = json_string.as_bytes();

    let json_chunk_length = json_bytes.len().next_multiple_of(4);
    let bin_chunk_length = buffer.len().next_multiple_of(4);
    let total_length =
        HEADER_LEN + CHUNK_HEADER_LEN + json_chunk_length + CHUNK_HEADER_LEN + bin_chunk_length;

    let mut glb = Vec::with_capacity(total_length);

    // Header
    glb.extend_from_slice(&GLB_MAGIC.to_le_bytes());
    glb.extend_from_slice(&GLB_VERSION.to_le_bytes());
    glb.extend_from_slice(&u32_len(total_length)?.to_le_bytes());

    // JSON chunk
    glb.extend_from_slice(&u32_len(json_chunk_length)?.to_le_bytes());
    glb.extend_from_slice(&GLB_CHUNK_JSON.to_le_bytes());
    glb.extend_from_slice(json_bytes);
    glb.resize(glb.len() + json_chunk_length - json_bytes.len(), b' ');

    // BIN chunk
    glb.extend_from_slice(&u32_len(bin_chunk_length)?.to_le_bytes());
    glb.extend_from_slice(&GLB_CHUNK_BIN.to_le_bytes());
    glb.extend_from_slice(buffer);
    glb.resize(glb.len() + bin_chunk_length - buffer.len(), 0);

    debug_assert_eq!(glb.len(), total_length);
    Ok(glb)
}

/// Produce a standalone `.gltf` document with the buffer inlined as a
/// base64 data URI.
pub fn write_embedded_gltf(
    root: &json::Root,
    buffer: &[u8],
    pretty: bool,
) -> Result<String, ExportError> {
    let mut root = root.clone();
    let descriptor = root
        .buffers
        .first_mut()
        .ok_or_else(|| ExportError::Serialization("scene has no buffer".into()))?;
    descriptor.uri = Some(format!("{}{}", DATA_URI_PREFIX, STANDARD.encode(buffer)));

    let text = if pretty {
        serde_json::to_string_pretty(&root)?
    } else {
        serde_json::to_string(&root)?
    };
    Ok(text)
}

/// Decode the payload of a `data:` URI produced by [`write_embedded_gltf`].
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>, ExportError> {
    let encoded = uri
        .strip_prefix(DATA_URI_PREFIX)
        .ok_or_else(|| ExportError::InvalidContainer("not a base64 octet-stream URI".into()))?;
    STANDARD
        .decode(encoded)
        .map_err(|e| ExportError::InvalidContainer(e.to_string()))
}

/// The two chunks of a GLB container. `json` keeps its space padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlbChunks<'a> {
    pub json: &'a [u8],
    pub bin: &'a [u8],
}

/// Split a GLB container into its JSON and BIN chunks, validating the
/// header and chunk tags. A missing BIN chunk yields an empty slice.
pub fn read_glb(bytes: &[u8]) -> Result<GlbChunks<'_>, ExportError> {
    if bytes.len() < HEADER_LEN {
        return Err(ExportError::InvalidContainer("truncated header".into()));
    }
    if read_u32(bytes, 0) != GLB_MAGIC {
        return Err(ExportError::InvalidContainer("bad magic".into()));
    }
    let version = read_u32(bytes, 4);
    if version != GLB_VERSION {
        return Err(ExportError::InvalidContainer(format!(
            "unsupported version {}",
            version
        )));
    }
    let declared = read_u32(bytes, 8) as usize;
    if declared != bytes.len() {
        return Err(ExportError::InvalidContainer(format!(
            "header declares {} bytes, got {}",
            declared,
            bytes.len()
        )));
    }

    let (json, rest) = read_chunk(&bytes[HEADER_LEN..], GLB_CHUNK_JSON)?;
    let bin = if rest.is_empty() {
        &rest[..0]
    } else {
        read_chunk(rest, GLB_CHUNK_BIN)?.0
    };

    Ok(GlbChunks { json, bin })
}

fn read_chunk(bytes: &[u8], expected_type: u32) -> Result<(&[u8], &[u8]), ExportError> {
    if bytes.len() < CHUNK_HEADER_LEN {
        return Err(ExportError::InvalidContainer("truncated chunk header".into()));
    }
    let length = read_u32(bytes, 0) as usize;
    let chunk_type = read_u32(bytes, 4);
    if chunk_type != expected_type {
        return Err(ExportError::InvalidContainer(format!(
            "expected chunk type {:#010x}, got {:#010x}",
            expected_type, chunk_type
        )));
    }

    let body = &bytes[CHUNK_HEADER_LEN..];
    if body.len() < length {
        return Err(ExportError::InvalidContainer("chunk overruns container".into()));
    }
    Ok(body.split_at(length))
}

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

fn u32_len(len: usize) -> Result<u32, ExportError> {
    u32::try_from(len)
        .map_err(|_| ExportError::Serialization(format!("{} bytes exceeds GLB limits", len)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::cube;
    use crate::packer::pack;
    use crate::triangulate::triangulate;

    fn packed_cube() -> PackedGltf {
        let units = triangulate(&cube(0.0).into(), "Box").unwrap();
        pack(&units).unwrap()
    }

    #[test]
    fn glb_header_and_chunks() {
        let packed = packed_cube();
        let output = serialize(&packed, ExportFormat::Glb, false).unwrap();
        assert_eq!(output.mime_type, "model/gltf-binary");
        assert_eq!(output.format, ExportFormat::Glb);

        let Payload::Binary(glb) = &output.payload else {
            panic!("expected binary payload");
        };
        assert_eq!(output.byte_length, glb.len());
        assert_eq!(&glb[0..4], b"glTF");
        assert_eq!(read_u32(glb, 4), 2);
        assert_eq!(read_u32(glb, 8) as usize, glb.len());
        assert_eq!(&glb[16..20], b"JSON");

        let json_len = read_u32(glb, 12) as usize;
        assert_eq!(json_len % 4, 0);
        let bin_header = 20 + json_len;
        assert_eq!(&glb[bin_header + 4..bin_header + 8], b"BIN\0");
        let bin_len = read_u32(glb, bin_header) as usize;
        assert_eq!(bin_header + 8 + bin_len, glb.len());
    }

    #[test]
    fn glb_round_trip() {
        let packed = packed_cube();
        let glb = write_glb(&packed.root, &packed.buffer).unwrap();
        let chunks = read_glb(&glb).unwrap();

        assert_eq!(chunks.bin, packed.buffer.as_slice());

        let parsed: serde_json::Value = serde_json::from_slice(chunks.json).unwrap();
        let original = serde_json::to_value(&packed.root).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn json_chunk_is_space_padded() {
        let packed = packed_cube();
        let glb = write_glb(&packed.root, &packed.buffer).unwrap();
        let chunks = read_glb(&glb).unwrap();
        let text = std::str::from_utf8(chunks.json).unwrap();
        assert_eq!(text.trim_end(), serde_json::to_string(&packed.root).unwrap());
        assert!(text[text.trim_end().len()..].chars().all(|c| c == ' '));
    }

    #[test]
    fn glb_ignores_pretty_flag() {
        let packed = packed_cube();
        let plain = serialize(&packed, ExportFormat::Glb, false).unwrap();
        let pretty = serialize(&packed, ExportFormat::Glb, true).unwrap();
        assert_eq!(plain, pretty);
    }

    #[test]
    fn embedded_gltf_carries_data_uri() {
        let packed = packed_cube();
        let output = serialize(&packed, ExportFormat::Gltf, false).unwrap();
        assert_eq!(output.mime_type, "model/gltf+json");

        let Payload::Text(text) = &output.payload else {
            panic!("expected text payload");
        };
        assert_eq!(output.byte_length, text.len());

        let doc: serde_json::Value = serde_json::from_str(text).unwrap();
        assert_eq!(doc["asset"]["version"], "2.0");
        assert_eq!(doc["asset"]["generator"], "solid-gltf");
        let uri = doc["buffers"][0]["uri"].as_str().unwrap();
        assert!(uri.starts_with("data:application/octet-stream;base64,"));
        assert_eq!(decode_data_uri(uri).unwrap(), packed.buffer);

        // The packed root itself is left untouched
        assert!(packed.root.buffers[0].uri.is_none());
    }

    #[test]
    fn pretty_gltf_is_indented() {
        let packed = packed_cube();
        let text = write_embedded_gltf(&packed.root, &packed.buffer, true).unwrap();
        assert!(text.contains("\n  \"asset\""));
        let compact = write_embedded_gltf(&packed.root, &packed.buffer, false).unwrap();
        assert!(!compact.contains('\n'));
    }

    #[test]
    fn read_glb_rejects_garbage() {
        let packed = packed_cube();
        let mut glb = write_glb(&packed.root, &packed.buffer).unwrap();

        assert!(matches!(read_glb(&glb[..8]), Err(ExportError::InvalidContainer(_))));
        assert!(matches!(
            read_glb(&glb[..glb.len() - 4]),
            Err(ExportError::InvalidContainer(_))
        ));

        glb[0] = b'x';
        assert!(matches!(read_glb(&glb), Err(ExportError::InvalidContainer(_))));
    }
}
