//! Color resolution
//!
//! Geometry colors arrive in whatever form the modeling layer produced them:
//! numeric arrays (either 0-1 floats or 0-255 bytes), CSS hex strings, or
//! `rgb()`/`rgba()` strings. Everything is normalized to an [`Rgb`] triple
//! with channels in `0.0..=1.0`. Alpha is always dropped.

use serde::{Deserialize, Serialize};

/// RGB color with floating point components (0.0 to 1.0)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);
    pub const RED: Rgb = Rgb::new(1.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create a color from a hex value (0xRRGGBB)
    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xFF) as f32 / 255.0;
        let g = ((hex >> 8) & 0xFF) as f32 / 255.0;
        let b = (hex & 0xFF) as f32 / 255.0;
        Self::new(r, g, b)
    }

    /// Convert to an array [r, g, b]
    pub fn to_array(&self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::WHITE
    }
}

/// An unresolved color as it appears on a geometry object or vertex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorValue {
    /// Numeric channels, already coerced to numbers. Unparsable channels are NaN.
    Channels(Vec<f64>),
    /// A hex or `rgb()`/`rgba()` string.
    Text(String),
}

impl From<[f32; 3]> for ColorValue {
    fn from(channels: [f32; 3]) -> Self {
        ColorValue::Channels(channels.iter().map(|&c| c as f64).collect())
    }
}

impl From<&str> for ColorValue {
    fn from(text: &str) -> Self {
        ColorValue::Text(text.to_string())
    }
}

/// Resolve a color value to a normalized RGB triple.
///
/// Returns `None` for anything that cannot be interpreted as a color so the
/// caller can apply its own fallback.
pub fn resolve(value: &ColorValue) -> Option<Rgb> {
    match value {
        ColorValue::Channels(channels) => from_channels(channels),
        ColorValue::Text(text) => {
            let text = text.trim();
            if text.starts_with('#') {
                parse_hex(text)
            } else {
                parse_rgb_function(text)
            }
        }
    }
}

/// Pick the first resolvable color out of an explicit hint and the
/// geometry's own color, falling back to white.
pub fn fallback(hint: Option<&ColorValue>, own: Option<&ColorValue>) -> Rgb {
    hint.and_then(resolve)
        .or_else(|| own.and_then(resolve))
        .unwrap_or(Rgb::WHITE)
}

fn from_channels(channels: &[f64]) -> Option<Rgb> {
    match channels {
        [r, g, b, ..] => Some(Rgb::new(
            normalize_channel(*r),
            normalize_channel(*g),
            normalize_channel(*b),
        )),
        _ => None,
    }
}

/// Values above 1 are 8-bit channels.
fn normalize_channel(value: f64) -> f32 {
    if !value.is_finite() || value <= 0.0 {
        return 0.0;
    }
    let value = if value > 1.0 { value / 255.0 } else { value };
    value.min(1.0) as f32
}

fn parse_hex(text: &str) -> Option<Rgb> {
    let digits = text.strip_prefix('#')?;
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 | 8 => digits[..6].to_string(),
        _ => return None,
    };

    u32::from_str_radix(&expanded, 16).ok().map(Rgb::from_hex)
}

fn parse_rgb_function(text: &str) -> Option<Rgb> {
    let lower = text.to_ascii_lowercase();
    let args = lower
        .strip_prefix("rgba(")
        .or_else(|| lower.strip_prefix("rgb("))?
        .strip_suffix(')')?;

    // Channels are positional; a bad slot invalidates the color
    let mut slots = args.split(',');
    let mut channel = || slots.next().and_then(parse_css_channel);
    let (r, g, b) = (channel()?, channel()?, channel()?);
    Some(Rgb::new(r, g, b))
}

fn parse_css_channel(raw: &str) -> Option<f32> {
    let raw = raw.trim();
    match raw.strip_suffix('%') {
        Some(percent) => {
            let value: f64 = percent.trim().parse().ok()?;
            if !value.is_finite() {
                return Some(0.0);
            }
            Some((value / 100.0).clamp(0.0, 1.0) as f32)
        }
        None => raw.parse::<f64>().ok().map(normalize_channel),
    }
}
