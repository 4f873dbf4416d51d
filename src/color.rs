//! Packed ARGB color values.
//!
//! Colors are stored as plain 32-bit integers so they round-trip through
//! persisted settings unchanged. Channel access goes through [`palette`].

use std::fmt;
use std::str::FromStr;

use palette::Srgba;
use palette::rgb::channels::Argb as ArgbOrder;
use resvg::tiny_skia;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A packed `0xAARRGGBB` color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Argb(pub u32);

impl Argb {
    pub const BLACK: Self = Self(0xFF00_0000);
    pub const WHITE: Self = Self(0xFFFF_FFFF);

    /// Creates a color from its packed representation.
    pub const fn new(packed: u32) -> Self {
        Self(packed)
    }

    /// Creates a color from individual channels.
    pub fn from_channels(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self(Srgba::new(r, g, b, a).into_u32::<ArgbOrder>())
    }

    /// Returns the packed representation.
    pub const fn packed(self) -> u32 {
        self.0
    }

    /// Unpacks into an sRGB color with alpha.
    pub fn to_srgba(self) -> Srgba<u8> {
        Srgba::from_u32::<ArgbOrder>(self.0)
    }

    pub fn alpha(self) -> u8 {
        self.to_srgba().alpha
    }

    pub fn red(self) -> u8 {
        self.to_srgba().red
    }

    pub fn green(self) -> u8 {
        self.to_srgba().green
    }

    pub fn blue(self) -> u8 {
        self.to_srgba().blue
    }

    /// Returns the same color with its alpha scaled by `factor` (0.0-1.0).
    pub fn with_alpha_scaled(self, factor: f32) -> Self {
        let mut c = self.to_srgba();
        c.alpha = (c.alpha as f32 * factor.clamp(0.0, 1.0)).round() as u8;
        Self(c.into_u32::<ArgbOrder>())
    }

    /// Returns `[r, g, b, a]` in straight (non-premultiplied) form.
    pub fn to_rgba_bytes(self) -> [u8; 4] {
        let c = self.to_srgba();
        [c.red, c.green, c.blue, c.alpha]
    }

    /// Converts to a tiny-skia paint color.
    pub fn to_skia(self) -> tiny_skia::Color {
        let c = self.to_srgba();
        tiny_skia::Color::from_rgba8(c.red, c.green, c.blue, c.alpha)
    }

    /// Formats as a CSS/SVG `#rrggbb` string (alpha dropped).
    pub fn to_css_rgb(self) -> String {
        let c = self.to_srgba();
        format!("#{:02x}{:02x}{:02x}", c.red, c.green, c.blue)
    }
}

impl From<u32> for Argb {
    fn from(packed: u32) -> Self {
        Self(packed)
    }
}

impl From<Argb> for u32 {
    fn from(color: Argb) -> Self {
        color.0
    }
}

impl fmt::Display for Argb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08X}", self.0)
    }
}

/// Error returned when a color string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color {0:?}: expected #AARRGGBB or #RRGGBB")]
pub struct ParseColorError(pub String);

impl FromStr for Argb {
    type Err = ParseColorError;

    /// Parses `#AARRGGBB`, `#RRGGBB`, or either form with a `0x` prefix.
    ///
    /// Six-digit colors are treated as fully opaque.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let hex = trimmed
            .strip_prefix('#')
            .or_else(|| trimmed.strip_prefix("0x"))
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        let value =
            u32::from_str_radix(hex, 16).map_err(|_| ParseColorError(s.to_string()))?;

        match hex.len() {
            8 => Ok(Self(value)),
            6 => Ok(Self(0xFF00_0000 | value)),
            _ => Err(ParseColorError(s.to_string())),
        }
    }
}

impl Serialize for Argb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Argb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(feature = "jsonschema")]
impl schemars::JsonSchema for Argb {
    fn schema_name() -> String {
        "Argb".to_string()
    }

    fn json_schema(generator: &mut schemars::r#gen::SchemaGenerator) -> schemars::schema::Schema {
        String::json_schema(generator)
    }
}
