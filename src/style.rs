//! Resolved wallpaper style.

use serde::{Deserialize, Serialize};

use crate::color::Argb;

// ============================================================================
// DotShape
// ============================================================================

/// Shape used for every dot in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum DotShape {
    /// Filled disc.
    #[default]
    Circle,
    /// Rounded square, corner radius 35% of the side.
    Rounded,
    /// Square with slightly softened corners (5% of the side).
    Square,
    /// Horizontal stadium.
    Pill,
}

impl DotShape {
    pub const ALL: [Self; 4] = [Self::Circle, Self::Rounded, Self::Square, Self::Pill];

    /// Parses a persisted shape name. Unknown names resolve to [`DotShape::Circle`].
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "rounded" => Self::Rounded,
            "square" => Self::Square,
            "pill" => Self::Pill,
            _ => Self::Circle,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Circle => "circle",
            Self::Rounded => "rounded",
            Self::Square => "square",
            Self::Pill => "pill",
        }
    }
}

impl<'de> Deserialize<'de> for DotShape {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self::from_name(&String::deserialize(deserializer)?))
    }
}

// ============================================================================
// DotDensity
// ============================================================================

/// User-selectable dot size, persisted as an index `0..=3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DotDensity {
    Tiny,
    #[default]
    Small,
    Medium,
    Large,
}

impl DotDensity {
    pub const ALL: [Self; 4] = [Self::Tiny, Self::Small, Self::Medium, Self::Large];

    /// Maps a persisted index to a density. Out-of-range values resolve to
    /// [`DotDensity::Small`].
    pub fn from_index(index: i64) -> Self {
        match index {
            0 => Self::Tiny,
            2 => Self::Medium,
            3 => Self::Large,
            _ => Self::Small,
        }
    }

    pub fn index(self) -> u8 {
        match self {
            Self::Tiny => 0,
            Self::Small => 1,
            Self::Medium => 2,
            Self::Large => 3,
        }
    }

    /// Scalar applied to the base dot radius.
    pub fn multiplier(self) -> f32 {
        match self {
            Self::Tiny => 0.70,
            Self::Small => 1.00,
            Self::Medium => 1.30,
            Self::Large => 1.60,
        }
    }
}

impl Serialize for DotDensity {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.index())
    }
}

impl<'de> Deserialize<'de> for DotDensity {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self::from_index(i64::deserialize(deserializer)?))
    }
}

#[cfg(feature = "jsonschema")]
impl schemars::JsonSchema for DotDensity {
    fn schema_name() -> String {
        "DotDensity".to_string()
    }

    fn json_schema(generator: &mut schemars::r#gen::SchemaGenerator) -> schemars::schema::Schema {
        u8::json_schema(generator)
    }
}

// ============================================================================
// StyleConfig
// ============================================================================

/// Fully-resolved style consumed by the generator.
///
/// Every field has a concrete value. Build one from persisted settings with
/// [`StyleProfile::resolve`](crate::StyleProfile::resolve).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StyleConfig {
    pub past_color: Argb,
    pub today_color: Argb,
    pub future_color: Argb,
    pub background_color: Argb,
    pub dot_shape: DotShape,
    pub dot_density: DotDensity,
}

impl StyleConfig {
    /// Steel blue.
    pub const DEFAULT_PAST_COLOR: Argb = Argb(0xFF46_82B4);
    /// Orange.
    pub const DEFAULT_TODAY_COLOR: Argb = Argb(0xFFF9_7316);
    /// Dark grey.
    pub const DEFAULT_FUTURE_COLOR: Argb = Argb(0xFF26_2626);
    /// Near-black.
    pub const DEFAULT_BACKGROUND_COLOR: Argb = Argb(0xFF05_0505);

    pub fn with_shape(mut self, shape: DotShape) -> Self {
        self.dot_shape = shape;
        self
    }

    pub fn with_density(mut self, density: DotDensity) -> Self {
        self.dot_density = density;
        self
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            past_color: Self::DEFAULT_PAST_COLOR,
            today_color: Self::DEFAULT_TODAY_COLOR,
            future_color: Self::DEFAULT_FUTURE_COLOR,
            background_color: Self::DEFAULT_BACKGROUND_COLOR,
            dot_shape: DotShape::default(),
            dot_density: DotDensity::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let style = StyleConfig::default();
        assert_eq!(style.dot_shape, DotShape::Circle);
        assert_eq!(style.dot_density.index(), 1);
        assert_eq!(style.background_color, Argb(0xFF05_0505));
    }

    #[test]
    fn density_multipliers() {
        let m: Vec<f32> = DotDensity::ALL.iter().map(|d| d.multiplier()).collect();
        assert_eq!(m, vec![0.70, 1.00, 1.30, 1.60]);
        assert_eq!(DotDensity::from_index(7), DotDensity::Small);
        assert_eq!(DotDensity::from_index(-1), DotDensity::Small);
        assert_eq!(DotDensity::from_index(3), DotDensity::Large);
    }

    #[test]
    fn shape_names() {
        assert_eq!(DotShape::from_name("dot"), DotShape::Circle);
        assert_eq!(DotShape::from_name("Pill"), DotShape::Pill);
        assert_eq!(DotShape::from_name("hexagon"), DotShape::Circle);
        for shape in DotShape::ALL {
            assert_eq!(DotShape::from_name(shape.name()), shape);
        }
    }

    #[test]
    fn shape_serde_falls_back_to_circle() {
        let shape: DotShape = serde_json::from_str("\"dot\"").unwrap();
        assert_eq!(shape, DotShape::Circle);
        let shape: DotShape = serde_json::from_str("\"star\"").unwrap();
        assert_eq!(shape, DotShape::Circle);
        assert_eq!(serde_json::to_string(&DotShape::Rounded).unwrap(), "\"rounded\"");
    }
}
