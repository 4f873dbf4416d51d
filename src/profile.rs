//! Serializable style settings for persistence.
//!
//! A [`StyleProfile`] is what the configuration store reads and writes. Every
//! field is optional: unset fields resolve to the defaults in
//! [`StyleConfig`] independently of each other, and a profile with only a few
//! fields set doubles as a partial update.
//!
//! # Example
//!
//! ```
//! use onedot_renderer::{Argb, DotShape, StyleProfile};
//!
//! let saved = StyleProfile::new().with_today_color(Argb(0xFFFF0000));
//! let patch = StyleProfile::new().with_dot_shape(DotShape::Pill);
//!
//! let mut merged = saved.clone();
//! merged.merge(&patch);
//!
//! let style = merged.resolve();
//! assert_eq!(style.today_color, Argb(0xFFFF0000));
//! assert_eq!(style.dot_shape, DotShape::Pill);
//!
//! let json = merged.to_json().unwrap();
//! let restored = StyleProfile::from_json(&json).unwrap();
//! assert_eq!(restored, merged);
//! ```

use serde::{Deserialize, Serialize};

use crate::color::Argb;
use crate::style::{DotDensity, DotShape, StyleConfig};

// ============================================================================
// StyleProfile
// ============================================================================

/// Persisted settings, each field independently optional.
///
/// # JSON Format
///
/// ```json
/// {
///   "pastColor": "#FF4682B4",
///   "todayColor": "#FFF97316",
///   "dotShape": "pill",
///   "dotDensity": 2,
///   "lastUpdate": 1769904060000
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct StyleProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub past_color: Option<Argb>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub today_color: Option<Argb>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub future_color: Option<Argb>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Argb>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dot_shape: Option<DotShape>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dot_density: Option<DotDensity>,

    /// Milliseconds since the Unix epoch of the last successful wallpaper update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update: Option<i64>,
}

impl StyleProfile {
    /// Creates an empty profile; it resolves to the default style.
    pub fn new() -> Self {
        Self::default()
    }

    /// Captures every field of a resolved style.
    pub fn from_style(style: &StyleConfig) -> Self {
        Self {
            past_color: Some(style.past_color),
            today_color: Some(style.today_color),
            future_color: Some(style.future_color),
            background_color: Some(style.background_color),
            dot_shape: Some(style.dot_shape),
            dot_density: Some(style.dot_density),
            last_update: None,
        }
    }

    pub fn with_past_color(mut self, color: Argb) -> Self {
        self.past_color = Some(color);
        self
    }

    pub fn with_today_color(mut self, color: Argb) -> Self {
        self.today_color = Some(color);
        self
    }

    pub fn with_future_color(mut self, color: Argb) -> Self {
        self.future_color = Some(color);
        self
    }

    pub fn with_background_color(mut self, color: Argb) -> Self {
        self.background_color = Some(color);
        self
    }

    pub fn with_dot_shape(mut self, shape: DotShape) -> Self {
        self.dot_shape = Some(shape);
        self
    }

    pub fn with_dot_density(mut self, density: DotDensity) -> Self {
        self.dot_density = Some(density);
        self
    }

    /// Returns true if no style field is set (`last_update` is ignored).
    pub fn is_empty(&self) -> bool {
        self.past_color.is_none()
            && self.today_color.is_none()
            && self.future_color.is_none()
            && self.background_color.is_none()
            && self.dot_shape.is_none()
            && self.dot_density.is_none()
    }

    /// Overwrites the fields that are set in `patch`, leaving the rest alone.
    pub fn merge(&mut self, patch: &StyleProfile) {
        if patch.past_color.is_some() {
            self.past_color = patch.past_color;
        }
        if patch.today_color.is_some() {
            self.today_color = patch.today_color;
        }
        if patch.future_color.is_some() {
            self.future_color = patch.future_color;
        }
        if patch.background_color.is_some() {
            self.background_color = patch.background_color;
        }
        if patch.dot_shape.is_some() {
            self.dot_shape = patch.dot_shape;
        }
        if patch.dot_density.is_some() {
            self.dot_density = patch.dot_density;
        }
        if patch.last_update.is_some() {
            self.last_update = patch.last_update;
        }
    }

    /// Resolves every field, falling back to the defaults for unset ones.
    pub fn resolve(&self) -> StyleConfig {
        let defaults = StyleConfig::default();
        StyleConfig {
            past_color: self.past_color.unwrap_or(defaults.past_color),
            today_color: self.today_color.unwrap_or(defaults.today_color),
            future_color: self.future_color.unwrap_or(defaults.future_color),
            background_color: self.background_color.unwrap_or(defaults.background_color),
            dot_shape: self.dot_shape.unwrap_or(defaults.dot_shape),
            dot_density: self.dot_density.unwrap_or(defaults.dot_density),
        }
    }

    /// Serializes the profile to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the profile to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes a profile from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

// ============================================================================
// Tests
// ============================================================================
