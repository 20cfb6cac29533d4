//! Static map configuration: bounds, zoom limits, tiles and styling.

use serde::{Deserialize, Deserializer, Serialize};

use crate::bounds::{BoundingRect, BoundsPolicy, DEFAULT_BOUNDS, DEFAULT_FALLBACK};
use crate::coordinate::{Coordinate, Role};
use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileLayerConfig {
    /// Templated tile URL (`{s}`, `{z}`, `{x}`, `{y}`).
    pub url_template: String,
    pub attribution: String,
    pub max_zoom: u8,
}

impl Default for TileLayerConfig {
    fn default() -> Self {
        Self {
            url_template: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            attribution: "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OSM</a> contributors"
                .to_string(),
            max_zoom: 19,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolylineStyle {
    pub color: String,
    pub weight: f64,
    pub opacity: f64,
}

impl Default for PolylineStyle {
    fn default() -> Self {
        Self {
            color: "rgb(133, 232, 157)".to_string(),
            weight: 5.0,
            opacity: 0.7,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerStyle {
    pub label: String,
    /// 0.0 (invisible) to 1.0 (fully opaque).
    pub opacity: f64,
}

impl MarkerStyle {
    pub fn new(label: impl Into<String>, opacity: f64) -> Self {
        Self {
            label: label.into(),
            opacity,
        }
    }

    /// Fully opaque marker labelled after its role.
    pub fn for_role(role: Role) -> Self {
        Self::new(role.label(), 1.0)
    }
}

/// Marker fields present in a config document.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MarkerOverrides {
    label: Option<String>,
    opacity: Option<f64>,
}

impl MarkerOverrides {
    fn over(self, role: Role) -> MarkerStyle {
        let base = MarkerStyle::for_role(role);
        MarkerStyle {
            label: self.label.unwrap_or(base.label),
            opacity: self.opacity.unwrap_or(base.opacity),
        }
    }
}

fn start_marker<'de, D: Deserializer<'de>>(deserializer: D) -> Result<MarkerStyle, D::Error> {
    MarkerOverrides::deserialize(deserializer).map(|overrides| overrides.over(Role::Start))
}

fn end_marker<'de, D: Deserializer<'de>>(deserializer: D) -> Result<MarkerStyle, D::Error> {
    MarkerOverrides::deserialize(deserializer).map(|overrides| overrides.over(Role::End))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub bounds: BoundingRect,
    /// Where out-of-bounds coordinates are redirected.
    pub fallback: Coordinate,
    pub initial_zoom: u8,
    pub min_zoom: u8,
    /// 1.0 makes the max bounds fully rigid.
    pub max_bounds_viscosity: f64,
    pub tile_layer: TileLayerConfig,
    pub route_style: PolylineStyle,
    /// Missing marker fields fall back to the role's own defaults.
    #[serde(deserialize_with = "start_marker")]
    pub start_marker: MarkerStyle,
    #[serde(deserialize_with = "end_marker")]
    pub end_marker: MarkerStyle,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            bounds: DEFAULT_BOUNDS,
            fallback: DEFAULT_FALLBACK,
            initial_zoom: 17,
            min_zoom: 15,
            max_bounds_viscosity: 1.0,
            tile_layer: TileLayerConfig::default(),
            route_style: PolylineStyle::default(),
            start_marker: MarkerStyle::for_role(Role::Start),
            end_marker: MarkerStyle::for_role(Role::End),
        }
    }
}

impl MapConfig {
    /// Parses a (possibly partial) JSON document; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn bounds_policy(&self) -> BoundsPolicy {
        BoundsPolicy::new(self.bounds, self.fallback)
    }
}
