use std::sync::Arc;

use geochart_canvas::PointStyle;
use geochart_common::{Color, Sides};
use geochart_elements::GeoFeatureOptions;
use geochart_projection::{graticule10, GeoObject, Graticule};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::scriptable::Scriptable;

/// Declarative description of a chart
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfig {
    #[serde(rename = "type")]
    pub chart_type: String,
    #[serde(default)]
    pub data: ChartData,
    #[serde(default)]
    pub options: ChartOptions,
}

impl ChartConfig {
    pub fn from_json(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<DatasetConfig>,
}

/// Whether and how to draw meridians and parallels
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ShowGraticule {
    Enabled(bool),
    #[serde(rename_all = "camelCase")]
    Steps {
        step_major: Option<[f64; 2]>,
        step_minor: Option<[f64; 2]>,
    },
}

impl Default for ShowGraticule {
    fn default() -> Self {
        ShowGraticule::Enabled(false)
    }
}

impl ShowGraticule {
    /// Graticule geometry to draw, None when disabled
    pub fn geometry(&self) -> Option<GeoObject> {
        match *self {
            ShowGraticule::Enabled(false) => None,
            ShowGraticule::Enabled(true) => Some(graticule10().into()),
            ShowGraticule::Steps {
                step_major,
                step_minor,
            } => {
                let mut graticule = Graticule::default();
                if let Some(step) = step_major {
                    graticule = graticule.with_step_major(step);
                }
                if let Some(step) = step_minor {
                    graticule = graticule.with_step_minor(step);
                }
                Some(graticule.to_geometry().into())
            }
        }
    }
}

/// Which layers of a map are clipped to the chart area
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ClipMap {
    /// Clip everything
    #[default]
    All,
    None,
    Outline,
    Graticule,
    OutlineGraticule,
    Items,
}

impl ClipMap {
    pub fn clips_outline(&self) -> bool {
        matches!(
            self,
            ClipMap::All | ClipMap::Outline | ClipMap::OutlineGraticule
        )
    }

    pub fn clips_graticule(&self) -> bool {
        matches!(
            self,
            ClipMap::All | ClipMap::Graticule | ClipMap::OutlineGraticule
        )
    }

    pub fn clips_items(&self) -> bool {
        matches!(self, ClipMap::All | ClipMap::Items)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ClipMapRepr {
    Flag(bool),
    Name(String),
}

impl<'de> Deserialize<'de> for ClipMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match ClipMapRepr::deserialize(deserializer)? {
            ClipMapRepr::Flag(true) => ClipMap::All,
            ClipMapRepr::Flag(false) => ClipMap::None,
            ClipMapRepr::Name(name) => match name.as_str() {
                "outline" => ClipMap::Outline,
                "graticule" => ClipMap::Graticule,
                "outline+graticule" => ClipMap::OutlineGraticule,
                "items" => ClipMap::Items,
                other => {
                    return Err(serde::de::Error::unknown_variant(
                        other,
                        &["outline", "graticule", "outline+graticule", "items"],
                    ))
                }
            },
        })
    }
}

/// Per data point styling of a dataset. Unset options fall back to the
/// chart level element options and then to the chart type defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElementStyleConfig {
    pub background_color: Option<Scriptable<Color>>,
    pub border_color: Option<Scriptable<Color>>,
    pub border_width: Option<Scriptable<f64>>,
    pub radius: Option<Scriptable<f64>>,
    pub hit_radius: Option<Scriptable<f64>>,
    pub point_style: Option<Scriptable<PointStyle>>,
    pub outline_background_color: Option<Color>,
    pub outline_border_color: Option<Color>,
    pub outline_border_width: Option<f64>,
    pub graticule_border_color: Option<Color>,
    pub graticule_border_width: Option<f64>,
}

impl ElementStyleConfig {
    /// Outline and graticule options with this dataset's overrides applied
    pub fn apply_map_overrides(&self, base: &GeoFeatureOptions) -> GeoFeatureOptions {
        let mut options = base.clone();
        if self.outline_background_color.is_some() {
            options.outline_background_color = self.outline_background_color;
        }
        if self.outline_border_color.is_some() {
            options.outline_border_color = self.outline_border_color;
        }
        if let Some(width) = self.outline_border_width {
            options.outline_border_width = width;
        }
        if let Some(color) = self.graticule_border_color {
            options.graticule_border_color = color;
        }
        if let Some(width) = self.graticule_border_width {
            options.graticule_border_width = width;
        }
        options
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DatasetConfig {
    pub label: Option<String>,
    /// Chart type of this dataset, defaults to the chart type
    #[serde(rename = "type")]
    pub chart_type: Option<String>,
    pub data: Vec<Value>,
    /// Geography the projection is fitted to, the whole globe when absent
    pub outline: Option<GeoObject>,
    pub show_outline: Option<bool>,
    pub show_graticule: Option<ShowGraticule>,
    pub clip_map: Option<ClipMap>,
    #[serde(flatten)]
    pub style: ElementStyleConfig,
}

/// Chart level defaults of point elements
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PointConfig {
    pub point_style: PointStyle,
    pub background_color: Color,
    pub border_color: Color,
    pub border_width: f64,
    pub hit_radius: f64,
}

impl Default for PointConfig {
    fn default() -> Self {
        Self {
            point_style: PointStyle::Circle,
            background_color: Color::new(0.0, 0.0, 0.0, 0.1),
            border_color: Color::new(0.0, 0.0, 0.0, 0.1),
            border_width: 1.0,
            hit_radius: 1.0,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElementsConfig {
    pub geo_feature: GeoFeatureOptions,
    pub point: PointConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChartOptions {
    pub show_outline: Option<bool>,
    pub show_graticule: Option<ShowGraticule>,
    pub clip_map: Option<ClipMap>,
    /// Space between the canvas border and the chart area
    pub padding: Sides,
    /// Scale options by scale id. A `type` entry picks the registered scale
    /// type, otherwise the id itself or the chart type's default is used.
    pub scales: IndexMap<String, Value>,
    pub elements: ElementsConfig,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            show_outline: None,
            show_graticule: None,
            clip_map: None,
            padding: Sides::Uniform(0.0),
            scales: IndexMap::new(),
            elements: ElementsConfig::default(),
        }
    }
}

/// Chart type defaults of the map options
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoDefaults {
    pub show_outline: bool,
    pub clip_map: ClipMap,
}

/// Map options of one dataset after applying dataset, chart and chart type
/// levels in that order
#[derive(Debug, Clone)]
pub struct GeoSettings {
    pub outline: Arc<GeoObject>,
    pub show_outline: bool,
    pub show_graticule: ShowGraticule,
    pub clip_map: ClipMap,
    pub feature_options: GeoFeatureOptions,
}

impl GeoSettings {
    pub fn resolve(dataset: &DatasetConfig, options: &ChartOptions, defaults: GeoDefaults) -> Self {
        Self {
            outline: Arc::new(dataset.outline.clone().unwrap_or_default()),
            show_outline: dataset
                .show_outline
                .or(options.show_outline)
                .unwrap_or(defaults.show_outline),
            show_graticule: dataset
                .show_graticule
                .or(options.show_graticule)
                .unwrap_or_default(),
            clip_map: dataset
                .clip_map
                .or(options.clip_map)
                .unwrap_or(defaults.clip_map),
            feature_options: dataset
                .style
                .apply_map_overrides(&options.elements.geo_feature),
        }
    }
}
