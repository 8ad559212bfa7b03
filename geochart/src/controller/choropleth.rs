use std::any::Any;
use std::sync::Arc;

use geochart_canvas::Canvas;
use geochart_common::ChartArea;
use geochart_elements::{FeatureStyle, GeoFeature};
use geochart_projection::GeoObject;
use serde_json::Value;

use crate::config::{ClipMap, DatasetConfig, ElementStyleConfig, GeoDefaults, GeoSettings};
use crate::controller::{value_scale, DatasetController, GeoController, UpdateContext};
use crate::error::GeoChartError;
use crate::registry::ControllerInit;
use crate::scales::{projection_scale, ChartScale, Scales};
use crate::scriptable::{resolve_option, EvalContext};

/// One region of a choropleth: its shape and optional label position
#[derive(Debug, Clone)]
struct Region {
    feature: Option<Arc<GeoObject>>,
    /// `[longitude, latitude]` the element is centered on instead of the
    /// centroid
    center: Option<[f64; 2]>,
}

fn parse_center(raw: &Value) -> Option<[f64; 2]> {
    let center = raw.get("center")?;
    let lon = center.get("longitude")?.as_f64()?;
    let lat = center.get("latitude")?.as_f64()?;
    Some([lon, lat])
}

/// Colors a geographic feature per datum by its value
#[derive(Debug, Clone)]
pub struct ChoroplethController {
    geo: GeoController,
    data: Vec<Value>,
    regions: Vec<Region>,
    style: ElementStyleConfig,
    parsed: Vec<Option<f64>>,
    elements: Vec<GeoFeature>,
}

impl ChoroplethController {
    pub const ID: &'static str = "choropleth";
    pub const VALUE_SCALE_ID: &'static str = "color";

    pub const DEFAULTS: GeoDefaults = GeoDefaults {
        show_outline: false,
        clip_map: ClipMap::All,
    };

    pub fn new(
        dataset_index: usize,
        dataset: DatasetConfig,
        settings: GeoSettings,
    ) -> Result<Self, GeoChartError> {
        let regions = dataset
            .data
            .iter()
            .enumerate()
            .map(|(index, raw)| {
                let feature = match raw.get("feature") {
                    Some(feature) => Some(Arc::new(
                        GeoObject::from_json_value(feature.clone()).map_err(|source| {
                            GeoChartError::InvalidFeature {
                                dataset_index,
                                index,
                                source,
                            }
                        })?,
                    )),
                    None => None,
                };
                Ok(Region {
                    feature,
                    center: parse_center(raw),
                })
            })
            .collect::<Result<Vec<_>, GeoChartError>>()?;

        let elements = vec![GeoFeature::new(); regions.len()];
        Ok(Self {
            geo: GeoController::new(dataset_index, settings),
            data: dataset.data,
            regions,
            style: dataset.style,
            parsed: Vec::new(),
            elements,
        })
    }

    pub fn create(init: ControllerInit<'_>) -> Result<Box<dyn DatasetController>, GeoChartError> {
        let settings = GeoSettings::resolve(&init.dataset, init.options, Self::DEFAULTS);
        Ok(Box::new(Self::new(init.dataset_index, init.dataset, settings)?))
    }

    pub fn elements(&self) -> &[GeoFeature] {
        &self.elements
    }

    pub fn parsed(&self) -> &[Option<f64>] {
        &self.parsed
    }

    fn color_scale<'a>(&self, scales: &'a Scales) -> Result<&'a ChartScale, GeoChartError> {
        value_scale(scales, Self::VALUE_SCALE_ID, "color", ChartScale::is_color)
    }

    /// Style of the element at `index`: dataset options, then the chart
    /// element options, with the fill defaulting to the value's color
    fn resolve_style(&self, index: usize, ctx: &EvalContext, scale: &ChartScale) -> FeatureStyle {
        let defaults = &self.geo.settings().feature_options;
        let background_color = resolve_option(&self.style.background_color, ctx)
            .or(defaults.background_color)
            .or_else(|| scale.color_for_value(self.parsed.get(index).copied().flatten()));
        FeatureStyle {
            background_color,
            border_color: resolve_option(&self.style.border_color, ctx).or(defaults.border_color),
            border_width: resolve_option(&self.style.border_width, ctx)
                .unwrap_or(defaults.border_width),
        }
    }
}

impl DatasetController for ChoroplethController {
    fn chart_type(&self) -> &'static str {
        Self::ID
    }

    fn dataset_index(&self) -> usize {
        self.geo.dataset_index()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn value_scale_id(&self) -> &'static str {
        Self::VALUE_SCALE_ID
    }

    fn default_value_scale_type(&self) -> &'static str {
        "color"
    }

    fn geo(&self) -> &GeoController {
        &self.geo
    }

    fn geo_mut(&mut self) -> &mut GeoController {
        &mut self.geo
    }

    fn parse(&mut self, scales: &Scales) -> Result<Vec<f64>, GeoChartError> {
        let scale = self.color_scale(scales)?;
        self.parsed = self.data.iter().map(|raw| scale.parse_value(raw)).collect();
        Ok(self.parsed.iter().flatten().copied().collect())
    }

    fn update(&mut self, scales: &mut Scales, ctx: &UpdateContext) -> Result<(), GeoChartError> {
        let projection = projection_scale(scales)?;
        self.geo.update(projection, ctx);

        let scale = self.color_scale(scales)?;
        let dataset_index = self.geo.dataset_index();
        if ctx.dirty {
            tracing::debug!(
                "Clearing {} cached features of dataset {dataset_index}",
                self.elements.len()
            );
            self.elements.iter_mut().for_each(GeoFeature::clear_cache);
        }
        for index in 0..self.elements.len() {
            let eval = EvalContext::data(
                dataset_index,
                index,
                ctx.mode,
                self.parsed.get(index).copied().flatten(),
            );
            let style = self.resolve_style(index, &eval, scale);
            let region = &self.regions[index];
            let element = &mut self.elements[index];
            element.style = style;
            if let Some(feature) = &region.feature {
                element.set_geometry(
                    projection,
                    feature.clone(),
                    region.center,
                    ctx.pixel_ratio,
                    ctx.mode,
                );
            }
        }

        Ok(())
    }

    fn draw(&mut self, canvas: &mut dyn Canvas, scales: &Scales, area: &ChartArea) -> Result<(), GeoChartError> {
        let projection = projection_scale(scales)?;
        let elements = &mut self.elements;
        self.geo.draw(canvas, projection, area, &mut |canvas| {
            for element in elements.iter_mut() {
                element.draw(canvas, projection);
            }
        });
        Ok(())
    }

    fn elements_at(&mut self, x: f64, y: f64, scales: &Scales) -> Result<Vec<usize>, GeoChartError> {
        let projection = projection_scale(scales)?;
        Ok(self
            .elements
            .iter_mut()
            .enumerate()
            .filter_map(|(index, element)| element.in_range(x, y, projection).then_some(index))
            .collect())
    }
}
