use std::any::Any;

use geochart_canvas::{Canvas, PointOptions};
use geochart_common::ChartArea;
use geochart_elements::{PointElement, UpdateMode};
use serde_json::Value;

use crate::config::{ClipMap, DatasetConfig, ElementStyleConfig, GeoDefaults, GeoSettings, PointConfig};
use crate::controller::{value_scale, DatasetController, GeoController, UpdateContext};
use crate::error::GeoChartError;
use crate::registry::ControllerInit;
use crate::scales::{projection_scale, ChartScale, Scales};
use crate::scriptable::{resolve_option, EvalContext};

/// Parsed bubble: location and value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BubbleDatum {
    pub longitude: f64,
    pub latitude: f64,
    pub value: Option<f64>,
}

fn coordinate(raw: &Value, name: &str, fallback: &str) -> f64 {
    raw.get(name)
        .filter(|v| !v.is_null())
        .or_else(|| raw.get(fallback))
        .and_then(Value::as_f64)
        .unwrap_or(f64::NAN)
}

/// Places a sized marker per datum at its projected location
#[derive(Debug, Clone)]
pub struct BubbleMapController {
    geo: GeoController,
    data: Vec<Value>,
    style: ElementStyleConfig,
    point_defaults: PointConfig,
    parsed: Vec<BubbleDatum>,
    elements: Vec<PointElement>,
}

impl BubbleMapController {
    pub const ID: &'static str = "bubbleMap";
    pub const VALUE_SCALE_ID: &'static str = "size";

    pub const DEFAULTS: GeoDefaults = GeoDefaults {
        show_outline: true,
        clip_map: ClipMap::OutlineGraticule,
    };

    pub fn new(dataset_index: usize, dataset: DatasetConfig, settings: GeoSettings, point_defaults: PointConfig) -> Self {
        let elements = vec![PointElement::default(); dataset.data.len()];
        Self {
            geo: GeoController::new(dataset_index, settings),
            data: dataset.data,
            style: dataset.style,
            point_defaults,
            parsed: Vec::new(),
            elements,
        }
    }

    pub fn create(init: ControllerInit<'_>) -> Result<Box<dyn DatasetController>, GeoChartError> {
        let settings = GeoSettings::resolve(&init.dataset, init.options, Self::DEFAULTS);
        Ok(Box::new(Self::new(
            init.dataset_index,
            init.dataset,
            settings,
            init.options.elements.point.clone(),
        )))
    }

    pub fn elements(&self) -> &[PointElement] {
        &self.elements
    }

    pub fn parsed(&self) -> &[BubbleDatum] {
        &self.parsed
    }

    fn size_scale<'a>(&self, scales: &'a Scales) -> Result<&'a ChartScale, GeoChartError> {
        value_scale(scales, Self::VALUE_SCALE_ID, "size", ChartScale::is_size)
    }

    /// Point options of a datum. Without an explicit radius the
    /// size scale decides, and hovering grows the marker by one pixel.
    fn resolve_options(&self, ctx: &EvalContext, scale: &ChartScale) -> PointOptions {
        let defaults = &self.point_defaults;
        let radius = resolve_option(&self.style.radius, ctx)
            .or_else(|| scale.size_for_value(ctx.value))
            .unwrap_or(PointOptions::default().radius);
        PointOptions {
            radius,
            hover_radius: radius + 1.0,
            hit_radius: resolve_option(&self.style.hit_radius, ctx).unwrap_or(defaults.hit_radius),
            point_style: resolve_option(&self.style.point_style, ctx).unwrap_or(defaults.point_style),
            background_color: resolve_option(&self.style.background_color, ctx)
                .unwrap_or(defaults.background_color),
            border_color: resolve_option(&self.style.border_color, ctx)
                .unwrap_or(defaults.border_color),
            border_width: resolve_option(&self.style.border_width, ctx)
                .unwrap_or(defaults.border_width),
        }
    }
}

impl DatasetController for BubbleMapController {
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
        "size"
    }

    fn geo(&self) -> &GeoController {
        &self.geo
    }

    fn geo_mut(&mut self) -> &mut GeoController {
        &mut self.geo
    }

    fn parse(&mut self, scales: &Scales) -> Result<Vec<f64>, GeoChartError> {
        let scale = self.size_scale(scales)?;
        self.parsed = self
            .data
            .iter()
            .map(|raw| BubbleDatum {
                longitude: coordinate(raw, "longitude", "x"),
                latitude: coordinate(raw, "latitude", "y"),
                value: scale.parse_value(raw),
            })
            .collect();
        Ok(self.parsed.iter().filter_map(|d| d.value).collect())
    }

    fn update(&mut self, scales: &mut Scales, ctx: &UpdateContext) -> Result<(), GeoChartError> {
        let dataset_index = self.geo.dataset_index();
        let options: Vec<PointOptions> = {
            let scale = self.size_scale(scales)?;
            self.parsed
                .iter()
                .enumerate()
                .map(|(index, datum)| {
                    let eval = EvalContext::data(dataset_index, index, ctx.mode, datum.value);
                    self.resolve_options(&eval, scale)
                })
                .collect()
        };

        // legend markers are styled like the first bubble
        if let Some(scale) = scales.get_mut(Self::VALUE_SCALE_ID) {
            scale.set_model(options.first().cloned());
        }

        let projection = projection_scale(scales)?;
        self.geo.update(projection, ctx);

        for ((element, datum), mut options) in self.elements.iter_mut().zip(&self.parsed).zip(options) {
            let location = [datum.longitude, datum.latitude];
            let projected = if location.iter().any(|v| v.is_nan()) {
                None
            } else {
                projection
                    .project(location)
                    .filter(|p| p.iter().all(|v| v.is_finite()))
            };
            let [x, y] = projected.unwrap_or([0.0, 0.0]);
            if ctx.mode == UpdateMode::Reset {
                options.radius = 0.0;
            }
            *element = PointElement {
                x,
                y,
                skip: projected.is_none(),
                options,
            };
        }
        Ok(())
    }

    fn draw(&mut self, canvas: &mut dyn Canvas, scales: &Scales, area: &ChartArea) -> Result<(), GeoChartError> {
        let projection = projection_scale(scales)?;
        let elements = &self.elements;
        self.geo.draw(canvas, projection, area, &mut |canvas| {
            for element in elements {
                element.draw(canvas);
            }
        });
        Ok(())
    }

    fn elements_at(&mut self, x: f64, y: f64, _scales: &Scales) -> Result<Vec<usize>, GeoChartError> {
        Ok(self
            .elements
            .iter()
            .enumerate()
            .filter_map(|(index, element)| element.in_range(x, y).then_some(index))
            .collect())
    }
}
