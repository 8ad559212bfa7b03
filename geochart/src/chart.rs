use geochart_canvas::{Canvas, Pixmap, SkiaCanvas};
use geochart_common::{CanvasDimensions, ChartArea, Sides};
use geochart_elements::UpdateMode;
use geochart_projection::ProjectionScale;
use indexmap::IndexMap;
use serde_json::Value;

use crate::config::ChartConfig;
use crate::controller::{DatasetController, UpdateContext};
use crate::error::GeoChartError;
use crate::registry::{ControllerInit, Registry};
use crate::scales::{projection_scale_mut, Scales};

/// A data element found by a hit test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementHit {
    pub dataset_index: usize,
    pub index: usize,
}

/// A configured chart: its scales, one controller per dataset and the
/// dimensions of the canvas it is drawn on
#[derive(Debug)]
pub struct Chart {
    chart_type: String,
    dimensions: CanvasDimensions,
    padding: Sides,
    chart_area: ChartArea,
    scales: Scales,
    controllers: Vec<Box<dyn DatasetController>>,
}

/// Scale type of a configured scale: an explicit `type`, else the id when it
/// names a registered type, else `fallback`
fn scale_type<'a>(options: &'a Value, id: &'a str, registry: &Registry, fallback: &'a str) -> &'a str {
    if let Some(explicit) = options.get("type").and_then(Value::as_str) {
        return explicit;
    }
    if registry.scale_types().any(|t| t == id) {
        id
    } else {
        fallback
    }
}

impl Chart {
    /// Build scales and dataset controllers from `config` with the types in
    /// `registry`, then link every dataset to the projection
    pub fn new(
        config: ChartConfig,
        registry: &Registry,
        dimensions: CanvasDimensions,
    ) -> Result<Self, GeoChartError> {
        let ChartConfig {
            chart_type,
            data,
            options,
        } = config;

        let controllers = data
            .datasets
            .into_iter()
            .enumerate()
            .map(|(dataset_index, dataset)| {
                let type_id = dataset.chart_type.clone().unwrap_or_else(|| chart_type.clone());
                registry.create_controller(
                    &type_id,
                    ControllerInit {
                        dataset_index,
                        dataset,
                        options: &options,
                    },
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        // configured scales first, then the ones the datasets need
        let mut scale_specs: IndexMap<String, (String, Value)> = IndexMap::new();
        for (id, value) in &options.scales {
            let fallback = controllers
                .iter()
                .find(|c| c.value_scale_id() == id)
                .map_or(id.as_str(), |c| c.default_value_scale_type());
            let type_id = scale_type(value, id, registry, fallback).to_string();
            scale_specs.insert(id.clone(), (type_id, value.clone()));
        }
        scale_specs
            .entry(ProjectionScale::TYPE_ID.to_string())
            .or_insert_with(|| (ProjectionScale::TYPE_ID.to_string(), Value::Object(Default::default())));
        for controller in &controllers {
            scale_specs
                .entry(controller.value_scale_id().to_string())
                .or_insert_with(|| {
                    (
                        controller.default_value_scale_type().to_string(),
                        Value::Object(Default::default()),
                    )
                });
        }

        let mut scales = Scales::new();
        for (id, (type_id, value)) in scale_specs {
            let scale = registry.create_scale(&type_id, &id, value)?;
            scales.insert(id, scale);
        }

        let mut chart = Self {
            chart_type,
            dimensions,
            padding: options.padding,
            chart_area: ChartArea::default(),
            scales,
            controllers,
        };
        chart.chart_area = chart.compute_chart_area();
        for controller in chart.controllers.iter_mut() {
            controller.link_scales(&mut chart.scales)?;
        }
        tracing::debug!(
            "Created {} chart with {} datasets and scales {:?}",
            chart.chart_type,
            chart.controllers.len(),
            chart.scales.keys().collect::<Vec<_>>()
        );
        Ok(chart)
    }

    /// Parse a JSON chart config and build the chart
    pub fn from_json(
        config: Value,
        registry: &Registry,
        dimensions: CanvasDimensions,
    ) -> Result<Self, GeoChartError> {
        Self::new(ChartConfig::from_json(config)?, registry, dimensions)
    }

    pub fn chart_type(&self) -> &str {
        &self.chart_type
    }

    pub fn dimensions(&self) -> &CanvasDimensions {
        &self.dimensions
    }

    pub fn chart_area(&self) -> &ChartArea {
        &self.chart_area
    }

    pub fn scales(&self) -> &Scales {
        &self.scales
    }

    pub fn scale(&self, id: &str) -> Option<&crate::scales::ChartScale> {
        self.scales.get(id)
    }

    pub fn controllers(&self) -> &[Box<dyn DatasetController>] {
        &self.controllers
    }

    fn compute_chart_area(&self) -> ChartArea {
        let p = &self.padding;
        ChartArea::new(
            p.left(),
            p.top(),
            self.dimensions.width() - p.right(),
            self.dimensions.height() - p.bottom(),
        )
    }

    /// Run one update pass: parse data, set value domains, lay out legends,
    /// fit the projection and update every element
    #[tracing::instrument(skip_all)]
    pub fn update(&mut self, mode: UpdateMode) -> Result<(), GeoChartError> {
        self.chart_area = self.compute_chart_area();

        let mut values: IndexMap<&'static str, Vec<f64>> = IndexMap::new();
        for controller in self.controllers.iter_mut() {
            let parsed = controller.parse(&self.scales)?;
            values
                .entry(controller.value_scale_id())
                .or_default()
                .extend(parsed);
        }
        for (id, values) in &values {
            if let Some(scale) = self.scales.get_mut(*id) {
                scale.determine_data_limits(values);
            }
        }
        for scale in self.scales.values_mut() {
            scale.layout(&self.chart_area);
        }

        let dirty = projection_scale_mut(&mut self.scales)?.update_bounds(&self.chart_area)?;
        let ctx = UpdateContext {
            area: self.chart_area,
            pixel_ratio: self.dimensions.pixel_ratio,
            mode,
            dirty,
        };
        for controller in self.controllers.iter_mut() {
            controller.update(&mut self.scales, &ctx)?;
        }
        Ok(())
    }

    /// Change the canvas size and run a resize update
    pub fn resize(&mut self, width: f64, height: f64) -> Result<(), GeoChartError> {
        self.dimensions.size = [width, height];
        self.update(UpdateMode::Resize)
    }

    /// Draw every dataset in order, then the legends on top
    #[tracing::instrument(skip_all)]
    pub fn draw(&mut self, canvas: &mut dyn Canvas) -> Result<(), GeoChartError> {
        for controller in self.controllers.iter_mut() {
            controller.draw(canvas, &self.scales, &self.chart_area)?;
        }
        for scale in self.scales.values() {
            scale.draw_legend(canvas, &self.chart_area);
        }
        Ok(())
    }

    /// Draw into a fresh raster of the chart's dimensions
    pub fn render_to_pixmap(&mut self) -> Result<Pixmap, GeoChartError> {
        let mut canvas = SkiaCanvas::new(
            self.dimensions.width(),
            self.dimensions.height(),
            self.dimensions.pixel_ratio,
        )?;
        self.draw(&mut canvas)?;
        Ok(canvas.into_pixmap())
    }

    /// Data elements of every dataset under a pixel position
    pub fn elements_at(&mut self, x: f64, y: f64) -> Result<Vec<ElementHit>, GeoChartError> {
        let mut hits = Vec::new();
        for controller in self.controllers.iter_mut() {
            let dataset_index = controller.dataset_index();
            hits.extend(
                controller
                    .elements_at(x, y, &self.scales)?
                    .into_iter()
                    .map(|index| ElementHit {
                        dataset_index,
                        index,
                    }),
            );
        }
        Ok(hits)
    }
}
