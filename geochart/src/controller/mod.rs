pub mod bubble_map;
pub mod choropleth;

use std::any::Any;
use std::fmt::Debug;
use std::sync::Arc;

use geochart_canvas::{Canvas, StrokeStyle};
use geochart_common::ChartArea;
use geochart_elements::{GeoFeature, UpdateMode};
use geochart_projection::{GeoObject, ProjectionScale};

use crate::config::{ClipMap, GeoSettings};
use crate::error::GeoChartError;
use crate::scales::{ChartScale, Scales};

pub use bubble_map::BubbleMapController;
pub use choropleth::ChoroplethController;

/// State of one update pass shared by every dataset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpdateContext {
    pub area: ChartArea,
    pub pixel_ratio: f64,
    pub mode: UpdateMode,
    /// The projection fit changed, cached pixel geometry is stale
    pub dirty: bool,
}

/// Drives one dataset of a chart through parse, update and draw
pub trait DatasetController: Debug {
    fn chart_type(&self) -> &'static str;

    fn dataset_index(&self) -> usize;

    fn as_any(&self) -> &dyn Any;

    /// Id of the scale that encodes the data values
    fn value_scale_id(&self) -> &'static str;

    /// Scale type created for the value scale when the chart config does not
    /// name one
    fn default_value_scale_type(&self) -> &'static str;

    fn geo(&self) -> &GeoController;

    fn geo_mut(&mut self) -> &mut GeoController;

    /// Fit the projection's reference bounds to this dataset's outline
    fn link_scales(&mut self, scales: &mut Scales) -> Result<(), GeoChartError> {
        let projection = crate::scales::projection_scale_mut(scales)?;
        self.geo().link_scales(projection);
        Ok(())
    }

    /// Parse the raw data against the value scale and return the values that
    /// take part in the data limits
    fn parse(&mut self, scales: &Scales) -> Result<Vec<f64>, GeoChartError>;

    /// Update the map layers and every data element
    fn update(&mut self, scales: &mut Scales, ctx: &UpdateContext) -> Result<(), GeoChartError>;

    fn draw(&mut self, canvas: &mut dyn Canvas, scales: &Scales, area: &ChartArea) -> Result<(), GeoChartError>;

    /// Indices of the data elements under a pixel position
    fn elements_at(&mut self, x: f64, y: f64, scales: &Scales) -> Result<Vec<usize>, GeoChartError>;
}

/// Look up the value scale of a controller and check its role
pub(crate) fn value_scale<'a>(
    scales: &'a Scales,
    id: &str,
    expected: &'static str,
    check: fn(&ChartScale) -> bool,
) -> Result<&'a ChartScale, GeoChartError> {
    let scale = scales
        .get(id)
        .ok_or_else(|| GeoChartError::MissingScale(id.to_string()))?;
    if check(scale) {
        Ok(scale)
    } else {
        Err(GeoChartError::ScaleRoleMismatch {
            id: id.to_string(),
            expected,
        })
    }
}

fn clip(canvas: &mut dyn Canvas, area: &ChartArea) {
    canvas.save();
    canvas.clip_rect(area.left, area.top, area.width(), area.height());
}

/// Map layers every geographic chart type shares: the outline the projection
/// is fitted to, the graticule and the clipping of the draw pass.
#[derive(Debug, Clone)]
pub struct GeoController {
    dataset_index: usize,
    settings: GeoSettings,
    graticule: Option<Arc<GeoObject>>,
    outline_element: GeoFeature,
    graticule_style: Option<StrokeStyle>,
}

impl GeoController {
    pub fn new(dataset_index: usize, settings: GeoSettings) -> Self {
        let graticule = settings.show_graticule.geometry().map(Arc::new);
        Self {
            dataset_index,
            settings,
            graticule,
            outline_element: GeoFeature::new(),
            graticule_style: None,
        }
    }

    pub fn dataset_index(&self) -> usize {
        self.dataset_index
    }

    pub fn settings(&self) -> &GeoSettings {
        &self.settings
    }

    pub fn outline_element(&self) -> &GeoFeature {
        &self.outline_element
    }

    pub fn graticule_style(&self) -> Option<&StrokeStyle> {
        self.graticule_style.as_ref()
    }

    pub fn link_scales(&self, projection: &mut ProjectionScale) {
        projection.compute_bounds(&self.settings.outline);
    }

    /// Refresh the outline element and graticule style. Resizes only drop
    /// stale caches.
    pub fn update(&mut self, projection: &ProjectionScale, ctx: &UpdateContext) {
        if ctx.dirty {
            self.outline_element.clear_cache();
        }
        if ctx.mode == UpdateMode::Resize {
            return;
        }
        let options = &self.settings.feature_options;
        if self.settings.show_outline {
            self.outline_element.style = options.outline_style();
            self.outline_element.set_geometry(
                projection,
                self.settings.outline.clone(),
                None,
                ctx.pixel_ratio,
                ctx.mode,
            );
        }
        if self.graticule.is_some() {
            self.graticule_style = Some(options.graticule_style());
        }
    }

    fn draw_graticule(&self, canvas: &mut dyn Canvas, projection: &ProjectionScale) {
        let (Some(graticule), Some(style)) = (&self.graticule, &self.graticule_style) else {
            return;
        };
        let path = projection.geo_path().path(graticule);
        canvas.save();
        canvas.stroke_path(&path, style);
        canvas.restore();
    }

    /// Draw outline, graticule and then the data elements via `items`,
    /// clipping each layer to the chart area as `clip_map` asks
    pub fn draw(
        &mut self,
        canvas: &mut dyn Canvas,
        projection: &ProjectionScale,
        area: &ChartArea,
        items: &mut dyn FnMut(&mut dyn Canvas),
    ) {
        let clip_map: ClipMap = self.settings.clip_map;

        let mut enabled = false;
        if clip_map.clips_outline() {
            enabled = true;
            clip(canvas, area);
        }

        if self.settings.show_outline {
            self.outline_element.draw(canvas, projection);
        }

        if clip_map.clips_graticule() {
            if !enabled {
                enabled = true;
                clip(canvas, area);
            }
        } else if enabled {
            enabled = false;
            canvas.restore();
        }

        self.draw_graticule(canvas, projection);

        if clip_map.clips_items() {
            if !enabled {
                enabled = true;
                clip(canvas, area);
            }
        } else if enabled {
            enabled = false;
            canvas.restore();
        }

        items(canvas);

        if enabled {
            canvas.restore();
        }
    }
}
