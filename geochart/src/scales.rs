use geochart_canvas::{Canvas, PointOptions};
use geochart_common::{ChartArea, Color};
use geochart_guides::{draw_color_legend, draw_size_legend};
use geochart_projection::{ProjectionScale, ProjectionScaleOptions};
use geochart_scales::{
    ColorLinearScale, ColorLogarithmicScale, ColorScaleOptions, SizeLinearScale,
    SizeLogarithmicScale, SizeScaleOptions,
};
use indexmap::IndexMap;
use serde_json::Value;

use crate::error::GeoChartError;

/// Scales of a chart by id
pub type Scales = IndexMap<String, ChartScale>;

/// A scale instance of any registered type
#[derive(Debug, Clone)]
pub enum ChartScale {
    Projection(ProjectionScale),
    Color(ColorLinearScale),
    ColorLogarithmic(ColorLogarithmicScale),
    Size(SizeLinearScale),
    SizeLogarithmic(SizeLogarithmicScale),
}

pub fn create_projection_scale(_id: &str, options: Value) -> Result<ChartScale, GeoChartError> {
    let options: ProjectionScaleOptions = serde_json::from_value(options)?;
    Ok(ChartScale::Projection(ProjectionScale::new(options)))
}

pub fn create_color_scale(id: &str, options: Value) -> Result<ChartScale, GeoChartError> {
    Ok(ChartScale::Color(ColorLinearScale::new(
        ColorScaleOptions::from_value(id, options)?,
    )))
}

pub fn create_color_logarithmic_scale(id: &str, options: Value) -> Result<ChartScale, GeoChartError> {
    Ok(ChartScale::ColorLogarithmic(ColorLogarithmicScale::new(
        ColorScaleOptions::from_value(id, options)?,
    )))
}

pub fn create_size_scale(id: &str, options: Value) -> Result<ChartScale, GeoChartError> {
    Ok(ChartScale::Size(SizeLinearScale::new(
        SizeScaleOptions::from_value(id, options)?,
    )))
}

pub fn create_size_logarithmic_scale(id: &str, options: Value) -> Result<ChartScale, GeoChartError> {
    Ok(ChartScale::SizeLogarithmic(SizeLogarithmicScale::new(
        SizeScaleOptions::from_value(id, options)?,
    )))
}

impl ChartScale {
    pub fn type_id(&self) -> &'static str {
        match self {
            ChartScale::Projection(_) => "projection",
            ChartScale::Color(_) => "color",
            ChartScale::ColorLogarithmic(_) => "colorLogarithmic",
            ChartScale::Size(_) => "size",
            ChartScale::SizeLogarithmic(_) => "sizeLogarithmic",
        }
    }

    pub fn as_projection(&self) -> Option<&ProjectionScale> {
        match self {
            ChartScale::Projection(scale) => Some(scale),
            _ => None,
        }
    }

    pub fn as_projection_mut(&mut self) -> Option<&mut ProjectionScale> {
        match self {
            ChartScale::Projection(scale) => Some(scale),
            _ => None,
        }
    }

    pub fn is_color(&self) -> bool {
        matches!(self, ChartScale::Color(_) | ChartScale::ColorLogarithmic(_))
    }

    pub fn is_size(&self) -> bool {
        matches!(self, ChartScale::Size(_) | ChartScale::SizeLogarithmic(_))
    }

    /// Parsed value of a raw datum, None for the projection or missing values
    pub fn parse_value(&self, raw: &Value) -> Option<f64> {
        match self {
            ChartScale::Projection(_) => None,
            ChartScale::Color(scale) => scale.legend().parse_value(raw),
            ChartScale::ColorLogarithmic(scale) => scale.legend().parse_value(raw),
            ChartScale::Size(scale) => scale.legend().parse_value(raw),
            ChartScale::SizeLogarithmic(scale) => scale.legend().parse_value(raw),
        }
    }

    pub fn determine_data_limits(&mut self, values: &[f64]) {
        match self {
            ChartScale::Projection(_) => {}
            ChartScale::Color(scale) => scale.legend_mut().determine_data_limits(values),
            ChartScale::ColorLogarithmic(scale) => {
                scale.legend_mut().determine_data_limits(values)
            }
            ChartScale::Size(scale) => scale.legend_mut().determine_data_limits(values),
            ChartScale::SizeLogarithmic(scale) => scale.legend_mut().determine_data_limits(values),
        }
    }

    /// Lay the legend out for the chart area
    pub fn layout(&mut self, area: &ChartArea) {
        let (w, h) = (area.width(), area.height());
        match self {
            ChartScale::Projection(_) => {}
            ChartScale::Color(scale) => scale.legend_mut().update(w, h),
            ChartScale::ColorLogarithmic(scale) => scale.legend_mut().update(w, h),
            ChartScale::Size(scale) => scale.legend_mut().update(w, h),
            ChartScale::SizeLogarithmic(scale) => scale.legend_mut().update(w, h),
        }
    }

    /// Color of a value, None when this is not a color scale
    pub fn color_for_value(&self, value: Option<f64>) -> Option<Color> {
        match self {
            ChartScale::Color(scale) => Some(scale.get_color_for_value(value)),
            ChartScale::ColorLogarithmic(scale) => Some(scale.get_color_for_value(value)),
            _ => None,
        }
    }

    /// Radius of a value, None when this is not a size scale
    pub fn size_for_value(&self, value: Option<f64>) -> Option<f64> {
        match self {
            ChartScale::Size(scale) => Some(scale.get_size_for_value(value)),
            ChartScale::SizeLogarithmic(scale) => Some(scale.get_size_for_value(value)),
            _ => None,
        }
    }

    /// Point style the size legend markers copy
    pub fn set_model(&mut self, model: Option<PointOptions>) {
        match self {
            ChartScale::Size(scale) => scale.set_model(model),
            ChartScale::SizeLogarithmic(scale) => scale.set_model(model),
            _ => {}
        }
    }

    pub fn draw_legend(&self, canvas: &mut dyn Canvas, area: &ChartArea) {
        match self {
            ChartScale::Projection(_) => {}
            ChartScale::Color(scale) => draw_color_legend(canvas, scale, area),
            ChartScale::ColorLogarithmic(scale) => draw_color_legend(canvas, scale, area),
            ChartScale::Size(scale) => draw_size_legend(canvas, scale, area),
            ChartScale::SizeLogarithmic(scale) => draw_size_legend(canvas, scale, area),
        }
    }
}

/// The projection scale of a chart
pub fn projection_scale<'a>(scales: &'a Scales) -> Result<&'a ProjectionScale, GeoChartError> {
    scales
        .get(ProjectionScale::TYPE_ID)
        .ok_or_else(|| GeoChartError::MissingScale(ProjectionScale::TYPE_ID.to_string()))?
        .as_projection()
        .ok_or(GeoChartError::ScaleRoleMismatch {
            id: ProjectionScale::TYPE_ID.to_string(),
            expected: "projection",
        })
}

pub fn projection_scale_mut<'a>(
    scales: &'a mut Scales,
) -> Result<&'a mut ProjectionScale, GeoChartError> {
    scales
        .get_mut(ProjectionScale::TYPE_ID)
        .ok_or_else(|| GeoChartError::MissingScale(ProjectionScale::TYPE_ID.to_string()))?
        .as_projection_mut()
        .ok_or(GeoChartError::ScaleRoleMismatch {
            id: ProjectionScale::TYPE_ID.to_string(),
            expected: "projection",
        })
}
