use std::f64::consts::PI;

use geochart_canvas::{PointOptions, PointStyle};
use geochart_common::Color;
use serde::Deserialize;
use serde_json::Value;

use crate::error::ScaleError;
use crate::legend::{LegendAlign, LegendOptions, LegendScale, LegendScaleOptions};
use crate::numeric::{ContinuousValueScale, LinearValueScale, LogValueScale};

/// Whether the radius or the circle area grows linearly with the value
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SizeMode {
    Radius,
    #[default]
    Area,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SizeScaleOptions {
    #[serde(flatten)]
    pub base: LegendScaleOptions,
    /// Radius of the smallest and largest value in pixels
    pub range: [f64; 2],
    pub mode: SizeMode,
    /// Radius of missing values
    pub missing: f64,
}

impl Default for SizeScaleOptions {
    fn default() -> Self {
        Self {
            base: LegendScaleOptions::default(),
            range: [2.0, 20.0],
            mode: SizeMode::Area,
            missing: 1.0,
        }
    }
}

impl SizeScaleOptions {
    /// Parse and check the options of the scale registered under `id`
    pub fn from_value(id: &str, value: Value) -> Result<Self, ScaleError> {
        let options: Self =
            serde_json::from_value(value).map_err(|source| ScaleError::InvalidOptions {
                id: id.to_string(),
                source,
            })?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), ScaleError> {
        if self.range.iter().all(|r| r.is_finite() && *r >= 0.0) {
            Ok(())
        } else {
            Err(ScaleError::InvalidSizeRange(self.range))
        }
    }
}

/// Legend box defaults of size scales, wider to fit the markers
pub fn size_legend_defaults() -> LegendOptions {
    LegendOptions {
        align: LegendAlign::Bottom,
        length: 90.0,
        width: 70.0,
        indicator_width: 42.0,
        ..Default::default()
    }
}

/// A marker of the size legend, relative to the indicator origin
#[derive(Debug, Clone, PartialEq)]
pub struct SizeMarker {
    pub x: f64,
    pub y: f64,
    pub options: PointOptions,
}

/// Maps values to marker radii
#[derive(Debug, Clone)]
pub struct SizeScale<S: ContinuousValueScale> {
    legend: LegendScale<S>,
    range: [f64; 2],
    mode: SizeMode,
    missing: f64,
    model: Option<PointOptions>,
}

pub type SizeLinearScale = SizeScale<LinearValueScale>;
pub type SizeLogarithmicScale = SizeScale<LogValueScale>;

impl<S: ContinuousValueScale> SizeScale<S> {
    pub fn new(options: SizeScaleOptions) -> Self {
        Self {
            legend: LegendScale::new(options.base, size_legend_defaults()),
            range: options.range,
            mode: options.mode,
            missing: options.missing,
            model: None,
        }
    }

    pub fn legend(&self) -> &LegendScale<S> {
        &self.legend
    }

    pub fn legend_mut(&mut self) -> &mut LegendScale<S> {
        &mut self.legend
    }

    pub fn range(&self) -> [f64; 2] {
        self.range
    }

    pub fn mode(&self) -> SizeMode {
        self.mode
    }

    pub fn missing(&self) -> f64 {
        self.missing
    }

    pub fn model(&self) -> Option<&PointOptions> {
        self.model.as_ref()
    }

    /// Remember the point style the legend markers are drawn with
    pub fn set_model(&mut self, model: Option<PointOptions>) {
        self.model = model;
    }

    /// Radius of a value, or the missing radius when it has no position in the domain
    pub fn get_size_for_value(&self, value: Option<f64>) -> f64 {
        match self.legend.normalize(value) {
            Some(v) if !v.is_nan() => self.size_impl(v),
            _ => self.missing,
        }
    }

    pub fn size_impl(&self, normalized: f64) -> f64 {
        let [r0, r1] = self.range;
        match self.mode {
            SizeMode::Area => {
                let a0 = r0 * r0 * PI;
                let a1 = r1 * r1 * PI;
                let a = normalized * (a1 - a0) + a0;
                (a / PI).sqrt()
            }
            SizeMode::Radius => normalized * (r1 - r0) + r0,
        }
    }

    /// Pixel positions of the ticks along the legend length
    fn tick_positions(&self) -> Vec<f64> {
        self.legend
            .ticks()
            .iter()
            .map(|t| self.legend.pixel_for_value(t.value).unwrap_or(f64::NAN))
            .collect()
    }

    /// Tick marks pointing into the marker strip, as `[x1, y1, x2, y2]`
    pub fn indicator_tick_lines(&self) -> Vec<[f64; 4]> {
        let grid = &self.legend.axis().grid;
        if !(grid.display && grid.draw_ticks) {
            return Vec::new();
        }
        let shift = self.legend.legend().indicator_width / 2.0;
        let align = self.legend.legend().align;
        self.tick_positions()
            .into_iter()
            .filter(|p| p.is_finite())
            .map(|p| match align {
                LegendAlign::Left => [0.0, p, shift, p],
                LegendAlign::Top => [p, 0.0, p, shift],
                LegendAlign::Bottom => [p, shift, p, shift * 2.0],
                LegendAlign::Right => [shift, p, shift * 2.0, p],
            })
            .collect()
    }

    /// One marker per tick, sized by the tick value
    pub fn indicator_markers(&self) -> Vec<SizeMarker> {
        let shift = self.legend.legend().indicator_width / 2.0;
        let horizontal = self.legend.is_horizontal();
        let base = self.model.clone().unwrap_or_else(|| PointOptions {
            point_style: PointStyle::Circle,
            background_color: Color::BLUE,
            border_color: Color::BLUE,
            border_width: 0.0,
            ..Default::default()
        });

        self.legend
            .ticks()
            .iter()
            .zip(self.tick_positions())
            .filter(|(_, pos)| pos.is_finite())
            .map(|(tick, pos)| {
                let (x, y) = if horizontal { (pos, shift) } else { (shift, pos) };
                SizeMarker {
                    x,
                    y,
                    options: PointOptions {
                        radius: self.get_size_for_value(Some(tick.value)),
                        ..base.clone()
                    },
                }
            })
            .collect()
    }
}

impl<S: ContinuousValueScale> Default for SizeScale<S> {
    fn default() -> Self {
        Self::new(SizeScaleOptions::default())
    }
}
