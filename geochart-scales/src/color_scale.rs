use geochart_common::Color;
use serde::Deserialize;
use serde_json::Value;

use crate::color::Interpolate;
use crate::error::ScaleError;
use crate::legend::{LegendOptions, LegendScale, LegendScaleOptions};
use crate::numeric::{ContinuousValueScale, LinearValueScale, LogValueScale};
use crate::quantize::quantize;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColorScaleOptions {
    #[serde(flatten)]
    pub base: LegendScaleOptions,
    pub interpolate: Interpolate,
    /// Color of missing values
    pub missing: Color,
    /// Number of discrete color bands, 0 for a continuous ramp
    pub quantize: u32,
}

impl Default for ColorScaleOptions {
    fn default() -> Self {
        Self {
            base: LegendScaleOptions::default(),
            interpolate: Interpolate::default(),
            missing: Color::TRANSPARENT,
            quantize: 0,
        }
    }
}

impl ColorScaleOptions {
    /// Parse the options of the scale registered under `id`
    pub fn from_value(id: &str, value: Value) -> Result<Self, ScaleError> {
        serde_json::from_value(value).map_err(|source| ScaleError::InvalidOptions {
            id: id.to_string(),
            source,
        })
    }
}

/// One filled rectangle of the color bar, relative to the indicator origin
#[derive(Debug, Clone, PartialEq)]
pub struct ColorSlice {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color: Color,
}

/// Maps values to colors through a named ramp or a caller function
#[derive(Debug, Clone)]
pub struct ColorScale<S: ContinuousValueScale> {
    legend: LegendScale<S>,
    interpolate: Interpolate,
    missing: Color,
    quantize: u32,
}

pub type ColorLinearScale = ColorScale<LinearValueScale>;
pub type ColorLogarithmicScale = ColorScale<LogValueScale>;

impl<S: ContinuousValueScale> ColorScale<S> {
    pub fn new(options: ColorScaleOptions) -> Self {
        Self {
            legend: LegendScale::new(options.base, LegendOptions::default()),
            interpolate: options.interpolate,
            missing: options.missing,
            quantize: options.quantize,
        }
    }

    pub fn legend(&self) -> &LegendScale<S> {
        &self.legend
    }

    pub fn legend_mut(&mut self) -> &mut LegendScale<S> {
        &mut self.legend
    }

    pub fn interpolate(&self) -> &Interpolate {
        &self.interpolate
    }

    pub fn missing(&self) -> Color {
        self.missing
    }

    pub fn quantize_steps(&self) -> u32 {
        self.quantize
    }

    /// Color of a value, or the missing color when it has no position in the domain
    pub fn get_color_for_value(&self, value: Option<f64>) -> Color {
        match self.legend.normalize(value) {
            Some(v) if !v.is_nan() => self.get_color(v),
            _ => self.missing,
        }
    }

    /// Color of a normalized value, snapped to a band when quantized
    pub fn get_color(&self, normalized: f64) -> Color {
        let v = if self.quantize > 0 {
            quantize(normalized, self.quantize)
        } else {
            normalized
        };
        self.interpolate.color(v)
    }

    /// Rectangles of the color bar for the current layout: one per pixel
    /// along the legend length, or one per band when quantized.
    pub fn indicator_slices(&self) -> Vec<ColorSlice> {
        let indicator = self.legend.legend().indicator_width;
        let reverse = self.legend.reverse_pixels();
        let horizontal = self.legend.is_horizontal();
        let length = if horizontal {
            self.legend.width()
        } else {
            self.legend.height()
        };
        if !(length.is_finite() && length > 0.0) {
            return Vec::new();
        }

        let (count, step) = if self.quantize > 0 {
            (self.quantize as usize, length / self.quantize as f64)
        } else {
            (length.ceil() as usize, 1.0)
        };

        (0..count)
            .map(|k| {
                let i = k as f64 * step;
                let color = self.get_color((i + step / 2.0) / length);
                let offset = if reverse { length - step - i } else { i };
                if horizontal {
                    ColorSlice {
                        x: offset,
                        y: 0.0,
                        width: step,
                        height: indicator,
                        color,
                    }
                } else {
                    ColorSlice {
                        x: 0.0,
                        y: offset,
                        width: indicator,
                        height: step,
                        color,
                    }
                }
            })
            .collect()
    }
}

impl<S: ContinuousValueScale> Default for ColorScale<S> {
    fn default() -> Self {
        Self::new(ColorScaleOptions::default())
    }
}
