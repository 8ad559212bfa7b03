use std::str::FromStr;

use geochart_canvas::measure_text;
use geochart_common::{ChartArea, Sides};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use strum::{Display, EnumString};

use crate::numeric::{AxisOptions, ContinuousValueScale, Tick};

/// Side of the indicator strip the axis ticks and labels are drawn on.
/// `left`/`right` give a vertical legend, `top`/`bottom` a horizontal one.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Display, EnumString)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum LegendAlign {
    Left,
    #[default]
    Right,
    Top,
    Bottom,
}

/// Named placement of the legend box inside the chart area
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum LegendAnchor {
    TopLeft,
    Top,
    Left,
    TopRight,
    #[default]
    BottomRight,
    Bottom,
    BottomLeft,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LegendPosition {
    Anchor(LegendAnchor),
    /// Explicit origin of the legend box, bypassing the anchor layout
    Point { x: f64, y: f64 },
}

impl Default for LegendPosition {
    fn default() -> Self {
        LegendPosition::Anchor(LegendAnchor::default())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LegendPositionRepr {
    Anchor(String),
    Point { x: f64, y: f64 },
}

impl<'de> Deserialize<'de> for LegendPosition {
    /// Unknown anchor names place the legend on the right
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match LegendPositionRepr::deserialize(deserializer)? {
            LegendPositionRepr::Anchor(name) => LegendPosition::Anchor(
                LegendAnchor::from_str(&name).unwrap_or_else(|_| {
                    tracing::warn!("Unknown legend position {name:?}, using right");
                    LegendAnchor::Right
                }),
            ),
            LegendPositionRepr::Point { x, y } => LegendPosition::Point { x, y },
        })
    }
}

/// Resolved legend box options.
///
/// `length` and `width` are pixels when `>= 1` and a ratio of the available
/// chart dimension otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendOptions {
    pub align: LegendAlign,
    pub position: LegendPosition,
    /// Extent along the value axis
    pub length: f64,
    /// Extent across the value axis, indicator included
    pub width: f64,
    /// Pixels reserved for the color bar or size markers
    pub indicator_width: f64,
    pub margin: Sides,
}

impl Default for LegendOptions {
    fn default() -> Self {
        Self {
            align: LegendAlign::Right,
            position: LegendPosition::default(),
            length: 100.0,
            width: 50.0,
            indicator_width: 10.0,
            margin: Sides::Uniform(8.0),
        }
    }
}

/// Legend options as written in a config. Unset fields fall back to the
/// defaults of the scale kind the legend belongs to.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegendConfig {
    pub align: Option<LegendAlign>,
    pub position: Option<LegendPosition>,
    pub length: Option<f64>,
    pub width: Option<f64>,
    pub indicator_width: Option<f64>,
    pub margin: Option<Sides>,
}

impl LegendConfig {
    pub fn resolve(&self, defaults: LegendOptions) -> LegendOptions {
        LegendOptions {
            align: self.align.unwrap_or(defaults.align),
            position: self.position.unwrap_or(defaults.position),
            length: self.length.unwrap_or(defaults.length),
            width: self.width.unwrap_or(defaults.width),
            indicator_width: self.indicator_width.unwrap_or(defaults.indicator_width),
            margin: self.margin.unwrap_or(defaults.margin),
        }
    }
}

/// Options every legend carrying scale understands
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegendScaleOptions {
    pub display: bool,
    /// Field of an object datum holding its value
    pub property: String,
    pub legend: LegendConfig,
    #[serde(flatten)]
    pub axis: AxisOptions,
}

impl Default for LegendScaleOptions {
    fn default() -> Self {
        Self {
            display: true,
            property: "value".to_string(),
            legend: LegendConfig::default(),
            axis: AxisOptions::default(),
        }
    }
}

/// Box sizes in pixels
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LegendSize {
    pub w: f64,
    pub h: f64,
}

/// A value axis laid out as a legend box.
///
/// Holds the value scale plus the layout state of the last `update`: the
/// legend box size, the fitted axis size and the ticks.
#[derive(Debug, Clone)]
pub struct LegendScale<S: ContinuousValueScale> {
    options: LegendScaleOptions,
    legend: LegendOptions,
    value_scale: S,
    ticks: Vec<Tick>,
    legend_size: LegendSize,
    width: f64,
    height: f64,
}

impl<S: ContinuousValueScale> LegendScale<S> {
    pub fn new(options: LegendScaleOptions, legend_defaults: LegendOptions) -> Self {
        let legend = options.legend.resolve(legend_defaults);
        Self {
            options,
            legend,
            value_scale: S::default(),
            ticks: Vec::new(),
            legend_size: LegendSize::default(),
            width: 0.0,
            height: 0.0,
        }
    }

    pub fn options(&self) -> &LegendScaleOptions {
        &self.options
    }

    pub fn legend(&self) -> &LegendOptions {
        &self.legend
    }

    pub fn axis(&self) -> &AxisOptions {
        &self.options.axis
    }

    pub fn value_scale(&self) -> &S {
        &self.value_scale
    }

    pub fn ticks(&self) -> &[Tick] {
        &self.ticks
    }

    pub fn legend_size(&self) -> LegendSize {
        self.legend_size
    }

    /// Fitted axis width after the last `update`
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Fitted axis height after the last `update`
    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn is_visible(&self) -> bool {
        self.options.display
    }

    /// Value of a datum: the configured property of an object, otherwise the
    /// value scale's own numeric parse
    pub fn parse_value(&self, raw: &Value) -> Option<f64> {
        if let Some(v) = raw
            .as_object()
            .and_then(|obj| obj.get(&self.options.property))
            .and_then(Value::as_f64)
        {
            return Some(v);
        }
        self.value_scale.parse(raw)
    }

    pub fn is_horizontal(&self) -> bool {
        matches!(self.legend.align, LegendAlign::Top | LegendAlign::Bottom)
    }

    /// Position of `value` in the domain, None when missing
    pub fn normalize(&self, value: Option<f64>) -> Option<f64> {
        value.and_then(|v| self.value_scale.normalize(v))
    }

    /// Set the domain from the parsed values of every dataset bound to this scale
    pub fn determine_data_limits(&mut self, values: &[f64]) {
        self.value_scale
            .determine_data_limits(values, &self.options.axis);
    }

    /// Legend box size for the available space, indicator strip excluded
    pub fn compute_legend_box_size(&self, max_width: f64, max_height: f64) -> LegendSize {
        let l = &self.legend;
        let is_hor = self.is_horizontal();
        let factor = |v: f64, full: f64| if v < 1.0 { full * v } else { v };
        let w = max_width.min(factor(if is_hor { l.length } else { l.width }, max_width))
            - if is_hor { 0.0 } else { l.indicator_width };
        let h = max_height.min(factor(if is_hor { l.width } else { l.length }, max_height))
            - if is_hor { l.indicator_width } else { 0.0 };
        LegendSize { w, h }
    }

    /// Lay the legend out for the available space: size the box, build ticks
    /// for its length and fit the axis into it.
    pub fn update(&mut self, max_width: f64, max_height: f64) {
        self.legend_size = self.compute_legend_box_size(max_width, max_height);
        let LegendSize { w, h } = self.legend_size;

        let max_ticks = self.compute_tick_limit(w, h);
        self.ticks = self
            .value_scale
            .build_ticks(&self.options.axis, max_ticks);

        let thickness = self.axis_thickness();
        if self.is_horizontal() {
            self.width = w;
            self.height = h.min(thickness);
        } else {
            self.width = w.min(thickness);
            self.height = h;
        }
        tracing::debug!(
            "legend laid out at {}x{} with {} ticks",
            self.width,
            self.height,
            self.ticks.len()
        );
    }

    fn compute_tick_limit(&self, w: f64, h: f64) -> usize {
        let ticks = &self.options.axis.ticks;
        let limit = if self.is_horizontal() {
            (w / 40.0).ceil()
        } else {
            (h / (ticks.font_size * 1.2)).ceil()
        };
        let limit = if limit.is_finite() { limit.max(0.0) as usize } else { 0 };
        limit.min(ticks.max_ticks_limit).max(2)
    }

    /// Space the axis needs across its length: tick marks, padding and labels.
    /// Labels are shaped with the font the raster backend draws them with.
    fn axis_thickness(&self) -> f64 {
        let axis = &self.options.axis;
        let tick_length = if axis.grid.display && axis.grid.draw_ticks {
            axis.grid.tick_length
        } else {
            0.0
        };
        if !axis.ticks.display {
            return tick_length;
        }
        let font_size = axis.ticks.font_size;
        let labels = self
            .ticks
            .iter()
            .map(|t| {
                let bounds = measure_text(&t.label, font_size);
                if self.is_horizontal() {
                    bounds.line_height
                } else {
                    bounds.width
                }
            })
            .fold(0.0, f64::max);
        tick_length + axis.ticks.padding + labels
    }

    /// Margins around the legend box. The side the indicator strip sits on
    /// also reserves the strip.
    pub fn compute_legend_margin(&self) -> Sides {
        let l = &self.legend;
        let m = &l.margin;
        let iw = l.indicator_width;
        let extra = |align: LegendAlign| if l.align == align { iw } else { 0.0 };
        Sides::PerSide {
            left: m.left() + extra(LegendAlign::Right),
            top: m.top() + extra(LegendAlign::Bottom),
            right: m.right() + extra(LegendAlign::Left),
            bottom: m.bottom() + extra(LegendAlign::Top),
        }
    }

    /// Origin of the legend box for the current layout
    pub fn resolve_legend_position(&self, area: &ChartArea) -> [f64; 2] {
        let l = &self.legend;
        let iw = l.indicator_width;
        let is_hor = self.is_horizontal();
        let w = if l.align == LegendAlign::Left {
            self.legend_size.w
        } else {
            self.width
        } + if is_hor { iw } else { 0.0 };
        let h = if l.align == LegendAlign::Top {
            self.legend_size.h
        } else {
            self.height
        } + if is_hor { 0.0 } else { iw };
        let m = self.compute_legend_margin();

        let anchor = match l.position {
            LegendPosition::Point { x, y } => return [x, y],
            LegendPosition::Anchor(anchor) => anchor,
        };
        match anchor {
            LegendAnchor::TopLeft => [m.left(), m.top()],
            LegendAnchor::Top => [(area.right - w) / 2.0, m.top()],
            LegendAnchor::Left => [m.left(), (area.bottom - h) / 2.0],
            LegendAnchor::TopRight => [area.right - w - m.right(), m.top()],
            LegendAnchor::BottomRight => {
                [area.right - w - m.right(), area.bottom - h - m.bottom()]
            }
            LegendAnchor::Bottom => [(area.right - w) / 2.0, area.bottom - h - m.bottom()],
            LegendAnchor::BottomLeft => [m.left(), area.bottom - h - m.bottom()],
            LegendAnchor::Right => [area.right - w - m.right(), (area.bottom - h) / 2.0],
        }
    }

    /// Whether pixel positions run against the value direction. Vertical
    /// axes grow upwards, so they are reversed unless `reverse` is set.
    pub fn reverse_pixels(&self) -> bool {
        let reverse = self.options.axis.reverse;
        if self.is_horizontal() {
            reverse
        } else {
            !reverse
        }
    }

    /// Pixel offset of a value along the legend axis, relative to the box origin
    pub fn pixel_for_value(&self, value: f64) -> Option<f64> {
        let decimal = self.value_scale.normalize(value)?;
        Some(self.pixel_for_decimal(decimal))
    }

    pub fn pixel_for_decimal(&self, decimal: f64) -> f64 {
        let decimal = if self.reverse_pixels() {
            1.0 - decimal
        } else {
            decimal
        };
        if self.is_horizontal() {
            decimal * self.width
        } else {
            decimal * self.height
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::{LinearValueScale, LogValueScale};
    use float_cmp::assert_approx_eq;
    use serde_json::json;

    fn scale_with(legend: LegendConfig) -> LegendScale<LinearValueScale> {
        LegendScale::new(
            LegendScaleOptions {
                legend,
                ..Default::default()
            },
            LegendOptions::default(),
        )
    }

    #[test]
    fn test_parse_value() {
        let scale = scale_with(LegendConfig::default());
        assert_eq!(scale.parse_value(&json!({"value": 4.5})), Some(4.5));
        assert_eq!(scale.parse_value(&json!(7)), Some(7.0));
        assert_eq!(scale.parse_value(&json!("8")), Some(8.0));
        assert_eq!(scale.parse_value(&json!({"other": 4.5})), None);
        assert_eq!(scale.parse_value(&json!({"value": "4.5"})), None);
    }

    #[test]
    fn test_parse_custom_property() {
        let scale: LegendScale<LinearValueScale> = LegendScale::new(
            serde_json::from_value(json!({"property": "population"})).unwrap(),
            LegendOptions::default(),
        );
        assert_eq!(scale.parse_value(&json!({"population": 12})), Some(12.0));
        assert_eq!(scale.parse_value(&json!({"value": 12})), None);
    }

    #[test]
    fn test_is_horizontal() {
        for (align, expected) in [
            (LegendAlign::Left, false),
            (LegendAlign::Right, false),
            (LegendAlign::Top, true),
            (LegendAlign::Bottom, true),
        ] {
            let scale = scale_with(LegendConfig {
                align: Some(align),
                ..Default::default()
            });
            assert_eq!(scale.is_horizontal(), expected);
        }
    }

    #[test]
    fn test_normalize_missing() {
        let mut scale = scale_with(LegendConfig::default());
        scale.determine_data_limits(&[0.0, 10.0]);
        assert_eq!(scale.normalize(None), None);
        assert_eq!(scale.normalize(Some(f64::NAN)), None);
        assert_approx_eq!(f64, scale.normalize(Some(2.5)).unwrap(), 0.25);
    }

    #[test]
    fn test_log_normalize() {
        let mut scale: LegendScale<LogValueScale> =
            LegendScale::new(LegendScaleOptions::default(), LegendOptions::default());
        scale.determine_data_limits(&[1.0, 1000.0]);
        assert_approx_eq!(f64, scale.normalize(Some(10.0)).unwrap(), 1.0 / 3.0);
    }

    #[test]
    fn test_box_size_vertical() {
        let scale = scale_with(LegendConfig::default());
        let size = scale.compute_legend_box_size(400.0, 300.0);
        assert_eq!(size, LegendSize { w: 40.0, h: 100.0 });
    }

    #[test]
    fn test_box_size_ratios_and_clamping() {
        let scale = scale_with(LegendConfig {
            align: Some(LegendAlign::Bottom),
            length: Some(0.5),
            width: Some(60.0),
            ..Default::default()
        });
        let size = scale.compute_legend_box_size(400.0, 300.0);
        assert_eq!(size, LegendSize { w: 200.0, h: 50.0 });

        // the box never exceeds the available space
        let size = scale.compute_legend_box_size(400.0, 30.0);
        assert_eq!(size, LegendSize { w: 200.0, h: 20.0 });
    }

    #[test]
    fn test_update_fits_axis() {
        let mut scale = scale_with(LegendConfig::default());
        scale.determine_data_limits(&[0.0, 100.0]);
        scale.update(400.0, 300.0);
        assert_eq!(scale.legend_size(), LegendSize { w: 40.0, h: 100.0 });
        assert_eq!(scale.height(), 100.0);
        assert!(scale.width() <= 40.0);
        assert!(!scale.ticks().is_empty());
        assert!(scale.ticks().len() <= 11);
    }

    #[test]
    fn test_axis_thickness_follows_label_width() {
        if !geochart_canvas::fonts_available() {
            return;
        }
        let mut narrow = scale_with(LegendConfig::default());
        narrow.determine_data_limits(&[0.0, 10.0]);
        narrow.update(400.0, 300.0);

        let mut wide = scale_with(LegendConfig::default());
        wide.determine_data_limits(&[0.0, 1_000_000.0]);
        wide.update(400.0, 300.0);

        // tick length 8 plus padding 3 plus the widest label
        assert!(narrow.width() > 11.0);
        assert!(narrow.width() < wide.width());
        assert_eq!(wide.width(), 40.0);
    }

    #[test]
    fn test_margin_reserves_indicator() {
        let scale = scale_with(LegendConfig {
            margin: Some(Sides::PerSide {
                top: 1.0,
                right: 2.0,
                bottom: 3.0,
                left: 4.0,
            }),
            ..Default::default()
        });
        let m = scale.compute_legend_margin();
        assert_eq!((m.left(), m.top(), m.right(), m.bottom()), (14.0, 1.0, 2.0, 3.0));
    }

    #[test]
    fn test_vertical_pixels_grow_upwards() {
        let mut scale = scale_with(LegendConfig::default());
        scale.determine_data_limits(&[0.0, 100.0]);
        scale.update(400.0, 300.0);
        assert_approx_eq!(f64, scale.pixel_for_value(100.0).unwrap(), 0.0);
        assert_approx_eq!(f64, scale.pixel_for_value(0.0).unwrap(), 100.0);
        assert!(scale.reverse_pixels());
    }

    #[test]
    fn test_position_deserialize() {
        let p: LegendPosition = serde_json::from_value(json!("top-left")).unwrap();
        assert_eq!(p, LegendPosition::Anchor(LegendAnchor::TopLeft));
        let p: LegendPosition = serde_json::from_value(json!({"x": 3, "y": 4})).unwrap();
        assert_eq!(p, LegendPosition::Point { x: 3.0, y: 4.0 });
        let p: LegendPosition = serde_json::from_value(json!("middle")).unwrap();
        assert_eq!(p, LegendPosition::Anchor(LegendAnchor::Right));
    }
}
