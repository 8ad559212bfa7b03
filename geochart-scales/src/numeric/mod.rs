pub mod linear;
pub mod log;

use std::fmt::Debug;

use geochart_common::Color;
use serde::Deserialize;
use serde_json::Value;

pub use linear::LinearValueScale;
pub use log::LogValueScale;

/// Whether the domain is extended to the outer ticks or kept at the data
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Bounds {
    #[default]
    Ticks,
    Data,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TickOptions {
    pub display: bool,
    /// Upper bound on the number of generated ticks
    pub max_ticks_limit: usize,
    pub color: Color,
    pub font_size: f64,
    /// Space between tick marks and labels
    pub padding: f64,
}

impl Default for TickOptions {
    fn default() -> Self {
        Self {
            display: true,
            max_ticks_limit: 11,
            color: Color::from_rgb8(0x66, 0x66, 0x66),
            font_size: 12.0,
            padding: 3.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridOptions {
    pub display: bool,
    pub draw_ticks: bool,
    pub tick_length: f64,
    pub color: Color,
    pub line_width: f64,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            display: true,
            draw_ticks: true,
            tick_length: 8.0,
            color: Color::new(0.0, 0.0, 0.0, 0.1),
            line_width: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BorderOptions {
    pub display: bool,
    pub color: Color,
    pub width: f64,
}

impl Default for BorderOptions {
    fn default() -> Self {
        Self {
            display: true,
            color: Color::new(0.0, 0.0, 0.0, 0.1),
            width: 1.0,
        }
    }
}

/// Options shared by the continuous value axes a legend is drawn from
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AxisOptions {
    /// Fixed lower domain limit, overriding the data
    pub min: Option<f64>,
    /// Fixed upper domain limit, overriding the data
    pub max: Option<f64>,
    pub bounds: Bounds,
    /// Flip the pixel direction of the axis
    pub reverse: bool,
    pub ticks: TickOptions,
    pub grid: GridOptions,
    pub border: BorderOptions,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub value: f64,
    pub label: String,
    pub major: bool,
}

/// A numeric axis that maps data values into the unit interval.
///
/// The lifecycle mirrors a chart layout pass: limits are determined from the
/// data, then ticks are built for the available space, which may adjust the
/// domain to the outer ticks.
pub trait ContinuousValueScale: Debug + Clone + Default + Send + Sync + 'static {
    /// Set the domain from parsed data values and the `min`/`max` overrides
    fn determine_data_limits(&mut self, values: &[f64], options: &AxisOptions);

    /// Generate at most `max_ticks` ticks, adjusting the domain per `bounds`
    fn build_ticks(&mut self, options: &AxisOptions, max_ticks: usize) -> Vec<Tick>;

    fn domain(&self) -> (f64, f64);

    /// Map a value to `[0, 1]` over the domain. Missing values give None.
    fn normalize(&self, value: f64) -> Option<f64>;

    /// Default numeric parse of a raw datum
    fn parse(&self, raw: &Value) -> Option<f64> {
        parse_number(raw)
    }
}

/// Numbers and numeric strings. Everything else is missing.
pub fn parse_number(raw: &Value) -> Option<f64> {
    match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

/// Label for `value` with enough decimals to tell ticks `step` apart
pub fn format_tick(value: f64, step: f64) -> String {
    let decimals = if step.is_finite() && step != 0.0 {
        // nudge so exact powers of ten are not pushed down by rounding
        (-(step.abs().log10() + 1e-9).floor()).clamp(0.0, 20.0) as usize
    } else {
        0
    };
    let label = format!("{value:.decimals$}");
    // avoid "-0" and "-0.00"
    if label.starts_with('-') && label[1..].chars().all(|c| c == '0' || c == '.') {
        label[1..].to_string()
    } else {
        label
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!(4.5), Some(4.5))]
    #[case(json!("12"), Some(12.0))]
    #[case(json!(" 3.25 "), Some(3.25))]
    #[case(json!("abc"), None)]
    #[case(json!(null), None)]
    #[case(json!({"value": 3}), None)]
    fn test_parse_number(#[case] raw: Value, #[case] expected: Option<f64>) {
        assert_eq!(parse_number(&raw), expected);
    }

    #[rstest]
    #[case(20.0, 10.0, "20")]
    #[case(0.5, 0.1, "0.5")]
    #[case(0.25, 0.05, "0.25")]
    #[case(-0.0001, 0.5, "0.0")]
    #[case(1500.0, 500.0, "1500")]
    fn test_format_tick(#[case] value: f64, #[case] step: f64, #[case] expected: &str) {
        assert_eq!(format_tick(value, step), expected);
    }

    #[test]
    fn test_axis_options_deserialize() {
        let options: AxisOptions = serde_json::from_value(json!({
            "min": 0,
            "bounds": "data",
            "ticks": {"maxTicksLimit": 5},
            "grid": {"drawTicks": false}
        }))
        .unwrap();
        assert_eq!(options.min, Some(0.0));
        assert_eq!(options.max, None);
        assert_eq!(options.bounds, Bounds::Data);
        assert_eq!(options.ticks.max_ticks_limit, 5);
        assert!(options.ticks.display);
        assert!(!options.grid.draw_ticks);
    }
}
