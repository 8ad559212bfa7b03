use float_cmp::assert_approx_eq;
use geochart_canvas::{PointOptions, PointStyle};
use geochart_common::{ChartArea, Color};
use geochart_scales::{
    LegendAlign, ScaleError, SizeLinearScale, SizeLogarithmicScale, SizeMode, SizeScale,
    SizeScaleOptions,
};
use rstest::rstest;
use serde_json::json;

fn size_scale(options: serde_json::Value, values: &[f64]) -> SizeLinearScale {
    let options = SizeScaleOptions::from_value("size", options).unwrap();
    let mut scale = SizeScale::new(options);
    scale.legend_mut().determine_data_limits(values);
    scale
}

#[test]
fn test_defaults() {
    let scale = size_scale(json!({}), &[0.0, 1.0]);
    assert_eq!(scale.range(), [2.0, 20.0]);
    assert_eq!(scale.mode(), SizeMode::Area);
    assert_eq!(scale.missing(), 1.0);
    let legend = scale.legend().legend();
    assert_eq!(legend.align, LegendAlign::Bottom);
    assert_eq!((legend.length, legend.width, legend.indicator_width), (90.0, 70.0, 42.0));
    assert_eq!(legend.margin.top(), 8.0);
}

#[test]
fn test_area_mode_is_monotonic() {
    let scale = size_scale(json!({}), &[0.0, 1.0]);
    assert_approx_eq!(f64, scale.size_impl(0.0), 2.0);
    assert_approx_eq!(f64, scale.size_impl(1.0), 20.0);
    let mut last = scale.size_impl(0.0);
    for i in 1..=100 {
        let r = scale.size_impl(i as f64 / 100.0);
        assert!(r > last);
        last = r;
    }
}

#[test]
fn test_area_and_radius_modes_diverge() {
    let area = size_scale(json!({"mode": "area"}), &[0.0, 1.0]);
    let radius = size_scale(json!({"mode": "radius"}), &[0.0, 1.0]);
    assert_approx_eq!(f64, area.size_impl(0.5), 202f64.sqrt(), epsilon = 1e-9);
    assert_approx_eq!(f64, radius.size_impl(0.5), 11.0);
}

#[rstest]
#[case(None)]
#[case(Some(f64::NAN))]
fn test_missing_radius(#[case] value: Option<f64>) {
    let scale = size_scale(json!({"missing": 3.5}), &[0.0, 10.0]);
    assert_eq!(scale.get_size_for_value(value), 3.5);
}

#[test]
fn test_log_size_scale() {
    let options = SizeScaleOptions::from_value("sizeLogarithmic", json!({"mode": "radius"})).unwrap();
    let mut scale: SizeLogarithmicScale = SizeScale::new(options);
    scale.legend_mut().determine_data_limits(&[1.0, 100.0]);
    assert_approx_eq!(f64, scale.get_size_for_value(Some(10.0)), 11.0);
    assert_eq!(scale.get_size_for_value(Some(-1.0)), 1.0);
}

#[test]
fn test_invalid_range_rejected() {
    let err = SizeScaleOptions::from_value("size", json!({"range": [2, -4]})).unwrap_err();
    assert!(matches!(err, ScaleError::InvalidSizeRange(_)));
    let err = SizeScaleOptions::from_value("size", json!({"range": "big"})).unwrap_err();
    assert!(matches!(err, ScaleError::InvalidOptions { .. }));
}

#[test]
fn test_markers_one_per_tick() {
    let mut scale = size_scale(json!({}), &[0.0, 100.0]);
    scale.legend_mut().update(400.0, 300.0);
    let ticks = scale.legend().ticks().to_vec();
    let markers = scale.indicator_markers();
    assert!(!ticks.is_empty());
    assert_eq!(markers.len(), ticks.len());
    for (marker, tick) in markers.iter().zip(&ticks) {
        assert_eq!(marker.y, 21.0);
        assert_approx_eq!(f64, marker.options.radius, scale.get_size_for_value(Some(tick.value)));
        assert_eq!(marker.options.background_color, Color::BLUE);
        assert_eq!(marker.options.border_width, 0.0);
    }
    assert_eq!(markers.first().unwrap().x, 0.0);
    assert_approx_eq!(f64, markers.last().unwrap().x, 90.0);

    let lines = scale.indicator_tick_lines();
    assert_eq!(lines.len(), ticks.len());
    assert!(lines.iter().all(|l| l[1] == 21.0 && l[3] == 42.0 && l[0] == l[2]));
}

#[test]
fn test_markers_use_model_style() {
    let mut scale = size_scale(json!({"grid": {"drawTicks": false}}), &[0.0, 100.0]);
    scale.set_model(Some(PointOptions {
        point_style: PointStyle::RectRot,
        background_color: Color::WHITE,
        ..Default::default()
    }));
    scale.legend_mut().update(400.0, 300.0);
    let markers = scale.indicator_markers();
    assert!(markers.iter().all(|m| m.options.point_style == PointStyle::RectRot));
    assert!(markers.iter().all(|m| m.options.background_color == Color::WHITE));
    assert!(scale.indicator_tick_lines().is_empty());
}

#[test]
fn test_horizontal_legend_position() {
    let mut scale = size_scale(json!({}), &[0.0, 100.0]);
    scale.legend_mut().update(400.0, 300.0);
    let legend = scale.legend();
    assert_eq!(legend.legend_size().w, 90.0);
    assert_eq!(legend.legend_size().h, 28.0);
    let [x, y] = legend.resolve_legend_position(&ChartArea::from_size(400.0, 300.0));
    assert_approx_eq!(f64, x, 400.0 - 132.0 - 8.0);
    assert_approx_eq!(f64, y, 300.0 - legend.height() - 8.0);
}
