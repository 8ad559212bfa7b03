use std::str::FromStr;

use geochart_canvas::{draw_point, DrawCommand, PointOptions, PointStyle, RecordingCanvas};
use rstest::rstest;

#[rstest]
#[case("circle", PointStyle::Circle)]
#[case("crossRot", PointStyle::CrossRot)]
#[case("rectRot", PointStyle::RectRot)]
#[case("triangle", PointStyle::Triangle)]
fn test_point_style_names(#[case] name: &str, #[case] expected: PointStyle) {
    assert_eq!(PointStyle::from_str(name).unwrap(), expected);
}

#[test]
fn test_filled_point_fills_and_strokes() {
    let mut canvas = RecordingCanvas::new(1.0);
    draw_point(&mut canvas, &PointOptions::default(), 10.0, 10.0);
    assert_eq!(canvas.commands.len(), 2);
    assert!(matches!(canvas.commands[0], DrawCommand::FillPath { .. }));
    assert!(matches!(canvas.commands[1], DrawCommand::StrokePath { .. }));
}

#[test]
fn test_stroke_only_point_is_not_filled() {
    let mut canvas = RecordingCanvas::new(1.0);
    let options = PointOptions {
        point_style: PointStyle::Cross,
        ..Default::default()
    };
    draw_point(&mut canvas, &options, 10.0, 10.0);
    assert_eq!(canvas.count(|c| matches!(c, DrawCommand::FillPath { .. })), 0);
    assert_eq!(
        canvas.commands,
        vec![DrawCommand::StrokePath {
            vertices: 4,
            stroke: geochart_canvas::StrokeStyle::new(options.border_color, 1.0)
        }]
    );
}

#[rstest]
#[case(0.0)]
#[case(-1.0)]
#[case(f64::NAN)]
fn test_degenerate_radius_draws_nothing(#[case] radius: f64) {
    let mut canvas = RecordingCanvas::new(1.0);
    let options = PointOptions {
        radius,
        ..Default::default()
    };
    draw_point(&mut canvas, &options, 10.0, 10.0);
    assert!(canvas.commands.is_empty());
}
