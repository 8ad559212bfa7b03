use geochart_canvas::{fonts_available, Canvas, DrawCommand, RecordingCanvas, SkiaCanvas};
use geochart_common::ChartArea;
use geochart_guides::{draw_color_legend, draw_legend_axis, draw_size_legend, indicator_offset};
use geochart_scales::{
    ColorLinearScale, ColorRamp, ColorScaleOptions, LegendAlign, LegendOptions, LegendScale,
    LinearValueScale, SizeLinearScale,
};
use rstest::rstest;
use serde_json::json;

fn color_scale(options: serde_json::Value) -> ColorLinearScale {
    let mut scale = ColorLinearScale::new(ColorScaleOptions::from_value("color", options).unwrap());
    scale.legend_mut().determine_data_limits(&[0.0, 100.0]);
    scale.legend_mut().update(400.0, 200.0);
    scale
}

fn size_scale() -> SizeLinearScale {
    let mut scale = SizeLinearScale::default();
    scale.legend_mut().determine_data_limits(&[0.0, 100.0]);
    scale.legend_mut().update(400.0, 200.0);
    scale
}

#[test]
fn test_color_legend_command_sequence() {
    let scale = color_scale(json!({}));
    let area = ChartArea::from_size(400.0, 200.0);
    let mut canvas = RecordingCanvas::new(1.0);
    draw_color_legend(&mut canvas, &scale, &area);

    let [x, y] = scale.legend().resolve_legend_position(&area);
    assert_eq!(canvas.commands[0], DrawCommand::Save);
    assert_eq!(canvas.commands[1], DrawCommand::Translate { dx: x, dy: y });
    assert!(canvas
        .commands
        .contains(&DrawCommand::Translate { dx: -10.0, dy: 0.0 }));
    assert_eq!(canvas.fill_rects().len(), 100);
    assert_eq!(canvas.commands.last(), Some(&DrawCommand::Restore));
}

#[test]
fn test_hidden_legend_draws_nothing() {
    let scale = color_scale(json!({"display": false}));
    let mut canvas = RecordingCanvas::new(1.0);
    draw_color_legend(&mut canvas, &scale, &ChartArea::from_size(400.0, 200.0));
    assert!(canvas.commands.is_empty());
}

#[rstest]
#[case("left")]
#[case("right")]
#[case("top")]
#[case("bottom")]
fn test_indicator_is_adjacent_to_axis(#[case] align: &str) {
    let scale = color_scale(json!({"legend": {"align": align}}));
    let legend = scale.legend();
    let size = legend.legend_size();
    let iw = legend.legend().indicator_width;
    let expected = match legend.legend().align {
        LegendAlign::Left => [size.w, 0.0],
        LegendAlign::Top => [0.0, size.h],
        LegendAlign::Bottom => [0.0, -iw],
        LegendAlign::Right => [-iw, 0.0],
    };
    assert_eq!(indicator_offset(legend), expected);
}

#[test]
fn test_color_bar_pixels() {
    let scale = color_scale(json!({}));
    let area = ChartArea::from_size(400.0, 200.0);
    let mut canvas = SkiaCanvas::new(400.0, 200.0, 1.0).unwrap();
    draw_color_legend(&mut canvas, &scale, &area);

    let [x, y] = scale.legend().resolve_legend_position(&area);
    let column = (x - 5.0).floor() as u32;
    let row = (y + 50.0) as u32;
    let pixel = canvas.pixmap().pixel(column, row).unwrap();

    // row 50 of a 100px bar drawn bottom to top holds slice 49
    let expected = ColorRamp::Blues.interpolate(49.5 / 100.0).to_rgb8();
    for (actual, expected) in [pixel.red(), pixel.green(), pixel.blue()]
        .into_iter()
        .zip(expected)
    {
        assert!(actual.abs_diff(expected) <= 2, "{actual} vs {expected}");
    }
    assert_eq!(pixel.alpha(), 255);
}

#[test]
fn test_size_legend_markers_and_ticks() {
    let scale = size_scale();
    let mut canvas = RecordingCanvas::new(1.0);
    draw_size_legend(&mut canvas, &scale, &ChartArea::from_size(400.0, 200.0));

    let ticks = scale.legend().ticks().len();
    assert!(ticks >= 2);
    assert_eq!(
        canvas.count(|c| matches!(c, DrawCommand::FillText { .. })),
        ticks
    );
    // one filled circle per tick, default markers have no border
    assert_eq!(
        canvas.count(|c| matches!(c, DrawCommand::FillPath { .. })),
        ticks
    );
    // axis border, axis ticks and marker strip ticks
    assert_eq!(
        canvas.count(|c| matches!(c, DrawCommand::StrokePath { .. })),
        1 + 2 * ticks
    );
    assert!(canvas
        .commands
        .contains(&DrawCommand::Translate { dx: 0.0, dy: -42.0 }));
}

#[test]
fn test_axis_labels_are_rasterized() {
    if !fonts_available() {
        return;
    }
    let mut legend = LegendScale::<LinearValueScale>::new(
        serde_json::from_value(json!({
            "grid": {"display": false},
            "border": {"display": false},
            "ticks": {"color": "black"}
        }))
        .unwrap(),
        LegendOptions::default(),
    );
    legend.determine_data_limits(&[0.0, 1000.0]);
    legend.update(400.0, 200.0);
    assert!(legend.ticks().len() >= 2);

    let mut canvas = SkiaCanvas::new(100.0, 120.0, 1.0).unwrap();
    canvas.translate(0.0, 10.0);
    draw_legend_axis(&mut canvas, &legend);

    // only labels paint, starting after the tick padding
    let pixmap = canvas.pixmap();
    let painted: Vec<(u32, u32)> = (0..pixmap.height())
        .flat_map(|y| (0..pixmap.width()).map(move |x| (x, y)))
        .filter(|(x, y)| pixmap.pixel(*x, *y).unwrap().alpha() > 0)
        .collect();
    assert!(!painted.is_empty());
    assert!(painted.iter().all(|(x, _)| *x >= 2));
    assert!(painted.iter().all(|(x, _)| f64::from(*x) <= legend.legend_size().w + 2.0));

    // labels sit on both ends of the vertical axis
    let rows: Vec<u32> = painted.iter().map(|(_, y)| *y).collect();
    assert!(*rows.iter().min().unwrap() < 20);
    assert!(*rows.iter().max().unwrap() > 100);
}
