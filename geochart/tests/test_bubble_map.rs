use float_cmp::assert_approx_eq;
use geochart::{
    BubbleMapController, CanvasDimensions, Chart, ChartScale, ClipMap, Color, DatasetController,
    ElementHit, Registry, UpdateMode,
};
use geochart_canvas::{DrawCommand, RecordingCanvas};
use serde_json::{json, Value};

fn config() -> Value {
    json!({
        "type": "bubbleMap",
        "data": {
            "datasets": [{
                "data": [
                    {"longitude": 0, "latitude": 0, "value": 1},
                    {"longitude": 20, "latitude": 10, "value": 5},
                    {"x": 40, "y": -10, "value": 3},
                    {"latitude": 5, "value": 2}
                ]
            }]
        },
        "options": {
            "scales": {
                "projection": {"projection": "equirectangular"},
                "size": {"min": 0, "max": 10, "mode": "radius", "range": [2, 20]}
            }
        }
    })
}

fn chart(config: Value) -> Chart {
    let mut chart = Chart::from_json(
        config,
        &Registry::with_defaults(),
        CanvasDimensions::new(720.0, 360.0, 1.0),
    )
    .unwrap();
    chart.update(UpdateMode::Default).unwrap();
    chart
}

fn controller(chart: &Chart) -> &BubbleMapController {
    chart.controllers()[0]
        .as_any()
        .downcast_ref::<BubbleMapController>()
        .unwrap()
}

#[test]
fn test_positions_and_skips() {
    let chart = chart(config());
    let elements = controller(&chart).elements();
    let positions: Vec<_> = elements.iter().map(|e| (e.x.round(), e.y.round(), e.skip)).collect();
    assert_eq!(
        positions,
        vec![
            (360.0, 180.0, false),
            (400.0, 160.0, false),
            (440.0, 200.0, false),
            (0.0, 0.0, true),
        ]
    );
}

#[test]
fn test_unprojectable_location_skipped() {
    let mut config = config();
    config["options"]["scales"]["projection"] = json!({"projection": "albersUsa"});
    config["data"]["datasets"][0]["data"] = json!([
        {"longitude": -100, "latitude": 40, "value": 1},
        {"longitude": 0, "latitude": 0, "value": 2}
    ]);
    let chart = chart(config);
    let elements = controller(&chart).elements();
    assert!(!elements[0].skip);
    assert!(elements[0].x.is_finite() && elements[0].y.is_finite());
    assert!(elements[1].skip);
    assert_eq!((elements[1].x, elements[1].y), (0.0, 0.0));
}

#[test]
fn test_parse_falls_back_to_x_y() {
    let chart = chart(config());
    let parsed = controller(&chart).parsed();
    assert_approx_eq!(f64, parsed[2].longitude, 40.0);
    assert_approx_eq!(f64, parsed[2].latitude, -10.0);
    assert!(parsed[3].longitude.is_nan());
    assert_eq!(parsed[3].value, Some(2.0));
}

#[test]
fn test_radius_from_size_scale() {
    let chart = chart(config());
    let elements = controller(&chart).elements();
    assert_approx_eq!(f64, elements[0].options.radius, 3.8, epsilon = 1e-9);
    assert_approx_eq!(f64, elements[1].options.radius, 11.0);
    assert_approx_eq!(f64, elements[1].options.hover_radius, 12.0);
}

#[test]
fn test_explicit_radius_wins() {
    let mut config = config();
    config["data"]["datasets"][0]["radius"] = json!(7);
    let chart = chart(config);
    assert!(controller(&chart)
        .elements()
        .iter()
        .all(|e| e.options.radius == 7.0));
}

#[test]
fn test_reset_collapses_bubbles() {
    let mut chart = chart(config());
    chart.update(UpdateMode::Reset).unwrap();
    assert!(controller(&chart)
        .elements()
        .iter()
        .all(|e| e.options.radius == 0.0));

    chart.update(UpdateMode::Default).unwrap();
    assert_approx_eq!(f64, controller(&chart).elements()[1].options.radius, 11.0);
}

#[test]
fn test_size_legend_uses_first_bubble_style() {
    let mut config = config();
    config["data"]["datasets"][0]["backgroundColor"] = json!("orange");
    let chart = chart(config);
    let ChartScale::Size(scale) = chart.scale("size").unwrap() else {
        panic!("expected a linear size scale");
    };
    let model = scale.model().unwrap();
    assert_eq!(model.background_color, Color::from_rgb8(255, 165, 0));
    assert_approx_eq!(f64, model.radius, 3.8, epsilon = 1e-9);
}

#[test]
fn test_skipped_bubbles_are_not_drawn() {
    let mut config = config();
    config["options"]["scales"]["size"]["display"] = json!(false);
    let mut chart = chart(config);
    let mut canvas = RecordingCanvas::new(1.0);
    chart.draw(&mut canvas).unwrap();
    assert_eq!(
        canvas.count(|c| matches!(c, DrawCommand::FillPath { .. })),
        3
    );
}

#[test]
fn test_elements_at() {
    let mut chart = chart(config());
    assert_eq!(
        chart.elements_at(401.0, 161.0).unwrap(),
        vec![ElementHit {
            dataset_index: 0,
            index: 1
        }]
    );
    assert!(chart.elements_at(0.0, 0.0).unwrap().is_empty());
}

#[test]
fn test_defaults_draw_outline() {
    let chart = chart(config());
    let settings = controller(&chart).geo().settings();
    assert!(settings.show_outline);
    assert_eq!(settings.clip_map, ClipMap::OutlineGraticule);
}
