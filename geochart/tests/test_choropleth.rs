use geochart::{
    CanvasDimensions, Chart, ChoroplethController, Color, ElementHit, GeoChartError, Registry,
    UpdateMode,
};
use geochart_canvas::{DrawCommand, RecordingCanvas};
use geochart_elements::GeoFeature;
use geochart_scales::ColorRamp;
use serde_json::{json, Value};

fn square(lon: f64, lat: f64, size: f64) -> Value {
    json!({
        "type": "Feature",
        "properties": {},
        "geometry": {
            "type": "Polygon",
            "coordinates": [[
                [lon, lat],
                [lon + size, lat],
                [lon + size, lat + size],
                [lon, lat + size],
                [lon, lat]
            ]]
        }
    })
}

fn config() -> Value {
    json!({
        "type": "choropleth",
        "data": {
            "labels": ["a", "b", "c"],
            "datasets": [{
                "label": "regions",
                "data": [
                    {"feature": square(0.0, 0.0, 10.0), "value": 0},
                    {"feature": square(20.0, 0.0, 10.0), "value": 10},
                    {"feature": square(40.0, 0.0, 10.0)}
                ]
            }]
        },
        "options": {
            "scales": {
                "projection": {"projection": "equirectangular"},
                "color": {"min": 0, "max": 10, "missing": "#ff0000"}
            }
        }
    })
}

/// 720x360 canvas: one degree is about two pixels and `[0, 0]` lands on
/// `(360, 180)`
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

fn controller(chart: &Chart) -> &ChoroplethController {
    chart.controllers()[0]
        .as_any()
        .downcast_ref::<ChoroplethController>()
        .unwrap()
}

#[test]
fn test_default_scales_created() {
    let chart = chart(config());
    assert_eq!(chart.chart_type(), "choropleth");
    let ids: Vec<_> = chart.scales().keys().map(String::as_str).collect();
    assert_eq!(ids, vec!["projection", "color"]);
    assert_eq!(chart.scale("color").unwrap().type_id(), "color");
}

#[test]
fn test_colors_from_value_scale() {
    let chart = chart(config());
    let controller = controller(&chart);
    assert_eq!(controller.parsed(), &[Some(0.0), Some(10.0), None]);

    let colors: Vec<_> = controller
        .elements()
        .iter()
        .map(|e| e.style.background_color)
        .collect();
    assert_eq!(
        colors,
        vec![
            Some(ColorRamp::Blues.interpolate(0.0)),
            Some(ColorRamp::Blues.interpolate(1.0)),
            Some(Color::from_rgb8(255, 0, 0)),
        ]
    );
}

#[test]
fn test_dataset_color_wins() {
    let mut config = config();
    config["data"]["datasets"][0]["backgroundColor"] = json!(["#00ff00", "#0000ff"]);
    let chart = chart(config);
    let colors: Vec<_> = controller(&chart)
        .elements()
        .iter()
        .map(|e| e.style.background_color)
        .collect();
    // per index options wrap around
    assert_eq!(
        colors,
        vec![
            Some(Color::from_rgb8(0, 255, 0)),
            Some(Color::from_rgb8(0, 0, 255)),
            Some(Color::from_rgb8(0, 255, 0)),
        ]
    );
}

#[test]
fn test_chart_element_color_wins_over_scale() {
    let mut config = config();
    config["options"]["elements"] = json!({"geoFeature": {"backgroundColor": "white"}});
    let chart = chart(config);
    assert!(controller(&chart)
        .elements()
        .iter()
        .all(|e| e.style.background_color == Some(Color::WHITE)));
}

#[test]
fn test_elements_centered_on_regions() {
    let chart = chart(config());
    let first = &controller(&chart).elements()[0];
    // centroid of [0..10]x[0..10], latitude grows upwards
    assert!((first.x - 370.0).abs() < 1.0, "x = {}", first.x);
    assert!((first.y - 170.0).abs() < 1.0, "y = {}", first.y);
}

#[test]
fn test_center_override() {
    let mut config = config();
    config["data"]["datasets"][0]["data"][0]["center"] = json!({"longitude": 0, "latitude": 0});
    let chart = chart(config);
    let first = &controller(&chart).elements()[0];
    assert!((first.x - 360.0).abs() < 1.0);
    assert!((first.y - 180.0).abs() < 1.0);
}

fn has_raster(element: &GeoFeature) -> bool {
    element.cache().and_then(|c| c.raster_key()).is_some()
}

#[test]
fn test_caches_survive_plain_updates_and_clear_on_resize() {
    let mut chart = chart(config());
    let mut canvas = RecordingCanvas::new(1.0);
    chart.draw(&mut canvas).unwrap();
    assert_eq!(
        canvas.count(|c| matches!(c, DrawCommand::DrawImage { .. })),
        3
    );
    assert!(controller(&chart).elements().iter().all(has_raster));

    chart.update(UpdateMode::Default).unwrap();
    assert!(controller(&chart).elements().iter().all(has_raster));

    chart.resize(360.0, 180.0).unwrap();
    assert!(controller(&chart)
        .elements()
        .iter()
        .all(|e| !has_raster(e)));
}

#[test]
fn test_elements_at() {
    let mut chart = chart(config());
    // inside the second square, [20..30]x[0..10]
    let hits = chart.elements_at(410.0, 170.0).unwrap();
    assert_eq!(
        hits,
        vec![ElementHit {
            dataset_index: 0,
            index: 1
        }]
    );
    assert!(chart.elements_at(10.0, 10.0).unwrap().is_empty());
}

#[test]
fn test_invalid_feature() {
    let mut config = config();
    config["data"]["datasets"][0]["data"][1]["feature"] = json!({"type": "Polygon"});
    let err = Chart::from_json(
        config,
        &Registry::with_defaults(),
        CanvasDimensions::new(720.0, 360.0, 1.0),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        GeoChartError::InvalidFeature {
            dataset_index: 0,
            index: 1,
            ..
        }
    ));
}

#[test]
fn test_color_scale_role_checked() {
    let mut config = config();
    config["options"]["scales"]["color"] = json!({"type": "size"});
    let mut chart = Chart::from_json(
        config,
        &Registry::with_defaults(),
        CanvasDimensions::new(720.0, 360.0, 1.0),
    )
    .unwrap();
    let err = chart.update(UpdateMode::Default).unwrap_err();
    assert!(matches!(
        err,
        GeoChartError::ScaleRoleMismatch { ref id, expected: "color" } if id == "color"
    ));
}

#[test]
fn test_logarithmic_color_scale() {
    let mut config = config();
    config["options"]["scales"]["color"] = json!({"type": "colorLogarithmic"});
    config["data"]["datasets"][0]["data"][0]["value"] = json!(1);
    config["data"]["datasets"][0]["data"][1]["value"] = json!(100);
    let chart = chart(config);
    assert_eq!(chart.scale("color").unwrap().type_id(), "colorLogarithmic");
    let elements = controller(&chart).elements();
    assert_ne!(
        elements[0].style.background_color,
        elements[1].style.background_color
    );
}
