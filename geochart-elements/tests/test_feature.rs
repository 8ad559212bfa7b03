use std::sync::Arc;

use float_cmp::assert_approx_eq;
use geo_types::polygon;
use geochart_canvas::{DrawCommand, RecordingCanvas};
use geochart_common::{ChartArea, Color};
use geochart_elements::{FeatureStyle, GeoFeature, GeoFeatureOptions, UpdateMode};
use geochart_projection::{
    Feature, GeoObject, ProjectionKind, ProjectionScale, ProjectionScaleOptions,
};
use serde_json::json;

/// Equirectangular world fitted so one degree is about two pixels and
/// `[0, 0]` lands on `(360, 180)`
fn world_scale() -> ProjectionScale {
    let mut scale = ProjectionScale::new(ProjectionScaleOptions {
        projection: ProjectionKind::Equirectangular.into(),
        ..Default::default()
    });
    scale.compute_bounds(&GeoObject::Sphere);
    scale
        .update_bounds(&ChartArea::from_size(720.0, 360.0))
        .unwrap();
    scale
}

fn square() -> Arc<GeoObject> {
    Arc::new(GeoObject::Feature(Feature::from_geometry(polygon![
        (x: 0.0, y: 0.0),
        (x: 10.0, y: 0.0),
        (x: 10.0, y: 10.0),
        (x: 0.0, y: 10.0),
    ])))
}

fn triangle() -> Arc<GeoObject> {
    Arc::new(GeoObject::Feature(Feature::from_geometry(polygon![
        (x: 0.0, y: 0.0),
        (x: 20.0, y: 0.0),
        (x: 0.0, y: 20.0),
    ])))
}

fn styled(feature: Arc<GeoObject>, scale: &ProjectionScale) -> GeoFeature {
    let mut element = GeoFeature::new();
    element.style = FeatureStyle {
        background_color: Some(Color::BLUE),
        border_color: Some(Color::BLACK),
        border_width: 2.0,
    };
    element.set_geometry(scale, feature, None, 1.0, UpdateMode::Default);
    element
}

#[test]
fn test_geometry_change_detection() {
    let scale = world_scale();
    let feature = square();
    let mut element = GeoFeature::new();

    assert!(element.set_geometry(&scale, feature.clone(), None, 1.0, UpdateMode::Default));
    assert!(!element.set_geometry(&scale, feature.clone(), None, 1.0, UpdateMode::Default));

    // an equal but distinct feature counts as a change
    assert!(element.set_geometry(&scale, square(), None, 1.0, UpdateMode::Default));
    let feature = element.feature().unwrap().clone();

    assert!(element.set_geometry(&scale, feature.clone(), Some([1.0, 1.0]), 1.0, UpdateMode::Default));
    assert!(element.set_geometry(&scale, feature.clone(), Some([1.0, 1.0]), 2.0, UpdateMode::Default));
    assert!(element.set_geometry(&scale, feature.clone(), Some([1.0, 1.0]), 2.0, UpdateMode::Resize));
    assert!(element.set_geometry(&scale, feature.clone(), Some([1.0, 1.0]), 2.0, UpdateMode::Reset));
    assert!(!element.set_geometry(&scale, feature.clone(), Some([1.0, 1.0]), 2.0, UpdateMode::Active));

    let other_scale = world_scale();
    assert!(element.set_geometry(&other_scale, feature, Some([1.0, 1.0]), 2.0, UpdateMode::Default));
}

#[test]
fn test_center_point() {
    let scale = world_scale();
    let mut element = GeoFeature::new();
    element.set_geometry(&scale, square(), None, 1.0, UpdateMode::Default);
    assert_approx_eq!(f64, element.x, 370.0, epsilon = 1.0);
    assert_approx_eq!(f64, element.y, 170.0, epsilon = 1.0);

    element.set_geometry(&scale, square(), Some([0.0, 0.0]), 1.0, UpdateMode::Default);
    assert_approx_eq!(f64, element.x, 360.0, epsilon = 1.0);
    assert_approx_eq!(f64, element.y, 180.0, epsilon = 1.0);
    assert_eq!(element.get_center_point(&scale), [element.x, element.y]);
}

#[test]
fn test_bounds_include_half_border() {
    let scale = world_scale();
    let mut element = styled(square(), &scale);
    let bounds = element.get_bounds(&scale);
    assert_approx_eq!(f64, bounds.x, 359.0, epsilon = 1.0);
    assert_approx_eq!(f64, bounds.x2, 381.0, epsilon = 1.0);
    assert_approx_eq!(f64, bounds.y, 159.0, epsilon = 1.0);
    assert_approx_eq!(f64, bounds.y2, 181.0, epsilon = 1.0);

    let plain = scale.geo_path().bounds(&square());
    assert_approx_eq!(f64, bounds.width, plain.width + 2.0, epsilon = 1e-9);
}

#[test]
fn test_in_range() {
    let scale = world_scale();
    let mut element = styled(triangle(), &scale);

    // inside the shape
    assert!(element.in_range(365.0, 175.0, &scale));
    // inside the box but across the hypotenuse
    assert!(!element.in_range(395.0, 145.0, &scale));
    // outside the box
    assert!(!element.in_range(300.0, 175.0, &scale));

    // an unknown axis always passes
    assert!(element.in_range(395.0, f64::NAN, &scale));
    assert!(element.in_range(f64::NAN, f64::NAN, &scale));
    assert!(element.in_x_range(395.0, &scale));
    assert!(!element.in_x_range(300.0, &scale));
    assert!(element.in_y_range(150.0, &scale));
    assert!(!element.in_y_range(200.0, &scale));
}

#[test]
fn test_draw_blits_cached_raster() {
    let scale = world_scale();
    let mut element = styled(square(), &scale);
    let mut canvas = RecordingCanvas::new(1.0);
    element.draw(&mut canvas, &scale);

    let bounds = element.get_bounds(&scale);
    let x1 = bounds.x.floor();
    let y1 = bounds.y.floor();
    let expected_w = (bounds.x + bounds.width).ceil() - x1;
    let expected_h = (bounds.y + bounds.height).ceil() - y1;
    assert_eq!(
        canvas.commands,
        vec![DrawCommand::DrawImage {
            x: x1,
            y: y1,
            width: expected_w,
            height: expected_h,
            image_width: expected_w as u32,
            image_height: expected_h as u32,
        }]
    );
    assert_eq!(element.cache().unwrap().raster_key(), Some(&element.style_key()));
}

#[test]
fn test_raster_follows_pixel_ratio() {
    let scale = world_scale();
    let mut element = styled(square(), &scale);
    let feature = element.feature().unwrap().clone();
    element.set_geometry(&scale, feature, None, 2.0, UpdateMode::Default);

    let mut canvas = RecordingCanvas::new(2.0);
    element.draw(&mut canvas, &scale);
    match &canvas.commands[..] {
        [DrawCommand::DrawImage {
            width,
            image_width,
            ..
        }] => assert_eq!(*image_width, (width * 2.0).ceil() as u32),
        other => panic!("unexpected commands {other:?}"),
    }
}

#[test]
fn test_style_change_rebuilds_raster() {
    let scale = world_scale();
    let mut element = styled(square(), &scale);
    let mut canvas = RecordingCanvas::new(1.0);
    element.draw(&mut canvas, &scale);
    let first = element.cache().unwrap().raster_key().cloned();

    element.style.background_color = Some(Color::WHITE);
    element.draw(&mut canvas, &scale);
    let second = element.cache().unwrap().raster_key().cloned();
    assert_ne!(first, second);
    assert_eq!(second, Some(element.style_key()));
    assert_eq!(canvas.commands.len(), 2);
}

#[test]
fn test_cache_cleared_after_refit() {
    let mut scale = world_scale();
    let mut element = styled(square(), &scale);
    let before = element.get_bounds(&scale);

    assert!(scale
        .update_bounds(&ChartArea::from_size(360.0, 180.0))
        .unwrap());
    // stale until the owner drops the cache
    assert_eq!(element.get_bounds(&scale), before);

    element.clear_cache();
    assert!(element.cache().is_none());
    let after = element.get_bounds(&scale);
    assert_approx_eq!(f64, after.width - 2.0, (before.width - 2.0) / 2.0, epsilon = 0.5);
}

#[test]
fn test_draw_without_feature_is_noop() {
    let scale = world_scale();
    let mut element = GeoFeature::new();
    let mut canvas = RecordingCanvas::new(1.0);
    element.draw(&mut canvas, &scale);
    assert!(canvas.commands.is_empty());
    assert!(element.cache().is_none());
}

#[test]
fn test_options_defaults_and_overrides() {
    let defaults = GeoFeatureOptions::default();
    assert_eq!(defaults.outline_style().background_color, None);
    assert_eq!(
        defaults.graticule_style().color,
        Color::from_rgb8(0xcc, 0xcc, 0xcc)
    );
    assert_approx_eq!(f64, defaults.graticule_style().width, 1.0);

    let options: GeoFeatureOptions = serde_json::from_value(json!({
        "outlineBackgroundColor": "white",
        "outlineBorderWidth": 3,
        "borderWidth": 0.5
    }))
    .unwrap();
    let outline = options.outline_style();
    assert_eq!(outline.background_color, Some(Color::WHITE));
    assert_approx_eq!(f64, outline.border_width, 3.0);
    assert_approx_eq!(f64, options.feature_style().border_width, 0.5);
}
