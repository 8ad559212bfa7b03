use std::sync::Arc;

use geochart_canvas::{Canvas, Pixmap, SkiaCanvas, StrokeStyle};
use geochart_common::{Color, PixelBounds};
use geochart_projection::{GeoObject, ProjectionScale};
use ordered_float::OrderedFloat;
use serde::Deserialize;

use crate::mode::UpdateMode;

fn default_color() -> Option<Color> {
    Some(Color::new(0.0, 0.0, 0.0, 0.1))
}

fn default_graticule_color() -> Color {
    Color::from_rgb8(0xcc, 0xcc, 0xcc)
}

/// Options of map features, including the variants used for the outline and
/// the graticule of a map.
///
/// An unset `background_color` lets the chart type pick the fill, e.g. the
/// color scale of a choropleth.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeoFeatureOptions {
    pub background_color: Option<Color>,
    pub border_color: Option<Color>,
    pub border_width: f64,
    pub outline_background_color: Option<Color>,
    pub outline_border_color: Option<Color>,
    pub outline_border_width: f64,
    pub graticule_border_color: Color,
    pub graticule_border_width: f64,
}

impl Default for GeoFeatureOptions {
    fn default() -> Self {
        Self {
            background_color: None,
            border_color: default_color(),
            border_width: 0.0,
            outline_background_color: None,
            outline_border_color: default_color(),
            outline_border_width: 0.0,
            graticule_border_color: default_graticule_color(),
            graticule_border_width: 0.0,
        }
    }
}

impl GeoFeatureOptions {
    /// Style of a data feature
    pub fn feature_style(&self) -> FeatureStyle {
        FeatureStyle {
            background_color: self.background_color,
            border_color: self.border_color,
            border_width: self.border_width,
        }
    }

    /// Style of the map outline, taken from the `outline*` options
    pub fn outline_style(&self) -> FeatureStyle {
        FeatureStyle {
            background_color: self.outline_background_color,
            border_color: self.outline_border_color,
            border_width: self.outline_border_width,
        }
    }

    /// Stroke of the graticule lines
    pub fn graticule_style(&self) -> StrokeStyle {
        StrokeStyle::new(
            self.graticule_border_color,
            hairline(self.graticule_border_width),
        )
    }
}

/// Non-positive widths draw a hairline, as a 2D canvas does
fn hairline(width: f64) -> f64 {
    if width > 0.0 {
        width
    } else {
        1.0
    }
}

/// Resolved paint of a single feature
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureStyle {
    pub background_color: Option<Color>,
    pub border_color: Option<Color>,
    pub border_width: f64,
}

/// Everything a cached raster depends on besides the geometry
#[derive(Debug, Clone, PartialEq)]
pub struct StyleKey {
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub stroke_width: OrderedFloat<f64>,
    pub pixel_ratio: OrderedFloat<f64>,
}

#[derive(Debug, Clone)]
struct CachedRaster {
    key: StyleKey,
    pixmap: Pixmap,
}

/// Pixel geometry and raster derived from the current projection fit
#[derive(Debug, Clone, Default)]
pub struct RenderCache {
    pub center: Option<[f64; 2]>,
    pub bounds: Option<PixelBounds>,
    raster: Option<CachedRaster>,
}

impl RenderCache {
    pub fn raster_key(&self) -> Option<&StyleKey> {
        self.raster.as_ref().map(|r| &r.key)
    }

    pub fn raster_size(&self) -> Option<(u32, u32)> {
        self.raster
            .as_ref()
            .map(|r| (r.pixmap.width(), r.pixmap.height()))
    }
}

/// Integer pixel box enclosing `bounds`
fn snapped(bounds: &PixelBounds) -> (f64, f64, f64, f64) {
    let x1 = bounds.x.floor();
    let y1 = bounds.y.floor();
    let x2 = (bounds.x + bounds.width).ceil();
    let y2 = (bounds.y + bounds.height).ceil();
    (x1, y1, x2, y2)
}

/// A geographic shape drawn through the projection scale.
///
/// Pixel space results (center, bounds and a pre-rendered raster) are cached
/// until the geometry inputs change or the owner clears the cache after a
/// projection refit.
#[derive(Debug, Clone)]
pub struct GeoFeature {
    /// Pixel center from the last geometry update
    pub x: f64,
    pub y: f64,
    pub style: FeatureStyle,
    scale_id: Option<u64>,
    feature: Option<Arc<GeoObject>>,
    center: Option<[f64; 2]>,
    pixel_ratio: f64,
    cache: Option<RenderCache>,
}

impl Default for GeoFeature {
    fn default() -> Self {
        Self {
            x: f64::NAN,
            y: f64::NAN,
            style: FeatureStyle::default(),
            scale_id: None,
            feature: None,
            center: None,
            pixel_ratio: 1.0,
            cache: None,
        }
    }
}

impl GeoFeature {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feature(&self) -> Option<&Arc<GeoObject>> {
        self.feature.as_ref()
    }

    /// Longitude/latitude overriding the computed centroid
    pub fn center(&self) -> Option<[f64; 2]> {
        self.center
    }

    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    pub fn cache(&self) -> Option<&RenderCache> {
        self.cache.as_ref()
    }

    pub fn clear_cache(&mut self) {
        self.cache = None;
    }

    /// Replace the geometry inputs and return whether any of them changed.
    ///
    /// Features are compared by identity. A change, or a reset/resize update,
    /// drops the whole cache.
    pub fn set_geometry(
        &mut self,
        scale: &ProjectionScale,
        feature: Arc<GeoObject>,
        center: Option<[f64; 2]>,
        pixel_ratio: f64,
        mode: UpdateMode,
    ) -> bool {
        let same_feature = self
            .feature
            .as_ref()
            .is_some_and(|f| Arc::ptr_eq(f, &feature));
        let changed = mode.invalidates_geometry()
            || self.scale_id != Some(scale.id())
            || !same_feature
            || self.center != center
            || self.pixel_ratio != pixel_ratio;

        self.scale_id = Some(scale.id());
        self.feature = Some(feature);
        self.center = center;
        self.pixel_ratio = pixel_ratio;
        if changed {
            self.cache = None;
        }
        let [x, y] = self.get_center_point(scale);
        self.x = x;
        self.y = y;
        changed
    }

    fn cache_mut(&mut self) -> &mut RenderCache {
        self.cache.get_or_insert_with(RenderCache::default)
    }

    /// Pixel center: the projected center override, or else the centroid of
    /// the projected feature
    pub fn get_center_point(&mut self, scale: &ProjectionScale) -> [f64; 2] {
        if let Some(center) = self.cache.as_ref().and_then(|c| c.center) {
            return center;
        }
        let center = match (self.center, &self.feature) {
            (Some(lon_lat), _) => scale.project(lon_lat),
            (None, Some(feature)) => scale.geo_path().centroid(feature),
            (None, None) => None,
        }
        .unwrap_or([f64::NAN, f64::NAN]);
        self.cache_mut().center = Some(center);
        center
    }

    /// Pixel bounding box grown by half the border width
    pub fn get_bounds(&mut self, scale: &ProjectionScale) -> PixelBounds {
        if let Some(bounds) = self.cache.as_ref().and_then(|c| c.bounds) {
            return bounds;
        }
        let bounds = match &self.feature {
            Some(feature) => scale
                .geo_path()
                .bounds(feature)
                .grow(self.style.border_width / 2.0),
            None => PixelBounds::empty(),
        };
        self.cache_mut().bounds = Some(bounds);
        bounds
    }

    /// Hit test in pixels. A NaN coordinate matches anything on that axis.
    ///
    /// Inside the bounding box, invertible projections refine the test with
    /// exact containment of the inverted location.
    pub fn in_range(&mut self, x: f64, y: f64, scale: &ProjectionScale) -> bool {
        let bb = self.get_bounds(scale);
        let r = (x.is_nan() || bb.contains_x(x)) && (y.is_nan() || bb.contains_y(y));
        if r && !x.is_nan() && !y.is_nan() && scale.projection().has_invert() {
            return match (scale.invert([x, y]), &self.feature) {
                (Some(lon_lat), Some(feature)) => feature.contains(lon_lat),
                _ => false,
            };
        }
        r
    }

    pub fn in_x_range(&mut self, x: f64, scale: &ProjectionScale) -> bool {
        self.in_range(x, f64::NAN, scale)
    }

    pub fn in_y_range(&mut self, y: f64, scale: &ProjectionScale) -> bool {
        self.in_range(f64::NAN, y, scale)
    }

    pub fn style_key(&self) -> StyleKey {
        StyleKey {
            fill: self.style.background_color,
            stroke: self.style.border_color,
            stroke_width: OrderedFloat(self.style.border_width),
            pixel_ratio: OrderedFloat(self.pixel_ratio),
        }
    }

    fn draw_impl(&self, canvas: &mut dyn Canvas, scale: &ProjectionScale) {
        let Some(feature) = &self.feature else {
            return;
        };
        let path = scale.geo_path().path(feature);
        if let Some(fill) = self.style.background_color {
            canvas.fill_path(&path, fill);
        }
        if let Some(stroke) = self.style.border_color {
            canvas.stroke_path(
                &path,
                &StrokeStyle::new(stroke, hairline(self.style.border_width)),
            );
        }
    }

    /// Render the feature into a fresh raster covering its bounds
    fn draw_in_cache(&mut self, scale: &ProjectionScale) {
        let bounds = self.get_bounds(scale);
        if !bounds.is_finite() {
            self.cache_mut().raster = None;
            return;
        }
        let (x1, y1, x2, y2) = snapped(&bounds);
        let ratio = if self.pixel_ratio > 0.0 {
            self.pixel_ratio
        } else {
            1.0
        };
        let width = ((x2 - x1).max(1.0) * ratio).ceil();
        let height = ((y2 - y1).max(1.0) * ratio).ceil();
        if !(width > 0.0 && height > 0.0) {
            return;
        }
        let Some(pixmap) = Pixmap::new(width as u32, height as u32) else {
            tracing::debug!("Unable to allocate a {width}x{height} feature raster, drawing directly");
            self.cache_mut().raster = None;
            return;
        };

        let mut offscreen = SkiaCanvas::from_pixmap(pixmap, ratio);
        offscreen.translate(-x1, -y1);
        self.draw_impl(&mut offscreen, scale);

        let key = self.style_key();
        self.cache_mut().raster = Some(CachedRaster {
            key,
            pixmap: offscreen.into_pixmap(),
        });
    }

    /// Draw from the raster cache, re-rendering it when the style changed.
    /// Without a raster the path is drawn directly if its bounds are finite.
    pub fn draw(&mut self, canvas: &mut dyn Canvas, scale: &ProjectionScale) {
        if self.feature.is_none() {
            return;
        }
        let key = self.style_key();
        let stale = self
            .cache
            .as_ref()
            .and_then(RenderCache::raster_key)
            .map_or(true, |cached| *cached != key);
        if stale {
            self.draw_in_cache(scale);
        }

        let bounds = self.get_bounds(scale);
        match self.cache.as_ref().and_then(|c| c.raster.as_ref()) {
            Some(raster) => {
                let (x1, y1, x2, y2) = snapped(&bounds);
                if x2 - x1 > 0.0 && y2 - y1 > 0.0 {
                    canvas.draw_image(&raster.pixmap, x1, y1, x2 - x1, y2 - y1);
                }
            }
            None if bounds.is_finite() => {
                canvas.save();
                self.draw_impl(canvas, scale);
                canvas.restore();
            }
            None => {}
        }
    }
}
