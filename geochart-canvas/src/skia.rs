use geochart_common::Color;
use lyon_path::{Path, PathEvent};
use tiny_skia::{
    FillRule, FilterQuality, Mask, Paint, PathBuilder, Pixmap, PixmapPaint, Rect, Stroke,
    StrokeDash, Transform,
};

use crate::canvas::{Canvas, StrokeStyle, TextAlign, TextBaseline, TextStyle};
use crate::error::CanvasError;
use crate::text::rasterize_text;

#[derive(Clone)]
struct SkiaState {
    transform: Transform,
    mask: Option<Mask>,
}

/// Raster canvas backed by a `tiny_skia::Pixmap`.
///
/// The pixel ratio is applied as the base transform, so callers always draw
/// in logical pixels.
pub struct SkiaCanvas {
    pixmap: Pixmap,
    pixel_ratio: f64,
    state: SkiaState,
    stack: Vec<SkiaState>,
}

impl SkiaCanvas {
    /// Allocate a canvas of `width`x`height` logical pixels
    pub fn new(width: f64, height: f64, pixel_ratio: f64) -> Result<Self, CanvasError> {
        let physical_width = (width * pixel_ratio).ceil().max(0.0) as u32;
        let physical_height = (height * pixel_ratio).ceil().max(0.0) as u32;
        let pixmap = Pixmap::new(physical_width, physical_height).ok_or(
            CanvasError::AllocationFailed {
                width: physical_width,
                height: physical_height,
            },
        )?;
        Ok(Self::from_pixmap(pixmap, pixel_ratio))
    }

    /// Wrap an existing pixmap. No transform is applied beyond `pixel_ratio`.
    pub fn from_pixmap(pixmap: Pixmap, pixel_ratio: f64) -> Self {
        let transform = Transform::from_scale(pixel_ratio as f32, pixel_ratio as f32);
        Self {
            pixmap,
            pixel_ratio,
            state: SkiaState {
                transform,
                mask: None,
            },
            stack: Vec::new(),
        }
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn into_pixmap(self) -> Pixmap {
        self.pixmap
    }

    pub fn fill_background(&mut self, color: Color) {
        self.pixmap.fill(to_skia_color(color));
    }

    pub fn encode_png(&self) -> Result<Vec<u8>, CanvasError> {
        self.pixmap
            .encode_png()
            .map_err(|err| CanvasError::PngEncodingError(err.to_string()))
    }
}

impl Canvas for SkiaCanvas {
    fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    fn save(&mut self) {
        self.stack.push(self.state.clone());
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.state.transform = self.state.transform.pre_translate(dx as f32, dy as f32);
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.state.transform = self.state.transform.pre_scale(sx as f32, sy as f32);
    }

    fn clip_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let Some(rect) = Rect::from_xywh(x as f32, y as f32, width as f32, height as f32) else {
            return;
        };
        let path = PathBuilder::from_rect(rect);
        let transform = self.state.transform;
        match self.state.mask.as_mut() {
            Some(mask) => mask.intersect_path(&path, FillRule::Winding, true, transform),
            None => {
                let Some(mut mask) = Mask::new(self.pixmap.width(), self.pixmap.height()) else {
                    return;
                };
                mask.fill_path(&path, FillRule::Winding, true, transform);
                self.state.mask = Some(mask);
            }
        }
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color) {
        if color.is_transparent() {
            return;
        }
        let Some(rect) = Rect::from_xywh(x as f32, y as f32, width as f32, height as f32) else {
            return;
        };
        let paint = make_paint(color);
        self.pixmap
            .fill_rect(rect, &paint, self.state.transform, self.state.mask.as_ref());
    }

    fn fill_path(&mut self, path: &Path, color: Color) {
        if color.is_transparent() {
            return;
        }
        let Some(path) = to_skia_path(path) else {
            return;
        };
        let paint = make_paint(color);
        self.pixmap.fill_path(
            &path,
            &paint,
            FillRule::EvenOdd,
            self.state.transform,
            self.state.mask.as_ref(),
        );
    }

    fn stroke_path(&mut self, path: &Path, stroke: &StrokeStyle) {
        if stroke.is_empty() {
            return;
        }
        let Some(path) = to_skia_path(path) else {
            return;
        };
        let paint = make_paint(stroke.color);
        let dash = stroke.dash.as_ref().and_then(|dash| {
            StrokeDash::new(dash.iter().map(|v| *v as f32).collect(), 0.0)
        });
        let skia_stroke = Stroke {
            width: stroke.width as f32,
            dash,
            ..Default::default()
        };
        self.pixmap.stroke_path(
            &path,
            &paint,
            &skia_stroke,
            self.state.transform,
            self.state.mask.as_ref(),
        );
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, style: &TextStyle) {
        let ratio = self.pixel_ratio;
        let Some(raster) = rasterize_text(text, style.font_size * ratio, style.color) else {
            tracing::trace!("Nothing to paint for text {text:?} at ({x}, {y})");
            return;
        };
        // anchor box in logical pixels
        let width = raster.bounds.width / ratio;
        let height = raster.bounds.line_height / ratio;
        let left = match style.align {
            TextAlign::Left => x,
            TextAlign::Center => x - width / 2.0,
            TextAlign::Right => x - width,
        };
        let top = match style.baseline {
            TextBaseline::Top => y,
            TextBaseline::Middle => y - height / 2.0,
            TextBaseline::Bottom => y - height,
        };
        let padding = raster.padding as f64 / ratio;
        let inv = (1.0 / ratio) as f32;
        let transform = self
            .state
            .transform
            .pre_translate((left - padding) as f32, (top - padding) as f32)
            .pre_scale(inv, inv);
        self.pixmap.draw_pixmap(
            0,
            0,
            raster.pixmap.as_ref(),
            &PixmapPaint::default(),
            transform,
            self.state.mask.as_ref(),
        );
    }

    fn draw_image(&mut self, image: &Pixmap, x: f64, y: f64, width: f64, height: f64) {
        if image.width() == 0 || image.height() == 0 || width <= 0.0 || height <= 0.0 {
            return;
        }
        let sx = width as f32 / image.width() as f32;
        let sy = height as f32 / image.height() as f32;
        let transform = self
            .state
            .transform
            .pre_translate(x as f32, y as f32)
            .pre_scale(sx, sy);
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..Default::default()
        };
        self.pixmap.draw_pixmap(
            0,
            0,
            image.as_ref(),
            &paint,
            transform,
            self.state.mask.as_ref(),
        );
    }
}

fn to_skia_color(color: Color) -> tiny_skia::Color {
    let [r, g, b] = color.to_rgb8();
    let a = (color.alpha().clamp(0.0, 1.0) * 255.0).round() as u8;
    tiny_skia::Color::from_rgba8(r, g, b, a)
}

fn make_paint(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(to_skia_color(color));
    paint.anti_alias = true;
    paint
}

/// Convert a lyon path into a tiny-skia path. Returns None for empty paths.
pub fn to_skia_path(path: &Path) -> Option<tiny_skia::Path> {
    let mut builder = PathBuilder::new();
    for event in path.iter() {
        match event {
            PathEvent::Begin { at } => builder.move_to(at.x, at.y),
            PathEvent::Line { to, .. } => builder.line_to(to.x, to.y),
            PathEvent::Quadratic { ctrl, to, .. } => builder.quad_to(ctrl.x, ctrl.y, to.x, to.y),
            PathEvent::Cubic {
                ctrl1, ctrl2, to, ..
            } => builder.cubic_to(ctrl1.x, ctrl1.y, ctrl2.x, ctrl2.y, to.x, to.y),
            PathEvent::End { close, .. } => {
                if close {
                    builder.close()
                }
            }
        }
    }
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lyon_path::geom::point;

    fn pixel_at(canvas: &SkiaCanvas, x: u32, y: u32) -> [u8; 4] {
        let px = canvas
            .pixmap()
            .pixel(x, y)
            .unwrap()
            .demultiply();
        [px.red(), px.green(), px.blue(), px.alpha()]
    }

    #[test]
    fn test_fill_rect_respects_pixel_ratio() {
        let mut canvas = SkiaCanvas::new(10.0, 10.0, 2.0).unwrap();
        assert_eq!(canvas.pixmap().width(), 20);
        canvas.fill_rect(0.0, 0.0, 5.0, 5.0, Color::from_rgb8(255, 0, 0));
        assert_eq!(pixel_at(&canvas, 4, 4), [255, 0, 0, 255]);
        assert_eq!(pixel_at(&canvas, 15, 15)[3], 0);
    }

    #[test]
    fn test_clip_limits_fill() {
        let mut canvas = SkiaCanvas::new(10.0, 10.0, 1.0).unwrap();
        canvas.save();
        canvas.clip_rect(0.0, 0.0, 5.0, 10.0);
        canvas.fill_rect(0.0, 0.0, 10.0, 10.0, Color::from_rgb8(0, 0, 255));
        canvas.restore();
        assert_eq!(pixel_at(&canvas, 2, 5), [0, 0, 255, 255]);
        assert_eq!(pixel_at(&canvas, 8, 5)[3], 0);
    }

    #[test]
    fn test_draw_image_stretches() {
        let mut source = SkiaCanvas::new(2.0, 2.0, 1.0).unwrap();
        source.fill_background(Color::from_rgb8(0, 255, 0));
        let image = source.into_pixmap();

        let mut canvas = SkiaCanvas::new(10.0, 10.0, 1.0).unwrap();
        canvas.draw_image(&image, 2.0, 2.0, 6.0, 6.0);
        assert_eq!(pixel_at(&canvas, 5, 5), [0, 255, 0, 255]);
        assert_eq!(pixel_at(&canvas, 0, 0)[3], 0);
    }

    fn painted_bounds(canvas: &SkiaCanvas) -> Option<(u32, u32, u32, u32)> {
        let pixmap = canvas.pixmap();
        let mut bounds: Option<(u32, u32, u32, u32)> = None;
        for y in 0..pixmap.height() {
            for x in 0..pixmap.width() {
                if pixmap.pixel(x, y).unwrap().alpha() == 0 {
                    continue;
                }
                bounds = Some(match bounds {
                    None => (x, y, x, y),
                    Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
                });
            }
        }
        bounds
    }

    #[test]
    fn test_fill_text_paints_label() {
        if !crate::text::fonts_available() {
            return;
        }
        let mut canvas = SkiaCanvas::new(100.0, 40.0, 1.0).unwrap();
        let style = TextStyle {
            color: Color::BLACK,
            font_size: 14.0,
            align: TextAlign::Left,
            baseline: TextBaseline::Middle,
        };
        canvas.fill_text("1000", 10.0, 20.0, &style);

        let (x0, y0, x1, y1) = painted_bounds(&canvas).unwrap();
        assert!((8..=16).contains(&x0), "x0 = {x0}");
        assert!(x1 > x0 + 10 && x1 < 60, "x1 = {x1}");
        assert!(y0 >= 10 && y1 <= 30, "y = {y0}..{y1}");
    }

    #[test]
    fn test_fill_text_alignment() {
        if !crate::text::fonts_available() {
            return;
        }
        let style = TextStyle {
            color: Color::BLACK,
            font_size: 14.0,
            align: TextAlign::Right,
            baseline: TextBaseline::Middle,
        };
        let mut canvas = SkiaCanvas::new(100.0, 40.0, 2.0).unwrap();
        canvas.fill_text("42", 50.0, 20.0, &style);
        let (_, _, x1, _) = painted_bounds(&canvas).unwrap();
        // right aligned labels end at the anchor, here at physical x = 100
        assert!((86..=102).contains(&x1), "x1 = {x1}");
    }

    #[test]
    fn test_empty_path_is_none() {
        let builder = Path::builder();
        assert!(to_skia_path(&builder.build()).is_none());

        let mut builder = Path::builder();
        builder.begin(point(0.0, 0.0));
        builder.line_to(point(1.0, 1.0));
        builder.line_to(point(0.0, 1.0));
        builder.end(true);
        assert!(to_skia_path(&builder.build()).is_some());
    }
}
