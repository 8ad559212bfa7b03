use geochart_common::Color;
use lyon_path::Path;
use serde::{Deserialize, Serialize};
use tiny_skia::Pixmap;

#[derive(Debug, Clone, PartialEq)]
pub struct StrokeStyle {
    pub color: Color,
    pub width: f64,
    pub dash: Option<Vec<f64>>,
}

impl StrokeStyle {
    pub fn new(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            dash: None,
        }
    }

    /// A stroke that would leave no visible mark
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.color.is_transparent()
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextBaseline {
    Top,
    #[default]
    Middle,
    Bottom,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub color: Color,
    pub font_size: f64,
    pub align: TextAlign,
    pub baseline: TextBaseline,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            color: Color::from_rgb8(0x66, 0x66, 0x66),
            font_size: 12.0,
            align: TextAlign::Left,
            baseline: TextBaseline::Middle,
        }
    }
}

/// Immediate mode drawing surface.
///
/// Coordinates are logical pixels. Implementations keep a stack of transform
/// and clip state that `save` pushes and `restore` pops.
pub trait Canvas {
    /// Ratio between physical and logical pixels of the surface
    fn pixel_ratio(&self) -> f64;

    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, dx: f64, dy: f64);
    fn scale(&mut self, sx: f64, sy: f64);

    /// Intersect the current clip region with a rectangle
    fn clip_rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color);
    fn fill_path(&mut self, path: &Path, color: Color);
    fn stroke_path(&mut self, path: &Path, stroke: &StrokeStyle);
    fn fill_text(&mut self, text: &str, x: f64, y: f64, style: &TextStyle);

    /// Draw `image` stretched into the destination rectangle
    fn draw_image(&mut self, image: &Pixmap, x: f64, y: f64, width: f64, height: f64);

    fn stroke_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, stroke: &StrokeStyle) {
        let mut builder = Path::builder();
        builder.begin(lyon_path::geom::point(x1 as f32, y1 as f32));
        builder.line_to(lyon_path::geom::point(x2 as f32, y2 as f32));
        builder.end(false);
        self.stroke_path(&builder.build(), stroke);
    }
}
