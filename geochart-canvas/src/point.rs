use std::f32::consts::{FRAC_1_SQRT_2, PI};

use geochart_common::Color;
use lyon_path::geom::point;
use lyon_path::{Path, Winding};
use serde::{Deserialize, Serialize};
use strum::{EnumString, VariantNames};

use crate::canvas::{Canvas, StrokeStyle};

#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, VariantNames,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum PointStyle {
    #[default]
    Circle,
    Cross,
    CrossRot,
    Dash,
    Line,
    Rect,
    RectRot,
    Star,
    Triangle,
}

impl PointStyle {
    /// Shapes that are made of open strokes and have no interior to fill
    pub fn is_stroke_only(&self) -> bool {
        matches!(
            self,
            PointStyle::Cross
                | PointStyle::CrossRot
                | PointStyle::Dash
                | PointStyle::Line
                | PointStyle::Star
        )
    }
}

/// Resolved visual options of a point marker
#[derive(Debug, Clone, PartialEq)]
pub struct PointOptions {
    pub radius: f64,
    pub hover_radius: f64,
    pub hit_radius: f64,
    pub point_style: PointStyle,
    pub background_color: Color,
    pub border_color: Color,
    pub border_width: f64,
}

impl Default for PointOptions {
    fn default() -> Self {
        Self {
            radius: 3.0,
            hover_radius: 4.0,
            hit_radius: 1.0,
            point_style: PointStyle::Circle,
            background_color: Color::BLUE,
            border_color: Color::BLUE,
            border_width: 1.0,
        }
    }
}

/// Outline of a marker of the given style centered on `(x, y)`
pub fn point_path(style: PointStyle, x: f64, y: f64, radius: f64) -> Path {
    let (x, y, r) = (x as f32, y as f32, radius as f32);
    let mut builder = Path::builder();
    match style {
        PointStyle::Circle => {
            builder.add_circle(point(x, y), r, Winding::Positive);
        }
        PointStyle::Rect => {
            let size = r * FRAC_1_SQRT_2;
            builder.begin(point(x - size, y - size));
            builder.line_to(point(x + size, y - size));
            builder.line_to(point(x + size, y + size));
            builder.line_to(point(x - size, y + size));
            builder.end(true);
        }
        PointStyle::RectRot => {
            builder.begin(point(x, y - r));
            builder.line_to(point(x + r, y));
            builder.line_to(point(x, y + r));
            builder.line_to(point(x - r, y));
            builder.end(true);
        }
        PointStyle::Triangle => {
            let vertex = |k: f32| {
                let rad = k * 2.0 * PI / 3.0;
                point(x + rad.sin() * r, y - rad.cos() * r)
            };
            builder.begin(vertex(0.0));
            builder.line_to(vertex(1.0));
            builder.line_to(vertex(2.0));
            builder.end(true);
        }
        PointStyle::Cross | PointStyle::CrossRot | PointStyle::Star => {
            if matches!(style, PointStyle::Cross | PointStyle::Star) {
                add_segment(&mut builder, (x, y - r), (x, y + r));
                add_segment(&mut builder, (x - r, y), (x + r, y));
            }
            if matches!(style, PointStyle::CrossRot | PointStyle::Star) {
                let d = r * FRAC_1_SQRT_2;
                add_segment(&mut builder, (x - d, y - d), (x + d, y + d));
                add_segment(&mut builder, (x - d, y + d), (x + d, y - d));
            }
        }
        PointStyle::Line => add_segment(&mut builder, (x - r, y), (x + r, y)),
        PointStyle::Dash => add_segment(&mut builder, (x, y), (x + r, y)),
    }
    builder.build()
}

fn add_segment(builder: &mut lyon_path::path::Builder, from: (f32, f32), to: (f32, f32)) {
    builder.begin(point(from.0, from.1));
    builder.line_to(point(to.0, to.1));
    builder.end(false);
}

/// Draw one marker. Non-positive or non-finite radii draw nothing.
pub fn draw_point(canvas: &mut dyn Canvas, options: &PointOptions, x: f64, y: f64) {
    let radius = options.radius;
    if !(radius.is_finite() && radius > 0.0 && x.is_finite() && y.is_finite()) {
        return;
    }
    let path = point_path(options.point_style, x, y, radius);
    if !options.point_style.is_stroke_only() {
        canvas.fill_path(&path, options.background_color);
    }
    if options.border_width > 0.0 {
        canvas.stroke_path(
            &path,
            &StrokeStyle::new(options.border_color, options.border_width),
        );
    }
}
