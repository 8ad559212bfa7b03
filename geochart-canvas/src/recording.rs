use geochart_common::Color;
use lyon_path::{Path, PathEvent};
use tiny_skia::Pixmap;

use crate::canvas::{Canvas, StrokeStyle, TextStyle};

/// One call made against a [`RecordingCanvas`]
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Save,
    Restore,
    Translate {
        dx: f64,
        dy: f64,
    },
    Scale {
        sx: f64,
        sy: f64,
    },
    ClipRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    FillRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Color,
    },
    FillPath {
        /// Number of vertices in the path
        vertices: usize,
        color: Color,
    },
    StrokePath {
        vertices: usize,
        stroke: StrokeStyle,
    },
    FillText {
        text: String,
        x: f64,
        y: f64,
    },
    DrawImage {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        image_width: u32,
        image_height: u32,
    },
}

/// Canvas that records calls instead of rasterizing them
#[derive(Debug, Clone, Default)]
pub struct RecordingCanvas {
    pub pixel_ratio: f64,
    pub commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
    pub fn new(pixel_ratio: f64) -> Self {
        Self {
            pixel_ratio,
            commands: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn fill_rects(&self) -> Vec<&DrawCommand> {
        self.commands
            .iter()
            .filter(|cmd| matches!(cmd, DrawCommand::FillRect { .. }))
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&DrawCommand) -> bool) -> usize {
        self.commands.iter().filter(|cmd| pred(cmd)).count()
    }
}

fn count_vertices(path: &Path) -> usize {
    path.iter()
        .filter(|evt| !matches!(evt, PathEvent::End { .. }))
        .count()
}

impl Canvas for RecordingCanvas {
    fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    fn save(&mut self) {
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        self.commands.push(DrawCommand::Restore);
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.commands.push(DrawCommand::Translate { dx, dy });
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.commands.push(DrawCommand::Scale { sx, sy });
    }

    fn clip_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.commands.push(DrawCommand::ClipRect {
            x,
            y,
            width,
            height,
        });
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color) {
        self.commands.push(DrawCommand::FillRect {
            x,
            y,
            width,
            height,
            color,
        });
    }

    fn fill_path(&mut self, path: &Path, color: Color) {
        self.commands.push(DrawCommand::FillPath {
            vertices: count_vertices(path),
            color,
        });
    }

    fn stroke_path(&mut self, path: &Path, stroke: &StrokeStyle) {
        self.commands.push(DrawCommand::StrokePath {
            vertices: count_vertices(path),
            stroke: stroke.clone(),
        });
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, _style: &TextStyle) {
        self.commands.push(DrawCommand::FillText {
            text: text.to_string(),
            x,
            y,
        });
    }

    fn draw_image(&mut self, image: &Pixmap, x: f64, y: f64, width: f64, height: f64) {
        self.commands.push(DrawCommand::DrawImage {
            x,
            y,
            width,
            height,
            image_width: image.width(),
            image_height: image.height(),
        });
    }
}
