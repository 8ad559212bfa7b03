pub mod canvas;
pub mod error;
pub mod point;
pub mod recording;
pub mod skia;
pub mod text;

pub use canvas::{Canvas, StrokeStyle, TextAlign, TextBaseline, TextStyle};
pub use error::CanvasError;
pub use point::{draw_point, point_path, PointOptions, PointStyle};
pub use recording::{DrawCommand, RecordingCanvas};
pub use skia::SkiaCanvas;
pub use text::{fonts_available, measure_text, TextBounds};

// Re-exported so downstream crates can name cached rasters without a direct dependency
pub use tiny_skia::Pixmap;
