pub mod canvas;
pub mod color;
pub mod error;
pub mod types;

pub use canvas::CanvasDimensions;
pub use color::Color;
pub use error::GeoChartCommonError;
pub use types::{ChartArea, PixelBounds, Sides};
