pub mod chart;
pub mod config;
pub mod controller;
pub mod error;
pub mod registry;
pub mod scales;
pub mod scriptable;

pub use chart::{Chart, ElementHit};
pub use config::{ChartConfig, ClipMap, DatasetConfig, ShowGraticule};
pub use controller::{BubbleMapController, ChoroplethController, DatasetController, GeoController, UpdateContext};
pub use error::GeoChartError;
pub use registry::Registry;
pub use scales::{ChartScale, Scales};
pub use scriptable::{EvalContext, Scriptable};

pub use geochart_common::{CanvasDimensions, Color};
pub use geochart_elements::UpdateMode;
