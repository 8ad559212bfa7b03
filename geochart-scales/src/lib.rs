pub mod array;
pub mod color;
pub mod color_scale;
pub mod error;
pub mod legend;
pub mod numeric;
pub mod quantize;
pub mod size_scale;

pub use color::{ColorRamp, Interpolate};
pub use color_scale::{
    ColorLinearScale, ColorLogarithmicScale, ColorScale, ColorScaleOptions, ColorSlice,
};
pub use error::ScaleError;
pub use legend::{
    LegendAlign, LegendAnchor, LegendConfig, LegendOptions, LegendPosition, LegendScale,
    LegendScaleOptions, LegendSize,
};
pub use numeric::{AxisOptions, ContinuousValueScale, LinearValueScale, LogValueScale, Tick};
pub use size_scale::{
    SizeLinearScale, SizeLogarithmicScale, SizeMarker, SizeMode, SizeScale, SizeScaleOptions,
};
