pub mod feature;
pub mod mode;
pub mod point;

pub use feature::{FeatureStyle, GeoFeature, GeoFeatureOptions, RenderCache, StyleKey};
pub use mode::UpdateMode;
pub use point::PointElement;
