pub mod albers_usa;
pub mod catalog;
pub mod error;
pub mod graticule;
pub mod math;
pub mod object;
pub mod path;
pub mod projection;
pub mod raw;
pub mod scale;

pub use catalog::ProjectionKind;
pub use error::GeoProjectionError;
pub use graticule::{graticule10, Graticule};
pub use object::{Feature, GeoObject};
pub use path::{GeoPath, ProjectedShape};
pub use projection::{fit_extent, fit_width, GeoProjection, Projection};
pub use raw::{RawProjection, SphereClip};
pub use scale::{OutlineBounds, ProjectionMethod, ProjectionScale, ProjectionScaleOptions};
