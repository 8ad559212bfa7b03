//! Raw projections map rotated spherical coordinates in radians to unscaled
//! planar coordinates with y pointing up.

mod azimuthal;
mod conic;
mod cylindrical;
mod pseudo;

use std::fmt::Debug;

pub use azimuthal::{Azimuthal, AzimuthalKind};
pub use conic::{conic_conformal, conic_equal_area, conic_equidistant};
pub use cylindrical::{
    CylindricalEqualArea, Equirectangular, Mercator, TransverseMercator,
};
pub use pseudo::{EqualEarth, NaturalEarth1};

/// How the visible part of the sphere is bounded in raw coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SphereClip {
    /// Cut along the antimeridian of the rotated sphere
    Antimeridian,
    /// Small circle of the given radius in degrees around the projection center
    Angle(f64),
    /// Square of half width pi around the raw origin, as web mercator maps use
    Square,
}

pub trait RawProjection: Debug + Send + Sync {
    /// Project `(lambda, phi)` in radians. Non finite output means the point
    /// cannot be shown.
    fn forward(&self, lambda: f64, phi: f64) -> [f64; 2];

    /// Inverse of `forward`. Projections without a closed form return None.
    fn invert(&self, _x: f64, _y: f64) -> Option<[f64; 2]> {
        None
    }

    fn has_invert(&self) -> bool {
        false
    }

    fn clip(&self) -> SphereClip {
        SphereClip::Antimeridian
    }
}
