use crate::math::{acos, asin, EPSILON};

use super::{RawProjection, SphereClip};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AzimuthalKind {
    EqualArea,
    Equidistant,
    Gnomonic,
    Orthographic,
    Stereographic,
}

/// Azimuthal projections differ only in how the radial distance depends on
/// the angular distance `c` from the center.
#[derive(Debug, Clone, Copy)]
pub struct Azimuthal {
    pub kind: AzimuthalKind,
}

impl Azimuthal {
    pub fn new(kind: AzimuthalKind) -> Self {
        Self { kind }
    }

    /// Radial scale as a function of `cos(c)`
    fn scale(&self, cos_c: f64) -> f64 {
        match self.kind {
            AzimuthalKind::EqualArea => (2.0 / (1.0 + cos_c)).sqrt(),
            AzimuthalKind::Equidistant => {
                let c = acos(cos_c);
                if c == 0.0 {
                    1.0
                } else {
                    c / c.sin()
                }
            }
            AzimuthalKind::Gnomonic => 1.0 / cos_c,
            AzimuthalKind::Orthographic => 1.0,
            AzimuthalKind::Stereographic => 1.0 / (1.0 + cos_c),
        }
    }

    /// Angular distance from the center as a function of the planar radius
    fn angle(&self, z: f64) -> f64 {
        match self.kind {
            AzimuthalKind::EqualArea => 2.0 * asin(z / 2.0),
            AzimuthalKind::Equidistant => z,
            AzimuthalKind::Gnomonic => z.atan(),
            AzimuthalKind::Orthographic => asin(z),
            AzimuthalKind::Stereographic => 2.0 * z.atan(),
        }
    }
}

impl RawProjection for Azimuthal {
    fn forward(&self, lambda: f64, phi: f64) -> [f64; 2] {
        let cos_lambda = lambda.cos();
        let cos_phi = phi.cos();
        let k = self.scale(cos_lambda * cos_phi);
        if k.is_infinite() {
            return [2.0, 0.0];
        }
        [k * cos_phi * lambda.sin(), k * phi.sin()]
    }

    fn invert(&self, x: f64, y: f64) -> Option<[f64; 2]> {
        let z = x.hypot(y);
        let c = self.angle(z);
        let sin_c = c.sin();
        let cos_c = c.cos();
        let phi = if z == 0.0 { 0.0 } else { asin(y * sin_c / z) };
        Some([(x * sin_c).atan2(z * cos_c), phi])
    }

    fn has_invert(&self) -> bool {
        true
    }

    fn clip(&self) -> SphereClip {
        match self.kind {
            AzimuthalKind::EqualArea | AzimuthalKind::Equidistant => SphereClip::Angle(180.0 - 1e-3),
            AzimuthalKind::Gnomonic => SphereClip::Angle(60.0),
            AzimuthalKind::Orthographic => SphereClip::Angle(90.0 + EPSILON),
            AzimuthalKind::Stereographic => SphereClip::Angle(142.0),
        }
    }
}
