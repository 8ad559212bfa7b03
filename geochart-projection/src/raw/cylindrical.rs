use crate::math::HALF_PI;

use super::{RawProjection, SphereClip};

#[derive(Debug, Clone, Copy, Default)]
pub struct Equirectangular;

impl RawProjection for Equirectangular {
    fn forward(&self, lambda: f64, phi: f64) -> [f64; 2] {
        [lambda, phi]
    }

    fn invert(&self, x: f64, y: f64) -> Option<[f64; 2]> {
        Some([x, y])
    }

    fn has_invert(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Mercator;

impl RawProjection for Mercator {
    fn forward(&self, lambda: f64, phi: f64) -> [f64; 2] {
        [lambda, ((HALF_PI + phi) / 2.0).tan().ln()]
    }

    fn invert(&self, x: f64, y: f64) -> Option<[f64; 2]> {
        Some([x, 2.0 * y.exp().atan() - HALF_PI])
    }

    fn has_invert(&self) -> bool {
        true
    }

    fn clip(&self) -> SphereClip {
        SphereClip::Square
    }
}

/// Mercator on a meridian. Combined with a 90 degree roll the central
/// meridian of the map becomes the tangent line.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransverseMercator;

impl RawProjection for TransverseMercator {
    fn forward(&self, lambda: f64, phi: f64) -> [f64; 2] {
        [((HALF_PI + phi) / 2.0).tan().ln(), -lambda]
    }

    fn invert(&self, x: f64, y: f64) -> Option<[f64; 2]> {
        Some([-y, 2.0 * x.exp().atan() - HALF_PI])
    }

    fn has_invert(&self) -> bool {
        true
    }

    fn clip(&self) -> SphereClip {
        SphereClip::Square
    }
}

/// Lambert cylindrical equal-area with standard parallel `phi0`
#[derive(Debug, Clone, Copy)]
pub struct CylindricalEqualArea {
    cos_phi0: f64,
}

impl CylindricalEqualArea {
    pub fn new(phi0: f64) -> Self {
        Self {
            cos_phi0: phi0.cos(),
        }
    }
}

impl RawProjection for CylindricalEqualArea {
    fn forward(&self, lambda: f64, phi: f64) -> [f64; 2] {
        [lambda * self.cos_phi0, phi.sin() / self.cos_phi0]
    }

    fn invert(&self, x: f64, y: f64) -> Option<[f64; 2]> {
        Some([x / self.cos_phi0, crate::math::asin(y * self.cos_phi0)])
    }

    fn has_invert(&self) -> bool {
        true
    }
}
