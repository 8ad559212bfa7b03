use std::f64::consts::PI;
use std::sync::Arc;

use crate::math::{asin, sign, EPSILON, HALF_PI};

use super::{CylindricalEqualArea, Equirectangular, Mercator, RawProjection};

/// Shared inversion of the polar angle for conics centered on the y axis
fn conic_lambda(x: f64, ry: f64, n: f64) -> f64 {
    let mut l = x.atan2(ry.abs()) * sign(ry);
    if ry * n < 0.0 {
        l -= PI * sign(x) * sign(ry);
    }
    l / n
}

/// Albers equal-area conic with standard parallels `phi0` and `phi1` in radians.
/// Degenerates to cylindrical equal-area when the cone constant vanishes.
pub fn conic_equal_area(phi0: f64, phi1: f64) -> Arc<dyn RawProjection> {
    let sy0 = phi0.sin();
    let n = (sy0 + phi1.sin()) / 2.0;
    if n.abs() < EPSILON {
        return Arc::new(CylindricalEqualArea::new(phi0));
    }
    let c = 1.0 + sy0 * (2.0 * n - sy0);
    Arc::new(ConicEqualArea {
        n,
        c,
        r0: c.sqrt() / n,
    })
}

#[derive(Debug, Clone, Copy)]
pub struct ConicEqualArea {
    n: f64,
    c: f64,
    r0: f64,
}

impl RawProjection for ConicEqualArea {
    fn forward(&self, lambda: f64, phi: f64) -> [f64; 2] {
        let r = (self.c - 2.0 * self.n * phi.sin()).sqrt() / self.n;
        let nx = lambda * self.n;
        [r * nx.sin(), self.r0 - r * nx.cos()]
    }

    fn invert(&self, x: f64, y: f64) -> Option<[f64; 2]> {
        let r0y = self.r0 - y;
        let n = self.n;
        Some([
            conic_lambda(x, r0y, n),
            asin((self.c - (x * x + r0y * r0y) * n * n) / (2.0 * n)),
        ])
    }

    fn has_invert(&self) -> bool {
        true
    }
}

fn tany(y: f64) -> f64 {
    ((HALF_PI + y) / 2.0).tan()
}

/// Lambert conformal conic. Degenerates to Mercator when the cone constant
/// vanishes.
pub fn conic_conformal(phi0: f64, phi1: f64) -> Arc<dyn RawProjection> {
    let cy0 = phi0.cos();
    let n = if phi0 == phi1 {
        phi0.sin()
    } else {
        (cy0 / phi1.cos()).ln() / (tany(phi1) / tany(phi0)).ln()
    };
    if n == 0.0 || !n.is_finite() {
        return Arc::new(Mercator);
    }
    let f = cy0 * tany(phi0).powf(n) / n;
    Arc::new(ConicConformal { n, f })
}

#[derive(Debug, Clone, Copy)]
pub struct ConicConformal {
    n: f64,
    f: f64,
}

impl RawProjection for ConicConformal {
    fn forward(&self, lambda: f64, phi: f64) -> [f64; 2] {
        let phi = if self.f > 0.0 {
            phi.max(-HALF_PI + EPSILON)
        } else {
            phi.min(HALF_PI - EPSILON)
        };
        let r = self.f / tany(phi).powf(self.n);
        [r * (self.n * lambda).sin(), self.f - r * (self.n * lambda).cos()]
    }

    fn invert(&self, x: f64, y: f64) -> Option<[f64; 2]> {
        let fy = self.f - y;
        let r = sign(self.n) * (x * x + fy * fy).sqrt();
        Some([
            conic_lambda(x, fy, self.n),
            2.0 * (self.f / r).powf(1.0 / self.n).atan() - HALF_PI,
        ])
    }

    fn has_invert(&self) -> bool {
        true
    }
}

/// Equidistant conic. Degenerates to equirectangular when the cone constant
/// vanishes.
pub fn conic_equidistant(phi0: f64, phi1: f64) -> Arc<dyn RawProjection> {
    let cy0 = phi0.cos();
    let n = if phi0 == phi1 {
        phi0.sin()
    } else {
        (cy0 - phi1.cos()) / (phi1 - phi0)
    };
    if n.abs() < EPSILON {
        return Arc::new(Equirectangular);
    }
    Arc::new(ConicEquidistant {
        n,
        g: cy0 / n + phi0,
    })
}

#[derive(Debug, Clone, Copy)]
pub struct ConicEquidistant {
    n: f64,
    g: f64,
}

impl RawProjection for ConicEquidistant {
    fn forward(&self, lambda: f64, phi: f64) -> [f64; 2] {
        let gy = self.g - phi;
        let nx = self.n * lambda;
        [gy * nx.sin(), self.g - gy * nx.cos()]
    }

    fn invert(&self, x: f64, y: f64) -> Option<[f64; 2]> {
        let gy = self.g - y;
        Some([
            conic_lambda(x, gy, self.n),
            self.g - sign(self.n) * (x * x + gy * gy).sqrt(),
        ])
    }

    fn has_invert(&self) -> bool {
        true
    }
}
