use std::f64::consts::{FRAC_PI_2, PI, TAU};

pub const EPSILON: f64 = 1e-6;
pub const EPSILON2: f64 = 1e-12;
pub const HALF_PI: f64 = FRAC_PI_2;
pub const RADIANS: f64 = PI / 180.0;
pub const DEGREES: f64 = 180.0 / PI;

/// Sign of `x`, with `sign(0) == 0`
pub fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// `asin` with the argument clamped to [-1, 1]
pub fn asin(x: f64) -> f64 {
    if x > 1.0 {
        HALF_PI
    } else if x < -1.0 {
        -HALF_PI
    } else {
        x.asin()
    }
}

/// `acos` with the argument clamped to [-1, 1]
pub fn acos(x: f64) -> f64 {
    if x > 1.0 {
        0.0
    } else if x < -1.0 {
        PI
    } else {
        x.acos()
    }
}

fn wrap_lambda(lambda: f64) -> f64 {
    if lambda.abs() > PI {
        lambda - (lambda / TAU).round() * TAU
    } else {
        lambda
    }
}

/// Spherical rotation by yaw `delta_lambda`, pitch `delta_phi` and roll
/// `delta_gamma`, all in radians
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    delta_lambda: f64,
    cos_delta_phi: f64,
    sin_delta_phi: f64,
    cos_delta_gamma: f64,
    sin_delta_gamma: f64,
    has_phi_gamma: bool,
}

impl Rotation {
    pub fn new(delta_lambda: f64, delta_phi: f64, delta_gamma: f64) -> Self {
        Self {
            delta_lambda: delta_lambda % TAU,
            cos_delta_phi: delta_phi.cos(),
            sin_delta_phi: delta_phi.sin(),
            cos_delta_gamma: delta_gamma.cos(),
            sin_delta_gamma: delta_gamma.sin(),
            has_phi_gamma: delta_phi != 0.0 || delta_gamma != 0.0,
        }
    }

    /// Rotation given in degrees `[lambda, phi, gamma]`
    pub fn from_degrees(rotate: [f64; 3]) -> Self {
        Self::new(
            (rotate[0] % 360.0) * RADIANS,
            (rotate[1] % 360.0) * RADIANS,
            (rotate[2] % 360.0) * RADIANS,
        )
    }

    pub fn forward(&self, lambda: f64, phi: f64) -> (f64, f64) {
        let lambda = if self.delta_lambda != 0.0 {
            wrap_lambda(lambda + self.delta_lambda)
        } else {
            lambda
        };
        if !self.has_phi_gamma {
            return (lambda, phi);
        }
        let cos_phi = phi.cos();
        let x = lambda.cos() * cos_phi;
        let y = lambda.sin() * cos_phi;
        let z = phi.sin();
        let k = z * self.cos_delta_phi + x * self.sin_delta_phi;
        (
            (y * self.cos_delta_gamma - k * self.sin_delta_gamma)
                .atan2(x * self.cos_delta_phi - z * self.sin_delta_phi),
            asin(k * self.cos_delta_gamma + y * self.sin_delta_gamma),
        )
    }

    pub fn invert(&self, lambda: f64, phi: f64) -> (f64, f64) {
        let (lambda, phi) = if self.has_phi_gamma {
            let cos_phi = phi.cos();
            let x = lambda.cos() * cos_phi;
            let y = lambda.sin() * cos_phi;
            let z = phi.sin();
            let k = z * self.cos_delta_gamma - y * self.sin_delta_gamma;
            (
                (y * self.cos_delta_gamma + z * self.sin_delta_gamma)
                    .atan2(x * self.cos_delta_phi + k * self.sin_delta_phi),
                asin(k * self.cos_delta_phi - x * self.sin_delta_phi),
            )
        } else {
            (lambda, phi)
        };
        if self.delta_lambda != 0.0 {
            (wrap_lambda(lambda - self.delta_lambda), phi)
        } else {
            (lambda, phi)
        }
    }
}

/// Values from `start` (inclusive) to `stop` (exclusive) in increments of `step`
pub fn range(start: f64, stop: f64, step: f64) -> Vec<f64> {
    if step == 0.0 || !step.is_finite() {
        return vec![];
    }
    let n = ((stop - start) / step).ceil().max(0.0) as usize;
    (0..n).map(|i| start + i as f64 * step).collect()
}
