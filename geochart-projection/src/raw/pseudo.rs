use crate::math::{asin, EPSILON, EPSILON2};

use super::RawProjection;

const A1: f64 = 1.340264;
const A2: f64 = -0.081106;
const A3: f64 = 0.000893;
const A4: f64 = 0.003796;
const ITERATIONS: usize = 12;

fn equal_earth_m() -> f64 {
    3f64.sqrt() / 2.0
}

/// Equal Earth (Šavrič, Patterson and Jenny 2018)
#[derive(Debug, Clone, Copy, Default)]
pub struct EqualEarth;

impl RawProjection for EqualEarth {
    fn forward(&self, lambda: f64, phi: f64) -> [f64; 2] {
        let m = equal_earth_m();
        let l = asin(m * phi.sin());
        let l2 = l * l;
        let l6 = l2 * l2 * l2;
        [
            lambda * l.cos() / (m * (A1 + 3.0 * A2 * l2 + l6 * (7.0 * A3 + 9.0 * A4 * l2))),
            l * (A1 + A2 * l2 + l6 * (A3 + A4 * l2)),
        ]
    }

    fn invert(&self, x: f64, y: f64) -> Option<[f64; 2]> {
        let m = equal_earth_m();
        let mut l = y;
        let mut l2 = l * l;
        let mut l6 = l2 * l2 * l2;
        for _ in 0..ITERATIONS {
            let fy = l * (A1 + A2 * l2 + l6 * (A3 + A4 * l2)) - y;
            let fpy = A1 + 3.0 * A2 * l2 + l6 * (7.0 * A3 + 9.0 * A4 * l2);
            let delta = fy / fpy;
            l -= delta;
            l2 = l * l;
            l6 = l2 * l2 * l2;
            if delta.abs() < EPSILON2 {
                break;
            }
        }
        Some([
            m * x * (A1 + 3.0 * A2 * l2 + l6 * (7.0 * A3 + 9.0 * A4 * l2)) / l.cos(),
            asin(l.sin() / m),
        ])
    }

    fn has_invert(&self) -> bool {
        true
    }
}

/// Natural Earth I (Šavrič et al. polynomial form)
#[derive(Debug, Clone, Copy, Default)]
pub struct NaturalEarth1;

impl RawProjection for NaturalEarth1 {
    fn forward(&self, lambda: f64, phi: f64) -> [f64; 2] {
        let phi2 = phi * phi;
        let phi4 = phi2 * phi2;
        [
            lambda
                * (0.8707 - 0.131979 * phi2
                    + phi4 * (-0.013791 + phi4 * (0.003971 * phi2 - 0.001529 * phi4))),
            phi * (1.007226
                + phi2 * (0.015085 + phi4 * (-0.044475 + 0.028874 * phi2 - 0.005916 * phi4))),
        ]
    }

    fn invert(&self, x: f64, y: f64) -> Option<[f64; 2]> {
        let mut phi = y;
        for _ in 0..25 {
            let phi2 = phi * phi;
            let phi4 = phi2 * phi2;
            let delta = (phi
                * (1.007226
                    + phi2 * (0.015085 + phi4 * (-0.044475 + 0.028874 * phi2 - 0.005916 * phi4)))
                - y)
                / (1.007226
                    + phi2
                        * (0.015085 * 3.0
                            + phi4
                                * (-0.044475 * 7.0 + 0.028874 * 9.0 * phi2
                                    - 0.005916 * 11.0 * phi4)));
            phi -= delta;
            if delta.abs() <= EPSILON {
                break;
            }
        }
        let phi2 = phi * phi;
        Some([
            x / (0.8707
                + phi2 * (-0.131979 + phi2 * (-0.013791 + phi2 * phi2 * phi2 * (0.003971 - 0.001529 * phi2)))),
            phi,
        ])
    }

    fn has_invert(&self) -> bool {
        true
    }
}
