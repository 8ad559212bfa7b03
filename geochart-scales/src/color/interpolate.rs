use std::f64::consts::PI;

use geochart_common::Color;
use palette::{Mix, Srgb};

/// Decode packed `0xRRGGBB` stops
pub(crate) fn decode_stops(hex: &[u32]) -> Vec<Srgb<f32>> {
    hex.iter()
        .map(|c| {
            let [_, r, g, b] = c.to_be_bytes();
            Srgb::<u8>::new(r, g, b).into_format::<f32>()
        })
        .collect()
}

fn to_color(c: Srgb<f32>) -> Color {
    Color::from_rgb_f64(
        c.red as f64 * 255.0,
        c.green as f64 * 255.0,
        c.blue as f64 * 255.0,
    )
}

/// Uniform cubic B-spline through one channel of the stops
fn basis(t1: f64, v0: f64, v1: f64, v2: f64, v3: f64) -> f64 {
    let t2 = t1 * t1;
    let t3 = t2 * t1;
    ((1.0 - 3.0 * t1 + 3.0 * t2 - t3) * v0
        + (4.0 - 6.0 * t2 + 3.0 * t3) * v1
        + (1.0 + 3.0 * t1 + 3.0 * t2 - 3.0 * t3) * v2
        + t3 * v3)
        / 6.0
}

fn basis_channel(values: &[f64], t: f64) -> f64 {
    let n = values.len() - 1;
    let (t, i) = if t <= 0.0 {
        (0.0, 0)
    } else if t >= 1.0 {
        (1.0, n - 1)
    } else {
        (t, (t * n as f64).floor() as usize)
    };
    let v1 = values[i];
    let v2 = values[i + 1];
    let v0 = if i > 0 { values[i - 1] } else { 2.0 * v1 - v2 };
    let v3 = if i < n - 1 { values[i + 2] } else { 2.0 * v2 - v1 };
    basis((t - i as f64 / n as f64) * n as f64, v0, v1, v2, v3)
}

/// Smooth B-spline interpolation in RGB, used for the ColorBrewer schemes
pub(crate) fn rgb_basis(stops: &[Srgb<f32>], t: f64) -> Color {
    match stops.len() {
        0 => return Color::TRANSPARENT,
        1 => return to_color(stops[0]),
        _ => {}
    }
    let channel = |f: fn(&Srgb<f32>) -> f32| {
        let values: Vec<f64> = stops.iter().map(|c| f(c) as f64 * 255.0).collect();
        basis_channel(&values, t)
    };
    Color::from_rgb_f64(channel(|c| c.red), channel(|c| c.green), channel(|c| c.blue))
}

/// Piecewise linear interpolation between evenly spaced stops
pub(crate) fn rgb_linear(stops: &[Srgb<f32>], t: f64) -> Color {
    if stops.is_empty() {
        return Color::TRANSPARENT;
    }
    let scale_factor = (stops.len() - 1) as f64;
    let continuous_index = (t * scale_factor).clamp(0.0, scale_factor);
    let lower = continuous_index.floor() as usize;
    let upper = continuous_index.ceil() as usize;
    if lower == upper {
        return to_color(stops[lower]);
    }
    let frac = (continuous_index - lower as f64) as f32;
    to_color(stops[lower].mix(stops[upper], frac))
}

/// Color in the cubehelix space, hue in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Cubehelix {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Cubehelix {
    pub const fn new(h: f64, s: f64, l: f64) -> Self {
        Self { h, s, l }
    }

    pub fn to_color(self) -> Color {
        const A: f64 = -0.14861;
        const B: f64 = 1.78277;
        const C: f64 = -0.29227;
        const D: f64 = -0.90649;
        const E: f64 = 1.97294;

        let h = (self.h + 120.0).to_radians();
        let l = self.l;
        let a = self.s * l * (1.0 - l);
        let (sinh, cosh) = h.sin_cos();
        Color::from_rgb_f64(
            255.0 * (l + a * (A * cosh + B * sinh)),
            255.0 * (l + a * (C * cosh + D * sinh)),
            255.0 * (l + a * (E * cosh)),
        )
    }
}

/// Interpolate every cubehelix component linearly, taking the long way round the hue circle
pub(crate) fn cubehelix_long(start: Cubehelix, end: Cubehelix, t: f64) -> Color {
    let lerp = |a: f64, b: f64| a + (b - a) * t;
    Cubehelix::new(lerp(start.h, end.h), lerp(start.s, end.s), lerp(start.l, end.l)).to_color()
}

/// Evaluate `c0 + t * (c1 + t * (c2 + ...))` style polynomials given as
/// coefficient lists in ascending order
fn poly(coefficients: &[f64], t: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, c| acc * t + c)
}

pub(crate) fn cividis(t: f64) -> Color {
    let t = t.clamp(0.0, 1.0);
    Color::from_rgb_f64(
        poly(&[-4.54, -35.34, 2381.73, -6402.7, 7024.72, -2710.57], t),
        poly(&[32.49, 170.73, 52.82, -131.46, 176.58, -67.37], t),
        poly(&[81.24, 442.36, -2482.43, 6167.24, -6614.94, 2475.67], t),
    )
}

pub(crate) fn turbo(t: f64) -> Color {
    let t = t.clamp(0.0, 1.0);
    Color::from_rgb_f64(
        poly(&[34.61, 1172.33, -10793.56, 33300.12, -38394.49, 14825.05], t),
        poly(&[23.31, 557.33, 1225.33, -3574.96, 1073.77, 707.56], t),
        poly(&[27.2, 3211.1, -15327.97, 27814.0, -22569.18, 6838.66], t),
    )
}

pub(crate) fn sinebow(t: f64) -> Color {
    let t = (0.5 - t) * PI;
    let channel = |offset: f64| 255.0 * (t + offset).sin().powi(2);
    Color::from_rgb_f64(channel(0.0), channel(PI / 3.0), channel(PI * 2.0 / 3.0))
}

pub(crate) fn rainbow(t: f64) -> Color {
    let t = if (0.0..=1.0).contains(&t) { t } else { t - t.floor() };
    let ts = (t - 0.5).abs();
    Cubehelix::new(360.0 * t - 100.0, 1.5 - 1.5 * ts, 0.8 - 0.9 * ts).to_color()
}
