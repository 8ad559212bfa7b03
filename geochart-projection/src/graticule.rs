use geo_types::{Coord, Geometry, LineString, MultiLineString};
use serde::{Deserialize, Serialize};

use crate::math::{range, EPSILON};

/// Generator for a grid of meridians and parallels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Graticule {
    pub extent_major: [[f64; 2]; 2],
    pub extent_minor: [[f64; 2]; 2],
    pub step_major: [f64; 2],
    pub step_minor: [f64; 2],
    /// Sampling interval in degrees along each line
    pub precision: f64,
}

impl Default for Graticule {
    fn default() -> Self {
        Self {
            extent_major: [[-180.0, -90.0 + EPSILON], [180.0, 90.0 - EPSILON]],
            extent_minor: [[-180.0, -80.0 - EPSILON], [180.0, 80.0 + EPSILON]],
            step_major: [90.0, 360.0],
            step_minor: [10.0, 10.0],
            precision: 2.5,
        }
    }
}

/// Meridian at `x` sampled between latitudes `y0` and `y1`
fn meridian(x: f64, y0: f64, y1: f64, step: f64) -> LineString<f64> {
    let mut ys = range(y0, y1 - EPSILON, step);
    ys.push(y1);
    LineString::from(ys.into_iter().map(|y| Coord { x, y }).collect::<Vec<_>>())
}

/// Parallel at `y` sampled between longitudes `x0` and `x1`
fn parallel(y: f64, x0: f64, x1: f64, step: f64) -> LineString<f64> {
    let mut xs = range(x0, x1 - EPSILON, step);
    xs.push(x1);
    LineString::from(xs.into_iter().map(|x| Coord { x, y }).collect::<Vec<_>>())
}

impl Graticule {
    pub fn with_step_major(mut self, step: [f64; 2]) -> Self {
        self.step_major = step;
        self
    }

    pub fn with_step_minor(mut self, step: [f64; 2]) -> Self {
        self.step_minor = step;
        self
    }

    pub fn with_precision(mut self, precision: f64) -> Self {
        self.precision = precision;
        self
    }

    /// Major meridians and parallels first, then minor lines that do not
    /// coincide with a major one.
    pub fn lines(&self) -> Vec<LineString<f64>> {
        let [[big_x0, big_y0], [big_x1, big_y1]] = self.extent_major;
        let [[x0, y0], [x1, y1]] = self.extent_minor;
        let [big_dx, big_dy] = self.step_major;
        let [dx, dy] = self.step_minor;
        let precision = self.precision;

        let mut lines = Vec::new();
        lines.extend(
            range((big_x0 / big_dx).ceil() * big_dx, big_x1, big_dx)
                .into_iter()
                .map(|x| meridian(x, big_y0, big_y1, precision)),
        );
        lines.extend(
            range((big_y0 / big_dy).ceil() * big_dy, big_y1, big_dy)
                .into_iter()
                .map(|y| parallel(y, big_x0, big_x1, precision)),
        );
        lines.extend(
            range((x0 / dx).ceil() * dx, x1, dx)
                .into_iter()
                .filter(|x| (x % big_dx).abs() > EPSILON)
                .map(|x| meridian(x, y0, y1, precision)),
        );
        lines.extend(
            range((y0 / dy).ceil() * dy, y1, dy)
                .into_iter()
                .filter(|y| (y % big_dy).abs() > EPSILON)
                .map(|y| parallel(y, x0, x1, precision)),
        );
        lines
    }

    pub fn to_geometry(&self) -> Geometry<f64> {
        Geometry::MultiLineString(MultiLineString::new(self.lines()))
    }
}

/// Graticule with 10 degree minor steps, the common default
pub fn graticule10() -> Geometry<f64> {
    Graticule::default().to_geometry()
}
