use std::f64::consts::PI;
use std::fmt::Debug;
use std::sync::Arc;

use crate::math::{asin, range, Rotation, DEGREES, EPSILON, HALF_PI, RADIANS};
use crate::object::GeoObject;
use crate::path::GeoPath;
use crate::raw::{RawProjection, SphereClip};

/// Sampling step in degrees used when tracing the sphere outline
const OUTLINE_PRECISION: f64 = 2.5;

/// A configured projection from `[longitude, latitude]` degrees to pixels
pub trait GeoProjection: Debug + Send + Sync {
    /// Project a point. Returns None when the point is clipped away.
    fn project(&self, lon_lat: [f64; 2]) -> Option<[f64; 2]>;

    /// Pixel position back to `[longitude, latitude]`
    fn invert(&self, point: [f64; 2]) -> Option<[f64; 2]>;

    fn has_invert(&self) -> bool;

    fn scale(&self) -> f64;
    fn set_scale(&mut self, scale: f64);

    fn translate(&self) -> [f64; 2];
    fn set_translate(&mut self, translate: [f64; 2]);

    /// Project the vertices of one ring or line. Vertices that cannot be
    /// projected are dropped.
    fn project_line(&self, coords: &[[f64; 2]]) -> Vec<[f64; 2]> {
        coords.iter().filter_map(|c| self.project(*c)).collect()
    }

    /// Rings in pixel space outlining the visible globe
    fn sphere(&self) -> Vec<Vec<[f64; 2]>>;

    fn box_clone(&self) -> Box<dyn GeoProjection>;
}

impl Clone for Box<dyn GeoProjection> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}

/// Scale and translate `projection` so that `object` spans `width` pixels
/// horizontally with its top edge at y = 0.
pub fn fit_width(projection: &mut dyn GeoProjection, width: f64, object: &GeoObject) {
    projection.set_scale(150.0);
    projection.set_translate([0.0, 0.0]);
    let b = GeoPath::new(&*projection).bounds(object);
    let k = width / (b.x2 - b.x);
    let x = (width - k * (b.x2 + b.x)) / 2.0;
    let y = -k * b.y;
    projection.set_scale(150.0 * k);
    projection.set_translate([x, y]);
}

/// Scale and translate `projection` so that `object` fits centered in `extent`
/// (`[[x0, y0], [x1, y1]]`).
pub fn fit_extent(projection: &mut dyn GeoProjection, extent: [[f64; 2]; 2], object: &GeoObject) {
    projection.set_scale(150.0);
    projection.set_translate([0.0, 0.0]);
    let b = GeoPath::new(&*projection).bounds(object);
    let w = extent[1][0] - extent[0][0];
    let h = extent[1][1] - extent[0][1];
    let k = (w / (b.x2 - b.x)).min(h / (b.y2 - b.y));
    let x = extent[0][0] + (w - k * (b.x2 + b.x)) / 2.0;
    let y = extent[0][1] + (h - k * (b.y2 + b.y)) / 2.0;
    projection.set_scale(150.0 * k);
    projection.set_translate([x, y]);
}

/// A raw projection plus rotation, centering, scale, translation and clipping
#[derive(Debug, Clone)]
pub struct Projection {
    raw: Arc<dyn RawProjection>,
    clip: SphereClip,
    clip_extent: Option<[[f64; 2]; 2]>,
    scale: f64,
    translate: [f64; 2],
    center: [f64; 2],
    rotate: [f64; 3],
    rotation: Rotation,
    dx: f64,
    dy: f64,
}

impl Projection {
    pub fn new(raw: impl RawProjection + 'static) -> Self {
        Self::from_arc(Arc::new(raw))
    }

    pub fn from_arc(raw: Arc<dyn RawProjection>) -> Self {
        let clip = raw.clip();
        let mut projection = Self {
            raw,
            clip,
            clip_extent: None,
            scale: 150.0,
            translate: [480.0, 250.0],
            center: [0.0, 0.0],
            rotate: [0.0, 0.0, 0.0],
            rotation: Rotation::new(0.0, 0.0, 0.0),
            dx: 0.0,
            dy: 0.0,
        };
        projection.recenter();
        projection
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.set_scale(scale);
        self
    }

    pub fn with_translate(mut self, translate: [f64; 2]) -> Self {
        self.set_translate(translate);
        self
    }

    /// Geographic point in degrees that is mapped to the translate position
    pub fn with_center(mut self, center: [f64; 2]) -> Self {
        self.set_center(center);
        self
    }

    /// Three axis rotation `[lambda, phi, gamma]` in degrees
    pub fn with_rotate(mut self, rotate: [f64; 3]) -> Self {
        self.set_rotate(rotate);
        self
    }

    pub fn with_clip(mut self, clip: SphereClip) -> Self {
        self.clip = clip;
        self
    }

    pub fn with_clip_extent(mut self, extent: Option<[[f64; 2]; 2]>) -> Self {
        self.set_clip_extent(extent);
        self
    }

    pub fn center(&self) -> [f64; 2] {
        self.center
    }

    pub fn set_center(&mut self, center: [f64; 2]) {
        self.center = [center[0] % 360.0, center[1] % 360.0];
        self.recenter();
    }

    pub fn rotate(&self) -> [f64; 3] {
        self.rotate
    }

    pub fn set_rotate(&mut self, rotate: [f64; 3]) {
        self.rotate = rotate;
        self.recenter();
    }

    pub fn clip_extent(&self) -> Option<[[f64; 2]; 2]> {
        self.clip_extent
    }

    pub fn set_clip_extent(&mut self, extent: Option<[[f64; 2]; 2]>) {
        self.clip_extent = extent;
    }

    fn recenter(&mut self) {
        self.rotation = Rotation::from_degrees(self.rotate);
        let center = self
            .raw
            .forward(self.center[0] * RADIANS, self.center[1] * RADIANS);
        self.dx = self.translate[0] - self.scale * center[0];
        self.dy = self.translate[1] + self.scale * center[1];
    }

    fn transform(&self, raw: [f64; 2]) -> [f64; 2] {
        [self.dx + self.scale * raw[0], self.dy - self.scale * raw[1]]
    }

    fn is_inside_extent(&self, point: [f64; 2]) -> bool {
        match self.clip_extent {
            Some([[x0, y0], [x1, y1]]) => {
                point[0] >= x0 && point[0] <= x1 && point[1] >= y0 && point[1] <= y1
            }
            None => true,
        }
    }

    fn clamp_to_extent(&self, point: [f64; 2]) -> [f64; 2] {
        match self.clip_extent {
            Some([[x0, y0], [x1, y1]]) => [point[0].clamp(x0, x1), point[1].clamp(y0, y1)],
            None => point,
        }
    }

    fn is_visible(&self, lambda: f64, phi: f64) -> bool {
        match self.clip {
            SphereClip::Angle(angle) => lambda.cos() * phi.cos() > (angle * RADIANS).cos(),
            _ => true,
        }
    }

    /// Raw output of already rotated coordinates
    fn forward_rotated(&self, lambda: f64, phi: f64) -> Option<[f64; 2]> {
        let mut raw = self.raw.forward(lambda, phi);
        if self.clip == SphereClip::Square {
            raw = [raw[0].clamp(-PI, PI), raw[1].clamp(-PI, PI)];
        }
        if raw[0].is_finite() && raw[1].is_finite() {
            Some(raw)
        } else {
            None
        }
    }

    /// Project ignoring the clip extent
    pub fn project_unclipped(&self, lon_lat: [f64; 2]) -> Option<[f64; 2]> {
        if !(lon_lat[0].is_finite() && lon_lat[1].is_finite()) {
            return None;
        }
        let (lambda, phi) = self
            .rotation
            .forward(lon_lat[0] * RADIANS, lon_lat[1] * RADIANS);
        if !self.is_visible(lambda, phi) {
            return None;
        }
        self.forward_rotated(lambda, phi)
            .map(|raw| self.transform(raw))
    }

    /// Outline of the visible sphere in rotated spherical coordinates
    fn sphere_coordinates(&self) -> Vec<(f64, f64)> {
        match self.clip {
            SphereClip::Angle(angle) => {
                let c = angle * RADIANS;
                let (sin_c, cos_c) = c.sin_cos();
                range(0.0, 360.0, OUTLINE_PRECISION)
                    .into_iter()
                    .map(|t| {
                        let (sin_t, cos_t) = (t * RADIANS).sin_cos();
                        let (x, y, z) = (cos_c, sin_c * cos_t, sin_c * sin_t);
                        (y.atan2(x), asin(z))
                    })
                    .collect()
            }
            SphereClip::Antimeridian | SphereClip::Square => {
                let lambda = PI - EPSILON;
                let phi = HALF_PI - EPSILON;
                let steps = range(-180.0, 180.0, OUTLINE_PRECISION);
                let mut coords = Vec::with_capacity(steps.len() * 2 + 2);
                // north edge west to east, east edge north to south, and back
                coords.extend(steps.iter().map(|d| (d * RADIANS, phi)));
                coords.extend(steps.iter().map(|d| (lambda, -d * RADIANS / 2.0)));
                coords.extend(steps.iter().map(|d| (-d * RADIANS, -phi)));
                coords.extend(steps.iter().map(|d| (-lambda, d * RADIANS / 2.0)));
                coords
            }
        }
    }
}

impl GeoProjection for Projection {
    fn project(&self, lon_lat: [f64; 2]) -> Option<[f64; 2]> {
        self.project_unclipped(lon_lat)
            .filter(|point| self.is_inside_extent(*point))
    }

    fn invert(&self, point: [f64; 2]) -> Option<[f64; 2]> {
        let x = (point[0] - self.dx) / self.scale;
        let y = (self.dy - point[1]) / self.scale;
        let [lambda, phi] = self.raw.invert(x, y)?;
        let (lambda, phi) = self.rotation.invert(lambda, phi);
        let lon_lat = [lambda * DEGREES, phi * DEGREES];
        if lon_lat[0].is_finite() && lon_lat[1].is_finite() {
            Some(lon_lat)
        } else {
            None
        }
    }

    fn has_invert(&self) -> bool {
        self.raw.has_invert()
    }

    fn scale(&self) -> f64 {
        self.scale
    }

    fn set_scale(&mut self, scale: f64) {
        self.scale = scale;
        self.recenter();
    }

    fn translate(&self) -> [f64; 2] {
        self.translate
    }

    fn set_translate(&mut self, translate: [f64; 2]) {
        self.translate = translate;
        self.recenter();
    }

    fn project_line(&self, coords: &[[f64; 2]]) -> Vec<[f64; 2]> {
        coords
            .iter()
            .filter_map(|c| self.project_unclipped(*c))
            .map(|p| self.clamp_to_extent(p))
            .collect()
    }

    fn sphere(&self) -> Vec<Vec<[f64; 2]>> {
        if self.clip == SphereClip::Square {
            let ring = [[-PI, PI], [PI, PI], [PI, -PI], [-PI, -PI]]
                .into_iter()
                .map(|raw| self.clamp_to_extent(self.transform(raw)))
                .collect();
            return vec![ring];
        }
        let ring: Vec<_> = self
            .sphere_coordinates()
            .into_iter()
            .filter_map(|(lambda, phi)| self.forward_rotated(lambda, phi))
            .map(|raw| self.clamp_to_extent(self.transform(raw)))
            .collect();
        if ring.is_empty() {
            vec![]
        } else {
            vec![ring]
        }
    }

    fn box_clone(&self) -> Box<dyn GeoProjection> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::{Equirectangular, Mercator};
    use float_cmp::assert_approx_eq;

    #[test]
    fn test_equirectangular_scale_translate() {
        let projection = Projection::new(Equirectangular)
            .with_scale(100.0)
            .with_translate([50.0, 60.0]);
        let [x, y] = projection.project([90.0, 45.0]).unwrap();
        assert_approx_eq!(f64, x, 50.0 + 100.0 * PI / 2.0, epsilon = 1e-9);
        assert_approx_eq!(f64, y, 60.0 - 100.0 * PI / 4.0, epsilon = 1e-9);
    }

    #[test]
    fn test_center_maps_to_translate() {
        let projection = Projection::new(Mercator)
            .with_center([10.0, 50.0])
            .with_translate([200.0, 100.0]);
        let [x, y] = projection.project([10.0, 50.0]).unwrap();
        assert_approx_eq!(f64, x, 200.0, epsilon = 1e-9);
        assert_approx_eq!(f64, y, 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_clip_extent_rejects_points() {
        let projection = Projection::new(Equirectangular)
            .with_translate([0.0, 0.0])
            .with_clip_extent(Some([[-10.0, -10.0], [10.0, 10.0]]));
        assert!(projection.project([0.0, 0.0]).is_some());
        assert!(projection.project([90.0, 0.0]).is_none());
    }

    #[test]
    fn test_mercator_sphere_is_square() {
        let projection = Projection::new(Mercator)
            .with_scale(1.0)
            .with_translate([0.0, 0.0]);
        let sphere = projection.sphere();
        assert_eq!(sphere.len(), 1);
        assert_eq!(sphere[0].len(), 4);
        assert_approx_eq!(f64, sphere[0][0][0], -PI);
        assert_approx_eq!(f64, sphere[0][0][1], -PI);
    }
}
