use crate::math::{EPSILON, RADIANS};
use crate::projection::{GeoProjection, Projection};
use crate::raw::conic_equal_area;

/// Pixel region `[[x0, y0], [x1, y1]]` relative to translate in units of the lower 48 scale
type Frame = [[f64; 2]; 2];

const LOWER48_FRAME: Frame = [[-0.455, -0.238], [0.455, 0.238]];
const ALASKA_FRAME: Frame = [[-0.425, 0.120], [-0.214, 0.234]];
const HAWAII_FRAME: Frame = [[-0.214, 0.166], [-0.115, 0.234]];
const ALASKA_OFFSET: [f64; 2] = [-0.307, 0.201];
const HAWAII_OFFSET: [f64; 2] = [-0.205, 0.212];
const ALASKA_SCALE: f64 = 0.35;

/// Composite conic equal-area projection of the United States with Alaska
/// and Hawaii drawn as insets below the lower 48 states
#[derive(Debug, Clone)]
pub struct AlbersUsa {
    lower48: Projection,
    alaska: Projection,
    hawaii: Projection,
}

pub fn albers() -> Projection {
    Projection::from_arc(conic_equal_area(29.5 * RADIANS, 45.5 * RADIANS))
        .with_scale(1070.0)
        .with_translate([480.0, 250.0])
        .with_rotate([96.0, 0.0, 0.0])
        .with_center([-0.6, 38.7])
}

impl Default for AlbersUsa {
    fn default() -> Self {
        Self::new()
    }
}

impl AlbersUsa {
    pub fn new() -> Self {
        let alaska = Projection::from_arc(conic_equal_area(55.0 * RADIANS, 65.0 * RADIANS))
            .with_rotate([154.0, 0.0, 0.0])
            .with_center([-2.0, 58.5]);
        let hawaii = Projection::from_arc(conic_equal_area(8.0 * RADIANS, 18.0 * RADIANS))
            .with_rotate([157.0, 0.0, 0.0])
            .with_center([-3.0, 19.9]);
        let mut projection = Self {
            lower48: albers(),
            alaska,
            hawaii,
        };
        projection.set_scale(1070.0);
        projection
    }

    fn frame_extent(&self, frame: Frame, inset: f64) -> [[f64; 2]; 2] {
        let k = self.lower48.scale();
        let [x, y] = self.lower48.translate();
        [
            [x + frame[0][0] * k + inset, y + frame[0][1] * k + inset],
            [x + frame[1][0] * k - inset, y + frame[1][1] * k - inset],
        ]
    }

    fn parts(&self) -> [&Projection; 3] {
        [&self.lower48, &self.alaska, &self.hawaii]
    }

    /// Inset that shows `lon_lat`, in lower 48, Alaska, Hawaii order
    fn inset_for(&self, lon_lat: [f64; 2]) -> Option<&Projection> {
        self.parts()
            .into_iter()
            .find(|part| part.project(lon_lat).is_some())
    }
}

fn in_frame(frame: Frame, x: f64, y: f64) -> bool {
    y >= frame[0][1] && y < frame[1][1] && x >= frame[0][0] && x < frame[1][0]
}

impl GeoProjection for AlbersUsa {
    fn project(&self, lon_lat: [f64; 2]) -> Option<[f64; 2]> {
        self.inset_for(lon_lat)
            .and_then(|part| part.project(lon_lat))
    }

    fn invert(&self, point: [f64; 2]) -> Option<[f64; 2]> {
        let k = self.lower48.scale();
        let t = self.lower48.translate();
        let x = (point[0] - t[0]) / k;
        let y = (point[1] - t[1]) / k;
        let part = if in_frame(ALASKA_FRAME, x, y) {
            &self.alaska
        } else if in_frame(HAWAII_FRAME, x, y) {
            &self.hawaii
        } else {
            &self.lower48
        };
        part.invert(point)
    }

    fn has_invert(&self) -> bool {
        true
    }

    fn scale(&self) -> f64 {
        self.lower48.scale()
    }

    fn set_scale(&mut self, scale: f64) {
        self.lower48.set_scale(scale);
        self.alaska.set_scale(scale * ALASKA_SCALE);
        self.hawaii.set_scale(scale);
        let translate = self.lower48.translate();
        self.set_translate(translate);
    }

    fn translate(&self) -> [f64; 2] {
        self.lower48.translate()
    }

    fn set_translate(&mut self, translate: [f64; 2]) {
        let k = self.lower48.scale();
        let [x, y] = translate;
        self.lower48.set_translate(translate);
        self.lower48
            .set_clip_extent(Some(self.frame_extent(LOWER48_FRAME, 0.0)));

        self.alaska
            .set_translate([x + ALASKA_OFFSET[0] * k, y + ALASKA_OFFSET[1] * k]);
        self.alaska
            .set_clip_extent(Some(self.frame_extent(ALASKA_FRAME, EPSILON)));

        self.hawaii
            .set_translate([x + HAWAII_OFFSET[0] * k, y + HAWAII_OFFSET[1] * k]);
        self.hawaii
            .set_clip_extent(Some(self.frame_extent(HAWAII_FRAME, EPSILON)));
    }

    /// Each ring is drawn entirely within the inset of its first visible vertex
    fn project_line(&self, coords: &[[f64; 2]]) -> Vec<[f64; 2]> {
        let Some(part) = coords.iter().find_map(|c| self.inset_for(*c)) else {
            return vec![];
        };
        part.project_line(coords)
    }

    fn sphere(&self) -> Vec<Vec<[f64; 2]>> {
        // the lower 48 frame encloses both insets
        let [[x0, y0], [x1, y1]] = self.frame_extent(LOWER48_FRAME, 0.0);
        vec![vec![[x0, y0], [x1, y0], [x1, y1], [x0, y1]]]
    }

    fn box_clone(&self) -> Box<dyn GeoProjection> {
        Box::new(self.clone())
    }
}
