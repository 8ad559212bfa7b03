use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use geochart_common::{ChartArea, Sides};
use serde::{Deserialize, Deserializer};

use crate::catalog::ProjectionKind;
use crate::error::GeoProjectionError;
use crate::object::GeoObject;
use crate::path::GeoPath;
use crate::projection::{fit_width, GeoProjection, Projection};
use crate::raw::RawProjection;

/// Width of the nominal canvas the reference outline is fitted to
pub const REFERENCE_WIDTH: f64 = 1000.0;

static NEXT_SCALE_ID: AtomicU64 = AtomicU64::new(1);

/// Named projection or a caller supplied raw projection
#[derive(Debug, Clone)]
pub enum ProjectionMethod {
    Named(ProjectionKind),
    Custom(Arc<dyn RawProjection>),
}

impl Default for ProjectionMethod {
    fn default() -> Self {
        ProjectionMethod::Named(ProjectionKind::AlbersUsa)
    }
}

impl ProjectionMethod {
    pub fn build(&self) -> Box<dyn GeoProjection> {
        match self {
            ProjectionMethod::Named(kind) => kind.build(),
            ProjectionMethod::Custom(raw) => Box::new(Projection::from_arc(raw.clone())),
        }
    }
}

impl From<ProjectionKind> for ProjectionMethod {
    fn from(value: ProjectionKind) -> Self {
        ProjectionMethod::Named(value)
    }
}

impl<'de> Deserialize<'de> for ProjectionMethod {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(ProjectionMethod::Named(ProjectionKind::resolve(&name)))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectionScaleOptions {
    pub projection: ProjectionMethod,
    /// Extra scale factor applied on top of the auto fit
    pub projection_scale: f64,
    /// Extra pixel offset applied on top of the auto fit
    pub projection_offset: [f64; 2],
    /// Space deducted from the chart area before fitting
    pub padding: Sides,
}

impl Default for ProjectionScaleOptions {
    fn default() -> Self {
        Self {
            projection: ProjectionMethod::default(),
            projection_scale: 1.0,
            projection_offset: [0.0, 0.0],
            padding: Sides::Uniform(0.0),
        }
    }
}

/// Projection state measured once per outline at the nominal width
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlineBounds {
    pub width: f64,
    pub height: f64,
    pub aspect_ratio: f64,
    pub ref_scale: f64,
    pub ref_x: f64,
    pub ref_y: f64,
}

/// Maps longitude/latitude to pixels and keeps a reference outline fitted to
/// the chart area
#[derive(Debug, Clone)]
pub struct ProjectionScale {
    id: u64,
    options: ProjectionScaleOptions,
    projection: Box<dyn GeoProjection>,
    outline_bounds: Option<OutlineBounds>,
    old_chart_size: Option<[f64; 2]>,
}

impl ProjectionScale {
    pub const TYPE_ID: &'static str = "projection";

    pub fn new(options: ProjectionScaleOptions) -> Self {
        let projection = options.projection.build();
        Self {
            id: NEXT_SCALE_ID.fetch_add(1, Ordering::Relaxed),
            options,
            projection,
            outline_bounds: None,
            old_chart_size: None,
        }
    }

    /// Identity of this scale instance, distinct for every constructed scale
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn options(&self) -> &ProjectionScaleOptions {
        &self.options
    }

    /// Switch to another projection. Reference bounds belong to the old
    /// projection and must be computed again before the next fit, and the
    /// scale gets a new identity.
    pub fn set_projection(&mut self, method: impl Into<ProjectionMethod>) {
        self.id = NEXT_SCALE_ID.fetch_add(1, Ordering::Relaxed);
        self.options.projection = method.into();
        self.projection = self.options.projection.build();
        self.outline_bounds = None;
        self.old_chart_size = None;
    }

    pub fn projection(&self) -> &dyn GeoProjection {
        self.projection.as_ref()
    }

    pub fn geo_path(&self) -> GeoPath<'_> {
        GeoPath::new(self.projection.as_ref())
    }

    /// Project `[longitude, latitude]` to pixels
    pub fn project(&self, lon_lat: [f64; 2]) -> Option<[f64; 2]> {
        self.projection.project(lon_lat)
    }

    pub fn invert(&self, point: [f64; 2]) -> Option<[f64; 2]> {
        if self.projection.has_invert() {
            self.projection.invert(point)
        } else {
            None
        }
    }

    pub fn outline_bounds(&self) -> Option<&OutlineBounds> {
        self.outline_bounds.as_ref()
    }

    /// Fit the projection to `outline` at the nominal width and record the
    /// reference scale and translate. Must be called again whenever the
    /// outline changes.
    pub fn compute_bounds(&mut self, outline: &GeoObject) -> OutlineBounds {
        fit_width(self.projection.as_mut(), REFERENCE_WIDTH, outline);
        let bb = self.geo_path().bounds(outline);
        if !bb.is_finite() {
            tracing::warn!("Outline has no visible extent under the current projection");
        }
        let width = (bb.x2 - bb.x).ceil();
        let height = (bb.y2 - bb.y).ceil();
        let [ref_x, ref_y] = self.projection.translate();
        let bounds = OutlineBounds {
            width,
            height,
            aspect_ratio: width / height,
            ref_scale: self.projection.scale(),
            ref_x,
            ref_y,
        };
        self.set_reference_bounds(bounds);
        bounds
    }

    /// Install reference bounds directly. The next fit is reported dirty.
    pub fn set_reference_bounds(&mut self, bounds: OutlineBounds) {
        self.outline_bounds = Some(bounds);
        self.old_chart_size = None;
    }

    /// Rescale and translate the projection so the reference outline is
    /// centered in `area`. Returns true when the available size changed since
    /// the previous call, meaning cached pixel geometry is stale.
    pub fn update_bounds(&mut self, area: &ChartArea) -> Result<bool, GeoProjectionError> {
        let bb = self
            .outline_bounds
            .ok_or(GeoProjectionError::MissingReferenceBounds)?;
        let padding = &self.options.padding;

        let chart_width = area.right - area.left - padding.left() - padding.right();
        let chart_height = area.bottom - area.top - padding.top() - padding.bottom();

        let previous = self.old_chart_size.replace([chart_width, chart_height]);

        let scale = (chart_width / bb.width).min(chart_height / bb.height);
        let view_width = bb.width * scale;
        let view_height = bb.height * scale;

        let x = (chart_width - view_width) * 0.5 + area.left + padding.left();
        let y = (chart_height - view_height) * 0.5 + area.top + padding.top();

        let offset = self.options.projection_offset;
        self.projection
            .set_scale(bb.ref_scale * scale * self.options.projection_scale);
        self.projection.set_translate([
            scale * bb.ref_x + x + offset[0],
            scale * bb.ref_y + y + offset[1],
        ]);

        let dirty = previous != Some([chart_width, chart_height]);
        if dirty {
            tracing::debug!("Projection fit changed to {chart_width}x{chart_height} (scale {scale})");
        }
        Ok(dirty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;
    use serde_json::json;

    #[test]
    fn test_options_deserialize() {
        let options: ProjectionScaleOptions = serde_json::from_value(json!({
            "projection": "geoEqualEarth",
            "projectionScale": 2,
            "padding": {"top": 5, "left": 10}
        }))
        .unwrap();
        assert!(matches!(
            options.projection,
            ProjectionMethod::Named(ProjectionKind::EqualEarth)
        ));
        assert_approx_eq!(f64, options.projection_scale, 2.0);
        assert_approx_eq!(f64, options.padding.left(), 10.0);
        assert_eq!(options.projection_offset, [0.0, 0.0]);
    }

    #[test]
    fn test_unknown_projection_falls_back() {
        let options: ProjectionScaleOptions =
            serde_json::from_value(json!({"projection": "nope"})).unwrap();
        assert!(matches!(
            options.projection,
            ProjectionMethod::Named(ProjectionKind::AlbersUsa)
        ));
    }

    #[test]
    fn test_ids_are_distinct() {
        let a = ProjectionScale::new(Default::default());
        let b = ProjectionScale::new(Default::default());
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_fit_before_reference_bounds_fails() {
        let mut scale = ProjectionScale::new(Default::default());
        let result = scale.update_bounds(&ChartArea::from_size(100.0, 100.0));
        assert!(matches!(
            result,
            Err(GeoProjectionError::MissingReferenceBounds)
        ));
    }

    #[test]
    fn test_set_projection_requires_new_bounds() {
        let mut scale = ProjectionScale::new(Default::default());
        scale.compute_bounds(&GeoObject::Sphere);
        let id = scale.id();

        scale.set_projection(ProjectionKind::Mercator);
        assert_ne!(scale.id(), id);
        assert!(scale.outline_bounds().is_none());
        assert!(scale.update_bounds(&ChartArea::from_size(100.0, 100.0)).is_err());

        scale.compute_bounds(&GeoObject::Sphere);
        assert!(scale
            .update_bounds(&ChartArea::from_size(100.0, 100.0))
            .unwrap());
    }
}
