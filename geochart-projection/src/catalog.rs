use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, VariantNames};

use crate::albers_usa::{albers, AlbersUsa};
use crate::math::RADIANS;
use crate::projection::{GeoProjection, Projection};
use crate::raw::{
    conic_conformal, conic_equal_area, conic_equidistant, Azimuthal, AzimuthalKind, EqualEarth,
    Equirectangular, Mercator, NaturalEarth1, TransverseMercator,
};

/// Named projections. Each accepts its plain name and the `geo` prefixed
/// library name.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    VariantNames,
)]
#[serde(try_from = "String", into = "String")]
pub enum ProjectionKind {
    #[strum(to_string = "azimuthalEqualArea", serialize = "geoAzimuthalEqualArea")]
    AzimuthalEqualArea,
    #[strum(to_string = "azimuthalEquidistant", serialize = "geoAzimuthalEquidistant")]
    AzimuthalEquidistant,
    #[strum(to_string = "gnomonic", serialize = "geoGnomonic")]
    Gnomonic,
    #[strum(to_string = "orthographic", serialize = "geoOrthographic")]
    Orthographic,
    #[strum(to_string = "stereographic", serialize = "geoStereographic")]
    Stereographic,
    #[strum(to_string = "equalEarth", serialize = "geoEqualEarth")]
    EqualEarth,
    #[strum(to_string = "albers", serialize = "geoAlbers")]
    Albers,
    #[default]
    #[strum(to_string = "albersUsa", serialize = "geoAlbersUsa")]
    AlbersUsa,
    #[strum(to_string = "conicConformal", serialize = "geoConicConformal")]
    ConicConformal,
    #[strum(to_string = "conicEqualArea", serialize = "geoConicEqualArea")]
    ConicEqualArea,
    #[strum(to_string = "conicEquidistant", serialize = "geoConicEquidistant")]
    ConicEquidistant,
    #[strum(to_string = "equirectangular", serialize = "geoEquirectangular")]
    Equirectangular,
    #[strum(to_string = "mercator", serialize = "geoMercator")]
    Mercator,
    #[strum(to_string = "transverseMercator", serialize = "geoTransverseMercator")]
    TransverseMercator,
    #[strum(to_string = "naturalEarth1", serialize = "geoNaturalEarth1")]
    NaturalEarth1,
}

impl ProjectionKind {
    /// Look up a projection by name, falling back to `albersUsa` for unknown names
    pub fn resolve(name: &str) -> Self {
        ProjectionKind::from_str(name).unwrap_or_else(|_| {
            tracing::warn!("Unknown projection {name:?}, falling back to albersUsa");
            ProjectionKind::AlbersUsa
        })
    }

    /// Construct the projection with its conventional defaults
    pub fn build(&self) -> Box<dyn GeoProjection> {
        let azimuthal = |kind: AzimuthalKind, scale: f64| -> Box<dyn GeoProjection> {
            Box::new(Projection::new(Azimuthal::new(kind)).with_scale(scale))
        };
        match self {
            ProjectionKind::AzimuthalEqualArea => azimuthal(AzimuthalKind::EqualArea, 124.75),
            ProjectionKind::AzimuthalEquidistant => azimuthal(AzimuthalKind::Equidistant, 79.4188),
            ProjectionKind::Gnomonic => azimuthal(AzimuthalKind::Gnomonic, 144.049),
            ProjectionKind::Orthographic => azimuthal(AzimuthalKind::Orthographic, 249.5),
            ProjectionKind::Stereographic => azimuthal(AzimuthalKind::Stereographic, 250.0),
            ProjectionKind::EqualEarth => Box::new(Projection::new(EqualEarth).with_scale(177.158)),
            ProjectionKind::Albers => Box::new(albers()),
            ProjectionKind::AlbersUsa => Box::new(AlbersUsa::new()),
            ProjectionKind::ConicConformal => Box::new(
                Projection::from_arc(conic_conformal(30.0 * RADIANS, 30.0 * RADIANS))
                    .with_scale(109.5),
            ),
            ProjectionKind::ConicEqualArea => Box::new(
                Projection::from_arc(conic_equal_area(0.0, 60.0 * RADIANS))
                    .with_scale(155.424)
                    .with_center([0.0, 33.6]),
            ),
            ProjectionKind::ConicEquidistant => Box::new(
                Projection::from_arc(conic_equidistant(0.0, 60.0 * RADIANS))
                    .with_scale(131.154)
                    .with_center([0.0, 13.9381]),
            ),
            ProjectionKind::Equirectangular => {
                Box::new(Projection::new(Equirectangular).with_scale(152.63))
            }
            ProjectionKind::Mercator => Box::new(Projection::new(Mercator).with_scale(152.63)),
            ProjectionKind::TransverseMercator => Box::new(
                Projection::new(TransverseMercator)
                    .with_rotate([0.0, 0.0, 90.0])
                    .with_scale(159.155),
            ),
            ProjectionKind::NaturalEarth1 => {
                Box::new(Projection::new(NaturalEarth1).with_scale(175.295))
            }
        }
    }
}

impl TryFrom<String> for ProjectionKind {
    type Error = strum::ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ProjectionKind::from_str(&value)
    }
}

impl From<ProjectionKind> for String {
    fn from(value: ProjectionKind) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use strum::IntoEnumIterator;

    #[rstest]
    #[case("mercator", ProjectionKind::Mercator)]
    #[case("geoMercator", ProjectionKind::Mercator)]
    #[case("naturalEarth1", ProjectionKind::NaturalEarth1)]
    #[case("geoAlbersUsa", ProjectionKind::AlbersUsa)]
    #[case("conicEqualArea", ProjectionKind::ConicEqualArea)]
    fn test_resolve_names(#[case] name: &str, #[case] expected: ProjectionKind) {
        assert_eq!(ProjectionKind::resolve(name), expected);
    }

    #[test]
    fn test_unknown_name_falls_back() {
        assert_eq!(ProjectionKind::resolve("bogus"), ProjectionKind::AlbersUsa);
        assert_eq!(ProjectionKind::resolve("Mercator"), ProjectionKind::AlbersUsa);
    }

    #[test]
    fn test_display_round_trips() {
        for kind in ProjectionKind::iter() {
            assert_eq!(ProjectionKind::resolve(&kind.to_string()), kind);
        }
    }

    #[test]
    fn test_every_projection_builds() {
        for kind in ProjectionKind::iter() {
            let projection = kind.build();
            assert!(projection.scale() > 0.0, "{kind}");
            assert!(!projection.sphere().is_empty(), "{kind}");
        }
    }
}
