mod interpolate;
pub mod schemes;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use geochart_common::Color;
use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumIter, EnumString, VariantNames};

use interpolate::{
    cividis, cubehelix_long, decode_stops, rainbow, rgb_basis, rgb_linear, sinebow, turbo,
    Cubehelix,
};

/// Named color ramps over `[0, 1]`.
///
/// Names are matched case-insensitively, and each ramp also answers to its
/// `interpolate` prefixed library name.
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
#[strum(ascii_case_insensitive)]
pub enum ColorRamp {
    #[default]
    #[strum(to_string = "blues", serialize = "interpolateBlues")]
    Blues,
    #[strum(to_string = "greens", serialize = "interpolateGreens")]
    Greens,
    #[strum(to_string = "greys", serialize = "interpolateGreys")]
    Greys,
    #[strum(to_string = "oranges", serialize = "interpolateOranges")]
    Oranges,
    #[strum(to_string = "purples", serialize = "interpolatePurples")]
    Purples,
    #[strum(to_string = "reds", serialize = "interpolateReds")]
    Reds,
    #[strum(to_string = "buGn", serialize = "interpolateBuGn")]
    BuGn,
    #[strum(to_string = "buPu", serialize = "interpolateBuPu")]
    BuPu,
    #[strum(to_string = "gnBu", serialize = "interpolateGnBu")]
    GnBu,
    #[strum(to_string = "orRd", serialize = "interpolateOrRd")]
    OrRd,
    #[strum(to_string = "puBuGn", serialize = "interpolatePuBuGn")]
    PuBuGn,
    #[strum(to_string = "puBu", serialize = "interpolatePuBu")]
    PuBu,
    #[strum(to_string = "puRd", serialize = "interpolatePuRd")]
    PuRd,
    #[strum(to_string = "rdPu", serialize = "interpolateRdPu")]
    RdPu,
    #[strum(to_string = "ylGnBu", serialize = "interpolateYlGnBu")]
    YlGnBu,
    #[strum(to_string = "ylGn", serialize = "interpolateYlGn")]
    YlGn,
    #[strum(to_string = "ylOrBr", serialize = "interpolateYlOrBr")]
    YlOrBr,
    #[strum(to_string = "ylOrRd", serialize = "interpolateYlOrRd")]
    YlOrRd,
    #[strum(to_string = "brBG", serialize = "interpolateBrBG")]
    BrBG,
    #[strum(to_string = "pRGn", serialize = "interpolatePRGn")]
    PRGn,
    #[strum(to_string = "piYG", serialize = "interpolatePiYG")]
    PiYG,
    #[strum(to_string = "puOr", serialize = "interpolatePuOr")]
    PuOr,
    #[strum(to_string = "rdBu", serialize = "interpolateRdBu")]
    RdBu,
    #[strum(to_string = "rdGy", serialize = "interpolateRdGy")]
    RdGy,
    #[strum(to_string = "rdYlBu", serialize = "interpolateRdYlBu")]
    RdYlBu,
    #[strum(to_string = "rdYlGn", serialize = "interpolateRdYlGn")]
    RdYlGn,
    #[strum(to_string = "spectral", serialize = "interpolateSpectral")]
    Spectral,
    #[strum(to_string = "viridis", serialize = "interpolateViridis")]
    Viridis,
    #[strum(to_string = "magma", serialize = "interpolateMagma")]
    Magma,
    #[strum(to_string = "inferno", serialize = "interpolateInferno")]
    Inferno,
    #[strum(to_string = "plasma", serialize = "interpolatePlasma")]
    Plasma,
    #[strum(to_string = "cividis", serialize = "interpolateCividis")]
    Cividis,
    #[strum(to_string = "turbo", serialize = "interpolateTurbo")]
    Turbo,
    #[strum(to_string = "sinebow", serialize = "interpolateSinebow")]
    Sinebow,
    #[strum(to_string = "rainbow", serialize = "interpolateRainbow")]
    Rainbow,
    #[strum(to_string = "warm", serialize = "interpolateWarm")]
    Warm,
    #[strum(to_string = "cool", serialize = "interpolateCool")]
    Cool,
    #[strum(to_string = "cubehelixDefault", serialize = "interpolateCubehelixDefault")]
    CubehelixDefault,
}

impl ColorRamp {
    /// Look up a ramp by name, falling back to `blues` for unknown names
    pub fn resolve(name: &str) -> Self {
        ColorRamp::from_str(name.trim()).unwrap_or_else(|_| {
            tracing::warn!("Unknown color interpolator {name:?}, falling back to blues");
            ColorRamp::Blues
        })
    }

    /// Packed stops for the ramps that are defined by sampled colors
    pub fn stops(&self) -> Option<&'static [u32]> {
        use schemes::*;
        let stops: &'static [u32] = match self {
            ColorRamp::Blues => &BLUES,
            ColorRamp::Greens => &GREENS,
            ColorRamp::Greys => &GREYS,
            ColorRamp::Oranges => &ORANGES,
            ColorRamp::Purples => &PURPLES,
            ColorRamp::Reds => &REDS,
            ColorRamp::BuGn => &BU_GN,
            ColorRamp::BuPu => &BU_PU,
            ColorRamp::GnBu => &GN_BU,
            ColorRamp::OrRd => &OR_RD,
            ColorRamp::PuBuGn => &PU_BU_GN,
            ColorRamp::PuBu => &PU_BU,
            ColorRamp::PuRd => &PU_RD,
            ColorRamp::RdPu => &RD_PU,
            ColorRamp::YlGnBu => &YL_GN_BU,
            ColorRamp::YlGn => &YL_GN,
            ColorRamp::YlOrBr => &YL_OR_BR,
            ColorRamp::YlOrRd => &YL_OR_RD,
            ColorRamp::BrBG => &BR_BG,
            ColorRamp::PRGn => &PR_GN,
            ColorRamp::PiYG => &PI_YG,
            ColorRamp::PuOr => &PU_OR,
            ColorRamp::RdBu => &RD_BU,
            ColorRamp::RdGy => &RD_GY,
            ColorRamp::RdYlBu => &RD_YL_BU,
            ColorRamp::RdYlGn => &RD_YL_GN,
            ColorRamp::Spectral => &SPECTRAL,
            ColorRamp::Viridis => &VIRIDIS,
            ColorRamp::Magma => &MAGMA,
            ColorRamp::Inferno => &INFERNO,
            ColorRamp::Plasma => &PLASMA,
            _ => return None,
        };
        Some(stops)
    }

    /// Evaluate the ramp at `t`, clamped to `[0, 1]`.
    ///
    /// The perceptual maps (viridis, magma, inferno, plasma) are stored as
    /// stops at every tenth and mixed linearly in between. They match the
    /// 256 entry lookup tables at the stops and only approximate them in
    /// between.
    pub fn interpolate(&self, t: f64) -> Color {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            ColorRamp::Viridis | ColorRamp::Magma | ColorRamp::Inferno | ColorRamp::Plasma => {
                rgb_linear(&decode_stops(self.stops().unwrap_or_default()), t)
            }
            ColorRamp::Cividis => cividis(t),
            ColorRamp::Turbo => turbo(t),
            ColorRamp::Sinebow => sinebow(t),
            ColorRamp::Rainbow => rainbow(t),
            ColorRamp::Warm => cubehelix_long(
                Cubehelix::new(-100.0, 0.75, 0.35),
                Cubehelix::new(80.0, 1.5, 0.8),
                t,
            ),
            ColorRamp::Cool => cubehelix_long(
                Cubehelix::new(260.0, 0.75, 0.35),
                Cubehelix::new(80.0, 1.5, 0.8),
                t,
            ),
            ColorRamp::CubehelixDefault => cubehelix_long(
                Cubehelix::new(300.0, 0.5, 0.0),
                Cubehelix::new(-240.0, 0.5, 1.0),
                t,
            ),
            _ => rgb_basis(&decode_stops(self.stops().unwrap_or_default()), t),
        }
    }
}

impl TryFrom<String> for ColorRamp {
    type Error = strum::ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ColorRamp::from_str(&value)
    }
}

impl From<ColorRamp> for String {
    fn from(value: ColorRamp) -> Self {
        value.to_string()
    }
}

pub type InterpolateFn = dyn Fn(f64) -> Color + Send + Sync;

/// How a normalized value becomes a color: a named ramp or a caller function
#[derive(Clone)]
pub enum Interpolate {
    Ramp(ColorRamp),
    Custom(Arc<InterpolateFn>),
}

impl Interpolate {
    pub fn custom(f: impl Fn(f64) -> Color + Send + Sync + 'static) -> Self {
        Interpolate::Custom(Arc::new(f))
    }

    pub fn color(&self, t: f64) -> Color {
        match self {
            Interpolate::Ramp(ramp) => ramp.interpolate(t),
            Interpolate::Custom(f) => f(t),
        }
    }
}

impl Default for Interpolate {
    fn default() -> Self {
        Interpolate::Ramp(ColorRamp::Blues)
    }
}

impl fmt::Debug for Interpolate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Interpolate::Ramp(ramp) => write!(f, "Ramp({ramp})"),
            Interpolate::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl From<ColorRamp> for Interpolate {
    fn from(value: ColorRamp) -> Self {
        Interpolate::Ramp(value)
    }
}

impl<'de> Deserialize<'de> for Interpolate {
    /// Unknown names resolve to the default ramp instead of failing
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Interpolate::Ramp(ColorRamp::resolve(&name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use strum::IntoEnumIterator;

    #[rstest]
    #[case("blues", ColorRamp::Blues)]
    #[case("Blues", ColorRamp::Blues)]
    #[case("interpolateBlues", ColorRamp::Blues)]
    #[case("INTERPOLATEREDS", ColorRamp::Reds)]
    #[case("ylOrRd", ColorRamp::YlOrRd)]
    #[case("interpolateRdYlGn", ColorRamp::RdYlGn)]
    #[case("cubehelixDefault", ColorRamp::CubehelixDefault)]
    #[case(" viridis ", ColorRamp::Viridis)]
    fn test_resolve_names(#[case] name: &str, #[case] expected: ColorRamp) {
        assert_eq!(ColorRamp::resolve(name), expected);
    }

    #[test]
    fn test_unknown_name_falls_back_to_blues() {
        assert_eq!(ColorRamp::resolve("notARamp"), ColorRamp::Blues);
        assert_eq!(ColorRamp::resolve(""), ColorRamp::Blues);
    }

    #[test]
    fn test_sequential_ends() {
        assert_eq!(ColorRamp::Blues.interpolate(0.0).to_rgb8(), [0xf7, 0xfb, 0xff]);
        assert_eq!(ColorRamp::Blues.interpolate(1.0).to_rgb8(), [0x08, 0x30, 0x6b]);
        assert_eq!(ColorRamp::Viridis.interpolate(0.0).to_rgb8(), [0x44, 0x01, 0x54]);
        assert_eq!(ColorRamp::Viridis.interpolate(1.0).to_rgb8(), [0xfd, 0xe7, 0x25]);
    }

    #[test]
    fn test_perceptual_ramps_hit_stops() {
        for ramp in [
            ColorRamp::Viridis,
            ColorRamp::Magma,
            ColorRamp::Inferno,
            ColorRamp::Plasma,
        ] {
            let stops = ramp.stops().unwrap();
            for (i, stop) in stops.iter().enumerate() {
                let expected = [(stop >> 16) as u8, (stop >> 8) as u8, *stop as u8];
                let actual = ramp.interpolate(i as f64 / 10.0).to_rgb8();
                assert_eq!(actual, expected, "{ramp} at {i}");
            }
        }
        assert_eq!(ColorRamp::Viridis.interpolate(0.5).to_rgb8(), [0x21, 0x91, 0x8c]);
    }

    #[test]
    fn test_out_of_range_clamps() {
        for ramp in ColorRamp::iter() {
            assert_eq!(ramp.interpolate(-3.0), ramp.interpolate(0.0), "{ramp}");
            assert_eq!(ramp.interpolate(7.0), ramp.interpolate(1.0), "{ramp}");
            assert!(!ramp.interpolate(0.5).is_transparent(), "{ramp}");
        }
    }

    #[test]
    fn test_custom_interpolate() {
        let interpolate = Interpolate::custom(|t| if t < 0.5 { Color::BLACK } else { Color::WHITE });
        assert_eq!(interpolate.color(0.2), Color::BLACK);
        assert_eq!(interpolate.color(0.8), Color::WHITE);
    }

    #[test]
    fn test_deserialize_interpolate() {
        let interpolate: Interpolate = serde_json::from_str("\"interpolateViridis\"").unwrap();
        assert!(matches!(interpolate, Interpolate::Ramp(ColorRamp::Viridis)));
        let interpolate: Interpolate = serde_json::from_str("\"nope\"").unwrap();
        assert!(matches!(interpolate, Interpolate::Ramp(ColorRamp::Blues)));
    }
}
