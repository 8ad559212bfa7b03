use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::GeoChartCommonError;

/// Straight (non-premultiplied) RGBA color with components in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color(pub [f32; 4]);

impl Color {
    pub const TRANSPARENT: Color = Color([0.0, 0.0, 0.0, 0.0]);
    pub const BLACK: Color = Color([0.0, 0.0, 0.0, 1.0]);
    pub const WHITE: Color = Color([1.0, 1.0, 1.0, 1.0]);
    pub const BLUE: Color = Color([0.0, 0.0, 1.0, 1.0]);

    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self([r, g, b, a])
    }

    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self([r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0])
    }

    /// Build a color from channels on the 0-255 scale, clamping out of range values.
    pub fn from_rgb_f64(r: f64, g: f64, b: f64) -> Self {
        let channel = |v: f64| (v.round().clamp(0.0, 255.0) / 255.0) as f32;
        Self([channel(r), channel(g), channel(b), 1.0])
    }

    pub fn red(&self) -> f32 {
        self.0[0]
    }

    pub fn green(&self) -> f32 {
        self.0[1]
    }

    pub fn blue(&self) -> f32 {
        self.0[2]
    }

    pub fn alpha(&self) -> f32 {
        self.0[3]
    }

    pub fn components(&self) -> [f32; 4] {
        self.0
    }

    pub fn is_transparent(&self) -> bool {
        self.0[3] <= 0.0
    }

    /// Channels as 0-255 integers
    pub fn to_rgb8(&self) -> [u8; 3] {
        let c = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [c(self.0[0]), c(self.0[1]), c(self.0[2])]
    }

    /// CSS functional notation, `rgb(r, g, b)` for opaque colors and
    /// `rgba(r, g, b, a)` otherwise.
    pub fn to_css(&self) -> String {
        let [r, g, b] = self.to_rgb8();
        let a = self.0[3].clamp(0.0, 1.0);
        if a >= 1.0 {
            format!("rgb({r}, {g}, {b})")
        } else {
            format!("rgba({r}, {g}, {b}, {a})")
        }
    }
}

impl FromStr for Color {
    type Err = GeoChartCommonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("transparent") {
            return Ok(Color::TRANSPARENT);
        }
        match trimmed.parse::<css_color_parser::Color>() {
            Ok(color) => Ok(Color([
                color.r as f32 / 255.0,
                color.g as f32 / 255.0,
                color.b as f32 / 255.0,
                color.a,
            ])),
            Err(_) => Err(GeoChartCommonError::InvalidColor(s.to_string())),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0
            .iter()
            .for_each(|v| OrderedFloat::from(*v).hash(state));
    }
}

impl From<[f32; 4]> for Color {
    fn from(value: [f32; 4]) -> Self {
        Color(value)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_css())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Css(String),
    Rgba([f32; 4]),
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match ColorRepr::deserialize(deserializer)? {
            ColorRepr::Css(s) => s.parse().map_err(serde::de::Error::custom),
            ColorRepr::Rgba(c) => Ok(Color(c)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    #[test]
    fn test_parse_hex_and_named() {
        let c: Color = "#ff0000".parse().unwrap();
        assert_eq!(c, Color::new(1.0, 0.0, 0.0, 1.0));

        let c: Color = "steelblue".parse().unwrap();
        assert_eq!(c.to_rgb8(), [70, 130, 180]);

        let c: Color = "transparent".parse().unwrap();
        assert!(c.is_transparent());
    }

    #[test]
    fn test_parse_rgba_function() {
        let c: Color = "rgba(0, 0, 255, 0.5)".parse().unwrap();
        assert_eq!(c.to_rgb8(), [0, 0, 255]);
        assert_approx_eq!(f32, c.alpha(), 0.5);
        assert_eq!(c.to_css(), "rgba(0, 0, 255, 0.5)");
    }

    #[test]
    fn test_invalid_color() {
        let err = "not-a-color".parse::<Color>().unwrap_err();
        assert_eq!(err, GeoChartCommonError::InvalidColor("not-a-color".to_string()));
    }

    #[test]
    fn test_css_output_rounds_channels() {
        let c = Color::from_rgb_f64(247.2, 251.0, 300.0);
        assert_eq!(c.to_css(), "rgb(247, 251, 255)");
    }
}
