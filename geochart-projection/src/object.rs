use std::str::FromStr;

use geo::Contains;
use geo_types::{Geometry, Point};
use geojson::GeoJson;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::error::GeoProjectionError;

/// A GeoJSON feature with its geometry converted to `geo-types`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Feature {
    pub id: Option<Value>,
    pub geometry: Option<Geometry<f64>>,
    pub properties: Map<String, Value>,
}

impl Feature {
    pub fn from_geometry(geometry: impl Into<Geometry<f64>>) -> Self {
        Self {
            id: None,
            geometry: Some(geometry.into()),
            properties: Map::new(),
        }
    }

    pub fn with_property(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Parse a JSON feature. A bare geometry becomes a feature without properties.
    pub fn from_json_value(value: Value) -> Result<Self, GeoProjectionError> {
        match GeoJson::from_json_value(value)? {
            GeoJson::Feature(feature) => Self::try_from(feature),
            GeoJson::Geometry(geometry) => Ok(Self::from_geometry(Geometry::<f64>::try_from(
                geometry.value,
            )?)),
            GeoJson::FeatureCollection(_) => Err(GeoProjectionError::UnsupportedObject(
                "expected a feature, found a feature collection".to_string(),
            )),
        }
    }
}

impl TryFrom<geojson::Feature> for Feature {
    type Error = GeoProjectionError;

    fn try_from(feature: geojson::Feature) -> Result<Self, Self::Error> {
        let geometry = match feature.geometry {
            Some(geometry) => Some(Geometry::<f64>::try_from(geometry.value)?),
            None => None,
        };
        let id = feature.id.map(|id| match id {
            geojson::feature::Id::String(s) => Value::String(s),
            geojson::feature::Id::Number(n) => Value::Number(n),
        });
        Ok(Self {
            id,
            geometry,
            properties: feature.properties.unwrap_or_default(),
        })
    }
}

/// Anything that can be projected, measured and drawn
#[derive(Debug, Clone, PartialEq)]
pub enum GeoObject {
    /// The whole globe
    Sphere,
    Geometry(Geometry<f64>),
    Feature(Feature),
    FeatureCollection(Vec<Feature>),
}

impl Default for GeoObject {
    fn default() -> Self {
        GeoObject::Sphere
    }
}

impl GeoObject {
    /// Parse a JSON value. `{"type": "Sphere"}` is the globe, arrays are read
    /// as lists of features, anything else must be valid GeoJSON.
    pub fn from_json_value(value: Value) -> Result<Self, GeoProjectionError> {
        match value {
            Value::Array(items) => Ok(GeoObject::FeatureCollection(
                items
                    .into_iter()
                    .map(Feature::from_json_value)
                    .collect::<Result<Vec<_>, _>>()?,
            )),
            Value::Object(ref obj) if obj.get("type").and_then(Value::as_str) == Some("Sphere") => {
                Ok(GeoObject::Sphere)
            }
            other => Self::try_from(GeoJson::from_json_value(other)?),
        }
    }

    pub fn is_sphere(&self) -> bool {
        matches!(self, GeoObject::Sphere)
    }

    /// All geometries of the object. The sphere has none.
    pub fn geometries(&self) -> Vec<&Geometry<f64>> {
        match self {
            GeoObject::Sphere => vec![],
            GeoObject::Geometry(geometry) => vec![geometry],
            GeoObject::Feature(feature) => feature.geometry.iter().collect(),
            GeoObject::FeatureCollection(features) => features
                .iter()
                .filter_map(|feature| feature.geometry.as_ref())
                .collect(),
        }
    }

    /// Whether `[longitude, latitude]` lies inside the object.
    ///
    /// Containment is evaluated on the plane of longitude/latitude degrees.
    pub fn contains(&self, lon_lat: [f64; 2]) -> bool {
        if self.is_sphere() {
            return true;
        }
        let point = Point::new(lon_lat[0], lon_lat[1]);
        self.geometries()
            .into_iter()
            .any(|geometry| geometry_contains(geometry, &point))
    }
}

fn geometry_contains(geometry: &Geometry<f64>, point: &Point<f64>) -> bool {
    match geometry {
        Geometry::Polygon(polygon) => polygon.contains(point),
        Geometry::MultiPolygon(polygons) => polygons.contains(point),
        Geometry::Rect(rect) => rect.contains(point),
        Geometry::Triangle(triangle) => triangle.contains(point),
        Geometry::GeometryCollection(collection) => collection
            .iter()
            .any(|geometry| geometry_contains(geometry, point)),
        // Points and lines have no interior
        _ => false,
    }
}

impl TryFrom<GeoJson> for GeoObject {
    type Error = GeoProjectionError;

    fn try_from(value: GeoJson) -> Result<Self, Self::Error> {
        Ok(match value {
            GeoJson::Geometry(geometry) => {
                GeoObject::Geometry(Geometry::<f64>::try_from(geometry.value)?)
            }
            GeoJson::Feature(feature) => GeoObject::Feature(Feature::try_from(feature)?),
            GeoJson::FeatureCollection(collection) => GeoObject::FeatureCollection(
                collection
                    .features
                    .into_iter()
                    .map(Feature::try_from)
                    .collect::<Result<Vec<_>, _>>()?,
            ),
        })
    }
}

impl From<Geometry<f64>> for GeoObject {
    fn from(value: Geometry<f64>) -> Self {
        GeoObject::Geometry(value)
    }
}

impl From<Feature> for GeoObject {
    fn from(value: Feature) -> Self {
        GeoObject::Feature(value)
    }
}

impl From<Vec<Feature>> for GeoObject {
    fn from(value: Vec<Feature>) -> Self {
        GeoObject::FeatureCollection(value)
    }
}

impl FromStr for GeoObject {
    type Err = GeoProjectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_json_value(serde_json::from_str(s)?)
    }
}

impl<'de> Deserialize<'de> for GeoObject {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_json_value(value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn square() -> Value {
        json!({
            "type": "Feature",
            "id": "sq",
            "properties": {"name": "square"},
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[0, 0], [10, 0], [10, 10], [0, 10], [0, 0]]]
            }
        })
    }

    #[test]
    fn test_parse_sphere() {
        let obj = GeoObject::from_json_value(json!({"type": "Sphere"})).unwrap();
        assert!(obj.is_sphere());
        assert!(obj.contains([170.0, -80.0]));
    }

    #[test]
    fn test_parse_feature() {
        let obj = GeoObject::from_json_value(square()).unwrap();
        let GeoObject::Feature(feature) = &obj else {
            panic!("expected feature")
        };
        assert_eq!(feature.id, Some(json!("sq")));
        assert_eq!(feature.property("name"), Some(&json!("square")));
        assert!(obj.contains([5.0, 5.0]));
        assert!(!obj.contains([15.0, 5.0]));
    }

    #[test]
    fn test_array_becomes_feature_collection() {
        let obj = GeoObject::from_json_value(json!([square(), square()])).unwrap();
        let GeoObject::FeatureCollection(features) = &obj else {
            panic!("expected feature collection")
        };
        assert_eq!(features.len(), 2);
        assert_eq!(obj.geometries().len(), 2);
    }

    #[test]
    fn test_invalid_geojson() {
        assert!(GeoObject::from_json_value(json!({"type": "Blob"})).is_err());
    }
}
