use std::fmt;

use indexmap::IndexMap;
use serde_json::Value;

use crate::config::{ChartOptions, DatasetConfig};
use crate::controller::{BubbleMapController, ChoroplethController, DatasetController};
use crate::error::GeoChartError;
use crate::scales::{
    create_color_logarithmic_scale, create_color_scale, create_projection_scale,
    create_size_logarithmic_scale, create_size_scale, ChartScale,
};

pub type ScaleFactory = fn(&str, Value) -> Result<ChartScale, GeoChartError>;

/// Everything a controller is built from
pub struct ControllerInit<'a> {
    pub dataset_index: usize,
    pub dataset: DatasetConfig,
    pub options: &'a ChartOptions,
}

pub type ControllerFactory =
    fn(ControllerInit<'_>) -> Result<Box<dyn DatasetController>, GeoChartError>;

/// Chart and scale types available to a chart, keyed by type id
#[derive(Clone, Default)]
pub struct Registry {
    scales: IndexMap<String, ScaleFactory>,
    controllers: IndexMap<String, ControllerFactory>,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("scales", &self.scales.keys().collect::<Vec<_>>())
            .field("controllers", &self.controllers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Registry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the projection, color and size scales and the
    /// choropleth and bubble map chart types
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry
            .register_scale("projection", create_projection_scale)
            .register_scale("color", create_color_scale)
            .register_scale("colorLogarithmic", create_color_logarithmic_scale)
            .register_scale("size", create_size_scale)
            .register_scale("sizeLogarithmic", create_size_logarithmic_scale)
            .register_controller(ChoroplethController::ID, ChoroplethController::create)
            .register_controller(BubbleMapController::ID, BubbleMapController::create);
        registry
    }

    pub fn register_scale(&mut self, type_id: impl Into<String>, factory: ScaleFactory) -> &mut Self {
        self.scales.insert(type_id.into(), factory);
        self
    }

    pub fn register_controller(
        &mut self,
        type_id: impl Into<String>,
        factory: ControllerFactory,
    ) -> &mut Self {
        self.controllers.insert(type_id.into(), factory);
        self
    }

    pub fn scale_types(&self) -> impl Iterator<Item = &str> {
        self.scales.keys().map(String::as_str)
    }

    pub fn chart_types(&self) -> impl Iterator<Item = &str> {
        self.controllers.keys().map(String::as_str)
    }

    pub fn create_scale(&self, type_id: &str, id: &str, options: Value) -> Result<ChartScale, GeoChartError> {
        let factory = self
            .scales
            .get(type_id)
            .ok_or_else(|| GeoChartError::UnknownScaleType(type_id.to_string()))?;
        factory(id, options)
    }

    pub fn create_controller(
        &self,
        type_id: &str,
        init: ControllerInit<'_>,
    ) -> Result<Box<dyn DatasetController>, GeoChartError> {
        let factory = self
            .controllers
            .get(type_id)
            .ok_or_else(|| GeoChartError::UnknownChartType(type_id.to_string()))?;
        factory(init)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_types() {
        let registry = Registry::with_defaults();
        assert_eq!(
            registry.scale_types().collect::<Vec<_>>(),
            vec!["projection", "color", "colorLogarithmic", "size", "sizeLogarithmic"]
        );
        assert_eq!(
            registry.chart_types().collect::<Vec<_>>(),
            vec!["choropleth", "bubbleMap"]
        );
    }

    #[test]
    fn test_unknown_scale_type() {
        let registry = Registry::with_defaults();
        let err = registry.create_scale("radial", "r", json!({})).unwrap_err();
        assert!(matches!(err, GeoChartError::UnknownScaleType(id) if id == "radial"));
    }

    #[test]
    fn test_empty_registry_has_nothing() {
        let registry = Registry::new();
        assert!(matches!(
            registry.create_scale("color", "color", json!({})),
            Err(GeoChartError::UnknownScaleType(_))
        ));
    }

    #[test]
    fn test_scale_options_are_validated() {
        let registry = Registry::with_defaults();
        let err = registry
            .create_scale("size", "size", json!({"range": [-1, 5]}))
            .unwrap_err();
        assert!(matches!(err, GeoChartError::ScaleError(_)));
    }
}
