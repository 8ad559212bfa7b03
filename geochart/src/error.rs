use geochart_canvas::CanvasError;
use geochart_projection::GeoProjectionError;
use geochart_scales::ScaleError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeoChartError {
    #[error("Invalid chart configuration: {0}")]
    InvalidConfig(#[from] serde_json::Error),

    #[error("No chart type registered for `{0}`")]
    UnknownChartType(String),

    #[error("No scale type registered for `{0}`")]
    UnknownScaleType(String),

    #[error("Scale `{id}` is not a {expected} scale")]
    ScaleRoleMismatch { id: String, expected: &'static str },

    #[error("Missing scale `{0}`")]
    MissingScale(String),

    #[error("Invalid feature in dataset {dataset_index} at index {index}: {source}")]
    InvalidFeature {
        dataset_index: usize,
        index: usize,
        #[source]
        source: GeoProjectionError,
    },

    #[error("Projection error: {0}")]
    ProjectionError(#[from] GeoProjectionError),

    #[error("Scale error: {0}")]
    ScaleError(#[from] ScaleError),

    #[error("Canvas error: {0}")]
    CanvasError(#[from] CanvasError),
}
