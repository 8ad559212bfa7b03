#[derive(Debug, thiserror::Error)]
pub enum GeoProjectionError {
    #[error("GeoJSON error: {0}")]
    GeoJsonError(#[from] geojson::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Unsupported geographic object: {0}")]
    UnsupportedObject(String),

    #[error("Reference bounds have not been computed. Call compute_bounds with an outline before fitting")]
    MissingReferenceBounds,
}
