#[derive(Debug, thiserror::Error)]
pub enum ScaleError {
    #[error("Invalid options for scale `{id}`: {source}")]
    InvalidOptions {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Size range must be finite and non-negative, got {0:?}")]
    InvalidSizeRange([f64; 2]),
}
