#[derive(Debug, thiserror::Error)]
pub enum CanvasError {
    #[error("Unable to allocate a {width}x{height} raster")]
    AllocationFailed { width: u32, height: u32 },

    #[error("PNG encoding error: {0}")]
    PngEncodingError(String),
}
