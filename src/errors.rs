/// Errors raised while sizing, measuring or drawing a card.
///
/// Only [`RenderError::Surface`] aborts a render pass. Everything else is isolated to the
/// element that produced it and ends up in the pass diagnostics.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RenderError {
    #[error("Invalid dimension: {0}")]
    InvalidDimension(String),

    #[error("Failed to load resource {key}: {reason}")]
    ResourceLoadFailure { key: String, reason: String },

    #[error("Text metrics unavailable for font {font}: {reason}")]
    MeasurementUnavailable { font: String, reason: String },

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Surface error: {0}")]
    Surface(String),

    #[error("Render worker has stopped")]
    WorkerStopped,
}

/// Errors produced by an image loader.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Net(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {0}")]
    Status(u16),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Unexpected content type {0}")]
    ContentType(String),

    #[error("Load timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("Resource not found")]
    NotFound,

    #[error("Unsupported source: {0}")]
    UnsupportedSource(String),
}

impl From<png::DecodingError> for LoadError {
    fn from(e: png::DecodingError) -> Self {
        LoadError::Decode(e.to_string())
    }
}
