use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Critical data unavailable for {0}")]
    DataUnavailable(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rendering error: {0}")]
    RenderingError(String),
}
