//! Error handling for the relevance engine

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelevanceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Text extraction error: {0}")]
    Extraction(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Embedding generation error: {0}")]
    Embedding(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Processing error: {0}")]
    Processing(String),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, RelevanceError>;

impl RelevanceError {
    /// True for the errors a resume upload can legitimately produce at the parse boundary.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            RelevanceError::UnsupportedFormat(_)
                | RelevanceError::Extraction(_)
                | RelevanceError::Validation(_)
        )
    }
}

/// Convert anyhow errors to our custom error type
impl From<anyhow::Error> for RelevanceError {
    fn from(err: anyhow::Error) -> Self {
        RelevanceError::Processing(err.to_string())
    }
}
