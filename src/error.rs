//! Error types for the outrank library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for outrank operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during outline extraction and ranking.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed collection configuration. Fatal for the run.
    #[error("Invalid collection config: {0}")]
    Config(String),

    /// Error parsing PDF structure. Fatal for the affected document only.
    #[error("PDF parsing error: {0}")]
    Parse(String),

    /// Required local model assets are absent. Fatal at startup, before any
    /// document is processed.
    #[error("Model asset not found: {0}. Place the exported ONNX cross-encoder and its tokenizer.json in the model directory")]
    ModelUnavailable(PathBuf),

    /// Tokenizer or model runtime failure. Callers degrade the affected
    /// document to an all-zero score vector.
    #[error("Scoring error: {0}")]
    Scoring(String),

    /// Error extracting text content.
    #[error("Text extraction error: {0}")]
    TextExtract(String),

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Error serializing output JSON.
    #[error("Rendering error: {0}")]
    Render(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            _ => Error::Parse(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::PageOutOfRange(10, 5);
        assert_eq!(
            err.to_string(),
            "Page 10 is out of range (document has 5 pages)"
        );

        let err = Error::Scoring("tokenizer failed".to_string());
        assert_eq!(err.to_string(), "Scoring error: tokenizer failed");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_model_unavailable_names_path() {
        let err = Error::ModelUnavailable(PathBuf::from("/models/cross-encoder.onnx"));
        assert!(err.to_string().contains("/models/cross-encoder.onnx"));
    }
}
