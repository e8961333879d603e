//! Error types for the cardex-core library.
//!
//! Missing or malformed card data is never an error: extraction reports it as an
//! absent field. These types cover the ambient edges only (configuration, the
//! OCR collaborator and file I/O).

use thiserror::Error;

/// Main error type for the cardex library.
#[derive(Error, Debug)]
pub enum CardexError {
    /// OCR collaborator error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// A configured keyword or allow-list could not be compiled into a pattern.
    #[error("pattern error: {0}")]
    Pattern(#[from] regex::Error),

    /// Configuration file could not be parsed or serialized.
    #[error("configuration error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors reported by an [`OcrService`](crate::ocr::OcrService) implementation.
#[derive(Error, Debug)]
pub enum OcrError {
    /// No credentials were configured for the OCR service.
    #[error("missing API key for OCR service")]
    MissingApiKey,

    /// The request could not be sent or the service answered with an HTTP error.
    #[error("OCR request failed: {0}")]
    Request(String),

    /// The service processed the request but reported a failure.
    #[error("OCR processing failed: {0}")]
    Service(String),

    /// The service returned an empty transcription.
    #[error("no text found in image")]
    NoText,

    /// The image could not be decoded or re-encoded before upload.
    #[error("invalid image: {0}")]
    InvalidImage(String),
}

/// Result type for the cardex library.
pub type Result<T> = std::result::Result<T, CardexError>;
