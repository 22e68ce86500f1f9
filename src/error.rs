//! Error types for card export operations

use thiserror::Error;

/// Result type alias using qcard's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for card export operations
#[derive(Error, Debug)]
pub enum Error {
    /// QR payload does not fit the symbol at the requested parameters
    #[error("QR payload exceeds symbol capacity: {0}")]
    QrCapacity(String),

    /// QR code encoding failed for a reason other than capacity
    #[error("Failed to encode QR code: {0}")]
    QrEncode(String),

    /// No asset registered under the requested identifier
    #[error("Asset not registered: {0}")]
    AssetNotFound(String),

    /// Asset bytes could not be read or decoded
    #[error("Failed to load asset: {0}")]
    AssetLoad(String),

    /// Pixel data could not be re-encoded for embedding
    #[error("Failed to extract image pixels: {0}")]
    PixelExtract(String),

    /// PDF serialization or persistence failed
    #[error("Failed to save document: {0}")]
    DocumentSave(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Image processing error
    #[error("Image processing error: {0}")]
    Image(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

// Implement From conversions for common error types

impl From<image::ImageError> for Error {
    fn from(e: image::ImageError) -> Self {
        Error::Image(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Other(format!("JSON error: {}", e))
    }
}
