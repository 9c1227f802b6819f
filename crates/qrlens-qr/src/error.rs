use qrlens_image::ImageError;
use thiserror::Error;

/// Error type for QR code detection and decoding operations.
#[derive(Error, Debug)]
pub enum QrError {
    /// Error preparing the luminance buffer.
    #[error("Image processing error: {0}")]
    ImageProcessingError(#[from] ImageError),

    /// A symbol was located but the library failed to decode it.
    #[error("Failed to decode QR code: {0}")]
    DecodingError(String),

    /// The decoder name does not match any known variant.
    #[error("Unknown decoder: {0} (expected one of builtin, scanner, reader)")]
    UnknownDecoder(String),
}
