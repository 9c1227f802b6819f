#![deny(missing_docs)]
//! Image types for frames flowing through the qrlens pipeline

/// image representation for frames and luminance buffers.
pub mod image;

/// Error types for the image module.
pub mod error;

pub use crate::error::ImageError;
pub use crate::image::{Image, ImageSize};
