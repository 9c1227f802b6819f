#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for I/O operations.
///
/// Defines [`IoError`](error::IoError) variants for unavailable sources, file access
/// and encoding/decoding failures.
pub mod error;

/// Frame rate counter for the display loop.
pub mod fps_counter;

/// High-level image reading and writing functions.
///
/// See [`functional::read_image_any_rgb8`] for automatic format detection.
pub mod functional;

/// Display sinks and the process stop signal.
pub mod sink;

/// Frame sources feeding the display loop.
pub mod source;

pub use crate::error::IoError;
