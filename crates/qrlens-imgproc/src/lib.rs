#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// color transformations module.
pub mod color;

/// utilities to draw on images.
pub mod draw;

/// planar geometry on integer image coordinates.
pub mod geometry;

/// module containing parallization utilities.
pub mod parallel;
