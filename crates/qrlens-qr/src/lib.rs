#![deny(missing_docs)]
//! Decoding of QR codes, and linear barcodes, with three interchangeable libraries.
//!
//! Every library is wrapped by a [`DecoderAdapter`] that turns one RGB frame into a
//! [`DecodeOutcome`]. The points of the decoded symbols are normalized into drawable
//! polygons by [`geometry`] and drawn back over the frame by [`overlay`].

/// common interface over the wrapped libraries.
pub mod adapter;

/// detector backed by `rqrr`.
pub mod builtin;

mod error;

/// normalization of symbol points into polygons.
pub mod geometry;

mod linear;

/// drawing of decoded symbols over frames.
pub mod overlay;

/// reader backed by `rxing`.
pub mod reader;

/// scanner backed by `bardecoder`.
pub mod scanner;

/// decoded symbols and per-frame outcomes.
pub mod symbol;

pub use crate::adapter::{create_decoder, DecodeFrameExt, DecoderAdapter, DecoderKind};
pub use crate::builtin::BuiltinDetector;
pub use crate::error::QrError;
pub use crate::geometry::{normalize_points, Polygon};
pub use crate::overlay::{render_symbols, OverlayStyle};
pub use crate::reader::QrLibraryReader;
pub use crate::scanner::BarcodeScanner;
pub use crate::symbol::{DecodeOutcome, DecodedSymbol};
