use qrlens_image::Image;
use qrlens_imgproc::geometry::Point2i;
use rqrr::{BitGrid, PreparedImage};

use crate::{
    adapter::{DecoderAdapter, DecoderKind, LuminanceBuffer},
    error::QrError,
    overlay::OverlayStyle,
    symbol::{DecodeOutcome, DecodedSymbol, QR_CODE_TYPE},
};

/// Detector backed by `rqrr`.
///
/// Reports the four grid corners of every symbol, ordered top-left, top-right,
/// bottom-right, bottom-left relative to the symbol.
#[derive(Default)]
pub struct BuiltinDetector {
    luminance: LuminanceBuffer,
}

impl BuiltinDetector {
    /// Create a new detector.
    pub fn new() -> Self {
        Self::default()
    }
}

impl DecoderAdapter for BuiltinDetector {
    fn name(&self) -> &'static str {
        DecoderKind::Builtin.label()
    }

    fn overlay_style(&self) -> OverlayStyle {
        OverlayStyle::Rectangle
    }

    fn decode(&mut self, frame: &Image<u8, 3>) -> DecodeOutcome {
        let outcome = self.decode_frame(frame);
        outcome.log(self.name());
        outcome
    }
}

impl BuiltinDetector {
    fn decode_frame(&mut self, frame: &Image<u8, 3>) -> DecodeOutcome {
        if frame.size().is_empty() {
            return DecodeOutcome::NotFound;
        }

        let gray = match self.luminance.update(frame) {
            Ok(gray) => gray,
            Err(e) => return DecodeOutcome::Failed(e.into()),
        };

        let width = gray.width();
        let data = gray.as_slice();
        let mut prepared =
            PreparedImage::prepare_from_greyscale(width, gray.height(), |x, y| data[y * width + x]);

        let grids = prepared.detect_grids();
        if grids.is_empty() {
            return DecodeOutcome::NotFound;
        }

        let mut symbols = Vec::with_capacity(grids.len());
        let mut failures = Vec::new();
        for grid in grids {
            let points = grid_corners(&grid.bounds, grid.grid.size());

            match grid.decode() {
                Ok((_meta, content)) => {
                    symbols.push(DecodedSymbol::new(QR_CODE_TYPE, content, points));
                }
                Err(e) => {
                    log::debug!("rqrr failed to decode a grid: {e}");
                    failures.push(QrError::DecodingError(e.to_string()));
                }
            }
        }

        DecodeOutcome::collect(symbols, failures)
    }
}

/// Outer corners of a grid of `size` modules from the bounds reported by `rqrr`.
///
/// The bounds span `size + 1` modules from the top-left corner, so the other three
/// corners are pulled back towards it by one module.
fn grid_corners(bounds: &[rqrr::Point; 4], size: usize) -> Vec<Point2i> {
    let origin = bounds[0];
    let scale = size as f32 / (size as f32 + 1.0);

    bounds
        .iter()
        .map(|p| {
            Point2i::from_f32(
                origin.x as f32 + (p.x - origin.x) as f32 * scale,
                origin.y as f32 + (p.y - origin.y) as f32 * scale,
            )
        })
        .collect()
}
