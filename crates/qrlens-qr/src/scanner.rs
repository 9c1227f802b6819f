use bardecoder::{
    decode::{Decode, QRDecoder},
    detect::{Detect, LineScan, Location},
    extract::{Extract, QRExtractor},
    prepare::{BlockedMean, Prepare},
};
use image::{DynamicImage, GrayImage};
use qrlens_image::{Image, ImageError};
use qrlens_imgproc::geometry::Point2i;

use crate::{
    adapter::{DecoderAdapter, DecoderKind, LuminanceBuffer},
    error::QrError,
    linear,
    overlay::OverlayStyle,
    symbol::{DecodeOutcome, DecodedSymbol, QR_CODE_TYPE},
};

/// Distance in modules between a finder pattern centre and the symbol's outer edge.
const FINDER_CENTER_TO_EDGE: f64 = 3.5;

/// Scanner backed by `bardecoder` for QR codes and the `rxing` row readers for linear
/// barcodes.
///
/// For QR codes the library only reports the three finder pattern centres, so the
/// outline is extrapolated from them to the four outer corners using the estimated
/// module size. Linear barcodes carry a start and an end point for every row that read
/// them, and are labelled with their symbology.
pub struct BarcodeScanner {
    luminance: LuminanceBuffer,
    prepare: BlockedMean,
    extract: QRExtractor,
    decoder: QRDecoder,
}

impl Default for BarcodeScanner {
    fn default() -> Self {
        Self {
            luminance: LuminanceBuffer::default(),
            prepare: BlockedMean::new(5, 7),
            extract: QRExtractor::new(),
            decoder: QRDecoder::new(),
        }
    }
}

impl BarcodeScanner {
    /// Create a new scanner.
    pub fn new() -> Self {
        Self::default()
    }
}

impl DecoderAdapter for BarcodeScanner {
    fn name(&self) -> &'static str {
        DecoderKind::Scanner.label()
    }

    fn overlay_style(&self) -> OverlayStyle {
        OverlayStyle::Hull
    }

    fn decode(&mut self, frame: &Image<u8, 3>) -> DecodeOutcome {
        let outcome = self.decode_frame(frame);
        outcome.log(self.name());
        outcome
    }
}

impl BarcodeScanner {
    fn decode_frame(&mut self, frame: &Image<u8, 3>) -> DecodeOutcome {
        if frame.size().is_empty() {
            return DecodeOutcome::NotFound;
        }

        let gray = match self.luminance.update(frame) {
            Ok(gray) => gray,
            Err(e) => return DecodeOutcome::Failed(e.into()),
        };

        let Some(luma) = GrayImage::from_raw(
            gray.width() as u32,
            gray.height() as u32,
            gray.as_slice().to_vec(),
        ) else {
            let err = ImageError::InvalidChannelShape(gray.as_slice().len(), gray.size().area());
            return DecodeOutcome::Failed(err.into());
        };
        let img = DynamicImage::ImageLuma8(luma);

        // every located symbol is extracted from the same binarized image it was found in
        let prepared: GrayImage = self.prepare.prepare(&img);
        let locations = LineScan {}.detect(&prepared);

        let mut symbols = Vec::with_capacity(locations.len());
        let mut failures = Vec::new();
        for location in locations {
            let loc = match location {
                Location::QR(loc) => loc,
            };

            let points = outer_corners(
                (loc.top_left.x, loc.top_left.y),
                (loc.top_right.x, loc.top_right.y),
                (loc.bottom_left.x, loc.bottom_left.y),
                loc.module_size,
            );

            let data = self.extract.extract(&prepared, loc);
            match self.decoder.decode(data) {
                Ok(text) => symbols.push(DecodedSymbol::new(QR_CODE_TYPE, text, points)),
                Err(e) => {
                    log::debug!("bardecoder failed to decode a symbol: {e}");
                    failures.push(QrError::DecodingError(e.to_string()));
                }
            }
        }

        symbols.extend(linear::scan_rows(gray));

        DecodeOutcome::collect(symbols, failures)
    }
}

/// Extrapolate the outer corners of a symbol from its finder pattern centres.
///
/// Returns the corners ordered top-left, top-right, bottom-right, bottom-left. When the
/// centres are degenerate the three centres themselves are returned.
fn outer_corners(
    top_left: (f64, f64),
    top_right: (f64, f64),
    bottom_left: (f64, f64),
    module_size: f64,
) -> Vec<Point2i> {
    let (ux, uy) = (top_right.0 - top_left.0, top_right.1 - top_left.1);
    let (vx, vy) = (bottom_left.0 - top_left.0, bottom_left.1 - top_left.1);
    let (u_len, v_len) = (ux.hypot(uy), vx.hypot(vy));

    let to_point = |(x, y): (f64, f64)| Point2i::from_f32(x as f32, y as f32);

    if u_len == 0.0 || v_len == 0.0 {
        return [top_left, top_right, bottom_left].map(to_point).to_vec();
    }

    let pad = module_size * FINDER_CENTER_TO_EDGE;
    let (ux, uy) = (ux / u_len * pad, uy / u_len * pad);
    let (vx, vy) = (vx / v_len * pad, vy / v_len * pad);

    let bottom_right = (
        top_right.0 + bottom_left.0 - top_left.0,
        top_right.1 + bottom_left.1 - top_left.1,
    );

    [
        (top_left.0 - ux - vx, top_left.1 - uy - vy),
        (top_right.0 + ux - vx, top_right.1 + uy - vy),
        (bottom_right.0 + ux + vx, bottom_right.1 + uy + vy),
        (bottom_left.0 - ux + vx, bottom_left.1 - uy + vy),
    ]
    .map(to_point)
    .to_vec()
}
