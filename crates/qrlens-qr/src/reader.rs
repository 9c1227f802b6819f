use qrlens_image::Image;
use qrlens_imgproc::geometry::Point2i;
use rxing::{
    common::GlobalHistogramBinarizer, qrcode::QRCodeReader, BinaryBitmap, DecodeHintType,
    DecodeHintValue, DecodingHintDictionary, Exceptions, Luma8LuminanceSource, Reader,
};

use crate::{
    adapter::{DecoderAdapter, DecoderKind, LuminanceBuffer},
    error::QrError,
    linear::symbology_name,
    overlay::OverlayStyle,
    symbol::{DecodeOutcome, DecodedSymbol},
};

/// Reader backed by the `rxing` QR code reader.
///
/// Binarizes with a global histogram and reads a single symbol per frame, trying harder.
/// The points are the result points of the detector: the bottom-left, top-left and
/// top-right finder pattern centres, plus the alignment pattern when there is one.
pub struct QrLibraryReader {
    luminance: LuminanceBuffer,
    hints: DecodingHintDictionary,
}

impl Default for QrLibraryReader {
    fn default() -> Self {
        let mut hints = DecodingHintDictionary::new();
        hints.insert(DecodeHintType::TRY_HARDER, DecodeHintValue::TryHarder(true));
        Self {
            luminance: LuminanceBuffer::default(),
            hints,
        }
    }
}

impl QrLibraryReader {
    /// Create a new reader.
    pub fn new() -> Self {
        Self::default()
    }
}

impl DecoderAdapter for QrLibraryReader {
    fn name(&self) -> &'static str {
        DecoderKind::Reader.label()
    }

    fn overlay_style(&self) -> OverlayStyle {
        OverlayStyle::ResultPoints
    }

    fn decode(&mut self, frame: &Image<u8, 3>) -> DecodeOutcome {
        let outcome = self.decode_frame(frame);
        outcome.log(self.name());
        outcome
    }
}

impl QrLibraryReader {
    fn decode_frame(&mut self, frame: &Image<u8, 3>) -> DecodeOutcome {
        if frame.size().is_empty() {
            return DecodeOutcome::NotFound;
        }

        let gray = match self.luminance.update(frame) {
            Ok(gray) => gray,
            Err(e) => return DecodeOutcome::Failed(e.into()),
        };

        let mut bitmap = BinaryBitmap::new(GlobalHistogramBinarizer::new(
            Luma8LuminanceSource::new(
                gray.as_slice().to_vec(),
                gray.width() as u32,
                gray.height() as u32,
            ),
        ));
        let result = QRCodeReader.decode_with_hints(&mut bitmap, &self.hints);

        match result {
            Ok(result) => {
                let points = result
                    .getPoints()
                    .iter()
                    .map(|p| Point2i::from_f32(p.x, p.y))
                    .collect();
                DecodeOutcome::Found(vec![DecodedSymbol::new(
                    symbology_name(*result.getBarcodeFormat()),
                    result.getText(),
                    points,
                )])
            }
            Err(Exceptions::NotFoundException(_)) => DecodeOutcome::NotFound,
            Err(e) => DecodeOutcome::Failed(QrError::DecodingError(format!("{e:?}"))),
        }
    }
}
