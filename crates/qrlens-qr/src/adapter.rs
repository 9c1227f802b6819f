use std::{fmt, str::FromStr};

use qrlens_image::{Image, ImageError};
use qrlens_imgproc::color::gray_from_rgb_u8;

use crate::{
    builtin::BuiltinDetector, error::QrError, overlay::OverlayStyle, reader::QrLibraryReader,
    scanner::BarcodeScanner, symbol::DecodeOutcome,
};

/// Common interface over the decoding libraries under comparison.
///
/// Adapters are stateless between frames apart from reusable buffers, and they never
/// panic or return an error on a frame without symbols.
pub trait DecoderAdapter {
    /// Human readable name of the variant, also used as the window label.
    fn name(&self) -> &'static str;

    /// How the symbols found by this adapter are drawn.
    fn overlay_style(&self) -> OverlayStyle;

    /// Decode every symbol the library can find in an RGB frame.
    fn decode(&mut self, frame: &Image<u8, 3>) -> DecodeOutcome;
}

impl<D: DecoderAdapter + ?Sized> DecoderAdapter for Box<D> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn overlay_style(&self) -> OverlayStyle {
        (**self).overlay_style()
    }

    fn decode(&mut self, frame: &Image<u8, 3>) -> DecodeOutcome {
        (**self).decode(frame)
    }
}

/// The decoder variants, one per wrapped library.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DecoderKind {
    /// Detector built on `rqrr`.
    Builtin,
    /// Scanner built on `bardecoder`.
    Scanner,
    /// Reader built on `rxing`.
    Reader,
}

impl DecoderKind {
    /// Every variant, in presentation order.
    pub const ALL: [DecoderKind; 3] = [Self::Builtin, Self::Scanner, Self::Reader];

    /// Window label shown next to the annotated frames.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Builtin => "QRCode Builtin",
            Self::Scanner => "QRCode Scanner",
            Self::Reader => "QRCode Reader",
        }
    }
}

impl fmt::Display for DecoderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Builtin => "builtin",
            Self::Scanner => "scanner",
            Self::Reader => "reader",
        };
        write!(f, "{name}")
    }
}

impl FromStr for DecoderKind {
    type Err = QrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "builtin" => Ok(Self::Builtin),
            "scanner" => Ok(Self::Scanner),
            "reader" => Ok(Self::Reader),
            _ => Err(QrError::UnknownDecoder(s.to_string())),
        }
    }
}

/// Create the adapter for a decoder variant.
pub fn create_decoder(kind: DecoderKind) -> Box<dyn DecoderAdapter> {
    match kind {
        DecoderKind::Builtin => Box::new(BuiltinDetector::new()),
        DecoderKind::Scanner => Box::new(BarcodeScanner::new()),
        DecoderKind::Reader => Box::new(QrLibraryReader::new()),
    }
}

/// Trait extension for Image to decode it with any adapter.
pub trait DecodeFrameExt {
    /// Decode the image with the given adapter.
    fn decode_with(&self, decoder: &mut dyn DecoderAdapter) -> DecodeOutcome;
}

impl DecodeFrameExt for Image<u8, 3> {
    fn decode_with(&self, decoder: &mut dyn DecoderAdapter) -> DecodeOutcome {
        decoder.decode(self)
    }
}

/// Grayscale buffer reused across frames of the same size.
#[derive(Default)]
pub(crate) struct LuminanceBuffer {
    gray: Option<Image<u8, 1>>,
}

impl LuminanceBuffer {
    /// Convert the frame to luminance, reallocating only when the frame size changed.
    pub(crate) fn update(&mut self, frame: &Image<u8, 3>) -> Result<&Image<u8, 1>, ImageError> {
        let gray = match self.gray.take() {
            Some(gray) if gray.size() == frame.size() => gray,
            _ => Image::from_size_val(frame.size(), 0)?,
        };

        let gray = self.gray.insert(gray);
        gray_from_rgb_u8(frame, gray)?;

        Ok(gray)
    }
}

#[cfg(test)]
mod tests {
    use super::{create_decoder, DecoderKind, LuminanceBuffer};
    use crate::{error::QrError, overlay::OverlayStyle};
    use qrlens_image::Image;

    #[test]
    fn kind_from_str() -> Result<(), QrError> {
        for kind in DecoderKind::ALL {
            assert_eq!(kind.to_string().parse::<DecoderKind>()?, kind);
        }
        assert_eq!("Reader".parse::<DecoderKind>()?, DecoderKind::Reader);
        assert!(matches!(
            "zbar".parse::<DecoderKind>(),
            Err(QrError::UnknownDecoder(_))
        ));
        Ok(())
    }

    #[test]
    fn create_each_variant() {
        let styles: Vec<OverlayStyle> = DecoderKind::ALL
            .iter()
            .map(|&kind| create_decoder(kind).overlay_style())
            .collect();
        assert_eq!(
            styles,
            vec![
                OverlayStyle::Rectangle,
                OverlayStyle::Hull,
                OverlayStyle::ResultPoints
            ]
        );

        for kind in DecoderKind::ALL {
            assert_eq!(create_decoder(kind).name(), kind.label());
        }
    }

    #[test]
    fn luminance_buffer_follows_frame_size() -> Result<(), QrError> {
        let mut buffer = LuminanceBuffer::default();

        let small = Image::<u8, 3>::from_size_val([2, 2].into(), 255)?;
        assert_eq!(buffer.update(&small)?.as_slice(), &[255; 4]);

        let large = Image::<u8, 3>::from_size_val([3, 2].into(), 0)?;
        let gray = buffer.update(&large)?;
        assert_eq!(gray.width(), 3);
        assert_eq!(gray.as_slice(), &[0; 6]);
        Ok(())
    }
}
