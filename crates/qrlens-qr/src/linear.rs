use std::collections::HashMap;

use qrlens_image::Image;
use qrlens_imgproc::geometry::Point2i;
use rxing::{
    common::GlobalHistogramBinarizer,
    oned::{MultiFormatOneDReader, OneDReader},
    BarcodeFormat, BinaryBitmap, DecodeHintType, DecodeHintValue, DecodingHintDictionary,
    Luma8LuminanceSource, RXingResult,
};

use crate::symbol::{DecodedSymbol, QR_CODE_TYPE};

/// Number of rows scanned per frame, spread evenly over its height.
const SCAN_ROWS: usize = 64;

/// Label of a symbology, following the names printed by zbar.
pub(crate) fn symbology_name(format: BarcodeFormat) -> String {
    let name = match format {
        BarcodeFormat::QR_CODE => QR_CODE_TYPE,
        BarcodeFormat::EAN_13 => "EAN-13",
        BarcodeFormat::EAN_8 => "EAN-8",
        BarcodeFormat::UPC_A => "UPC-A",
        BarcodeFormat::UPC_E => "UPC-E",
        BarcodeFormat::CODE_39 => "CODE-39",
        BarcodeFormat::CODE_93 => "CODE-93",
        BarcodeFormat::CODE_128 => "CODE-128",
        BarcodeFormat::ITF => "I2/5",
        BarcodeFormat::CODABAR => "Codabar",
        BarcodeFormat::RSS_14 => "DataBar",
        BarcodeFormat::RSS_EXPANDED => "DataBar-Exp",
        other => return format!("{other:?}"),
    };
    name.to_string()
}

/// Row hits of one linear symbol, accumulated over the scanned rows.
struct RowHits {
    format: BarcodeFormat,
    text: String,
    starts: Vec<Point2i>,
    ends: Vec<Point2i>,
}

impl RowHits {
    /// The outline of the hits: row starts top-down, then row ends bottom-up.
    fn into_symbol(self) -> DecodedSymbol {
        let Self {
            format,
            text,
            mut starts,
            ends,
        } = self;
        starts.extend(ends.into_iter().rev());
        DecodedSymbol::new(symbology_name(format), text, starts)
    }
}

/// Scan a luminance buffer row by row for linear barcodes.
///
/// Every row that reads a symbol adds its start and end point, so a barcode crossed by
/// many rows is reported with many points. Symbols are identified by symbology and
/// text and returned in the order their first row was hit.
pub(crate) fn scan_rows(gray: &Image<u8, 1>) -> Vec<DecodedSymbol> {
    let (width, height) = (gray.width(), gray.height());
    if width == 0 || height == 0 {
        return Vec::new();
    }

    let bitmap = BinaryBitmap::new(GlobalHistogramBinarizer::new(Luma8LuminanceSource::new(
        gray.as_slice().to_vec(),
        width as u32,
        height as u32,
    )));

    let mut hints = DecodingHintDictionary::new();
    hints.insert(DecodeHintType::TRY_HARDER, DecodeHintValue::TryHarder(true));
    let mut reader = MultiFormatOneDReader::new(&hints);

    let mut hits: Vec<RowHits> = Vec::new();
    let mut index: HashMap<(BarcodeFormat, String), usize> = HashMap::new();

    let row_step = (height / SCAN_ROWS).max(1);
    for y in (0..height).step_by(row_step) {
        // rows without contrast cannot be binarized
        let Ok(row) = bitmap.get_black_row(y) else {
            continue;
        };
        let mut row = row.into_owned();

        let Some((result, reversed)) = decode_row(&mut reader, y, &mut row, &hints) else {
            continue;
        };

        let mut xs: Vec<f32> = result
            .getPoints()
            .iter()
            .map(|p| if reversed { width as f32 - p.x - 1.0 } else { p.x })
            .collect();
        if xs.is_empty() {
            continue;
        }
        xs.sort_by(f32::total_cmp);
        let (start, end) = (xs[0], xs[xs.len() - 1]);

        let key = (*result.getBarcodeFormat(), result.getText().to_string());
        let slot = *index.entry(key).or_insert_with(|| {
            hits.push(RowHits {
                format: *result.getBarcodeFormat(),
                text: result.getText().to_string(),
                starts: Vec::new(),
                ends: Vec::new(),
            });
            hits.len() - 1
        });

        let hit = &mut hits[slot];
        hit.starts.push(Point2i::from_f32(start, y as f32));
        hit.ends.push(Point2i::from_f32(end, y as f32));
    }

    log::trace!("linear scan found {} symbols", hits.len());

    hits.into_iter().map(RowHits::into_symbol).collect()
}

/// Decode one binarized row, then the same row reversed for upside-down symbols.
fn decode_row(
    reader: &mut MultiFormatOneDReader,
    y: usize,
    row: &mut rxing::common::BitArray,
    hints: &DecodingHintDictionary,
) -> Option<(RXingResult, bool)> {
    if let Ok(result) = reader.decode_row(y as u32, row, hints) {
        return Some((result, false));
    }
    row.reverse();
    reader
        .decode_row(y as u32, row, hints)
        .ok()
        .map(|result| (result, true))
}

#[cfg(test)]
mod tests {
    use super::{scan_rows, symbology_name};
    use qrlens_image::{Image, ImageError};
    use rxing::BarcodeFormat;

    #[test]
    fn zbar_style_names() {
        assert_eq!(symbology_name(BarcodeFormat::QR_CODE), "QR-Code");
        assert_eq!(symbology_name(BarcodeFormat::EAN_13), "EAN-13");
        assert_eq!(symbology_name(BarcodeFormat::CODE_128), "CODE-128");
        assert_eq!(symbology_name(BarcodeFormat::PDF_417), "PDF_417");
    }

    #[test]
    fn flat_frames_have_no_rows_to_read() -> Result<(), ImageError> {
        let white = Image::<u8, 1>::from_size_val([40, 30].into(), 255)?;
        let black = Image::<u8, 1>::from_size_val([40, 30].into(), 0)?;
        assert!(scan_rows(&white).is_empty());
        assert!(scan_rows(&black).is_empty());
        Ok(())
    }
}
