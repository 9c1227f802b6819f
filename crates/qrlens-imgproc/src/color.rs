use crate::parallel;
use qrlens_image::{Image, ImageError};

/// Convert an RGB8 image to an 8-bit luminance image using the formula:
///
/// Y = (77 * R + 150 * G + 29 * B) >> 8
///
/// This is the buffer every decoder adapter hands to its library.
///
/// # Arguments
///
/// * `src` - The input RGB8 image.
/// * `dst` - The output grayscale image.
///
/// Precondition: the input and output images must have the same size.
///
/// # Example
///
/// ```
/// use qrlens_image::Image;
/// use qrlens_imgproc::color::gray_from_rgb_u8;
///
/// let frame = Image::<u8, 3>::from_size_val([4, 5].into(), 255)?;
/// let mut gray = Image::<u8, 1>::from_size_val(frame.size(), 0)?;
///
/// gray_from_rgb_u8(&frame, &mut gray)?;
/// assert!(gray.as_slice().iter().all(|&v| v == 255));
/// # Ok::<(), qrlens_image::ImageError>(())
/// ```
pub fn gray_from_rgb_u8(src: &Image<u8, 3>, dst: &mut Image<u8, 1>) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        let r = src_pixel[0] as u16;
        let g = src_pixel[1] as u16;
        let b = src_pixel[2] as u16;
        dst_pixel[0] = ((r * 77 + g * 150 + b * 29) >> 8) as u8;
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use qrlens_image::{Image, ImageError};

    #[test]
    fn gray_from_rgb_u8() -> Result<(), ImageError> {
        let image = Image::<u8, 3>::new(
            [2, 2].into(),
            vec![
                255, 255, 255, // white
                0, 0, 0, // black
                255, 0, 0, // red
                100, 150, 200,
            ],
        )?;

        let mut gray = Image::<u8, 1>::from_size_val(image.size(), 0)?;
        super::gray_from_rgb_u8(&image, &mut gray)?;

        // the weights sum to 256 so white stays at 255
        assert_eq!(gray.as_slice(), &[255, 0, 76, 140]);

        Ok(())
    }

    #[test]
    fn gray_size_mismatch() -> Result<(), ImageError> {
        let image = Image::<u8, 3>::from_size_val([4, 4].into(), 0)?;
        let mut gray = Image::<u8, 1>::from_size_val([3, 4].into(), 0)?;
        assert_eq!(
            super::gray_from_rgb_u8(&image, &mut gray),
            Err(ImageError::InvalidImageSize(4, 4, 3, 4))
        );
        Ok(())
    }
}
