use std::cmp::{max, min};

use font8x8::{UnicodeFonts, BASIC_FONTS};
use qrlens_image::Image;

/// Height and width in pixels of one unscaled glyph.
const GLYPH_SIZE: i64 = 8;

/// Helper function to set a pixel's color, clipping anything outside the image.
#[inline]
fn set_pixel<const C: usize>(img: &mut Image<u8, C>, x: i64, y: i64, color: [u8; C]) {
    if x >= 0 && x < img.cols() as i64 && y >= 0 && y < img.rows() as i64 {
        let start = (y as usize * img.cols() + x as usize) * C;
        img.as_slice_mut()[start..start + C].copy_from_slice(&color);
    }
}

/// Stamp a square brush of the given thickness centred on a pixel.
#[inline]
fn stamp<const C: usize>(img: &mut Image<u8, C>, x: i64, y: i64, color: [u8; C], thickness: usize) {
    if thickness <= 1 {
        set_pixel(img, x, y, color);
        return;
    }

    let half = thickness as i64 / 2;
    for j in -half..=half {
        for i in -half..=half {
            set_pixel(img, x + i, y + j, color);
        }
    }
}

/// Draws a line on an image inplace using Bresenham's line algorithm.
///
/// # Arguments
///
/// * `img` - The image to draw on.
/// * `p0` - The start point of the line as a tuple of (x, y).
/// * `p1` - The end point of the line as a tuple of (x, y).
/// * `color` - The color of the line as an array of `C` elements.
/// * `thickness` - The thickness of the line. (Note: thickness > 1 is approximate).
pub fn draw_line<const C: usize>(
    img: &mut Image<u8, C>,
    p0: (i64, i64),
    p1: (i64, i64),
    color: [u8; C],
    thickness: usize,
) {
    let (mut x0, mut y0) = p0;
    let (x1, y1) = p1;

    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };

    let mut err = dx - dy;

    loop {
        stamp(img, x0, y0, color, thickness);

        if x0 == x1 && y0 == y1 {
            break;
        }

        let e2 = 2 * err;

        if e2 > -dy {
            err -= dy;
            x0 += sx;
        }
        if e2 < dx {
            err += dx;
            y0 += sy;
        }
    }
}

/// Draws a closed polygon on an image inplace.
///
/// Each vertex is connected to the next one and the last vertex is connected back to
/// the first one, so `n` vertices always produce `n` segments. A single vertex is
/// drawn as a zero-length segment.
///
/// # Arguments
///
/// * `img` - The image to draw on.
/// * `points` - The vertices of the polygon.
/// * `color` - The color of the outline.
/// * `thickness` - The thickness of the lines.
///
/// # Returns
///
/// The number of segments drawn.
pub fn draw_polygon<const C: usize>(
    img: &mut Image<u8, C>,
    points: &[(i64, i64)],
    color: [u8; C],
    thickness: usize,
) -> usize {
    let n = points.len();
    for i in 0..n {
        draw_line(img, points[i], points[(i + 1) % n], color, thickness);
    }
    n
}

/// Draws a rectangle outline on an image inplace.
///
/// The two corners can be given in any order.
///
/// # Arguments
///
/// * `img` - The image to draw on.
/// * `top_left` - The top-left corner coordinates (x, y).
/// * `bottom_right` - The bottom-right corner coordinates (x, y).
/// * `color` - The color of the rectangle outline.
/// * `thickness` - The thickness of the lines.
pub fn draw_rect<const C: usize>(
    img: &mut Image<u8, C>,
    top_left: (i64, i64),
    bottom_right: (i64, i64),
    color: [u8; C],
    thickness: usize,
) {
    let (x0, y0) = top_left;
    let (x1, y1) = bottom_right;

    let (lx0, lx1) = (min(x0, x1), max(x0, x1));
    let (ly0, ly1) = (min(y0, y1), max(y0, y1));

    draw_line(img, (lx0, ly0), (lx1, ly0), color, thickness); // Top
    draw_line(img, (lx0, ly1), (lx1, ly1), color, thickness); // Bottom
    draw_line(img, (lx0, ly0), (lx0, ly1), color, thickness); // Left
    draw_line(img, (lx1, ly0), (lx1, ly1), color, thickness); // Right
}

/// Draws a hollow circle on an image inplace.
///
/// A pixel is painted when its distance to the center is within `thickness / 2`
/// of the radius. A zero radius paints the center pixel only.
///
/// # Arguments
///
/// * `img` - The image to draw on.
/// * `center` - The center of the circle (x, y).
/// * `radius` - The radius of the circle in pixels.
/// * `color` - The color of the circle.
/// * `thickness` - The thickness of the ring.
pub fn draw_circle<const C: usize>(
    img: &mut Image<u8, C>,
    center: (i64, i64),
    radius: u32,
    color: [u8; C],
    thickness: usize,
) {
    let (cx, cy) = center;

    if radius == 0 {
        stamp(img, cx, cy, color, thickness);
        return;
    }

    let r = radius as f32;
    let half = thickness.max(1) as f32 / 2.0;
    let reach = (r + half).ceil() as i64;

    for dy in -reach..=reach {
        for dx in -reach..=reach {
            let dist = ((dx * dx + dy * dy) as f32).sqrt();
            if (dist - r).abs() <= half {
                set_pixel(img, cx + dx, cy + dy, color);
            }
        }
    }
}

/// Draws text on an image inplace using the 8x8 basic glyph set.
///
/// The origin is the bottom-left corner of the first glyph. Characters without a
/// glyph are rendered as `?`.
///
/// # Arguments
///
/// * `img` - The image to draw on.
/// * `text` - The text to draw.
/// * `origin` - The bottom-left corner of the text (x, y).
/// * `scale` - Integer scale factor applied to each glyph pixel.
/// * `color` - The color of the text.
pub fn draw_text<const C: usize>(
    img: &mut Image<u8, C>,
    text: &str,
    origin: (i64, i64),
    scale: usize,
    color: [u8; C],
) {
    let scale = scale.max(1) as i64;
    let (ox, oy) = origin;
    let top = oy - GLYPH_SIZE * scale;

    for (i, ch) in text.chars().enumerate() {
        let glyph = BASIC_FONTS
            .get(ch)
            .or_else(|| BASIC_FONTS.get('?'))
            .unwrap_or([0u8; 8]);

        let left = ox + i as i64 * GLYPH_SIZE * scale;

        for (row, bits) in glyph.iter().enumerate() {
            for col in 0..GLYPH_SIZE {
                // the least significant bit is the leftmost pixel
                if bits & (1 << col) == 0 {
                    continue;
                }
                let px = left + col * scale;
                let py = top + row as i64 * scale;
                for sy in 0..scale {
                    for sx in 0..scale {
                        set_pixel(img, px + sx, py + sy, color);
                    }
                }
            }
        }
    }
}
