use qrlens_image::Image;
use qrlens_imgproc::draw;

use crate::{geometry::Polygon, symbol::DecodedSymbol};

/// Magenta, used for the rectangle overlay.
pub const RECTANGLE_COLOR: [u8; 3] = [255, 0, 255];

/// Blue, used for the hull overlay.
pub const HULL_COLOR: [u8; 3] = [0, 0, 255];

/// Green, used for the result point overlay.
pub const RESULT_POINTS_COLOR: [u8; 3] = [0, 220, 110];

/// Radius of the marker drawn around every result point.
pub const RESULT_POINT_RADIUS: u32 = 10;

/// Integer scale applied to the 8x8 glyphs of the decoded text.
pub const TEXT_SCALE: usize = 2;

/// How the symbols of a decoder are drawn over the frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverlayStyle {
    /// Axis-aligned rectangle spanned by the first and third points.
    Rectangle,
    /// Outline through the normalized points.
    Hull,
    /// Markers on the raw points, joined by lines, plus the decoded text.
    ResultPoints,
}

impl OverlayStyle {
    /// Stroke color of the style.
    pub fn color(&self) -> [u8; 3] {
        match self {
            Self::Rectangle => RECTANGLE_COLOR,
            Self::Hull => HULL_COLOR,
            Self::ResultPoints => RESULT_POINTS_COLOR,
        }
    }

    /// Stroke thickness of the style in pixels.
    pub fn thickness(&self) -> usize {
        match self {
            Self::Rectangle => 1,
            Self::Hull => 3,
            Self::ResultPoints => 2,
        }
    }
}

/// Draws a closed polygon over the frame.
///
/// # Returns
///
/// The number of segments drawn, equal to the number of vertices.
pub fn draw_polygon(
    frame: &mut Image<u8, 3>,
    polygon: &Polygon,
    color: [u8; 3],
    thickness: usize,
) -> usize {
    draw::draw_polygon(frame, &polygon.to_draw_points(), color, thickness)
}

/// Draws the rectangle spanned by the first and third points of a symbol.
///
/// # Returns
///
/// `false` when the symbol has fewer than three points and nothing was drawn.
pub fn draw_rectangle(
    frame: &mut Image<u8, 3>,
    symbol: &DecodedSymbol,
    color: [u8; 3],
    thickness: usize,
) -> bool {
    match (symbol.points.first(), symbol.points.get(2)) {
        (Some(&p0), Some(&p2)) => {
            draw::draw_rect(frame, p0.into(), p2.into(), color, thickness);
            true
        }
        _ => false,
    }
}

/// Draws a marker on every point of a symbol, the lines between consecutive points and
/// the decoded text anchored at the first point.
///
/// # Returns
///
/// `false` when the symbol has no points and nothing was drawn.
pub fn draw_result_points(
    frame: &mut Image<u8, 3>,
    symbol: &DecodedSymbol,
    color: [u8; 3],
    thickness: usize,
    radius: u32,
) -> bool {
    let points: Vec<(i64, i64)> = symbol.points.iter().map(|&p| p.into()).collect();
    let Some(&first) = points.first() else {
        return false;
    };

    for (i, &p) in points.iter().enumerate() {
        draw::draw_circle(frame, p, radius, color, thickness);
        if points.len() > 1 {
            let prev = points[(i + points.len() - 1) % points.len()];
            draw::draw_line(frame, prev, p, color, thickness);
        }
    }

    draw::draw_text(frame, &symbol.text, first, TEXT_SCALE, color);

    true
}

/// Draws every symbol of a frame in the given style.
///
/// # Returns
///
/// The number of symbols that produced an overlay.
pub fn render_symbols(
    frame: &mut Image<u8, 3>,
    symbols: &[DecodedSymbol],
    style: OverlayStyle,
) -> usize {
    let (color, thickness) = (style.color(), style.thickness());

    symbols
        .iter()
        .filter(|symbol| match style {
            OverlayStyle::Rectangle => draw_rectangle(frame, symbol, color, thickness),
            OverlayStyle::Hull => draw_polygon(frame, &symbol.polygon(), color, thickness) > 0,
            OverlayStyle::ResultPoints => {
                draw_result_points(frame, symbol, color, thickness, RESULT_POINT_RADIUS)
            }
        })
        .count()
}
