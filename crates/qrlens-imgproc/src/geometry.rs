/// A point on the image plane with integer pixel coordinates.
///
/// `x` grows to the right and `y` grows downwards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point2i {
    /// The column of the point.
    pub x: i32,
    /// The row of the point.
    pub y: i32,
}

impl Point2i {
    /// Create a new point.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Create a point by rounding floating point coordinates to the nearest pixel.
    pub fn from_f32(x: f32, y: f32) -> Self {
        Self {
            x: x.round() as i32,
            y: y.round() as i32,
        }
    }
}

impl From<(i32, i32)> for Point2i {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl From<Point2i> for (i64, i64) {
    fn from(p: Point2i) -> Self {
        (p.x as i64, p.y as i64)
    }
}

/// Z component of the cross product of `o -> a` and `o -> b`.
///
/// Positive when `o, a, b` turn counter-clockwise in a y-up frame.
#[inline]
fn cross(o: Point2i, a: Point2i, b: Point2i) -> i64 {
    let (ox, oy) = (o.x as i64, o.y as i64);
    (a.x as i64 - ox) * (b.y as i64 - oy) - (a.y as i64 - oy) * (b.x as i64 - ox)
}

/// Compute the convex hull of a set of points.
///
/// Uses Andrew's monotone chain. Duplicated and collinear points are dropped, and the
/// hull always starts at the point with the smallest `(x, y)`, so the output only
/// depends on the input set and `convex_hull(&convex_hull(p)) == convex_hull(p)`.
///
/// Inputs with fewer than three distinct points are returned sorted and deduplicated.
///
/// # Example
///
/// ```
/// use qrlens_imgproc::geometry::{convex_hull, Point2i};
///
/// let points = [
///     Point2i::new(0, 0),
///     Point2i::new(10, 0),
///     Point2i::new(5, 5),
///     Point2i::new(10, 10),
///     Point2i::new(0, 10),
/// ];
///
/// let hull = convex_hull(&points);
/// assert_eq!(hull.len(), 4);
/// assert!(!hull.contains(&Point2i::new(5, 5)));
/// ```
pub fn convex_hull(points: &[Point2i]) -> Vec<Point2i> {
    let mut pts = points.to_vec();
    pts.sort_by_key(|p| (p.x, p.y));
    pts.dedup();

    if pts.len() < 3 {
        return pts;
    }

    let mut lower: Vec<Point2i> = Vec::with_capacity(pts.len());
    for &p in pts.iter() {
        while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0 {
            lower.pop();
        }
        lower.push(p);
    }

    let mut upper: Vec<Point2i> = Vec::with_capacity(pts.len());
    for &p in pts.iter().rev() {
        while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0 {
            upper.pop();
        }
        upper.push(p);
    }

    // the last point of each chain is the first point of the other one
    lower.pop();
    upper.pop();
    lower.extend(upper);

    lower
}

/// Check whether a point lies inside or on the boundary of a convex polygon.
///
/// The polygon can be given in either winding order. Polygons with fewer than three
/// vertices only contain the points lying on their vertices or segment.
pub fn convex_polygon_contains(polygon: &[Point2i], p: Point2i) -> bool {
    match polygon.len() {
        0 => false,
        1 => polygon[0] == p,
        2 => {
            let (a, b) = (polygon[0], polygon[1]);
            cross(a, b, p) == 0
                && p.x >= a.x.min(b.x)
                && p.x <= a.x.max(b.x)
                && p.y >= a.y.min(b.y)
                && p.y <= a.y.max(b.y)
        }
        n => {
            let mut has_pos = false;
            let mut has_neg = false;
            for i in 0..n {
                let c = cross(polygon[i], polygon[(i + 1) % n], p);
                has_pos |= c > 0;
                has_neg |= c < 0;
            }
            !(has_pos && has_neg)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{convex_hull, convex_polygon_contains, Point2i};

    fn pts(coords: &[(i32, i32)]) -> Vec<Point2i> {
        coords.iter().map(|&c| c.into()).collect()
    }

    #[test]
    fn hull_of_square_with_interior_points() {
        let points = pts(&[(10, 10), (60, 60), (110, 10), (40, 80), (110, 110), (10, 110)]);
        let hull = convex_hull(&points);
        assert_eq!(hull, pts(&[(10, 10), (110, 10), (110, 110), (10, 110)]));
    }

    #[test]
    fn hull_drops_collinear_and_duplicates() {
        let points = pts(&[(0, 0), (5, 0), (10, 0), (10, 10), (0, 10), (0, 0), (10, 10)]);
        let hull = convex_hull(&points);
        assert_eq!(hull, pts(&[(0, 0), (10, 0), (10, 10), (0, 10)]));
    }

    #[test]
    fn hull_degenerate_inputs() {
        assert!(convex_hull(&[]).is_empty());
        assert_eq!(convex_hull(&pts(&[(3, 4)])), pts(&[(3, 4)]));
        assert_eq!(convex_hull(&pts(&[(5, 5), (1, 1)])), pts(&[(1, 1), (5, 5)]));
        // all collinear collapses to the two extremes
        assert_eq!(
            convex_hull(&pts(&[(0, 0), (2, 2), (1, 1), (3, 3)])),
            pts(&[(0, 0), (3, 3)])
        );
    }

    #[test]
    fn hull_is_idempotent_and_encloses_input() {
        let points = pts(&[
            (12, 40),
            (33, 7),
            (90, 15),
            (71, 64),
            (44, 90),
            (5, 77),
            (50, 50),
            (60, 30),
            (20, 60),
        ]);
        let hull = convex_hull(&points);

        assert_eq!(convex_hull(&hull), hull);

        for p in points.iter() {
            assert!(convex_polygon_contains(&hull, *p), "{p:?} outside hull");
        }
        for v in hull.iter() {
            assert!(points.contains(v), "{v:?} is not an input point");
        }
    }

    #[test]
    fn contains_rejects_outside_points() {
        let square = pts(&[(0, 0), (10, 0), (10, 10), (0, 10)]);
        assert!(convex_polygon_contains(&square, Point2i::new(5, 5)));
        assert!(convex_polygon_contains(&square, Point2i::new(10, 5)));
        assert!(!convex_polygon_contains(&square, Point2i::new(11, 5)));
        assert!(!convex_polygon_contains(&square, Point2i::new(-1, -1)));
    }
}
