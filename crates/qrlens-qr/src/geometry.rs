use qrlens_imgproc::geometry::{convex_hull, Point2i};

/// Largest point count passed through without computing a hull.
pub const MAX_PASSTHROUGH_POINTS: usize = 4;

/// A closed loop of vertices ready to be drawn.
///
/// The last vertex is implicitly connected to the first one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Polygon(Vec<Point2i>);

impl Polygon {
    /// Normalize raw symbol points into a drawable outline.
    ///
    /// Up to four points are assumed to already outline the symbol and are kept as
    /// they are, in order. Longer lists (finder and alignment points on top of the
    /// corners) are reduced to their convex hull.
    ///
    /// # Example
    ///
    /// ```
    /// use qrlens_imgproc::geometry::Point2i;
    /// use qrlens_qr::geometry::Polygon;
    ///
    /// let points = [(10, 10), (110, 10), (60, 50), (110, 110), (10, 110)]
    ///     .map(Point2i::from);
    ///
    /// let polygon = Polygon::from_points(&points);
    /// assert_eq!(polygon.len(), 4);
    /// ```
    pub fn from_points(points: &[Point2i]) -> Self {
        if points.len() <= MAX_PASSTHROUGH_POINTS {
            Self(points.to_vec())
        } else {
            Self(convex_hull(points))
        }
    }

    /// The vertices of the polygon.
    pub fn vertices(&self) -> &[Point2i] {
        &self.0
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the polygon has no vertices.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The vertices as drawing coordinates.
    pub fn to_draw_points(&self) -> Vec<(i64, i64)> {
        self.0.iter().map(|&p| p.into()).collect()
    }
}

/// Convert a symbol's raw point list into a drawable polygon.
///
/// See [`Polygon::from_points`].
pub fn normalize_points(points: &[Point2i]) -> Polygon {
    Polygon::from_points(points)
}

#[cfg(test)]
mod tests {
    use super::{normalize_points, Polygon};
    use qrlens_imgproc::geometry::{convex_polygon_contains, Point2i};

    fn pts(coords: &[(i32, i32)]) -> Vec<Point2i> {
        coords.iter().map(|&c| c.into()).collect()
    }

    #[test]
    fn short_lists_pass_through() {
        // deliberately not convex nor in hull order
        let inputs = [
            pts(&[]),
            pts(&[(5, 5)]),
            pts(&[(9, 1), (1, 1)]),
            pts(&[(0, 0), (10, 10), (10, 0)]),
            pts(&[(0, 0), (10, 10), (10, 0), (0, 10)]),
        ];
        for points in inputs.iter() {
            assert_eq!(normalize_points(points).vertices(), points.as_slice());
        }
    }

    #[test]
    fn long_lists_become_hull() {
        // four corners, three finder centres and an alignment point
        let points = pts(&[
            (10, 10),
            (110, 10),
            (110, 110),
            (10, 110),
            (31, 31),
            (89, 31),
            (31, 89),
            (83, 83),
        ]);
        let polygon = normalize_points(&points);
        assert_eq!(polygon.vertices(), pts(&[(10, 10), (110, 10), (110, 110), (10, 110)]));

        for p in points.iter() {
            assert!(convex_polygon_contains(polygon.vertices(), *p));
        }
    }

    #[test]
    fn hull_normalization_is_idempotent() {
        let points = pts(&[(3, 50), (40, 2), (97, 20), (80, 90), (30, 99), (50, 50), (60, 40)]);
        let once = normalize_points(&points);
        let twice = normalize_points(once.vertices());
        assert_eq!(once, twice);
        assert!(once.len() >= 3);
    }

    #[test]
    fn draw_points() {
        let polygon = Polygon::from_points(&pts(&[(1, 2), (3, 4)]));
        assert_eq!(polygon.to_draw_points(), vec![(1i64, 2i64), (3, 4)]);
        assert!(!polygon.is_empty());
    }
}
