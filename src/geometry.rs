//! Planar geometry used by the joint angle extractor.

use crate::constants::ANGLE_EPSILON;
use opencv::core::Point;

/// A position in pixel space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point2D {
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate
    pub y: f64,
}

impl Point2D {
    /// Create a new point
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn sub(self, other: Self) -> (f64, f64) {
        (self.x - other.x, self.y - other.y)
    }
}

impl From<Point> for Point2D {
    fn from(p: Point) -> Self {
        Self::new(f64::from(p.x), f64::from(p.y))
    }
}

/// Angle in degrees at vertex `b` between rays `b -> a` and `b -> c`.
///
/// The cosine is computed as `BA·BC / (|BA|·|BC| + ε)` and clamped to
/// `[-1, 1]` before `acos`, so the result is always in `[0, 180]`. When `a`
/// or `c` coincides with `b` the cosine collapses to zero and the angle
/// reads 90°.
#[must_use]
pub fn angle_at_vertex(a: Point2D, b: Point2D, c: Point2D) -> f64 {
    let (bax, bay) = a.sub(b);
    let (bcx, bcy) = c.sub(b);

    let dot = bax * bcx + bay * bcy;
    let norms = bax.hypot(bay) * bcx.hypot(bcy);
    let cosine = dot / (norms + ANGLE_EPSILON);

    if cosine.is_nan() {
        return 0.0;
    }

    cosine.clamp(-1.0, 1.0).acos().to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn p(x: f64, y: f64) -> Point2D {
        Point2D::new(x, y)
    }

    #[test]
    fn test_right_angle() {
        let angle = angle_at_vertex(p(0.0, 0.0), p(100.0, 0.0), p(100.0, 100.0));
        assert!((angle - 90.0).abs() < 1e-6);
    }

    #[test]
    fn test_collinear_straight() {
        let angle = angle_at_vertex(p(0.0, 0.0), p(50.0, 50.0), p(100.0, 100.0));
        assert!((angle - 180.0).abs() < 0.01);
    }

    #[test]
    fn test_folded_back() {
        let angle = angle_at_vertex(p(10.0, 10.0), p(0.0, 0.0), p(10.0, 10.0));
        assert!(angle < 0.5, "got {angle}");
    }

    #[test]
    fn test_degenerate_vertex() {
        let a = p(3.0, 4.0);
        for angle in [
            angle_at_vertex(a, a, p(10.0, 0.0)),
            angle_at_vertex(p(1.0, 1.0), a, a),
            angle_at_vertex(a, a, a),
        ] {
            assert!((angle - 90.0).abs() < 1e-9, "got {angle}");
        }
    }

    #[test]
    fn test_non_finite_input() {
        let angle = angle_at_vertex(p(f64::NAN, 0.0), p(0.0, 0.0), p(1.0, 0.0));
        assert!(angle.is_finite());
    }

    #[test]
    fn test_from_opencv_point() {
        let point = Point2D::from(Point::new(7, -3));
        assert_eq!(point, p(7.0, -3.0));
    }

    proptest! {
        #[test]
        fn prop_angle_in_range(
            ax in -1e4f64..1e4, ay in -1e4f64..1e4,
            bx in -1e4f64..1e4, by in -1e4f64..1e4,
            cx in -1e4f64..1e4, cy in -1e4f64..1e4,
        ) {
            let angle = angle_at_vertex(p(ax, ay), p(bx, by), p(cx, cy));
            prop_assert!(angle.is_finite());
            prop_assert!((0.0..=180.0).contains(&angle));
        }

        #[test]
        fn prop_angle_symmetric(
            ax in -1e4f64..1e4, ay in -1e4f64..1e4,
            bx in -1e4f64..1e4, by in -1e4f64..1e4,
            cx in -1e4f64..1e4, cy in -1e4f64..1e4,
        ) {
            let forward = angle_at_vertex(p(ax, ay), p(bx, by), p(cx, cy));
            let backward = angle_at_vertex(p(cx, cy), p(bx, by), p(ax, ay));
            prop_assert!((forward - backward).abs() < 1e-9);
        }
    }
}
