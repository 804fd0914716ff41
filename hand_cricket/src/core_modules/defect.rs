// THEORY:
// A convexity defect is a place where the contour dips away from its hull. For an
// open hand, the deep defects are the valleys between fingers; the shallow ones are
// wrist creases and pixel stair-steps along curved edges.
//
// For every hull edge (two consecutive hull vertices in contour order), the contour
// points strictly between them are scanned for the one farthest from the edge line.
// If that distance is positive, the edge yields one defect: (start, end, far, depth).
// The last hull edge wraps around the end of the contour back to the first vertex.
//
// Classification into "finger valley" or "noise" happens later, from the angle at the
// far point of the (start, end, far) triangle. That angle is computed here with the
// law of cosines, guarded against zero-length sides and rounding that pushes the
// cosine outside [-1, 1].

use crate::core_modules::contour::{Contour, Point};
use crate::core_modules::hull::ConvexHull;

/// A concavity between two consecutive hull vertices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvexityDefect {
    /// Contour index of the hull vertex where the concavity begins.
    pub start: usize,
    /// Contour index of the hull vertex where the concavity ends.
    pub end: usize,
    /// Contour index of the point deepest inside the concavity.
    pub far: usize,
    /// Distance in pixels from `far` to the hull edge.
    pub depth: f64,
}

impl ConvexityDefect {
    /// Interior angle at the far point, in degrees. `None` when the triangle is degenerate.
    pub fn angle_degrees(&self, contour: &Contour) -> Option<f64> {
        far_angle_degrees(
            contour.point(self.start),
            contour.point(self.end),
            contour.point(self.far),
        )
    }
}

/// The angle at `far` in the triangle (start, end, far), in degrees.
///
/// Returns `None` when either side meeting at `far` has zero length, since the
/// angle is undefined there.
pub fn far_angle_degrees(start: Point, end: Point, far: Point) -> Option<f64> {
    let a = start.distance(end);
    let b = start.distance(far);
    let c = end.distance(far);
    if b == 0.0 || c == 0.0 {
        return None;
    }

    let cosine = (b * b + c * c - a * a) / (2.0 * b * c);
    if !cosine.is_finite() {
        return None;
    }
    Some(cosine.clamp(-1.0, 1.0).acos().to_degrees())
}

/// Computes the defects of `contour` against its `hull`. Hulls with fewer than
/// three vertices have no defects.
pub fn convexity_defects(contour: &Contour, hull: &ConvexHull) -> Vec<ConvexityDefect> {
    let vertices = hull.indices();
    let n = contour.len();
    if vertices.len() < 3 {
        return Vec::new();
    }

    let mut defects = Vec::new();
    for (k, &start) in vertices.iter().enumerate() {
        let end = vertices[(k + 1) % vertices.len()];
        let a = contour.point(start);
        let b = contour.point(end);
        let dx = (b.x - a.x) as f64;
        let dy = (b.y - a.y) as f64;
        let edge_length = dx.hypot(dy);
        if edge_length == 0.0 {
            continue;
        }

        let mut deepest: Option<(usize, f64)> = None;
        let mut i = (start + 1) % n;
        while i != end {
            let p = contour.point(i);
            let depth = ((p.x - a.x) as f64 * dy - (p.y - a.y) as f64 * dx).abs() / edge_length;
            if depth > deepest.map_or(0.0, |(_, d)| d) {
                deepest = Some((i, depth));
            }
            i = (i + 1) % n;
        }

        if let Some((far, depth)) = deepest {
            defects.push(ConvexityDefect { start, end, far, depth });
        }
    }

    defects
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::contour::tests::mask_from_rects;
    use crate::core_modules::contour::{ContourKind, find_contours};
    use proptest::prelude::*;

    fn contour(raw: &[(i32, i32)]) -> Contour {
        Contour::new(
            ContourKind::Outer,
            raw.iter().map(|&(x, y)| Point::new(x, y)).collect(),
        )
    }

    #[test]
    fn right_angle_is_ninety_degrees() {
        let corner = Point::new(0, 0);
        let angle = far_angle_degrees(Point::new(0, 10), Point::new(10, 0), corner).unwrap();
        assert!((angle - 90.0).abs() < 1e-9);
    }

    #[test]
    fn straight_line_is_one_eighty_degrees() {
        let middle = Point::new(0, 0);
        let angle = far_angle_degrees(Point::new(-5, 0), Point::new(5, 0), middle).unwrap();
        assert!((angle - 180.0).abs() < 1e-6);
    }

    #[test]
    fn degenerate_triangles_have_no_angle() {
        let p = Point::new(3, 4);
        assert_eq!(far_angle_degrees(p, Point::new(9, 9), p), None);
        assert_eq!(far_angle_degrees(Point::new(9, 9), p, p), None);
        assert_eq!(far_angle_degrees(p, p, p), None);
    }

    #[test]
    fn notch_produces_one_defect() {
        let notched = contour(&[(0, 0), (10, 0), (5, 4), (10, 10), (0, 10)]);
        let hull = ConvexHull::of(&notched);
        let defects = convexity_defects(&notched, &hull);

        assert_eq!(defects.len(), 1);
        assert_eq!((defects[0].start, defects[0].end, defects[0].far), (1, 3, 2));
        assert!((defects[0].depth - 5.0).abs() < 1e-9);
    }

    #[test]
    fn convex_shapes_have_no_defects() {
        let square = contour(&[(0, 0), (5, 0), (10, 0), (10, 10), (0, 10)]);
        let hull = ConvexHull::of(&square);
        assert!(convexity_defects(&square, &hull).is_empty());
    }

    #[test]
    fn small_hulls_have_no_defects() {
        let line = contour(&[(0, 0), (4, 0)]);
        assert!(convexity_defects(&line, &ConvexHull::of(&line)).is_empty());
    }

    #[test]
    fn finger_valleys_are_found_including_the_wrapping_edge() {
        let mask = mask_from_rects(
            300,
            300,
            &[(60, 150, 239, 249), (60, 80, 99, 149), (130, 40, 169, 149), (200, 80, 239, 149)],
        );
        let hand = find_contours(&mask).remove(0);
        let hull = ConvexHull::of(&hand);
        let defects = convexity_defects(&hand, &hull);

        assert_eq!(hull.indices(), &[0, 1, 7, 8, 9, 10]);
        assert_eq!(defects.len(), 2);
        assert_eq!(hand.point(defects[0].far), Point::new(170, 150));
        assert_eq!((defects[1].start, defects[1].end), (10, 0));
        assert_eq!(hand.point(defects[1].far), Point::new(129, 150));
        for defect in &defects {
            let angle = defect.angle_degrees(&hand).unwrap();
            assert!((40.0..50.0).contains(&angle), "angle {angle}");
            assert!(defect.depth > 90.0);
        }
    }

    proptest! {
        #[test]
        fn angle_is_bounded_or_absent(
            sx in -50i32..50, sy in -50i32..50,
            ex in -50i32..50, ey in -50i32..50,
            fx in -50i32..50, fy in -50i32..50,
        ) {
            let start = Point::new(sx, sy);
            let end = Point::new(ex, ey);
            let far = Point::new(fx, fy);
            match far_angle_degrees(start, end, far) {
                Some(angle) => prop_assert!((0.0..=180.0).contains(&angle)),
                None => prop_assert!(start == far || end == far),
            }
        }
    }
}
