// THEORY:
// The convex hull is the "rubber band" stretched around the hand contour. Fingertips
// and the outer edge of the palm touch the band; the valleys between fingers do not.
// Those gaps between band and contour are what the defect stage measures.
//
// The hull is kept in index form: positions into the contour, not copies of its
// points. Defect detection needs to walk the contour *between* two hull vertices,
// which is only possible when it knows where those vertices sit in the contour.
// Indices are sorted ascending so that consecutive hull entries follow the
// contour's own traversal order.

use crate::core_modules::contour::{Contour, Point};

/// The convex envelope of a contour, as sorted indices into that contour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvexHull {
    indices: Vec<usize>,
}

fn cross(o: Point, a: Point, b: Point) -> i64 {
    (a.x - o.x) as i64 * (b.y - o.y) as i64 - (a.y - o.y) as i64 * (b.x - o.x) as i64
}

/// One side of the monotone chain. The last vertex is dropped because it starts the other side.
fn half_hull(points: &[Point], sweep: impl Iterator<Item = usize>) -> Vec<usize> {
    let mut half: Vec<usize> = Vec::new();
    for i in sweep {
        while let [.., a, b] = half.as_slice() {
            if cross(points[*a], points[*b], points[i]) > 0 {
                break;
            }
            half.pop();
        }
        half.push(i);
    }
    half.pop();
    half
}

impl ConvexHull {
    /// Andrew's monotone chain. Collinear and duplicate points are left out of the hull.
    pub fn of(contour: &Contour) -> Self {
        let points = contour.points();
        let mut order: Vec<usize> = (0..points.len()).collect();
        order.sort_by_key(|&i| points[i]);
        order.dedup_by_key(|i| points[*i]);

        if order.len() < 3 {
            order.sort_unstable();
            return Self { indices: order };
        }

        let mut indices = half_hull(points, order.iter().copied());
        indices.extend(half_hull(points, order.iter().rev().copied()));
        indices.sort_unstable();

        Self { indices }
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// The hull vertices, resolved against the contour they were computed from.
    pub fn points(&self, contour: &Contour) -> Vec<Point> {
        self.indices.iter().map(|&i| contour.point(i)).collect()
    }
}
