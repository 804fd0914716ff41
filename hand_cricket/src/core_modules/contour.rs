// THEORY:
// The `contour` module turns a binary hand mask into boundary polylines. It is the
// pixel-level half of the gesture decoder: everything after it (hull, defects,
// angles) works on a few dozen integer points instead of ninety thousand pixels.
//
// Algorithm steps:
// 1.  **Component Labeling**: Foreground pixels are grouped into 8-connected
//     components with an iterative stack-based flood fill. Background pixels are
//     grouped into 4-connected components; any background component that never
//     touches the mask border is a hole.
// 2.  **Border Following**: Each component's boundary is walked with Moore-neighbour
//     tracing, starting from its first pixel in raster order and scanning neighbours
//     clockwise. The walk stops when it is about to repeat its first move, which
//     handles one-pixel-wide necks that are crossed twice.
// 3.  **Chain Compression**: Consecutive steps in the same direction are collapsed so
//     only the end points of straight runs remain. A rectangle becomes four points.
// 4.  **Area**: Enclosed area uses the shoelace formula on the compressed polygon, so
//     a single pixel or a one-pixel line has zero area.

use image::GrayImage;

/// 8-neighbourhood offsets in clockwise screen order (y grows downwards), starting east.
const NEIGHBORS_8: [(i32, i32); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];
const NEIGHBORS_4: [(i32, i32); 4] = [(1, 0), (0, 1), (-1, 0), (0, -1)];
const WEST: usize = 4;

/// A 2D integer point in region pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    fn offset(self, (dx, dy): (i32, i32)) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Euclidean distance to `other`.
    pub fn distance(self, other: Point) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        dx.hypot(dy)
    }
}

/// Whether a contour bounds a foreground component or a hole inside one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContourKind {
    Outer,
    Hole,
}

/// The boundary of one connected region, as a closed polyline.
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    pub kind: ContourKind,
    points: Vec<Point>,
}

impl Contour {
    pub fn new(kind: ContourKind, points: Vec<Point>) -> Self {
        Self { kind, points }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn point(&self, index: usize) -> Point {
        self.points[index]
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Enclosed area of the polygon (shoelace formula), always non-negative.
    pub fn area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        let twice_area: i64 = (0..n)
            .map(|i| {
                let a = self.points[i];
                let b = self.points[(i + 1) % n];
                a.x as i64 * b.y as i64 - b.x as i64 * a.y as i64
            })
            .sum();
        twice_area.abs() as f64 / 2.0
    }
}

/// Per-pixel component labels for a mask. Label 0 means "not part of any component".
struct LabelGrid {
    width: i32,
    height: i32,
    labels: Vec<u32>,
}

/// A labeled component: its id, its first pixel in raster order, and whether it
/// reaches the mask border.
struct Component {
    label: u32,
    seed: Point,
    touches_border: bool,
}

impl LabelGrid {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width: width as i32,
            height: height as i32,
            labels: vec![0; (width * height) as usize],
        }
    }

    fn index(&self, p: Point) -> Option<usize> {
        if p.x >= 0 && p.x < self.width && p.y >= 0 && p.y < self.height {
            Some((p.y * self.width + p.x) as usize)
        } else {
            None
        }
    }

    fn label_at(&self, p: Point) -> Option<u32> {
        self.index(p).map(|i| self.labels[i])
    }

    fn on_border(&self, p: Point) -> bool {
        p.x == 0 || p.y == 0 || p.x == self.width - 1 || p.y == self.height - 1
    }

    /// Labels every component of pixels accepted by `is_member`, scanning in raster
    /// order so that each component's seed is its top-left-most pixel.
    fn label_components(
        mask: &GrayImage,
        is_member: impl Fn(u8) -> bool,
        neighbors: &[(i32, i32)],
    ) -> (Self, Vec<Component>) {
        let mut grid = Self::new(mask.width(), mask.height());
        let mut components = Vec::new();
        let mut next_label = 1u32;

        for y in 0..grid.height {
            for x in 0..grid.width {
                let seed = Point::new(x, y);
                let seed_index = (y * grid.width + x) as usize;
                let value = mask.get_pixel(x as u32, y as u32)[0];
                if grid.labels[seed_index] != 0 || !is_member(value) {
                    continue;
                }

                let label = next_label;
                next_label += 1;
                let mut touches_border = false;
                let mut stack = vec![seed];
                grid.labels[seed_index] = label;

                while let Some(current) = stack.pop() {
                    touches_border |= grid.on_border(current);
                    for &offset in neighbors {
                        let neighbor = current.offset(offset);
                        let Some(index) = grid.index(neighbor) else {
                            continue;
                        };
                        if grid.labels[index] == 0
                            && is_member(mask.get_pixel(neighbor.x as u32, neighbor.y as u32)[0])
                        {
                            grid.labels[index] = label;
                            stack.push(neighbor);
                        }
                    }
                }

                components.push(Component {
                    label,
                    seed,
                    touches_border,
                });
            }
        }

        (grid, components)
    }

    /// Moore-neighbour tracing of the component `label`, starting at its raster-order seed.
    fn trace_boundary(&self, label: u32, start: Point) -> Vec<Point> {
        let inside = |p: Point| self.label_at(p) == Some(label);

        // From `current`, with the last outside pixel in direction `back`, find the
        // next boundary pixel clockwise and the direction of its own outside pixel.
        let probe = |current: Point, back: usize| -> Option<(Point, usize)> {
            (1..=8).find_map(|step| {
                let dir = (back + step) % 8;
                let candidate = current.offset(NEIGHBORS_8[dir]);
                if !inside(candidate) {
                    return None;
                }
                let behind = current.offset(NEIGHBORS_8[(dir + 7) % 8]);
                Some((candidate, direction_between(candidate, behind)))
            })
        };

        let Some((second, _)) = probe(start, WEST) else {
            return vec![start];
        };

        let mut points = Vec::new();
        let mut current = start;
        let mut back = WEST;
        let step_limit = 4 * self.labels.len() + 8;

        for _ in 0..step_limit {
            points.push(current);
            let Some((next, next_back)) = probe(current, back) else {
                break;
            };
            current = next;
            back = next_back;
            if current == start && probe(current, back).map(|(p, _)| p) == Some(second) {
                break;
            }
        }

        points
    }
}

fn direction_between(from: Point, to: Point) -> usize {
    let delta = (to.x - from.x, to.y - from.y);
    NEIGHBORS_8.iter().position(|&d| d == delta).unwrap_or(WEST)
}

/// Drops every point that continues a straight run, keeping run end points only.
pub fn compress_runs(points: &[Point]) -> Vec<Point> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }
    let step = |from: Point, to: Point| (to.x - from.x, to.y - from.y);
    let compressed: Vec<Point> = (0..n)
        .filter(|&i| {
            let prev = points[(i + n - 1) % n];
            let next = points[(i + 1) % n];
            step(prev, points[i]) != step(points[i], next)
        })
        .map(|i| points[i])
        .collect();

    if compressed.is_empty() {
        points.to_vec()
    } else {
        compressed
    }
}

/// Finds the outer boundary of every foreground component and the boundary of every
/// enclosed hole in a binary mask (non-zero pixels are foreground).
pub fn find_contours(mask: &GrayImage) -> Vec<Contour> {
    let (foreground, components) = LabelGrid::label_components(mask, |v| v != 0, &NEIGHBORS_8);
    let mut contours: Vec<Contour> = components
        .iter()
        .map(|c| {
            let raw = foreground.trace_boundary(c.label, c.seed);
            Contour::new(ContourKind::Outer, compress_runs(&raw))
        })
        .collect();

    if contours.is_empty() {
        return contours;
    }

    let (background, regions) = LabelGrid::label_components(mask, |v| v == 0, &NEIGHBORS_4);
    contours.extend(regions.iter().filter(|r| !r.touches_border).map(|hole| {
        let raw = background.trace_boundary(hole.label, hole.seed);
        Contour::new(ContourKind::Hole, compress_runs(&raw))
    }));

    contours
}

/// The contour enclosing the most area. Ties go to the earliest contour.
pub fn largest_contour(contours: &[Contour]) -> Option<&Contour> {
    contours.iter().fold(None, |best: Option<&Contour>, candidate| match best {
        Some(b) if b.area() >= candidate.area() => Some(b),
        _ => Some(candidate),
    })
}
