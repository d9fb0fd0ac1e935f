use super::line::{LineEq, EPSILON};
use geo::{Contains, Coord, EuclideanDistance, Intersects, Line, Point, Polygon, Translate};

/// Geometric primitives the packing pipeline relies on.
///
/// Boundaries are simple polygons; blocks are the translated unit
/// polygons. Implementations must agree with the DE-9IM meaning of
/// `contains` and `intersects`: a block touching the boundary from the
/// inside is contained, and two blocks sharing only an edge intersect.
pub trait GeometryKernel {
    /// Chords in which `line` crosses the interior of `polygon`, ordered along
    /// the line direction. Zero, one or many for non-convex polygons.
    fn clip(&self, line: &LineEq, polygon: &Polygon<f64>) -> Vec<Line<f64>>;

    fn contains(&self, outer: &Polygon<f64>, inner: &Polygon<f64>) -> bool;

    fn intersects(&self, a: &Polygon<f64>, b: &Polygon<f64>) -> bool;

    fn translate(&self, polygon: &Polygon<f64>, dx: f64, dy: f64) -> Polygon<f64>;
}

/// Planar kernel backed by the `geo` algorithms.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanarKernel;

impl GeometryKernel for PlanarKernel {
    fn clip(&self, line: &LineEq, polygon: &Polygon<f64>) -> Vec<Line<f64>> {
        let edges = std::iter::once(polygon.exterior())
            .chain(polygon.interiors())
            .flat_map(|ring| ring.lines());

        let mut params = Vec::new();
        for edge in edges {
            let (s0, s1) = (
                line.signed_distance(edge.start),
                line.signed_distance(edge.end),
            );
            let on_start = s0.abs() < EPSILON;
            let on_end = s1.abs() < EPSILON;

            if on_start {
                params.push(line.project(edge.start));
            }
            if on_end {
                params.push(line.project(edge.end));
            }
            if !on_start && !on_end && (s0 < 0.0) != (s1 < 0.0) {
                let t = s0 / (s0 - s1);
                let crossing = edge.start + (edge.end - edge.start) * t;
                params.push(line.project(crossing));
            }
        }

        params.sort_by(f64::total_cmp);
        params.dedup_by(|a, b| (*a - *b).abs() < EPSILON * a.abs().max(1.0));

        let mut chords: Vec<(f64, f64)> = Vec::new();
        for pair in params.windows(2) {
            let (t0, t1) = (pair[0], pair[1]);
            let mid = line.at((t0 + t1) / 2.0);
            if !polygon.contains(&mid) || on_boundary(polygon, mid) {
                continue;
            }
            // merge pieces split at a vertex the line passes through
            match chords.last_mut() {
                Some(last) if (last.1 - t0).abs() < EPSILON * t0.abs().max(1.0) => last.1 = t1,
                _ => chords.push((t0, t1)),
            }
        }

        chords
            .into_iter()
            .map(|(t0, t1)| Line::new(line.at(t0), line.at(t1)))
            .collect()
    }

    fn contains(&self, outer: &Polygon<f64>, inner: &Polygon<f64>) -> bool {
        outer.contains(inner)
    }

    fn intersects(&self, a: &Polygon<f64>, b: &Polygon<f64>) -> bool {
        a.intersects(b)
    }

    fn translate(&self, polygon: &Polygon<f64>, dx: f64, dy: f64) -> Polygon<f64> {
        polygon.translate(dx, dy)
    }
}

/// True when `p` is within rounding noise of any ring of `polygon`.
///
/// Pieces of a line running along an edge land here, whichever side of
/// the edge the arithmetic happens to put their midpoint.
fn on_boundary(polygon: &Polygon<f64>, p: Coord<f64>) -> bool {
    let tolerance = EPSILON * 10.0 * p.x.abs().max(p.y.abs()).max(1.0);
    let point = Point::from(p);
    std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .any(|ring| point.euclidean_distance(ring) <= tolerance)
}
