use super::orientation::{LinePath, Orientation};
use crate::geometry::{covers, GeometryKernel, LineEq};
use crate::types::*;
use geo::{Coord, Line, Polygon};
use tracing::trace;

/// One lattice line clipped to the boundary.
#[derive(Debug, Clone)]
pub struct LatticeLine {
    pub line: LineEq,
    pub chords: Vec<Line<f64>>,
}

impl LatticeLine {
    fn covers(&self, p: Coord<f64>) -> bool {
        self.chords.iter().any(|chord| covers(chord, p))
    }
}

/// Steps along `path` by `distance` and emits one clipped line per step.
///
/// A horizontal path advances x left to right and a vertical path advances y
/// top to bottom, stopping once the coordinate passes the path end. Each
/// step's point lies on whichever frame line matches the stepping axis and
/// the emitted line is perpendicular to it, which makes it either a normal
/// of the longest edge or a parallel of it. Steps whose line misses the
/// boundary are skipped.
pub fn lattice_lines<K: GeometryKernel>(
    kernel: &K,
    path: &LinePath,
    distance: f64,
    boundary: &Polygon<f64>,
    horizontal: bool,
    frame: &Orientation,
) -> Result<Vec<LatticeLine>> {
    if !(distance > 0.0) || !distance.is_finite() {
        return Err(LayoutError::InvalidInput(format!(
            "Lattice spacing must be positive, got {distance}"
        )));
    }

    // the family stepping along the longest edge is perpendicular to it
    let perpendicular = horizontal == frame.horizontal_has_longest;
    let base = if perpendicular {
        frame.dominant
    } else {
        frame.normal
    };

    let mut lines = Vec::new();
    let mut push = |point: Coord<f64>| {
        let line = if perpendicular {
            frame.dominant.normal_through(point)
        } else {
            frame.dominant.parallel_through(point)
        };
        let chords = kernel.clip(&line, boundary);
        if chords.is_empty() {
            trace!(x = point.x, y = point.y, "lattice line misses boundary");
        } else {
            lines.push(LatticeLine { line, chords });
        }
    };

    if horizontal {
        let mut x = path.start;
        while x < path.end {
            let y = base.y_at(x).ok_or_else(|| {
                LayoutError::DegenerateBoundary("base line is vertical".to_string())
            })?;
            push(Coord { x, y });
            x += distance;
        }
    } else {
        let mut y = path.start;
        while y > path.end {
            let x = base.x_at(y).ok_or_else(|| {
                LayoutError::DegenerateBoundary("base line is horizontal".to_string())
            })?;
            push(Coord { x, y });
            y -= distance;
        }
    }

    Ok(lines)
}

/// Intersects the two families into rows of candidate points.
///
/// There is one row per parallel line, in order, even when it holds no
/// point. Within a row points follow the order of the perpendicular lines.
pub fn candidate_rows(perpendicular: &[LatticeLine], parallel: &[LatticeLine]) -> Vec<Vec<Coord<f64>>> {
    parallel
        .iter()
        .map(|row_line| {
            perpendicular
                .iter()
                .filter_map(|column_line| {
                    let p = row_line.line.intersection(&column_line.line)?;
                    (row_line.covers(p) && column_line.covers(p)).then_some(p)
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{polygon_from_ring, PlanarKernel};
    use crate::packer::orientation::solve;

    fn square() -> Polygon<f64> {
        polygon_from_ring(&[[0.0, 0.0], [100.0, 0.0], [100.0, 100.0], [0.0, 100.0]])
    }

    #[test]
    fn horizontal_family_steps_x_with_strict_end() {
        let boundary = square();
        let frame = solve(&boundary).unwrap();
        let lines = lattice_lines(&PlanarKernel, &frame.horizontal, 30.0, &boundary, true, &frame).unwrap();
        // x = 0 runs along the boundary edge and has no interior chord
        assert_eq!(lines.len(), 3);
        for (i, l) in lines.iter().enumerate() {
            let chord = l.chords[0];
            assert!((chord.start.x - 30.0 * (i + 1) as f64).abs() < 1e-9);
            assert!((chord.start.x - chord.end.x).abs() < 1e-9);
        }
    }

    #[test]
    fn vertical_family_steps_y_downwards() {
        let boundary = square();
        let frame = solve(&boundary).unwrap();
        let lines = lattice_lines(&PlanarKernel, &frame.vertical, 40.0, &boundary, false, &frame).unwrap();
        // y = 100 lies on the top edge; 60 and 20 remain
        let ys: Vec<f64> = lines.iter().map(|l| l.chords[0].start.y).collect();
        assert_eq!(ys.len(), 2);
        assert!((ys[0] - 60.0).abs() < 1e-9);
        assert!((ys[1] - 20.0).abs() < 1e-9);
    }

    #[test]
    fn rows_follow_parallel_lines() {
        let boundary = square();
        let frame = solve(&boundary).unwrap();
        let perp = lattice_lines(&PlanarKernel, &frame.horizontal, 30.0, &boundary, true, &frame).unwrap();
        let parallel = lattice_lines(&PlanarKernel, &frame.vertical, 40.0, &boundary, false, &frame).unwrap();
        let rows = candidate_rows(&perp, &parallel);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|row| row.len() == 3));
        assert!((rows[0][1].x - 60.0).abs() < 1e-9);
        assert!((rows[0][1].y - 60.0).abs() < 1e-9);
        assert!((rows[1][0].y - 20.0).abs() < 1e-9);
    }

    #[test]
    fn points_outside_a_notch_are_not_candidates() {
        // L-shape: the top right quadrant is missing
        let boundary = polygon_from_ring(&[
            [0.0, 0.0],
            [100.0, 0.0],
            [100.0, 50.0],
            [50.0, 50.0],
            [50.0, 100.0],
            [0.0, 100.0],
        ]);
        let frame = solve(&boundary).unwrap();
        let perp = lattice_lines(&PlanarKernel, &frame.horizontal, 20.0, &boundary, true, &frame).unwrap();
        let parallel = lattice_lines(&PlanarKernel, &frame.vertical, 20.0, &boundary, false, &frame).unwrap();
        let rows = candidate_rows(&perp, &parallel);
        for p in rows.iter().flatten() {
            assert!(!(p.x > 50.0 && p.y > 50.0), "point {p:?} lies in the notch");
        }
        assert!(rows.iter().flatten().any(|p| p.x > 50.0 && p.y < 50.0));
    }

    #[test]
    fn tilted_plot_produces_perpendicular_families() {
        let boundary = polygon_from_ring(&[[0.0, 0.0], [80.0, 60.0], [50.0, 100.0], [-30.0, 40.0]]);
        let frame = solve(&boundary).unwrap();
        let perp = lattice_lines(&PlanarKernel, &frame.horizontal, 10.0, &boundary, true, &frame).unwrap();
        let parallel = lattice_lines(&PlanarKernel, &frame.vertical, 10.0, &boundary, false, &frame).unwrap();
        assert!(!perp.is_empty() && !parallel.is_empty());

        let d = frame.dominant.direction();
        for l in &parallel {
            let ld = l.line.direction();
            assert!((d.x * ld.y - d.y * ld.x).abs() < 1e-9);
        }
        for l in &perp {
            let ld = l.line.direction();
            assert!((d.x * ld.x + d.y * ld.y).abs() < 1e-9);
        }
    }

    #[test]
    fn rejects_zero_spacing() {
        let boundary = square();
        let frame = solve(&boundary).unwrap();
        assert!(lattice_lines(&PlanarKernel, &frame.horizontal, 0.0, &boundary, true, &frame).is_err());
    }
}
