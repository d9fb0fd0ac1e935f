use crate::geometry::{self, LineEq, EPSILON};
use crate::types::*;
use geo::{BoundingRect, Line, Polygon};
use std::cmp::Ordering;

/// Boundary edges of one dominant direction, ordered along the stepping axis.
///
/// A horizontal path runs left to right and its extent is on the x axis;
/// a vertical path runs top to bottom and its extent is on the y axis.
#[derive(Debug, Clone)]
pub struct LinePath {
    pub edges: Vec<Line<f64>>,
    /// Coordinate where stepping starts (min x, or max y)
    pub start: f64,
    /// Coordinate where stepping stops (max x, or min y)
    pub end: f64,
}

/// Coordinate frame of a plot, derived from its longest edge.
#[derive(Debug, Clone)]
pub struct Orientation {
    pub longest_edge: Line<f64>,
    /// Line through the longest edge
    pub dominant: LineEq,
    /// Normal of the dominant line through the start of the longest edge
    pub normal: LineEq,
    pub horizontal: LinePath,
    pub vertical: LinePath,
    pub horizontal_has_longest: bool,
}

impl Orientation {
    pub fn info(&self) -> OrientationInfo {
        let Line { start, end } = self.longest_edge;
        OrientationInfo {
            longest_edge: [[start.x, start.y], [end.x, end.y]],
            horizontal_has_longest: self.horizontal_has_longest,
            angle: geometry::angle_of(&self.longest_edge),
        }
    }
}

fn is_horizontal(edge: &Line<f64>) -> bool {
    edge.dx().abs() >= edge.dy().abs()
}

/// Finds the longest edge of `boundary` and splits its edges into the
/// horizontal and vertical line paths.
pub fn solve(boundary: &Polygon<f64>) -> Result<Orientation> {
    if !(geometry::area(boundary) > EPSILON) {
        return Err(LayoutError::DegenerateBoundary(
            "boundary has zero area".to_string(),
        ));
    }

    // first edge reaching the maximum wins
    let mut longest: Option<(Line<f64>, f64)> = None;
    for edge in boundary.exterior().lines() {
        let len = geometry::length(&edge);
        match longest {
            Some((_, best)) if len <= best => {}
            _ => longest = Some((edge, len)),
        }
    }

    let longest_edge = match longest {
        Some((edge, len)) if len > EPSILON => edge,
        _ => {
            return Err(LayoutError::DegenerateBoundary(
                "boundary has no edge of positive length".to_string(),
            ))
        }
    };

    let dominant = LineEq::through(longest_edge.start, longest_edge.end).ok_or_else(|| {
        LayoutError::DegenerateBoundary("longest edge is a single point".to_string())
    })?;
    let normal = dominant.normal_through(longest_edge.start);

    let bounds = boundary.bounding_rect().ok_or_else(|| {
        LayoutError::DegenerateBoundary("boundary has no bounding box".to_string())
    })?;

    let mut horizontal_edges = Vec::new();
    let mut vertical_edges = Vec::new();
    for edge in boundary.exterior().lines() {
        if geometry::length(&edge) <= EPSILON {
            continue;
        }
        if is_horizontal(&edge) {
            let edge = if edge.start.x <= edge.end.x {
                edge
            } else {
                Line::new(edge.end, edge.start)
            };
            horizontal_edges.push(edge);
        } else {
            let edge = if edge.start.y >= edge.end.y {
                edge
            } else {
                Line::new(edge.end, edge.start)
            };
            vertical_edges.push(edge);
        }
    }

    horizontal_edges.sort_by(|a, b| a.start.x.partial_cmp(&b.start.x).unwrap_or(Ordering::Equal));
    vertical_edges.sort_by(|a, b| b.start.y.partial_cmp(&a.start.y).unwrap_or(Ordering::Equal));

    let horizontal = match (horizontal_edges.first(), horizontal_edges.iter().map(|e| e.end.x).reduce(f64::max)) {
        (Some(first), Some(end)) => LinePath {
            start: first.start.x,
            end,
            edges: horizontal_edges,
        },
        _ => LinePath {
            edges: Vec::new(),
            start: bounds.min().x,
            end: bounds.max().x,
        },
    };

    let vertical = match (vertical_edges.first(), vertical_edges.iter().map(|e| e.end.y).reduce(f64::min)) {
        (Some(first), Some(end)) => LinePath {
            start: first.start.y,
            end,
            edges: vertical_edges,
        },
        _ => LinePath {
            edges: Vec::new(),
            start: bounds.max().y,
            end: bounds.min().y,
        },
    };

    Ok(Orientation {
        horizontal_has_longest: is_horizontal(&longest_edge),
        longest_edge,
        dominant,
        normal,
        horizontal,
        vertical,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::polygon_from_ring;

    #[test]
    fn picks_first_of_equal_edges() {
        let square = polygon_from_ring(&[[0.0, 0.0], [100.0, 0.0], [100.0, 100.0], [0.0, 100.0]]);
        let orientation = solve(&square).unwrap();
        assert_eq!(orientation.longest_edge.start.x, 0.0);
        assert_eq!(orientation.longest_edge.end.x, 100.0);
        assert!(orientation.horizontal_has_longest);
        assert_eq!(orientation.horizontal.edges.len(), 2);
        assert_eq!(orientation.vertical.edges.len(), 2);
        assert_eq!((orientation.horizontal.start, orientation.horizontal.end), (0.0, 100.0));
        assert_eq!((orientation.vertical.start, orientation.vertical.end), (100.0, 0.0));
    }

    #[test]
    fn tall_plot_has_vertical_longest() {
        let tall = polygon_from_ring(&[[0.0, 0.0], [40.0, 0.0], [40.0, 200.0], [0.0, 200.0]]);
        let orientation = solve(&tall).unwrap();
        assert!(!orientation.horizontal_has_longest);
        assert!((orientation.info().angle - 90.0).abs() < 1e-9);
    }

    #[test]
    fn edges_are_oriented_along_their_path() {
        let plot = polygon_from_ring(&[[0.0, 0.0], [0.0, 50.0], [80.0, 60.0], [90.0, 0.0]]);
        let orientation = solve(&plot).unwrap();
        assert!(orientation.horizontal.edges.iter().all(|e| e.start.x <= e.end.x));
        assert!(orientation.vertical.edges.iter().all(|e| e.start.y >= e.end.y));
        assert_eq!(orientation.horizontal.start, 0.0);
        assert_eq!(orientation.horizontal.end, 90.0);
    }

    #[test]
    fn zero_area_is_degenerate() {
        let flat = polygon_from_ring(&[[0.0, 0.0], [10.0, 0.0], [20.0, 0.0]]);
        assert!(matches!(solve(&flat), Err(LayoutError::DegenerateBoundary(_))));
    }
}
