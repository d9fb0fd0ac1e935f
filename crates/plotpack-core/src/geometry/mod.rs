//! Planar geometry used by the packer: line equations, the kernel trait and
//! a handful of polygon transformations.

mod kernel;
mod line;

pub use kernel::{GeometryKernel, PlanarKernel};
pub use line::{covers, length, LineEq, EPSILON};

use geo::{Area, BoundingRect, Centroid, Line, LineString, Polygon, Rotate, Translate};

/// Builds a polygon from a ring of `[x, y]` pairs; the ring is closed if needed.
pub fn polygon_from_ring(ring: &[[f64; 2]]) -> Polygon<f64> {
    let coords: Vec<(f64, f64)> = ring.iter().map(|&[x, y]| (x, y)).collect();
    Polygon::new(LineString::from(coords), vec![])
}

/// Exterior ring as `[x, y]` pairs without the closing vertex.
pub fn ring_of(polygon: &Polygon<f64>) -> Vec<[f64; 2]> {
    let coords = &polygon.exterior().0;
    let open = match (coords.first(), coords.last()) {
        (Some(first), Some(last)) if coords.len() > 1 && first == last => &coords[..coords.len() - 1],
        _ => &coords[..],
    };
    open.iter().map(|c| [c.x, c.y]).collect()
}

/// Axis aligned `width` x `length` rectangle with a corner at the origin.
pub fn unit_polygon(width: f64, length: f64) -> Polygon<f64> {
    polygon_from_ring(&[[0.0, 0.0], [width, 0.0], [width, length], [0.0, length]])
}

/// Angle of `edge` in degrees, counter clockwise from the x axis.
pub fn angle_of(edge: &Line<f64>) -> f64 {
    edge.dy().atan2(edge.dx()).to_degrees()
}

/// Rotates `polygon` around its centroid so its x axis follows `edge`.
pub fn rotate_to(edge: &Line<f64>, polygon: &Polygon<f64>) -> Polygon<f64> {
    polygon.rotate_around_centroid(angle_of(edge))
}

/// Translates `polygon` so its centroid sits on the origin.
pub fn center_at_origin(polygon: &Polygon<f64>) -> Option<Polygon<f64>> {
    let centroid = polygon.centroid()?;
    Some(polygon.translate(-centroid.x(), -centroid.y()))
}

/// Translates `polygon` so its bounding box starts at the origin.
pub fn move_to_origin(polygon: &Polygon<f64>) -> Option<Polygon<f64>> {
    let bounds = polygon.bounding_rect()?;
    Some(polygon.translate(-bounds.min().x, -bounds.min().y))
}

pub fn area(polygon: &Polygon<f64>) -> f64 {
    polygon.unsigned_area()
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::coord;

    #[test]
    fn ring_round_trips_without_closing_vertex() {
        let ring = [[0.0, 0.0], [4.0, 0.0], [4.0, 3.0]];
        let polygon = polygon_from_ring(&ring);
        assert_eq!(polygon.exterior().0.len(), 4);
        assert_eq!(ring_of(&polygon), ring.to_vec());
    }

    #[test]
    fn centered_unit_is_symmetric() {
        let unit = center_at_origin(&unit_polygon(25.0, 30.0)).unwrap();
        let bounds = unit.bounding_rect().unwrap();
        assert!((bounds.min().x + 12.5).abs() < 1e-9);
        assert!((bounds.max().y - 15.0).abs() < 1e-9);
    }

    #[test]
    fn rotation_keeps_area_and_aligns_to_edge() {
        let edge = Line::new(coord! { x: 0.0, y: 0.0 }, coord! { x: 0.0, y: 10.0 });
        assert!((angle_of(&edge) - 90.0).abs() < 1e-9);

        let rotated = center_at_origin(&rotate_to(&edge, &unit_polygon(20.0, 10.0))).unwrap();
        assert!((area(&rotated) - 200.0).abs() < 1e-6);
        let bounds = rotated.bounding_rect().unwrap();
        assert!((bounds.width() - 10.0).abs() < 1e-6);
        assert!((bounds.height() - 20.0).abs() < 1e-6);
    }

    #[test]
    fn move_to_origin_shifts_bounds() {
        let far = polygon_from_ring(&[[510000.0, 180000.0], [510100.0, 180000.0], [510100.0, 180050.0]]);
        let near = move_to_origin(&far).unwrap();
        let bounds = near.bounding_rect().unwrap();
        assert_eq!(bounds.min().x, 0.0);
        assert_eq!(bounds.min().y, 0.0);
        assert_eq!(bounds.max().x, 100.0);
    }
}
