use crate::geometry::{self, GeometryKernel};
use crate::types::*;
use geo::{Coord, Line, Polygon};

/// A unit type oriented to the plot and centered on the origin.
#[derive(Debug, Clone)]
pub struct UnitShape {
    pub id: String,
    pub cost: f64,
    pub area: f64,
    pub polygon: Polygon<f64>,
}

impl UnitShape {
    pub fn oriented(unit: &UnitType, edge: &Line<f64>) -> Result<Self> {
        let rotated = geometry::rotate_to(edge, &geometry::unit_polygon(unit.width, unit.length));
        let polygon = geometry::center_at_origin(&rotated).ok_or_else(|| {
            LayoutError::InvalidInput(format!("Unit type '{}' has no centroid", unit.id))
        })?;
        Ok(Self {
            id: unit.id.clone(),
            cost: unit.cost,
            area: unit.area(),
            polygon,
        })
    }
}

/// A unit shape translated onto a candidate point.
#[derive(Debug, Clone)]
pub struct Placement {
    pub point: Coord<f64>,
    /// Index into the unit catalogue
    pub unit: usize,
    pub polygon: Polygon<f64>,
}

impl Placement {
    pub fn to_block(&self, shapes: &[UnitShape]) -> PlacedBlock {
        PlacedBlock {
            type_id: shapes[self.unit].id.clone(),
            point: [self.point.x, self.point.y],
            corners: geometry::ring_of(&self.polygon),
        }
    }
}

/// Places `shapes[unit]` on `point`, or nothing when the block leaves the boundary.
pub fn place<K: GeometryKernel>(
    kernel: &K,
    point: Coord<f64>,
    unit: usize,
    shapes: &[UnitShape],
    boundary: &Polygon<f64>,
) -> Option<Placement> {
    let polygon = kernel.translate(&shapes[unit].polygon, point.x, point.y);
    kernel
        .contains(boundary, &polygon)
        .then_some(Placement { point, unit, polygon })
}

/// Places one unit type on every candidate point; rows are kept even when emptied.
pub fn place_rows<K: GeometryKernel>(
    kernel: &K,
    rows: &[Vec<Coord<f64>>],
    unit: usize,
    shapes: &[UnitShape],
    boundary: &Polygon<f64>,
) -> Vec<Vec<Placement>> {
    rows.iter()
        .map(|row| {
            row.iter()
                .filter_map(|&point| place(kernel, point, unit, shapes, boundary))
                .collect()
        })
        .collect()
}

/// Places each slot with its assigned type.
///
/// A slot whose assigned type leaves the boundary falls back to `fallback`
/// when given, otherwise it is dropped.
pub fn place_typed<K: GeometryKernel>(
    kernel: &K,
    slots: &[Vec<Placement>],
    assignment: &[Vec<usize>],
    shapes: &[UnitShape],
    boundary: &Polygon<f64>,
    fallback: Option<usize>,
) -> Vec<Vec<Placement>> {
    slots
        .iter()
        .zip(assignment)
        .map(|(row, types)| {
            row.iter()
                .zip(types)
                .filter_map(|(slot, &unit)| {
                    place(kernel, slot.point, unit, shapes, boundary).or_else(|| {
                        fallback
                            .filter(|&f| f != unit)
                            .and_then(|f| place(kernel, slot.point, f, shapes, boundary))
                    })
                })
                .collect()
        })
        .collect()
}
