use crate::geometry::{self, GeometryKernel, PlanarKernel};
use crate::types::*;
use geo::Polygon;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;
use tracing::{debug, info};

pub mod assign;
pub mod conflict;
pub mod lattice;
pub mod orientation;
pub mod padding;
pub mod placement;
mod summary;

use conflict::Fallback;
use orientation::Orientation;
use placement::{Placement, UnitShape};

/// Packs unit rectangles into a plot on a lattice aligned to its longest edge.
pub struct Packer<K: GeometryKernel = PlanarKernel> {
    request: LayoutRequest,
    boundary: Polygon<f64>,
    kernel: K,
}

impl Packer<PlanarKernel> {
    /// Validates requests and builds a new packer instance.
    pub fn new(request: LayoutRequest) -> Result<Self> {
        Self::with_kernel(request, PlanarKernel)
    }
}

impl<K: GeometryKernel> Packer<K> {
    /// Validates requests and builds a packer on a custom geometry kernel.
    pub fn with_kernel(request: LayoutRequest, kernel: K) -> Result<Self> {
        if request.boundary.len() < 3 {
            return Err(LayoutError::InvalidInput(
                "Boundary needs at least three vertices".to_string(),
            ));
        }

        if request.boundary.iter().flatten().any(|c| !c.is_finite()) {
            return Err(LayoutError::InvalidInput(
                "Boundary coordinates must be finite".to_string(),
            ));
        }

        if request.unit_types.is_empty() {
            return Err(LayoutError::InvalidInput(
                "At least one unit type must be provided".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for unit in &request.unit_types {
            if !seen.insert(unit.id.as_str()) {
                return Err(LayoutError::InvalidInput(format!(
                    "Unit type '{}' is defined twice",
                    unit.id
                )));
            }

            let valid = |v: f64| v.is_finite() && v > 0.0;
            if !valid(unit.width) || !valid(unit.length) {
                return Err(LayoutError::InvalidInput(format!(
                    "Unit type '{}' must have positive width and length",
                    unit.id
                )));
            }
        }

        for (id, weight) in &request.proportions {
            if !seen.contains(id.as_str()) {
                return Err(LayoutError::InvalidInput(format!(
                    "Proportion given for unknown unit type '{id}'"
                )));
            }
            if !weight.is_finite() || *weight < 0.0 {
                return Err(LayoutError::InvalidInput(format!(
                    "Proportion of '{id}' must be finite and non-negative"
                )));
            }
        }

        if !request.proportions.values().any(|w| *w > 0.0) {
            return Err(LayoutError::InvalidInput(
                "At least one proportion must be positive".to_string(),
            ));
        }

        if !(request.search_increment > 0.0) || !request.search_increment.is_finite() {
            return Err(LayoutError::InvalidInput(format!(
                "Search increment must be positive, got {}",
                request.search_increment
            )));
        }

        let mut boundary = geometry::polygon_from_ring(&request.boundary);
        if request.move_to_origin {
            boundary = geometry::move_to_origin(&boundary).ok_or_else(|| {
                LayoutError::DegenerateBoundary("boundary has no bounding box".to_string())
            })?;
        }

        Ok(Self {
            request,
            boundary,
            kernel,
        })
    }

    /// Executes the full layout flow and returns the placed blocks.
    pub fn pack(&self) -> Result<LayoutResult> {
        let orientation = orientation::solve(&self.boundary)?;
        let shapes = self.unit_shapes(&orientation)?;
        let smallest = smallest_unit(&shapes);
        let paddings = self.find_paddings(&orientation, &shapes)?;

        let candidates = self.candidate_points(&orientation, &paddings)?;
        debug!(
            rows = candidates.len(),
            points = candidates.iter().map(Vec::len).sum::<usize>(),
            "lattice built"
        );

        // untyped pass: smallest unit everywhere
        let initial = placement::place_rows(&self.kernel, &candidates, smallest, &shapes, &self.boundary);
        let slots = conflict::filter_rows(&self.kernel, &initial, self.request.adjacency, None);
        debug!(
            slots = slots.iter().map(Vec::len).sum::<usize>(),
            "initial layout filtered"
        );

        // typed pass
        let row_lengths: Vec<usize> = slots.iter().map(Vec::len).collect();
        let assignment = assign::assign_types(
            &row_lengths,
            &self.weights(&shapes),
            self.request.assignment,
            &mut self.rng(),
        )?;

        let fallback_unit = self.request.replace_on_conflict.then_some(smallest);
        let typed = placement::place_typed(
            &self.kernel,
            &slots,
            &assignment,
            &shapes,
            &self.boundary,
            fallback_unit,
        );
        let fallback = fallback_unit.map(|unit| Fallback {
            unit,
            shapes: &shapes,
            boundary: &self.boundary,
        });
        let layout = conflict::filter_rows(&self.kernel, &typed, self.request.adjacency, fallback);

        let summary = self.calculate_summary(&layout, &shapes);
        info!(
            blocks = summary.total_blocks,
            coverage = summary.coverage_percentage,
            "layout complete"
        );

        Ok(LayoutResult {
            rows: layout
                .iter()
                .map(|row| row.iter().map(|p| p.to_block(&shapes)).collect())
                .collect(),
            paddings,
            orientation: orientation.info(),
            summary,
        })
    }

    /// Orientation and lattice spacing for this plot, without placing blocks.
    pub fn paddings(&self) -> Result<(OrientationInfo, Paddings)> {
        let orientation = orientation::solve(&self.boundary)?;
        let shapes = self.unit_shapes(&orientation)?;
        let paddings = self.find_paddings(&orientation, &shapes)?;
        Ok((orientation.info(), paddings))
    }

    /// The boundary the packer works on, after any move to the origin.
    pub fn boundary(&self) -> &Polygon<f64> {
        &self.boundary
    }

    fn unit_shapes(&self, orientation: &Orientation) -> Result<Vec<UnitShape>> {
        self.request
            .unit_types
            .iter()
            .map(|unit| UnitShape::oriented(unit, &orientation.longest_edge))
            .collect()
    }

    fn find_paddings(&self, orientation: &Orientation, shapes: &[UnitShape]) -> Result<Paddings> {
        let polygons: Vec<Polygon<f64>> = shapes.iter().map(|s| s.polygon.clone()).collect();
        let increment = self.request.search_increment;

        let block = padding::find_padding(&self.kernel, &polygons, &orientation.dominant, increment)?;
        let row = padding::find_padding(&self.kernel, &polygons, &orientation.normal, increment)?;
        debug!(block, row, "paddings found");

        Ok(Paddings { block, row })
    }

    /// Blockpadding spaces the lines perpendicular to the longest edge,
    /// rowpadding the lines parallel to it.
    fn candidate_points(
        &self,
        orientation: &Orientation,
        paddings: &Paddings,
    ) -> Result<Vec<Vec<geo::Coord<f64>>>> {
        let (horizontal_spacing, vertical_spacing) = if orientation.horizontal_has_longest {
            (paddings.block, paddings.row)
        } else {
            (paddings.row, paddings.block)
        };

        let horizontal = lattice::lattice_lines(
            &self.kernel,
            &orientation.horizontal,
            horizontal_spacing,
            &self.boundary,
            true,
            orientation,
        )?;
        let vertical = lattice::lattice_lines(
            &self.kernel,
            &orientation.vertical,
            vertical_spacing,
            &self.boundary,
            false,
            orientation,
        )?;

        let (perpendicular, parallel) = if orientation.horizontal_has_longest {
            (horizontal, vertical)
        } else {
            (vertical, horizontal)
        };

        Ok(lattice::candidate_rows(&perpendicular, &parallel))
    }

    /// Proportions in catalogue order, missing types weigh nothing.
    fn weights(&self, shapes: &[UnitShape]) -> Vec<f64> {
        shapes
            .iter()
            .map(|s| self.request.proportions.get(&s.id).copied().unwrap_or(0.0))
            .collect()
    }

    fn rng(&self) -> StdRng {
        match self.request.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

/// Index of the unit with the smallest footprint; the first one wins ties.
fn smallest_unit(shapes: &[UnitShape]) -> usize {
    shapes
        .iter()
        .enumerate()
        .fold(None::<(usize, f64)>, |best, (idx, shape)| match best {
            Some((_, area)) if area <= shape.area => best,
            _ => Some((idx, shape.area)),
        })
        .map(|(idx, _)| idx)
        .unwrap_or(0)
}
