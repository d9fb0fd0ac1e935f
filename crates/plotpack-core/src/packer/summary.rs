use super::*;
use std::collections::HashMap;

impl<K: GeometryKernel> Packer<K> {
    /// Computes block counts, coverage and cost of the final layout.
    pub(super) fn calculate_summary(&self, rows: &[Vec<Placement>], shapes: &[UnitShape]) -> Summary {
        let mut blocks_per_type: HashMap<String, u32> = HashMap::new();
        let mut covered_area = 0.0;
        let mut total_cost = 0.0;

        for placement in rows.iter().flatten() {
            let shape = &shapes[placement.unit];
            *blocks_per_type.entry(shape.id.clone()).or_insert(0) += 1;
            covered_area += shape.area;
            total_cost += shape.cost;
        }

        let boundary_area = geometry::area(&self.boundary);
        let coverage_percentage = if boundary_area > 0.0 {
            (covered_area / boundary_area) * 100.0
        } else {
            0.0
        };

        Summary {
            total_blocks: blocks_per_type.values().sum(),
            blocks_per_type,
            covered_area,
            boundary_area,
            coverage_percentage,
            total_cost,
        }
    }
}
