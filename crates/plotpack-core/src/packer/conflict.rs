use super::placement::{place, Placement, UnitShape};
use crate::geometry::GeometryKernel;
use crate::types::*;
use geo::Polygon;
use tracing::debug;

/// Replacement used for a rejected block instead of dropping its slot.
#[derive(Debug, Clone, Copy)]
pub struct Fallback<'a> {
    /// Index of the smallest unit type
    pub unit: usize,
    pub shapes: &'a [UnitShape],
    pub boundary: &'a Polygon<f64>,
}

/// In-row neighbour a slot is checked against.
///
/// Under [`AdjacencyPolicy::WrapAround`] slot 0 is compared with the last
/// slot of its row, which may be far away. A slot is never its own neighbour.
pub fn predecessor(policy: AdjacencyPolicy, slot: usize, len: usize) -> Option<usize> {
    match policy {
        AdjacencyPolicy::WrapAround => {
            let prev = if slot == 0 { len.checked_sub(1)? } else { slot - 1 };
            (prev != slot).then_some(prev)
        }
        AdjacencyPolicy::Sequential => slot.checked_sub(1),
    }
}

/// Removes or replaces blocks that overlap their in-row predecessor or any
/// block of the next row. The last row is copied through unchecked.
///
/// All checks run against the input rows. A replacement is not checked
/// again, and a rejected block that already is the fallback unit is dropped.
pub fn filter_rows<K: GeometryKernel>(
    kernel: &K,
    rows: &[Vec<Placement>],
    policy: AdjacencyPolicy,
    fallback: Option<Fallback<'_>>,
) -> Vec<Vec<Placement>> {
    let Some((last, body)) = rows.split_last() else {
        return Vec::new();
    };

    let mut filtered = Vec::with_capacity(rows.len());
    let (mut replaced, mut dropped) = (0usize, 0usize);

    for (x, row) in body.iter().enumerate() {
        let next = &rows[x + 1];
        let mut kept = Vec::with_capacity(row.len());

        for (y, block) in row.iter().enumerate() {
            let conflicts_in_row = predecessor(policy, y, row.len())
                .is_some_and(|p| kernel.intersects(&block.polygon, &row[p].polygon));
            let conflicts = conflicts_in_row
                || next
                    .iter()
                    .any(|other| kernel.intersects(&block.polygon, &other.polygon));

            if !conflicts {
                kept.push(block.clone());
                continue;
            }

            let replacement = fallback
                .filter(|f| f.unit != block.unit)
                .and_then(|f| place(kernel, block.point, f.unit, f.shapes, f.boundary));
            match replacement {
                Some(r) => {
                    replaced += 1;
                    kept.push(r);
                }
                None => dropped += 1,
            }
        }

        filtered.push(kept);
    }

    filtered.push(last.clone());
    debug!(replaced, dropped, rows = filtered.len(), "conflict filter done");
    filtered
}
