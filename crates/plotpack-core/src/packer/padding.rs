use crate::geometry::{GeometryKernel, LineEq};
use crate::types::*;
use geo::{BoundingRect, Polygon};
use tracing::trace;

/// Smallest distance, in multiples of `increment` along the stepping axis,
/// at which every unit translated along `direction` no longer intersects
/// its original. The maximum over all units is returned.
///
/// Stepping runs on x for horizontal-dominant directions and on y otherwise,
/// so the reported distance is the Euclidean length of the translation.
pub fn find_padding<K: GeometryKernel>(
    kernel: &K,
    units: &[Polygon<f64>],
    direction: &LineEq,
    increment: f64,
) -> Result<f64> {
    if !(increment > 0.0) || !increment.is_finite() {
        return Err(LayoutError::InvalidInput(format!(
            "Search increment must be positive, got {increment}"
        )));
    }

    let d = direction.direction();
    let axis = if direction.is_horizontal_dominant() {
        d.x.abs()
    } else {
        d.y.abs()
    };

    let mut padding: f64 = 0.0;
    for (idx, unit) in units.iter().enumerate() {
        // a copy moved further than the bounding box diagonal is always clear
        let diagonal = unit
            .bounding_rect()
            .map(|rect| rect.width().hypot(rect.height()))
            .ok_or_else(|| LayoutError::InvalidInput(format!("Unit {idx} has no vertices")))?;
        let max_steps = (diagonal * axis / increment).ceil() as u64 + 1;

        let mut step: u64 = 0;
        let distance = loop {
            if step > max_steps {
                return Err(LayoutError::InvalidInput(format!(
                    "Unit {idx} does not separate from itself within {max_steps} steps"
                )));
            }
            let distance = step as f64 * increment / axis;
            let moved = kernel.translate(unit, d.x * distance, d.y * distance);
            if !kernel.intersects(unit, &moved) {
                break distance;
            }
            step += 1;
        };
        trace!(unit = idx, distance, "unit separated");
        padding = padding.max(distance);
    }

    Ok(padding)
}
