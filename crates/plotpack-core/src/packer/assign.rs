use crate::types::*;
use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::seq::SliceRandom;
use rand::Rng;
use std::cmp::Ordering;

/// Assigns a unit type index to every slot, keeping the row shape.
///
/// `row_lengths[r]` is the number of slots in row `r`; `weights[t]` is the
/// target proportion of type `t`. With [`AssignmentStrategy::Weighted`] each
/// slot draws independently, so small layouts can drift from the target
/// mix. [`AssignmentStrategy::Quota`] deals an exact largest-remainder
/// allocation in random order.
pub fn assign_types<R: Rng + ?Sized>(
    row_lengths: &[usize],
    weights: &[f64],
    strategy: AssignmentStrategy,
    rng: &mut R,
) -> Result<Vec<Vec<usize>>> {
    validate_weights(weights)?;

    match strategy {
        AssignmentStrategy::Weighted => {
            let dist = WeightedIndex::new(weights)
                .map_err(|e| LayoutError::InvalidInput(format!("Invalid proportions: {e}")))?;
            Ok(row_lengths
                .iter()
                .map(|&len| (0..len).map(|_| dist.sample(rng)).collect())
                .collect())
        }
        AssignmentStrategy::Quota => {
            let total = row_lengths.iter().sum();
            let mut deck: Vec<usize> = quotas(total, weights)
                .into_iter()
                .enumerate()
                .flat_map(|(unit, count)| std::iter::repeat(unit).take(count))
                .collect();
            deck.shuffle(rng);

            let mut cards = deck.into_iter();
            Ok(row_lengths
                .iter()
                .map(|&len| cards.by_ref().take(len).collect())
                .collect())
        }
    }
}

fn validate_weights(weights: &[f64]) -> Result<()> {
    if weights.is_empty() {
        return Err(LayoutError::InvalidInput(
            "At least one unit type must be provided".to_string(),
        ));
    }
    if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
        return Err(LayoutError::InvalidInput(
            "Proportions must be finite and non-negative".to_string(),
        ));
    }
    if !(weights.iter().sum::<f64>() > 0.0) {
        return Err(LayoutError::InvalidInput(
            "At least one proportion must be positive".to_string(),
        ));
    }
    Ok(())
}

/// Splits `total` slots over the weights with the largest remainder method.
/// Ties on the remainder go to the lower type index.
pub fn quotas(total: usize, weights: &[f64]) -> Vec<usize> {
    let sum: f64 = weights.iter().sum();
    let exact: Vec<f64> = weights.iter().map(|w| total as f64 * w / sum).collect();
    let mut counts: Vec<usize> = exact.iter().map(|e| e.floor() as usize).collect();

    let assigned: usize = counts.iter().sum();
    let mut order: Vec<usize> = (0..weights.len()).collect();
    order.sort_by(|&a, &b| {
        let ra = exact[a] - exact[a].floor();
        let rb = exact[b] - exact[b].floor();
        rb.partial_cmp(&ra).unwrap_or(Ordering::Equal).then(a.cmp(&b))
    });
    for &idx in order.iter().take(total.saturating_sub(assigned)) {
        counts[idx] += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn every_slot_gets_one_type() {
        let mut rng = StdRng::seed_from_u64(42);
        let rows = [3, 0, 7, 1];
        let assignment = assign_types(&rows, &[1.0, 2.0], AssignmentStrategy::Weighted, &mut rng).unwrap();
        let lengths: Vec<usize> = assignment.iter().map(Vec::len).collect();
        assert_eq!(lengths, rows);
        assert!(assignment.iter().flatten().all(|&t| t < 2));
    }

    #[test]
    fn zero_weight_type_is_never_drawn() {
        let mut rng = StdRng::seed_from_u64(7);
        let assignment = assign_types(&[500], &[0.0, 1.0], AssignmentStrategy::Weighted, &mut rng).unwrap();
        assert!(assignment[0].iter().all(|&t| t == 1));
    }

    #[test]
    fn same_seed_same_assignment() {
        let run = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            assign_types(&[20, 20], &[1.0, 1.0, 1.0], AssignmentStrategy::Weighted, &mut rng).unwrap()
        };
        assert_eq!(run(3), run(3));
    }

    #[test]
    fn quota_is_exact() {
        let mut rng = StdRng::seed_from_u64(1);
        let assignment = assign_types(&[4, 6], &[1.0, 3.0], AssignmentStrategy::Quota, &mut rng).unwrap();
        let flat: Vec<usize> = assignment.into_iter().flatten().collect();
        assert_eq!(flat.len(), 10);
        // 2.5 and 7.5: the tie goes to the first type
        assert_eq!(flat.iter().filter(|&&t| t == 0).count(), 3);
        assert_eq!(flat.iter().filter(|&&t| t == 1).count(), 7);
    }

    #[test]
    fn quotas_sum_to_total() {
        assert_eq!(quotas(10, &[1.0, 1.0, 1.0]), vec![4, 3, 3]);
        assert_eq!(quotas(0, &[1.0, 2.0]), vec![0, 0]);
        assert_eq!(quotas(7, &[0.0, 5.0]), vec![0, 7]);
    }

    #[test]
    fn rejects_unusable_weights() {
        let mut rng = StdRng::seed_from_u64(0);
        for weights in [vec![], vec![0.0, 0.0], vec![-1.0, 2.0], vec![f64::INFINITY]] {
            let result = assign_types(&[1], &weights, AssignmentStrategy::Weighted, &mut rng);
            assert!(matches!(result, Err(LayoutError::InvalidInput(_))));
        }
    }
}
