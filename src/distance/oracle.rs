//! Cost lookup contract.

/// Read-only travel cost between two node identifiers.
///
/// Implementations must be defined for every ordered pair of nodes that
/// appears in a tour and must stay immutable for the lifetime of a run.
/// Costs may be asymmetric.
pub trait DistanceOracle {
    /// Cost of travelling from `from` to `to`.
    fn cost(&self, from: usize, to: usize) -> f64;

    /// Returns `true` if `cost(a, b) == cost(b, a)` for every pair.
    ///
    /// Reversal costing skips interior-edge corrections when this holds.
    /// The default is the conservative `false`.
    fn is_symmetric(&self) -> bool {
        false
    }

    /// Returns up to `k` of the given candidates, cheapest to reach from
    /// `from` first.
    ///
    /// Candidates equal to `from` are skipped. Ties keep candidate order.
    fn nearest(&self, from: usize, candidates: &[usize], k: usize) -> Vec<usize> {
        ranked(from, candidates, k, |c| self.cost(from, c))
    }

    /// Returns up to `k` of the given candidates, cheapest to travel to `to`
    /// first.
    ///
    /// Same as [`nearest`](Self::nearest) with the cost direction flipped.
    fn nearest_inbound(&self, to: usize, candidates: &[usize], k: usize) -> Vec<usize> {
        ranked(to, candidates, k, |c| self.cost(c, to))
    }
}

fn ranked(skip: usize, candidates: &[usize], k: usize, cost: impl Fn(usize) -> f64) -> Vec<usize> {
    let mut ranked: Vec<usize> = candidates
        .iter()
        .copied()
        .filter(|&c| c != skip)
        .collect();
    ranked.sort_by(|&a, &b| cost(a).total_cmp(&cost(b)));
    ranked.truncate(k);
    ranked
}

impl<D: DistanceOracle + ?Sized> DistanceOracle for &D {
    fn cost(&self, from: usize, to: usize) -> f64 {
        (**self).cost(from, to)
    }

    fn is_symmetric(&self) -> bool {
        (**self).is_symmetric()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DistanceMatrix;

    #[test]
    fn test_nearest() {
        let dm = DistanceMatrix::from_points(&[(0.0, 0.0), (3.0, 4.0), (0.0, 8.0)]);
        // From 0: node 1 is at 5, node 2 at 8
        assert_eq!(dm.nearest(0, &[2, 1], 3), vec![1, 2]);
        assert_eq!(dm.nearest(0, &[0, 1, 2], 1), vec![1]);
        assert!(dm.nearest(0, &[], 2).is_empty());
    }

    #[test]
    fn test_nearest_uses_directed_cost() {
        let dm = DistanceMatrix::from_rows(vec![
            vec![0.0, 9.0, 1.0],
            vec![1.0, 0.0, 1.0],
            vec![9.0, 1.0, 0.0],
        ])
        .expect("square");
        assert_eq!(dm.nearest(0, &[1, 2], 2), vec![2, 1]);
        // Into 0: node 1 costs 1, node 2 costs 9
        assert_eq!(dm.nearest_inbound(0, &[2, 1], 2), vec![1, 2]);
        assert_eq!(dm.nearest_inbound(0, &[0, 2, 1], 1), vec![1]);
    }

    #[test]
    fn test_reference_forwards() {
        let dm = DistanceMatrix::from_points(&[(0.0, 0.0), (3.0, 4.0)]);
        let by_ref = &dm;
        assert!((by_ref.cost(0, 1) - 5.0).abs() < 1e-10);
        assert!(by_ref.is_symmetric());
    }
}
