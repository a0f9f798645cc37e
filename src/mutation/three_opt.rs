//! 3-opt reconnection.
//!
//! # Algorithm
//!
//! Cutting the edges leaving positions `i < j < k` splits the tour into
//! `A = ..=i`, `B = i+1..=j`, `C = j+1..=k` and `D = k+1..`. Four
//! reconnections are evaluated:
//!
//! ```text
//! DoubleReversal      A - B' - C' - D
//! BlockSwap           A - C  - B  - D
//! ReversedSecondSwap  A - C' - B  - D
//! ReversedFirstSwap   A - C  - B' - D
//! ```
//!
//! The candidate length is the current length minus the three cut edges
//! plus the three new edges. A reversed block also flips the direction of
//! its interior edges, which matters for asymmetric costs; that part is
//! added through [`Tour::path_reversal_correction`].
//!
//! # Complexity
//!
//! [`three_opt_best`] samples 10 third cuts per `(i, j)`: O(n²).
//! [`three_opt_first`] is exhaustive: O(n³) evaluations.
//!
//! # Reference
//!
//! Lin, S. (1965). "Computer Solutions of the Traveling Salesman Problem",
//! *Bell System Technical Journal* 44(10), 2245-2269.

use log::debug;
use rand::Rng;

use crate::distance::DistanceOracle;
use crate::models::{Orientation, Tour};

use super::engine::{length_changed, pick, IMPROVEMENT_EPS};
use super::state::SearchState;

/// Third-cut samples per `(i, j)` pair in [`three_opt_best`].
const K_SAMPLES: usize = 10;

/// One of the four evaluated 3-opt reconnections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reconnection {
    DoubleReversal,
    BlockSwap,
    ReversedSecondSwap,
    ReversedFirstSwap,
}

const RECONNECTIONS: [Reconnection; 4] = [
    Reconnection::DoubleReversal,
    Reconnection::BlockSwap,
    Reconnection::ReversedSecondSwap,
    Reconnection::ReversedFirstSwap,
];

/// Resulting tour length for each reconnection, in [`RECONNECTIONS`] order.
fn candidate_lengths<D>(tour: &Tour, i: usize, j: usize, k: usize, distances: &D) -> [f64; 4]
where
    D: DistanceOracle + ?Sized,
{
    let d = |from: usize, to: usize| distances.cost(from, to);
    let a = tour.node_at(i);
    let a1 = tour.node_at(i + 1);
    let b = tour.node_at(j);
    let b1 = tour.node_at(j + 1);
    let c = tour.node_at(k);
    let c1 = tour.node_at(tour.next_position(k));

    let base = tour.length() - (d(a, a1) + d(b, b1) + d(c, c1));
    let flip_b = tour.path_reversal_correction(i + 1, j, distances);
    let flip_c = tour.path_reversal_correction(j + 1, k, distances);

    [
        base + d(a, b) + d(a1, c) + d(b1, c1) + flip_b + flip_c,
        base + d(a, b1) + d(c, a1) + d(b, c1),
        base + d(a, c) + d(b1, a1) + d(b, c1) + flip_c,
        base + d(a, b1) + d(c, b) + d(a1, c1) + flip_b,
    ]
}

/// Cheapest reconnection strictly below `threshold`.
fn best_reconnection<D>(
    tour: &Tour,
    i: usize,
    j: usize,
    k: usize,
    threshold: f64,
    distances: &D,
) -> Option<(Reconnection, f64)>
where
    D: DistanceOracle + ?Sized,
{
    let mut best = None;
    let mut best_length = threshold;
    for (case, length) in RECONNECTIONS
        .into_iter()
        .zip(candidate_lengths(tour, i, j, k, distances))
    {
        if length < best_length {
            best_length = length;
            best = Some((case, length));
        }
    }
    best
}

fn apply<D>(tour: &mut Tour, i: usize, j: usize, k: usize, case: Reconnection, distances: &D)
where
    D: DistanceOracle + ?Sized,
{
    let swap_blocks = |tour: &mut Tour| {
        tour.relocate_segment(i + 1, j - i, j + 1, k - j, Orientation::Forward, distances);
    };
    match case {
        Reconnection::DoubleReversal => {
            tour.reverse_segment(i + 1, j, distances);
            tour.reverse_segment(j + 1, k, distances);
        }
        Reconnection::BlockSwap => swap_blocks(tour),
        Reconnection::ReversedSecondSwap => {
            tour.reverse_segment(j + 1, k, distances);
            swap_blocks(tour);
        }
        Reconnection::ReversedFirstSwap => {
            tour.reverse_segment(i + 1, j, distances);
            swap_blocks(tour);
        }
    }
}

/// Best-improvement 3-opt with sampled third cut.
///
/// Scans `i ∈ [0, n-5)`, `j ∈ [i+2, n-3)` and samples `k ∈ [j+2, n-2]`
/// [`K_SAMPLES`] times per pair, keeping the globally cheapest
/// reconnection. Without an improving candidate a random triple and
/// reconnection are applied; both inner blocks then hold at least two
/// visits, so the order always changes. Tours with fewer than 6 visits are left
/// untouched.
pub(crate) fn three_opt_best<D, R>(tour: &mut Tour, distances: &D, rng: &mut R) -> bool
where
    D: DistanceOracle + ?Sized,
    R: Rng + ?Sized,
{
    let n = tour.len();
    if n < 6 {
        return false;
    }
    let entry = tour.length();

    let mut best: Option<(usize, usize, usize, Reconnection)> = None;
    let mut best_length = entry - IMPROVEMENT_EPS;
    for i in 0..(n - 5) {
        for j in (i + 2)..(n - 3) {
            for _ in 0..K_SAMPLES {
                let k = pick(rng, j + 2, n - 2);
                if let Some((case, length)) =
                    best_reconnection(tour, i, j, k, best_length, distances)
                {
                    best_length = length;
                    best = Some((i, j, k, case));
                }
            }
        }
    }

    let (i, j, k, case) = best.unwrap_or_else(|| {
        let i = pick(rng, 0, n - 6);
        let j = pick(rng, i + 2, n - 4);
        let k = pick(rng, j + 2, n - 2);
        let case = RECONNECTIONS[pick(rng, 0, RECONNECTIONS.len() - 1)];
        debug!("3-opt found no improving triple, applying {case:?} at ({i}, {j}, {k})");
        (i, j, k, case)
    });
    apply(tour, i, j, k, case, distances);

    length_changed(entry, tour.length())
}

/// First-improvement exhaustive 3-opt sweep.
///
/// Same `i, j` ranges as [`three_opt_best`] with every `k ∈ [j+2, n-2]`.
/// At each triple the cheapest improving reconnection is applied at once,
/// so later triples see the updated tour. Gated by
/// `state.three_opt_converged` like the 2-opt sweep.
pub(crate) fn three_opt_first<D>(tour: &mut Tour, distances: &D, state: &mut SearchState) -> bool
where
    D: DistanceOracle + ?Sized,
{
    if state.three_opt_converged {
        debug!("3-opt sweep skipped: already converged");
        return false;
    }
    let n = tour.len();
    if n < 6 {
        return false;
    }
    let entry = tour.length();

    for i in 0..(n - 5) {
        for j in (i + 2)..(n - 3) {
            for k in (j + 2)..=(n - 2) {
                let threshold = tour.length() - IMPROVEMENT_EPS;
                if let Some((case, _)) = best_reconnection(tour, i, j, k, threshold, distances) {
                    apply(tour, i, j, k, case, distances);
                }
            }
        }
    }

    let changed = length_changed(entry, tour.length());
    state.three_opt_converged = !changed;
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DistanceMatrix;

    fn scattered(n: usize) -> DistanceMatrix {
        let points: Vec<(f64, f64)> = (0..n)
            .map(|k| (((k * 5) % n) as f64 * 1.5, ((k * k + 3) % n) as f64))
            .collect();
        DistanceMatrix::from_points(&points)
    }

    fn asymmetric(n: usize) -> DistanceMatrix {
        let mut dm = DistanceMatrix::new(n);
        for a in 0..n {
            for b in 0..n {
                if a != b {
                    dm.set(a, b, ((a * 13 + b * 5) % 17) as f64 + 1.0);
                }
            }
        }
        dm
    }

    #[test]
    fn test_candidate_lengths_match_applied_moves() {
        for dm in [scattered(9), asymmetric(9)] {
            let base = Tour::new(vec![0, 5, 2, 7, 1, 8, 3, 6, 4], &dm).expect("valid");
            for (i, j, k) in [(0, 2, 4), (1, 3, 7), (0, 4, 7), (2, 5, 7)] {
                let predicted = candidate_lengths(&base, i, j, k, &dm);
                for (case, expected) in RECONNECTIONS.into_iter().zip(predicted) {
                    let mut tour = base.clone();
                    apply(&mut tour, i, j, k, case, &dm);
                    assert!(
                        (tour.recompute_length(&dm) - expected).abs() < 1e-9,
                        "{case:?} at ({i}, {j}, {k})"
                    );
                }
            }
        }
    }

    #[test]
    fn test_reconnection_layouts() {
        let dm = scattered(8);
        let base = Tour::new((0..8).collect(), &dm).expect("valid");
        let layouts = [
            (Reconnection::DoubleReversal, [0, 1, 3, 2, 6, 5, 4, 7]),
            (Reconnection::BlockSwap, [0, 1, 4, 5, 6, 2, 3, 7]),
            (Reconnection::ReversedSecondSwap, [0, 1, 6, 5, 4, 2, 3, 7]),
            (Reconnection::ReversedFirstSwap, [0, 1, 4, 5, 6, 3, 2, 7]),
        ];
        for (case, expected) in layouts {
            let mut tour = base.clone();
            apply(&mut tour, 1, 3, 6, case, &dm);
            assert_eq!(tour.nodes(), &expected, "{case:?}");
        }
    }

    #[test]
    fn test_best_needs_six_visits() {
        let dm = scattered(5);
        let mut tour = Tour::new(vec![0, 3, 1, 4, 2], &dm).expect("valid");
        let before = tour.clone();
        let mut rng = u_numflow::random::create_rng(42);
        assert!(!three_opt_best(&mut tour, &dm, &mut rng));
        assert_eq!(tour, before);
    }

    #[test]
    fn test_best_improves_scrambled_tour() {
        let dm = scattered(12);
        let mut rng = u_numflow::random::create_rng(42);
        let mut tour = Tour::new(vec![0, 6, 1, 7, 2, 8, 3, 9, 4, 10, 5, 11], &dm).expect("valid");
        let mut improved = false;
        for _ in 0..5 {
            let entry = tour.length();
            three_opt_best(&mut tour, &dm, &mut rng);
            improved |= tour.length() < entry;
            assert!((tour.length() - tour.recompute_length(&dm)).abs() < 1e-9);
        }
        assert!(improved);
        let mut nodes = tour.nodes().to_vec();
        nodes.sort();
        assert_eq!(nodes, (0..12).collect::<Vec<_>>());
    }

    #[test]
    fn test_first_converges_and_memoizes() {
        let dm = asymmetric(9);
        let mut tour = Tour::new((0..9).collect(), &dm).expect("valid");
        let mut state = SearchState::new();
        let mut sweeps = 0;
        while three_opt_first(&mut tour, &dm, &mut state) {
            sweeps += 1;
            assert!(sweeps < 1000, "3-opt sweep failed to converge");
        }
        assert!(state.three_opt_converged);
        let converged = tour.clone();
        assert!(!three_opt_first(&mut tour, &dm, &mut state));
        assert_eq!(tour, converged);
        assert!((tour.length() - tour.recompute_length(&dm)).abs() < 1e-9);
    }

    #[test]
    fn test_first_needs_six_visits() {
        let dm = scattered(5);
        let mut tour = Tour::new((0..5).collect(), &dm).expect("valid");
        let mut state = SearchState::new();
        assert!(!three_opt_first(&mut tour, &dm, &mut state));
        assert!(!state.three_opt_converged);
    }

    #[test]
    fn test_best_fallback_always_moves() {
        let points: Vec<(f64, f64)> = (0..9)
            .map(|k| {
                let theta = k as f64 * std::f64::consts::TAU / 9.0;
                (theta.cos() * 10.0, theta.sin() * 10.0)
            })
            .collect();
        let dm = DistanceMatrix::from_points(&points);
        let optimal = Tour::new((0..9).collect(), &dm).expect("valid");
        for seed in 0..32 {
            let mut rng = u_numflow::random::create_rng(seed);
            let mut tour = optimal.clone();
            assert!(three_opt_best(&mut tour, &dm, &mut rng), "seed {seed}");
            assert_ne!(tour.nodes(), optimal.nodes());
            assert!(tour.length() > optimal.length());
            assert!((tour.length() - tour.recompute_length(&dm)).abs() < 1e-9);
        }
    }
}
