//! 2-opt segment reversal.
//!
//! # Algorithm
//!
//! Reversing positions `[i..=j]` replaces the edges `(i-1, i)` and
//! `(j, j+1)` with `(i-1, j)` and `(i, j+1)`. The resulting length is read
//! from [`Tour::reversed_segment_cost`] without touching the tour, so each
//! candidate costs O(1) on symmetric instances.
//!
//! - [`two_opt_best`] evaluates every pair and applies the single best
//!   reversal, or a random reversal when nothing improves.
//! - [`two_opt_first`] applies every improving reversal as it is found and
//!   records convergence in the [`SearchState`].
//!
//! # Complexity
//!
//! O(n²) per call.
//!
//! # Reference
//!
//! Croes, G.A. (1958). "A method for solving traveling salesman problems",
//! *Operations Research* 6(6), 791-812.

use log::debug;
use rand::Rng;

use crate::distance::DistanceOracle;
use crate::models::Tour;

use super::engine::{length_changed, pick, IMPROVEMENT_EPS};
use super::state::SearchState;

/// Best-improvement 2-opt.
///
/// Scans `i ∈ [1, n-1)`, `j ∈ [i+2, n-2)`. Ties keep the first pair found.
/// When nothing improves, reverses a random run of 2 to `n-2` visits; the
/// run `[1, n-1]` is never drawn since reversing it only mirrors the cycle.
/// Tours with fewer than 4 visits are left untouched.
pub(crate) fn two_opt_best<D, R>(tour: &mut Tour, distances: &D, rng: &mut R) -> bool
where
    D: DistanceOracle + ?Sized,
    R: Rng + ?Sized,
{
    let n = tour.len();
    if n < 4 {
        return false;
    }
    let entry = tour.length();

    let mut best: Option<(usize, usize)> = None;
    let mut best_length = entry - IMPROVEMENT_EPS;
    for i in 1..n {
        for j in (i + 2)..n.saturating_sub(2) {
            let candidate = tour.reversed_segment_cost(i, j, distances);
            if candidate < best_length {
                best_length = candidate;
                best = Some((i, j));
            }
        }
    }

    match best {
        Some((i, j)) => tour.reverse_segment(i, j, distances),
        None => {
            let i = pick(rng, 1, n - 2);
            let j = pick(rng, i + 1, if i == 1 { n - 2 } else { n - 1 });
            debug!("2-opt found no improving pair, reversing [{i}, {j}]");
            tour.reverse_segment(i, j, distances);
        }
    }

    length_changed(entry, tour.length())
}

/// First-improvement 2-opt sweep.
///
/// Scans `i ∈ [1, n-2)`, `j ∈ [i+2, n)` against the live tour and applies
/// each strictly improving reversal immediately. Does nothing while
/// `state.two_opt_converged` is set; sets it when a full sweep leaves the
/// length unchanged.
pub(crate) fn two_opt_first<D>(tour: &mut Tour, distances: &D, state: &mut SearchState) -> bool
where
    D: DistanceOracle + ?Sized,
{
    if state.two_opt_converged {
        debug!("2-opt sweep skipped: already converged");
        return false;
    }
    let n = tour.len();
    if n < 4 {
        return false;
    }
    let entry = tour.length();

    for i in 1..(n - 2) {
        for j in (i + 2)..n {
            let candidate = tour.reversed_segment_cost(i, j, distances);
            if candidate < tour.length() - IMPROVEMENT_EPS {
                tour.reverse_segment(i, j, distances);
            }
        }
    }

    let changed = length_changed(entry, tour.length());
    state.two_opt_converged = !changed;
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DistanceMatrix;

    /// Five nodes where consecutive ids (cyclically) are 1 apart and the
    /// chords 0-3 and 1-4 cost 5; every other pair costs 3.
    fn five_node_matrix() -> DistanceMatrix {
        let mut dm = DistanceMatrix::new(5);
        for a in 0..5 {
            for b in 0..5 {
                if a == b {
                    continue;
                }
                let gap = (a as i32 - b as i32).rem_euclid(5);
                let d = match (gap, a.min(b), a.max(b)) {
                    (1, _, _) | (4, _, _) => 1.0,
                    (_, 0, 3) | (_, 1, 4) => 5.0,
                    _ => 3.0,
                };
                dm.set(a, b, d);
            }
        }
        dm
    }

    #[test]
    fn test_best_finds_known_neighbor() {
        let dm = five_node_matrix();
        let mut tour = Tour::new(vec![0, 3, 2, 1, 4], &dm).expect("valid");
        // 0-3 (5) + 3-2 (1) + 2-1 (1) + 1-4 (5) + 4-0 (1)
        assert!((tour.length() - 13.0).abs() < 1e-10);

        let mut rng = u_numflow::random::create_rng(42);
        assert!(two_opt_best(&mut tour, &dm, &mut rng));
        assert_eq!(tour.nodes(), &[0, 1, 2, 3, 4]);
        assert!((tour.length() - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_best_needs_four_visits() {
        let dm = five_node_matrix();
        let mut tour = Tour::new(vec![0, 2, 1], &dm).expect("valid");
        let before = tour.clone();
        let mut rng = u_numflow::random::create_rng(42);
        assert!(!two_opt_best(&mut tour, &dm, &mut rng));
        assert_eq!(tour, before);
    }

    #[test]
    fn test_best_falls_back_to_random_reversal() {
        let dm = five_node_matrix();
        let mut rng = u_numflow::random::create_rng(42);
        let mut tour = Tour::new(vec![0, 1, 2, 3, 4], &dm).expect("valid");
        // Already optimal: the only pair (1, 3) cannot improve.
        two_opt_best(&mut tour, &dm, &mut rng);
        let mut nodes = tour.nodes().to_vec();
        nodes.sort();
        assert_eq!(nodes, vec![0, 1, 2, 3, 4]);
        assert_eq!(tour.node_at(0), 0);
        assert!((tour.length() - tour.recompute_length(&dm)).abs() < 1e-9);
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
            assert!(two_opt_best(&mut tour, &dm, &mut rng), "seed {seed}");
            assert_ne!(tour.nodes(), optimal.nodes());
            assert!(tour.length() > optimal.length());
        }
    }

    #[test]
    fn test_best_never_worsens_when_improvement_exists() {
        let points = [
            (0.0, 0.0),
            (4.0, 4.0),
            (4.0, 0.0),
            (0.0, 4.0),
            (2.0, 6.0),
            (6.0, 2.0),
            (1.0, 2.0),
            (5.0, 5.0),
        ];
        let dm = DistanceMatrix::from_points(&points);
        let mut rng = u_numflow::random::create_rng(1);
        let mut tour = Tour::new((0..8).collect(), &dm).expect("valid");
        let entry = tour.length();
        assert!(two_opt_best(&mut tour, &dm, &mut rng));
        assert!(tour.length() < entry);
    }

    #[test]
    fn test_first_converges_and_memoizes() {
        let points: Vec<(f64, f64)> = (0..10)
            .map(|k| ((k * 7 % 10) as f64, (k * 3 % 10) as f64))
            .collect();
        let dm = DistanceMatrix::from_points(&points);
        let mut tour = Tour::new((0..10).collect(), &dm).expect("valid");
        let mut state = SearchState::new();

        let mut calls = 0;
        while two_opt_first(&mut tour, &dm, &mut state) {
            calls += 1;
            assert!(calls < 1000, "2-opt sweep failed to converge");
        }
        assert!(state.two_opt_converged);
        let converged = tour.clone();
        assert!(!two_opt_first(&mut tour, &dm, &mut state));
        assert_eq!(tour, converged);
    }

    #[test]
    fn test_first_needs_four_visits() {
        let dm = five_node_matrix();
        let mut tour = Tour::new(vec![0, 2, 1], &dm).expect("valid");
        let mut state = SearchState::new();
        assert!(!two_opt_first(&mut tour, &dm, &mut state));
        assert!(!state.two_opt_converged);
    }
}
