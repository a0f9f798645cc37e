//! Greedy pairwise operators.
//!
//! - [`greedy_swap`] (GSM) tries random swaps until one improves.
//! - [`steepest_pairwise`] (SHMO) sweeps every `(i, j)` pair and tries a
//!   reversal, a single-visit relocation and a swap at each, keeping each
//!   sub-move only if it improves the live tour.

use log::trace;
use rand::Rng;

use crate::distance::DistanceOracle;
use crate::models::{Orientation, Tour};

use super::engine::{length_changed, pick, IMPROVEMENT_EPS};

/// Greedy swap: up to `n` random swaps `i < j`, stopping at the first one
/// that strictly shortens the tour.
///
/// Each attempt is costed without mutating, so rejected attempts leave the
/// tour untouched. Always reports changed.
pub(crate) fn greedy_swap<D, R>(tour: &mut Tour, distances: &D, rng: &mut R) -> bool
where
    D: DistanceOracle + ?Sized,
    R: Rng + ?Sized,
{
    let n = tour.len();
    if n < 3 {
        return false;
    }
    for attempt in 0..n {
        let i = pick(rng, 1, n - 2);
        let j = pick(rng, i + 1, n - 1);
        if tour.swapped_positions_cost(i, j, distances) < tour.length() - IMPROVEMENT_EPS {
            trace!("greedy swap accepted ({i}, {j}) on attempt {attempt}");
            tour.swap_positions(i, j, distances);
            break;
        }
    }
    true
}

/// Steepest pairwise sweep over `i ∈ [1, n-3)`, `j ∈ [i+2, n-1)`.
///
/// At each pair, in order:
///
/// 1. reverse `[i+1, j+1]` if that shortens the tour;
/// 2. move the visit at `j` to slot `i`, undoing unless it shortens;
/// 3. swap slots `i` and `j` if that shortens the tour.
///
/// Every test reads the tour as left by the previous one.
pub(crate) fn steepest_pairwise<D>(tour: &mut Tour, distances: &D) -> bool
where
    D: DistanceOracle + ?Sized,
{
    let n = tour.len();
    if n < 5 {
        return false;
    }
    let entry = tour.length();

    for i in 1..(n - 3) {
        for j in (i + 2)..(n - 1) {
            if tour.reversed_segment_cost(i + 1, j + 1, distances) < tour.length() - IMPROVEMENT_EPS {
                tour.reverse_segment(i + 1, j + 1, distances);
            }

            let before = tour.length();
            tour.relocate_segment(i, 0, j, 1, Orientation::Forward, distances);
            if tour.length() >= before - IMPROVEMENT_EPS {
                // The moved visit now sits at i; put it back after slot j.
                tour.relocate_segment(j + 1, 0, i, 1, Orientation::Forward, distances);
            }

            if tour.swapped_positions_cost(i, j, distances) < tour.length() - IMPROVEMENT_EPS {
                tour.swap_positions(i, j, distances);
            }
        }
    }

    length_changed(entry, tour.length())
}
