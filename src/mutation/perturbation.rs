//! Random perturbation operators.
//!
//! These moves diversify rather than improve: apart from [`exchange`] and
//! [`scramble`], which report an actual length change, they always report
//! the tour as changed once a move has been applied.
//!
//! # References
//!
//! - Banzhaf (1990), "The Molecular Traveling Salesman" (EM)
//! - Syswerda (1991), "Schedule Optimization Using Genetic Algorithms" (SM)
//! - Holland (1975), *Adaptation in Natural and Artificial Systems* (SIM)
//! - Larrañaga et al. (1999), "Genetic Algorithms for the Travelling Salesman
//!   Problem: A Review of Representations and Operators" (DM, IVM, ISM)

use log::trace;
use rand::Rng;

use crate::distance::DistanceOracle;
use crate::models::{Orientation, Tour};

use super::engine::{length_changed, pick};

/// Exchange mutation: swaps two random non-anchor positions.
pub(crate) fn exchange<D, R>(tour: &mut Tour, distances: &D, rng: &mut R) -> bool
where
    D: DistanceOracle + ?Sized,
    R: Rng + ?Sized,
{
    let n = tour.len();
    if n < 2 {
        return false;
    }
    let before = tour.length();
    let i = pick(rng, 1, n - 1);
    let j = pick(rng, 1, n - 1);
    tour.swap_positions(i, j, distances);
    length_changed(before, tour.length())
}

/// Scramble mutation: shuffles the visits strictly between two distinct
/// random positions.
pub(crate) fn scramble<D, R>(tour: &mut Tour, distances: &D, rng: &mut R) -> bool
where
    D: DistanceOracle + ?Sized,
    R: Rng + ?Sized,
{
    let n = tour.len();
    if n < 3 {
        return false;
    }
    let before = tour.length();
    let (i1, i2) = loop {
        let i1 = pick(rng, 1, n - 1);
        let i2 = pick(rng, 1, n - 1);
        if i1 != i2 {
            break (i1, i2);
        }
    };
    tour.shuffle_between(i1, i2, rng, distances);
    length_changed(before, tour.length())
}

/// Simple inversion: reverses the segment between two random positions.
pub(crate) fn simple_inversion<D, R>(tour: &mut Tour, distances: &D, rng: &mut R) -> bool
where
    D: DistanceOracle + ?Sized,
    R: Rng + ?Sized,
{
    let n = tour.len();
    if n < 2 {
        return false;
    }
    let begin = pick(rng, 1, n - 1);
    let end = pick(rng, 1, n - 1);
    tour.reverse_segment(begin, end, distances);
    true
}

/// Displacement: lifts a random block `[begin, end]` and re-inserts it at a
/// different slot of the remaining sequence.
///
/// With [`Orientation::Reversed`] this is the inverted displacement (IVM).
pub(crate) fn displacement<D, R>(
    tour: &mut Tour,
    distances: &D,
    rng: &mut R,
    orientation: Orientation,
) -> bool
where
    D: DistanceOracle + ?Sized,
    R: Rng + ?Sized,
{
    let n = tour.len();
    if n < 4 {
        return false;
    }
    let begin = pick(rng, 1, n - 2);
    let end = pick(rng, begin + 1, (n - 1).min(begin + n - 3));
    let seg_len = end - begin + 1;
    let remaining = n - seg_len;

    // Slot in the remaining sequence; `begin` itself would put the block back.
    let mut slot = pick(rng, 1, remaining - 1);
    if slot >= begin {
        slot += 1;
    }
    let dest = if slot < begin { slot } else { slot + seg_len };

    trace!("displacement [{begin}, {end}] -> before slot {dest} ({orientation:?})");
    tour.relocate_segment(dest, 0, begin, seg_len, orientation, distances)
}

/// Insertion: moves one random visit to just after a later random visit.
pub(crate) fn insertion<D, R>(tour: &mut Tour, distances: &D, rng: &mut R) -> bool
where
    D: DistanceOracle + ?Sized,
    R: Rng + ?Sized,
{
    let n = tour.len();
    if n < 3 {
        return false;
    }
    let i = pick(rng, 1, n - 2);
    let j = pick(rng, i + 1, n - 1);
    trace!("insertion {i} -> after {j}");
    tour.relocate_segment(j + 1, 0, i, 1, Orientation::Forward, distances)
}

/// Double-bridge via two position swaps: `(i+1, k+1)` then `(j, l)` with
/// `j = i + 2` and `l = k + 2`.
pub(crate) fn double_bridge<D, R>(tour: &mut Tour, distances: &D, rng: &mut R) -> bool
where
    D: DistanceOracle + ?Sized,
    R: Rng + ?Sized,
{
    let n = tour.len();
    if n < 8 {
        return false;
    }
    let i = pick(rng, 1, n - 7);
    let j = i + 2;
    let k = pick(rng, j + 2, n - 3);
    let l = k + 2;
    trace!("double bridge i={i} j={j} k={k} l={l}");
    tour.swap_positions(i + 1, k + 1, distances);
    tour.swap_positions(j, l, distances);
    true
}

/// Double-bridge via one block exchange: picks `i < j < k < l` and swaps
/// the blocks `[i+1, j]` and `[k+1, l]`.
pub(crate) fn double_bridge_blocks<D, R>(tour: &mut Tour, distances: &D, rng: &mut R) -> bool
where
    D: DistanceOracle + ?Sized,
    R: Rng + ?Sized,
{
    let n = tour.len();
    if n < 8 {
        return false;
    }
    let i = pick(rng, 1, n - 7);
    let j = pick(rng, i + 1, n - 5);
    let k = pick(rng, j + 1, n - 3);
    let l = pick(rng, k + 1, n - 1);
    trace!("double bridge blocks i={i} j={j} k={k} l={l}");
    tour.relocate_segment(i + 1, j - i, k + 1, l - k, Orientation::Forward, distances)
}

/// Exchanges the fixed blocks `[2, 3]` and `[4, 5]`.
pub(crate) fn diagnostic<D>(tour: &mut Tour, distances: &D) -> bool
where
    D: DistanceOracle + ?Sized,
{
    if tour.len() < 6 {
        return false;
    }
    let moved = tour.visit_at_position(2);
    tour.relocate_segment(2, 2, 4, 2, Orientation::Forward, distances);
    log::debug!(
        "diagnostic relocation moved visit {} from slot 2 to slot {:?}",
        moved.id,
        tour.position_of(moved.id)
    );
    true
}
