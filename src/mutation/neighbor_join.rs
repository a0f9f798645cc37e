//! Population-aware neighbor join.
//!
//! # Algorithm
//!
//! Each iteration picks a visit `c` and a partner `c'` that should become
//! its neighbor. The partner is the successor of `c` in a random member of
//! the population with probability `population_probability`, otherwise one
//! of the `max_neighbors` nodes with the cheapest cost into `c`. Pairs that are already
//! adjacent, or where `c'` is the anchor, are skipped.
//!
//! Three candidate tours are built from clones:
//!
//! - **A**: reverse the path so `c'` lands next to `c`, which stays put.
//! - **B**: reverse the path so `c` lands next to `c'`, which stays put.
//! - **C**: among every swap of a visit between `c` and `c'` with a visit
//!   outside that range, find the one with the largest resulting length and
//!   move the outer run holding that visit to just after the inner one.
//!
//! The shortest candidate replaces the tour only if it is strictly shorter.
//! Candidates are built on clones, so a rejected candidate leaves the
//! input tour as it was.

use log::trace;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::distance::DistanceOracle;
use crate::models::{Orientation, Population, Tour};

use super::engine::{length_changed, pick, IMPROVEMENT_EPS};

/// Parameters of the neighbor-join move.
///
/// # Examples
///
/// ```
/// use u_tourmut::mutation::NeighborJoinConfig;
///
/// let config = NeighborJoinConfig::default()
///     .with_iterations(10)
///     .with_population_probability(0.8);
/// assert_eq!(config.max_neighbors, 3);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NeighborJoinConfig {
    /// Join attempts per call.
    pub iterations: usize,

    /// Probability of taking the partner from a population member rather
    /// than from the nearest nodes (0.0–1.0).
    pub population_probability: f64,

    /// Size of the nearest-node pool the partner is drawn from.
    pub max_neighbors: usize,
}

impl Default for NeighborJoinConfig {
    fn default() -> Self {
        Self {
            iterations: 5,
            population_probability: 0.5,
            max_neighbors: 3,
        }
    }
}

impl NeighborJoinConfig {
    /// Default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of join attempts per call.
    pub fn with_iterations(mut self, n: usize) -> Self {
        self.iterations = n;
        self
    }

    /// Sets the population sampling probability.
    pub fn with_population_probability(mut self, p: f64) -> Self {
        self.population_probability = p.clamp(0.0, 1.0);
        self
    }

    /// Sets the nearest-node pool size.
    pub fn with_max_neighbors(mut self, k: usize) -> Self {
        self.max_neighbors = k;
        self
    }

    /// Validates the configuration.
    ///
    /// Returns `Err` with a description if any parameter is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.iterations == 0 {
            return Err("iterations must be at least 1".into());
        }
        if !(0.0..=1.0).contains(&self.population_probability) {
            return Err("population_probability must be in [0, 1]".into());
        }
        if self.max_neighbors == 0 {
            return Err("max_neighbors must be at least 1".into());
        }
        Ok(())
    }
}

pub(crate) fn neighbor_join<D, P, R>(
    tour: &mut Tour,
    distances: &D,
    population: &P,
    config: &NeighborJoinConfig,
    rng: &mut R,
) -> bool
where
    D: DistanceOracle + ?Sized,
    P: Population + ?Sized,
    R: Rng + ?Sized,
{
    let n = tour.len();
    if n < 4 {
        return false;
    }
    let entry = tour.length();

    for iteration in 0..config.iterations {
        let c_pos = pick(rng, 1, n - 1);
        let Some(partner) = choose_partner(tour, c_pos, distances, population, config, rng) else {
            continue;
        };
        let Some(p_pos) = tour.position_of(partner) else {
            continue;
        };
        if p_pos == c_pos || p_pos == 0 || tour.are_adjacent(c_pos, p_pos) {
            trace!("neighbor join {iteration}: skipped pair ({c_pos}, {p_pos})");
            continue;
        }

        let mut best: Option<Tour> = None;
        let mut best_length = tour.length() - IMPROVEMENT_EPS;
        let options = [
            Some(reverse_toward(tour, c_pos, p_pos, distances)),
            Some(reverse_toward(tour, p_pos, c_pos, distances)),
            greedy_insertion(tour, c_pos, p_pos, distances),
        ];
        for option in options.into_iter().flatten() {
            if option.length() < best_length {
                best_length = option.length();
                best = Some(option);
            }
        }
        if let Some(better) = best {
            trace!(
                "neighbor join {iteration}: joined ({c_pos}, {p_pos}), length {:.4}",
                better.length()
            );
            *tour = better;
        }
    }

    length_changed(entry, tour.length())
}

/// Partner node for the visit at `c_pos`.
fn choose_partner<D, P, R>(
    tour: &Tour,
    c_pos: usize,
    distances: &D,
    population: &P,
    config: &NeighborJoinConfig,
    rng: &mut R,
) -> Option<usize>
where
    D: DistanceOracle + ?Sized,
    P: Population + ?Sized,
    R: Rng + ?Sized,
{
    let c = tour.node_at(c_pos);
    if !population.is_empty() && rng.random_bool(config.population_probability.clamp(0.0, 1.0)) {
        let member = population.member(pick(rng, 0, population.len() - 1));
        if let Some(pos) = member.position_of(c) {
            return Some(member.node_at(member.next_position(pos)));
        }
    }

    let candidates = &tour.nodes()[1..];
    let nearest = distances.nearest_inbound(c, candidates, config.max_neighbors);
    if nearest.is_empty() {
        return None;
    }
    Some(nearest[pick(rng, 0, nearest.len() - 1)])
}

/// Clone with the path between the two positions reversed so that the visit
/// at `moving` ends up next to the visit at `fixed`.
fn reverse_toward<D>(tour: &Tour, fixed: usize, moving: usize, distances: &D) -> Tour
where
    D: DistanceOracle + ?Sized,
{
    let mut option = tour.clone();
    if fixed < moving {
        option.reverse_segment(fixed + 1, moving, distances);
    } else {
        option.reverse_segment(moving, fixed - 1, distances);
    }
    option
}

/// Clone built by the swap-scored relocation, or `None` when the range
/// between the two positions leaves no outer visit.
fn greedy_insertion<D>(tour: &Tour, a: usize, b: usize, distances: &D) -> Option<Tour>
where
    D: DistanceOracle + ?Sized,
{
    let n = tour.len();
    let (lo, hi) = (a.min(b), a.max(b));
    let outer = (1..lo).chain((hi + 1)..n);

    let mut winner: Option<(usize, usize)> = None;
    let mut winner_length = f64::NEG_INFINITY;
    for s in outer {
        for r in lo..=hi {
            let length = tour.swapped_positions_cost(r, s, distances);
            if length > winner_length {
                winner_length = length;
                winner = Some((r, s));
            }
        }
    }
    let (r, s) = winner?;

    let mut option = tour.clone();
    if s < lo {
        option.relocate_segment(r + 1, 0, 1, lo - 1, Orientation::Forward, distances);
    } else {
        option.relocate_segment(r + 1, 0, hi + 1, n - hi - 1, Orientation::Forward, distances);
    }
    Some(option)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DistanceMatrix;

    fn ring(n: usize) -> DistanceMatrix {
        let points: Vec<(f64, f64)> = (0..n)
            .map(|k| {
                let theta = k as f64 * std::f64::consts::TAU / n as f64;
                (theta.cos() * 10.0, theta.sin() * 10.0)
            })
            .collect();
        DistanceMatrix::from_points(&points)
    }

    fn sorted(tour: &Tour) -> Vec<usize> {
        let mut nodes = tour.nodes().to_vec();
        nodes.sort();
        nodes
    }

    #[test]
    fn test_config_validate() {
        assert!(NeighborJoinConfig::default().validate().is_ok());
        assert!(NeighborJoinConfig::new().with_iterations(0).validate().is_err());
        assert!(NeighborJoinConfig::new().with_max_neighbors(0).validate().is_err());
        let bad = NeighborJoinConfig {
            population_probability: 1.5,
            ..NeighborJoinConfig::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_config_serde_defaults() {
        let config: NeighborJoinConfig =
            serde_json::from_str(r#"{ "iterations": 12 }"#).expect("valid json");
        assert_eq!(config.iterations, 12);
        assert_eq!(config.max_neighbors, 3);
        assert!((config.population_probability - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_reverse_toward_makes_pair_adjacent() {
        let dm = ring(8);
        let tour = Tour::new((0..8).collect(), &dm).expect("valid");
        for (fixed, moving) in [(2, 6), (6, 2), (1, 7), (5, 1)] {
            let option = reverse_toward(&tour, fixed, moving, &dm);
            let a = option.position_of(tour.node_at(fixed)).expect("present");
            let b = option.position_of(tour.node_at(moving)).expect("present");
            assert!(option.are_adjacent(a, b), "({fixed}, {moving})");
            assert_eq!(a, fixed, "fixed visit moved");
            assert!((option.length() - option.recompute_length(&dm)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_greedy_insertion_moves_outer_run() {
        let dm = ring(8);
        let tour = Tour::new((0..8).collect(), &dm).expect("valid");
        let option = greedy_insertion(&tour, 3, 5, &dm).expect("outer visits exist");
        assert_eq!(sorted(&option), (0..8).collect::<Vec<_>>());
        assert_eq!(option.node_at(0), 0);
        assert!((option.length() - option.recompute_length(&dm)).abs() < 1e-9);

        // Range [1, 7] covers every non-anchor slot.
        assert!(greedy_insertion(&tour, 1, 7, &dm).is_none());
    }

    #[test]
    fn test_never_worsens() {
        let dm = ring(10);
        let population = vec![
            Tour::new((0..10).collect(), &dm).expect("valid"),
            Tour::new(vec![0, 9, 8, 7, 6, 5, 4, 3, 2, 1], &dm).expect("valid"),
        ];
        let config = NeighborJoinConfig::default().with_iterations(20);
        let mut rng = u_numflow::random::create_rng(21);
        let mut tour = Tour::new(vec![0, 5, 2, 8, 1, 9, 3, 6, 4, 7], &dm).expect("valid");
        for _ in 0..10 {
            let entry = tour.length();
            let changed = neighbor_join(&mut tour, &dm, &population, &config, &mut rng);
            assert!(tour.length() <= entry);
            assert_eq!(changed, tour.length() < entry - IMPROVEMENT_EPS);
            assert_eq!(sorted(&tour), (0..10).collect::<Vec<_>>());
            assert_eq!(tour.node_at(0), 0);
            assert!((tour.length() - tour.recompute_length(&dm)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_improves_with_population_guidance() {
        let dm = ring(12);
        let population = vec![Tour::new((0..12).collect(), &dm).expect("valid")];
        let config = NeighborJoinConfig::default()
            .with_iterations(50)
            .with_population_probability(1.0);
        let mut rng = u_numflow::random::create_rng(4);
        let mut tour =
            Tour::new(vec![0, 6, 3, 9, 1, 7, 4, 10, 2, 8, 5, 11], &dm).expect("valid");
        let entry = tour.length();
        assert!(neighbor_join(&mut tour, &dm, &population, &config, &mut rng));
        assert!(tour.length() < entry);
    }

    #[test]
    fn test_empty_population_uses_nearest() {
        let dm = ring(9);
        let population: Vec<Tour> = Vec::new();
        let config = NeighborJoinConfig::default()
            .with_iterations(30)
            .with_population_probability(1.0);
        let mut rng = u_numflow::random::create_rng(2);
        let mut tour = Tour::new(vec![0, 4, 8, 3, 7, 2, 6, 1, 5], &dm).expect("valid");
        let entry = tour.length();
        neighbor_join(&mut tour, &dm, &population, &config, &mut rng);
        assert!(tour.length() <= entry);
        assert_eq!(sorted(&tour), (0..9).collect::<Vec<_>>());
    }

    #[test]
    fn test_nearest_partner_ranks_cost_into_visit() {
        let mut dm = DistanceMatrix::new(5);
        for a in 0..5 {
            for b in 0..5 {
                if a != b {
                    dm.set(a, b, 9.0);
                }
            }
        }
        dm.set(2, 4, 1.0);
        dm.set(3, 2, 1.0);
        let tour = Tour::new((0..5).collect(), &dm).expect("valid");
        let population: Vec<Tour> = Vec::new();
        let config = NeighborJoinConfig::default().with_max_neighbors(1);
        let mut rng = u_numflow::random::create_rng(2);
        for _ in 0..8 {
            assert_eq!(
                choose_partner(&tour, 2, &dm, &population, &config, &mut rng),
                Some(3)
            );
        }
    }

    #[test]
    fn test_small_tour_is_noop() {
        let dm = ring(3);
        let population: Vec<Tour> = Vec::new();
        let mut rng = u_numflow::random::create_rng(2);
        let mut tour = Tour::new(vec![0, 2, 1], &dm).expect("valid");
        let before = tour.clone();
        assert!(!neighbor_join(
            &mut tour,
            &dm,
            &population,
            &NeighborJoinConfig::default(),
            &mut rng
        ));
        assert_eq!(tour, before);
    }
}
