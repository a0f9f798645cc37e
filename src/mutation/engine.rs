//! Operator dispatch.

use log::debug;
use rand::Rng;

use crate::distance::DistanceOracle;
use crate::models::{Orientation, Population, Tour};

use super::config::MutationConfig;
use super::greedy;
use super::neighbor_join::{self, NeighborJoinConfig};
use super::operator::Operator;
use super::perturbation;
use super::state::SearchState;
use super::three_opt;
use super::two_opt;

/// Minimum length decrease that counts as an improvement.
///
/// A candidate improves iff `candidate < current - IMPROVEMENT_EPS`. Also
/// used to decide whether a call changed the tour length.
pub const IMPROVEMENT_EPS: f64 = 1e-10;

/// Returns `true` if the two lengths differ by more than [`IMPROVEMENT_EPS`].
pub(crate) fn length_changed(before: f64, after: f64) -> bool {
    (after - before).abs() > IMPROVEMENT_EPS
}

/// Uniform draw in `[lo, hi]`, both ends inclusive.
pub(crate) fn pick<R: Rng + ?Sized>(rng: &mut R, lo: usize, hi: usize) -> usize {
    rng.random_range(lo..=hi)
}

/// Runs one neighborhood move on a tour.
///
/// The engine borrows the distance oracle for its whole lifetime and holds
/// a default [`Operator`]; it keeps no other state between calls. Per-tour
/// memo lives in the [`SearchState`] passed with each call.
///
/// # Examples
///
/// ```
/// use u_tourmut::distance::DistanceMatrix;
/// use u_tourmut::models::Tour;
/// use u_tourmut::mutation::{MutationEngine, Operator, SearchState};
///
/// let dm = DistanceMatrix::from_points(&[
///     (0.0, 0.0), (2.0, 2.0), (2.0, 0.0), (0.0, 2.0), (1.0, 3.0),
/// ]);
/// let mut tour = Tour::new(vec![0, 1, 2, 3, 4], &dm).unwrap();
/// let mut state = SearchState::new();
/// let mut rng = rand::rng();
///
/// let engine = MutationEngine::new(&dm, Operator::TwoOptFirst);
/// let entry = tour.length();
/// while engine.process(&mut tour, &mut state, &mut rng) {}
/// assert!(tour.length() <= entry);
/// assert!(state.two_opt_converged);
/// ```
#[derive(Debug, Clone)]
pub struct MutationEngine<'a, D: DistanceOracle + ?Sized> {
    distances: &'a D,
    operator: Operator,
    neighbor_join: NeighborJoinConfig,
}

impl<'a, D: DistanceOracle + ?Sized> MutationEngine<'a, D> {
    /// Binds an oracle and a default operator.
    pub fn new(distances: &'a D, operator: Operator) -> Self {
        Self {
            distances,
            operator,
            neighbor_join: NeighborJoinConfig::default(),
        }
    }

    /// Binds an oracle and takes the operator and neighbor-join settings
    /// from a config.
    pub fn from_config(distances: &'a D, config: &MutationConfig) -> Self {
        Self {
            distances,
            operator: config.operator,
            neighbor_join: config.neighbor_join.clone(),
        }
    }

    /// Sets the neighbor-join parameters.
    pub fn with_neighbor_join(mut self, config: NeighborJoinConfig) -> Self {
        self.neighbor_join = config;
        self
    }

    /// The bound oracle.
    pub fn distances(&self) -> &'a D {
        self.distances
    }

    /// Default operator used by [`process`](Self::process).
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// Neighbor-join parameters.
    pub fn neighbor_join_config(&self) -> &NeighborJoinConfig {
        &self.neighbor_join
    }

    /// Runs the default operator. See [`process_with`](Self::process_with).
    pub fn process<R: Rng + ?Sized>(
        &self,
        tour: &mut Tour,
        state: &mut SearchState,
        rng: &mut R,
    ) -> bool {
        self.process_with(self.operator, tour, state, rng)
    }

    /// Runs one move (or one sweep) of `operator` on `tour`.
    ///
    /// Returns whether the move changed the tour. Improvement operators
    /// report an actual length change; SIM, ISM, GSM, DBM, DBM2 and the
    /// diagnostic report `true` whenever their size guard passes. Tours
    /// below an operator's minimum size are left untouched and report
    /// `false`.
    ///
    /// A call that reports a change updates `state` through
    /// [`SearchState::record_change`], so a sweep never trusts a flag set on
    /// an earlier tour.
    pub fn process_with<R: Rng + ?Sized>(
        &self,
        operator: Operator,
        tour: &mut Tour,
        state: &mut SearchState,
        rng: &mut R,
    ) -> bool {
        let d = self.distances;
        let entry = tour.length();
        let changed = match operator {
            Operator::Exchange => perturbation::exchange(tour, d, rng),
            Operator::Scramble => perturbation::scramble(tour, d, rng),
            Operator::TwoOptBest => two_opt::two_opt_best(tour, d, rng),
            Operator::TwoOptFirst => two_opt::two_opt_first(tour, d, state),
            Operator::SimpleInversion => perturbation::simple_inversion(tour, d, rng),
            Operator::ThreeOptBest => three_opt::three_opt_best(tour, d, rng),
            Operator::ThreeOptFirst => three_opt::three_opt_first(tour, d, state),
            Operator::Displacement => {
                perturbation::displacement(tour, d, rng, Orientation::Forward)
            }
            Operator::InvertedDisplacement => {
                perturbation::displacement(tour, d, rng, Orientation::Reversed)
            }
            Operator::Insertion => perturbation::insertion(tour, d, rng),
            Operator::GreedySwap => greedy::greedy_swap(tour, d, rng),
            Operator::DoubleBridge => perturbation::double_bridge(tour, d, rng),
            Operator::DoubleBridgeBlocks => perturbation::double_bridge_blocks(tour, d, rng),
            Operator::SteepestPairwise => greedy::steepest_pairwise(tour, d),
            Operator::Diagnostic => perturbation::diagnostic(tour, d),
        };
        if changed {
            state.record_change(operator);
        }
        debug!(
            "{operator}: length {entry:.4} -> {:.4} (changed: {changed})",
            tour.length()
        );
        changed
    }

    /// Runs the operator with numeric `code`.
    ///
    /// Unknown codes are a no-op returning `false`.
    pub fn process_code<R: Rng + ?Sized>(
        &self,
        code: u8,
        tour: &mut Tour,
        state: &mut SearchState,
        rng: &mut R,
    ) -> bool {
        match Operator::from_code(code) {
            Some(operator) => self.process_with(operator, tour, state, rng),
            None => {
                debug!("unknown operator code {code}, tour left untouched");
                false
            }
        }
    }

    /// Population-aware neighbor-join move.
    ///
    /// Runs the configured number of iterations; each one builds candidate
    /// tours around a visit and a partner drawn from `population` or from
    /// the nearest nodes, and keeps the shortest if it beats the current
    /// tour. Returns whether the length changed. Needs at least 4 visits.
    pub fn neighbor_join<P, R>(&self, tour: &mut Tour, population: &P, rng: &mut R) -> bool
    where
        P: Population + ?Sized,
        R: Rng + ?Sized,
    {
        let entry = tour.length();
        let changed =
            neighbor_join::neighbor_join(tour, self.distances, population, &self.neighbor_join, rng);
        debug!(
            "neighbor join: length {entry:.4} -> {:.4} (changed: {changed})",
            tour.length()
        );
        changed
    }
}
