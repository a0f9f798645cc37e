//! GA problem definition for single-tour routing.
//!
//! Implements the [`GaProblem`](u_metaheur::ga::GaProblem) trait with the
//! tour itself as the chromosome. Node 0 is the anchor at position 0 of
//! every individual.
//!
//! # Operators
//!
//! - **Crossover**: Order crossover (OX) over positions `1..n`, anchor re-attached
//! - **Mutation**: one operator drawn uniformly from the configured schedule,
//!   run through the [`MutationEngine`]
//! - **Evaluation**: the cached tour length

use anyhow::{anyhow, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use u_metaheur::ga::operators::order_crossover;
use u_metaheur::ga::GaProblem;

use crate::distance::DistanceMatrix;
use crate::models::Tour;
use crate::mutation::{MutationConfig, MutationEngine};

use super::chromosome::TourChromosome;

/// GA problem for a closed tour over every node of a distance matrix.
///
/// # Examples
///
/// ```
/// use u_tourmut::distance::DistanceMatrix;
/// use u_tourmut::ga::TourGaProblem;
/// use u_tourmut::mutation::MutationConfig;
/// use u_metaheur::ga::{GaConfig, GaRunner};
///
/// let points: Vec<(f64, f64)> = (0..6).map(|k| (k as f64, (k % 2) as f64)).collect();
/// let dm = DistanceMatrix::from_points(&points);
///
/// let problem = TourGaProblem::new(dm, MutationConfig::default()).unwrap();
/// let config = GaConfig::default()
///     .with_population_size(20)
///     .with_max_generations(30);
///
/// let result = GaRunner::run(&problem, &config).expect("valid config");
/// assert!(result.best_fitness < f64::INFINITY);
/// assert_eq!(result.best.tour().node_at(0), 0);
/// ```
#[derive(Debug, Clone)]
pub struct TourGaProblem {
    distances: DistanceMatrix,
    config: MutationConfig,
}

impl TourGaProblem {
    /// Creates a problem over every node of `distances`.
    ///
    /// Fails if the matrix is empty or the config does not validate.
    pub fn new(distances: DistanceMatrix, config: MutationConfig) -> Result<Self> {
        if distances.size() == 0 {
            return Err(anyhow!("distance matrix must contain at least one node"));
        }
        config.validate().map_err(|e| anyhow!(e))?;
        Ok(Self { distances, config })
    }

    /// The distance matrix.
    pub fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }

    /// The mutation configuration.
    pub fn config(&self) -> &MutationConfig {
        &self.config
    }

    /// Engine bound to this problem's matrix.
    pub fn engine(&self) -> MutationEngine<'_, DistanceMatrix> {
        MutationEngine::from_config(&self.distances, &self.config)
    }

    fn anchored(&self, rest: impl IntoIterator<Item = usize>) -> TourChromosome {
        let mut nodes = vec![0];
        nodes.extend(rest);
        TourChromosome::new(Tour::from_permutation(nodes, &self.distances))
    }
}

impl GaProblem for TourGaProblem {
    type Individual = TourChromosome;

    fn create_individual<R: Rng>(&self, rng: &mut R) -> TourChromosome {
        let mut rest: Vec<usize> = (1..self.distances.size()).collect();
        rest.shuffle(rng);
        self.anchored(rest)
    }

    fn evaluate(&self, individual: &TourChromosome) -> f64 {
        individual.tour().length()
    }

    fn crossover<R: Rng>(
        &self,
        parent1: &TourChromosome,
        parent2: &TourChromosome,
        rng: &mut R,
    ) -> Vec<TourChromosome> {
        if self.distances.size() < 3 {
            return vec![
                self.anchored(parent1.tour().nodes()[1..].iter().copied()),
                self.anchored(parent2.tour().nodes()[1..].iter().copied()),
            ];
        }
        // OX expects a 0-indexed permutation; non-anchor nodes are 1..n.
        let p1: Vec<usize> = parent1.tour().nodes()[1..].iter().map(|&c| c - 1).collect();
        let p2: Vec<usize> = parent2.tour().nodes()[1..].iter().map(|&c| c - 1).collect();
        let (c1, c2) = order_crossover(&p1, &p2, rng);
        vec![
            self.anchored(c1.into_iter().map(|c| c + 1)),
            self.anchored(c2.into_iter().map(|c| c + 1)),
        ]
    }

    fn mutate<R: Rng>(&self, individual: &mut TourChromosome, rng: &mut R) {
        let schedule = &self.config.schedule;
        let Some(&operator) = schedule.get(rng.random_range(0..schedule.len().max(1))) else {
            return;
        };
        let (tour, state) = individual.parts_mut();
        self.engine().process_with(operator, tour, state, rng);
    }
}
