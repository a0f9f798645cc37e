//! Tour chromosome for the GA runner.

use u_metaheur::ga::Individual;

use crate::models::Tour;
use crate::mutation::SearchState;

/// A GA individual: a tour, its search memo and its fitness.
///
/// The fitness is the tour length once evaluated. Lower is better.
///
/// # Examples
///
/// ```
/// use u_tourmut::distance::DistanceMatrix;
/// use u_tourmut::ga::TourChromosome;
/// use u_tourmut::models::Tour;
/// use u_metaheur::ga::Individual;
///
/// let dm = DistanceMatrix::from_points(&[(0.0, 0.0), (3.0, 4.0), (6.0, 0.0)]);
/// let chromosome = TourChromosome::new(Tour::new(vec![0, 1, 2], &dm).unwrap());
/// assert_eq!(chromosome.tour().nodes(), &[0, 1, 2]);
/// assert_eq!(chromosome.fitness(), f64::INFINITY);
/// ```
#[derive(Debug, Clone)]
pub struct TourChromosome {
    tour: Tour,
    state: SearchState,
    fitness: f64,
}

impl TourChromosome {
    /// Wraps a tour with a fresh search state and unevaluated fitness.
    pub fn new(tour: Tour) -> Self {
        Self {
            tour,
            state: SearchState::new(),
            fitness: f64::INFINITY,
        }
    }

    /// The tour.
    pub fn tour(&self) -> &Tour {
        &self.tour
    }

    /// The search memo carried with the tour.
    pub fn state(&self) -> &SearchState {
        &self.state
    }

    /// Tour and search memo, mutably, for running an operator.
    pub fn parts_mut(&mut self) -> (&mut Tour, &mut SearchState) {
        (&mut self.tour, &mut self.state)
    }

    /// Consumes the chromosome, returning the tour.
    pub fn into_tour(self) -> Tour {
        self.tour
    }
}

impl Individual for TourChromosome {
    type Fitness = f64;

    fn fitness(&self) -> f64 {
        self.fitness
    }

    fn set_fitness(&mut self, fitness: f64) {
        self.fitness = fitness;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DistanceMatrix;

    fn tour() -> Tour {
        let dm = DistanceMatrix::from_points(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        Tour::new(vec![0, 2, 1, 3], &dm).expect("valid")
    }

    #[test]
    fn test_new_is_unevaluated() {
        let chromosome = TourChromosome::new(tour());
        assert_eq!(chromosome.fitness(), f64::INFINITY);
        assert_eq!(chromosome.state(), &SearchState::new());
    }

    #[test]
    fn test_set_fitness() {
        let mut chromosome = TourChromosome::new(tour());
        chromosome.set_fitness(42.5);
        assert_eq!(chromosome.fitness(), 42.5);
    }

    #[test]
    fn test_parts_mut_updates_state() {
        let mut chromosome = TourChromosome::new(tour());
        let (_, state) = chromosome.parts_mut();
        state.two_opt_converged = true;
        assert!(chromosome.state().two_opt_converged);
        assert_eq!(chromosome.into_tour().nodes(), &[0, 2, 1, 3]);
    }
}
