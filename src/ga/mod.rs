//! Genetic algorithm bridge for tour mutation.
//!
//! - [`TourChromosome`] — A tour with its search memo and fitness
//! - [`TourGaProblem`] — [`GaProblem`](u_metaheur::ga::GaProblem) implementation
//!   that mutates through the [`MutationEngine`](crate::mutation::MutationEngine)

mod chromosome;
mod problem;

pub use chromosome::TourChromosome;
pub use problem::TourGaProblem;
