//! Tour mutation operators and their dispatcher.
//!
//! # Operators
//!
//! | Code | Operator | Kind |
//! |---|---|---|
//! | 0 | [`Operator::Exchange`] | random swap |
//! | 1 | [`Operator::Scramble`] | random shuffle |
//! | 2 | [`Operator::TwoOptBest`] | best-improvement 2-opt |
//! | 3 | [`Operator::TwoOptFirst`] | first-improvement 2-opt sweep |
//! | 4 | [`Operator::SimpleInversion`] | random reversal |
//! | 5 | [`Operator::ThreeOptBest`] | sampled best-improvement 3-opt |
//! | 6 | [`Operator::ThreeOptFirst`] | exhaustive first-improvement 3-opt |
//! | 7 | [`Operator::Displacement`] | block relocation |
//! | 8 | [`Operator::InvertedDisplacement`] | mirrored block relocation |
//! | 9 | [`Operator::Insertion`] | single relocation |
//! | 10 | [`Operator::GreedySwap`] | first improving random swap |
//! | 11 | [`Operator::DoubleBridge`] | double bridge by swaps |
//! | 12 | [`Operator::DoubleBridgeBlocks`] | double bridge by block exchange |
//! | 13 | [`Operator::SteepestPairwise`] | steepest pairwise sweep |
//! | 14 | [`Operator::Diagnostic`] | fixed block exchange |
//!
//! The population-aware neighbor join is run through
//! [`MutationEngine::neighbor_join`] rather than by code.

mod config;
mod engine;
mod greedy;
mod neighbor_join;
mod operator;
mod perturbation;
mod state;
mod three_opt;
mod two_opt;

pub use config::MutationConfig;
pub use engine::{MutationEngine, IMPROVEMENT_EPS};
pub use neighbor_join::NeighborJoinConfig;
pub use operator::Operator;
pub use state::SearchState;
