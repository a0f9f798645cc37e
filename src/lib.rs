//! # u-tourmut
//!
//! Mutation and local-search operators for single closed tours (TSP), with
//! a bridge into the `u-metaheur` genetic algorithm.
//!
//! ## Modules
//!
//! - [`distance`] — Cost lookup trait and dense distance matrix
//! - [`models`] — Tour with cached length, visit view, population access
//! - [`mutation`] — Operator codes, dispatcher, k-opt and perturbation moves
//! - [`ga`] — Tour chromosome and GA problem for `u_metaheur::ga::GaRunner`

pub mod distance;
pub mod ga;
pub mod models;
pub mod mutation;
