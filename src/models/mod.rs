//! Candidate-solution types.
//!
//! A [`Tour`] is a closed walk over every node, stored as one contiguous
//! order with an inverse position index. [`Visit`] is a read-only view of one
//! slot, and [`Population`] gives population-aware operators read access to
//! other tours.

mod population;
mod tour;
mod visit;

pub use population::Population;
pub use tour::Tour;
pub use visit::{Orientation, Visit};
