//! Distance lookups between tour nodes.
//!
//! - [`DistanceOracle`] — read-only cost lookup consumed by tours and operators
//! - [`DistanceMatrix`] — dense, possibly asymmetric cost table

mod matrix;
mod oracle;

pub use matrix::DistanceMatrix;
pub use oracle::DistanceOracle;
