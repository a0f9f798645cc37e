//! Per-tour search memo.

use super::operator::Operator;

/// Local-optimum memo carried alongside a tour.
///
/// The flag-gated sweeps ([`Operator::TwoOptFirst`] and
/// [`Operator::ThreeOptFirst`]) set their flag after a full pass that left
/// the length unchanged, and skip all work while it is set.
///
/// The engine keeps the memo in step with the tour: a call that changes the
/// tour clears every flag except the one owned by the operator that ran.
/// Reset the state whenever the tour is modified outside the engine.
///
/// [`Operator::TwoOptFirst`]: super::Operator::TwoOptFirst
/// [`Operator::ThreeOptFirst`]: super::Operator::ThreeOptFirst
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchState {
    /// Last first-improvement 2-opt sweep found no improving reversal.
    pub two_opt_converged: bool,
    /// Last first-improvement 3-opt sweep found no improving reconnection.
    pub three_opt_converged: bool,
}

impl SearchState {
    /// Fresh state with no flag set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears every flag.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Clears the flags invalidated by a tour change made by `operator`.
    ///
    /// A sweep keeps its own flag, which it has already updated, and clears
    /// the other one. Any other operator clears both.
    pub fn record_change(&mut self, operator: Operator) {
        match operator {
            Operator::TwoOptFirst => self.three_opt_converged = false,
            Operator::ThreeOptFirst => self.two_opt_converged = false,
            _ => self.reset(),
        }
    }
}
