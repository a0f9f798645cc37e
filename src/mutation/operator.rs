//! Operator codes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A neighborhood move the [`MutationEngine`](super::MutationEngine) can run.
///
/// Each operator has a stable numeric code (`0..=14`) used by callers that
/// schedule operators by integer. Serialized by variant name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    /// Exchange mutation (EM): swap two random positions.
    Exchange,
    /// Scramble mutation (SM): shuffle the visits between two random positions.
    Scramble,
    /// Best-improvement 2-opt with a random reversal fallback.
    TwoOptBest,
    /// First-improvement 2-opt sweep, skipped once converged.
    TwoOptFirst,
    /// Simple inversion mutation (SIM): reverse a random segment.
    SimpleInversion,
    /// Best-improvement 3-opt with sampled third cut and random fallback.
    ThreeOptBest,
    /// First-improvement exhaustive 3-opt sweep, skipped once converged.
    ThreeOptFirst,
    /// Displacement mutation (DM): move a random block elsewhere.
    Displacement,
    /// Inverted displacement mutation (IVM): move a random block, mirrored.
    InvertedDisplacement,
    /// Insertion mutation (ISM): move one visit to a later slot.
    Insertion,
    /// Greedy swap mutation (GSM): first improving random swap.
    GreedySwap,
    /// Double-bridge via two position swaps (DBM).
    DoubleBridge,
    /// Double-bridge via one block exchange (DBM2).
    DoubleBridgeBlocks,
    /// Steepest pairwise sweep (SHMO): reversal, single relocation and swap.
    SteepestPairwise,
    /// Fixed block exchange used to validate relocation.
    Diagnostic,
}

impl Operator {
    /// Every operator, ordered by code.
    pub const ALL: [Operator; 15] = [
        Operator::Exchange,
        Operator::Scramble,
        Operator::TwoOptBest,
        Operator::TwoOptFirst,
        Operator::SimpleInversion,
        Operator::ThreeOptBest,
        Operator::ThreeOptFirst,
        Operator::Displacement,
        Operator::InvertedDisplacement,
        Operator::Insertion,
        Operator::GreedySwap,
        Operator::DoubleBridge,
        Operator::DoubleBridgeBlocks,
        Operator::SteepestPairwise,
        Operator::Diagnostic,
    ];

    /// Every operator except [`Operator::Diagnostic`].
    pub const PRODUCTION: [Operator; 14] = [
        Operator::Exchange,
        Operator::Scramble,
        Operator::TwoOptBest,
        Operator::TwoOptFirst,
        Operator::SimpleInversion,
        Operator::ThreeOptBest,
        Operator::ThreeOptFirst,
        Operator::Displacement,
        Operator::InvertedDisplacement,
        Operator::Insertion,
        Operator::GreedySwap,
        Operator::DoubleBridge,
        Operator::DoubleBridgeBlocks,
        Operator::SteepestPairwise,
    ];

    /// Numeric code of this operator.
    pub fn code(self) -> u8 {
        match self {
            Operator::Exchange => 0,
            Operator::Scramble => 1,
            Operator::TwoOptBest => 2,
            Operator::TwoOptFirst => 3,
            Operator::SimpleInversion => 4,
            Operator::ThreeOptBest => 5,
            Operator::ThreeOptFirst => 6,
            Operator::Displacement => 7,
            Operator::InvertedDisplacement => 8,
            Operator::Insertion => 9,
            Operator::GreedySwap => 10,
            Operator::DoubleBridge => 11,
            Operator::DoubleBridgeBlocks => 12,
            Operator::SteepestPairwise => 13,
            Operator::Diagnostic => 14,
        }
    }

    /// Operator for a numeric code, or `None` for unknown codes.
    ///
    /// ```
    /// use u_tourmut::mutation::Operator;
    ///
    /// assert_eq!(Operator::from_code(2), Some(Operator::TwoOptBest));
    /// assert_eq!(Operator::from_code(15), None);
    /// ```
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    /// Short conventional name (`"EM"`, `"2-opt"`, ...).
    pub fn abbreviation(self) -> &'static str {
        match self {
            Operator::Exchange => "EM",
            Operator::Scramble => "SM",
            Operator::TwoOptBest => "2-opt",
            Operator::TwoOptFirst => "2-opt(first)",
            Operator::SimpleInversion => "SIM",
            Operator::ThreeOptBest => "3-opt",
            Operator::ThreeOptFirst => "3-opt(first)",
            Operator::Displacement => "DM",
            Operator::InvertedDisplacement => "IVM",
            Operator::Insertion => "ISM",
            Operator::GreedySwap => "GSM",
            Operator::DoubleBridge => "DBM",
            Operator::DoubleBridgeBlocks => "DBM2",
            Operator::SteepestPairwise => "SHMO",
            Operator::Diagnostic => "TEST",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}
