//! Score type for search.
//!
//! Centipawn scores with sentinel values for the alpha-beta bounds, mate
//! scores and draws. Mate scores are `±SCORE_MATE` offset by the node count
//! at which the mate was found, so within one search a mate discovered
//! earlier compares better than one discovered later.

use std::fmt;
use std::ops::{Add, Neg, Sub};

/// Search infinity; exceeds any score a search can produce.
pub const SCORE_INFINITY: i32 = 32000;
/// Checkmate magnitude.
pub const SCORE_MATE: i32 = 30000;
/// Draw score.
pub const SCORE_DRAW: i32 = 0;

// Any score beyond this is treated as a forced mate. The node-count offset
// keeps mate scores well above anything material evaluation can reach.
const SCORE_MATE_IN_MAX: i32 = SCORE_MATE - 10000;

/// A search score in centipawns.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct Score(pub i32);

impl Score {
    pub const DRAW: Score = Score(SCORE_DRAW);
    pub const INFINITY: Score = Score(SCORE_INFINITY);

    /// Create a new score from centipawns
    #[inline]
    pub const fn cp(centipawns: i32) -> Self {
        Score(centipawns)
    }

    /// Negative infinity (initial alpha / best-score seed)
    #[inline]
    pub const fn neg_infinity() -> Self {
        Score(-SCORE_INFINITY)
    }

    /// Get the raw centipawn value
    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Check if this is a winning mate score
    #[inline]
    pub const fn is_mate(self) -> bool {
        self.0 >= SCORE_MATE_IN_MAX
    }

    /// Check if this is a losing mate score
    #[inline]
    pub const fn is_mated(self) -> bool {
        self.0 <= -SCORE_MATE_IN_MAX
    }

    /// Check if this is any kind of mate score
    #[inline]
    pub const fn is_mate_score(self) -> bool {
        self.is_mate() || self.is_mated()
    }
}

impl Add for Score {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Score(self.0 + rhs.0)
    }
}

impl Sub for Score {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Score(self.0 - rhs.0)
    }
}

impl Neg for Score {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Score(-self.0)
    }
}

impl From<i32> for Score {
    #[inline]
    fn from(v: i32) -> Self {
        Score(v)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Score({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mate_detection() {
        let mate_soon = Score::cp(SCORE_MATE - 42);
        assert!(mate_soon.is_mate());
        assert!(!mate_soon.is_mated());

        let mated_soon = Score::cp(-SCORE_MATE + 42);
        assert!(mated_soon.is_mated());
        assert!(!mated_soon.is_mate());

        assert!(!Score::cp(900).is_mate_score());
        assert!(!Score::DRAW.is_mate_score());
    }

    #[test]
    fn test_negation_flips_bounds() {
        assert_eq!(-Score::INFINITY, Score::neg_infinity());
        assert_eq!(-(Score::cp(150) - Score::cp(50)), Score::cp(-100));
    }

    #[test]
    fn test_ordering() {
        assert!(Score::cp(SCORE_MATE - 10) > Score::cp(SCORE_MATE - 20));
        assert!(Score::neg_infinity() < Score::cp(-SCORE_MATE + 1));
    }
}
