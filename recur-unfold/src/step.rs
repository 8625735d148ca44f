//! Reporting the progress of a derivation.

use recur_compute::symbolic::SymExpr;

/// A type that collects the steps of a derivation.
///
/// [`StepCollector`] is also implemented for the unit type `()`, which discards every step. Pass
/// a [`Vec<Step>`] to inspect how a recurrence was unfolded or a matrix was filled.
pub trait StepCollector<S> {
    /// Adds a step to the collector.
    fn push(&mut self, step: S);
}

impl<S> StepCollector<S> for () {
    #[inline]
    fn push(&mut self, _: S) {}
}

impl<S> StepCollector<S> for Vec<S> {
    #[inline]
    fn push(&mut self, step: S) {
        Vec::push(self, step);
    }
}

/// A step taken while unfolding a recurrence or filling a matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// A term was already in the terms cache.
    CacheHit {
        term: SymExpr,
        value: SymExpr,
    },

    /// A term was unfolded using the defining recurrence, and added to the terms cache.
    Unfolded {
        term: SymExpr,
        value: SymExpr,
    },

    /// A matrix entry was computed.
    CellFilled {
        row: usize,
        col: usize,
        value: SymExpr,
    },

    /// The terms of a row were expressed through the terms of the next row.
    LayerSolved {
        row: usize,
    },

    /// One round of substituting the terms cache into itself.
    CacheSubstituted {
        iteration: usize,
    },
}
