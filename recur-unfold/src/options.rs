use crate::location::FreeVarsLocation;
use recur_compute::symbolic::SymExpr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Options that control how a matrix is unfolded.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UnfoldOptions {
    /// The index variable of the recurrences that runs over the rows.
    ///
    /// The default value is `n`.
    pub row_symbol: SymExpr,

    /// The index variable of the recurrences that runs over the columns.
    ///
    /// The default value is `k`.
    pub col_symbol: SymExpr,

    /// How many columns longer each row of the triangle is than the one before.
    ///
    /// The default value is `1`.
    pub diagonal_col_offset: usize,

    /// The first row to unfold.
    ///
    /// The default value is `1`.
    pub row_start: usize,

    /// The first column to unfold in each row. The first cell of a row is filled by the
    /// Z-sequence when this is `0`, and by the A-sequence otherwise.
    ///
    /// The default value is `0`.
    pub col_start: usize,

    /// The rows below which the matrix is unfolded, or [`None`] for every row of the matrix.
    ///
    /// The default value is [`None`].
    pub unfolding_rows: Option<usize>,

    /// Where the free variables sit. Unfolded entries are collected with respect to them.
    ///
    /// The default value is [`FreeVarsLocation::ColumnZero`].
    pub location: FreeVarsLocation,

    /// Whether the last unfolded column of each row is chosen by [`FreeVarsLocation::end_column`]
    /// rather than being the last in-domain column.
    ///
    /// The default value is `false`.
    pub adjust_end: bool,
}

impl Default for UnfoldOptions {
    fn default() -> UnfoldOptions {
        UnfoldOptions {
            row_symbol: SymExpr::symbol("n"),
            col_symbol: SymExpr::symbol("k"),
            diagonal_col_offset: 1,
            row_start: 1,
            col_start: 0,
            unfolding_rows: None,
            location: FreeVarsLocation::default(),
            adjust_end: false,
        }
    }
}

impl UnfoldOptions {
    /// Set the row and column index variables. Returns an updated [`UnfoldOptions`] for chaining.
    pub fn symbols(mut self, row: SymExpr, col: SymExpr) -> Self {
        self.row_symbol = row;
        self.col_symbol = col;
        self
    }

    /// Set the diagonal column offset. Returns an updated [`UnfoldOptions`] for chaining.
    pub fn diagonal_col_offset(mut self, offset: usize) -> Self {
        self.diagonal_col_offset = offset;
        self
    }

    /// Set the first row and column to unfold. Returns an updated [`UnfoldOptions`] for chaining.
    pub fn start(mut self, row: usize, col: usize) -> Self {
        self.row_start = row;
        self.col_start = col;
        self
    }

    /// Set the number of rows to unfold. Returns an updated [`UnfoldOptions`] for chaining.
    pub fn unfolding_rows(mut self, rows: usize) -> Self {
        self.unfolding_rows = Some(rows);
        self
    }

    /// Set the location of the free variables. Returns an updated [`UnfoldOptions`] for
    /// chaining.
    pub fn location(mut self, location: FreeVarsLocation) -> Self {
        self.location = location;
        self
    }

    /// Set whether the end column follows the location of the free variables. Returns an updated
    /// [`UnfoldOptions`] for chaining.
    pub fn adjust_end(mut self, adjust_end: bool) -> Self {
        self.adjust_end = adjust_end;
        self
    }

    /// Returns the exclusive end column of row `r`.
    pub(crate) fn end_column(&self, r: usize) -> usize {
        let last_col = r * self.diagonal_col_offset;
        if self.adjust_end {
            self.location.end_column(last_col)
        } else {
            last_col + 1
        }
    }
}

/// Options for substituting the terms cache of a recurrence into itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FixpointOptions {
    /// The number of rounds after which substitution gives up.
    ///
    /// The default value is `64`.
    pub max_iterations: usize,
}

impl Default for FixpointOptions {
    fn default() -> FixpointOptions {
        FixpointOptions { max_iterations: 64 }
    }
}
