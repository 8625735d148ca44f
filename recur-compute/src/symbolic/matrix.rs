use crate::symbolic::{error::DimensionMismatch, expr::SymExpr};
use recur_parser::parser::fmt::Latex;
use std::{fmt, ops::{Index, IndexMut}};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A dense matrix of symbolic expressions, stored in row-major order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SymMatrix {
    rows: usize,
    cols: usize,
    entries: Vec<SymExpr>,
}

impl SymMatrix {
    /// Creates a matrix filled with zeros.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            entries: vec![SymExpr::zero(); rows * cols],
        }
    }

    /// Creates a matrix whose entry at `(r, c)` is `f(r, c)`.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> SymExpr) -> Self {
        let entries = (0..rows)
            .flat_map(|r| (0..cols).map(move |c| (r, c)))
            .map(|(r, c)| f(r, c))
            .collect();
        Self { rows, cols, entries }
    }

    /// The number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// The number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns the entry at `(r, c)`, or [`None`] if out of bounds.
    pub fn get(&self, r: usize, c: usize) -> Option<&SymExpr> {
        (r < self.rows && c < self.cols).then(|| &self.entries[r * self.cols + c])
    }

    /// Returns the entries of the given row.
    pub fn row(&self, r: usize) -> &[SymExpr] {
        &self.entries[r * self.cols..(r + 1) * self.cols]
    }

    /// Returns an iterator over the entries together with their positions, in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize), &SymExpr)> {
        let cols = self.cols;
        self.entries
            .iter()
            .enumerate()
            .map(move |(i, entry)| ((i / cols, i % cols), entry))
    }

    /// Applies the function to every entry.
    pub fn map(&self, mut f: impl FnMut(&SymExpr) -> SymExpr) -> Self {
        Self {
            rows: self.rows,
            cols: self.cols,
            entries: self.entries.iter().map(|entry| f(entry)).collect(),
        }
    }

    /// Substitutes simultaneously in every entry.
    pub fn subs(&self, pairs: &[(SymExpr, SymExpr)]) -> Self {
        self.map(|entry| entry.subs(pairs))
    }

    /// Expands every entry.
    pub fn expand(&self) -> Self {
        self.map(SymExpr::expand)
    }

    /// Multiplies every entry by the given factor, expanding the result.
    pub fn scale(&self, factor: &SymExpr) -> Self {
        self.map(|entry| (factor.clone() * entry.clone()).expand())
    }

    /// Adds two matrices entrywise, expanding the result.
    pub fn add(&self, other: &Self) -> Result<Self, DimensionMismatch> {
        if (self.rows, self.cols) != (other.rows, other.cols) {
            return Err(DimensionMismatch {
                lhs: (self.rows, self.cols),
                rhs: (other.rows, other.cols),
            });
        }

        Ok(Self {
            rows: self.rows,
            cols: self.cols,
            entries: self.entries
                .iter()
                .zip(&other.entries)
                .map(|(a, b)| (a.clone() + b.clone()).expand())
                .collect(),
        })
    }

    /// Returns true if every entry above the main diagonal is structurally zero.
    pub fn is_lower_triangular(&self) -> bool {
        self.iter().all(|((r, c), entry)| c <= r || entry.is_zero())
    }
}

impl Index<(usize, usize)> for SymMatrix {
    type Output = SymExpr;

    fn index(&self, (r, c): (usize, usize)) -> &Self::Output {
        assert!(r < self.rows && c < self.cols, "index ({}, {}) out of bounds", r, c);
        &self.entries[r * self.cols + c]
    }
}

impl IndexMut<(usize, usize)> for SymMatrix {
    fn index_mut(&mut self, (r, c): (usize, usize)) -> &mut Self::Output {
        assert!(r < self.rows && c < self.cols, "index ({}, {}) out of bounds", r, c);
        &mut self.entries[r * self.cols + c]
    }
}

impl fmt::Display for SymMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for r in 0..self.rows {
            if r > 0 {
                write!(f, "; ")?;
            }
            for (c, entry) in self.row(r).iter().enumerate() {
                if c > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", entry)?;
            }
        }
        write!(f, "]")
    }
}

impl Latex for SymMatrix {
    fn fmt_latex(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "\\left[\\begin{{array}}{{{}}}", "c".repeat(self.cols))?;
        for r in 0..self.rows {
            if r > 0 {
                write!(f, " \\\\ ")?;
            }
            for (c, entry) in self.row(r).iter().enumerate() {
                if c > 0 {
                    write!(f, " & ")?;
                }
                entry.fmt_latex(f)?;
            }
        }
        write!(f, "\\end{{array}}\\right]")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn build_and_index() {
        let mut m = SymMatrix::from_fn(2, 2, |r, c| SymExpr::int((r * 2 + c) as i64));
        assert_eq!(m[(1, 0)], SymExpr::int(2));
        m[(0, 1)] = SymExpr::zero();
        assert!(m.is_lower_triangular());
        assert_eq!(m.get(2, 0), None);
        assert_eq!(m.to_string(), "[0, 0; 2, 3]");
    }

    #[test]
    fn add_and_scale() {
        let x = SymExpr::symbol("x");
        let a = SymMatrix::from_fn(2, 2, |r, c| if c <= r { x.clone() } else { SymExpr::zero() });
        let sum = a.add(&a).unwrap();
        assert_eq!(sum, a.scale(&SymExpr::int(2)));
        assert_eq!(sum[(1, 1)], SymExpr::int(2) * x);
        assert!(a.add(&SymMatrix::zeros(3, 3)).is_err());
    }

    #[test]
    fn latex_array() {
        let m = SymMatrix::from_fn(2, 2, |r, c| if c <= r { SymExpr::one() } else { SymExpr::zero() });
        assert_eq!(m.to_latex(), "\\left[\\begin{array}{cc}1 & 0 \\\\ 1 & 1\\end{array}\\right]");
    }
}
