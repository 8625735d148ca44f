//! Symbolic matrices whose unknown entries are members of a family.

use crate::location::FreeVarsLocation;
use recur_compute::symbolic::{Family, SymExpr, SymMatrix};
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Substitutions of matrix entries, keyed by the member of the family they replace.
pub type Substitutions = BTreeMap<SymExpr, SymExpr>;

/// Returns the substitutions as pairs, ready for [`SymExpr::subs`].
pub fn as_pairs(substitutions: &Substitutions) -> Vec<(SymExpr, SymExpr)> {
    substitutions
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// A matrix together with the family its unknown entries are named after.
///
/// The entry at `(r, c)` of a freshly built matrix is the member `family[r, c]`; unfolding
/// replaces those members with expressions in the free variables.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MatrixSpec {
    /// The entries.
    pub matrix: SymMatrix,

    /// The family of the entries.
    pub family: Family,
}

impl MatrixSpec {
    /// Pairs a matrix with a family.
    pub fn new(matrix: SymMatrix, family: Family) -> Self {
        Self { matrix, family }
    }

    /// Builds a lower triangular `rows`-by-`cols` matrix whose entry at `(r, c)` is
    /// `family[r, c]`.
    pub fn symbolic(rows: usize, cols: usize, family: Family) -> Self {
        symbolic_matrix(rows, cols, family, &[], true, 1)
    }

    /// Replaces members of the family with initial values.
    pub fn with_inits(&self, inits: &[(SymExpr, SymExpr)]) -> Self {
        Self::new(self.matrix.subs(inits), self.family.clone())
    }

    /// Returns the member of the family at `(r, c)`.
    pub fn member(&self, r: usize, c: usize) -> SymExpr {
        self.family.apply(vec![SymExpr::int(r as i64), SymExpr::int(c as i64)])
    }

    /// Returns the free variables of the first `unfolding_rows` rows at the given location.
    pub fn free_variables(&self, unfolding_rows: usize, location: FreeVarsLocation) -> Vec<SymExpr> {
        location.free_variables(self, unfolding_rows)
    }

    /// Zeroes the entries `(r, c)` with `c >= r + column_offset`.
    pub fn make_lower_triangular(&self, column_offset: usize) -> Self {
        let mut matrix = self.matrix.clone();
        for r in 0..matrix.rows() {
            for c in (r + column_offset)..matrix.cols() {
                matrix[(r, c)] = SymExpr::zero();
            }
        }
        Self::new(matrix, self.family.clone())
    }

    /// Applies the substitutions to every entry, one after the other, in the order of their
    /// keys.
    pub fn apply_subs(&self, substitutions: &Substitutions) -> Self {
        let pairs = as_pairs(substitutions);
        Self::new(
            self.matrix.map(|entry| entry.subs_sequential(&pairs)),
            self.family.clone(),
        )
    }
}

/// Builds a matrix whose entry at `(r, c)` is `family[r, c]`.
///
/// Every row of a triangle with diagonal column offset `d` is `d` columns longer than the one
/// before, so the matrix has `1 + (cols - 1) * d` columns. When `lower` is set, the entries
/// `(r, c)` with `c > r * d` are zero. The initial values then replace their members of the
/// family.
pub fn symbolic_matrix(
    rows: usize,
    cols: usize,
    family: Family,
    inits: &[(SymExpr, SymExpr)],
    lower: bool,
    diagonal_col_offset: usize,
) -> MatrixSpec {
    let cols = 1 + cols.saturating_sub(1) * diagonal_col_offset;
    let matrix = SymMatrix::from_fn(rows, cols, |r, c| {
        if lower && r * diagonal_col_offset < c {
            SymExpr::zero()
        } else {
            family.apply(vec![SymExpr::int(r as i64), SymExpr::int(c as i64)])
        }
    });
    MatrixSpec::new(matrix.subs(inits), family)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn t() -> Family {
        Family::Indexed("T".to_string())
    }

    #[test]
    fn lower_triangular() {
        let spec = MatrixSpec::symbolic(3, 3, t());
        assert_eq!(spec.matrix.to_string(), "[T[0, 0], 0, 0; T[1, 0], T[1, 1], 0; T[2, 0], T[2, 1], T[2, 2]]");
        assert!(spec.matrix.is_lower_triangular());
    }

    #[test]
    fn diagonal_offset() {
        let spec = symbolic_matrix(3, 3, t(), &[], true, 2);
        assert_eq!(spec.matrix.cols(), 5);
        assert_eq!(spec.matrix[(1, 2)], spec.member(1, 2));
        assert_eq!(spec.matrix[(1, 3)], SymExpr::zero());
        assert_eq!(spec.matrix[(2, 4)], spec.member(2, 4));
    }

    #[test]
    fn inits_and_truncation() {
        let full = symbolic_matrix(3, 3, t(), &[], false, 1);
        assert_eq!(full.matrix[(0, 2)], full.member(0, 2));

        let spec = full
            .with_inits(&[(full.member(0, 0), SymExpr::one())])
            .make_lower_triangular(1);
        assert_eq!(spec.matrix[(0, 0)], SymExpr::one());
        assert_eq!(spec.matrix[(0, 2)], SymExpr::zero());
        assert_eq!(spec.matrix, MatrixSpec::symbolic(3, 3, t()).with_inits(&[(full.member(0, 0), SymExpr::one())]).matrix);
    }

    #[test]
    fn substitutions() {
        let spec = MatrixSpec::symbolic(2, 2, t());
        let subs = Substitutions::from([(spec.member(1, 1), spec.member(1, 0)), (spec.member(1, 0), SymExpr::int(3))]);
        // applied in key order: `T[1, 0]` first, then `T[1, 1]`
        let applied = spec.apply_subs(&subs);
        assert_eq!(applied.matrix[(1, 0)], SymExpr::int(3));
        assert_eq!(applied.matrix[(1, 1)], spec.member(1, 0));
    }
}
