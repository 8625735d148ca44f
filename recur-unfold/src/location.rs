//! Where the free variables of a factorization sit.

use crate::error::UnknownLocation;
use crate::matrix::MatrixSpec;
use recur_compute::symbolic::SymExpr;
use recur_error::Error;
use std::{collections::BTreeMap, fmt, str::FromStr};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The cells of the first `unfolding_rows` rows of a matrix that are kept as independent unknowns
/// when the matrix is factored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FreeVarsLocation {
    /// The cells `(r, 0)`.
    #[default]
    ColumnZero,

    /// The cells `(r, r)`.
    MainDiagonal,

    /// The cells `(unfolding_rows - 1, c)`, for `c < unfolding_rows`.
    LastButOneRow,
}

impl FreeVarsLocation {
    /// Returns the positions of the free variables.
    pub fn cells(self, unfolding_rows: usize) -> Vec<(usize, usize)> {
        match self {
            Self::ColumnZero => (0..unfolding_rows).map(|r| (r, 0)).collect(),
            Self::MainDiagonal => (0..unfolding_rows).map(|r| (r, r)).collect(),
            Self::LastButOneRow => match unfolding_rows.checked_sub(1) {
                Some(last) => (0..unfolding_rows).map(|c| (last, c)).collect(),
                None => Vec::new(),
            },
        }
    }

    /// Returns the free variables of the matrix: its distinct entries at [`Self::cells`].
    ///
    /// Cells holding a number (such as an initial value) or lying outside the matrix are not
    /// variables.
    pub fn free_variables(self, spec: &MatrixSpec, unfolding_rows: usize) -> Vec<SymExpr> {
        let mut variables = Vec::new();
        for (r, c) in self.cells(unfolding_rows) {
            let Some(entry) = spec.matrix.get(r, c) else {
                continue;
            };
            if entry.as_number().is_none() && !variables.contains(entry) {
                variables.push(entry.clone());
            }
        }
        variables
    }

    /// The column the bounded unfolding of the upper chunk starts at, or [`None`] if the upper
    /// chunk is inverted instead of unfolded.
    pub fn start_column(self) -> Option<usize> {
        match self {
            Self::ColumnZero => Some(1),
            Self::MainDiagonal => Some(0),
            Self::LastButOneRow => None,
        }
    }

    /// The exclusive end column of the bounded unfolding of a row whose last in-domain column is
    /// `last_col`. On the main diagonal, the diagonal cell itself is left free.
    pub fn end_column(self, last_col: usize) -> usize {
        match self {
            Self::ColumnZero | Self::LastButOneRow => last_col + 1,
            Self::MainDiagonal => last_col,
        }
    }

    /// Maps every free variable but the first one to its value in the fully unfolded matrix.
    pub fn dependencies(self, unfolded: &MatrixSpec, unfolding_rows: usize) -> BTreeMap<SymExpr, SymExpr> {
        let cells = match self {
            Self::ColumnZero | Self::MainDiagonal => self.cells(unfolding_rows).into_iter().skip(1).collect(),
            Self::LastButOneRow => self.cells(unfolding_rows),
        };

        cells
            .into_iter()
            .filter_map(|(r, c)| {
                let value = unfolded.matrix.get(r, c)?;
                Some((unfolded.family.apply(vec![SymExpr::int(r as i64), SymExpr::int(c as i64)]), value.clone()))
            })
            .collect()
    }
}

impl fmt::Display for FreeVarsLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ColumnZero => write!(f, "column-zero"),
            Self::MainDiagonal => write!(f, "diagonal"),
            Self::LastButOneRow => write!(f, "last-row"),
        }
    }
}

impl FromStr for FreeVarsLocation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "column-zero" | "column" => Ok(Self::ColumnZero),
            "diagonal" | "main-diagonal" => Ok(Self::MainDiagonal),
            "last-row" | "last-but-one-row" => Ok(Self::LastButOneRow),
            _ => Err(UnknownLocation { name: s.to_string() }.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use recur_compute::symbolic::Family;
    use super::*;

    fn t(r: i64, c: i64) -> SymExpr {
        SymExpr::indexed("T", vec![SymExpr::int(r), SymExpr::int(c)])
    }

    #[test]
    fn free_variables() {
        let spec = MatrixSpec::symbolic(4, 4, Family::Indexed("T".to_string()));
        assert_eq!(FreeVarsLocation::ColumnZero.free_variables(&spec, 3), vec![t(0, 0), t(1, 0), t(2, 0)]);
        assert_eq!(FreeVarsLocation::MainDiagonal.free_variables(&spec, 2), vec![t(0, 0), t(1, 1)]);
        assert_eq!(FreeVarsLocation::LastButOneRow.free_variables(&spec, 2), vec![t(1, 0), t(1, 1)]);
        assert!(FreeVarsLocation::LastButOneRow.free_variables(&spec, 0).is_empty());
    }

    #[test]
    fn numeric_cells_are_not_free() {
        let spec = MatrixSpec::symbolic(3, 3, Family::Indexed("T".to_string()))
            .with_inits(&[(t(0, 0), SymExpr::one())]);
        assert_eq!(FreeVarsLocation::ColumnZero.free_variables(&spec, 2), vec![t(1, 0)]);
    }

    #[test]
    fn bounds() {
        assert_eq!(FreeVarsLocation::ColumnZero.start_column(), Some(1));
        assert_eq!(FreeVarsLocation::MainDiagonal.start_column(), Some(0));
        assert_eq!(FreeVarsLocation::LastButOneRow.start_column(), None);
        assert_eq!(FreeVarsLocation::ColumnZero.end_column(3), 4);
        assert_eq!(FreeVarsLocation::MainDiagonal.end_column(3), 3);
    }

    #[test]
    fn parse() {
        assert_eq!("diagonal".parse::<FreeVarsLocation>().unwrap(), FreeVarsLocation::MainDiagonal);
        assert_eq!("last-row".parse::<FreeVarsLocation>().unwrap(), FreeVarsLocation::LastButOneRow);
        assert!("nowhere".parse::<FreeVarsLocation>().is_err());
        assert_eq!(FreeVarsLocation::ColumnZero.to_string(), "column-zero");
    }
}
