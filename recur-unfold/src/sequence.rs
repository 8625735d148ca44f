//! The A-sequence and Z-sequence roles of a doubly-indexed recurrence.
//!
//! A triangle is usually defined piecewise: one recurrence for the entries of column zero, and
//! another one for every other entry. The first plays the role of the **Z-sequence**, the second
//! the role of the **A-sequence**. Both are instantiated at a concrete `(row, col)` position by
//! solving the subscripts of their left-hand side for the index variables.

use crate::destructure::destructure;
use crate::error::{BoundaryColumn, MalformedRecurrence};
use recur_compute::symbolic::{solve_linear, Equation, Family, SymExpr};
use recur_error::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The role a recurrence plays in the definition of a triangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SequenceKind {
    /// Defines the entries of every column but the first.
    A,

    /// Defines the entries of column zero.
    Z,
}

/// A recurrence in one of the two roles.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Sequence {
    /// The role of the recurrence.
    pub kind: SequenceKind,

    /// The recurrence, whose left-hand side is a member of `family` with a row and a column
    /// subscript.
    pub rec: Equation,

    /// The family defined by the recurrence.
    pub family: Family,
}

impl Sequence {
    /// Creates an A-sequence.
    pub fn a(rec: Equation, family: Family) -> Self {
        Self { kind: SequenceKind::A, rec, family }
    }

    /// Creates a Z-sequence.
    pub fn z(rec: Equation, family: Family) -> Self {
        Self { kind: SequenceKind::Z, rec, family }
    }

    /// Returns the row and column subscripts of the left-hand side.
    fn lhs_subscripts(&self) -> Result<(SymExpr, SymExpr), Error> {
        let malformed = |reason: &str| MalformedRecurrence {
            equation: self.rec.to_string(),
            reason: reason.to_string(),
        };

        let (_, subscripts) = destructure(&self.rec.lhs, &self.family, &[])
            .map_err(|_| malformed("the left-hand side must be a single term of the family"))?;
        match <[SymExpr; 2]>::try_from(subscripts) {
            Ok([row, col]) => Ok((row, col)),
            Err(_) => Err(malformed("the left-hand side must have a row and a column subscript").into()),
        }
    }

    /// Instantiates the recurrence so that its left-hand side lands on `(r, c)`.
    ///
    /// `row` and `col` pair the index variables with the target row and column. The subscripts of
    /// the left-hand side are solved for the index variables, so a left-hand side `T[n + 1, k + 1]`
    /// instantiated at `(5, 3)` substitutes `n = 4` and `k = 2`.
    ///
    /// A Z-sequence only solves the row subscript, and requires both the target column and the
    /// column subscript of its left-hand side to be zero. An A-sequence substitutes the row and
    /// column solutions simultaneously.
    pub fn instantiate(&self, row: (&SymExpr, i64), col: (&SymExpr, i64)) -> Result<Equation, Error> {
        let (row_sym, r) = row;
        let (col_sym, c) = col;
        let (row_index, col_index) = self.lhs_subscripts()?;

        match self.kind {
            SequenceKind::Z => {
                if c != 0 || !col_index.is_zero_expanded() {
                    return Err(BoundaryColumn {
                        col: c,
                        lhs_col: col_index.to_string(),
                    }.into());
                }

                let row_sol = solve_linear(&row_index, &SymExpr::int(r), row_sym)?;
                Ok(self.rec.subs(&[(row_sym.clone(), row_sol)]))
            },
            SequenceKind::A => {
                let row_sol = solve_linear(&row_index, &SymExpr::int(r), row_sym)?;
                let col_sol = solve_linear(&col_index, &SymExpr::int(c), col_sym)?;
                Ok(self.rec.subs(&[(row_sym.clone(), row_sol), (col_sym.clone(), col_sol)]))
            },
        }
    }
}

/// The pair of sequences defining a triangle.
///
/// Without a distinct Z-sequence, the A-sequence defines column zero as well.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Sequences {
    /// The A-sequence.
    pub a: Sequence,

    /// The Z-sequence, if column zero has its own recurrence.
    pub z: Option<Sequence>,
}

impl Sequences {
    /// Builds the sequences from the recurrence of the inner entries and, optionally, the
    /// recurrence of column zero.
    pub fn new(family: Family, a_rec: Equation, z_rec: Option<Equation>) -> Self {
        Self {
            a: Sequence::a(a_rec, family.clone()),
            z: z_rec.map(|rec| Sequence::z(rec, family)),
        }
    }

    /// Returns the sequence responsible for column zero.
    pub fn boundary(&self) -> &Sequence {
        self.z.as_ref().unwrap_or(&self.a)
    }

    /// Returns the sequence responsible for the given column.
    pub fn for_column(&self, c: i64) -> &Sequence {
        if c > 0 {
            &self.a
        } else {
            self.boundary()
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use recur_parser::parser::{ast::equation::Equation as AstEquation, Parser};
    use super::*;

    fn parse_eq(input: &str) -> Equation {
        let eq = Parser::new(input).try_parse_full::<AstEquation>().unwrap();
        Equation::from(eq)
    }

    fn t() -> Family {
        Family::Indexed("T".to_string())
    }

    fn n() -> SymExpr {
        SymExpr::symbol("n")
    }

    fn k() -> SymExpr {
        SymExpr::symbol("k")
    }

    #[test]
    fn a_sequence_solves_offsets() {
        let seq = Sequence::a(parse_eq("T[n + 1, k + 1] = T[n, k] + T[n, k + 1]"), t());
        let inst = seq.instantiate((&n(), 5), (&k(), 3)).unwrap();
        assert_eq!(inst, parse_eq("T[5, 3] = T[4, 2] + T[4, 3]"));
    }

    #[test]
    fn a_sequence_is_simultaneous() {
        // the column subscript mentions the row variable; substituting `n` first would change it
        let seq = Sequence::a(parse_eq("T[n + 1, k] = T[n, k] + T[n, n]"), t());
        let inst = seq.instantiate((&n(), 3), (&k(), 1)).unwrap();
        assert_eq!(inst, parse_eq("T[3, 1] = T[2, 1] + T[2, 2]"));
    }

    #[test]
    fn z_sequence() {
        let seq = Sequence::z(parse_eq("T[n + 1, 0] = T[n, 0] + 2 T[n, 1]"), t());
        let inst = seq.instantiate((&n(), 4), (&k(), 0)).unwrap();
        assert_eq!(inst, parse_eq("T[4, 0] = T[3, 0] + 2 T[3, 1]"));

        let err = seq.instantiate((&n(), 4), (&k(), 1)).unwrap_err();
        assert!(err.is::<BoundaryColumn>());
    }

    #[test]
    fn malformed_lhs() {
        let seq = Sequence::a(parse_eq("T[n + 1] = T[n]"), t());
        let err = seq.instantiate((&n(), 1), (&k(), 1)).unwrap_err();
        assert!(err.is::<MalformedRecurrence>());
    }

    #[test]
    fn boundary_falls_back_to_a() {
        let a = parse_eq("T[n + 1, k + 1] = T[n, k]");
        let seqs = Sequences::new(t(), a.clone(), None);
        assert_eq!(seqs.for_column(0).kind, SequenceKind::A);

        let seqs = Sequences::new(t(), a, Some(parse_eq("T[n + 1, 0] = T[n, 0]")));
        assert_eq!(seqs.for_column(0).kind, SequenceKind::Z);
        assert_eq!(seqs.for_column(2).kind, SequenceKind::A);
    }
}
