//! Filling a matrix with the unfolded entries of a triangle.
//!
//! Every cell `(r, c)` is filled by instantiating the recurrence responsible for its column at
//! `(r, c)`, and replacing every member `family[i, j]` on the instantiated right-hand side with
//! the current entry `(i, j)` of the matrix. Cells are visited row by row, left to right, so the
//! entries of the previous rows are already unfolded when a cell reads them. Visiting the cells in
//! any other order leaves members of the family that were not unfolded yet in the result.

use crate::destructure::{destructure, explode, Operator};
use crate::error::MalformedRecurrence;
use crate::matrix::{MatrixSpec, Substitutions};
use crate::options::UnfoldOptions;
use crate::sequence::{Sequence, Sequences};
use crate::step::{Step, StepCollector};
use log::{debug, trace};
use recur_compute::symbolic::{collect, Family, SymExpr, SymMatrix};
use recur_error::Error;

/// If the term is `coeff * family[row, col]` with integer subscripts, returns the coefficient and
/// the subscripts.
fn match_cell(term: &SymExpr, family: &Family) -> Option<(SymExpr, i64, i64)> {
    let (coeff, subscripts) = destructure(term, family, &[]).ok()?;
    match subscripts.as_slice() {
        [row, col] => Some((coeff, row.as_integer()?, col.as_integer()?)),
        _ => None,
    }
}

/// Computes the entry `(r, c)` of the matrix from the given sequence, without storing it.
///
/// Summands of the instantiated right-hand side that are not a multiple of a member of the family
/// at integer subscripts inside the matrix do not contribute.
pub fn unfold_cell(
    matrix: &SymMatrix,
    seq: &Sequence,
    row: (&SymExpr, usize),
    col: (&SymExpr, usize),
) -> Result<SymExpr, Error> {
    let instantiated = seq.instantiate((row.0, row.1 as i64), (col.0, col.1 as i64))?;

    let mut term = SymExpr::Add(Vec::new());
    for summand in explode(&instantiated.rhs.expand(), Operator::Add, false) {
        let Some((coeff, i, j)) = match_cell(&summand, &seq.family) else {
            continue;
        };
        let (Ok(i), Ok(j)) = (usize::try_from(i), usize::try_from(j)) else {
            continue;
        };
        if let Some(entry) = matrix.get(i, j) {
            term += coeff * entry.clone();
        }
    }
    Ok(term.downgrade())
}

/// Unfolds the entries of the matrix, returning the unfolded matrix and the value written into
/// each cell, keyed by the member of the family the cell was named after.
///
/// The rows from [`UnfoldOptions::row_start`] up to [`UnfoldOptions::unfolding_rows`] are
/// visited. In each of them, the columns from [`UnfoldOptions::col_start`] up to the end column
/// (see [`UnfoldOptions::adjust_end`]) are filled. The first cell of each row is filled by the
/// sequence responsible for the start column, every other cell by the A-sequence. Every written
/// entry is collected with respect to the free variables of the input matrix.
pub fn unfold_in_matrix(
    spec: &MatrixSpec,
    seqs: &Sequences,
    options: &UnfoldOptions,
    step_collector: &mut dyn StepCollector<Step>,
) -> Result<(MatrixSpec, Substitutions), Error> {
    let mut matrix = spec.matrix.clone();
    let unfolding_rows = options.unfolding_rows.unwrap_or(matrix.rows());
    let variables = spec.free_variables(unfolding_rows, options.location);
    let mut substitutions = Substitutions::new();
    debug!(
        "unfolding rows {}..{} from column {} of a {}x{} matrix",
        options.row_start,
        unfolding_rows,
        options.col_start,
        matrix.rows(),
        matrix.cols(),
    );

    for r in options.row_start..unfolding_rows.min(matrix.rows()) {
        let mut seq = seqs.for_column(options.col_start as i64);
        for c in options.col_start..options.end_column(r).min(matrix.cols()) {
            let term = unfold_cell(&matrix, seq, (&options.row_symbol, r), (&options.col_symbol, c))?;
            let value = collect(&term, &variables).to_expr();
            trace!("({}, {}) = {}", r, c, value);

            step_collector.push(Step::CellFilled { row: r, col: c, value: value.clone() });
            substitutions.insert(spec.member(r, c), value.clone());
            matrix[(r, c)] = value;
            seq = &seqs.a;
        }
    }

    Ok((MatrixSpec::new(matrix, spec.family.clone()), substitutions))
}

/// Returns the largest column subscript the A-sequence refers to when instantiated just past the
/// bottom-right corner of the matrix.
pub fn max_column_subscript(
    spec: &MatrixSpec,
    seq: &Sequence,
    row_symbol: &SymExpr,
    col_symbol: &SymExpr,
) -> Result<i64, Error> {
    let instantiated = seq.rec.subs(&[
        (row_symbol.clone(), SymExpr::int(spec.matrix.rows() as i64)),
        (col_symbol.clone(), SymExpr::int(spec.matrix.cols() as i64)),
    ]);

    let (_, _, lhs_col) = match_cell(&instantiated.lhs, &spec.family).ok_or_else(|| MalformedRecurrence {
        equation: seq.rec.to_string(),
        reason: "the left-hand side must be a single term of the family at a row and a column".to_string(),
    })?;

    Ok(explode(&instantiated.rhs.expand(), Operator::Add, false)
        .iter()
        .filter_map(|term| match_cell(term, &spec.family))
        .map(|(_, _, col)| col)
        .fold(lhs_col, i64::max))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use recur_compute::symbolic::Equation;
    use recur_parser::parser::{ast::equation::Equation as AstEquation, Parser};
    use super::*;

    fn parse_eq(input: &str) -> Equation {
        let eq = Parser::new(input).try_parse_full::<AstEquation>().unwrap();
        Equation::from(eq)
    }

    fn t() -> Family {
        Family::Indexed("T".to_string())
    }

    fn pascal() -> Sequences {
        Sequences::new(
            t(),
            parse_eq("T[n + 1, k + 1] = T[n, k] + T[n, k + 1]"),
            Some(parse_eq("T[n + 1, 0] = T[n, 0]")),
        )
    }

    fn binomial(n: usize, k: usize) -> i64 {
        (0..k).fold(1, |acc, i| acc * (n - i) as i64 / (i + 1) as i64)
    }

    /// Returns the members of the family appearing in the expression.
    fn members(expr: &SymExpr) -> Vec<SymExpr> {
        expr.post_order_iter()
            .filter(|sub| t().matches(sub))
            .cloned()
            .collect()
    }

    #[test]
    fn pascal_triangle() {
        let spec = MatrixSpec::symbolic(5, 5, t());
        let mut steps = Vec::new();
        let (unfolded, subs) = unfold_in_matrix(&spec, &pascal(), &UnfoldOptions::default(), &mut steps).unwrap();

        let t00 = spec.member(0, 0);
        for r in 0..5 {
            for c in 0..=r {
                let expected = (SymExpr::int(binomial(r, c)) * t00.clone()).expand();
                assert_eq!(unfolded.matrix[(r, c)].expand(), expected);
            }
        }
        assert!(unfolded.matrix.is_lower_triangular());

        // every cell below the first row is written once
        assert_eq!(steps.len(), 2 + 3 + 4 + 5);
        assert_eq!(subs.len(), steps.len());
        assert_eq!(subs[&spec.member(4, 2)], unfolded.matrix[(4, 2)]);
    }

    #[test]
    fn bounded_unfolding_leaves_free_variables() {
        let spec = MatrixSpec::symbolic(4, 4, t());
        let options = UnfoldOptions::default()
            .start(1, 1)
            .unfolding_rows(3)
            .adjust_end(true);
        let (unfolded, subs) = unfold_in_matrix(&spec, &pascal(), &options, &mut ()).unwrap();

        // column zero and the rows from the third one on are untouched
        assert_eq!(unfolded.matrix[(2, 0)], spec.member(2, 0));
        assert_eq!(unfolded.matrix[(3, 1)], spec.member(3, 1));
        assert_eq!(unfolded.matrix[(1, 1)], spec.member(0, 0));
        assert_eq!(unfolded.matrix[(2, 1)].expand(), (spec.member(1, 0) + spec.member(0, 0)).expand());
        assert_eq!(subs.len(), 3);
    }

    #[test]
    fn main_diagonal_is_left_free() {
        let spec = MatrixSpec::symbolic(4, 4, t());
        let options = UnfoldOptions::default()
            .location(crate::location::FreeVarsLocation::MainDiagonal)
            .unfolding_rows(3)
            .adjust_end(true);
        let (unfolded, _) = unfold_in_matrix(&spec, &pascal(), &options, &mut ()).unwrap();
        assert_eq!(unfolded.matrix[(1, 0)], spec.member(0, 0));
        assert_eq!(unfolded.matrix[(1, 1)], spec.member(1, 1));
        assert_eq!(unfolded.matrix[(2, 1)].expand(), (spec.member(0, 0) + spec.member(1, 1)).expand());
        assert_eq!(unfolded.matrix[(2, 2)], spec.member(2, 2));
    }

    #[test]
    fn fill_order_matters() {
        let seqs = Sequences::new(
            t(),
            parse_eq("T[n + 1, k + 1] = T[n, k] + T[n, k + 1] + T[n, k + 2]"),
            Some(parse_eq("T[n + 1, 0] = T[n, 0] + T[n, 1]")),
        );
        let spec = MatrixSpec::symbolic(5, 5, t());
        let (n, k) = (SymExpr::symbol("n"), SymExpr::symbol("k"));

        let (row_major, _) = unfold_in_matrix(&spec, &seqs, &UnfoldOptions::default(), &mut ()).unwrap();
        for (_, entry) in row_major.matrix.iter() {
            assert!(members(entry).iter().all(|member| *member == spec.member(0, 0)));
        }

        let mut column_major = spec.matrix.clone();
        for c in 0..5 {
            for r in c.max(1)..5 {
                let term = unfold_cell(&column_major, seqs.for_column(c as i64), (&n, r), (&k, c)).unwrap();
                column_major[(r, c)] = term.expand();
            }
        }

        // `(2, 0)` reads `(1, 1)` before it is filled
        assert!(members(&column_major[(2, 0)]).contains(&spec.member(1, 1)));
        assert_ne!(column_major[(2, 0)], row_major.matrix[(2, 0)].expand());
    }

    #[test]
    fn max_column() {
        let spec = MatrixSpec::symbolic(6, 6, t());
        let (n, k) = (SymExpr::symbol("n"), SymExpr::symbol("k"));
        assert_eq!(max_column_subscript(&spec, &pascal().a, &n, &k).unwrap(), 7);

        let wide = Sequence::a(parse_eq("T[n + 1, k + 1] = T[n, k] + T[n, k + 3]"), t());
        assert_eq!(max_column_subscript(&spec, &wide, &n, &k).unwrap(), 9);
    }
}
