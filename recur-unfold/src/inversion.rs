//! Running a triangle's recurrences backwards.
//!
//! Instantiating the recurrences at every cell of row `r` gives a system of linear equations
//! between the entries of row `r` and those of row `r - 1`. Solving it for row `r - 1` expresses
//! the previous row through the current one. Doing so from the last unfolding row up to the first
//! one, and composing the solutions, expresses every entry above the last unfolding row through
//! the entries of that row.

use crate::error::InversionFailed;
use crate::matrix::{as_pairs, MatrixSpec, Substitutions};
use crate::options::UnfoldOptions;
use crate::sequence::Sequences;
use crate::step::{Step, StepCollector};
use crate::unfold::max_column_subscript;
use log::{debug, trace};
use recur_compute::symbolic::{solve_linear_system, Equation, SymExpr};
use recur_error::Error;

/// Solves the equations of row `r` for the entries of row `r - 1`.
fn invert_row(
    spec: &MatrixSpec,
    seqs: &Sequences,
    options: &UnfoldOptions,
    r: usize,
) -> Result<Substitutions, Error> {
    let offset = options.diagonal_col_offset;
    let equations = (0..=r * offset)
        .map(|c| {
            seqs.for_column(c as i64)
                .instantiate((&options.row_symbol, r as i64), (&options.col_symbol, c as i64))
        })
        .collect::<Result<Vec<Equation>, _>>()?;

    // the entries of the previous row inside the triangle come first, so they get the pivots
    let previous = r - 1;
    let mut unknowns = (0..=previous * offset)
        .map(|c| spec.member(previous, c))
        .collect::<Vec<_>>();
    for eq in &equations {
        for expr in eq.lhs.post_order_iter().chain(eq.rhs.post_order_iter()) {
            let Some(subscripts) = spec.family.indices_of(expr) else {
                continue;
            };
            if subscripts.first().and_then(SymExpr::as_integer) == Some(previous as i64)
                && !unknowns.contains(expr)
            {
                unknowns.push(expr.clone());
            }
        }
    }

    let solutions = solve_linear_system(&equations, &unknowns)?;
    (0..=previous * offset)
        .map(|c| {
            let member = spec.member(previous, c);
            solutions
                .iter()
                .find(|(unknown, _)| *unknown == member)
                .map(|(_, value)| (member.clone(), value.clone()))
                .ok_or_else(|| Error::from(InversionFailed { row: r, term: member.to_string() }))
        })
        .collect()
}

/// Expresses the entries of the rows above the last unfolding row through the entries of the last
/// unfolding row.
///
/// Returns the substitution of every member `family[i, j]` with `i` above the last unfolding row
/// and `j` inside the triangle. Members to the right of the main diagonal that the solutions
/// still refer to are zero.
pub fn invert_rec(
    spec: &MatrixSpec,
    seqs: &Sequences,
    options: &UnfoldOptions,
    step_collector: &mut dyn StepCollector<Step>,
) -> Result<Substitutions, Error> {
    let rows = spec.matrix.rows();
    let unfolding_rows = options.unfolding_rows.unwrap_or(rows);
    debug!("inverting rows {}..{}", 1, unfolding_rows);

    let mut backwards = Substitutions::new();
    for r in (1..unfolding_rows).rev() {
        let layer = invert_row(spec, seqs, options, r)?;
        step_collector.push(Step::LayerSolved { row: r });

        let composed = as_pairs(&backwards);
        for (member, value) in layer {
            trace!("{} = {}", member, value);
            backwards.insert(member, value.subs(&composed));
        }
    }

    let cols = max_column_subscript(spec, &seqs.a, &options.row_symbol, &options.col_symbol)?;
    let mut zeros = Vec::new();
    for r in 0..rows {
        for c in (r as i64 + 1)..=cols {
            zeros.push((spec.family.apply(vec![SymExpr::int(r as i64), SymExpr::int(c)]), SymExpr::zero()));
        }
    }

    Ok(backwards
        .into_iter()
        .map(|(member, value)| (member, value.subs(&zeros).expand()))
        .collect())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use recur_compute::symbolic::Family;
    use recur_parser::parser::{ast::{equation::Equation as AstEquation, expr::Expr as AstExpr}, Parser};
    use super::*;

    fn parse_expr(input: &str) -> SymExpr {
        let expr = Parser::new(input).try_parse_full::<AstExpr>().unwrap();
        SymExpr::from(expr)
    }

    fn parse_eq(input: &str) -> Equation {
        let eq = Parser::new(input).try_parse_full::<AstEquation>().unwrap();
        Equation::from(eq)
    }

    fn t() -> Family {
        Family::Indexed("T".to_string())
    }

    #[test]
    fn pascal_backwards() {
        let seqs = Sequences::new(
            t(),
            parse_eq("T[n + 1, k + 1] = T[n, k] + T[n, k + 1]"),
            Some(parse_eq("T[n + 1, 0] = T[n, 0]")),
        );
        let spec = MatrixSpec::symbolic(4, 4, t());
        let options = UnfoldOptions::default().unfolding_rows(3);

        let mut steps = Vec::new();
        let subs = invert_rec(&spec, &seqs, &options, &mut steps).unwrap();
        assert_eq!(steps, vec![Step::LayerSolved { row: 2 }, Step::LayerSolved { row: 1 }]);
        assert_eq!(subs.len(), 3);
        assert_eq!(subs[&spec.member(0, 0)], spec.member(2, 0));
        assert_eq!(subs[&spec.member(1, 0)], spec.member(2, 0));
        assert_eq!(subs[&spec.member(1, 1)], parse_expr("T[2, 1] - T[2, 0]").expand());
    }

    #[test]
    fn undetermined_previous_row() {
        // `T[0, 0]` appears in none of the equations of row 1
        let seqs = Sequences::new(
            t(),
            parse_eq("T[n + 1, k + 1] = T[n, k + 1] + T[n, k + 2]"),
            Some(parse_eq("T[n + 1, 0] = T[n, 1]")),
        );
        let spec = MatrixSpec::symbolic(3, 3, t());
        let options = UnfoldOptions::default().unfolding_rows(2);

        let err = invert_rec(&spec, &seqs, &options, &mut ()).unwrap_err();
        let failed = err.downcast_ref::<InversionFailed>().unwrap();
        assert_eq!(failed.row, 1);
        assert_eq!(failed.term, "T[0, 0]");
    }
}
