//! Instantiating unfolded recurrences at concrete subscripts, and working with their terms cache.
//!
//! An unfolded recurrence such as `f[n + 2] = f[n] + 2 f[n - 1] + f[n - 2]` holds for every `n`,
//! but it is most useful at the smallest `n` for which every subscript on the right-hand side is
//! still inside the domain of the family. [`RecurrenceSpec::base_instantiation`] finds that `n`,
//! given the base subscripts of the domain, and substitutes it.

use crate::destructure::{destructure, explode, Operator};
use crate::error::{FixpointNotReached, MalformedRecurrence, NonNumericValue};
use crate::options::FixpointOptions;
use crate::recurrence::{placeholder, RecurrenceSpec, TermsCache};
use crate::step::{Step, StepCollector};
use log::{debug, trace};
use recur_compute::symbolic::{solve_linear, Equation, SymExpr};
use recur_error::Error;

/// How the solutions of the subscripts of every term are combined into the values of the index
/// variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subsume {
    /// The recurrence has a single index variable, which takes the largest of its solutions.
    Unary,

    /// The recurrence has two index variables `n, k`. The column `k` takes the largest of its
    /// solutions. The base row may depend on the column through the given symbol, which is
    /// replaced with the column subscript of the left-hand side at that `k` before the row `n`
    /// takes the largest of its solutions.
    Doubly(SymExpr),
}

impl Subsume {
    /// Combines the solutions, given per term, into a value for every index variable.
    fn combine(&self, spec: &RecurrenceSpec, candidates: &[Vec<SymExpr>]) -> Result<Vec<(SymExpr, SymExpr)>, Error> {
        let malformed = |reason: String| MalformedRecurrence {
            equation: spec.equation.to_string(),
            reason,
        };
        let wrong_arity = |expected: usize| {
            malformed(format!("expected {} index variables, found {}", expected, spec.index.len()))
        };
        let no_members = || malformed("the right-hand side has no member of the family".to_string());

        match self {
            Self::Unary => {
                let [n] = spec.index.as_slice() else {
                    return Err(wrong_arity(1).into());
                };
                let max_n = symbolic_max(candidates.iter().map(|sols| sols[0].clone()))?
                    .ok_or_else(no_members)?;
                Ok(vec![(n.clone(), max_n)])
            },
            Self::Doubly(dummy) => {
                let [n, k] = spec.index.as_slice() else {
                    return Err(wrong_arity(2).into());
                };
                let max_k = symbolic_max(candidates.iter().map(|sols| sols[1].clone()))?
                    .ok_or_else(no_members)?;
                let lhs = spec.equation.lhs.subs(&[(k.clone(), max_k.clone())]);
                let (_, subscripts) = destructure(&lhs, &spec.family, &[])?;
                let [_, col] = subscripts.as_slice() else {
                    return Err(malformed(format!("the left-hand side has {} subscripts", subscripts.len())).into());
                };
                let col = [(dummy.clone(), col.clone())];
                let max_n = symbolic_max(candidates.iter().map(|sols| sols[0].subs(&col)))?
                    .ok_or_else(no_members)?;
                Ok(vec![(n.clone(), max_n), (k.clone(), max_k)])
            },
        }
    }
}

/// Returns the largest of the values, which must pairwise differ by a number, or [`None`] if
/// there are no values.
fn symbolic_max(values: impl IntoIterator<Item = SymExpr>) -> Result<Option<SymExpr>, Error> {
    let mut max: Option<SymExpr> = None;
    for value in values {
        let Some(current) = &max else {
            max = Some(value);
            continue;
        };
        let diff = (value.clone() - current.clone()).expand();
        let Some(diff) = diff.as_number() else {
            return Err(NonNumericValue { value: diff.to_string() }.into());
        };
        if *diff > 0 {
            max = Some(value);
        }
    }
    Ok(max)
}

impl RecurrenceSpec {
    /// Instantiates the recurrence at the values of the index variables for which the smallest
    /// subscripts of the right-hand side land on `base_index`.
    ///
    /// Every summand of the right-hand side that is a multiple of a member of the family gives a
    /// solution per index variable, by solving `base = subscript`. The solutions are combined
    /// with `subsume`, then substituted into the equation and into both sides of every entry of
    /// the terms cache. The index variables are kept.
    pub fn base_instantiation(&self, base_index: &[SymExpr], subsume: &Subsume) -> Result<Self, Error> {
        let malformed = |reason: String| -> Error {
            MalformedRecurrence { equation: self.equation.to_string(), reason }.into()
        };
        if base_index.len() != self.index.len() {
            return Err(malformed(format!(
                "the base has {} subscripts but there are {} index variables",
                base_index.len(),
                self.index.len(),
            )));
        }

        let mut candidates = Vec::new();
        for summand in explode(&self.equation.rhs, Operator::Add, true) {
            let Ok((_, subscripts)) = destructure(&summand, &self.family, &[]) else {
                continue;
            };
            if subscripts.len() != self.index.len() {
                return Err(malformed(format!(
                    "`{}` has {} subscripts but there are {} index variables",
                    summand,
                    subscripts.len(),
                    self.index.len(),
                )));
            }
            let sols = self.index
                .iter()
                .zip(base_index)
                .zip(&subscripts)
                .map(|((var, base), subscript)| solve_linear(base, subscript, var))
                .collect::<Result<Vec<_>, _>>()?;
            candidates.push(sols);
        }

        let solutions = subsume.combine(self, &candidates)?;
        debug!(
            "base instantiation at {}",
            solutions.iter().map(|(var, value)| format!("{} = {}", var, value)).collect::<Vec<_>>().join(", "),
        );

        let terms_cache = self.terms_cache
            .iter()
            .map(|(term, value)| (term.subs(&solutions), value.subs(&solutions)))
            .collect();
        Ok(Self::with_cache(
            self.equation.subs(&solutions),
            self.family.clone(),
            self.index.clone(),
            terms_cache,
        ))
    }

    /// Unfolds and factors the recurrence once for every number of steps, optionally
    /// instantiating every result at a base.
    ///
    /// The terms unfolded for one row are available to the following rows. The recurrence
    /// itself is left untouched; the accumulated terms cache is returned next to the rows.
    pub fn unfolding_table(
        &self,
        steps: impl IntoIterator<Item = usize>,
        first_order: bool,
        base: Option<(&[SymExpr], &Subsume)>,
    ) -> Result<(Vec<(usize, RecurrenceSpec)>, TermsCache), Error> {
        let mut working = self.clone();
        let mut rows = Vec::new();
        for steps in steps {
            let unfolded = working.unfold(steps, first_order, &mut ())?.factor(&[]);
            working.terms_cache.extend(unfolded.terms_cache.iter().map(|(k, v)| (k.clone(), v.clone())));

            let processed = match base {
                Some((base_index, subsume)) => unfolded.base_instantiation(base_index, subsume)?,
                None => unfolded,
            };
            rows.push((steps, processed));
        }
        Ok((rows, working.terms_cache))
    }

    /// Substitutes the terms cache into its own values until no value changes, then substitutes
    /// the result into the right-hand side of the equation.
    ///
    /// Returns [`FixpointNotReached`] if values keep changing after
    /// [`FixpointOptions::max_iterations`] rounds, which happens when a term is (indirectly)
    /// unfolded into itself.
    pub fn repeated_instantiating(
        &self,
        options: &FixpointOptions,
        step_collector: &mut dyn StepCollector<Step>,
    ) -> Result<Self, Error> {
        let mut terms_cache = self.terms_cache.clone();
        let mut iteration = 0;
        loop {
            let pairs = terms_cache
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect::<Vec<_>>();
            let mut changed = false;
            terms_cache = terms_cache
                .into_iter()
                .map(|(term, value)| {
                    if value.as_number().is_some() {
                        return (term, value);
                    }
                    let substituted = value.subs(&pairs);
                    changed |= substituted != value;
                    (term, substituted)
                })
                .collect();

            if !changed {
                break;
            }
            iteration += 1;
            if iteration > options.max_iterations {
                return Err(FixpointNotReached { max_iterations: options.max_iterations }.into());
            }
            trace!("terms cache substitution round {}", iteration);
            step_collector.push(Step::CacheSubstituted { iteration });
        }

        let pairs = terms_cache
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect::<Vec<_>>();
        Ok(Self::with_cache(
            Equation::new(self.equation.lhs.clone(), self.equation.rhs.subs(&pairs)),
            self.family.clone(),
            self.index.clone(),
            terms_cache,
        ))
    }

    /// Turns every entry `term = value` of the terms cache into a recurrence of its own, with an
    /// empty cache.
    ///
    /// When a subscript of `term` contains the matching index variable, the entry is re-indexed
    /// so that the subscript becomes the variable itself: `f[n + 1] = f[n] + f[n - 1]` becomes
    /// `f[n] = f[n - 1] + f[n - 2]`. Entries that coincide after re-indexing are kept once.
    pub fn subsume_cache(&self) -> Result<Vec<RecurrenceSpec>, Error> {
        let mut subsumed = Vec::<RecurrenceSpec>::new();
        for (term, value) in &self.terms_cache {
            let mut equation = Equation::new(term.clone(), value.clone());
            if let Ok((_, subscripts)) = destructure(term, &self.family, &[]) {
                for (var, subscript) in self.index.iter().zip(&subscripts) {
                    if !subscript.contains(var) {
                        continue;
                    }
                    let sol = solve_linear(subscript, &placeholder(), var)?
                        .subs(&[(placeholder(), var.clone())]);
                    equation = equation.subs(&[(var.clone(), sol)]);
                }
            }

            if subsumed.iter().all(|spec| spec.equation != equation) {
                subsumed.push(RecurrenceSpec::new(equation, self.family.clone(), self.index.clone()));
            }
        }
        Ok(subsumed)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
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

    fn fibonacci() -> RecurrenceSpec {
        RecurrenceSpec::from_equation(parse_eq("f[n + 2] = f[n + 1] + f[n]")).unwrap()
    }

    #[test]
    fn unary_base() {
        let unfolded = fibonacci().unfold(1, true, &mut ()).unwrap();
        let based = unfolded.base_instantiation(&[SymExpr::zero()], &Subsume::Unary).unwrap();
        assert_eq!(based.equation.lhs, parse_expr("f[4]"));
        assert_eq!(based.equation.rhs.expand(), parse_expr("f[2] + 2 f[1] + f[0]").expand());
        assert_eq!(based.index, vec![SymExpr::symbol("n")]);
        assert!(based.terms_cache.contains_key(&parse_expr("f[3]")));
    }

    #[test]
    fn doubly_base() {
        let pascal = RecurrenceSpec::from_equation(parse_eq("T[n + 1, k + 1] = T[n, k] + T[n, k + 1]")).unwrap();
        let unfolded = pascal.unfold(1, true, &mut ()).unwrap();
        let d = SymExpr::symbol("d");
        let based = unfolded
            .base_instantiation(&[d.clone(), SymExpr::zero()], &Subsume::Doubly(d))
            .unwrap();
        assert_eq!(based.equation.lhs, parse_expr("T[4, 2]"));
        assert_eq!(based.equation.rhs.expand(), parse_expr("T[2, 0] + 2 T[2, 1] + T[2, 2]").expand());
    }

    #[test]
    fn unary_subsumption_needs_one_variable() {
        let pascal = RecurrenceSpec::from_equation(parse_eq("T[n + 1, k + 1] = T[n, k] + T[n, k + 1]")).unwrap();
        let err = pascal.base_instantiation(&[SymExpr::zero(), SymExpr::zero()], &Subsume::Unary).unwrap_err();
        assert!(err.is::<MalformedRecurrence>());
    }

    #[test]
    fn base_needs_every_subscript() {
        let pascal = RecurrenceSpec::from_equation(parse_eq("T[n + 1, k + 1] = T[n, k] + T[n, k + 1]")).unwrap();
        let d = SymExpr::symbol("d");
        let err = pascal.base_instantiation(&[d.clone()], &Subsume::Doubly(d)).unwrap_err();
        assert!(err.is::<MalformedRecurrence>());

        let mixed = RecurrenceSpec::from_equation(parse_eq("f[n + 1] = f[n] + f[n, 1]")).unwrap();
        let err = mixed.base_instantiation(&[SymExpr::zero()], &Subsume::Unary).unwrap_err();
        assert!(err.is::<MalformedRecurrence>());
    }

    #[test]
    fn symbolic_offsets_are_rejected() {
        let spec = RecurrenceSpec::from_equation(parse_eq("f[n + 1] = f[n] + f[n - m]")).unwrap();
        let err = spec.base_instantiation(&[SymExpr::zero()], &Subsume::Unary).unwrap_err();
        assert!(err.is::<NonNumericValue>());
    }

    #[test]
    fn table_rows() {
        let spec = fibonacci();
        let (rows, cache) = spec.unfolding_table(0..3, true, None).unwrap();
        assert_eq!(rows.iter().map(|(steps, _)| *steps).collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(rows[1].1.equation.rhs.expand(), parse_expr("f[n] + 2 f[n - 1] + f[n - 2]").expand());
        assert_eq!(
            rows[2].1.equation.rhs.expand(),
            parse_expr("f[n - 1] + 3 f[n - 2] + 3 f[n - 3] + f[n - 4]").expand(),
        );
        assert!(cache.contains_key(&parse_expr("f[n + 1]")));
        assert!(spec.terms_cache.is_empty());
    }

    #[test]
    fn table_rows_at_base() {
        let (rows, _) = fibonacci()
            .unfolding_table([0, 1], true, Some((&[SymExpr::zero()], &Subsume::Unary)))
            .unwrap();
        assert_eq!(rows[0].1.equation.lhs, parse_expr("f[2]"));
        assert_eq!(rows[0].1.equation.rhs.expand(), parse_expr("f[1] + f[0]").expand());
        assert_eq!(rows[1].1.equation.lhs, parse_expr("f[4]"));
    }

    #[test]
    fn cache_substitution_reaches_fixpoint() {
        let family = fibonacci().family;
        let cache = TermsCache::from([
            (parse_expr("f[2]"), parse_expr("f[1] + f[0]")),
            (parse_expr("f[3]"), parse_expr("f[2] + f[1]")),
            (parse_expr("f[4]"), parse_expr("f[3] + f[2]")),
        ]);
        let spec = RecurrenceSpec::with_cache(parse_eq("g = f[4]"), family, vec![SymExpr::symbol("n")], cache);

        let mut steps = Vec::new();
        let instantiated = spec.repeated_instantiating(&FixpointOptions::default(), &mut steps).unwrap();
        assert_eq!(steps, vec![Step::CacheSubstituted { iteration: 1 }, Step::CacheSubstituted { iteration: 2 }]);
        assert_eq!(instantiated.equation.rhs.expand(), parse_expr("3 f[1] + 2 f[0]").expand());
        assert_eq!(instantiated.terms_cache[&parse_expr("f[3]")].expand(), parse_expr("2 f[1] + f[0]").expand());
    }

    #[test]
    fn self_referencing_cache_never_settles() {
        let family = fibonacci().family;
        let cache = TermsCache::from([(parse_expr("f[n]"), parse_expr("f[n] + f[n - 1]"))]);
        let spec = RecurrenceSpec::with_cache(parse_eq("g = f[n]"), family, vec![SymExpr::symbol("n")], cache);

        let err = spec.repeated_instantiating(&FixpointOptions { max_iterations: 5 }, &mut ()).unwrap_err();
        assert_eq!(err.downcast_ref::<FixpointNotReached>().unwrap().max_iterations, 5);
    }

    #[test]
    fn subsumed_entries_are_reindexed() {
        let unfolded = fibonacci().unfold(1, true, &mut ()).unwrap();
        assert_eq!(unfolded.terms_cache.len(), 2);

        let subsumed = unfolded.subsume_cache().unwrap();
        assert_eq!(subsumed.len(), 1);
        assert_eq!(subsumed[0].equation, parse_eq("f[n] = f[n - 1] + f[n - 2]"));
        assert!(subsumed[0].terms_cache.is_empty());
    }
}
