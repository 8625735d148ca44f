//! Recurrence relations and their unfolding.
//!
//! A [`RecurrenceSpec`] is an equation `coeff * family[subscripts] = rhs` together with the index
//! variables the subscripts are written in, and a **terms cache**: every term of the right-hand
//! side that was ever unfolded, mapped to what it was unfolded into. Rewriting a recurrence
//! consults the cache first, so identical terms are always unfolded identically, and a chain of
//! rewrites never solves the same subscripts twice.
//!
//! Specs have value semantics. Rewriting, unfolding and factoring return new specs, each with its
//! own copy of the cache, extended with the terms unfolded along the way.

use crate::destructure::{destructure, explode, Operator};
use crate::error::MalformedRecurrence;
use crate::step::{Step, StepCollector};
use log::{debug, trace};
use recur_compute::symbolic::{collect, solve_linear, Equation, Family, SymExpr};
use recur_error::Error;
use recur_parser::parser::fmt::Latex;
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maps terms of a right-hand side to their unfolded replacement.
pub type TermsCache = BTreeMap<SymExpr, SymExpr>;

/// A symbol that no parsed expression can contain, used as a placeholder while normalizing.
pub(crate) fn placeholder() -> SymExpr {
    SymExpr::symbol("$placeholder")
}

/// A recurrence relation over an indexed family of terms.
///
/// For more information about this type, see the [module-level documentation](self).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RecurrenceSpec {
    /// The recurrence equation. Its left-hand side is a (possibly scaled) member of `family`.
    pub equation: Equation,

    /// The index variables, in the order of the subscripts of the left-hand side.
    pub index: Vec<SymExpr>,

    /// The family the recurrence defines.
    pub family: Family,

    /// Terms unfolded so far, and their replacements.
    pub terms_cache: TermsCache,
}

impl RecurrenceSpec {
    /// Creates a spec with an empty terms cache.
    pub fn new(equation: Equation, family: Family, index: Vec<SymExpr>) -> Self {
        Self::with_cache(equation, family, index, TermsCache::new())
    }

    /// Creates a spec with the given terms cache.
    pub fn with_cache(equation: Equation, family: Family, index: Vec<SymExpr>, terms_cache: TermsCache) -> Self {
        Self { equation, index, family, terms_cache }
    }

    /// Creates a spec from the equation alone. The family is the one of the left-hand side, and
    /// the index variables are the variables of its subscripts, in the order of the subscripts.
    pub fn from_equation(equation: Equation) -> Result<Self, Error> {
        let malformed = |reason: &str| MalformedRecurrence {
            equation: equation.to_string(),
            reason: reason.to_string(),
        };

        let member = equation.lhs
            .post_order_iter()
            .find(|expr| expr.as_indexed().is_some())
            .ok_or_else(|| malformed("the left-hand side has no indexed term"))?;
        let family = Family::try_from(member)?;
        let (_, subscripts) = destructure(&equation.lhs, &family, &[])?;

        let mut index = Vec::new();
        for subscript in &subscripts {
            for sym in subscript.free_symbols() {
                let sym = SymExpr::symbol(sym);
                if !index.contains(&sym) {
                    index.push(sym);
                }
            }
        }
        if index.is_empty() {
            return Err(malformed("the subscripts of the left-hand side have no variables").into());
        }

        Ok(Self::new(equation, family, index))
    }

    /// Returns the equation rewritten so that the subscripts of its left-hand side are exactly
    /// the index variables: `f[n + 1] = f[n] + f[n - 1]` becomes `f[n] = f[n - 1] + f[n - 2]`.
    pub fn normalized(&self) -> Result<Equation, Error> {
        let (_, subscripts) = destructure(&self.equation.lhs, &self.family, &[])?;
        let mut normalized = self.equation.clone();
        for (var, subscript) in self.index.iter().zip(&subscripts) {
            let sol = solve_linear(subscript, &placeholder(), var)?;
            normalized = normalized
                .subs(&[(var.clone(), sol)])
                .subs(&[(placeholder(), var.clone())]);
        }
        Ok(normalized)
    }

    /// Replaces every member of `according_to`'s family on the right-hand side with the
    /// right-hand side of `according_to`, instantiated at the member's subscripts. The result
    /// keeps the family and index of `self`, since its left-hand side is unchanged.
    ///
    /// The right-hand side is expanded and split into summands. Summands without a member of
    /// `according_to`'s family are kept as they are; summands in the terms cache are replaced with
    /// their cached value; every other summand `coeff * family[s]` is replaced with the normalized
    /// defining equation instantiated at `s`, scaled by the ratio between `coeff` and the coefficient
    /// of the instantiated left-hand side, and recorded in the cache. The summands are then added
    /// back together without evaluating the sum.
    pub fn rewrite(
        &self,
        according_to: &RecurrenceSpec,
        step_collector: &mut dyn StepCollector<Step>,
    ) -> Result<Self, Error> {
        let normalized = according_to.normalized()?;
        let family = &according_to.family;
        let mut terms_cache = self.terms_cache.clone();

        let mut folded = SymExpr::Add(Vec::new());
        for summand in explode(&self.equation.rhs, Operator::Add, true) {
            let unfolded = if !family.occurs_in(&summand) {
                summand
            } else if let Some(cached) = terms_cache.get(&summand) {
                trace!("cache hit for {}", summand);
                step_collector.push(Step::CacheHit { term: summand.clone(), value: cached.clone() });
                cached.clone()
            } else {
                let (coeff, subscripts) = destructure(&summand, family, &[])?;
                let constraints = according_to.index
                    .iter()
                    .cloned()
                    .zip(subscripts)
                    .collect::<Vec<_>>();
                let instantiated = normalized.subs_sequential(&constraints);
                let (coeff_lhs, _) = destructure(&instantiated.lhs, family, &[])?;

                let ratio = (coeff * coeff_lhs.recip()).expand();
                let unfolded = if ratio == SymExpr::one() {
                    instantiated.rhs
                } else {
                    ratio * instantiated.rhs
                };

                trace!("unfolded {} into {}", summand, unfolded);
                step_collector.push(Step::Unfolded { term: summand.clone(), value: unfolded.clone() });
                terms_cache.insert(summand, unfolded.clone());
                unfolded
            };
            folded += unfolded;
        }

        Ok(Self::with_cache(
            Equation::new(self.equation.lhs.clone(), folded.downgrade()),
            self.family.clone(),
            self.index.clone(),
            terms_cache,
        ))
    }

    /// Rewrites the recurrence `steps` times.
    ///
    /// In first-order mode, every step rewrites the accumulated result according to this
    /// (original) recurrence. In second-order mode, every step rewrites the previous result
    /// according to itself, so the depth of the unfolding compounds.
    pub fn unfold(
        &self,
        steps: usize,
        first_order: bool,
        step_collector: &mut dyn StepCollector<Step>,
    ) -> Result<Self, Error> {
        debug!("unfolding {} steps ({} order)", steps, if first_order { "first" } else { "second" });
        (0..steps).try_fold(self.clone(), |folding, _| {
            if first_order {
                folding.rewrite(self, step_collector)
            } else {
                folding.rewrite(&folding, step_collector)
            }
        })
    }

    /// Rewrites the right-hand side as a polynomial in the members of the family appearing in
    /// it, plus the given generators, collecting the coefficient of each monomial. The terms
    /// cache is kept as it is.
    pub fn factor(&self, gens: &[SymExpr]) -> Self {
        let mut all_gens = self.indexed_terms();
        all_gens.extend(gens.iter().cloned());
        let rhs = collect(&self.equation.rhs, &all_gens).to_expr();

        Self::with_cache(
            Equation::new(self.equation.lhs.clone(), rhs),
            self.family.clone(),
            self.index.clone(),
            self.terms_cache.clone(),
        )
    }

    /// Returns the distinct members of the family appearing on the right-hand side, in order of
    /// appearance.
    pub fn indexed_terms(&self) -> Vec<SymExpr> {
        let mut terms = Vec::new();
        for expr in self.equation.rhs.post_order_iter() {
            if self.family.matches(expr) && !terms.contains(expr) {
                terms.push(expr.clone());
            }
        }
        terms
    }

    /// Describes the recurrence in Markdown, with LaTeX math, optionally listing the unfolded
    /// terms of the cache.
    pub fn description(&self, include_terms_cache: bool) -> String {
        let variables = self.index
            .iter()
            .map(|var| var.to_latex())
            .collect::<Vec<_>>()
            .join(", ");
        let mut src = format!(
            "Recurrence formal symbol ${}$, indexed by ${}$, in relation:\n\n$${}$$",
            self.family,
            variables,
            self.equation.as_display(),
        );

        if include_terms_cache && !self.terms_cache.is_empty() {
            let terms = self.terms_cache
                .iter()
                .map(|(term, value)| Equation::new(term.clone(), value.clone()).to_latex())
                .collect::<Vec<_>>()
                .join(", ");
            src.push_str(&format!("\n\nwith unfolded terms:\n\n$$\\left\\{{{}\\right\\}}$$", terms));
        }

        src
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use recur_compute::symbolic::Polynomial;
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

    /// Evaluates the right-hand side at `n`, replacing every `f[i]` with the `i`-th Fibonacci
    /// number.
    fn eval_fibonacci(expr: &SymExpr, n: i64) -> SymExpr {
        let fib = |i: i64| {
            let (mut a, mut b) = (0i64, 1i64);
            for _ in 0..i {
                (a, b) = (b, a + b);
            }
            a
        };
        let instantiated = expr.subs(&[(SymExpr::symbol("n"), SymExpr::int(n))]);
        let values = (0..=n + 2)
            .map(|i| (parse_expr(&format!("f[{}]", i)), SymExpr::int(fib(i))))
            .collect::<Vec<_>>();
        instantiated.subs(&values).expand()
    }

    #[test]
    fn from_equation_infers_index() {
        let spec = RecurrenceSpec::from_equation(parse_eq("T[n + 1, k + 1] = T[n, k] + T[n, k + 1]")).unwrap();
        assert_eq!(spec.family, Family::Indexed("T".to_string()));
        assert_eq!(spec.index, vec![SymExpr::symbol("n"), SymExpr::symbol("k")]);
        assert!(spec.terms_cache.is_empty());
    }

    #[test]
    fn normalize() {
        let spec = RecurrenceSpec::from_equation(parse_eq("T[n + 1, k + 1] = T[n, k] + T[n, k + 1]")).unwrap();
        let normalized = spec.normalized().unwrap();
        assert_eq!(normalized, parse_eq("T[n, k] = T[n - 1, k - 1] + T[n - 1, k]"));
    }

    #[test]
    fn rewrite_once() {
        let spec = fibonacci();
        let mut steps = Vec::new();
        let rewritten = spec.rewrite(&spec, &mut steps).unwrap();
        assert_eq!(rewritten.equation.lhs, parse_expr("f[n + 2]"));
        assert_eq!(rewritten.equation.rhs.expand(), parse_expr("f[n] + 2 f[n - 1] + f[n - 2]").expand());
        assert_eq!(rewritten.terms_cache.len(), 2);
        assert_eq!(steps.len(), 2);
        assert!(steps.iter().all(|step| matches!(step, Step::Unfolded { .. })));
    }

    #[test]
    fn scaled_left_hand_side() {
        let spec = RecurrenceSpec::from_equation(parse_eq("2 f[n + 1] = f[n]")).unwrap();
        let target = RecurrenceSpec::new(
            parse_eq("g = 6 f[3]"),
            spec.family.clone(),
            spec.index.clone(),
        );
        let rewritten = target.rewrite(&spec, &mut ()).unwrap();
        assert_eq!(rewritten.equation.rhs.expand(), parse_expr("3 f[2]").expand());
    }

    #[test]
    fn rewrite_by_other_family() {
        let f = RecurrenceSpec::from_equation(parse_eq("f[n + 1] = 2 f[n]")).unwrap();
        let g = RecurrenceSpec::from_equation(parse_eq("g[n + 1] = f[n] + 1")).unwrap();
        let rewritten = g.rewrite(&f, &mut ()).unwrap();
        assert_eq!(rewritten.equation.rhs.expand(), parse_expr("2 f[n - 1] + 1").expand());
        assert_eq!(rewritten.family, Family::Indexed("g".to_string()));
        assert_eq!(rewritten.terms_cache.len(), 1);

        let mixed = RecurrenceSpec::from_equation(parse_eq("g[n + 1] = f[n] + g[n]")).unwrap();
        let rewritten = mixed.rewrite(&f, &mut ()).unwrap();
        assert_eq!(rewritten.equation.rhs.expand(), parse_expr("2 f[n - 1] + g[n]").expand());
    }

    #[test]
    fn rewrite_is_idempotent() {
        let spec = fibonacci();
        let first = spec.rewrite(&spec, &mut ()).unwrap();
        let second = spec.rewrite(&spec, &mut ()).unwrap();
        assert_eq!(first.equation, second.equation);

        // rewriting again with the extended cache hits it and never overwrites an entry
        let mut steps = Vec::new();
        let again = first.rewrite(&spec, &mut steps).unwrap();
        assert!(steps.iter().any(|step| matches!(step, Step::CacheHit { .. })));
        for (term, value) in &first.terms_cache {
            assert_eq!(again.terms_cache.get(term), Some(value));
        }
        assert!(again.terms_cache.len() >= first.terms_cache.len());
    }

    #[test]
    fn first_and_second_order_diverge() {
        let spec = fibonacci();
        let first = spec.unfold(2, true, &mut ()).unwrap();
        let second = spec.unfold(2, false, &mut ()).unwrap();

        let first_rhs = first.equation.rhs.expand();
        let second_rhs = second.equation.rhs.expand();
        assert_ne!(first_rhs, second_rhs);
        assert_eq!(first_rhs, parse_expr("f[n - 1] + 3 f[n - 2] + 3 f[n - 3] + f[n - 4]").expand());
        assert_eq!(
            second_rhs,
            parse_expr("f[n - 1] + f[n - 2] + 2 f[n - 3] + 5 f[n - 4] + 4 f[n - 5] + f[n - 6]").expand(),
        );

        // both are identities of the Fibonacci numbers
        for n in 6..10 {
            let expected = eval_fibonacci(&parse_expr("f[n + 2]"), n);
            assert_eq!(eval_fibonacci(&first.equation.rhs, n), expected);
            assert_eq!(eval_fibonacci(&second.equation.rhs, n), expected);
        }
    }

    #[test]
    fn factor_collects_terms() {
        let spec = fibonacci().unfold(1, true, &mut ()).unwrap();
        let factored = spec.factor(&[]);
        assert_eq!(factored.terms_cache, spec.terms_cache);
        let poly = Polynomial::from_expr(&factored.equation.rhs);
        assert_eq!(poly, Polynomial::from_expr(&parse_expr("f[n] + 2 f[n - 1] + f[n - 2]")));
        assert_eq!(factored.indexed_terms().len(), 3);
    }

    #[test]
    fn description_mentions_cache() {
        let spec = fibonacci().unfold(1, true, &mut ()).unwrap();
        let description = spec.description(true);
        assert!(description.starts_with("Recurrence formal symbol $f$, indexed by $n$"));
        assert!(description.contains("with unfolded terms"));
        assert!(!fibonacci().description(true).contains("with unfolded terms"));
    }
}
