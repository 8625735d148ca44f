//! Pascal's hockey-stick identities as recurrences.
//!
//! Every entry of Pascal's triangle is the sum of a run of entries above it, either along a
//! diagonal or down a column. Truncating the run after `length` terms gives a recurrence that
//! reaches `length` rows back.

use recur_compute::symbolic::{Equation, Family, SymExpr};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The direction of the run of entries a hockey stick sums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum HockeyStick {
    /// The entries `d[n - i, k + 1 - i]`.
    Diagonal,

    /// The entries `d[n - i, k]`.
    Vertical,
}

impl HockeyStick {
    /// Returns the `i`-th entry of the run.
    pub fn term(self, family: &Family, row_symbol: &SymExpr, col_symbol: &SymExpr, i: usize) -> SymExpr {
        let i = SymExpr::int(i as i64);
        let row = row_symbol.clone() - i.clone();
        let col = match self {
            Self::Diagonal => col_symbol.clone() + SymExpr::one() - i,
            Self::Vertical => col_symbol.clone(),
        };
        family.apply(vec![row, col])
    }
}

/// Builds the recurrence `d[n + 1, k + 1] = stick(0) + ... + stick(length - 1)`.
pub fn make_pascal_hockey_stick_recurrence(
    family: &Family,
    length: usize,
    stick: HockeyStick,
    row_symbol: &SymExpr,
    col_symbol: &SymExpr,
) -> Equation {
    let rhs = (0..length)
        .map(|i| stick.term(family, row_symbol, col_symbol, i))
        .fold(SymExpr::Add(Vec::new()), |rhs, term| rhs + term)
        .downgrade();
    let lhs = family.apply(vec![
        row_symbol.clone() + SymExpr::one(),
        col_symbol.clone() + SymExpr::one(),
    ]);
    Equation::new(lhs, rhs)
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

    fn binomial(n: i64, k: i64) -> i64 {
        if k < 0 || k > n {
            return 0;
        }
        (0..k).fold(1, |acc, i| acc * (n - i) / (i + 1))
    }

    /// Checks the recurrence at `(n, k)` with the binomial coefficients in place of the entries.
    fn holds_on_binomials(eq: &Equation, n: i64, k: i64) -> bool {
        let at = eq.subs(&[(SymExpr::symbol("n"), SymExpr::int(n)), (SymExpr::symbol("k"), SymExpr::int(k))]);
        let values = (-2..=n + 1)
            .flat_map(|a| (-2..=n + 2).map(move |b| (a, b)))
            .map(|(a, b)| {
                let member = SymExpr::indexed("d", vec![SymExpr::int(a), SymExpr::int(b)]);
                (member, SymExpr::int(binomial(a, b)))
            })
            .collect::<Vec<_>>();
        at.subs(&values).residual().is_zero()
    }

    #[test]
    fn shapes() {
        let d = Family::Indexed("d".to_string());
        let (n, k) = (SymExpr::symbol("n"), SymExpr::symbol("k"));
        assert_eq!(
            make_pascal_hockey_stick_recurrence(&d, 3, HockeyStick::Diagonal, &n, &k),
            parse_eq("d[n + 1, k + 1] = d[n, k + 1] + d[n - 1, k] + d[n - 2, k - 1]"),
        );
        assert_eq!(
            make_pascal_hockey_stick_recurrence(&d, 2, HockeyStick::Vertical, &n, &k),
            parse_eq("d[n + 1, k + 1] = d[n, k] + d[n - 1, k]"),
        );
    }

    #[test]
    fn identities_on_pascal() {
        let d = Family::Indexed("d".to_string());
        let (n, k) = (SymExpr::symbol("n"), SymExpr::symbol("k"));
        let diagonal = make_pascal_hockey_stick_recurrence(&d, 3, HockeyStick::Diagonal, &n, &k);
        let vertical = make_pascal_hockey_stick_recurrence(&d, 5, HockeyStick::Vertical, &n, &k);
        assert!(holds_on_binomials(&diagonal, 4, 1));
        assert!(holds_on_binomials(&vertical, 4, 1));

        // a run too short to reach the edge of the triangle misses terms
        let short = make_pascal_hockey_stick_recurrence(&d, 2, HockeyStick::Vertical, &n, &k);
        assert!(!holds_on_binomials(&short, 4, 1));
    }
}
