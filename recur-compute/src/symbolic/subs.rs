//! Substitution of sub-expressions.

use crate::symbolic::expr::{Primary, SymExpr};

impl SymExpr {
    /// Substitutes every occurrence of the left-hand side of each pair with its right-hand side,
    /// **simultaneously**.
    ///
    /// The expression is traversed once, top-down. Whenever a sub-expression is structurally
    /// equal to one of the targets, it is replaced and the replacement is not traversed again, so
    /// `[(n, k), (k, n)]` swaps `n` and `k`. Subscripts of indexed terms are substituted too, and
    /// re-expanded afterwards, so substituting `n = 4` in `T[n + 1, k]` gives `T[5, k]`.
    ///
    /// No other simplification is done.
    pub fn subs(&self, pairs: &[(SymExpr, SymExpr)]) -> SymExpr {
        if let Some((_, replacement)) = pairs.iter().find(|(target, _)| target == self) {
            return replacement.clone();
        }

        match self {
            Self::Primary(Primary::Indexed(name, args)) => {
                let args = args.iter().map(|arg| arg.subs(pairs)).collect();
                Self::indexed(name.clone(), args)
            },
            Self::Primary(Primary::Call(name, args)) => {
                let args = args.iter().map(|arg| arg.subs(pairs)).collect();
                Self::call(name.clone(), args)
            },
            Self::Primary(_) => self.clone(),
            Self::Add(terms) => terms
                .iter()
                .fold(Self::Add(Vec::new()), |acc, term| acc + term.subs(pairs))
                .downgrade(),
            Self::Mul(factors) => factors
                .iter()
                .fold(Self::Mul(Vec::new()), |acc, factor| acc * factor.subs(pairs))
                .downgrade(),
            Self::Exp(base, exp) => Self::Exp(Box::new(base.subs(pairs)), Box::new(exp.subs(pairs))),
        }
    }

    /// Substitutes the pairs **one after the other**: the second pair is applied to the result
    /// of the first, and so on. `[(n, k), (k, n)]` therefore replaces both `n` and `k` with `n`.
    pub fn subs_sequential(&self, pairs: &[(SymExpr, SymExpr)]) -> SymExpr {
        pairs
            .iter()
            .fold(self.clone(), |expr, pair| expr.subs(std::slice::from_ref(pair)))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use recur_parser::parser::{ast::expr::Expr as AstExpr, Parser};
    use super::*;

    fn parse_expr(input: &str) -> SymExpr {
        let expr = Parser::new(input).try_parse_full::<AstExpr>().unwrap();
        SymExpr::from(expr)
    }

    #[test]
    fn subs_in_subscripts() {
        let expr = parse_expr("2 T[n + 1, k]");
        let result = expr.subs(&[(SymExpr::symbol("n"), SymExpr::int(4))]);
        assert_eq!(result, parse_expr("2 T[5, k]"));
    }

    #[test]
    fn simultaneous_swap() {
        let expr = parse_expr("T[n, k]");
        let pairs = [
            (SymExpr::symbol("n"), SymExpr::symbol("k")),
            (SymExpr::symbol("k"), SymExpr::symbol("n")),
        ];
        assert_eq!(expr.subs(&pairs), parse_expr("T[k, n]"));
        assert_eq!(expr.subs_sequential(&pairs), parse_expr("T[n, n]"));
    }

    #[test]
    fn subs_whole_terms() {
        let expr = parse_expr("T[1, 0] + 3 T[1, 1]");
        let result = expr.subs(&[
            (parse_expr("T[1, 0]"), SymExpr::int(1)),
            (parse_expr("T[1, 1]"), SymExpr::symbol("x")),
        ]);
        assert_eq!(result.expand(), parse_expr("3 x + 1").expand());
    }
}
