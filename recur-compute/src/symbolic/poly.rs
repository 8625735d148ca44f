//! Canonical polynomial form of expressions.
//!
//! A [`Polynomial`] is a sum of monomials with exact rational coefficients. A monomial is a
//! product of **atoms** raised to integer powers, where an atom is anything that is not a number,
//! sum, or product: variables, indexed terms, function applications, and powers that cannot be
//! expanded (such as `x^n`, or the reciprocal of a sum).
//!
//! Exponents of atoms may be negative, so monomials divide exactly. The reciprocal of a sum is
//! kept as an opaque atom whose base is the primitive part of the sum, so two reciprocals of the
//! same sum, up to a constant factor, are recognized as the same atom.

use crate::primitive::{int, rational_pow};
use crate::symbolic::expr::{Primary, SymExpr};
use rug::{Integer, Rational};
use std::collections::BTreeMap;
use std::ops::{Add, Mul, Neg, Sub};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A product of atoms raised to non-zero integer powers.
pub type Monomial = BTreeMap<SymExpr, i64>;

/// A polynomial with rational coefficients, in canonical form.
///
/// No term has a zero coefficient, and no monomial has an atom raised to the power zero. Two
/// polynomials are equal if and only if they represent the same polynomial.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Polynomial {
    terms: BTreeMap<Monomial, Rational>,
}

impl Polynomial {
    /// The zero polynomial.
    pub fn zero() -> Self {
        Self::default()
    }

    /// A constant polynomial.
    pub fn constant(value: Rational) -> Self {
        let mut poly = Self::zero();
        poly.add_term(Monomial::new(), value);
        poly
    }

    /// A polynomial consisting of a single atom.
    pub fn atom(atom: SymExpr) -> Self {
        Self::monomial(Monomial::from([(atom, 1)]), int(1))
    }

    /// A polynomial consisting of a single term.
    pub fn monomial(monomial: Monomial, coeff: Rational) -> Self {
        let mut poly = Self::zero();
        poly.add_term(monomial, coeff);
        poly
    }

    /// Converts an expression into its canonical polynomial form.
    pub fn from_expr(expr: &SymExpr) -> Self {
        match expr {
            SymExpr::Primary(Primary::Number(num)) => Self::constant(num.clone()),
            SymExpr::Primary(Primary::Indexed(name, args)) => {
                Self::atom(SymExpr::indexed(name.clone(), args.clone()))
            },
            SymExpr::Primary(Primary::Call(name, args)) => {
                Self::atom(SymExpr::call(name.clone(), args.clone()))
            },
            SymExpr::Primary(_) => Self::atom(expr.clone()),
            SymExpr::Add(terms) => terms
                .iter()
                .fold(Self::zero(), |acc, term| acc + Self::from_expr(term)),
            SymExpr::Mul(factors) => factors
                .iter()
                .fold(Self::constant(int(1)), |acc, factor| &acc * &Self::from_expr(factor)),
            SymExpr::Exp(base, exp) => {
                let exp = exp.expand();
                match exp.as_integer() {
                    Some(n) => Self::from_expr(base).pow(n),
                    None => Self::atom(SymExpr::Exp(Box::new(base.expand()), Box::new(exp))),
                }
            },
        }
    }

    /// Converts the polynomial back into an expression.
    ///
    /// Terms are emitted in the order of their monomials, with the constant term last. In each
    /// term, the coefficient comes first.
    pub fn to_expr(&self) -> SymExpr {
        let mut terms = Vec::with_capacity(self.terms.len());
        let mut constant = None;
        for (monomial, coeff) in &self.terms {
            if monomial.is_empty() {
                constant = Some(SymExpr::number(coeff.clone()));
                continue;
            }

            let mut factors = Vec::with_capacity(monomial.len() + 1);
            if *coeff != 1 {
                factors.push(SymExpr::number(coeff.clone()));
            }
            factors.extend(monomial.iter().map(|(atom, &exp)| atom_power(atom, exp)));
            terms.push(SymExpr::Mul(factors).downgrade());
        }
        terms.extend(constant);
        SymExpr::Add(terms).downgrade()
    }

    /// Returns an iterator over the terms of the polynomial.
    pub fn terms(&self) -> impl Iterator<Item = (&Monomial, &Rational)> {
        self.terms.iter()
    }

    /// Returns the number of terms of the polynomial.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns true if the polynomial is zero.
    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// If the polynomial is constant, returns its value.
    pub fn as_constant(&self) -> Option<Rational> {
        match self.terms.len() {
            0 => Some(int(0)),
            1 => self.terms.get(&Monomial::new()).cloned(),
            _ => None,
        }
    }

    /// If the polynomial consists of a single term, returns its monomial and coefficient.
    pub fn as_monomial(&self) -> Option<(&Monomial, &Rational)> {
        if self.terms.len() == 1 {
            self.terms.iter().next()
        } else {
            None
        }
    }

    /// Returns the coefficient of the given monomial.
    pub fn coefficient(&self, monomial: &Monomial) -> Rational {
        self.terms.get(monomial).cloned().unwrap_or_else(|| int(0))
    }

    /// Returns true if the given expression appears in any atom of the polynomial.
    pub fn contains(&self, target: &SymExpr) -> bool {
        self.terms
            .keys()
            .any(|monomial| monomial.keys().any(|atom| atom.contains(target)))
    }

    /// Returns true if a term of the family with the given name appears in any atom of the
    /// polynomial.
    pub fn contains_family(&self, family: &str) -> bool {
        self.terms
            .keys()
            .any(|monomial| monomial.keys().any(|atom| atom.contains_family(family)))
    }

    /// Multiplies every coefficient by the given value.
    pub fn scale(&self, factor: &Rational) -> Self {
        let mut result = Self::zero();
        for (monomial, coeff) in &self.terms {
            result.add_term(monomial.clone(), Rational::from(coeff * factor));
        }
        result
    }

    /// Raises the polynomial to an integer power.
    pub fn pow(&self, exp: i64) -> Self {
        if exp < 0 {
            return self.recip().pow(-exp);
        }

        // a single term is raised directly, which also keeps opaque atoms from being multiplied
        // out one factor at a time
        if let Some((monomial, coeff)) = self.as_monomial() {
            if let Some(coeff) = rational_pow(coeff, exp) {
                let monomial = monomial
                    .iter()
                    .map(|(atom, &e)| (atom.clone(), e * exp))
                    .collect();
                return Self::monomial(monomial, coeff);
            }
        }

        let mut result = Self::constant(int(1));
        for _ in 0..exp {
            result = &result * self;
        }
        result
    }

    /// Returns the reciprocal of the polynomial.
    ///
    /// Monomials are inverted exactly. The reciprocal of a sum is an opaque atom, scaled so that
    /// the base of the atom is the primitive part of the sum.
    pub fn recip(&self) -> Self {
        match self.as_monomial() {
            Some((monomial, coeff)) if *coeff != 0 => {
                let mut result = Self::constant(Rational::from(coeff.recip_ref()));
                for (atom, &exp) in monomial {
                    result = &result * &invert_atom(atom, exp);
                }
                result
            },
            _ => {
                let (content, primitive) = self.content();
                let atom = SymExpr::Exp(Box::new(primitive.to_expr()), Box::new(SymExpr::int(-1)));
                let scale = if content == 0 { int(1) } else { content.recip() };
                Self::atom(atom).scale(&scale)
            },
        }
    }

    /// Returns the content and primitive part of the polynomial.
    ///
    /// The content is the rational number whose numerator is the GCD of the numerators of the
    /// coefficients, and whose denominator is the LCM of their denominators. Its sign is chosen
    /// so that the first term of the primitive part is positive.
    pub fn content(&self) -> (Rational, Self) {
        let mut numer = Integer::new();
        let mut denom = Integer::from(1);
        for coeff in self.terms.values() {
            numer = numer.gcd(coeff.numer());
            denom = denom.lcm(coeff.denom());
        }

        if numer == 0 {
            return (int(0), Self::zero());
        }

        let mut content = Rational::from((numer, denom));
        if self.terms.values().next().map_or(false, |coeff| *coeff < 0) {
            content = -content;
        }
        let primitive = self.scale(&content.clone().recip());
        (content, primitive)
    }

    /// Splits the polynomial into `c1 * var + c0`, where neither `c1` nor `c0` contain `var`.
    /// Returns [`None`] if the polynomial is not linear in `var`.
    pub fn split_linear(&self, var: &SymExpr) -> Option<(Self, Self)> {
        let mut linear = Self::zero();
        let mut rest = Self::zero();
        for (monomial, coeff) in &self.terms {
            let mut monomial = monomial.clone();
            match monomial.remove(var) {
                Some(1) => {
                    if monomial.keys().any(|atom| atom.contains(var)) {
                        return None;
                    }
                    linear.add_term(monomial, coeff.clone());
                },
                Some(_) => return None,
                None => {
                    if monomial.keys().any(|atom| atom.contains(var)) {
                        return None;
                    }
                    rest.add_term(monomial, coeff.clone());
                },
            }
        }
        Some((linear, rest))
    }

    /// Adds a term to the polynomial, dropping it if the coefficient becomes zero.
    fn add_term(&mut self, monomial: Monomial, coeff: Rational) {
        if coeff == 0 {
            return;
        }

        let entry = self.terms.entry(monomial).or_insert_with(|| int(0));
        *entry += coeff;
        if *entry == 0 {
            self.terms.retain(|_, coeff| *coeff != 0);
        }
    }
}

/// Emits `atom^exp` as an expression. Powers of a power fold their exponents, so that an opaque
/// reciprocal `b^-1` squared becomes `b^-2`.
fn atom_power(atom: &SymExpr, exp: i64) -> SymExpr {
    if exp == 1 {
        return atom.clone();
    }

    match atom {
        SymExpr::Exp(base, inner) => match inner.as_integer() {
            Some(k) => SymExpr::Exp(base.clone(), Box::new(SymExpr::int(k * exp))),
            None => {
                let exp = ((**inner).clone() * SymExpr::int(exp)).expand();
                SymExpr::Exp(base.clone(), Box::new(exp))
            },
        },
        _ => atom.clone().pow(exp),
    }
}

/// Returns `1 / atom^exp`. Inverting an opaque reciprocal gives back the sum it was built from.
fn invert_atom(atom: &SymExpr, exp: i64) -> Polynomial {
    if let SymExpr::Exp(base, inner) = atom {
        if inner.as_integer() == Some(-1) && exp > 0 {
            return Polynomial::from_expr(base).pow(exp);
        }
    }
    Polynomial::monomial(Monomial::from([(atom.clone(), -exp)]), int(1))
}

impl Add for Polynomial {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self::Output {
        for (monomial, coeff) in rhs.terms {
            self.add_term(monomial, coeff);
        }
        self
    }
}

impl Neg for Polynomial {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self.scale(&int(-1))
    }
}

impl Sub for Polynomial {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        self + -rhs
    }
}

impl Mul for &Polynomial {
    type Output = Polynomial;

    fn mul(self, rhs: Self) -> Self::Output {
        let mut result = Polynomial::zero();
        for (lhs_mono, lhs_coeff) in &self.terms {
            for (rhs_mono, rhs_coeff) in &rhs.terms {
                let mut monomial = lhs_mono.clone();
                for (atom, exp) in rhs_mono {
                    let entry = monomial.entry(atom.clone()).or_insert(0);
                    *entry += exp;
                    if *entry == 0 {
                        monomial.remove(atom);
                    }
                }
                result.add_term(monomial, Rational::from(lhs_coeff * rhs_coeff));
            }
        }
        result
    }
}

impl Mul for Polynomial {
    type Output = Polynomial;

    fn mul(self, rhs: Self) -> Self::Output {
        &self * &rhs
    }
}

impl SymExpr {
    /// Expands the expression into its canonical polynomial form.
    ///
    /// Two expressions that are equal as polynomials expand to structurally equal expressions.
    pub fn expand(&self) -> SymExpr {
        Polynomial::from_expr(self).to_expr()
    }

    /// Returns true if the expression is zero once expanded.
    pub fn is_zero_expanded(&self) -> bool {
        Polynomial::from_expr(self).is_zero()
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
    fn expand_product() {
        assert_eq!(parse_expr("(n + 1)(n - 1)").expand(), parse_expr("n^2 - 1").expand());
        assert_eq!(parse_expr("(n + 1)(n - 1)").expand().to_string(), "n^2 - 1");
    }

    #[test]
    fn cancels_terms() {
        let expr = parse_expr("T[n, k] + 2 T[n, k + 1] - T[n, k] - T[n, 1 + k]");
        assert_eq!(expr.expand(), parse_expr("T[n, k + 1]"));
    }

    #[test]
    fn monomials_divide_exactly() {
        assert_eq!(parse_expr("6 x^3 y / (3 x y)").expand(), parse_expr("2 x^2").expand());
        assert_eq!(parse_expr("x / x").expand(), SymExpr::one());
    }

    #[test]
    fn reciprocal_of_sum_is_opaque() {
        let lhs = parse_expr("1 / (2 x + 2)").expand();
        let rhs = parse_expr("(1/2) / (x + 1)").expand();
        assert_eq!(lhs, rhs);

        // multiplying back by the sum does not cancel, but inverting does
        let poly = Polynomial::from_expr(&lhs);
        assert_eq!(poly.recip(), Polynomial::from_expr(&parse_expr("2 x + 2")));
    }

    #[test]
    fn content_and_primitive_part() {
        let poly = Polynomial::from_expr(&parse_expr("-4 x - 6/5"));
        let (content, primitive) = poly.content();
        assert_eq!(content, crate::primitive::frac(-2, 5));
        assert_eq!(primitive, Polynomial::from_expr(&parse_expr("10 x + 3")));
    }

    #[test]
    fn split_linear() {
        let poly = Polynomial::from_expr(&parse_expr("3 n + k n + 2"));
        let n = SymExpr::symbol("n");
        let (linear, rest) = poly.split_linear(&n).unwrap();
        assert_eq!(linear.to_expr(), parse_expr("k + 3"));
        assert_eq!(rest.to_expr(), SymExpr::int(2));

        let quadratic = Polynomial::from_expr(&parse_expr("n^2 + 1"));
        assert_eq!(quadratic.split_linear(&n), None);

        let nested = Polynomial::from_expr(&parse_expr("T[n, 0]"));
        assert_eq!(nested.split_linear(&n), None);
    }
}
