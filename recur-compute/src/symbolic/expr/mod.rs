//! A representation of mathematical expressions that is easier to manipulate than an AST.
//!
//! The [`Expr`](recur_parser::parser::ast::expr::Expr) type from `recur_parser` is a recursive
//! `enum` that represents the AST of an expression. It's convenient for parsing, but not so much
//! for algebraic manipulation.
//!
//! This module defines [`SymExpr`], which flattens the AST into lists of terms or factors. The
//! [`Add`], [`Mul`] and [`Neg`] operators build new nodes **without evaluating** them: adding two
//! expressions produces a sum containing both, flattened if either is already a sum, and nothing
//! else. This is the "non re-evaluating addition" that unfolding a recurrence relies on, since it
//! keeps the summands produced by each step visible. Use [`SymExpr::expand`] to obtain the
//! canonical polynomial form of an expression.
//!
//! # Structural equality
//!
//! The [`PartialEq`], [`Eq`], [`Ord`] and [`Hash`] implementations compare expressions
//! **structurally**: `n + 1` and `1 + n` are different expressions. Expressions that should be
//! compared semantically are expanded first; expanded expressions are canonical, which is what
//! makes them usable as keys of maps, such as the terms cache of a recurrence.
//!
//! # Indexed terms
//!
//! The subscripts of an indexed term (`T[n, k]`) and the arguments of a function application
//! (`f(n)`) are always kept expanded, so `T[4 + 1, 3]` and `T[5, 3]` are the same term. Build them
//! with [`SymExpr::indexed`] and [`SymExpr::call`], which take care of this.

mod iter;

use crate::primitive::{int, int_from_str};
pub use iter::ExprIter;
use recur_parser::parser::{
    ast::{expr::Expr as AstExpr, literal::Literal},
    token::op::{BinOpKind, UnaryOpKind},
    Precedence,
};
use rug::Rational;
use std::{
    collections::BTreeSet,
    fmt,
    ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single term / factor, such as a number, variable, indexed term, or function application.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Primary {
    /// An exact rational number, such as `2` or `-3/4`.
    Number(Rational),

    /// A variable, such as `n` or `k`.
    Symbol(String),

    /// A term of an indexed family, such as `T[n, k]`.
    Indexed(String, Vec<SymExpr>),

    /// An application of an undefined function, such as `f(n)`.
    Call(String, Vec<SymExpr>),
}

impl fmt::Display for Primary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(num) => write!(f, "{}", num),
            Self::Symbol(sym) => write!(f, "{}", sym),
            Self::Indexed(name, args) => {
                write!(f, "{}[", name)?;
                fmt_list(f, args)?;
                write!(f, "]")
            },
            Self::Call(name, args) => {
                write!(f, "{}(", name)?;
                fmt_list(f, args)?;
                write!(f, ")")
            },
        }
    }
}

/// Writes the expressions separated by commas.
fn fmt_list(f: &mut fmt::Formatter<'_>, items: &[SymExpr]) -> fmt::Result {
    let mut iter = items.iter();
    if let Some(item) = iter.next() {
        write!(f, "{}", item)?;
        for item in iter {
            write!(f, ", {}", item)?;
        }
    }
    Ok(())
}

/// A mathematical expression with information about its terms and factors.
///
/// For more information about this type, see the [module-level documentation](self).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SymExpr {
    /// A single term or factor.
    Primary(Primary),

    /// Multiple terms added together.
    Add(Vec<SymExpr>),

    /// Multiple factors multiplied together.
    Mul(Vec<SymExpr>),

    /// An expression raised to a power.
    Exp(Box<SymExpr>, Box<SymExpr>),
}

impl Default for SymExpr {
    fn default() -> Self {
        Self::zero()
    }
}

impl SymExpr {
    /// The number zero.
    pub fn zero() -> Self {
        Self::Primary(Primary::Number(int(0)))
    }

    /// The number one.
    pub fn one() -> Self {
        Self::Primary(Primary::Number(int(1)))
    }

    /// An integer.
    pub fn int(n: i64) -> Self {
        Self::Primary(Primary::Number(int(n)))
    }

    /// A rational number.
    pub fn number(n: Rational) -> Self {
        Self::Primary(Primary::Number(n))
    }

    /// A variable.
    pub fn symbol(name: impl Into<String>) -> Self {
        Self::Primary(Primary::Symbol(name.into()))
    }

    /// A term of an indexed family. The subscripts are expanded into canonical form.
    pub fn indexed(name: impl Into<String>, subscripts: Vec<SymExpr>) -> Self {
        let subscripts = subscripts.iter().map(SymExpr::expand).collect();
        Self::Primary(Primary::Indexed(name.into(), subscripts))
    }

    /// An application of an undefined function. The arguments are expanded into canonical form.
    pub fn call(name: impl Into<String>, args: Vec<SymExpr>) -> Self {
        let args = args.iter().map(SymExpr::expand).collect();
        Self::Primary(Primary::Call(name.into(), args))
    }

    /// Raises the expression to an integer power. No simplification is done.
    pub fn pow(self, exp: i64) -> Self {
        Self::Exp(Box::new(self), Box::new(Self::int(exp)))
    }

    /// Returns `1 / self`. No simplification is done.
    pub fn recip(self) -> Self {
        self.pow(-1)
    }

    /// If the expression is a [`Primary::Number`], returns a reference to the contained number.
    pub fn as_number(&self) -> Option<&Rational> {
        match self {
            Self::Primary(Primary::Number(num)) => Some(num),
            _ => None,
        }
    }

    /// If the expression is an integer that fits in an [`i64`], returns it.
    pub fn as_integer(&self) -> Option<i64> {
        self.as_number().and_then(crate::primitive::as_i64)
    }

    /// Returns true if the expression is **structurally** the number zero.
    pub fn is_zero(&self) -> bool {
        self.as_number().map_or(false, |num| *num == 0)
    }

    /// If the expression is a [`Primary::Symbol`], returns a reference to the contained symbol.
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Self::Primary(Primary::Symbol(sym)) => Some(sym),
            _ => None,
        }
    }

    /// If the expression is a [`Primary::Indexed`], returns its family name and subscripts.
    pub fn as_indexed(&self) -> Option<(&str, &[SymExpr])> {
        match self {
            Self::Primary(Primary::Indexed(name, args)) => Some((name, args)),
            _ => None,
        }
    }

    /// Trivially downgrades the expression into a simpler form.
    ///
    /// Some operations may result in an [`SymExpr::Add`] with zero / one term, or an
    /// [`SymExpr::Mul`] with zero / one factor. This function checks for these cases and
    /// simplifies the expression into the single term / factor, or the number 0 or 1.
    pub fn downgrade(self) -> Self {
        match self {
            Self::Add(mut terms) => {
                if terms.is_empty() {
                    Self::zero()
                } else if terms.len() == 1 {
                    terms.remove(0)
                } else {
                    Self::Add(terms)
                }
            },
            Self::Mul(mut factors) => {
                if factors.is_empty() {
                    Self::one()
                } else if factors.len() == 1 {
                    factors.remove(0)
                } else {
                    Self::Mul(factors)
                }
            },
            _ => self,
        }
    }

    /// Returns an iterator that traverses the tree of expressions in left-to-right post-order
    /// (i.e. depth-first).
    pub fn post_order_iter(&self) -> ExprIter {
        ExprIter::new(self)
    }

    /// Returns true if `target` appears anywhere in this expression, including inside subscripts
    /// and function arguments.
    pub fn contains(&self, target: &SymExpr) -> bool {
        self.post_order_iter().any(|expr| expr == target)
    }

    /// Returns true if a term of the family with the given name appears anywhere in this
    /// expression.
    pub fn contains_family(&self, family: &str) -> bool {
        self.post_order_iter().any(|expr| match expr {
            Self::Primary(Primary::Indexed(name, _) | Primary::Call(name, _)) => name == family,
            _ => false,
        })
    }

    /// Returns the names of the variables appearing in this expression.
    pub fn free_symbols(&self) -> BTreeSet<&str> {
        self.post_order_iter()
            .filter_map(SymExpr::as_symbol)
            .collect()
    }

    /// Returns the precedence of the expression when printed, or [`None`] if it never needs
    /// parentheses.
    pub(crate) fn precedence(&self) -> Option<Precedence> {
        match self {
            Self::Primary(Primary::Number(num)) => {
                if *num.denom() != 1 {
                    Some(BinOpKind::Div.precedence())
                } else if *num < 0 {
                    Some(UnaryOpKind::Neg.precedence())
                } else {
                    None
                }
            },
            Self::Primary(_) => None,
            Self::Add(_) => Some(BinOpKind::Add.precedence()),
            Self::Mul(_) => Some(BinOpKind::Mul.precedence()),
            Self::Exp(_, _) => Some(BinOpKind::Exp.precedence()),
        }
    }

    /// Returns true if this expression must be wrapped in parentheses when it appears as an
    /// operand of an operation with the given precedence.
    pub(crate) fn needs_parens(&self, parent: Precedence) -> bool {
        self.precedence().map_or(false, |own| own <= parent)
    }

    /// Splits a leading negative sign off the expression, for printing sums with `-`.
    pub(crate) fn split_sign(&self) -> Option<SymExpr> {
        match self {
            Self::Primary(Primary::Number(num)) if *num < 0 => {
                Some(Self::number(-num.clone()))
            },
            Self::Mul(factors) => {
                let (first, rest) = factors.split_first()?;
                let num = first.as_number().filter(|num| **num < 0)?;
                let abs = -num.clone();
                if abs == 1 {
                    Some(Self::Mul(rest.to_vec()).downgrade())
                } else {
                    let mut factors = vec![Self::number(abs)];
                    factors.extend(rest.iter().cloned());
                    Some(Self::Mul(factors))
                }
            },
            _ => None,
        }
    }
}

impl fmt::Display for SymExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary(primary) => write!(f, "{}", primary),
            Self::Add(terms) => {
                for (i, term) in terms.iter().enumerate() {
                    match (i, term.split_sign()) {
                        (0, Some(abs)) => write!(f, "-{}", Paren(&abs, BinOpKind::Mul.precedence()))?,
                        (0, None) => write!(f, "{}", term)?,
                        (_, Some(abs)) => write!(f, " - {}", Paren(&abs, BinOpKind::Add.precedence()))?,
                        (_, None) => write!(f, " + {}", term)?,
                    }
                }
                Ok(())
            },
            Self::Mul(factors) => {
                let precedence = BinOpKind::Mul.precedence();
                let mut iter = factors.iter();
                match iter.next() {
                    Some(first) if first.as_number().map_or(false, |num| *num == -1) && factors.len() > 1 => {
                        write!(f, "-")?;
                        if let Some(second) = iter.next() {
                            write!(f, "{}", Paren(second, precedence))?;
                        }
                    },
                    Some(first) => write!(f, "{}", Paren(first, precedence))?,
                    None => return write!(f, "1"),
                }
                for factor in iter {
                    write!(f, " * {}", Paren(factor, precedence))?;
                }
                Ok(())
            },
            Self::Exp(base, exp) => {
                let precedence = BinOpKind::Exp.precedence();
                write!(f, "{}^", Paren(base, precedence))?;
                match exp.as_integer() {
                    Some(n) => write!(f, "{}", n),
                    None => write!(f, "{}", Paren(exp, precedence)),
                }
            },
        }
    }
}

/// Prints an expression, wrapped in parentheses if it binds looser than the given precedence.
struct Paren<'a>(&'a SymExpr, Precedence);

impl fmt::Display for Paren<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.needs_parens(self.1) {
            write!(f, "({})", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl From<AstExpr> for SymExpr {
    fn from(expr: AstExpr) -> Self {
        match expr {
            AstExpr::Literal(Literal::Integer(int)) => Self::number(Rational::from(int_from_str(&int.value))),
            AstExpr::Literal(Literal::Symbol(sym)) => Self::symbol(sym.name),
            AstExpr::Paren(paren) => Self::from(*paren.expr),
            AstExpr::Call(call) => {
                let args = call.args.into_iter().map(Self::from).collect();
                Self::call(call.name.name, args)
            },
            AstExpr::Index(index) => {
                let subscripts = index.indices.into_iter().map(Self::from).collect();
                Self::indexed(index.name.name, subscripts)
            },
            AstExpr::Unary(unary) => match unary.op.kind {
                UnaryOpKind::Neg => -Self::from(*unary.operand),
            },
            AstExpr::Binary(bin) => {
                let lhs = Self::from(*bin.lhs);
                let rhs = Self::from(*bin.rhs);
                match bin.op.kind {
                    BinOpKind::Add => lhs + rhs,
                    BinOpKind::Sub => lhs - rhs,
                    BinOpKind::Mul => lhs * rhs,
                    // treat this as lhs * rhs^-1
                    BinOpKind::Div => lhs * rhs.recip(),
                    BinOpKind::Exp => Self::Exp(Box::new(lhs), Box::new(rhs)),
                }
            },
        }
    }
}

/// Adds two [`SymExpr`]s together. No simplification is done, except for adding two numbers, and
/// the case where the operands are a mix of [`Primary`] and / or [`SymExpr::Add`], in which case
/// both are combined in one list of terms (flattening).
impl Add for SymExpr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Self::Primary(Primary::Number(lhs)), Self::Primary(Primary::Number(rhs))) => {
                Self::number(lhs + rhs)
            },
            (Self::Add(mut terms), Self::Add(rhs_terms)) => {
                terms.extend(rhs_terms);
                Self::Add(terms)
            },
            (Self::Add(mut terms), other) => {
                terms.push(other);
                Self::Add(terms)
            },
            (other, Self::Add(terms)) => {
                let mut new_terms = Vec::with_capacity(terms.len() + 1);
                new_terms.push(other);
                new_terms.extend(terms);
                Self::Add(new_terms)
            },
            (lhs, rhs) => Self::Add(vec![lhs, rhs]),
        }
    }
}

impl AddAssign for SymExpr {
    fn add_assign(&mut self, rhs: Self) {
        let lhs = std::mem::take(self);
        *self = lhs + rhs;
    }
}

impl Sub for SymExpr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        self + -rhs
    }
}

/// Multiplies two [`SymExpr`]s together. No simplification is done, except for multiplying two
/// numbers, and the case where the operands are a mix of [`Primary`] and / or [`SymExpr::Mul`],
/// in which case both are combined in one list of factors (flattening).
impl Mul for SymExpr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        match (self, rhs) {
            (Self::Primary(Primary::Number(lhs)), Self::Primary(Primary::Number(rhs))) => {
                Self::number(lhs * rhs)
            },
            (Self::Mul(mut factors), Self::Mul(other)) => {
                factors.extend(other);
                Self::Mul(factors)
            },
            (Self::Mul(mut factors), other) => {
                factors.push(other);
                Self::Mul(factors)
            },
            (other, Self::Mul(factors)) => {
                let mut new_factors = Vec::with_capacity(factors.len() + 1);
                new_factors.push(other);
                new_factors.extend(factors);
                Self::Mul(new_factors)
            },
            (lhs, rhs) => Self::Mul(vec![lhs, rhs]),
        }
    }
}

impl MulAssign for SymExpr {
    fn mul_assign(&mut self, rhs: Self) {
        let lhs = std::mem::take(self);
        *self = lhs * rhs;
    }
}

/// Multiplies this expression by -1. No simplification is done, except for the case where the
/// expression is a number, in which case the number is negated.
impl Neg for SymExpr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        match self {
            Self::Primary(Primary::Number(num)) => Self::number(-num),
            expr => Self::int(-1) * expr,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use recur_parser::parser::Parser;
    use super::*;

    /// Parse the given expression and return the [`SymExpr`] representation.
    fn parse_expr(input: &str) -> SymExpr {
        let expr = Parser::new(input).try_parse_full::<AstExpr>().unwrap();
        SymExpr::from(expr)
    }

    #[test]
    fn flattened_sum() {
        let expr = parse_expr("x + (y + z)");
        assert_eq!(expr, SymExpr::Add(vec![
            SymExpr::symbol("x"),
            SymExpr::symbol("y"),
            SymExpr::symbol("z"),
        ]));
    }

    #[test]
    fn subscripts_are_canonical() {
        assert_eq!(parse_expr("T[4 + 1, 3]"), parse_expr("T[5, 3]"));
        assert_eq!(parse_expr("T[k + 1 - 1, n]"), SymExpr::indexed("T", vec![
            SymExpr::symbol("k"),
            SymExpr::symbol("n"),
        ]));
    }

    #[test]
    fn non_evaluating_addition() {
        let a = parse_expr("T[n, k]");
        let sum = a.clone() + a.clone();
        assert_eq!(sum, SymExpr::Add(vec![a.clone(), a]));
    }

    #[test]
    fn subtraction_and_division() {
        let expr = parse_expr("a - b/2");
        assert_eq!(expr, SymExpr::Add(vec![
            SymExpr::symbol("a"),
            SymExpr::Mul(vec![
                SymExpr::int(-1),
                SymExpr::symbol("b"),
                SymExpr::int(2).recip(),
            ]),
        ]));
    }

    #[test]
    fn contains_looks_into_subscripts() {
        let expr = parse_expr("3 T[n + 1, k]");
        assert!(expr.contains(&SymExpr::symbol("n")));
        assert!(expr.contains_family("T"));
        assert!(!expr.contains_family("d"));
        assert_eq!(expr.free_symbols().into_iter().collect::<Vec<_>>(), vec!["k", "n"]);
    }

    #[test]
    fn fmt_expr() {
        let expr = parse_expr("T[n, k] - 2 T[n, k + 1] + x^2 (y + 1)");
        assert_eq!(expr.to_string(), "T[n, k] - 2 * T[n, k + 1] + x^2 * (y + 1)");
    }
}
