//! LaTeX output for expressions and equations.

use crate::symbolic::{
    equation::Equation,
    expr::{Primary, SymExpr},
};
use recur_parser::parser::{fmt::Latex, token::op::BinOpKind, Precedence};
use rug::Rational;
use std::fmt::{Formatter, Result};

/// Writes the expression, wrapped in `\left(` and `\right)` if it binds looser than the given
/// precedence.
fn fmt_operand(f: &mut Formatter, expr: &SymExpr, parent: Precedence) -> Result {
    if expr.needs_parens(parent) {
        write!(f, "\\left(")?;
        expr.fmt_latex(f)?;
        write!(f, "\\right)")
    } else {
        expr.fmt_latex(f)
    }
}

/// Writes the factors next to each other. Two numbers in a row are separated with `\cdot`.
fn fmt_product(f: &mut Formatter, factors: &[SymExpr]) -> Result {
    let precedence = BinOpKind::Mul.precedence();
    for (i, factor) in factors.iter().enumerate() {
        if i > 0 {
            if factor.as_number().is_some() {
                write!(f, " \\cdot ")?;
            } else {
                write!(f, " ")?;
            }
        }
        fmt_operand(f, factor, precedence)?;
    }
    if factors.is_empty() {
        write!(f, "1")?;
    }
    Ok(())
}

fn fmt_number(f: &mut Formatter, num: &Rational) -> Result {
    if *num.denom() == 1 {
        write!(f, "{}", num)
    } else if *num < 0 {
        write!(f, "-\\frac{{{}}}{{{}}}", -num.numer().clone(), num.denom())
    } else {
        write!(f, "\\frac{{{}}}{{{}}}", num.numer(), num.denom())
    }
}

fn fmt_list(f: &mut Formatter, items: &[SymExpr]) -> Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ",")?;
        }
        item.fmt_latex(f)?;
    }
    Ok(())
}

impl Latex for Primary {
    fn fmt_latex(&self, f: &mut Formatter) -> Result {
        match self {
            Self::Number(num) => fmt_number(f, num),
            Self::Symbol(sym) => write!(f, "{}", sym),
            Self::Indexed(name, args) => {
                write!(f, "{}_{{", name)?;
                fmt_list(f, args)?;
                write!(f, "}}")
            },
            Self::Call(name, args) => {
                write!(f, "{}\\left(", name)?;
                fmt_list(f, args)?;
                write!(f, "\\right)")
            },
        }
    }
}

impl Latex for SymExpr {
    fn fmt_latex(&self, f: &mut Formatter) -> Result {
        match self {
            Self::Primary(primary) => primary.fmt_latex(f),
            Self::Add(terms) => {
                for (i, term) in terms.iter().enumerate() {
                    match term.split_sign() {
                        Some(abs) => {
                            write!(f, "{}", if i == 0 { "-" } else { " - " })?;
                            fmt_operand(f, &abs, BinOpKind::Add.precedence())?;
                        },
                        None => {
                            if i > 0 {
                                write!(f, " + ")?;
                            }
                            term.fmt_latex(f)?;
                        },
                    }
                }
                Ok(())
            },
            Self::Mul(factors) => {
                let mut negative = false;
                let mut numer = Vec::new();
                let mut denom = Vec::new();
                for factor in factors {
                    match factor {
                        Self::Primary(Primary::Number(num)) => {
                            negative ^= *num < 0;
                            let abs = Rational::from(num.abs_ref());
                            if *abs.numer() != 1 {
                                numer.push(SymExpr::number(Rational::from(abs.numer().clone())));
                            }
                            if *abs.denom() != 1 {
                                denom.push(SymExpr::number(Rational::from(abs.denom().clone())));
                            }
                        },
                        Self::Exp(base, exp) => match exp.as_integer() {
                            Some(-1) => denom.push((**base).clone()),
                            Some(n) if n < 0 => denom.push((**base).clone().pow(-n)),
                            _ => numer.push(factor.clone()),
                        },
                        _ => numer.push(factor.clone()),
                    }
                }

                if negative {
                    write!(f, "-")?;
                }
                if denom.is_empty() {
                    fmt_product(f, &numer)
                } else {
                    write!(f, "\\frac{{")?;
                    fmt_product(f, &numer)?;
                    write!(f, "}}{{")?;
                    fmt_product(f, &denom)?;
                    write!(f, "}}")
                }
            },
            Self::Exp(base, exp) => match exp.as_integer() {
                Some(n) if n < 0 => {
                    write!(f, "\\frac{{1}}{{")?;
                    if n == -1 {
                        base.fmt_latex(f)?;
                    } else {
                        (**base).clone().pow(-n).fmt_latex(f)?;
                    }
                    write!(f, "}}")
                },
                _ => {
                    fmt_operand(f, base, BinOpKind::Exp.precedence())?;
                    write!(f, "^{{")?;
                    exp.fmt_latex(f)?;
                    write!(f, "}}")
                },
            },
        }
    }
}

impl Latex for Equation {
    fn fmt_latex(&self, f: &mut Formatter) -> Result {
        self.lhs.fmt_latex(f)?;
        write!(f, " = ")?;
        self.rhs.fmt_latex(f)
    }
}
