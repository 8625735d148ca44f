use crate::symbolic::expr::SymExpr;
use recur_parser::parser::ast::equation::Equation as AstEquation;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A symbolic equation `lhs = rhs`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Equation {
    /// The left-hand side.
    pub lhs: SymExpr,

    /// The right-hand side.
    pub rhs: SymExpr,
}

impl Equation {
    /// Creates a new equation.
    pub fn new(lhs: SymExpr, rhs: SymExpr) -> Self {
        Self { lhs, rhs }
    }

    /// Substitutes simultaneously on both sides.
    pub fn subs(&self, pairs: &[(SymExpr, SymExpr)]) -> Self {
        Self::new(self.lhs.subs(pairs), self.rhs.subs(pairs))
    }

    /// Substitutes sequentially on both sides.
    pub fn subs_sequential(&self, pairs: &[(SymExpr, SymExpr)]) -> Self {
        Self::new(self.lhs.subs_sequential(pairs), self.rhs.subs_sequential(pairs))
    }

    /// Applies the function to both sides.
    pub fn map(&self, mut f: impl FnMut(&SymExpr) -> SymExpr) -> Self {
        Self::new(f(&self.lhs), f(&self.rhs))
    }

    /// Returns `lhs - rhs`, expanded.
    pub fn residual(&self) -> SymExpr {
        (self.lhs.clone() - self.rhs.clone()).expand()
    }
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.lhs, self.rhs)
    }
}

impl From<AstEquation> for Equation {
    fn from(eq: AstEquation) -> Self {
        Self::new(eq.lhs.into(), eq.rhs.into())
    }
}
