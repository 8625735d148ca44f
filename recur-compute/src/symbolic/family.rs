use crate::symbolic::{
    error::UnsupportedFamily,
    expr::{Primary, SymExpr},
};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A family of terms parameterized by indices, such as the entries `T[n, k]` of a triangle, or
/// the values `f(n)` of a sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Family {
    /// An indexed base, applied with square brackets: `T[n, k]`.
    Indexed(String),

    /// An undefined function, applied with parentheses: `f(n)`.
    Function(String),
}

impl Family {
    /// Returns the name of the family.
    pub fn name(&self) -> &str {
        match self {
            Self::Indexed(name) | Self::Function(name) => name,
        }
    }

    /// Builds the member of the family at the given indices.
    pub fn apply(&self, indices: Vec<SymExpr>) -> SymExpr {
        match self {
            Self::Indexed(name) => SymExpr::indexed(name.clone(), indices),
            Self::Function(name) => SymExpr::call(name.clone(), indices),
        }
    }

    /// If the expression is a member of this family, returns its indices.
    pub fn indices_of<'a>(&self, expr: &'a SymExpr) -> Option<&'a [SymExpr]> {
        match (self, expr) {
            (Self::Indexed(name), SymExpr::Primary(Primary::Indexed(other, args)))
            | (Self::Function(name), SymExpr::Primary(Primary::Call(other, args)))
                if name == other => Some(args.as_slice()),
            _ => None,
        }
    }

    /// Returns true if the expression is a member of this family.
    pub fn matches(&self, expr: &SymExpr) -> bool {
        self.indices_of(expr).is_some()
    }

    /// Returns true if any member of this family appears in the expression.
    pub fn occurs_in(&self, expr: &SymExpr) -> bool {
        expr.post_order_iter().any(|sub| self.matches(sub))
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Recovers the family of an indexed term or function application.
impl TryFrom<&SymExpr> for Family {
    type Error = UnsupportedFamily;

    fn try_from(expr: &SymExpr) -> Result<Self, Self::Error> {
        match expr {
            SymExpr::Primary(Primary::Indexed(name, _)) => Ok(Self::Indexed(name.clone())),
            SymExpr::Primary(Primary::Call(name, _)) => Ok(Self::Function(name.clone())),
            _ => Err(UnsupportedFamily { expr: expr.to_string() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn apply_and_recognize() {
        let family = Family::Indexed("d".to_string());
        let term = family.apply(vec![SymExpr::int(3), SymExpr::symbol("k")]);
        assert_eq!(family.indices_of(&term), Some(&[SymExpr::int(3), SymExpr::symbol("k")][..]));
        assert!(!Family::Function("d".to_string()).matches(&term));
        assert!(family.occurs_in(&(SymExpr::int(2) * term.clone())));
        assert_eq!(Family::try_from(&term), Ok(family));
    }

    #[test]
    fn unsupported() {
        let err = Family::try_from(&SymExpr::symbol("x")).unwrap_err();
        assert_eq!(err.expr, "x");
    }
}
