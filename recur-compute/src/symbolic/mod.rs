//! Algebraic manipulation of expressions over indexed families of terms.
//!
//! # Expression representation
//!
//! Expressions are represented as a tree of [`SymExpr`] nodes. It's similar to the
//! [`recur_parser::parser::ast::expr::Expr`] nodes produced by [`recur_parser`], with the main
//! difference being that [`SymExpr`] nodes **flatten** out the tree structure: `x + (y + z)` is a
//! single [`SymExpr::Add`] node with three children.
//!
//! ```
//! use recur_compute::symbolic::{Primary, SymExpr};
//! use recur_parser::parser::{ast::expr::Expr, Parser};
//!
//! let mut parser = Parser::new("x + (y + z)");
//! let ast_expr = parser.try_parse_full::<Expr>().unwrap();
//!
//! let expr: SymExpr = ast_expr.into();
//! assert_eq!(expr, SymExpr::Add(vec![
//!     SymExpr::Primary(Primary::Symbol("x".to_string())),
//!     SymExpr::Primary(Primary::Symbol("y".to_string())),
//!     SymExpr::Primary(Primary::Symbol("z".to_string())),
//! ]));
//! ```
//!
//! # Canonical form
//!
//! Combining like terms is done by [`SymExpr::expand`], which goes through the canonical
//! [`Polynomial`] form: a sum of monomials with exact rational coefficients. Everything that
//! needs to compare expressions semantically (solving, collecting, checking a factorization)
//! does so on the canonical form.

pub mod collect;
pub mod equation;
pub mod error;
pub mod expr;
pub mod family;
pub mod fmt;
pub mod matrix;
pub mod poly;
pub mod series;
pub mod solve;
mod subs;

pub use collect::{collect, factor_terms, linear_coefficient, Collected};
pub use equation::Equation;
pub use expr::{Primary, SymExpr};
pub use family::Family;
pub use matrix::SymMatrix;
pub use poly::{Monomial, Polynomial};
pub use series::series_coefficients;
pub use solve::{solve_linear, solve_linear_system};
