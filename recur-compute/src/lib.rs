//! The symbolic engine behind the recurrence unfolding toolkit.
//!
//! This crate provides exactly the capabilities needed to manipulate recurrence relations over
//! indexed families of terms: an expression tree ([`symbolic::SymExpr`]), a canonical polynomial
//! form with exact rational coefficients ([`symbolic::poly::Polynomial`]), substitution, linear
//! solving, truncated power series, coefficient collection, symbolic matrices, and LaTeX output.
//! It is not a general computer algebra system.

pub mod primitive;
pub mod symbolic;
