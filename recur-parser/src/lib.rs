//! Tokenizer and parser for the small expression language used to write down recurrence
//! relations, such as `T[n + 1, k + 1] = T[n, k] + T[n, k + 1]`.
//!
//! The parser produces a plain abstract syntax tree with source spans; turning it into a symbolic
//! expression is the job of `recur-compute`.

pub mod parser;
pub mod tokenizer;
