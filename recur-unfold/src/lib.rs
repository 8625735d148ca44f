//! Unfolding and factorization of recurrence relations over indexed families of terms.
//!
//! This crate works on two kinds of objects:
//!
//! - [`RecurrenceSpec`]: a single recurrence such as `f[n + 2] = f[n + 1] + f[n]`, which can be
//! rewritten according to itself ([`RecurrenceSpec::unfold`]), instantiated at a base, and
//! presented in LaTeX. Every unfolded term is remembered in a terms cache, so the same term is
//! never unfolded twice.
//! - [`MatrixSpec`]: a lower triangular matrix of unknown entries `T[r, c]`, filled row by row by
//! a pair of recurrences ([`Sequences`]), run backwards ([`invert_rec`]) or factored as a weighted
//! sum of matrices, one per free variable ([`factorize_matrix_as_matrices_sum`]).
//!
//! Long computations report their progress to a [`StepCollector`], and log through the [`log`]
//! facade; this crate never installs a logger.
//!
//! # Example
//!
//! Filling Pascal's triangle from its top entry:
//!
//! ```
//! use recur_compute::symbolic::{Equation, Family, SymExpr};
//! use recur_parser::parser::{ast::equation::Equation as AstEquation, Parser};
//! use recur_unfold::{unfold_in_matrix, MatrixSpec, Sequences, UnfoldOptions};
//!
//! let parse = |input: &str| Equation::from(Parser::new(input).try_parse_full::<AstEquation>().unwrap());
//! let family = Family::Indexed("T".to_string());
//! let seqs = Sequences::new(
//!     family.clone(),
//!     parse("T[n + 1, k + 1] = T[n, k] + T[n, k + 1]"),
//!     Some(parse("T[n + 1, 0] = T[n, 0]")),
//! );
//!
//! let spec = MatrixSpec::symbolic(4, 4, family);
//! let (unfolded, _) = unfold_in_matrix(&spec, &seqs, &UnfoldOptions::default(), &mut ()).unwrap();
//! let t00 = spec.member(0, 0);
//! assert_eq!(unfolded.matrix[(3, 1)].expand(), (SymExpr::int(3) * t00).expand());
//! ```

pub mod destructure;
pub mod error;
pub mod factorize;
pub mod gf;
pub mod hockey_stick;
pub mod instantiate;
pub mod inversion;
pub mod latex;
pub mod location;
pub mod matrix;
pub mod notation;
pub mod options;
pub mod recurrence;
pub mod sequence;
pub mod step;
pub mod unfold;

pub use destructure::{destructure, explode, Operator};
pub use factorize::{
    adjust_expansion,
    apply_factor_inside_matrix,
    check_matrix_expansion,
    extract_inner_matrices,
    factorize_matrix_as_matrices_sum,
    instantiate_factorization,
    Expansion,
    ExpansionKey,
    Factorization,
    InstantiatedFactorization,
};
pub use gf::{build_rec_from_gf, make_abstract_a_sequence};
pub use hockey_stick::{make_pascal_hockey_stick_recurrence, HockeyStick};
pub use instantiate::Subsume;
pub use inversion::invert_rec;
pub use latex::{clean_up_zeros, latex_array_env, latex_of_matrix_expansion, LatexOptions};
pub use location::FreeVarsLocation;
pub use matrix::{symbolic_matrix, MatrixSpec, Substitutions};
pub use notation::{to_matrix_notation, MatrixNotation};
pub use options::{FixpointOptions, UnfoldOptions};
pub use recurrence::{RecurrenceSpec, TermsCache};
pub use sequence::{Sequence, SequenceKind, Sequences};
pub use step::{Step, StepCollector};
pub use unfold::{max_column_subscript, unfold_cell, unfold_in_matrix};
