//! Factoring an unfolded triangle as a weighted sum of matrices.
//!
//! Unfolding a whole triangle expresses every entry through its first entry. Unfolding only the
//! rows from `length` on instead expresses the lower part of the triangle through the entries of
//! row `length - 1`; the upper chunk of `length` rows is then rewritten so that everything depends
//! on `length` **free variables** only, placed according to a [`FreeVarsLocation`]. Collecting
//! the entries with respect to the free variables gives one matrix per variable:
//!
//! ```text
//! M = v_0 M_0 + v_1 M_1 + ... + v_{length-1} M_{length-1}
//! ```
//!
//! The free variables other than the first are themselves entries of the fully unfolded
//! triangle. Those **dependencies** bring the expansion back to the fully unfolded matrix, which
//! is how a factorization is verified.

use crate::error::{ExpansionMismatch, LengthExceedsRows, MissingFreeVariable};
use crate::inversion::invert_rec;
use crate::location::FreeVarsLocation;
use crate::matrix::{as_pairs, MatrixSpec, Substitutions};
use crate::options::UnfoldOptions;
use crate::sequence::Sequences;
use crate::step::{Step, StepCollector};
use crate::unfold::unfold_in_matrix;
use log::debug;
use recur_compute::symbolic::{collect, factor_terms, linear_coefficient, Family, SymExpr, SymMatrix};
use recur_error::Error;
use recur_parser::parser::fmt::Latex;
use std::{collections::BTreeMap, fmt};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The weight of a matrix in an expansion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ExpansionKey {
    /// The matrix is weighted by a free variable.
    Variable(SymExpr),

    /// The free variables placed on the main diagonal, added as they are.
    Diagonal,

    /// The parts of the matrices of the free variables to the left of their column, already
    /// weighted, added as they are.
    Mixed,
}

impl ExpansionKey {
    /// Returns the factor the matrix is multiplied by in the weighted sum.
    pub fn weight(&self) -> SymExpr {
        match self {
            Self::Variable(var) => var.clone(),
            Self::Diagonal | Self::Mixed => SymExpr::one(),
        }
    }
}

impl fmt::Display for ExpansionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Variable(var) => write!(f, "{}", var),
            Self::Diagonal => write!(f, "diagonal"),
            Self::Mixed => write!(f, "mixed"),
        }
    }
}

impl Latex for ExpansionKey {
    fn fmt_latex(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Variable(var) => var.fmt_latex(f),
            Self::Diagonal => write!(f, "\\mathrm{{diagonal}}"),
            Self::Mixed => write!(f, "\\mathrm{{mixed}}"),
        }
    }
}

/// Matrices keyed by their weight in a weighted sum.
pub type Expansion = BTreeMap<ExpansionKey, SymMatrix>;

/// The result of factoring a matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Factorization {
    /// The fully unfolded matrix, as the coefficient matrix of its first entry.
    pub unfolded: Expansion,

    /// The matrix unfolded from row `length` on, with its upper chunk rewritten through the free
    /// variables.
    pub splitted: SymMatrix,

    /// The matrix unfolded from row `length` on, before the upper chunk is rewritten.
    pub dirty_splitted: SymMatrix,

    /// One coefficient matrix per free variable.
    pub expansion: Expansion,

    /// The values of the free variables but the first one in the fully unfolded matrix.
    pub dependencies: Substitutions,

    /// The family of the entries.
    pub family: Family,
}

/// A factorization with numbers in place of the free variables.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InstantiatedFactorization {
    /// The coefficient matrix of the unfolded matrix, with its instantiated weight.
    pub unfolded: Vec<(SymExpr, SymMatrix)>,

    /// The split matrix, with the dependencies and initial values substituted and expanded.
    pub splitted: SymMatrix,

    /// The expansion, with the dependencies substituted into the weights.
    pub expansion: Vec<(SymExpr, SymMatrix)>,

    /// The dependencies, with the initial values substituted.
    pub dependencies: Substitutions,

    /// The family of the entries.
    pub family: Family,
}

/// Rewrites the first `length` rows of the split matrix through the free variables, and collects
/// every entry with respect to them.
fn unfold_upper_chunk(
    splitted: &MatrixSpec,
    seqs: &Sequences,
    options: &UnfoldOptions,
    length: usize,
    step_collector: &mut dyn StepCollector<Step>,
) -> Result<MatrixSpec, Error> {
    let chunk_options = options.clone().unfolding_rows(length);
    let (chunk, substitutions) = match options.location.start_column() {
        Some(col) => {
            let chunk_options = chunk_options.start(1, col).adjust_end(true);
            unfold_in_matrix(splitted, seqs, &chunk_options, step_collector)?
        },
        None => (
            splitted.clone(),
            invert_rec(splitted, seqs, &chunk_options, step_collector)?,
        ),
    };

    let variables = chunk.free_variables(length, options.location);
    let pairs = as_pairs(&substitutions);
    Ok(MatrixSpec::new(
        chunk.matrix.map(|entry| collect(&entry.subs(&pairs), &variables).to_expr()),
        chunk.family,
    ))
}

/// Factors the matrix as a weighted sum of `length` matrices, one per free variable.
///
/// `length` defaults to the number of rows, and cannot exceed it. With `perform_check`, the
/// expansion is verified against the fully unfolded matrix (see [`check_matrix_expansion`]).
pub fn factorize_matrix_as_matrices_sum(
    spec: &MatrixSpec,
    seqs: &Sequences,
    length: Option<usize>,
    perform_check: bool,
    options: &UnfoldOptions,
    step_collector: &mut dyn StepCollector<Step>,
) -> Result<Factorization, Error> {
    let rows = spec.matrix.rows();
    let length = length.unwrap_or(rows);
    if length > rows {
        return Err(LengthExceedsRows { length, rows }.into());
    }
    debug!("factoring a {}x{} matrix with {} free variables on {}", rows, spec.matrix.cols(), length, options.location);

    let (unfolded, _) = unfold_in_matrix(spec, seqs, options, step_collector)?;
    let split_options = UnfoldOptions { row_start: length, ..options.clone() };
    let (splitted, _) = unfold_in_matrix(spec, seqs, &split_options, step_collector)?;
    let clean = unfold_upper_chunk(&splitted, seqs, options, length, step_collector)?;

    let offset = options.diagonal_col_offset;
    let expansion = extract_inner_matrices(&clean, length, offset, options.location);
    let dependencies = options.location.dependencies(&unfolded, length);
    if perform_check {
        check_matrix_expansion(&unfolded, &expansion, &dependencies)?;
    }

    Ok(Factorization {
        unfolded: extract_inner_matrices(&unfolded, 1, offset, options.location),
        splitted: clean.matrix,
        dirty_splitted: splitted.matrix,
        expansion,
        dependencies,
        family: spec.family.clone(),
    })
}

/// Returns the coefficient matrix of every free variable of the first `unfolding_rows` rows.
///
/// The coefficient of a variable in an entry is taken with every other variable set to zero. An
/// entry that is not a multiple of the variable then, or that lies above the triangle, has
/// coefficient zero.
pub fn extract_inner_matrices(
    spec: &MatrixSpec,
    unfolding_rows: usize,
    diagonal_col_offset: usize,
    location: FreeVarsLocation,
) -> Expansion {
    let variables = spec.free_variables(unfolding_rows, location);
    let (rows, cols) = (spec.matrix.rows(), spec.matrix.cols());

    variables
        .iter()
        .map(|var| {
            let others = variables
                .iter()
                .filter(|other| *other != var)
                .map(|other| (other.clone(), SymExpr::zero()))
                .collect::<Vec<_>>();
            let nullable = spec.matrix.subs(&others);
            let inner = SymMatrix::from_fn(rows, cols, |r, c| {
                if r * diagonal_col_offset < c {
                    return SymExpr::zero();
                }
                linear_coefficient(&nullable[(r, c)], var).unwrap_or_default()
            });
            (ExpansionKey::Variable(var.clone()), inner)
        })
        .collect()
}

/// Verifies that the weighted sum of the expansion, with the initial values substituted, is the
/// given matrix.
///
/// Returns an [`ExpansionMismatch`] naming the first entry, in row-major order, that differs.
pub fn check_matrix_expansion(
    spec: &MatrixSpec,
    expansion: &Expansion,
    inits: &Substitutions,
) -> Result<(), Error> {
    let mut sum = SymMatrix::zeros(spec.matrix.rows(), spec.matrix.cols());
    for (key, matrix) in expansion {
        sum = sum.add(&matrix.scale(&key.weight()))?;
    }
    let sum = sum.subs(&as_pairs(inits));

    for ((r, c), entry) in spec.matrix.iter() {
        let expected = entry.expand();
        let found = sum[(r, c)].expand();
        if expected != found {
            return Err(ExpansionMismatch {
                row: r,
                col: c,
                expected: expected.to_string(),
                found: found.to_string(),
            }.into());
        }
    }
    Ok(())
}

/// Returns the default initial values: the first entry of the triangle is `1`.
fn default_inits(family: &Family) -> Substitutions {
    Substitutions::from([(family.apply(vec![SymExpr::zero(), SymExpr::zero()]), SymExpr::one())])
}

/// Substitutes the initial values (by default, `1` for the first entry of the triangle) into the
/// factorization.
///
/// With `perform_check`, every weighted coefficient matrix of the unfolded matrix must equal the
/// instantiated split matrix.
pub fn instantiate_factorization(
    factorization: &Factorization,
    inits: Option<&Substitutions>,
    perform_check: bool,
) -> Result<InstantiatedFactorization, Error> {
    let default = default_inits(&factorization.family);
    let init_pairs = as_pairs(inits.unwrap_or(&default));

    let dependencies = factorization.dependencies
        .iter()
        .map(|(member, value)| (member.clone(), value.subs(&init_pairs)))
        .collect::<Substitutions>();
    let dependency_pairs = as_pairs(&dependencies);

    let splitted = factorization.splitted
        .subs(&dependency_pairs)
        .subs(&init_pairs)
        .expand();
    let unfolded = factorization.unfolded
        .iter()
        .map(|(key, matrix)| (key.weight().subs(&init_pairs), matrix.clone()))
        .collect::<Vec<_>>();
    let expansion = factorization.expansion
        .iter()
        .map(|(key, matrix)| (key.weight().subs(&dependency_pairs), matrix.clone()))
        .collect::<Vec<_>>();

    if perform_check {
        for (weight, matrix) in &unfolded {
            for ((r, c), entry) in matrix.iter() {
                let found = (weight.clone() * entry.clone()).expand();
                if found != splitted[(r, c)] {
                    return Err(ExpansionMismatch {
                        row: r,
                        col: c,
                        expected: splitted[(r, c)].to_string(),
                        found: found.to_string(),
                    }.into());
                }
            }
        }
    }

    Ok(InstantiatedFactorization {
        unfolded,
        splitted,
        expansion,
        dependencies,
        family: factorization.family.clone(),
    })
}

/// Substitutes the initial values (by default, `1` for the first entry of the triangle) into the
/// matrix, and factors every entry.
pub fn apply_factor_inside_matrix(spec: &MatrixSpec, inits: Option<&Substitutions>) -> MatrixSpec {
    let default = default_inits(&spec.family);
    let pairs = as_pairs(inits.unwrap_or(&default));
    MatrixSpec::new(
        spec.matrix.map(|entry| factor_terms(&entry.subs(&pairs))),
        spec.family.clone(),
    )
}

/// Adds `var` times the entries of `inner` in the rows below `i` and the columns left of `i` to
/// `mixed`.
fn mix_left_part(mixed: &mut SymMatrix, var: &SymExpr, inner: &SymMatrix, i: usize) {
    for r in (i + 1)..inner.rows() {
        for c in 0..i.min(inner.cols()) {
            mixed[(r, c)] = (mixed[(r, c)].clone() + var.clone() * inner[(r, c)].clone()).expand();
        }
    }
}

/// Keeps the entries of `inner` from row `first_row` and column `first_col` on.
fn restrict(inner: &SymMatrix, first_row: usize, first_col: usize) -> SymMatrix {
    SymMatrix::from_fn(inner.rows(), inner.cols(), |r, c| {
        if r >= first_row && c >= first_col {
            inner[(r, c)].clone()
        } else {
            SymExpr::zero()
        }
    })
}

/// Redistributes the expansion of a factorization according to where its free variables sit.
///
/// Only free variables on the main diagonal change the expansion. The matrix of the `i`-th
/// variable is split into its diagonal entry, which goes into the [`ExpansionKey::Diagonal`]
/// matrix as the variable itself; the part below row `i` and left of column `i`, which goes into
/// the [`ExpansionKey::Mixed`] matrix weighted by the variable; and the rest, which stays as the
/// matrix of the variable. The last variable keeps its diagonal entry.
pub fn adjust_expansion(
    spec: &MatrixSpec,
    expansion: &Expansion,
    location: FreeVarsLocation,
) -> Result<Expansion, Error> {
    if location != FreeVarsLocation::MainDiagonal {
        return Ok(expansion.clone());
    }

    let length = expansion
        .keys()
        .filter(|key| matches!(key, ExpansionKey::Variable(_)))
        .count();
    let Some(last) = length.checked_sub(1) else {
        return Ok(expansion.clone());
    };

    let (rows, cols) = (spec.matrix.rows(), spec.matrix.cols());
    let mut diagonal = SymMatrix::zeros(rows, cols);
    let mut mixed = SymMatrix::zeros(rows, cols);
    let mut adjusted = Expansion::new();
    let inner_of = |var: &SymExpr| {
        expansion
            .get(&ExpansionKey::Variable(var.clone()))
            .ok_or_else(|| MissingFreeVariable { var: var.to_string() })
    };

    for i in 0..last {
        let var = spec.member(i, i);
        let inner = inner_of(&var)?;

        diagonal[(i, i)] = (diagonal[(i, i)].clone() + var.clone()).expand();
        mix_left_part(&mut mixed, &var, inner, i);
        adjusted.insert(ExpansionKey::Variable(var), restrict(inner, i + 1, i));
    }

    let var = spec.member(last, last);
    let inner = inner_of(&var)?;
    mix_left_part(&mut mixed, &var, inner, last);
    adjusted.insert(ExpansionKey::Variable(var), restrict(inner, last, last));

    adjusted.insert(ExpansionKey::Diagonal, diagonal);
    adjusted.insert(ExpansionKey::Mixed, mixed);
    Ok(adjusted)
}
