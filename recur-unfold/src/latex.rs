//! LaTeX output for unfolded matrices, expansions and unfolding tables.

use crate::factorize::Expansion;
use crate::recurrence::RecurrenceSpec;
use recur_compute::symbolic::SymMatrix;
use recur_parser::parser::fmt::Latex;
use std::collections::BTreeMap;

/// Options for [`clean_up_zeros`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatexOptions {
    /// The label of the equation, referenced as `eq:<label>`.
    ///
    /// The default value is [`None`].
    pub label: Option<String>,

    /// Colors of individual entries, keyed by position.
    ///
    /// The default value is empty.
    pub colors: BTreeMap<(usize, usize), String>,

    /// The environment wrapping the array, or [`None`] for the bare array.
    ///
    /// The default value is `equation`.
    pub environment: Option<String>,

    /// Whether entries equal to zero are left blank.
    ///
    /// The default value is `true`.
    pub cancel_zeros: bool,

    /// The diagonal column offset of the triangle. Entries above the triangle are always blank.
    ///
    /// The default value is `1`.
    pub diagonal_col_offset: usize,
}

impl Default for LatexOptions {
    fn default() -> LatexOptions {
        LatexOptions {
            label: None,
            colors: BTreeMap::new(),
            environment: Some("equation".to_string()),
            cancel_zeros: true,
            diagonal_col_offset: 1,
        }
    }
}

impl LatexOptions {
    /// Set the label. Returns an updated [`LatexOptions`] for chaining.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the color of an entry. Returns an updated [`LatexOptions`] for chaining.
    pub fn color(mut self, row: usize, col: usize, color: impl Into<String>) -> Self {
        self.colors.insert((row, col), color.into());
        self
    }

    /// Set the environment. Returns an updated [`LatexOptions`] for chaining.
    pub fn environment(mut self, environment: Option<String>) -> Self {
        self.environment = environment;
        self
    }

    /// Set whether zeros are left blank. Returns an updated [`LatexOptions`] for chaining.
    pub fn cancel_zeros(mut self, cancel_zeros: bool) -> Self {
        self.cancel_zeros = cancel_zeros;
        self
    }
}

/// Renders the matrix as a LaTeX array, leaving the entries above the triangle blank.
pub fn clean_up_zeros(matrix: &SymMatrix, options: &LatexOptions) -> String {
    let mut tex = String::new();
    if let Some(environment) = &options.environment {
        tex.push_str(&format!("\\begin{{{}}}\n", environment));
    }
    tex.push_str(&format!("\\left[\\begin{{array}}{{{}}}\n", "c".repeat(matrix.cols())));

    for r in 0..matrix.rows() {
        for (c, entry) in matrix.row(r).iter().enumerate() {
            let space = if c == 0 { "" } else { " " };
            let mut coeff = if r * options.diagonal_col_offset < c || (options.cancel_zeros && entry.is_zero()) {
                String::new()
            } else {
                entry.to_latex()
            };
            if let Some(color) = options.colors.get(&(r, c)) {
                coeff = format!("\\textcolor{{{}}}{{{}}}", color, coeff);
            }
            let separator = if c + 1 == matrix.cols() { "\\\\" } else { "&" };
            tex.push_str(&format!("{}{} {}", space, coeff, separator));
        }
        if r + 1 < matrix.rows() {
            tex.push('\n');
        }
    }

    tex.push_str("\n\\end{array}\\right]");
    if let Some(environment) = &options.environment {
        tex.push('\n');
        if let Some(label) = &options.label {
            tex.push_str(&format!("\\label{{eq:{}}}\n", label));
        }
        tex.push_str(&format!("\\end{{{}}}", environment));
    }
    tex
}

/// Renders the expansion as a sum of weighted arrays.
pub fn latex_of_matrix_expansion(expansion: &Expansion, options: &LatexOptions) -> String {
    let options = options.clone().environment(None);
    expansion
        .iter()
        .map(|(key, matrix)| format!("{}{}", key.as_display(), clean_up_zeros(matrix, &options)))
        .collect::<Vec<_>>()
        .join(" + ")
}

/// Renders the equations of the recurrences as the lines of a centered array.
pub fn latex_array_env<'a>(specs: impl IntoIterator<Item = &'a RecurrenceSpec>) -> String {
    let lines = specs
        .into_iter()
        .map(|spec| format!("{}\\\\", spec.equation.as_display()))
        .collect::<Vec<_>>();
    format!("\\begin{{array}}{{c}}{}\\end{{array}}", lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use recur_compute::symbolic::{Family, SymExpr};
    use crate::factorize::ExpansionKey;
    use super::*;

    fn triangle() -> SymMatrix {
        SymMatrix::from_fn(2, 2, |r, c| if c <= r { SymExpr::int((r + c) as i64) } else { SymExpr::zero() })
    }

    #[test]
    fn blank_zeros() {
        let tex = clean_up_zeros(&triangle(), &LatexOptions::default().label("pascal"));
        assert_eq!(
            tex,
            "\\begin{equation}\n\\left[\\begin{array}{cc}\n &  \\\\\n1 & 2 \\\\\n\\end{array}\\right]\n\\label{eq:pascal}\n\\end{equation}",
        );
    }

    #[test]
    fn keep_zeros_and_color() {
        let options = LatexOptions::default()
            .environment(None)
            .cancel_zeros(false)
            .color(1, 1, "red");
        let tex = clean_up_zeros(&triangle(), &options);
        assert_eq!(tex, "\\left[\\begin{array}{cc}\n0 &  \\\\\n1 & \\textcolor{red}{2} \\\\\n\\end{array}\\right]");
    }

    #[test]
    fn expansion_sum() {
        let t00 = SymExpr::indexed("T", vec![SymExpr::zero(), SymExpr::zero()]);
        let expansion = Expansion::from([
            (ExpansionKey::Variable(t00), triangle()),
            (ExpansionKey::Diagonal, triangle()),
        ]);
        let tex = latex_of_matrix_expansion(&expansion, &LatexOptions::default());
        let array = clean_up_zeros(&triangle(), &LatexOptions::default().environment(None));
        assert_eq!(tex, format!("T_{{0,0}}{} + \\mathrm{{diagonal}}{}", array, array));
    }

    #[test]
    fn array_env() {
        let family = Family::Indexed("f".to_string());
        let n = SymExpr::symbol("n");
        let spec = RecurrenceSpec::new(
            recur_compute::symbolic::Equation::new(
                family.apply(vec![n.clone()]),
                family.apply(vec![n.clone() - SymExpr::one()]),
            ),
            family,
            vec![n],
        );
        let tex = latex_array_env([&spec, &spec]);
        let line = format!("{}\\\\", spec.equation.as_display());
        assert_eq!(tex, format!("\\begin{{array}}{{c}}{}\n{}\\end{{array}}", line, line));
    }
}
