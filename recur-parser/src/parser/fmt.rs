//! LaTeX output, shared by the syntax tree and the symbolic engine.

use std::fmt::{Display, Formatter, Result};

/// A trait for types that can be formatted as LaTeX.
pub trait Latex {
    /// Format the value as LaTeX.
    fn fmt_latex(&self, f: &mut Formatter) -> Result;

    /// Wraps the value in a [`LatexFormatter`], which implements [`Display`], so it can be used
    /// directly in `format!` arguments.
    fn as_display(&self) -> LatexFormatter<'_, Self> {
        LatexFormatter(self)
    }

    /// Renders the value as a LaTeX string.
    fn to_latex(&self) -> String {
        self.as_display().to_string()
    }
}

/// Adapter returned by [`Latex::as_display`].
pub struct LatexFormatter<'a, T: ?Sized>(&'a T);

impl<T: Latex + ?Sized> Display for LatexFormatter<'_, T> {
    fn fmt(&self, f: &mut Formatter) -> Result {
        self.0.fmt_latex(f)
    }
}
