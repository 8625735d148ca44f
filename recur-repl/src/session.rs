use crate::command::{Command, Word, COMMANDS};
use crate::error::UnknownRecurrence;
use recur_compute::symbolic::{Equation, Family, SymExpr, SymMatrix};
use recur_error::Error;
use recur_parser::parser::{ast::equation::Equation as AstEquation, Parser};
use recur_unfold::{
    build_rec_from_gf,
    error::MalformedRecurrence,
    factorize_matrix_as_matrices_sum,
    latex_array_env,
    FreeVarsLocation,
    MatrixSpec,
    RecurrenceSpec,
    SequenceKind,
    Sequences,
    Step,
    UnfoldOptions,
};
use std::collections::BTreeMap;

/// The recurrences defined so far.
#[derive(Debug, Default)]
pub struct Session {
    specs: BTreeMap<String, RecurrenceSpec>,
}

/// Prints the matrix one row per line, with the columns aligned.
fn fmt_matrix(matrix: &SymMatrix) -> String {
    let entries = (0..matrix.rows())
        .map(|r| matrix.row(r).iter().map(ToString::to_string).collect::<Vec<_>>())
        .collect::<Vec<_>>();
    let width = entries.iter().flatten().map(String::len).max().unwrap_or(0);
    entries
        .iter()
        .map(|row| {
            row.iter()
                .map(|entry| format!("{:>width$}", entry, width = width))
                .collect::<Vec<_>>()
                .join("  ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

impl Session {
    /// Creates an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs a line of input, returning what should be printed, if anything.
    pub fn execute(&mut self, line: &str) -> Result<Option<String>, Error> {
        let Some(command) = Command::parse(line)? else {
            return Ok(None);
        };

        let output = match command {
            Command::Rec { name, equation, offset } => {
                let ast = Parser::new(equation)
                    .try_parse_full::<AstEquation>()
                    .map_err(|mut err| {
                        for span in &mut err.spans {
                            *span = span.start + offset..span.end + offset;
                        }
                        err
                    })?;
                let spec = RecurrenceSpec::from_equation(Equation::from(ast))?;
                let output = format!("{} := {}", name, spec.equation);
                self.specs.insert(name.to_string(), spec);
                output
            },
            Command::Show { name } => self.get(name)?.description(true),
            Command::Unfold { name, steps, first_order } => {
                let mut trace = Vec::new();
                let unfolded = self.get(name)?.unfold(steps, first_order, &mut trace)?;
                let hits = trace.iter().filter(|step| matches!(step, Step::CacheHit { .. })).count();
                format!(
                    "{}\n({} terms unfolded, {} cache hits)",
                    unfolded.equation,
                    trace.len() - hits,
                    hits,
                )
            },
            Command::Factor { name } => self.get(name)?.factor(&[]).equation.to_string(),
            Command::Table { name, steps } => {
                let (rows, _) = self.get(name)?.unfolding_table(0..=steps, true, None)?;
                latex_array_env(rows.iter().map(|(_, spec)| spec))
            },
            Command::Factorize { rows, length, location } => {
                let a = self.specs.get("A").ok_or_else(|| UnknownRecurrence { name: "A".to_string() })?;
                let z = self.specs.get("Z").map(|z| z.equation.clone());
                let [n, k] = a.index.as_slice() else {
                    return Err(MalformedRecurrence {
                        equation: a.equation.to_string(),
                        reason: "a triangle needs a row and a column index".to_string(),
                    }.into());
                };
                let seqs = Sequences::new(a.family.clone(), a.equation.clone(), z);
                factorize(&seqs, n, k, rows, length, location)?
            },
            Command::Pascal { rows, length, location } => {
                let family = Family::Indexed("T".to_string());
                let (n, k, t) = (SymExpr::symbol("n"), SymExpr::symbol("k"), SymExpr::symbol("t"));
                let gf = SymExpr::one() + t.clone();
                let a = build_rec_from_gf(&gf, &t, 2, &family, SequenceKind::A, &n, &k, 0)?;
                let z = build_rec_from_gf(&SymExpr::one(), &t, 1, &family, SequenceKind::Z, &n, &k, 0)?;
                factorize(&Sequences::new(family, a, Some(z)), &n, &k, rows, length, location)?
            },
            Command::Help => COMMANDS
                .iter()
                .map(|(_, usage)| *usage)
                .collect::<Vec<_>>()
                .join("\n"),
        };
        Ok(Some(output))
    }

    /// Returns the recurrence with the given name.
    fn get(&self, name: Word) -> Result<&RecurrenceSpec, Error> {
        self.specs
            .get(name.text)
            .ok_or_else(|| Error::new(vec![name.span()], UnknownRecurrence { name: name.text.to_string() }))
    }
}

/// Factors the `rows`-by-`rows` triangle defined by the sequences, printing every matrix of the
/// expansion under its weight.
fn factorize(
    seqs: &Sequences,
    n: &SymExpr,
    k: &SymExpr,
    rows: usize,
    length: usize,
    location: FreeVarsLocation,
) -> Result<String, Error> {
    let options = UnfoldOptions::default()
        .symbols(n.clone(), k.clone())
        .location(location);
    let spec = MatrixSpec::symbolic(rows, rows, seqs.a.family.clone());
    let factorization = factorize_matrix_as_matrices_sum(&spec, seqs, Some(length), true, &options, &mut ())?;
    Ok(factorization
        .expansion
        .iter()
        .map(|(key, matrix)| format!("{}:\n{}", key, fmt_matrix(matrix)))
        .collect::<Vec<_>>()
        .join("\n\n"))
}

#[cfg(test)]
mod tests {
    use crate::error::InvalidNumber;
    use pretty_assertions::assert_eq;
    use recur_parser::parser::error::UnclosedParenthesis;
    use super::*;

    #[test]
    fn define_and_unfold() {
        let mut session = Session::new();
        let defined = session.execute("rec fib f[n + 2] = f[n + 1] + f[n]").unwrap().unwrap();
        assert_eq!(defined, "fib := f[n + 2] = f[n + 1] + f[n]");

        let unfolded = session.execute("unfold fib 1").unwrap().unwrap();
        assert!(unfolded.starts_with("f[n + 2] = "));
        assert!(unfolded.ends_with("(2 terms unfolded, 0 cache hits)"));

        let shown = session.execute("show fib").unwrap().unwrap();
        assert!(shown.starts_with("Recurrence formal symbol $f$"));
    }

    #[test]
    fn parse_errors_point_into_the_line() {
        let mut session = Session::new();
        let err = session.execute("rec g T[n, k").unwrap_err();
        assert!(err.is::<UnclosedParenthesis>());
        assert_eq!(err.spans, vec![7..8]);
    }

    #[test]
    fn unknown_names() {
        let mut session = Session::new();
        let err = session.execute("factor fib").unwrap_err();
        assert_eq!(err.spans, vec![7..10]);
        assert!(err.is::<UnknownRecurrence>());

        assert!(session.execute("factorize 4 1 column-zero").unwrap_err().is::<UnknownRecurrence>());
        assert!(session.execute("table fib -1").unwrap_err().is::<InvalidNumber>());
    }

    #[test]
    fn pascal_factorization() {
        let mut session = Session::new();
        let output = session.execute("pascal 4 1 column-zero").unwrap().unwrap();
        assert_eq!(output, "T[0, 0]:\n1  0  0  0\n1  1  0  0\n1  2  1  0\n1  3  3  1");
    }

    #[test]
    fn user_defined_triangle() {
        let mut session = Session::new();
        session.execute("rec A T[n + 1, k + 1] = T[n, k] + T[n, k + 1]").unwrap();
        session.execute("rec Z T[n + 1, 0] = T[n, 0]").unwrap();
        let defined = session.execute("factorize 4 1 column-zero").unwrap().unwrap();
        let builtin = session.execute("pascal 4 1 column-zero").unwrap().unwrap();
        assert_eq!(defined, builtin);
    }

    #[test]
    fn blank_lines_print_nothing() {
        assert_eq!(Session::new().execute("  ").unwrap(), None);
    }
}
