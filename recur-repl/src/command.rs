//! Parsing the commands typed into the REPL.

use crate::error::{InvalidNumber, MissingArgument, TrailingArguments, UnknownCommand};
use recur_error::Error;
use recur_unfold::FreeVarsLocation;
use std::ops::Range;

/// A command, borrowing its arguments from the line it was parsed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<'a> {
    /// `rec <name> <equation>`: defines a recurrence.
    Rec {
        name: &'a str,
        equation: &'a str,

        /// The position of the equation in the line.
        offset: usize,
    },

    /// `show <name>`: describes a recurrence and its unfolded terms.
    Show { name: Word<'a> },

    /// `unfold <name> <steps> [second]`: unfolds a recurrence.
    Unfold { name: Word<'a>, steps: usize, first_order: bool },

    /// `factor <name>`: collects the right-hand side of a recurrence.
    Factor { name: Word<'a> },

    /// `table <name> <steps>`: unfolds a recurrence zero to `steps` times, as a LaTeX array.
    Table { name: Word<'a>, steps: usize },

    /// `factorize <rows> <length> <location>`: factors the triangle defined by the recurrences
    /// named `A` and, optionally, `Z`.
    Factorize { rows: usize, length: usize, location: FreeVarsLocation },

    /// `pascal <rows> <length> <location>`: factors Pascal's triangle.
    Pascal { rows: usize, length: usize, location: FreeVarsLocation },

    /// `help`: lists the commands.
    Help,
}

/// A word of the line, with its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Word<'a> {
    pub text: &'a str,
    pub bounds: (usize, usize),
}

impl<'a> Word<'a> {
    /// Returns the region of the line covered by the word.
    pub fn span(&self) -> Range<usize> {
        self.bounds.0..self.bounds.1
    }
}

/// Splits the line into whitespace-separated words.
fn words(line: &str) -> Vec<Word> {
    let mut words = Vec::new();
    let mut start = None;
    for (i, c) in line.char_indices().chain(std::iter::once((line.len(), ' '))) {
        match (start, c.is_whitespace()) {
            (None, false) => start = Some(i),
            (Some(s), true) => {
                words.push(Word { text: &line[s..i], bounds: (s, i) });
                start = None;
            },
            _ => (),
        }
    }
    words
}

/// The words of a command after the command name.
struct Args<'a> {
    command: Word<'a>,
    words: std::vec::IntoIter<Word<'a>>,
}

impl<'a> Args<'a> {
    /// Returns the next argument.
    fn next(&mut self, name: &'static str) -> Result<Word<'a>, Error> {
        self.words.next().ok_or_else(|| {
            Error::new(vec![self.command.span()], MissingArgument { command: self.command_name(), argument: name })
        })
    }

    /// Returns the next argument as a non-negative integer.
    fn number(&mut self, name: &'static str) -> Result<usize, Error> {
        let word = self.next(name)?;
        word.text
            .parse()
            .map_err(|_| Error::new(vec![word.span()], InvalidNumber { argument: name }))
    }

    /// Returns the next argument as a free variables location.
    fn location(&mut self) -> Result<FreeVarsLocation, Error> {
        let word = self.next("location")?;
        word.text.parse().map_err(|mut err: Error| {
            err.spans.push(word.span());
            err
        })
    }

    /// Returns true if the next argument is the given keyword, consuming it.
    fn flag(&mut self, keyword: &str) -> bool {
        if self.words.as_slice().first().map(|word| word.text) == Some(keyword) {
            self.words.next();
            true
        } else {
            false
        }
    }

    /// Fails if arguments remain.
    fn finish(mut self) -> Result<(), Error> {
        match self.words.next() {
            Some(word) => Err(Error::new(vec![word.span()], TrailingArguments { command: self.command_name() })),
            None => Ok(()),
        }
    }

    /// Returns the name of the command, as it appears in the table of commands.
    fn command_name(&self) -> &'static str {
        COMMANDS
            .iter()
            .map(|(name, _)| *name)
            .find(|name| *name == self.command.text)
            .unwrap_or("command")
    }
}

/// The commands and their usage.
pub const COMMANDS: [(&str, &str); 8] = [
    ("rec", "rec <name> <equation>"),
    ("show", "show <name>"),
    ("unfold", "unfold <name> <steps> [second]"),
    ("factor", "factor <name>"),
    ("table", "table <name> <steps>"),
    ("factorize", "factorize <rows> <length> <column-zero|diagonal|last-row>"),
    ("pascal", "pascal <rows> <length> <column-zero|diagonal|last-row>"),
    ("help", "help"),
];

impl<'a> Command<'a> {
    /// Parses a line into a command. Returns [`None`] for a blank line.
    pub fn parse(line: &'a str) -> Result<Option<Self>, Error> {
        let mut words = words(line).into_iter();
        let Some(command) = words.next() else {
            return Ok(None);
        };
        let mut args = Args { command, words };

        let parsed = match command.text {
            "rec" => {
                let name = args.next("name")?;
                let equation = args.next("equation")?;
                return Ok(Some(Self::Rec {
                    name: name.text,
                    equation: line[equation.bounds.0..].trim_end(),
                    offset: equation.bounds.0,
                }));
            },
            "show" => Self::Show { name: args.next("name")? },
            "unfold" => Self::Unfold {
                name: args.next("name")?,
                steps: args.number("steps")?,
                first_order: !args.flag("second"),
            },
            "factor" => Self::Factor { name: args.next("name")? },
            "table" => Self::Table {
                name: args.next("name")?,
                steps: args.number("steps")?,
            },
            "factorize" => Self::Factorize {
                rows: args.number("rows")?,
                length: args.number("length")?,
                location: args.location()?,
            },
            "pascal" => Self::Pascal {
                rows: args.number("rows")?,
                length: args.number("length")?,
                location: args.location()?,
            },
            "help" => Self::Help,
            _ => {
                return Err(Error::new(vec![command.span()], UnknownCommand { name: command.text.to_string() }));
            },
        };

        args.finish()?;
        Ok(Some(parsed))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use recur_unfold::error::UnknownLocation;
    use super::*;

    #[test]
    fn blank_line() {
        assert_eq!(Command::parse("   ").unwrap(), None);
    }

    #[test]
    fn rec_keeps_the_equation() {
        let line = "rec fib  f[n + 2] = f[n + 1] + f[n]  ";
        let Some(Command::Rec { name, equation, offset }) = Command::parse(line).unwrap() else {
            panic!("expected `rec`");
        };
        assert_eq!(name, "fib");
        assert_eq!(equation, "f[n + 2] = f[n + 1] + f[n]");
        assert_eq!(&line[offset..offset + 4], "f[n ");
    }

    #[test]
    fn unfold_flags() {
        let Some(Command::Unfold { name, steps, first_order }) = Command::parse("unfold fib 3 second").unwrap() else {
            panic!("expected `unfold`");
        };
        assert_eq!(name.text, "fib");
        assert_eq!(name.span(), 7..10);
        assert_eq!(steps, 3);
        assert!(!first_order);
    }

    #[test]
    fn pascal_location() {
        assert_eq!(
            Command::parse("pascal 6 2 diagonal").unwrap(),
            Some(Command::Pascal { rows: 6, length: 2, location: FreeVarsLocation::MainDiagonal }),
        );
    }

    #[test]
    fn argument_errors() {
        let err = Command::parse("unfold fib").unwrap_err();
        assert_eq!(err.downcast_ref::<MissingArgument>().unwrap().argument, "steps");

        let err = Command::parse("unfold fib many").unwrap_err();
        assert!(err.is::<InvalidNumber>());
        assert_eq!(err.spans, vec![11..15]);

        let err = Command::parse("show fib now").unwrap_err();
        assert!(err.is::<TrailingArguments>());

        let err = Command::parse("pascal 4 2 anywhere").unwrap_err();
        assert!(err.is::<UnknownLocation>());
        assert_eq!(err.spans, vec![11..19]);

        let err = Command::parse("plot fib").unwrap_err();
        assert_eq!(err.downcast_ref::<UnknownCommand>().unwrap().name, "plot");
    }
}
