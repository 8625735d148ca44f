use ariadne::Fmt;
use recur_attrs::ErrorKind;
use recur_error::{ErrorKind, EXPR};

/// The first word of the line is not a command.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("unknown command `{}`", self.name),
    labels = ["this command"],
    help = format!("type {} to list the commands", "help".fg(EXPR)),
)]
pub struct UnknownCommand {
    /// The word that was given.
    pub name: String,
}

/// A command was given fewer arguments than it needs.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("missing argument `{}`", self.argument),
    labels = [format!("`{}` needs a {} argument", self.command, self.argument.fg(EXPR))],
)]
pub struct MissingArgument {
    /// The command.
    pub command: &'static str,

    /// The name of the missing argument.
    pub argument: &'static str,
}

/// A command was given more arguments than it takes.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "too many arguments",
    labels = [format!("`{}` takes no further arguments", self.command)],
)]
pub struct TrailingArguments {
    /// The command.
    pub command: &'static str,
}

/// An argument that should be a non-negative integer is not.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("`{}` must be a non-negative integer", self.argument),
    labels = ["this value"],
)]
pub struct InvalidNumber {
    /// The name of the argument.
    pub argument: &'static str,
}

/// No recurrence was defined under the given name.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("no recurrence named `{}`", self.name),
    labels = ["this name"],
    help = format!("define it first with {}", format!("rec {} <equation>", self.name).fg(EXPR)),
)]
pub struct UnknownRecurrence {
    /// The name that was given.
    pub name: String,
}
