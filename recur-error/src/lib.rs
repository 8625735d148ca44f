//! Contains the common [`ErrorKind`] trait used by all errors to display user-facing error
//! messages, and the [`Error`] type that carries them across crate boundaries.
//!
//! Errors raised while parsing point at regions of the source code. Errors raised by the symbolic
//! engine or the unfolding engine usually have no source to point at, in which case the report is
//! built without labels and only shows the message and help text.

use ariadne::{Color, Report, Source};
use std::{any::Any, fmt::Debug, ops::Range};

/// The color to use to highlight expressions.
pub const EXPR: Color = Color::RGB(52, 235, 152);

/// Represents any kind of error that can occur during some operation.
pub trait ErrorKind: Debug + Send {
    /// Returns the error as a [`dyn Any`](Any), so callers can recover the concrete kind.
    fn as_any(&self) -> &dyn Any;

    /// Builds the report for this error.
    fn build_report(
        &self,
        src_id: &'static str,
        spans: &[Range<usize>],
    ) -> Report<(&'static str, Range<usize>)>;
}

/// An error, optionally associated with regions of source code that can be highlighted.
#[derive(Debug)]
pub struct Error {
    /// The regions of the source code that this error originated from. Empty if the error did not
    /// originate from source code.
    pub spans: Vec<Range<usize>>,

    /// The kind of error that occurred.
    pub kind: Box<dyn ErrorKind>,
}

impl Error {
    /// Creates a new error with the given spans and kind.
    pub fn new(spans: Vec<Range<usize>>, kind: impl ErrorKind + 'static) -> Self {
        Self { spans, kind: Box::new(kind) }
    }

    /// Build a report from this error kind.
    pub fn build_report(&self, src_id: &'static str) -> Report<(&'static str, Range<usize>)> {
        self.kind.build_report(src_id, &self.spans)
    }

    /// Returns the concrete error kind, if it is of type `K`.
    pub fn downcast_ref<K: ErrorKind + 'static>(&self) -> Option<&K> {
        self.kind.as_any().downcast_ref::<K>()
    }

    /// Returns true if the concrete error kind is of type `K`.
    pub fn is<K: ErrorKind + 'static>(&self) -> bool {
        self.downcast_ref::<K>().is_some()
    }

    /// Renders the report to a string, using the given source code for the labels.
    pub fn render(&self, input: &str) -> String {
        let mut buf = Vec::new();
        // writing into a `Vec` cannot fail
        let _ = self.build_report("input").write(("input", Source::from(input)), &mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Prints the report to stderr, using the given source code for the labels.
    pub fn report_to_stderr(&self, input: &str) {
        if let Err(err) = self.build_report("input").eprint(("input", Source::from(input))) {
            eprintln!("could not print error report: {}", err);
        }
    }
}

impl<K: ErrorKind + 'static> From<K> for Error {
    fn from(kind: K) -> Self {
        Self::new(Vec::new(), kind)
    }
}
