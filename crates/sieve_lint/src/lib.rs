//! Normalization of external analysis-tool output into [`Diagnostic`] records.
//!
//! Each supported tool prints findings in its own format. This crate holds
//! one [`OutputParser`] per format and a [`Toolchain`] that runs them, in a
//! fixed order, over output that has already been captured from the tool
//! processes.
//!
//! # Formats
//!
//! - **Line formats:** `file:line:col:message` (flake8, pylint),
//!   `file:line:level:message` (mypy), two-line header/message records
//!   (pydocstyle) and formatter error reports (black on stderr)
//! - **Diff formats:** unified diffs from formatters run in check mode
//!   (isort, black), scanned by the [`HunkScanner`] state machine
//!
//! Parsing never fails: a line that does not fit its format produces no
//! record and is counted in [`RecordStream::skipped`].

#![warn(missing_docs)]

mod diff;
mod lines;
mod parsers;
mod toolchain;

pub use diff::{DiffParser, HunkScanner};
pub use parsers::register_builtin_parsers;
pub use parsers::{BlackErrors, Flake8, Mypy, Pydocstyle, Pylint};
pub use toolchain::{Diagnostics, ToolOutput, ToolOutputs, Toolchain};

use sieve_diagnostics::Diagnostic;

/// Which captured process stream a parser reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stream {
    /// Standard output.
    Stdout,
    /// Standard error.
    Stderr,
}

/// A lazy, single-pass sequence of diagnostics parsed from one tool output.
pub trait RecordStream: Iterator<Item = Diagnostic> {
    /// Returns how many input lines were dropped so far because they did not
    /// match the expected format.
    fn skipped(&self) -> usize;
}

/// Converts one captured tool output stream into diagnostics.
///
/// Implementations are stateless; all per-parse state lives in the returned
/// [`RecordStream`], so the same parser can be reused and run concurrently.
pub trait OutputParser: Send + Sync {
    /// Returns the tool whose output this parser reads (e.g. `black`).
    ///
    /// This is also the `source` of every diagnostic it produces.
    fn tool(&self) -> &str;

    /// Returns a unique kebab-case name for this parser (e.g. `black-diff`).
    fn name(&self) -> &str;

    /// Returns which captured stream this parser consumes.
    fn stream(&self) -> Stream;

    /// Starts parsing `output`. Nothing is read until the stream is polled.
    fn parse<'a>(&self, output: &'a [u8]) -> Box<dyn RecordStream + 'a>;
}
