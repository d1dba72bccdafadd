//! Built-in parsers for line-oriented tool output.
//!
//! This module re-exports the individual parser types and provides
//! `register_builtin_parsers` to add every built-in parser, diff parsers
//! included, to a `Toolchain` in the fixed run order.

mod black;
mod flake8;
mod mypy;
mod pydocstyle;
mod pylint;

pub use black::BlackErrors;
pub use flake8::Flake8;
pub use mypy::Mypy;
pub use pydocstyle::Pydocstyle;
pub use pylint::Pylint;

use sieve_config::TrailingHunk;

use crate::diff::DiffParser;
use crate::Toolchain;

/// Registers all built-in parsers with the toolchain.
///
/// Order: isort diffs, black errors, black diffs, flake8, mypy, pylint,
/// pydocstyle. `trailing` decides what the diff parsers do with a hunk
/// still pending at end of output.
pub fn register_builtin_parsers(toolchain: &mut Toolchain, trailing: TrailingHunk) {
    toolchain.register(Box::new(DiffParser::new(
        "isort-diff",
        "isort",
        "isort alteration",
        trailing,
    )));
    toolchain.register(Box::new(BlackErrors));
    toolchain.register(Box::new(DiffParser::new(
        "black-diff",
        "black",
        "Black alteration",
        trailing,
    )));
    toolchain.register(Box::new(Flake8));
    toolchain.register(Box::new(Mypy));
    toolchain.register(Box::new(Pylint));
    toolchain.register(Box::new(Pydocstyle));
}
