//! Diagnostic severity levels ordered from least to most severe.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The severity level of a normalized diagnostic.
///
/// This is a closed set: whatever vocabulary a tool uses, it is mapped onto
/// one of these three levels by [`Severity::normalize`]. Ordered from least
/// severe (`Notice`) to most severe (`Error`).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational output that does not indicate a problem.
    Notice,
    /// A potential issue that should be reviewed.
    Warning,
    /// A definite problem.
    Error,
}

impl Severity {
    /// Maps a tool's raw level indicator onto the closed severity set.
    ///
    /// The input is trimmed and then compared exactly against the canonical
    /// tokens `notice`, `warning` and `error`. `note` is accepted as a
    /// synonym for `notice`. Anything else, including the empty string and
    /// differently-cased tokens, becomes [`Severity::Error`].
    pub fn normalize(raw: &str) -> Severity {
        match raw.trim() {
            "notice" | "note" => Severity::Notice,
            "warning" => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Returns `true` if this severity is [`Error`](Severity::Error).
    pub fn is_error(self) -> bool {
        self == Severity::Error
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Notice => write!(f, "notice"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}
