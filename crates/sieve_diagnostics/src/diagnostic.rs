//! The normalized diagnostic record produced from external tool output.

use crate::severity::Severity;
use serde::{Deserialize, Serialize};

/// One normalized finding reported by an external analysis tool.
///
/// Records are built once from a fragment of tool output and never mutated
/// afterwards. Positions are 1-based; tools that report no column use `1`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The normalized severity level.
    pub severity: Severity,
    /// The path exactly as the tool reported it.
    pub file: String,
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number.
    pub column: u32,
    /// Name of the tool that produced this diagnostic (e.g. `flake8`).
    pub source: String,
    /// Short summary, empty when the tool provides none.
    pub title: String,
    /// Full diagnostic text, possibly spanning several lines.
    pub message: String,
}

impl Diagnostic {
    /// Creates a diagnostic with an empty title.
    pub fn new(
        severity: Severity,
        file: impl Into<String>,
        line: u32,
        column: u32,
        source: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            file: file.into(),
            line,
            column,
            source: source.into(),
            title: String::new(),
            message: message.into(),
        }
    }

    /// Creates an error diagnostic with an empty title.
    pub fn error(
        file: impl Into<String>,
        line: u32,
        column: u32,
        source: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(Severity::Error, file, line, column, source, message)
    }

    /// Sets the short summary of this diagnostic.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_error() {
        let diag = Diagnostic::error("pkg/a.py", 10, 3, "pylint", "C0114 missing docstring");
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.file, "pkg/a.py");
        assert_eq!(diag.line, 10);
        assert_eq!(diag.column, 3);
        assert_eq!(diag.source, "pylint");
        assert!(diag.title.is_empty());
    }

    #[test]
    fn create_with_severity() {
        let diag = Diagnostic::new(Severity::Notice, "m.py", 42, 1, "mypy", "Revealed type");
        assert_eq!(diag.severity, Severity::Notice);
        assert_eq!(diag.message, "Revealed type");
    }

    #[test]
    fn with_title_sets_title() {
        let diag = Diagnostic::error("x.py", 5, 1, "black", " context\n+added\n")
            .with_title("Black alteration");
        assert_eq!(diag.title, "Black alteration");
        assert_eq!(diag.message, " context\n+added\n");
    }

    #[test]
    fn json_shape() {
        let diag = Diagnostic::error("x.py", 1, 2, "flake8", "E501 line too long");
        let value = serde_json::to_value(&diag).unwrap();
        assert_eq!(value["severity"], "error");
        assert_eq!(value["line"], 1);
        assert_eq!(value["column"], 2);
        assert_eq!(value["title"], "");
    }
}
