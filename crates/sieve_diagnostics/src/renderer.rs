//! Diagnostic rendering backends for CI annotations and terminal output.

use crate::diagnostic::Diagnostic;
use crate::severity::Severity;

/// Trait for rendering diagnostics into formatted output strings.
pub trait DiagnosticRenderer {
    /// Renders a single diagnostic into a formatted string.
    fn render(&self, diag: &Diagnostic) -> String;
}

/// Renders diagnostics as GitHub Actions workflow commands.
///
/// Produces one line per diagnostic:
/// ```text
/// ::error file=pkg/a.py,line=10,col=3,title=pylint::C0114 missing docstring
/// ```
/// Multi-line messages are escaped so the command stays on a single line.
#[derive(Clone, Copy, Debug, Default)]
pub struct GithubRenderer;

impl DiagnosticRenderer for GithubRenderer {
    fn render(&self, diag: &Diagnostic) -> String {
        let title = if diag.title.is_empty() {
            &diag.source
        } else {
            &diag.title
        };
        format!(
            "::{} file={},line={},col={},title={}::{}",
            diag.severity,
            escape_property(&diag.file),
            diag.line,
            diag.column,
            escape_property(title),
            escape_data(&diag.message),
        )
    }
}

/// Escapes the message part of a workflow command.
fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Escapes a `key=value` property of a workflow command.
fn escape_property(value: &str) -> String {
    escape_data(value).replace(':', "%3A").replace(',', "%2C")
}

/// Renders diagnostics in a compiler-style terminal format.
///
/// Produces output like:
/// ```text
/// src/x.py:5:1: error[black]: Black alteration
///     |  context
///     | +added
/// ```
pub struct TerminalRenderer {
    /// Whether to use ANSI color codes in output.
    pub color: bool,
}

impl TerminalRenderer {
    /// Creates a new terminal renderer.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn severity_label(&self, severity: Severity) -> String {
        if !self.color {
            return severity.to_string();
        }
        let code = match severity {
            Severity::Error => "31",
            Severity::Warning => "33",
            Severity::Notice => "36",
        };
        format!("\x1b[1;{code}m{severity}\x1b[0m")
    }
}

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic) -> String {
        let mut body = diag.message.lines();
        let headline = if diag.title.is_empty() {
            body.next().unwrap_or_default()
        } else {
            diag.title.as_str()
        };

        let mut out = format!(
            "{}:{}:{}: {}[{}]: {}\n",
            diag.file,
            diag.line,
            diag.column,
            self.severity_label(diag.severity),
            diag.source,
            headline
        );
        for line in body {
            out.push_str(&format!("    | {line}\n"));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn github_single_line() {
        let diag = Diagnostic::error("pkg/a.py", 10, 3, "pylint", "C0114 missing docstring");
        let out = GithubRenderer.render(&diag);
        assert_eq!(
            out,
            "::error file=pkg/a.py,line=10,col=3,title=pylint::C0114 missing docstring"
        );
    }

    #[test]
    fn github_uses_title_when_present() {
        let diag = Diagnostic::error("x.py", 5, 1, "black", "+added\n").with_title("Black alteration");
        let out = GithubRenderer.render(&diag);
        assert!(out.starts_with("::error file=x.py,line=5,col=1,title=Black alteration::"));
        assert!(out.ends_with("+added%0A"));
    }

    #[test]
    fn github_escapes_properties_and_data() {
        let diag = Diagnostic::new(Severity::Warning, "C:\\a,b.py", 1, 1, "mypy", "100% done\r\nnext");
        let out = GithubRenderer.render(&diag);
        assert!(out.contains("file=C%3A\\a%2Cb.py"));
        assert!(out.ends_with("::100%25 done%0D%0Anext"));
        assert!(!out.contains('\n'));
    }

    #[test]
    fn terminal_plain() {
        let diag = Diagnostic::new(Severity::Notice, "m.py", 42, 1, "mypy", "Revealed type is 'int'");
        let out = TerminalRenderer::new(false).render(&diag);
        assert_eq!(out, "m.py:42:1: notice[mypy]: Revealed type is 'int'\n");
    }

    #[test]
    fn terminal_multiline_with_title() {
        let diag = Diagnostic::error("x.py", 5, 1, "black", " context\n+added\n")
            .with_title("Black alteration");
        let out = TerminalRenderer::new(false).render(&diag);
        assert!(out.starts_with("x.py:5:1: error[black]: Black alteration\n"));
        assert!(out.contains("    |  context\n"));
        assert!(out.contains("    | +added\n"));
    }

    #[test]
    fn terminal_color_wraps_severity() {
        let diag = Diagnostic::error("a.py", 1, 1, "flake8", "E1");
        let out = TerminalRenderer::new(true).render(&diag);
        assert!(out.contains("\x1b[1;31merror\x1b[0m"));
    }

    #[test]
    fn terminal_empty_message() {
        let diag = Diagnostic::error("a.py", 1, 1, "flake8", "");
        let out = TerminalRenderer::new(false).render(&diag);
        assert_eq!(out, "a.py:1:1: error[flake8]: \n");
    }
}
