//! flake8: `file:line:col: message`.

use sieve_diagnostics::Diagnostic;

use crate::lines::{position, Decoding, LineRecords, OutputLines};
use crate::{OutputParser, RecordStream, Stream};

/// Parses flake8's default output format. Every finding is an error.
pub struct Flake8;

impl OutputParser for Flake8 {
    fn tool(&self) -> &str {
        "flake8"
    }

    fn name(&self) -> &str {
        "flake8"
    }

    fn stream(&self) -> Stream {
        Stream::Stdout
    }

    fn parse<'a>(&self, output: &'a [u8]) -> Box<dyn RecordStream + 'a> {
        let lines = OutputLines::decode("flake8", output, Decoding::Strict);
        Box::new(LineRecords::new("flake8", lines, parse_line))
    }
}

fn parse_line(line: &str) -> Option<Diagnostic> {
    let mut fields = line.trim().splitn(4, ':');
    let file = fields.next()?;
    let line_no = position(fields.next()?)?;
    let column = position(fields.next()?)?;
    let message = fields.next()?;
    Some(Diagnostic::error(file, line_no, column, "flake8", message.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(output: &str) -> Vec<Diagnostic> {
        Flake8.parse(output.as_bytes()).collect()
    }

    #[test]
    fn parses_standard_line() {
        let diags = parse("src/app/main.py:12:80: E501 line too long (88 > 79 characters)\n");
        assert_eq!(diags.len(), 1);
        let d = &diags[0];
        assert_eq!(d.file, "src/app/main.py");
        assert_eq!(d.line, 12);
        assert_eq!(d.column, 80);
        assert_eq!(d.source, "flake8");
        assert_eq!(d.message, "E501 line too long (88 > 79 characters)");
        assert!(d.title.is_empty());
        assert!(d.severity.is_error());
    }

    #[test]
    fn keeps_colons_in_message() {
        let diags = parse("a.py:1:1: F401 'os.path: join' imported but unused");
        assert_eq!(diags[0].message, "F401 'os.path: join' imported but unused");
    }

    #[test]
    fn skips_lines_without_colon() {
        let mut stream = Flake8.parse(b"3     E501 line too long\n\n1 error found\n");
        assert!(stream.next().is_none());
        assert_eq!(stream.skipped(), 3);
    }

    #[test]
    fn skips_mis_split_and_non_numeric_lines() {
        let output = "a.py:1: too few fields\na.py:x:2: E1 bad line\na.py:3:y: E2 bad col\nb.py:4:5: W605 ok\n";
        let mut stream = Flake8.parse(output.as_bytes());
        let diags: Vec<_> = stream.by_ref().collect();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].file, "b.py");
        assert_eq!(stream.skipped(), 3);
    }

    #[test]
    fn preserves_output_order() {
        let diags = parse("a.py:3:1: E1 x\nb.py:1:1: E2 y\na.py:1:1: E3 z\n");
        let files: Vec<_> = diags.iter().map(|d| (d.file.as_str(), d.line)).collect();
        assert_eq!(files, vec![("a.py", 3), ("b.py", 1), ("a.py", 1)]);
    }

    #[test]
    fn invalid_utf8_yields_nothing() {
        assert_eq!(Flake8.parse(b"a.py:1:1: E1 \xff\n").count(), 0);
    }
}
