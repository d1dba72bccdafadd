//! pydocstyle: a `file:line <context>` header followed by an indented message line.

use sieve_diagnostics::Diagnostic;
use tracing::{debug, trace};

use crate::lines::{position, Decoding, OutputLines};
use crate::{OutputParser, RecordStream, Stream};

/// Parses pydocstyle's two-line records. Every finding is an error with column `1`.
pub struct Pydocstyle;

impl OutputParser for Pydocstyle {
    fn tool(&self) -> &str {
        "pydocstyle"
    }

    fn name(&self) -> &str {
        "pydocstyle"
    }

    fn stream(&self) -> Stream {
        Stream::Stdout
    }

    fn parse<'a>(&self, output: &'a [u8]) -> Box<dyn RecordStream + 'a> {
        Box::new(DocstyleRecords {
            lines: OutputLines::decode("pydocstyle", output, Decoding::Strict),
            emitted: 0,
            skipped: 0,
            finished: false,
        })
    }
}

/// Splits a header into `(file, line)`.
///
/// Only the first whitespace-delimited word is used, and it must contain
/// exactly one `:`. The line may still be non-numeric; that is checked after
/// the message line has been consumed.
fn split_header(header: &str) -> Option<(&str, &str)> {
    let location = header.split(char::is_whitespace).next()?;
    let mut parts = location.split(':');
    let file = parts.next()?;
    let line_no = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    Some((file, line_no))
}

struct DocstyleRecords<'a> {
    lines: OutputLines<'a>,
    emitted: usize,
    skipped: usize,
    finished: bool,
}

impl DocstyleRecords<'_> {
    fn finish(&mut self) -> Option<Diagnostic> {
        if !self.finished {
            self.finished = true;
            debug!(
                tool = "pydocstyle",
                emitted = self.emitted,
                skipped = self.skipped,
                "finished parsing tool output"
            );
        }
        None
    }
}

impl Iterator for DocstyleRecords<'_> {
    type Item = Diagnostic;

    fn next(&mut self) -> Option<Diagnostic> {
        loop {
            let Some(header) = self.lines.next_line() else {
                return self.finish();
            };

            let location = if header.contains(':') {
                split_header(header)
            } else {
                None
            };
            let Some((file, line_no)) = location else {
                trace!(tool = "pydocstyle", line = header, "skipping unparseable line");
                self.skipped += 1;
                continue;
            };
            let file = file.to_string();
            let line_no = position(line_no);

            let Some(message) = self.lines.next_line() else {
                trace!(tool = "pydocstyle", file = %file, "dropping record truncated at end of output");
                self.skipped += 1;
                return self.finish();
            };
            let message = message.trim().to_string();

            match line_no {
                Some(line_no) => {
                    self.emitted += 1;
                    return Some(Diagnostic::error(file, line_no, 1, "pydocstyle", message));
                }
                None => self.skipped += 1,
            }
        }
    }
}

impl RecordStream for DocstyleRecords<'_> {
    fn skipped(&self) -> usize {
        self.skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_two_line_record() {
        let output = "src/app/a.py:1 at module level:\n        D100: Missing docstring in public module\n";
        let diags: Vec<_> = Pydocstyle.parse(output.as_bytes()).collect();
        assert_eq!(diags.len(), 1);
        let d = &diags[0];
        assert_eq!(d.file, "src/app/a.py");
        assert_eq!(d.line, 1);
        assert_eq!(d.column, 1);
        assert_eq!(d.source, "pydocstyle");
        assert_eq!(d.message, "D100: Missing docstring in public module");
        assert!(d.severity.is_error());
    }

    #[test]
    fn parses_consecutive_records() {
        let output = "a.py:10 in public function `f`:\n        D103: Missing docstring in public function\n\
                      a.py:20 in public class `C`:\n        D101: Missing docstring in public class\n";
        let diags: Vec<_> = Pydocstyle.parse(output.as_bytes()).collect();
        let lines: Vec<u32> = diags.iter().map(|d| d.line).collect();
        assert_eq!(lines, vec![10, 20]);
        assert!(diags[1].message.starts_with("D101"));
    }

    #[test]
    fn truncated_record_is_dropped() {
        let mut stream = Pydocstyle.parse(b"a.py:1 at module level:\n        D100: x\nb.py:2 in f:");
        assert_eq!(stream.next().map(|d| d.file), Some("a.py".to_string()));
        assert!(stream.next().is_none());
        assert_eq!(stream.skipped(), 1);
    }

    #[test]
    fn malformed_header_is_skipped_and_message_reread() {
        // "C:\x.py:3" splits into three parts, so the next line is tried as a header.
        let output = "C:\\x.py:3 in f:\n        D103: skipped too\na.py:4 in g:\n        D103: kept\n";
        let mut stream = Pydocstyle.parse(output.as_bytes());
        let diags: Vec<_> = stream.by_ref().collect();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].message, "D103: kept");
        assert_eq!(stream.skipped(), 2);
    }

    #[test]
    fn non_numeric_line_consumes_message() {
        let output = "a.py:x in f:\n        D103: not a header\nb.py:5 in g:\n        D103: kept\n";
        let diags: Vec<_> = Pydocstyle.parse(output.as_bytes()).collect();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].file, "b.py");
    }

    #[test]
    fn no_colon_input_yields_nothing() {
        assert_eq!(Pydocstyle.parse(b"nothing to report\n\n").count(), 0);
    }
}
