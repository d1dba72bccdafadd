//! mypy: `file:line: level: message`, decoded lossily.

use sieve_diagnostics::{Diagnostic, Severity};

use crate::lines::{position, Decoding, LineRecords, OutputLines};
use crate::{OutputParser, RecordStream, Stream};

/// Parses mypy's default output. The level field is normalized; the column is always `1`.
pub struct Mypy;

impl OutputParser for Mypy {
    fn tool(&self) -> &str {
        "mypy"
    }

    fn name(&self) -> &str {
        "mypy"
    }

    fn stream(&self) -> Stream {
        Stream::Stdout
    }

    fn parse<'a>(&self, output: &'a [u8]) -> Box<dyn RecordStream + 'a> {
        let lines = OutputLines::decode("mypy", output, Decoding::Lossy);
        Box::new(LineRecords::new("mypy", lines, parse_line))
    }
}

fn parse_line(line: &str) -> Option<Diagnostic> {
    let mut fields = line.trim().splitn(4, ':');
    let file = fields.next()?;
    let line_no = position(fields.next()?)?;
    let severity = Severity::normalize(fields.next()?);
    let message = fields.next()?;
    Some(Diagnostic::new(severity, file, line_no, 1, "mypy", message.trim()))
}
