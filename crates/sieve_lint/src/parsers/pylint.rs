//! pylint: `file:line:col: message`, decoded lossily.

use sieve_diagnostics::Diagnostic;

use crate::lines::{position, Decoding, LineRecords, OutputLines};
use crate::{OutputParser, RecordStream, Stream};

/// Parses pylint's parseable output. Every finding is an error.
pub struct Pylint;

impl OutputParser for Pylint {
    fn tool(&self) -> &str {
        "pylint"
    }

    fn name(&self) -> &str {
        "pylint"
    }

    fn stream(&self) -> Stream {
        Stream::Stdout
    }

    fn parse<'a>(&self, output: &'a [u8]) -> Box<dyn RecordStream + 'a> {
        let lines = OutputLines::decode("pylint", output, Decoding::Lossy);
        Box::new(LineRecords::new("pylint", lines, parse_line))
    }
}

fn parse_line(line: &str) -> Option<Diagnostic> {
    let mut fields = line.trim().splitn(4, ':');
    let file = fields.next()?;
    let line_no = position(fields.next()?)?;
    let column = position(fields.next()?)?;
    let message = fields.next()?;
    Some(Diagnostic::error(file, line_no, column, "pylint", message.trim()))
}
