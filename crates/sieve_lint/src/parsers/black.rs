//! black (stderr): `level: cannot format <file>: <summary>: <line>:<col>: <info>`.

use sieve_diagnostics::{Diagnostic, Severity};

use crate::lines::{position, Decoding, LineRecords, OutputLines};
use crate::{OutputParser, RecordStream, Stream};

/// Parses the errors black reports on stderr when it cannot format a file.
///
/// Reformatting suggestions come from black's stdout diff and are handled by
/// a [`DiffParser`](crate::DiffParser).
pub struct BlackErrors;

impl OutputParser for BlackErrors {
    fn tool(&self) -> &str {
        "black"
    }

    fn name(&self) -> &str {
        "black-errors"
    }

    fn stream(&self) -> Stream {
        Stream::Stderr
    }

    fn parse<'a>(&self, output: &'a [u8]) -> Box<dyn RecordStream + 'a> {
        let lines = OutputLines::decode("black", output, Decoding::Strict);
        Box::new(LineRecords::new("black", lines, parse_line))
    }
}

fn parse_line(line: &str) -> Option<Diagnostic> {
    let mut fields = line.trim().splitn(6, ':');
    let level = fields.next()?;
    let header = fields.next()?;
    let summary = fields.next()?;
    let line_no = position(fields.next()?)?;
    let column = position(fields.next()?)?;
    let info = fields.next()?;

    // The file is the last word of "cannot format <file>".
    let file = header.rsplit(' ').next()?;

    Some(
        Diagnostic::new(Severity::normalize(level), file, line_no, column, "black", info.trim())
            .with_title(summary.trim()),
    )
}
