//! Decoding of raw tool output and line-at-a-time iteration over it.

use std::borrow::Cow;

use sieve_diagnostics::Diagnostic;
use tracing::{debug, trace, warn};

use crate::RecordStream;

/// How raw output bytes are turned into text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Decoding {
    /// Invalid UTF-8 makes the whole output unreadable (no lines).
    Strict,
    /// Invalid sequences are replaced with U+FFFD.
    Lossy,
}

/// A forward-only cursor over the `\n`-separated lines of decoded output.
///
/// Lines are yielded without their `\n` or `\r\n` terminator; a final empty
/// segment after a trailing newline is not yielded.
pub(crate) struct OutputLines<'a> {
    text: Cow<'a, str>,
    pos: usize,
}

impl<'a> OutputLines<'a> {
    /// Decodes `bytes` for the tool named `source`.
    ///
    /// Strict decoding of invalid UTF-8 logs a warning and yields no lines.
    pub(crate) fn decode(source: &str, bytes: &'a [u8], decoding: Decoding) -> Self {
        let text = match decoding {
            Decoding::Lossy => String::from_utf8_lossy(bytes),
            Decoding::Strict => match std::str::from_utf8(bytes) {
                Ok(text) => Cow::Borrowed(text),
                Err(e) => {
                    warn!(tool = source, error = %e, "tool output is not valid UTF-8, ignoring it");
                    Cow::Borrowed("")
                }
            },
        };
        Self { text, pos: 0 }
    }

    #[cfg(test)]
    pub(crate) fn from_text(text: &'a str) -> Self {
        Self {
            text: Cow::Borrowed(text),
            pos: 0,
        }
    }

    /// Returns the next line, or `None` once the text is exhausted.
    pub(crate) fn next_line(&mut self) -> Option<&str> {
        if self.pos >= self.text.len() {
            return None;
        }
        let rest = &self.text[self.pos..];
        match rest.find('\n') {
            Some(end) => {
                self.pos += end + 1;
                let line = &rest[..end];
                Some(line.strip_suffix('\r').unwrap_or(line))
            }
            None => {
                self.pos = self.text.len();
                Some(rest)
            }
        }
    }
}

/// Parses a reported line or column number.
///
/// Surrounding whitespace is ignored. Non-numeric values yield `None`; `0`
/// is raised to `1` so positions stay 1-based.
pub(crate) fn position(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().map(|n| n.max(1))
}

/// Record stream for formats where each diagnostic occupies one line.
///
/// Lines without a `:` are skipped before `parse_line` sees them.
pub(crate) struct LineRecords<'a> {
    source: &'static str,
    lines: OutputLines<'a>,
    parse_line: fn(&str) -> Option<Diagnostic>,
    emitted: usize,
    skipped: usize,
    finished: bool,
}

impl<'a> LineRecords<'a> {
    pub(crate) fn new(
        source: &'static str,
        lines: OutputLines<'a>,
        parse_line: fn(&str) -> Option<Diagnostic>,
    ) -> Self {
        Self {
            source,
            lines,
            parse_line,
            emitted: 0,
            skipped: 0,
            finished: false,
        }
    }
}

impl Iterator for LineRecords<'_> {
    type Item = Diagnostic;

    fn next(&mut self) -> Option<Diagnostic> {
        loop {
            let Some(line) = self.lines.next_line() else {
                if !self.finished {
                    self.finished = true;
                    debug!(
                        tool = self.source,
                        emitted = self.emitted,
                        skipped = self.skipped,
                        "finished parsing tool output"
                    );
                }
                return None;
            };

            let parsed = if line.contains(':') {
                (self.parse_line)(line)
            } else {
                None
            };

            match parsed {
                Some(diag) => {
                    self.emitted += 1;
                    return Some(diag);
                }
                None => {
                    trace!(tool = self.source, line, "skipping unparseable line");
                    self.skipped += 1;
                }
            }
        }
    }
}

impl RecordStream for LineRecords<'_> {
    fn skipped(&self) -> usize {
        self.skipped
    }
}
