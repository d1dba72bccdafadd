//! Reconstruction of diagnostics from unified-diff output.
//!
//! Formatters run in check mode print the diff they would apply instead of
//! naming problems. Each hunk of that diff becomes one error diagnostic,
//! anchored at the hunk's starting line in the original file, whose message
//! is the literal hunk body.

use std::mem;

use sieve_config::TrailingHunk;
use sieve_diagnostics::Diagnostic;
use tracing::{debug, trace};

use crate::lines::{Decoding, OutputLines};
use crate::{OutputParser, RecordStream, Stream};

/// Where the scanner is within the diff.
#[derive(Debug, PartialEq, Eq)]
enum ScanState {
    /// No `--- ` file header seen yet.
    AwaitingFile,
    /// Inside a file, before its first (or after a malformed) `@@` header.
    AwaitingHunk { file: String },
    /// Collecting the body of the hunk that starts at `line`.
    Accumulating { file: String, line: u32, body: String },
}

/// Line-at-a-time state machine turning a unified diff into diagnostics.
///
/// - `+++ ` lines are ignored.
/// - `--- <file>\t<stamp>` flushes any pending hunk and switches file.
/// - `@@ -<start>[,<count>] ...` flushes any pending hunk and starts a new one.
/// - Any other line is appended to the pending hunk's body. Lines seen while
///   no hunk is open have no position to report and are dropped.
pub struct HunkScanner {
    source: &'static str,
    title: &'static str,
    state: ScanState,
    skipped: usize,
}

impl HunkScanner {
    /// Creates a scanner whose diagnostics carry `source` and `title`.
    pub fn new(source: &'static str, title: &'static str) -> Self {
        Self {
            source,
            title,
            state: ScanState::AwaitingFile,
            skipped: 0,
        }
    }

    /// Number of lines dropped because they arrived outside any hunk or were
    /// malformed hunk headers.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Feeds one diff line, returning the diagnostic of a hunk it completed.
    pub fn feed(&mut self, line: &str) -> Option<Diagnostic> {
        if line.starts_with("+++ ") {
            return None;
        }

        if let Some(header) = line.strip_prefix("--- ") {
            let flushed = self.flush();
            let file = header.split('\t').next().unwrap_or(header);
            self.state = ScanState::AwaitingHunk {
                file: file.to_string(),
            };
            return flushed;
        }

        if line.starts_with("@@") {
            let flushed = self.flush();
            match mem::replace(&mut self.state, ScanState::AwaitingFile) {
                ScanState::AwaitingHunk { file } => match hunk_start(line) {
                    Some(start) => {
                        self.state = ScanState::Accumulating {
                            file,
                            line: start,
                            body: String::new(),
                        };
                    }
                    None => {
                        trace!(tool = self.source, line, "malformed hunk header");
                        self.skipped += 1;
                        self.state = ScanState::AwaitingHunk { file };
                    }
                },
                other => {
                    trace!(tool = self.source, line, "hunk header outside a file");
                    self.skipped += 1;
                    self.state = other;
                }
            }
            return flushed;
        }

        match &mut self.state {
            ScanState::Accumulating { body, .. } => {
                body.push_str(line);
                body.push('\n');
            }
            _ => {
                trace!(tool = self.source, line, "diff line outside a hunk");
                self.skipped += 1;
            }
        }
        None
    }

    /// Emits the pending hunk, if it has a body, and leaves the current file open.
    pub fn flush(&mut self) -> Option<Diagnostic> {
        match mem::replace(&mut self.state, ScanState::AwaitingFile) {
            ScanState::Accumulating { file, line, body } => {
                let diag = (!body.is_empty()).then(|| {
                    Diagnostic::error(file.clone(), line, 1, self.source, body)
                        .with_title(self.title)
                });
                self.state = ScanState::AwaitingHunk { file };
                diag
            }
            other => {
                self.state = other;
                None
            }
        }
    }

    /// Ends the scan, applying `trailing` to a hunk that is still pending.
    pub fn finish(&mut self, trailing: TrailingHunk) -> Option<Diagnostic> {
        let diag = match trailing {
            TrailingHunk::Flush => self.flush(),
            TrailingHunk::Discard => {
                if let ScanState::Accumulating { file, line, body } = &self.state {
                    if !body.is_empty() {
                        debug!(tool = self.source, file = %file, line, "discarding trailing hunk");
                    }
                }
                None
            }
        };
        self.state = ScanState::AwaitingFile;
        diag
    }
}

/// Extracts the original-file start line from a `@@ -a,b +c,d @@` header.
///
/// The sign of the range is dropped. A start of `0` (hunks of newly created
/// files) anchors at line `1`.
fn hunk_start(header: &str) -> Option<u32> {
    let range = header.split_whitespace().nth(1)?;
    let start = range.split(',').next()?;
    let digits = start.strip_prefix(['-', '+']).unwrap_or(start);
    digits.parse::<u32>().ok().map(|n| n.max(1))
}

/// Parses a formatter's unified-diff stdout into one diagnostic per hunk.
pub struct DiffParser {
    name: &'static str,
    source: &'static str,
    title: &'static str,
    trailing: TrailingHunk,
}

impl DiffParser {
    /// Creates the parser `name` for diffs printed by the tool `source`;
    /// every diagnostic is titled `title`.
    pub fn new(
        name: &'static str,
        source: &'static str,
        title: &'static str,
        trailing: TrailingHunk,
    ) -> Self {
        Self {
            name,
            source,
            title,
            trailing,
        }
    }
}

impl OutputParser for DiffParser {
    fn tool(&self) -> &str {
        self.source
    }

    fn name(&self) -> &str {
        self.name
    }

    fn stream(&self) -> Stream {
        Stream::Stdout
    }

    fn parse<'a>(&self, output: &'a [u8]) -> Box<dyn RecordStream + 'a> {
        Box::new(DiffRecords {
            lines: OutputLines::decode(self.source, output, Decoding::Strict),
            scanner: HunkScanner::new(self.source, self.title),
            trailing: self.trailing,
            emitted: 0,
            finished: false,
        })
    }
}

struct DiffRecords<'a> {
    lines: OutputLines<'a>,
    scanner: HunkScanner,
    trailing: TrailingHunk,
    emitted: usize,
    finished: bool,
}

impl Iterator for DiffRecords<'_> {
    type Item = Diagnostic;

    fn next(&mut self) -> Option<Diagnostic> {
        if self.finished {
            return None;
        }
        while let Some(line) = self.lines.next_line() {
            if let Some(diag) = self.scanner.feed(line) {
                self.emitted += 1;
                return Some(diag);
            }
        }

        self.finished = true;
        let last = self.scanner.finish(self.trailing);
        if last.is_some() {
            self.emitted += 1;
        }
        debug!(
            tool = self.scanner.source,
            emitted = self.emitted,
            skipped = self.scanner.skipped(),
            "finished parsing tool output"
        );
        last
    }
}

impl RecordStream for DiffRecords<'_> {
    fn skipped(&self) -> usize {
        self.scanner.skipped()
    }
}
