//! Toolchain that manages parser registration and merges their output.
//!
//! The `Toolchain` holds parsers in a fixed order and, given the captured
//! output of each tool, exposes every parser's diagnostics as one ordered
//! stream. It performs no text parsing of its own.

use std::collections::BTreeMap;

use rayon::prelude::*;
use sieve_config::LintConfig;
use sieve_diagnostics::Diagnostic;
use tracing::debug;

use crate::parsers::register_builtin_parsers;
use crate::{OutputParser, RecordStream, Stream};

/// What one finished tool process left behind.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Process exit code. Parsers never look at it.
    pub exit_code: i32,
    /// Captured standard output.
    pub stdout: Vec<u8>,
    /// Captured standard error.
    pub stderr: Vec<u8>,
}

impl ToolOutput {
    /// Creates a tool output from its parts.
    pub fn new(exit_code: i32, stdout: impl Into<Vec<u8>>, stderr: impl Into<Vec<u8>>) -> Self {
        Self {
            exit_code,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    /// Returns the bytes captured from `stream`.
    pub fn stream(&self, stream: Stream) -> &[u8] {
        match stream {
            Stream::Stdout => &self.stdout,
            Stream::Stderr => &self.stderr,
        }
    }
}

/// Captured outputs keyed by tool name.
pub type ToolOutputs = BTreeMap<String, ToolOutput>;

/// Ordered collection of parsers run over captured tool output.
pub struct Toolchain {
    parsers: Vec<Box<dyn OutputParser>>,
}

impl Toolchain {
    /// Creates a toolchain with no parsers.
    pub fn empty() -> Self {
        Self {
            parsers: Vec::new(),
        }
    }

    /// Creates a toolchain of the built-in parsers enabled by `config`.
    ///
    /// Disabled tools are removed without changing the relative order of
    /// the remaining parsers.
    pub fn new(config: &LintConfig) -> Self {
        let mut toolchain = Self::empty();
        register_builtin_parsers(&mut toolchain, config.trailing_hunk);
        toolchain.retain_tools(|tool| config.is_enabled(tool));
        toolchain
    }

    /// Creates a toolchain of every built-in parser with default settings.
    pub fn with_defaults() -> Self {
        Self::new(&LintConfig::default())
    }

    /// Appends a parser; it runs after every parser registered before it.
    pub fn register(&mut self, parser: Box<dyn OutputParser>) {
        self.parsers.push(parser);
    }

    /// Keeps only the parsers whose tool satisfies `keep`.
    pub fn retain_tools(&mut self, keep: impl Fn(&str) -> bool) {
        self.parsers.retain(|parser| keep(parser.tool()));
    }

    /// Returns the number of registered parsers.
    pub fn parser_count(&self) -> usize {
        self.parsers.len()
    }

    /// Returns the names of all registered parsers, in run order.
    pub fn parser_names(&self) -> Vec<&str> {
        self.parsers.iter().map(|p| p.name()).collect()
    }

    /// Returns each tool that has at least one parser, in run order.
    pub fn tools(&self) -> Vec<&str> {
        let mut tools: Vec<&str> = Vec::new();
        for parser in &self.parsers {
            if !tools.contains(&parser.tool()) {
                tools.push(parser.tool());
            }
        }
        tools
    }

    /// Lazily parses `outputs` with every parser, in registration order.
    ///
    /// Parsers whose tool has no entry in `outputs` contribute nothing.
    pub fn run<'a>(&'a self, outputs: &'a ToolOutputs) -> Diagnostics<'a> {
        Diagnostics {
            pending: self.parsers.iter(),
            outputs,
            current: None,
            skipped: 0,
        }
    }

    /// Parses every tool's output on the rayon pool.
    ///
    /// The result is identical to collecting [`run`](Self::run).
    pub fn run_parallel(&self, outputs: &ToolOutputs) -> Vec<Diagnostic> {
        let per_parser: Vec<Vec<Diagnostic>> = self
            .parsers
            .par_iter()
            .map(|parser| match outputs.get(parser.tool()) {
                Some(output) => parser.parse(output.stream(parser.stream())).collect(),
                None => Vec::new(),
            })
            .collect();
        per_parser.into_iter().flatten().collect()
    }
}

/// The merged diagnostic stream of a [`Toolchain`] run.
pub struct Diagnostics<'a> {
    pending: std::slice::Iter<'a, Box<dyn OutputParser>>,
    outputs: &'a ToolOutputs,
    current: Option<Box<dyn RecordStream + 'a>>,
    skipped: usize,
}

impl Diagnostics<'_> {
    /// Total lines skipped by every parser polled so far.
    pub fn skipped(&self) -> usize {
        self.skipped + self.current.as_ref().map_or(0, |s| s.skipped())
    }
}

impl Iterator for Diagnostics<'_> {
    type Item = Diagnostic;

    fn next(&mut self) -> Option<Diagnostic> {
        loop {
            if let Some(stream) = self.current.as_mut() {
                if let Some(diag) = stream.next() {
                    return Some(diag);
                }
                self.skipped += stream.skipped();
                self.current = None;
            }

            let parser = self.pending.next()?;
            match self.outputs.get(parser.tool()) {
                Some(output) => {
                    debug!(parser = parser.name(), "parsing tool output");
                    self.current = Some(parser.parse(output.stream(parser.stream())));
                }
                None => debug!(parser = parser.name(), "no output captured, skipping"),
            }
        }
    }
}
