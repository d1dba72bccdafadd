//! Normalized diagnostic records, severity handling, and output rendering.
//!
//! Every external tool reports problems in its own textual dialect. This crate
//! defines the single [`Diagnostic`] shape those dialects are normalized into,
//! the closed [`Severity`] vocabulary, a thread-safe [`DiagnosticSink`] for
//! tallying results, and [`DiagnosticRenderer`] implementations for CI
//! annotations and human-readable console output.

#![warn(missing_docs)]

pub mod diagnostic;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use diagnostic::Diagnostic;
pub use renderer::{DiagnosticRenderer, GithubRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
