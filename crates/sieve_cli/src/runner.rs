//! Invocation of the external tools and capture of their output.
//!
//! Each tool has a default command line, optionally overridden from
//! `sieve.toml`. A tool that cannot be started is logged and left out of
//! the captured outputs; it never aborts the run.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Command;

use sieve_config::ProjectConfig;
use sieve_lint::ToolOutput;
use tracing::{debug, warn};

use crate::pipeline::{is_src_dir, module_paths};

/// A fully resolved tool invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToolCommand {
    /// Tool name, as used by the parsers.
    pub tool: String,
    /// Executable to run.
    pub program: String,
    /// Arguments placed before the scanned paths.
    pub args: Vec<String>,
    /// Paths appended after the arguments.
    pub paths: Vec<PathBuf>,
    /// Extra environment variables.
    pub env: BTreeMap<String, String>,
}

impl ToolCommand {
    /// Renders the command line for logs.
    pub fn display(&self) -> String {
        let mut parts = vec![self.program.clone()];
        parts.extend(self.args.iter().cloned());
        parts.extend(self.paths.iter().map(|p| p.display().to_string()));
        parts.join(" ")
    }
}

/// Arguments a tool always gets unless the config replaces them.
fn base_args(tool: &str) -> Vec<String> {
    let args: &[&str] = match tool {
        "mypy" => &["--strict", "--explicit-package-bases"],
        "pydocstyle" => &["--match=.*\\.py$"],
        _ => &[],
    };
    args.iter().map(|a| a.to_string()).collect()
}

/// Arguments that make formatters report a diff instead of rewriting files.
fn ci_args(tool: &str) -> &'static [&'static str] {
    match tool {
        "isort" => &["--diff", "--quiet"],
        "black" => &["--diff", "--no-color", "--quiet"],
        _ => &[],
    }
}

/// Builds the command for `tool` scanning `paths`.
///
/// In CI mode formatters only report diffs. mypy receives src-dir roots as
/// `MYPYPATH` and their packages as scan targets.
pub fn build_command(
    tool: &str,
    config: &ProjectConfig,
    paths: &[PathBuf],
    ci: bool,
) -> ToolCommand {
    let overrides = config.tool(tool);

    let program = overrides
        .and_then(|o| o.program.clone())
        .unwrap_or_else(|| tool.to_string());
    let mut args = overrides
        .and_then(|o| o.args.clone())
        .unwrap_or_else(|| base_args(tool));
    if ci {
        args.extend(ci_args(tool).iter().map(|a| a.to_string()));
    }

    let mut env = BTreeMap::new();
    let paths = if tool == "mypy" {
        let roots: Vec<&PathBuf> = paths.iter().filter(|p| is_src_dir(p)).collect();
        if let Ok(joined) = std::env::join_paths(roots) {
            if !joined.is_empty() {
                env.insert("MYPYPATH".to_string(), joined.to_string_lossy().into_owned());
            }
        }
        module_paths(paths)
    } else {
        paths.to_vec()
    };
    if let Some(o) = overrides {
        env.extend(o.env.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    ToolCommand {
        tool: tool.to_string(),
        program,
        args,
        paths,
        env,
    }
}

/// Runs `command` in `cwd` and captures its output.
///
/// Returns `None` if the process could not be started.
pub fn run_tool(command: &ToolCommand, cwd: &Path) -> Option<ToolOutput> {
    debug!(tool = %command.tool, command = %command.display(), "running tool");
    let result = Command::new(&command.program)
        .args(&command.args)
        .args(&command.paths)
        .envs(&command.env)
        .current_dir(cwd)
        .output();

    match result {
        Ok(output) => {
            let exit_code = output.status.code().unwrap_or(-1);
            debug!(
                tool = %command.tool,
                exit_code,
                stdout_bytes = output.stdout.len(),
                stderr_bytes = output.stderr.len(),
                "tool finished"
            );
            Some(ToolOutput::new(exit_code, output.stdout, output.stderr))
        }
        Err(e) => {
            warn!(tool = %command.tool, program = %command.program, error = %e, "could not run tool");
            None
        }
    }
}
