//! Configuration types deserialized from `sieve.toml`.

use serde::Deserialize;
use std::collections::BTreeMap;

/// Names of the built-in tools, in the order they always run.
pub const KNOWN_TOOLS: &[&str] = &["isort", "black", "flake8", "mypy", "pylint", "pydocstyle"];

/// The top-level configuration parsed from `sieve.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Which tools run, what they scan, and how output is interpreted.
    #[serde(default)]
    pub lint: LintConfig,
    /// Per-tool invocation overrides keyed by tool name.
    #[serde(default)]
    pub tools: BTreeMap<String, ToolConfig>,
}

impl ProjectConfig {
    /// Returns the override block for `tool`, if one was configured.
    pub fn tool(&self, tool: &str) -> Option<&ToolConfig> {
        self.tools.get(tool)
    }
}

/// The `[lint]` section.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LintConfig {
    /// Subset of tools to run. `None` runs every built-in tool.
    ///
    /// Listing order is irrelevant; tools always run in [`KNOWN_TOOLS`] order.
    #[serde(default)]
    pub tools: Option<Vec<String>>,
    /// Paths to scan. Empty means "discover from the project layout".
    #[serde(default)]
    pub paths: Vec<String>,
    /// Whether discovery includes the `tests` directory.
    #[serde(default = "default_true")]
    pub tests: bool,
    /// What to do with a diff hunk still pending when tool output ends.
    #[serde(default)]
    pub trailing_hunk: TrailingHunk,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            tools: None,
            paths: Vec::new(),
            tests: true,
            trailing_hunk: TrailingHunk::default(),
        }
    }
}

impl LintConfig {
    /// Returns `true` if `tool` is enabled by this configuration.
    pub fn is_enabled(&self, tool: &str) -> bool {
        match &self.tools {
            Some(tools) => tools.iter().any(|t| t == tool),
            None => true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Policy for a diff hunk that is still buffered when tool output ends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrailingHunk {
    /// Drop the pending hunk. Matches the historical behaviour.
    #[default]
    Discard,
    /// Emit the pending hunk as a final diagnostic.
    Flush,
}

/// A `[tools.<name>]` override block.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolConfig {
    /// Executable to run instead of the tool's default name.
    #[serde(default)]
    pub program: Option<String>,
    /// Arguments replacing the tool's default arguments.
    #[serde(default)]
    pub args: Option<Vec<String>>,
    /// Extra environment variables for the tool process.
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}
