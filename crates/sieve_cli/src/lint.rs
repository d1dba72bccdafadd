//! `sieve lint`: run the toolchain and report normalized diagnostics.
//!
//! 1. Find the project root (walk up looking for `sieve.toml`)
//! 2. Load config via `sieve_config` and merge CLI overrides
//! 3. Decide which paths to scan
//! 4. Run each enabled tool and capture its output
//! 5. Normalize all output with the `sieve_lint` toolchain
//! 6. Render diagnostics and derive the exit code

use sieve_config::{LintConfig, ProjectConfig};
use sieve_diagnostics::{DiagnosticRenderer, DiagnosticSink, GithubRenderer, TerminalRenderer};
use sieve_lint::{ToolOutputs, Toolchain};
use tracing::debug;

use crate::pipeline::{discover_paths, load_project_config, resolve_project_root};
use crate::runner::{build_command, run_tool};
use crate::{GlobalArgs, LintArgs, ReportFormat, ScanArgs};

/// Runs the `sieve lint` command.
///
/// Returns exit code 0 if no error-severity diagnostics were produced, 1 otherwise.
pub fn run(args: &LintArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project_dir = resolve_project_root(global)?;
    let config = load_project_config(global, &project_dir)?;
    let lint_config = merge_lint_config(&config, &args.scan);
    let ci = args.scan.in_ci();

    let paths = discover_paths(
        &project_dir,
        &args.scan.paths,
        &lint_config.paths,
        lint_config.tests,
    );
    if paths.is_empty() {
        if !global.quiet {
            eprintln!(
                "warning: nothing to lint: no paths given and no src/ or tests/ in {}",
                project_dir.display()
            );
        }
        return Ok(0);
    }

    let toolchain = Toolchain::new(&lint_config);
    let mut outputs = ToolOutputs::new();
    for tool in toolchain.tools() {
        if !global.quiet && !ci {
            eprintln!("   Running {tool}");
        }
        let command = build_command(tool, &config, &paths, ci);
        if let Some(output) = run_tool(&command, &project_dir) {
            outputs.insert(tool.to_string(), output);
        }
    }

    let format = args.format.unwrap_or(if ci {
        ReportFormat::Github
    } else {
        ReportFormat::Text
    });

    let sink = DiagnosticSink::new();
    let mut diagnostics = toolchain.run(&outputs);
    match format {
        ReportFormat::Text => {
            let renderer = TerminalRenderer::new(global.color);
            for diag in diagnostics.by_ref() {
                print!("{}", renderer.render(&diag));
                sink.emit(diag);
            }
        }
        ReportFormat::Github => {
            for diag in diagnostics.by_ref() {
                println!("{}", GithubRenderer.render(&diag));
                sink.emit(diag);
            }
        }
        ReportFormat::Json => {
            sink.extend(diagnostics.by_ref());
            let json = serde_json::to_string_pretty(&sink.diagnostics())?;
            println!("{json}");
        }
    }
    debug!(skipped = diagnostics.skipped(), "unparseable tool output lines");

    if !global.quiet && format != ReportFormat::Json {
        eprintln!(
            "   Result: {} error(s), {} warning(s), {} notice(s)",
            sink.error_count(),
            sink.warning_count(),
            sink.notice_count()
        );
    }

    if sink.has_errors() {
        Ok(1)
    } else {
        Ok(0)
    }
}

/// Merges CLI flags into the config file's lint section.
///
/// `--tool` replaces the configured tool list, `--no-tests` turns off test
/// discovery, and the remaining settings come from the file.
pub fn merge_lint_config(config: &ProjectConfig, args: &ScanArgs) -> LintConfig {
    let tools = if args.tools.is_empty() {
        config.lint.tools.clone()
    } else {
        Some(args.tools.clone())
    };

    LintConfig {
        tools,
        paths: config.lint.paths.clone(),
        tests: config.lint.tests && !args.no_tests,
        trailing_hunk: config.lint.trailing_hunk,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sieve_config::{load_config_from_str, TrailingHunk};

    fn scan() -> ScanArgs {
        ScanArgs {
            ci: false,
            no_tests: false,
            tools: Vec::new(),
            paths: Vec::new(),
        }
    }

    #[test]
    fn merge_keeps_config_without_flags() {
        let config = load_config_from_str(
            "[lint]\ntools = [\"mypy\"]\npaths = [\"app\"]\ntrailing_hunk = \"flush\"\n",
        )
        .unwrap();
        let merged = merge_lint_config(&config, &scan());
        assert_eq!(merged.tools, Some(vec!["mypy".to_string()]));
        assert_eq!(merged.paths, vec!["app"]);
        assert!(merged.tests);
        assert_eq!(merged.trailing_hunk, TrailingHunk::Flush);
    }

    #[test]
    fn merge_cli_tools_replace_config() {
        let config = load_config_from_str("[lint]\ntools = [\"mypy\"]\n").unwrap();
        let mut cli = scan();
        cli.tools = vec!["flake8".to_string(), "pylint".to_string()];
        let merged = merge_lint_config(&config, &cli);
        assert!(merged.is_enabled("flake8"));
        assert!(!merged.is_enabled("mypy"));
    }

    #[test]
    fn merge_no_tests_flag() {
        let config = ProjectConfig::default();
        let mut cli = scan();
        cli.no_tests = true;
        assert!(!merge_lint_config(&config, &cli).tests);
    }

    #[test]
    fn empty_project_exits_cleanly() {
        let tmp = tempfile::TempDir::new().unwrap();
        std::fs::write(tmp.path().join("sieve.toml"), "").unwrap();
        let global = GlobalArgs {
            quiet: true,
            verbose: false,
            color: false,
            config: Some(tmp.path().display().to_string()),
        };
        let args = LintArgs {
            scan: scan(),
            format: None,
        };
        assert_eq!(run(&args, &global).unwrap(), 0);
    }
}
