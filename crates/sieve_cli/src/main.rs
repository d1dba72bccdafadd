//! Sieve CLI: run Python static-analysis tools and report their findings
//! in one format.
//!
//! Provides `sieve lint` to run the toolchain over a project and render the
//! normalized diagnostics as console text, GitHub Actions annotations, or
//! JSON, and `sieve tools` to show what would be run.

#![warn(missing_docs)]

mod lint;
mod pipeline;
mod runner;

use std::io::IsTerminal;
use std::process;

use clap::builder::PossibleValuesParser;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

/// Sieve: one report for many linters.
#[derive(Parser, Debug)]
#[command(name = "sieve", version, about = "Run linters and normalize their diagnostics")]
pub struct Cli {
    /// Suppress all output except diagnostics and errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a custom `sieve.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run every enabled tool and report its diagnostics.
    Lint(LintArgs),
    /// List the enabled tools and the commands that would run.
    Tools(ScanArgs),
}

/// Arguments for the `sieve lint` subcommand.
#[derive(Args, Debug)]
pub struct LintArgs {
    /// Which tools run, and over what.
    #[command(flatten)]
    pub scan: ScanArgs,

    /// Output format for diagnostics (default: `github` in CI, else `text`).
    #[arg(short, long, value_enum)]
    pub format: Option<ReportFormat>,
}

/// Tool and path selection shared by `sieve lint` and `sieve tools`.
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Run in CI mode (formatters report diffs). Implied by `GITHUB_ACTIONS`.
    #[arg(long)]
    pub ci: bool,

    /// Do not scan the `tests` directory.
    #[arg(long)]
    pub no_tests: bool,

    /// Only run these tools (e.g., `--tool mypy --tool flake8`).
    #[arg(
        long = "tool",
        value_name = "NAME",
        value_parser = PossibleValuesParser::new(sieve_config::KNOWN_TOOLS.iter().copied())
    )]
    pub tools: Vec<String>,

    /// Files or directories to scan.
    pub paths: Vec<String>,
}

impl ScanArgs {
    /// Returns `true` if `--ci` was given or the run is inside GitHub Actions.
    pub fn in_ci(&self) -> bool {
        self.ci || std::env::var_os("GITHUB_ACTIONS").is_some()
    }
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Diagnostic output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// GitHub Actions workflow commands.
    Github,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-diagnostic output.
    pub quiet: bool,
    /// Whether to log at debug level.
    pub verbose: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => std::io::stdout().is_terminal(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        config: cli.config,
    };
    init_logging(&global);

    let result = match cli.command {
        Command::Lint(ref args) => lint::run(args, &global),
        Command::Tools(ref args) => list_tools(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Installs the stderr log subscriber.
///
/// `--verbose` forces `debug`; otherwise `RUST_LOG` is honoured, defaulting
/// to `warn` (`error` with `--quiet`).
fn init_logging(global: &GlobalArgs) {
    let filter = if global.verbose {
        EnvFilter::new("debug")
    } else {
        let fallback = if global.quiet { "error" } else { "warn" };
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(global.color)
        .with_target(false)
        .init();
}

/// Runs the `sieve tools` command: prints each enabled tool's command line.
fn list_tools(args: &ScanArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project_dir = pipeline::resolve_project_root(global)?;
    let config = pipeline::load_project_config(global, &project_dir)?;
    let lint_config = lint::merge_lint_config(&config, args);
    let paths = pipeline::discover_paths(
        &project_dir,
        &args.paths,
        &lint_config.paths,
        lint_config.tests,
    );

    let toolchain = sieve_lint::Toolchain::new(&lint_config);
    for tool in toolchain.tools() {
        let command = runner::build_command(tool, &config, &paths, args.in_ci());
        println!("{tool}: {}", command.display());
    }
    Ok(0)
}
