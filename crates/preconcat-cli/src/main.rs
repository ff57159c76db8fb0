#![forbid(unsafe_code)]

mod cmd;
mod concat;
mod discover;
mod output;

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use output::{CliError, OutputMode, render_error, resolve_output_mode};
use preconcat_core::ErrorCode;
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "preconcat: order source files by their @require declarations",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format: pretty, text or json.
    #[arg(long, value_enum, global = true)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Config file to read instead of `./preconcat.toml`.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Suppress non-essential output.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        resolve_output_mode(self.format, self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Build",
        about = "Print the build order",
        long_about = "Print the files of a target in dependency order, each after the files it @requires.",
        after_help = "EXAMPLES:\n    # Order a configured target\n    preconcat order app\n\n    # Order ad-hoc sources rooted at src/\n    preconcat order --src 'src/**/*.js' --root src\n\n    # Emit machine-readable output\n    preconcat order app --format json"
    )]
    Order(cmd::order::OrderArgs),

    #[command(
        next_help_heading = "Build",
        about = "Concatenate sources in build order",
        long_about = "Order a target and write its files, joined by the separator, to the destination.",
        after_help = "EXAMPLES:\n    # Build one target\n    preconcat concat app\n\n    # Build every configured target\n    preconcat concat --all\n\n    # Ad-hoc build\n    preconcat concat --src 'src/**/*.js' --dest dist/app.js"
    )]
    Concat(cmd::concat::ConcatArgs),

    #[command(
        next_help_heading = "Inspect",
        about = "List dependency cycles",
        long_about = "List every dependency cycle in a target. Exits 1 when a cycle exists.",
        after_help = "EXAMPLES:\n    # Check a target for cycles\n    preconcat cycles app\n\n    # Emit machine-readable output\n    preconcat cycles app --format json"
    )]
    Cycles(cmd::cycles::CyclesArgs),

    #[command(
        next_help_heading = "Inspect",
        about = "Dump the dependency graph",
        long_about = "Dump every file of a target with its declared dependencies, or Graphviz DOT.",
        after_help = "EXAMPLES:\n    # List nodes and dependencies\n    preconcat graph app\n\n    # Render with Graphviz\n    preconcat graph app --dot | dot -Tsvg > deps.svg"
    )]
    Graph(cmd::graph::GraphArgs),

    #[command(
        next_help_heading = "Inspect",
        about = "List configured targets",
        long_about = "List the targets in preconcat.toml with global options merged in.",
        after_help = "EXAMPLES:\n    # Show targets\n    preconcat targets\n\n    # Emit machine-readable output\n    preconcat targets --format json"
    )]
    Targets(cmd::targets::TargetsArgs),

    #[command(
        next_help_heading = "Project Maintenance",
        about = "Generate shell completion scripts",
        long_about = "Generate shell completion scripts for supported shells.",
        after_help = "EXAMPLES:\n    # Generate bash completions\n    preconcat completions bash\n\n    # Generate zsh completions\n    preconcat completions zsh"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("PRECONCAT_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "preconcat=debug,info"
        } else {
            "preconcat=info,warn"
        })
    });

    let format = env::var("PRECONCAT_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn run(cli: &Cli, output: OutputMode) -> anyhow::Result<ExitCode> {
    if let Commands::Completions(args) = &cli.command {
        let mut command = Cli::command();
        cmd::completions::run_completions(args.shell, &mut command)?;
        return Ok(ExitCode::SUCCESS);
    }

    let base = env::current_dir()
        .context("cannot determine the working directory")
        .context(ErrorCode::InternalUnexpected)?;
    let project = cmd::Project::load(&base, cli.config.as_deref())?;
    debug!(base = %base.display(), targets = project.config.targets.len(), "project loaded");

    match &cli.command {
        Commands::Order(args) => cmd::order::run_order(args, output, &project)?,
        Commands::Concat(args) => cmd::concat::run_concat(args, output, cli.quiet, &project)?,
        Commands::Cycles(args) => {
            if cmd::cycles::run_cycles(args, output, &project)? {
                return Ok(ExitCode::from(1));
            }
        }
        Commands::Graph(args) => cmd::graph::run_graph(args, output, &project)?,
        Commands::Targets(args) => cmd::targets::run_targets(args, output, &project)?,
        Commands::Completions(_) => {}
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let output = cli.output_mode();
    match run(&cli, output) {
        Ok(code) => code,
        Err(err) => {
            debug!(error = ?err, "command failed");
            if render_error(output, &CliError::from(&err)).is_err() {
                eprintln!("error: {err:#}");
            }
            ExitCode::FAILURE
        }
    }
}
