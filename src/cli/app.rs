//! Main CLI application structure

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use super::output::{Output, OutputFormat};
use crate::command::CommandRegistry;
use crate::storage::{Config, Store};

/// Command name the driver answers itself
const HELP: &str = "help";

#[derive(Parser)]
#[command(name = "bucketview")]
#[command(author, version, about = "Inspect and edit the buckets of an embedded key-value store")]
pub struct Cli {
    /// Store file to open (created if absent)
    #[arg(long, short = 'd', env = "BUCKETVIEW_DB")]
    pub db: Option<PathBuf>,

    /// Output format
    #[arg(long, env = "BUCKETVIEW_FORMAT")]
    pub format: Option<OutputFormat>,

    /// Configuration file (defaults to the platform config directory)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Command to run; `help` lists them
    pub command: Option<String>,

    /// Arguments for the command
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let output = Output::new(config.output_format(cli.format));
    let registry = CommandRegistry::builtin();

    let name = cli.command.as_deref().unwrap_or(HELP);
    if name == HELP {
        help(&registry, &output);
        return Ok(());
    }

    let mut command = registry.resolve(name, &[])?;
    command.parse(&cli.args)?;
    debug!(command = name, args = ?cli.args, "arguments parsed");

    let mut store = open_or_exit(&config.db_path(cli.db.as_deref()));
    command.exec(&mut store)?;
    command.report(&output);

    debug!(command = name, "command completed");
    Ok(())
}

/// Opens the store, terminating the process if that is impossible
fn open_or_exit(path: &Path) -> Store {
    match Store::open(path) {
        Ok(store) => store,
        Err(err) => {
            error!(path = %path.display(), error = %err, "cannot open store");
            std::process::exit(1);
        }
    }
}

/// Lists the registered commands
fn help(registry: &CommandRegistry, output: &Output) {
    if output.is_json() {
        let commands: Vec<_> = registry
            .entries()
            .map(|(name, description)| {
                serde_json::json!({
                    "name": name,
                    "description": description,
                })
            })
            .collect();
        output.data(&commands);
    } else {
        output.line("usage: bucketview [--db <path>] <command> [args]...");
        output.line("");
        for (name, description) in registry.entries() {
            output.row(&[name, description]);
        }
    }
}

/// Logs go to stderr; `RUST_LOG` overrides the level chosen by `--verbose`
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .try_init();
}
