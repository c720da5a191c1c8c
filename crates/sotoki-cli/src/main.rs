//! sotoki
//!
//! Offline Stack Exchange site builder: load an XML dump into the tuple
//! store, then render one page per question.
//!
//! # Commands
//!
//! - `load`: dump directory to a fresh store (plus tag derivation)
//! - `build`: store to `posts/<id>.html` and `index.html`
//! - `inspect`: print one entity as JSON
//!
//! Exit code 1 on error, 2 on corrupt stored data.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sotoki_cli::{exit_code_for_error, logging, CliError, EXIT_ERROR, EXIT_SUCCESS};
use sotoki_core::SotokiConfig;
use tracing::error;

mod commands;

/// sotoki - static Stack Exchange pages from an entity-attribute-value store
#[derive(Parser)]
#[command(name = "sotoki")]
#[command(version)]
#[command(about = "Load a Stack Exchange dump and build static pages from it")]
#[command(propagate_version = true)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// TOML configuration file (default: config/ directory and SOTOKI__* env)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load an XML dump into a new store
    Load(commands::load::LoadArgs),
    /// Render question pages and the index from a store
    Build(commands::build::BuildArgs),
    /// Print every attribute of one entity as JSON
    Inspect(commands::inspect::InspectArgs),
}

fn load_config(path: Option<&PathBuf>) -> Result<SotokiConfig, CliError> {
    let config = match path {
        Some(path) => SotokiConfig::from_file(path)?,
        None => SotokiConfig::load()?,
    };
    Ok(config)
}

fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("sotoki: {e}");
            std::process::exit(EXIT_ERROR);
        }
    };

    logging::init(cli.verbose, &config.logging);

    let result = match cli.command {
        Commands::Load(args) => commands::load::handle_load(args, &config),
        Commands::Build(args) => commands::build::handle_build(args, &config),
        Commands::Inspect(args) => commands::inspect::handle_inspect(args, &config),
    };

    let exit_code = match result {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            error!("{e:#}");
            eprintln!("sotoki: {e:#}");
            exit_code_for_error(&e)
        }
    };

    std::process::exit(exit_code);
}
