//! `sotoki load <DUMP_DIR> <DATABASE_DIR>`

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use sotoki_cli::{load, CliError};
use sotoki_core::SotokiConfig;

#[derive(Args, Debug)]
pub struct LoadArgs {
    /// Directory holding Posts.xml, Comments.xml, PostLinks.xml and Users.xml
    pub dump: PathBuf,

    /// Store directory to create (must not exist)
    pub database: PathBuf,
}

pub fn handle_load(args: LoadArgs, config: &SotokiConfig) -> anyhow::Result<()> {
    let report = load(&args.dump, &args.database, config)
        .map_err(CliError::from)
        .with_context(|| format!("loading {}", args.dump.display()))?;

    for set in &report.record_sets {
        println!("{:<10} {:>10} rows {:>12} tuples", set.name, set.rows, set.tuples);
    }
    println!(
        "tags: {} across {} questions ({} links)",
        report.tags.tags, report.tags.tagged_questions, report.tags.links
    );
    Ok(())
}
