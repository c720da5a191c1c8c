//! `sotoki inspect <DATABASE_DIR> <ENTITY_ID>`

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use sotoki_cli::{inspect, CliError};
use sotoki_core::{EntityId, SotokiConfig};

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Store directory
    pub database: PathBuf,

    /// Entity id in namespace:local form, e.g. Post:42
    pub entity: String,
}

pub fn handle_inspect(args: InspectArgs, config: &SotokiConfig) -> anyhow::Result<()> {
    let entity = EntityId::parse(&args.entity).map_err(CliError::from)?;
    let found = inspect(&args.database, &entity, config)
        .with_context(|| format!("reading {entity}"))?;

    if found.is_empty() {
        tracing::warn!(entity = %entity, "Entity has no attributes");
    }
    let json = serde_json::to_string_pretty(&found).map_err(CliError::from)?;
    println!("{json}");
    Ok(())
}
