//! Diagnostic read of a single entity.

use std::path::Path;

use sotoki_core::{EntityId, SotokiConfig};
use sotoki_storage::{Entity, TupleSpace};
use tracing::instrument;

use crate::error::CliError;

/// Opens the store read-side and returns every attribute of `entity`.
#[instrument(skip(config), fields(database = %database.display(), entity = %entity))]
pub fn inspect(
    database: &Path,
    entity: &EntityId,
    config: &SotokiConfig,
) -> Result<Entity, CliError> {
    let space = TupleSpace::open(database, config.storage.clone())?;
    let found = space.session().get_entity(entity)?;
    Ok(found)
}
