//! Load phase: XML dump to tuples.
//!
//! Every `<row .../>` of a record file becomes one entity. With record set
//! `Post`, the row `<row Id="5" Score="3" Title="x"/>` gives
//!
//! ```text
//! Post:5  Post/Id    = "5"
//! Post:5  Post/Score = 3
//! Post:5  Post/Title = "x"
//! ```
//!
//! After every record set is in, the tag derivation pass runs.

use std::path::{Path, PathBuf};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use sotoki_core::{AttributeName, EntityId, LoadConfig, RecordSetConfig, SotokiConfig, Value};
use sotoki_query::{derive_tags, PostRepository, QueryError, TagReport};
use sotoki_storage::{Session, StorageError, TupleSpace};
use thiserror::Error;
use tracing::{debug, info, instrument};

const ROW_ELEMENT: &[u8] = b"row";
const ID_FIELD: &str = "Id";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Record file not found: {path}")]
    MissingRecordFile { path: String },

    #[error("XML error in {file}: {source}")]
    Xml {
        file: String,
        #[source]
        source: quick_xml::Error,
    },

    #[error("Row {row} of {file} has no Id attribute")]
    MissingId { file: String, row: usize },

    #[error("{file}: {field}={value:?} on row Id={id} is not an integer")]
    InvalidInteger {
        file: String,
        id: String,
        field: String,
        value: String,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Query(#[from] QueryError),
}

impl LoadError {
    pub fn is_corruption(&self) -> bool {
        match self {
            Self::Storage(e) => e.is_corruption(),
            Self::Query(e) => e.is_corruption(),
            _ => false,
        }
    }
}

/// Rows loaded from one record file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordSetReport {
    pub name: String,
    pub rows: usize,
    pub tuples: usize,
}

/// Outcome of a load run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub record_sets: Vec<RecordSetReport>,
    pub tags: TagReport,
}

impl LoadReport {
    pub fn total_tuples(&self) -> usize {
        self.record_sets.iter().map(|r| r.tuples).sum::<usize>() + self.tags.tags + self.tags.links
    }
}

/// Creates a store at `database` and fills it from `dump`.
///
/// # Errors
/// - `StorageError::AlreadyExists` (as `LoadError::Storage`) if `database`
///   exists
/// - `LoadError::MissingRecordFile` / `Xml` / `MissingId` /
///   `InvalidInteger` for bad input; the load stops at the first one
#[instrument(skip(config), fields(dump = %dump.display(), database = %database.display()))]
pub fn load(dump: &Path, database: &Path, config: &SotokiConfig) -> Result<LoadReport, LoadError> {
    let space = TupleSpace::create(database, config.storage.clone())?;
    let mut report = LoadReport::default();
    {
        let repository =
            PostRepository::new(space.session(), config.load.question_type_marker.as_str());
        for set in &config.load.record_sets {
            let set_report = load_record_set(repository.session(), dump, set, &config.load)?;
            info!(
                set = %set_report.name,
                rows = set_report.rows,
                tuples = set_report.tuples,
                "Loaded record set"
            );
            report.record_sets.push(set_report);
        }
        report.tags = derive_tags(&repository)?;
    }
    space.close()?;
    info!(tuples = report.total_tuples(), "Load complete");
    Ok(report)
}

fn load_record_set(
    session: &Session<'_>,
    dump: &Path,
    set: &RecordSetConfig,
    config: &LoadConfig,
) -> Result<RecordSetReport, LoadError> {
    let path: PathBuf = dump.join(&set.file);
    if !path.is_file() {
        return Err(LoadError::MissingRecordFile {
            path: path.display().to_string(),
        });
    }
    let xml_error = |source: quick_xml::Error| LoadError::Xml {
        file: set.file.clone(),
        source,
    };

    let mut reader = Reader::from_file(&path).map_err(xml_error)?;
    let mut buf = Vec::new();
    let mut report = RecordSetReport {
        name: set.name.clone(),
        rows: 0,
        tuples: 0,
    };

    loop {
        match reader.read_event_into(&mut buf).map_err(xml_error)? {
            Event::Start(ref e) | Event::Empty(ref e) if e.local_name().as_ref() == ROW_ELEMENT => {
                let fields = row_fields(e).map_err(xml_error)?;
                report.rows += 1;
                report.tuples += insert_row(session, set, config, report.rows, fields)?;
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    debug!(set = %set.name, rows = report.rows, "Finished record file");
    Ok(report)
}

fn row_fields(element: &BytesStart<'_>) -> Result<Vec<(String, String)>, quick_xml::Error> {
    let mut fields = Vec::new();
    for attr in element.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        fields.push((key, value));
    }
    Ok(fields)
}

/// Inserts one row; returns the number of tuples written.
fn insert_row(
    session: &Session<'_>,
    set: &RecordSetConfig,
    config: &LoadConfig,
    row: usize,
    fields: Vec<(String, String)>,
) -> Result<usize, LoadError> {
    let id = fields
        .iter()
        .find(|(k, _)| k == ID_FIELD)
        .map(|(_, v)| v.clone())
        .ok_or_else(|| LoadError::MissingId {
            file: set.file.clone(),
            row,
        })?;
    let entity = EntityId::new(set.name.as_str(), id.as_str());

    let count = fields.len();
    for (field, raw) in fields {
        let value = coerce(config, &field, raw).map_err(|value| LoadError::InvalidInteger {
            file: set.file.clone(),
            id: id.clone(),
            field: field.clone(),
            value,
        })?;
        session.insert(&entity, &AttributeName::new(set.name.as_str(), field), &value)?;
    }
    Ok(count)
}

/// Integer fields become `Integer` when non-empty; everything else is text.
/// Returns the raw text back when an integer field does not parse.
fn coerce(config: &LoadConfig, field: &str, raw: String) -> Result<Value, String> {
    if raw.is_empty() || !config.integer_fields.iter().any(|f| f == field) {
        return Ok(Value::Text(raw));
    }
    raw.trim().parse::<i64>().map(Value::Integer).map_err(|_| raw)
}
