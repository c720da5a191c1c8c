//! TupleSpace lifecycle tests.
//!
//! Tests use real RocksDB instances in temporary directories.

use sotoki_core::{AttributeName, EntityId, StorageConfig, Value};
use tempfile::TempDir;

use super::core::TupleSpace;
use super::error::StorageError;

/// Fresh store with default configuration. Keep the `TempDir` alive for the
/// duration of the test.
pub(super) fn create_temp_space() -> (TempDir, TupleSpace) {
    create_temp_space_with(StorageConfig::default())
}

pub(super) fn create_temp_space_with(config: StorageConfig) -> (TempDir, TupleSpace) {
    let tmp = TempDir::new().expect("create temp dir");
    let space = TupleSpace::create(tmp.path().join("db"), config).expect("create store");
    (tmp, space)
}

pub(super) fn post(local: &str) -> EntityId {
    EntityId::new("Post", local)
}

pub(super) fn post_attr(field: &str) -> AttributeName {
    AttributeName::new("Post", field)
}

#[test]
fn test_create_new_store() {
    println!("=== TEST: create on a missing directory ===");
    let (tmp, space) = create_temp_space();

    println!("AFTER: store at {}", space.path());
    assert!(tmp.path().join("db").is_dir());
    assert_eq!(space.generation(), 0);
    space.health_check().expect("health check");
}

#[test]
fn test_create_rejects_existing_directory() {
    println!("=== TEST: create refuses a pre-existing directory ===");
    let tmp = TempDir::new().expect("create temp dir");

    println!("BEFORE: {} exists", tmp.path().display());
    let result = TupleSpace::create(tmp.path(), StorageConfig::default());

    println!("AFTER: {:?}", result.as_ref().err());
    assert!(matches!(result, Err(StorageError::AlreadyExists { .. })));
}

#[test]
fn test_open_requires_existing_store() {
    println!("=== TEST: open on a missing directory ===");
    let tmp = TempDir::new().expect("create temp dir");
    let missing = tmp.path().join("nope");

    let result = TupleSpace::open(&missing, StorageConfig::default());
    assert!(matches!(result, Err(StorageError::OpenFailed { .. })));
    assert!(!missing.exists(), "open must not create a store");
}

#[test]
fn test_close_then_reopen_keeps_tuples() {
    println!("=== TEST: tuples survive close and reopen ===");
    let tmp = TempDir::new().expect("create temp dir");
    let path = tmp.path().join("db");

    {
        let space = TupleSpace::create(&path, StorageConfig::default()).expect("create");
        let session = space.session();
        session
            .insert(&post("1"), &post_attr("Title"), &Value::text("Hello"))
            .expect("insert");
        session
            .insert(&post("1"), &post_attr("Score"), &Value::Integer(-3))
            .expect("insert");
        drop(session);
        println!("BEFORE: closing after generation {}", space.generation());
        space.close().expect("close");
    }

    let space = TupleSpace::open(&path, StorageConfig::default()).expect("reopen");
    let entity = space.session().get_entity(&post("1")).expect("get");
    println!("AFTER: reopened entity = {:?}", entity);
    assert_eq!(entity.text("Title"), Some("Hello"));
    assert_eq!(entity.integer("Score"), Some(-3));
}

#[test]
fn test_generation_advances_per_insert() {
    let (_tmp, space) = create_temp_space();
    let session = space.session();
    for i in 0..3 {
        session
            .insert(&post(&i.to_string()), &post_attr("Id"), &Value::text(i.to_string()))
            .expect("insert");
    }
    assert_eq!(space.generation(), 3);
}

#[test]
fn test_wal_disabled_still_readable() {
    let config = StorageConfig {
        enable_wal: false,
        ..StorageConfig::default()
    };
    let (_tmp, space) = create_temp_space_with(config);
    let session = space.session();
    session
        .insert(&post("9"), &post_attr("Body"), &Value::text("x"))
        .expect("insert");
    assert_eq!(
        session.get_entity(&post("9")).expect("get").text("Body"),
        Some("x")
    );
}
